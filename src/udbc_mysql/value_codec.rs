use crate::udbc::value::Value;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use mysql_async::Value as MyValue;

pub fn from_mysql_value(v: &MyValue) -> Value {
    match v {
        MyValue::NULL => Value::Null,
        MyValue::Int(i) => Value::I64(*i),
        MyValue::UInt(u) => match i64::try_from(*u) {
            Ok(i) => Value::I64(i),
            Err(_) => Value::Str(u.to_string()),
        },
        MyValue::Float(f) => Value::F64(*f as f64),
        MyValue::Double(d) => Value::F64(*d),
        MyValue::Bytes(b) => Value::Bytes(b.clone()),
        MyValue::Date(y, m, d, h, min, s, micro) => {
            let Some(date) = NaiveDate::from_ymd_opt(*y as i32, *m as u32, *d as u32) else {
                // 0000-00-00 等零值日期
                return Value::Null;
            };
            if *h == 0 && *min == 0 && *s == 0 && *micro == 0 {
                return Value::Date(date);
            }
            date.and_hms_micro_opt(*h as u32, *min as u32, *s as u32, *micro)
                .map_or(Value::Null, Value::DateTime)
        }
        MyValue::Time(is_neg, days, h, min, s, micro) => {
            let total_h = *days * 24 + (*h as u32);
            match NaiveTime::from_hms_micro_opt(total_h, *min as u32, *s as u32, *micro) {
                Some(t) if !*is_neg => Value::Time(t),
                // 超出一天或为负的 TIME 只能以文本表示
                _ => Value::Str(format!(
                    "{}{:02}:{:02}:{:02}.{:06}",
                    if *is_neg { "-" } else { "" },
                    total_h,
                    min,
                    s,
                    micro
                )),
            }
        }
    }
}

pub fn to_mysql_value(v: &Value) -> MyValue {
    match v {
        Value::Null => MyValue::NULL,
        Value::Bool(b) => MyValue::Int(if *b { 1 } else { 0 }),
        Value::I16(i) => MyValue::Int(*i as i64),
        Value::I32(i) => MyValue::Int(*i as i64),
        Value::I64(i) => MyValue::Int(*i),
        Value::U8(u) => MyValue::UInt(*u as u64),
        Value::F64(f) => MyValue::Double(*f),
        Value::Str(s) => MyValue::Bytes(s.clone().into_bytes()),
        Value::Bytes(b) => MyValue::Bytes(b.clone()),
        Value::Date(d) => MyValue::Date(d.year() as u16, d.month() as u8, d.day() as u8, 0, 0, 0, 0),
        Value::Time(t) => MyValue::Time(
            false,
            0u32,
            t.hour() as u8,
            t.minute() as u8,
            t.second() as u8,
            t.nanosecond() / 1000,
        ),
        Value::DateTime(dt) => datetime(dt),
        Value::DateTimeUtc(dt) => datetime(&dt.naive_utc()),
        Value::Decimal(d) => MyValue::Bytes(d.to_string().into_bytes()),
    }
}

fn datetime(dt: &NaiveDateTime) -> MyValue {
    MyValue::Date(
        dt.date().year() as u16,
        dt.date().month() as u8,
        dt.date().day() as u8,
        dt.time().hour() as u8,
        dt.time().minute() as u8,
        dt.time().second() as u8,
        dt.and_utc().timestamp_subsec_micros(),
    )
}
