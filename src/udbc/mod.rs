pub mod value;

pub mod connection;
pub mod driver;

use std::collections::HashMap;

/// 查询结果中的一行：列名 -> 值
pub type Row = HashMap<String, value::Value>;
