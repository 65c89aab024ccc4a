use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use crate::error::DbError;
use crate::models::pool_config::PoolConfig;

/// 默认配置文件，相对于进程的工作目录
pub const DEFAULT_CONFIG_FILE: &str = "mysql.ini";

/// 从文件加载连接池配置
pub fn load_from_path(path: impl AsRef<Path>) -> Result<PoolConfig, DbError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| DbError::Config(format!("{} is not readable: {}", path.display(), e)))?;
    parse(&text)
}

/// 解析 `key=value` 形式的配置文本
///
/// Lines without `=` are skipped, as are blank lines and `#`/`;` comments.
/// Unknown keys are ignored; keys that are absent keep their defaults.
pub fn parse(text: &str) -> Result<PoolConfig, DbError> {
    let mut config = PoolConfig::default();
    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            debug!(line = lineno + 1, "skipping config line without '='");
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        match key {
            "ip" => config.host = value.to_string(),
            "port" => config.port = number(key, value)?,
            "username" => config.user = value.to_string(),
            "password" => config.password = value.to_string(),
            "dbname" => config.database = value.to_string(),
            "initSize" => config.init_size = number(key, value)?,
            "maxSize" => config.max_size = number(key, value)?,
            "maxIdleTime" => config.max_idle = Duration::from_secs(number(key, value)?),
            "connectionTimeOut" => {
                config.acquire_timeout = Duration::from_millis(number(key, value)?)
            }
            _ => debug!(key, "ignoring unknown config key"),
        }
    }
    Ok(config)
}

fn number<T: FromStr>(key: &str, value: &str) -> Result<T, DbError> {
    value
        .parse()
        .map_err(|_| DbError::Config(format!("invalid value for {}: {:?}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# 数据库连接池的配置文件\r\n\
        ip=10.0.0.5\r\n\
        port=3307\r\n\
        username=app\r\n\
        password=a=b\r\n\
        dbname=chat\r\n\
        initSize=2\r\n\
        maxSize=4\r\n\
        maxIdleTime=1\r\n\
        connectionTimeOut=100\r\n";

    #[test]
    fn test_parse_all_keys() {
        let config = parse(SAMPLE).unwrap();
        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.port, 3307);
        assert_eq!(config.user, "app");
        // 只按第一个 '=' 切分
        assert_eq!(config.password, "a=b");
        assert_eq!(config.database, "chat");
        assert_eq!(config.init_size, 2);
        assert_eq!(config.max_size, 4);
        assert_eq!(config.max_idle, Duration::from_secs(1));
        assert_eq!(config.acquire_timeout, Duration::from_millis(100));
    }

    #[test]
    fn test_parse_skips_malformed_and_unknown() {
        let config = parse("garbage line\nfoo=bar\n initSize = 3 \n").unwrap();
        assert_eq!(config.init_size, 3);
        assert_eq!(config.max_size, PoolConfig::default().max_size);
    }

    #[test]
    fn test_parse_rejects_bad_number() {
        let err = parse("maxSize=lots\n").unwrap_err();
        assert!(matches!(err, DbError::Config(msg) if msg.contains("maxSize")));
    }

    #[test]
    fn test_missing_file() {
        let err = load_from_path("/definitely/not/here/mysql.ini").unwrap_err();
        assert!(matches!(err, DbError::Config(_)));
    }
}
