use std::fmt::Display;
use std::str::FromStr;

use chrono_tz::Tz;

/// 服务器配置 - roster 服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (`.env` 文件由 dotenv 加载)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_HOST | 0.0.0.0 | 监听地址 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_URL | sqlite:roster.db | SQLite 数据库 URL |
/// | DB_MAX_CONNECTIONS | 5 | 连接池大小 |
/// | DB_ACQUIRE_TIMEOUT_MS | 5000 | 获取连接超时(毫秒) |
/// | BUSINESS_TIMEZONE | Asia/Kolkata | 业务时区 (决定"今天") |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | CORS_ALLOW_ORIGIN | * | 允许的来源 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志 |
/// | LOG_DIR | - | 日志目录 (可选) |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// DATABASE_URL=sqlite:/data/roster.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 监听地址
    pub http_host: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 业务时区
    pub timezone: Tz,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// CORS 允许来源 ("*" 表示任意)
    pub cors_allow_origin: String,
    /// 日志配置
    pub log: LogConfig,
    /// 运行环境: development | production
    pub environment: String,
}

/// Store connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 5,
            acquire_timeout_ms: 5000,
        }
    }

    /// In-memory SQLite database (one connection, otherwise every
    /// connection would see its own empty database)
    pub fn in_memory() -> Self {
        Self::new("sqlite::memory:")
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// Logger settings
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
    pub dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_host: var_or("HTTP_HOST", "0.0.0.0"),
            http_port: parse_or("HTTP_PORT", 3000),
            database: DatabaseConfig {
                url: var_or("DATABASE_URL", "sqlite:roster.db"),
                max_connections: parse_or("DB_MAX_CONNECTIONS", 5),
                acquire_timeout_ms: parse_or("DB_ACQUIRE_TIMEOUT_MS", 5000),
            },
            timezone: parse_or("BUSINESS_TIMEZONE", chrono_tz::Asia::Kolkata),
            request_timeout_ms: parse_or("REQUEST_TIMEOUT_MS", 30000),
            cors_allow_origin: var_or("CORS_ALLOW_ORIGIN", "*"),
            log: LogConfig {
                level: var_or("LOG_LEVEL", "info"),
                json: parse_or("LOG_JSON", false),
                dir: std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty()),
            },
            environment: var_or("ENVIRONMENT", "development"),
        }
    }

    /// 测试用配置: 内存数据库 + 随机端口
    pub fn for_tests() -> Self {
        Self {
            http_host: "127.0.0.1".into(),
            http_port: 0,
            database: DatabaseConfig::in_memory(),
            timezone: chrono_tz::Asia::Kolkata,
            request_timeout_ms: 30000,
            cors_allow_origin: "*".into(),
            log: LogConfig {
                level: "debug".into(),
                json: false,
                dir: None,
            },
            environment: "test".into(),
        }
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            tracing::warn!("Invalid {key} value '{raw}': {e}, using default {default}");
            default
        }),
        Err(_) => default,
    }
}
