//! Roster Server - 健身房会员名册服务
//!
//! # 架构概述
//!
//! - **HTTP API** (`api`): `/clients` 增删改查与 `/health`
//! - **数据库** (`db`): SQLite 连接池 (懒连接) 与会员存储
//! - **核心** (`core`): 配置、状态、时钟、服务器生命周期
//! - **工具** (`utils`): 日志、输入校验、日期解析
//!
//! 会员到期日与状态计算位于 `shared::membership`。
//!
//! # 模块结构
//!
//! ```text
//! roster-server/src/
//! ├── core/          # 配置、状态、错误、时钟
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 工具函数
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerError, ServerState, build_router};
pub use utils::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// 加载 `.env`、准备日志目录并初始化日志
pub fn setup_environment() -> crate::core::Result<Config> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    if let Some(dir) = &config.log.dir {
        std::fs::create_dir_all(dir)
            .map_err(|e| ServerError::Config(format!("Cannot create log directory {dir}: {e}")))?;
    }

    init_logger_with_file(
        Some(&config.log.level),
        Some(config.log.json),
        config.log.dir.as_deref(),
    );

    if !config.is_development() {
        tracing::info!(environment = %config.environment, "Running outside development");
    }
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    ____             __
   / __ \____  _____/ /____  _____
  / /_/ / __ \/ ___/ __/ _ \/ ___/
 / _, _/ /_/ (__  ) /_/  __/ /
/_/ |_|\____/____/\__/\___/_/
    "#
    );
}
