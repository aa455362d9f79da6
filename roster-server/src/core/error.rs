use thiserror::Error;

use crate::utils::AppError;

/// 进程级错误 (启动 / 监听 / 关闭)
///
/// 请求级错误走 [`AppError`]，这里只覆盖服务器生命周期。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("无法绑定地址 {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("数据库初始化失败: {0}")]
    Database(#[from] AppError),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

/// 服务器生命周期的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
