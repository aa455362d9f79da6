//! Client API 模块
//!
//! | 方法 | 路径 | 请求体 | 成功响应 |
//! |------|------|--------|----------|
//! | GET | /clients | - | 200, `ClientView[]` |
//! | POST | /clients | 表单字段 | 201, `ClientView` |
//! | PUT | /clients | `{id, ...字段}` | 200, `ClientView` |
//! | DELETE | /clients | `{id}` | 200, `{message, deletedClient}` |
//!
//! 其他方法返回 405 并携带 `Allow` 头。

mod handler;
pub mod input;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub use handler::ALLOWED_METHODS;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/clients",
        get(handler::list)
            .post(handler::create)
            .put(handler::replace)
            .delete(handler::delete)
            .fallback(handler::method_not_allowed),
    )
}
