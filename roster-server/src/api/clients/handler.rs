//! Client API Handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{Method, StatusCode, header},
    response::IntoResponse,
};
use serde::de::DeserializeOwned;

use super::input::validate_client;
use crate::core::ServerState;
use crate::db::repository::RepoError;
use crate::utils::validation::parse_id;
use crate::utils::{AppError, AppResult};
use shared::models::{
    ClientInput, ClientView, DeleteClientRequest, DeleteClientResponse, ReplaceClientRequest,
};

/// Verbs served on /clients
pub const ALLOWED_METHODS: [&str; 4] = ["GET", "POST", "PUT", "DELETE"];

/// 解析 JSON 请求体，解析失败统一返回 400
fn body<T: DeserializeOwned>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload.map(|Json(v)| v).map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        AppError::invalid_request(format!("Invalid request body: {}", rejection.body_text()))
    })
}

/// GET /clients - 获取全部会员
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ClientView>>> {
    let today = state.today();
    let clients = state
        .store
        .find_all()
        .await?
        .into_iter()
        .map(|record| ClientView::new(record, today))
        .collect();
    Ok(Json(clients))
}

/// POST /clients - 创建会员
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<ClientInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ClientView>)> {
    let today = state.today();
    let draft = validate_client(body(payload)?, today, state.config.timezone)?;

    let record = state.store.insert(draft).await?;
    tracing::info!(
        client_id = record.id,
        end_date = %record.membership.end_date,
        "Client created"
    );

    Ok((StatusCode::CREATED, Json(ClientView::new(record, today))))
}

/// PUT /clients - 整体替换会员记录
pub async fn replace(
    State(state): State<ServerState>,
    payload: Result<Json<ReplaceClientRequest>, JsonRejection>,
) -> AppResult<Json<ClientView>> {
    let today = state.today();
    let request = body(payload)?;
    let id = parse_id(request.id.as_ref())?;
    let draft = validate_client(request.input, today, state.config.timezone)?;

    let record = state
        .store
        .replace_by_id(id, draft)
        .await
        .map_err(|e| not_found_as_client(e, id))?;
    tracing::info!(client_id = id, "Client replaced");

    Ok(Json(ClientView::new(record, today)))
}

/// DELETE /clients - 删除会员
pub async fn delete(
    State(state): State<ServerState>,
    payload: Result<Json<DeleteClientRequest>, JsonRejection>,
) -> AppResult<Json<DeleteClientResponse>> {
    let request = body(payload)?;
    let id = parse_id(request.id.as_ref())?;

    let deleted = state
        .store
        .delete_by_id(id)
        .await
        .map_err(|e| not_found_as_client(e, id))?;
    tracing::info!(client_id = id, name = %deleted.name, "Client deleted");

    Ok(Json(DeleteClientResponse {
        message: "Client deleted successfully".to_string(),
        deleted_client: deleted,
    }))
}

/// Any other verb on /clients
pub async fn method_not_allowed(method: Method) -> impl IntoResponse {
    (
        [(header::ALLOW, ALLOWED_METHODS.join(", "))],
        AppError::method_not_allowed(method.as_str(), &ALLOWED_METHODS),
    )
}

fn not_found_as_client(err: RepoError, id: i64) -> AppError {
    match err {
        RepoError::NotFound(_) => AppError::client_not_found(id),
        other => other.into(),
    }
}
