//! 결제 서비스(Polka) webhook endpoint.
//!
//! - `POST /api/polka/webhooks`: `user.upgraded` 이벤트 수신 시 Chirpy Red 멤버십 부여

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{auth_error, ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 멤버십 업그레이드 이벤트 이름.
pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

/// Webhook 이벤트 데이터.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WebhookData {
    pub user_id: Uuid,
}

/// Webhook 요청.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WebhookRequest {
    /// 이벤트 이름 (예: "user.upgraded")
    pub event: String,
    pub data: WebhookData,
}

/// 결제 이벤트 수신.
///
/// 처리하지 않는 이벤트도 204로 수신 확인합니다.
#[utoipa::path(
    post,
    path = "/api/polka/webhooks",
    request_body = WebhookRequest,
    responses(
        (status = 204, description = "처리 또는 무시됨"),
        (status = 404, description = "존재하지 않는 사용자", body = ApiErrorResponse)
    ),
    tag = "webhooks"
)]
pub async fn polka_webhook(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WebhookRequest>,
) -> ApiResult<StatusCode> {
    if request.event != USER_UPGRADED_EVENT {
        debug!(event = %request.event, "Webhook event ignored");
        return Ok(StatusCode::NO_CONTENT);
    }

    state
        .gate
        .upgrade_user(request.data.user_id)
        .await
        .map_err(auth_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Webhook 라우터 생성.
pub fn webhooks_router() -> Router<Arc<AppState>> {
    Router::new().route("/polka/webhooks", post(polka_webhook))
}
