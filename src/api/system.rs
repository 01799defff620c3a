use axum::{
    Json, Router,
    extract::{OriginalUri, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use super::response::Envelope;
use crate::{config::TranslationPattern, locale::Locale, state::AppState, storage};

/// `/api` 下的系统信息路由
pub fn setup_route() -> Router<AppState> {
    Router::new().route("/system", get(system_info))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SystemInfo {
    pattern: TranslationPattern,
    description: &'static str,
    supported_locales: [Locale; 5],
    current_locale: Locale,
}

async fn system_info(locale: Locale, State(state): State<AppState>) -> Envelope<SystemInfo> {
    let pattern = state.pattern();
    Envelope::new(
        SystemInfo {
            pattern,
            description: pattern.description(),
            supported_locales: Locale::ALL,
            current_locale: locale,
        },
        locale,
    )
}

/// 健康检查，数据库不可用时返回 503 和 `degraded`
pub async fn health(locale: Locale, State(state): State<AppState>) -> impl IntoResponse {
    let pattern = state.pattern();
    let connected = storage::ping(state.pool()).await;
    let (status, text) = if connected {
        (StatusCode::OK, "ok")
    } else {
        tracing::warn!(%pattern, "database unreachable");
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(json!({
            "status": text,
            "locale": locale,
            "timestamp": Utc::now(),
            "database": {
                "pattern": pattern,
                "description": pattern.description(),
                "connected": connected,
            },
        })),
    )
}

/// 未匹配任何路由
///
/// `/api` 下的请求也会落到这里，路径取原始 URI。
pub async fn not_found(locale: Locale, OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "Not Found",
            "path": uri.path(),
            "locale": locale,
        })),
    )
}
