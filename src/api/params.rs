//! 请求参数的解析，失败时统一转换为带语言的 400 响应

use axum::{Json, extract::rejection::JsonRejection};
use axum_extra::extract::{Query, QueryRejection};

use super::response::{ApiError, ApiResult};
use crate::locale::Locale;

/// 解析路径中的 ID，`what` 用于错误信息
pub fn parse_id(raw: &str, what: &str, locale: Locale) -> ApiResult<i32> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid {what} ID"), locale))
}

/// 解析路径中的语言，只接受支持的语言
pub fn parse_locale(raw: &str, locale: Locale) -> ApiResult<Locale> {
    Locale::parse(raw)
        .ok_or_else(|| ApiError::bad_request(format!("Unsupported locale: {raw}"), locale))
}

/// 查询参数
pub fn query<T>(
    params: Result<Query<T>, QueryRejection>,
    locale: Locale,
) -> ApiResult<T> {
    params
        .map(|Query(p)| p)
        .map_err(|e| ApiError::bad_request(e.to_string(), locale))
}

/// JSON 请求体
pub fn body<T>(body: Result<Json<T>, JsonRejection>, locale: Locale) -> ApiResult<T> {
    body.map(|Json(b)| b)
        .map_err(|e| ApiError::bad_request(e.body_text(), locale))
}
