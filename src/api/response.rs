use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    error::{Error, Result},
    locale::Locale,
    storage::{Page, Pagination},
};

/// 成功响应
///
/// `{ success: true, data, pagination?, query?, locale }`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<String>,
    locale: Locale,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(data: T, locale: Locale) -> Self {
        Self {
            success: true,
            data,
            pagination: None,
            query: None,
            locale,
        }
    }

    /// 回显搜索关键字
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

impl<T: Serialize> Envelope<Vec<T>> {
    pub fn page(page: Page<T>, locale: Locale) -> Self {
        let pagination = page.pagination();
        Self {
            pagination: Some(pagination),
            ..Self::new(page.data, locale)
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// 只有提示信息的成功响应，用于删除
#[derive(Debug, Serialize)]
pub struct Message {
    success: bool,
    message: &'static str,
    locale: Locale,
}

impl Message {
    pub fn new(message: &'static str, locale: Locale) -> Self {
        Self {
            success: true,
            message,
            locale,
        }
    }
}

impl IntoResponse for Message {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// 携带请求语言的错误，渲染为 `{ success: false, error, locale }`
#[derive(Debug)]
pub struct ApiError {
    error: Error,
    locale: Locale,
}

pub type ApiResult<T> = core::result::Result<T, ApiError>;

impl ApiError {
    pub fn new(error: Error, locale: Locale) -> Self {
        Self { error, locale }
    }

    pub fn bad_request(message: impl Into<String>, locale: Locale) -> Self {
        Self::new(Error::BadRequest(message.into()), locale)
    }
}

#[derive(Serialize)]
struct Failure {
    success: bool,
    error: String,
    locale: Locale,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.error.status_and_message();
        (
            status,
            Json(Failure {
                success: false,
                error,
                locale: self.locale,
            }),
        )
            .into_response()
    }
}

/// 为业务结果附加请求语言
pub trait Localized<T> {
    fn localized(self, locale: Locale) -> ApiResult<T>;
}

impl<T> Localized<T> for Result<T> {
    fn localized(self, locale: Locale) -> ApiResult<T> {
        self.map_err(|e| ApiError::new(e, locale))
    }
}
