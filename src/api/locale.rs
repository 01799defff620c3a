use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Query},
    http::{header::ACCEPT_LANGUAGE, request::Parts},
};
use serde::Deserialize;

use crate::locale::Locale;

#[derive(Debug, Deserialize)]
struct LocaleParam {
    locale: Option<String>,
}

/// 从查询参数 `locale` 和 `Accept-Language` 请求头中协商语言，不会失败
impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = Query::<LocaleParam>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(p)| p.locale);

        let accept_language = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok());

        Ok(Locale::negotiate(query.as_deref(), accept_language))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn extract(uri: &str, accept: Option<&str>) -> Locale {
        let mut req = Request::get(uri);
        if let Some(accept) = accept {
            req = req.header(ACCEPT_LANGUAGE, accept);
        }
        let (mut parts, _) = req.body(()).unwrap().into_parts();
        Locale::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_query_takes_precedence() {
        assert_eq!(
            extract("/api/articles?locale=zh-TW", Some("ko")).await,
            Locale::ZhTw
        );
        assert_eq!(extract("/api/articles?locale=fr", Some("ko")).await, Locale::Ja);
    }

    #[tokio::test]
    async fn test_header_and_default() {
        assert_eq!(
            extract("/api/articles?page=2", Some("fr;q=0.9, zh-Hant;q=0.8")).await,
            Locale::ZhTw
        );
        assert_eq!(extract("/api/articles", None).await, Locale::Ja);
        assert_eq!(extract("/api/articles?locale=", Some("en-US")).await, Locale::En);
    }
}
