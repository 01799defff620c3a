use std::io;

use axum::http::StatusCode;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(&'static str),
}

impl Error {
    /// 错误对应的 HTTP 状态码和对外展示的信息
    ///
    /// 数据库约束冲突会被转换为客户端错误，其余内部错误只记录日志，对外统一返回 500。
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Error::NotFound(s) => (StatusCode::NOT_FOUND, s.to_string()),
            Error::BadRequest(s) => (StatusCode::BAD_REQUEST, s.clone()),
            Error::Conflict(s) => (StatusCode::CONFLICT, s.to_string()),
            Error::Sqlx(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                (StatusCode::CONFLICT, "Slug already exists".to_string())
            }
            Error::Sqlx(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => (
                StatusCode::BAD_REQUEST,
                "Foreign key constraint failed".to_string(),
            ),
            Error::Sqlx(e) => {
                tracing::error!(%e, "sqlx error");
                internal()
            }
            Error::Io(e) => {
                tracing::error!(%e, "io error");
                internal()
            }
            Error::Config(e) => {
                tracing::error!(%e, "config error");
                internal()
            }
        }
    }
}

fn internal() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error".to_string(),
    )
}
