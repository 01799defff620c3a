mod articles;
mod categories;
mod locale;
mod params;
mod response;
mod system;

use std::io;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::instrument;

pub use self::response::{ApiError, ApiResult, Envelope, Localized, Message};
use crate::{
    config::Config,
    error::{Error, Result},
    state::AppState,
};

/// 端口被占用时最多向后尝试的次数
const PORT_ATTEMPTS: u16 = 20;

/// 设置应用的路由。
///
/// `/health` 位于根路径，其余接口挂在 `/api` 下，未匹配的请求返回 404。
pub fn setup_route(app: AppState) -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest(
            "/api",
            articles::setup_route()
                .merge(categories::setup_route())
                .merge(system::setup_route()),
        )
        .fallback(system::not_found)
        .with_state(app)
}

/// 启动 HTTP 服务，自动设置路由和中间件。
///
/// 1. 生成路由
/// 2. 添加日志、追踪和跨域中间件
/// 3. 从配置的端口开始寻找可用端口并监听
/// 4. 收到退出信号后停止接收请求并关闭连接池
#[instrument(name = "http server", skip_all)]
pub async fn run_server(app: AppState, config: &Config) -> Result<()> {
    let pool = app.pool().clone();
    let router = add_middlewares(setup_route(app), &config.cors_origins);

    let listener = bind(config.port).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        pattern = %config.pattern,
        description = config.pattern.description(),
        "listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("server stopped");
    Ok(())
}

/// 依次尝试 `port` 到 `port + 20`，返回第一个可用的监听器
async fn bind(port: u16) -> Result<TcpListener> {
    let mut last_error = None;

    for candidate in port..=port.saturating_add(PORT_ATTEMPTS) {
        match TcpListener::bind(("0.0.0.0", candidate)).await {
            Ok(listener) => {
                if candidate != port {
                    tracing::warn!(port, candidate, "port in use, using next free port");
                }
                return Ok(listener);
            }
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => last_error = Some(e),
            Err(e) => return Err(e.into()),
        }
    }

    Err(match last_error {
        Some(e) => Error::Io(e),
        None => Error::Config(format!("No free port from {port}")),
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(%e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(%e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

/// 为路由添加中间件，包括请求追踪、失败日志记录和跨域。
///
/// 日志记录会在请求失败时输出错误信息。
pub fn add_middlewares(router: Router, origins: &[String]) -> Router {
    fn log_failure(
        err: tower_http::classify::ServerErrorsFailureClass,
        _latency: std::time::Duration,
        _span: &tracing::Span,
    ) {
        tracing::error!(error = %err, "request failed");
    }

    router.layer(cors(origins)).layer(
        TraceLayer::new_for_http()
            .on_failure(log_failure)
            .on_request(|_req: &_, _span: &tracing::Span| {
                // 空实现，关闭请求日志
            }),
    )
}

fn cors(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT_LANGUAGE])
        .allow_credentials(true)
}
