pub mod api;
pub mod config;
pub mod error;
pub mod locale;
pub mod seed;
pub mod service;
pub mod state;
pub mod storage;

use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

use config::Config;
use error::Result;
use state::AppState;

/// 日志过滤规则的环境变量，未设置时为 `info`
const LOG_ENV: &str = "POLYGLOT_LOG";

/// 初始化日志
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_env_filter(filter)
        .init();
}

/// 读取配置，连接数据库并启动 HTTP 服务
pub async fn run() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;
    tracing::info!(
        pattern = %config.pattern,
        description = config.pattern.description(),
        "starting"
    );

    let pool = storage::new_db_poll(&config.database_url).await?;
    let app = AppState::new(config.pattern, pool);

    api::run_server(app, &config).await
}
