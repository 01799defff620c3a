use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

/// 数据库连接池类型
pub type DBPool = sqlx::PgPool;

/// 根据连接 URL 创建新的数据库连接池
///
/// 连接池配置：
///
/// - 最大空闲时间 60 秒
/// - 最大生存时间 1500 秒（约 25 分钟）
/// - 最大连接数 10
/// - 获取连接超时 2 秒
/// - 获取前测试连接
/// - 最小连接数 2
pub async fn new_db_poll(conn_url: &str) -> Result<DBPool, sqlx::Error> {
    pool_options().connect(conn_url).await
}

/// 创建不立即建立连接的连接池，首次使用时才会连接
pub fn lazy_db_poll(conn_url: &str) -> Result<DBPool, sqlx::Error> {
    pool_options().connect_lazy(conn_url)
}

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .idle_timeout(Duration::from_secs(60))
        .max_lifetime(Duration::from_secs(1500))
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(2))
        .test_before_acquire(true)
        .min_connections(2)
}

/// 执行一段 SQL 脚本
///
/// 按 `;` 分割，每条 SQL 单独执行，脚本中的注释不能包含 `;`
pub async fn migrate(db: &DBPool, script: &str) -> Result<(), sqlx::Error> {
    for sql in script.split(';') {
        if sql.trim().is_empty() {
            continue;
        }
        sqlx::query(sql).execute(db).await?;
    }
    Ok(())
}

/// 连通性检查
pub async fn ping(db: &DBPool) -> bool {
    sqlx::query("SELECT 1").execute(db).await.is_ok()
}
