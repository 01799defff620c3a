use axum::extract::FromRef;

use crate::{
    config::TranslationPattern,
    service::{ArticleService, CategoryService},
    storage::{DBPool, Repository},
};

/// 应用程序上下文
///
/// [`AppState`] 持有按翻译模式选择好的仓储，处理函数通过它获取业务服务。
#[derive(Debug, Clone, FromRef)]
pub struct AppState {
    repo: Repository,
}

impl AppState {
    pub fn new(pattern: TranslationPattern, pool: DBPool) -> Self {
        Self {
            repo: Repository::new(pattern, pool),
        }
    }

    /// 当前使用的翻译模式
    pub fn pattern(&self) -> TranslationPattern {
        self.repo.pattern()
    }

    /// 获取连接池
    pub fn pool(&self) -> &DBPool {
        self.repo.pool()
    }

    pub fn articles(&self) -> ArticleService<Repository> {
        ArticleService::new(self.repo.clone())
    }

    pub fn categories(&self) -> CategoryService<Repository> {
        CategoryService::new(self.repo.clone())
    }
}
