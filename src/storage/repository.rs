use std::future::Future;

use super::{
    ArticleData, ArticlePatch, ArticleQuery, CategoryData, CategoryPatch, DBPool, DedicatedTables,
    JsonColumns, NewArticle, NewCategory, Page, PageRequest, UnifiedTable,
};
use crate::{config::TranslationPattern, error::Result, locale::Locale};

/// 文章的数据访问接口
///
/// 三种翻译存储模式各自实现，读取时都按 [`Locale`] 合并译文并回退到基础语言。
pub trait ArticleRepository: Send + Sync {
    /// 分页查询已发布的文章
    fn find_many(
        &self,
        locale: Locale,
        query: &ArticleQuery,
    ) -> impl Future<Output = Result<Page<ArticleData>>> + Send;

    fn find_by_id(
        &self,
        id: i32,
        locale: Locale,
    ) -> impl Future<Output = Result<Option<ArticleData>>> + Send;

    fn find_by_slug(
        &self,
        slug: &str,
        locale: Locale,
    ) -> impl Future<Output = Result<Option<ArticleData>>> + Send;

    /// 新建文章，只写入主表
    fn create(
        &self,
        article: &NewArticle,
        locale: Locale,
    ) -> impl Future<Output = Result<ArticleData>> + Send;

    /// 更新文章
    ///
    /// 基础语言下全部字段写入主表；其他语言下可翻译字段写入该语言的译文，
    /// 其余字段仍写入主表。文章不存在时返回 `None`。
    fn update(
        &self,
        id: i32,
        patch: &ArticlePatch,
        locale: Locale,
    ) -> impl Future<Output = Result<Option<ArticleData>>> + Send;

    /// 删除文章及其全部译文，返回文章是否存在
    fn delete(&self, id: i32) -> impl Future<Output = Result<bool>> + Send;

    fn increment_view_count(&self, id: i32) -> impl Future<Output = Result<()>> + Send;

    /// 删除某个语言的全部译文，返回基础语言下的文章
    fn remove_translation(
        &self,
        id: i32,
        locale: Locale,
    ) -> impl Future<Output = Result<Option<ArticleData>>> + Send;
}

/// 分类的数据访问接口，语义同 [`ArticleRepository`]
pub trait CategoryRepository: Send + Sync {
    /// 按 `display_order` 分页查询分类
    fn find_many(
        &self,
        locale: Locale,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<CategoryData>>> + Send;

    fn find_by_id(
        &self,
        id: i32,
        locale: Locale,
    ) -> impl Future<Output = Result<Option<CategoryData>>> + Send;

    fn find_by_slug(
        &self,
        slug: &str,
        locale: Locale,
    ) -> impl Future<Output = Result<Option<CategoryData>>> + Send;

    fn create(
        &self,
        category: &NewCategory,
        locale: Locale,
    ) -> impl Future<Output = Result<CategoryData>> + Send;

    fn update(
        &self,
        id: i32,
        patch: &CategoryPatch,
        locale: Locale,
    ) -> impl Future<Output = Result<Option<CategoryData>>> + Send;

    fn delete(&self, id: i32) -> impl Future<Output = Result<bool>> + Send;

    fn remove_translation(
        &self,
        id: i32,
        locale: Locale,
    ) -> impl Future<Output = Result<Option<CategoryData>>> + Send;
}

/// 按配置选择的仓储实现
#[derive(Debug, Clone)]
pub enum Repository {
    Dedicated(DedicatedTables),
    Unified(UnifiedTable),
    JsonColumns(JsonColumns),
}

impl Repository {
    pub fn new(pattern: TranslationPattern, pool: DBPool) -> Self {
        match pattern {
            TranslationPattern::Dedicated => Repository::Dedicated(DedicatedTables::new(pool)),
            TranslationPattern::Unified => Repository::Unified(UnifiedTable::new(pool)),
            TranslationPattern::JsonColumns => Repository::JsonColumns(JsonColumns::new(pool)),
        }
    }

    pub fn pattern(&self) -> TranslationPattern {
        match self {
            Repository::Dedicated(_) => TranslationPattern::Dedicated,
            Repository::Unified(_) => TranslationPattern::Unified,
            Repository::JsonColumns(_) => TranslationPattern::JsonColumns,
        }
    }

    /// 获取连接池
    pub fn pool(&self) -> &DBPool {
        match self {
            Repository::Dedicated(r) => r.pool(),
            Repository::Unified(r) => r.pool(),
            Repository::JsonColumns(r) => r.pool(),
        }
    }
}

/// 将调用分派到当前模式的实现
macro_rules! dispatch {
    ($self:ident, $trait:ident :: $method:ident ( $($arg:expr),* )) => {
        match $self {
            Repository::Dedicated(r) => $trait::$method(r, $($arg),*).await,
            Repository::Unified(r) => $trait::$method(r, $($arg),*).await,
            Repository::JsonColumns(r) => $trait::$method(r, $($arg),*).await,
        }
    };
}

impl ArticleRepository for Repository {
    async fn find_many(&self, locale: Locale, query: &ArticleQuery) -> Result<Page<ArticleData>> {
        dispatch!(self, ArticleRepository::find_many(locale, query))
    }

    async fn find_by_id(&self, id: i32, locale: Locale) -> Result<Option<ArticleData>> {
        dispatch!(self, ArticleRepository::find_by_id(id, locale))
    }

    async fn find_by_slug(&self, slug: &str, locale: Locale) -> Result<Option<ArticleData>> {
        dispatch!(self, ArticleRepository::find_by_slug(slug, locale))
    }

    async fn create(&self, article: &NewArticle, locale: Locale) -> Result<ArticleData> {
        dispatch!(self, ArticleRepository::create(article, locale))
    }

    async fn update(
        &self,
        id: i32,
        patch: &ArticlePatch,
        locale: Locale,
    ) -> Result<Option<ArticleData>> {
        dispatch!(self, ArticleRepository::update(id, patch, locale))
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        dispatch!(self, ArticleRepository::delete(id))
    }

    async fn increment_view_count(&self, id: i32) -> Result<()> {
        dispatch!(self, ArticleRepository::increment_view_count(id))
    }

    async fn remove_translation(&self, id: i32, locale: Locale) -> Result<Option<ArticleData>> {
        dispatch!(self, ArticleRepository::remove_translation(id, locale))
    }
}

impl CategoryRepository for Repository {
    async fn find_many(&self, locale: Locale, page: PageRequest) -> Result<Page<CategoryData>> {
        dispatch!(self, CategoryRepository::find_many(locale, page))
    }

    async fn find_by_id(&self, id: i32, locale: Locale) -> Result<Option<CategoryData>> {
        dispatch!(self, CategoryRepository::find_by_id(id, locale))
    }

    async fn find_by_slug(&self, slug: &str, locale: Locale) -> Result<Option<CategoryData>> {
        dispatch!(self, CategoryRepository::find_by_slug(slug, locale))
    }

    async fn create(&self, category: &NewCategory, locale: Locale) -> Result<CategoryData> {
        dispatch!(self, CategoryRepository::create(category, locale))
    }

    async fn update(
        &self,
        id: i32,
        patch: &CategoryPatch,
        locale: Locale,
    ) -> Result<Option<CategoryData>> {
        dispatch!(self, CategoryRepository::update(id, patch, locale))
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        dispatch!(self, CategoryRepository::delete(id))
    }

    async fn remove_translation(&self, id: i32, locale: Locale) -> Result<Option<CategoryData>> {
        dispatch!(self, CategoryRepository::remove_translation(id, locale))
    }
}
