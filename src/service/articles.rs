use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::slug;
use crate::{
    error::{Error, Result},
    locale::Locale,
    storage::{
        ArticleData, ArticlePatch, ArticleQuery, ArticleRepository, NewArticle, Page, PageRequest,
        SortField, SortOrder,
    },
};

/// 搜索时最多取出的文章数
const SEARCH_WINDOW: i64 = 1000;
const DEFAULT_POPULAR_LIMIT: i64 = 5;

/// 新建文章的请求体，字段在 [`ArticleService::create`] 中校验
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArticleInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub slug: Option<String>,
    pub category_id: Option<i32>,
    pub published: Option<bool>,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: Option<i32>,
}

impl ArticleInput {
    fn validate(self) -> Result<NewArticle> {
        let title = self.title.filter(|t| !t.trim().is_empty());
        let content = self.content.filter(|c| !c.trim().is_empty());
        let (Some(title), Some(content)) = (title, content) else {
            return Err(Error::BadRequest("Title and content are required".into()));
        };
        let category_id = self
            .category_id
            .ok_or_else(|| Error::BadRequest("categoryId is required".into()))?;

        let slug = match self.slug.filter(|s| !s.trim().is_empty()) {
            Some(s) => s.trim().to_string(),
            None => slug::slugify(&title, "article"),
        };

        Ok(NewArticle {
            title,
            content,
            summary: self.summary,
            slug,
            category_id,
            published: self.published.unwrap_or(false),
            published_at: self.published_at,
            view_count: self.view_count.unwrap_or(0),
        })
    }
}

/// 文章业务逻辑
#[derive(Debug, Clone)]
pub struct ArticleService<R> {
    repo: R,
}

impl<R: ArticleRepository> ArticleService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn list(&self, locale: Locale, query: &ArticleQuery) -> Result<Page<ArticleData>> {
        self.repo.find_many(locale, query).await
    }

    /// 获取文章并增加浏览量，返回的是增加前的数据
    pub async fn get_by_id(&self, id: i32, locale: Locale) -> Result<ArticleData> {
        let article = self
            .repo
            .find_by_id(id, locale)
            .await?
            .ok_or(Error::NotFound("Article not found"))?;

        self.repo.increment_view_count(id).await?;
        Ok(article)
    }

    pub async fn get_by_slug(&self, slug: &str, locale: Locale) -> Result<ArticleData> {
        self.repo
            .find_by_slug(slug, locale)
            .await?
            .ok_or(Error::NotFound("Article not found"))
    }

    /// 新建文章
    ///
    /// 未提供 slug 时由标题生成，已被占用时追加时间戳后缀。
    pub async fn create(&self, input: ArticleInput, locale: Locale) -> Result<ArticleData> {
        let mut article = input.validate()?;

        if self
            .repo
            .find_by_slug(&article.slug, Locale::BASE)
            .await?
            .is_some()
        {
            article.slug = slug::with_timestamp(&article.slug);
        }

        let created = self.repo.create(&article, locale).await?;
        tracing::debug!(id = created.id, slug = %created.slug, "article created");
        Ok(created)
    }

    pub async fn update(
        &self,
        id: i32,
        mut patch: ArticlePatch,
        locale: Locale,
    ) -> Result<ArticleData> {
        let existing = self
            .repo
            .find_by_id(id, Locale::BASE)
            .await?
            .ok_or(Error::NotFound("Article not found"))?;

        patch.slug = patch
            .slug
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        if let Some(slug) = patch.slug.as_deref().filter(|s| *s != existing.slug) {
            let taken = self.repo.find_by_slug(slug, Locale::BASE).await?;
            if taken.is_some_and(|a| a.id != id) {
                return Err(Error::Conflict("Slug already exists"));
            }
        }

        self.repo
            .update(id, &patch, locale)
            .await?
            .ok_or(Error::NotFound("Article not found"))
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        if !self.repo.delete(id).await? {
            return Err(Error::NotFound("Article not found"));
        }
        tracing::debug!(id, "article deleted");
        Ok(())
    }

    /// 删除一个语言的译文，返回基础语言下的文章
    pub async fn remove_translation(&self, id: i32, locale: Locale) -> Result<ArticleData> {
        if locale.is_base() {
            return Err(Error::BadRequest(format!(
                "Cannot remove base locale ({locale}) content"
            )));
        }

        self.repo
            .remove_translation(id, locale)
            .await?
            .ok_or(Error::NotFound("Article not found"))
    }

    /// 浏览量最高的已发布文章，缺失或非正的条数取 5
    pub async fn popular(&self, locale: Locale, limit: Option<i64>) -> Result<Vec<ArticleData>> {
        let limit = limit.filter(|l| *l >= 1).unwrap_or(DEFAULT_POPULAR_LIMIT);
        let query = ArticleQuery {
            page: PageRequest::new(Some(1), Some(limit)),
            sort: SortField::ViewCount,
            order: SortOrder::Desc,
        };
        Ok(self.repo.find_many(locale, &query).await?.data)
    }

    /// 在本地化后的标题、正文和摘要中搜索，大小写不敏感
    ///
    /// 只搜索最新的 [`SEARCH_WINDOW`] 篇已发布文章，结果在内存中分页。
    pub async fn search(
        &self,
        q: &str,
        locale: Locale,
        page: PageRequest,
    ) -> Result<Page<ArticleData>> {
        let needle = q.trim().to_lowercase();
        if needle.is_empty() {
            return Err(Error::BadRequest("Search query is required".into()));
        }

        let window = ArticleQuery {
            page: PageRequest {
                page: 1,
                limit: SEARCH_WINDOW,
            },
            sort: SortField::CreatedAt,
            order: SortOrder::Desc,
        };
        let all = self.repo.find_many(locale, &window).await?.data;

        let matched = all
            .into_iter()
            .filter(|a| {
                a.title.to_lowercase().contains(&needle)
                    || a.content.to_lowercase().contains(&needle)
                    || a
                        .summary
                        .as_deref()
                        .is_some_and(|s| s.to_lowercase().contains(&needle))
            })
            .collect();

        Ok(Page::slice(matched, page))
    }
}
