//! 模式一：主表 + 专用翻译表
//!
//! 每个可翻译实体都有自己的翻译表（`article_translations`、`category_translations`），
//! 每个语言一行，语言列使用 Postgres 枚举 `locale`。

use super::{
    ArticleData, ArticlePatch, ArticleQuery, ArticleRepository, ArticleRow, ArticleText,
    CategoryData, CategoryPatch, CategoryRepository, CategoryRow, CategoryText, DBPool,
    NewArticle, NewCategory, Page, PageRequest,
    base::{self, ARTICLE_COLUMNS, CATEGORY_COLUMNS},
};
use crate::{error::Result, locale::Locale};

#[derive(Debug, Clone)]
pub struct DedicatedTables {
    pool: DBPool,
}

/// 主表行与左连接得到的单个语言译文
#[derive(Debug, sqlx::FromRow)]
struct ArticleWithTranslation {
    #[sqlx(flatten)]
    article: ArticleRow,
    t_title: Option<String>,
    t_content: Option<String>,
    t_summary: Option<String>,
}

impl ArticleWithTranslation {
    fn localize(self, locale: Locale) -> ArticleData {
        self.article.localize(
            locale,
            ArticleText {
                title: self.t_title,
                content: self.t_content,
                summary: self.t_summary,
            },
        )
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryWithTranslation {
    #[sqlx(flatten)]
    category: CategoryRow,
    t_name: Option<String>,
    t_description: Option<String>,
}

impl CategoryWithTranslation {
    fn localize(self, locale: Locale) -> CategoryData {
        self.category.localize(
            locale,
            CategoryText {
                name: self.t_name,
                description: self.t_description,
            },
        )
    }
}

impl DedicatedTables {
    pub fn new(pool: DBPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DBPool {
        &self.pool
    }

    fn select_articles<'a>() -> sqlx::QueryBuilder<'a, sqlx::Postgres> {
        sqlx::QueryBuilder::new(format!(
            "SELECT {ARTICLE_COLUMNS}, \
                    t.title AS t_title, t.content AS t_content, t.summary AS t_summary \
             FROM articles a \
             LEFT JOIN article_translations t ON t.article_id = a.id AND t.locale = "
        ))
    }

    fn select_categories<'a>() -> sqlx::QueryBuilder<'a, sqlx::Postgres> {
        sqlx::QueryBuilder::new(format!(
            "SELECT {CATEGORY_COLUMNS}, \
                    t.name AS t_name, t.description AS t_description \
             FROM categories c \
             LEFT JOIN category_translations t ON t.category_id = c.id AND t.locale = "
        ))
    }

    async fn article(&self, id: i32, locale: Locale) -> Result<Option<ArticleData>> {
        let mut builder = Self::select_articles();
        builder.push_bind(locale);
        builder.push(" WHERE a.id = ").push_bind(id);

        let row = builder
            .build_query_as::<ArticleWithTranslation>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.localize(locale)))
    }

    async fn category(&self, id: i32, locale: Locale) -> Result<Option<CategoryData>> {
        let mut builder = Self::select_categories();
        builder.push_bind(locale);
        builder.push(" WHERE c.id = ").push_bind(id);

        let row = builder
            .build_query_as::<CategoryWithTranslation>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.localize(locale)))
    }
}

impl ArticleRepository for DedicatedTables {
    async fn find_many(&self, locale: Locale, query: &ArticleQuery) -> Result<Page<ArticleData>> {
        let mut builder = Self::select_articles();
        builder.push_bind(locale);
        builder.push(" WHERE a.published = TRUE");
        builder.push(query.order_by());
        builder.push(" LIMIT ").push_bind(query.page.limit);
        builder.push(" OFFSET ").push_bind(query.page.offset());

        let (rows, total) = tokio::try_join!(
            builder
                .build_query_as::<ArticleWithTranslation>()
                .fetch_all(&self.pool),
            base::count_published(&self.pool),
        )?;

        let data = rows.into_iter().map(|r| r.localize(locale)).collect();
        Ok(Page::new(data, total, query.page))
    }

    async fn find_by_id(&self, id: i32, locale: Locale) -> Result<Option<ArticleData>> {
        self.article(id, locale).await
    }

    async fn find_by_slug(&self, slug: &str, locale: Locale) -> Result<Option<ArticleData>> {
        let mut builder = Self::select_articles();
        builder.push_bind(locale);
        builder.push(" WHERE a.slug = ").push_bind(slug);

        let row = builder
            .build_query_as::<ArticleWithTranslation>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.localize(locale)))
    }

    async fn create(&self, article: &NewArticle, locale: Locale) -> Result<ArticleData> {
        let row = base::insert_article(&self.pool, article).await?;
        Ok(row.localize(locale, ArticleText::default()))
    }

    async fn update(
        &self,
        id: i32,
        patch: &ArticlePatch,
        locale: Locale,
    ) -> Result<Option<ArticleData>> {
        let mut tx = self.pool.begin().await?;

        if locale.is_base() {
            if !base::update_article(&mut *tx, id, patch).await? {
                return Ok(None);
            }
        } else {
            if !base::update_article(&mut *tx, id, &patch.without_text()).await? {
                return Ok(None);
            }

            let text = patch.text().non_empty();
            if !text.is_empty() {
                sqlx::query(
                    r#"
                    INSERT INTO article_translations (article_id, locale, title, content, summary)
                    VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, ''), $5)
                    ON CONFLICT (article_id, locale) DO UPDATE SET
                        title = COALESCE($3, article_translations.title),
                        content = COALESCE($4, article_translations.content),
                        summary = COALESCE($5, article_translations.summary),
                        updated_at = now()
                    "#,
                )
                .bind(id)
                .bind(locale)
                .bind(&text.title)
                .bind(&text.content)
                .bind(&text.summary)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        self.article(id, locale).await
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        // 译文通过外键级联删除
        Ok(base::delete_article(&self.pool, id).await?)
    }

    async fn increment_view_count(&self, id: i32) -> Result<()> {
        Ok(base::increment_view_count(&self.pool, id).await?)
    }

    async fn remove_translation(&self, id: i32, locale: Locale) -> Result<Option<ArticleData>> {
        sqlx::query("DELETE FROM article_translations WHERE article_id = $1 AND locale = $2")
            .bind(id)
            .bind(locale)
            .execute(&self.pool)
            .await?;
        self.article(id, Locale::BASE).await
    }
}

impl CategoryRepository for DedicatedTables {
    async fn find_many(&self, locale: Locale, page: PageRequest) -> Result<Page<CategoryData>> {
        let mut builder = Self::select_categories();
        builder.push_bind(locale);
        builder.push(" ORDER BY c.display_order ASC, c.id ASC");
        builder.push(" LIMIT ").push_bind(page.limit);
        builder.push(" OFFSET ").push_bind(page.offset());

        let (rows, total) = tokio::try_join!(
            builder
                .build_query_as::<CategoryWithTranslation>()
                .fetch_all(&self.pool),
            base::count_categories(&self.pool),
        )?;

        let data = rows.into_iter().map(|r| r.localize(locale)).collect();
        Ok(Page::new(data, total, page))
    }

    async fn find_by_id(&self, id: i32, locale: Locale) -> Result<Option<CategoryData>> {
        self.category(id, locale).await
    }

    async fn find_by_slug(&self, slug: &str, locale: Locale) -> Result<Option<CategoryData>> {
        let mut builder = Self::select_categories();
        builder.push_bind(locale);
        builder.push(" WHERE c.slug = ").push_bind(slug);

        let row = builder
            .build_query_as::<CategoryWithTranslation>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.localize(locale)))
    }

    async fn create(&self, category: &NewCategory, locale: Locale) -> Result<CategoryData> {
        let row = base::insert_category(&self.pool, category).await?;
        Ok(row.localize(locale, CategoryText::default()))
    }

    async fn update(
        &self,
        id: i32,
        patch: &CategoryPatch,
        locale: Locale,
    ) -> Result<Option<CategoryData>> {
        let mut tx = self.pool.begin().await?;

        if locale.is_base() {
            if !base::update_category(&mut *tx, id, patch).await? {
                return Ok(None);
            }
        } else {
            if !base::update_category(&mut *tx, id, &patch.without_text()).await? {
                return Ok(None);
            }

            let text = patch.text().non_empty();
            if !text.is_empty() {
                sqlx::query(
                    r#"
                    INSERT INTO category_translations (category_id, locale, name, description)
                    VALUES ($1, $2, COALESCE($3, ''), $4)
                    ON CONFLICT (category_id, locale) DO UPDATE SET
                        name = COALESCE($3, category_translations.name),
                        description = COALESCE($4, category_translations.description),
                        updated_at = now()
                    "#,
                )
                .bind(id)
                .bind(locale)
                .bind(&text.name)
                .bind(&text.description)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        self.category(id, locale).await
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        Ok(base::delete_category(&self.pool, id).await?)
    }

    async fn remove_translation(&self, id: i32, locale: Locale) -> Result<Option<CategoryData>> {
        sqlx::query("DELETE FROM category_translations WHERE category_id = $1 AND locale = $2")
            .bind(id)
            .bind(locale)
            .execute(&self.pool)
            .await?;
        self.category(id, Locale::BASE).await
    }
}
