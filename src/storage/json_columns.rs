//! 模式三：JSON 列
//!
//! 译文以 `{语言: 文本}` 的 JSONB 对象存放在主表的 `*_translations` 列中。
//! 写入时使用 `||` 与 `-` 运算符在单条语句中修改，无需先读后写。

use std::collections::HashMap;

use sqlx::{PgExecutor, types::Json};

use super::{
    ArticleData, ArticlePatch, ArticleQuery, ArticleRepository, ArticleRow, ArticleText,
    CategoryData, CategoryPatch, CategoryRepository, CategoryRow, CategoryText, DBPool,
    NewArticle, NewCategory, Page, PageRequest,
    base::{self, ARTICLE_COLUMNS, CATEGORY_COLUMNS},
};
use crate::{error::Result, locale::Locale};

/// 语言标签到译文的映射
pub type TranslationMap = HashMap<String, String>;

#[derive(Debug, Clone)]
pub struct JsonColumns {
    pool: DBPool,
}

#[derive(Debug, sqlx::FromRow)]
struct ArticleWithMaps {
    #[sqlx(flatten)]
    article: ArticleRow,
    title_translations: Json<TranslationMap>,
    content_translations: Json<TranslationMap>,
    summary_translations: Json<TranslationMap>,
}

impl ArticleWithMaps {
    fn localize(self, locale: Locale) -> ArticleData {
        let key = locale.as_str();
        let Json(mut title) = self.title_translations;
        let Json(mut content) = self.content_translations;
        let Json(mut summary) = self.summary_translations;
        self.article.localize(
            locale,
            ArticleText {
                title: title.remove(key),
                content: content.remove(key),
                summary: summary.remove(key),
            },
        )
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryWithMaps {
    #[sqlx(flatten)]
    category: CategoryRow,
    name_translations: Json<TranslationMap>,
    description_translations: Json<TranslationMap>,
}

impl CategoryWithMaps {
    fn localize(self, locale: Locale) -> CategoryData {
        let key = locale.as_str();
        let Json(mut name) = self.name_translations;
        let Json(mut description) = self.description_translations;
        self.category.localize(
            locale,
            CategoryText {
                name: name.remove(key),
                description: description.remove(key),
            },
        )
    }
}

/// 将一个语言的译文合并进文章的 JSON 列，`None` 的字段保持不变
pub async fn merge_article_translation<'e>(
    executor: impl PgExecutor<'e>,
    id: i32,
    locale: Locale,
    text: &ArticleText,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE articles SET
            title_translations = CASE WHEN $3::text IS NULL THEN title_translations
                ELSE title_translations || jsonb_build_object($2::text, $3::text) END,
            content_translations = CASE WHEN $4::text IS NULL THEN content_translations
                ELSE content_translations || jsonb_build_object($2::text, $4::text) END,
            summary_translations = CASE WHEN $5::text IS NULL THEN summary_translations
                ELSE summary_translations || jsonb_build_object($2::text, $5::text) END,
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(locale.as_str())
    .bind(&text.title)
    .bind(&text.content)
    .bind(&text.summary)
    .execute(executor)
    .await?;
    Ok(())
}

/// 将一个语言的译文合并进分类的 JSON 列
pub async fn merge_category_translation<'e>(
    executor: impl PgExecutor<'e>,
    id: i32,
    locale: Locale,
    text: &CategoryText,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE categories SET
            name_translations = CASE WHEN $3::text IS NULL THEN name_translations
                ELSE name_translations || jsonb_build_object($2::text, $3::text) END,
            description_translations = CASE WHEN $4::text IS NULL THEN description_translations
                ELSE description_translations || jsonb_build_object($2::text, $4::text) END,
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(locale.as_str())
    .bind(&text.name)
    .bind(&text.description)
    .execute(executor)
    .await?;
    Ok(())
}

impl JsonColumns {
    pub fn new(pool: DBPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DBPool {
        &self.pool
    }

    fn select_articles<'a>() -> sqlx::QueryBuilder<'a, sqlx::Postgres> {
        sqlx::QueryBuilder::new(format!(
            "SELECT {ARTICLE_COLUMNS}, \
                    a.title_translations, a.content_translations, a.summary_translations \
             FROM articles a"
        ))
    }

    fn select_categories<'a>() -> sqlx::QueryBuilder<'a, sqlx::Postgres> {
        sqlx::QueryBuilder::new(format!(
            "SELECT {CATEGORY_COLUMNS}, \
                    c.name_translations, c.description_translations \
             FROM categories c"
        ))
    }

    async fn article(&self, id: i32, locale: Locale) -> Result<Option<ArticleData>> {
        let mut builder = Self::select_articles();
        builder.push(" WHERE a.id = ").push_bind(id);

        let row = builder
            .build_query_as::<ArticleWithMaps>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.localize(locale)))
    }

    async fn category(&self, id: i32, locale: Locale) -> Result<Option<CategoryData>> {
        let mut builder = Self::select_categories();
        builder.push(" WHERE c.id = ").push_bind(id);

        let row = builder
            .build_query_as::<CategoryWithMaps>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.localize(locale)))
    }
}

impl ArticleRepository for JsonColumns {
    async fn find_many(&self, locale: Locale, query: &ArticleQuery) -> Result<Page<ArticleData>> {
        let mut builder = Self::select_articles();
        builder.push(" WHERE a.published = TRUE");
        builder.push(query.order_by());
        builder.push(" LIMIT ").push_bind(query.page.limit);
        builder.push(" OFFSET ").push_bind(query.page.offset());

        let (rows, total) = tokio::try_join!(
            builder
                .build_query_as::<ArticleWithMaps>()
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
        builder.push(" WHERE a.slug = ").push_bind(slug);

        let row = builder
            .build_query_as::<ArticleWithMaps>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.localize(locale)))
    }

    async fn create(&self, article: &NewArticle, locale: Locale) -> Result<ArticleData> {
        // JSON 列默认为 '{}'
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
                merge_article_translation(&mut *tx, id, locale, &text).await?;
            }
        }

        tx.commit().await?;
        self.article(id, locale).await
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        Ok(base::delete_article(&self.pool, id).await?)
    }

    async fn increment_view_count(&self, id: i32) -> Result<()> {
        Ok(base::increment_view_count(&self.pool, id).await?)
    }

    async fn remove_translation(&self, id: i32, locale: Locale) -> Result<Option<ArticleData>> {
        sqlx::query(
            r#"
            UPDATE articles SET
                title_translations = title_translations - $2::text,
                content_translations = content_translations - $2::text,
                summary_translations = summary_translations - $2::text,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(locale.as_str())
        .execute(&self.pool)
        .await?;
        self.article(id, Locale::BASE).await
    }
}

impl CategoryRepository for JsonColumns {
    async fn find_many(&self, locale: Locale, page: PageRequest) -> Result<Page<CategoryData>> {
        let mut builder = Self::select_categories();
        builder.push(" ORDER BY c.display_order ASC, c.id ASC");
        builder.push(" LIMIT ").push_bind(page.limit);
        builder.push(" OFFSET ").push_bind(page.offset());

        let (rows, total) = tokio::try_join!(
            builder
                .build_query_as::<CategoryWithMaps>()
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
        builder.push(" WHERE c.slug = ").push_bind(slug);

        let row = builder
            .build_query_as::<CategoryWithMaps>()
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
                merge_category_translation(&mut *tx, id, locale, &text).await?;
            }
        }

        tx.commit().await?;
        self.category(id, locale).await
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        Ok(base::delete_category(&self.pool, id).await?)
    }

    async fn remove_translation(&self, id: i32, locale: Locale) -> Result<Option<CategoryData>> {
        sqlx::query(
            r#"
            UPDATE categories SET
                name_translations = name_translations - $2::text,
                description_translations = description_translations - $2::text,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(locale.as_str())
        .execute(&self.pool)
        .await?;
        self.category(id, Locale::BASE).await
    }
}
