//! 模式二：统一翻译表
//!
//! 所有实体的译文都放在 `translations` 表中，
//! 以 `(entity_type, entity_id, locale, field_name)` 定位一个字段的译文。

use std::collections::HashMap;

use sqlx::{PgConnection, types::Json};

use super::{
    ArticleData, ArticlePatch, ArticleQuery, ArticleRepository, ArticleRow, ArticleText,
    CategoryData, CategoryPatch, CategoryRepository, CategoryRow, CategoryText, DBPool,
    NewArticle, NewCategory, Page, PageRequest,
    base::{self, ARTICLE_COLUMNS, CATEGORY_COLUMNS},
};
use crate::{error::Result, locale::Locale};

/// `translations.entity_type` 的取值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Article,
    Category,
}

impl EntityType {
    pub const fn as_str(self) -> &'static str {
        match self {
            EntityType::Article => "ARTICLE",
            EntityType::Category => "CATEGORY",
        }
    }
}

/// 字段名到译文的映射
type Fields = Json<HashMap<String, String>>;

#[derive(Debug, Clone)]
pub struct UnifiedTable {
    pool: DBPool,
}

#[derive(Debug, sqlx::FromRow)]
struct ArticleWithFields {
    #[sqlx(flatten)]
    article: ArticleRow,
    fields: Fields,
}

impl ArticleWithFields {
    fn localize(self, locale: Locale) -> ArticleData {
        let Json(mut fields) = self.fields;
        self.article.localize(
            locale,
            ArticleText {
                title: fields.remove("title"),
                content: fields.remove("content"),
                summary: fields.remove("summary"),
            },
        )
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryWithFields {
    #[sqlx(flatten)]
    category: CategoryRow,
    fields: Fields,
}

impl CategoryWithFields {
    fn localize(self, locale: Locale) -> CategoryData {
        let Json(mut fields) = self.fields;
        self.category.localize(
            locale,
            CategoryText {
                name: fields.remove("name"),
                description: fields.remove("description"),
            },
        )
    }
}

/// 写入单个字段的译文，已存在则覆盖
pub async fn upsert_field(
    conn: &mut PgConnection,
    entity: EntityType,
    entity_id: i32,
    locale: Locale,
    field_name: &str,
    field_value: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO translations (entity_type, entity_id, locale, field_name, field_value)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (entity_type, entity_id, locale, field_name) DO UPDATE SET
            field_value = EXCLUDED.field_value,
            updated_at = now()
        "#,
    )
    .bind(entity.as_str())
    .bind(entity_id)
    .bind(locale.as_str())
    .bind(field_name)
    .bind(field_value)
    .execute(conn)
    .await?;
    Ok(())
}

async fn delete_fields(
    conn: &mut PgConnection,
    entity: EntityType,
    entity_id: i32,
    locale: Option<Locale>,
) -> Result<()> {
    let mut builder = sqlx::QueryBuilder::new("DELETE FROM translations WHERE entity_type = ");
    builder.push_bind(entity.as_str());
    builder.push(" AND entity_id = ").push_bind(entity_id);
    if let Some(locale) = locale {
        builder.push(" AND locale = ").push_bind(locale.as_str());
    }
    builder.build().execute(conn).await?;
    Ok(())
}

impl UnifiedTable {
    pub fn new(pool: DBPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DBPool {
        &self.pool
    }

    /// 以子查询把一个语言的全部字段聚合成 JSON 对象，随主表一次查出
    fn select_articles<'a>(locale: Locale) -> sqlx::QueryBuilder<'a, sqlx::Postgres> {
        let mut builder = sqlx::QueryBuilder::new(format!(
            "SELECT {ARTICLE_COLUMNS}, \
                    COALESCE((SELECT jsonb_object_agg(t.field_name, t.field_value) \
                              FROM translations t \
                              WHERE t.entity_type = 'ARTICLE' AND t.entity_id = a.id \
                              AND t.locale = "
        ));
        builder.push_bind(locale.as_str());
        builder.push("), '{}'::jsonb) AS fields FROM articles a");
        builder
    }

    fn select_categories<'a>(locale: Locale) -> sqlx::QueryBuilder<'a, sqlx::Postgres> {
        let mut builder = sqlx::QueryBuilder::new(format!(
            "SELECT {CATEGORY_COLUMNS}, \
                    COALESCE((SELECT jsonb_object_agg(t.field_name, t.field_value) \
                              FROM translations t \
                              WHERE t.entity_type = 'CATEGORY' AND t.entity_id = c.id \
                              AND t.locale = "
        ));
        builder.push_bind(locale.as_str());
        builder.push("), '{}'::jsonb) AS fields FROM categories c");
        builder
    }

    async fn article(&self, id: i32, locale: Locale) -> Result<Option<ArticleData>> {
        let mut builder = Self::select_articles(locale);
        builder.push(" WHERE a.id = ").push_bind(id);

        let row = builder
            .build_query_as::<ArticleWithFields>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.localize(locale)))
    }

    async fn category(&self, id: i32, locale: Locale) -> Result<Option<CategoryData>> {
        let mut builder = Self::select_categories(locale);
        builder.push(" WHERE c.id = ").push_bind(id);

        let row = builder
            .build_query_as::<CategoryWithFields>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.localize(locale)))
    }
}

impl ArticleRepository for UnifiedTable {
    async fn find_many(&self, locale: Locale, query: &ArticleQuery) -> Result<Page<ArticleData>> {
        let mut builder = Self::select_articles(locale);
        builder.push(" WHERE a.published = TRUE");
        builder.push(query.order_by());
        builder.push(" LIMIT ").push_bind(query.page.limit);
        builder.push(" OFFSET ").push_bind(query.page.offset());

        let (rows, total) = tokio::try_join!(
            builder
                .build_query_as::<ArticleWithFields>()
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
        let mut builder = Self::select_articles(locale);
        builder.push(" WHERE a.slug = ").push_bind(slug);

        let row = builder
            .build_query_as::<ArticleWithFields>()
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
            let fields = [
                ("title", &text.title),
                ("content", &text.content),
                ("summary", &text.summary),
            ];
            for (name, value) in fields {
                if let Some(value) = value {
                    upsert_field(&mut tx, EntityType::Article, id, locale, name, value).await?;
                }
            }
        }

        tx.commit().await?;
        self.article(id, locale).await
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        // 统一翻译表没有外键，在同一事务中手动删除译文
        let mut tx = self.pool.begin().await?;
        delete_fields(&mut tx, EntityType::Article, id, None).await?;
        let existed = base::delete_article(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(existed)
    }

    async fn increment_view_count(&self, id: i32) -> Result<()> {
        Ok(base::increment_view_count(&self.pool, id).await?)
    }

    async fn remove_translation(&self, id: i32, locale: Locale) -> Result<Option<ArticleData>> {
        let mut conn = self.pool.acquire().await?;
        delete_fields(&mut conn, EntityType::Article, id, Some(locale)).await?;
        drop(conn);
        self.article(id, Locale::BASE).await
    }
}

impl CategoryRepository for UnifiedTable {
    async fn find_many(&self, locale: Locale, page: PageRequest) -> Result<Page<CategoryData>> {
        let mut builder = Self::select_categories(locale);
        builder.push(" ORDER BY c.display_order ASC, c.id ASC");
        builder.push(" LIMIT ").push_bind(page.limit);
        builder.push(" OFFSET ").push_bind(page.offset());

        let (rows, total) = tokio::try_join!(
            builder
                .build_query_as::<CategoryWithFields>()
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
        let mut builder = Self::select_categories(locale);
        builder.push(" WHERE c.slug = ").push_bind(slug);

        let row = builder
            .build_query_as::<CategoryWithFields>()
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
            let fields = [("name", &text.name), ("description", &text.description)];
            for (name, value) in fields {
                if let Some(value) = value {
                    upsert_field(&mut tx, EntityType::Category, id, locale, name, value).await?;
                }
            }
        }

        tx.commit().await?;
        self.category(id, locale).await
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        delete_fields(&mut tx, EntityType::Category, id, None).await?;
        let existed = base::delete_category(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(existed)
    }

    async fn remove_translation(&self, id: i32, locale: Locale) -> Result<Option<CategoryData>> {
        let mut conn = self.pool.acquire().await?;
        delete_fields(&mut conn, EntityType::Category, id, Some(locale)).await?;
        drop(conn);
        self.category(id, Locale::BASE).await
    }
}
