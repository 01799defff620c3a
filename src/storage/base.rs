//! 三种模式共用的主表操作
//!
//! 主表结构在三种模式下一致（模式三只多了 JSON 列且有默认值），
//! 因此新增、更新主表字段、删除和浏览量计数都在这里实现。

use sqlx::PgExecutor;

use super::{ArticlePatch, ArticleRow, CategoryPatch, CategoryRow, NewArticle, NewCategory};

/// 文章主表的列，表别名为 `a`
pub const ARTICLE_COLUMNS: &str = "a.id, a.title, a.content, a.summary, a.slug, a.category_id, \
     a.published, a.published_at, a.view_count, a.created_at, a.updated_at";

/// 分类主表的列，表别名为 `c`
pub const CATEGORY_COLUMNS: &str = "c.id, c.name, c.description, c.slug, c.parent_id, \
     c.display_order, c.created_at, c.updated_at";

pub async fn insert_article<'e>(
    executor: impl PgExecutor<'e>,
    article: &NewArticle,
) -> Result<ArticleRow, sqlx::Error> {
    sqlx::query_as::<_, ArticleRow>(
        r#"
        INSERT INTO articles
            (title, content, summary, slug, category_id, published, published_at, view_count)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, title, content, summary, slug, category_id,
                  published, published_at, view_count, created_at, updated_at
        "#,
    )
    .bind(&article.title)
    .bind(&article.content)
    .bind(&article.summary)
    .bind(&article.slug)
    .bind(article.category_id)
    .bind(article.published)
    .bind(article.published_at)
    .bind(article.view_count)
    .fetch_one(executor)
    .await
}

/// 更新文章主表
///
/// 未提供的字段保持不变，`updated_at` 总会刷新。返回文章是否存在。
pub async fn update_article<'e>(
    executor: impl PgExecutor<'e>,
    id: i32,
    patch: &ArticlePatch,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE articles SET
            title = COALESCE($2, title),
            content = COALESCE($3, content),
            summary = COALESCE($4, summary),
            slug = COALESCE($5, slug),
            category_id = COALESCE($6, category_id),
            published = COALESCE($7, published),
            published_at = COALESCE($8, published_at),
            view_count = COALESCE($9, view_count),
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&patch.title)
    .bind(&patch.content)
    .bind(&patch.summary)
    .bind(&patch.slug)
    .bind(patch.category_id)
    .bind(patch.published)
    .bind(patch.published_at)
    .bind(patch.view_count)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_article<'e>(
    executor: impl PgExecutor<'e>,
    id: i32,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM articles WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// 浏览量加一，单条语句完成，不需要先读后写
pub async fn increment_view_count<'e>(
    executor: impl PgExecutor<'e>,
    id: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE articles SET view_count = view_count + 1 WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn count_published<'e>(executor: impl PgExecutor<'e>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE published = TRUE")
        .fetch_one(executor)
        .await
}

/// 批量插入文章主表，用于生成压测数据
pub async fn bulk_insert_articles<'e>(
    executor: impl PgExecutor<'e>,
    articles: &[NewArticle],
) -> Result<u64, sqlx::Error> {
    if articles.is_empty() {
        return Ok(0);
    }

    let mut builder = sqlx::QueryBuilder::new(
        "INSERT INTO articles \
         (title, content, summary, slug, category_id, published, published_at, view_count) ",
    );
    builder.push_values(articles, |mut b, a| {
        b.push_bind(&a.title)
            .push_bind(&a.content)
            .push_bind(&a.summary)
            .push_bind(&a.slug)
            .push_bind(a.category_id)
            .push_bind(a.published)
            .push_bind(a.published_at)
            .push_bind(a.view_count);
    });

    let result = builder.build().execute(executor).await?;
    Ok(result.rows_affected())
}

pub async fn insert_category<'e>(
    executor: impl PgExecutor<'e>,
    category: &NewCategory,
) -> Result<CategoryRow, sqlx::Error> {
    sqlx::query_as::<_, CategoryRow>(
        r#"
        INSERT INTO categories (name, description, slug, parent_id, display_order)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, description, slug, parent_id,
                  display_order, created_at, updated_at
        "#,
    )
    .bind(&category.name)
    .bind(&category.description)
    .bind(&category.slug)
    .bind(category.parent_id)
    .bind(category.display_order)
    .fetch_one(executor)
    .await
}

pub async fn update_category<'e>(
    executor: impl PgExecutor<'e>,
    id: i32,
    patch: &CategoryPatch,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE categories SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            slug = COALESCE($4, slug),
            parent_id = COALESCE($5, parent_id),
            display_order = COALESCE($6, display_order),
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&patch.name)
    .bind(&patch.description)
    .bind(&patch.slug)
    .bind(patch.parent_id)
    .bind(patch.display_order)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_category<'e>(
    executor: impl PgExecutor<'e>,
    id: i32,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_categories<'e>(executor: impl PgExecutor<'e>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(executor)
        .await
}
