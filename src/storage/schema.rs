//! 各模式的建表脚本

use serde::Serialize;

use super::{DBPool, migrate};
use crate::config::TranslationPattern;

const PATTERN1: &str = include_str!("../../sql/pattern1.sql");
const PATTERN2: &str = include_str!("../../sql/pattern2.sql");
const PATTERN3: &str = include_str!("../../sql/pattern3.sql");

/// 模式对应的建表脚本
pub const fn script(pattern: TranslationPattern) -> &'static str {
    match pattern {
        TranslationPattern::Dedicated => PATTERN1,
        TranslationPattern::Unified => PATTERN2,
        TranslationPattern::JsonColumns => PATTERN3,
    }
}

/// 模式拥有的全部表，子表在前
pub const fn tables(pattern: TranslationPattern) -> &'static [&'static str] {
    match pattern {
        TranslationPattern::Dedicated => &[
            "article_translations",
            "category_translations",
            "articles",
            "categories",
        ],
        TranslationPattern::Unified => &["translations", "articles", "categories"],
        TranslationPattern::JsonColumns => &["articles", "categories"],
    }
}

/// 删除并重建模式的全部表
pub async fn apply(db: &DBPool, pattern: TranslationPattern) -> Result<(), sqlx::Error> {
    tracing::info!(%pattern, "applying schema");
    migrate(db, script(pattern)).await
}

/// 清空模式的全部数据并重置自增序列
pub async fn clear(db: &DBPool, pattern: TranslationPattern) -> Result<(), sqlx::Error> {
    let sql = format!(
        "TRUNCATE TABLE {} RESTART IDENTITY CASCADE",
        tables(pattern).join(", ")
    );
    sqlx::query(&sql).execute(db).await?;
    Ok(())
}

/// 各表的行数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCounts {
    pub categories: i64,
    pub articles: i64,
    pub published_articles: i64,
    /// 译文数量，模式一为行数，模式二为字段数，模式三为 JSON 中的键数
    pub translations: i64,
}

pub async fn counts(db: &DBPool, pattern: TranslationPattern) -> Result<TableCounts, sqlx::Error> {
    let (categories, articles, published_articles): (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT (SELECT COUNT(*) FROM categories),
               (SELECT COUNT(*) FROM articles),
               (SELECT COUNT(*) FROM articles WHERE published = TRUE)
        "#,
    )
    .fetch_one(db)
    .await?;

    let translation_sql = match pattern {
        TranslationPattern::Dedicated => {
            "SELECT (SELECT COUNT(*) FROM article_translations) \
                  + (SELECT COUNT(*) FROM category_translations)"
        }
        TranslationPattern::Unified => "SELECT COUNT(*) FROM translations",
        TranslationPattern::JsonColumns => {
            "SELECT COALESCE((SELECT SUM((SELECT COUNT(*) FROM jsonb_object_keys(title_translations))) FROM articles), 0)::bigint \
                  + COALESCE((SELECT SUM((SELECT COUNT(*) FROM jsonb_object_keys(name_translations))) FROM categories), 0)::bigint"
        }
    };
    let translations: i64 = sqlx::query_scalar(translation_sql).fetch_one(db).await?;

    Ok(TableCounts {
        categories,
        articles,
        published_articles,
        translations,
    })
}
