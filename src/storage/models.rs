use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// 文章主表的一行
///
/// 文本列保存基础语言（日语）的内容。
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArticleRow {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub slug: String,
    pub category_id: i32,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 文章在某个语言下的可翻译字段
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleText {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
}

impl ArticleText {
    /// 去掉空字符串后的字段，空值视为没有翻译
    pub fn non_empty(self) -> Self {
        Self {
            title: non_empty(self.title),
            content: non_empty(self.content),
            summary: non_empty(self.summary),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.summary.is_none()
    }
}

/// 本地化后的文章，对外输出的形式
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleData {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub slug: String,
    pub category_id: i32,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i32,
    pub locale: Locale,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ArticleRow {
    /// 按语言合并翻译
    ///
    /// 基础语言直接返回主表内容；其他语言逐字段使用非空的译文，缺失时回退到基础语言。
    pub fn localize(self, locale: Locale, text: ArticleText) -> ArticleData {
        let text = if locale.is_base() {
            ArticleText::default()
        } else {
            text.non_empty()
        };

        ArticleData {
            id: self.id,
            title: text.title.unwrap_or(self.title),
            content: text.content.unwrap_or(self.content),
            summary: text.summary.or(self.summary),
            slug: self.slug,
            category_id: self.category_id,
            published: self.published,
            published_at: self.published_at,
            view_count: self.view_count,
            locale,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// 分类主表的一行
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub parent_id: Option<i32>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 分类在某个语言下的可翻译字段
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryText {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CategoryText {
    pub fn non_empty(self) -> Self {
        Self {
            name: non_empty(self.name),
            description: non_empty(self.description),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// 本地化后的分类
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryData {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub parent_id: Option<i32>,
    pub display_order: i32,
    pub locale: Locale,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CategoryRow {
    /// 按语言合并翻译，规则同 [`ArticleRow::localize`]
    pub fn localize(self, locale: Locale, text: CategoryText) -> CategoryData {
        let text = if locale.is_base() {
            CategoryText::default()
        } else {
            text.non_empty()
        };

        CategoryData {
            id: self.id,
            name: text.name.unwrap_or(self.name),
            description: text.description.or(self.description),
            slug: self.slug,
            parent_id: self.parent_id,
            display_order: self.display_order,
            locale,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// 新建文章，字段已经过校验
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub slug: String,
    pub category_id: i32,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i32,
}

/// 文章的部分更新
///
/// 可翻译字段为 `title`、`content`、`summary`，其余字段总是写入主表。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub slug: Option<String>,
    pub category_id: Option<i32>,
    pub published: Option<bool>,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: Option<i32>,
}

impl ArticlePatch {
    /// 可翻译字段
    pub fn text(&self) -> ArticleText {
        ArticleText {
            title: self.title.clone(),
            content: self.content.clone(),
            summary: self.summary.clone(),
        }
    }

    /// 去掉可翻译字段，只保留写入主表的部分
    pub fn without_text(&self) -> Self {
        Self {
            title: None,
            content: None,
            summary: None,
            ..self.clone()
        }
    }
}

/// 新建分类，字段已经过校验
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub parent_id: Option<i32>,
    pub display_order: i32,
}

/// 分类的部分更新，可翻译字段为 `name`、`description`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub parent_id: Option<i32>,
    pub display_order: Option<i32>,
}

impl CategoryPatch {
    pub fn text(&self) -> CategoryText {
        CategoryText {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }

    pub fn without_text(&self) -> Self {
        Self {
            name: None,
            description: None,
            ..self.clone()
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
