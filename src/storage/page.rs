use serde::Serialize;

use crate::error::{Error, Result};

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;
/// 页码上限，保证 `offset` 不会溢出
const MAX_PAGE: i64 = i64::MAX / MAX_LIMIT;

/// 分页请求，页码从 1 开始
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// 规范化分页参数
    ///
    /// 缺失或小于 1 的页码为 1；缺失或非正的条数为默认值，上限为 100。
    /// 过大的页码截断到 [`MAX_PAGE`]。
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.filter(|p| *p >= 1).unwrap_or(1).min(MAX_PAGE),
            limit: limit
                .filter(|l| *l >= 1)
                .unwrap_or(DEFAULT_LIMIT)
                .min(MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// 文章列表可用的排序字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    PublishedAt,
    ViewCount,
    Title,
    Id,
}

impl SortField {
    /// 解析查询参数中的 `sortBy`
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "createdAt" => Ok(SortField::CreatedAt),
            "updatedAt" => Ok(SortField::UpdatedAt),
            "publishedAt" => Ok(SortField::PublishedAt),
            "viewCount" => Ok(SortField::ViewCount),
            "title" => Ok(SortField::Title),
            "id" => Ok(SortField::Id),
            other => Err(Error::BadRequest(format!("Invalid sortBy: {other}"))),
        }
    }

    /// 对应的列名，只会拼接这里列出的常量
    pub const fn column(self) -> &'static str {
        match self {
            SortField::CreatedAt => "a.created_at",
            SortField::UpdatedAt => "a.updated_at",
            SortField::PublishedAt => "a.published_at",
            SortField::ViewCount => "a.view_count",
            SortField::Title => "a.title",
            SortField::Id => "a.id",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(Error::BadRequest(format!("Invalid sortOrder: {value}"))),
        }
    }

    pub const fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC NULLS LAST",
        }
    }
}

/// 文章列表查询条件
#[derive(Debug, Clone, Copy, Default)]
pub struct ArticleQuery {
    pub page: PageRequest,
    pub sort: SortField,
    pub order: SortOrder,
}

impl ArticleQuery {
    /// 拼接到 SQL 中的 `ORDER BY` 子句，`id` 作为次序保证稳定分页
    pub fn order_by(&self) -> String {
        format!(
            " ORDER BY {} {}, a.id {} ",
            self.sort.column(),
            self.order.keyword(),
            match self.order {
                SortOrder::Asc => "ASC",
                SortOrder::Desc => "DESC",
            }
        )
    }
}

/// 一页数据
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            data,
            total,
            page: request.page,
            limit: request.limit,
        }
    }

    /// 对已经全部取出的数据在内存中分页
    pub fn slice(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as i64;
        let data = all
            .into_iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(request.limit).unwrap_or(0))
            .collect();
        Self::new(data, total, request)
    }

    pub fn total_pages(&self) -> i64 {
        if self.limit <= 0 {
            return 0;
        }
        (self.total + self.limit - 1) / self.limit
    }

    pub fn pagination(&self) -> Pagination {
        Pagination {
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages(),
        }
    }
}

/// 响应中的分页信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}
