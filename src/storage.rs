mod base;
mod dedicated;
mod json_columns;
mod models;
mod page;
mod postgres;
mod repository;
pub mod schema;
mod unified;

pub use self::{
    base::bulk_insert_articles,
    dedicated::DedicatedTables,
    json_columns::JsonColumns,
    models::{
        ArticleData, ArticlePatch, ArticleRow, ArticleText, CategoryData, CategoryPatch,
        CategoryRow, CategoryText, NewArticle, NewCategory,
    },
    page::{ArticleQuery, Page, PageRequest, Pagination, SortField, SortOrder},
    postgres::{DBPool, lazy_db_poll, migrate, new_db_poll, ping},
    repository::{ArticleRepository, CategoryRepository, Repository},
    unified::{EntityType, UnifiedTable},
};
