mod articles;
mod categories;
mod slug;

pub use self::{
    articles::{ArticleInput, ArticleService},
    categories::{CategoryInput, CategoryService},
    slug::{slugify, with_timestamp},
};
