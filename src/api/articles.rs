use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{delete, get},
};
use axum_extra::extract::{Query, QueryRejection};
use serde::Deserialize;

use super::{
    params::{body, parse_id, parse_locale, query},
    response::{ApiResult, Envelope, Localized, Message},
};
use crate::{
    locale::Locale,
    service::ArticleInput,
    state::AppState,
    storage::{ArticleData, ArticlePatch, ArticleQuery, PageRequest, SortField, SortOrder},
};

/// 配置文章相关路由
///
/// 固定路径（`popular`、`search`、`slug/{slug}`）优先于 `{id}` 匹配。
pub fn setup_route() -> Router<AppState> {
    Router::new()
        .route("/articles", get(list).post(create))
        .route("/articles/popular", get(popular))
        .route("/articles/search", get(search))
        .route("/articles/slug/{slug}", get(get_by_slug))
        .route("/articles/{id}", get(get_by_id).put(update).delete(remove))
        .route(
            "/articles/{id}/translations/{locale}",
            delete(remove_translation),
        )
}

/// 列表查询参数
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListParams {
    page: Option<i64>,
    limit: Option<i64>,
    sort_by: Option<String>,
    sort_order: Option<String>,
}

impl ListParams {
    fn into_query(self) -> crate::error::Result<ArticleQuery> {
        Ok(ArticleQuery {
            page: PageRequest::new(self.page, self.limit),
            sort: self
                .sort_by
                .as_deref()
                .map(SortField::parse)
                .transpose()?
                .unwrap_or_default(),
            order: self
                .sort_order
                .as_deref()
                .map(SortOrder::parse)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PopularParams {
    limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    q: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
}

async fn list(
    locale: Locale,
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Envelope<Vec<ArticleData>>> {
    let query = query(params, locale)?.into_query().localized(locale)?;
    let page = state.articles().list(locale, &query).await.localized(locale)?;
    Ok(Envelope::page(page, locale))
}

async fn popular(
    locale: Locale,
    State(state): State<AppState>,
    params: Result<Query<PopularParams>, QueryRejection>,
) -> ApiResult<Envelope<Vec<ArticleData>>> {
    let params = query(params, locale)?;
    let data = state
        .articles()
        .popular(locale, params.limit)
        .await
        .localized(locale)?;
    Ok(Envelope::new(data, locale))
}

async fn search(
    locale: Locale,
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Envelope<Vec<ArticleData>>> {
    let params = query(params, locale)?;
    let q = params.q.unwrap_or_default();
    let page = state
        .articles()
        .search(&q, locale, PageRequest::new(params.page, params.limit))
        .await
        .localized(locale)?;
    Ok(Envelope::page(page, locale).with_query(q))
}

async fn get_by_slug(
    locale: Locale,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Envelope<ArticleData>> {
    let article = state
        .articles()
        .get_by_slug(&slug, locale)
        .await
        .localized(locale)?;
    Ok(Envelope::new(article, locale))
}

async fn get_by_id(
    locale: Locale,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Envelope<ArticleData>> {
    let id = parse_id(&id, "article", locale)?;
    let article = state
        .articles()
        .get_by_id(id, locale)
        .await
        .localized(locale)?;
    Ok(Envelope::new(article, locale))
}

async fn create(
    locale: Locale,
    State(state): State<AppState>,
    input: Result<Json<ArticleInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Envelope<ArticleData>)> {
    let input = body(input, locale)?;
    let article = state
        .articles()
        .create(input, locale)
        .await
        .localized(locale)?;
    tracing::info!(id = article.id, %locale, "article created");
    Ok((StatusCode::CREATED, Envelope::new(article, locale)))
}

async fn update(
    locale: Locale,
    State(state): State<AppState>,
    Path(id): Path<String>,
    patch: Result<Json<ArticlePatch>, JsonRejection>,
) -> ApiResult<Envelope<ArticleData>> {
    let id = parse_id(&id, "article", locale)?;
    let patch = body(patch, locale)?;
    let article = state
        .articles()
        .update(id, patch, locale)
        .await
        .localized(locale)?;
    Ok(Envelope::new(article, locale))
}

async fn remove(
    locale: Locale,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Message> {
    let id = parse_id(&id, "article", locale)?;
    state.articles().delete(id).await.localized(locale)?;
    tracing::info!(id, "article deleted");
    Ok(Message::new("Article deleted successfully", locale))
}

async fn remove_translation(
    locale: Locale,
    State(state): State<AppState>,
    Path((id, target)): Path<(String, String)>,
) -> ApiResult<Envelope<ArticleData>> {
    let id = parse_id(&id, "article", locale)?;
    let target = parse_locale(&target, locale)?;
    let article = state
        .articles()
        .remove_translation(id, target)
        .await
        .localized(locale)?;
    Ok(Envelope::new(article, locale))
}
