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
    service::CategoryInput,
    state::AppState,
    storage::{CategoryData, CategoryPatch, PageRequest},
};

pub fn setup_route() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list).post(create))
        .route("/categories/{id}", get(get_by_id).put(update).delete(remove))
        .route(
            "/categories/{id}/translations/{locale}",
            delete(remove_translation),
        )
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
    page: Option<i64>,
    limit: Option<i64>,
}

async fn list(
    locale: Locale,
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Envelope<Vec<CategoryData>>> {
    let params = query(params, locale)?;
    let page = state
        .categories()
        .list(locale, PageRequest::new(params.page, params.limit))
        .await
        .localized(locale)?;
    Ok(Envelope::page(page, locale))
}

async fn get_by_id(
    locale: Locale,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Envelope<CategoryData>> {
    let id = parse_id(&id, "category", locale)?;
    let category = state
        .categories()
        .get_by_id(id, locale)
        .await
        .localized(locale)?;
    Ok(Envelope::new(category, locale))
}

async fn create(
    locale: Locale,
    State(state): State<AppState>,
    input: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Envelope<CategoryData>)> {
    let input = body(input, locale)?;
    let category = state
        .categories()
        .create(input, locale)
        .await
        .localized(locale)?;
    tracing::info!(id = category.id, %locale, "category created");
    Ok((StatusCode::CREATED, Envelope::new(category, locale)))
}

async fn update(
    locale: Locale,
    State(state): State<AppState>,
    Path(id): Path<String>,
    patch: Result<Json<CategoryPatch>, JsonRejection>,
) -> ApiResult<Envelope<CategoryData>> {
    let id = parse_id(&id, "category", locale)?;
    let patch = body(patch, locale)?;
    let category = state
        .categories()
        .update(id, patch, locale)
        .await
        .localized(locale)?;
    Ok(Envelope::new(category, locale))
}

async fn remove(
    locale: Locale,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Message> {
    let id = parse_id(&id, "category", locale)?;
    state.categories().delete(id).await.localized(locale)?;
    tracing::info!(id, "category deleted");
    Ok(Message::new("Category deleted successfully", locale))
}

async fn remove_translation(
    locale: Locale,
    State(state): State<AppState>,
    Path((id, target)): Path<(String, String)>,
) -> ApiResult<Envelope<CategoryData>> {
    let id = parse_id(&id, "category", locale)?;
    let target = parse_locale(&target, locale)?;
    let category = state
        .categories()
        .remove_translation(id, target)
        .await
        .localized(locale)?;
    Ok(Envelope::new(category, locale))
}
