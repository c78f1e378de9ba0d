//! Country-language HTTP routes.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::model::{CountryLanguage, LanguagePatch};
use crate::observability::Logger;
use crate::repo::LanguageRepository;
use crate::validation;

use super::errors::ApiResult;
use super::params::ListParams;
use super::response::MessageResponse;
use super::server::AppState;

/// Routes under `/languages`.
pub fn language_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/languages/", get(list_languages).post(create_language))
        .route(
            "/languages/:code/:language",
            get(get_language).put(update_language).delete(delete_language),
        )
}

async fn create_language(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CountryLanguage>,
) -> ApiResult<Json<CountryLanguage>> {
    validation::validate_new_language(&body)?;
    let created = LanguageRepository::new(&state.store).create(body)?;
    Logger::info(
        "LANGUAGE_CREATED",
        &[
            ("country", created.country_code.as_str()),
            ("language", created.language.as_str()),
        ],
    );
    Ok(Json(created))
}

async fn list_languages(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<CountryLanguage>>> {
    let languages = LanguageRepository::new(&state.store).list(params.page())?;
    Ok(Json(languages))
}

async fn get_language(
    State(state): State<Arc<AppState>>,
    Path((code, language)): Path<(String, String)>,
) -> ApiResult<Json<CountryLanguage>> {
    let row = LanguageRepository::new(&state.store).get(&code, &language)?;
    Ok(Json(row))
}

async fn update_language(
    State(state): State<Arc<AppState>>,
    Path((code, language)): Path<(String, String)>,
    Json(patch): Json<LanguagePatch>,
) -> ApiResult<Json<CountryLanguage>> {
    validation::validate_language_patch(&patch)?;
    let updated = LanguageRepository::new(&state.store).update(&code, &language, &patch)?;
    Logger::info(
        "LANGUAGE_UPDATED",
        &[
            ("country", updated.country_code.as_str()),
            ("language", updated.language.as_str()),
        ],
    );
    Ok(Json(updated))
}

async fn delete_language(
    State(state): State<Arc<AppState>>,
    Path((code, language)): Path<(String, String)>,
) -> ApiResult<Json<MessageResponse>> {
    LanguageRepository::new(&state.store).delete(&code, &language)?;
    Logger::info(
        "LANGUAGE_DELETED",
        &[("country", code.as_str()), ("language", language.as_str())],
    );
    Ok(Json(MessageResponse::new("Language deleted")))
}
