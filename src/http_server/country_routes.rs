//! Country HTTP routes.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::model::{Country, CountryPatch};
use crate::observability::Logger;
use crate::repo::CountryRepository;
use crate::validation;

use super::errors::ApiResult;
use super::params::ListParams;
use super::response::MessageResponse;
use super::server::AppState;

/// Routes under `/countries`.
pub fn country_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/countries/", get(list_countries).post(create_country))
        .route(
            "/countries/:code",
            get(get_country).put(update_country).delete(delete_country),
        )
}

async fn create_country(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Country>,
) -> ApiResult<Json<Country>> {
    validation::validate_new_country(&body)?;
    let created = CountryRepository::new(&state.store).create(body)?;
    Logger::info("COUNTRY_CREATED", &[("code", created.code.as_str())]);
    Ok(Json(created))
}

async fn list_countries(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Country>>> {
    let countries = CountryRepository::new(&state.store).list(params.page())?;
    Ok(Json(countries))
}

async fn get_country(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> ApiResult<Json<Country>> {
    let country = CountryRepository::new(&state.store).get(&code)?;
    Ok(Json(country))
}

async fn update_country(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Json(patch): Json<CountryPatch>,
) -> ApiResult<Json<Country>> {
    validation::validate_country_patch(&patch)?;
    let updated = CountryRepository::new(&state.store).update(&code, &patch)?;
    Logger::info("COUNTRY_UPDATED", &[("code", updated.code.as_str())]);
    Ok(Json(updated))
}

async fn delete_country(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let code = code.to_uppercase();
    let outcome = CountryRepository::new(&state.store).delete(&code)?;
    let cities_removed = outcome.cities_removed.to_string();
    let languages_removed = outcome.languages_removed.to_string();
    Logger::info(
        "COUNTRY_DELETED",
        &[
            ("code", code.as_str()),
            ("cities_removed", cities_removed.as_str()),
            ("languages_removed", languages_removed.as_str()),
        ],
    );
    Ok(Json(MessageResponse::new(format!(
        "Country {} deleted along with its cities and languages.",
        code
    ))))
}
