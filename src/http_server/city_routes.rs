//! City HTTP routes.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::model::{City, CityPatch, NewCity};
use crate::observability::Logger;
use crate::repo::CityRepository;
use crate::validation;

use super::errors::ApiResult;
use super::params::ListParams;
use super::response::MessageResponse;
use super::server::AppState;

/// Routes under `/cities`.
pub fn city_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/cities/", get(list_cities).post(create_city))
        .route(
            "/cities/:id",
            get(get_city).put(update_city).delete(delete_city),
        )
}

async fn create_city(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewCity>,
) -> ApiResult<Json<City>> {
    validation::validate_new_city(&body)?;
    let created = CityRepository::new(&state.store).create(body)?;
    let id = created.id.to_string();
    Logger::info(
        "CITY_CREATED",
        &[("id", id.as_str()), ("country", created.country_code.as_str())],
    );
    Ok(Json(created))
}

async fn list_cities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<City>>> {
    let cities = CityRepository::new(&state.store).list(params.page())?;
    Ok(Json(cities))
}

async fn get_city(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<City>> {
    let city = CityRepository::new(&state.store).get(id)?;
    Ok(Json(city))
}

async fn update_city(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(patch): Json<CityPatch>,
) -> ApiResult<Json<City>> {
    validation::validate_city_patch(&patch)?;
    let updated = CityRepository::new(&state.store).update(id, &patch)?;
    let id = updated.id.to_string();
    Logger::info("CITY_UPDATED", &[("id", id.as_str())]);
    Ok(Json(updated))
}

async fn delete_city(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    CityRepository::new(&state.store).delete(id)?;
    let id = id.to_string();
    Logger::info("CITY_DELETED", &[("id", id.as_str())]);
    Ok(Json(MessageResponse::new("City deleted")))
}
