//! HTTP surface of the world API.
//!
//! Request handlers map the routes to repository calls; domain outcomes map
//! to status codes in `errors`. All successes are 200 with the record, the
//! list, or a message body.

mod city_routes;
mod config;
mod country_routes;
mod errors;
mod language_routes;
mod params;
mod response;
mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use params::{ListParams, DEFAULT_LIMIT, MAX_LIMIT};
pub use response::{HealthResponse, MessageResponse};
pub use server::{AppState, HttpServer};
