//! HTTP API
//!
//! Routes under `/api`. Each resource gets the generic handler set with
//! only the methods it exposes; anything else answers 405.

pub mod dashboard;
pub mod handlers;
pub mod health;
pub mod response;
pub mod settings;

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, MethodRouter},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::app::AppState;
use crate::config::MAX_BODY_BYTES;
use crate::error::{AppError, Result};
use crate::services::ResourceService;
use crate::storage::Resource;

/// Routes for one resource collection at `path`
fn resource_routes<R: Resource>(path: &str, service: ResourceService<R>) -> Router {
    let mut methods: MethodRouter<ResourceService<R>> =
        get(handlers::list::<R>).post(handlers::create::<R>);

    if R::PATCHABLE {
        methods = methods.patch(handlers::update::<R>);
    }
    if R::DELETABLE {
        methods = methods.delete(handlers::delete::<R>);
    }

    Router::new().route(path, methods).with_state(service)
}

fn cors_layer(origin: Option<&str>) -> Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    match origin {
        Some(origin) => {
            let origin = origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::Configuration(format!("Invalid CORS origin: {}", origin)))?;
            Ok(cors.allow_origin(origin))
        }
        None => Ok(cors.allow_origin(Any)),
    }
}

pub fn create_router(state: AppState) -> Result<Router> {
    let cors = cors_layer(state.config.cors_origin.as_deref())?;

    let router = Router::new()
        .merge(resource_routes("/api/admissions", state.admissions.clone()))
        .merge(resource_routes("/api/alumni", state.alumni.clone()))
        .merge(resource_routes("/api/news", state.news.clone()))
        .merge(resource_routes("/api/publications", state.publications.clone()))
        .merge(resource_routes("/api/messages", state.messages.clone()))
        .merge(
            Router::new()
                .route(
                    "/api/settings",
                    get(settings::get_settings).post(settings::save_settings),
                )
                .with_state(state.settings.clone()),
        )
        .merge(
            Router::new()
                .route("/api/dashboard", get(dashboard::dashboard_stats))
                .with_state(state.dashboard.clone()),
        )
        .route("/api/health", get(health::health_check))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Ok(router)
}
