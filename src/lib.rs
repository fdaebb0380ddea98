use std::{sync::Arc, time::Duration};

use axum::{
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;

pub mod config;
pub mod error;
pub mod interceptor;
pub mod middleware;
pub mod routes;
pub mod telemetry;

use config::AppConfig;
use middleware::RequestLogLayer;
use routes::items::ItemStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub items: ItemStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            items: ItemStore::new(),
        }
    }
}

/// Builds the application router.
///
/// The item controllers form the logged layer; `/health` stays outside it.
pub fn create_app(state: AppState) -> Router {
    let request_log = &state.config.request_log;

    let mut controllers = Router::new()
        .route(
            "/items",
            get(routes::items::list_items).post(routes::items::create_item),
        )
        .route(
            "/items/:id",
            get(routes::items::get_item).delete(routes::items::delete_item),
        );

    if request_log.enabled {
        let mut layer = RequestLogLayer::new().max_body_bytes(request_log.max_body_bytes);
        if let Some(header) = &request_log.client_ip_header {
            layer = layer.client_ip_header(header.clone());
        }
        controllers = controllers.route_layer(layer);
    }

    let timeout = Duration::from_secs(state.config.server.timeout_seconds);

    Router::new()
        .route("/health", get(routes::health::health))
        .merge(controllers)
        .layer(ServiceBuilder::new().layer(TimeoutLayer::new(timeout)))
        .with_state(state)
}
