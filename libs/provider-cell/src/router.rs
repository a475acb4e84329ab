use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::repository::ProviderRepository;
use crate::services::ProviderService;

pub fn create_provider_router(config: Arc<AppConfig>, providers: Arc<dyn ProviderRepository>) -> Router {
    let service = Arc::new(ProviderService::new(providers));

    Router::new()
        .route("/", post(handlers::create_provider).get(handlers::list_providers))
        .route("/{provider_id}", get(handlers::get_provider))
        .route("/{provider_id}/activate", post(handlers::activate_provider))
        .route("/{provider_id}/deactivate", post(handlers::deactivate_provider))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(service)
}
