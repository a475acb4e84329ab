use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::auth::AuthenticatedUser;
use shared_models::error::AppError;
use shared_models::UniqueId;

use crate::models::{CreateProviderRequest, ProviderFilters};
use crate::services::ProviderService;

#[axum::debug_handler]
pub async fn create_provider(
    State(service): State<Arc<ProviderService>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateProviderRequest>,
) -> Result<Json<Value>, AppError> {
    let provider = service.register_provider(request, &user).await?;

    Ok(Json(json!(provider)))
}

#[axum::debug_handler]
pub async fn get_provider(
    State(service): State<Arc<ProviderService>>,
    Path(provider_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let provider = service.get_provider(&UniqueId::new(provider_id)).await?;

    Ok(Json(json!(provider)))
}

#[axum::debug_handler]
pub async fn list_providers(
    State(service): State<Arc<ProviderService>>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(filters): Query<ProviderFilters>,
) -> Result<Json<Value>, AppError> {
    let providers = service.list_providers(filters, &user).await?;

    Ok(Json(json!({
        "providers": providers,
        "total": providers.len()
    })))
}

#[axum::debug_handler]
pub async fn activate_provider(
    State(service): State<Arc<ProviderService>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(provider_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let provider = service.set_active(&UniqueId::new(provider_id), true, &user).await?;

    Ok(Json(json!(provider)))
}

#[axum::debug_handler]
pub async fn deactivate_provider(
    State(service): State<Arc<ProviderService>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(provider_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let provider = service.set_active(&UniqueId::new(provider_id), false, &user).await?;

    Ok(Json(json!(provider)))
}
