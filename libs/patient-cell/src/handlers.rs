use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::auth::AuthenticatedUser;
use shared_models::error::AppError;
use shared_models::UniqueId;

use crate::models::{CreatePatientRequest, PatientFilters, UpdateContactRequest};
use crate::services::PatientService;

#[axum::debug_handler]
pub async fn create_patient(
    State(service): State<Arc<PatientService>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    let patient = service.register_patient(request, &user).await?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(service): State<Arc<PatientService>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(patient_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let patient = service.get_patient(&UniqueId::new(patient_id), &user).await?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn update_contact_info(
    State(service): State<Arc<PatientService>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(patient_id): Path<String>,
    Json(request): Json<UpdateContactRequest>,
) -> Result<Json<Value>, AppError> {
    let patient = service
        .update_contact_info(&UniqueId::new(patient_id), request, &user)
        .await?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn search_patients(
    State(service): State<Arc<PatientService>>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(filters): Query<PatientFilters>,
) -> Result<Json<Value>, AppError> {
    let patients = service.search_patients(filters, &user).await?;

    Ok(Json(json!({
        "patients": patients,
        "total": patients.len()
    })))
}
