use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::auth::AuthenticatedUser;
use shared_models::error::AppError;
use shared_models::UniqueId;

use crate::models::{
    AppointmentFilters, CompleteAppointmentRequest, RescheduleAppointmentRequest, ScheduleAppointmentRequest,
};
use crate::router::AppointmentState;

#[axum::debug_handler]
pub async fn schedule_appointment(
    State(state): State<AppointmentState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<ScheduleAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = state.scheduling.schedule_appointment(request, &user).await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<AppointmentState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(filters): Query<AppointmentFilters>,
) -> Result<Json<Value>, AppError> {
    let appointments = state.queries.appointments_for_actor(filters, &user).await?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<AppointmentState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let appointment = state
        .queries
        .get_appointment(&UniqueId::new(appointment_id), &user)
        .await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn start_appointment(
    State(state): State<AppointmentState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let appointment = state
        .lifecycle
        .start_appointment(&UniqueId::new(appointment_id), &user)
        .await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(state): State<AppointmentState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(appointment_id): Path<String>,
    request: Option<Json<CompleteAppointmentRequest>>,
) -> Result<Json<Value>, AppError> {
    // Notes are optional, so the body may be left out entirely.
    let notes = request.and_then(|Json(r)| r.notes);

    let appointment = state
        .lifecycle
        .complete_appointment(&UniqueId::new(appointment_id), notes, &user)
        .await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<AppointmentState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let appointment = state
        .lifecycle
        .cancel_appointment(&UniqueId::new(appointment_id), &user)
        .await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn reschedule_appointment(
    State(state): State<AppointmentState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(appointment_id): Path<String>,
    Json(request): Json<RescheduleAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = state
        .scheduling
        .reschedule_appointment(&UniqueId::new(appointment_id), request, &user)
        .await?;

    Ok(Json(json!(appointment)))
}
