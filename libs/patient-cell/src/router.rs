use std::sync::Arc;

use axum::{middleware, routing::{get, post, put}, Router};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;
use crate::repository::PatientRepository;
use crate::services::PatientService;

pub fn create_patient_router(config: Arc<AppConfig>, patients: Arc<dyn PatientRepository>) -> Router {
    let service = Arc::new(PatientService::new(patients));

    Router::new()
        .route("/", post(create_patient).get(search_patients))
        .route("/{id}", get(get_patient))
        .route("/{id}/contact", put(update_contact_info))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(service)
}
