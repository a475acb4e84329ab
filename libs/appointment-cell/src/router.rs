use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use patient_cell::PatientRepository;
use provider_cell::ProviderRepository;
use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::repository::AppointmentRepository;
use crate::services::{
    AppointmentLifecycleService, AppointmentQueryService, AppointmentSchedulingService, SchedulingLocks,
};

#[derive(Clone)]
pub struct AppointmentState {
    pub scheduling: Arc<AppointmentSchedulingService>,
    pub lifecycle: Arc<AppointmentLifecycleService>,
    pub queries: Arc<AppointmentQueryService>,
}

impl AppointmentState {
    /// Scheduling and lifecycle share one lock registry.
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        patients: Arc<dyn PatientRepository>,
        providers: Arc<dyn ProviderRepository>,
    ) -> Self {
        let locks = Arc::new(SchedulingLocks::new());

        Self {
            scheduling: Arc::new(AppointmentSchedulingService::new(
                appointments.clone(),
                patients,
                providers,
                locks.clone(),
            )),
            lifecycle: Arc::new(AppointmentLifecycleService::new(appointments.clone(), locks)),
            queries: Arc::new(AppointmentQueryService::new(appointments)),
        }
    }
}

pub fn create_appointment_router(config: Arc<AppConfig>, state: AppointmentState) -> Router {
    Router::new()
        .route("/", post(handlers::schedule_appointment).get(handlers::list_appointments))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}/start", post(handlers::start_appointment))
        .route("/{appointment_id}/complete", post(handlers::complete_appointment))
        .route("/{appointment_id}/cancel", post(handlers::cancel_appointment))
        .route("/{appointment_id}/reschedule", patch(handlers::reschedule_appointment))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(state)
}
