use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::{create_appointment_router, AppointmentState, InMemoryAppointmentRepository};
use patient_cell::{create_patient_router, InMemoryPatientRepository};
use provider_cell::{create_provider_router, InMemoryProviderRepository};
use shared_config::AppConfig;

/// In-memory stores shared by every cell router.
pub struct Repositories {
    pub patients: Arc<InMemoryPatientRepository>,
    pub providers: Arc<InMemoryProviderRepository>,
    pub appointments: Arc<InMemoryAppointmentRepository>,
}

impl Repositories {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            patients: Arc::new(InMemoryPatientRepository::from_config(config)),
            providers: Arc::new(InMemoryProviderRepository::from_config(config)),
            appointments: Arc::new(InMemoryAppointmentRepository::from_config(config)),
        }
    }
}

pub fn create_router(config: Arc<AppConfig>, repositories: &Repositories) -> Router {
    let appointments = AppointmentState::new(
        repositories.appointments.clone(),
        repositories.patients.clone(),
        repositories.providers.clone(),
    );

    Router::new()
        .route("/", get(|| async { "Clinic appointment API is running!" }))
        .nest("/patients", create_patient_router(config.clone(), repositories.patients.clone()))
        .nest("/providers", create_provider_router(config.clone(), repositories.providers.clone()))
        .nest("/appointments", create_appointment_router(config, appointments))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use shared_utils::test_utils::{TestConfig, TestUser};

    use super::*;

    #[tokio::test]
    async fn liveness_needs_no_token() {
        let config = TestConfig::default();
        let app = create_router(config.to_arc(), &Repositories::from_config(&config.to_app_config()));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn cells_are_mounted_behind_auth() {
        let config = TestConfig::default();
        let app = create_router(config.to_arc(), &Repositories::from_config(&config.to_app_config()));

        for uri in ["/patients", "/providers", "/appointments"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/providers")
                    .header("Authorization", TestUser::patient("patient-1").bearer(&config.jwt_secret))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
