#![allow(dead_code)]

use std::sync::Arc;

use appointment_cell::{AppointmentState, InMemoryAppointmentRepository, ScheduleAppointmentRequest};
use patient_cell::{CreatePatientRequest, Gender, InMemoryPatientRepository, Patient};
use provider_cell::{CreateProviderRequest, InMemoryProviderRepository, Provider};
use shared_config::AppConfig;

pub struct Clinic {
    pub appointments: Arc<InMemoryAppointmentRepository>,
    pub state: AppointmentState,
}

pub fn patient(id: &str, first_name: &str) -> Patient {
    Patient::create(
        CreatePatientRequest {
            id: Some(id.to_string()),
            first_name: first_name.to_string(),
            last_name: "Silva".to_string(),
            email: format!("{}@example.com", id),
            phone: "11999990000".to_string(),
            date_of_birth: "1985-07-01".to_string(),
            gender: Gender::PreferNotToSay,
        }
        .validate()
        .unwrap(),
    )
}

pub fn provider(id: &str, specialty: &str, active: bool) -> Provider {
    let mut provider = Provider::create(
        CreateProviderRequest {
            id: Some(id.to_string()),
            first_name: "Maria".to_string(),
            last_name: "Santos".to_string(),
            email: format!("{}@clinic.com", id),
            phone: "11999991111".to_string(),
            specialty: specialty.to_string(),
            license_number: "123456".to_string(),
            license_state: "SP".to_string(),
            clinic_id: "clinic-1".to_string(),
        }
        .validate()
        .unwrap(),
    );
    if !active {
        provider.deactivate();
    }
    provider
}

/// patient-1, patient-2, active provider-1 and provider-2, inactive provider-3.
pub async fn clinic_with(config: &AppConfig) -> Clinic {
    let appointments = Arc::new(InMemoryAppointmentRepository::from_config(config));

    let patients = Arc::new(InMemoryPatientRepository::from_config(config));
    patients
        .seed(vec![patient("patient-1", "Joao"), patient("patient-2", "Ana")])
        .await;

    let providers = Arc::new(InMemoryProviderRepository::from_config(config));
    providers
        .seed(vec![
            provider("provider-1", "general_practice", true),
            provider("provider-2", "cardiology", true),
            provider("provider-3", "dermatology", false),
        ])
        .await;

    let state = AppointmentState::new(appointments.clone(), patients, providers);
    Clinic { appointments, state }
}

pub async fn clinic() -> Clinic {
    clinic_with(&AppConfig::default()).await
}

pub fn booking(patient_id: &str, provider_id: &str, start: &str, end: &str) -> ScheduleAppointmentRequest {
    ScheduleAppointmentRequest {
        patient_id: patient_id.to_string(),
        provider_id: provider_id.to_string(),
        clinic_id: "clinic-1".to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        reason: "Annual checkup".to_string(),
    }
}
