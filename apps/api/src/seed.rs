use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use tracing::{info, warn};

use appointment_cell::{Appointment, NewAppointment, TimeSlot};
use patient_cell::{CreatePatientRequest, Gender, Patient};
use provider_cell::{CreateProviderRequest, Provider};
use shared_config::AppConfig;
use shared_models::auth::{TokenClaims, UserRole};
use shared_models::UniqueId;
use shared_utils::jwt::sign_token;

use crate::router::Repositories;

const CLINIC_ID: &str = "clinic-1";
const DEMO_TOKEN_HOURS: i64 = 12;

fn patient(id: &str, first: &str, last: &str, email: &str, phone: &str, dob: &str, gender: Gender) -> Result<Patient> {
    let props = CreatePatientRequest {
        id: Some(id.to_string()),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        date_of_birth: dob.to_string(),
        gender,
    }
    .validate()?;

    Ok(Patient::create(props))
}

fn provider(id: &str, first: &str, last: &str, email: &str, specialty: &str, license: &str) -> Result<Provider> {
    let props = CreateProviderRequest {
        id: Some(id.to_string()),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        phone: "11987654321".to_string(),
        specialty: specialty.to_string(),
        license_number: license.to_string(),
        license_state: "SP".to_string(),
        clinic_id: CLINIC_ID.to_string(),
    }
    .validate()?;

    Ok(Provider::create(props))
}

fn appointment(patient: &Patient, provider: &Provider, time_slot: TimeSlot, reason: &str) -> Appointment {
    Appointment::create(NewAppointment {
        id: None,
        patient_id: patient.id().clone(),
        provider_id: provider.id().clone(),
        clinic_id: UniqueId::new(CLINIC_ID),
        time_slot,
        reason: reason.to_string(),
    })
}

/// Two patients, two providers and three appointments: two upcoming and one
/// completed earlier today.
pub async fn seed_demo_data(repositories: &Repositories, config: &AppConfig) -> Result<()> {
    let patients = vec![
        patient("patient-1", "John", "Doe", "john.doe@email.com", "11999998888", "1985-03-12", Gender::Male)?,
        patient("patient-2", "Jane", "Smith", "jane.smith@email.com", "11988887777", "1992-11-02", Gender::Female)?,
    ];
    let providers = vec![
        provider("provider-1", "Maria", "Santos", "dr.maria.santos@clinic.com", "general_practice", "123456")?,
        provider("provider-2", "Carlos", "Oliveira", "dr.carlos.oliveira@clinic.com", "cardiology", "654321")?,
    ];

    let now = Utc::now();
    let upcoming = TimeSlot::create(now + Duration::hours(1), now + Duration::hours(2))?;
    let later = TimeSlot::create(now + Duration::hours(3), now + Duration::hours(4))?;
    let earlier = TimeSlot::create(now - Duration::hours(2), now - Duration::hours(1))?;

    let mut past = appointment(&patients[0], &providers[1], earlier, "Routine examination");
    past.start_appointment(providers[1].id())?;
    past.complete_appointment(providers[1].id(), Some("Patient is in good health"))?;

    let appointments = vec![
        appointment(&patients[0], &providers[0], upcoming, "Annual checkup"),
        appointment(&patients[1], &providers[0], later, "Follow-up consultation"),
        past,
    ];

    info!(
        "Seeding {} patients, {} providers, {} appointments",
        patients.len(),
        providers.len(),
        appointments.len()
    );

    log_demo_tokens(&patients, &providers, config)?;

    repositories.patients.seed(patients).await;
    repositories.providers.seed(providers).await;
    repositories.appointments.seed(appointments).await;

    Ok(())
}

fn log_demo_tokens(patients: &[Patient], providers: &[Provider], config: &AppConfig) -> Result<()> {
    if !config.is_configured() {
        warn!("JWT_SECRET not set, demo tokens will not be issued");
        return Ok(());
    }

    let mut actors: Vec<(String, String, String, UserRole)> = Vec::new();
    for p in patients {
        actors.push((p.id().to_string(), p.email().to_string(), p.full_name(), UserRole::Patient));
    }
    for p in providers {
        actors.push((p.id().to_string(), p.email().to_string(), p.full_name(), UserRole::Provider));
    }
    actors.push(("admin-1".into(), "admin@clinic.com".into(), "Clinic Admin".into(), UserRole::Admin));

    let now = Utc::now();
    for (entity_id, email, name, role) in actors {
        let claims = TokenClaims {
            sub: format!("user-{}", entity_id),
            email,
            name: name.clone(),
            role,
            entity_id,
            exp: Some((now + Duration::hours(DEMO_TOKEN_HOURS)).timestamp() as u64),
            iat: Some(now.timestamp() as u64),
        };
        let token = sign_token(&claims, &config.jwt_secret).map_err(|e| anyhow!(e))?;
        info!("Demo token for {} ({}): {}", name, role, token);
    }

    Ok(())
}
