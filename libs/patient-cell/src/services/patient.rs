use std::sync::Arc;

use tracing::{debug, info, warn};

use shared_models::auth::AuthenticatedUser;
use shared_models::contact::{Email, Phone};
use shared_models::error::{AuthorizationError, NotFoundError, ValidationError};
use shared_models::UniqueId;

use crate::models::{CreatePatientRequest, Patient, PatientError, PatientFilters, UpdateContactRequest};
use crate::repository::PatientRepository;

pub struct PatientService {
    patients: Arc<dyn PatientRepository>,
}

impl PatientService {
    pub fn new(patients: Arc<dyn PatientRepository>) -> Self {
        Self { patients }
    }

    pub async fn register_patient(
        &self,
        request: CreatePatientRequest,
        actor: &AuthenticatedUser,
    ) -> Result<Patient, PatientError> {
        if !actor.has_permission("patient:create") {
            warn!("User {} ({}) attempted to register a patient", actor.id(), actor.role());
            return Err(AuthorizationError::new("Only admins can register patients").into());
        }

        let new_patient = request.validate()?;
        debug!("Registering patient with email {}", new_patient.email);

        if self.patients.find_by_email(new_patient.email.as_str()).await?.is_some() {
            return Err(ValidationError::new("email", "A patient with this email already exists").into());
        }

        let patient = Patient::create(new_patient);
        self.patients.save(&patient).await?;

        info!("Patient {} registered", patient.id());
        Ok(patient)
    }

    pub async fn get_patient(
        &self,
        patient_id: &UniqueId,
        actor: &AuthenticatedUser,
    ) -> Result<Patient, PatientError> {
        let patient = self
            .patients
            .find_by_id(patient_id)
            .await?
            .ok_or_else(|| NotFoundError::new("Patient", patient_id))?;

        if !actor.can_access_patient(patient.id()) {
            return Err(AuthorizationError::new("You can only view your own patient record").into());
        }

        Ok(patient)
    }

    pub async fn search_patients(
        &self,
        filters: PatientFilters,
        actor: &AuthenticatedUser,
    ) -> Result<Vec<Patient>, PatientError> {
        if !actor.has_permission("patient:view_all") {
            return Err(AuthorizationError::new("Only admins can search patients").into());
        }

        Ok(self.patients.find_all(&filters).await?)
    }

    pub async fn update_contact_info(
        &self,
        patient_id: &UniqueId,
        request: UpdateContactRequest,
        actor: &AuthenticatedUser,
    ) -> Result<Patient, PatientError> {
        let mut patient = self
            .patients
            .find_by_id(patient_id)
            .await?
            .ok_or_else(|| NotFoundError::new("Patient", patient_id))?;

        let allowed = actor.has_permission("patient:update_all")
            || (actor.has_permission("patient:update_own") && actor.entity_id() == patient.id());
        if !allowed {
            return Err(AuthorizationError::new("You can only update your own contact details").into());
        }

        let email = Email::parse(&request.email)?;
        let phone = Phone::parse(&request.phone)?;

        if let Some(other) = self.patients.find_by_email(email.as_str()).await? {
            if other.id() != patient.id() {
                return Err(ValidationError::new("email", "A patient with this email already exists").into());
            }
        }

        patient.update_contact_info(email, phone);
        self.patients.save(&patient).await?;

        info!("Patient {} contact info updated", patient.id());
        Ok(patient)
    }
}
