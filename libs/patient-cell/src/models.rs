use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_models::contact::{DateOfBirth, Email, Phone};
use shared_models::error::{AppError, AuthorizationError, NotFoundError, RepositoryError, ValidationError};
use shared_models::UniqueId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotToSay,
}

#[derive(Debug, Clone, Serialize)]
pub struct Patient {
    id: UniqueId,
    first_name: String,
    last_name: String,
    email: Email,
    phone: Phone,
    date_of_birth: DateOfBirth,
    gender: Gender,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Validated input for [`Patient::create`].
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub id: Option<UniqueId>,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: Phone,
    pub date_of_birth: DateOfBirth,
    pub gender: Gender,
}

impl Patient {
    pub fn create(props: NewPatient) -> Self {
        let now = Utc::now();
        Self {
            id: props.id.unwrap_or_else(UniqueId::generate),
            first_name: props.first_name.trim().to_string(),
            last_name: props.last_name.trim().to_string(),
            email: props.email,
            phone: props.phone,
            date_of_birth: props.date_of_birth,
            gender: props.gender,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &UniqueId {
        &self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn phone(&self) -> &Phone {
        &self.phone
    }

    pub fn date_of_birth(&self) -> DateOfBirth {
        self.date_of_birth
    }

    pub fn age(&self) -> u32 {
        self.date_of_birth.age()
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn update_contact_info(&mut self, email: Email, phone: Phone) {
        self.email = email;
        self.phone = phone;
        self.updated_at = Utc::now();
    }
}

// ==============================================================================
// REQUEST/QUERY MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub gender: Gender,
}

impl CreatePatientRequest {
    pub fn validate(self) -> Result<NewPatient, ValidationError> {
        if self.first_name.trim().is_empty() {
            return Err(ValidationError::new("first_name", "First name is required"));
        }
        if self.last_name.trim().is_empty() {
            return Err(ValidationError::new("last_name", "Last name is required"));
        }

        Ok(NewPatient {
            id: self.id.map(UniqueId::from),
            first_name: self.first_name,
            last_name: self.last_name,
            email: Email::parse(&self.email)?,
            phone: Phone::parse(&self.phone)?,
            date_of_birth: DateOfBirth::parse(&self.date_of_birth)?,
            gender: self.gender,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateContactRequest {
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientFilters {
    pub email: Option<String>,
    pub name: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::Validation(e) => e.into(),
            PatientError::NotFound(e) => e.into(),
            PatientError::Authorization(e) => e.into(),
            PatientError::Repository(e) => e.into(),
        }
    }
}
