use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_models::contact::{Email, Phone};
use shared_models::error::{AppError, AuthorizationError, NotFoundError, RepositoryError, ValidationError};
use shared_models::UniqueId;

// ==============================================================================
// VALUE OBJECTS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    GeneralPractice,
    Cardiology,
    Dermatology,
    Endocrinology,
    Gastroenterology,
    Gynecology,
    Neurology,
    Ophthalmology,
    Orthopedics,
    Pediatrics,
    Psychiatry,
    Urology,
}

impl Specialty {
    pub const ALL: [Specialty; 12] = [
        Specialty::GeneralPractice,
        Specialty::Cardiology,
        Specialty::Dermatology,
        Specialty::Endocrinology,
        Specialty::Gastroenterology,
        Specialty::Gynecology,
        Specialty::Neurology,
        Specialty::Ophthalmology,
        Specialty::Orthopedics,
        Specialty::Pediatrics,
        Specialty::Psychiatry,
        Specialty::Urology,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Specialty::GeneralPractice => "general_practice",
            Specialty::Cardiology => "cardiology",
            Specialty::Dermatology => "dermatology",
            Specialty::Endocrinology => "endocrinology",
            Specialty::Gastroenterology => "gastroenterology",
            Specialty::Gynecology => "gynecology",
            Specialty::Neurology => "neurology",
            Specialty::Ophthalmology => "ophthalmology",
            Specialty::Orthopedics => "orthopedics",
            Specialty::Pediatrics => "pediatrics",
            Specialty::Psychiatry => "psychiatry",
            Specialty::Urology => "urology",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Specialty::GeneralPractice => "General Practice",
            Specialty::Cardiology => "Cardiology",
            Specialty::Dermatology => "Dermatology",
            Specialty::Endocrinology => "Endocrinology",
            Specialty::Gastroenterology => "Gastroenterology",
            Specialty::Gynecology => "Gynecology",
            Specialty::Neurology => "Neurology",
            Specialty::Ophthalmology => "Ophthalmology",
            Specialty::Orthopedics => "Orthopedics",
            Specialty::Pediatrics => "Pediatrics",
            Specialty::Psychiatry => "Psychiatry",
            Specialty::Urology => "Urology",
        }
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Specialty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Specialty::ALL
            .into_iter()
            .find(|specialty| specialty.as_str() == s)
            .ok_or_else(|| ValidationError::new("specialty", format!("Invalid specialty: {}", s)))
    }
}

/// Medical license: registration number plus two-letter issuing state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseNumber {
    number: String,
    state: String,
}

impl LicenseNumber {
    pub fn new(number: &str, state: &str) -> Result<Self, ValidationError> {
        let number = number.trim();
        let state = state.trim().to_uppercase();

        if number.is_empty() {
            return Err(ValidationError::new("license_number", "License number is required"));
        }
        if !(4..=10).contains(&number.chars().count()) {
            return Err(ValidationError::new(
                "license_number",
                "License number must be between 4 and 10 characters",
            ));
        }
        if state.is_empty() {
            return Err(ValidationError::new("license_state", "License state is required"));
        }
        if state.chars().count() != 2 {
            return Err(ValidationError::new("license_state", "License state must be a 2-letter code"));
        }

        Ok(Self {
            number: number.to_string(),
            state,
        })
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn formatted(&self) -> String {
        format!("CRM/{} {}", self.state, self.number)
    }
}

impl fmt::Display for LicenseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl Serialize for LicenseNumber {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.formatted())
    }
}

// ==============================================================================
// PROVIDER ENTITY
// ==============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Provider {
    id: UniqueId,
    first_name: String,
    last_name: String,
    email: Email,
    phone: Phone,
    specialty: Specialty,
    license_number: LicenseNumber,
    clinic_id: UniqueId,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProvider {
    pub id: Option<UniqueId>,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: Phone,
    pub specialty: Specialty,
    pub license_number: LicenseNumber,
    pub clinic_id: UniqueId,
}

impl Provider {
    /// New providers start out active.
    pub fn create(props: NewProvider) -> Self {
        let now = Utc::now();
        Self {
            id: props.id.unwrap_or_else(UniqueId::generate),
            first_name: props.first_name.trim().to_string(),
            last_name: props.last_name.trim().to_string(),
            email: props.email,
            phone: props.phone,
            specialty: props.specialty,
            license_number: props.license_number,
            clinic_id: props.clinic_id,
            is_active: true,
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
        format!("Dr. {} {}", self.first_name, self.last_name)
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn phone(&self) -> &Phone {
        &self.phone
    }

    pub fn specialty(&self) -> Specialty {
        self.specialty
    }

    pub fn license_number(&self) -> &LicenseNumber {
        &self.license_number
    }

    pub fn clinic_id(&self) -> &UniqueId {
        &self.clinic_id
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn activate(&mut self) {
        self.is_active = true;
        self.updated_at = Utc::now();
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
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
pub struct CreateProviderRequest {
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub specialty: String,
    pub license_number: String,
    pub license_state: String,
    pub clinic_id: String,
}

impl CreateProviderRequest {
    pub fn validate(self) -> Result<NewProvider, ValidationError> {
        if self.first_name.trim().is_empty() {
            return Err(ValidationError::new("first_name", "First name is required"));
        }
        if self.last_name.trim().is_empty() {
            return Err(ValidationError::new("last_name", "Last name is required"));
        }
        if self.clinic_id.trim().is_empty() {
            return Err(ValidationError::new("clinic_id", "Clinic is required"));
        }

        Ok(NewProvider {
            id: self.id.map(UniqueId::from),
            first_name: self.first_name,
            last_name: self.last_name,
            email: Email::parse(&self.email)?,
            phone: Phone::parse(&self.phone)?,
            specialty: self.specialty.parse()?,
            license_number: LicenseNumber::new(&self.license_number, &self.license_state)?,
            clinic_id: UniqueId::new(self.clinic_id.trim()),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderFilters {
    pub clinic_id: Option<String>,
    pub specialty: Option<Specialty>,
    pub is_active: Option<bool>,
    pub name: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Validation(e) => e.into(),
            ProviderError::NotFound(e) => e.into(),
            ProviderError::Authorization(e) => e.into(),
            ProviderError::Repository(e) => e.into(),
        }
    }
}
