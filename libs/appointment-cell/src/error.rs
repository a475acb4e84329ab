use thiserror::Error;

use shared_models::error::{AppError, AuthorizationError, NotFoundError, RepositoryError, ValidationError};

use crate::models::AppointmentStatus;

/// Illegal edge in the status graph. The entity is left unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Cannot transition appointment from \"{from}\" to \"{to}\"")]
pub struct InvalidStatusTransition {
    pub from: AppointmentStatus,
    pub to: AppointmentStatus,
}

/// Clinical status change attempted by someone other than the assigned provider.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Only the assigned provider can update clinical status")]
pub struct ProviderRequired;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    #[error(transparent)]
    InvalidTransition(#[from] InvalidStatusTransition),

    #[error(transparent)]
    ProviderRequired(#[from] ProviderRequired),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppointmentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error(transparent)]
    InvalidStatusTransition(#[from] InvalidStatusTransition),

    #[error(transparent)]
    ProviderRequired(#[from] ProviderRequired),

    #[error("Provider already has an appointment scheduled for this time slot")]
    Conflict,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AppointmentError {
    pub fn code(&self) -> &'static str {
        match self {
            AppointmentError::Validation(_) => "VALIDATION_ERROR",
            AppointmentError::NotFound(_) => "NOT_FOUND",
            AppointmentError::Authorization(_) => "AUTHORIZATION_ERROR",
            AppointmentError::InvalidStatusTransition(_) => "INVALID_STATUS_TRANSITION",
            AppointmentError::ProviderRequired(_) => "PROVIDER_REQUIRED",
            AppointmentError::Conflict => "APPOINTMENT_CONFLICT",
            AppointmentError::Repository(_) => "REPOSITORY_ERROR",
        }
    }
}

impl From<LifecycleError> for AppointmentError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::InvalidTransition(e) => e.into(),
            LifecycleError::ProviderRequired(e) => e.into(),
        }
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::Validation(e) => e.into(),
            AppointmentError::NotFound(e) => e.into(),
            AppointmentError::Authorization(e) => e.into(),
            AppointmentError::ProviderRequired(e) => AppError::Forbidden(e.to_string()),
            AppointmentError::InvalidStatusTransition(e) => AppError::Conflict(e.to_string()),
            AppointmentError::Conflict => AppError::Conflict(err.to_string()),
            AppointmentError::Repository(e) => e.into(),
        }
    }
}
