//! Per-operation authorization rules, each a plain predicate over the actor
//! and the ids of the records it targets.

use shared_models::auth::AuthenticatedUser;
use shared_models::error::AuthorizationError;
use shared_models::UniqueId;

/// Patients book only for themselves; admins book for anyone.
pub fn authorize_schedule(actor: &AuthenticatedUser, patient_id: &UniqueId) -> Result<(), AuthorizationError> {
    if !actor.is_admin() && !actor.is_patient() {
        return Err(AuthorizationError::new("Only patients or admins can schedule appointments"));
    }

    if actor.is_patient() && actor.entity_id() != patient_id {
        return Err(AuthorizationError::new(
            "Patients can only schedule appointments for themselves",
        ));
    }

    Ok(())
}

/// Owning patient or admin. Providers cannot cancel.
pub fn authorize_cancel(actor: &AuthenticatedUser, patient_id: &UniqueId) -> Result<(), AuthorizationError> {
    if actor.is_patient() {
        if actor.entity_id() != patient_id {
            return Err(AuthorizationError::new("Patients can only cancel their own appointments"));
        }
    } else if !actor.is_admin() {
        return Err(AuthorizationError::new("Only patients or admins can cancel appointments"));
    }

    Ok(())
}

pub fn authorize_reschedule(actor: &AuthenticatedUser, patient_id: &UniqueId) -> Result<(), AuthorizationError> {
    if actor.is_patient() {
        if actor.entity_id() != patient_id {
            return Err(AuthorizationError::new(
                "Patients can only reschedule their own appointments",
            ));
        }
    } else if !actor.is_admin() {
        return Err(AuthorizationError::new("Only patients or admins can reschedule appointments"));
    }

    Ok(())
}

/// Start and complete are clinical actions, so admins are refused too.
/// Whether the provider is the assigned one is checked by the appointment.
pub fn authorize_clinical_action(actor: &AuthenticatedUser, action: &str) -> Result<(), AuthorizationError> {
    if !actor.is_provider() {
        return Err(AuthorizationError::new(format!("Only providers can {} appointments", action)));
    }

    Ok(())
}

pub fn authorize_view(
    actor: &AuthenticatedUser,
    patient_id: &UniqueId,
    provider_id: &UniqueId,
) -> Result<(), AuthorizationError> {
    if !actor.can_access_appointment(patient_id, provider_id) {
        return Err(AuthorizationError::new("You do not have access to this appointment"));
    }

    Ok(())
}
