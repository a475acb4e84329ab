use std::sync::Arc;

use tracing::{info, warn};

use shared_models::auth::AuthenticatedUser;
use shared_models::UniqueId;

use crate::error::AppointmentError;
use crate::models::Appointment;
use crate::repository::AppointmentRepository;
use crate::services::authorization::{authorize_cancel, authorize_clinical_action};
use crate::services::load_appointment;
use crate::services::locks::SchedulingLocks;

/// Start, complete and cancel. Each holds the appointment lock across
/// load, mutate and save; transition legality is left to the entity.
pub struct AppointmentLifecycleService {
    appointments: Arc<dyn AppointmentRepository>,
    locks: Arc<SchedulingLocks>,
}

impl AppointmentLifecycleService {
    pub fn new(appointments: Arc<dyn AppointmentRepository>, locks: Arc<SchedulingLocks>) -> Self {
        Self { appointments, locks }
    }

    pub async fn start_appointment(
        &self,
        appointment_id: &UniqueId,
        actor: &AuthenticatedUser,
    ) -> Result<Appointment, AppointmentError> {
        let _guard = self.locks.lock_appointment(appointment_id).await;
        let mut appointment = load_appointment(self.appointments.as_ref(), appointment_id).await?;

        authorize_clinical_action(actor, "start")?;

        if let Err(e) = appointment.start_appointment(actor.entity_id()) {
            warn!("Start of appointment {} by {} rejected: {}", appointment_id, actor.id(), e);
            return Err(e.into());
        }

        self.appointments.save(&appointment).await?;

        info!("Appointment {} started by provider {}", appointment.id(), actor.entity_id());
        Ok(appointment)
    }

    pub async fn complete_appointment(
        &self,
        appointment_id: &UniqueId,
        notes: Option<String>,
        actor: &AuthenticatedUser,
    ) -> Result<Appointment, AppointmentError> {
        let _guard = self.locks.lock_appointment(appointment_id).await;
        let mut appointment = load_appointment(self.appointments.as_ref(), appointment_id).await?;

        authorize_clinical_action(actor, "complete")?;

        if let Err(e) = appointment.complete_appointment(actor.entity_id(), notes.as_deref()) {
            warn!("Completion of appointment {} by {} rejected: {}", appointment_id, actor.id(), e);
            return Err(e.into());
        }

        self.appointments.save(&appointment).await?;

        info!("Appointment {} completed by provider {}", appointment.id(), actor.entity_id());
        Ok(appointment)
    }

    pub async fn cancel_appointment(
        &self,
        appointment_id: &UniqueId,
        actor: &AuthenticatedUser,
    ) -> Result<Appointment, AppointmentError> {
        let _guard = self.locks.lock_appointment(appointment_id).await;
        let mut appointment = load_appointment(self.appointments.as_ref(), appointment_id).await?;

        if let Err(e) = authorize_cancel(actor, appointment.patient_id()) {
            warn!("Cancellation of {} refused for {}: {}", appointment_id, actor.id(), e);
            return Err(e.into());
        }

        if let Err(e) = appointment.cancel() {
            warn!("Cancellation of appointment {} rejected: {}", appointment_id, e);
            return Err(e.into());
        }

        self.appointments.save(&appointment).await?;

        info!("Appointment {} cancelled by {} ({})", appointment.id(), actor.id(), actor.role());
        Ok(appointment)
    }
}
