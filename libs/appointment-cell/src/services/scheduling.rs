use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use patient_cell::PatientRepository;
use provider_cell::ProviderRepository;
use shared_models::auth::AuthenticatedUser;
use shared_models::error::{NotFoundError, ValidationError};
use shared_models::UniqueId;

use crate::error::AppointmentError;
use crate::models::{Appointment, NewAppointment, RescheduleAppointmentRequest, ScheduleAppointmentRequest, TimeSlot};
use crate::repository::AppointmentRepository;
use crate::services::authorization::{authorize_reschedule, authorize_schedule};
use crate::services::load_appointment;
use crate::services::locks::SchedulingLocks;

pub struct AppointmentSchedulingService {
    appointments: Arc<dyn AppointmentRepository>,
    patients: Arc<dyn PatientRepository>,
    providers: Arc<dyn ProviderRepository>,
    locks: Arc<SchedulingLocks>,
}

impl AppointmentSchedulingService {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        patients: Arc<dyn PatientRepository>,
        providers: Arc<dyn ProviderRepository>,
        locks: Arc<SchedulingLocks>,
    ) -> Self {
        Self {
            appointments,
            patients,
            providers,
            locks,
        }
    }

    /// Books a slot with a provider. Fails on the first broken rule, in order:
    /// authorization, time slot, reason, patient, provider, conflict.
    #[instrument(skip(self, request, actor), fields(actor = %actor.id(), provider_id = %request.provider_id))]
    pub async fn schedule_appointment(
        &self,
        request: ScheduleAppointmentRequest,
        actor: &AuthenticatedUser,
    ) -> Result<Appointment, AppointmentError> {
        let patient_id = UniqueId::new(request.patient_id.trim());
        let provider_id = UniqueId::new(request.provider_id.trim());

        if let Err(e) = authorize_schedule(actor, &patient_id) {
            warn!("Scheduling refused for {}: {}", actor.id(), e);
            return Err(e.into());
        }

        let time_slot = TimeSlot::parse(&request.start_time, &request.end_time)?;

        if request.reason.trim().is_empty() {
            return Err(ValidationError::new("reason", "Reason is required").into());
        }
        if request.clinic_id.trim().is_empty() {
            return Err(ValidationError::new("clinic_id", "Clinic is required").into());
        }

        if self.patients.find_by_id(&patient_id).await?.is_none() {
            return Err(NotFoundError::new("Patient", &patient_id).into());
        }

        let provider = self
            .providers
            .find_by_id(&provider_id)
            .await?
            .ok_or_else(|| NotFoundError::new("Provider", &provider_id))?;

        if !provider.is_active() {
            return Err(ValidationError::new("provider", "Provider is not active").into());
        }

        let _guard = self.locks.lock_provider(&provider_id).await;

        let existing = self
            .appointments
            .find_by_provider_and_date_range(&provider_id, time_slot.start_time(), time_slot.end_time())
            .await?;
        debug!("{} active bookings intersect {}", existing.len(), time_slot);

        let appointment = Appointment::create(NewAppointment {
            id: None,
            patient_id,
            provider_id,
            clinic_id: UniqueId::new(request.clinic_id.trim()),
            time_slot,
            reason: request.reason,
        });

        if existing.iter().any(|other| appointment.overlaps(other)) {
            warn!("Provider {} is already booked during {}", appointment.provider_id(), time_slot);
            return Err(AppointmentError::Conflict);
        }

        self.appointments.save(&appointment).await?;

        info!(
            "Appointment {} scheduled for patient {} with provider {} ({})",
            appointment.id(),
            appointment.patient_id(),
            appointment.provider_id(),
            time_slot
        );
        Ok(appointment)
    }

    /// Moves a scheduled appointment to a new slot, subject to the same
    /// rule as cancelling and the same conflict check as booking.
    #[instrument(skip(self, request, actor), fields(actor = %actor.id()))]
    pub async fn reschedule_appointment(
        &self,
        appointment_id: &UniqueId,
        request: RescheduleAppointmentRequest,
        actor: &AuthenticatedUser,
    ) -> Result<Appointment, AppointmentError> {
        let current = load_appointment(self.appointments.as_ref(), appointment_id).await?;

        if let Err(e) = authorize_reschedule(actor, current.patient_id()) {
            warn!("Reschedule of {} refused for {}: {}", appointment_id, actor.id(), e);
            return Err(e.into());
        }

        let time_slot = TimeSlot::parse(&request.start_time, &request.end_time)?;

        let _provider_guard = self.locks.lock_provider(current.provider_id()).await;
        let _appointment_guard = self.locks.lock_appointment(appointment_id).await;

        let mut appointment = load_appointment(self.appointments.as_ref(), appointment_id).await?;
        appointment.reschedule(time_slot)?;

        let existing = self
            .appointments
            .find_by_provider_and_date_range(appointment.provider_id(), time_slot.start_time(), time_slot.end_time())
            .await?;

        if existing
            .iter()
            .any(|other| other.id() != appointment.id() && appointment.overlaps(other))
        {
            warn!("Provider {} is already booked during {}", appointment.provider_id(), time_slot);
            return Err(AppointmentError::Conflict);
        }

        self.appointments.save(&appointment).await?;

        info!("Appointment {} rescheduled to {}", appointment.id(), time_slot);
        Ok(appointment)
    }
}
