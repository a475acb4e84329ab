use std::sync::Arc;

use tracing::debug;

use shared_models::auth::{AuthenticatedUser, UserRole};
use shared_models::UniqueId;

use crate::error::AppointmentError;
use crate::models::{Appointment, AppointmentFilters};
use crate::repository::AppointmentRepository;
use crate::services::authorization::authorize_view;
use crate::services::load_appointment;

pub struct AppointmentQueryService {
    appointments: Arc<dyn AppointmentRepository>,
}

impl AppointmentQueryService {
    pub fn new(appointments: Arc<dyn AppointmentRepository>) -> Self {
        Self { appointments }
    }

    /// Admins see every appointment; patients and providers only their own,
    /// whatever the filters ask for.
    pub async fn appointments_for_actor(
        &self,
        mut filters: AppointmentFilters,
        actor: &AuthenticatedUser,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        match actor.role() {
            UserRole::Admin => {}
            UserRole::Provider => filters.provider_id = Some(actor.entity_id().to_string()),
            UserRole::Patient => filters.patient_id = Some(actor.entity_id().to_string()),
        }

        debug!("Listing appointments for {} ({}) with {:?}", actor.id(), actor.role(), filters);
        Ok(self.appointments.find_all(&filters).await?)
    }

    pub async fn get_appointment(
        &self,
        appointment_id: &UniqueId,
        actor: &AuthenticatedUser,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = load_appointment(self.appointments.as_ref(), appointment_id).await?;
        authorize_view(actor, appointment.patient_id(), appointment.provider_id())?;
        Ok(appointment)
    }
}
