pub mod authorization;
pub mod lifecycle;
pub mod locks;
pub mod query;
pub mod scheduling;

use shared_models::error::NotFoundError;
use shared_models::UniqueId;

use crate::error::AppointmentError;
use crate::models::Appointment;
use crate::repository::AppointmentRepository;

pub use lifecycle::AppointmentLifecycleService;
pub use locks::SchedulingLocks;
pub use query::AppointmentQueryService;
pub use scheduling::AppointmentSchedulingService;

pub(crate) async fn load_appointment(
    appointments: &dyn AppointmentRepository,
    appointment_id: &UniqueId,
) -> Result<Appointment, AppointmentError> {
    appointments
        .find_by_id(appointment_id)
        .await?
        .ok_or_else(|| NotFoundError::new("Appointment", appointment_id).into())
}
