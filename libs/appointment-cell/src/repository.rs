use async_trait::async_trait;
use chrono::{DateTime, Utc};

use shared_config::AppConfig;
use shared_database::MemoryTable;
use shared_models::error::RepositoryError;
use shared_models::UniqueId;

use crate::models::{Appointment, AppointmentFilters, AppointmentStatus};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn find_by_id(&self, id: &UniqueId) -> Result<Option<Appointment>, RepositoryError>;
    async fn find_by_patient(&self, patient_id: &UniqueId) -> Result<Vec<Appointment>, RepositoryError>;
    async fn find_by_provider(&self, provider_id: &UniqueId) -> Result<Vec<Appointment>, RepositoryError>;

    /// Non-cancelled appointments of the provider intersecting `[start, end)`.
    async fn find_by_provider_and_date_range(
        &self,
        provider_id: &UniqueId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, RepositoryError>;

    /// Sorted by slot start.
    async fn find_all(&self, filters: &AppointmentFilters) -> Result<Vec<Appointment>, RepositoryError>;
    async fn save(&self, appointment: &Appointment) -> Result<(), RepositoryError>;
    async fn delete(&self, id: &UniqueId) -> Result<(), RepositoryError>;
    async fn exists(&self, id: &UniqueId) -> Result<bool, RepositoryError>;
}

pub struct InMemoryAppointmentRepository {
    table: MemoryTable<Appointment>,
}

impl InMemoryAppointmentRepository {
    pub fn new() -> Self {
        Self {
            table: MemoryTable::new("appointments"),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            table: MemoryTable::from_config("appointments", config),
        }
    }

    pub async fn seed(&self, appointments: Vec<Appointment>) {
        for appointment in appointments {
            self.table.upsert(appointment.id().clone(), appointment).await;
        }
    }

    pub async fn clear(&self) {
        self.table.clear().await;
    }
}

impl Default for InMemoryAppointmentRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn by_start_time(mut appointments: Vec<Appointment>) -> Vec<Appointment> {
    appointments.sort_by_key(|a| a.time_slot().start_time());
    appointments
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn find_by_id(&self, id: &UniqueId) -> Result<Option<Appointment>, RepositoryError> {
        Ok(self.table.get(id).await)
    }

    async fn find_by_patient(&self, patient_id: &UniqueId) -> Result<Vec<Appointment>, RepositoryError> {
        Ok(by_start_time(self.table.filter(|a| a.patient_id() == patient_id).await))
    }

    async fn find_by_provider(&self, provider_id: &UniqueId) -> Result<Vec<Appointment>, RepositoryError> {
        Ok(by_start_time(self.table.filter(|a| a.provider_id() == provider_id).await))
    }

    async fn find_by_provider_and_date_range(
        &self,
        provider_id: &UniqueId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, RepositoryError> {
        let results = self
            .table
            .filter(|a| {
                a.provider_id() == provider_id
                    && a.status() != AppointmentStatus::Cancelled
                    && a.time_slot().start_time() < end
                    && a.time_slot().end_time() > start
            })
            .await;

        Ok(by_start_time(results))
    }

    async fn find_all(&self, filters: &AppointmentFilters) -> Result<Vec<Appointment>, RepositoryError> {
        Ok(by_start_time(self.table.filter(|a| filters.matches(a)).await))
    }

    async fn save(&self, appointment: &Appointment) -> Result<(), RepositoryError> {
        self.table.upsert(appointment.id().clone(), appointment.clone()).await;
        Ok(())
    }

    async fn delete(&self, id: &UniqueId) -> Result<(), RepositoryError> {
        self.table.remove(id).await;
        Ok(())
    }

    async fn exists(&self, id: &UniqueId) -> Result<bool, RepositoryError> {
        Ok(self.table.contains(id).await)
    }
}
