use async_trait::async_trait;

use shared_config::AppConfig;
use shared_database::MemoryTable;
use shared_models::error::RepositoryError;
use shared_models::UniqueId;

use crate::models::{Patient, PatientFilters};

#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn find_by_id(&self, id: &UniqueId) -> Result<Option<Patient>, RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Patient>, RepositoryError>;
    async fn find_all(&self, filters: &PatientFilters) -> Result<Vec<Patient>, RepositoryError>;
    async fn save(&self, patient: &Patient) -> Result<(), RepositoryError>;
    async fn delete(&self, id: &UniqueId) -> Result<(), RepositoryError>;
    async fn exists(&self, id: &UniqueId) -> Result<bool, RepositoryError>;
}

pub struct InMemoryPatientRepository {
    table: MemoryTable<Patient>,
}

impl InMemoryPatientRepository {
    pub fn new() -> Self {
        Self {
            table: MemoryTable::new("patients"),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            table: MemoryTable::from_config("patients", config),
        }
    }

    pub async fn seed(&self, patients: Vec<Patient>) {
        for patient in patients {
            self.table.upsert(patient.id().clone(), patient).await;
        }
    }
}

impl Default for InMemoryPatientRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PatientRepository for InMemoryPatientRepository {
    async fn find_by_id(&self, id: &UniqueId) -> Result<Option<Patient>, RepositoryError> {
        Ok(self.table.get(id).await)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Patient>, RepositoryError> {
        let email = email.trim().to_lowercase();
        Ok(self.table.find(|p| p.email().as_str() == email).await)
    }

    async fn find_all(&self, filters: &PatientFilters) -> Result<Vec<Patient>, RepositoryError> {
        let email = filters.email.as_ref().map(|e| e.to_lowercase());
        let name = filters.name.as_ref().map(|n| n.to_lowercase());

        let mut results = self
            .table
            .filter(|p| {
                let email_ok = email
                    .as_ref()
                    .map_or(true, |e| p.email().as_str().contains(e.as_str()));
                let name_ok = name
                    .as_ref()
                    .map_or(true, |n| p.full_name().to_lowercase().contains(n.as_str()));
                email_ok && name_ok
            })
            .await;

        results.sort_by_key(|p| p.full_name());
        Ok(results)
    }

    async fn save(&self, patient: &Patient) -> Result<(), RepositoryError> {
        self.table.upsert(patient.id().clone(), patient.clone()).await;
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
