use async_trait::async_trait;

use shared_config::AppConfig;
use shared_database::MemoryTable;
use shared_models::error::RepositoryError;
use shared_models::UniqueId;

use crate::models::{Provider, ProviderFilters, Specialty};

#[async_trait]
pub trait ProviderRepository: Send + Sync {
    async fn find_by_id(&self, id: &UniqueId) -> Result<Option<Provider>, RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Provider>, RepositoryError>;
    async fn find_by_clinic(&self, clinic_id: &UniqueId) -> Result<Vec<Provider>, RepositoryError>;
    async fn find_by_specialty(&self, specialty: Specialty) -> Result<Vec<Provider>, RepositoryError>;
    async fn find_all(&self, filters: &ProviderFilters) -> Result<Vec<Provider>, RepositoryError>;
    async fn save(&self, provider: &Provider) -> Result<(), RepositoryError>;
    async fn delete(&self, id: &UniqueId) -> Result<(), RepositoryError>;
    async fn exists(&self, id: &UniqueId) -> Result<bool, RepositoryError>;
}

pub struct InMemoryProviderRepository {
    table: MemoryTable<Provider>,
}

impl InMemoryProviderRepository {
    pub fn new() -> Self {
        Self {
            table: MemoryTable::new("providers"),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            table: MemoryTable::from_config("providers", config),
        }
    }

    pub async fn seed(&self, providers: Vec<Provider>) {
        for provider in providers {
            self.table.upsert(provider.id().clone(), provider).await;
        }
    }
}

impl Default for InMemoryProviderRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn sorted_by_name(mut providers: Vec<Provider>) -> Vec<Provider> {
    providers.sort_by_key(|p| p.full_name());
    providers
}

#[async_trait]
impl ProviderRepository for InMemoryProviderRepository {
    async fn find_by_id(&self, id: &UniqueId) -> Result<Option<Provider>, RepositoryError> {
        Ok(self.table.get(id).await)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Provider>, RepositoryError> {
        let email = email.trim().to_lowercase();
        Ok(self.table.find(|p| p.email().as_str() == email).await)
    }

    async fn find_by_clinic(&self, clinic_id: &UniqueId) -> Result<Vec<Provider>, RepositoryError> {
        Ok(sorted_by_name(self.table.filter(|p| p.clinic_id() == clinic_id).await))
    }

    async fn find_by_specialty(&self, specialty: Specialty) -> Result<Vec<Provider>, RepositoryError> {
        Ok(sorted_by_name(self.table.filter(|p| p.specialty() == specialty).await))
    }

    async fn find_all(&self, filters: &ProviderFilters) -> Result<Vec<Provider>, RepositoryError> {
        let name = filters.name.as_ref().map(|n| n.to_lowercase());

        let results = self
            .table
            .filter(|p| {
                filters.clinic_id.as_deref().map_or(true, |c| p.clinic_id().as_str() == c)
                    && filters.specialty.map_or(true, |s| p.specialty() == s)
                    && filters.is_active.map_or(true, |active| p.is_active() == active)
                    && name
                        .as_ref()
                        .map_or(true, |n| p.full_name().to_lowercase().contains(n.as_str()))
            })
            .await;

        Ok(sorted_by_name(results))
    }

    async fn save(&self, provider: &Provider) -> Result<(), RepositoryError> {
        self.table.upsert(provider.id().clone(), provider.clone()).await;
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
