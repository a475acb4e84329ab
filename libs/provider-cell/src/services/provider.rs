use std::sync::Arc;

use tracing::{debug, info, warn};

use shared_models::auth::AuthenticatedUser;
use shared_models::error::{AuthorizationError, NotFoundError, ValidationError};
use shared_models::UniqueId;

use crate::models::{CreateProviderRequest, Provider, ProviderError, ProviderFilters};
use crate::repository::ProviderRepository;

pub struct ProviderService {
    providers: Arc<dyn ProviderRepository>,
}

impl ProviderService {
    pub fn new(providers: Arc<dyn ProviderRepository>) -> Self {
        Self { providers }
    }

    pub async fn register_provider(
        &self,
        request: CreateProviderRequest,
        actor: &AuthenticatedUser,
    ) -> Result<Provider, ProviderError> {
        if !actor.has_permission("provider:create") {
            warn!("User {} ({}) attempted to register a provider", actor.id(), actor.role());
            return Err(AuthorizationError::new("Only admins can register providers").into());
        }

        let new_provider = request.validate()?;

        if self.providers.find_by_email(new_provider.email.as_str()).await?.is_some() {
            return Err(ValidationError::new("email", "A provider with this email already exists").into());
        }

        let provider = Provider::create(new_provider);
        self.providers.save(&provider).await?;

        info!("Provider {} registered ({})", provider.id(), provider.specialty().label());
        Ok(provider)
    }

    pub async fn get_provider(&self, provider_id: &UniqueId) -> Result<Provider, ProviderError> {
        self.providers
            .find_by_id(provider_id)
            .await?
            .ok_or_else(|| NotFoundError::new("Provider", provider_id).into())
    }

    /// Any authenticated actor may browse providers; patients need the list to
    /// book. Only admins see inactive providers.
    pub async fn list_providers(
        &self,
        mut filters: ProviderFilters,
        actor: &AuthenticatedUser,
    ) -> Result<Vec<Provider>, ProviderError> {
        if !actor.has_permission("provider:view_all") {
            filters.is_active = Some(true);
        }

        debug!("Listing providers with filters {:?}", filters);
        Ok(self.providers.find_all(&filters).await?)
    }

    pub async fn set_active(
        &self,
        provider_id: &UniqueId,
        active: bool,
        actor: &AuthenticatedUser,
    ) -> Result<Provider, ProviderError> {
        if !actor.has_permission("provider:update_all") {
            return Err(AuthorizationError::new("Only admins can change provider availability").into());
        }

        let mut provider = self.get_provider(provider_id).await?;
        if active {
            provider.activate();
        } else {
            provider.deactivate();
        }
        self.providers.save(&provider).await?;

        info!("Provider {} is now {}", provider.id(), if active { "active" } else { "inactive" });
        Ok(provider)
    }
}
