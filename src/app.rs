//! Process-wide composition root.

use std::sync::Arc;

use crate::auth::{CredentialStore, FileKeyValueStore, FileSecureStore};
use crate::config::RoostConfig;
use crate::enrich::{AddressPolicy, EnrichmentPipeline};
use crate::error::RoostError;
use crate::estate::{ListingRepository, ListingService};
use crate::events::{default_sink, EventSink};
use crate::geo::{CachedGeocoder, ReverseGeocoder};

/// Long-lived components, created once at startup and shared by reference.
#[derive(Clone)]
pub struct AppContext {
    credentials: Arc<CredentialStore>,
    pipeline: Arc<EnrichmentPipeline>,
    policy: AddressPolicy,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("credentials", &self.credentials)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build file-backed stores and the configured geocoder, then run the
    /// legacy credential migration once.
    pub async fn start(config: &RoostConfig) -> Result<Self, RoostError> {
        Self::start_with_events(config, default_sink()).await
    }

    pub async fn start_with_events(
        config: &RoostConfig,
        events: Arc<dyn EventSink>,
    ) -> Result<Self, RoostError> {
        let secure = Arc::new(FileSecureStore::new(config.secure_dir()));
        let preferences = Arc::new(FileKeyValueStore::open(config.preferences_path())?);
        let credentials = CredentialStore::new(secure, preferences.clone(), preferences)
            .with_service(config.service())
            .with_events(events.clone());

        let geocoder: Arc<dyn ReverseGeocoder> = Arc::new(CachedGeocoder::new(config.geocoder()?));
        let pipeline = EnrichmentPipeline::new(geocoder)
            .with_config(config.enrichment().clone())
            .with_events(events);

        Self::from_parts(credentials, pipeline, config.address_policy()).await
    }

    /// Assemble from already-built components and run the migration.
    pub async fn from_parts(
        credentials: CredentialStore,
        pipeline: EnrichmentPipeline,
        policy: AddressPolicy,
    ) -> Result<Self, RoostError> {
        let credentials = Arc::new(credentials);
        let store = credentials.clone();
        let migrated = tokio::task::spawn_blocking(move || store.migrate_legacy())
            .await
            .map_err(|err| RoostError::Task(err.to_string()))?;
        tracing::debug!(migrated, "Session core ready");

        Ok(Self {
            credentials,
            pipeline: Arc::new(pipeline),
            policy,
        })
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    pub fn pipeline(&self) -> &Arc<EnrichmentPipeline> {
        &self.pipeline
    }

    /// Listing use cases over `repository`, sharing this context's pipeline.
    pub fn listing_service(&self, repository: Arc<dyn ListingRepository>) -> ListingService {
        ListingService::new(repository, self.pipeline.clone()).with_policy(self.policy)
    }
}
