use std::sync::Arc;

use super::models::{EstateDetail, EstateSummary, PostSummary};
use super::repository::ListingRepository;
use crate::enrich::{AddressPolicy, EnrichedList, Enrichment, EnrichmentPipeline, Geolocated, WithAddress};
use crate::error::{MappingError, Result};

/// Listing use cases: fetch, map, then attach addresses.
///
/// Repository errors (including an expired session) are returned unchanged.
pub struct ListingService {
    repository: Arc<dyn ListingRepository>,
    pipeline: Arc<EnrichmentPipeline>,
    policy: AddressPolicy,
}

impl ListingService {
    pub fn new(repository: Arc<dyn ListingRepository>, pipeline: Arc<EnrichmentPipeline>) -> Self {
        Self {
            repository,
            pipeline,
            policy: AddressPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: AddressPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> AddressPolicy {
        self.policy
    }

    pub async fn today_estates(&self) -> Result<EnrichedList<EstateSummary>> {
        let dtos = self.repository.today_estates().await?;
        self.enrich_all("today", dtos).await
    }

    pub async fn hot_estates(&self) -> Result<EnrichedList<EstateSummary>> {
        let dtos = self.repository.hot_estates().await?;
        self.enrich_all("hot", dtos).await
    }

    pub async fn liked_estates(&self) -> Result<EnrichedList<EstateSummary>> {
        let dtos = self.repository.liked_estates().await?;
        self.enrich_all("liked", dtos).await
    }

    pub async fn similar_estates(&self, estate_id: i64) -> Result<EnrichedList<EstateSummary>> {
        let dtos = self.repository.similar_estates(estate_id).await?;
        self.enrich_all("similar", dtos).await
    }

    pub async fn posts(&self, page: u32) -> Result<EnrichedList<PostSummary>> {
        let dtos = self.repository.posts(page).await?;
        self.enrich_all("posts", dtos).await
    }

    /// Detail page. Under [`AddressPolicy::ExcludeFailed`] a failed lookup
    /// fails the request.
    pub async fn estate_detail(&self, estate_id: i64) -> Result<Enrichment<WithAddress<EstateDetail>>> {
        let detail = EstateDetail::try_from(self.repository.estate_detail(estate_id).await?)?;
        Ok(self.pipeline.enrich_one(detail, self.policy).await?)
    }

    async fn enrich_all<D, T>(&self, feed: &'static str, dtos: Vec<D>) -> Result<EnrichedList<T>>
    where
        T: TryFrom<D, Error = MappingError> + Geolocated,
    {
        let records = dtos
            .into_iter()
            .map(T::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        tracing::debug!(feed, count = records.len(), "Enriching listing feed");
        Ok(self.pipeline.enrich_batch(records, self.policy).await)
    }
}
