use std::sync::Arc;
use std::time::Duration;

use bon::Builder;
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;

use super::{AddressPolicy, Enrichment, Geolocated, WithAddress};
use crate::error::RoostError;
use crate::events::{default_sink, EventSink, SessionEvent};
use crate::geo::{GeoPoint, GeocodeError, ReverseGeocoder};
use crate::util::timeout::with_timeout;

pub const DEFAULT_MAX_CONCURRENCY: usize = 16;

/// Tuning for batch lookups.
#[derive(Debug, Clone, Builder)]
pub struct EnrichmentConfig {
    /// Maximum lookups in flight for one batch.
    #[builder(default = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,
    /// Deadline for a single lookup; expiry counts as a failed lookup.
    pub lookup_timeout: Option<Duration>,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            lookup_timeout: None,
        }
    }
}

/// Attaches short addresses to geolocated records.
///
/// Batch lookups run concurrently (bounded by
/// [`EnrichmentConfig::max_concurrency`]) and results keep the input order
/// regardless of which lookup finishes first.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use roost::enrich::{AddressPolicy, EnrichmentPipeline};
/// use roost::estate::EstateSummary;
/// use roost::geo::NcpGeocoder;
///
/// # async fn example(listings: Vec<EstateSummary>) {
/// let pipeline = EnrichmentPipeline::new(Arc::new(NcpGeocoder::new("key-id", "key")));
/// let enriched = pipeline.enrich_batch(listings, AddressPolicy::DefaultValue).await;
/// if let Some(err) = &enriched.first_error {
///     eprintln!("some addresses are missing: {err}");
/// }
/// # }
/// ```
pub struct EnrichmentPipeline {
    geocoder: Arc<dyn ReverseGeocoder>,
    config: EnrichmentConfig,
    events: Arc<dyn EventSink>,
}

impl EnrichmentPipeline {
    pub fn new(geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self {
            geocoder,
            config: EnrichmentConfig::default(),
            events: default_sink(),
        }
    }

    pub fn with_config(mut self, config: EnrichmentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    /// Resolve one coordinate to its short address.
    pub async fn resolve_address(&self, point: GeoPoint) -> Result<String, GeocodeError> {
        with_timeout(self.config.lookup_timeout, self.geocoder.resolve(point))
            .await
            .map(|address| address.short_address())
    }

    /// Enrich a single record.
    ///
    /// Under [`AddressPolicy::DefaultValue`] this never fails: a failed lookup
    /// yields an empty address and the error is reported in the outcome.
    /// Under [`AddressPolicy::ExcludeFailed`] the lookup error is returned.
    pub async fn enrich_one<T: Geolocated>(
        &self,
        record: T,
        policy: AddressPolicy,
    ) -> Result<Enrichment<WithAddress<T>>, GeocodeError> {
        match self.resolve_address(record.location()).await {
            Ok(address) => Ok(Enrichment::complete(WithAddress::new(record, address))),
            Err(err) => {
                self.events.emit(SessionEvent::GeocodeFailed {
                    index: 0,
                    message: err.to_string(),
                });
                match policy {
                    AddressPolicy::DefaultValue => Ok(Enrichment {
                        value: WithAddress::new(record, String::new()),
                        first_error: Some(err),
                        failed: 1,
                    }),
                    AddressPolicy::ExcludeFailed => Err(err),
                }
            }
        }
    }

    /// Enrich a batch, keeping input order.
    ///
    /// A failed lookup never fails the batch: the record gets an empty
    /// address ([`AddressPolicy::DefaultValue`]) or is left out
    /// ([`AddressPolicy::ExcludeFailed`]).
    pub async fn enrich_batch<T: Geolocated>(
        &self,
        records: Vec<T>,
        policy: AddressPolicy,
    ) -> Enrichment<Vec<WithAddress<T>>> {
        let requested = records.len();
        let points: Vec<GeoPoint> = records.iter().map(|record| record.location()).collect();
        let limit = self.config.max_concurrency.max(1);

        let outcomes: Vec<Result<String, GeocodeError>> = stream::iter(points)
            .map(|point| self.resolve_address(point))
            .buffered(limit)
            .collect()
            .await;

        let mut value = Vec::with_capacity(requested);
        let mut first_error = None;
        let mut failed = 0;
        for (index, (record, outcome)) in records.into_iter().zip(outcomes).enumerate() {
            match outcome {
                Ok(address) => value.push(WithAddress::new(record, address)),
                Err(err) => {
                    failed += 1;
                    self.events.emit(SessionEvent::GeocodeFailed {
                        index,
                        message: err.to_string(),
                    });
                    if policy == AddressPolicy::DefaultValue {
                        value.push(WithAddress::new(record, String::new()));
                    }
                    first_error.get_or_insert(err);
                }
            }
        }

        self.events.emit(SessionEvent::BatchEnriched {
            policy,
            requested,
            returned: value.len(),
            failed,
        });
        Enrichment {
            value,
            first_error,
            failed,
        }
    }

    /// [`enrich_batch`](Self::enrich_batch) that gives up as soon as `cancel`
    /// fires. Lookups still in flight are dropped and no partial batch is
    /// returned.
    pub async fn enrich_batch_until_cancelled<T: Geolocated>(
        &self,
        records: Vec<T>,
        policy: AddressPolicy,
        cancel: &CancellationToken,
    ) -> Result<Enrichment<Vec<WithAddress<T>>>, RoostError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(%policy, "Address enrichment cancelled");
                Err(RoostError::Cancelled)
            }
            enriched = self.enrich_batch(records, policy) => Ok(enriched),
        }
    }
}
