//! Convenience re-exports for common use.

pub use crate::app::AppContext;
pub use crate::auth::{AuthError, CredentialKind, CredentialStore};
pub use crate::config::RoostConfig;
pub use crate::enrich::{AddressPolicy, EnrichedList, Enrichment, EnrichmentPipeline, Geolocated, WithAddress};
pub use crate::error::{Result, RoostError};
pub use crate::estate::{EstateDetail, EstateSummary, ListingRepository, ListingService, PostSummary};
pub use crate::events::{EventSink, SessionEvent};
pub use crate::geo::{AddressResult, GeoPoint, GeocodeError, ReverseGeocoder};
