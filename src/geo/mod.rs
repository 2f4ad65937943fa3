//! Coordinates, reverse-geocoding results and geocoder implementations.

pub mod cache;
pub mod ncp;

pub use cache::CachedGeocoder;
pub use ncp::NcpGeocoder;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// WGS84 coordinate pair in degrees. Not range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// Result of reverse-geocoding one coordinate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressResult {
    /// Province or metropolitan city (e.g. "Seoul").
    pub region1: String,
    /// District (e.g. "Gwanak-gu").
    pub region2: String,
    /// Neighbourhood (e.g. "Bongcheon-dong").
    pub region3: String,
    pub formatted: String,
}

impl AddressResult {
    /// Short display address: the most specific non-empty region name, then
    /// the formatted address, then `""`.
    ///
    /// ```
    /// use roost::geo::AddressResult;
    ///
    /// let address = AddressResult {
    ///     region1: "Seoul".into(),
    ///     region2: "Gwanak-gu".into(),
    ///     ..Default::default()
    /// };
    /// assert_eq!(address.short_address(), "Gwanak-gu");
    /// ```
    pub fn short_address(&self) -> String {
        [
            &self.region3,
            &self.region2,
            &self.region1,
            &self.formatted,
        ]
        .into_iter()
        .find(|part| !part.is_empty())
        .cloned()
        .unwrap_or_default()
    }
}

/// Reverse-geocoding failure. Only the call itself failing counts; an
/// address with no usable names is a successful, empty result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeocodeError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Geocoder returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Invalid geocoder response: {0}")]
    InvalidResponse(String),
    #[error("Geocoding timed out after {0}ms")]
    Timeout(u64),
}

impl From<reqwest::Error> for GeocodeError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::InvalidResponse(error.to_string())
        } else {
            Self::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for GeocodeError {
    fn from(error: serde_json::Error) -> Self {
        Self::InvalidResponse(error.to_string())
    }
}

/// Resolves coordinates to an address.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn resolve(&self, point: GeoPoint) -> Result<AddressResult, GeocodeError>;
}

#[async_trait]
impl<G: ReverseGeocoder + ?Sized> ReverseGeocoder for Arc<G> {
    async fn resolve(&self, point: GeoPoint) -> Result<AddressResult, GeocodeError> {
        (**self).resolve(point).await
    }
}
