//! Address enrichment of geolocated records.

pub mod pipeline;

pub use pipeline::{EnrichmentConfig, EnrichmentPipeline, DEFAULT_MAX_CONCURRENCY};

use std::ops::Deref;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::geo::{GeoPoint, GeocodeError};

/// What to do with a record whose lookup failed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AddressPolicy {
    /// Keep the record with an empty address.
    #[default]
    DefaultValue,
    /// Drop the record from a batch; fail a single lookup.
    ExcludeFailed,
}

/// A record that carries a coordinate to resolve.
pub trait Geolocated {
    fn location(&self) -> GeoPoint;
}

/// A record annotated with its short display address.
///
/// An empty `address` means the location could not be resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithAddress<T> {
    #[serde(flatten)]
    pub record: T,
    pub address: String,
}

impl<T> WithAddress<T> {
    pub fn new(record: T, address: impl Into<String>) -> Self {
        Self {
            record,
            address: address.into(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.address.is_empty()
    }

    pub fn into_inner(self) -> T {
        self.record
    }
}

impl<T> Deref for WithAddress<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.record
    }
}

/// Batch output of the pipeline.
pub type EnrichedList<T> = Enrichment<Vec<WithAddress<T>>>;

/// Enrichment output together with the lookups that failed along the way.
///
/// Only the first failure in input order is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment<T> {
    pub value: T,
    pub first_error: Option<GeocodeError>,
    pub failed: usize,
}

impl<T> Enrichment<T> {
    pub fn complete(value: T) -> Self {
        Self {
            value,
            first_error: None,
            failed: 0,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Enrichment<U> {
        Enrichment {
            value: f(self.value),
            first_error: self.first_error,
            failed: self.failed,
        }
    }
}
