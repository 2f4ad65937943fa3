//! Structured session events.
//!
//! The credential store and the enrichment pipeline report what they did
//! through an injected [`EventSink`] instead of printing. The default sink
//! forwards to `tracing`; [`MemoryEventSink`] keeps events for inspection.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::auth::{CredentialKind, StorageOp};
use crate::enrich::AddressPolicy;

/// Something observable happened in the session core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    CredentialStored {
        kind: CredentialKind,
        expires_at: Option<i64>,
    },
    CredentialRemoved {
        kind: CredentialKind,
    },
    /// The credential was stored but no expiry could be read from it.
    ExpirySkipped {
        kind: CredentialKind,
    },
    StorageFailed {
        kind: CredentialKind,
        operation: StorageOp,
        message: String,
    },
    LegacyMigrated {
        kind: CredentialKind,
    },
    MigrationFinished {
        migrated: usize,
    },
    BatchEnriched {
        policy: AddressPolicy,
        requested: usize,
        returned: usize,
        failed: usize,
    },
    GeocodeFailed {
        index: usize,
        message: String,
    },
}

/// Receiver for [`SessionEvent`]s.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: SessionEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: SessionEvent) {
        match event {
            SessionEvent::CredentialStored { kind, expires_at } => {
                tracing::debug!(%kind, ?expires_at, "Credential stored")
            }
            SessionEvent::CredentialRemoved { kind } => {
                tracing::debug!(%kind, "Credential removed")
            }
            SessionEvent::ExpirySkipped { kind } => {
                tracing::debug!(%kind, "No expiry claim in credential")
            }
            SessionEvent::StorageFailed {
                kind,
                operation,
                message,
            } => tracing::warn!(%kind, %operation, error = %message, "Secure storage failed"),
            SessionEvent::LegacyMigrated { kind } => {
                tracing::info!(%kind, "Migrated legacy credential")
            }
            SessionEvent::MigrationFinished { migrated } => {
                if migrated > 0 {
                    tracing::info!(migrated, "Legacy credential migration finished");
                }
            }
            SessionEvent::BatchEnriched {
                policy,
                requested,
                returned,
                failed,
            } => tracing::debug!(%policy, requested, returned, failed, "Address batch enriched"),
            SessionEvent::GeocodeFailed { index, message } => {
                tracing::warn!(index, error = %message, "Reverse geocoding failed")
            }
        }
    }
}

/// Records events in memory.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<SessionEvent>>,
}

impl MemoryEventSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of everything emitted so far.
    pub fn events(&self) -> Vec<SessionEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl EventSink for MemoryEventSink {
    fn emit(&self, event: SessionEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

pub(crate) fn default_sink() -> Arc<dyn EventSink> {
    Arc::new(TracingEventSink)
}
