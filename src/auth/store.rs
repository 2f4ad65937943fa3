use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::backend::{KeyValueStore, SecureKeyValueStore};
use super::error::{AuthError, StorageOp};
use super::expiry::decode_expiration;
use super::kind::CredentialKind;
use crate::events::{default_sink, EventSink, SessionEvent};

/// Default secure-storage service identifier.
pub const DEFAULT_SERVICE: &str = "kr.roost.session";

/// Secure storage for session credentials plus their derived expiry.
///
/// Values live in a [`SecureKeyValueStore`] under `(service, kind)`. Expiry
/// claims of access and refresh tokens are mirrored into a plain
/// [`KeyValueStore`], written only as a side effect of a successful
/// [`set`](Self::set).
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use roost::auth::{CredentialKind, CredentialStore, MemoryKeyValueStore, MemorySecureStore};
///
/// let store = CredentialStore::new(
///     Arc::new(MemorySecureStore::new()),
///     Arc::new(MemoryKeyValueStore::new()),
///     Arc::new(MemoryKeyValueStore::new()),
/// );
/// store.set(CredentialKind::KakaoToken, "kakao-access")?;
/// assert_eq!(store.get(CredentialKind::KakaoToken).as_deref(), Some("kakao-access"));
/// # Ok::<(), roost::auth::AuthError>(())
/// ```
pub struct CredentialStore {
    service: String,
    secure: Arc<dyn SecureKeyValueStore>,
    expirations: Arc<dyn KeyValueStore>,
    legacy: Arc<dyn KeyValueStore>,
    events: Arc<dyn EventSink>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl CredentialStore {
    pub fn new(
        secure: Arc<dyn SecureKeyValueStore>,
        expirations: Arc<dyn KeyValueStore>,
        legacy: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            service: DEFAULT_SERVICE.to_string(),
            secure,
            expirations,
            legacy,
            events: default_sink(),
        }
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Store `value` for `kind`, replacing any previous value.
    ///
    /// For kinds that derive expiry, a readable `exp` claim is written to the
    /// companion store. A value without one is still stored and the
    /// companion entry is left as it was.
    pub fn set(&self, kind: CredentialKind, value: &str) -> Result<(), AuthError> {
        let account = kind.account();

        if let Err(err) = self.secure.delete_item(&self.service, account) {
            return Err(self.storage_failed(kind, StorageOp::Delete, err));
        }
        if let Err(err) = self.secure.set_item(&self.service, account, value.as_bytes()) {
            return Err(self.storage_failed(kind, StorageOp::Write, err));
        }

        let mut expires_at = None;
        if let Some(key) = kind.expiry_key() {
            match decode_expiration(value) {
                Some(exp) => match self.expirations.set_int(key, exp) {
                    Ok(()) => expires_at = Some(exp),
                    Err(err) => {
                        self.storage_failed(kind, StorageOp::Write, err);
                    }
                },
                None => self.events.emit(SessionEvent::ExpirySkipped { kind }),
            }
        }

        self.events
            .emit(SessionEvent::CredentialStored { kind, expires_at });
        Ok(())
    }

    /// The stored value, if any. Read failures are reported as absent.
    pub fn get(&self, kind: CredentialKind) -> Option<String> {
        let data = match self.secure.get_item(&self.service, kind.account()) {
            Ok(data) => data?,
            Err(err) => {
                self.storage_failed(kind, StorageOp::Read, err);
                return None;
            }
        };
        match String::from_utf8(data) {
            Ok(value) => Some(value),
            Err(err) => {
                self.storage_failed(kind, StorageOp::Read, AuthError::Encoding(err.to_string()));
                None
            }
        }
    }

    pub fn contains(&self, kind: CredentialKind) -> bool {
        self.get(kind).is_some()
    }

    /// Delete the value for `kind` and its expiry entry. Removing an absent
    /// credential succeeds.
    ///
    /// A failure to clear the expiry entry is returned even though the value
    /// itself is already gone; [`expiration`](Self::expiration) ignores
    /// expiry entries of absent credentials.
    pub fn remove(&self, kind: CredentialKind) -> Result<(), AuthError> {
        if let Err(err) = self.secure.delete_item(&self.service, kind.account()) {
            return Err(self.storage_failed(kind, StorageOp::Delete, err));
        }
        if let Some(key) = kind.expiry_key() {
            if let Err(err) = self.expirations.remove(key) {
                return Err(self.storage_failed(kind, StorageOp::Delete, err));
            }
        }
        self.events.emit(SessionEvent::CredentialRemoved { kind });
        Ok(())
    }

    /// Remove every credential. All kinds are attempted; the first failure is
    /// returned.
    pub fn clear_all(&self) -> Result<(), AuthError> {
        let mut first_error = None;
        for kind in CredentialKind::ALL {
            if let Err(err) = self.remove(kind) {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Move credentials left in the legacy plain store into secure storage.
    ///
    /// A legacy entry is deleted only after it was stored successfully, so a
    /// failed run is retried next time. Returns the number of credentials
    /// moved; running with nothing to migrate is a no-op.
    pub fn migrate_legacy(&self) -> usize {
        let mut migrated = 0;
        for kind in CredentialKind::ALL {
            let key = kind.legacy_key();
            let Some(value) = self.legacy.get_string(key) else {
                continue;
            };
            if self.set(kind, &value).is_err() {
                continue;
            }
            if let Err(err) = self.legacy.remove(key) {
                tracing::warn!(%kind, error = %err, "Failed to delete legacy credential");
            }
            self.events.emit(SessionEvent::LegacyMigrated { kind });
            migrated += 1;
        }
        self.events
            .emit(SessionEvent::MigrationFinished { migrated });
        migrated
    }

    /// Expiry recorded for `kind`, if the kind derives one and the credential
    /// is still stored.
    pub fn expiration(&self, kind: CredentialKind) -> Option<DateTime<Utc>> {
        let key = kind.expiry_key()?;
        let exp = self.expirations.get_int(key)?;
        if !self.contains(kind) {
            return None;
        }
        DateTime::from_timestamp(exp, 0)
    }

    /// Whether the recorded expiry of `kind` is at or before `now`.
    ///
    /// Credentials without a recorded expiry are never considered expired.
    pub fn is_expired_at(&self, kind: CredentialKind, now: DateTime<Utc>) -> bool {
        self.expiration(kind).is_some_and(|exp| exp <= now)
    }

    pub fn is_expired(&self, kind: CredentialKind) -> bool {
        self.is_expired_at(kind, Utc::now())
    }

    fn storage_failed(&self, kind: CredentialKind, operation: StorageOp, err: AuthError) -> AuthError {
        self.events.emit(SessionEvent::StorageFailed {
            kind,
            operation,
            message: err.to_string(),
        });
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::memory::{MemoryKeyValueStore, MemorySecureStore};
    use crate::events::MemoryEventSink;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use chrono::Duration;

    fn jwt(exp: i64) -> String {
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"7","exp":{exp}}}"#));
        format!("eyJhbGciOiJIUzI1NiJ9.{payload}.sig")
    }

    struct Fixture {
        store: CredentialStore,
        secure: Arc<MemorySecureStore>,
        expirations: Arc<MemoryKeyValueStore>,
        events: Arc<MemoryEventSink>,
    }

    fn fixture() -> Fixture {
        let secure = Arc::new(MemorySecureStore::new());
        let expirations = Arc::new(MemoryKeyValueStore::new());
        let events = MemoryEventSink::new();
        let store = CredentialStore::new(
            secure.clone(),
            expirations.clone(),
            Arc::new(MemoryKeyValueStore::new()),
        )
        .with_events(events.clone());
        Fixture {
            store,
            secure,
            expirations,
            events,
        }
    }

    #[test]
    fn set_overwrites_previous_value() {
        let f = fixture();
        f.store.set(CredentialKind::AccessToken, "first").unwrap();
        f.store.set(CredentialKind::AccessToken, "second").unwrap();
        assert_eq!(
            f.store.get(CredentialKind::AccessToken).as_deref(),
            Some("second")
        );
        assert_eq!(f.secure.len(), 1);
    }

    #[test]
    fn external_tokens_never_write_expiry() {
        let f = fixture();
        f.store.set(CredentialKind::AppleToken, &jwt(1_700_000_000)).unwrap();
        assert!(!f.expirations.contains("accessTokenExpiration"));
        assert!(!f.expirations.contains("refreshTokenExpiration"));
        assert_eq!(
            f.events.events(),
            vec![SessionEvent::CredentialStored {
                kind: CredentialKind::AppleToken,
                expires_at: None,
            }]
        );
    }

    #[test]
    fn opaque_token_emits_expiry_skipped() {
        let f = fixture();
        f.store.set(CredentialKind::RefreshToken, "opaque").unwrap();
        assert!(f.events.events().contains(&SessionEvent::ExpirySkipped {
            kind: CredentialKind::RefreshToken
        }));
    }

    #[test]
    fn expiry_checks_use_recorded_claim() {
        let f = fixture();
        let now = Utc::now();
        let exp = (now + Duration::minutes(5)).timestamp();
        f.store.set(CredentialKind::AccessToken, &jwt(exp)).unwrap();

        assert_eq!(
            f.store.expiration(CredentialKind::AccessToken).map(|at| at.timestamp()),
            Some(exp)
        );
        assert!(!f.store.is_expired_at(CredentialKind::AccessToken, now));
        assert!(f
            .store
            .is_expired_at(CredentialKind::AccessToken, now + Duration::minutes(10)));
        assert!(!f.store.is_expired(CredentialKind::KakaoToken));
    }

    #[test]
    fn remove_clears_expiry_entry() {
        let f = fixture();
        f.store.set(CredentialKind::AccessToken, &jwt(42)).unwrap();
        f.store.remove(CredentialKind::AccessToken).unwrap();
        assert!(f.store.expiration(CredentialKind::AccessToken).is_none());
        assert!(!f.store.contains(CredentialKind::AccessToken));
    }
}
