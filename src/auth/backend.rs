//! Storage primitives the credential store is built on.

use super::error::AuthError;

/// Platform secure storage (keychain-style), keyed by service and account.
///
/// Deleting a missing item must succeed.
pub trait SecureKeyValueStore: Send + Sync {
    fn set_item(&self, service: &str, account: &str, data: &[u8]) -> Result<(), AuthError>;
    fn get_item(&self, service: &str, account: &str) -> Result<Option<Vec<u8>>, AuthError>;
    fn delete_item(&self, service: &str, account: &str) -> Result<(), AuthError>;
}

/// Plain preferences-style storage.
///
/// Holds derived expiry metadata, and is the source of the one-time legacy
/// token migration. Reads never fail; a missing or mistyped value is `None`.
pub trait KeyValueStore: Send + Sync {
    fn set_int(&self, key: &str, value: i64) -> Result<(), AuthError>;
    fn get_int(&self, key: &str) -> Option<i64>;
    fn set_string(&self, key: &str, value: &str) -> Result<(), AuthError>;
    fn get_string(&self, key: &str) -> Option<String>;
    fn remove(&self, key: &str) -> Result<(), AuthError>;
}
