//! Session credential storage with expiry tracking and legacy migration.

pub mod backend;
pub mod error;
pub mod expiry;
pub mod file;
pub mod kind;
pub mod memory;
pub mod store;

pub use backend::{KeyValueStore, SecureKeyValueStore};
pub use error::{AuthError, StorageOp};
pub use expiry::{decode_expiration, decode_expiration_time};
pub use file::{default_data_dir, FileKeyValueStore, FileSecureStore};
pub use kind::CredentialKind;
pub use memory::{MemoryKeyValueStore, MemorySecureStore, PlainValue};
pub use store::{CredentialStore, DEFAULT_SERVICE};
