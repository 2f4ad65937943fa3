//! File-backed storage backends using TOML files.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::backend::{KeyValueStore, SecureKeyValueStore};
use super::error::{AuthError, StorageOp};
use super::memory::PlainValue;

/// Secure store writing one owner-only TOML file per item.
///
/// Layout: `<base_dir>/<service>/<account>.toml`. Writes go to a temporary
/// file that is renamed into place, so readers see either the old or the new
/// value.
///
/// # Example
/// ```no_run
/// use roost::auth::{FileSecureStore, SecureKeyValueStore};
///
/// let store = FileSecureStore::new(std::path::PathBuf::from("/tmp/roost/secure"));
/// store.set_item("kr.roost.session", "accessToken", b"token")?;
/// # Ok::<(), roost::auth::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileSecureStore {
    base_dir: PathBuf,
}

impl FileSecureStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    fn item_path(&self, service: &str, account: &str) -> PathBuf {
        self.base_dir
            .join(normalize_label(service))
            .join(format!("{}.toml", normalize_label(account)))
    }
}

impl SecureKeyValueStore for FileSecureStore {
    fn set_item(&self, service: &str, account: &str, data: &[u8]) -> Result<(), AuthError> {
        let path = self.item_path(service, account);
        let file = SecretFile {
            version: 1,
            service: service.to_string(),
            account: account.to_string(),
            data: STANDARD.encode(data),
            saved_at: Utc::now(),
        };
        let serialized = toml::to_string(&file)?;
        write_private(&path, &serialized)
            .map_err(|err| AuthError::storage(StorageOp::Write, account, err.to_string()))
    }

    fn get_item(&self, service: &str, account: &str) -> Result<Option<Vec<u8>>, AuthError> {
        let path = self.item_path(service, account);
        let raw = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(AuthError::storage(StorageOp::Read, account, err.to_string()))
            }
        };
        let file: SecretFile = toml::from_str(&raw)?;
        Ok(Some(STANDARD.decode(file.data)?))
    }

    fn delete_item(&self, service: &str, account: &str) -> Result<(), AuthError> {
        let path = self.item_path(service, account);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::storage(
                StorageOp::Delete,
                account,
                err.to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SecretFile {
    version: u32,
    service: String,
    account: String,
    data: String,
    saved_at: DateTime<Utc>,
}

/// Plain key-value store persisted as a single TOML file.
///
/// Values are cached in memory and the whole file is rewritten on each
/// mutation.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, PlainValue>>,
}

impl FileKeyValueStore {
    /// Open the store at `path`, loading existing values if the file exists.
    pub fn open(path: PathBuf) -> Result<Self, AuthError> {
        let values = match fs::read_to_string(&path) {
            Ok(raw) => toml::from_str::<PreferencesFile>(&raw)?.values,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mutate(&self, apply: impl FnOnce(&mut BTreeMap<String, PlainValue>)) -> Result<(), AuthError> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = values.clone();
        apply(&mut next);
        let file = PreferencesFile {
            version: 1,
            values: next,
        };
        write_private(&self.path, &toml::to_string(&file)?)?;
        *values = file.values;
        Ok(())
    }

    fn value(&self, key: &str) -> Option<PlainValue> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn set_int(&self, key: &str, value: i64) -> Result<(), AuthError> {
        self.mutate(|values| {
            values.insert(key.to_string(), PlainValue::Int(value));
        })
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.value(key)?.as_int()
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), AuthError> {
        self.mutate(|values| {
            values.insert(key.to_string(), PlainValue::Text(value.to_string()));
        })
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.value(key).map(|value| value.as_text())
    }

    fn remove(&self, key: &str) -> Result<(), AuthError> {
        if self.value(key).is_none() {
            return Ok(());
        }
        self.mutate(|values| {
            values.remove(key);
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PreferencesFile {
    version: u32,
    #[serde(default)]
    values: BTreeMap<String, PlainValue>,
}

/// Default data directory (`~/.roost`).
pub fn default_data_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".roost"))
        .unwrap_or_else(|| PathBuf::from(".roost"))
}

fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("toml.tmp");
    fs::write(&tmp, contents)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
    }
    fs::rename(&tmp, path)
}

fn normalize_label(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "default".to_string();
    }
    let mut out = String::with_capacity(trimmed.len());
    for ch in trimmed.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '.' || ch == '_' {
            out.push(ch);
        } else {
            out.push('-');
        }
    }
    if out.trim_matches(|c| c == '-' || c == '.').is_empty() {
        "default".to_string()
    } else {
        out
    }
}
