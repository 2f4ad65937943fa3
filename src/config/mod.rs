//! Configuration (layered: code > env > defaults).

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::{default_data_dir, DEFAULT_SERVICE};
use crate::enrich::{AddressPolicy, EnrichmentConfig};
use crate::error::RoostError;
use crate::geo::NcpGeocoder;

const SERVICE_VAR: &str = "ROOST_KEYCHAIN_SERVICE";
const DATA_DIR_VAR: &str = "ROOST_DATA_DIR";
const GEOCODER_KEY_ID_VAR: &str = "NCP_MAP_KEY_ID";
const GEOCODER_KEY_VAR: &str = "NCP_MAP_KEY";
const GEOCODER_URL_VAR: &str = "ROOST_GEOCODER_URL";
const CONCURRENCY_VAR: &str = "ROOST_GEOCODE_CONCURRENCY";
const TIMEOUT_VAR: &str = "ROOST_GEOCODE_TIMEOUT_MS";
const POLICY_VAR: &str = "ROOST_ADDRESS_POLICY";

/// API credentials for the reverse geocoder.
#[derive(Clone)]
pub struct GeocoderCredentials {
    pub key_id: String,
    pub key: String,
}

impl fmt::Debug for GeocoderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeocoderCredentials")
            .field("key_id", &self.key_id)
            .field("key", &"..")
            .finish()
    }
}

/// Settings for the session core.
///
/// # Example
/// ```
/// use roost::config::RoostConfig;
/// use roost::enrich::AddressPolicy;
///
/// let config = RoostConfig::new()
///     .with_data_dir("/tmp/roost")
///     .with_geocoder_credentials("key-id", "key")
///     .with_address_policy(AddressPolicy::ExcludeFailed);
/// assert_eq!(config.preferences_path(), std::path::Path::new("/tmp/roost/preferences.toml"));
/// ```
#[derive(Debug, Clone)]
pub struct RoostConfig {
    service: String,
    data_dir: PathBuf,
    geocoder: Option<GeocoderCredentials>,
    geocoder_url: Option<String>,
    enrichment: EnrichmentConfig,
    address_policy: AddressPolicy,
}

impl Default for RoostConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RoostConfig {
    pub fn new() -> Self {
        Self {
            service: DEFAULT_SERVICE.to_string(),
            data_dir: default_data_dir(),
            geocoder: None,
            geocoder_url: None,
            enrichment: EnrichmentConfig::default(),
            address_policy: AddressPolicy::default(),
        }
    }

    /// Load from environment variables, reading `.env` first if present.
    pub fn from_env() -> Result<Self, RoostError> {
        let _ = dotenvy::dotenv();
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RoostError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::new();

        if let Some(service) = var(SERVICE_VAR) {
            config.service = service;
        }
        if let Some(dir) = var(DATA_DIR_VAR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let (Some(key_id), Some(key)) = (var(GEOCODER_KEY_ID_VAR), var(GEOCODER_KEY_VAR)) {
            config.geocoder = Some(GeocoderCredentials { key_id, key });
        }
        config.geocoder_url = var(GEOCODER_URL_VAR);

        if let Some(raw) = var(CONCURRENCY_VAR) {
            let limit: usize = parse_var(CONCURRENCY_VAR, &raw)?;
            if limit == 0 {
                return Err(RoostError::Configuration(format!(
                    "{CONCURRENCY_VAR} must be at least 1"
                )));
            }
            config.enrichment.max_concurrency = limit;
        }
        if let Some(raw) = var(TIMEOUT_VAR) {
            let millis: u64 = parse_var(TIMEOUT_VAR, &raw)?;
            if millis == 0 {
                return Err(RoostError::Configuration(format!(
                    "{TIMEOUT_VAR} must be at least 1"
                )));
            }
            config.enrichment.lookup_timeout = Some(Duration::from_millis(millis));
        }
        if let Some(raw) = var(POLICY_VAR) {
            config.address_policy = parse_var(POLICY_VAR, &raw)?;
        }

        Ok(config)
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_geocoder_credentials(
        mut self,
        key_id: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        self.geocoder = Some(GeocoderCredentials {
            key_id: key_id.into(),
            key: key.into(),
        });
        self
    }

    pub fn with_geocoder_url(mut self, url: impl Into<String>) -> Self {
        self.geocoder_url = Some(url.into());
        self
    }

    pub fn with_enrichment(mut self, enrichment: EnrichmentConfig) -> Self {
        self.enrichment = enrichment;
        self
    }

    pub fn with_address_policy(mut self, policy: AddressPolicy) -> Self {
        self.address_policy = policy;
        self
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn data_dir(&self) -> &std::path::Path {
        &self.data_dir
    }

    /// Directory of the file-backed secure store.
    pub fn secure_dir(&self) -> PathBuf {
        self.data_dir.join("secure")
    }

    /// Preferences file holding expiry metadata and legacy credentials.
    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join("preferences.toml")
    }

    pub fn geocoder_credentials(&self) -> Option<&GeocoderCredentials> {
        self.geocoder.as_ref()
    }

    pub fn enrichment(&self) -> &EnrichmentConfig {
        &self.enrichment
    }

    pub fn address_policy(&self) -> AddressPolicy {
        self.address_policy
    }

    /// Build the configured reverse geocoder.
    pub fn geocoder(&self) -> Result<NcpGeocoder, RoostError> {
        let credentials = self.geocoder.as_ref().ok_or_else(|| {
            RoostError::Configuration(format!(
                "Reverse geocoder credentials missing; set {GEOCODER_KEY_ID_VAR} and {GEOCODER_KEY_VAR}"
            ))
        })?;
        let geocoder = NcpGeocoder::new(&credentials.key_id, &credentials.key);
        Ok(match &self.geocoder_url {
            Some(url) => geocoder.with_url(url),
            None => geocoder,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, RoostError> {
    raw.trim()
        .parse()
        .map_err(|_| RoostError::Configuration(format!("Invalid value for {name}: {raw}")))
}
