use async_trait::async_trait;
use serde::Deserialize;

use super::{AddressResult, GeoPoint, GeocodeError, ReverseGeocoder};

pub const DEFAULT_REVERSE_GEOCODE_URL: &str =
    "https://naveropenapi.apigw.ntruss.com/map-reversegeocode/v2/gc";

const STATUS_OK: i64 = 0;
const STATUS_NO_RESULTS: i64 = 3;

/// Reverse geocoder backed by the NAVER Cloud Platform Maps API (v2).
///
/// # Example
/// ```no_run
/// use roost::geo::{GeoPoint, NcpGeocoder, ReverseGeocoder};
///
/// # async fn example() -> Result<(), roost::geo::GeocodeError> {
/// let geocoder = NcpGeocoder::new("key-id", "key");
/// let address = geocoder.resolve(GeoPoint::new(126.9516, 37.4781)).await?;
/// println!("{}", address.short_address());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NcpGeocoder {
    client: reqwest::Client,
    url: String,
    key_id: String,
    key: String,
}

impl NcpGeocoder {
    pub fn new(key_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: DEFAULT_REVERSE_GEOCODE_URL.to_string(),
            key_id: key_id.into(),
            key: key.into(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl ReverseGeocoder for NcpGeocoder {
    async fn resolve(&self, point: GeoPoint) -> Result<AddressResult, GeocodeError> {
        let coords = format!("{},{}", point.longitude, point.latitude);
        tracing::debug!(coords = coords.as_str(), "NCP reverse geocode");

        let resp = self
            .client
            .get(&self.url)
            .header("X-NCP-APIGW-API-KEY-ID", self.key_id.as_str())
            .header("X-NCP-APIGW-API-KEY", self.key.as_str())
            .query(&[
                ("coords", coords.as_str()),
                ("output", "json"),
                ("orders", "legalcode,admcode,roadaddr,addr"),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let payload: NcpResponse = serde_json::from_str(&body)?;
        match payload.status.code {
            STATUS_OK => Ok(payload.into_address()),
            STATUS_NO_RESULTS => Ok(AddressResult::default()),
            code => Err(GeocodeError::InvalidResponse(format!(
                "status {code}: {}",
                payload.status.message
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NcpResponse {
    status: NcpStatus,
    #[serde(default)]
    results: Vec<NcpResult>,
}

#[derive(Debug, Deserialize)]
struct NcpStatus {
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NcpResult {
    name: String,
    region: NcpRegion,
    land: Option<NcpLand>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NcpRegion {
    area1: NcpArea,
    area2: NcpArea,
    area3: NcpArea,
    area4: NcpArea,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NcpArea {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NcpLand {
    name: String,
    number1: String,
    number2: String,
}

impl NcpResponse {
    fn into_address(self) -> AddressResult {
        let Some(first) = self.results.first() else {
            return AddressResult::default();
        };
        let formatted = ["roadaddr", "addr"]
            .iter()
            .find_map(|order| self.results.iter().find(|r| r.name == *order))
            .map(format_address)
            .unwrap_or_default();
        AddressResult {
            region1: first.region.area1.name.clone(),
            region2: first.region.area2.name.clone(),
            region3: first.region.area3.name.clone(),
            formatted,
        }
    }
}

fn format_address(result: &NcpResult) -> String {
    let region = &result.region;
    let mut parts: Vec<String> = [
        &region.area1.name,
        &region.area2.name,
        &region.area3.name,
        &region.area4.name,
    ]
    .into_iter()
    .filter(|name| !name.is_empty())
    .cloned()
    .collect();

    if let Some(land) = &result.land {
        if !land.name.is_empty() {
            parts.push(land.name.clone());
        }
        match (land.number1.is_empty(), land.number2.is_empty()) {
            (false, false) => parts.push(format!("{}-{}", land.number1, land.number2)),
            (false, true) => parts.push(land.number1.clone()),
            _ => {}
        }
    }
    parts.join(" ")
}
