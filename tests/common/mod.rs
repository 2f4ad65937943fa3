//! Shared test helpers: scripted geocoders, failing stores and a fake
//! listing repository.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use roost::auth::{
    AuthError, CredentialStore, KeyValueStore, MemoryKeyValueStore, MemorySecureStore,
    SecureKeyValueStore, StorageOp,
};
use roost::enrich::Geolocated;
use roost::error::{Result, RoostError};
use roost::estate::{EstateDetailDto, EstateSummaryDto, ListingRepository, PostSummaryDto};
use roost::events::MemoryEventSink;
use roost::geo::{AddressResult, GeoPoint, GeocodeError, ReverseGeocoder};

/// Build a JWT-shaped token carrying `exp`.
pub fn jwt_with_exp(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"user-7","exp":{exp}}}"#));
    format!("{header}.{payload}.signature")
}

// ---------------------------------------------------------------------------
// Credential store fixtures
// ---------------------------------------------------------------------------

/// Secure store whose operations can be switched to fail.
#[derive(Default)]
pub struct FlakySecureStore {
    inner: MemorySecureStore,
    pub fail_writes: AtomicBool,
    pub fail_deletes: AtomicBool,
    pub fail_reads: AtomicBool,
}

impl FlakySecureStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecureKeyValueStore for FlakySecureStore {
    fn set_item(&self, service: &str, account: &str, data: &[u8]) -> std::result::Result<(), AuthError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AuthError::storage(StorageOp::Write, account, "errSecInteractionNotAllowed"));
        }
        self.inner.set_item(service, account, data)
    }

    fn get_item(&self, service: &str, account: &str) -> std::result::Result<Option<Vec<u8>>, AuthError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AuthError::storage(StorageOp::Read, account, "errSecInteractionNotAllowed"));
        }
        self.inner.get_item(service, account)
    }

    fn delete_item(&self, service: &str, account: &str) -> std::result::Result<(), AuthError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AuthError::storage(StorageOp::Delete, account, "errSecInteractionNotAllowed"));
        }
        self.inner.delete_item(service, account)
    }
}

/// Plain store whose writes and removals can be switched to fail.
#[derive(Default)]
pub struct FlakyKeyValueStore {
    pub inner: MemoryKeyValueStore,
    pub fail_writes: AtomicBool,
    pub fail_removes: AtomicBool,
}

impl FlakyKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for FlakyKeyValueStore {
    fn set_int(&self, key: &str, value: i64) -> std::result::Result<(), AuthError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AuthError::Io(format!("preferences are read-only: {key}")));
        }
        self.inner.set_int(key, value)
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.inner.get_int(key)
    }

    fn set_string(&self, key: &str, value: &str) -> std::result::Result<(), AuthError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AuthError::Io(format!("preferences are read-only: {key}")));
        }
        self.inner.set_string(key, value)
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.inner.get_string(key)
    }

    fn remove(&self, key: &str) -> std::result::Result<(), AuthError> {
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(AuthError::Io(format!("preferences are read-only: {key}")));
        }
        self.inner.remove(key)
    }
}

pub struct StoreFixture {
    pub store: CredentialStore,
    pub secure: Arc<FlakySecureStore>,
    pub expirations: Arc<MemoryKeyValueStore>,
    pub legacy: Arc<MemoryKeyValueStore>,
    pub events: Arc<MemoryEventSink>,
}

pub fn store_fixture() -> StoreFixture {
    let secure = Arc::new(FlakySecureStore::new());
    let expirations = Arc::new(MemoryKeyValueStore::new());
    let legacy = Arc::new(MemoryKeyValueStore::new());
    let events = MemoryEventSink::new();
    let store = CredentialStore::new(secure.clone(), expirations.clone(), legacy.clone())
        .with_events(events.clone());
    StoreFixture {
        store,
        secure,
        expirations,
        legacy,
        events,
    }
}

// ---------------------------------------------------------------------------
// Geocoding fixtures
// ---------------------------------------------------------------------------

/// Test record whose longitude encodes its index.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub index: usize,
}

impl Listing {
    pub fn batch(n: usize) -> Vec<Listing> {
        (0..n).map(|index| Listing { index }).collect()
    }
}

impl Geolocated for Listing {
    fn location(&self) -> GeoPoint {
        GeoPoint::new(self.index as f64, 37.5)
    }
}

pub fn index_of(point: GeoPoint) -> usize {
    point.longitude as usize
}

/// Geocoder with per-index failures and delays.
///
/// Successful lookups resolve to `"dong-<index>"`. Completion order and peak
/// concurrency are recorded.
#[derive(Default)]
pub struct ScriptedGeocoder {
    failures: HashMap<usize, GeocodeError>,
    delays: HashMap<usize, Duration>,
    empty: Vec<usize>,
    in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
    pub calls: AtomicUsize,
    completed: Mutex<Vec<usize>>,
}

impl ScriptedGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(mut self, index: usize, error: GeocodeError) -> Self {
        self.failures.insert(index, error);
        self
    }

    pub fn delayed_at(mut self, index: usize, delay: Duration) -> Self {
        self.delays.insert(index, delay);
        self
    }

    /// Resolve `index` successfully but with every address field empty.
    pub fn empty_at(mut self, index: usize) -> Self {
        self.empty.push(index);
        self
    }

    pub fn completion_order(&self) -> Vec<usize> {
        self.completed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReverseGeocoder for ScriptedGeocoder {
    async fn resolve(&self, point: GeoPoint) -> std::result::Result<AddressResult, GeocodeError> {
        let index = index_of(point);
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(&index) {
            tokio::time::sleep(*delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.lock().unwrap().push(index);

        if let Some(error) = self.failures.get(&index) {
            return Err(error.clone());
        }
        if self.empty.contains(&index) {
            return Ok(AddressResult::default());
        }
        Ok(AddressResult {
            region1: "Seoul".to_string(),
            region2: "Gwanak-gu".to_string(),
            region3: format!("dong-{index}"),
            formatted: String::new(),
        })
    }
}

// ---------------------------------------------------------------------------
// Listing repository fixture
// ---------------------------------------------------------------------------

pub fn estate_dto(id: i64, longitude: f64) -> EstateSummaryDto {
    EstateSummaryDto {
        id: Some(id),
        title: Some(format!("Listing {id}")),
        deposit: Some(10_000_000),
        monthly_rent: Some(500_000),
        area: Some(29.7),
        thumbnail_url: Some(format!("https://cdn.roost.kr/{id}.jpg")),
        like_count: Some(3),
        longitude: Some(longitude),
        latitude: Some(37.5),
    }
}

pub fn detail_dto(id: i64, longitude: f64) -> EstateDetailDto {
    EstateDetailDto {
        id: Some(id),
        title: Some(format!("Listing {id}")),
        description: Some("South-facing, close to the station".to_string()),
        deposit: Some(10_000_000),
        monthly_rent: Some(500_000),
        maintenance_fee: Some(70_000),
        area: Some(29.7),
        floor: Some(3),
        image_urls: vec![format!("https://cdn.roost.kr/{id}/1.jpg")],
        seller_id: Some(99),
        liked: Some(false),
        longitude: Some(longitude),
        latitude: Some(37.5),
    }
}

pub fn post_dto(id: i64, longitude: f64) -> PostSummaryDto {
    PostSummaryDto {
        id: Some(id),
        title: Some(format!("Post {id}")),
        content: Some("Anyone know a good mover?".to_string()),
        nickname: Some("neighbor".to_string()),
        comment_count: Some(1),
        like_count: Some(0),
        created_at: Some(chrono::Utc::now()),
        longitude: Some(longitude),
        latitude: Some(37.5),
    }
}

/// In-memory listing API. Feeds are keyed by name ("today", "hot", ...).
#[derive(Default)]
pub struct FakeListingRepository {
    pub feeds: Mutex<HashMap<&'static str, Vec<EstateSummaryDto>>>,
    pub details: Mutex<HashMap<i64, EstateDetailDto>>,
    pub posts: Mutex<Vec<PostSummaryDto>>,
    pub session_expired: AtomicBool,
    pub requested_similar: Mutex<Vec<i64>>,
}

impl FakeListingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(self, name: &'static str, dtos: Vec<EstateSummaryDto>) -> Self {
        self.feeds.lock().unwrap().insert(name, dtos);
        self
    }

    pub fn with_detail(self, dto: EstateDetailDto) -> Self {
        let id = dto.id.unwrap_or_default();
        self.details.lock().unwrap().insert(id, dto);
        self
    }

    pub fn with_posts(self, dtos: Vec<PostSummaryDto>) -> Self {
        *self.posts.lock().unwrap() = dtos;
        self
    }

    fn check_session(&self) -> Result<()> {
        if self.session_expired.load(Ordering::SeqCst) {
            return Err(RoostError::AuthExpired("refresh token rejected".to_string()));
        }
        Ok(())
    }

    fn feed(&self, name: &str) -> Result<Vec<EstateSummaryDto>> {
        self.check_session()?;
        Ok(self
            .feeds
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ListingRepository for FakeListingRepository {
    async fn today_estates(&self) -> Result<Vec<EstateSummaryDto>> {
        self.feed("today")
    }

    async fn hot_estates(&self) -> Result<Vec<EstateSummaryDto>> {
        self.feed("hot")
    }

    async fn liked_estates(&self) -> Result<Vec<EstateSummaryDto>> {
        self.feed("liked")
    }

    async fn similar_estates(&self, estate_id: i64) -> Result<Vec<EstateSummaryDto>> {
        self.requested_similar.lock().unwrap().push(estate_id);
        self.feed("similar")
    }

    async fn estate_detail(&self, estate_id: i64) -> Result<EstateDetailDto> {
        self.check_session()?;
        self.details
            .lock()
            .unwrap()
            .get(&estate_id)
            .cloned()
            .ok_or_else(|| RoostError::api(404, format!("estate {estate_id} not found")))
    }

    async fn posts(&self, _page: u32) -> Result<Vec<PostSummaryDto>> {
        self.check_session()?;
        Ok(self.posts.lock().unwrap().clone())
    }
}
