//! Listing and community entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enrich::Geolocated;
use crate::geo::GeoPoint;

/// Listing card shown in the today, hot, liked and similar feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstateSummary {
    pub id: i64,
    pub title: String,
    /// Deposit in KRW.
    pub deposit: i64,
    /// Monthly rent in KRW; zero for jeonse listings.
    pub monthly_rent: i64,
    pub area_m2: f64,
    pub thumbnail_url: Option<String>,
    pub like_count: u32,
    pub location: GeoPoint,
}

/// Full listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstateDetail {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub deposit: i64,
    pub monthly_rent: i64,
    pub maintenance_fee: i64,
    pub area_m2: f64,
    pub floor: Option<i32>,
    pub image_urls: Vec<String>,
    pub seller_id: i64,
    pub liked: bool,
    pub location: GeoPoint,
}

/// Community post card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub comment_count: u32,
    pub like_count: u32,
    pub created_at: DateTime<Utc>,
    pub location: GeoPoint,
}

impl Geolocated for EstateSummary {
    fn location(&self) -> GeoPoint {
        self.location
    }
}

impl Geolocated for EstateDetail {
    fn location(&self) -> GeoPoint {
        self.location
    }
}

impl Geolocated for PostSummary {
    fn location(&self) -> GeoPoint {
        self.location
    }
}
