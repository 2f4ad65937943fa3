//! Wire records returned by the listing API and their entity conversions.
//!
//! Every conversion is total: a missing required field is a
//! [`MappingError`], never a silently substituted default.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::models::{EstateDetail, EstateSummary, PostSummary};
use crate::error::MappingError;
use crate::geo::GeoPoint;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstateSummaryDto {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub deposit: Option<i64>,
    pub monthly_rent: Option<i64>,
    pub area: Option<f64>,
    pub thumbnail_url: Option<String>,
    pub like_count: Option<u32>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstateDetailDto {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub deposit: Option<i64>,
    pub monthly_rent: Option<i64>,
    pub maintenance_fee: Option<i64>,
    pub area: Option<f64>,
    pub floor: Option<i32>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub seller_id: Option<i64>,
    pub liked: Option<bool>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummaryDto {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub nickname: Option<String>,
    pub comment_count: Option<u32>,
    pub like_count: Option<u32>,
    pub created_at: Option<DateTime<Utc>>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

fn required<T>(value: Option<T>, entity: &'static str, field: &'static str) -> Result<T, MappingError> {
    value.ok_or_else(|| MappingError::missing(entity, field))
}

fn point(
    longitude: Option<f64>,
    latitude: Option<f64>,
    entity: &'static str,
) -> Result<GeoPoint, MappingError> {
    Ok(GeoPoint::new(
        required(longitude, entity, "longitude")?,
        required(latitude, entity, "latitude")?,
    ))
}

impl TryFrom<EstateSummaryDto> for EstateSummary {
    type Error = MappingError;

    fn try_from(dto: EstateSummaryDto) -> Result<Self, Self::Error> {
        const ENTITY: &str = "EstateSummary";
        Ok(Self {
            id: required(dto.id, ENTITY, "id")?,
            title: required(dto.title, ENTITY, "title")?,
            deposit: required(dto.deposit, ENTITY, "deposit")?,
            monthly_rent: required(dto.monthly_rent, ENTITY, "monthlyRent")?,
            area_m2: required(dto.area, ENTITY, "area")?,
            thumbnail_url: dto.thumbnail_url,
            like_count: required(dto.like_count, ENTITY, "likeCount")?,
            location: point(dto.longitude, dto.latitude, ENTITY)?,
        })
    }
}

impl TryFrom<EstateDetailDto> for EstateDetail {
    type Error = MappingError;

    fn try_from(dto: EstateDetailDto) -> Result<Self, Self::Error> {
        const ENTITY: &str = "EstateDetail";
        Ok(Self {
            id: required(dto.id, ENTITY, "id")?,
            title: required(dto.title, ENTITY, "title")?,
            description: required(dto.description, ENTITY, "description")?,
            deposit: required(dto.deposit, ENTITY, "deposit")?,
            monthly_rent: required(dto.monthly_rent, ENTITY, "monthlyRent")?,
            maintenance_fee: required(dto.maintenance_fee, ENTITY, "maintenanceFee")?,
            area_m2: required(dto.area, ENTITY, "area")?,
            floor: dto.floor,
            image_urls: dto.image_urls,
            seller_id: required(dto.seller_id, ENTITY, "sellerId")?,
            liked: required(dto.liked, ENTITY, "liked")?,
            location: point(dto.longitude, dto.latitude, ENTITY)?,
        })
    }
}

impl TryFrom<PostSummaryDto> for PostSummary {
    type Error = MappingError;

    fn try_from(dto: PostSummaryDto) -> Result<Self, Self::Error> {
        const ENTITY: &str = "PostSummary";
        Ok(Self {
            id: required(dto.id, ENTITY, "id")?,
            title: required(dto.title, ENTITY, "title")?,
            content: required(dto.content, ENTITY, "content")?,
            author: required(dto.nickname, ENTITY, "nickname")?,
            comment_count: required(dto.comment_count, ENTITY, "commentCount")?,
            like_count: required(dto.like_count, ENTITY, "likeCount")?,
            created_at: required(dto.created_at, ENTITY, "createdAt")?,
            location: point(dto.longitude, dto.latitude, ENTITY)?,
        })
    }
}
