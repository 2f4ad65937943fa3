use async_trait::async_trait;

use super::dto::{EstateDetailDto, EstateSummaryDto, PostSummaryDto};
use crate::error::Result;

/// Network collaborator serving listing and community data.
///
/// Implementations raise [`RoostError::AuthExpired`](crate::error::RoostError::AuthExpired)
/// when the refresh token is rejected.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn today_estates(&self) -> Result<Vec<EstateSummaryDto>>;

    async fn hot_estates(&self) -> Result<Vec<EstateSummaryDto>>;

    async fn liked_estates(&self) -> Result<Vec<EstateSummaryDto>>;

    async fn similar_estates(&self, estate_id: i64) -> Result<Vec<EstateSummaryDto>>;

    async fn estate_detail(&self, estate_id: i64) -> Result<EstateDetailDto>;

    async fn posts(&self, page: u32) -> Result<Vec<PostSummaryDto>>;
}
