//! Listing and community use cases.

pub mod dto;
pub mod models;
pub mod repository;
pub mod service;

pub use dto::{EstateDetailDto, EstateSummaryDto, PostSummaryDto};
pub use models::{EstateDetail, EstateSummary, PostSummary};
pub use repository::ListingRepository;
pub use service::ListingService;
