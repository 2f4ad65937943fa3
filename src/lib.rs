//! Roost: session core for the Roost real-estate client
//!
//! Keeps the signed-in user's credentials in secure storage (with expiry
//! tracking and a one-time migration out of plain preferences) and attaches
//! human-readable addresses to listings and posts through concurrent,
//! order-preserving reverse geocoding.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use roost::prelude::*;
//!
//! # async fn example(repository: Arc<dyn ListingRepository>) -> roost::error::Result<()> {
//! let config = RoostConfig::from_env()?;
//! let app = AppContext::start(&config).await?;
//!
//! app.credentials().set(CredentialKind::AccessToken, "header.payload.signature")?;
//!
//! let listings = app.listing_service(repository).today_estates().await?;
//! for listing in &listings.value {
//!     println!("{} ({})", listing.title, listing.address);
//! }
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod auth;
pub mod config;
pub mod enrich;
pub mod error;
pub mod estate;
pub mod events;
pub mod geo;
pub mod prelude;
pub mod util;
