//! Rust client for the MangaDex API
//!
//! This crate provides type-safe bindings to the parts of the MangaDex API
//! that the Mangaview proxy consumes, plus raw image fetching from the
//! cover and page hosts.
//!
//! # Example
//!
//! ```no_run
//! use mangadex_api::MangaDexClient;
//!
//! # async fn example() -> Result<(), mangadex_api::MangaDexError> {
//! let client = MangaDexClient::new();
//!
//! // Search for manga
//! let listing = client.search_manga("one piece", 10, 0).await?;
//! for manga in listing.data {
//!     println!("{:?}", manga.attributes.title.preferred());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - `GET /manga` - Title search with pagination
//! - `GET /manga/{id}` - Manga details
//! - `GET /cover` - Cover-art records for a manga
//! - `GET /chapter` - Chapter listing for a manga (paginated internally)
//! - `GET /chapter/{id}` - Chapter details with relationships
//! - `GET /at-home/server/{id}` - Page-server info for a chapter
//! - Raw image fetching from `uploads.mangadex.org` and page servers

mod client;
mod error;
mod types;

pub use client::MangaDexClient;
pub use error::{MangaDexError, Result};
pub use types::{
    Chapter, ChapterAttributes, CoverArt, CoverArtAttributes, EntityResponse, ListResponse,
    LocalizedString, Manga, MangaAttributes, PageServer, PageServerChapter, Relationship,
};
