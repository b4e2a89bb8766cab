//! Core types for the Mangaview proxy

use crate::cache::CacheStats;
use serde::Serialize;

/// Configuration for the proxy
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub cache_ttl_secs: u64,
    pub cache_max_entries: u64,
    pub random_max_attempts: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            cache_ttl_secs: 24 * 60 * 60, // 24 hours
            cache_max_entries: 1024,
            random_max_attempts: 5,
        }
    }
}

/// One row of a search listing
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    /// Local proxy path for the cover image, e.g. `/cover/{id}`
    pub cover: String,
}

/// Response body for `GET /search`
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total: Option<u64>,
}

/// Chapter entry in manga and chapter detail listings
#[derive(Debug, Clone, Serialize)]
pub struct ChapterSummary {
    pub id: String,
    /// Chapter number as reported upstream; may be non-numeric or absent
    pub number: Option<String>,
    pub title: Option<String>,
}

/// Response body for `GET /manga/{id}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MangaDetail {
    pub id: String,
    pub title: String,
    pub cover: String,
    /// Manga description rendered from Markdown to HTML
    pub description_html: String,
    pub chapters: Vec<ChapterSummary>,
}

/// Response body for `GET /chapter/{id}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterDetail {
    pub id: String,
    pub manga_id: String,
    pub manga_title: String,
    pub number: Option<String>,
    pub title: Option<String>,
    pub total_pages: usize,
    /// Sibling chapters sorted by numeric chapter number
    pub chapters: Vec<ChapterSummary>,
    /// Index of this chapter within `chapters`
    pub current_index: usize,
}

/// Response body for `GET /random`
#[derive(Debug, Clone, Serialize)]
pub struct RandomResponse {
    pub title: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub cover_cache: CacheStats,
    pub page_cache: CacheStats,
}
