//! MangaDex API HTTP client

use crate::error::{MangaDexError, Result};
use crate::types::*;
use bytes::Bytes;
use std::time::Duration;

/// Client for interacting with the MangaDex API
///
/// Provides access to manga search, chapter listings, and the cover/page
/// image hosts. All calls are plain pass-throughs with no caching.
pub struct MangaDexClient {
    http: reqwest::Client,
}

impl MangaDexClient {
    /// Base URL for the MangaDex REST API
    pub const API_BASE_URL: &'static str = "https://api.mangadex.org";
    /// Base URL for the cover image host
    pub const UPLOADS_BASE_URL: &'static str = "https://uploads.mangadex.org";

    /// Page size used when walking a manga's full chapter list
    const CHAPTER_PAGE_LIMIT: u32 = 100;

    /// Create a new MangaDex client with default settings (30 second timeout)
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a new MangaDex client with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { http }
    }

    /// Search for manga by title
    ///
    /// # Arguments
    /// * `title` - Search string matched against manga titles
    /// * `limit` - Maximum number of results to return
    /// * `offset` - Number of results to skip, for pagination
    pub async fn search_manga(
        &self,
        title: &str,
        limit: u32,
        offset: u32,
    ) -> Result<ListResponse<Manga>> {
        let url = format!(
            "{}/manga?title={}&limit={}&offset={}",
            Self::API_BASE_URL,
            urlencoding::encode(title),
            limit,
            offset
        );

        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(MangaDexError::Status(response.status()));
        }

        Ok(response.json().await?)
    }

    /// Get a manga by id
    ///
    /// Returns `None` when the manga does not exist.
    pub async fn get_manga(&self, manga_id: &str) -> Result<Option<Manga>> {
        let url = format!(
            "{}/manga/{}",
            Self::API_BASE_URL,
            urlencoding::encode(manga_id)
        );
        let response = self.http.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(MangaDexError::Status(response.status()));
        }

        let data: EntityResponse<Manga> = response.json().await?;
        Ok(Some(data.data))
    }

    /// List cover-art records for a manga
    ///
    /// # Arguments
    /// * `manga_id` - The manga to list covers for
    /// * `limit` - Maximum number of cover records to return
    pub async fn list_covers(&self, manga_id: &str, limit: u32) -> Result<Vec<CoverArt>> {
        let url = format!(
            "{}/cover?manga[]={}&limit={}",
            Self::API_BASE_URL,
            urlencoding::encode(manga_id),
            limit
        );
        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(MangaDexError::Status(response.status()));
        }

        let data: ListResponse<CoverArt> = response.json().await?;
        Ok(data.data)
    }

    /// Walk a manga's full English chapter list, ordered by chapter number
    ///
    /// The MangaDex chapter endpoint is paginated; this keeps requesting
    /// pages of [`Self::CHAPTER_PAGE_LIMIT`] until a short or empty page.
    pub async fn list_chapters(&self, manga_id: &str) -> Result<Vec<Chapter>> {
        let mut chapters = Vec::new();
        let mut offset: u32 = 0;

        loop {
            let url = format!(
                "{}/chapter?manga={}&limit={}&offset={}&translatedLanguage[]=en&order[chapter]=asc",
                Self::API_BASE_URL,
                urlencoding::encode(manga_id),
                Self::CHAPTER_PAGE_LIMIT,
                offset
            );
            let response = self.http.get(&url).send().await?;

            if !response.status().is_success() {
                return Err(MangaDexError::Status(response.status()));
            }

            let page: ListResponse<Chapter> = response.json().await?;
            let count = page.data.len() as u32;
            if count == 0 {
                break;
            }

            chapters.extend(page.data);
            offset += count;

            if count < Self::CHAPTER_PAGE_LIMIT {
                break;
            }
        }

        Ok(chapters)
    }

    /// Get a chapter by id, including its relationships
    ///
    /// Returns `None` when the chapter does not exist.
    pub async fn get_chapter(&self, chapter_id: &str) -> Result<Option<Chapter>> {
        let url = format!(
            "{}/chapter/{}",
            Self::API_BASE_URL,
            urlencoding::encode(chapter_id)
        );
        let response = self.http.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(MangaDexError::Status(response.status()));
        }

        let data: EntityResponse<Chapter> = response.json().await?;
        Ok(Some(data.data))
    }

    /// Get page-server info for a chapter from the at-home endpoint
    ///
    /// Returns `None` when the chapter has no readable pages (404 upstream).
    pub async fn get_page_server(&self, chapter_id: &str) -> Result<Option<PageServer>> {
        let url = format!(
            "{}/at-home/server/{}",
            Self::API_BASE_URL,
            urlencoding::encode(chapter_id)
        );
        let response = self.http.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(MangaDexError::Status(response.status()));
        }

        Ok(Some(response.json().await?))
    }

    /// Full URL for a manga's cover image on the uploads host
    pub fn cover_url(manga_id: &str, file_name: &str) -> String {
        format!(
            "{}/covers/{}/{}",
            Self::UPLOADS_BASE_URL,
            manga_id,
            file_name
        )
    }

    /// Fetch raw image bytes from a cover or page URL
    ///
    /// Returns the upstream content type alongside the bytes. The body stays
    /// a cheaply-cloneable [`Bytes`] so cached copies can be served without
    /// re-allocating. A missing content-type header defaults to
    /// `application/octet-stream`.
    pub async fn fetch_image(&self, url: &str) -> Result<(String, Bytes)> {
        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            return Err(MangaDexError::Status(response.status()));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        let data = response.bytes().await?;
        Ok((content_type, data))
    }
}

impl Default for MangaDexClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_url() {
        assert_eq!(
            MangaDexClient::cover_url("abc123", "cover.jpg"),
            "https://uploads.mangadex.org/covers/abc123/cover.jpg"
        );
    }
}
