//! MangaDex-backed catalog with cached image proxying

use crate::cache::{CacheStats, ImageCache, ImageData};
use crate::error::{AppError, Result};
use crate::types::*;
use mangadex_api::{Chapter, CoverArt, MangaDexClient, PageServer};
use std::sync::Arc;
use std::time::Duration;

/// Number of search results returned when the client does not ask for more
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

const FALLBACK_TITLE: &str = "Untitled";

/// Sort key for a chapter: its number parsed as f64, with non-numeric and
/// missing numbers pushed to the end
fn chapter_sort_key(chapter: &Chapter) -> f64 {
    chapter
        .attributes
        .chapter
        .as_deref()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(f64::INFINITY)
}

/// Sort chapters by numeric chapter number, keeping the relative order of
/// chapters without a parseable number
pub fn sort_chapters(chapters: &mut [Chapter]) {
    chapters.sort_by(|a, b| chapter_sort_key(a).total_cmp(&chapter_sort_key(b)));
}

/// Render a Markdown description to HTML
fn render_markdown(source: &str) -> String {
    let parser = pulldown_cmark::Parser::new(source);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

/// First cover record for a manga; zero records is the not-found outcome
fn first_cover(records: &[CoverArt]) -> Result<&CoverArt> {
    records
        .first()
        .ok_or_else(|| AppError::NotFound("No cover for this manga".to_string()))
}

/// Page filename at `page_index`; an empty page list and an out-of-range
/// index are both not-found outcomes, never a 5xx
fn select_page(server: &PageServer, page_index: u32) -> Result<&str> {
    if server.chapter.data.is_empty() {
        return Err(AppError::NotFound(
            "Chapter contains no pages".to_string(),
        ));
    }
    server
        .chapter
        .data
        .get(page_index as usize)
        .map(String::as_str)
        .ok_or_else(|| AppError::NotFound("Page not found".to_string()))
}

fn summarize(chapters: &[Chapter]) -> Vec<ChapterSummary> {
    chapters
        .iter()
        .map(|ch| ChapterSummary {
            id: ch.id.clone(),
            number: ch.attributes.chapter.clone(),
            title: ch.attributes.title.clone(),
        })
        .collect()
}

/// Catalog service that wraps the MangaDex API with image caching and
/// app-specific reshaping
pub struct CatalogService {
    api: MangaDexClient,
    covers: ImageCache<String>,
    pages: ImageCache<(String, u32)>,
}

impl CatalogService {
    pub fn new(config: &AppConfig) -> Self {
        let ttl = Duration::from_secs(config.cache_ttl_secs);

        Self {
            api: MangaDexClient::new(),
            covers: ImageCache::new(config.cache_max_entries, ttl),
            pages: ImageCache::new(config.cache_max_entries, ttl),
        }
    }

    pub fn cache_stats(&self) -> (CacheStats, CacheStats) {
        (self.covers.stats(), self.pages.stats())
    }

    /// Search manga by title, reshaped into listing rows
    ///
    /// An empty title short-circuits to an empty listing without touching
    /// the upstream API.
    pub async fn search(&self, title: &str, limit: u32, offset: u32) -> Result<SearchResponse> {
        if title.trim().is_empty() {
            return Ok(SearchResponse {
                results: vec![],
                total: None,
            });
        }

        let listing = self.api.search_manga(title, limit, offset).await?;

        let results = listing
            .data
            .into_iter()
            .map(|manga| {
                let title = manga
                    .attributes
                    .title
                    .preferred()
                    .unwrap_or(FALLBACK_TITLE)
                    .to_string();
                SearchResult {
                    cover: format!("/cover/{}", manga.id),
                    id: manga.id,
                    title,
                }
            })
            .collect();

        Ok(SearchResponse {
            results,
            total: listing.total,
        })
    }

    /// Cover image bytes for a manga, through the cover cache
    pub async fn cover(&self, manga_id: &str) -> Result<(Arc<ImageData>, bool)> {
        self.covers
            .get_or_fetch(manga_id.to_string(), || self.fetch_cover(manga_id))
            .await
            .map_err(AppError::from)
    }

    async fn fetch_cover(&self, manga_id: &str) -> Result<ImageData> {
        let records = self.api.list_covers(manga_id, 1).await?;
        let record = first_cover(&records)?;

        let url = MangaDexClient::cover_url(manga_id, &record.attributes.file_name);
        let (content_type, body) = self.api.fetch_image(&url).await?;
        Ok(ImageData { content_type, body })
    }

    /// One page image of a chapter, through the page cache
    pub async fn page(&self, chapter_id: &str, page_index: u32) -> Result<(Arc<ImageData>, bool)> {
        self.pages
            .get_or_fetch((chapter_id.to_string(), page_index), || {
                self.fetch_page(chapter_id, page_index)
            })
            .await
            .map_err(AppError::from)
    }

    async fn fetch_page(&self, chapter_id: &str, page_index: u32) -> Result<ImageData> {
        let server = self
            .api
            .get_page_server(chapter_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Chapter {} has no readable pages", chapter_id))
            })?;

        // A not-found outcome here propagates as an error, so nothing is
        // cached for the key.
        let file = select_page(&server, page_index)?;

        let (content_type, body) = self.api.fetch_image(&server.page_url(file)).await?;
        Ok(ImageData { content_type, body })
    }

    /// Manga metadata with rendered description and chapter list
    pub async fn manga_detail(&self, manga_id: &str) -> Result<MangaDetail> {
        let manga = self
            .api
            .get_manga(manga_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Manga not found".to_string()))?;

        let title = manga
            .attributes
            .title
            .preferred()
            .unwrap_or(FALLBACK_TITLE)
            .to_string();
        let description_html =
            render_markdown(manga.attributes.description.preferred().unwrap_or(""));

        let chapters = self.api.list_chapters(manga_id).await?;

        Ok(MangaDetail {
            id: manga.id,
            title,
            cover: format!("/cover/{}", manga_id),
            description_html,
            chapters: summarize(&chapters),
        })
    }

    /// Chapter metadata with the chapter's position among its sorted siblings
    pub async fn chapter_detail(&self, chapter_id: &str) -> Result<ChapterDetail> {
        let chapter = self
            .api
            .get_chapter(chapter_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Chapter not found".to_string()))?;

        let manga_id = chapter
            .manga_id()
            .ok_or_else(|| AppError::NotFound("Manga not found".to_string()))?
            .to_string();

        let manga = self
            .api
            .get_manga(&manga_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Manga not found".to_string()))?;
        let manga_title = manga
            .attributes
            .title
            .preferred()
            .unwrap_or(FALLBACK_TITLE)
            .to_string();

        let mut chapters = self.api.list_chapters(&manga_id).await?;
        sort_chapters(&mut chapters);
        let current_index = chapters
            .iter()
            .position(|c| c.id == chapter_id)
            .unwrap_or(0);

        let server = self
            .api
            .get_page_server(chapter_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Chapter {} has no readable pages", chapter_id))
            })?;
        let total_pages = server.chapter.data.len();
        if total_pages == 0 {
            return Err(AppError::NotFound(format!(
                "Chapter {} contains no pages",
                chapter_id
            )));
        }

        Ok(ChapterDetail {
            id: chapter.id,
            manga_id,
            manga_title,
            number: chapter.attributes.chapter,
            title: chapter.attributes.title,
            total_pages,
            chapters: summarize(&chapters),
            current_index,
        })
    }
}
