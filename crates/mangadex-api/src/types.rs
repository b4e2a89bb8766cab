//! Data types for MangaDex API responses
//!
//! These structs mirror the MangaDex API responses. Only the fields the
//! proxy consumes are modeled; unknown fields are ignored.

use serde::Deserialize;
use std::collections::BTreeMap;

/// A string localized by language code, e.g. `{"en": "...", "ja": "..."}`
///
/// MangaDex uses these for titles and descriptions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct LocalizedString(pub BTreeMap<String, String>);

impl LocalizedString {
    /// The English text if present, otherwise any available translation
    pub fn preferred(&self) -> Option<&str> {
        self.0
            .get("en")
            .or_else(|| self.0.values().next())
            .map(String::as_str)
    }
}

/// Envelope for list endpoints: `{"data": [...], "total": N}`
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
pub struct ListResponse<T> {
    #[serde(default)]
    pub data: Vec<T>,
    pub total: Option<u64>,
}

/// Envelope for single-entity endpoints: `{"data": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct EntityResponse<T> {
    pub data: T,
}

/// A relationship reference attached to a manga or chapter
#[derive(Debug, Clone, Deserialize)]
pub struct Relationship {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Manga record from `/manga` endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct Manga {
    pub id: String,
    pub attributes: MangaAttributes,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MangaAttributes {
    #[serde(default)]
    pub title: LocalizedString,
    #[serde(default)]
    pub description: LocalizedString,
}

/// Chapter record from `/chapter` endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub attributes: ChapterAttributes,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChapterAttributes {
    /// Chapter number as a string, e.g. "1", "10.5"; may be null for oneshots
    pub chapter: Option<String>,
    pub title: Option<String>,
}

impl Chapter {
    /// Id of the parent manga, taken from the relationships array
    pub fn manga_id(&self) -> Option<&str> {
        self.relationships
            .iter()
            .find(|r| r.kind == "manga")
            .map(|r| r.id.as_str())
    }
}

/// Cover-art record from the `/cover` endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CoverArt {
    pub id: String,
    pub attributes: CoverArtAttributes,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverArtAttributes {
    pub file_name: String,
}

/// Page-server info from `/at-home/server/{chapterId}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageServer {
    pub base_url: String,
    pub chapter: PageServerChapter,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageServerChapter {
    pub hash: String,
    /// Ordered full-quality page filenames
    #[serde(default)]
    pub data: Vec<String>,
}

impl PageServer {
    /// Full URL for a page file
    pub fn page_url(&self, file: &str) -> String {
        format!("{}/data/{}/{}", self.base_url, self.chapter.hash, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localized_string_prefers_english() {
        let json = r#"{"ja": "ワンピース", "en": "One Piece"}"#;
        let title: LocalizedString = serde_json::from_str(json).unwrap();
        assert_eq!(title.preferred(), Some("One Piece"));
    }

    #[test]
    fn test_localized_string_falls_back_to_any_language() {
        let json = r#"{"ja-ro": "Wan Pisu"}"#;
        let title: LocalizedString = serde_json::from_str(json).unwrap();
        assert_eq!(title.preferred(), Some("Wan Pisu"));
    }

    #[test]
    fn test_localized_string_empty() {
        let title = LocalizedString::default();
        assert_eq!(title.preferred(), None);
    }

    #[test]
    fn test_manga_deserialization() {
        let json = r#"{
            "id": "abc123",
            "type": "manga",
            "attributes": {
                "title": {"en": "Test Manga"},
                "description": {"en": "A **bold** description"}
            },
            "relationships": [
                {"id": "artist-1", "type": "artist"}
            ]
        }"#;

        let manga: Manga = serde_json::from_str(json).unwrap();
        assert_eq!(manga.id, "abc123");
        assert_eq!(manga.attributes.title.preferred(), Some("Test Manga"));
        assert_eq!(manga.relationships.len(), 1);
    }

    #[test]
    fn test_manga_missing_description() {
        let json = r#"{
            "id": "abc123",
            "attributes": {"title": {"en": "Test"}}
        }"#;

        let manga: Manga = serde_json::from_str(json).unwrap();
        assert_eq!(manga.attributes.description.preferred(), None);
        assert!(manga.relationships.is_empty());
    }

    #[test]
    fn test_chapter_manga_relationship() {
        let json = r#"{
            "id": "ch-1",
            "attributes": {"chapter": "1", "title": "Romance Dawn"},
            "relationships": [
                {"id": "group-1", "type": "scanlation_group"},
                {"id": "manga-9", "type": "manga"}
            ]
        }"#;

        let chapter: Chapter = serde_json::from_str(json).unwrap();
        assert_eq!(chapter.manga_id(), Some("manga-9"));
        assert_eq!(chapter.attributes.chapter.as_deref(), Some("1"));
    }

    #[test]
    fn test_chapter_without_manga_relationship() {
        let json = r#"{
            "id": "ch-1",
            "attributes": {"chapter": null, "title": null},
            "relationships": []
        }"#;

        let chapter: Chapter = serde_json::from_str(json).unwrap();
        assert_eq!(chapter.manga_id(), None);
        assert_eq!(chapter.attributes.chapter, None);
    }

    #[test]
    fn test_page_server_url() {
        let json = r#"{
            "baseUrl": "https://node.mangadex.network",
            "chapter": {
                "hash": "deadbeef",
                "data": ["1.png", "2.png"]
            }
        }"#;

        let server: PageServer = serde_json::from_str(json).unwrap();
        assert_eq!(
            server.page_url(&server.chapter.data[0]),
            "https://node.mangadex.network/data/deadbeef/1.png"
        );
    }

    #[test]
    fn test_list_response_defaults() {
        let json = r#"{"total": 42}"#;
        let list: ListResponse<Manga> = serde_json::from_str(json).unwrap();
        assert!(list.data.is_empty());
        assert_eq!(list.total, Some(42));
    }
}
