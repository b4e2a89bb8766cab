//! Random manga title retrieval
//!
//! The random source is a redirect-based endpoint; landing on a known
//! sentinel URL means "no title this time". Retries are bounded so a
//! persistent sentinel becomes a terminal error instead of blocking.

use crate::error::{AppError, Result};
use tracing::debug;

/// Client for the random-title source
pub struct RandomTitleClient {
    http: reqwest::Client,
    max_attempts: u32,
}

impl RandomTitleClient {
    /// Redirecting endpoint that lands on a random title page
    pub const RANDOM_URL: &'static str = "https://mangapill.com/mangas/random";
    /// Final URL signalling that no title was selected
    pub const SENTINEL_URL: &'static str = "https://mangapill.com/manga/0";

    const TITLE_SUFFIX: &'static str = " - Mangapill!";

    pub fn new(max_attempts: u32) -> Self {
        Self {
            http: reqwest::Client::new(),
            max_attempts,
        }
    }

    /// Fetch one random manga title
    pub async fn random_title(&self) -> Result<String> {
        for attempt in 1..=self.max_attempts {
            let response = self.http.get(Self::RANDOM_URL).send().await?;

            if response.url().as_str() == Self::SENTINEL_URL {
                debug!(attempt, "Random source landed on the empty sentinel");
                continue;
            }

            if !response.status().is_success() {
                return Err(AppError::Upstream(format!(
                    "Random source returned status {}",
                    response.status()
                )));
            }

            let html = response.text().await?;
            return extract_page_title(&html)
                .map(clean_title)
                .ok_or_else(|| {
                    AppError::Upstream("Random source page has no title tag".to_string())
                });
        }

        Err(AppError::Upstream(format!(
            "Random source kept returning the empty sentinel after {} attempts",
            self.max_attempts
        )))
    }
}

/// Extract the text of the first `<title>` tag in an HTML document
fn extract_page_title(html: &str) -> Option<&str> {
    let lower = html.to_ascii_lowercase();
    let open = lower.find("<title")?;
    let start = lower[open..].find('>')? + open + 1;
    let end = lower[start..].find("</title")? + start;
    Some(html[start..end].trim())
}

/// Drop the site-name suffix the source appends to every page title
fn clean_title(raw: &str) -> String {
    raw.strip_suffix(RandomTitleClient::TITLE_SUFFIX)
        .unwrap_or(raw)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_page_title() {
        let html = "<html><head><title>One Piece - Mangapill!</title></head></html>";
        assert_eq!(extract_page_title(html), Some("One Piece - Mangapill!"));
    }

    #[test]
    fn test_extract_page_title_with_attributes_and_whitespace() {
        let html = "<HTML><TITLE lang=\"en\">\n  Berserk - Mangapill!\n</TITLE></HTML>";
        assert_eq!(extract_page_title(html), Some("Berserk - Mangapill!"));
    }

    #[test]
    fn test_extract_page_title_missing() {
        assert_eq!(extract_page_title("<html><body>no head</body></html>"), None);
    }

    #[test]
    fn test_clean_title_strips_suffix() {
        assert_eq!(clean_title("One Piece - Mangapill!"), "One Piece");
    }

    #[test]
    fn test_clean_title_without_suffix() {
        assert_eq!(clean_title("One Piece"), "One Piece");
    }
}
