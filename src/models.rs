use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Shortened link entry in the database
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ShortLink {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    /// Build the externally visible short URL for this link.
    pub fn short_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.short_code)
    }
}

/// Request to create a short URL
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(url(message = "Must be a valid URL"))]
    pub url: String,
}

/// Response after creating a short URL
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub clicks: i64,
}

/// A single entry in the listing response
#[derive(Debug, Serialize)]
pub struct LinkInfoResponse {
    pub id: i64,
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl LinkInfoResponse {
    pub fn from_link(link: ShortLink, base_url: &str) -> Self {
        let short_url = link.short_url(base_url);
        LinkInfoResponse {
            id: link.id,
            short_code: link.short_code,
            short_url,
            original_url: link.original_url,
            clicks: link.clicks,
            created_at: link.created_at,
        }
    }
}

/// Aggregate statistics summary
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_urls: i64,
    pub total_clicks: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_link() -> ShortLink {
        ShortLink {
            id: 1,
            short_code: "aZ3kP9".to_string(),
            original_url: "https://example.com/a/very/long/path".to_string(),
            clicks: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_short_url_construction() {
        let link = sample_link();
        assert_eq!(link.short_url("http://svc"), "http://svc/aZ3kP9");
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        let link = sample_link();
        assert_eq!(link.short_url("http://svc/"), "http://svc/aZ3kP9");
    }

    #[test]
    fn test_link_info_from_link() {
        let info = LinkInfoResponse::from_link(sample_link(), "http://svc");
        assert_eq!(info.short_code, "aZ3kP9");
        assert_eq!(info.short_url, "http://svc/aZ3kP9");
        assert_eq!(info.clicks, 0);
    }
}
