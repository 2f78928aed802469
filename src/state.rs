use crate::db::Repository;

/// Application state shared across all HTTP handlers.
///
/// This struct is wrapped in `Arc` and shared across all request handlers
/// via Axum's State extraction. It contains all the necessary dependencies
/// for handling HTTP requests.
#[derive(Clone)]
pub struct AppState {
    /// Database repository for link operations
    pub repository: Repository,

    /// Base URL for constructing short URLs (e.g., "http://localhost:3000")
    pub base_url: String,

    /// Length of randomly generated short codes
    pub short_code_length: usize,

    /// Maximum number of attempts to claim a unique short code
    pub short_code_max_attempts: u32,

    /// Whether shortening the same URL twice returns the existing link
    pub dedupe_enabled: bool,

    /// Whether strict URL validation is enabled (requires http:// or https://)
    pub strict_url_validation: bool,
}
