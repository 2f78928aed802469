use crate::error::{AppError, AppResult};
use crate::models::ShortLink;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    ConnectOptions,
};
use std::str::FromStr;

/// Database repository
pub struct Repository {
    pub(crate) pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with a connection pool
    pub async fn new(database_url: &str, max_connections: u32) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Configuration(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true)
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Create a new link entry.
    ///
    /// The UNIQUE constraint on `short_code` makes this an atomic
    /// claim on the code: a duplicate insert fails with
    /// `ShortCodeExists`, which the shorten handler uses as its
    /// collision signal to retry with a fresh code.
    pub async fn create_link(&self, short_code: &str, original_url: &str) -> AppResult<ShortLink> {
        let result = sqlx::query_as::<_, ShortLink>(
            r#"
            INSERT INTO links (short_code, original_url, clicks)
            VALUES (?1, ?2, 0)
            RETURNING *
            "#,
        )
        .bind(short_code)
        .bind(original_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(short_code, e))?;

        Ok(result)
    }

    /// Create a link only if no entry for `original_url` exists yet.
    ///
    /// Single conditional INSERT, so two concurrent de-duplicating
    /// shortens of the same URL resolve to exactly one record.
    /// Returns `None` when another caller already holds the URL; the
    /// caller should then fetch the existing record.
    pub async fn create_link_if_url_absent(
        &self,
        short_code: &str,
        original_url: &str,
    ) -> AppResult<Option<ShortLink>> {
        let result = sqlx::query_as::<_, ShortLink>(
            r#"
            INSERT INTO links (short_code, original_url, clicks)
            SELECT ?1, ?2, 0
            WHERE NOT EXISTS (SELECT 1 FROM links WHERE original_url = ?2)
            RETURNING *
            "#,
        )
        .bind(short_code)
        .bind(original_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_insert_error(short_code, e))?;

        Ok(result)
    }

    /// Get a link entry by short code
    pub async fn get_link_by_code(&self, short_code: &str) -> AppResult<Option<ShortLink>> {
        let result = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT * FROM links
            WHERE short_code = ?1
            "#,
        )
        .bind(short_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    /// Find the earliest link entry for a given original URL
    pub async fn find_link_by_url(&self, original_url: &str) -> AppResult<Option<ShortLink>> {
        let result = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT * FROM links
            WHERE original_url = ?1
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(original_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    /// Atomically increment the click counter for a short code.
    ///
    /// Single UPDATE statement, so concurrent redirects never lose
    /// updates. Returns the new count, or `None` for an unknown code.
    pub async fn increment_clicks(&self, short_code: &str) -> AppResult<Option<i64>> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE links
            SET clicks = clicks + 1
            WHERE short_code = ?1
            RETURNING clicks
            "#,
        )
        .bind(short_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(count)
    }

    /// Get all links in creation order
    pub async fn list_links(&self) -> AppResult<Vec<ShortLink>> {
        let results = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT * FROM links
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(results)
    }

    /// Get aggregate statistics
    pub async fn get_stats(&self) -> AppResult<Stats> {
        let row = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                COUNT(*) as total_urls,
                COALESCE(SUM(clicks), 0) as total_clicks
            FROM links
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(Stats {
            total_urls: row.0,
            total_clicks: row.1,
        })
    }
}

/// Map an insert failure to the collision signal when the UNIQUE
/// constraint on `short_code` was violated.
fn map_insert_error(short_code: &str, e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::ShortCodeExists(short_code.to_string())
        }
        _ => AppError::Database(e),
    }
}

/// Statistics struct
#[derive(Debug)]
pub struct Stats {
    pub total_urls: i64,
    pub total_clicks: i64,
}

/// Clone implementation for Repository
impl Clone for Repository {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A single connection keeps every query on the same in-memory database.
    async fn test_repository() -> Repository {
        let repo = Repository::new("sqlite::memory:", 1).await.unwrap();
        repo.run_migrations().await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let repo = test_repository().await;

        let link = repo
            .create_link("abc123", "https://example.com")
            .await
            .unwrap();
        assert_eq!(link.short_code, "abc123");
        assert_eq!(link.original_url, "https://example.com");
        assert_eq!(link.clicks, 0);

        let found = repo.get_link_by_code("abc123").await.unwrap().unwrap();
        assert_eq!(found.id, link.id);
        assert_eq!(found.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_duplicate_code_is_collision() {
        let repo = test_repository().await;

        repo.create_link("abc123", "https://example.com")
            .await
            .unwrap();
        let err = repo
            .create_link("abc123", "https://other.example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ShortCodeExists(_)));

        // The losing insert left no partial record behind
        let links = repo.list_links().await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].original_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_increment_clicks() {
        let repo = test_repository().await;

        repo.create_link("abc123", "https://example.com")
            .await
            .unwrap();

        assert_eq!(repo.increment_clicks("abc123").await.unwrap(), Some(1));
        assert_eq!(repo.increment_clicks("abc123").await.unwrap(), Some(2));
        assert_eq!(repo.increment_clicks("abc123").await.unwrap(), Some(3));
    }

    #[tokio::test]
    async fn test_increment_unknown_code() {
        let repo = test_repository().await;
        assert_eq!(repo.increment_clicks("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_links_creation_order() {
        let repo = test_repository().await;

        repo.create_link("first1", "https://example.com/1")
            .await
            .unwrap();
        repo.create_link("second", "https://example.com/2")
            .await
            .unwrap();
        repo.create_link("third3", "https://example.com/3")
            .await
            .unwrap();

        let links = repo.list_links().await.unwrap();
        let codes: Vec<&str> = links.iter().map(|l| l.short_code.as_str()).collect();
        assert_eq!(codes, vec!["first1", "second", "third3"]);
        assert!(links.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_conditional_insert_dedupes() {
        let repo = test_repository().await;

        let first = repo
            .create_link_if_url_absent("abc123", "https://example.com")
            .await
            .unwrap();
        assert!(first.is_some());

        // Second insert for the same URL is a no-op
        let second = repo
            .create_link_if_url_absent("xyz789", "https://example.com")
            .await
            .unwrap();
        assert!(second.is_none());

        let links = repo.list_links().await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].short_code, "abc123");
    }

    #[tokio::test]
    async fn test_find_link_by_url() {
        let repo = test_repository().await;

        assert!(repo
            .find_link_by_url("https://example.com")
            .await
            .unwrap()
            .is_none());

        repo.create_link("abc123", "https://example.com")
            .await
            .unwrap();
        let found = repo
            .find_link_by_url("https://example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.short_code, "abc123");
    }

    #[tokio::test]
    async fn test_stats() {
        let repo = test_repository().await;

        let stats = repo.get_stats().await.unwrap();
        assert_eq!(stats.total_urls, 0);
        assert_eq!(stats.total_clicks, 0);

        repo.create_link("abc123", "https://example.com/1")
            .await
            .unwrap();
        repo.create_link("xyz789", "https://example.com/2")
            .await
            .unwrap();
        repo.increment_clicks("abc123").await.unwrap();
        repo.increment_clicks("abc123").await.unwrap();
        repo.increment_clicks("xyz789").await.unwrap();

        let stats = repo.get_stats().await.unwrap();
        assert_eq!(stats.total_urls, 2);
        assert_eq!(stats.total_clicks, 3);
    }
}
