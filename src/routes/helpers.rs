use crate::db::Repository;
use crate::error::{AppError, AppResult};
use crate::models::ShortLink;
use crate::services::short_code;

/// Claim a fresh short code for `original_url` and persist the link.
///
/// Generation is a blind random draw; the database's UNIQUE constraint
/// on the code is the collision detector. Each collision retries with a
/// new candidate, bounded by `max_attempts`, after which the request
/// fails with `ShortCodeGenerationFailed`.
pub(crate) async fn allocate_link(
    repository: &Repository,
    original_url: &str,
    length: usize,
    max_attempts: u32,
) -> AppResult<ShortLink> {
    for attempt in 0..max_attempts {
        let code = short_code::generate(length);

        match repository.create_link(&code, original_url).await {
            Ok(link) => return Ok(link),
            Err(AppError::ShortCodeExists(code)) => {
                tracing::warn!(
                    "Short code collision on '{}' (attempt {}/{})",
                    code,
                    attempt + 1,
                    max_attempts
                );
            }
            Err(e) => return Err(e),
        }
    }

    Err(AppError::ShortCodeGenerationFailed)
}

/// De-duplicating variant of [`allocate_link`].
///
/// Uses the conditional insert so concurrent shortens of the same URL
/// converge on a single record; a caller that loses that race returns
/// the winner's record instead of minting a duplicate.
pub(crate) async fn allocate_link_dedup(
    repository: &Repository,
    original_url: &str,
    length: usize,
    max_attempts: u32,
) -> AppResult<ShortLink> {
    for attempt in 0..max_attempts {
        let code = short_code::generate(length);

        match repository
            .create_link_if_url_absent(&code, original_url)
            .await
        {
            Ok(Some(link)) => return Ok(link),
            Ok(None) => {
                // Another request inserted this URL first. Records are
                // never deleted, so the winner must be visible now.
                return repository
                    .find_link_by_url(original_url)
                    .await?
                    .ok_or_else(|| {
                        AppError::Internal(format!(
                            "Winning record for '{}' disappeared",
                            original_url
                        ))
                    });
            }
            Err(AppError::ShortCodeExists(code)) => {
                tracing::warn!(
                    "Short code collision on '{}' (attempt {}/{})",
                    code,
                    attempt + 1,
                    max_attempts
                );
            }
            Err(e) => return Err(e),
        }
    }

    Err(AppError::ShortCodeGenerationFailed)
}
