use crate::error::{AppError, AppResult};
use crate::models::{LinkInfoResponse, ShortenRequest, ShortenResponse, StatsResponse};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect};
use std::sync::Arc;
use url::Url as UrlParser;
use validator::Validate;

use super::helpers::{allocate_link, allocate_link_dedup};
use super::AppState;

/// Create a short URL
pub async fn shorten_url(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ShortenRequest>,
) -> AppResult<impl IntoResponse> {
    if payload.url.trim().is_empty() {
        return Err(AppError::InvalidUrl("URL cannot be empty".to_string()));
    }

    payload
        .validate()
        .map_err(|e| AppError::InvalidUrl(format!("Validation failed: {}", e)))?;

    // Proper URL validation
    if state.strict_url_validation {
        UrlParser::parse(&payload.url)
            .map_err(|_| AppError::InvalidUrl("Invalid URL format".to_string()))?;

        if !payload.url.starts_with("http://") && !payload.url.starts_with("https://") {
            return Err(AppError::InvalidUrl(
                "URL must start with http:// or https://".to_string(),
            ));
        }
    }

    // With de-duplication on, an already-shortened URL returns its
    // existing link instead of minting a second code.
    let (link, created) = if state.dedupe_enabled {
        match state.repository.find_link_by_url(&payload.url).await? {
            Some(existing) => (existing, false),
            None => {
                let link = allocate_link_dedup(
                    &state.repository,
                    &payload.url,
                    state.short_code_length,
                    state.short_code_max_attempts,
                )
                .await?;
                (link, true)
            }
        }
    } else {
        let link = allocate_link(
            &state.repository,
            &payload.url,
            state.short_code_length,
            state.short_code_max_attempts,
        )
        .await?;
        (link, true)
    };

    let short_url = link.short_url(&state.base_url);

    let response = ShortenResponse {
        short_code: link.short_code,
        short_url,
        original_url: link.original_url,
        clicks: link.clicks,
    };

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(response)))
}

/// Resolve a short URL: count the click and redirect
pub async fn resolve_url(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> AppResult<Redirect> {
    let link = state
        .repository
        .get_link_by_code(&code)
        .await?
        .ok_or(AppError::UrlNotFound(code.clone()))?;

    state
        .repository
        .increment_clicks(&link.short_code)
        .await?
        .ok_or(AppError::UrlNotFound(code))?;

    // Temporary redirect so browsers revisit the service and every
    // click is counted; a permanent redirect would be cached away.
    Ok(Redirect::temporary(&link.original_url))
}

/// List all short URLs in creation order
pub async fn list_urls(State(state): State<Arc<AppState>>) -> AppResult<impl IntoResponse> {
    let links = state.repository.list_links().await?;

    let responses: Vec<LinkInfoResponse> = links
        .into_iter()
        .map(|link| LinkInfoResponse::from_link(link, &state.base_url))
        .collect();

    Ok(Json(responses))
}

/// Get aggregate statistics
pub async fn get_stats(State(state): State<Arc<AppState>>) -> AppResult<impl IntoResponse> {
    let stats = state.repository.get_stats().await?;

    let response = StatsResponse {
        total_urls: stats.total_urls,
        total_clicks: stats.total_clicks,
    };

    Ok(Json(response))
}
