use axum::{
    Json,
    extract::{RawQuery, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::{info, warn};

use super::{
    error::ApiError, models::HealthResponse, state::AppState, utils::content_disposition,
    validation::parse_feed_url,
};

const FEED_URL_PARAM: &str = "rssurl";

/// Converts a remote feed into a downloadable book (GET /getepub?rssurl=...)
///
/// The query is read raw so that a missing or malformed parameter maps to our own
/// `Bad Parameters` response instead of axum's extractor rejection.
pub async fn get_epub(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse, ApiError> {
    let raw = query.as_deref().and_then(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .find(|(key, _)| key == FEED_URL_PARAM)
            .map(|(_, value)| value.into_owned())
    });

    let url = parse_feed_url(raw.as_deref()).map_err(|e| {
        warn!(rssurl = raw.as_deref().unwrap_or_default(), error = %e, "Rejected request");
        ApiError::BadParameters(e.to_string())
    })?;

    info!(%url, "Building publication");

    let book = state
        .pipeline
        .build_publication(url.as_str())
        .await
        .map_err(|e| ApiError::pipeline(e, state.config.server.distinct_error_status))?;

    let disposition = content_disposition(&book.file_name());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, book.media_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        book.bytes,
    ))
}

/// Liveness plus the pipeline counters
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        metrics: state.metrics.snapshot(),
    })
}
