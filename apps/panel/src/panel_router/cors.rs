use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use axum::http::{HeaderValue, Method};
use hearthware_core::AppError;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Storefront and admin may be served from different origins, so
/// `FRONTEND_URL` is a comma-separated list.
pub(super) fn build_cors_layer(frontend_urls: &str) -> Result<CorsLayer, AppError> {
    // Admin calls authenticate with a bearer header, not cookies.
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins(frontend_urls)?))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .expose_headers([RETRY_AFTER]))
}

fn allowed_origins(frontend_urls: &str) -> Result<Vec<HeaderValue>, AppError> {
    let origins = frontend_urls
        .split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|error| {
                AppError::Validation(format!("invalid FRONTEND_URL origin '{origin}': {error}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if origins.is_empty() {
        return Err(AppError::Validation(
            "FRONTEND_URL must name at least one origin".to_owned(),
        ));
    }
    Ok(origins)
}
