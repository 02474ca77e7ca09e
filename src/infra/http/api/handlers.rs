//! Lookup handlers.
//!
//! Identifier lookups are computed directly; every other query goes through
//! the cache-aside coordinator keyed by the raw request URL.

use axum::{
    extract::{Query, State},
    http::{HeaderName, HeaderValue, Uri, header},
    response::{IntoResponse, Response},
};

use crate::{
    application::resolver::{Payload, Resolvable},
    cache::{CacheKey, Resolved},
};

use super::{error::ApiError, state::ApiState};

pub const CACHE_HEADER: HeaderName = HeaderName::from_static("x-cache");

pub async fn status(State(state): State<ApiState>) -> Result<Response, ApiError> {
    let payload = state.resolver.status()?;
    Ok(json(payload, None))
}

pub async fn lookup<Q: Resolvable>(
    State(state): State<ApiState>,
    uri: Uri,
) -> Result<Response, ApiError> {
    let Query(query) = Query::<Q>::try_from_uri(&uri)?;
    let resolver = &state.resolver;

    let Resolved { payload, outcome } = if query.identifier().is_some() {
        state.cache.bypass(|| resolver.resolve(&query))?
    } else {
        let key = CacheKey::from_uri(&uri);
        state
            .cache
            .resolve(&key, || resolver.resolve(&query))
            .await?
    };

    Ok(json(payload, Some(HeaderValue::from_static(outcome.as_str()))))
}

pub async fn fallback(uri: Uri) -> ApiError {
    ApiError::not_found("Route not found", Some(format!("no route for `{}`", uri.path())))
}

fn json(payload: Payload, cache: Option<HeaderValue>) -> Response {
    let mut response = (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        payload.into_string(),
    )
        .into_response();
    if let Some(value) = cache {
        response.headers_mut().insert(CACHE_HEADER, value);
    }
    response
}
