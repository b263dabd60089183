//! # Middleware
//!
//! Request-scoped plumbing that runs before every board handler:
//! caller identity from the upstream authenticator, then the tracking cookie.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderValue},
    middleware::Next,
    response::Response,
};
use domains::UserId;
use services::Resolution;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::TraceLayer,
};

use crate::cookies::{find_cookie, SetCookie};
use crate::error::ApiError;
use crate::state::AppState;

/// HTTP request/response spans for the whole router.
pub fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}

/// Lifts the caller identity out of the trusted header into request extensions.
///
/// The header is set by the authenticating proxy in front of this service;
/// a request without it never reaches a handler.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let caller = req
        .headers()
        .get(state.settings.user_header.as_str())
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(UserId::from)
        .ok_or(ApiError::Unauthenticated)?;

    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}

/// Resolves the tracking cookie for every request and re-issues it when
/// the presented one is missing, malformed or minted for someone else.
///
/// The resolved id is available to handlers as `Extension<TrackingId>`.
pub async fn track(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let caller = req
        .extensions()
        .get::<UserId>()
        .cloned()
        .ok_or(ApiError::Unauthenticated)?;

    let presented = find_cookie(
        req.headers()
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok()),
        &state.settings.cookie_name,
    );
    let resolution = state.tracking.resolve(presented, &caller)?;

    let set_cookie = match &resolution {
        Resolution::Kept(_) => None,
        Resolution::Minted { tracking_id, expires } => {
            let cookie = SetCookie {
                name: &state.settings.cookie_name,
                value: tracking_id.to_string(),
                expires: *expires,
            };
            Some(HeaderValue::from_str(&cookie.to_string()).map_err(|e| ApiError::Internal(e.to_string()))?)
        }
    };

    req.extensions_mut().insert(resolution.into_tracking_id());
    let mut response = next.run(req).await;
    if let Some(value) = set_cookie {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    Ok(response)
}

/// Remote address and user agent, for audit log lines.
#[derive(Debug, Clone)]
pub struct ClientInfo {
    pub remote_addr: Option<SocketAddr>,
    pub user_agent: String,
}

impl<S: Send + Sync> FromRequestParts<S> for ClientInfo {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let remote_addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        Ok(Self { remote_addr, user_agent })
    }
}
