//! Shared fixtures for the integration test suites.

use std::sync::Arc;

use domains::UserId;
use secrecy::SecretString;
use services::{KeyedHasher, OneTimeTokenGuard, PostService, TrackingIdentityManager};
use storage_adapters::InMemoryPostRepository;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const ADMIN: &str = "admin";
pub const USER_HEADER: &str = "x-forwarded-user";
pub const COOKIE_NAME: &str = "tracking_id";

/// A fully wired service stack over an in-memory store.
pub struct Board {
    pub repo: Arc<InMemoryPostRepository>,
    pub posts: PostService,
    pub tracking: TrackingIdentityManager,
}

impl Board {
    pub fn new() -> Self {
        let repo = Arc::new(InMemoryPostRepository::new());
        let posts = PostService::new(repo.clone(), Arc::new(OneTimeTokenGuard::new()), UserId::from(ADMIN));
        Self {
            repo,
            posts,
            tracking: tracking_manager(),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

pub fn tracking_manager() -> TrackingIdentityManager {
    let secret = SecretString::from(TEST_SECRET.to_string());
    match KeyedHasher::new(&secret) {
        Ok(hasher) => TrackingIdentityManager::new(hasher),
        Err(e) => panic!("test secret rejected: {e}"),
    }
}

#[cfg(feature = "web-axum")]
pub mod http {
    //! Router fixture and request helpers.

    use std::sync::Arc;

    use api_adapters::{create_router, AppState, HttpSettings};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, Response},
        Router,
    };

    use super::*;

    pub struct App {
        pub router: Router,
        pub repo: Arc<InMemoryPostRepository>,
    }

    pub fn app() -> App {
        let board = Board::new();
        let settings = HttpSettings {
            cookie_name: COOKIE_NAME.to_string(),
            user_header: USER_HEADER.to_string(),
        };
        App {
            router: create_router(AppState::new(board.posts, board.tracking, settings)),
            repo: board.repo,
        }
    }

    pub fn get_posts(user: &str, cookie: Option<&str>) -> Request<Body> {
        let mut req = Request::get("/posts").header(USER_HEADER, user);
        if let Some(c) = cookie {
            req = req.header(header::COOKIE, format!("{COOKIE_NAME}={c}"));
        }
        req.body(Body::empty()).unwrap()
    }

    pub fn post_form(uri: &str, user: &str, body: String) -> Request<Body> {
        Request::post(uri)
            .header(USER_HEADER, user)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    /// Value of the tracking cookie set on `resp`, if any.
    pub fn set_tracking_cookie(resp: &Response<Body>) -> Option<String> {
        resp.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|v| v.strip_prefix(&format!("{COOKIE_NAME}=")).map(str::to_string))
            .and_then(|v| v.split(';').next().map(str::to_string))
    }

    pub async fn json(resp: Response<Body>) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
