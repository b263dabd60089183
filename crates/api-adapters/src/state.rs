//! State shared across all request handlers.

use std::sync::Arc;

use services::{PostService, TrackingIdentityManager};

/// Transport-level names that must stay stable across requests.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Name of the tracking cookie
    pub cookie_name: String,
    /// Header the upstream authenticator fills with the caller identity
    pub user_header: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            cookie_name: "tracking_id".to_string(),
            user_header: "x-forwarded-user".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub tracking: Arc<TrackingIdentityManager>,
    pub settings: Arc<HttpSettings>,
}

impl AppState {
    pub fn new(posts: PostService, tracking: TrackingIdentityManager, settings: HttpSettings) -> Self {
        Self {
            posts: Arc::new(posts),
            tracking: Arc::new(tracking),
            settings: Arc::new(settings),
        }
    }
}
