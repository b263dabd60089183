//! Router configuration.

use axum::{
    middleware::from_fn_with_state,
    routing::{on, post, MethodFilter},
    Router,
};

use crate::handlers;
use crate::middleware::{authenticate, trace_layer, track};
use crate::state::AppState;

/// Builds the board router.
///
/// Layers run outermost first: tracing, caller authentication, then the
/// tracking cookie, so every handler sees both a `UserId` and a `TrackingId`.
///
/// `GET /posts` is routed with `MethodFilter::GET` alone: a `HEAD` must not
/// reach the list handler, which would replace the caller's outstanding token.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/posts",
            on(MethodFilter::GET, handlers::list_posts)
                .post(handlers::create_post)
                .fallback(handlers::unsupported_method),
        )
        .route(
            "/posts/delete",
            post(handlers::delete_post).fallback(handlers::unsupported_method),
        )
        .layer(from_fn_with_state(state.clone(), track))
        .layer(from_fn_with_state(state.clone(), authenticate))
        .layer(trace_layer())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use domains::UserId;
    use secrecy::SecretString;
    use services::{KeyedHasher, OneTimeTokenGuard, PostService, TrackingIdentityManager};
    use storage_adapters::InMemoryPostRepository;
    use tower::ServiceExt;

    use crate::state::HttpSettings;

    fn app() -> Router {
        let secret = SecretString::from("router-test-secret-0123456789abcdef".to_string());
        let posts = PostService::new(
            Arc::new(InMemoryPostRepository::new()),
            Arc::new(OneTimeTokenGuard::new()),
            UserId::from("admin"),
        );
        let tracking = TrackingIdentityManager::new(KeyedHasher::new(&secret).unwrap());
        create_router(AppState::new(posts, tracking, HttpSettings::default()))
    }

    #[tokio::test]
    async fn test_missing_caller_identity_is_unauthorized() {
        let resp = app()
            .oneshot(Request::get("/posts").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_unsupported_method_is_bad_request() {
        let req = Request::builder()
            .method(Method::PUT)
            .uri("/posts")
            .header("x-forwarded-user", "alice")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_head_is_bad_request() {
        for uri in ["/posts", "/posts/delete"] {
            let req = Request::builder()
                .method(Method::HEAD)
                .uri(uri)
                .header("x-forwarded-user", "alice")
                .body(Body::empty())
                .unwrap();
            let resp = app().oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_list_sets_tracking_cookie() {
        let req = Request::get("/posts")
            .header("x-forwarded-user", "alice")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("tracking_id="));
        assert!(cookie.contains("; Expires="));
    }
}
