//! # Handlers
//!
//! This module coordinates the flow between HTTP requests and the post
//! service. By the time a handler runs, `middleware::authenticate` has placed
//! the caller's `UserId` and `middleware::track` the resolved `TrackingId`
//! in request extensions.

use axum::{
    extract::{rejection::FormRejection, Form, State},
    response::Redirect,
    Extension, Json,
};
use domains::{PostId, PostListView, TrackingId, UserId};
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::ClientInfo;
use crate::state::AppState;

/// Where every successful write sends the browser.
pub const POSTS_PATH: &str = "/posts";

#[derive(Debug, Deserialize)]
pub struct CreatePostForm {
    #[serde(default)]
    pub content: String,
    #[serde(rename = "oneTimeToken", default)]
    pub one_time_token: String,
}

#[derive(Debug, Deserialize)]
pub struct DeletePostForm {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "oneTimeToken", default)]
    pub one_time_token: String,
}

/// `GET /posts`: the list view model, with a fresh one-time token.
pub async fn list_posts(
    State(state): State<AppState>,
    Extension(caller): Extension<UserId>,
    Extension(tracking_id): Extension<TrackingId>,
    client: ClientInfo,
) -> Result<Json<PostListView>, ApiError> {
    let view = state.posts.list(&caller, &tracking_id).await?;

    tracing::info!(
        user = %caller,
        %tracking_id,
        remote_addr = ?client.remote_addr,
        user_agent = %client.user_agent,
        "posts viewed"
    );
    Ok(Json(view))
}

/// `POST /posts`: form fields `content` and `oneTimeToken`.
pub async fn create_post(
    State(state): State<AppState>,
    Extension(caller): Extension<UserId>,
    Extension(tracking_id): Extension<TrackingId>,
    form: Result<Form<CreatePostForm>, FormRejection>,
) -> Result<Redirect, ApiError> {
    let Form(form) = form.map_err(bad_form)?;
    let post = state
        .posts
        .create(&caller, &tracking_id, form.content, &form.one_time_token)
        .await?;

    tracing::info!(user = %caller, post_id = %post.id, %tracking_id, "post created");
    Ok(Redirect::to(POSTS_PATH))
}

/// `POST /posts/delete`: form fields `id` and `oneTimeToken`.
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(caller): Extension<UserId>,
    client: ClientInfo,
    form: Result<Form<DeletePostForm>, FormRejection>,
) -> Result<Redirect, ApiError> {
    let Form(form) = form.map_err(bad_form)?;
    let id: PostId = form
        .id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid post id {:?}", form.id)))?;

    let post = state.posts.delete(&caller, id, &form.one_time_token).await?;

    tracing::info!(
        user = %caller,
        post_id = %post.id,
        owner = %post.posted_by,
        remote_addr = ?client.remote_addr,
        user_agent = %client.user_agent,
        "post deleted"
    );
    Ok(Redirect::to(POSTS_PATH))
}

/// A body that is not a urlencoded form is a bad request like any other
/// malformed input, not `415`.
fn bad_form(rejection: FormRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}

/// Any method the board does not serve on its paths.
pub async fn unsupported_method() -> ApiError {
    ApiError::BadRequest("unsupported method".into())
}
