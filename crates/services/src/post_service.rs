//! # Post orchestration
//!
//! Coordinates the trust layer with the post store for the three board
//! operations. Every write first spends the caller's one-time token; the
//! token is gone before the store is touched, whether or not the mutation
//! then succeeds.

use std::sync::Arc;

use domains::{
    DomainError, NewPost, Post, PostId, PostListView, PostRepository, Result, TrackingId, UserId,
};

use crate::one_time_token::OneTimeTokenGuard;

pub struct PostService {
    repo: Arc<dyn PostRepository>,
    tokens: Arc<OneTimeTokenGuard>,
    /// Caller allowed to delete any post
    admin: UserId,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>, tokens: Arc<OneTimeTokenGuard>, admin: UserId) -> Self {
        Self { repo, tokens, admin }
    }

    pub fn tokens(&self) -> &OneTimeTokenGuard {
        &self.tokens
    }

    /// Builds the list page and arms the caller with a fresh one-time token.
    pub async fn list(&self, caller: &UserId, tracking_id: &TrackingId) -> Result<PostListView> {
        let posts = self.repo.find_all_newest_first().await?;
        let one_time_token = self.tokens.issue(caller)?;

        Ok(PostListView {
            posts,
            user: caller.clone(),
            tracking_id: tracking_id.clone(),
            one_time_token,
        })
    }

    /// Persists `content` verbatim on behalf of `caller`.
    pub async fn create(
        &self,
        caller: &UserId,
        tracking_id: &TrackingId,
        content: String,
        presented_token: &str,
    ) -> Result<Post> {
        self.consume_token(caller, presented_token, "create")?;

        let post = self
            .repo
            .create_post(NewPost {
                content,
                tracking_cookie: tracking_id.clone(),
                posted_by: caller.clone(),
            })
            .await?;

        tracing::debug!(post_id = %post.id, %caller, content = %post.content, "post stored");
        Ok(post)
    }

    /// Deletes a post if `caller` wrote it or is the administrator.
    ///
    /// Returns the removed post. A missing post is [`DomainError::NotFound`]
    /// and a foreign one is [`DomainError::Forbidden`]; in both cases the
    /// token has already been spent.
    pub async fn delete(&self, caller: &UserId, id: PostId, presented_token: &str) -> Result<Post> {
        // 1. Replay check
        self.consume_token(caller, presented_token, "delete")?;

        // 2. Lookup
        let post = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound(id))?;

        // 3. Ownership
        if !self.may_delete(caller, &post) {
            tracing::warn!(%caller, post_id = %id, owner = %post.posted_by, "delete refused: not owner");
            return Err(DomainError::Forbidden(format!("post {id} belongs to another user")));
        }

        // 4. Persistence
        self.repo.delete_post(id).await?;
        Ok(post)
    }

    fn may_delete(&self, caller: &UserId, post: &Post) -> bool {
        *caller == post.posted_by || *caller == self.admin
    }

    fn consume_token(&self, caller: &UserId, presented: &str, action: &'static str) -> Result<()> {
        if self.tokens.verify_and_consume(caller, presented) {
            Ok(())
        } else {
            tracing::warn!(%caller, action, "one-time token rejected");
            Err(DomainError::InvalidToken)
        }
    }
}
