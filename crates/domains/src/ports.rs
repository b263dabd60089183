//! # Ports
//!
//! Any storage adapter must implement these traits to be wired in by the binary.

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::{NewPost, Post, PostId};

/// Persistence contract for posts.
///
/// The store is assumed durable and ordered by id; this crate never cares how.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// All posts, highest id first.
    async fn find_all_newest_first(&self) -> Result<Vec<Post>>;

    /// Persists a new post and returns it with its assigned id and timestamps.
    async fn create_post(&self, post: NewPost) -> Result<Post>;

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>>;

    /// Removes the post. Deleting an id that no longer exists is not an error.
    async fn delete_post(&self, id: PostId) -> Result<()>;
}
