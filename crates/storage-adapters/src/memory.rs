//! In-memory `PostRepository`.
//!
//! Suitable for development and tests. Ids are handed out from a counter
//! that never goes backwards, so id order is creation order even after
//! deletions.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use domains::{NewPost, Post, PostId, PostRepository, Result};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<PostId, Post>,
}

#[derive(Debug, Default)]
pub struct InMemoryPostRepository {
    table: RwLock<Table>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_all_newest_first(&self) -> Result<Vec<Post>> {
        let table = self.table.read().await;
        Ok(table.rows.values().rev().cloned().collect())
    }

    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let now = Utc::now();
        let stored = Post {
            id: PostId(table.last_id),
            content: post.content,
            tracking_cookie: post.tracking_cookie,
            posted_by: post.posted_by,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(stored.id, stored.clone());
        tracing::trace!(post_id = %stored.id, "inserted post");
        Ok(stored)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn delete_post(&self, id: PostId) -> Result<()> {
        if self.table.write().await.rows.remove(&id).is_none() {
            tracing::trace!(post_id = %id, "delete of absent post ignored");
        }
        Ok(())
    }
}
