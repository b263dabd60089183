//! # services
//!
//! The trust layer of the posts board and the orchestrators built on it.
//!
//! - [`KeyedHasher`] signs `(originalId, caller)` pairs with a server secret.
//! - [`TrackingIdentityManager`] issues and re-validates the stateless
//!   tracking cookie.
//! - [`OneTimeTokenGuard`] hands out single-use anti-replay tokens, one
//!   outstanding per caller.
//! - [`PostService`] composes those with a [`domains::PostRepository`] to
//!   list, create and delete posts.

mod entropy;
pub mod keyed_hash;
pub mod one_time_token;
pub mod post_service;
pub mod tracking;

pub use keyed_hash::KeyedHasher;
pub use one_time_token::OneTimeTokenGuard;
pub use post_service::PostService;
pub use tracking::{Resolution, TrackingIdentityManager};
