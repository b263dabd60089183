//! # api-adapters
//!
//! HTTP boundary of the posts board. The cookie helpers are framework-free;
//! everything else is compiled with the `web-axum` feature.

pub mod cookies;

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod middleware;
#[cfg(feature = "web-axum")]
pub mod router;
#[cfg(feature = "web-axum")]
pub mod state;

#[cfg(feature = "web-axum")]
pub use router::create_router;
#[cfg(feature = "web-axum")]
pub use state::{AppState, HttpSettings};
