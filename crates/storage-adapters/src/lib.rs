//! # storage-adapters
//!
//! Implementations of the `domains` storage ports.

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "memory")]
pub use memory::InMemoryPostRepository;
