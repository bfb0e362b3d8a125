#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/findash/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Caching implementations for provider responses.
//!
//! This crate provides implementations of the [`ResponseCache`] trait from `findash-core`:
//!
//! - [`InMemoryCache`] - Session memoization, lives as long as the process
//! - [`NoopCache`] - No-op cache that doesn't store anything

/// In-memory cache implementation.
pub mod memory;
/// No-op cache implementation.
pub mod noop;

// Re-export the trait for convenience
pub use findash_core::{CacheKey, ResponseCache};

// Re-export implementations
pub use memory::{CacheStats, InMemoryCache};
pub use noop::NoopCache;
