//! # Infrastructure
//!
//! Adapters behind the provider ports plus the shared result cache:
//!
//! - [`fixture`]: JSON-described in-memory host (all three provider ports)
//! - [`local_tree`]: a local checkout served as a repository tree
//! - [`clock`]: system and manually driven clocks
//! - [`cache`] and [`sweeper`]: sharded TTL cache and its background purge

// crates/infra/src/lib.rs
#![allow(clippy::multiple_crate_versions)]

pub mod cache;
pub mod clock;
pub mod fixture;
pub mod local_tree;
pub mod persistence;
pub mod sweeper;

pub use cache::{CacheKey, CacheKind, CacheStats, Cached, Expiring, ResultCache};
pub use clock::{ManualClock, SystemClock};
pub use fixture::FixtureHost;
pub use local_tree::LocalTree;
pub use sweeper::CacheSweeper;
