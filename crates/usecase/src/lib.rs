//! # Use Cases
//!
//! Application-level orchestration logic.
//!
//! This crate coordinates the domain rules with the provider ports:
//!
//! - [`tree_walker`]: one repository's tree, batched on the worker pool
//! - [`catalog`]: paged repository listing of an account
//! - [`aggregator`]: account-wide snapshot built from many walks
//! - [`quota_gate`] and [`deadline`]: when remote calls must stop
//! - [`scope`]: per-request guard every remote call passes through
//!
//! Use cases depend on both domain and ports, but not on infrastructure.

#![allow(clippy::multiple_crate_versions)]

pub mod aggregator;
pub mod catalog;
pub mod deadline;
pub mod pool;
pub mod quota_gate;
pub mod scope;
pub mod tree_walker;

#[cfg(test)]
mod testing;

pub use aggregator::{AccountAggregator, AggregateOutcome};
pub use catalog::{CatalogListing, RepositoryCatalog};
pub use deadline::Deadline;
pub use pool::WorkerPool;
pub use quota_gate::QuotaGate;
pub use scope::{CallError, RequestScope};
pub use tree_walker::{TreeWalker, WalkOutcome};
