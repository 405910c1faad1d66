//! # Ports
//!
//! Interface definitions for the remote host the engine reads from.
//!
//! This crate defines traits that abstract external concerns:
//!
//! - [`content_tree`]: directory listings and file contents of one repository
//! - [`account`]: paged repository listings of an account
//! - [`languages`]: host-declared per-language byte totals
//! - [`rate_limit`]: the quota signal attached to every response
//! - [`clock`]: wall-clock time, injectable for tests
//!
//! These ports allow the domain and application layers to remain
//! independent of any specific transport.

// crates/ports/src/lib.rs
#![allow(clippy::multiple_crate_versions)]

pub mod account;
pub mod clock;
pub mod content_tree;
pub mod languages;
pub mod rate_limit;

pub use account::{AccountProvider, RepoMeta};
pub use clock::Clock;
pub use content_tree::{ContentTreeProvider, EntryKind, TreeEntry};
pub use languages::{DeclaredLanguageProvider, DeclaredLanguages};
pub use rate_limit::{Metered, Quota};
