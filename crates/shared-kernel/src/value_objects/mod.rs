// crates/shared-kernel/src/value_objects/mod.rs
pub mod identifiers;

pub use identifiers::{AccountId, RepoRef};
