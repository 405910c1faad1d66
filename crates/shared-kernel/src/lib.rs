// crates/shared-kernel/src/lib.rs
#![allow(clippy::multiple_crate_versions)]

pub use error::{
    DomainError, DomainResult, EntityKind, ErrorContext, InfraResult, InfrastructureError, ProviderError,
    ProviderResult, RepoLinesError, Result,
};

pub mod error;
pub mod value_objects;

pub use value_objects::{AccountId, RepoRef};
