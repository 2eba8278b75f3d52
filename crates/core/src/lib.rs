//! `stockyard-core`: identifiers, errors and entity primitives shared by the
//! stock aggregation and alerting crates.
//!
//! No IO lives here.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult, StorageError};
pub use id::{AlertId, ItemId, LocationId, SupplierId};
