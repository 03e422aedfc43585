//! ECM Domain Layer
//!
//! Core value objects and record schema for Energy Conservation Measure (ECM)
//! extraction. This crate has no runtime dependencies: it defines the typed
//! records that every extracted measure must satisfy, plus the trait boundary
//! to the model transports that live in other crates.
//!
//! ## Key Concepts
//!
//! - **Quantity**: a validated `{value, unit}` pair (money, energy, area, duration)
//! - **ECM Record**: one measure (`EcmDetail`, required) plus optional
//!   submission, building and audit context
//! - **Field Error**: a non-fatal, path-qualified validation failure
//! - **Canonical Units**: the closed unit sets the model is asked to use
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Records are immutable once constructed; a corrected record is a new value
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod quantity;
pub mod record;
pub mod traits;
pub mod units;

// Re-exports for convenience
pub use error::{FieldError, QuantityError};
pub use quantity::{Area, Duration, Energy, Money};
pub use record::{
    AuditInfo, BuildingSnapshot, EcmDetail, EcmName, EcmRecord, SavingsEntry,
    SubmissionMetadata,
};
pub use units::UnitKind;
