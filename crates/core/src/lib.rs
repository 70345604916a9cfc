//! `pwpolicy-core`: shared building blocks for directory password policy.
//!
//! This crate contains **pure** primitives (no directory transport, no clock).

pub mod error;
pub mod identity;
pub mod value_object;

pub use error::{ConfigError, ConfigResult};
pub use identity::Identity;
pub use value_object::ValueObject;
