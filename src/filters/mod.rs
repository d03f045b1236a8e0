//! Filter module.
//!
//! Contains the operator registry and built-in operator implementations.

pub mod builtin;
pub mod registry;

pub use registry::{OperatorFactory, OperatorMetadata, OperatorRegistry};
