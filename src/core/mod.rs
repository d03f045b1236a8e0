//! Core types and traits for the opchain operator algebra.
//!
//! This module contains the foundational pieces every expression is built from:
//! - The matrix buffer passed between steps
//! - The Operator and Predicate capabilities
//! - Error types
//! - The execution model marker used by concrete operators

pub mod error;
pub mod matrix;
pub mod operator;
pub mod predicate;
pub mod types;

// Re-export commonly used types
pub use error::{ConfigError, MatrixError, OpchainError, OperatorError, OperatorResult};
pub use matrix::{Matrix, Shape};
pub use operator::{apply_operator, apply_operator_owned, ensure_source, Operator, OperatorClone};
pub use predicate::{Predicate, PredicateOperator};
pub use types::ExecutionModel;
