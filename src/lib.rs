//! # opchain - Lazy Operator Chains over Image Matrices
//!
//! opchain composes matrix operators with `*` into expressions that run later,
//! when multiplied by a matrix. Execution passes two buffers between the steps
//! and swaps them after every step, so a chain of any length holds at most two
//! intermediate matrices.
//!
//! ## Features
//!
//! - **Operator algebra**: `p2 * p1` applies `p1` then `p2`; expressions extend on either side
//! - **Buffer exchange**: operators may reuse the stale destination left by earlier steps
//! - **Predicates**: keep transformation logic in a separate value behind a named operator
//! - **Pipelines**: build expressions from TOML or JSON through the operator registry
//!
//! ## Quick Start
//!
//! ```rust
//! use opchain::prelude::*;
//!
//! let invert = Invert.op();
//! let binarize = Threshold::new(100).op();
//!
//! // invert runs first
//! let mut expression = &binarize * &invert;
//!
//! let input = Matrix::filled(2, 2, 1, 50);
//! let output = (&mut expression * &input).unwrap();
//! assert_eq!(output, Matrix::filled(2, 2, 1, 255));
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`core`]: Matrix buffer, operator and predicate traits, error handling
//! - [`expression`]: Expressions and the composition algebra
//! - [`filters`]: Operator registry and built-in operators
//! - [`config`]: Pipeline configuration files
//!
//! ## Creating Custom Operators
//!
//! Implement the [`Operator`](core::Operator) trait. Anything `Clone` can then
//! take part in expressions through [`OperatorExt::op`](expression::OperatorExt::op):
//!
//! ```rust
//! use opchain::prelude::*;
//!
//! #[derive(Clone)]
//! struct Brighten(u8);
//!
//! impl Operator for Brighten {
//!     fn apply(&mut self, dst: &mut Matrix, src: &mut Matrix, _first: bool) -> OperatorResult<()> {
//!         ensure_source("brighten", src)?;
//!         for v in src.as_mut_slice() {
//!             *v = v.saturating_add(self.0);
//!         }
//!         dst.swap(src);
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "brighten"
//!     }
//! }
//!
//! let mut twice = Brighten(10).op() * Brighten(5).op();
//! let out = (&mut twice * &Matrix::new(1, 1, 1)).unwrap();
//! assert_eq!(out.get(0, 0, 0), Some(15));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod expression;
pub mod filters;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust
/// use opchain::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::matrix::{Matrix, Shape};
    pub use crate::core::types::ExecutionModel;

    // Operator and predicate traits
    pub use crate::core::operator::{
        apply_operator, apply_operator_owned, ensure_source, Operator, OperatorClone,
    };
    pub use crate::core::predicate::{Predicate, PredicateOperator};

    // Errors
    pub use crate::core::error::{
        ConfigError, ConfigResult, MatrixError, OpchainError, OpchainResult, OperatorError,
        OperatorResult,
    };

    // Expressions
    pub use crate::expression::{Expression, Op, OperatorExt};

    // Registry and configuration
    pub use crate::config::{Parameters, PipelineConfig, StepConfig};
    pub use crate::filters::registry::{OperatorMetadata, OperatorRegistry};

    // Built-in operators
    pub use crate::filters::builtin::{
        BoxBlur, BoxBlurPredicate, Grayscale, Invert, Resize, Threshold,
    };
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
