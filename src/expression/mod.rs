//! Operator expressions.
//!
//! Operators are composed with `*` into an [`Expression`], an ordered chain
//! of operator clones that runs when multiplied by a [`Matrix`](crate::core::Matrix).
//! See [`algebra`] for the composition rules.

pub mod algebra;
pub mod chain;
pub mod handle;

#[cfg(test)]
pub(crate) mod testing;

pub use chain::Expression;
pub use handle::{Op, OperatorExt};
