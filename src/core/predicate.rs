//! Predicate-based operators.
//!
//! A predicate holds the transformation logic of an operator as a separate
//! value. [`PredicateOperator`] owns one predicate and forwards every
//! `apply` to it, so the operator type only carries identity while the
//! predicate can be built, tested, and swapped on its own.

use crate::core::error::OperatorResult;
use crate::core::matrix::Matrix;
use crate::core::operator::Operator;

/// Transformation logic that a [`PredicateOperator`] delegates to.
///
/// Any `FnMut(&mut Matrix, &mut Matrix, bool) -> OperatorResult<()>` closure
/// that is `Clone + Send + 'static` is a predicate through the blanket impl
/// below; named types implement the trait directly. `do_apply` follows the
/// same buffer contract as [`Operator::apply`].
pub trait Predicate: Clone + Send + 'static {
    /// Transform `src` into `dst`.
    fn do_apply(&mut self, dst: &mut Matrix, src: &mut Matrix, first: bool) -> OperatorResult<()>;
}

impl<F> Predicate for F
where
    F: FnMut(&mut Matrix, &mut Matrix, bool) -> OperatorResult<()> + Clone + Send + 'static,
{
    fn do_apply(&mut self, dst: &mut Matrix, src: &mut Matrix, first: bool) -> OperatorResult<()> {
        self(dst, src, first)
    }
}

/// Operator that forwards to an owned predicate.
///
/// Cloning the operator clones the predicate with it.
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateOperator<P: Predicate> {
    predicate: P,
    name: &'static str,
}

impl<P: Predicate> PredicateOperator<P> {
    /// Create an operator around an existing predicate.
    pub fn new(predicate: P) -> Self {
        Self {
            predicate,
            name: "predicate",
        }
    }

    /// Construct the predicate from `args`.
    pub fn with<A>(args: A) -> Self
    where
        P: From<A>,
    {
        Self::new(P::from(args))
    }

    /// Set the name reported in logs and errors.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Rebuild the predicate from `args`.
    pub fn reconfigure<A>(&mut self, args: A) -> &mut Self
    where
        P: From<A>,
    {
        self.predicate = P::from(args);
        self
    }

    /// Get the predicate.
    pub fn predicate(&self) -> &P {
        &self.predicate
    }

    /// Get the predicate mutably.
    pub fn predicate_mut(&mut self) -> &mut P {
        &mut self.predicate
    }
}

impl<P: Predicate> Operator for PredicateOperator<P> {
    fn apply(&mut self, dst: &mut Matrix, src: &mut Matrix, first: bool) -> OperatorResult<()> {
        self.predicate.do_apply(dst, src, first)
    }

    fn name(&self) -> &str {
        self.name
    }
}
