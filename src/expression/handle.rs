//! Composable operator handles.

use crate::core::error::OperatorResult;
use crate::core::matrix::Matrix;
use crate::core::operator::Operator;
use std::ops::{Deref, DerefMut};

/// An operator that takes part in the `*` algebra.
///
/// `Op<T>` dereferences to the wrapped operator, so its configuration
/// methods stay reachable. Composing from `&Op<T>` clones the operator into
/// the new expression; composing from `Op<T>` moves it in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Op<T>(T);

impl<T> Op<T>
where
    T: Operator + Clone + 'static,
{
    /// Wrap an operator.
    pub fn new(operator: T) -> Self {
        Self(operator)
    }

    /// Unwrap the operator.
    pub fn into_inner(self) -> T {
        self.0
    }

    /// Box the wrapped operator without cloning it.
    pub(crate) fn into_node(self) -> Box<dyn Operator> {
        Box::new(self.0)
    }

    /// Box a clone of the wrapped operator.
    pub(crate) fn to_node(&self) -> Box<dyn Operator> {
        self.0.clone_box()
    }
}

impl<T> Deref for Op<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Op<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T> From<T> for Op<T>
where
    T: Operator + Clone + 'static,
{
    fn from(operator: T) -> Self {
        Self::new(operator)
    }
}

impl<T> Operator for Op<T>
where
    T: Operator + Clone + 'static,
{
    fn apply(&mut self, dst: &mut Matrix, src: &mut Matrix, first: bool) -> OperatorResult<()> {
        self.0.apply(dst, src, first)
    }

    fn name(&self) -> &str {
        self.0.name()
    }
}

/// Extension trait that wraps any operator into an [`Op`] handle.
pub trait OperatorExt: Operator + Clone + Sized + 'static {
    /// Wrap this operator so it can be composed with `*`.
    fn op(self) -> Op<Self> {
        Op::new(self)
    }
}

// Blanket implementation: every cloneable operator can be wrapped
impl<T: Operator + Clone + 'static> OperatorExt for T {}
