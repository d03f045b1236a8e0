//! The Operator trait and the single-operator entry points.
//!
//! An operator is one step of an image expression. It receives two buffers:
//! `src` holds its input, `dst` receives its output. The operator may use
//! `src` as scratch space, since the caller never reads it un-swapped.
//!
//! # Buffer contract
//!
//! - `src` is never empty on entry.
//! - `first == true` means `dst` is empty; no earlier step has written to it.
//! - `first == false` means `dst` holds whatever an earlier step left behind
//!   and may be reused as storage.

use crate::core::error::{OperatorError, OperatorResult};
use crate::core::matrix::Matrix;

/// One transformation step that can be chained into an expression.
///
/// Implementors usually just `#[derive(Clone)]`; cloning into a boxed trait
/// object comes from the blanket [`OperatorClone`] impl.
///
/// # Example Implementation
///
/// ```
/// use opchain::prelude::*;
///
/// #[derive(Clone)]
/// struct AddOne;
///
/// impl Operator for AddOne {
///     fn apply(&mut self, dst: &mut Matrix, src: &mut Matrix, _first: bool) -> OperatorResult<()> {
///         ensure_source(self.name(), src)?;
///         for v in src.as_mut_slice() {
///             *v = v.saturating_add(1);
///         }
///         dst.swap(src);
///         Ok(())
///     }
///
///     fn name(&self) -> &str {
///         "add_one"
///     }
/// }
///
/// let mut op = AddOne;
/// let out = apply_operator(&mut op, &Matrix::filled(2, 2, 1, 1)).unwrap();
/// assert_eq!(out.get(0, 0, 0), Some(2));
/// ```
pub trait Operator: OperatorClone + Send {
    /// Transform `src` into `dst`.
    fn apply(&mut self, dst: &mut Matrix, src: &mut Matrix, first: bool) -> OperatorResult<()>;

    /// Short name used in logs and errors.
    fn name(&self) -> &str {
        "operator"
    }
}

/// Clone an operator into a new boxed trait object.
///
/// Implemented for every `Operator + Clone` type; do not implement by hand.
pub trait OperatorClone {
    /// Clone this operator into a boxed trait object.
    fn clone_box(&self) -> Box<dyn Operator>;
}

impl<T> OperatorClone for T
where
    T: Operator + Clone + 'static,
{
    fn clone_box(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }
}

// Allow cloning Box<dyn Operator>
impl Clone for Box<dyn Operator> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl std::fmt::Debug for dyn Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Operator({})", self.name())
    }
}

/// Reject an empty source matrix.
pub fn ensure_source(operator: &str, src: &Matrix) -> OperatorResult<()> {
    if src.is_empty() {
        return Err(OperatorError::empty_source(operator));
    }
    Ok(())
}

/// Apply a single operator to a copy of `input`.
///
/// Runs one `apply` with `first == true` and returns the destination buffer.
pub fn apply_operator(op: &mut dyn Operator, input: &Matrix) -> OperatorResult<Matrix> {
    ensure_source(op.name(), input)?;
    apply_operator_owned(op, input.clone())
}

/// Apply a single operator, moving `input` into the source slot.
pub fn apply_operator_owned(op: &mut dyn Operator, input: Matrix) -> OperatorResult<Matrix> {
    ensure_source(op.name(), &input)?;

    let mut src = input;
    let mut dst = Matrix::empty();

    log::trace!("applying '{}' to {:?}", op.name(), src.shape());
    op.apply(&mut dst, &mut src, true)?;

    Ok(dst)
}
