//! The `*` operator algebra over operators, expressions, and matrices.
//!
//! Multiplication reads like function composition: the right-hand operand is
//! applied first.
//!
//! ```text
//! P * M1            -> M2                  apply P to M1
//! P2 * P1           -> EX(P1, P2)
//! EX(P1, P2) * P3   -> EX(P3, P1, P2)
//! P3 * EX(P1, P2)   -> EX(P1, P2, P3)
//! EX(P1, P2) * EX(P3, P4) -> EX(P3, P4, P1, P2)
//! EX(P1, P2) * M1   -> M2                  P1 runs, then P2
//! ```
//!
//! Composition does not commute: `P2 * P1` runs P1 first, `P1 * P2` runs P2
//! first.
//!
//! Rust evaluates `*` left to right, so operators written in one run gather
//! into a single expression before the matrix is reached:
//!
//! ```text
//! P3 * P2 * P1 * M1
//!   = ((P3 * P2) * P1) * M1
//!   = (EX(P2, P3) * P1) * M1
//!   = EX(P1, P2, P3) * M1
//! ```
//!
//! Parentheses among operators only group; `P3 * (P2 * P1) * M1` builds the
//! same `EX(P1, P2, P3)`. Parentheses that reach a matrix force that part to
//! run first and produce an intermediate matrix:
//!
//! ```text
//! P3 * P2 * (P1 * M1)?  =  EX(P2, P3) * M2
//! ```
//!
//! That gives the same final matrix as the deferred form only when the
//! operators do not depend on their position in the chain: each application
//! starts its own `first` step, and the intermediate buffers differ.
//!
//! Borrowed operands are cloned before they are stored or extended, so a
//! named operator or expression can be reused after composing with it.
//! Owned operands are moved into the result without cloning.
//!
//! # Example
//!
//! ```
//! use opchain::prelude::*;
//!
//! let blur = BoxBlur::with_radius(1).op();
//! let binarize = Threshold::new(128).op();
//! let input = Matrix::filled(4, 4, 1, 200);
//!
//! // blur runs first, then threshold
//! let mut expression = &binarize * &blur;
//! let output = (&mut expression * &input).unwrap();
//! assert_eq!(output.get(0, 0, 0), Some(255));
//!
//! // blur is still usable on its own
//! let mut blur = blur;
//! let blurred = (&mut blur * &input).unwrap();
//! assert_eq!(blurred.shape(), (4, 4, 1));
//! ```

use crate::core::error::OperatorResult;
use crate::core::matrix::Matrix;
use crate::core::operator::{apply_operator, apply_operator_owned, Operator};
use crate::expression::chain::Expression;
use crate::expression::handle::Op;
use std::ops::Mul;

// ============================================================================
// Operator * Operator
// ============================================================================

impl<A, B> Mul<Op<B>> for Op<A>
where
    A: Operator + Clone + 'static,
    B: Operator + Clone + 'static,
{
    type Output = Expression;

    fn mul(self, rhs: Op<B>) -> Expression {
        Expression::pair(rhs.into_node(), self.into_node())
    }
}

impl<'b, A, B> Mul<&'b Op<B>> for Op<A>
where
    A: Operator + Clone + 'static,
    B: Operator + Clone + 'static,
{
    type Output = Expression;

    fn mul(self, rhs: &'b Op<B>) -> Expression {
        Expression::pair(rhs.to_node(), self.into_node())
    }
}

impl<'a, A, B> Mul<Op<B>> for &'a Op<A>
where
    A: Operator + Clone + 'static,
    B: Operator + Clone + 'static,
{
    type Output = Expression;

    fn mul(self, rhs: Op<B>) -> Expression {
        Expression::pair(rhs.into_node(), self.to_node())
    }
}

impl<'a, 'b, A, B> Mul<&'b Op<B>> for &'a Op<A>
where
    A: Operator + Clone + 'static,
    B: Operator + Clone + 'static,
{
    type Output = Expression;

    fn mul(self, rhs: &'b Op<B>) -> Expression {
        Expression::pair(rhs.to_node(), self.to_node())
    }
}

// ============================================================================
// Expression * Operator: the operator runs first
// ============================================================================

impl<B> Mul<Op<B>> for Expression
where
    B: Operator + Clone + 'static,
{
    type Output = Expression;

    fn mul(mut self, rhs: Op<B>) -> Expression {
        self.push_front(rhs.into_node());
        self
    }
}

impl<'b, B> Mul<&'b Op<B>> for Expression
where
    B: Operator + Clone + 'static,
{
    type Output = Expression;

    fn mul(mut self, rhs: &'b Op<B>) -> Expression {
        self.push_front(rhs.to_node());
        self
    }
}

impl<'a, B> Mul<Op<B>> for &'a Expression
where
    B: Operator + Clone + 'static,
{
    type Output = Expression;

    fn mul(self, rhs: Op<B>) -> Expression {
        self.clone() * rhs
    }
}

impl<'a, 'b, B> Mul<&'b Op<B>> for &'a Expression
where
    B: Operator + Clone + 'static,
{
    type Output = Expression;

    fn mul(self, rhs: &'b Op<B>) -> Expression {
        self.clone() * rhs
    }
}

// ============================================================================
// Operator * Expression: the operator runs last
// ============================================================================

impl<A> Mul<Expression> for Op<A>
where
    A: Operator + Clone + 'static,
{
    type Output = Expression;

    fn mul(self, mut rhs: Expression) -> Expression {
        rhs.push_back(self.into_node());
        rhs
    }
}

impl<'b, A> Mul<&'b Expression> for Op<A>
where
    A: Operator + Clone + 'static,
{
    type Output = Expression;

    fn mul(self, rhs: &'b Expression) -> Expression {
        self * rhs.clone()
    }
}

impl<'a, A> Mul<Expression> for &'a Op<A>
where
    A: Operator + Clone + 'static,
{
    type Output = Expression;

    fn mul(self, mut rhs: Expression) -> Expression {
        rhs.push_back(self.to_node());
        rhs
    }
}

impl<'a, 'b, A> Mul<&'b Expression> for &'a Op<A>
where
    A: Operator + Clone + 'static,
{
    type Output = Expression;

    fn mul(self, rhs: &'b Expression) -> Expression {
        self * rhs.clone()
    }
}

// ============================================================================
// Expression * Expression: the right-hand chain runs first
// ============================================================================

impl Mul<Expression> for Expression {
    type Output = Expression;

    fn mul(self, mut rhs: Expression) -> Expression {
        rhs.append(self);
        rhs
    }
}

impl<'b> Mul<&'b Expression> for Expression {
    type Output = Expression;

    fn mul(self, rhs: &'b Expression) -> Expression {
        self * rhs.clone()
    }
}

impl<'a> Mul<Expression> for &'a Expression {
    type Output = Expression;

    fn mul(self, rhs: Expression) -> Expression {
        self.clone() * rhs
    }
}

impl<'a, 'b> Mul<&'b Expression> for &'a Expression {
    type Output = Expression;

    fn mul(self, rhs: &'b Expression) -> Expression {
        self.clone() * rhs.clone()
    }
}

// ============================================================================
// Operator * Matrix
// ============================================================================

impl<'a, 'm, A> Mul<&'m Matrix> for &'a mut Op<A>
where
    A: Operator + Clone + 'static,
{
    type Output = OperatorResult<Matrix>;

    fn mul(self, rhs: &'m Matrix) -> OperatorResult<Matrix> {
        apply_operator(self, rhs)
    }
}

impl<'m, A> Mul<&'m Matrix> for Op<A>
where
    A: Operator + Clone + 'static,
{
    type Output = OperatorResult<Matrix>;

    fn mul(mut self, rhs: &'m Matrix) -> OperatorResult<Matrix> {
        apply_operator(&mut self, rhs)
    }
}

impl<'a, A> Mul<Matrix> for &'a mut Op<A>
where
    A: Operator + Clone + 'static,
{
    type Output = OperatorResult<Matrix>;

    fn mul(self, rhs: Matrix) -> OperatorResult<Matrix> {
        apply_operator_owned(self, rhs)
    }
}

impl<A> Mul<Matrix> for Op<A>
where
    A: Operator + Clone + 'static,
{
    type Output = OperatorResult<Matrix>;

    fn mul(mut self, rhs: Matrix) -> OperatorResult<Matrix> {
        apply_operator_owned(&mut self, rhs)
    }
}

// ============================================================================
// Expression * Matrix
// ============================================================================

impl<'a, 'm> Mul<&'m Matrix> for &'a mut Expression {
    type Output = OperatorResult<Matrix>;

    fn mul(self, rhs: &'m Matrix) -> OperatorResult<Matrix> {
        self.apply(rhs)
    }
}

impl<'m> Mul<&'m Matrix> for Expression {
    type Output = OperatorResult<Matrix>;

    fn mul(mut self, rhs: &'m Matrix) -> OperatorResult<Matrix> {
        self.apply(rhs)
    }
}

impl<'a> Mul<Matrix> for &'a mut Expression {
    type Output = OperatorResult<Matrix>;

    fn mul(self, rhs: Matrix) -> OperatorResult<Matrix> {
        self.apply_owned(rhs)
    }
}

impl Mul<Matrix> for Expression {
    type Output = OperatorResult<Matrix>;

    fn mul(mut self, rhs: Matrix) -> OperatorResult<Matrix> {
        self.apply_owned(rhs)
    }
}
