//! Operator expressions and the two-buffer application loop.

use crate::core::error::OperatorResult;
use crate::core::matrix::Matrix;
use crate::core::operator::{ensure_source, Operator};
use std::collections::VecDeque;

/// An ordered chain of owned operator clones.
///
/// Nodes run front to back. An expression always holds at least one node:
/// it can only be created by composing operators with `*` (or by the
/// registry from a pipeline configuration), and it only ever grows.
///
/// `Clone` deep-copies every node, so a cloned expression can be extended
/// or applied without touching the original.
#[derive(Debug, Clone)]
pub struct Expression {
    nodes: VecDeque<Box<dyn Operator>>,
}

impl Expression {
    /// Chain of two nodes, `first` applied before `second`.
    pub(crate) fn pair(first: Box<dyn Operator>, second: Box<dyn Operator>) -> Self {
        Self {
            nodes: VecDeque::from([first, second]),
        }
    }

    /// Chain of a single node.
    pub(crate) fn from_node(node: Box<dyn Operator>) -> Self {
        Self {
            nodes: VecDeque::from([node]),
        }
    }

    /// Run `node` before every existing node.
    pub(crate) fn push_front(&mut self, node: Box<dyn Operator>) {
        self.nodes.push_front(node);
    }

    /// Run `node` after every existing node.
    pub(crate) fn push_back(&mut self, node: Box<dyn Operator>) {
        self.nodes.push_back(node);
    }

    /// Move the nodes of `later` to the end of this chain.
    pub(crate) fn append(&mut self, mut later: Expression) {
        self.nodes.append(&mut later.nodes);
    }

    /// Number of operators in the chain.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`; expressions are never empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Names of the operators in application order.
    pub fn operator_names(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name()).collect()
    }

    /// Apply every node in order to a copy of `input`.
    pub fn apply(&mut self, input: &Matrix) -> OperatorResult<Matrix> {
        ensure_source(self.head_name(), input)?;
        self.apply_owned(input.clone())
    }

    /// Apply every node in order, moving `input` into the source slot.
    ///
    /// Only two buffers are used for the whole chain. After each node the
    /// source and destination are swapped, so the next node reads the
    /// previous output and may reuse the older buffer as its destination.
    /// The first node that fails stops the chain and its error is returned
    /// unchanged.
    pub fn apply_owned(&mut self, input: Matrix) -> OperatorResult<Matrix> {
        ensure_source(self.head_name(), &input)?;

        let mut src = input;
        let mut dst = Matrix::empty();
        let mut first = true;

        log::debug!(
            "applying expression of {} operators to {:?}",
            self.nodes.len(),
            src.shape()
        );

        for (index, node) in self.nodes.iter_mut().enumerate() {
            log::trace!(
                "node {} '{}': first={} dst={} src={}",
                index,
                node.name(),
                first,
                dst.total(),
                src.total()
            );

            if let Err(error) = node.apply(&mut dst, &mut src, first) {
                log::debug!("node {} '{}' failed: {}", index, node.name(), error);
                return Err(error);
            }

            dst.swap(&mut src);
            first = false;
        }

        // The result is in src due to the swap at the end of each iteration.
        Ok(src)
    }

    fn head_name(&self) -> &str {
        self.nodes.front().map(|n| n.name()).unwrap_or("expression")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::OperatorError;
    use crate::core::operator::{apply_operator, OperatorClone};
    use crate::expression::testing::{AddConst, Call, CallLog, Failing, MulConst, Recorder, Reshape};

    fn chain(nodes: Vec<Box<dyn Operator>>) -> Expression {
        let mut iter = nodes.into_iter();
        let mut expression = Expression::from_node(iter.next().unwrap());
        for node in iter {
            expression.push_back(node);
        }
        expression
    }

    #[test]
    fn test_pair_order() {
        let log = CallLog::new();
        let mut ex = Expression::pair(
            Box::new(Recorder::new(1, &log)),
            Box::new(Recorder::new(2, &log)),
        );

        ex.apply(&Matrix::new(2, 2, 1)).unwrap();

        assert_eq!(log.ids(), vec![1, 2]);
    }

    #[test]
    fn test_buffers_are_exchanged() {
        let log = CallLog::new();
        let mut ex = chain(vec![
            Box::new(Recorder::new(1, &log)),
            Box::new(Recorder::new(2, &log)),
            Box::new(Recorder::new(3, &log)),
        ]);

        let out = ex.apply(&Matrix::new(2, 2, 1)).unwrap();

        assert_eq!(
            log.calls(),
            vec![
                Call::new(1, 0, 4, true),
                Call::new(2, 9, 4, false),
                Call::new(3, 9, 4, false),
            ]
        );
        assert_eq!(out.total(), 4);
    }

    #[test]
    fn test_resized_output_reaches_next_node() {
        let log = CallLog::new();
        let mut ex = Expression::pair(
            Box::new(Reshape::new(1, 3, 3, &log)),
            Box::new(Reshape::new(2, 5, 1, &log)),
        );

        let out = ex.apply(&Matrix::new(2, 2, 1)).unwrap();

        // Second node reads the 3×3 result and gets the original 2×2 buffer as storage.
        assert_eq!(
            log.calls(),
            vec![Call::new(1, 0, 4, true), Call::new(2, 4, 9, false)]
        );
        assert_eq!(out, Matrix::filled(5, 1, 1, 2));
    }

    #[test]
    fn test_first_flag_once_per_application() {
        let log = CallLog::new();
        let mut ex = chain((0..5).map(|i| Recorder::new(i, &log).clone_box()).collect());

        ex.apply(&Matrix::new(2, 2, 1)).unwrap();
        ex.apply(&Matrix::new(2, 2, 1)).unwrap();

        assert_eq!(log.calls().len(), 10);
        assert_eq!(log.first_flags(), 2);
        assert!(log.calls()[0].first && log.calls()[5].first);
    }

    #[test]
    fn test_single_node_matches_bare_operator() {
        let input = Matrix::from_fn(3, 2, 1, |r, c, _| (r * 2 + c) as u8);

        let mut bare = MulConst(3);
        let expected = apply_operator(&mut bare, &input).unwrap();
        let actual = Expression::from_node(Box::new(MulConst(3))).apply(&input).unwrap();
        assert_eq!(actual, expected);

        let mut bare = AddConst(7);
        let expected = apply_operator(&mut bare, &input).unwrap();
        let actual = Expression::from_node(Box::new(AddConst(7))).apply(&input).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_input_is_not_modified() {
        let input = Matrix::filled(2, 2, 1, 1);
        let mut ex = Expression::pair(Box::new(AddConst(1)), Box::new(AddConst(1)));

        let out = ex.apply(&input).unwrap();

        assert_eq!(input, Matrix::filled(2, 2, 1, 1));
        assert_eq!(out, Matrix::filled(2, 2, 1, 3));
    }

    #[test]
    fn test_failure_stops_chain() {
        let log = CallLog::new();
        let mut ex = chain(vec![
            Box::new(Recorder::new(1, &log)),
            Box::new(Failing),
            Box::new(Recorder::new(3, &log)),
        ]);

        let err = ex.apply(&Matrix::new(2, 2, 1)).unwrap_err();

        assert_eq!(
            err,
            OperatorError::Failed {
                operator: "failing".to_string(),
                reason: "intentional".to_string(),
            }
        );
        assert_eq!(log.ids(), vec![1]);
    }

    #[test]
    fn test_empty_input_rejected() {
        let log = CallLog::new();
        let mut ex = Expression::pair(
            Box::new(Recorder::new(1, &log)),
            Box::new(Recorder::new(2, &log)),
        );

        let err = ex.apply(&Matrix::empty()).unwrap_err();

        assert_eq!(err, OperatorError::empty_source("recorder"));
        assert!(log.calls().is_empty());
    }

    #[test]
    fn test_clone_is_deep() {
        let original = Expression::pair(Box::new(AddConst(1)), Box::new(MulConst(2)));
        let mut copy = original.clone();
        copy.push_back(Box::new(AddConst(5)));
        copy.push_front(Box::new(AddConst(5)));

        assert_eq!(original.len(), 2);
        assert_eq!(copy.len(), 4);
        assert_eq!(
            copy.operator_names(),
            vec!["add_const", "add_const", "mul_const", "add_const"]
        );
    }

    #[test]
    fn test_append_moves_nodes() {
        let mut ex = Expression::pair(Box::new(AddConst(1)), Box::new(AddConst(2)));
        ex.append(Expression::pair(Box::new(MulConst(2)), Box::new(MulConst(3))));

        assert_eq!(ex.len(), 4);
        assert!(!ex.is_empty());
        let out = ex.apply_owned(Matrix::filled(1, 1, 1, 1)).unwrap();
        assert_eq!(out.get(0, 0, 0), Some(24));
    }
}
