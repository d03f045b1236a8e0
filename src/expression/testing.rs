//! Instrumented operators shared by the expression tests.
//!
//! Expressions hold clones, so expectations cannot be set on the operator
//! value itself. Every clone shares the same call log instead.

use crate::core::error::{OperatorError, OperatorResult};
use crate::core::matrix::Matrix;
use crate::core::operator::Operator;
use crate::core::predicate::Predicate;
use parking_lot::Mutex;
use std::sync::Arc;

/// One recorded `apply` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Call {
    pub id: usize,
    pub dst: usize,
    pub src: usize,
    pub first: bool,
}

impl Call {
    pub fn new(id: usize, dst: usize, src: usize, first: bool) -> Self {
        Self { id, dst, src, first }
    }
}

/// Shared log of calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: Call) {
        self.0.lock().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().clone()
    }

    pub fn ids(&self) -> Vec<usize> {
        self.calls().iter().map(|c| c.id).collect()
    }

    pub fn first_flags(&self) -> usize {
        self.calls().iter().filter(|c| c.first).count()
    }
}

/// Records every call, swaps its buffers, and on the first call allocates a
/// 3×3 matrix into the source slot.
#[derive(Debug, Clone)]
pub struct Recorder {
    id: usize,
    log: CallLog,
}

impl Recorder {
    pub fn new(id: usize, log: &CallLog) -> Self {
        Self {
            id,
            log: log.clone(),
        }
    }
}

impl Operator for Recorder {
    fn apply(&mut self, dst: &mut Matrix, src: &mut Matrix, first: bool) -> OperatorResult<()> {
        self.log
            .record(Call::new(self.id, dst.total(), src.total(), first));
        dst.swap(src);
        if first {
            assert_eq!(src.total(), 0);
            *src = Matrix::new(3, 3, 1);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "recorder"
    }
}

/// The same behaviour as [`Recorder`], written as a predicate.
#[derive(Debug, Clone)]
pub struct RecordingPredicate {
    id: usize,
    log: CallLog,
}

impl RecordingPredicate {
    pub fn new(id: usize, log: &CallLog) -> Self {
        Self {
            id,
            log: log.clone(),
        }
    }
}

impl Predicate for RecordingPredicate {
    fn do_apply(&mut self, dst: &mut Matrix, src: &mut Matrix, first: bool) -> OperatorResult<()> {
        Recorder::new(self.id, &self.log).apply(dst, src, first)
    }
}

/// Records every call and writes a `rows × cols` matrix filled with its id.
#[derive(Debug, Clone)]
pub struct Reshape {
    id: usize,
    rows: usize,
    cols: usize,
    log: CallLog,
}

impl Reshape {
    pub fn new(id: usize, rows: usize, cols: usize, log: &CallLog) -> Self {
        Self {
            id,
            rows,
            cols,
            log: log.clone(),
        }
    }
}

impl Operator for Reshape {
    fn apply(&mut self, dst: &mut Matrix, src: &mut Matrix, first: bool) -> OperatorResult<()> {
        self.log
            .record(Call::new(self.id, dst.total(), src.total(), first));
        dst.create(self.rows, self.cols, 1);
        dst.as_mut_slice().fill(self.id as u8);
        Ok(())
    }

    fn name(&self) -> &str {
        "reshape"
    }
}

/// Adds a constant to every sample, in place on the source.
#[derive(Debug, Clone)]
pub struct AddConst(pub u8);

impl Operator for AddConst {
    fn apply(&mut self, dst: &mut Matrix, src: &mut Matrix, _first: bool) -> OperatorResult<()> {
        for v in src.as_mut_slice() {
            *v = v.wrapping_add(self.0);
        }
        dst.swap(src);
        Ok(())
    }

    fn name(&self) -> &str {
        "add_const"
    }
}

/// Multiplies every sample by a constant into a freshly shaped destination.
#[derive(Debug, Clone)]
pub struct MulConst(pub u8);

impl Operator for MulConst {
    fn apply(&mut self, dst: &mut Matrix, src: &mut Matrix, _first: bool) -> OperatorResult<()> {
        let (rows, cols, channels) = src.shape();
        dst.create(rows, cols, channels);
        for (d, s) in dst.as_mut_slice().iter_mut().zip(src.as_slice()) {
            *d = s.wrapping_mul(self.0);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "mul_const"
    }
}

/// Always fails.
#[derive(Debug, Clone)]
pub struct Failing;

impl Operator for Failing {
    fn apply(&mut self, _dst: &mut Matrix, _src: &mut Matrix, _first: bool) -> OperatorResult<()> {
        Err(OperatorError::Failed {
            operator: "failing".to_string(),
            reason: "intentional".to_string(),
        })
    }

    fn name(&self) -> &str {
        "failing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_log_shared_across_clones_and_threads() {
        let log = CallLog::new();
        let handles: Vec<_> = (0..4)
            .map(|id| {
                let log = log.clone();
                std::thread::spawn(move || log.record(Call::new(id, 0, 1, id == 0)))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut ids = log.ids();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(log.first_flags(), 1);
    }
}
