//! Geometric operators.

use crate::core::error::{OperatorError, OperatorResult};
use crate::core::matrix::Matrix;
use crate::core::operator::{ensure_source, Operator};
use crate::filters::registry::{OperatorMetadata, OperatorRegistry};

/// Register transform operators.
pub fn register(registry: &mut OperatorRegistry) {
    registry.register(
        OperatorMetadata::builder("resize")
            .description("Nearest-neighbour resize to a fixed shape")
            .parameter("rows", "Output rows (required)")
            .parameter("cols", "Output columns (required)")
            .build(),
        |params| {
            let rows = params.require_usize("resize", "rows")?;
            let cols = params.require_usize("resize", "cols")?;
            Ok(Box::new(Resize::new(rows, cols)))
        },
    );
}

/// Nearest-neighbour resize to `rows × cols`, keeping the channel count.
///
/// The destination is reshaped in place, so a stale destination from an
/// earlier step of the same size is reused without reallocating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resize {
    rows: usize,
    cols: usize,
}

impl Resize {
    /// Create a resize to `rows × cols`.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Target shape as `(rows, cols)`.
    pub fn target(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

impl Operator for Resize {
    fn apply(&mut self, dst: &mut Matrix, src: &mut Matrix, _first: bool) -> OperatorResult<()> {
        ensure_source(self.name(), src)?;
        if self.rows == 0 || self.cols == 0 {
            return Err(OperatorError::invalid_argument(
                self.name(),
                format!("target shape {}x{} is empty", self.rows, self.cols),
            ));
        }

        let (src_rows, src_cols, channels) = src.shape();
        dst.create(self.rows, self.cols, channels);

        let out_stride = dst.row_stride();
        let out = dst.as_mut_slice();
        for r in 0..self.rows {
            let sr = r * src_rows / self.rows;
            let Some(src_row) = src.row(sr) else {
                continue;
            };
            for c in 0..self.cols {
                let sc = c * src_cols / self.cols;
                let from = sc * channels;
                let to = r * out_stride + c * channels;
                out[to..to + channels].copy_from_slice(&src_row[from..from + channels]);
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "resize"
    }
}
