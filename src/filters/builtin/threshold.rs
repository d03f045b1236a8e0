//! Binary threshold operator.

use crate::core::error::OperatorResult;
use crate::core::matrix::Matrix;
use crate::core::operator::{ensure_source, Operator};
use crate::core::types::ExecutionModel;
use crate::filters::registry::{OperatorMetadata, OperatorRegistry};
use rayon::prelude::*;

/// Register the threshold operator.
pub fn register(registry: &mut OperatorRegistry) {
    registry.register(
        OperatorMetadata::builder("threshold")
            .description("Set samples above a level to max, the rest to 0")
            .parameter("level", "Threshold level (0-255, default 127)")
            .parameter("max", "Value for samples above the level (default 255)")
            .parameter("model", "\"sequential\" or \"parallel\" row scanning")
            .build(),
        |params| {
            let level = params.u8_or("threshold", "level", 127)?;
            let max = params.u8_or("threshold", "max", 255)?;
            let model = params.model_or("threshold", "model", ExecutionModel::Sequential)?;
            Ok(Box::new(Threshold::new(level).with_max(max).with_model(model)))
        },
    );
}

/// Binary threshold: `v > level ? max : 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold {
    level: u8,
    max: u8,
    model: ExecutionModel,
}

impl Threshold {
    /// Create a sequential threshold producing 255 above `level`.
    pub fn new(level: u8) -> Self {
        Self {
            level,
            max: 255,
            model: ExecutionModel::Sequential,
        }
    }

    /// Set the output value for samples above the level.
    pub fn with_max(mut self, max: u8) -> Self {
        self.max = max;
        self
    }

    /// Set the scanning model.
    pub fn with_model(mut self, model: ExecutionModel) -> Self {
        self.model = model;
        self
    }

    /// Current level.
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Change the level.
    pub fn set_level(&mut self, level: u8) -> &mut Self {
        self.level = level;
        self
    }

    /// Current scanning model.
    pub fn model(&self) -> ExecutionModel {
        self.model
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::new(127)
    }
}

impl Operator for Threshold {
    fn apply(&mut self, dst: &mut Matrix, src: &mut Matrix, _first: bool) -> OperatorResult<()> {
        ensure_source(self.name(), src)?;

        let (rows, cols, channels) = src.shape();
        dst.create(rows, cols, channels);

        let (level, max) = (self.level, self.max);
        let binarize = |out: &mut [u8], input: &[u8]| {
            for (d, s) in out.iter_mut().zip(input) {
                *d = if *s > level { max } else { 0 };
            }
        };

        let stride = src.row_stride();
        match self.model {
            ExecutionModel::Parallel if stride > 0 => dst
                .as_mut_slice()
                .par_chunks_mut(stride)
                .zip(src.as_slice().par_chunks(stride))
                .for_each(|(out_row, in_row)| binarize(out_row, in_row)),
            _ => binarize(dst.as_mut_slice(), src.as_slice()),
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "threshold"
    }
}
