//! Box blur, implemented as a predicate.

use crate::core::error::{ConfigError, OperatorError, OperatorResult};
use crate::core::matrix::Matrix;
use crate::core::predicate::{Predicate, PredicateOperator};
use crate::filters::registry::{OperatorMetadata, OperatorRegistry};

/// Register blur operators.
pub fn register(registry: &mut OperatorRegistry) {
    registry.register(
        OperatorMetadata::builder("box_blur")
            .description("Mean over a (2r+1) x (2r+1) window, edges clamped")
            .parameter("radius", "Window radius in pixels (default 1)")
            .build(),
        |params| {
            let radius = params.usize_or("box_blur", "radius", 1)?;
            if radius > MAX_RADIUS {
                return Err(ConfigError::InvalidParameter {
                    operator: "box_blur".to_string(),
                    parameter: "radius".to_string(),
                    reason: format!("must be at most {}", MAX_RADIUS),
                });
            }
            Ok(Box::new(BoxBlur::with_radius(radius)))
        },
    );
}

/// Box blur operator.
pub type BoxBlur = PredicateOperator<BoxBlurPredicate>;

impl PredicateOperator<BoxBlurPredicate> {
    /// Create a box blur named `box_blur`.
    pub fn with_radius(radius: usize) -> Self {
        Self::with(radius).named("box_blur")
    }
}

/// Box blur logic. A radius of 0 copies the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoxBlurPredicate {
    radius: usize,
}

impl BoxBlurPredicate {
    /// Window radius.
    pub fn radius(&self) -> usize {
        self.radius
    }
}

impl From<usize> for BoxBlurPredicate {
    fn from(radius: usize) -> Self {
        Self { radius }
    }
}

impl Predicate for BoxBlurPredicate {
    fn do_apply(&mut self, dst: &mut Matrix, src: &mut Matrix, _first: bool) -> OperatorResult<()> {
        if src.is_empty() {
            return Err(OperatorError::empty_source("box_blur"));
        }
        check_radius(self.radius)?;

        let (rows, cols, channels) = src.shape();
        let radius = self.radius;
        let stride = src.row_stride();
        let input = src.as_slice();
        let at = |row: usize, col: usize, ch: usize| row * stride + col * channels + ch;

        // Horizontal window sums
        let mut horizontal = vec![0u64; input.len()];
        let mut prefix = Vec::with_capacity(rows.max(cols) + 1);
        for row in 0..rows {
            for ch in 0..channels {
                fill_prefix(&mut prefix, (0..cols).map(|col| input[at(row, col, ch)] as u64));
                for col in 0..cols {
                    horizontal[at(row, col, ch)] = window_sum(&prefix, col, radius);
                }
            }
        }

        let window = (2 * radius + 1) as u64;
        let area = window * window;
        dst.create(rows, cols, channels);
        let out = dst.as_mut_slice();
        for col in 0..cols {
            for ch in 0..channels {
                fill_prefix(&mut prefix, (0..rows).map(|row| horizontal[at(row, col, ch)]));
                for row in 0..rows {
                    let sum = window_sum(&prefix, row, radius);
                    out[at(row, col, ch)] = ((sum + area / 2) / area) as u8;
                }
            }
        }
        Ok(())
    }
}

/// Largest accepted radius.
pub const MAX_RADIUS: usize = 1 << 16;

fn check_radius(radius: usize) -> OperatorResult<()> {
    if radius > MAX_RADIUS {
        return Err(OperatorError::invalid_argument(
            "box_blur",
            format!("radius {} exceeds {}", radius, MAX_RADIUS),
        ));
    }
    Ok(())
}

fn fill_prefix(prefix: &mut Vec<u64>, values: impl Iterator<Item = u64>) {
    prefix.clear();
    prefix.push(0);
    let mut total = 0;
    for v in values {
        total += v;
        prefix.push(total);
    }
}

// Sum over [index - radius, index + radius] with out-of-range indices
// clamped to the first or last value.
fn window_sum(prefix: &[u64], index: usize, radius: usize) -> u64 {
    let last = prefix.len() - 2;
    let lo = index.saturating_sub(radius);
    let hi = (index + radius).min(last);
    let below = radius.saturating_sub(index) as u64;
    let above = (index + radius).saturating_sub(last) as u64;

    let first_value = prefix[1];
    let last_value = prefix[last + 1] - prefix[last];
    prefix[hi + 1] - prefix[lo] + below * first_value + above * last_value
}
