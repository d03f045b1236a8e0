//! Color operators: invert and grayscale.

use crate::core::error::{OperatorError, OperatorResult};
use crate::core::matrix::Matrix;
use crate::core::operator::{ensure_source, Operator};
use crate::filters::registry::{OperatorMetadata, OperatorRegistry};

/// Register color operators.
pub fn register(registry: &mut OperatorRegistry) {
    registry.register(
        OperatorMetadata::builder("invert")
            .description("Invert every sample (255 - v)")
            .build(),
        |_| Ok(Box::new(Invert)),
    );
    registry.register(
        OperatorMetadata::builder("grayscale")
            .description("Convert 3 or 4 channel matrices to a single luma channel")
            .build(),
        |_| Ok(Box::new(Grayscale)),
    );
}

/// Inverts every sample.
///
/// Works in place on the source and hands it over as the result, leaving the
/// old destination behind as the next step's storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Invert;

impl Operator for Invert {
    fn apply(&mut self, dst: &mut Matrix, src: &mut Matrix, _first: bool) -> OperatorResult<()> {
        ensure_source(self.name(), src)?;
        for v in src.as_mut_slice() {
            *v = 255 - *v;
        }
        dst.swap(src);
        Ok(())
    }

    fn name(&self) -> &str {
        "invert"
    }
}

// ITU-R BT.601 luma weights, scaled by 1000
const LUMA_WEIGHTS: [u32; 3] = [299, 587, 114];

/// Converts RGB(A) to a single luma channel. Alpha is dropped.
///
/// Single channel input passes through unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Grayscale;

impl Operator for Grayscale {
    fn apply(&mut self, dst: &mut Matrix, src: &mut Matrix, _first: bool) -> OperatorResult<()> {
        ensure_source(self.name(), src)?;

        let (rows, cols, channels) = src.shape();
        match channels {
            1 => {
                dst.swap(src);
                return Ok(());
            }
            3 | 4 => {}
            other => {
                return Err(OperatorError::UnsupportedChannels {
                    operator: self.name().to_string(),
                    channels: other,
                })
            }
        }

        dst.create(rows, cols, 1);
        for (out, pixel) in dst
            .as_mut_slice()
            .iter_mut()
            .zip(src.as_slice().chunks_exact(channels))
        {
            let weighted = pixel[0] as u32 * LUMA_WEIGHTS[0]
                + pixel[1] as u32 * LUMA_WEIGHTS[1]
                + pixel[2] as u32 * LUMA_WEIGHTS[2];
            *out = ((weighted + 500) / 1000) as u8;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "grayscale"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::operator::apply_operator;
    use crate::expression::OperatorExt;

    #[test]
    fn test_invert() {
        let input = Matrix::from_vec(1, 3, 1, vec![0, 100, 255]).unwrap();
        let out = apply_operator(&mut Invert, &input).unwrap();
        assert_eq!(out.as_slice(), &[255, 155, 0]);
    }

    #[test]
    fn test_double_invert_is_identity() {
        let input = Matrix::from_fn(4, 4, 3, |r, c, ch| (r * 16 + c * 4 + ch) as u8);
        let out = (Invert.op() * Invert.op() * &input).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_grayscale_rgb() {
        let input = Matrix::from_vec(1, 2, 3, vec![255, 255, 255, 255, 0, 0]).unwrap();
        let out = apply_operator(&mut Grayscale, &input).unwrap();
        assert_eq!(out.shape(), (1, 2, 1));
        assert_eq!(out.as_slice(), &[255, 76]);
    }

    #[test]
    fn test_grayscale_drops_alpha_in_chain() {
        let input = Matrix::filled(2, 2, 4, 10);
        let out = (Grayscale.op() * Invert.op() * &input).unwrap();
        assert_eq!(out, Matrix::filled(2, 2, 1, 245));
    }

    #[test]
    fn test_grayscale_rejects_two_channels() {
        let err = apply_operator(&mut Grayscale, &Matrix::new(1, 1, 2)).unwrap_err();
        assert!(matches!(err, OperatorError::UnsupportedChannels { channels: 2, .. }));
    }
}
