//! Dense 2-D sample container passed between operators.
//!
//! A [`Matrix`] is `rows × cols` elements, each element holding `channels`
//! interleaved `u8` samples in row-major order. The chaining core only relies
//! on four things from it:
//! - an emptiness check ([`Matrix::is_empty`])
//! - the element count ([`Matrix::total`])
//! - deep copy ([`Clone`])
//! - an O(1) content swap ([`Matrix::swap`])

use crate::core::error::MatrixError;
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use std::fmt;

/// Shape of a matrix as `(rows, cols, channels)`.
pub type Shape = (usize, usize, usize);

/// Row-major `u8` matrix with interleaved channels.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    channels: usize,
    data: Vec<u8>,
}

impl Matrix {
    /// Create a zero-filled matrix.
    pub fn new(rows: usize, cols: usize, channels: usize) -> Self {
        Self::filled(rows, cols, channels, 0)
    }

    /// Create a matrix with every sample set to `value`.
    pub fn filled(rows: usize, cols: usize, channels: usize, value: u8) -> Self {
        Self {
            rows,
            cols,
            channels,
            data: vec![value; rows * cols * channels],
        }
    }

    /// Create an empty (0×0) matrix.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap existing samples. `data.len()` must equal `rows * cols * channels`.
    pub fn from_vec(
        rows: usize,
        cols: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, MatrixError> {
        let expected = rows * cols * channels;
        if data.len() != expected {
            return Err(MatrixError::DataLength {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            channels,
            data,
        })
    }

    /// Build a matrix by evaluating `f(row, col, channel)` for every sample.
    pub fn from_fn<F>(rows: usize, cols: usize, channels: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> u8,
    {
        let mut data = Vec::with_capacity(rows * cols * channels);
        for r in 0..rows {
            for c in 0..cols {
                for ch in 0..channels {
                    data.push(f(r, c, ch));
                }
            }
        }
        Self {
            rows,
            cols,
            channels,
            data,
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of interleaved channels per element.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// `(rows, cols, channels)`.
    pub fn shape(&self) -> Shape {
        (self.rows, self.cols, self.channels)
    }

    /// Number of elements (`rows * cols`), independent of the channel count.
    pub fn total(&self) -> usize {
        self.rows * self.cols
    }

    /// Number of samples (`rows * cols * channels`).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the matrix holds no elements.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Exchange contents with `other` without copying samples.
    pub fn swap(&mut self, other: &mut Matrix) {
        std::mem::swap(self, other);
    }

    /// Reshape to `rows × cols × channels`.
    ///
    /// The existing allocation is kept when the sample count does not change,
    /// otherwise the buffer is resized. Sample values are unspecified afterwards.
    pub fn create(&mut self, rows: usize, cols: usize, channels: usize) {
        let len = rows * cols * channels;
        if self.data.len() != len {
            self.data.resize(len, 0);
        }
        self.rows = rows;
        self.cols = cols;
        self.channels = channels;
    }

    /// Drop the contents, leaving an empty matrix.
    pub fn release(&mut self) {
        *self = Self::empty();
    }

    /// Read one sample.
    pub fn get(&self, row: usize, col: usize, channel: usize) -> Option<u8> {
        self.index(row, col, channel).map(|i| self.data[i])
    }

    /// Write one sample. Returns `false` when the position is out of bounds.
    pub fn set(&mut self, row: usize, col: usize, channel: usize, value: u8) -> bool {
        match self.index(row, col, channel) {
            Some(i) => {
                self.data[i] = value;
                true
            }
            None => false,
        }
    }

    /// Samples of one row.
    pub fn row(&self, row: usize) -> Option<&[u8]> {
        if row >= self.rows {
            return None;
        }
        let stride = self.row_stride();
        Some(&self.data[row * stride..(row + 1) * stride])
    }

    /// Number of samples in one row.
    pub fn row_stride(&self) -> usize {
        self.cols * self.channels
    }

    /// All samples in row-major order.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// All samples in row-major order, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the matrix and return its samples.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    fn index(&self, row: usize, col: usize, channel: usize) -> Option<usize> {
        if row >= self.rows || col >= self.cols || channel >= self.channels {
            return None;
        }
        Some((row * self.cols + col) * self.channels + channel)
    }

    // ========================================================================
    // Image conversion
    // ========================================================================

    /// Convert a decoded image into a matrix.
    ///
    /// Luma8 maps to 1 channel, Rgb8 to 3 and Rgba8 to 4. Any other pixel
    /// format is converted to Rgba8 first.
    pub fn from_image(image: &DynamicImage) -> Self {
        let (cols, rows) = (image.width() as usize, image.height() as usize);
        let (channels, data) = match image {
            DynamicImage::ImageLuma8(buf) => (1, buf.as_raw().clone()),
            DynamicImage::ImageRgb8(buf) => (3, buf.as_raw().clone()),
            DynamicImage::ImageRgba8(buf) => (4, buf.as_raw().clone()),
            other => (4, other.to_rgba8().into_raw()),
        };
        Self {
            rows,
            cols,
            channels,
            data,
        }
    }

    /// Convert into an image. Only 1, 3 and 4 channel matrices are supported.
    pub fn to_image(&self) -> Result<DynamicImage, MatrixError> {
        let (width, height) = match (u32::try_from(self.cols), u32::try_from(self.rows)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => {
                return Err(MatrixError::TooLarge {
                    rows: self.rows,
                    cols: self.cols,
                })
            }
        };
        let data = self.data.clone();
        let length_error = || MatrixError::DataLength {
            expected: width as usize * height as usize * self.channels,
            got: self.data.len(),
        };
        match self.channels {
            1 => GrayImage::from_raw(width, height, data)
                .map(DynamicImage::ImageLuma8)
                .ok_or_else(length_error),
            3 => RgbImage::from_raw(width, height, data)
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(length_error),
            4 => RgbaImage::from_raw(width, height, data)
                .map(DynamicImage::ImageRgba8)
                .ok_or_else(length_error),
            n => Err(MatrixError::UnsupportedChannels(n)),
        }
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("channels", &self.channels)
            .field("samples", &self.data.len())
            .finish()
    }
}

impl From<&DynamicImage> for Matrix {
    fn from(image: &DynamicImage) -> Self {
        Self::from_image(image)
    }
}

impl TryFrom<&Matrix> for DynamicImage {
    type Error = MatrixError;

    fn try_from(matrix: &Matrix) -> Result<Self, Self::Error> {
        matrix.to_image()
    }
}
