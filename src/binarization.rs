//! Bitmap-source adapter handed to binarization strategies
//!
//! A [`LuminanceSurface`] exposes exactly what a binarizer needs from a
//! luminance plane: dimensions, single rows and the full matrix. It is
//! handed to rxing's binarizers directly as a [`LuminanceSource`]; crop and
//! rotation are refused with `UnsupportedOperationException`.

use crate::error::SurfaceError;
use crate::models::LuminanceMatrix;
use rxing::LuminanceSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Binarization strategy applied before symbol decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Binarizer {
    /// Per-block thresholds (hybrid binarizer)
    LocalAdaptive,
    /// One threshold from the whole-image histogram
    GlobalHistogram,
}

impl Binarizer {
    /// Order tried within every ladder stage
    pub const ORDER: [Binarizer; 2] = [Binarizer::LocalAdaptive, Binarizer::GlobalHistogram];

    /// Name used in attempt records
    pub fn name(self) -> &'static str {
        match self {
            Binarizer::LocalAdaptive => "local-adaptive",
            Binarizer::GlobalHistogram => "global-histogram",
        }
    }
}

impl fmt::Display for Binarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read-only luminance view consumed by binarizers
///
/// Clones share the plane. Only the inversion flag is per clone.
#[derive(Debug, Clone)]
pub struct LuminanceSurface {
    matrix: Arc<LuminanceMatrix>,
    inverted: bool,
}

impl LuminanceSurface {
    /// Wrap a luminance matrix
    pub fn new(matrix: LuminanceMatrix) -> Self {
        Self {
            matrix: Arc::new(matrix),
            inverted: false,
        }
    }

    /// Surface width
    pub fn width(&self) -> usize {
        self.matrix.width()
    }

    /// Surface height
    pub fn height(&self) -> usize {
        self.matrix.height()
    }

    /// Row `y` of stored luminance values
    pub fn row(&self, y: usize) -> Result<&[u8], SurfaceError> {
        self.matrix.row(y).ok_or(SurfaceError::RowOutOfBounds {
            y,
            height: self.matrix.height(),
        })
    }

    /// The full row-major luminance matrix
    pub fn matrix(&self) -> &[u8] {
        self.matrix.as_bytes()
    }

    /// Whether binarizers see the plane inverted
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    fn level(&self, value: u8) -> u8 {
        if self.inverted { 255 - value } else { value }
    }
}

// Crop and rotation keep rxing's refusing defaults.
impl LuminanceSource for LuminanceSurface {
    fn get_row(&self, y: usize) -> Vec<u8> {
        match self.matrix.row(y) {
            Some(row) => row.iter().map(|&v| self.level(v)).collect(),
            None => Vec::new(),
        }
    }

    fn get_column(&self, x: usize) -> Vec<u8> {
        if x >= self.width() {
            return Vec::new();
        }
        (0..self.height())
            .map(|y| self.level(self.matrix.get(x, y)))
            .collect()
    }

    fn get_matrix(&self) -> Vec<u8> {
        self.matrix().iter().map(|&v| self.level(v)).collect()
    }

    fn get_width(&self) -> usize {
        self.width()
    }

    fn get_height(&self) -> usize {
        self.height()
    }

    fn invert(&mut self) {
        self.inverted = !self.inverted;
    }

    fn get_luma8_point(&self, x: usize, y: usize) -> u8 {
        self.level(self.matrix.get(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxing::Exceptions;

    fn surface() -> LuminanceSurface {
        let matrix = LuminanceMatrix::from_raw(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        LuminanceSurface::new(matrix)
    }

    #[test]
    fn test_rows_and_matrix() {
        let surface = surface();
        assert_eq!(surface.width(), 3);
        assert_eq!(surface.height(), 2);
        assert_eq!(surface.row(0).unwrap(), &[1, 2, 3]);
        assert_eq!(surface.row(1).unwrap(), &[4, 5, 6]);
        assert_eq!(surface.matrix(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_row_out_of_bounds() {
        assert_eq!(
            surface().row(2),
            Err(SurfaceError::RowOutOfBounds { y: 2, height: 2 })
        );
    }

    #[test]
    fn test_crop_and_rotate_unsupported() {
        let surface = surface();
        assert!(!surface.is_crop_supported());
        assert!(!surface.is_rotate_supported());
        assert!(matches!(
            LuminanceSource::crop(&surface, 0, 0, 1, 1),
            Err(Exceptions::UnsupportedOperationException(_))
        ));
        assert!(matches!(
            LuminanceSource::rotate_counter_clockwise(&surface),
            Err(Exceptions::UnsupportedOperationException(_))
        ));
    }

    #[test]
    fn test_luminance_source_reads() {
        let surface = surface();
        assert_eq!(surface.get_width(), 3);
        assert_eq!(surface.get_height(), 2);
        assert_eq!(surface.get_row(1), vec![4, 5, 6]);
        assert_eq!(surface.get_column(2), vec![3, 6]);
        assert_eq!(surface.get_matrix(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(surface.get_luma8_point(1, 1), 5);
    }

    #[test]
    fn test_invert_only_affects_the_inverted_clone() {
        let original = surface();
        let mut flipped = original.clone();
        flipped.invert();

        assert!(flipped.is_inverted());
        assert_eq!(flipped.get_row(0), vec![254, 253, 252]);
        assert_eq!(flipped.get_luma8_point(0, 1), 251);
        assert_eq!(original.get_row(0), vec![1, 2, 3]);
        assert_eq!(flipped.row(0).unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn test_clones_share_the_plane() {
        let original = surface();
        let copy = original.clone();
        assert!(std::ptr::eq(original.matrix().as_ptr(), copy.matrix().as_ptr()));
    }

    #[test]
    fn test_binarizer_order() {
        assert_eq!(
            Binarizer::ORDER,
            [Binarizer::LocalAdaptive, Binarizer::GlobalHistogram]
        );
        assert_eq!(Binarizer::GlobalHistogram.to_string(), "global-histogram");
    }
}
