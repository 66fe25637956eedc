//! Utility functions for image processing
//!
//! This module provides the pixel math shared by the ladder stages:
//! - Luminance extraction (RGBA to 8-bit luma)
//! - Histograms and Otsu's threshold

/// RGBA to luma conversion
pub mod grayscale;
/// Histograms and Otsu thresholding
pub mod threshold;
