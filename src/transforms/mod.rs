//! The preprocessing ladder
//!
//! Seven named stages, each a pure `&RawImage -> RawImage` function. Stages
//! are tried in [`Transform::LADDER`] order; earlier stages are cheaper and
//! disturb the image less.

/// Pixel operations used by the stages
pub mod ops;

use crate::models::RawImage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Contrast strength for the `contrast` stage
pub const CONTRAST_STRENGTH: f32 = 0.5;
/// Contrast strength for the `aggressive-threshold` stage
pub const AGGRESSIVE_CONTRAST_STRENGTH: f32 = 0.8;
/// Fixed cutoff for the `aggressive-threshold` stage
pub const AGGRESSIVE_CUTOFF: u8 = 100;
/// Longest side allowed by the `resize` stage
pub const RESIZE_MAX_SIDE: u32 = 500;

/// A ladder stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transform {
    /// Identity
    Original,
    /// Luma replicated across RGB
    Grayscale,
    /// Grayscale, contrast x3, normalize
    Contrast,
    /// Grayscale, Otsu split
    Threshold,
    /// Fit within 500x500, grayscale, normalize; small images pass through
    Resize,
    /// Grayscale, contrast x9, split at 100
    AggressiveThreshold,
    /// Grayscale, 3x3 sharpen, normalize
    EdgeEnhance,
}

impl Transform {
    /// Fixed evaluation order
    pub const LADDER: [Transform; 7] = [
        Transform::Original,
        Transform::Grayscale,
        Transform::Contrast,
        Transform::Threshold,
        Transform::Resize,
        Transform::AggressiveThreshold,
        Transform::EdgeEnhance,
    ];

    /// Stage name used in attempt records
    pub fn name(self) -> &'static str {
        match self {
            Transform::Original => "original",
            Transform::Grayscale => "grayscale",
            Transform::Contrast => "contrast",
            Transform::Threshold => "threshold",
            Transform::Resize => "resize",
            Transform::AggressiveThreshold => "aggressive-threshold",
            Transform::EdgeEnhance => "edge-enhance",
        }
    }

    /// Position in the ladder
    pub fn priority(self) -> usize {
        self as usize
    }

    /// Look a stage up by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::LADDER.into_iter().find(|t| t.name() == name)
    }

    /// Run the stage. Never mutates `image`; always returns a new buffer.
    pub fn apply(self, image: &RawImage) -> RawImage {
        match self {
            Transform::Original => image.clone(),
            Transform::Grayscale => ops::grayscale(image),
            Transform::Contrast => {
                let gray = ops::grayscale(image);
                ops::normalize(&ops::contrast(&gray, CONTRAST_STRENGTH))
            }
            Transform::Threshold => ops::otsu_binarize(image),
            Transform::Resize => match ops::downscale_to_fit(image, RESIZE_MAX_SIDE) {
                Some(small) => ops::normalize(&ops::grayscale(&small)),
                None => image.clone(),
            },
            Transform::AggressiveThreshold => {
                let gray = ops::grayscale(image);
                let boosted = ops::contrast(&gray, AGGRESSIVE_CONTRAST_STRENGTH);
                ops::fixed_binarize(&boosted, AGGRESSIVE_CUTOFF)
            }
            Transform::EdgeEnhance => {
                let gray = ops::grayscale(image);
                ops::normalize(&ops::convolve3x3(&gray, &ops::SHARPEN_KERNEL))
            }
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
