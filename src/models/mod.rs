/// Per-pixel luminance plane
pub mod luminance;
/// Attempt and decode result records
pub mod outcome;
/// Owned RGBA pixel buffer
pub mod raw_image;

pub use luminance::LuminanceMatrix;
pub use outcome::{AttemptOutcome, DecodeAttempt, DecodeResult};
pub use raw_image::RawImage;
