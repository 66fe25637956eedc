//! qr_ladder - QR recovery from impaired images
//!
//! Runs a fixed ladder of image preprocessing stages (grayscale, contrast,
//! Otsu threshold, resize, aggressive threshold, edge sharpening), each
//! paired with a local-adaptive and a global-histogram binarizer, until a
//! QR symbol decodes. Attempt order is fixed, so the same input always
//! yields the same result, including which stage and binarizer produced it.
//!
//! ```no_run
//! let bytes = std::fs::read("ticket.png").unwrap();
//! match qr_ladder::decode_bytes(&bytes) {
//!     Ok(result) if result.success => println!("{}", result.text.unwrap()),
//!     Ok(_) => println!("no QR code found"),
//!     Err(err) => eprintln!("decode failed: {err}"),
//! }
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Luminance surface and binarizer selection
pub mod binarization;
/// Decode options and environment overrides
pub mod config;
/// Symbol decoder seam and the rxing-backed implementation
pub mod decoder;
/// Error types
pub mod error;
/// Image loading
pub mod loader;
/// Core data structures (RawImage, LuminanceMatrix, DecodeResult, etc.)
pub mod models;
/// Ladder orchestration
pub mod pipeline;
/// Ladder stages
pub mod transforms;
/// Pixel math (luminance, histograms, Otsu)
pub mod utils;

pub use binarization::{Binarizer, LuminanceSurface};
pub use config::{DecodeOptions, Schedule};
pub use decoder::{RxingDecoder, SymbolDecoder};
pub use error::{DecodeError, ErrorClass, LoadError, SurfaceError, SymbolError};
pub use loader::{load_from_memory, load_path};
pub use models::{AttemptOutcome, DecodeAttempt, DecodeResult, LuminanceMatrix, RawImage};
pub use pipeline::DecodeOrchestrator;
pub use transforms::Transform;
pub use utils::threshold::{histogram, otsu_threshold};

use std::path::Path;

/// Decode an already-loaded image with the rxing decoder.
///
/// Options come from the environment (see [`DecodeOptions::from_env`]).
pub fn decode_image(image: &RawImage) -> Result<DecodeResult, DecodeError> {
    DecodeOrchestrator::with_options(RxingDecoder::new(), DecodeOptions::from_env()).decode(image)
}

/// Load encoded image bytes and decode them
///
/// Load failures surface as [`DecodeError::Load`] before any attempt runs.
pub fn decode_bytes(bytes: &[u8]) -> Result<DecodeResult, DecodeError> {
    let image = load_from_memory(bytes)?;
    decode_image(&image)
}

/// Load an image file and decode it
pub fn decode_path<P: AsRef<Path>>(path: P) -> Result<DecodeResult, DecodeError> {
    let image = load_path(path)?;
    decode_image(&image)
}
