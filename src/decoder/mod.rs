//! Symbol decoding seam
//!
//! The ladder never looks inside a QR symbol itself. It hands each
//! binarization request to a [`SymbolDecoder`] and classifies what comes
//! back. [`RxingDecoder`] is the production implementation.

/// rxing-backed decoder
pub mod reader;

pub use reader::RxingDecoder;

use crate::binarization::{Binarizer, LuminanceSurface};
use crate::error::SymbolError;

/// Binarizes a luminance surface with the requested strategy and decodes
/// a symbol from the resulting bitmap.
///
/// Implementations must be deterministic for identical input and safe to
/// call from several threads at once.
pub trait SymbolDecoder: Sync {
    /// Decode the symbol text, or report why none was decoded
    fn decode(
        &self,
        surface: &LuminanceSurface,
        binarizer: Binarizer,
    ) -> Result<String, SymbolError>;
}

impl<D: SymbolDecoder + ?Sized> SymbolDecoder for &D {
    fn decode(
        &self,
        surface: &LuminanceSurface,
        binarizer: Binarizer,
    ) -> Result<String, SymbolError> {
        (**self).decode(surface, binarizer)
    }
}
