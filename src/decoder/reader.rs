use super::SymbolDecoder;
use crate::binarization::{Binarizer, LuminanceSurface};
use crate::error::SymbolError;
use rxing::common::{GlobalHistogramBinarizer, HybridBinarizer};
use rxing::qrcode::QRCodeReader;
use rxing::{BinaryBitmap, DecodeHintValue, DecodeHints, Exceptions, Reader};
use std::panic::{self, AssertUnwindSafe};
use tracing::warn;

/// QR decoder backed by rxing's binarizers and QR reader
#[derive(Debug, Clone, Copy)]
pub struct RxingDecoder {
    try_harder: bool,
}

impl RxingDecoder {
    /// Decoder with the `TryHarder` hint enabled
    pub fn new() -> Self {
        Self { try_harder: true }
    }

    /// Toggle rxing's `TryHarder` hint
    pub fn with_try_harder(mut self, try_harder: bool) -> Self {
        self.try_harder = try_harder;
        self
    }

    fn hints(&self) -> DecodeHints {
        DecodeHints::default().with(DecodeHintValue::TryHarder(self.try_harder))
    }

    fn run(
        &self,
        surface: &LuminanceSurface,
        binarizer: Binarizer,
    ) -> Result<String, Exceptions> {
        // Clones share the luminance plane
        let source = surface.clone();
        let hints = self.hints();
        let mut reader = QRCodeReader::default();
        let result = match binarizer {
            Binarizer::LocalAdaptive => {
                let mut bitmap = BinaryBitmap::new(HybridBinarizer::new(source));
                reader.decode_with_hints(&mut bitmap, &hints)?
            }
            Binarizer::GlobalHistogram => {
                let mut bitmap = BinaryBitmap::new(GlobalHistogramBinarizer::new(source));
                reader.decode_with_hints(&mut bitmap, &hints)?
            }
        };
        Ok(result.getText().to_string())
    }
}

impl Default for RxingDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolDecoder for RxingDecoder {
    fn decode(
        &self,
        surface: &LuminanceSurface,
        binarizer: Binarizer,
    ) -> Result<String, SymbolError> {
        // rxing indexes aggressively; a panic is an unexpected failure, not a crash
        match panic::catch_unwind(AssertUnwindSafe(|| self.run(surface, binarizer))) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(err)) => Err(classify(err)),
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "panic in symbol decoder".to_string());
                warn!(binarizer = binarizer.name(), %message, "symbol decoder panicked");
                Err(SymbolError::Unexpected(message))
            }
        }
    }
}

/// Map rxing's exception kinds onto the three expected failures
pub(crate) fn classify(err: Exceptions) -> SymbolError {
    match err {
        Exceptions::NotFoundException(_) => SymbolError::NotFound,
        Exceptions::ChecksumException(_) | Exceptions::ReedSolomonException(_) => {
            SymbolError::ChecksumMismatch
        }
        Exceptions::FormatException(_) => SymbolError::FormatInvalid,
        other => SymbolError::Unexpected(format!("{other:?}")),
    }
}
