//! Error types for loading, adapting and decoding images.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to turn input bytes into a [`RawImage`](crate::RawImage).
///
/// Raised before any ladder attempt runs.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The bytes are not in an image format the codec understands.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The format was recognised but the data could not be decoded.
    #[error("corrupt image data: {0}")]
    CorruptData(String),

    /// The image file could not be read.
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by a symbol decoder for one attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    /// No symbol was located in the bitmap.
    #[error("no symbol found")]
    NotFound,

    /// A symbol was found but error correction could not repair it.
    #[error("symbol checksum mismatch")]
    ChecksumMismatch,

    /// A symbol was found but its structure is malformed.
    #[error("symbol format invalid")]
    FormatInvalid,

    /// Anything else. Aborts the whole decode.
    #[error("unexpected decoder failure: {0}")]
    Unexpected(String),
}

/// Misuse of a [`LuminanceSurface`](crate::binarization::LuminanceSurface).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// Requested row lies outside the surface.
    #[error("row {y} out of bounds for height {height}")]
    RowOutOfBounds {
        /// Requested row.
        y: usize,
        /// Surface height.
        height: usize,
    },
}

/// Terminal failure of a decode invocation.
///
/// "No symbol in the image" is not an error; it is a
/// [`DecodeResult`](crate::DecodeResult) with `success == false`.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The symbol decoder failed in an unexpected way.
    #[error("processing failed at {stage}/{binarizer}: {message}")]
    Processing {
        /// Ladder stage of the failing attempt.
        stage: &'static str,
        /// Binarizer of the failing attempt.
        binarizer: &'static str,
        /// Decoder message.
        message: String,
    },

    /// The caller-supplied deadline expired.
    #[error("decode timed out after {completed} attempts")]
    Timeout {
        /// Attempts that finished before the deadline.
        completed: usize,
    },
}

/// Coarse classification of a [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorClass {
    /// Image could not be loaded.
    Load,
    /// Decoder failed unexpectedly.
    Processing,
    /// Deadline expired.
    Timeout,
}

impl DecodeError {
    /// Classification used by callers that only need the failure kind.
    pub fn class(&self) -> ErrorClass {
        match self {
            DecodeError::Load(_) => ErrorClass::Load,
            DecodeError::Processing { .. } => ErrorClass::Processing,
            DecodeError::Timeout { .. } => ErrorClass::Timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes_are_distinct() {
        let load = DecodeError::from(LoadError::CorruptData("truncated".into()));
        let processing = DecodeError::Processing {
            stage: "original",
            binarizer: "local-adaptive",
            message: "boom".into(),
        };
        let timeout = DecodeError::Timeout { completed: 3 };

        assert_eq!(load.class(), ErrorClass::Load);
        assert_eq!(processing.class(), ErrorClass::Processing);
        assert_eq!(timeout.class(), ErrorClass::Timeout);
    }

    #[test]
    fn test_processing_message_names_attempt() {
        let err = DecodeError::Processing {
            stage: "edge-enhance",
            binarizer: "global-histogram",
            message: "index out of range".into(),
        };
        let text = err.to_string();
        assert!(text.contains("edge-enhance/global-histogram"));
        assert!(text.contains("index out of range"));
    }
}
