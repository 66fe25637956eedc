use crate::binarization::Binarizer;
use crate::error::{DecodeError, ErrorClass, SymbolError};
use crate::transforms::Transform;
use serde::{Deserialize, Serialize};

/// Outcome of one (transform, binarizer) attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "kebab-case")]
pub enum AttemptOutcome {
    /// Symbol decoded to this text
    Success(String),
    /// No symbol located
    NotFound,
    /// Symbol located, error correction failed
    ChecksumFail,
    /// Symbol located, structure malformed
    FormatFail,
}

impl AttemptOutcome {
    /// Classify a decoder result.
    ///
    /// Unexpected failures are not outcomes; they come back as `Err`.
    pub fn from_decoder(result: Result<String, SymbolError>) -> Result<Self, String> {
        match result {
            Ok(text) => Ok(AttemptOutcome::Success(text)),
            Err(SymbolError::NotFound) => Ok(AttemptOutcome::NotFound),
            Err(SymbolError::ChecksumMismatch) => Ok(AttemptOutcome::ChecksumFail),
            Err(SymbolError::FormatInvalid) => Ok(AttemptOutcome::FormatFail),
            Err(SymbolError::Unexpected(message)) => Err(message),
        }
    }

    /// Whether this outcome ends the ladder
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success(_))
    }

    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            AttemptOutcome::Success(_) => "success",
            AttemptOutcome::NotFound => "not-found",
            AttemptOutcome::ChecksumFail => "checksum-fail",
            AttemptOutcome::FormatFail => "format-fail",
        }
    }
}

/// One evaluated ladder attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeAttempt {
    /// Preprocessing stage
    pub stage: Transform,
    /// Binarization strategy
    pub binarizer: Binarizer,
    /// What the symbol decoder reported
    pub outcome: AttemptOutcome,
}

/// Result of running the ladder over one image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeResult {
    /// Whether a symbol was decoded
    pub success: bool,
    /// Decoded text when `success` is true
    pub text: Option<String>,
    /// Evaluated attempts in ladder order, ending at the terminal attempt
    pub attempts: Vec<DecodeAttempt>,
    /// Failure class; only set by [`DecodeResult::from_error`]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<ErrorClass>,
}

impl DecodeResult {
    pub(crate) fn found(text: String, attempts: Vec<DecodeAttempt>) -> Self {
        Self {
            success: true,
            text: Some(text),
            attempts,
            error: None,
        }
    }

    pub(crate) fn not_found(attempts: Vec<DecodeAttempt>) -> Self {
        Self {
            success: false,
            text: None,
            attempts,
            error: None,
        }
    }

    /// Flatten a decode error into a result record for reporting
    pub fn from_error(error: &DecodeError) -> Self {
        Self {
            success: false,
            text: None,
            attempts: Vec::new(),
            error: Some(error.class()),
        }
    }

    /// The attempt that produced the text, if any
    pub fn winning_attempt(&self) -> Option<&DecodeAttempt> {
        if !self.success {
            return None;
        }
        self.attempts.last().filter(|a| a.outcome.is_success())
    }
}
