//! Decode orchestration over the (transform x binarizer) ladder
//!
//! Attempts run in a fixed priority order: the seven stages of
//! [`Transform::LADDER`], each tried with [`Binarizer::ORDER`]. The first
//! success ends the ladder. Expected decoder failures are recorded and the
//! ladder moves on; an unexpected failure aborts the whole decode.
//!
//! The parallel schedule evaluates stages concurrently but merges their
//! reports in ladder order, so it always reports the same attempt the
//! sequential schedule would.

use crate::binarization::{Binarizer, LuminanceSurface};
use crate::config::{DecodeOptions, Schedule};
use crate::decoder::SymbolDecoder;
use crate::error::DecodeError;
use crate::models::{AttemptOutcome, DecodeAttempt, DecodeResult, LuminanceMatrix, RawImage};
use crate::transforms::Transform;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// How a stage (or the whole ladder) ended
#[derive(Debug)]
enum Terminal {
    Success(String),
    Failed {
        stage: Transform,
        binarizer: Binarizer,
        message: String,
    },
    TimedOut,
}

/// Attempts made within one stage, plus the terminal state if one was hit
#[derive(Debug, Default)]
struct StageReport {
    attempts: Vec<DecodeAttempt>,
    terminal: Option<Terminal>,
}

/// Drives the ladder for one image at a time
pub struct DecodeOrchestrator<D> {
    decoder: D,
    options: DecodeOptions,
}

impl<D: SymbolDecoder> DecodeOrchestrator<D> {
    /// Orchestrator with default (sequential, no deadline) options
    pub fn new(decoder: D) -> Self {
        Self::with_options(decoder, DecodeOptions::default())
    }

    /// Orchestrator with explicit options
    pub fn with_options(decoder: D, options: DecodeOptions) -> Self {
        Self { decoder, options }
    }

    /// Run the ladder over `image`
    ///
    /// Returns `Ok` with `success == false` when every attempt failed in an
    /// expected way. Unexpected decoder failures and deadline expiry are
    /// errors.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn decode(&self, image: &RawImage) -> Result<DecodeResult, DecodeError> {
        let deadline = self.options.timeout.map(|t| Instant::now() + t);
        let reports = match self.options.schedule {
            Schedule::Sequential => self.run_sequential(image, deadline),
            Schedule::Parallel => self.run_parallel(image, deadline),
        };
        merge(reports)
    }

    fn run_sequential(&self, image: &RawImage, deadline: Option<Instant>) -> Vec<StageReport> {
        let mut reports = Vec::with_capacity(Transform::LADDER.len());
        for stage in Transform::LADDER {
            let report = self.evaluate_stage(stage, image, deadline);
            let done = report.terminal.is_some();
            reports.push(report);
            if done {
                break;
            }
        }
        reports
    }

    fn run_parallel(&self, image: &RawImage, deadline: Option<Instant>) -> Vec<StageReport> {
        // Lowest stage index known to have terminated; stages after it are moot
        let cutoff = AtomicUsize::new(usize::MAX);
        Transform::LADDER
            .par_iter()
            .map(|&stage| {
                if stage.priority() > cutoff.load(Ordering::Acquire) {
                    return StageReport::default();
                }
                let report = self.evaluate_stage(stage, image, deadline);
                if report.terminal.is_some() {
                    cutoff.fetch_min(stage.priority(), Ordering::AcqRel);
                }
                report
            })
            .collect()
    }

    /// Run both binarizers over one stage, stopping at a terminal outcome
    fn evaluate_stage(
        &self,
        stage: Transform,
        image: &RawImage,
        deadline: Option<Instant>,
    ) -> StageReport {
        let mut report = StageReport::default();
        if expired(deadline) {
            report.terminal = Some(Terminal::TimedOut);
            return report;
        }

        let processed = stage.apply(image);
        let surface = LuminanceSurface::new(LuminanceMatrix::from_image(&processed));

        for binarizer in Binarizer::ORDER {
            if expired(deadline) {
                report.terminal = Some(Terminal::TimedOut);
                break;
            }
            let result = self.decoder.decode(&surface, binarizer);
            match AttemptOutcome::from_decoder(result) {
                Ok(outcome) => {
                    debug!(
                        stage = stage.name(),
                        binarizer = binarizer.name(),
                        outcome = outcome.label(),
                        "attempt finished"
                    );
                    let text = match &outcome {
                        AttemptOutcome::Success(text) => Some(text.clone()),
                        _ => None,
                    };
                    report.attempts.push(DecodeAttempt {
                        stage,
                        binarizer,
                        outcome,
                    });
                    if let Some(text) = text {
                        report.terminal = Some(Terminal::Success(text));
                        break;
                    }
                }
                Err(message) => {
                    warn!(
                        stage = stage.name(),
                        binarizer = binarizer.name(),
                        %message,
                        "unexpected decoder failure"
                    );
                    report.terminal = Some(Terminal::Failed {
                        stage,
                        binarizer,
                        message,
                    });
                    break;
                }
            }
        }
        report
    }
}

fn expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}

/// Fold stage reports in ladder order into the final result
fn merge(reports: Vec<StageReport>) -> Result<DecodeResult, DecodeError> {
    let mut attempts = Vec::new();
    for report in reports {
        attempts.extend(report.attempts);
        match report.terminal {
            None => continue,
            Some(Terminal::Success(text)) => {
                if let Some(winner) = attempts.last() {
                    info!(
                        stage = winner.stage.name(),
                        binarizer = winner.binarizer.name(),
                        attempts = attempts.len(),
                        "symbol decoded"
                    );
                }
                return Ok(DecodeResult::found(text, attempts));
            }
            Some(Terminal::Failed {
                stage,
                binarizer,
                message,
            }) => {
                return Err(DecodeError::Processing {
                    stage: stage.name(),
                    binarizer: binarizer.name(),
                    message,
                });
            }
            Some(Terminal::TimedOut) => {
                info!(attempts = attempts.len(), "decode deadline expired");
                return Err(DecodeError::Timeout {
                    completed: attempts.len(),
                });
            }
        }
    }

    info!(attempts = attempts.len(), "ladder exhausted without a symbol");
    Ok(DecodeResult::not_found(attempts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SymbolError;

    fn attempt(stage: Transform, binarizer: Binarizer, outcome: AttemptOutcome) -> DecodeAttempt {
        DecodeAttempt {
            stage,
            binarizer,
            outcome,
        }
    }

    #[test]
    fn test_merge_stops_at_first_terminal_report() {
        let reports = vec![
            StageReport {
                attempts: vec![
                    attempt(
                        Transform::Original,
                        Binarizer::LocalAdaptive,
                        AttemptOutcome::NotFound,
                    ),
                    attempt(
                        Transform::Original,
                        Binarizer::GlobalHistogram,
                        AttemptOutcome::FormatFail,
                    ),
                ],
                terminal: None,
            },
            StageReport {
                attempts: vec![attempt(
                    Transform::Grayscale,
                    Binarizer::LocalAdaptive,
                    AttemptOutcome::Success("first".into()),
                )],
                terminal: Some(Terminal::Success("first".into())),
            },
            StageReport {
                attempts: vec![attempt(
                    Transform::Contrast,
                    Binarizer::LocalAdaptive,
                    AttemptOutcome::Success("second".into()),
                )],
                terminal: Some(Terminal::Success("second".into())),
            },
        ];

        let result = merge(reports).unwrap();
        assert!(result.success);
        assert_eq!(result.text.as_deref(), Some("first"));
        assert_eq!(result.attempts.len(), 3);
    }

    #[test]
    fn test_merge_failure_outranks_later_success() {
        let reports = vec![
            StageReport {
                attempts: Vec::new(),
                terminal: Some(Terminal::Failed {
                    stage: Transform::Original,
                    binarizer: Binarizer::LocalAdaptive,
                    message: "boom".into(),
                }),
            },
            StageReport {
                attempts: vec![attempt(
                    Transform::Grayscale,
                    Binarizer::LocalAdaptive,
                    AttemptOutcome::Success("late".into()),
                )],
                terminal: Some(Terminal::Success("late".into())),
            },
        ];

        let err = merge(reports).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Processing {
                stage: "original",
                binarizer: "local-adaptive",
                ..
            }
        ));
    }

    #[test]
    fn test_merge_empty_is_not_found() {
        let result = merge(Vec::new()).unwrap();
        assert!(!result.success);
        assert!(result.text.is_none());
        assert!(result.attempts.is_empty());
    }

    struct AlwaysNotFound;

    impl SymbolDecoder for AlwaysNotFound {
        fn decode(&self, _: &LuminanceSurface, _: Binarizer) -> Result<String, SymbolError> {
            Err(SymbolError::NotFound)
        }
    }

    #[test]
    fn test_zero_timeout_expires_before_first_attempt() {
        let image = RawImage::new(1, 1, vec![0, 0, 0, 255]).unwrap();
        let options = DecodeOptions::sequential().with_timeout(std::time::Duration::ZERO);
        let orchestrator = DecodeOrchestrator::with_options(AlwaysNotFound, options);
        let err = orchestrator.decode(&image).unwrap_err();
        assert!(matches!(err, DecodeError::Timeout { completed: 0 }));
    }
}
