//! Decode options and their environment overrides
//!
//! `QR_LADDER_PARALLEL` (`0`/`1`) selects the schedule and
//! `QR_LADDER_TIMEOUT_MS` (`0` disables) sets a per-decode deadline. Values
//! are read once per process.

use std::sync::OnceLock;
use std::time::Duration;

fn parse_env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

static PARALLEL: OnceLock<bool> = OnceLock::new();

pub(crate) fn parallel_from_env() -> bool {
    *PARALLEL.get_or_init(|| parse_env_bool_u8("QR_LADDER_PARALLEL", false))
}

static TIMEOUT_MS: OnceLock<u64> = OnceLock::new();

pub(crate) fn timeout_ms_from_env() -> u64 {
    *TIMEOUT_MS.get_or_init(|| parse_env_u64("QR_LADDER_TIMEOUT_MS", 0))
}

/// How ladder attempts are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Schedule {
    /// One attempt at a time, stopping at the first terminal outcome
    #[default]
    Sequential,
    /// Stages evaluated on the rayon pool, merged in ladder order
    Parallel,
}

/// Options for a single decode invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    /// Attempt scheduling
    pub schedule: Schedule,
    /// Give up once this much time has passed since the decode started
    pub timeout: Option<Duration>,
}

impl DecodeOptions {
    /// Options from `QR_LADDER_PARALLEL` and `QR_LADDER_TIMEOUT_MS`
    pub fn from_env() -> Self {
        let schedule = if parallel_from_env() {
            Schedule::Parallel
        } else {
            Schedule::Sequential
        };
        let timeout = match timeout_ms_from_env() {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        Self { schedule, timeout }
    }

    /// Sequential schedule, no deadline
    pub fn sequential() -> Self {
        Self::default()
    }

    /// Parallel schedule, no deadline
    pub fn parallel() -> Self {
        Self {
            schedule: Schedule::Parallel,
            timeout: None,
        }
    }

    /// Set the deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
