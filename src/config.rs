//! Tuning knobs for the member-activity model.
//!
//! Loaded from TOML alongside the rest of the client configuration.
//! Validation is performed once at load and collects every violation
//! rather than stopping at the first.

use serde::Deserialize;
use thiserror::Error;

/// Returns the per-second activity decay factor default.
///
/// 0.9885^60 ≈ 0.5, giving conversation weights a half-life of about
/// one minute.
fn default_decay_factor() -> f64 {
    0.9885
}

/// Returns the minimum number of seconds between repeated away-notice
/// presentations for the same participant.
fn default_away_notice_interval() -> i64 {
    300
}

/// Tuning constants for participant activity and away-notice handling.
#[derive(Debug, Clone, Deserialize)]
pub struct Tuning {
    /// Multiplier applied to activity weights per elapsed second.
    /// Must lie strictly between 0 and 1.
    #[serde(default = "default_decay_factor")]
    pub decay_factor: f64,

    /// Seconds that must pass before an away message for the same
    /// participant is presented again.
    #[serde(default = "default_away_notice_interval")]
    pub away_notice_interval_secs: i64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            decay_factor: default_decay_factor(),
            away_notice_interval_secs: default_away_notice_interval(),
        }
    }
}

/// Validation errors for tuning values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    #[error("decay_factor must be in (0, 1), got {0}")]
    DecayFactorOutOfRange(f64),
    #[error("away_notice_interval_secs must be positive, got {0}")]
    NonPositiveAwayInterval(i64),
    #[error("invalid tuning TOML: {0}")]
    Parse(String),
}

impl Tuning {
    /// Parse tuning from a TOML document and validate it.
    pub fn from_toml_str(input: &str) -> Result<Self, Vec<TuningError>> {
        let tuning: Tuning = toml::from_str(input)
            .map_err(|e| vec![TuningError::Parse(e.to_string())])?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Validate the tuning, returning all errors found.
    pub fn validate(&self) -> Result<(), Vec<TuningError>> {
        let mut errors = Vec::new();

        if !(self.decay_factor > 0.0 && self.decay_factor < 1.0) {
            errors.push(TuningError::DecayFactorOutOfRange(self.decay_factor));
        }
        if self.away_notice_interval_secs <= 0 {
            errors.push(TuningError::NonPositiveAwayInterval(
                self.away_notice_interval_secs,
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
