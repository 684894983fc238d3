use crate::config::NUM_DECIMALS_OPTION;
use crate::error::{PredictionError, Result};

/// Smallest supported number of decimals.
pub const MIN_DECIMALS: u8 = 1;
/// Largest supported number of decimals.
pub const MAX_DECIMALS: u8 = 10;

/// Number of digits kept after the decimal point when scores are rendered.
///
/// Only `1..=10` is supported; the range is checked once on construction so
/// formatting itself cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Precision(u8);

impl Precision {
    /// Validates `decimals` against the supported range.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError::Config`] naming the `num_decimals` option when
    /// `decimals` is outside `1..=10`.
    pub fn new(decimals: i64) -> Result<Self> {
        if (i64::from(MIN_DECIMALS)..=i64::from(MAX_DECIMALS)).contains(&decimals) {
            Ok(Self(decimals as u8))
        } else {
            Err(PredictionError::config(
                NUM_DECIMALS_OPTION,
                &decimals.to_string(),
                &format!("must be between {MIN_DECIMALS} and {MAX_DECIMALS}"),
            ))
        }
    }

    /// Number of decimals.
    pub fn decimals(&self) -> u8 {
        self.0
    }

    /// Renders `score` as fixed point with exactly [`Self::decimals`] digits after the point.
    pub fn format_score(&self, score: f32) -> String {
        format!("{:.*}", usize::from(self.0), f64::from(score))
    }

    /// Whether `formatted` (as produced by [`Self::format_score`]) ends in `.`
    /// followed by [`Self::decimals`] zeros.
    ///
    /// Only the fraction is inspected, so a score rounded up to `1.000` counts too.
    pub fn is_zero(&self, formatted: &str) -> bool {
        match formatted.rsplit_once('.') {
            Some((_, fraction)) => {
                fraction.len() == usize::from(self.0) && fraction.bytes().all(|b| b == b'0')
            }
            None => false,
        }
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self(3)
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
