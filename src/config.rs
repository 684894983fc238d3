//! Annotator configuration.
//!
//! The host pipeline hands options over as strings (or loosely typed JSON). They
//! are validated here once, before any model is loaded or run.
//!
//! ```rust
//! use word_prediction_kb_bert::config::AnnotatorConfig;
//!
//! # fn main() -> word_prediction_kb_bert::error::Result<()> {
//! let config = AnnotatorConfig::from_options("5", "2")?;
//! assert_eq!(config.num_predictions, 5);
//! assert_eq!(config.precision.decimals(), 2);
//!
//! assert!(AnnotatorConfig::from_options("not-an-int", "2").is_err());
//! # Ok(())
//! # }
//! ```

use serde::Deserialize;

use crate::error::{PredictionError, Result};
use crate::word_prediction::Precision;

/// Fully qualified name of the number-of-predictions option.
pub const NUM_PREDICTIONS_OPTION: &str = "word_prediction_kb_bert.num_predictions";

/// Fully qualified name of the number-of-decimals option.
pub const NUM_DECIMALS_OPTION: &str = "word_prediction_kb_bert.num_decimals";

/// Candidates listed per token unless configured otherwise.
pub const DEFAULT_NUM_PREDICTIONS: usize = 5;

/// Validated annotator options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotatorConfig {
    /// Number of candidates requested per masked token.
    pub num_predictions: usize,
    /// Decimals scores are rounded to; also the zero cut-off.
    pub precision: Precision,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            num_predictions: DEFAULT_NUM_PREDICTIONS,
            precision: Precision::default(),
        }
    }
}

#[derive(Deserialize)]
struct RawAnnotatorConfig {
    #[serde(default)]
    num_predictions: Option<serde_json::Value>,
    #[serde(default)]
    num_decimals: Option<serde_json::Value>,
}

impl AnnotatorConfig {
    /// Parses both options from their string form.
    ///
    /// # Errors
    ///
    /// [`PredictionError::Config`] naming the first option that is not an
    /// integer, is negative, or (for decimals) is outside `1..=10`.
    pub fn from_options(num_predictions: &str, num_decimals: &str) -> Result<Self> {
        Ok(Self {
            num_predictions: parse_num_predictions(num_predictions)?,
            precision: parse_num_decimals(num_decimals)?,
        })
    }

    /// Parses a JSON object such as `{"num_predictions": 5, "num_decimals": "3"}`.
    ///
    /// Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Same as [`Self::from_json`] for an already parsed value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let raw: RawAnnotatorConfig = serde_json::from_value(value)?;
        let defaults = Self::default();

        let num_predictions = match raw.num_predictions {
            Some(v) => parse_num_predictions(&option_text(&v))?,
            None => defaults.num_predictions,
        };
        let precision = match raw.num_decimals {
            Some(v) => parse_num_decimals(&option_text(&v))?,
            None => defaults.precision,
        };

        Ok(Self {
            num_predictions,
            precision,
        })
    }
}

/// Parses the `num_predictions` option.
pub fn parse_num_predictions(value: &str) -> Result<usize> {
    let n = parse_int(NUM_PREDICTIONS_OPTION, value)?;
    usize::try_from(n)
        .map_err(|_| PredictionError::config(NUM_PREDICTIONS_OPTION, value, "must not be negative"))
}

/// Parses the `num_decimals` option into a supported [`Precision`].
pub fn parse_num_decimals(value: &str) -> Result<Precision> {
    Precision::new(parse_int(NUM_DECIMALS_OPTION, value)?)
}

fn parse_int(option: &str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| PredictionError::config(option, value, "must contain an 'int'"))
}

fn option_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
