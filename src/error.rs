//! Error types for this crate.
//!
//! All fallible operations return [`Result<T>`] which uses [`PredictionError`] as the error type.

use thiserror::Error;

/// A [`Result`](std::result::Result) alias using [`PredictionError`] as the error type.
pub type Result<T> = std::result::Result<T, PredictionError>;

/// The unified error type for all crate errors.
///
/// # Example
///
/// ```rust,no_run
/// use word_prediction_kb_bert::error::PredictionError;
///
/// fn handle_error(e: PredictionError) {
///     match &e {
///         PredictionError::Config { option, .. } => {
///             // Bad option value - fix configuration before running
///             eprintln!("check {option}");
///         }
///         PredictionError::UnsupportedInput(_) => {
///             // Text too long for the model and no single mask to centre on
///         }
///         PredictionError::Download(_) => {
///             // Network issue - retry with backoff
///         }
///         _ => {
///             eprintln!("word prediction failed: {e}");
///         }
///     }
/// }
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PredictionError {
    /// An option value could not be used. Nothing has been predicted yet.
    #[error("'{option}' {reason} got: '{value}'")]
    Config {
        /// Fully qualified option name.
        option: String,
        /// The offending value as given.
        value: String,
        /// What the option requires.
        reason: String,
    },

    /// Input exceeds the token budget and has no single mask to window around.
    #[error("{0}")]
    UnsupportedInput(String),

    /// Network or download failure. Retry may help.
    #[error("{0}")]
    Download(String),

    /// Tokenizer loading or encoding failure.
    #[error("{0}")]
    Tokenization(String),

    /// Device initialization failure. Fall back to CPU.
    #[error("{0}")]
    Device(String),

    /// Failure inside the model forward pass.
    #[error(transparent)]
    Candle(#[from] candle_core::Error),

    /// Internal error. Report if seen.
    #[error("{0}")]
    Unexpected(String),
}

impl PredictionError {
    pub(crate) fn config(option: &str, value: &str, reason: &str) -> Self {
        PredictionError::Config {
            option: option.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<hf_hub::api::sync::ApiError> for PredictionError {
    fn from(value: hf_hub::api::sync::ApiError) -> Self {
        PredictionError::Download(format!("HuggingFace API error: {}", value))
    }
}

impl From<std::io::Error> for PredictionError {
    fn from(value: std::io::Error) -> Self {
        PredictionError::Unexpected(value.to_string())
    }
}

impl From<serde_json::Error> for PredictionError {
    fn from(value: serde_json::Error) -> Self {
        PredictionError::Unexpected(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_names_option_and_value() {
        let err = PredictionError::config(
            "word_prediction_kb_bert.num_predictions",
            "not-an-int",
            "must contain an 'int'",
        );
        assert_eq!(
            err.to_string(),
            "'word_prediction_kb_bert.num_predictions' must contain an 'int' got: 'not-an-int'"
        );
    }
}
