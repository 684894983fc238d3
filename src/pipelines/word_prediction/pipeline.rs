use super::context::{compute_context, slice_chars};
use super::model::{FillMaskModel, Prediction};
use super::score::Precision;
use crate::error::{PredictionError, Result};

/// Placeholder substituted for the word whose replacements are predicted.
pub const MASK_TOKEN: &str = "[MASK]";

/// Largest number of tokens passed to the model in one call.
pub const MAX_INPUT_TOKENS: usize = 512;

/// Separator around and between serialized predictions.
const SEPARATOR: char = '|';

/// Predicts ranked replacements for the `[MASK]` in a text and serializes them.
///
/// Construct directly with [`TopKPredictor::new`] around any [`FillMaskModel`], or
/// with [`TopKPredictorBuilder`](super::TopKPredictorBuilder) for the default
/// Swedish BERT model.
///
/// # Examples
///
/// ```rust,no_run
/// # use word_prediction_kb_bert::word_prediction::TopKPredictorBuilder;
/// # fn main() -> word_prediction_kb_bert::error::Result<()> {
/// let predictor = TopKPredictorBuilder::kb_bert().build()?;
///
/// let annotation = predictor.get_top_k_predictions("[MASK] åt glassen utanför kiosken .", 5)?;
/// println!("{annotation}"); // |Vi:0.255|Jag:0.156|...|
/// # Ok(())
/// # }
/// ```
pub struct TopKPredictor<M: FillMaskModel> {
    pub(crate) model: M,
    precision: Precision,
}

impl<M: FillMaskModel> TopKPredictor<M> {
    /// Wraps an already loaded model.
    pub fn new(model: M, precision: Precision) -> Self {
        Self { model, precision }
    }

    /// Decimals used when rendering scores.
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Changes the decimals used for subsequent predictions.
    pub fn set_precision(&mut self, precision: Precision) {
        self.precision = precision;
    }

    /// The wrapped model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Top `k` predictions for `text` in the serialized `|word:score|...|` form.
    ///
    /// Scores that round to zero at the configured precision are left out. When
    /// nothing remains the result is `"|"`.
    ///
    /// # Errors
    ///
    /// [`PredictionError::UnsupportedInput`] when `text` is over the token budget
    /// and does not hold exactly one `[MASK]`; model failures are passed through.
    pub fn get_top_k_predictions(&self, text: &str, k: usize) -> Result<String> {
        let predictions = self.predict_top_k(text, k)?;
        Ok(self.format_predictions(&predictions))
    }

    /// Ranked predictions for `text` as returned by the model.
    ///
    /// Text longer than [`MAX_INPUT_TOKENS`] is cut down to the context window
    /// around its single mask first.
    pub fn predict_top_k(&self, text: &str, k: usize) -> Result<Vec<Prediction>> {
        let token_count = self.model.token_count(text)?;
        if token_count <= MAX_INPUT_TOKENS {
            return self.model.predict_top_k(text, k);
        }

        let masks = text.matches(MASK_TOKEN).count();
        if masks != 1 {
            return Err(PredictionError::UnsupportedInput(format!(
                "can't handle long input with {masks} {MASK_TOKEN} tokens: {token_count} tokens > {MAX_INPUT_TOKENS} tokens"
            )));
        }

        let (start, end) = compute_context(text);
        tracing::debug!(
            tokens = token_count,
            start,
            end,
            "input exceeds token budget, predicting on context window"
        );
        self.model.predict_top_k(slice_chars(text, start, end), k)
    }

    /// Serializes `predictions` in order, dropping those that show as zero.
    pub fn format_predictions(&self, predictions: &[Prediction]) -> String {
        let mut out = String::from(SEPARATOR);
        for prediction in predictions {
            let score = self.precision.format_score(prediction.score);
            if self.precision.is_zero(&score) {
                continue;
            }
            out.push_str(&prediction.token);
            out.push(':');
            out.push_str(&score);
            out.push(SEPARATOR);
        }
        out
    }
}
