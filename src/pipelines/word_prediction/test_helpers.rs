//! In-memory models for unit tests.

use super::model::{FillMaskModel, Prediction};
use super::pipeline::MASK_TOKEN;
use crate::error::{PredictionError, Result};
use std::cell::RefCell;

/// Returns canned predictions and records every call.
///
/// Tokens are counted as whitespace-separated words plus `[CLS]` and `[SEP]`.
pub(crate) struct StubModel {
    predictions: Vec<Prediction>,
    seen: RefCell<Vec<String>>,
    requested: RefCell<Vec<usize>>,
}

impl StubModel {
    pub(crate) fn new(predictions: &[(&str, f32)]) -> Self {
        Self {
            predictions: predictions
                .iter()
                .map(|&(token, score)| Prediction::new(token, score))
                .collect(),
            seen: RefCell::new(Vec::new()),
            requested: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn seen_texts(&self) -> Vec<String> {
        self.seen.borrow().clone()
    }

    pub(crate) fn requested_k(&self) -> Vec<usize> {
        self.requested.borrow().clone()
    }
}

impl FillMaskModel for StubModel {
    fn token_count(&self, text: &str) -> Result<usize> {
        Ok(text.split_whitespace().count() + 2)
    }

    fn predict_top_k(&self, text: &str, k: usize) -> Result<Vec<Prediction>> {
        self.seen.borrow_mut().push(text.to_string());
        self.requested.borrow_mut().push(k);
        if !text.contains(MASK_TOKEN) {
            return Err(PredictionError::Unexpected(format!(
                "No {MASK_TOKEN} token in input"
            )));
        }
        Ok(self.predictions.iter().take(k).cloned().collect())
    }
}

/// Fails every forward pass.
pub(crate) struct FailingModel;

impl FillMaskModel for FailingModel {
    fn token_count(&self, text: &str) -> Result<usize> {
        Ok(text.split_whitespace().count() + 2)
    }

    fn predict_top_k(&self, _text: &str, _k: usize) -> Result<Vec<Prediction>> {
        Err(candle_core::Error::Msg("out of memory".to_string()).into())
    }
}

/// 700 words with an optional `[MASK]` after word `mask_at`.
pub(crate) fn long_text(mask_at: Option<usize>) -> String {
    let mut words: Vec<String> = (0..700).map(|i| format!("ord{i}")).collect();
    if let Some(at) = mask_at {
        words.insert(at, MASK_TOKEN.to_string());
    }
    words.join(" ")
}
