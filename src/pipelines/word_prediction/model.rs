use crate::error::Result;

/// A candidate word for a masked position with its probability.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Predicted word/token.
    pub token: String,
    /// Probability (0.0 to 1.0).
    pub score: f32,
}

impl Prediction {
    /// Creates a prediction.
    pub fn new(token: impl Into<String>, score: f32) -> Self {
        Self {
            token: token.into(),
            score,
        }
    }
}

/// Mask-filling inference capability consumed by [`TopKPredictor`](super::TopKPredictor).
///
/// Implementations own their tokenizer, so token counting and prediction always
/// agree on how text is split.
pub trait FillMaskModel {
    /// Number of tokens `text` encodes to, special tokens included.
    fn token_count(&self, text: &str) -> Result<usize>;

    /// At most `k` candidates for the `[MASK]` in `text`, sorted by descending score.
    fn predict_top_k(&self, text: &str, k: usize) -> Result<Vec<Prediction>>;
}

impl<M: FillMaskModel + ?Sized> FillMaskModel for &M {
    fn token_count(&self, text: &str) -> Result<usize> {
        (**self).token_count(text)
    }

    fn predict_top_k(&self, text: &str, k: usize) -> Result<Vec<Prediction>> {
        (**self).predict_top_k(text, k)
    }
}

impl<M: FillMaskModel + ?Sized> FillMaskModel for std::sync::Arc<M> {
    fn token_count(&self, text: &str) -> Result<usize> {
        (**self).token_count(text)
    }

    fn predict_top_k(&self, text: &str, k: usize) -> Result<Vec<Prediction>> {
        (**self).predict_top_k(text, k)
    }
}
