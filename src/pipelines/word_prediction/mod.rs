//! Masked word prediction.
//!
//! For a text holding one `[MASK]`, predicts the most likely words for that slot
//! and serializes them as `|word:score|word:score|...|`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use word_prediction_kb_bert::word_prediction::TopKPredictorBuilder;
//!
//! # fn main() -> word_prediction_kb_bert::error::Result<()> {
//! let predictor = TopKPredictorBuilder::kb_bert().build()?;
//!
//! let annotation = predictor.get_top_k_predictions("[MASK] åt glassen utanför kiosken .", 5)?;
//! assert!(annotation.starts_with('|') && annotation.ends_with('|'));
//! # Ok(())
//! # }
//! ```
//!
//! # Long Inputs
//!
//! Texts that encode to more than [`MAX_INPUT_TOKENS`] tokens are cut to a window
//! of about 400 characters around the mask (see [`compute_context`]). Such texts
//! must hold exactly one `[MASK]`.
//!
//! # Custom Models
//!
//! Anything implementing [`FillMaskModel`] can be wrapped with
//! [`TopKPredictor::new`].

// ============ Internal API ============

pub(crate) mod builder;
pub(crate) mod context;
pub(crate) mod model;
pub(crate) mod pipeline;
pub(crate) mod score;

#[cfg(test)]
pub(crate) mod test_helpers;

// ============ Public API ============

pub use crate::models::bert::{BertFillMaskModel, HuggingFaceModel};
pub use builder::{load_predictor, TopKPredictorBuilder};
pub use context::{compute_context, slice_chars};
pub use model::{FillMaskModel, Prediction};
pub use pipeline::{TopKPredictor, MASK_TOKEN, MAX_INPUT_TOKENS};
pub use score::{Precision, MAX_DECIMALS, MIN_DECIMALS};
