//! Word prediction annotations from a masked language model.
//!
//! Powered by [Candle](https://github.com/huggingface/candle). Each token of a
//! sentence is masked in turn and annotated with the model's top-k replacement
//! words, serialized as `|word:score|word:score|...|`. The default model is the
//! Swedish KB-BERT.

#![deny(missing_docs)]

// ============ Internal API ============

pub(crate) mod loaders;
pub(crate) mod models;
pub(crate) mod pipelines;

// ============ Public API ============

pub mod annotate;
pub mod config;
pub mod error;

pub use pipelines::stats::AnnotationStats;
pub use pipelines::word_prediction;
