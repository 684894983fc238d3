pub mod stats;
pub(crate) mod utils;
pub mod word_prediction;
