//! Token annotation with word predictions.
//!
//! Every token of every sentence is masked in turn and annotated with the
//! serialized predictions for that slot. Tokens that belong to no sentence keep
//! an empty annotation.
//!
//! ```rust,no_run
//! use word_prediction_kb_bert::annotate::predict_words_kb_bert;
//!
//! # fn main() -> word_prediction_kb_bert::error::Result<()> {
//! let words = ["Han", "åt", "glassen", "utanför", "kiosken", "."];
//! let sentences = [vec![0, 1, 2, 3, 4, 5]];
//!
//! let output = predict_words_kb_bert(&sentences, &words, "5", "2", None)?;
//! for (word, annotation) in words.iter().zip(&output.annotations) {
//!     println!("{word}\t{annotation}");
//! }
//! # Ok(())
//! # }
//! ```

use crate::config::AnnotatorConfig;
use crate::error::{PredictionError, Result};
use crate::pipelines::stats::AnnotationStats;
use crate::word_prediction::{
    BertFillMaskModel, FillMaskModel, Precision, TopKPredictor, TopKPredictorBuilder, MASK_TOKEN,
};

/// Separator placed between the words of a sentence.
pub const TOKEN_SEPARATOR: &str = " ";

/// Result of [`predict_words`].
#[derive(Debug)]
pub struct AnnotationOutput {
    /// One serialized prediction string per token; empty for tokens outside every sentence.
    pub annotations: Vec<String>,
    /// Execution statistics.
    pub stats: AnnotationStats,
}

/// Annotates every token in `sentences` with word predictions.
///
/// Options are validated before anything else happens. `preloaded` is used when
/// given (its own precision applies); otherwise `loader` is called once with the
/// configured precision.
///
/// # Errors
///
/// Configuration errors, loader errors, and the first prediction error abort
/// the whole run.
pub fn predict_words<M, S, W, L>(
    sentences: &[S],
    token_words: &[W],
    num_predictions: &str,
    num_decimals: &str,
    preloaded: Option<&TopKPredictor<M>>,
    loader: L,
) -> Result<AnnotationOutput>
where
    M: FillMaskModel,
    S: AsRef<[usize]>,
    W: AsRef<str>,
    L: FnOnce(Precision) -> Result<TopKPredictor<M>>,
{
    tracing::info!("predict_words");
    let config = AnnotatorConfig::from_options(num_predictions, num_decimals)?;

    let loaded;
    let predictor = match preloaded {
        Some(predictor) => predictor,
        None => {
            loaded = loader(config.precision)?;
            &loaded
        }
    };

    let mut annotations = vec![String::new(); token_words.len()];
    let stats = run_word_prediction(
        predictor,
        config.num_predictions,
        sentences,
        token_words,
        &mut annotations,
    )?;

    Ok(AnnotationOutput { annotations, stats })
}

/// [`predict_words`] with the default KB-BERT model as loader.
pub fn predict_words_kb_bert<S, W>(
    sentences: &[S],
    token_words: &[W],
    num_predictions: &str,
    num_decimals: &str,
    preloaded: Option<&TopKPredictor<BertFillMaskModel>>,
) -> Result<AnnotationOutput>
where
    S: AsRef<[usize]>,
    W: AsRef<str>,
{
    predict_words(
        sentences,
        token_words,
        num_predictions,
        num_decimals,
        preloaded,
        |precision| TopKPredictorBuilder::kb_bert().precision(precision).build(),
    )
}

/// Masks each token of each sentence in turn and stores its predictions in `out`.
///
/// `out` is indexed by token index; slots of tokens outside every sentence are
/// left untouched.
///
/// # Errors
///
/// A token index outside `token_words` or `out` is reported as
/// [`PredictionError::Unexpected`]; prediction errors are passed through.
pub fn run_word_prediction<M, S, W>(
    predictor: &TopKPredictor<M>,
    num_predictions: usize,
    sentences: &[S],
    token_words: &[W],
    out: &mut [String],
) -> Result<AnnotationStats>
where
    M: FillMaskModel,
    S: AsRef<[usize]>,
    W: AsRef<str>,
{
    let total = sentences.len();
    let mut stats = AnnotationStats::start();

    for (n, sentence) in sentences.iter().enumerate() {
        let sentence = sentence.as_ref();
        tracing::debug!(sentence = n + 1, total, tokens = sentence.len(), "predicting sentence");

        for &masked in sentence {
            if masked >= token_words.len() {
                return Err(PredictionError::Unexpected(format!(
                    "token index {masked} outside token table of {} words",
                    token_words.len()
                )));
            }
            let text = masked_sentence(sentence, token_words, masked)?;
            let annotation = predictor.get_top_k_predictions(&text, num_predictions)?;
            let out_len = out.len();
            let slot = out.get_mut(masked).ok_or_else(|| {
                PredictionError::Unexpected(format!(
                    "token index {masked} outside output of {} tokens",
                    out_len
                ))
            })?;
            *slot = annotation;
            stats.record_token();
        }
        stats.record_sentence();
    }

    let stats = stats.finish();
    tracing::info!(
        sentences = stats.sentences,
        tokens = stats.tokens_annotated,
        elapsed_ms = stats.total_time.as_millis() as u64,
        "word prediction finished"
    );
    Ok(stats)
}

/// The words of `sentence` joined by single spaces, with the word at token
/// index `masked` replaced by `[MASK]`.
pub fn masked_sentence<W: AsRef<str>>(
    sentence: &[usize],
    token_words: &[W],
    masked: usize,
) -> Result<String> {
    let mut text = String::new();
    for (i, &token) in sentence.iter().enumerate() {
        if i > 0 {
            text.push_str(TOKEN_SEPARATOR);
        }
        if token == masked {
            text.push_str(MASK_TOKEN);
        } else {
            let word = token_words.get(token).ok_or_else(|| {
                PredictionError::Unexpected(format!(
                    "token index {token} outside token table of {} words",
                    token_words.len()
                ))
            })?;
            text.push_str(word.as_ref());
        }
    }
    Ok(text)
}
