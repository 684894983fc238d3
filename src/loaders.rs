use std::path::{Path, PathBuf};
use std::time::Duration;

use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use hf_hub::{api::sync::ApiBuilder, Repo, RepoType};
use tokenizers::decoders::wordpiece::WordPiece as WordPieceDecoder;
use tokenizers::models::wordpiece::WordPiece;
use tokenizers::normalizers::bert::BertNormalizer;
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::processors::bert::BertProcessing;
use tokenizers::{
    AddedToken, DecoderWrapper, Model, ModelWrapper, NormalizerWrapper, PostProcessorWrapper,
    PreTokenizerWrapper, Tokenizer, TokenizerBuilder,
};

use crate::error::{PredictionError, Result};

const SPECIAL_TOKENS: [&str; 5] = ["[PAD]", "[UNK]", "[CLS]", "[SEP]", "[MASK]"];

/// One file in a Hugging Face model repository at a fixed revision.
#[derive(Debug, Clone)]
pub struct HfLoader {
    pub repo: String,
    pub revision: String,
    pub filename: String,
}

impl HfLoader {
    pub fn new(repo: &str, revision: &str, filename: &str) -> Self {
        Self {
            repo: repo.into(),
            revision: revision.into(),
            filename: filename.into(),
        }
    }

    pub fn load(&self) -> Result<PathBuf> {
        let hf_api = ApiBuilder::new().build().map_err(|e| {
            PredictionError::Download(format!("Failed to initialize HuggingFace API: {e}"))
        })?;
        let hf_repo = hf_api.repo(Repo::with_revision(
            self.repo.clone(),
            RepoType::Model,
            self.revision.clone(),
        ));

        let max_retries = 3;
        let mut attempts = 0u32;

        for attempt in 0..max_retries {
            match hf_repo.get(self.filename.as_str()) {
                Ok(path) => return Ok(path),
                Err(e) => {
                    let error_msg = e.to_string();
                    attempts = attempt + 1;
                    if error_msg.contains("Lock acquisition failed") && attempt < max_retries - 1 {
                        let wait_time = Duration::from_millis(100 * (1 << attempt));
                        std::thread::sleep(wait_time);
                        continue;
                    }
                    return Err(PredictionError::Download(format!(
                        "Failed to download '{}' from '{}@{}': {}",
                        self.filename, self.repo, self.revision, error_msg
                    )));
                }
            }
        }

        Err(PredictionError::Download(format!(
            "Download timed out for '{}' from '{}' after {} attempt(s)",
            self.filename, self.repo, attempts
        )))
    }
}

/// Loads a tokenizer from `tokenizer.json`, or builds a cased BERT WordPiece
/// tokenizer from `vocab.txt` for repositories that only ship the vocabulary.
#[derive(Debug, Clone)]
pub struct TokenizerLoader {
    pub repo: String,
    pub revision: String,
}

impl TokenizerLoader {
    pub fn new(repo: &str, revision: &str) -> Self {
        Self {
            repo: repo.into(),
            revision: revision.into(),
        }
    }

    pub fn load(&self) -> Result<Tokenizer> {
        let json = HfLoader::new(&self.repo, &self.revision, "tokenizer.json").load();
        self.resolve(json, || {
            HfLoader::new(&self.repo, &self.revision, "vocab.txt").load()
        })
    }

    fn resolve(
        &self,
        json: Result<PathBuf>,
        vocab: impl FnOnce() -> Result<PathBuf>,
    ) -> Result<Tokenizer> {
        let mut tokenizer = match json {
            Ok(path) => Tokenizer::from_file(&path).map_err(|e| {
                PredictionError::Tokenization(format!(
                    "Failed to load tokenizer from '{}': {}",
                    path.display(),
                    e
                ))
            })?,
            Err(e) => {
                tracing::debug!(
                    repo = %self.repo,
                    revision = %self.revision,
                    error = %e,
                    "no tokenizer.json, building tokenizer from vocab.txt"
                );
                wordpiece_tokenizer(&vocab()?)?
            }
        };

        // Token budget checks need the full length.
        tokenizer
            .with_truncation(None)
            .map_err(|e| PredictionError::Tokenization(e.to_string()))?;
        tokenizer.with_padding(None);
        Ok(tokenizer)
    }
}

/// Cased BERT tokenizer (no lowercasing, accents kept) over a WordPiece vocabulary file.
pub(crate) fn wordpiece_tokenizer(vocab: &Path) -> Result<Tokenizer> {
    let tokenization_err = |e: tokenizers::Error| {
        PredictionError::Tokenization(format!(
            "Failed to build tokenizer from '{}': {}",
            vocab.display(),
            e
        ))
    };

    let model = WordPiece::from_file(&vocab.display().to_string())
        .unk_token("[UNK]".to_string())
        .build()
        .map_err(tokenization_err)?;
    let special_id = |token: &str| {
        model.token_to_id(token).ok_or_else(|| {
            PredictionError::Tokenization(format!(
                "Vocabulary '{}' has no {token} token",
                vocab.display()
            ))
        })
    };
    let cls = ("[CLS]".to_string(), special_id("[CLS]")?);
    let sep = ("[SEP]".to_string(), special_id("[SEP]")?);
    special_id("[MASK]")?;

    let tokenizer = TokenizerBuilder::<
        ModelWrapper,
        NormalizerWrapper,
        PreTokenizerWrapper,
        PostProcessorWrapper,
        DecoderWrapper,
    >::new()
    .with_model(model.into())
    .with_normalizer(Some(BertNormalizer::new(true, true, Some(false), false).into()))
    .with_pre_tokenizer(Some(BertPreTokenizer.into()))
    .with_post_processor(Some(BertProcessing::new(sep, cls).into()))
    .with_decoder(Some(WordPieceDecoder::default().into()))
    .build()
    .map_err(tokenization_err)?;

    let mut tokenizer = Tokenizer::from(tokenizer);
    let special: Vec<AddedToken> = SPECIAL_TOKENS
        .iter()
        .map(|t| AddedToken::from(*t, true))
        .collect();
    tokenizer.add_special_tokens(&special);
    Ok(tokenizer)
}

/// `config.json` plus weights of a model repository, preferring safetensors.
#[derive(Debug, Clone)]
pub struct WeightsLoader {
    pub repo: String,
    pub revision: String,
}

impl WeightsLoader {
    pub fn new(repo: &str, revision: &str) -> Self {
        Self {
            repo: repo.into(),
            revision: revision.into(),
        }
    }

    pub fn load<C: serde::de::DeserializeOwned>(
        &self,
        dtype: DType,
        device: &Device,
    ) -> Result<(C, VarBuilder<'static>)> {
        let config_path = HfLoader::new(&self.repo, &self.revision, "config.json").load()?;
        let weights_path = HfLoader::new(&self.repo, &self.revision, "model.safetensors")
            .load()
            .or_else(|_| {
                HfLoader::new(&self.repo, &self.revision, "pytorch_model.bin").load()
            })?;

        let config: C = serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;

        let vb = if weights_path.extension().is_some_and(|e| e == "safetensors") {
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], dtype, device)? }
        } else {
            VarBuilder::from_pth(&weights_path, dtype, device)?
        };

        Ok((config, vb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_vocab(name: &str, tokens: &[&str]) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "word-prediction-{name}-{}-vocab.txt",
            std::process::id()
        ));
        std::fs::write(&path, tokens.join("\n")).unwrap();
        path
    }

    #[test]
    fn vocab_tokenizer_keeps_mask_whole_and_adds_special_tokens() {
        let vocab = write_vocab(
            "mask",
            &[
                "[PAD]", "[UNK]", "[CLS]", "[SEP]", "[MASK]", "Han", "åt", "glass", "##en", ".",
            ],
        );
        let tokenizer = wordpiece_tokenizer(&vocab).unwrap();

        let encoding = tokenizer.encode("[MASK] åt glassen .", true).unwrap();
        assert_eq!(
            encoding.get_tokens(),
            ["[CLS]", "[MASK]", "åt", "glass", "##en", ".", "[SEP]"]
        );
        assert_eq!(tokenizer.token_to_id("[MASK]"), Some(4));

        std::fs::remove_file(vocab).ok();
    }

    #[test]
    fn failed_tokenizer_json_falls_back_to_vocab() {
        let vocab = write_vocab(
            "fallback",
            &["[PAD]", "[UNK]", "[CLS]", "[SEP]", "[MASK]", "Han", "."],
        );
        let loader = TokenizerLoader::new("KBLab/bert-base-swedish-cased", "main");
        let json = Err(PredictionError::Download("connection refused".into()));

        let tokenizer = loader.resolve(json, || Ok(vocab.clone())).unwrap();

        let encoding = tokenizer.encode("Han [MASK] .", true).unwrap();
        assert_eq!(
            encoding.get_tokens(),
            ["[CLS]", "Han", "[MASK]", ".", "[SEP]"]
        );
        assert!(tokenizer.get_truncation().is_none());
        std::fs::remove_file(vocab).ok();
    }

    #[test]
    fn fallback_reports_missing_vocab() {
        let loader = TokenizerLoader::new("KBLab/bert-base-swedish-cased", "main");
        let json = Err(PredictionError::Download("connection refused".into()));

        let err = loader
            .resolve(json, || {
                Err(PredictionError::Download("vocab.txt not found".into()))
            })
            .unwrap_err();
        assert!(err.to_string().contains("vocab.txt not found"));
    }

    #[test]
    fn vocab_without_mask_token_is_rejected() {
        let vocab = write_vocab("nomask", &["[PAD]", "[UNK]", "[CLS]", "[SEP]", "a"]);
        let err = wordpiece_tokenizer(&vocab).unwrap_err();
        assert!(matches!(err, PredictionError::Tokenization(_)));
        std::fs::remove_file(vocab).ok();
    }
}
