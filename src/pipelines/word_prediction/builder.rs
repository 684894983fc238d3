use super::pipeline::TopKPredictor;
use super::score::Precision;
use crate::config::parse_num_decimals;
use crate::error::Result;
use crate::models::bert::{BertFillMaskModel, HuggingFaceModel};
use crate::pipelines::utils::DeviceRequest;

crate::pipelines::utils::impl_device_methods!(TopKPredictorBuilder);

/// Builder for a [`TopKPredictor`] backed by a BERT model from the Hugging Face Hub.
///
/// Use [`Self::kb_bert`] as the entry point.
///
/// # Examples
///
/// ```rust,no_run
/// # use word_prediction_kb_bert::word_prediction::{Precision, TopKPredictorBuilder};
/// # fn main() -> word_prediction_kb_bert::error::Result<()> {
/// let predictor = TopKPredictorBuilder::kb_bert()
///     .precision(Precision::new(2)?)
///     .cuda(0)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct TopKPredictorBuilder {
    model: HuggingFaceModel,
    precision: Precision,
    device_request: DeviceRequest,
}

impl TopKPredictorBuilder {
    /// Creates a builder for the pinned Swedish BERT model (KB-BERT).
    pub fn kb_bert() -> Self {
        Self::model(HuggingFaceModel::kb_bert())
    }

    /// Creates a builder for any BERT masked language model repository.
    pub fn model(model: HuggingFaceModel) -> Self {
        Self {
            model,
            precision: Precision::default(),
            device_request: DeviceRequest::default(),
        }
    }

    /// Decimals used when rendering scores (default 3).
    pub fn precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Loads the model and tokenizer and builds the predictor.
    ///
    /// # Errors
    ///
    /// Returns an error if downloading, model loading or device initialization fails.
    pub fn build(self) -> Result<TopKPredictor<BertFillMaskModel>> {
        let device = self.device_request.resolve()?;
        let model = BertFillMaskModel::load(&self.model, device)?;
        Ok(TopKPredictor::new(model, self.precision))
    }
}

/// Builds the default KB-BERT predictor, validating `num_decimals` first.
///
/// This is the preload entry point: build once and pass the predictor to
/// [`predict_words`](crate::annotate::predict_words) for every document.
///
/// # Errors
///
/// [`PredictionError::Config`](crate::error::PredictionError::Config) when
/// `num_decimals` is not an integer in `1..=10`; no model is loaded in that case.
pub fn load_predictor(num_decimals: &str) -> Result<TopKPredictor<BertFillMaskModel>> {
    let precision = parse_num_decimals(num_decimals)?;
    TopKPredictorBuilder::kb_bert().precision(precision).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PredictionError;

    #[test]
    fn load_predictor_rejects_non_integer_decimals() {
        let err = load_predictor("not an int").err().unwrap();
        assert!(matches!(err, PredictionError::Config { .. }));
    }

    #[test]
    fn builder_defaults() {
        let builder = TopKPredictorBuilder::kb_bert();
        assert_eq!(builder.model, HuggingFaceModel::kb_bert());
        assert_eq!(builder.precision, Precision::default());
        assert_eq!(builder.device_request, DeviceRequest::Cpu);

        let builder = builder.cuda(1).precision(Precision::new(5).unwrap());
        assert_eq!(builder.device_request, DeviceRequest::Cuda(1));
        assert_eq!(builder.precision.decimals(), 5);
        assert_eq!(builder.cpu().device_request, DeviceRequest::Cpu);
    }
}
