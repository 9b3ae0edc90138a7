use std::path::Path;
use std::sync::Arc;

use log::debug;
use serde::Serialize;
use tract_onnx::prelude::*;

use crate::error::ApiError;
use crate::models::{
    BookingFeatures, PredictionResult, FEATURE_COLUMNS, FEATURE_COUNT, FEATURE_SCHEMA_VERSION,
};

/// Default decision threshold, calibrated below 0.5 to favour recall on
/// cancellations.
pub const DEFAULT_THRESHOLD: f32 = 0.30;

/// Produces the positive-class (cancellation) probability for one feature
/// row in `FEATURE_COLUMNS` order.
pub trait Classifier: Send + Sync {
    fn positive_probability(&self, features: &[f32; FEATURE_COUNT]) -> Result<f32, ApiError>;
}

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Classifier backed by the exported ONNX artifact. Loaded once at startup;
/// the optimized plan is read-only afterwards, so sharing it across workers
/// needs no locking.
pub struct OnnxClassifier {
    plan: OnnxPlan,
}

impl OnnxClassifier {
    pub fn load<P: AsRef<Path>>(model_path: P) -> Result<Self, ApiError> {
        let path = model_path.as_ref();
        let plan = Self::build_plan(path)
            .map_err(|e| ApiError::ModelUnavailable(format!("{}: {e}", path.display())))?;
        Ok(Self { plan })
    }

    fn build_plan(path: &Path) -> TractResult<OnnxPlan> {
        tract_onnx::onnx()
            .model_for_path(path)?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, FEATURE_COUNT)),
            )?
            .into_optimized()?
            .into_runnable()
    }
}

impl Classifier for OnnxClassifier {
    fn positive_probability(&self, features: &[f32; FEATURE_COUNT]) -> Result<f32, ApiError> {
        let input = Tensor::from_shape(&[1, FEATURE_COUNT], features)
            .map_err(|e| ApiError::PredictionFailed(e.to_string()))?;

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| ApiError::PredictionFailed(e.to_string()))?;

        // Classifier exports put the probability tensor last (label first
        // when both are present).
        let probabilities = outputs
            .last()
            .ok_or_else(|| ApiError::PredictionFailed("model returned no output".into()))?
            .to_array_view::<f32>()
            .map_err(|e| ApiError::PredictionFailed(e.to_string()))?;

        let values: Vec<f32> = probabilities.iter().copied().collect();
        match values.as_slice() {
            [] => Err(ApiError::PredictionFailed(
                "model returned an empty output tensor".into(),
            )),
            // A single value is a raw margin.
            [logit] => Ok(1.0 / (1.0 + (-logit).exp())),
            // Per-class probabilities, positive class last.
            [.., positive] => Ok(*positive),
        }
    }
}

/// Owns the classifier and the decision threshold. Built once in `main` and
/// handed to request handlers through `web::Data`.
pub struct InferenceService {
    classifier: Arc<dyn Classifier>,
    threshold: f32,
}

impl InferenceService {
    pub fn new(classifier: Arc<dyn Classifier>, threshold: f32) -> Self {
        Self {
            classifier,
            threshold,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Validates the record, runs the model, and applies the threshold.
    pub fn predict(&self, features: &BookingFeatures) -> Result<PredictionResult, ApiError> {
        features.validate()?;
        let p = self.classifier.positive_probability(&features.to_array())?;
        debug!(
            "positive probability {:.4} (threshold {})",
            p, self.threshold
        );
        Ok(PredictionResult::from_probability(p, self.threshold))
    }

    /// Predicts every record, preserving input order. The first failing row
    /// aborts the whole batch; results must stay positionally aligned with
    /// the caller's source rows.
    pub fn predict_batch(
        &self,
        batch: &[BookingFeatures],
    ) -> Result<Vec<PredictionResult>, ApiError> {
        batch
            .iter()
            .enumerate()
            .map(|(row, features)| self.predict(features).map_err(|e| e.with_row(row)))
            .collect()
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            input_shape: vec![1, FEATURE_COUNT],
            threshold: self.threshold,
            schema_version: FEATURE_SCHEMA_VERSION.to_string(),
            feature_order: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub input_shape: Vec<usize>,
    pub threshold: f32,
    pub schema_version: String,
    pub feature_order: Vec<String>,
}
