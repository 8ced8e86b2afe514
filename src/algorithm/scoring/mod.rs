//! Linear model scoring
//!
//! A fitted logistic model turns a feature vector into a surveillance
//! probability, which is binarized against a cutoff.

use std::collections::BTreeMap;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::util::safe_read_to_string;
use crate::error::{IndicationError, Result};
use crate::models::{FeatureVector, Prediction, ScanLabel};
use crate::utils::logging::log_artifact_loaded;

/// Probabilities below this magnitude are reported as exactly zero
pub const PROBABILITY_SNAP_EPSILON: f64 = 1e-4;

/// Pretrained logistic regression artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    /// Intercept of the linear predictor
    pub intercept: f64,
    /// Weight per feature name
    pub coefficients: BTreeMap<String, f64>,
    /// Default binarization cutoff, in [0, 1]
    pub cutoff: f64,
}

impl FittedModel {
    /// Create and validate a model
    pub fn new(intercept: f64, coefficients: BTreeMap<String, f64>, cutoff: f64) -> Result<Self> {
        let model = Self {
            intercept,
            coefficients,
            cutoff,
        };
        model.validate()?;
        Ok(model)
    }

    /// Parse a model from its JSON form
    pub fn from_json_str(json: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Load a model artifact from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = safe_read_to_string(path, "fitted model")?;
        let model = Self::from_json_str(&content).map_err(|e| match e {
            IndicationError::Json(source) => IndicationError::config_at(
                format!("Fitted model is not valid JSON: {source}"),
                path,
            ),
            IndicationError::Config { message, .. } => IndicationError::config_at(message, path),
            other => other,
        })?;

        log_artifact_loaded(
            "fitted model",
            path,
            &format!(
                "{} coefficients, cutoff {}",
                model.coefficients.len(),
                model.cutoff
            ),
        );
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        if self.coefficients.is_empty() {
            return Err(IndicationError::config("Fitted model has no coefficients"));
        }
        if !self.intercept.is_finite() {
            return Err(IndicationError::config("Fitted model intercept is not finite"));
        }
        if let Some((name, _)) = self.coefficients.iter().find(|(_, w)| !w.is_finite()) {
            return Err(IndicationError::config(format!(
                "Coefficient for '{name}' is not finite"
            )));
        }
        if !is_valid_cutoff(self.cutoff) {
            return Err(IndicationError::config(format!(
                "Model cutoff {} is outside [0, 1]",
                self.cutoff
            )));
        }
        Ok(())
    }

    /// Names of the features the model reads
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.coefficients.keys().map(String::as_str)
    }

    /// Intercept plus the weighted sum of the model's features
    ///
    /// Features in the vector that the model does not declare are ignored.
    pub fn linear_predictor(&self, features: &FeatureVector) -> Result<f64> {
        self.coefficients
            .iter()
            .try_fold(self.intercept, |acc, (name, weight)| {
                features
                    .get(name)
                    .map(|value| acc + weight * value)
                    .ok_or_else(|| {
                        IndicationError::schema(format!(
                            "Feature '{name}' required by the model is missing"
                        ))
                    })
            })
    }
}

fn is_valid_cutoff(cutoff: f64) -> bool {
    (0.0..=1.0).contains(&cutoff)
}

/// Logistic link with near-zero snapping
#[must_use]
pub fn logistic(linear_predictor: f64) -> f64 {
    let probability = 1.0 / (1.0 + (-linear_predictor).exp());
    if probability.abs() < PROBABILITY_SNAP_EPSILON {
        0.0
    } else {
        probability
    }
}

/// Scores feature vectors against a fitted model
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    model: &'a FittedModel,
    cutoff: f64,
}

impl<'a> Scorer<'a> {
    /// Create a scorer, using `cutoff_override` when it lies in [0, 1]
    #[must_use]
    pub fn new(model: &'a FittedModel, cutoff_override: Option<f64>) -> Self {
        let cutoff = match cutoff_override {
            Some(cutoff) if is_valid_cutoff(cutoff) => cutoff,
            Some(cutoff) => {
                warn!(
                    "Ignoring cutoff override {cutoff} outside [0, 1]; using model cutoff {}",
                    model.cutoff
                );
                model.cutoff
            }
            None => model.cutoff,
        };
        Self { model, cutoff }
    }

    /// Cutoff in effect for this scorer
    #[must_use]
    pub const fn cutoff(&self) -> f64 {
        self.cutoff
    }

    #[must_use]
    pub const fn model(&self) -> &'a FittedModel {
        self.model
    }

    /// Binarize a probability; ties go to the negative class
    #[must_use]
    pub fn label(&self, probability: f64) -> ScanLabel {
        if probability > self.cutoff {
            ScanLabel::Surveillance
        } else {
            ScanLabel::OtherReasons
        }
    }

    /// Score one feature vector
    pub fn score(&self, features: &FeatureVector) -> Result<Prediction> {
        let probability = logistic(self.model.linear_predictor(features)?);
        Ok(Prediction {
            probability,
            label: self.label(probability),
        })
    }
}
