/// Feature normalization and the fixed-topology scoring network.
///
/// Both artifacts are loaded once at process start and shared read-only;
/// the forward pass takes `&self` and is safe under concurrent callers.
use crate::features::{FeatureVector, FEATURE_COUNT};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Lower bound of the score range.
pub const SCORE_MIN: f64 = 300.0;
/// Upper bound of the score range.
pub const SCORE_MAX: f64 = 900.0;

const HIDDEN_1: usize = 32;
const HIDDEN_2: usize = 16;

/// Per-feature affine parameters fitted offline, one (mean, scale) pair per
/// model feature in canonical order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationParameters {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl NormalizationParameters {
    /// Loads the fitted parameters from a JSON artifact.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scaler artifact {}", path.display()))?;
        let params: Self = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse scaler artifact {}", path.display()))?;
        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            anyhow::bail!(
                "scaler artifact must carry {} mean/scale pairs, got {}/{}",
                FEATURE_COUNT,
                self.mean.len(),
                self.scale.len()
            );
        }
        if self.scale.iter().any(|s| *s == 0.0) {
            anyhow::bail!("scaler artifact contains a zero scale");
        }
        Ok(())
    }
}

/// Affine feature transform. Without fitted parameters the transform is the
/// identity, an explicit configuration state surfaced via `is_fitted` rather
/// than a silent no-op.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    params: Option<NormalizationParameters>,
}

impl Normalizer {
    pub fn fitted(params: NormalizationParameters) -> Self {
        Self {
            params: Some(params),
        }
    }

    pub fn identity() -> Self {
        Self { params: None }
    }

    pub fn is_fitted(&self) -> bool {
        self.params.is_some()
    }

    /// `(value − mean) / scale` per feature, or the input unchanged when no
    /// parameters are loaded.
    pub fn transform(&self, features: &FeatureVector) -> FeatureVector {
        match &self.params {
            Some(params) => {
                let mut out = *features;
                for (i, value) in out.iter_mut().enumerate() {
                    *value = (*value - params.mean[i]) / params.scale[i];
                }
                out
            }
            None => *features,
        }
    }
}

/// The scoring network: linear(5→32) · ReLU · linear(32→16) · ReLU ·
/// linear(16→1) · sigmoid, rescaled onto [SCORE_MIN, SCORE_MAX].
///
/// Weight matrices are row-major: `w1[j]` holds the input weights of hidden
/// unit `j`. Weights are immutable after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringModel {
    w1: Vec<Vec<f64>>,
    b1: Vec<f64>,
    w2: Vec<Vec<f64>>,
    b2: Vec<f64>,
    w3: Vec<Vec<f64>>,
    b3: Vec<f64>,
}

impl ScoringModel {
    /// Loads the weights from a JSON artifact, validating layer shapes.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read weights artifact {}", path.display()))?;
        let model: Self = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse weights artifact {}", path.display()))?;
        model.validate()?;
        Ok(model)
    }

    /// Builds a model from in-memory weights, validating layer shapes.
    pub fn from_weights(
        w1: Vec<Vec<f64>>,
        b1: Vec<f64>,
        w2: Vec<Vec<f64>>,
        b2: Vec<f64>,
        w3: Vec<Vec<f64>>,
        b3: Vec<f64>,
    ) -> anyhow::Result<Self> {
        let model = Self {
            w1,
            b1,
            w2,
            b2,
            w3,
            b3,
        };
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> anyhow::Result<()> {
        check_layer("layer 1", &self.w1, &self.b1, HIDDEN_1, FEATURE_COUNT)?;
        check_layer("layer 2", &self.w2, &self.b2, HIDDEN_2, HIDDEN_1)?;
        check_layer("layer 3", &self.w3, &self.b3, 1, HIDDEN_2)?;
        Ok(())
    }

    /// Forward pass. Pure computation over immutable weights; no
    /// synchronization needed for concurrent callers.
    pub fn forward(&self, features: &FeatureVector) -> f64 {
        let h1 = affine_relu(&self.w1, &self.b1, features);
        let h2 = affine_relu(&self.w2, &self.b2, &h1);
        let raw = dot(&self.w3[0], &h2) + self.b3[0];
        let squashed = sigmoid(raw);
        (SCORE_MIN + squashed * (SCORE_MAX - SCORE_MIN)).clamp(SCORE_MIN, SCORE_MAX)
    }
}

fn check_layer(
    name: &str,
    weights: &[Vec<f64>],
    biases: &[f64],
    units: usize,
    inputs: usize,
) -> anyhow::Result<()> {
    if weights.len() != units || biases.len() != units {
        anyhow::bail!(
            "{} must have {} units, got {} weight rows and {} biases",
            name,
            units,
            weights.len(),
            biases.len()
        );
    }
    if let Some(row) = weights.iter().find(|row| row.len() != inputs) {
        anyhow::bail!(
            "{} expects {} inputs per unit, found a row of {}",
            name,
            inputs,
            row.len()
        );
    }
    Ok(())
}

fn affine_relu(weights: &[Vec<f64>], biases: &[f64], input: &[f64]) -> Vec<f64> {
    weights
        .iter()
        .zip(biases)
        .map(|(row, bias)| (dot(row, input) + bias).max(0.0))
        .collect()
}

fn dot(row: &[f64], input: &[f64]) -> f64 {
    row.iter().zip(input).map(|(w, x)| w * x).sum()
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
