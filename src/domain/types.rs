use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Trading signal returned by the decision service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Buy,
    Hold,
    Sell,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Buy => write!(f, "BUY"),
            Decision::Hold => write!(f, "HOLD"),
            Decision::Sell => write!(f, "SELL"),
        }
    }
}

/// The closed set of models the service supports. The wire name doubles as
/// the request parameter and as the key for human-readable labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelId {
    RandomForest,
    Logreg,
    SvmLinear,
    QuantumVqc,
    QuantumQnn,
}

impl ModelId {
    /// Canonical ordering. Comparison batches iterate this order, so result
    /// sets are stable regardless of response arrival.
    pub const ALL: [ModelId; 5] = [
        ModelId::RandomForest,
        ModelId::Logreg,
        ModelId::SvmLinear,
        ModelId::QuantumVqc,
        ModelId::QuantumQnn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::RandomForest => "random_forest",
            ModelId::Logreg => "logreg",
            ModelId::SvmLinear => "svm_linear",
            ModelId::QuantumVqc => "quantum_vqc",
            ModelId::QuantumQnn => "quantum_qnn",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModelId::RandomForest => "Random Forest (classical)",
            ModelId::Logreg => "Logistic Regression (classical)",
            ModelId::SvmLinear => "Linear SVM (classical)",
            ModelId::QuantumVqc => "Variational Quantum Classifier",
            ModelId::QuantumQnn => "Quantum Neural Network",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random_forest" => Ok(ModelId::RandomForest),
            "logreg" => Ok(ModelId::Logreg),
            "svm_linear" => Ok(ModelId::SvmLinear),
            "quantum_vqc" => Ok(ModelId::QuantumVqc),
            "quantum_qnn" => Ok(ModelId::QuantumQnn),
            _ => anyhow::bail!("Unknown model name: {}", s),
        }
    }
}

/// Body of POST /api/predict. The date stays a plain string: the service is
/// the sole authority on whether it is a valid trading day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub ticker: String,
    pub date: String,
    pub model_name: ModelId,
}

/// One decision from one model. Replaced wholesale on each new request,
/// never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub ticker: String,
    pub date: String,
    pub model_name: ModelId,
    pub decision: Decision,
    pub probabilities: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Classical,
    Quantum,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Classical => write!(f, "classical"),
            ModelKind::Quantum => write!(f, "quantum"),
        }
    }
}

/// One row of the offline evaluation table. Quantum metadata and training
/// time are absent for models the evaluation did not cover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetric {
    pub name: String,
    pub kind: ModelKind,
    pub accuracy_vs_true: f64,
    pub agreement_with_rf: f64,
    #[serde(default)]
    pub training_time_seconds: Option<f64>,
    #[serde(default)]
    pub logical_depth: Option<u32>,
    #[serde(default)]
    pub anticipated_shots: Option<u32>,
    #[serde(default)]
    pub is_baseline: bool,
}

/// Envelope of GET /api/model-metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetricsResponse {
    pub metrics: Vec<ModelMetric>,
}
