use serde::{Deserialize, Serialize};

/// Overlap scores of a candidate summary against a reference, each rounded to 4 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    #[serde(rename = "ROUGE-1")]
    pub rouge1: f64,
    #[serde(rename = "ROUGE-L")]
    pub rouge_l: f64,
    #[serde(rename = "BLEU")]
    pub bleu: f64,
}
