//! Summary quality scoring: ROUGE-1, ROUGE-L and BLEU of a candidate against a reference.

mod bleu;
mod rouge;
mod stemmer;
mod tokenize;

use crate::error::{AppError, Result};
use crate::models::EvaluationResult;

/// Shown instead of scoring when either field is blank.
pub const EMPTY_PAIR_WARNING: &str = "⚠️ ป้อนข้อความทั้งสองช่องก่อนประเมิน";

/// Scores `candidate` against `reference`.
///
/// Both inputs must contain something other than whitespace; callers are
/// expected to check first and show [`EMPTY_PAIR_WARNING`] instead.
pub fn evaluate(reference: &str, candidate: &str) -> Result<EvaluationResult> {
    if reference.trim().is_empty() || candidate.trim().is_empty() {
        return Err(AppError::EmptyInput);
    }

    let target = rouge_tokens_or_words(reference);
    let prediction = rouge_tokens_or_words(candidate);
    let rouge1 = rouge::rouge_n(&target, &prediction, 1);
    let rouge_l = rouge::rouge_l(&target, &prediction);

    let bleu = bleu::sentence_bleu(
        &tokenize::whitespace_tokens(reference),
        &tokenize::whitespace_tokens(candidate),
    );

    let result = EvaluationResult {
        rouge1: round4(rouge1.fmeasure),
        rouge_l: round4(rouge_l.fmeasure),
        bleu: round4(bleu),
    };
    tracing::debug!(?result, "Evaluated summary");
    Ok(result)
}

// Punctuation-only text has no word tokens; fall back to its raw pieces.
fn rouge_tokens_or_words(text: &str) -> Vec<String> {
    let tokens = tokenize::rouge_tokens(text);
    if tokens.is_empty() {
        tokenize::whitespace_tokens(text)
    } else {
        tokens
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
