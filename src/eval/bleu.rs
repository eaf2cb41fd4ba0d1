//! Sentence-level BLEU against a single reference.

use super::rouge::ngram_counts;

const MAX_ORDER: usize = 4;

/// Constant `K` of smoothing method 4 (Chen & Cherry, 2014).
const SMOOTHING_K: f64 = 5.0;

/// Clipped n-gram matches over total candidate n-grams (at least 1).
#[derive(Debug, Clone, Copy, PartialEq)]
struct Precision {
    matches: usize,
    total: usize,
}

impl Precision {
    fn modified(reference: &[String], candidate: &[String], n: usize) -> Self {
        let reference_counts = ngram_counts(reference, n);
        let candidate_counts = ngram_counts(candidate, n);

        let matches = candidate_counts
            .iter()
            .map(|(ngram, &count)| count.min(reference_counts.get(ngram).copied().unwrap_or(0)))
            .sum();
        let total = candidate_counts.values().sum::<usize>().max(1);

        Self { matches, total }
    }
}

/// Uniformly weighted BLEU-4 with method-4 smoothing.
///
/// Every order without a match (unigrams included) gets a small positive
/// precision that shrinks geometrically for each further missing order, so
/// a candidate sharing nothing with the reference still scores above zero.
pub fn sentence_bleu(reference: &[String], candidate: &[String]) -> f64 {
    if candidate.is_empty() {
        return 0.0;
    }

    let hyp_len = candidate.len();
    let weight = 1.0 / MAX_ORDER as f64;
    let smoothing_base = (hyp_len.max(2) as f64).ln() / SMOOTHING_K;

    let mut missing = 0;
    let log_sum: f64 = (1..=MAX_ORDER)
        .map(|n| {
            let p = Precision::modified(reference, candidate, n);
            let value = if p.matches == 0 {
                missing += 1;
                smoothing_base / 2f64.powi(missing) / p.total as f64
            } else {
                p.matches as f64 / p.total as f64
            };
            weight * value.ln()
        })
        .sum();

    brevity_penalty(reference.len(), hyp_len) * log_sum.exp()
}

fn brevity_penalty(ref_len: usize, hyp_len: usize) -> f64 {
    if hyp_len > ref_len {
        1.0
    } else if hyp_len == 0 {
        0.0
    } else {
        (1.0 - ref_len as f64 / hyp_len as f64).exp()
    }
}
