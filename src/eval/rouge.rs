//! ROUGE-N and ROUGE-L over pre-tokenized text.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
}

impl Score {
    fn from_overlap(overlap: usize, prediction_len: usize, target_len: usize) -> Self {
        let precision = overlap as f64 / prediction_len.max(1) as f64;
        let recall = overlap as f64 / target_len.max(1) as f64;
        Self {
            precision,
            recall,
            fmeasure: fmeasure(precision, recall),
        }
    }
}

fn fmeasure(precision: f64, recall: f64) -> f64 {
    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}

pub(super) fn ngram_counts(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    if n == 0 {
        return counts;
    }
    for window in tokens.windows(n) {
        *counts.entry(window).or_insert(0) += 1;
    }
    counts
}

/// Clipped n-gram overlap between `target` (the reference) and `prediction`.
pub fn rouge_n(target: &[String], prediction: &[String], n: usize) -> Score {
    let target_ngrams = ngram_counts(target, n);
    let prediction_ngrams = ngram_counts(prediction, n);

    let overlap: usize = target_ngrams
        .iter()
        .filter_map(|(ngram, &count)| prediction_ngrams.get(ngram).map(|&other| count.min(other)))
        .sum();

    Score::from_overlap(
        overlap,
        prediction_ngrams.values().sum(),
        target_ngrams.values().sum(),
    )
}

/// Longest-common-subsequence overlap.
pub fn rouge_l(target: &[String], prediction: &[String]) -> Score {
    if target.is_empty() || prediction.is_empty() {
        return Score {
            precision: 0.0,
            recall: 0.0,
            fmeasure: 0.0,
        };
    }
    let lcs = lcs_len(target, prediction);
    Score::from_overlap(lcs, prediction.len(), target.len())
}

fn lcs_len(a: &[String], b: &[String]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for x in a {
        for (j, y) in b.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn identical_sequences_score_one() {
        let t = toks("the cat sat on the mat");
        assert_eq!(rouge_n(&t, &t, 1).fmeasure, 1.0);
        assert_eq!(rouge_l(&t, &t).fmeasure, 1.0);
    }

    #[test]
    fn unigram_overlap_clips_repeated_tokens() {
        let target = toks("the the cat");
        let prediction = toks("the the the the");

        let score = rouge_n(&target, &prediction, 1);
        assert_eq!(score.precision, 0.5);
        assert!((score.recall - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn lcs_respects_order() {
        let target = toks("a b c d");
        let prediction = toks("d c b a");

        assert_eq!(rouge_n(&target, &prediction, 1).fmeasure, 1.0);
        assert_eq!(rouge_l(&target, &prediction).fmeasure, 0.25);
    }

    #[test]
    fn partial_lcs() {
        let target = toks("police killed the gunman");
        let prediction = toks("police kill the gunman");

        let score = rouge_l(&target, &prediction);
        assert_eq!(score.precision, 0.75);
        assert_eq!(score.recall, 0.75);
        assert!((score.fmeasure - 0.75).abs() < 1e-12);
    }

    #[test]
    fn disjoint_or_empty_scores_zero() {
        assert_eq!(rouge_n(&toks("a b"), &toks("c d"), 1).fmeasure, 0.0);
        assert_eq!(rouge_l(&toks("a b"), &[]).fmeasure, 0.0);
        assert_eq!(rouge_n(&[], &toks("a"), 1).fmeasure, 0.0);
    }
}
