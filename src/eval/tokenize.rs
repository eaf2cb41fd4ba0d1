//! Tokenizers for the overlap metrics.
//!
//! ROUGE compares lowercased, stemmed word tokens; BLEU compares raw
//! whitespace-separated tokens.

use super::stemmer::stem;

/// Tokens shorter than this are never stemmed.
const MIN_STEM_LEN: usize = 4;

/// Punctuation outside ASCII that splits tokens, including the Thai marks
/// fongman, angkhankhu and khomut.
const UNICODE_PUNCTUATION: &[char] = &[
    '“', '”', '‘', '’', '«', '»', '…', '–', '—', '•', '·', '。', '、', '，', '！', '？', '：',
    '；', '（', '）', '「', '」', '\u{200b}', '\u{0e4f}', '\u{0e5a}', '\u{0e5b}',
];

fn is_separator(c: char) -> bool {
    c.is_whitespace() || (c.is_ascii() && !c.is_ascii_alphanumeric()) || UNICODE_PUNCTUATION.contains(&c)
}

/// Lowercases, splits on whitespace and punctuation, and stems English words.
///
/// Thai has no inter-word spaces, so a run of Thai script between separators
/// stays one token.
pub fn rouge_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(is_separator)
        .filter(|token| !token.is_empty())
        .map(|token| {
            if token.chars().count() >= MIN_STEM_LEN && token.bytes().all(|b| b.is_ascii_alphabetic()) {
                stem(token)
            } else {
                token.to_string()
            }
        })
        .collect()
}

pub fn whitespace_tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}
