use std::sync::OnceLock;

use regex::Regex;

use crate::config::GenerationConfig;
use crate::error::{AppError, Result};

use super::generator::{GenerationRequest, TextGenerator};

/// Returned in place of a summary when there is nothing to summarize.
pub const EMPTY_INPUT_WARNING: &str = "⚠️ กรุณาป้อนข้อความก่อนสรุป";

/// Task instruction the model was fine-tuned with.
const TASK_PREFIX: &str = "summarize: ";

/// Longest piece a SentencePiece vocabulary holds, in chars.
const MAX_PIECE_CHARS: usize = 16;

// T5-family tokenizer specials that can leak into decoded output.
static SPECIAL_TOKENS: OnceLock<Regex> = OnceLock::new();

fn special_tokens() -> &'static Regex {
    SPECIAL_TOKENS.get_or_init(|| {
        Regex::new(r"</s>|<pad>|<unk>|<s>|<extra_id_\d+>").expect("special token pattern is valid")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Summary(String),
    /// Blank input; the model was not called.
    EmptyInput,
}

impl SummaryOutcome {
    /// The summary, or the warning sentinel for blank input.
    pub fn text(&self) -> &str {
        match self {
            Self::Summary(summary) => summary,
            Self::EmptyInput => EMPTY_INPUT_WARNING,
        }
    }
}

/// Summarization service around a pretrained text-to-text model.
pub struct Summarizer<G> {
    generator: G,
    params: GenerationConfig,
}

impl<G: TextGenerator> Summarizer<G> {
    pub fn new(generator: G, params: GenerationConfig) -> Self {
        Self { generator, params }
    }

    pub async fn summarize(&self, text: &str) -> Result<SummaryOutcome> {
        if text.trim().is_empty() {
            return Ok(SummaryOutcome::EmptyInput);
        }

        let prompt = format!("{TASK_PREFIX}{text}");
        let char_budget = self.params.max_input_length.saturating_mul(MAX_PIECE_CHARS);
        let clipped = clip_chars(&prompt, char_budget);
        if clipped.len() < prompt.len() {
            tracing::debug!("Input clipped to {} chars before generation", char_budget);
        }

        let request = GenerationRequest {
            text: clipped.to_string(),
            params: self.params.clone(),
        };

        let raw = self.generator.generate(&request).await?;
        let summary = strip_special_tokens(&raw);
        if summary.is_empty() {
            return Err(AppError::EmptyGeneration);
        }

        tracing::info!(
            "Summarized {} chars into {} chars with {}",
            text.chars().count(),
            summary.chars().count(),
            self.generator.model_name()
        );
        Ok(SummaryOutcome::Summary(summary))
    }

    pub fn model_name(&self) -> &str {
        self.generator.model_name()
    }

    pub fn params(&self) -> &GenerationConfig {
        &self.params
    }

    #[cfg(test)]
    pub(crate) fn generator(&self) -> &G {
        &self.generator
    }
}

// The token window never spans more than `max_input_length * MAX_PIECE_CHARS`
// chars; the server's tokenizer truncation trims the rest exactly.
fn clip_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

fn strip_special_tokens(text: &str) -> String {
    special_tokens().replace_all(text, "").trim().to_string()
}
