mod generator;
mod summarizer;

#[cfg(test)]
pub use generator::GenerationRequest;
pub use generator::{HttpGenerator, TextGenerator};
pub use summarizer::{Summarizer, SummaryOutcome, EMPTY_INPUT_WARNING};
