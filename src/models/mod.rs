mod evaluation;
mod summary;

pub use evaluation::EvaluationResult;
pub use summary::{SummaryRecord, SummaryStatus};
