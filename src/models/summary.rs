use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted summarization: the text the user submitted and what the model returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub id: i64,
    pub original_text: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryStatus {
    #[default]
    NotGenerated,
    Generating,
    Generated,
    Failed,
}
