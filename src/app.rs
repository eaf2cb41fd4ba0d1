use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::ai::{Summarizer, SummaryOutcome, TextGenerator, EMPTY_INPUT_WARNING};
use crate::config::{Config, GenerationConfig};
use crate::db::HistoryStore;
use crate::error::Result;
use crate::eval::{self, EMPTY_PAIR_WARNING};
use crate::models::{EvaluationResult, SummaryRecord, SummaryStatus};
use crate::tui::{AppAction, ClipboardSink, SystemClipboard, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Summarize,
    History,
    Evaluate,
    ModelInfo,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Summarize,
        Section::History,
        Section::Evaluate,
        Section::ModelInfo,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::Summarize => "📝 Summarize",
            Section::History => "📜 History",
            Section::Evaluate => "📈 Evaluate",
            Section::ModelInfo => "🧠 Model Info",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Text fields that can take keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Input,
    Reference,
    Candidate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

fn notice(level: NoticeLevel, text: impl Into<String>) -> Option<Notice> {
    Some(Notice {
        level,
        text: text.into(),
    })
}

/// Presentation state of one history record, keyed by record id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordView {
    pub expanded: bool,
}

pub struct App<G> {
    // Data
    pub history: Vec<SummaryRecord>,
    pub last_summary: Option<String>,
    pub evaluation: Option<EvaluationResult>,

    // Inputs
    pub input: String,
    pub reference: String,
    pub candidate: String,

    // UI State
    pub section: Section,
    pub theme: Theme,
    pub editing: Option<Field>,
    pub show_help: bool,
    pub selected_index: usize,
    pub history_views: HashMap<i64, RecordView>,
    pub summary_status: SummaryStatus,
    pub notice: Option<Notice>,

    // Services
    summarizer: Summarizer<G>,
    store: HistoryStore,
    clipboard: Box<dyn ClipboardSink>,
    config: Config,
    config_path: PathBuf,
}

impl<G: TextGenerator> App<G> {
    /// Builds the app and loads saved history. An unreadable store starts
    /// the app with an empty history and an error notice.
    pub async fn new(
        config: Config,
        config_path: PathBuf,
        store: HistoryStore,
        summarizer: Summarizer<G>,
    ) -> Self {
        let mut app = Self {
            history: Vec::new(),
            last_summary: None,
            evaluation: None,
            input: String::new(),
            reference: String::new(),
            candidate: String::new(),
            section: Section::default(),
            theme: config.theme,
            editing: None,
            show_help: false,
            selected_index: 0,
            history_views: HashMap::new(),
            summary_status: SummaryStatus::NotGenerated,
            notice: None,
            summarizer,
            store,
            clipboard: Box::new(SystemClipboard::default()),
            config,
            config_path,
        };
        app.reload_history().await;
        app
    }

    pub fn model_name(&self) -> &str {
        self.summarizer.model_name()
    }

    pub fn generation_params(&self) -> &GenerationConfig {
        self.summarizer.params()
    }

    pub fn history_path(&self) -> &Path {
        self.store.path()
    }

    pub fn selected_record(&self) -> Option<&SummaryRecord> {
        self.history.get(self.selected_index)
    }

    pub fn view_of(&self, id: i64) -> RecordView {
        self.history_views.get(&id).copied().unwrap_or_default()
    }

    /// Marks a summarization as in flight so the caller can draw a frame
    /// before the blocking call. Returns whether a redraw is needed.
    pub fn prepare(&mut self, action: &AppAction) -> bool {
        let summarizing = *action == AppAction::Submit
            && self.section == Section::Summarize
            && !self.input.trim().is_empty();
        if summarizing {
            self.editing = None;
            self.summary_status = SummaryStatus::Generating;
            self.notice = notice(NoticeLevel::Info, "⏳ Summarizing...");
        }
        summarizing
    }

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::NextSection => self.switch_to(self.section.next()),
            AppAction::PrevSection => self.switch_to(self.section.prev()),
            AppAction::GoTo(section) => self.switch_to(section),

            AppAction::ToggleTheme => self.toggle_theme(),

            AppAction::ShowHelp => {
                self.show_help = true;
            }

            AppAction::HideHelp => {
                self.show_help = false;
            }

            AppAction::MoveUp => {
                if self.section == Section::History && self.selected_index > 0 {
                    self.selected_index -= 1;
                }
            }

            AppAction::MoveDown => {
                let len = self.history.len();
                if self.section == Section::History && len > 0 && self.selected_index < len - 1 {
                    self.selected_index += 1;
                }
            }

            AppAction::Submit => {
                self.editing = None;
                match self.section {
                    Section::Summarize => self.summarize_input().await,
                    Section::Evaluate => self.evaluate_inputs(),
                    Section::History => self.toggle_selected(),
                    Section::ModelInfo => {}
                }
            }

            AppAction::DeleteRecord => {
                if self.section == Section::History {
                    self.delete_selected().await;
                }
            }

            AppAction::ClearInputs => match self.section {
                Section::Summarize => {
                    self.input.clear();
                    self.last_summary = None;
                    self.summary_status = SummaryStatus::NotGenerated;
                }
                Section::Evaluate => {
                    self.reference.clear();
                    self.candidate.clear();
                    self.evaluation = None;
                }
                _ => {}
            },

            AppAction::OpenModelPage => {
                if self.section == Section::ModelInfo {
                    let url = format!("https://huggingface.co/{}", self.config.model.name);
                    if let Err(e) = open::that(&url) {
                        tracing::warn!("Failed to open {}: {}", url, e);
                    }
                }
            }

            AppAction::CopySummary => self.copy_summary(),

            AppAction::EditPrimary => {
                self.editing = match self.section {
                    Section::Summarize => Some(Field::Input),
                    Section::Evaluate => Some(Field::Reference),
                    _ => None,
                };
            }

            AppAction::EditReference => {
                if self.section == Section::Evaluate {
                    self.editing = Some(Field::Reference);
                }
            }

            AppAction::EditCandidate => {
                if self.section == Section::Evaluate {
                    self.editing = Some(Field::Candidate);
                }
            }

            AppAction::InputChar(c) => {
                if let Some(buffer) = self.active_buffer() {
                    buffer.push(c);
                }
            }

            AppAction::InputNewline => {
                if let Some(buffer) = self.active_buffer() {
                    buffer.push('\n');
                }
            }

            AppAction::InputBackspace => {
                if let Some(buffer) = self.active_buffer() {
                    buffer.pop();
                }
            }

            AppAction::StopEditing => {
                self.editing = None;
            }

            AppAction::Paste(text) => {
                if self.editing.is_none() {
                    self.editing = match self.section {
                        Section::Summarize => Some(Field::Input),
                        Section::Evaluate => Some(Field::Reference),
                        _ => None,
                    };
                }
                if let Some(buffer) = self.active_buffer() {
                    buffer.push_str(&text);
                }
            }
        }

        Ok(false)
    }

    fn switch_to(&mut self, section: Section) {
        self.section = section;
        self.editing = None;
        self.notice = None;
    }

    fn active_buffer(&mut self) -> Option<&mut String> {
        match self.editing? {
            Field::Input => Some(&mut self.input),
            Field::Reference => Some(&mut self.reference),
            Field::Candidate => Some(&mut self.candidate),
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.config.theme = self.theme;
        if let Err(e) = self.config.save_to(&self.config_path) {
            tracing::warn!("Failed to save theme: {}", e);
        }
    }

    async fn summarize_input(&mut self) {
        let text = self.input.clone();

        match self.summarizer.summarize(&text).await {
            Ok(SummaryOutcome::EmptyInput) => {
                self.summary_status = SummaryStatus::NotGenerated;
                self.notice = notice(NoticeLevel::Warning, EMPTY_INPUT_WARNING);
            }
            Ok(SummaryOutcome::Summary(summary)) => {
                self.summary_status = SummaryStatus::Generated;
                self.notice = match self.store.append(&text, &summary).await {
                    Ok(_) => notice(NoticeLevel::Success, "✅ Summary saved to history"),
                    Err(e) => {
                        tracing::error!("Failed to save summary: {}", e);
                        notice(NoticeLevel::Error, format!("Summary not saved: {e}"))
                    }
                };
                self.last_summary = Some(summary);
                self.reload_history().await;
            }
            Err(e) => {
                tracing::error!("Failed to generate summary: {}", e);
                self.summary_status = SummaryStatus::Failed;
                self.notice = notice(NoticeLevel::Error, format!("Summarization failed: {e}"));
            }
        }
    }

    fn evaluate_inputs(&mut self) {
        if self.reference.trim().is_empty() || self.candidate.trim().is_empty() {
            self.evaluation = None;
            self.notice = notice(NoticeLevel::Warning, EMPTY_PAIR_WARNING);
            return;
        }

        match eval::evaluate(&self.reference, &self.candidate) {
            Ok(result) => {
                self.evaluation = Some(result);
                self.notice = notice(NoticeLevel::Success, "Evaluation complete");
            }
            Err(e) => {
                self.evaluation = None;
                self.notice = notice(NoticeLevel::Error, e.to_string());
            }
        }
    }

    fn copy_summary(&mut self) {
        let summary = match self.section {
            Section::Summarize => self.last_summary.clone(),
            Section::History => self.selected_record().map(|r| r.summary.clone()),
            _ => return,
        };
        let Some(summary) = summary else {
            self.notice = notice(NoticeLevel::Warning, "No summary to copy");
            return;
        };

        self.notice = match self.clipboard.set_text(&summary) {
            Ok(()) => notice(NoticeLevel::Success, "📋 Summary copied to clipboard"),
            Err(e) => {
                tracing::warn!("Failed to copy summary: {}", e);
                notice(NoticeLevel::Error, format!("Copy failed: {e}"))
            }
        };
    }

    fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_record().map(|r| r.id) {
            let view = self.history_views.entry(id).or_default();
            view.expanded = !view.expanded;
        }
    }

    async fn delete_selected(&mut self) {
        let Some(id) = self.selected_record().map(|r| r.id) else {
            return;
        };

        match self.store.delete(id).await {
            Ok(()) => {
                self.history.retain(|r| r.id != id);
                self.history_views.remove(&id);
                let len = self.history.len();
                if len > 0 && self.selected_index >= len {
                    self.selected_index = len - 1;
                }
                self.notice = notice(NoticeLevel::Info, format!("Deleted record #{id}"));
            }
            Err(e) => {
                tracing::error!("Failed to delete summary {}: {}", id, e);
                self.notice = notice(NoticeLevel::Error, format!("Delete failed: {e}"));
            }
        }
    }

    async fn reload_history(&mut self) {
        match self.store.list_all().await {
            Ok(history) => {
                self.history = history;
                self.selected_index = 0;
                let ids: Vec<i64> = self.history.iter().map(|r| r.id).collect();
                self.history_views.retain(|id, _| ids.contains(id));
            }
            Err(e) => {
                tracing::error!("Failed to load history: {}", e);
                self.notice = notice(NoticeLevel::Error, format!("History unavailable: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::GenerationRequest;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    struct StubGenerator {
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl TextGenerator for StubGenerator {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .map(str::to_string)
                .ok_or_else(|| AppError::Model("offline".to_string()))
        }

        fn model_name(&self) -> &str {
            "stub"
        }
    }

    async fn test_app(reply: Option<&'static str>) -> (TempDir, App<StubGenerator>) {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path().join("history.db")).await.unwrap();
        let summarizer = Summarizer::new(
            StubGenerator {
                reply,
                calls: AtomicUsize::new(0),
            },
            GenerationConfig::default(),
        );
        let config = Config {
            db_path: dir.path().join("history.db").to_string_lossy().to_string(),
            ..Config::default()
        };
        let app = App::new(config, dir.path().join("config.toml"), store, summarizer).await;
        (dir, app)
    }

    /// Keeps copied text in memory, or fails every copy.
    struct MemoryClipboard {
        copied: Arc<Mutex<Vec<String>>>,
        available: bool,
    }

    impl ClipboardSink for MemoryClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            if !self.available {
                return Err(AppError::Clipboard(arboard::Error::ClipboardNotSupported));
            }
            self.copied.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn memory_clipboard(app: &mut App<StubGenerator>, available: bool) -> Arc<Mutex<Vec<String>>> {
        let copied = Arc::new(Mutex::new(Vec::new()));
        app.clipboard = Box::new(MemoryClipboard {
            copied: Arc::clone(&copied),
            available,
        });
        copied
    }

    fn calls(app: &App<StubGenerator>) -> usize {
        app.summarizer.generator().calls.load(Ordering::SeqCst)
    }

    async fn type_text(app: &mut App<StubGenerator>, text: &str) {
        for c in text.chars() {
            app.handle_action(AppAction::InputChar(c)).await.unwrap();
        }
    }

    #[tokio::test]
    async fn summarize_persists_and_shows_result() {
        let (_dir, mut app) = test_app(Some("สรุปสั้น ๆ")).await;

        app.handle_action(AppAction::EditPrimary).await.unwrap();
        type_text(&mut app, "ข่าวยาว").await;
        assert!(app.prepare(&AppAction::Submit));
        assert_eq!(app.summary_status, SummaryStatus::Generating);
        app.handle_action(AppAction::Submit).await.unwrap();

        assert_eq!(app.summary_status, SummaryStatus::Generated);
        assert_eq!(app.last_summary.as_deref(), Some("สรุปสั้น ๆ"));
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history[0].original_text, "ข่าวยาว");
        assert_eq!(app.history[0].summary, "สรุปสั้น ๆ");
        assert_eq!(app.notice.as_ref().unwrap().level, NoticeLevel::Success);
        assert_eq!(calls(&app), 1);
    }

    #[tokio::test]
    async fn blank_input_warns_without_calling_model() {
        let (_dir, mut app) = test_app(Some("unused")).await;

        app.input = "   ".to_string();
        assert!(!app.prepare(&AppAction::Submit));
        app.handle_action(AppAction::Submit).await.unwrap();

        let notice = app.notice.clone().unwrap();
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.text, EMPTY_INPUT_WARNING);
        assert!(app.history.is_empty());
        assert_eq!(calls(&app), 0);
    }

    #[tokio::test]
    async fn model_failure_is_shown_and_nothing_is_saved() {
        let (_dir, mut app) = test_app(None).await;

        app.input = "some text".to_string();
        app.handle_action(AppAction::Submit).await.unwrap();

        assert_eq!(app.summary_status, SummaryStatus::Failed);
        assert_eq!(app.notice.as_ref().unwrap().level, NoticeLevel::Error);
        assert!(app.notice.as_ref().unwrap().text.contains("offline"));
        assert!(app.history.is_empty());
    }

    #[tokio::test]
    async fn history_expand_and_delete() {
        let (_dir, mut app) = test_app(Some("summary")).await;
        for text in ["first", "second"] {
            app.input = text.to_string();
            app.handle_action(AppAction::Submit).await.unwrap();
        }

        app.handle_action(AppAction::GoTo(Section::History)).await.unwrap();
        assert_eq!(app.history[0].original_text, "second");

        app.handle_action(AppAction::MoveDown).await.unwrap();
        let id = app.selected_record().unwrap().id;
        app.handle_action(AppAction::Submit).await.unwrap();
        assert!(app.view_of(id).expanded);

        app.handle_action(AppAction::DeleteRecord).await.unwrap();
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history[0].original_text, "second");
        assert_eq!(app.selected_index, 0);
        assert!(!app.history_views.contains_key(&id));
    }

    #[tokio::test]
    async fn evaluate_requires_both_fields() {
        let (_dir, mut app) = test_app(None).await;
        app.handle_action(AppAction::GoTo(Section::Evaluate)).await.unwrap();

        app.handle_action(AppAction::EditReference).await.unwrap();
        type_text(&mut app, "the cat sat on the mat").await;
        app.handle_action(AppAction::Submit).await.unwrap();
        assert_eq!(app.notice.as_ref().unwrap().text, EMPTY_PAIR_WARNING);
        assert!(app.evaluation.is_none());

        app.handle_action(AppAction::EditCandidate).await.unwrap();
        app.handle_action(AppAction::Paste("the cat sat on the mat".to_string()))
            .await
            .unwrap();
        app.handle_action(AppAction::Submit).await.unwrap();

        let result = app.evaluation.unwrap();
        assert_eq!(result.rouge1, 1.0);
        assert_eq!(result.rouge_l, 1.0);
        assert_eq!(result.bleu, 1.0);
    }

    #[tokio::test]
    async fn editing_and_clearing_inputs() {
        let (_dir, mut app) = test_app(None).await;

        app.handle_action(AppAction::Paste("ab".to_string())).await.unwrap();
        assert_eq!(app.editing, Some(Field::Input));
        app.handle_action(AppAction::InputNewline).await.unwrap();
        app.handle_action(AppAction::InputChar('c')).await.unwrap();
        app.handle_action(AppAction::InputBackspace).await.unwrap();
        assert_eq!(app.input, "ab\n");

        app.handle_action(AppAction::StopEditing).await.unwrap();
        app.handle_action(AppAction::InputChar('z')).await.unwrap();
        assert_eq!(app.input, "ab\n");

        app.handle_action(AppAction::ClearInputs).await.unwrap();
        assert!(app.input.is_empty());
    }

    #[tokio::test]
    async fn sections_cycle_and_theme_persists() {
        let (dir, mut app) = test_app(None).await;

        app.handle_action(AppAction::PrevSection).await.unwrap();
        assert_eq!(app.section, Section::ModelInfo);
        app.handle_action(AppAction::NextSection).await.unwrap();
        assert_eq!(app.section, Section::Summarize);

        app.handle_action(AppAction::ToggleTheme).await.unwrap();
        assert_eq!(app.theme, Theme::Dark);
        let saved = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
        assert!(saved.contains("theme = \"dark\""));

        assert!(app.handle_action(AppAction::Quit).await.unwrap());
    }

    #[tokio::test]
    async fn copies_latest_summary() {
        let (_dir, mut app) = test_app(Some("สรุปข่าว")).await;
        let copied = memory_clipboard(&mut app, true);

        app.handle_action(AppAction::CopySummary).await.unwrap();
        assert_eq!(app.notice.as_ref().unwrap().level, NoticeLevel::Warning);
        assert!(copied.lock().unwrap().is_empty());

        app.input = "ข่าวเต็ม".to_string();
        app.handle_action(AppAction::Submit).await.unwrap();
        app.handle_action(AppAction::CopySummary).await.unwrap();

        assert_eq!(*copied.lock().unwrap(), vec!["สรุปข่าว".to_string()]);
        let notice = app.notice.clone().unwrap();
        assert_eq!(notice.level, NoticeLevel::Success);
        assert!(notice.text.contains("copied"));
    }

    #[tokio::test]
    async fn copies_selected_history_record() {
        let (_dir, mut app) = test_app(None).await;
        app.store.append("first text", "first summary").await.unwrap();
        app.store.append("second text", "second summary").await.unwrap();
        app.reload_history().await;
        let copied = memory_clipboard(&mut app, true);

        app.handle_action(AppAction::GoTo(Section::History)).await.unwrap();
        app.handle_action(AppAction::MoveDown).await.unwrap();
        app.handle_action(AppAction::CopySummary).await.unwrap();

        assert_eq!(*copied.lock().unwrap(), vec!["first summary".to_string()]);
        assert_eq!(app.notice.as_ref().unwrap().level, NoticeLevel::Success);
    }

    #[tokio::test]
    async fn clipboard_failure_becomes_error_notice() {
        let (_dir, mut app) = test_app(Some("summary")).await;
        memory_clipboard(&mut app, false);

        app.input = "text".to_string();
        app.handle_action(AppAction::Submit).await.unwrap();
        app.handle_action(AppAction::CopySummary).await.unwrap();

        let notice = app.notice.clone().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.text.starts_with("Copy failed"));
        assert_eq!(app.last_summary.as_deref(), Some("summary"));
    }

    #[tokio::test]
    async fn unreadable_history_starts_empty_with_notice() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("history.db");
        let store = HistoryStore::open(&db_path).await.unwrap();
        rusqlite::Connection::open(&db_path)
            .unwrap()
            .execute_batch("DROP TABLE summaries")
            .unwrap();

        let summarizer = Summarizer::new(
            StubGenerator {
                reply: None,
                calls: AtomicUsize::new(0),
            },
            GenerationConfig::default(),
        );
        let app = App::new(Config::default(), dir.path().join("config.toml"), store, summarizer).await;

        assert!(app.history.is_empty());
        let notice = app.notice.clone().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.text.starts_with("History unavailable"));
    }
}
