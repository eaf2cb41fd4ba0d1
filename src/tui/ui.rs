use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::ai::TextGenerator;
use crate::app::{App, Field, NoticeLevel, Section};
use crate::config::DEFAULT_MODEL_NAME;
use crate::models::{SummaryRecord, SummaryStatus};

use super::theme::Palette;

/// Collapsed history entries show at most this many columns of the original text.
const PREVIEW_WIDTH: usize = 200;

const SIDEBAR_WIDTH: u16 = 24;

/// First line of `text` folded at [`PREVIEW_WIDTH`], with `...` when anything was cut.
pub fn preview(text: &str) -> String {
    let lines = textwrap::wrap(text.trim(), PREVIEW_WIDTH);
    match lines.as_slice() {
        [] => String::new(),
        [only] => only.to_string(),
        [first, ..] => format!("{first}..."),
    }
}

pub fn draw<G: TextGenerator>(frame: &mut Frame, app: &App<G>) {
    let palette = app.theme.palette();

    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
        frame.area(),
    );

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(0),    // Sidebar + content
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(rows[1]);

    render_title(frame, &palette, rows[0]);
    render_sidebar(frame, app, &palette, columns[0]);

    match app.section {
        Section::Summarize => render_summarize(frame, app, &palette, columns[1]),
        Section::History => render_history(frame, app, &palette, columns[1]),
        Section::Evaluate => render_evaluate(frame, app, &palette, columns[1]),
        Section::ModelInfo => render_model_info(frame, app, &palette, columns[1]),
    }

    render_status(frame, app, &palette, rows[2]);

    if app.show_help {
        render_help(frame, &palette);
    }
}

fn render_title(frame: &mut Frame, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .style(Style::default().bg(palette.topbar).fg(palette.text));

    let title = vec![
        Line::from(Span::styled(
            " 🧠 Thai Text Summarization System",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(" ✨ ระบบสรุปใจความสำคัญภาษาไทยอัตโนมัติ ✨"),
    ];

    frame.render_widget(Paragraph::new(title).block(block), area);
}

fn render_sidebar<G: TextGenerator>(frame: &mut Frame, app: &App<G>, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let items: Vec<ListItem> = Section::ALL
        .iter()
        .enumerate()
        .map(|(i, section)| ListItem::new(format!("{} {}", i + 1, section.label())))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Menu ")
                .borders(Borders::ALL)
                .style(Style::default().bg(palette.sidebar).fg(palette.sidebar_text)),
        )
        .highlight_style(
            Style::default()
                .bg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Section::ALL.iter().position(|s| *s == app.section));
    frame.render_stateful_widget(list, chunks[0], &mut state);

    let theme = Paragraph::new(format!(" {}  (t)", app.theme.label())).block(
        Block::default()
            .title(" Theme ")
            .borders(Borders::ALL)
            .style(Style::default().bg(palette.sidebar).fg(palette.sidebar_text)),
    );
    frame.render_widget(theme, chunks[1]);
}

fn card<'a>(title: &'a str, palette: &Palette, focused: bool) -> Block<'a> {
    let border = if focused {
        palette.accent_strong
    } else {
        palette.accent
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(palette.card).fg(palette.text))
}

fn input_text(text: &str, focused: bool, placeholder: &str) -> String {
    if focused {
        format!("{text}_")
    } else if text.is_empty() {
        placeholder.to_string()
    } else {
        text.to_string()
    }
}

fn render_summarize<G: TextGenerator>(frame: &mut Frame, app: &App<G>, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let focused = app.editing == Some(Field::Input);
    let input = Paragraph::new(input_text(
        &app.input,
        focused,
        "Press i to type or paste the text to summarize...",
    ))
    .block(card(" 📝 Text (i: edit, Enter: summarize) ", palette, focused))
    .wrap(Wrap { trim: false });
    frame.render_widget(input, chunks[0]);

    let content = match app.summary_status {
        SummaryStatus::NotGenerated => "No summary yet.".to_string(),
        SummaryStatus::Generating => "⏳ Summarizing...".to_string(),
        SummaryStatus::Failed => "Summarization failed. Press Enter to retry.".to_string(),
        SummaryStatus::Generated => app.last_summary.clone().unwrap_or_default(),
    };

    let result = Paragraph::new(content)
        .block(card(" 📄 Summary (y: copy) ", palette, false))
        .wrap(Wrap { trim: true });
    frame.render_widget(result, chunks[1]);
}

fn record_lines(record: &SummaryRecord, expanded: bool, width: usize, palette: &Palette) -> Vec<Line<'static>> {
    let label = Style::default().fg(palette.accent_strong).add_modifier(Modifier::BOLD);
    let width = width.max(20);

    let original = if expanded {
        record.original_text.clone()
    } else {
        preview(&record.original_text)
    };

    let mut lines = vec![Line::from(vec![
        Span::styled("🕒 ", label),
        Span::raw(
            record
                .created_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        ),
        Span::styled(format!("  #{}", record.id), Style::default().fg(palette.muted)),
    ])];

    lines.push(Line::from(Span::styled("📝 Original:", label)));
    lines.extend(
        textwrap::wrap(&original, width)
            .into_iter()
            .map(|l| Line::from(format!("  {l}"))),
    );
    lines.push(Line::from(Span::styled("📄 Summary:", label)));
    lines.extend(
        textwrap::wrap(&record.summary, width)
            .into_iter()
            .map(|l| Line::from(format!("  {l}"))),
    );
    lines.push(Line::from(""));
    lines
}

fn render_history<G: TextGenerator>(frame: &mut Frame, app: &App<G>, palette: &Palette, area: Rect) {
    let block = card(
        " 📜 History (j/k: move, Enter: expand, y: copy, d: delete) ",
        palette,
        false,
    );

    if app.history.is_empty() {
        let empty = Paragraph::new("No summaries yet.").block(block);
        frame.render_widget(empty, area);
        return;
    }

    let width = area.width.saturating_sub(6) as usize;
    let items: Vec<ListItem> = app
        .history
        .iter()
        .map(|record| {
            let expanded = app.view_of(record.id).expanded;
            ListItem::new(record_lines(record, expanded, width, palette))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(palette.background))
        .highlight_symbol("▌");

    let mut state = ListState::default();
    state.select(Some(app.selected_index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_evaluate<G: TextGenerator>(frame: &mut Frame, app: &App<G>, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(35),
            Constraint::Min(5),
        ])
        .split(area);

    let reference_focused = app.editing == Some(Field::Reference);
    let reference = Paragraph::new(input_text(&app.reference, reference_focused, "Press r to edit"))
        .block(card(" Reference summary (r) ", palette, reference_focused))
        .wrap(Wrap { trim: false });
    frame.render_widget(reference, chunks[0]);

    let candidate_focused = app.editing == Some(Field::Candidate);
    let candidate = Paragraph::new(input_text(&app.candidate, candidate_focused, "Press c to edit"))
        .block(card(" Candidate summary (c) ", palette, candidate_focused))
        .wrap(Wrap { trim: false });
    frame.render_widget(candidate, chunks[1]);

    let lines = match &app.evaluation {
        Some(result) => vec![
            Line::from(format!("🔹 ROUGE-1: {:.4}", result.rouge1)),
            Line::from(format!("🔹 ROUGE-L: {:.4}", result.rouge_l)),
            Line::from(format!("🔹 BLEU: {:.4}", result.bleu)),
        ],
        None => vec![Line::from("Press Enter to evaluate.")],
    };
    let scores = Paragraph::new(lines).block(card(" 📈 Scores ", palette, false));
    frame.render_widget(scores, chunks[2]);
}

fn render_model_info<G: TextGenerator>(frame: &mut Frame, app: &App<G>, palette: &Palette, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let params = app.generation_params();
    let base = if app.model_name() == DEFAULT_MODEL_NAME {
        "Google mT5 (Multilingual T5)"
    } else {
        "Custom"
    };

    let lines = vec![
        Line::from(Span::styled("📘 General", bold)),
        Line::from(format!("  Model name:    {}", app.model_name())),
        Line::from("  Framework:     PyTorch + Hugging Face Transformers"),
        Line::from("  Language:      Thai"),
        Line::from("  Architecture:  Encoder-Decoder (Text-to-Text)"),
        Line::from("  Task:          Text Summarization"),
        Line::from(format!("  Base model:    {base}")),
        Line::from("  Parameters:    ≈ 580 million"),
        Line::from(""),
        Line::from(Span::styled("🧩 Strengths", bold)),
        Line::from("  • Multilingual, including Thai"),
        Line::from("  • Understands and condenses long passages"),
        Line::from("  • Suited to Thai news, articles and reports"),
        Line::from("  • Extensible to translation and question answering"),
        Line::from(""),
        Line::from(Span::styled("⚙️ Decoding", bold)),
        Line::from(format!(
            "  Input ≤ {} tokens, output {}..{} tokens",
            params.max_input_length, params.min_output_length, params.max_output_length
        )),
        Line::from(format!(
            "  Beams {}, temperature {}, top-p {}, no-repeat {}",
            params.num_beams, params.temperature, params.top_p, params.no_repeat_ngram_size
        )),
        Line::from(format!("  History:       {}", app.history_path().display())),
        Line::from(""),
        Line::from(Span::styled("🔬 Reference", bold)),
        Line::from(format!("  https://huggingface.co/{}  (o: open)", app.model_name())),
    ];

    let info = Paragraph::new(lines)
        .block(card(" 🧠 Model Information ", palette, false))
        .wrap(Wrap { trim: false });
    frame.render_widget(info, area);
}

fn render_status<G: TextGenerator>(frame: &mut Frame, app: &App<G>, palette: &Palette, area: Rect) {
    let (text, color) = match &app.notice {
        Some(notice) => {
            let color = match notice.level {
                NoticeLevel::Info => palette.text,
                NoticeLevel::Success => ratatui::style::Color::Green,
                NoticeLevel::Warning => ratatui::style::Color::Yellow,
                NoticeLevel::Error => ratatui::style::Color::Red,
            };
            (format!(" {}", notice.text), color)
        }
        None if app.editing.is_some() => (
            " Editing: Esc to stop, Ctrl+S to submit".to_string(),
            palette.muted,
        ),
        None => (
            " Tab/1-4: section  t: theme  x: clear  ?: help  q: quit".to_string(),
            palette.muted,
        ),
    };

    let paragraph = Paragraph::new(text).style(Style::default().fg(color).bg(palette.background));
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame, palette: &Palette) {
    let area = centered_rect(50, 70, frame.area());

    let help_text = vec![
        "",
        " Navigation:",
        "   Tab / 1-4   Switch section",
        "   j / ↓       Move down (history)",
        "   k / ↑       Move up (history)",
        "",
        " Summarize:",
        "   i           Edit text (paste supported)",
        "   Enter       Summarize and save",
        "   y           Copy summary",
        "",
        " History:",
        "   Enter       Expand / collapse record",
        "   y           Copy record summary",
        "   d           Delete record",
        "",
        " Evaluate:",
        "   r / c       Edit reference / candidate",
        "   Enter       Compute ROUGE-1, ROUGE-L, BLEU",
        "",
        " While editing:",
        "   Esc         Stop editing",
        "   Ctrl+S      Submit",
        "",
        " General:",
        "   t           Toggle light / dark",
        "   x           Clear inputs",
        "   o           Open model page (Model Info)",
        "   ?           Toggle this help",
        "   q           Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent_strong));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(palette.text).bg(palette.card));

    frame.render_widget(ratatui::widgets::Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
