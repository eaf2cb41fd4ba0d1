use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

mod ai;
mod app;
mod config;
mod db;
mod error;
mod eval;
mod models;
mod tui;

use ai::{HttpGenerator, Summarizer, SummaryOutcome, TextGenerator};
use app::App;
use config::Config;
use db::HistoryStore;
use error::{AppError, Result};
use tui::{draw, handle_key_event, AppAction};

const USAGE: &str = "Usage: thai-summarizer [--summarize <file|->] [--evaluate <reference> <candidate>] [--history] [--delete <id>]";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Evaluation needs no config, store or model
    if args.get(1).map(String::as_str) == Some("--evaluate") {
        let (Some(reference), Some(candidate)) = (args.get(2), args.get(3)) else {
            eprintln!("{USAGE}");
            return Ok(());
        };
        return evaluate_files(Path::new(reference), Path::new(candidate));
    }

    // Load configuration
    let config = Config::load()?;

    let store = HistoryStore::open(&config.db_path).await?;

    match args.get(1).map(String::as_str) {
        Some("--history") => {
            let records = store.list_all().await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
            return Ok(());
        }
        Some("--delete") => {
            let id: i64 = args
                .get(2)
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| AppError::Config(USAGE.to_string()))?;
            if store.get(id).await?.is_none() {
                eprintln!("No summary with id {id}");
                return Ok(());
            }
            store.delete(id).await?;
            println!("Deleted summary {id}");
            return Ok(());
        }
        Some("--summarize") | None => {}
        Some(_) => {
            eprintln!("{USAGE}");
            return Ok(());
        }
    }

    // The model client is built once and shared for the whole process
    let summarizer = Summarizer::new(HttpGenerator::new(&config.model)?, config.generation.clone());

    // Headless summarize: read, summarize, save, print
    if args.get(1).map(String::as_str) == Some("--summarize") {
        let source = args.get(2).map(String::as_str).unwrap_or("-");
        return summarize_source(&summarizer, &store, source).await;
    }

    // Initialize app
    let mut app = App::new(config, Config::config_path(), store, summarizer).await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn read_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(std::fs::read_to_string(source)?)
    }
}

async fn summarize_source<G: TextGenerator>(
    summarizer: &Summarizer<G>,
    store: &HistoryStore,
    source: &str,
) -> Result<()> {
    let text = read_source(source)?;

    match summarizer.summarize(&text).await? {
        SummaryOutcome::Summary(summary) => {
            store.append(&text, &summary).await?;
            println!("{summary}");
        }
        outcome @ SummaryOutcome::EmptyInput => eprintln!("{}", outcome.text()),
    }
    Ok(())
}

fn evaluate_files(reference: &Path, candidate: &Path) -> Result<()> {
    let reference = std::fs::read_to_string(reference)?;
    let candidate = std::fs::read_to_string(candidate)?;

    if reference.trim().is_empty() || candidate.trim().is_empty() {
        eprintln!("{}", eval::EMPTY_PAIR_WARNING);
        return Ok(());
    }

    let result = eval::evaluate(&reference, &candidate)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn run_app<B: Backend, G: TextGenerator>(
    terminal: &mut Terminal<B>,
    app: &mut App<G>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        // Poll for events with timeout so resizes redraw promptly
        if event::poll(Duration::from_millis(250))? {
            let action = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key_event(key, app.editing.is_some(), app.show_help)
                }
                Event::Paste(text) => Some(AppAction::Paste(text)),
                _ => None,
            };

            if let Some(action) = action {
                // Show the in-flight state before blocking on the model
                if app.prepare(&action) {
                    terminal.draw(|frame| draw(frame, app))?;
                }
                let should_quit = app.handle_action(action).await?;
                if should_quit {
                    return Ok(());
                }
            }
        }
    }
}
