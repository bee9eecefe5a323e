use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use career_quiz_core::{Config, HttpAssessmentClient, Settings};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

#[derive(Parser, Debug)]
#[command(name = "career-quiz")]
#[command(about = "Practice for a career with questions from an AI assessment service")]
struct Cli {
    /// Base URL of the assessment service
    #[arg(long)]
    url: Option<String>,
    /// Number of correct answers the service should ask for
    #[arg(short, long)]
    total_questions: Option<u32>,
    /// Prefill the career name
    #[arg(short, long)]
    career: Option<String>,
    /// Where to write logs
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Store the resolved server URL and question count in the config file
    #[arg(long)]
    save_config: bool,
}

impl Cli {
    fn apply(&self, mut settings: Settings) -> Result<Settings> {
        if let Some(url) = &self.url {
            settings.server_url = url.clone();
        }
        if let Some(total) = self.total_questions {
            settings.total_questions = total;
        }
        if let Some(log_file) = &self.log_file {
            settings.log_file = log_file.clone();
        }
        settings.validate()?;
        Ok(settings)
    }
}

/// Logs go to a file; stderr belongs to the terminal UI.
fn init_logging(log_file: &Path) -> Result<()> {
    if let Some(parent) = log_file.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let config = Config::load().context("Failed to read config file")?;
    let settings = cli.apply(config.settings()?)?;

    init_logging(&settings.log_file)?;
    info!(server_url = %settings.server_url, total_questions = settings.total_questions, "configuration loaded");

    if cli.save_config {
        settings.to_config().save().context("Failed to save config file")?;
        info!(path = %Config::get_config_path()?.display(), "saved config");
    }

    let service = Arc::new(HttpAssessmentClient::new(&settings.server_url));
    let mut app = App::new(&settings, service, cli.career.clone());

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    info!("exiting");
    result
}

async fn run(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    let tx = events.sender();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event, &tx)?,
            None => break,
        }
    }

    Ok(())
}
