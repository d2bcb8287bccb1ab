mod action;
mod app;
mod config;
mod diff;
mod error;
mod events;
mod git_ops;
mod list;
mod loader;
mod logging;
mod stash;
mod theme;
mod ui;

use std::{
    io::{self, Stdout},
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
};

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Effect, Message};
use crate::config::Settings;
use crate::error::Result;
use crate::git_ops::GitRepo;
use crate::loader::TaskRunner;

/// Browse, inspect and apply git stashes.
#[derive(Debug, Parser)]
#[command(name = "stashview", version, about)]
struct Cli {
    /// Repository to open instead of the current directory.
    #[arg(short = 'C', long = "repo", value_name = "DIR")]
    repo: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let (settings, settings_err) = Settings::load();
    let _log_guard = match logging::init_tracing(&settings) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: cannot open log file: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(e) = settings_err {
        tracing::warn!(error = %e, "ignoring settings file");
    }
    theme::init(settings.theme);

    let start = cli.repo.unwrap_or_else(|| PathBuf::from("."));
    let repo = match GitRepo::discover(&start) {
        Ok(repo) => repo,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(root = %repo.root().display(), "opened repository");

    match run(repo).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "exiting on error");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Terminal modes entered for the UI, undone on drop so that early returns
/// and errors still leave a usable terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}

async fn run(repo: GitRepo) -> Result<()> {
    let (mut runner, mut results) = TaskRunner::new(Arc::new(repo));
    let mut app = App::new();
    let mut guard = TerminalGuard::enter()?;
    let mut event_stream = EventStream::new();

    let first = app.start();
    apply_effect(&mut runner, first);

    loop {
        guard.terminal.draw(|f| ui::draw_ui(f, &mut app))?;

        let effect = tokio::select! {
            Some(result) = results.recv() => app.update(Message::Completed(result)),
            Some(event) = event_stream.next() => match event? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let intent = events::key_to_intent(&app, key);
                    app.update(Message::Intent(intent))
                }
                Event::Mouse(mouse) => match events::mouse_to_intent(&app, mouse) {
                    Some(intent) => app.update(Message::Intent(intent)),
                    None => Effect::None,
                },
                _ => Effect::None,
            },
            else => break,
        };

        if !apply_effect(&mut runner, effect) {
            break;
        }
    }

    if !runner.is_idle() {
        tracing::debug!("quitting with a task still running");
    }
    runner.shutdown();
    Ok(())
}

/// Returns `false` when the loop should stop.
fn apply_effect(runner: &mut TaskRunner, effect: Effect) -> bool {
    match effect {
        Effect::None => true,
        Effect::Dispatch(task) => {
            runner.dispatch(task);
            true
        }
        Effect::Quit => false,
    }
}
