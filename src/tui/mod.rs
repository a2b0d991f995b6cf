//! Terminal User Interface for SecureCheck.
//!
//! Provides the main dashboard loop using ratatui and crossterm. One
//! interaction is handled at a time: a catalog query triggered from the
//! insights tab runs to completion (with the busy marker drawn) before the
//! next event is read.

pub mod app;
mod events;
mod ui;
pub mod widgets;

pub use app::{Action, App, InsightOutcome};
pub use events::Event;

use crate::db::DatabaseClient;
use crate::error::{Result, SecureCheckError};
use crate::query::{ExecutionResult, QueryRunner};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use std::time::Duration;
use tracing::{info, warn};

/// Poll window for terminal events.
const TICK_RATE: Duration = Duration::from_millis(100);

/// The main TUI application runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    /// Creates a new TUI instance, initializing the terminal.
    pub fn new() -> Result<Self> {
        let terminal = Self::setup_terminal()?;
        Ok(Self { terminal })
    }

    /// Sets up the terminal for TUI rendering.
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| SecureCheckError::internal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|e| {
            SecureCheckError::internal(format!("Failed to enter alternate screen: {e}"))
        })?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)
            .map_err(|e| SecureCheckError::internal(format!("Failed to create terminal: {e}")))?;

        Ok(terminal)
    }

    /// Restores the terminal to its original state.
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| SecureCheckError::internal(format!("Failed to disable raw mode: {e}")))?;

        execute!(self.terminal.backend_mut(), LeaveAlternateScreen).map_err(|e| {
            SecureCheckError::internal(format!("Failed to leave alternate screen: {e}"))
        })?;

        self.terminal
            .show_cursor()
            .map_err(|e| SecureCheckError::internal(format!("Failed to show cursor: {e}")))?;

        Ok(())
    }

    /// Runs the main dashboard event loop.
    pub async fn run(&mut self, mut app: App, db: &dyn DatabaseClient) -> Result<()> {
        // Restore the terminal before the panic message prints
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        let result = self.run_event_loop(&mut app, db).await;

        let _ = panic::take_hook();

        result
    }

    /// The main event loop, separated for cleaner error handling.
    async fn run_event_loop(&mut self, app: &mut App, db: &dyn DatabaseClient) -> Result<()> {
        loop {
            self.terminal
                .draw(|frame| ui::render(frame, app))
                .map_err(|e| SecureCheckError::internal(format!("Failed to draw: {e}")))?;

            if !app.running {
                break;
            }

            // Terminal event polling blocks, so it runs off the async thread
            let event = tokio::task::spawn_blocking(|| events::poll_event(TICK_RATE))
                .await
                .map_err(|e| SecureCheckError::internal(format!("Event task failed: {e}")))??;

            if let Some(action) = app.handle_event(event) {
                self.perform_action(action, app, db).await?;
            }
        }

        Ok(())
    }

    /// Performs an action requested by the app state.
    async fn perform_action(
        &mut self,
        action: Action,
        app: &mut App,
        db: &dyn DatabaseClient,
    ) -> Result<()> {
        match action {
            Action::RunQuery(entry) => {
                app.is_running_query = true;

                // Show the busy marker while the query is in flight
                self.terminal
                    .draw(|frame| ui::render(frame, app))
                    .map_err(|e| SecureCheckError::internal(format!("Failed to draw: {e}")))?;

                let runner = QueryRunner::new(db);
                let outcome = match runner.run(entry).await {
                    ExecutionResult::Success(outcome) => InsightOutcome::Table {
                        label: outcome.entry.label(),
                        result: outcome.result,
                    },
                    ExecutionResult::Failed { entry, message } => InsightOutcome::Error {
                        label: entry.label(),
                        message,
                    },
                    // run() on a resolved entry cannot miss, but the variant
                    // still needs a rendering
                    ExecutionResult::NotFound { label } => InsightOutcome::Error {
                        label: entry.label(),
                        message: format!("No catalog entry for '{label}'"),
                    },
                };

                app.set_insight_outcome(outcome);
                app.is_running_query = false;
            }
        }

        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Runs the dashboard until the user quits, then closes the database.
pub async fn run_dashboard(app: App, db: Box<dyn DatabaseClient>) -> Result<()> {
    info!("Starting dashboard");

    let mut tui = Tui::new()?;
    let result = tui.run(app, db.as_ref()).await;

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    }

    result
}
