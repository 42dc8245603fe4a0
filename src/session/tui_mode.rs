//! TUI mode execution

use super::SessionData;
use crate::error::AppError;
use crate::ui::{self, App, UIConfig};
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;

/// Runs the dashboard until the user quits.
///
/// The terminal is restored whether the UI loop ends normally or with an
/// error; a restore failure is reported only when the loop itself succeeded.
pub async fn run_tui_mode(session: SessionData) -> Result<(), AppError> {
    crate::print_cmd_info!(
        "Starting dashboard",
        "{} (workspace '{}')",
        session.config.api_url,
        session.ctx.active_workspace
    );

    enable_raw_mode()?;
    let result = run_in_alternate_screen(session).await;
    let restored = restore_terminal();

    result?;
    restored?;
    crate::print_cmd_success!("Prometheus TUI exited", "");
    Ok(())
}

async fn run_in_alternate_screen(session: SessionData) -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let size = terminal.size()?;

    let ui_config = UIConfig::new(session.config.refresh_interval(), session.backend_online);
    let app = App::new(
        Box::new(session.client),
        session.workspaces,
        session.ctx,
        session.console,
        (size.width, size.height),
        ui_config,
    );
    ui::run(&mut terminal, app).await
}

/// Runs every restore step even when an earlier one fails, then reports the first failure.
fn restore_terminal() -> io::Result<()> {
    first_failure([
        disable_raw_mode(),
        execute!(io::stdout(), LeaveAlternateScreen),
        execute!(io::stdout(), DisableMouseCapture),
        execute!(io::stdout(), Show),
    ])
}

fn first_failure(results: impl IntoIterator<Item = io::Result<()>>) -> io::Result<()> {
    let mut first = None;
    for result in results {
        if let Err(e) = result {
            log::error!("Terminal restore step failed: {}", e);
            first.get_or_insert(e);
        }
    }
    first.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_restore_failure_is_reported() {
        let result = first_failure([
            Err(io::Error::other("raw mode")),
            Ok(()),
            Err(io::Error::other("cursor")),
        ]);
        assert_eq!(result.unwrap_err().to_string(), "raw mode");
    }

    #[test]
    fn restore_succeeds_when_every_step_does() {
        assert!(first_failure([Ok(()), Ok(()), Ok(())]).is_ok());
    }
}
