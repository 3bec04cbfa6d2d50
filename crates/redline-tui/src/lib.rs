mod app;
mod ui;

pub use app::{App, BulkAction, InputMode};

use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use redline_workflow::ReviewBackend;

pub async fn run(backend: Arc<dyn ReviewBackend>, show_legend: bool) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend_term = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_term)?;

    // Initial fetch happens here; a failure is shown in the UI, not returned
    let mut app = App::new(backend, show_legend).await;

    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

/// Redraw with a busy message before a blocking backend call
fn draw_busy<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    message: &str,
) -> Result<()> {
    app.status_message = Some(message.to_string());
    terminal.draw(|f| ui::draw(f, app))?;
    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match app.input_mode {
                InputMode::Normal => match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('?') => app.toggle_help(),
                    KeyCode::Char('j') | KeyCode::Down => app.next(),
                    KeyCode::Char('k') | KeyCode::Up => app.previous(),
                    KeyCode::PageDown => app.scroll_detail_down(),
                    KeyCode::PageUp => app.scroll_detail_up(),
                    KeyCode::Char(' ') => app.toggle_current(),
                    KeyCode::Char('A') => app.toggle_all(),
                    KeyCode::Char('l') => app.toggle_legend(),
                    KeyCode::Char('a') => {
                        draw_busy(terminal, app, "Approving...")?;
                        app.approve_current().await;
                    }
                    KeyCode::Char('x') => {
                        draw_busy(terminal, app, "Rejecting...")?;
                        app.reject_current().await;
                    }
                    KeyCode::Char('B') => app.start_bulk(BulkAction::Approve),
                    KeyCode::Char('X') => app.start_bulk(BulkAction::Reject),
                    KeyCode::Char('r') => {
                        draw_busy(terminal, app, "Refreshing...")?;
                        app.refresh().await;
                    }
                    _ => {}
                },
                InputMode::ConfirmBulk(_) => match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => {
                        draw_busy(terminal, app, "Applying bulk action...")?;
                        app.confirm_bulk().await;
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_input(),
                    _ => {}
                },
                InputMode::ShowingHelp => match key.code {
                    KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => app.toggle_help(),
                    _ => {}
                },
            }
        }
    }
}
