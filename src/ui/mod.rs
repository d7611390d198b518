//! Terminal UI: chat screen with transcript pane and composer

mod app;
mod composer;
mod history;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::config::UiConfig;
use crate::controller::ConversationController;
pub use app::ChatApp;

/// Interval between event-loop ticks; also bounds how quickly a
/// delivered reply shows up.
const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Manages terminal setup and cleanup
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    /// Set up terminal for TUI mode
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal })
    }

    fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<io::Stdout>> {
        &mut self.terminal
    }

    /// Restore terminal to normal mode
    fn restore(mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

// Ensure cleanup happens even if dropped (panic, early return, etc.)
impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Best effort cleanup - ignore errors since we may be unwinding
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Run the interactive chat screen until the user quits.
///
/// Must be called from within a tokio runtime: submissions spawn their
/// request task onto it.
pub fn run_chat(controller: ConversationController, ui: UiConfig) -> Result<()> {
    let mut guard = TerminalGuard::new()?;
    let mut app = ChatApp::new(controller, ui);

    let res = run_loop(guard.terminal_mut(), &mut app);

    guard.restore()?;
    res
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut ChatApp,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(TICK_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        app.tick();

        if app.should_quit() {
            return Ok(());
        }
    }
}
