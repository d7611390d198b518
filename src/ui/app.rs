use crate::config::UiConfig;
use crate::controller::ConversationController;
use crate::ui::composer::{Composer, ComposerResult};
use crate::ui::history::TranscriptView;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

/// Top-level chat screen state: wires keyboard input through the
/// composer into the controller and renders both panes.
pub struct ChatApp {
    controller: ConversationController,
    composer: Composer,
    ui: UiConfig,
    should_quit: bool,
}

impl ChatApp {
    pub fn new(controller: ConversationController, ui: UiConfig) -> Self {
        let mut composer = Composer::new("Ask the answering service anything...");
        composer.set_focus(true);

        Self {
            controller,
            composer,
            ui,
            should_quit: false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Esc, _) => {
                self.should_quit = true;
            }
            _ => {
                if let ComposerResult::Submitted(text) = self.composer.handle_key(key) {
                    self.controller.submit(&text);
                }
            }
        }
    }

    /// Advance per-tick state: pick up a delivered reply and keep the
    /// composer's submit gate in sync with the busy flag.
    pub fn tick(&mut self) {
        self.controller.poll_reply();
        self.composer.set_enabled(!self.controller.is_busy());
    }

    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(10),   // transcript
                Constraint::Length(3), // composer
            ])
            .split(frame.size());

        let view = TranscriptView::new(self.controller.snapshot(), self.ui.show_timestamps);
        frame.render_widget(view, chunks[0]);
        frame.render_widget(&self.composer, chunks[1]);
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::AnsweringClient;
    use std::time::Duration;

    fn app() -> ChatApp {
        let client = AnsweringClient::new("http://127.0.0.1:1/chat", Duration::from_secs(1));
        ChatApp::new(
            ConversationController::new(client),
            UiConfig {
                show_timestamps: true,
            },
        )
    }

    #[tokio::test]
    async fn ctrl_c_requests_quit() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn typed_submit_reaches_the_controller() {
        let mut app = app();
        for c in "hi".chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        let snapshot = app.controller.snapshot();
        assert_eq!(snapshot.turns.len(), 1);
        assert_eq!(snapshot.turns[0].raw_content(), "hi");
        assert!(snapshot.busy);
    }
}
