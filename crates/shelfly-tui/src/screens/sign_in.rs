//! Sign-in gate: blocks every catalog screen until a session exists.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use shelfly_core::SessionState;

use crate::action::Action;
use crate::component::Component;
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignInField {
    Username,
    Password,
}

pub struct SignInScreen {
    username: String,
    password: String,
    focus: SignInField,
    /// True between SignInSubmit and the resulting success/failure.
    submitting: bool,
    error: Option<String>,
    throbber_state: throbber_widgets_tui::ThrobberState,
}

impl SignInScreen {
    pub fn new() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            focus: SignInField::Username,
            submitting: false,
            error: None,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    fn active_input_mut(&mut self) -> &mut String {
        match self.focus {
            SignInField::Username => &mut self.username,
            SignInField::Password => &mut self.password,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            SignInField::Username => SignInField::Password,
            SignInField::Password => SignInField::Username,
        };
    }

    fn submit(&mut self) -> Option<Action> {
        if self.submitting {
            return None;
        }
        if self.username.trim().is_empty() || self.password.is_empty() {
            self.error = Some("Username and password are required".into());
            return None;
        }
        self.submitting = true;
        self.error = None;
        Some(Action::SignInSubmit {
            username: self.username.trim().to_owned(),
            password: self.password.clone(),
        })
    }

    fn render_input(&self, frame: &mut Frame, area: Rect, field: SignInField) {
        let (label, raw) = match field {
            SignInField::Username => ("Username", self.username.clone()),
            SignInField::Password => ("Password", "\u{2022}".repeat(self.password.len())),
        };
        let focused = self.focus == field;

        let mut value = raw;
        if focused && !self.submitting {
            value.push('\u{2588}');
        }

        let border = if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let input = Paragraph::new(value)
            .style(Style::default().fg(theme::PARCHMENT))
            .block(
                Block::default()
                    .title(label)
                    .borders(Borders::ALL)
                    .border_style(border),
            );
        frame.render_widget(input, area);
    }
}

impl Component for SignInScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.submitting {
            return Ok(None);
        }
        let action = match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
                self.toggle_focus();
                None
            }
            KeyCode::Backspace => {
                self.active_input_mut().pop();
                None
            }
            KeyCode::Char(c) => {
                self.active_input_mut().push(c);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => {
                if self.submitting {
                    self.throbber_state.calc_next();
                }
            }
            Action::SignInFailed(message) => {
                self.submitting = false;
                self.error = Some(message.clone());
                self.password.clear();
            }
            Action::SessionChanged(SessionState::SignedIn(_)) => {
                self.submitting = false;
                self.error = None;
                self.password.clear();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let panel = centered_panel(area);
        frame.render_widget(Clear, panel);

        let block = Block::default()
            .title(Span::styled(" Shelfly — Sign In ", theme::title_style()))
            .borders(Borders::ALL)
            .border_style(theme::border_focused());
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let rows = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

        self.render_input(frame, rows[0], SignInField::Username);
        self.render_input(frame, rows[1], SignInField::Password);

        if self.submitting {
            let throbber = throbber_widgets_tui::Throbber::default()
                .label("Signing in...")
                .style(theme::tab_inactive())
                .throbber_style(Style::default().fg(theme::SAGE));
            frame.render_stateful_widget(throbber, rows[2], &mut self.throbber_state.clone());
        } else if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(error.as_str()).style(theme::field_error()),
                rows[2],
            );
        }

        let hints = Line::from(vec![
            Span::styled("Tab", theme::key_hint_key()),
            Span::styled(" switch  ", theme::key_hint()),
            Span::styled("Enter", theme::key_hint_key()),
            Span::styled(" sign in  ", theme::key_hint()),
            Span::styled("Ctrl+C", theme::key_hint_key()),
            Span::styled(" quit", theme::key_hint()),
        ]);
        frame.render_widget(
            Paragraph::new(hints).alignment(Alignment::Center),
            rows[3],
        );
    }

    fn id(&self) -> &str {
        "sign-in"
    }
}

/// Fixed-size sign-in panel centered in the terminal.
fn centered_panel(area: Rect) -> Rect {
    let width = 44.min(area.width);
    let height = 10.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn press(screen: &mut SignInScreen, code: KeyCode) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn type_str(screen: &mut SignInScreen, text: &str) {
        for c in text.chars() {
            press(screen, KeyCode::Char(c));
        }
    }

    #[test]
    fn enter_with_empty_fields_shows_an_error() {
        let mut screen = SignInScreen::new();
        assert!(press(&mut screen, KeyCode::Enter).is_none());
        assert!(screen.error.is_some());
        assert!(!screen.submitting);
    }

    #[test]
    fn complete_credentials_submit_once() {
        let mut screen = SignInScreen::new();
        type_str(&mut screen, "reader");
        press(&mut screen, KeyCode::Tab);
        type_str(&mut screen, "hunter2");

        match press(&mut screen, KeyCode::Enter) {
            Some(Action::SignInSubmit { username, password }) => {
                assert_eq!(username, "reader");
                assert_eq!(password, "hunter2");
            }
            other => panic!("expected SignInSubmit, got {other:?}"),
        }
        assert!(screen.submitting);

        // Keys are ignored while the request is in flight.
        assert!(press(&mut screen, KeyCode::Enter).is_none());
    }

    #[test]
    fn failure_clears_the_password_and_reopens_the_form() {
        let mut screen = SignInScreen::new();
        type_str(&mut screen, "reader");
        press(&mut screen, KeyCode::Tab);
        type_str(&mut screen, "wrong");
        press(&mut screen, KeyCode::Enter);

        screen
            .update(&Action::SignInFailed("Invalid credentials".into()))
            .unwrap();
        assert!(!screen.submitting);
        assert_eq!(screen.error.as_deref(), Some("Invalid credentials"));
        assert!(screen.password.is_empty());
    }
}
