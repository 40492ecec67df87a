//! Add/edit book form, rendered as a modal overlay over the dashboard.
//!
//! Owns the in-progress [`BookDraft`] and its validation errors. Submission
//! never leaves the form while errors remain, so every failure is shown
//! inline next to its field.

use chrono::{Datelike, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use shelfly_core::{Book, BookDraft, BookId, BookStatus, DraftField, FieldError};

use crate::action::Action;
use crate::theme;

/// Which form field currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Title,
    Author,
    Genre,
    PublishedYear,
    Status,
}

impl FormField {
    const ORDER: [FormField; 5] = [
        Self::Title,
        Self::Author,
        Self::Genre,
        Self::PublishedYear,
        Self::Status,
    ];

    fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Author => "Author",
            Self::Genre => "Genre",
            Self::PublishedYear => "Published Year",
            Self::Status => "Status",
        }
    }

    fn draft_field(self) -> DraftField {
        match self {
            Self::Title => DraftField::Title,
            Self::Author => DraftField::Author,
            Self::Genre => DraftField::Genre,
            Self::PublishedYear => DraftField::PublishedYear,
            Self::Status => DraftField::Status,
        }
    }
}

/// Modal form for adding a new book or editing an existing one.
pub struct BookForm {
    /// `Some(id)` when editing; `None` when adding.
    editing: Option<BookId>,
    title: String,
    author: String,
    genre: String,
    year: String,
    /// Index into `status_options`; `None` until the user picks one.
    status_index: Option<usize>,
    status_options: Vec<BookStatus>,
    focus: FormField,
    errors: Vec<FieldError>,
}

impl BookForm {
    /// Empty form for adding a book.
    pub fn add() -> Self {
        Self {
            editing: None,
            title: String::new(),
            author: String::new(),
            genre: String::new(),
            year: String::new(),
            status_index: None,
            status_options: BookStatus::WELL_KNOWN.to_vec(),
            focus: FormField::Title,
            errors: Vec::new(),
        }
    }

    /// Pre-populated form for editing an existing book.
    ///
    /// A non-standard status on the book is added to the selector so
    /// saving without touching the field keeps it byte-for-byte.
    pub fn edit(book: &Book) -> Self {
        let mut status_options = BookStatus::WELL_KNOWN.to_vec();
        if !status_options.contains(&book.status) {
            status_options.push(book.status.clone());
        }
        let status_index = status_options.iter().position(|s| *s == book.status);

        Self {
            editing: Some(book.id.clone()),
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            year: book.published_year.to_string(),
            status_index,
            status_options,
            focus: FormField::Title,
            errors: Vec::new(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// The draft as currently entered, validated or not.
    pub fn draft(&self) -> BookDraft {
        BookDraft {
            title: self.title.clone(),
            author: self.author.clone(),
            genre: self.genre.clone(),
            published_year: self.year.parse().ok(),
            status: self
                .status_index
                .and_then(|i| self.status_options.get(i).cloned()),
        }
    }

    /// Handle a key while the form is open. Returns an action for the app
    /// loop, or `None` when the key only mutated form state.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => return Some(Action::CloseForm),
            KeyCode::Enter => return self.submit(),
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Left if self.focus == FormField::Status => self.cycle_status(false),
            KeyCode::Right | KeyCode::Char(' ') if self.focus == FormField::Status => {
                self.cycle_status(true);
            }
            KeyCode::Backspace => {
                if let Some(input) = self.active_input_mut() {
                    input.pop();
                }
            }
            KeyCode::Char(c) => {
                let digits_only = self.focus == FormField::PublishedYear;
                if let Some(input) = self.active_input_mut() {
                    if digits_only {
                        if c.is_ascii_digit() && input.len() < 4 {
                            input.push(c);
                        }
                    } else {
                        input.push(c);
                    }
                }
            }
            _ => {}
        }
        None
    }

    fn active_input_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Title => Some(&mut self.title),
            FormField::Author => Some(&mut self.author),
            FormField::Genre => Some(&mut self.genre),
            FormField::PublishedYear => Some(&mut self.year),
            FormField::Status => None,
        }
    }

    fn cycle_status(&mut self, forward: bool) {
        // WELL_KNOWN guarantees at least two options.
        let len = self.status_options.len();
        let next = match (self.status_index, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(idx), true) => (idx + 1) % len,
            (Some(idx), false) => (idx + len - 1) % len,
        };
        self.status_index = Some(next);
    }

    /// Validate and, on success, produce the submit action. Failures stay
    /// in the form as inline errors.
    fn submit(&mut self) -> Option<Action> {
        let draft = self.draft();
        match draft.validate(Utc::now().year()) {
            Ok(()) => {
                self.errors.clear();
                Some(match &self.editing {
                    Some(id) => Action::SubmitUpdate(id.clone(), draft),
                    None => Action::SubmitCreate(draft),
                })
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    fn error_for(&self, field: DraftField) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    fn field_value(&self, field: FormField) -> String {
        match field {
            FormField::Title => self.title.clone(),
            FormField::Author => self.author.clone(),
            FormField::Genre => self.genre.clone(),
            FormField::PublishedYear => self.year.clone(),
            FormField::Status => match self.status_index {
                Some(idx) => {
                    let label = self
                        .status_options
                        .get(idx)
                        .map_or("", BookStatus::as_str);
                    format!("< {label} >")
                }
                None => "< press Space to choose >".into(),
            },
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(52, 16, area);
        frame.render_widget(Clear, popup);

        let title = if self.is_editing() {
            " Edit Book "
        } else {
            " Add Book "
        };
        let block = Block::default()
            .title(Span::styled(title, theme::title_style()))
            .borders(Borders::ALL)
            .border_style(theme::border_focused());
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        // One label row + one input row per field, then the hint footer.
        let rows = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

        for (row, field) in rows.iter().zip(FormField::ORDER) {
            self.render_field(frame, *row, field);
        }

        let hints = Line::from(vec![
            Span::styled("Tab", theme::key_hint_key()),
            Span::styled(" next  ", theme::key_hint()),
            Span::styled("Enter", theme::key_hint_key()),
            Span::styled(" save  ", theme::key_hint()),
            Span::styled("Esc", theme::key_hint_key()),
            Span::styled(" cancel", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), rows[6]);
    }

    fn render_field(&self, frame: &mut Frame, area: Rect, field: FormField) {
        let focused = self.focus == field;
        let label_style = if focused {
            theme::title_style()
        } else {
            theme::table_row()
        };

        let mut value = self.field_value(field);
        if focused && field != FormField::Status {
            value.push('\u{2588}'); // block cursor
        }

        let mut spans = vec![
            Span::styled(format!("{:<16}", field.label()), label_style),
            Span::styled(value, Style::default().fg(theme::PARCHMENT)),
        ];
        if let Some(err) = self.error_for(field.draft_field()) {
            spans.push(Span::styled(
                format!("  {}", err.message),
                theme::field_error(),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Center a fixed-size rect inside `area`, clamped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
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

    fn press(form: &mut BookForm, code: KeyCode) -> Option<Action> {
        form.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(form: &mut BookForm, text: &str) {
        for c in text.chars() {
            press(form, KeyCode::Char(c));
        }
    }

    fn sample_book() -> Book {
        serde_json::from_value(serde_json::json!({
            "id": "42",
            "title": "Dune",
            "author": "Herbert",
            "genre": "Sci-Fi",
            "publishedYear": 1965,
            "status": "On Hold",
            "createdAt": "2024-03-15T10:00:00Z",
        }))
        .unwrap()
    }

    #[test]
    fn typing_fills_the_focused_field() {
        let mut form = BookForm::add();
        type_str(&mut form, "Dune");
        press(&mut form, KeyCode::Tab);
        type_str(&mut form, "Herbert");

        let draft = form.draft();
        assert_eq!(draft.title, "Dune");
        assert_eq!(draft.author, "Herbert");
    }

    #[test]
    fn year_field_only_accepts_digits() {
        let mut form = BookForm::add();
        for _ in 0..3 {
            press(&mut form, KeyCode::Tab);
        }
        type_str(&mut form, "19abc65x");
        assert_eq!(form.draft().published_year, Some(1965));
    }

    #[test]
    fn submitting_an_empty_form_keeps_it_open_with_errors() {
        let mut form = BookForm::add();
        let action = press(&mut form, KeyCode::Enter);
        assert!(action.is_none());
        assert_eq!(form.errors.len(), 5);
    }

    #[test]
    fn complete_form_submits_a_create() {
        let mut form = BookForm::add();
        type_str(&mut form, "Dune");
        press(&mut form, KeyCode::Tab);
        type_str(&mut form, "Herbert");
        press(&mut form, KeyCode::Tab);
        type_str(&mut form, "Sci-Fi");
        press(&mut form, KeyCode::Tab);
        type_str(&mut form, "1965");
        press(&mut form, KeyCode::Tab);
        press(&mut form, KeyCode::Char(' ')); // pick Available

        match press(&mut form, KeyCode::Enter) {
            Some(Action::SubmitCreate(draft)) => {
                assert_eq!(draft.status, Some(BookStatus::Available));
                assert_eq!(draft.published_year, Some(1965));
            }
            other => panic!("expected SubmitCreate, got {other:?}"),
        }
    }

    #[test]
    fn edit_form_preserves_a_non_standard_status() {
        let book = sample_book();
        let mut form = BookForm::edit(&book);
        assert!(form.is_editing());

        match press(&mut form, KeyCode::Enter) {
            Some(Action::SubmitUpdate(id, draft)) => {
                assert_eq!(id, book.id);
                assert_eq!(draft.status, Some(BookStatus::Other("On Hold".into())));
            }
            other => panic!("expected SubmitUpdate, got {other:?}"),
        }
    }

    #[test]
    fn status_selector_wraps_in_both_directions() {
        let mut form = BookForm::add();
        for _ in 0..4 {
            press(&mut form, KeyCode::Tab);
        }
        press(&mut form, KeyCode::Left);
        assert_eq!(form.draft().status, Some(BookStatus::Issued));
        press(&mut form, KeyCode::Right);
        assert_eq!(form.draft().status, Some(BookStatus::Available));
    }
}
