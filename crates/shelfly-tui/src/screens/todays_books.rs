//! "Added Today" screen: books whose creation date is today's UTC date.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use shelfly_core::{Book, filter};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct TodaysBooksScreen {
    books: Arc<Vec<Arc<Book>>>,
    todays: Vec<Arc<Book>>,
    today: NaiveDate,
    focused: bool,
}

impl TodaysBooksScreen {
    pub fn new() -> Self {
        Self {
            books: Arc::new(Vec::new()),
            todays: Vec::new(),
            today: Utc::now().date_naive(),
            focused: false,
        }
    }

    fn recompute(&mut self, today: NaiveDate) {
        self.today = today;
        self.todays = filter::added_on(&self.books, today);
    }
}

impl Component for TodaysBooksScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(match key.code {
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::BooksUpdated(books) => {
                self.books = Arc::clone(books);
                self.recompute(Utc::now().date_naive());
            }
            // A session left open across UTC midnight must stop showing
            // yesterday's additions even without a refresh.
            Action::Tick => {
                let now = Utc::now().date_naive();
                if now != self.today {
                    self.recompute(now);
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let border = if self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(Span::styled(
                format!(" Added Today ({}) ", self.todays.len()),
                theme::title_style(),
            ))
            .borders(Borders::ALL)
            .border_style(border);

        if self.todays.is_empty() {
            let empty = Paragraph::new("No books added today yet.")
                .style(theme::key_hint())
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let rows: Vec<Row> = self
            .todays
            .iter()
            .enumerate()
            .map(|(idx, book)| {
                Row::new(vec![
                    Cell::from(format!("{}", idx + 1)),
                    Cell::from(book.title.clone()),
                    Cell::from(book.author.clone()),
                    Cell::from(book.genre.clone()),
                    Cell::from(Span::styled(
                        book.status.as_str().to_owned(),
                        theme::status_style(&book.status),
                    )),
                ])
                .style(theme::table_row())
            })
            .collect();

        let header =
            Row::new(vec!["#", "Title", "Author", "Genre", "Status"]).style(theme::table_header());

        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Min(24),
                Constraint::Min(16),
                Constraint::Length(14),
                Constraint::Length(12),
            ],
        )
        .header(header)
        .block(block);

        frame.render_widget(table, area);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "todays-books"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shelfly_core::{BookId, BookStatus};

    fn book(id: &str, created_at: chrono::DateTime<Utc>) -> Arc<Book> {
        Arc::new(Book {
            id: BookId::from(id),
            title: format!("Book {id}"),
            author: "Author".into(),
            genre: "Genre".into(),
            published_year: 2000,
            status: BookStatus::Available,
            created_at,
        })
    }

    #[test]
    fn only_books_created_today_are_listed() {
        let today = Utc::now();
        let last_year = today - chrono::Duration::days(365);

        let mut screen = TodaysBooksScreen::new();
        screen
            .update(&Action::BooksUpdated(Arc::new(vec![
                book("1", today),
                book("2", last_year),
                book("3", today),
            ])))
            .unwrap();

        let ids: Vec<&str> = screen.todays.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn tick_rolls_the_list_over_at_midnight() {
        let now = Utc::now();

        let mut screen = TodaysBooksScreen::new();
        screen
            .update(&Action::BooksUpdated(Arc::new(vec![book("1", now)])))
            .unwrap();
        assert_eq!(screen.todays.len(), 1);

        // Stale cached date, as if the session crossed midnight.
        screen.recompute(now.date_naive() - chrono::Duration::days(1));
        assert!(screen.todays.is_empty());

        screen.update(&Action::Tick).unwrap();
        assert_eq!(screen.todays.len(), 1);
    }
}
