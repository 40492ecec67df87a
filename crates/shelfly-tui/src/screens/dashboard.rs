//! Dashboard screen: the paginated, filterable book table.
//!
//! All catalog mutations start here (add, edit, delete), as do the
//! search and filter controls. The table shows ten rows per page with
//! absolute row numbers, so "#14" means the same book on every page.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use shelfly_core::{Book, FilterCriteria, filter};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

const PAGE_SIZE: usize = 10;

pub struct DashboardScreen {
    books: Arc<Vec<Arc<Book>>>,
    filters: FilterCriteria,
    /// Derived from `books` + `filters`; recomputed on every change.
    filtered: Vec<Arc<Book>>,
    /// Absolute index into `filtered`. The visible page follows it.
    selected: usize,
    focused: bool,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            books: Arc::new(Vec::new()),
            filters: FilterCriteria::default(),
            filtered: Vec::new(),
            selected: 0,
            focused: true,
        }
    }

    fn recompute_filtered(&mut self) {
        self.filtered = filter::apply(&self.books, &self.filters);
        if self.selected >= self.filtered.len() {
            self.selected = self.filtered.len().saturating_sub(1);
        }
    }

    fn page(&self) -> usize {
        self.selected / PAGE_SIZE
    }

    fn page_count(&self) -> usize {
        self.filtered.len().div_ceil(PAGE_SIZE).max(1)
    }

    fn selected_book(&self) -> Option<&Arc<Book>> {
        self.filtered.get(self.selected)
    }

    fn move_selection_down(&mut self, step: usize) {
        if self.filtered.is_empty() {
            return;
        }
        self.selected = (self.selected + step).min(self.filtered.len() - 1);
    }

    fn move_selection_up(&mut self, step: usize) {
        self.selected = self.selected.saturating_sub(step);
    }

    /// Next genre in the cycle: any -> first -> ... -> last -> any.
    fn next_genre(&self) -> Option<String> {
        let genres = filter::distinct_genres(&self.books);
        if genres.is_empty() {
            return None;
        }
        match &self.filters.genre {
            None => genres.first().cloned(),
            Some(current) => {
                let idx = genres.iter().position(|g| g == current)?;
                genres.get(idx + 1).cloned()
            }
        }
    }

    fn next_status(&self) -> Option<shelfly_core::BookStatus> {
        let statuses = filter::distinct_statuses(&self.books);
        if statuses.is_empty() {
            return None;
        }
        match &self.filters.status {
            None => statuses.first().cloned(),
            Some(current) => {
                let idx = statuses.iter().position(|s| s == current)?;
                statuses.get(idx + 1).cloned()
            }
        }
    }

    fn filter_summary(&self) -> Option<String> {
        if self.filters.is_empty() {
            return None;
        }
        let mut parts = Vec::new();
        if !self.filters.query.trim().is_empty() {
            parts.push(format!("\"{}\"", self.filters.query.trim()));
        }
        if let Some(genre) = &self.filters.genre {
            parts.push(genre.clone());
        }
        if let Some(status) = &self.filters.status {
            parts.push(status.as_str().to_owned());
        }
        Some(parts.join(" · "))
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let title = match self.filter_summary() {
            Some(summary) => format!(
                " Books — {} of {} [{summary}] ",
                self.filtered.len(),
                self.books.len()
            ),
            None => format!(" Books — {} ", self.books.len()),
        };

        let border = if self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(Span::styled(title, theme::title_style()))
            .borders(Borders::ALL)
            .border_style(border);

        let start = self.page() * PAGE_SIZE;
        let rows: Vec<Row> = self
            .filtered
            .iter()
            .enumerate()
            .skip(start)
            .take(PAGE_SIZE)
            .map(|(idx, book)| {
                Row::new(vec![
                    Cell::from(format!("{}", idx + 1)),
                    Cell::from(book.title.clone()),
                    Cell::from(book.author.clone()),
                    Cell::from(book.genre.clone()),
                    Cell::from(book.published_year.to_string()),
                    Cell::from(Span::styled(
                        book.status.as_str().to_owned(),
                        theme::status_style(&book.status),
                    )),
                ])
                .style(theme::table_row())
            })
            .collect();

        let header = Row::new(vec!["#", "Title", "Author", "Genre", "Year", "Status"])
            .style(theme::table_header());

        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Min(24),
                Constraint::Min(16),
                Constraint::Length(14),
                Constraint::Length(6),
                Constraint::Length(12),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected())
        .block(block);

        let mut state = TableState::default();
        if !self.filtered.is_empty() {
            state.select(Some(self.selected - start));
        }
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let page_info = format!("Page {}/{}  ", self.page() + 1, self.page_count());
        let mut spans = vec![Span::styled(page_info, theme::tab_inactive())];
        for (key, what) in [
            ("a", "add"),
            ("e", "edit"),
            ("d", "delete"),
            ("/", "search"),
            ("g", "genre"),
            ("s", "status"),
            ("c", "clear"),
            ("r", "refresh"),
        ] {
            spans.push(Span::styled(key, theme::key_hint_key()));
            spans.push(Span::styled(format!(" {what}  "), theme::key_hint()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection_down(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection_up(1);
                None
            }
            KeyCode::PageDown => {
                self.move_selection_down(PAGE_SIZE);
                None
            }
            KeyCode::PageUp => {
                self.move_selection_up(PAGE_SIZE);
                None
            }
            KeyCode::Home => {
                self.selected = 0;
                None
            }
            KeyCode::End => {
                self.selected = self.filtered.len().saturating_sub(1);
                None
            }
            KeyCode::Char('a') => Some(Action::OpenForm(None)),
            KeyCode::Char('e') | KeyCode::Enter => self
                .selected_book()
                .map(|book| Action::OpenForm(Some(Arc::clone(book)))),
            KeyCode::Char('d') => self.selected_book().map(|book| Action::RequestDelete {
                id: book.id.clone(),
                title: book.title.clone(),
            }),
            KeyCode::Char('/') => Some(Action::OpenSearch),
            KeyCode::Char('g') => Some(Action::GenreFilter(self.next_genre())),
            KeyCode::Char('s') => Some(Action::StatusFilter(self.next_status())),
            KeyCode::Char('c') => Some(Action::ClearFilters),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::BooksUpdated(books) => {
                self.books = Arc::clone(books);
                self.recompute_filtered();
            }
            Action::SearchInput(query) => {
                self.filters.query = query.clone();
                self.recompute_filtered();
            }
            Action::CloseSearch => {
                self.filters.query.clear();
                self.recompute_filtered();
            }
            Action::GenreFilter(genre) => {
                self.filters.genre = genre.clone();
                self.recompute_filtered();
            }
            Action::StatusFilter(status) => {
                self.filters.status = status.clone();
                self.recompute_filtered();
            }
            Action::ClearFilters => {
                self.filters.clear();
                self.recompute_filtered();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [table_area, footer_area] =
            Layout::vertical([Constraint::Min(5), Constraint::Length(1)]).areas(area);
        self.render_table(frame, table_area);
        self.render_footer(frame, footer_area);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "dashboard"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shelfly_core::{BookId, BookStatus};

    fn book(id: usize, genre: &str, status: BookStatus) -> Arc<Book> {
        Arc::new(Book {
            id: BookId::from(id.to_string()),
            title: format!("Book {id}"),
            author: format!("Author {id}"),
            genre: genre.into(),
            published_year: 2000,
            status,
            created_at: "2024-03-15T10:00:00Z".parse().unwrap(),
        })
    }

    fn screen_with(count: usize) -> DashboardScreen {
        let books: Vec<Arc<Book>> = (1..=count)
            .map(|i| book(i, "Sci-Fi", BookStatus::Available))
            .collect();
        let mut screen = DashboardScreen::new();
        screen
            .update(&Action::BooksUpdated(Arc::new(books)))
            .unwrap();
        screen
    }

    #[test]
    fn page_follows_the_selection() {
        let mut screen = screen_with(25);
        assert_eq!(screen.page(), 0);
        assert_eq!(screen.page_count(), 3);

        screen.move_selection_down(12);
        assert_eq!(screen.selected, 12);
        assert_eq!(screen.page(), 1);

        screen.move_selection_down(100);
        assert_eq!(screen.selected, 24);
        assert_eq!(screen.page(), 2);
    }

    #[test]
    fn filtering_clamps_the_selection() {
        let mut screen = screen_with(25);
        screen.move_selection_down(24);

        screen
            .update(&Action::SearchInput("Book 3".into()))
            .unwrap();
        assert_eq!(screen.filtered.len(), 1);
        assert_eq!(screen.selected, 0);
    }

    #[test]
    fn closing_search_clears_the_query() {
        let mut screen = screen_with(5);
        screen.update(&Action::SearchInput("Book 1".into())).unwrap();
        assert_eq!(screen.filtered.len(), 1);

        screen.update(&Action::CloseSearch).unwrap();
        assert_eq!(screen.filtered.len(), 5);
    }

    #[test]
    fn genre_cycle_wraps_back_to_any() {
        let books = vec![
            book(1, "Classic", BookStatus::Available),
            book(2, "Sci-Fi", BookStatus::Issued),
        ];
        let mut screen = DashboardScreen::new();
        screen
            .update(&Action::BooksUpdated(Arc::new(books)))
            .unwrap();

        assert_eq!(screen.next_genre(), Some("Classic".into()));
        screen
            .update(&Action::GenreFilter(Some("Classic".into())))
            .unwrap();
        assert_eq!(screen.next_genre(), Some("Sci-Fi".into()));
        screen
            .update(&Action::GenreFilter(Some("Sci-Fi".into())))
            .unwrap();
        assert_eq!(screen.next_genre(), None);
    }

    #[test]
    fn delete_key_targets_the_selected_book() {
        let mut screen = screen_with(5);
        screen.move_selection_down(2);

        let action = screen
            .handle_key_event(KeyEvent::new(
                KeyCode::Char('d'),
                crossterm::event::KeyModifiers::NONE,
            ))
            .unwrap();
        match action {
            Some(Action::RequestDelete { id, title }) => {
                assert_eq!(id, BookId::from("3"));
                assert_eq!(title, "Book 3");
            }
            other => panic!("expected RequestDelete, got {other:?}"),
        }
    }

    #[test]
    fn empty_list_yields_no_edit_action() {
        let mut screen = DashboardScreen::new();
        let action = screen
            .handle_key_event(KeyEvent::new(
                KeyCode::Char('e'),
                crossterm::event::KeyModifiers::NONE,
            ))
            .unwrap();
        assert!(action.is_none());
    }
}
