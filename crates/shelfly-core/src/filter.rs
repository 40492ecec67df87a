// ── Filter engine ──
//
// Pure derivation functions over book snapshots. Filtering never
// reorders: results keep the server's ordering, so row numbers stay
// stable as criteria change.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::model::{Book, BookStatus};

/// Active filter criteria for the catalog table.
///
/// All three dimensions combine conjunctively: a book must match the
/// text query AND the genre AND the status to appear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against title OR author.
    /// Empty means "match everything".
    pub query: String,
    /// Exact genre match; `None` means any genre.
    pub genre: Option<String>,
    /// Exact status match; `None` means any status.
    pub status: Option<BookStatus>,
}

impl FilterCriteria {
    /// No criteria active: every book passes.
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty() && self.genre.is_none() && self.status.is_none()
    }

    /// How many of the three dimensions are active.
    pub fn active_count(&self) -> usize {
        usize::from(!self.query.trim().is_empty())
            + usize::from(self.genre.is_some())
            + usize::from(self.status.is_some())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn matches(&self, book: &Book) -> bool {
        let query = self.query.trim().to_lowercase();
        if !query.is_empty()
            && !book.title.to_lowercase().contains(&query)
            && !book.author.to_lowercase().contains(&query)
        {
            return false;
        }
        if let Some(genre) = &self.genre {
            if book.genre != *genre {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if book.status != *status {
                return false;
            }
        }
        true
    }
}

/// Apply criteria to a snapshot, preserving order.
pub fn apply(books: &[Arc<Book>], criteria: &FilterCriteria) -> Vec<Arc<Book>> {
    books
        .iter()
        .filter(|b| criteria.matches(b))
        .cloned()
        .collect()
}

/// Distinct genres across the snapshot, sorted for stable dropdowns.
pub fn distinct_genres(books: &[Arc<Book>]) -> Vec<String> {
    let mut genres: Vec<String> = books.iter().map(|b| b.genre.clone()).collect();
    genres.sort_unstable();
    genres.dedup();
    genres
}

/// Distinct statuses across the snapshot, sorted by display string.
pub fn distinct_statuses(books: &[Arc<Book>]) -> Vec<BookStatus> {
    let mut statuses: Vec<BookStatus> = books.iter().map(|b| b.status.clone()).collect();
    statuses.sort_unstable_by(|a, b| a.as_str().cmp(b.as_str()));
    statuses.dedup();
    statuses
}

/// Books whose creation date (UTC) falls on the given calendar date.
///
/// Full-date comparison: year, month, and day must all match.
pub fn added_on(books: &[Arc<Book>], date: NaiveDate) -> Vec<Arc<Book>> {
    books
        .iter()
        .filter(|b| b.added_date() == date)
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::BookId;

    fn book(id: &str, title: &str, author: &str, genre: &str, status: BookStatus) -> Arc<Book> {
        Arc::new(Book {
            id: BookId::from(id),
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            published_year: 2000,
            status,
            created_at: "2024-03-15T10:00:00Z".parse().unwrap(),
        })
    }

    fn shelf() -> Vec<Arc<Book>> {
        vec![
            book("1", "Dune", "Herbert", "Sci-Fi", BookStatus::Available),
            book("2", "Hyperion", "Simmons", "Sci-Fi", BookStatus::Issued),
            book("3", "Emma", "Austen", "Classic", BookStatus::Available),
        ]
    }

    #[test]
    fn empty_criteria_passes_everything() {
        let books = shelf();
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        assert_eq!(apply(&books, &criteria).len(), 3);
    }

    #[test]
    fn query_matches_title_or_author_case_insensitive() {
        let books = shelf();
        let criteria = FilterCriteria {
            query: "AUSTEN".into(),
            ..Default::default()
        };
        let result = apply(&books, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Emma");

        let criteria = FilterCriteria {
            query: "dun".into(),
            ..Default::default()
        };
        assert_eq!(apply(&books, &criteria)[0].title, "Dune");
    }

    #[test]
    fn dimensions_combine_conjunctively() {
        let books = shelf();
        let criteria = FilterCriteria {
            query: String::new(),
            genre: Some("Sci-Fi".into()),
            status: Some(BookStatus::Available),
        };
        let result = apply(&books, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, BookId::from("1"));
        assert_eq!(criteria.active_count(), 2);
    }

    #[test]
    fn query_that_matches_nothing_yields_empty() {
        let books = shelf();
        let criteria = FilterCriteria {
            query: "xyz".into(),
            ..Default::default()
        };
        assert!(apply(&books, &criteria).is_empty());
    }

    #[test]
    fn filtered_results_keep_server_order() {
        let books = shelf();
        let criteria = FilterCriteria {
            genre: Some("Sci-Fi".into()),
            ..Default::default()
        };
        let result = apply(&books, &criteria);
        assert_eq!(result[0].id, BookId::from("1"));
        assert_eq!(result[1].id, BookId::from("2"));
    }

    #[test]
    fn distinct_genres_are_sorted_and_deduped() {
        let books = shelf();
        assert_eq!(distinct_genres(&books), vec!["Classic", "Sci-Fi"]);
    }

    #[test]
    fn distinct_statuses_include_unknown_strings() {
        let mut books = shelf();
        books.push(book(
            "4",
            "Ubik",
            "Dick",
            "Sci-Fi",
            BookStatus::Other("On Hold".into()),
        ));
        let statuses = distinct_statuses(&books);
        assert_eq!(
            statuses,
            vec![
                BookStatus::Available,
                BookStatus::Issued,
                BookStatus::Other("On Hold".into()),
            ]
        );
    }

    #[test]
    fn added_on_requires_the_full_date_to_match() {
        let mut same_day_last_year = shelf();
        // Same day-of-month, different month and year: must NOT match.
        same_day_last_year.push(Arc::new(Book {
            created_at: "2025-04-15T08:00:00Z".parse().unwrap(),
            ..(*shelf()[0]).clone()
        }));

        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let result = added_on(&same_day_last_year, date);
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|b| b.added_date() == date));
    }

    #[test]
    fn clear_resets_all_dimensions() {
        let mut criteria = FilterCriteria {
            query: "dune".into(),
            genre: Some("Sci-Fi".into()),
            status: Some(BookStatus::Issued),
        };
        assert_eq!(criteria.active_count(), 3);
        criteria.clear();
        assert!(criteria.is_empty());
    }
}
