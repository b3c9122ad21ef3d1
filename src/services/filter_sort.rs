//! Derives the visible movie list from the full list and the user's
//! filter/sort selection.

use crate::domain::{SortField, SortOption, SortOrder};
use crate::models::MovieSummary;
use std::cmp::Ordering;

/// Filters `movies` by genre and orders the result by `sort`.
///
/// Ordering is a stable ascending sort on the field's base key; descending
/// is the exact reverse of that result, so ties flip too.
#[must_use]
pub fn apply(
    movies: &[MovieSummary],
    selected_genre_id: Option<i32>,
    sort: SortOption,
) -> Vec<MovieSummary> {
    let mut visible: Vec<MovieSummary> = match selected_genre_id {
        Some(genre_id) => movies
            .iter()
            .filter(|m| m.has_genre(genre_id))
            .cloned()
            .collect(),
        None => movies.to_vec(),
    };

    match sort.field {
        SortField::Popularity => {
            visible.sort_by(|a, b| a.popularity.total_cmp(&b.popularity));
        }
        SortField::Title => visible.sort_by_cached_key(|m| m.title.to_lowercase()),
        SortField::ReleaseDate => visible.sort_by(compare_release_date),
    }

    if sort.order == SortOrder::Desc {
        visible.reverse();
    }

    visible
}

// A missing date compares as "" and so precedes every ISO date.
fn compare_release_date(a: &MovieSummary, b: &MovieSummary) -> Ordering {
    let a = a.release_date.as_deref().unwrap_or_default();
    let b = b.release_date.as_deref().unwrap_or_default();
    a.cmp(b)
}
