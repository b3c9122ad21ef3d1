use crate::config::Config;
use crate::domain::{SortField, SortOrder};
use crate::view::{CatalogState, CatalogViewState};

const GENRES_PER_ROW: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub genre: Option<i32>,
    pub sort: Option<SortField>,
    pub order: Option<SortOrder>,
    pub limit: usize,
}

pub async fn cmd_list_movies(config: &Config, options: ListOptions) -> anyhow::Result<()> {
    let client = crate::cli::catalog_client(config)?;
    let view = CatalogViewState::with_config(client, &config.catalog);

    println!("Fetching trending movies...");
    view.reload().await;

    if let Some(message) = view.state().error_message {
        anyhow::bail!("{message}");
    }

    if let Some(field) = options.sort {
        view.set_sort(field);
    }
    if crate::cli::needs_toggle(view.state().sort.order, options.order) {
        view.toggle_sort_order();
    }
    view.set_genre(options.genre);

    print_movies(&view.state(), options.limit);
    Ok(())
}

fn print_movies(state: &CatalogState, limit: usize) {
    if state.all_movies.is_empty() {
        println!("No trending movies this week.");
        return;
    }

    if state.shows_filter_empty_notice() {
        let genre = state
            .selected_genre()
            .map_or_else(|| "the selected genre".to_string(), |g| g.name.clone());
        println!("No movies match {genre}.");
        println!("Run without --genre to clear filters.");
        return;
    }

    let heading = state
        .selected_genre()
        .map_or_else(String::new, |g| format!(" in {}", g.name));
    println!(
        "\nTop movies{heading} ({} of {}, sorted by {} {})",
        state.visible_movies.len().min(limit),
        state.visible_movies.len(),
        state.sort.field,
        state.sort.order,
    );
    println!("{:-<90}", "");
    println!("{:<8} {:<40} {:<12} {:>10}  Genres", "ID", "Title", "Released", "Popularity");
    println!("{:-<90}", "");

    for movie in state.visible_movies.iter().take(limit) {
        let title = truncate(&movie.title, 38);
        let released = movie.release_date.as_deref().unwrap_or("-");
        let genres = state.genre_names(movie, GENRES_PER_ROW).join(", ");
        println!(
            "{:<8} {:<40} {:<12} {:>10.1}  {}",
            movie.id, title, released, movie.popularity, genres
        );
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_titles() {
        assert_eq!(truncate("Heat", 10), "Heat");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("Amélie Poulain", 8), "Améli...");
    }
}
