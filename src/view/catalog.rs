use super::{ReloadSequence, user_message};
use crate::config::CatalogConfig;
use crate::constants::aggregation::DEFAULT_TOP_N;
use crate::domain::{SortField, SortOption};
use crate::models::genre::sort_by_name;
use crate::models::{Genre, MovieSummary};
use crate::services::catalog::{CatalogClient, CatalogError};
use crate::services::filter_sort;
use crate::services::top_movies::TopMoviesAggregator;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Snapshot of the movie list screen.
///
/// `visible_movies` is always `filter_sort::apply(all_movies,
/// selected_genre_id, sort)`; it is only ever written through
/// [`CatalogState::refresh_visible`].
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub genres: Vec<Genre>,
    pub selected_genre_id: Option<i32>,
    pub sort: SortOption,
    pub all_movies: Vec<MovieSummary>,
    pub visible_movies: Vec<MovieSummary>,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::initial(SortOption::default())
    }
}

impl CatalogState {
    /// State of a freshly opened view: loading, nothing fetched yet.
    #[must_use]
    pub const fn initial(sort: SortOption) -> Self {
        Self {
            is_loading: true,
            error_message: None,
            genres: Vec::new(),
            selected_genre_id: None,
            sort,
            all_movies: Vec::new(),
            visible_movies: Vec::new(),
        }
    }

    fn refresh_visible(&mut self) {
        self.visible_movies = filter_sort::apply(&self.all_movies, self.selected_genre_id, self.sort);
    }

    /// True when data exists but the current filter hides all of it; the
    /// presentation layer offers a "clear filters" action in that case.
    #[must_use]
    pub fn shows_filter_empty_notice(&self) -> bool {
        !self.is_loading
            && self.error_message.is_none()
            && self.visible_movies.is_empty()
            && !self.all_movies.is_empty()
    }

    /// Names of `movie`'s genres in the movie's own order, skipping ids
    /// missing from the genre list, at most `limit` of them.
    #[must_use]
    pub fn genre_names(&self, movie: &MovieSummary, limit: usize) -> Vec<&str> {
        movie
            .genre_ids
            .iter()
            .filter_map(|id| self.genres.iter().find(|g| g.id == *id))
            .map(|g| g.name.as_str())
            .take(limit)
            .collect()
    }

    #[must_use]
    pub fn selected_genre(&self) -> Option<&Genre> {
        let id = self.selected_genre_id?;
        self.genres.iter().find(|g| g.id == id)
    }
}

struct Inner {
    client: Arc<dyn CatalogClient>,
    aggregator: TopMoviesAggregator,
    top_n: usize,
    state: watch::Sender<CatalogState>,
    reloads: ReloadSequence,
}

/// State container of the movie list screen.
///
/// Cloning is cheap and every clone drives the same state.
///
/// Overlapping reloads are sequenced: a reload that completes after a newer
/// one has started is discarded, so the published state always reflects
/// the most recently started reload.
#[derive(Clone)]
pub struct CatalogViewState {
    inner: Arc<Inner>,
}

impl CatalogViewState {
    #[must_use]
    pub fn new(client: Arc<dyn CatalogClient>) -> Self {
        Self::build(client, DEFAULT_TOP_N, SortOption::default())
    }

    #[must_use]
    pub fn with_config(client: Arc<dyn CatalogClient>, config: &CatalogConfig) -> Self {
        Self::build(client, config.top_n, config.default_sort())
    }

    fn build(client: Arc<dyn CatalogClient>, top_n: usize, sort: SortOption) -> Self {
        let (state, _) = watch::channel(CatalogState::initial(sort));
        Self {
            inner: Arc::new(Inner {
                aggregator: TopMoviesAggregator::new(client.clone()),
                client,
                top_n,
                state,
                reloads: ReloadSequence::default(),
            }),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> CatalogState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.inner.state.subscribe()
    }

    /// Runs [`Self::reload`] on the current tokio runtime without waiting
    /// for it.
    pub fn spawn_reload(&self) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move { this.reload().await })
    }

    /// Fetches genres and the top movies concurrently and publishes the
    /// outcome.
    ///
    /// On success genres, `all_movies` and `visible_movies` are replaced;
    /// the genre filter and sort are kept and read at completion time. On
    /// failure only `error_message` is set and previously loaded data stays.
    pub async fn reload(&self) {
        let token = self.inner.reloads.begin();
        self.inner.state.send_modify(|s| {
            s.is_loading = true;
            s.error_message = None;
        });

        let (genres, movies) = tokio::join!(
            self.fetch_sorted_genres(),
            self.inner.aggregator.fetch_top_n(self.inner.top_n)
        );
        let outcome = genres.and_then(|genres| movies.map(|movies| (genres, movies)));

        let published = self.inner.state.send_if_modified(|s| {
            if !self.inner.reloads.is_current(token) {
                return false;
            }
            s.is_loading = false;
            match &outcome {
                Ok((genres, movies)) => {
                    s.error_message = None;
                    s.genres.clone_from(genres);
                    s.all_movies.clone_from(movies);
                    s.refresh_visible();
                }
                Err(e) => s.error_message = Some(user_message(e)),
            }
            true
        });

        if !published {
            warn!(token, "Discarded superseded catalog reload");
            return;
        }

        match outcome {
            Ok((genres, movies)) => info!(
                genres = genres.len(),
                movies = movies.len(),
                "Catalog loaded"
            ),
            Err(e) => warn!(error = %e, "Catalog reload failed"),
        }
    }

    async fn fetch_sorted_genres(&self) -> Result<Vec<Genre>, CatalogError> {
        let mut genres = self.inner.client.fetch_genres().await?;
        sort_by_name(&mut genres);
        Ok(genres)
    }

    pub fn set_genre(&self, genre_id: Option<i32>) {
        self.inner.state.send_modify(|s| {
            s.selected_genre_id = genre_id;
            s.refresh_visible();
        });
    }

    /// Changes the sort field; the order is kept.
    pub fn set_sort(&self, field: SortField) {
        self.inner.state.send_modify(|s| {
            s.sort = s.sort.with_field(field);
            s.refresh_visible();
        });
    }

    pub fn toggle_sort_order(&self) {
        self.inner.state.send_modify(|s| {
            s.sort = s.sort.toggled();
            s.refresh_visible();
        });
    }

    pub fn clear_filters(&self) {
        self.set_genre(None);
    }
}
