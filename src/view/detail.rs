use super::{PreconditionError, ReloadSequence, RouteArgs, user_message};
use crate::constants::routes::MOVIE_ID_ARG;
use crate::domain::MovieId;
use crate::models::MovieDetail;
use crate::services::catalog::CatalogClient;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetailState {
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub detail: Option<MovieDetail>,
}

impl Default for MovieDetailState {
    fn default() -> Self {
        Self {
            is_loading: true,
            error_message: None,
            detail: None,
        }
    }
}

struct Inner {
    client: Arc<dyn CatalogClient>,
    movie_id: MovieId,
    state: watch::Sender<MovieDetailState>,
    reloads: ReloadSequence,
}

/// State container of the detail screen of one movie.
#[derive(Clone)]
pub struct MovieDetailViewState {
    inner: Arc<Inner>,
}

impl MovieDetailViewState {
    #[must_use]
    pub fn new(client: Arc<dyn CatalogClient>, movie_id: MovieId) -> Self {
        let (state, _) = watch::channel(MovieDetailState::default());
        Self {
            inner: Arc::new(Inner {
                client,
                movie_id,
                state,
                reloads: ReloadSequence::default(),
            }),
        }
    }

    /// Builds the view from navigation arguments.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionError`] when the `movieId` argument is absent
    /// or not an integer. Callers must treat this as fatal.
    pub fn from_route(
        client: Arc<dyn CatalogClient>,
        args: &RouteArgs,
    ) -> Result<Self, PreconditionError> {
        let raw = args
            .get(MOVIE_ID_ARG)
            .ok_or(PreconditionError::MissingArgument(MOVIE_ID_ARG))?;
        let movie_id = raw
            .parse::<MovieId>()
            .map_err(|_| PreconditionError::InvalidArgument {
                name: MOVIE_ID_ARG,
                value: raw.to_string(),
            })?;
        Ok(Self::new(client, movie_id))
    }

    #[must_use]
    pub fn movie_id(&self) -> MovieId {
        self.inner.movie_id
    }

    #[must_use]
    pub fn state(&self) -> MovieDetailState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<MovieDetailState> {
        self.inner.state.subscribe()
    }

    pub fn spawn_reload(&self) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move { this.reload().await })
    }

    /// Fetches the detail and publishes it. A failure sets `error_message`
    /// and leaves any previously loaded detail in place.
    pub async fn reload(&self) {
        let token = self.inner.reloads.begin();
        self.inner.state.send_modify(|s| {
            s.is_loading = true;
            s.error_message = None;
        });

        let id = self.inner.movie_id;
        let outcome = self.inner.client.fetch_detail(id).await;

        let published = self.inner.state.send_if_modified(|s| {
            if !self.inner.reloads.is_current(token) {
                return false;
            }
            s.is_loading = false;
            match &outcome {
                Ok(detail) => s.detail = Some(detail.clone()),
                Err(e) => s.error_message = Some(user_message(e)),
            }
            true
        });

        if !published {
            warn!(token, movie_id = %id, "Discarded superseded detail reload");
            return;
        }

        match outcome {
            Ok(detail) => info!(movie_id = %id, title = %detail.title, "Movie detail loaded"),
            Err(e) => warn!(movie_id = %id, error = %e, "Movie detail reload failed"),
        }
    }
}
