use super::genre::Genre;
use crate::domain::MovieId;
use serde::{Deserialize, Serialize};

/// One entry of a trending page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: i32,
    pub title: String,
    pub poster_path: Option<String>,
    /// Order as received; may be empty and may repeat ids.
    pub genre_ids: Vec<i32>,
    pub popularity: f64,
    /// ISO `YYYY-MM-DD` when present.
    pub release_date: Option<String>,
}

impl MovieSummary {
    #[must_use]
    pub fn new(id: i32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn has_genre(&self, genre_id: i32) -> bool {
        self.genre_ids.contains(&genre_id)
    }

    #[must_use]
    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = popularity;
        self
    }

    #[must_use]
    pub fn with_genres(mut self, genre_ids: Vec<i32>) -> Self {
        self.genre_ids = genre_ids;
        self
    }

    #[must_use]
    pub fn with_release_date(mut self, release_date: impl Into<String>) -> Self {
        self.release_date = Some(release_date.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: i32,
    pub title: String,
    pub tagline: Option<String>,
    pub poster_path: Option<String>,
    pub genres: Vec<Genre>,
    pub overview: Option<String>,
    /// 0.0 to 10.0.
    pub vote_average: f64,
    pub vote_count: u32,
    pub budget: u64,
    pub revenue: u64,
    pub status: Option<String>,
    pub imdb_id: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub release_date: Option<String>,
}

impl MovieDetail {
    #[must_use]
    pub const fn movie_id(&self) -> MovieId {
        MovieId::new(self.id)
    }

    /// IMDb title page, when the detail carries a non-blank IMDb id.
    #[must_use]
    pub fn imdb_url(&self) -> Option<String> {
        self.imdb_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| format!("https://www.imdb.com/title/{id}/"))
    }

    #[must_use]
    pub fn genre_names(&self) -> Vec<&str> {
        self.genres.iter().map(|g| g.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imdb_url_requires_non_blank_id() {
        let mut detail = MovieDetail {
            id: 7,
            title: "Seven".to_string(),
            imdb_id: Some("tt1234567".to_string()),
            ..Default::default()
        };
        assert_eq!(
            detail.imdb_url().as_deref(),
            Some("https://www.imdb.com/title/tt1234567/")
        );

        detail.imdb_id = Some("   ".to_string());
        assert!(detail.imdb_url().is_none());

        detail.imdb_id = None;
        assert!(detail.imdb_url().is_none());
    }

    #[test]
    fn has_genre_checks_membership() {
        let movie = MovieSummary::new(1, "A").with_genres(vec![10, 20, 20]);
        assert!(movie.has_genre(20));
        assert!(!movie.has_genre(30));
        assert_eq!(movie.genre_ids, vec![10, 20, 20]);
    }
}
