use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

impl Genre {
    #[must_use]
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Sorts genres by lower-cased name, ascending. Equal names keep their
/// received order.
pub fn sort_by_name(genres: &mut [Genre]) {
    genres.sort_by_cached_key(|g| g.name.to_lowercase());
}
