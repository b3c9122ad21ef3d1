pub mod catalog;
pub use catalog::{CatalogClient, CatalogError};

pub mod filter_sort;

pub mod top_movies;
pub use top_movies::TopMoviesAggregator;
