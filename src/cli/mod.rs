//! CLI module - a terminal front end over the catalog view states.

mod commands;

use crate::clients::TmdbClient;
use crate::config::Config;
use crate::domain::{SortField, SortOrder};
use crate::services::CatalogClient;
use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;

/// Marquee - this week's trending movies from TMDB
#[derive(Parser)]
#[command(name = "marquee")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the top trending movies of the week
    #[command(alias = "ls", alias = "l")]
    List {
        /// Only show movies of this genre id
        #[arg(long, short)]
        genre: Option<i32>,

        /// Sort field
        #[arg(long, short, value_enum)]
        sort: Option<SortArg>,

        /// Ascending order
        #[arg(long, conflicts_with = "desc")]
        asc: bool,

        /// Descending order
        #[arg(long)]
        desc: bool,

        /// Number of rows to print
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// List movie genres
    #[command(alias = "g")]
    Genres,

    /// Show details about one movie
    #[command(alias = "i", alias = "info")]
    Detail {
        /// TMDB movie id
        id: String,
    },

    /// Create default config file
    Init,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Popularity,
    Title,
    ReleaseDate,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Popularity => Self::Popularity,
            SortArg::Title => Self::Title,
            SortArg::ReleaseDate => Self::ReleaseDate,
        }
    }
}

/// Requested order, if any, from the `--asc`/`--desc` flags.
#[must_use]
pub const fn requested_order(asc: bool, desc: bool) -> Option<SortOrder> {
    match (asc, desc) {
        (true, _) => Some(SortOrder::Asc),
        (false, true) => Some(SortOrder::Desc),
        (false, false) => None,
    }
}

/// Whether the view's `current` order must be toggled to reach `requested`.
#[must_use]
pub const fn needs_toggle(current: SortOrder, requested: Option<SortOrder>) -> bool {
    match requested {
        Some(order) => order.is_ascending() != current.is_ascending(),
        None => false,
    }
}

pub fn catalog_client(config: &Config) -> anyhow::Result<Arc<dyn CatalogClient>> {
    let client = TmdbClient::new(&config.tmdb)?;
    Ok(Arc::new(client))
}

pub async fn dispatch(config: &Config, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::List {
            genre,
            sort,
            asc,
            desc,
            limit,
        } => {
            let options = ListOptions {
                genre,
                sort: sort.map(SortField::from),
                order: requested_order(asc, desc),
                limit,
            };
            cmd_list_movies(config, options).await
        }
        Commands::Genres => cmd_list_genres(config).await,
        Commands::Detail { id } => cmd_movie_detail(config, &id).await,
        Commands::Init => cmd_init(),
    }
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_with_options() {
        let cli = Cli::try_parse_from([
            "marquee", "list", "--genre", "28", "--sort", "release-date", "--asc",
        ])
        .unwrap();
        match cli.command {
            Commands::List {
                genre,
                sort,
                asc,
                desc,
                limit,
            } => {
                assert_eq!(genre, Some(28));
                assert_eq!(sort, Some(SortArg::ReleaseDate));
                assert!(asc);
                assert!(!desc);
                assert_eq!(limit, 20);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn asc_and_desc_conflict() {
        assert!(Cli::try_parse_from(["marquee", "list", "--asc", "--desc"]).is_err());
    }

    #[test]
    fn requested_order_from_flags() {
        assert_eq!(requested_order(true, false), Some(SortOrder::Asc));
        assert_eq!(requested_order(false, true), Some(SortOrder::Desc));
        assert_eq!(requested_order(false, false), None);
    }

    #[test]
    fn toggle_only_when_direction_differs() {
        assert!(needs_toggle(SortOrder::Desc, Some(SortOrder::Asc)));
        assert!(!needs_toggle(SortOrder::Asc, Some(SortOrder::Asc)));
        assert!(!needs_toggle(SortOrder::Desc, None));
    }
}
