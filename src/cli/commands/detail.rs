use crate::config::Config;
use crate::constants::routes::MOVIE_ID_ARG;
use crate::models::MovieDetail;
use crate::view::{MovieDetailViewState, RouteArgs};

const MISSING: &str = "—";

pub async fn cmd_movie_detail(config: &Config, id_str: &str) -> anyhow::Result<()> {
    let client = crate::cli::catalog_client(config)?;
    let args = RouteArgs::new().with(MOVIE_ID_ARG, id_str.trim());
    let view = MovieDetailViewState::from_route(client, &args)?;

    view.reload().await;
    let state = view.state();

    if let Some(message) = state.error_message {
        anyhow::bail!("{message}");
    }
    let Some(detail) = state.detail else {
        println!("Movie {} returned no data.", view.movie_id());
        return Ok(());
    };

    print_detail(config, &detail);
    Ok(())
}

fn print_detail(config: &Config, detail: &MovieDetail) {
    println!("\n{}", detail.title);
    println!("{:-<60}", "");
    if let Some(tagline) = detail.tagline.as_deref().filter(|t| !t.trim().is_empty()) {
        println!("\"{tagline}\"\n");
    }

    println!("ID:        {}", detail.id);
    println!(
        "Rating:    {:.1} ({} votes)",
        detail.vote_average, detail.vote_count
    );
    println!("Runtime:   {}", runtime(detail.runtime_minutes));
    println!(
        "Released:  {}",
        detail.release_date.as_deref().unwrap_or(MISSING)
    );
    println!("Status:    {}", detail.status.as_deref().unwrap_or(MISSING));

    let genres = detail.genre_names();
    if !genres.is_empty() {
        println!("Genres:    {}", genres.join(", "));
    }

    println!("Budget:    {}", money(detail.budget));
    println!("Revenue:   {}", money(detail.revenue));

    if let Some(url) = detail.imdb_url() {
        println!("IMDb:      {url}");
    }
    if let Some(url) = detail
        .poster_path
        .as_deref()
        .and_then(|p| config.tmdb.poster_url(p))
    {
        println!("Poster:    {url}");
    }

    if let Some(overview) = detail.overview.as_deref().filter(|o| !o.trim().is_empty()) {
        println!("\n{overview}");
    }
    println!();
}

fn runtime(minutes: Option<u32>) -> String {
    match minutes {
        Some(m) if m > 0 => format!("{m} min"),
        _ => MISSING.to_string(),
    }
}

/// Whole dollars with thousands separators; zero means unknown.
fn money(amount: u64) -> String {
    if amount == 0 {
        return MISSING.to_string();
    }
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
