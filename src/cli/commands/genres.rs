//! List genres command handler

use crate::config::Config;
use crate::models::genre::sort_by_name;

pub async fn cmd_list_genres(config: &Config) -> anyhow::Result<()> {
    let client = crate::cli::catalog_client(config)?;
    let mut genres = client.fetch_genres().await?;
    sort_by_name(&mut genres);

    if genres.is_empty() {
        println!("No genres returned.");
        return Ok(());
    }

    println!("Genres ({} total)", genres.len());
    println!("{:-<40}", "");
    for genre in genres {
        println!("{:>6}  {}", genre.id, genre.name);
    }

    Ok(())
}
