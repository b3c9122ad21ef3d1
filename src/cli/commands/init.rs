use crate::config::Config;

pub fn cmd_init() -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("✓ Created config.toml");
        println!("  Set tmdb.api_key (or TMDB_API_KEY) before running other commands.");
    } else {
        println!("config.toml already exists, leaving it untouched.");
    }
    Ok(())
}
