//! Example: Load and print the genre table
//!
//! Run with: cargo run --package catalog --example list_genres

use catalog::{CatalogConfig, GenreTable, TmdbClient};
use std::time::Instant;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CatalogConfig::from_env()?;
    let client = TmdbClient::new(config)?;

    if !client.is_configured() {
        println!("TMDB_API_KEY is not set, the bundled genre table will be used");
    }

    let start = Instant::now();
    let table = GenreTable::load(&client).await;
    let elapsed = start.elapsed();

    println!("\n=== Genre Table ({} entries, {:?}) ===", table.len(), elapsed);
    for genre in table.genres() {
        println!("{:>6}  {}", genre.id, genre.name);
    }
    Ok(())
}
