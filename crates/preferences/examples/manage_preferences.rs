//! Example: Edit and inspect genre preferences
//!
//! Run with: cargo run --package preferences --example manage_preferences

use catalog::GenreTable;
use preferences::{GenrePreferenceStore, JsonProfileStore};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("debug")
        .init();

    println!("=== Genre Preference Example ===\n");

    let path = std::env::temp_dir().join("catalog-recs-example-profile.json");
    let genres = Arc::new(GenreTable::bundled());
    let store = GenrePreferenceStore::new(Arc::new(JsonProfileStore::new(&path)), genres.clone());

    store.set(&[28, 12])?;
    let status = store.completion_status()?;
    println!("After picking 2 genres: {:.0}% - {}", status.coverage_percent, status.recommendation_text);

    store.add(16)?;
    let status = store.completion_status()?;
    println!("After picking 3 genres: {:.0}% - {}", status.coverage_percent, status.recommendation_text);

    let names: Vec<&str> = store
        .get()?
        .into_iter()
        .filter_map(|id| genres.name(id))
        .collect();
    println!("\nPreferred genres: {}", names.join(", "));

    // An action/sci-fi movie against Action, Adventure, Animation
    println!("Match score for [Action, Science Fiction]: {:.3}", store.match_score(&[28, 878])?);

    let report = store.validate()?;
    println!("Valid: {} ({} warnings)", report.is_valid, report.warnings.len());

    std::fs::remove_file(&path).ok();
    Ok(())
}
