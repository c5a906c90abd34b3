use anyhow::{Context, Result, bail};
use catalog::{CatalogConfig, CatalogError, ContentItem, GenreId, GenreTable, TmdbClient};
use clap::{Parser, Subcommand};
use colored::Colorize;
use engine::{Category, RecommendationEngine, RecommendationMode};
use preferences::{GenrePreferenceStore, JsonProfileStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// catalog-recs - Movie and TV recommendations from the TMDB catalog
#[derive(Parser)]
#[command(name = "catalog-recs")]
#[command(about = "Personalized movie and TV recommendations", long_about = None)]
struct Cli {
    /// Path to the JSON profile holding favourite genres
    #[arg(short, long, default_value = "profile.json")]
    profile: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show recommendation categories for the current preferences
    Recommend {
        /// Items to print per category
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Refetch the recommendation pools, then show them
    Refresh {
        /// Items to print per category
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Search movies and TV shows
    Search {
        /// Search text (at least 3 characters)
        query: String,

        /// Only keep results with this genre id (repeatable)
        #[arg(long = "genre")]
        genres: Vec<GenreId>,
    },

    /// List the known genres
    Genres,

    /// Manage favourite genres
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Print the favourite genres
    Show,
    /// Replace the favourite genres
    Set {
        #[arg(required = true)]
        ids: Vec<GenreId>,
    },
    /// Add one favourite genre
    Add { id: GenreId },
    /// Remove one favourite genre
    Remove { id: GenreId },
    /// Show whether enough genres are picked for personalization
    Status,
    /// Check the stored genres against the genre table
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = CatalogConfig::from_env().context("Failed to read catalog configuration")?;
    let client = Arc::new(TmdbClient::new(config).context("Failed to build catalog client")?);
    if !client.is_configured() {
        println!(
            "{} TMDB_API_KEY is not set; catalog requests will fail",
            "!".yellow()
        );
    }

    let start = Instant::now();
    let genres = Arc::new(GenreTable::load(client.as_ref()).await);
    tracing::debug!(genres = genres.len(), elapsed = ?start.elapsed(), "Genre table ready");

    let profile = Arc::new(JsonProfileStore::new(&cli.profile));
    let store = Arc::new(GenrePreferenceStore::new(profile, genres.clone()));
    let engine = RecommendationEngine::new(client, store);

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend { limit } => handle_recommend(&engine, limit).await?,
        Commands::Refresh { limit } => handle_refresh(&engine, limit).await?,
        Commands::Search { query, genres } => handle_search(&engine, &query, &genres).await?,
        Commands::Genres => handle_genres(&genres),
        Commands::Prefs { action } => handle_prefs(&engine, action).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(engine: &RecommendationEngine, limit: usize) -> Result<()> {
    let start = Instant::now();
    let recommendations = engine.get_recommendations().await;

    if let Some(err) = &recommendations.error {
        print_catalog_error(err);
        bail!("No recommendations available: {err}");
    }

    let mode = match recommendations.mode {
        RecommendationMode::General => "general",
        RecommendationMode::Personalized => "personalized",
    };
    println!(
        "{} {} recommendations in {:?}",
        "✓".green(),
        mode,
        start.elapsed()
    );
    for category in &recommendations.categories {
        print_category(category, limit);
    }
    Ok(())
}

/// Handle the 'refresh' command
async fn handle_refresh(engine: &RecommendationEngine, limit: usize) -> Result<()> {
    if let Err(err) = engine.refresh().await {
        print_catalog_error(&err);
        return Err(err).context("Refresh failed");
    }
    println!("{} Pools refreshed", "✓".green());
    handle_recommend(engine, limit).await
}

/// Handle the 'search' command
async fn handle_search(
    engine: &RecommendationEngine,
    query: &str,
    genres: &[GenreId],
) -> Result<()> {
    let min_len = engine.config().min_query_len;
    if query.trim().chars().count() < min_len {
        println!(
            "{} Type at least {} characters to search",
            "!".yellow(),
            min_len
        );
        return Ok(());
    }

    let results = match engine.search(query, genres).await {
        Ok(results) => results,
        Err(err) => {
            print_catalog_error(&err);
            return Err(err).context("Search failed");
        }
    };

    println!("{}", format!("Search results for '{}':", query.trim()).bold().blue());
    if results.is_empty() {
        println!("  No matches");
    }
    let table = engine.preferences().genre_table();
    for (rank, item) in results.iter().enumerate() {
        print_item(rank + 1, item, table);
    }
    Ok(())
}

/// Handle the 'genres' command
fn handle_genres(genres: &GenreTable) {
    println!("{}", "Genres:".bold().blue());
    for genre in genres.genres() {
        println!("  {:>6}  {}", genre.id.to_string().green(), genre.name);
    }
}

/// Handle the 'prefs' subcommands
async fn handle_prefs(engine: &RecommendationEngine, action: PrefsAction) -> Result<()> {
    let store = engine.preferences();

    match action {
        PrefsAction::Show => {}
        PrefsAction::Set { ids } => engine
            .set_preferences(&ids)
            .await
            .context("Failed to save preferences")?,
        PrefsAction::Add { id } => engine
            .add_preference(id)
            .await
            .context("Failed to add genre")?,
        PrefsAction::Remove { id } => engine
            .remove_preference(id)
            .await
            .context("Failed to remove genre")?,
        PrefsAction::Status => {
            let status = store.completion_status()?;
            let marker = if status.is_complete { "✓".green() } else { "•".yellow() };
            println!(
                "{} {:.0}% complete: {}",
                marker, status.coverage_percent, status.recommendation_text
            );
            return Ok(());
        }
        PrefsAction::Validate => {
            let report = store.validate()?;
            if report.is_valid {
                println!("{} Preferences are valid", "✓".green());
            } else {
                println!("{} Preferences are invalid", "✗".red());
            }
            for issue in &report.errors {
                println!("  {} {}", "error:".red(), issue);
            }
            for issue in &report.warnings {
                println!("  {} {}", "warning:".yellow(), issue);
            }
            return Ok(());
        }
    }

    let ids = store.get()?;
    println!("{}", "Favourite genres:".bold().blue());
    if ids.is_empty() {
        println!("  none");
    }
    for id in ids {
        let name = store.genre_table().name(id).unwrap_or("unknown");
        println!("  {:>6}  {}", id.to_string().green(), name);
    }
    Ok(())
}

fn print_catalog_error(err: &CatalogError) {
    println!("{} {}", "✗".red(), err.user_message());
}

fn print_category(category: &Category, limit: usize) {
    println!();
    match &category.subtitle {
        Some(subtitle) => println!("{}  {}", category.title.bold().blue(), subtitle.dimmed()),
        None => println!("{}", category.title.bold().blue()),
    }
    if category.items.is_empty() {
        println!("  nothing to show");
        return;
    }
    for (rank, item) in category.items.iter().take(limit).enumerate() {
        println!(
            "  {:>2}. {}{} - {:.1}",
            rank + 1,
            item.title,
            item.year().map(|y| format!(" ({y})")).unwrap_or_default(),
            item.vote_average
        );
    }
}

fn print_item(rank: usize, item: &ContentItem, genres: &GenreTable) {
    let genre_names = item
        .genre_ids
        .iter()
        .filter_map(|&id| genres.name(id))
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "{}. {}{} [{}] {} - rating {:.1}, popularity {:.0}",
        rank.to_string().green(),
        item.title,
        item.year().map(|y| format!(" ({y})")).unwrap_or_default(),
        item.media_type,
        genre_names,
        item.vote_average,
        item.popularity
    );
}
