use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::warn;

use timeline_courses::config::Settings;
use timeline_courses::db::SqliteStore;
use timeline_courses::taken::{merge_taken, normalize_entry, TakenStore};
use timeline_courses::{snapshot, Aggregation};

#[derive(Parser)]
#[command(name = "timeline_courses", about = "Completed-course extraction from degree-plan timelines")]
struct Cli {
    /// Taken-courses database (overrides TIMELINE_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract completed courses from a saved snapshot (JSON fragments or HTML)
    Extract {
        file: PathBuf,
        /// Parse the file as degree-plan HTML regardless of extension
        #[arg(long)]
        html: bool,
        /// Print the aggregation as JSON
        #[arg(long)]
        json: bool,
        /// Print term sort order and padded course codes
        #[arg(long)]
        debug: bool,
        /// Merge extracted codes into the taken-courses list
        #[arg(long)]
        save: bool,
    },
    /// Show the taken-courses list
    Taken,
    /// Add a course to the taken-courses list
    Add { code: String },
    /// Remove a course from the taken-courses list
    Remove { code: String },
}

fn main() -> anyhow::Result<()> {
    let (settings, config_err) = match Settings::load() {
        Ok(s) => (s, None),
        Err(e) => (Settings::default(), Some(e)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_level.as_str().into()),
        )
        .init();

    if let Some(e) = config_err {
        warn!(error = %e, "failed to load settings, using defaults");
    }

    let t0 = Instant::now();
    let cli = Cli::parse();
    let db_path = cli.db.clone().unwrap_or_else(|| settings.db_path.clone());

    let result = match cli.command {
        Commands::Extract { file, html, json, debug, save } => {
            let fragments = snapshot::load(&file, html)
                .with_context(|| format!("Failed to load snapshot {}", file.display()))?;
            if fragments.is_empty() {
                println!("No course bubbles found or not on the correct page.");
                return Ok(());
            }

            let agg = timeline_courses::process_snapshot(&fragments);
            if json {
                println!("{}", serde_json::to_string_pretty(&agg)?);
            } else {
                print_aggregation(&agg);
            }
            if debug {
                println!("\n--- Debug ---");
                println!("{}", serde_json::to_string_pretty(&agg.debug_view())?);
            }

            if save && !agg.is_empty() {
                let mut store = SqliteStore::open(&db_path)?;
                let added = merge_taken(&mut store, agg.all_codes())?;
                println!("\nAdded {} new courses to {}", added, db_path.display());
            }
            Ok(())
        }
        Commands::Taken => {
            let store = SqliteStore::open(&db_path)?;
            let codes = store.list()?;
            if codes.is_empty() {
                println!("No taken courses recorded.");
            }
            for code in &codes {
                println!("{}", code);
            }
            Ok(())
        }
        Commands::Add { code } => {
            let Some(code) = normalize_entry(&code) else {
                println!("Nothing to add.");
                return Ok(());
            };
            let mut store = SqliteStore::open(&db_path)?;
            if store.has(&code)? {
                println!("{} already listed", code);
            } else {
                store.insert(&code)?;
                println!("Added {}", code);
            }
            Ok(())
        }
        Commands::Remove { code } => {
            let Some(code) = normalize_entry(&code) else {
                println!("Nothing to remove.");
                return Ok(());
            };
            let mut store = SqliteStore::open(&db_path)?;
            if store.remove(&code)? {
                println!("Removed {}", code);
            } else {
                println!("{} not listed", code);
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

fn print_aggregation(agg: &Aggregation) {
    if agg.is_empty() {
        println!("No matching course codes found.");
        return;
    }

    for group in &agg.groups {
        println!("{}", group.term);
        println!("  {:<12} | {:>9}", "Course", "Credits");
        println!("  {}", "-".repeat(24));
        for c in &group.courses {
            println!("  {:<12} | {:>9}", c.code.to_string(), c.credits.to_string());
        }
        println!("  Term credits: {}\n", group.total_credits());
    }

    println!("Placement (No Credits or CEUs):");
    print_list(&agg.placement_codes());
    println!("For-credit courses:");
    print_list(&agg.for_credit_codes());
}

fn print_list<T: std::fmt::Display>(items: &[T]) {
    if items.is_empty() {
        println!("  None");
    }
    for item in items {
        println!("  {}", item);
    }
}
