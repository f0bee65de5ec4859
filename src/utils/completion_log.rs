use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use completion_tracker::{documents::NewCompletion, library::store, *};
use serde::Serialize;
use std::sync::Arc;

/// Tracker util for logging completed games and reading the dashboard views.
#[derive(Parser)]
struct Opts {
    /// Directory that holds the `config/` and `data/` documents.
    #[clap(long, default_value = ".")]
    data_root: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Logs a completed game or DLC.
    Add {
        #[clap(long)]
        appid: String,

        #[clap(long)]
        name: String,

        /// Completion date as YYYY-MM-DD. Defaults to today.
        #[clap(long)]
        date: Option<NaiveDate>,

        #[clap(long)]
        dlc: bool,

        #[clap(long, default_value = "")]
        notes: String,

        #[clap(long)]
        collection: Option<String>,
    },

    /// Deletes a log entry by id.
    Remove { id: String },

    /// Prints the log, most recent completion first.
    List,

    /// Prints completion statistics.
    Stats,

    /// Prints the library with completion status.
    Library,

    /// Prints library size, playtime and last refresh time.
    Status,

    /// Searches owned games by name.
    Search {
        query: String,

        #[clap(long, default_value = "20")]
        limit: usize,
    },

    /// Searches the DLC recorded for a game.
    SearchDlc {
        parent_appid: String,

        #[clap(default_value = "")]
        query: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    Tracing::setup("utils/completion_log")?;

    let opts: Opts = Opts::parse();

    let store = Arc::new(api::DocumentStore::open(&opts.data_root));
    let queries = library::LibraryQueries::new(Arc::clone(&store));

    match opts.command {
        Command::Add {
            appid,
            name,
            date,
            dlc,
            notes,
            collection,
        } => {
            let entry = store::completed::add_entry(
                &store,
                NewCompletion {
                    appid,
                    game_name: name,
                    completion_date: date,
                    is_dlc_expansion: dlc,
                    notes,
                    collection_name: collection,
                },
            )
            .await?;
            println!("Completion logged successfully. id: {}", entry.id);
        }
        Command::Remove { id } => {
            store::completed::remove_entry(&store, &id).await?;
            println!("Log entry deleted successfully.");
        }
        Command::List => print_json(&queries.completion_log().await)?,
        Command::Stats => print_json(&queries.completion_stats().await)?,
        Command::Library => print_json(&queries.library_with_completion_status().await)?,
        Command::Status => {
            let status = queries.library_status().await;
            print_json(&status)?;
            println!("Last updated: {}", status.last_updated_display());
        }
        Command::Search { query, limit } => {
            print_json(&queries.search_games(&query, limit).await)?
        }
        Command::SearchDlc {
            parent_appid,
            query,
        } => print_json(&queries.search_dlc(&parent_appid, &query).await)?,
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Status> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
