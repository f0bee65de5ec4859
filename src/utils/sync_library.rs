use clap::Parser;
use completion_tracker::*;
use std::{sync::Arc, time::Duration};

/// Tracker util that refreshes the cached Steam library and looks up DLC for
/// games that were not checked yet.
#[derive(Parser)]
struct Opts {
    /// Directory that holds the `config/` and `data/` documents.
    #[clap(long, default_value = ".")]
    data_root: String,

    /// Max number of DLC lookups in this refresh.
    #[clap(long, default_value = "50")]
    dlc_quota: usize,

    /// Min delay between DLC lookups in milliseconds.
    #[clap(long, default_value = "50")]
    pacing_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    Tracing::setup("utils/sync_library")?;

    let opts: Opts = Opts::parse();

    let store = Arc::new(api::DocumentStore::open(&opts.data_root));
    let manager = library::LibraryManager::with_config(
        Arc::clone(&store),
        Arc::new(api::SteamApi::new()?),
        library::SyncConfig {
            dlc_quota: opts.dlc_quota,
            pacing: Duration::from_millis(opts.pacing_ms),
        },
    );

    let user = library::User::fetch(store).await;
    let summary = user.sync_library(&manager).await?;
    println!("{summary}");

    Ok(())
}
