use clap::Parser;
use completion_tracker::*;
use std::sync::Arc;

/// Tracker util that stores Steam credentials and verifies them with a first
/// library refresh.
#[derive(Parser)]
struct Opts {
    /// Steam Web API key.
    #[clap(long)]
    api_key: String,

    /// 64-bit Steam id of the account to track.
    #[clap(long)]
    steam_id: String,

    /// Directory that holds the `config/` and `data/` documents.
    #[clap(long, default_value = ".")]
    data_root: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    Tracing::setup("utils/setup_credentials")?;

    let opts: Opts = Opts::parse();

    let store = Arc::new(api::DocumentStore::open(&opts.data_root));
    library::store::init(&store).await?;

    let manager =
        library::LibraryManager::new(Arc::clone(&store), Arc::new(api::SteamApi::new()?));

    let mut user = library::User::fetch(store).await;
    let outcome = user.setup(&manager, &opts.api_key, &opts.steam_id).await?;
    println!("{outcome}");

    Ok(())
}
