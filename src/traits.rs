use crate::{
    api::CatalogError,
    documents::{Credentials, DlcEntry, OwnedGame},
};
use async_trait::async_trait;

/// Read-only view of the upstream game catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Returns the games owned by the account, sorted by name with unnamed
    /// entries last.
    async fn get_owned_games(&self, credentials: &Credentials) -> Result<OwnedGames, CatalogError>;

    /// Returns the store details of `appid`, or `None` when the store does not
    /// report success for it.
    async fn get_app_details(&self, appid: &str) -> Result<Option<AppDetails>, CatalogError>;
}

#[derive(Clone, Default, PartialEq, Debug)]
pub struct OwnedGames {
    pub games: Vec<OwnedGame>,

    /// Count reported upstream, which may disagree with `games.len()`.
    pub total_count: u64,
}

#[derive(Clone, Default, PartialEq, Debug)]
pub struct AppDetails {
    pub dlc: Vec<DlcEntry>,
}
