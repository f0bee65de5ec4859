use crate::{
    api::DocumentStore,
    documents::{Credentials, DlcCache, LibraryCache},
    logging::SyncEvent,
    traits::Catalog,
    util::rate_limiter::RateLimiter,
    Status,
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc, time::Duration};
use tracing::{debug, info, instrument, warn};

use super::store;

/// Tunables of a library refresh.
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Max number of app-details lookups per refresh. The store endpoint is
    /// rate-limited separately from the Web API.
    pub dlc_quota: usize,

    /// Min spacing between consecutive app-details lookups.
    pub pacing: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            dlc_quota: 50,
            pacing: Duration::from_millis(50),
        }
    }
}

#[derive(Serialize, Deserialize, Default, Clone, PartialEq, Debug)]
pub struct RefreshSummary {
    /// Games delivered by the owned-games call.
    pub game_count: usize,

    /// Game count reported upstream.
    pub total_count: u64,

    /// Games whose DLC list was recorded during this refresh.
    pub dlc_checked: usize,

    /// App-details lookups issued during this refresh.
    pub dlc_attempted: usize,

    pub dlc_cache_saved: bool,
}

impl fmt::Display for RefreshSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Library refreshed successfully ({} games). Checked {} new games for DLC.",
            self.total_count, self.dlc_checked
        )
    }
}

pub struct LibraryManager {
    store: Arc<DocumentStore>,
    catalog: Arc<dyn Catalog>,
    config: SyncConfig,
    qps: RateLimiter,
}

impl LibraryManager {
    /// Creates a LibraryManager that syncs `store` with `catalog`.
    pub fn new(store: Arc<DocumentStore>, catalog: Arc<dyn Catalog>) -> Self {
        Self::with_config(store, catalog, SyncConfig::default())
    }

    pub fn with_config(
        store: Arc<DocumentStore>,
        catalog: Arc<dyn Catalog>,
        config: SyncConfig,
    ) -> Self {
        LibraryManager {
            store,
            catalog,
            qps: RateLimiter::new(config.pacing),
            config,
        }
    }

    /// Re-synchronizes the cached library with the catalog and looks up DLC
    /// for games that were never checked.
    ///
    /// The library document is replaced before DLC lookups start, so DLC
    /// failures never discard a successful games refresh. Failed lookups are
    /// left unchecked and retried on the next refresh.
    #[instrument(
        name = "refresh_library",
        level = "info",
        skip(self, credentials),
        fields(steam_id = %credentials.account_id),
    )]
    pub async fn refresh_library(&self, credentials: &Credentials) -> Result<RefreshSummary, Status> {
        let mut event = SyncEvent::new(&credentials.account_id);
        match self.refresh(credentials, &mut event).await {
            Ok(summary) => {
                event.log();
                info!("{summary}");
                Ok(summary)
            }
            Err(status) => {
                event.log_error(status.to_string());
                Err(status)
            }
        }
    }

    async fn refresh(
        &self,
        credentials: &Credentials,
        event: &mut SyncEvent,
    ) -> Result<RefreshSummary, Status> {
        if !credentials.is_complete() {
            return Err(Status::failed_precondition(
                "API Key or Steam ID is missing from configuration.",
            ));
        }

        let owned = self.catalog.get_owned_games(credentials).await?;
        let library = LibraryCache::new(owned.games, owned.total_count);
        if let Err(status) = store::library::write(&self.store, &library).await {
            return Err(Status::internal(format!(
                "Successfully fetched data but failed to save the main library cache file. {status}"
            )));
        }

        let mut dlc = store::dlc::read(&self.store).await;
        let pending = games_to_check(&library, &dlc);
        event.games(library.games.len(), pending.len());

        let (dlc_attempted, dlc_checked) = self.check_dlc(&pending, &mut dlc).await;

        let dlc_cache_saved = match store::dlc::write(&self.store, &dlc).await {
            Ok(()) => true,
            Err(status) => {
                warn!("Failed to save the updated DLC cache file: {status}");
                false
            }
        };
        event.dlc(dlc_attempted, dlc_checked, dlc_cache_saved);

        Ok(RefreshSummary {
            game_count: library.games.len(),
            total_count: library.game_count,
            dlc_checked,
            dlc_attempted,
            dlc_cache_saved,
        })
    }

    /// Looks up DLC for up to `dlc_quota` of `appids`, in order. Returns the
    /// number of lookups attempted and the number recorded in `dlc`.
    async fn check_dlc(&self, appids: &[String], dlc: &mut DlcCache) -> (usize, usize) {
        let mut attempted = 0;
        let mut checked = 0;

        for appid in appids.iter().take(self.config.dlc_quota) {
            self.qps.wait().await;
            attempted += 1;

            match self.catalog.get_app_details(appid).await {
                Ok(Some(details)) => {
                    dlc.dlc.insert(appid.clone(), details.dlc);
                    checked += 1;
                }
                Ok(None) => debug!("No store details for {appid}, retrying on next refresh"),
                Err(e) => warn!("Failed to fetch app details for {appid}: {e}"),
            }
        }

        (attempted, checked)
    }
}

/// Returns the app ids of `library` games that have no entry in `dlc`, in
/// library order.
pub fn games_to_check(library: &LibraryCache, dlc: &DlcCache) -> Vec<String> {
    library
        .games
        .iter()
        .filter(|game| !dlc.is_checked(&game.appid))
        .map(|game| game.appid.clone())
        .unique()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::{CatalogError, DocKind},
        documents::{DlcEntry, OwnedGame},
        traits::{AppDetails, OwnedGames},
    };
    use async_trait::async_trait;
    use std::{
        collections::HashMap,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
    };
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeCatalog {
        games: Vec<OwnedGame>,
        owned_error: Option<CatalogError>,
        details: HashMap<String, Result<Option<AppDetails>, CatalogError>>,
        owned_calls: AtomicUsize,
        details_calls: Mutex<Vec<String>>,
    }

    impl FakeCatalog {
        fn with_games(n: usize) -> Self {
            FakeCatalog {
                games: (0..n).map(|i| game(&format!("{}", 1000 + i))).collect(),
                ..Default::default()
            }
        }

        fn details_calls(&self) -> Vec<String> {
            self.details_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Catalog for FakeCatalog {
        async fn get_owned_games(&self, _: &Credentials) -> Result<OwnedGames, CatalogError> {
            self.owned_calls.fetch_add(1, Ordering::SeqCst);
            match &self.owned_error {
                Some(e) => Err(e.clone()),
                None => Ok(OwnedGames {
                    games: self.games.clone(),
                    total_count: self.games.len() as u64,
                }),
            }
        }

        async fn get_app_details(&self, appid: &str) -> Result<Option<AppDetails>, CatalogError> {
            self.details_calls.lock().unwrap().push(appid.to_owned());
            match self.details.get(appid) {
                Some(result) => result.clone(),
                None => Ok(Some(AppDetails::default())),
            }
        }
    }

    fn game(appid: &str) -> OwnedGame {
        OwnedGame {
            appid: appid.to_owned(),
            name: Some(format!("Game {appid}")),
            playtime_forever: 1,
        }
    }

    fn credentials() -> Credentials {
        Credentials::new("key", "76561197960287930")
    }

    fn manager(dir: &TempDir, catalog: Arc<FakeCatalog>) -> (Arc<DocumentStore>, LibraryManager) {
        let store = Arc::new(DocumentStore::open(dir.path()));
        let manager = LibraryManager::with_config(
            Arc::clone(&store),
            catalog,
            SyncConfig {
                dlc_quota: 50,
                pacing: Duration::ZERO,
            },
        );
        (store, manager)
    }

    #[tokio::test]
    async fn missing_credentials_skip_network() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(FakeCatalog::with_games(3));
        let (_, manager) = manager(&dir, Arc::clone(&catalog));

        let result = manager
            .refresh_library(&Credentials::new("", "x"))
            .await;

        assert!(matches!(result, Err(Status::FailedPrecondition(_))));
        assert_eq!(catalog.owned_calls.load(Ordering::SeqCst), 0);
        assert!(catalog.details_calls().is_empty());
    }

    #[tokio::test]
    async fn owned_games_failure_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(FakeCatalog {
            owned_error: Some(CatalogError::AccessDenied),
            ..FakeCatalog::with_games(3)
        });
        let (store, manager) = manager(&dir, Arc::clone(&catalog));

        let result = manager.refresh_library(&credentials()).await;

        assert_eq!(result, Err(Status::Catalog(CatalogError::AccessDenied)));
        assert!(!store.path(DocKind::Library).exists());
        assert!(!store.path(DocKind::Dlc).exists());
        assert!(catalog.details_calls().is_empty());
    }

    #[tokio::test]
    async fn refresh_records_library_and_dlc() {
        let dir = TempDir::new().unwrap();
        let mut catalog = FakeCatalog::with_games(2);
        catalog.details.insert(
            "1000".to_owned(),
            Ok(Some(AppDetails {
                dlc: vec![DlcEntry::new("5000", "Soundtrack")],
            })),
        );
        let catalog = Arc::new(catalog);
        let (store, manager) = manager(&dir, Arc::clone(&catalog));

        let summary = manager.refresh_library(&credentials()).await.unwrap();

        assert_eq!(summary.game_count, 2);
        assert_eq!(summary.dlc_checked, 2);
        assert!(summary.dlc_cache_saved);
        assert_eq!(
            summary.to_string(),
            "Library refreshed successfully (2 games). Checked 2 new games for DLC."
        );

        let library = store::library::read(&store).await;
        assert_eq!(library.games, catalog.games);
        assert_eq!(library.game_count, 2);
        assert!(library.last_updated > 0);

        let dlc = store::dlc::read(&store).await;
        assert_eq!(dlc.get("1000"), &[DlcEntry::new("5000", "Soundtrack")]);
        assert!(dlc.is_checked("1001"));
        assert!(dlc.get("1001").is_empty());
    }

    #[tokio::test]
    async fn quota_bounds_lookups() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(FakeCatalog::with_games(120));
        let (store, manager) = manager(&dir, Arc::clone(&catalog));

        let summary = manager.refresh_library(&credentials()).await.unwrap();

        assert_eq!(summary.dlc_attempted, 50);
        assert_eq!(catalog.details_calls().len(), 50);
        let dlc = store::dlc::read(&store).await;
        assert_eq!(dlc.dlc.len(), 50);
        assert_eq!(
            catalog.games.iter().filter(|g| !dlc.is_checked(&g.appid)).count(),
            70
        );

        // The next refresh picks up where this one stopped.
        manager.refresh_library(&credentials()).await.unwrap();
        let calls = catalog.details_calls();
        assert_eq!(calls.len(), 100);
        assert_eq!(calls.iter().unique().count(), 100);
    }

    #[tokio::test]
    async fn checked_games_are_not_looked_up_again() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(FakeCatalog::with_games(3));
        let (store, manager) = manager(&dir, Arc::clone(&catalog));

        manager.refresh_library(&credentials()).await.unwrap();
        let library = store::library::read(&store).await;
        let dlc = store::dlc::read(&store).await;

        let summary = manager.refresh_library(&credentials()).await.unwrap();

        assert_eq!(summary.dlc_attempted, 0);
        assert_eq!(catalog.details_calls().len(), 3);
        assert_eq!(store::library::read(&store).await.games, library.games);
        assert_eq!(store::dlc::read(&store).await, dlc);
    }

    #[tokio::test]
    async fn failed_lookups_stay_unchecked() {
        let dir = TempDir::new().unwrap();
        let mut catalog = FakeCatalog::with_games(3);
        catalog
            .details
            .insert("1000".to_owned(), Err(CatalogError::Http(429)));
        catalog.details.insert("1001".to_owned(), Ok(None));
        let catalog = Arc::new(catalog);
        let (store, manager) = manager(&dir, Arc::clone(&catalog));

        let summary = manager.refresh_library(&credentials()).await.unwrap();

        assert_eq!(summary.dlc_attempted, 3);
        assert_eq!(summary.dlc_checked, 1);
        let dlc = store::dlc::read(&store).await;
        assert!(!dlc.is_checked("1000"));
        assert!(!dlc.is_checked("1001"));
        assert!(dlc.is_checked("1002"));

        manager.refresh_library(&credentials()).await.unwrap();
        assert_eq!(
            catalog.details_calls()[3..],
            ["1000".to_owned(), "1001".to_owned()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn lookups_are_paced_whatever_their_outcome() {
        let dir = TempDir::new().unwrap();
        let mut catalog = FakeCatalog::with_games(3);
        catalog
            .details
            .insert("1001".to_owned(), Err(CatalogError::Network("reset".to_owned())));
        catalog.details.insert("1002".to_owned(), Ok(None));
        let catalog = Arc::new(catalog);
        let store = Arc::new(DocumentStore::open(dir.path()));
        let manager = LibraryManager::with_config(
            Arc::clone(&store),
            Arc::clone(&catalog) as Arc<dyn Catalog>,
            SyncConfig {
                dlc_quota: 50,
                pacing: Duration::from_millis(50),
            },
        );

        let start = tokio::time::Instant::now();
        let summary = manager.refresh_library(&credentials()).await.unwrap();

        assert_eq!(summary.dlc_attempted, 3);
        assert_eq!(summary.dlc_checked, 1);
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn dlc_save_failure_keeps_refresh_successful() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(FakeCatalog::with_games(2));
        let (store, manager) = manager(&dir, Arc::clone(&catalog));
        std::fs::create_dir_all(store.path(DocKind::Dlc)).unwrap();

        let summary = manager.refresh_library(&credentials()).await.unwrap();

        assert!(!summary.dlc_cache_saved);
        assert_eq!(store::library::read(&store).await.games, catalog.games);
    }

    #[tokio::test]
    async fn library_save_failure_fails_refresh() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(FakeCatalog::with_games(2));
        let (store, manager) = manager(&dir, Arc::clone(&catalog));
        std::fs::create_dir_all(store.path(DocKind::Library)).unwrap();

        let result = manager.refresh_library(&credentials()).await;

        assert!(matches!(result, Err(Status::Internal(_))));
        assert!(catalog.details_calls().is_empty());
    }

    #[test]
    fn games_to_check_skips_checked_keys() {
        let library = LibraryCache {
            games: vec![game("1"), game("2"), game("3"), game("2")],
            ..Default::default()
        };
        let mut dlc = DlcCache::default();
        dlc.dlc.insert("1".to_owned(), vec![]);

        assert_eq!(games_to_check(&library, &dlc), vec!["2", "3"]);
    }
}
