use crate::{api::DocumentStore, documents::Credentials, Status};
use std::{fmt, sync::Arc};
use tracing::{info, instrument, warn};

use super::{store, LibraryManager, RefreshSummary};

pub struct User {
    credentials: Credentials,
    store: Arc<DocumentStore>,
}

/// Result of saving new credentials. The credentials stay saved even when the
/// verifying refresh fails.
#[derive(Debug)]
pub struct SetupOutcome {
    pub verification: Result<RefreshSummary, Status>,
}

impl fmt::Display for SetupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.verification {
            Ok(summary) => write!(f, "Credentials verified and saved! {summary}"),
            Err(status) => write!(f, "Credentials saved, but verification failed: {status}"),
        }
    }
}

impl User {
    /// Returns the User whose credentials are kept in `store`.
    #[instrument(level = "trace", skip(store))]
    pub async fn fetch(store: Arc<DocumentStore>) -> Self {
        User {
            credentials: store::credentials::read(&store).await,
            store,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn is_setup(&self) -> bool {
        self.credentials.is_complete()
    }

    /// Saves new Steam credentials and verifies them with a library refresh.
    #[instrument(level = "trace", skip(self, manager, api_key))]
    pub async fn setup(
        &mut self,
        manager: &LibraryManager,
        api_key: &str,
        steam_id: &str,
    ) -> Result<SetupOutcome, Status> {
        let credentials = Credentials::new(api_key, steam_id);
        if !credentials.is_complete() {
            return Err(Status::invalid_argument(
                "Both Steam API Key and Steam ID are required.",
            ));
        }

        store::credentials::write(&self.store, &credentials).await?;
        info!("Saved credentials for {credentials}");
        self.credentials = credentials;

        let verification = manager.refresh_library(&self.credentials).await;
        if let Err(status) = &verification {
            warn!("Credentials saved, but verification failed: {status}");
        }
        Ok(SetupOutcome { verification })
    }

    /// Clears the stored Steam credentials.
    #[instrument(level = "trace", skip(self))]
    pub async fn remove_credentials(&mut self) -> Result<(), Status> {
        self.credentials = Credentials::default();
        store::credentials::write(&self.store, &self.credentials).await
    }

    /// Refreshes the library with the stored credentials.
    #[instrument(level = "trace", skip(self, manager))]
    pub async fn sync_library(&self, manager: &LibraryManager) -> Result<RefreshSummary, Status> {
        if !self.is_setup() {
            return Err(Status::failed_precondition(
                "Setup required (missing Steam API Key or ID).",
            ));
        }
        manager.refresh_library(&self.credentials).await
    }
}
