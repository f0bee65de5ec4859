use crate::{
    api::CatalogError,
    documents::{appid, sort_by_name, Credentials, DlcEntry, OwnedGame},
    logging::SteamEvent,
    traits::{AppDetails, Catalog, OwnedGames},
    Status,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::{collections::HashMap, time::Duration};
use tracing::{info, instrument};

pub struct SteamApi {
    client: reqwest::Client,
    api_host: String,
    store_host: String,
    country_code: String,
}

impl SteamApi {
    pub fn new() -> Result<Self, Status> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Status::new("Failed to build HTTP client", e))?;

        Ok(SteamApi {
            client,
            api_host: String::from(STEAM_HOST),
            store_host: String::from(STEAM_STORE_HOST),
            country_code: String::from(COUNTRY_CODE),
        })
    }

    /// Points the client at different Web API and store hosts.
    pub fn with_hosts(mut self, api_host: &str, store_host: &str) -> Self {
        self.api_host = api_host.trim_end_matches('/').to_owned();
        self.store_host = store_host.trim_end_matches('/').to_owned();
        self
    }

    pub fn with_country_code(mut self, country_code: &str) -> Self {
        self.country_code = country_code.to_owned();
        self
    }

    async fn get(&self, uri: &str, query: &[(&str, &str)]) -> Result<String, CatalogError> {
        let resp = self.client.get(uri).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::from_status(status.as_u16()));
        }
        Ok(resp.text().await?)
    }

    async fn fetch_owned_games(
        &self,
        credentials: &Credentials,
    ) -> Result<OwnedGames, CatalogError> {
        let uri = format!("{}{STEAM_GETOWNEDGAMES_SERVICE}", self.api_host);
        let text = self
            .get(
                &uri,
                &[
                    ("key", credentials.api_key.as_str()),
                    ("steamid", credentials.account_id.as_str()),
                    ("include_appinfo", "1"),
                    ("include_played_free_games", "1"),
                    ("format", "json"),
                ],
            )
            .await?;

        // Private profiles come back as `{"response": {}}`.
        let resp = serde_json::from_str::<SteamResponse>(&text).map_err(|e| {
            CatalogError::InvalidResponse(format!("{e}. Check ID or profile privacy."))
        })?;

        let mut games = resp
            .response
            .games
            .into_iter()
            .map(|entry| OwnedGame {
                appid: entry.appid,
                name: entry.name,
                playtime_forever: entry.playtime_forever,
            })
            .collect::<Vec<_>>();
        sort_by_name(&mut games);

        Ok(OwnedGames {
            total_count: resp.response.game_count.unwrap_or(games.len() as u64),
            games,
        })
    }

    async fn fetch_app_details(&self, appid: &str) -> Result<Option<AppDetails>, CatalogError> {
        let uri = format!("{}{STEAM_APPDETAILS_SERVICE}", self.store_host);
        let text = self
            .get(
                &uri,
                &[
                    ("appids", appid),
                    ("cc", self.country_code.as_str()),
                    ("filters", "dlc"),
                ],
            )
            .await?;

        let resp = serde_json::from_str::<Option<HashMap<String, SteamAppDetailsResponse>>>(&text)
            .map_err(|e| CatalogError::InvalidResponse(format!("({appid}) Parse error: {e}")))?;

        Ok(resp
            .and_then(|mut resp| resp.remove(appid))
            .filter(|details| details.success)
            .map(|details| AppDetails {
                dlc: parse_dlc(&details.data),
            }))
    }
}

#[async_trait]
impl Catalog for SteamApi {
    #[instrument(level = "trace", skip(self, credentials), fields(steam_id = %credentials.account_id))]
    async fn get_owned_games(&self, credentials: &Credentials) -> Result<OwnedGames, CatalogError> {
        match self.fetch_owned_games(credentials).await {
            Ok(owned) => {
                info!("steam games: {}", owned.total_count);
                SteamEvent::get_owned_games(&credentials.account_id, owned.games.len(), None);
                Ok(owned)
            }
            Err(e) => {
                SteamEvent::get_owned_games(&credentials.account_id, 0, Some(e.to_string()));
                Err(e)
            }
        }
    }

    #[instrument(level = "trace", skip(self))]
    async fn get_app_details(&self, appid: &str) -> Result<Option<AppDetails>, CatalogError> {
        let result = self.fetch_app_details(appid).await;
        match &result {
            Ok(details) => SteamEvent::get_app_details(
                appid,
                details.as_ref().map(|d| d.dlc.len()),
                None,
            ),
            Err(e) => SteamEvent::get_app_details(appid, None, Some(e.to_string())),
        }
        result
    }
}

/// Extracts the DLC list from an appdetails `data` payload. The store sends
/// bare app ids, and an empty array instead of an object when the filtered
/// payload has no fields.
fn parse_dlc(data: &serde_json::Value) -> Vec<DlcEntry> {
    let Some(dlc) = data.get("dlc").and_then(|dlc| dlc.as_array()) else {
        return vec![];
    };

    dlc.iter()
        .filter_map(|item| match item {
            serde_json::Value::Object(fields) => {
                let appid = fields.get("appid").and_then(appid::normalize_value)?;
                let description = fields
                    .get("description")
                    .or_else(|| fields.get("name"))
                    .and_then(|d| d.as_str())
                    .unwrap_or_default();
                Some(DlcEntry::new(appid, description))
            }
            item => appid::normalize_value(item).map(|appid| DlcEntry::new(appid, "")),
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct SteamResponse {
    response: GetOwnedGamesResponse,
}

#[derive(Debug, Deserialize)]
struct GetOwnedGamesResponse {
    #[serde(default)]
    game_count: Option<u64>,
    games: Vec<GameEntry>,
}

#[derive(Debug, Deserialize)]
struct GameEntry {
    #[serde(deserialize_with = "appid::deserialize")]
    appid: String,

    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    playtime_forever: u64,
}

#[derive(Debug, Deserialize)]
struct SteamAppDetailsResponse {
    #[serde(default)]
    success: bool,

    #[serde(default)]
    data: serde_json::Value,
}

const STEAM_HOST: &str = "https://api.steampowered.com";
const STEAM_GETOWNEDGAMES_SERVICE: &str = "/IPlayerService/GetOwnedGames/v1/";
const STEAM_STORE_HOST: &str = "https://store.steampowered.com";
const STEAM_APPDETAILS_SERVICE: &str = "/api/appdetails";
const COUNTRY_CODE: &str = "us";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
