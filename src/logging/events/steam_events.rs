use serde::{Deserialize, Serialize};
use valuable::Valuable;

use crate::{log_event, logging::LogEvent};

#[derive(Serialize, Deserialize, Valuable, Default, Clone, Debug)]
pub struct SteamEvent {
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get_owned_games: Option<GetOwnedGames>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get_app_details: Option<GetAppDetails>,
}

#[derive(Serialize, Deserialize, Valuable, Default, Clone, Debug)]
pub struct GetOwnedGames {
    steam_id: String,
    game_count: usize,
    error: Option<String>,
}

#[derive(Serialize, Deserialize, Valuable, Default, Clone, Debug)]
pub struct GetAppDetails {
    appid: String,
    dlc_count: Option<usize>,
    error: Option<String>,
}

impl SteamEvent {
    pub fn get_owned_games(steam_id: &str, game_count: usize, error: Option<String>) {
        log_event!(LogEvent::Steam(SteamEvent {
            get_owned_games: Some(GetOwnedGames {
                steam_id: steam_id.to_owned(),
                game_count,
                error,
            }),
            ..Default::default()
        }));
    }

    pub fn get_app_details(appid: &str, dlc_count: Option<usize>, error: Option<String>) {
        log_event!(LogEvent::Steam(SteamEvent {
            get_app_details: Some(GetAppDetails {
                appid: appid.to_owned(),
                dlc_count,
                error,
            }),
            ..Default::default()
        }));
    }
}
