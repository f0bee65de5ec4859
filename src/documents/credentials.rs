use serde::{Deserialize, Deserializer, Serialize};

/// Document type under 'config/config.json' that holds the Steam Web API key
/// and the 64-bit Steam id whose library is mirrored.
#[derive(Serialize, Deserialize, Default, Clone, PartialEq, Debug)]
pub struct Credentials {
    #[serde(rename = "steam_api_key")]
    #[serde(default, deserialize_with = "trimmed")]
    pub api_key: String,

    #[serde(rename = "steam_id")]
    #[serde(default, deserialize_with = "trimmed")]
    pub account_id: String,
}

// The config file may be edited by hand.
fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().unwrap_or_default().trim().to_owned())
}

impl Credentials {
    pub fn new(api_key: &str, account_id: &str) -> Self {
        Credentials {
            api_key: api_key.trim().to_owned(),
            account_id: account_id.trim().to_owned(),
        }
    }

    /// Both fields must be non-empty before any sync can run.
    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.account_id.is_empty()
    }
}

// The API key never ends up in logs.
impl std::fmt::Display for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "steam_id={}", self.account_id)
    }
}
