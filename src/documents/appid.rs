use serde::{Deserialize, Deserializer};

/// Steam app ids arrive as numbers from the Web API and as strings from older
/// cache files. Both are normalized to their decimal string form.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAppId {
    Number(u64),
    Text(String),
}

impl From<RawAppId> for String {
    fn from(raw: RawAppId) -> Self {
        match raw {
            RawAppId::Number(id) => id.to_string(),
            RawAppId::Text(id) => id.trim().to_owned(),
        }
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawAppId::deserialize(deserializer).map(String::from)
}

pub(crate) fn normalize_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Number(id) => Some(id.to_string()),
        serde_json::Value::String(id) if !id.trim().is_empty() => Some(id.trim().to_owned()),
        _ => None,
    }
}
