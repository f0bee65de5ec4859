use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::appid;

/// Document type under 'data/dlc.json' that holds the DLC lists looked up per
/// parent game.
///
/// A key that is present marks its parent as checked, including when its list
/// is empty. Absent parents are looked up again on the next refresh.
#[derive(Serialize, Deserialize, Default, Clone, PartialEq, Debug)]
pub struct DlcCache {
    #[serde(default)]
    pub dlc: BTreeMap<String, Vec<DlcEntry>>,
}

impl DlcCache {
    pub fn is_checked(&self, parent_appid: &str) -> bool {
        self.dlc.contains_key(parent_appid)
    }

    pub fn get(&self, parent_appid: &str) -> &[DlcEntry] {
        self.dlc
            .get(parent_appid)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[derive(Serialize, Clone, PartialEq, Eq, Default, Debug)]
pub struct DlcEntry {
    pub appid: String,
    pub description: String,
}

impl DlcEntry {
    pub fn new(appid: impl Into<String>, description: impl Into<String>) -> Self {
        DlcEntry {
            appid: appid.into(),
            description: description.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDlcEntry {
    Id(#[serde(deserialize_with = "appid::deserialize")] String),
    Entry {
        #[serde(deserialize_with = "appid::deserialize")]
        appid: String,

        #[serde(default)]
        #[serde(alias = "name")]
        description: String,
    },
}

// Older cache files hold the bare upstream id list.
impl<'de> Deserialize<'de> for DlcEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawDlcEntry::deserialize(deserializer)? {
            RawDlcEntry::Id(appid) => DlcEntry::new(appid, ""),
            RawDlcEntry::Entry { appid, description } => DlcEntry { appid, description },
        })
    }
}
