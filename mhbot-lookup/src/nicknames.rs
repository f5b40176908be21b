use std::{collections::HashMap, path::Path};

use serde::Deserialize;

use crate::{Domain, LookupError};

/// Nickname tables keyed by domain, loaded from a JSON file shaped like
/// `{ "mice": { "bw": "Black Widow" }, "loot": { ... } }`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Nicknames {
    #[serde(default)]
    mice: HashMap<String, String>,
    #[serde(default)]
    loot: HashMap<String, String>,
}

impl Nicknames {
    pub fn from_json(raw: &str) -> Result<Self, LookupError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LookupError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LookupError::NicknamesIo {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_json(&raw)
    }

    pub fn for_domain(&self, domain: Domain) -> &HashMap<String, String> {
        match domain {
            Domain::Mouse => &self.mice,
            Domain::Item => &self.loot,
        }
    }
}
