// src/domain/settings.rs
use serde::{Deserialize, Serialize};

/// Persisted connection settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default)]
    pub airtable_api_key: Option<String>,
    #[serde(default)]
    pub airtable_base_id: Option<String>,
    /// Override for the API root, e.g. a proxy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airtable_endpoint: Option<String>,
}

impl AppSettings {
    /// The stored token, if it is non-blank
    pub fn api_key(&self) -> Option<&str> {
        non_blank(self.airtable_api_key.as_deref())
    }

    pub fn base_id(&self) -> Option<&str> {
        non_blank(self.airtable_base_id.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
