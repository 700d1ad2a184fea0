// src/infrastructure/airtable/discovery.rs
use crate::constants::PREFERRED_BASE_NAME;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct BasesResponse {
    #[serde(default)]
    bases: Vec<BaseInfo>,
}

#[derive(Debug, Deserialize)]
struct BaseInfo {
    id: String,
    #[serde(default)]
    name: String,
}

/// Choose a base from a metadata API response body.
///
/// Prefers the base named `Notex` (any case), otherwise the first listed
/// base. Returns `None` for an empty list or a body that is not a bases
/// listing.
pub fn pick_base(body: &str) -> Option<String> {
    let response: BasesResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => {
            debug!(error = %e, "Ignoring unreadable metadata response");
            return None;
        }
    };

    let preferred = response
        .bases
        .iter()
        .find(|base| base.name.eq_ignore_ascii_case(PREFERRED_BASE_NAME));
    preferred
        .or_else(|| response.bases.first())
        .map(|base| base.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_base_named_notex_when_picking_then_prefers_it_case_insensitively() {
        let body = r#"{"bases": [
            {"id": "appFirst", "name": "Inventory"},
            {"id": "appNotes", "name": "NOTEX"}
        ]}"#;

        assert_eq!(pick_base(body).as_deref(), Some("appNotes"));
    }

    #[test]
    fn given_no_matching_name_when_picking_then_falls_back_to_first_base() {
        let body = r#"{"bases": [
            {"id": "appFirst", "name": "Inventory"},
            {"id": "appSecond", "name": "CRM"}
        ]}"#;

        assert_eq!(pick_base(body).as_deref(), Some("appFirst"));
    }

    #[test]
    fn given_empty_base_list_when_picking_then_returns_none() {
        assert_eq!(pick_base(r#"{"bases": []}"#), None);
        assert_eq!(pick_base("{}"), None);
    }

    #[test]
    fn given_malformed_json_when_picking_then_returns_none() {
        assert_eq!(pick_base("not json"), None);
    }
}
