//! Document shapes stored in and projected out of the two collections.
//!
//! Client documents are deliberately schemaless: whatever JSON object the
//! caller submits is stored verbatim, and the store only ever interprets the
//! full-name field (with its legacy fallback) when projecting relatives or
//! family summaries. Relation records, by contrast, have a fixed shape.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{CoreError, CoreResult};

/// A schemaless client document: arbitrary top-level JSON fields.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Primary full-name key on client documents.
pub const FULL_NAME_KEY: &str = "fullName";

/// Legacy full-name key still present on older documents.
pub const LEGACY_FULL_NAME_KEY: &str = "nombres";

/// Project the display name out of a client document.
///
/// Falls back `fullName` → `nombres` → empty string, mirroring what older
/// records in the store actually contain.
pub fn full_name_of(doc: &Document) -> String {
    for key in [FULL_NAME_KEY, LEGACY_FULL_NAME_KEY] {
        if let Some(name) = doc.get(key).and_then(|v| v.as_str()) {
            return name.to_string();
        }
    }
    String::new()
}

/// Validate that `value` is a syntactically well-formed client identifier.
///
/// Identifiers are v4 UUID strings assigned by the store on creation.
pub fn validate_client_id(value: &str) -> CoreResult<()> {
    uuid::Uuid::parse_str(value)
        .map_err(|_| CoreError::InvalidInput(format!("invalid client id: {value}")))?;
    Ok(())
}

/// A stored client document together with its assigned identifier.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientRecord {
    pub id: String,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub doc: Document,
}

/// A client document decorated with its resolved relatives.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientWithRelatives {
    pub id: String,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub doc: Document,
    pub relatives: Vec<Relative>,
}

/// Projection of one related client: the relative resolver's output shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Relative {
    pub id: String,
    pub full_name: String,
    pub relationship: String,
}

/// One entry in a name-search result.
///
/// Matched clients appear with their full document and relatives; clients
/// pulled in only as somebody's relative appear in the relative projection.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum SearchEntry {
    Client(ClientWithRelatives),
    Relative(Relative),
}

impl SearchEntry {
    pub fn id(&self) -> &str {
        match self {
            SearchEntry::Client(client) => &client.id,
            SearchEntry::Relative(relative) => &relative.id,
        }
    }
}

/// Family summary for one client.
///
/// The `familyMembers` key is distinct from the list endpoints' `relatives`
/// and is kept for compatibility with existing consumers.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientFamily {
    pub id: String,
    pub full_name: String,
    pub family_members: Vec<Relative>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().expect("test doc must be an object").clone()
    }

    #[test]
    fn full_name_prefers_primary_key() {
        let d = doc(json!({"fullName": "Ana Pérez", "nombres": "A. Pérez"}));
        assert_eq!(full_name_of(&d), "Ana Pérez");
    }

    #[test]
    fn full_name_falls_back_to_legacy_key() {
        let d = doc(json!({"nombres": "A. Pérez"}));
        assert_eq!(full_name_of(&d), "A. Pérez");
    }

    #[test]
    fn full_name_defaults_to_empty() {
        let d = doc(json!({"telefono": "555-0100"}));
        assert_eq!(full_name_of(&d), "");
    }

    #[test]
    fn client_id_validation() {
        assert!(validate_client_id(&uuid::Uuid::new_v4().to_string()).is_ok());
        assert!(matches!(
            validate_client_id("not-a-uuid"),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn search_entry_serializes_flat() {
        let entry = SearchEntry::Client(ClientWithRelatives {
            id: "abc".into(),
            doc: doc(json!({"fullName": "Ana"})),
            relatives: vec![],
        });
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["id"], "abc");
        assert_eq!(value["fullName"], "Ana");
        assert!(value["relatives"].as_array().unwrap().is_empty());
    }
}
