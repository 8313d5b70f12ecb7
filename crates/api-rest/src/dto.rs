//! Request and response bodies for the REST endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use casebook_core::{ClientWithRelatives, SearchEntry};

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// List response: clients wrapped under the `clients` key.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClientsRes {
    pub clients: Vec<ClientWithRelatives>,
}

/// Search response: matched clients and relative-shaped entries, mixed.
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchRes {
    pub clients: Vec<SearchEntry>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Substring/regex fragment matched case-insensitively against fullName.
    pub family_name: Option<String>,
}

/// Body of the add/update relative endpoints.
///
/// Fields are optional at the serde level so that missing fields surface as
/// a 400 from validation rather than a deserialization rejection.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelativeReq {
    pub relative_id: Option<String>,
    pub relationship: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorRes {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
