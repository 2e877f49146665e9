//! Typed tool arguments and their JSON schemas.
//!
//! The derived schemas are what `tools/list` advertises and what arguments
//! are validated against before they are deserialized into these structs.

use polysearch_core::catalog;
use polysearch_core::config::{MAX_QUERY_LENGTH, MAX_RESULTS_LIMIT};
use polysearch_core::{BackendClass, Target};
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};

/// Default per-engine result count advertised in the schema.
pub const DEFAULT_MAX_RESULTS: u32 = 20;

fn targets(class: BackendClass) -> Vec<&'static str> {
    let mut ids = catalog::ids(class);
    ids.push(Target::ALL);
    ids
}

fn engine_schema(_: &mut SchemaGenerator) -> Schema {
    json_schema!({
        "type": "string",
        "enum": targets(BackendClass::Web),
        "default": Target::ALL,
        "description": "Search engine to use, or 'all' to search across all engines in parallel"
    })
}

fn platform_schema(_: &mut SchemaGenerator) -> Schema {
    json_schema!({
        "type": "string",
        "enum": targets(BackendClass::Social),
        "default": Target::ALL,
        "description": "Social platform to search, or 'all' for all platforms in parallel"
    })
}

fn service_schema(_: &mut SchemaGenerator) -> Schema {
    json_schema!({
        "type": "string",
        "enum": targets(BackendClass::Archive),
        "default": Target::ALL,
        "description": "Archive service to use, or 'all' to check all services"
    })
}

fn max_results_schema(_: &mut SchemaGenerator) -> Schema {
    json_schema!({
        "type": "integer",
        "minimum": 1,
        "maximum": MAX_RESULTS_LIMIT,
        "default": DEFAULT_MAX_RESULTS,
        "description": format!(
            "Maximum results per engine (1-{MAX_RESULTS_LIMIT}). When using 'all', this applies to each engine individually"
        )
    })
}

fn query_schema(_: &mut SchemaGenerator) -> Schema {
    json_schema!({
        "type": "string",
        "minLength": 1,
        "maxLength": MAX_QUERY_LENGTH,
        "description": format!("Search query (max {MAX_QUERY_LENGTH} characters)")
    })
}

fn url_schema(_: &mut SchemaGenerator) -> Schema {
    json_schema!({
        "type": "string",
        "pattern": "^[Hh][Tt][Tt][Pp][Ss]?://",
        "description": "Complete URL to search in archives (must include http:// or https://)"
    })
}

/// Arguments for `web_search`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchParams {
    #[schemars(schema_with = "query_schema")]
    pub query: String,

    #[serde(default)]
    #[schemars(schema_with = "engine_schema")]
    pub engine: Option<String>,

    #[serde(default)]
    #[schemars(schema_with = "max_results_schema")]
    pub max_results: Option<u32>,
}

/// Arguments for `social_search`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SocialSearchParams {
    #[schemars(schema_with = "query_schema")]
    pub query: String,

    #[serde(default)]
    #[schemars(schema_with = "platform_schema")]
    pub platform: Option<String>,
}

/// Arguments for `archives_search`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArchivesSearchParams {
    #[schemars(schema_with = "url_schema")]
    pub url: String,

    #[serde(default)]
    #[schemars(schema_with = "service_schema")]
    pub service: Option<String>,

    /// For the Wayback Machine, query its API to verify that snapshots exist
    #[serde(default)]
    pub check_availability: bool,
}

/// Tools that take no arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct NoParams {}
