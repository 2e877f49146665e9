//! MCP tool implementations.
//!
//! Tools are a closed set: [`ToolKind`] enumerates them, and [`ToolTable`]
//! is built once at startup with each tool's input schema and a compiled
//! validator for it. A name that is not in the table can only ever produce
//! an unknown-tool error.

pub mod archives_search;
pub mod clear_cache;
pub mod format;
pub mod listing;
pub mod params;
pub mod search;
pub mod social_search;
pub mod web_search;

use std::sync::Arc;

use polysearch_core::catalog;
use polysearch_core::{BackendClass, Error};
use rmcp::model::{CallToolResult, JsonObject, Tool};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use params::{ArchivesSearchParams, NoParams, SocialSearchParams, WebSearchParams};

use crate::error::DispatchError;
use crate::state::AppState;

/// Every tool the server exposes, in listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    WebSearch,
    SocialSearch,
    ArchivesSearch,
    ListEngines,
    ListArchivesServices,
    ClearCache,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        Self::WebSearch,
        Self::SocialSearch,
        Self::ArchivesSearch,
        Self::ListEngines,
        Self::ListArchivesServices,
        Self::ClearCache,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::WebSearch => "web_search",
            Self::SocialSearch => "social_search",
            Self::ArchivesSearch => "archives_search",
            Self::ListEngines => "list_engines",
            Self::ListArchivesServices => "list_archives_services",
            Self::ClearCache => "clear_cache",
        }
    }

    pub fn description(self) -> String {
        match self {
            Self::WebSearch => format!(
                "Search the web using {} privacy-focused search engines in parallel. By default searches ALL \
                 engines simultaneously and returns up to 20 results from each. Returns titles, snippets, and URLs.",
                catalog::WEB_ENGINES.len()
            ),
            Self::SocialSearch => format!(
                "Search across popular social media platforms ({}) in parallel. Public content only.",
                labels(BackendClass::Social)
            ),
            Self::ArchivesSearch => format!(
                "Search for archived versions of a URL across {} web archives ({}). Useful for accessing \
                 removed content or viewing historical versions.",
                catalog::ARCHIVE_SERVICES.len(),
                labels(BackendClass::Archive)
            ),
            Self::ListEngines => "List all available search engines with their details.".into(),
            Self::ListArchivesServices => "List all available archive services with their details.".into(),
            Self::ClearCache => "Clear the search results cache.".into(),
        }
    }

    fn schema(self) -> Result<JsonObject, Error> {
        match self {
            Self::WebSearch => schema_object::<WebSearchParams>(),
            Self::SocialSearch => schema_object::<SocialSearchParams>(),
            Self::ArchivesSearch => schema_object::<ArchivesSearchParams>(),
            Self::ListEngines | Self::ListArchivesServices | Self::ClearCache => schema_object::<NoParams>(),
        }
    }

    /// Deserialize validated arguments and run the tool.
    pub async fn call(self, state: &AppState, arguments: JsonObject) -> Result<CallToolResult, DispatchError> {
        match self {
            Self::WebSearch => web_search::search_impl(state, &parse(arguments)?).await,
            Self::SocialSearch => social_search::search_impl(state, &parse(arguments)?).await,
            Self::ArchivesSearch => archives_search::search_impl(state, &parse(arguments)?).await,
            Self::ListEngines => Ok(listing::engines_impl(state)),
            Self::ListArchivesServices => Ok(listing::archives_impl(state)),
            Self::ClearCache => clear_cache::clear_impl(state),
        }
    }
}

fn labels(class: BackendClass) -> String {
    catalog::descriptors(class).iter().map(|d| d.label).collect::<Vec<_>>().join(", ")
}

fn schema_object<T: JsonSchema>() -> Result<JsonObject, Error> {
    let value = serde_json::to_value(schemars::schema_for!(T)).map_err(|e| Error::Internal(e.to_string()))?;
    match value {
        Value::Object(mut object) => {
            object.remove("$schema");
            object.remove("title");
            Ok(object)
        }
        other => Err(Error::Internal(format!("tool schema is not an object: {other}"))),
    }
}

fn parse<P: DeserializeOwned>(arguments: JsonObject) -> Result<P, DispatchError> {
    serde_json::from_value(Value::Object(arguments)).map_err(|e| DispatchError::InvalidArguments(e.to_string()))
}

/// One registered tool: its identity, advertised schema and compiled validator.
pub struct ToolSpec {
    pub kind: ToolKind,
    description: String,
    schema: Arc<JsonObject>,
    validator: jsonschema::Validator,
}

impl ToolSpec {
    fn build(kind: ToolKind) -> Result<Self, Error> {
        let schema = kind.schema()?;
        let validator = jsonschema::validator_for(&Value::Object(schema.clone()))
            .map_err(|e| Error::Internal(format!("invalid schema for tool '{}': {e}", kind.name())))?;
        Ok(Self { kind, description: kind.description(), schema: Arc::new(schema), validator })
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Check `arguments` against the declared schema, reporting every violation.
    pub fn validate(&self, arguments: &JsonObject) -> Result<(), DispatchError> {
        let instance = Value::Object(arguments.clone());
        let errors: Vec<String> = self
            .validator
            .iter_errors(&instance)
            .map(|e| {
                let path = e.instance_path().to_string();
                if path.is_empty() { e.to_string() } else { format!("{path}: {e}") }
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DispatchError::InvalidArguments(format!("{}: {}", self.name(), errors.join("; "))))
        }
    }

    pub fn to_tool(&self) -> Tool {
        Tool::new(self.name(), self.description.clone(), Arc::clone(&self.schema))
    }
}

/// The static tool table, validated at construction.
pub struct ToolTable {
    specs: Vec<ToolSpec>,
}

impl ToolTable {
    /// Compile every tool's schema. Fails if any schema is malformed.
    pub fn build() -> Result<Self, Error> {
        let specs = ToolKind::ALL.into_iter().map(ToolSpec::build).collect::<Result<Vec<_>, _>>()?;
        Ok(Self { specs })
    }

    pub fn lookup(&self, name: &str) -> Option<&ToolSpec> {
        self.specs.iter().find(|spec| spec.name() == name)
    }

    pub fn list(&self) -> Vec<Tool> {
        self.specs.iter().map(ToolSpec::to_tool).collect()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl std::fmt::Debug for ToolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.specs.iter().map(ToolSpec::name).collect();
        f.debug_struct("ToolTable").field("tools", &names).finish()
    }
}
