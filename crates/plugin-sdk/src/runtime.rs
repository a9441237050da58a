//! Runtime lifecycle types.
//!
//! Runtime contributions are injected into the application the host tool
//! produces, not into the tool itself: per-request context construction
//! (with the field descriptors type generation needs) and extensions merged
//! into the hosted schema-building library's plugin list. Both facets are
//! independently optional.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A plugin's runtime producer: yields the plugin's contributions on demand.
pub type RuntimeProducer = dyn Fn() -> Result<RuntimeContributions> + Send + Sync;

/// Builds a per-request context value from an opaque host-supplied request.
///
/// The request and the produced context are JSON values at this layer; the
/// schema-building library consuming them is an external collaborator.
pub type ContextCreator = Arc<dyn Fn(&JsonValue) -> Result<JsonValue> + Send + Sync>;

/// What a plugin injects into the running application.
#[derive(Default)]
pub struct RuntimeContributions {
    /// Context facet: type-generation fields plus a context creator.
    pub context: Option<ContextContribution>,
    /// Schema facet: extensions for the schema-building library.
    pub schema: Option<SchemaContribution>,
}

/// Context contributed by a plugin.
pub struct ContextContribution {
    /// Field descriptors emitted into generated context types.
    pub fields: Vec<ContextField>,
    /// Constructs the plugin's context slice for each request.
    pub create: ContextCreator,
}

/// A single field a plugin adds to the generated context type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextField {
    /// Field name as it appears on the context object.
    pub name: String,
    /// Type name emitted by type generation.
    pub type_name: String,
}

impl ContextField {
    /// Create a field descriptor.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Extensions merged into the schema-building library's plugin list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaContribution {
    /// Extensions in the order they should be merged.
    pub extensions: Vec<SchemaExtension>,
}

/// An opaque handle to one schema-library extension.
///
/// The schema-building library interprets the config; this layer only
/// carries it through in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaExtension {
    /// Extension name, as known to the schema library.
    pub name: String,
    /// Extension configuration, passed through untouched.
    #[serde(default)]
    pub config: JsonValue,
}

impl SchemaExtension {
    /// Create an extension handle with no configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: JsonValue::Null,
        }
    }

    /// Attach configuration for the schema library.
    pub fn with_config(mut self, config: JsonValue) -> Self {
        self.config = config;
        self
    }
}

impl fmt::Debug for RuntimeContributions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeContributions")
            .field("context", &self.context)
            .field("schema", &self.schema)
            .finish()
    }
}

impl fmt::Debug for ContextContribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextContribution")
            .field("fields", &self.fields)
            .field("create", &"<fn>")
            .finish()
    }
}
