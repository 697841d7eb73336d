//! Core dial-plan type definitions
//!
//! Project → Context → {Node, Connection}. These types mirror the backend's JSON
//! (camelCase keys) and are what the editor caches and mutates.

use crate::error::SchemaError;
use crate::schema::{
    check_config, check_properties, derive_defaults, derive_property_defaults, ConfigIssue,
    ParamDefinition, PropertyMap,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Free-form property bag of a node
pub type Properties = Map<String, Value>;

/// Backend identifier
///
/// The backend hands out integer ids but some deployments use string keys. The
/// form that was received is kept and sent back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Int(i64),
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Int(n) => write!(f, "{}", n),
            Id::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Int(n)
    }
}

/// Canonical integers become `Int`; anything else (`"007"`, `"+5"`, `"ivr-1"`)
/// stays text so the id is sent back exactly as it was read.
impl From<&str> for Id {
    fn from(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => Id::Int(n),
            _ => Id::Text(s.to_string()),
        }
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::from(s.as_str())
    }
}

/// Canvas coordinates of a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Broad kind of a node type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    /// Dialplan entry point (`exten => ...`)
    Extension,
    /// Asterisk application (Dial, Playback, Voicemail, ...)
    Application,
    /// Flow control (GotoIf, Gosub, Background + WaitExten, ...)
    Flowcontrol,
    /// Side effects (Set, AGI, System, ...)
    Action,
    /// Ends the call path (Hangup, Congestion, ...)
    Terminal,
}

/// How a node type describes its configurable properties
///
/// The backend sends either a flat `paramDefs` list or a `properties` map, never
/// both.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeTypeSchema {
    Params(Vec<ParamDefinition>),
    Properties(PropertyMap),
}

impl NodeTypeSchema {
    /// Fresh properties object for a node of this type
    pub fn derive_defaults(&self) -> Properties {
        match self {
            NodeTypeSchema::Params(params) => derive_defaults(params),
            NodeTypeSchema::Properties(properties) => derive_property_defaults(properties),
        }
    }

    /// Keys that must be present on a node of this type
    pub fn required_keys(&self) -> Vec<&str> {
        match self {
            NodeTypeSchema::Params(params) => params
                .iter()
                .filter(|p| p.required)
                .map(|p| p.id.as_str())
                .collect(),
            NodeTypeSchema::Properties(properties) => properties
                .iter()
                .filter(|(_, s)| s.required)
                .map(|(k, _)| k.as_str())
                .collect(),
        }
    }

    /// Problems of `properties` against this schema
    pub fn check(&self, properties: &Properties) -> Vec<ConfigIssue> {
        match self {
            NodeTypeSchema::Params(params) => check_config(params, properties),
            NodeTypeSchema::Properties(schema) => check_properties(schema, properties),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            NodeTypeSchema::Params(params) => params.is_empty(),
            NodeTypeSchema::Properties(properties) => properties.is_empty(),
        }
    }
}

impl Default for NodeTypeSchema {
    fn default() -> Self {
        NodeTypeSchema::Params(Vec::new())
    }
}

/// Schema and category of a node, read from the backend's capability catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNodeType", into = "RawNodeType")]
pub struct NodeType {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub category: NodeCategory,
    pub input_handles: Option<u32>,
    pub output_handles: Option<u32>,
    pub default_params: Option<Properties>,
    pub schema: NodeTypeSchema,
}

impl NodeType {
    pub fn derive_properties(&self) -> Properties {
        self.schema.derive_defaults()
    }

    /// True when nodes of this type must not have outgoing connections
    pub fn is_terminal(&self) -> bool {
        self.category == NodeCategory::Terminal || self.output_handles == Some(0)
    }
}

/// Wire shape of `NodeType` with both schema fields optional
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNodeType {
    id: Id,
    name: String,
    #[serde(default)]
    description: Option<String>,
    category: NodeCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input_handles: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output_handles: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_params: Option<Properties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    param_defs: Option<Vec<ParamDefinition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<PropertyMap>,
}

impl TryFrom<RawNodeType> for NodeType {
    type Error = SchemaError;

    fn try_from(raw: RawNodeType) -> Result<Self, Self::Error> {
        let schema = match (raw.param_defs, raw.properties) {
            (Some(_), Some(_)) => return Err(SchemaError::ConflictingSchemas(raw.id.to_string())),
            (Some(params), None) => NodeTypeSchema::Params(params),
            (None, Some(properties)) => NodeTypeSchema::Properties(properties),
            (None, None) => NodeTypeSchema::default(),
        };

        Ok(NodeType {
            id: raw.id,
            name: raw.name,
            description: raw.description.unwrap_or_default(),
            category: raw.category,
            input_handles: raw.input_handles,
            output_handles: raw.output_handles,
            default_params: raw.default_params,
            schema,
        })
    }
}

impl From<NodeType> for RawNodeType {
    fn from(node_type: NodeType) -> Self {
        let (param_defs, properties) = match node_type.schema {
            NodeTypeSchema::Params(params) => (Some(params), None),
            NodeTypeSchema::Properties(properties) => (None, Some(properties)),
        };

        RawNodeType {
            id: node_type.id,
            name: node_type.name,
            description: Some(node_type.description),
            category: node_type.category,
            input_handles: node_type.input_handles,
            output_handles: node_type.output_handles,
            default_params: node_type.default_params,
            param_defs,
            properties,
        }
    }
}

/// Top-level container of a dial plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialplanProject {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_active: bool,
    /// Set by the backend on deploy
    #[serde(default)]
    pub last_deployed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DialplanProject {
    /// File-system friendly name used for exported `.conf` files
    pub fn slug(&self) -> String {
        let slug: String = self
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect();
        let slug = slug
            .split('-')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-");

        if slug.is_empty() {
            format!("dialplan-{}", self.id)
        } else {
            slug
        }
    }
}

/// Project with its contexts, as returned by the details endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    #[serde(flatten)]
    pub project: DialplanProject,
    #[serde(default)]
    pub contexts: Vec<DialplanContext>,
}

/// Named sub-graph of a project (an Asterisk `[context]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialplanContext {
    pub id: Id,
    pub project_id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub position: i32,
}

/// A single step in a context graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialplanNode {
    pub id: Id,
    pub context_id: Id,
    pub node_type_id: Id,
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub properties: Properties,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Directed edge between two nodes of the same context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialplanConnection {
    pub id: Id,
    pub source_node_id: Id,
    pub target_node_id: Id,
    /// Guard expression; None means unconditional
    #[serde(default)]
    pub condition: Option<String>,
    /// Lower values are evaluated first among a source's outgoing edges
    #[serde(default)]
    pub priority: i32,
}

impl DialplanConnection {
    pub fn touches(&self, node_id: &Id) -> bool {
        &self.source_node_id == node_id || &self.target_node_id == node_id
    }
}

/// Body of `createProject`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    pub description: String,
}

/// Body of `updateProject`; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Body of `createContext`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContext {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

/// Body of `updateContext`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

/// Body of `createNode`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNode {
    pub node_type_id: Id,
    pub name: String,
    pub label: String,
    pub position: Position,
    pub properties: Properties,
}

/// Body of `updateNode`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_type_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

/// Body of `createConnection`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConnection {
    /// Context both endpoints belong to; selects the POST route
    pub context_id: Id,
    pub source_node_id: Id,
    pub target_node_id: Id,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub priority: i32,
}

/// Body of `updateConnection`
///
/// `condition: Some(None)` clears the condition (sent as `null`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

/// Optional backend features
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    #[serde(default)]
    pub generator: bool,
    #[serde(default)]
    pub validator: bool,
    #[serde(default)]
    pub deployment: bool,
}

/// Capability descriptor of the dial-plan backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    #[serde(default, deserialize_with = "lenient_node_types")]
    pub node_types: Vec<NodeType>,
    #[serde(default)]
    pub features: FeatureFlags,
}

/// Decode a node type catalog entry by entry
///
/// An entry that does not decode (conflicting schemas, malformed param defs)
/// is logged and skipped, so the rest of the catalog stays usable.
pub fn decode_node_types(raw: Vec<Value>) -> Vec<NodeType> {
    raw.into_iter()
        .filter_map(|entry| {
            let id = entry.get("id").cloned().unwrap_or(Value::Null);
            match serde_json::from_value::<NodeType>(entry) {
                Ok(node_type) => Some(node_type),
                Err(e) => {
                    tracing::warn!("⚠️ Skipping node type {}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

fn lenient_node_types<'de, D>(deserializer: D) -> Result<Vec<NodeType>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(decode_node_types(raw.unwrap_or_default()))
}

/// Severity of a validation issue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

/// One problem reported by graph validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawIssue")]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<Id>,
    pub severity: Severity,
}

impl ValidationIssue {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            node_id: None,
            context_id: None,
            severity: Severity::Error,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(message)
        }
    }

    pub fn on_node(mut self, node_id: &Id) -> Self {
        self.node_id = Some(node_id.clone());
        self
    }

    pub fn in_context(mut self, context_id: &Id) -> Self {
        self.context_id = Some(context_id.clone());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node_id {
            Some(node_id) => write!(f, "node {}: {}", node_id, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Wire shape of an issue: a bare string, an object with a message, or
/// anything else the backend sends (kept as its JSON text)
#[derive(Deserialize)]
#[serde(untagged)]
enum RawIssue {
    Message(String),
    #[serde(rename_all = "camelCase")]
    Detailed {
        message: String,
        #[serde(default)]
        node_id: Option<Id>,
        #[serde(default)]
        context_id: Option<Id>,
        #[serde(default)]
        severity: Severity,
    },
    Other(Value),
}

impl From<RawIssue> for ValidationIssue {
    fn from(raw: RawIssue) -> Self {
        match raw {
            RawIssue::Message(message) => ValidationIssue::error(message),
            RawIssue::Detailed { message, node_id, context_id, severity } => ValidationIssue {
                message,
                node_id,
                context_id,
                severity,
            },
            RawIssue::Other(value) => ValidationIssue::error(value.to_string()),
        }
    }
}

/// Result of `validateProject`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default)]
    pub errors: Vec<ValidationIssue>,
}

/// Compiled dial-plan text for a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDialplan {
    pub project_id: Id,
    pub content: String,
}
