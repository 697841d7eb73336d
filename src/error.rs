//! Error taxonomy for the dial-plan library
//!
//! Three layers fail in different ways: the HTTP facade (`ApiError`), the static
//! schema registries (`SchemaError`) and the editor session (`EditorError`).
//! Validation results from the backend are values, not errors.

use crate::dialplan::types::Id;
use thiserror::Error;

/// Errors raised by the backend REST facade.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No response at all (connection refused, DNS, TLS, reset).
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status.
    #[error("Backend returned {status} for {url}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    /// The body could not be decoded into the expected type.
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Auth token or tenant id contains bytes that are not valid in a header.
    #[error("Invalid header value for '{0}'")]
    Header(String),
}

impl ApiError {
    /// HTTP status code if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 404 responses.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Errors raised while interpreting parameter schemas.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Unknown journey action type: '{0}'")]
    UnknownActionType(String),

    #[error("Unknown delay type: '{0}'")]
    UnknownDelayType(String),

    #[error("Parameter '{param}' declares default {default} which is not one of its options")]
    DefaultNotInOptions { param: String, default: String },

    #[error("Node type '{0}' declares both paramDefs and properties")]
    ConflictingSchemas(String),
}

/// Errors raised by the editor session.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Dial-plan generator is not available: editor is read-only")]
    Limited,

    #[error("No project is loaded")]
    NoActiveProject,

    #[error("No context is active")]
    NoActiveContext,

    #[error("Context {0} is not part of the loaded project")]
    ContextNotFound(Id),

    #[error("Node {0} not found in the loaded graph")]
    NodeNotFound(Id),

    #[error("Connection {0} not found in the loaded graph")]
    ConnectionNotFound(Id),

    #[error("Unknown node type: {0}")]
    UnknownNodeType(Id),

    #[error("Connection {source_node} -> {target_node} crosses contexts")]
    CrossContext { source_node: Id, target_node: Id },

    #[error("Backend does not support {0}")]
    Unsupported(&'static str),

    #[error("Context {0} is the last context of its project")]
    LastContext(Id),

    #[error("Node {0} already has an outgoing connection at the highest priority")]
    PriorityExhausted(Id),

    #[error("Node {0}: properties cannot be set together with a type change")]
    PropertiesWithTypeChange(Id),

    #[error("Node {0} already has a type change in flight")]
    TypeChangeInProgress(Id),

    #[error("Failed to export dial plan: {0}")]
    Export(#[from] std::io::Error),
}
