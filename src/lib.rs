//! Dialweave: dial-plan graph and journey schema library
//!
//! This library provides the client side of a visual dial-plan builder: the
//! project/context/node/connection model, a REST facade over the backend, an
//! editor session that keeps local graph state in sync, and the parameter
//! schemas that drive journey action and delay forms.

// Core configuration and setup
pub mod config;

// Error taxonomy shared by all layers
pub mod error;

// Parameter schemas - ParamDefinition lists, property maps, default derivation
pub mod schema;

// Journey step configuration - action and delay type registries
pub mod journey;

// Dial-plan graph model - types, node type catalog, per-context graphs
pub mod dialplan;

// Backend API layer - CRUD facade over the dial-plan REST backend
pub mod api;

// Editor session - graph synchronization, type changes, notices, export
pub mod editor;

// Re-export commonly used types for external consumers
pub use api::{DialplanApi, HttpDialplanApi};
pub use config::Config;
pub use dialplan::{ContextGraph, DialplanNode, Id, NodeType, NodeTypeCatalog};
pub use editor::{EditorSession, Notice, Notifier};
pub use error::{ApiError, EditorError, SchemaError};
pub use journey::{JourneyActionType, DelayType};
pub use schema::ParamDefinition;
