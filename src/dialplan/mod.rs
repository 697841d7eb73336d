//! Dial-plan Graph Model
//!
//! This module holds the dial-plan data model and its in-memory forms:
//! - Type definitions (Project, Context, Node, Connection, NodeType)
//! - Lock-free node type catalog using ArcSwap
//! - Per-context graph cache with petgraph-based analysis

// Core dial-plan type definitions
pub mod types;

// Node type catalog (reference data for an editing session)
pub mod catalog;

// Per-context node/connection maps
pub mod graph;

// Re-export commonly used types
pub use catalog::NodeTypeCatalog;
pub use graph::{ContextGraph, GraphReport};
pub use types::{
    Capabilities, DialplanConnection, DialplanContext, DialplanNode, DialplanProject, Id,
    NodeCategory, NodeType, NodeTypeSchema, Position, Properties, ValidationIssue,
    ValidationResult,
};
