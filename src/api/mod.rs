//! Backend API Layer
//!
//! All graph mutations go through the `DialplanApi` facade, one HTTP call per
//! logical operation. The trait is the seam the editor session is written
//! against; `HttpDialplanApi` is the reqwest implementation.

// reqwest-backed implementation of the facade
pub mod client;

pub use client::HttpDialplanApi;

use crate::dialplan::types::{
    Capabilities, ConnectionUpdate, ContextUpdate, DialplanConnection, DialplanContext,
    DialplanNode, DialplanProject, GeneratedDialplan, Id, NewConnection, NewContext, NewNode,
    NewProject, NodeType, NodeUpdate, ProjectDetails, ProjectUpdate, ValidationResult,
};
use crate::error::ApiError;
use async_trait::async_trait;

/// CRUD facade over the dial-plan backend
///
/// Routes:
/// - `/dialplan/projects[/:id][/clone|/validate|/generate|/deploy]`
/// - `/dialplan/projects/:id/contexts`, `/dialplan/contexts/:id[/nodes|/connections]`
/// - `/dialplan/nodes/:id`, `/dialplan/connections/:id`
/// - `/dialplan/node-types`, `/system/dialplan-capabilities`
#[async_trait]
pub trait DialplanApi: Send + Sync {
    // Projects
    async fn get_projects(&self) -> Result<Vec<DialplanProject>, ApiError>;
    async fn get_project_details(&self, id: &Id) -> Result<ProjectDetails, ApiError>;
    async fn create_project(&self, data: &NewProject) -> Result<DialplanProject, ApiError>;
    async fn update_project(&self, id: &Id, data: &ProjectUpdate) -> Result<DialplanProject, ApiError>;
    async fn delete_project(&self, id: &Id) -> Result<(), ApiError>;
    /// Server-side deep copy of contexts, nodes and connections
    async fn clone_project(&self, id: &Id, new_name: &str) -> Result<DialplanProject, ApiError>;
    /// Push the generated dial plan to the PBX; sets `lastDeployed`
    async fn deploy_project(&self, id: &Id) -> Result<DialplanProject, ApiError>;

    // Contexts
    async fn get_contexts_for_project(&self, project_id: &Id) -> Result<Vec<DialplanContext>, ApiError>;
    async fn create_context(&self, project_id: &Id, data: &NewContext) -> Result<DialplanContext, ApiError>;
    async fn update_context(&self, id: &Id, data: &ContextUpdate) -> Result<DialplanContext, ApiError>;
    async fn delete_context(&self, id: &Id) -> Result<(), ApiError>;

    // Nodes
    async fn get_nodes_for_context(&self, context_id: &Id) -> Result<Vec<DialplanNode>, ApiError>;
    async fn get_node(&self, id: &Id) -> Result<DialplanNode, ApiError>;
    async fn create_node(&self, context_id: &Id, data: &NewNode) -> Result<DialplanNode, ApiError>;
    async fn update_node(&self, id: &Id, data: &NodeUpdate) -> Result<DialplanNode, ApiError>;
    async fn delete_node(&self, id: &Id) -> Result<(), ApiError>;

    // Connections
    async fn get_connections_for_context(&self, context_id: &Id) -> Result<Vec<DialplanConnection>, ApiError>;
    async fn create_connection(&self, data: &NewConnection) -> Result<DialplanConnection, ApiError>;
    async fn update_connection(&self, id: &Id, data: &ConnectionUpdate) -> Result<DialplanConnection, ApiError>;
    async fn delete_connection(&self, id: &Id) -> Result<(), ApiError>;

    // Reference data and compilation
    async fn get_node_types(&self) -> Result<Vec<NodeType>, ApiError>;
    /// Graph-level validation computed by the backend
    async fn validate_project(&self, id: &Id) -> Result<ValidationResult, ApiError>;
    async fn generate_dialplan(&self, id: &Id) -> Result<GeneratedDialplan, ApiError>;
    async fn check_dialplan_capabilities(&self) -> Result<Capabilities, ApiError>;
}
