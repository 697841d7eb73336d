//! Shared fixtures for integration tests
//!
//! `MemoryBackend` is an in-process `DialplanApi` with per-operation failure
//! injection. `serve` runs an axum router on an ephemeral port for HTTP tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use dialweave::api::DialplanApi;
use dialweave::dialplan::types::{
    Capabilities, ConnectionUpdate, ContextUpdate, DialplanConnection, DialplanContext,
    DialplanNode, DialplanProject, FeatureFlags, GeneratedDialplan, Id, NewConnection, NewContext,
    NewNode, NewProject, NodeCategory, NodeType, NodeTypeSchema, NodeUpdate, ProjectDetails,
    ProjectUpdate, ValidationResult,
};
use dialweave::error::ApiError;
use dialweave::schema::{ParamDefinition, PropertyMap, PropertySchema, PropertyType};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Mutex;
use tokio::net::TcpListener;

pub const EXTENSION: i64 = 1;
pub const DIAL: i64 = 2;
pub const HANGUP: i64 = 3;
pub const VOICEMAIL: i64 = 4;

pub const PROJECT: i64 = 1;
pub const DEFAULT_CTX: i64 = 10;
pub const AFTER_HOURS_CTX: i64 = 11;
pub const ENTRY_NODE: i64 = 100;
pub const DIAL_NODE: i64 = 101;
pub const AFTER_HOURS_NODE: i64 = 102;
pub const ENTRY_TO_DIAL: i64 = 200;

#[derive(Default)]
struct State {
    next_id: i64,
    projects: Vec<DialplanProject>,
    contexts: Vec<DialplanContext>,
    nodes: Vec<DialplanNode>,
    connections: Vec<DialplanConnection>,
    node_types: Vec<NodeType>,
    features: FeatureFlags,
    capabilities_down: bool,
    validation: ValidationResult,
    dialplan: String,
    failing: HashSet<&'static str>,
    calls: Vec<&'static str>,
}

/// In-memory dial-plan backend
pub struct MemoryBackend {
    state: Mutex<State>,
}

pub fn node_types() -> Vec<NodeType> {
    let make = |id: i64, name: &str, category, output_handles, schema| NodeType {
        id: Id::Int(id),
        name: name.to_string(),
        description: String::new(),
        category,
        input_handles: Some(1),
        output_handles,
        default_params: None,
        schema,
    };

    let mut voicemail = PropertyMap::new();
    voicemail.insert("mailbox".into(), PropertySchema::new(PropertyType::String).required());
    voicemail.insert("options".into(), PropertySchema::new(PropertyType::String));
    voicemail.insert(
        "skipGreeting".into(),
        PropertySchema::new(PropertyType::Boolean).default_value(false),
    );

    vec![
        make(
            EXTENSION,
            "Extension",
            NodeCategory::Extension,
            Some(1),
            NodeTypeSchema::Params(vec![ParamDefinition::string("exten", "Extension").required()]),
        ),
        make(
            DIAL,
            "Dial",
            NodeCategory::Application,
            Some(2),
            NodeTypeSchema::Params(vec![
                ParamDefinition::string("destination", "Destination").required(),
                ParamDefinition::number("timeout", "Timeout").default_value(30),
                ParamDefinition::string("options", "Options"),
            ]),
        ),
        make(HANGUP, "Hangup", NodeCategory::Terminal, Some(0), NodeTypeSchema::default()),
        make(
            VOICEMAIL,
            "VoiceMail",
            NodeCategory::Application,
            Some(1),
            NodeTypeSchema::Properties(voicemail),
        ),
    ]
}

fn node(id: i64, context_id: i64, type_id: i64, name: &str, properties: Value) -> DialplanNode {
    DialplanNode {
        id: Id::Int(id),
        context_id: Id::Int(context_id),
        node_type_id: Id::Int(type_id),
        name: name.to_string(),
        label: name.to_string(),
        position: Default::default(),
        properties: properties.as_object().cloned().unwrap_or_default(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

impl MemoryBackend {
    /// One project with two contexts; the default context holds
    /// Extension(100) → Dial(101), the after-hours context a single Hangup(102)
    pub fn seeded() -> Self {
        let now = Utc::now();
        let state = State {
            next_id: 1000,
            projects: vec![DialplanProject {
                id: Id::Int(PROJECT),
                name: "Main IVR".into(),
                description: "Inbound support line".into(),
                is_active: true,
                last_deployed: None,
                created_at: now,
                updated_at: now,
            }],
            // Stored out of order: the session must sort by position
            contexts: vec![
                DialplanContext {
                    id: Id::Int(AFTER_HOURS_CTX),
                    project_id: Id::Int(PROJECT),
                    name: "after-hours".into(),
                    description: String::new(),
                    position: 1,
                },
                DialplanContext {
                    id: Id::Int(DEFAULT_CTX),
                    project_id: Id::Int(PROJECT),
                    name: "default".into(),
                    description: String::new(),
                    position: 0,
                },
            ],
            nodes: vec![
                node(ENTRY_NODE, DEFAULT_CTX, EXTENSION, "Extension", json!({ "exten": "100" })),
                node(
                    DIAL_NODE,
                    DEFAULT_CTX,
                    DIAL,
                    "Dial",
                    json!({ "destination": "PJSIP/100", "timeout": 20, "options": "tT" }),
                ),
                node(AFTER_HOURS_NODE, AFTER_HOURS_CTX, HANGUP, "Hangup", json!({})),
            ],
            connections: vec![DialplanConnection {
                id: Id::Int(ENTRY_TO_DIAL),
                source_node_id: Id::Int(ENTRY_NODE),
                target_node_id: Id::Int(DIAL_NODE),
                condition: None,
                priority: 0,
            }],
            node_types: node_types(),
            features: FeatureFlags {
                generator: true,
                validator: true,
                deployment: true,
            },
            validation: ValidationResult {
                valid: true,
                errors: Vec::new(),
            },
            dialplan: "[default]\nexten => 100,1,Dial(PJSIP/100,20,tT)".into(),
            ..State::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Make `op` answer 500 until `recover` is called
    pub fn fail_on(&self, op: &'static str) {
        self.lock().failing.insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.lock().failing.remove(op);
    }

    pub fn set_features(&self, features: FeatureFlags) {
        self.lock().features = features;
    }

    pub fn take_capabilities_down(&self) {
        self.lock().capabilities_down = true;
    }

    pub fn set_validation(&self, result: ValidationResult) {
        self.lock().validation = result;
    }

    /// Operations called so far, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.lock().calls.iter().filter(|c| **c == op).count()
    }

    pub fn stored_node(&self, id: i64) -> Option<DialplanNode> {
        self.lock().nodes.iter().find(|n| n.id == Id::Int(id)).cloned()
    }

    pub fn stored_connections(&self) -> Vec<DialplanConnection> {
        self.lock().connections.clone()
    }

    pub fn stored_project(&self, id: i64) -> Option<DialplanProject> {
        self.lock().projects.iter().find(|p| p.id == Id::Int(id)).cloned()
    }

    /// Record the call and fail it if injected
    fn enter(&self, op: &'static str) -> Result<std::sync::MutexGuard<'_, State>, ApiError> {
        let mut state = self.lock();
        state.calls.push(op);
        if state.failing.contains(op) {
            return Err(ApiError::Status {
                url: format!("memory://{}", op),
                status: 500,
                message: format!("{} failed", op),
            });
        }
        Ok(state)
    }

    fn not_found(what: &str, id: &Id) -> ApiError {
        ApiError::Status {
            url: format!("memory://{}/{}", what, id),
            status: 404,
            message: format!("{} {} not found", what, id),
        }
    }
}

impl State {
    fn next_id(&mut self) -> Id {
        self.next_id += 1;
        Id::Int(self.next_id)
    }
}

#[async_trait]
impl DialplanApi for MemoryBackend {
    async fn get_projects(&self) -> Result<Vec<DialplanProject>, ApiError> {
        Ok(self.enter("get_projects")?.projects.clone())
    }

    async fn get_project_details(&self, id: &Id) -> Result<ProjectDetails, ApiError> {
        let state = self.enter("get_project_details")?;
        let project = state
            .projects
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("project", id))?;
        let contexts = state
            .contexts
            .iter()
            .filter(|c| &c.project_id == id)
            .cloned()
            .collect();
        Ok(ProjectDetails { project, contexts })
    }

    async fn create_project(&self, data: &NewProject) -> Result<DialplanProject, ApiError> {
        let mut state = self.enter("create_project")?;
        let now = Utc::now();
        let project = DialplanProject {
            id: state.next_id(),
            name: data.name.clone(),
            description: data.description.clone(),
            is_active: true,
            last_deployed: None,
            created_at: now,
            updated_at: now,
        };
        state.projects.push(project.clone());
        Ok(project)
    }

    async fn update_project(&self, id: &Id, data: &ProjectUpdate) -> Result<DialplanProject, ApiError> {
        let mut state = self.enter("update_project")?;
        let project = state
            .projects
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| Self::not_found("project", id))?;
        if let Some(name) = &data.name {
            project.name = name.clone();
        }
        if let Some(description) = &data.description {
            project.description = description.clone();
        }
        if let Some(is_active) = data.is_active {
            project.is_active = is_active;
        }
        project.updated_at = Utc::now();
        Ok(project.clone())
    }

    async fn delete_project(&self, id: &Id) -> Result<(), ApiError> {
        let mut state = self.enter("delete_project")?;
        state.projects.retain(|p| &p.id != id);
        Ok(())
    }

    async fn clone_project(&self, id: &Id, new_name: &str) -> Result<DialplanProject, ApiError> {
        let mut state = self.enter("clone_project")?;
        let mut copy = state
            .projects
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("project", id))?;
        copy.id = state.next_id();
        copy.name = new_name.to_string();
        copy.last_deployed = None;
        state.projects.push(copy.clone());
        Ok(copy)
    }

    async fn deploy_project(&self, id: &Id) -> Result<DialplanProject, ApiError> {
        let mut state = self.enter("deploy_project")?;
        let project = state
            .projects
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| Self::not_found("project", id))?;
        project.last_deployed = Some(Utc::now());
        Ok(project.clone())
    }

    async fn get_contexts_for_project(&self, project_id: &Id) -> Result<Vec<DialplanContext>, ApiError> {
        let state = self.enter("get_contexts_for_project")?;
        Ok(state
            .contexts
            .iter()
            .filter(|c| &c.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn create_context(&self, project_id: &Id, data: &NewContext) -> Result<DialplanContext, ApiError> {
        let mut state = self.enter("create_context")?;
        let position = data.position.unwrap_or_else(|| {
            state
                .contexts
                .iter()
                .filter(|c| &c.project_id == project_id)
                .map(|c| c.position + 1)
                .max()
                .unwrap_or(0)
        });
        let context = DialplanContext {
            id: state.next_id(),
            project_id: project_id.clone(),
            name: data.name.clone(),
            description: data.description.clone(),
            position,
        };
        state.contexts.push(context.clone());
        Ok(context)
    }

    async fn update_context(&self, id: &Id, data: &ContextUpdate) -> Result<DialplanContext, ApiError> {
        let mut state = self.enter("update_context")?;
        let context = state
            .contexts
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| Self::not_found("context", id))?;
        if let Some(name) = &data.name {
            context.name = name.clone();
        }
        if let Some(description) = &data.description {
            context.description = description.clone();
        }
        if let Some(position) = data.position {
            context.position = position;
        }
        Ok(context.clone())
    }

    async fn delete_context(&self, id: &Id) -> Result<(), ApiError> {
        let mut state = self.enter("delete_context")?;
        let doomed: Vec<Id> = state
            .nodes
            .iter()
            .filter(|n| &n.context_id == id)
            .map(|n| n.id.clone())
            .collect();
        state.nodes.retain(|n| &n.context_id != id);
        state
            .connections
            .retain(|c| !doomed.iter().any(|n| c.touches(n)));
        state.contexts.retain(|c| &c.id != id);
        Ok(())
    }

    async fn get_nodes_for_context(&self, context_id: &Id) -> Result<Vec<DialplanNode>, ApiError> {
        let state = self.enter("get_nodes_for_context")?;
        Ok(state
            .nodes
            .iter()
            .filter(|n| &n.context_id == context_id)
            .cloned()
            .collect())
    }

    async fn get_node(&self, id: &Id) -> Result<DialplanNode, ApiError> {
        let state = self.enter("get_node")?;
        state
            .nodes
            .iter()
            .find(|n| &n.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("node", id))
    }

    async fn create_node(&self, context_id: &Id, data: &NewNode) -> Result<DialplanNode, ApiError> {
        let mut state = self.enter("create_node")?;
        let now = Utc::now();
        let node = DialplanNode {
            id: state.next_id(),
            context_id: context_id.clone(),
            node_type_id: data.node_type_id.clone(),
            name: data.name.clone(),
            label: data.label.clone(),
            position: data.position,
            properties: data.properties.clone(),
            created_at: now,
            updated_at: now,
        };
        state.nodes.push(node.clone());
        Ok(node)
    }

    async fn update_node(&self, id: &Id, data: &NodeUpdate) -> Result<DialplanNode, ApiError> {
        let mut state = self.enter("update_node")?;
        let node = state
            .nodes
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(|| Self::not_found("node", id))?;
        if let Some(node_type_id) = &data.node_type_id {
            node.node_type_id = node_type_id.clone();
        }
        if let Some(name) = &data.name {
            node.name = name.clone();
        }
        if let Some(label) = &data.label {
            node.label = label.clone();
        }
        if let Some(position) = data.position {
            node.position = position;
        }
        if let Some(properties) = &data.properties {
            node.properties = properties.clone();
        }
        node.updated_at = Utc::now();
        Ok(node.clone())
    }

    async fn delete_node(&self, id: &Id) -> Result<(), ApiError> {
        let mut state = self.enter("delete_node")?;
        state.nodes.retain(|n| &n.id != id);
        state.connections.retain(|c| !c.touches(id));
        Ok(())
    }

    async fn get_connections_for_context(&self, context_id: &Id) -> Result<Vec<DialplanConnection>, ApiError> {
        let state = self.enter("get_connections_for_context")?;
        let in_context: HashSet<&Id> = state
            .nodes
            .iter()
            .filter(|n| &n.context_id == context_id)
            .map(|n| &n.id)
            .collect();
        Ok(state
            .connections
            .iter()
            .filter(|c| in_context.contains(&c.source_node_id))
            .cloned()
            .collect())
    }

    async fn create_connection(&self, data: &NewConnection) -> Result<DialplanConnection, ApiError> {
        let mut state = self.enter("create_connection")?;
        let connection = DialplanConnection {
            id: state.next_id(),
            source_node_id: data.source_node_id.clone(),
            target_node_id: data.target_node_id.clone(),
            condition: data.condition.clone(),
            priority: data.priority,
        };
        state.connections.push(connection.clone());
        Ok(connection)
    }

    async fn update_connection(&self, id: &Id, data: &ConnectionUpdate) -> Result<DialplanConnection, ApiError> {
        let mut state = self.enter("update_connection")?;
        let connection = state
            .connections
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| Self::not_found("connection", id))?;
        if let Some(condition) = &data.condition {
            connection.condition = condition.clone();
        }
        if let Some(priority) = data.priority {
            connection.priority = priority;
        }
        Ok(connection.clone())
    }

    async fn delete_connection(&self, id: &Id) -> Result<(), ApiError> {
        let mut state = self.enter("delete_connection")?;
        state.connections.retain(|c| &c.id != id);
        Ok(())
    }

    async fn get_node_types(&self) -> Result<Vec<NodeType>, ApiError> {
        Ok(self.enter("get_node_types")?.node_types.clone())
    }

    async fn validate_project(&self, _id: &Id) -> Result<ValidationResult, ApiError> {
        Ok(self.enter("validate_project")?.validation.clone())
    }

    async fn generate_dialplan(&self, id: &Id) -> Result<GeneratedDialplan, ApiError> {
        let state = self.enter("generate_dialplan")?;
        Ok(GeneratedDialplan {
            project_id: id.clone(),
            content: state.dialplan.clone(),
        })
    }

    async fn check_dialplan_capabilities(&self) -> Result<Capabilities, ApiError> {
        let state = self.enter("check_dialplan_capabilities")?;
        if state.capabilities_down {
            return Err(ApiError::Status {
                url: "memory://capabilities".into(),
                status: 503,
                message: "dial-plan service unavailable".into(),
            });
        }
        // Node types are served separately, like most deployments do
        Ok(Capabilities {
            node_types: Vec::new(),
            features: state.features,
        })
    }
}

/// Serve `app` on an ephemeral local port; returns the base URL
pub async fn serve(app: axum::Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
