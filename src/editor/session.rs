//! Editor session: the graph synchronization layer
//!
//! Holds the node type catalog, the loaded project and one cached graph per
//! context. Every mutation calls the backend first and patches the cache only
//! when the call succeeded, so a failure leaves local state exactly as it was.
//! Concurrent edits from other sessions are not reconciled: last write wins.

use crate::api::DialplanApi;
use crate::dialplan::catalog::NodeTypeCatalog;
use crate::dialplan::graph::{ContextGraph, GraphReport};
use crate::dialplan::types::{
    ConnectionUpdate, ContextUpdate, DialplanConnection, DialplanContext, DialplanNode,
    DialplanProject, FeatureFlags, GeneratedDialplan, Id, NewConnection, NewContext, NewNode,
    NewProject, NodeUpdate, Position, Severity, ValidationResult,
};
use crate::editor::export::write_conf;
use crate::editor::notify::{Notice, NoticeLevel, Notifier};
use crate::editor::type_change::{
    retype_update, TypeChangeOutcome, TypeChangeState, TypeChangeTracker,
};
use crate::error::EditorError;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Whether the session may change anything
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Full,
    /// Read-only; the backend cannot generate dial plans or was unreachable
    Limited { reason: String },
}

/// Editing session over one backend
///
/// Owns the local picture of one project: its contexts and their cached graphs.
/// The backend stays authoritative; the cache only ever holds what a successful
/// call returned. Every failure is reported once through the notifier and then
/// handed back to the caller as an `EditorError`.
pub struct EditorSession {
    /// Backend the session talks to (HTTP in production, in-memory in tests)
    api: Arc<dyn DialplanApi>,

    /// Sink for user-facing notices
    notifier: Arc<dyn Notifier>,

    /// Node types reported by the backend, swapped on capability refresh
    catalog: NodeTypeCatalog,

    features: FeatureFlags,

    /// Full or read-only; derived from the last capability check
    mode: EditorMode,

    project: Option<DialplanProject>,

    /// Contexts of the loaded project, ordered by position
    contexts: Vec<DialplanContext>,

    active_context: Option<Id>,

    /// Cached graphs
    /// Key: context id, Value: nodes and connections last fetched for it
    graphs: HashMap<Id, ContextGraph>,

    /// Contexts whose last load was incomplete and must be refetched
    stale: HashSet<Id>,

    /// At most one in-flight type change per node, plus the last outcome
    type_changes: TypeChangeTracker,

    last_validation: Option<ValidationResult>,
}

impl EditorSession {
    /// Open a session: checks backend capabilities and loads the node type catalog
    pub async fn open(api: Arc<dyn DialplanApi>, notifier: Arc<dyn Notifier>) -> Self {
        let mut session = Self {
            api,
            notifier,
            catalog: NodeTypeCatalog::new(),
            features: FeatureFlags::default(),
            mode: EditorMode::Limited {
                reason: "capabilities not checked".to_string(),
            },
            project: None,
            contexts: Vec::new(),
            active_context: None,
            graphs: HashMap::new(),
            stale: HashSet::new(),
            type_changes: TypeChangeTracker::new(),
            last_validation: None,
        };
        session.refresh_capabilities().await;
        session
    }

    /// Re-check backend capabilities and reload the node type catalog
    pub async fn refresh_capabilities(&mut self) -> &EditorMode {
        match self.api.check_dialplan_capabilities().await {
            Ok(capabilities) => {
                self.features = capabilities.features;

                let mut node_types = capabilities.node_types;
                if node_types.is_empty() {
                    node_types = match self.api.get_node_types().await {
                        Ok(types) => types,
                        Err(e) => {
                            self.notifier
                                .notify(Notice::warning("Failed to load node types", e.to_string()));
                            Vec::new()
                        }
                    };
                }
                self.catalog.replace(node_types);

                self.mode = if self.features.generator {
                    EditorMode::Full
                } else {
                    self.notifier.notify(Notice::warning(
                        "Dial-plan generator unavailable",
                        "The editor is read-only until the backend enables the generator",
                    ));
                    EditorMode::Limited {
                        reason: "generator not available".to_string(),
                    }
                };
            }
            Err(e) => {
                self.notifier.notify(Notice::warning(
                    "Dial-plan capabilities unavailable",
                    e.to_string(),
                ));
                self.mode = EditorMode::Limited {
                    reason: e.to_string(),
                };
            }
        }

        tracing::info!(
            "🧭 Editor mode: {:?} ({} node types)",
            self.mode,
            self.catalog.len()
        );

        &self.mode
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn is_limited(&self) -> bool {
        matches!(self.mode, EditorMode::Limited { .. })
    }

    pub fn features(&self) -> FeatureFlags {
        self.features
    }

    pub fn catalog(&self) -> &NodeTypeCatalog {
        &self.catalog
    }

    pub fn project(&self) -> Option<&DialplanProject> {
        self.project.as_ref()
    }

    pub fn contexts(&self) -> &[DialplanContext] {
        &self.contexts
    }

    pub fn active_context(&self) -> Option<&DialplanContext> {
        let id = self.active_context.as_ref()?;
        self.contexts.iter().find(|c| &c.id == id)
    }

    pub fn graph(&self, context_id: &Id) -> Option<&ContextGraph> {
        self.graphs.get(context_id)
    }

    pub fn active_graph(&self) -> Option<&ContextGraph> {
        self.graphs.get(self.active_context.as_ref()?)
    }

    /// Look a node up in any loaded context
    pub fn node(&self, node_id: &Id) -> Option<&DialplanNode> {
        self.graphs.values().find_map(|g| g.node(node_id))
    }

    pub fn type_change_state(&self, node_id: &Id) -> TypeChangeState {
        self.type_changes.state(node_id)
    }

    pub fn type_change_outcome(&self, node_id: &Id) -> Option<&TypeChangeOutcome> {
        self.type_changes.outcome(node_id)
    }

    /// Forget an in-flight type change whose request was abandoned
    pub fn cancel_type_change(&mut self, node_id: &Id) -> bool {
        self.type_changes.cancel(node_id)
    }

    pub fn last_validation(&self) -> Option<&ValidationResult> {
        self.last_validation.as_ref()
    }

    /// Report a failure once and hand the error back
    fn fail(&self, action: &str, error: EditorError) -> EditorError {
        tracing::error!("❌ Failed to {}: {}", action, error);
        self.notifier
            .notify(Notice::error(format!("Failed to {}", action), error.to_string()));
        error
    }

    fn ensure_editable(&self, action: &str) -> Result<(), EditorError> {
        match &self.mode {
            EditorMode::Full => Ok(()),
            EditorMode::Limited { reason } => {
                self.notifier.notify(Notice::warning(
                    format!("Cannot {}", action),
                    format!("The editor is read-only: {}", reason),
                ));
                Err(EditorError::Limited)
            }
        }
    }

    fn project_id(&self, action: &str) -> Result<Id, EditorError> {
        match &self.project {
            Some(project) => Ok(project.id.clone()),
            None => Err(self.fail(action, EditorError::NoActiveProject)),
        }
    }

    fn active_context_id(&self, action: &str) -> Result<Id, EditorError> {
        match &self.active_context {
            Some(id) => Ok(id.clone()),
            None => Err(self.fail(action, EditorError::NoActiveContext)),
        }
    }

    fn context_of_node(&self, node_id: &Id) -> Option<Id> {
        self.graphs
            .iter()
            .find(|(_, g)| g.node(node_id).is_some())
            .map(|(id, _)| id.clone())
    }

    fn context_of_connection(&self, connection_id: &Id) -> Option<Id> {
        self.graphs
            .iter()
            .find(|(_, g)| g.connection(connection_id).is_some())
            .map(|(id, _)| id.clone())
    }

    // ---- Projects ----

    /// All projects; a failed fetch yields an empty list
    pub async fn list_projects(&self) -> Vec<DialplanProject> {
        match self.api.get_projects().await {
            Ok(projects) => projects,
            Err(e) => {
                self.fail("load projects", e.into());
                Vec::new()
            }
        }
    }

    pub async fn create_project(&self, data: NewProject) -> Result<DialplanProject, EditorError> {
        self.ensure_editable("create project")?;
        let project = self
            .api
            .create_project(&data)
            .await
            .map_err(|e| self.fail("create project", e.into()))?;
        tracing::info!("🔥 Created dial-plan project: {} ({})", project.id, project.name);
        Ok(project)
    }

    /// Delete a project; unloads it if it is the loaded one
    pub async fn delete_project(&mut self, id: &Id) -> Result<(), EditorError> {
        self.ensure_editable("delete project")?;
        self.api
            .delete_project(id)
            .await
            .map_err(|e| self.fail("delete project", e.into()))?;

        if self.project.as_ref().map(|p| &p.id) == Some(id) {
            self.unload();
        }
        tracing::info!("Deleted dial-plan project: {}", id);
        Ok(())
    }

    /// Server-side deep copy of the loaded project
    pub async fn clone_project(&self, new_name: &str) -> Result<DialplanProject, EditorError> {
        self.ensure_editable("clone project")?;
        let project_id = self.project_id("clone project")?;
        let copy = self
            .api
            .clone_project(&project_id, new_name)
            .await
            .map_err(|e| self.fail("clone project", e.into()))?;
        self.notifier.notify(Notice::success(
            "Project cloned",
            format!("Created '{}'", copy.name),
        ));
        Ok(copy)
    }

    fn unload(&mut self) {
        self.project = None;
        self.contexts.clear();
        self.active_context = None;
        self.graphs.clear();
        self.stale.clear();
        self.last_validation = None;
    }

    /// Load a project and activate its first context
    pub async fn load_project(&mut self, id: &Id) -> Result<(), EditorError> {
        let details = self
            .api
            .get_project_details(id)
            .await
            .map_err(|e| self.fail("load project", e.into()))?;

        let mut contexts = details.contexts;
        if contexts.is_empty() {
            contexts = match self.api.get_contexts_for_project(id).await {
                Ok(contexts) => contexts,
                Err(e) => {
                    self.fail("load contexts", e.into());
                    Vec::new()
                }
            };
        }
        contexts.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));

        self.unload();
        tracing::info!(
            "📂 Loaded project '{}' with {} contexts",
            details.project.name,
            contexts.len()
        );
        self.project = Some(details.project);
        self.contexts = contexts;

        if let Some(first) = self.contexts.first().map(|c| c.id.clone()) {
            self.select_context(&first).await?;
        }
        Ok(())
    }

    // ---- Contexts ----

    /// Make a context active, loading its graph on first use
    pub async fn select_context(&mut self, id: &Id) -> Result<&ContextGraph, EditorError> {
        let context = match self.contexts.iter().find(|c| &c.id == id) {
            Some(context) => context.clone(),
            None => return Err(self.fail("open context", EditorError::ContextNotFound(id.clone()))),
        };

        if !self.graphs.contains_key(id) || self.stale.contains(id) {
            let graph = self.fetch_graph(context).await;
            self.graphs.insert(id.clone(), graph);
        }
        self.active_context = Some(id.clone());

        self.graphs
            .get(id)
            .ok_or_else(|| EditorError::ContextNotFound(id.clone()))
    }

    /// Fetch nodes and connections; a failed list falls back to empty and marks
    /// the context stale
    async fn fetch_graph(&mut self, context: DialplanContext) -> ContextGraph {
        let mut complete = true;

        let nodes = match self.api.get_nodes_for_context(&context.id).await {
            Ok(nodes) => nodes,
            Err(e) => {
                complete = false;
                self.fail("load nodes", e.into());
                Vec::new()
            }
        };
        let connections = match self.api.get_connections_for_context(&context.id).await {
            Ok(connections) => connections,
            Err(e) => {
                complete = false;
                self.fail("load connections", e.into());
                Vec::new()
            }
        };

        if complete {
            self.stale.remove(&context.id);
        } else {
            self.stale.insert(context.id.clone());
        }

        tracing::info!(
            "📥 Loaded context '{}': {} nodes, {} connections",
            context.name,
            nodes.len(),
            connections.len()
        );

        ContextGraph::from_parts(context, nodes, connections)
    }

    pub async fn create_context(&mut self, data: NewContext) -> Result<DialplanContext, EditorError> {
        self.ensure_editable("create context")?;
        let project_id = self.project_id("create context")?;
        let context = self
            .api
            .create_context(&project_id, &data)
            .await
            .map_err(|e| self.fail("create context", e.into()))?;

        self.contexts.push(context.clone());
        self.graphs
            .insert(context.id.clone(), ContextGraph::new(context.clone()));

        tracing::info!("➕ Created context '{}' in project {}", context.name, project_id);
        Ok(context)
    }

    pub async fn update_context(
        &mut self,
        id: &Id,
        data: ContextUpdate,
    ) -> Result<DialplanContext, EditorError> {
        self.ensure_editable("update context")?;
        if !self.contexts.iter().any(|c| &c.id == id) {
            return Err(self.fail("update context", EditorError::ContextNotFound(id.clone())));
        }
        let context = self
            .api
            .update_context(id, &data)
            .await
            .map_err(|e| self.fail("update context", e.into()))?;

        if let Some(slot) = self.contexts.iter_mut().find(|c| &c.id == id) {
            *slot = context.clone();
        }
        if let Some(graph) = self.graphs.get_mut(id) {
            graph.set_context(context.clone());
        }
        Ok(context)
    }

    /// Delete a context; the last context of a project cannot be deleted
    pub async fn delete_context(&mut self, id: &Id) -> Result<(), EditorError> {
        self.ensure_editable("delete context")?;
        if !self.contexts.iter().any(|c| &c.id == id) {
            return Err(self.fail("delete context", EditorError::ContextNotFound(id.clone())));
        }
        if self.contexts.len() <= 1 {
            return Err(self.fail("delete context", EditorError::LastContext(id.clone())));
        }
        self.api
            .delete_context(id)
            .await
            .map_err(|e| self.fail("delete context", e.into()))?;

        self.contexts.retain(|c| &c.id != id);
        self.graphs.remove(id);
        self.stale.remove(id);

        if self.active_context.as_ref() == Some(id) {
            self.active_context = None;
            if let Some(next) = self.contexts.first().map(|c| c.id.clone()) {
                self.select_context(&next).await?;
            }
        }
        Ok(())
    }

    // ---- Nodes ----

    /// Create a node of `node_type_id` in the active context with default properties
    pub async fn create_node(
        &mut self,
        node_type_id: &Id,
        position: Position,
    ) -> Result<DialplanNode, EditorError> {
        self.ensure_editable("create node")?;
        let context_id = self.active_context_id("create node")?;
        let node_type = match self.catalog.get(node_type_id) {
            Some(node_type) => node_type,
            None => {
                return Err(self.fail(
                    "create node",
                    EditorError::UnknownNodeType(node_type_id.clone()),
                ))
            }
        };

        let data = NewNode {
            node_type_id: node_type.id.clone(),
            name: node_type.name.clone(),
            label: node_type.name.clone(),
            position,
            properties: node_type.derive_properties(),
        };
        let node = self
            .api
            .create_node(&context_id, &data)
            .await
            .map_err(|e| self.fail("create node", e.into()))?;

        if let Some(graph) = self.graphs.get_mut(&context_id) {
            graph.upsert_node(node.clone());
        }
        tracing::info!("➕ Created node {} ({}) in context {}", node.id, node_type.name, context_id);
        Ok(node)
    }

    /// Patch a node
    ///
    /// A different `node_type_id` is handled as a type change: properties are
    /// re-derived from the new type, so explicit `properties` in the same update
    /// are rejected. `name`, `label` and `position` given alongside the new type
    /// are applied in the same request.
    pub async fn update_node(
        &mut self,
        node_id: &Id,
        data: NodeUpdate,
    ) -> Result<DialplanNode, EditorError> {
        self.ensure_editable("update node")?;
        let Some(context_id) = self.context_of_node(node_id) else {
            return Err(self.fail("update node", EditorError::NodeNotFound(node_id.clone())));
        };

        if let Some(new_type) = &data.node_type_id {
            let current = self.node(node_id).map(|n| &n.node_type_id);
            if current != Some(new_type) {
                if data.properties.is_some() {
                    return Err(self.fail(
                        "update node",
                        EditorError::PropertiesWithTypeChange(node_id.clone()),
                    ));
                }
                let new_type = new_type.clone();
                return self.retype_node(node_id, &new_type, data).await;
            }
        }

        let node = self
            .api
            .update_node(node_id, &data)
            .await
            .map_err(|e| self.fail("update node", e.into()))?;

        if let Some(graph) = self.graphs.get_mut(&context_id) {
            graph.upsert_node(node.clone());
        }
        tracing::debug!("Updated node {}", node_id);
        Ok(node)
    }

    pub async fn move_node(&mut self, node_id: &Id, position: Position) -> Result<DialplanNode, EditorError> {
        self.update_node(
            node_id,
            NodeUpdate {
                position: Some(position),
                ..NodeUpdate::default()
            },
        )
        .await
    }

    /// Delete a node; returns the connections removed with it
    pub async fn delete_node(&mut self, node_id: &Id) -> Result<Vec<DialplanConnection>, EditorError> {
        self.ensure_editable("delete node")?;
        let Some(context_id) = self.context_of_node(node_id) else {
            return Err(self.fail("delete node", EditorError::NodeNotFound(node_id.clone())));
        };

        self.api
            .delete_node(node_id)
            .await
            .map_err(|e| self.fail("delete node", e.into()))?;

        let removed = self
            .graphs
            .get_mut(&context_id)
            .and_then(|g| g.remove_node(node_id))
            .map(|(_, connections)| connections)
            .unwrap_or_default();
        self.type_changes.cancel(node_id);

        tracing::info!("🗑️ Deleted node {} and {} connections", node_id, removed.len());
        Ok(removed)
    }

    /// Change a node's type
    ///
    /// Properties are replaced by the new type's derived defaults and the
    /// name/label reset to the type name. On success the node returned by the
    /// backend is patched into the cached graph; nothing else is refetched.
    pub async fn change_node_type(
        &mut self,
        node_id: &Id,
        node_type_id: &Id,
    ) -> Result<DialplanNode, EditorError> {
        self.retype_node(node_id, node_type_id, NodeUpdate::default()).await
    }

    /// Type change carrying caller overrides for name, label and position
    async fn retype_node(
        &mut self,
        node_id: &Id,
        node_type_id: &Id,
        overrides: NodeUpdate,
    ) -> Result<DialplanNode, EditorError> {
        self.ensure_editable("change node type")?;
        let Some(context_id) = self.context_of_node(node_id) else {
            return Err(self.fail("change node type", EditorError::NodeNotFound(node_id.clone())));
        };
        let Some(node_type) = self.catalog.get(node_type_id) else {
            return Err(self.fail(
                "change node type",
                EditorError::UnknownNodeType(node_type_id.clone()),
            ));
        };

        if let Err(e) = self.type_changes.begin(node_id, node_type_id) {
            return Err(self.fail("change node type", e));
        }

        let mut update = retype_update(&node_type);
        if overrides.name.is_some() {
            update.name = overrides.name;
        }
        if overrides.label.is_some() {
            update.label = overrides.label;
        }
        update.position = overrides.position;
        match self.api.update_node(node_id, &update).await {
            Ok(node) => {
                self.type_changes.finish(
                    node_id,
                    TypeChangeOutcome::Succeeded {
                        node_type_id: node_type.id.clone(),
                    },
                );
                if let Some(graph) = self.graphs.get_mut(&context_id) {
                    graph.upsert_node(node.clone());
                }
                self.notifier.notify(Notice::success(
                    "Node type changed",
                    format!("Node {} is now '{}'", node_id, node_type.name),
                ));
                Ok(node)
            }
            Err(e) => {
                self.type_changes.finish(
                    node_id,
                    TypeChangeOutcome::Failed {
                        message: e.to_string(),
                    },
                );
                Err(self.fail("change node type", e.into()))
            }
        }
    }

    // ---- Connections ----

    /// Connect two nodes of the active context
    ///
    /// Without an explicit priority the edge goes after the source's existing
    /// outgoing edges.
    pub async fn create_connection(
        &mut self,
        source: &Id,
        target: &Id,
        condition: Option<String>,
        priority: Option<i32>,
    ) -> Result<DialplanConnection, EditorError> {
        self.ensure_editable("create connection")?;
        let context_id = self.active_context_id("create connection")?;

        let priority = {
            let Some(graph) = self.graphs.get(&context_id) else {
                return Err(self.fail("create connection", EditorError::NoActiveContext));
            };
            if let Err(e) = graph.check_endpoints(source, target) {
                return Err(self.fail("create connection", e));
            }
            match (priority, graph.outgoing(source).last()) {
                (Some(priority), _) => priority,
                (None, None) => 0,
                (None, Some(last)) => match last.priority.checked_add(1) {
                    Some(next) => next,
                    None => {
                        return Err(self.fail(
                            "create connection",
                            EditorError::PriorityExhausted(source.clone()),
                        ))
                    }
                },
            }
        };

        let data = NewConnection {
            context_id: context_id.clone(),
            source_node_id: source.clone(),
            target_node_id: target.clone(),
            condition,
            priority,
        };
        let connection = self
            .api
            .create_connection(&data)
            .await
            .map_err(|e| self.fail("create connection", e.into()))?;

        if let Some(graph) = self.graphs.get_mut(&context_id) {
            if let Err(e) = graph.upsert_connection(connection.clone()) {
                tracing::warn!("Backend accepted connection {} but it does not fit the cached graph: {}", connection.id, e);
            }
        }
        tracing::info!(
            "🔗 Connected {} → {} (priority {})",
            connection.source_node_id,
            connection.target_node_id,
            connection.priority
        );
        Ok(connection)
    }

    pub async fn update_connection(
        &mut self,
        id: &Id,
        data: ConnectionUpdate,
    ) -> Result<DialplanConnection, EditorError> {
        self.ensure_editable("update connection")?;
        let Some(context_id) = self.context_of_connection(id) else {
            return Err(self.fail("update connection", EditorError::ConnectionNotFound(id.clone())));
        };
        let connection = self
            .api
            .update_connection(id, &data)
            .await
            .map_err(|e| self.fail("update connection", e.into()))?;

        if let Some(graph) = self.graphs.get_mut(&context_id) {
            if let Err(e) = graph.upsert_connection(connection.clone()) {
                tracing::warn!("Updated connection {} no longer fits the cached graph: {}", id, e);
            }
        }
        Ok(connection)
    }

    pub async fn delete_connection(&mut self, id: &Id) -> Result<(), EditorError> {
        self.ensure_editable("delete connection")?;
        let Some(context_id) = self.context_of_connection(id) else {
            return Err(self.fail("delete connection", EditorError::ConnectionNotFound(id.clone())));
        };
        self.api
            .delete_connection(id)
            .await
            .map_err(|e| self.fail("delete connection", e.into()))?;

        if let Some(graph) = self.graphs.get_mut(&context_id) {
            graph.remove_connection(id);
        }
        Ok(())
    }

    // ---- Validation, generation, deployment ----

    /// Backend validation of the loaded project
    ///
    /// Every reported issue is surfaced as its own notice.
    pub async fn validate(&mut self) -> Result<ValidationResult, EditorError> {
        let project_id = self.project_id("validate project")?;
        if !self.features.validator {
            return Err(self.fail("validate project", EditorError::Unsupported("validation")));
        }

        let result = self
            .api
            .validate_project(&project_id)
            .await
            .map_err(|e| self.fail("validate project", e.into()))?;

        if result.valid {
            self.notifier
                .notify(Notice::success("Dial plan is valid", format!("Project {}", project_id)));
        } else if result.errors.is_empty() {
            self.notifier.notify(Notice::error(
                "Validation failed",
                "The backend reported the dial plan as invalid without details",
            ));
        } else {
            tracing::warn!("Validation of project {} found {} issues", project_id, result.errors.len());
            for issue in &result.errors {
                let level = match issue.severity {
                    Severity::Error => NoticeLevel::Error,
                    Severity::Warning => NoticeLevel::Warning,
                };
                self.notifier
                    .notify(Notice::new(level, "Validation", issue.to_string()));
            }
        }

        self.last_validation = Some(result.clone());
        Ok(result)
    }

    /// Local structural analysis of the active context
    pub fn analyze_active(&self) -> Result<GraphReport, EditorError> {
        let graph = self.active_graph().ok_or(EditorError::NoActiveContext)?;
        Ok(graph.analyze(&self.catalog))
    }

    /// Compile the loaded project into dial-plan text
    pub async fn generate(&self) -> Result<GeneratedDialplan, EditorError> {
        self.ensure_editable("generate dial plan")?;
        let project_id = self.project_id("generate dial plan")?;
        self.api
            .generate_dialplan(&project_id)
            .await
            .map_err(|e| self.fail("generate dial plan", e.into()))
    }

    /// Generate and write `<project-slug>.conf` into `dir`
    pub async fn export_dialplan(&self, dir: &Path) -> Result<PathBuf, EditorError> {
        let dialplan = self.generate().await?;
        let Some(project) = &self.project else {
            return Err(self.fail("export dial plan", EditorError::NoActiveProject));
        };

        let path = write_conf(dir, project, &dialplan)
            .await
            .map_err(|e| self.fail("export dial plan", e.into()))?;
        self.notifier
            .notify(Notice::success("Dial plan exported", path.display().to_string()));
        Ok(path)
    }

    /// Deploy the loaded project; records the new `lastDeployed`
    pub async fn deploy(&mut self) -> Result<DialplanProject, EditorError> {
        self.ensure_editable("deploy project")?;
        let project_id = self.project_id("deploy project")?;
        if !self.features.deployment {
            return Err(self.fail("deploy project", EditorError::Unsupported("deployment")));
        }

        let project = self
            .api
            .deploy_project(&project_id)
            .await
            .map_err(|e| self.fail("deploy project", e.into()))?;

        self.notifier
            .notify(Notice::success("Dial plan deployed", project.name.clone()));
        self.project = Some(project.clone());
        Ok(project)
    }
}
