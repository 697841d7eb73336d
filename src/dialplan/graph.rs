//! In-memory context graph
//!
//! Nodes and connections of one context are kept in flat maps keyed by id, so a
//! single node or edge can be patched without rebuilding anything else. For
//! structural analysis the maps are projected into a petgraph `DiGraph`.

use crate::dialplan::catalog::NodeTypeCatalog;
use crate::dialplan::types::{
    DialplanConnection, DialplanContext, DialplanNode, Id, NodeCategory, ValidationIssue,
};
use crate::error::EditorError;
use crate::schema::ConfigIssue;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use petgraph::Direction;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Cached nodes and connections of a single context
///
/// Holds what the backend last returned for one context and nothing more.
/// Ordered maps keep iteration stable so exports and reports are reproducible.
/// Structural analysis builds a petgraph view on demand instead of keeping one.
#[derive(Debug, Clone)]
pub struct ContextGraph {
    /// Context metadata (name, position, description)
    context: DialplanContext,

    /// Nodes placed in this context
    /// Key: node id, Value: node as last returned by the backend
    nodes: BTreeMap<Id, DialplanNode>,

    /// Connections between nodes of this context
    /// Both endpoints are always present in `nodes`
    connections: BTreeMap<Id, DialplanConnection>,
}

/// Findings of a local structural pass over a context
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphReport {
    /// Nodes execution can start from
    pub entry_nodes: Vec<Id>,
    /// Nodes no entry node leads to
    pub unreachable_nodes: Vec<Id>,
    /// Connections whose source or target is not in the context
    pub dangling_connections: Vec<Id>,
    /// Terminal nodes that still have outgoing connections
    pub terminal_with_outgoing: Vec<Id>,
    /// Nodes whose type is not in the catalog
    pub unknown_node_types: Vec<Id>,
    /// Property problems per node (unknown keys are not reported)
    pub property_issues: Vec<(Id, Vec<ConfigIssue>)>,
}

impl GraphReport {
    pub fn is_clean(&self) -> bool {
        self.unreachable_nodes.is_empty()
            && self.dangling_connections.is_empty()
            && self.terminal_with_outgoing.is_empty()
            && self.unknown_node_types.is_empty()
            && self.property_issues.is_empty()
    }

    /// Findings as validation issues, in the same shape the backend reports
    pub fn issues(&self, context_id: &Id) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for id in &self.dangling_connections {
            issues.push(
                ValidationIssue::error(format!("Connection {} references a missing node", id))
                    .in_context(context_id),
            );
        }
        for id in &self.unknown_node_types {
            issues.push(ValidationIssue::error("Node has an unknown type").on_node(id).in_context(context_id));
        }
        for (id, problems) in &self.property_issues {
            for problem in problems {
                issues.push(ValidationIssue::error(problem.to_string()).on_node(id).in_context(context_id));
            }
        }
        for id in &self.terminal_with_outgoing {
            issues.push(
                ValidationIssue::warning("Terminal node has outgoing connections")
                    .on_node(id)
                    .in_context(context_id),
            );
        }
        for id in &self.unreachable_nodes {
            issues.push(ValidationIssue::warning("Node is unreachable").on_node(id).in_context(context_id));
        }

        issues
    }
}

impl ContextGraph {
    /// Empty graph for a context
    pub fn new(context: DialplanContext) -> Self {
        Self {
            context,
            nodes: BTreeMap::new(),
            connections: BTreeMap::new(),
        }
    }

    /// Graph from fetched nodes and connections
    ///
    /// Connections are taken as the backend returned them; ones pointing outside
    /// the context show up in `analyze()`.
    pub fn from_parts(
        context: DialplanContext,
        nodes: Vec<DialplanNode>,
        connections: Vec<DialplanConnection>,
    ) -> Self {
        Self {
            context,
            nodes: nodes.into_iter().map(|n| (n.id.clone(), n)).collect(),
            connections: connections.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    pub fn context(&self) -> &DialplanContext {
        &self.context
    }

    pub fn set_context(&mut self, context: DialplanContext) {
        self.context = context;
    }

    pub fn node(&self, id: &Id) -> Option<&DialplanNode> {
        self.nodes.get(id)
    }

    pub fn connection(&self, id: &Id) -> Option<&DialplanConnection> {
        self.connections.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &DialplanNode> {
        self.nodes.values()
    }

    pub fn connections(&self) -> impl Iterator<Item = &DialplanConnection> {
        self.connections.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Insert or replace a node, returning the previous version
    pub fn upsert_node(&mut self, node: DialplanNode) -> Option<DialplanNode> {
        if node.context_id != self.context.id {
            tracing::warn!(
                "Node {} claims context {} but is cached under {}",
                node.id,
                node.context_id,
                self.context.id
            );
        }
        self.nodes.insert(node.id.clone(), node)
    }

    /// Remove a node and every connection that starts or ends at it
    pub fn remove_node(&mut self, id: &Id) -> Option<(DialplanNode, Vec<DialplanConnection>)> {
        let node = self.nodes.remove(id)?;

        let doomed: Vec<Id> = self
            .connections
            .values()
            .filter(|c| c.touches(id))
            .map(|c| c.id.clone())
            .collect();
        let removed = doomed
            .iter()
            .filter_map(|cid| self.connections.remove(cid))
            .collect();

        Some((node, removed))
    }

    /// Both endpoints must be nodes of this context
    pub fn check_endpoints(&self, source: &Id, target: &Id) -> Result<(), EditorError> {
        if self.nodes.contains_key(source) && self.nodes.contains_key(target) {
            Ok(())
        } else {
            Err(EditorError::CrossContext {
                source_node: source.clone(),
                target_node: target.clone(),
            })
        }
    }

    /// Insert or replace a connection after checking its endpoints
    pub fn upsert_connection(
        &mut self,
        connection: DialplanConnection,
    ) -> Result<Option<DialplanConnection>, EditorError> {
        self.check_endpoints(&connection.source_node_id, &connection.target_node_id)?;
        Ok(self.connections.insert(connection.id.clone(), connection))
    }

    pub fn remove_connection(&mut self, id: &Id) -> Option<DialplanConnection> {
        self.connections.remove(id)
    }

    /// Outgoing connections of a node in evaluation order (priority, then id)
    pub fn outgoing(&self, node_id: &Id) -> Vec<&DialplanConnection> {
        let mut edges: Vec<&DialplanConnection> = self
            .connections
            .values()
            .filter(|c| &c.source_node_id == node_id)
            .collect();
        edges.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.id.cmp(&b.id)));
        edges
    }

    pub fn incoming(&self, node_id: &Id) -> Vec<&DialplanConnection> {
        self.connections
            .values()
            .filter(|c| &c.target_node_id == node_id)
            .collect()
    }

    /// Local structural pass: entry points, reachability, dangling edges,
    /// terminal misuse and missing required properties
    pub fn analyze(&self, catalog: &NodeTypeCatalog) -> GraphReport {
        let mut report = GraphReport::default();

        // Project the maps into a petgraph DiGraph
        let mut graph: DiGraph<Id, Id> = DiGraph::with_capacity(self.nodes.len(), self.connections.len());
        let mut index: HashMap<Id, NodeIndex> = HashMap::with_capacity(self.nodes.len());
        for id in self.nodes.keys() {
            index.insert(id.clone(), graph.add_node(id.clone()));
        }
        for connection in self.connections.values() {
            match (
                index.get(&connection.source_node_id),
                index.get(&connection.target_node_id),
            ) {
                (Some(&source), Some(&target)) => {
                    graph.add_edge(source, target, connection.id.clone());
                }
                _ => report.dangling_connections.push(connection.id.clone()),
            }
        }

        // Extension nodes are the entry points; without any, fall back to roots
        report.entry_nodes = self
            .nodes
            .values()
            .filter(|n| {
                catalog.get(&n.node_type_id).map(|t| t.category) == Some(NodeCategory::Extension)
            })
            .map(|n| n.id.clone())
            .collect();
        if report.entry_nodes.is_empty() {
            report.entry_nodes = self
                .nodes
                .keys()
                .filter(|id| {
                    graph
                        .neighbors_directed(index[*id], Direction::Incoming)
                        .next()
                        .is_none()
                })
                .cloned()
                .collect();
        }

        let mut reached: HashSet<NodeIndex> = HashSet::new();
        for entry in &report.entry_nodes {
            let mut dfs = Dfs::new(&graph, index[entry]);
            while let Some(nx) = dfs.next(&graph) {
                reached.insert(nx);
            }
        }
        report.unreachable_nodes = self
            .nodes
            .keys()
            .filter(|id| !reached.contains(&index[*id]))
            .cloned()
            .collect();

        for node in self.nodes.values() {
            let Some(node_type) = catalog.get(&node.node_type_id) else {
                report.unknown_node_types.push(node.id.clone());
                continue;
            };

            let has_outgoing = graph
                .neighbors_directed(index[&node.id], Direction::Outgoing)
                .next()
                .is_some();
            if node_type.is_terminal() && has_outgoing {
                report.terminal_with_outgoing.push(node.id.clone());
            }

            let problems: Vec<ConfigIssue> = node_type
                .schema
                .check(&node.properties)
                .into_iter()
                .filter(|i| !matches!(i, ConfigIssue::UnknownField { .. }))
                .collect();
            if !problems.is_empty() {
                report.property_issues.push((node.id.clone(), problems));
            }
        }

        tracing::debug!(
            "🔍 Analyzed context '{}': {} nodes, {} connections, clean={}",
            self.context.name,
            self.nodes.len(),
            self.connections.len(),
            report.is_clean()
        );

        report
    }
}
