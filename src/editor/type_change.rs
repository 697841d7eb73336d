//! Node type change reconciliation
//!
//! Per node: `Idle → Updating → Idle`, with the outcome of the last attempt
//! recorded. Changing a node's type discards its previous properties; the new
//! bag is derived from the target type's schema and the name/label are reset to
//! the type name.

use crate::dialplan::types::{Id, NodeType, NodeUpdate};
use crate::error::EditorError;
use std::collections::HashMap;

/// Where a node is in the type change flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeChangeState {
    Idle,
    Updating { target: Id },
}

/// Result of the last finished type change of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeChangeOutcome {
    Succeeded { node_type_id: Id },
    Failed { message: String },
}

/// Tracks type changes for every node of a session
///
/// A node may have one change in flight at a time; a second request for the
/// same node is refused until the first one finishes or is cancelled.
#[derive(Debug, Default)]
pub struct TypeChangeTracker {
    /// Pending requests
    /// Key: node id, Value: node type id being applied
    in_flight: HashMap<Id, Id>,

    /// Last finished change per node
    outcomes: HashMap<Id, TypeChangeOutcome>,
}

impl TypeChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, node_id: &Id) -> TypeChangeState {
        match self.in_flight.get(node_id) {
            Some(target) => TypeChangeState::Updating { target: target.clone() },
            None => TypeChangeState::Idle,
        }
    }

    pub fn outcome(&self, node_id: &Id) -> Option<&TypeChangeOutcome> {
        self.outcomes.get(node_id)
    }

    /// Idle → Updating; rejected while a change for the node is in flight
    pub fn begin(&mut self, node_id: &Id, target: &Id) -> Result<(), EditorError> {
        if self.in_flight.contains_key(node_id) {
            return Err(EditorError::TypeChangeInProgress(node_id.clone()));
        }
        self.in_flight.insert(node_id.clone(), target.clone());
        Ok(())
    }

    /// Updating → Idle, recording the outcome
    pub fn finish(&mut self, node_id: &Id, outcome: TypeChangeOutcome) {
        self.in_flight.remove(node_id);
        self.outcomes.insert(node_id.clone(), outcome);
    }

    /// Drop an abandoned in-flight change without recording an outcome
    pub fn cancel(&mut self, node_id: &Id) -> bool {
        self.in_flight.remove(node_id).is_some()
    }
}

/// Update that retypes a node: fresh properties, name and label from the type
pub fn retype_update(node_type: &NodeType) -> NodeUpdate {
    NodeUpdate {
        node_type_id: Some(node_type.id.clone()),
        name: Some(node_type.name.clone()),
        label: Some(node_type.name.clone()),
        position: None,
        properties: Some(node_type.derive_properties()),
    }
}
