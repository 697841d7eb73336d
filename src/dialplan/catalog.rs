//! Node type catalog using ArcSwap
//!
//! The catalog is reference data fetched once per editor session. Readers take a
//! lock-free snapshot; a reload swaps the whole map atomically.

use crate::dialplan::types::{Id, NodeCategory, NodeType, NodeTypeSchema};
use arc_swap::ArcSwap;
use std::{collections::HashMap, sync::Arc};

/// Lock-free node type catalog
///
/// Uses ArcSwap so a capability refresh replaces every type in one pointer swap.
/// Lookups never block and never observe a half-loaded catalog. The catalog is
/// the single source of truth for default derivation and type changes.
#[derive(Debug)]
pub struct NodeTypeCatalog {
    /// Thread-safe atomic pointer to the type map
    /// Key: node type id, Value: decoded node type with its schema
    types: ArcSwap<HashMap<Id, NodeType>>,
}

impl Default for NodeTypeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTypeCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            types: ArcSwap::new(Arc::new(HashMap::new())),
        }
    }

    /// Build a catalog from a fetched type list
    pub fn from_types(types: Vec<NodeType>) -> Self {
        let catalog = Self::new();
        catalog.replace(types);
        catalog
    }

    /// Replace the whole catalog
    ///
    /// Parameter definitions that break the select-default invariant are kept
    /// but logged, since the backend owns this data.
    pub fn replace(&self, types: Vec<NodeType>) {
        let mut map = HashMap::with_capacity(types.len());

        for node_type in types {
            if let NodeTypeSchema::Params(params) = &node_type.schema {
                for param in params {
                    if let Err(e) = param.check() {
                        tracing::warn!("⚠️ Node type '{}' has an inconsistent parameter: {}", node_type.name, e);
                    }
                }
            }
            map.insert(node_type.id.clone(), node_type);
        }

        self.types.store(Arc::new(map));

        tracing::info!("Loaded node type catalog with {} types", self.types.load().len());
    }

    /// Get a node type by id (lock-free read)
    pub fn get(&self, id: &Id) -> Option<NodeType> {
        self.types.load().get(id).cloned()
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.types.load().contains_key(id)
    }

    /// All node types ordered by category, then name
    pub fn list(&self) -> Vec<NodeType> {
        let mut types: Vec<NodeType> = self.types.load().values().cloned().collect();
        types.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        types
    }

    /// Node types of one category, ordered by name
    pub fn by_category(&self, category: NodeCategory) -> Vec<NodeType> {
        self.list()
            .into_iter()
            .filter(|t| t.category == category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.types.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.load().is_empty()
    }
}
