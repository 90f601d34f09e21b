//! In-memory location hierarchy.
//!
//! The tree is built from flat parent-pointer records and keeps an index
//! from parent id to child ids. Children are ordered by title compared
//! case-insensitively, then by exact title, then by id, so every traversal
//! is deterministic.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::location::LocationType;

/// The columns of a location that the hierarchy needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeLocation {
    pub id: String,
    pub title: String,
    pub location_type: LocationType,
    pub parent_id: Option<String>,
}

impl TreeLocation {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        location_type: LocationType,
        parent_id: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            location_type,
            parent_id: parent_id.map(str::to_string),
        }
    }
}

/// Structural problems found while building a [`LocationTree`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("Duplicate location id '{0}'")]
    DuplicateId(String),

    #[error("Location '{child}' references missing parent '{parent}'")]
    UnknownParent { child: String, parent: String },

    #[error("Location '{0}' is part of a parent cycle")]
    Cycle(String),
}

/// Parent-pointer tree with a parent → ordered children index.
#[derive(Debug, Default)]
pub struct LocationTree {
    nodes: HashMap<String, TreeLocation>,
    children: HashMap<String, Vec<String>>,
}

impl LocationTree {
    /// Build the tree, rejecting duplicate ids, dangling parents and cycles.
    pub fn from_locations<I>(locations: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = TreeLocation>,
    {
        let mut nodes: HashMap<String, TreeLocation> = HashMap::new();
        for location in locations {
            if nodes.contains_key(&location.id) {
                return Err(TreeError::DuplicateId(location.id));
            }
            nodes.insert(location.id.clone(), location);
        }

        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        for node in nodes.values() {
            if let Some(parent) = &node.parent_id {
                if !nodes.contains_key(parent) {
                    return Err(TreeError::UnknownParent {
                        child: node.id.clone(),
                        parent: parent.clone(),
                    });
                }
                children
                    .entry(parent.clone())
                    .or_default()
                    .push(node.id.clone());
            }
        }

        detect_cycles(&nodes)?;

        for ids in children.values_mut() {
            ids.sort_by(|a, b| match (nodes.get(a), nodes.get(b)) {
                (Some(x), Some(y)) => title_order(x, y),
                _ => a.cmp(b),
            });
        }

        Ok(Self { nodes, children })
    }

    pub fn get(&self, id: &str) -> Option<&TreeLocation> {
        self.nodes.get(id)
    }

    /// Direct children of `id`, ordered by title. Empty for unknown ids.
    pub fn children(&self, id: &str) -> impl Iterator<Item = &TreeLocation> {
        self.children
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|child| self.nodes.get(child))
    }

    pub fn child_count(&self, id: &str) -> usize {
        self.children.get(id).map_or(0, Vec::len)
    }

    /// Every location of the given type, wherever it sits, ordered by title.
    pub fn of_type(&self, location_type: LocationType) -> Vec<&TreeLocation> {
        let mut matching: Vec<&TreeLocation> = self
            .nodes
            .values()
            .filter(|node| node.location_type == location_type)
            .collect();
        matching.sort_by(|a, b| title_order(a, b));
        matching
    }

    /// 1 for a root, 2 for its children, and so on. `None` for unknown ids.
    pub fn depth_of(&self, id: &str) -> Option<usize> {
        let mut node = self.nodes.get(id)?;
        let mut depth = 1;
        while let Some(parent) = node.parent_id.as_deref().and_then(|p| self.nodes.get(p)) {
            depth += 1;
            node = parent;
        }
        Some(depth)
    }

    /// Whether re-parenting `id` under `new_parent` would close a cycle.
    ///
    /// True when `new_parent` is `id` itself or one of its descendants.
    pub fn would_create_cycle(&self, id: &str, new_parent: &str) -> bool {
        let mut cursor = Some(new_parent);
        let mut steps = 0;
        while let Some(current) = cursor {
            if current == id {
                return true;
            }
            steps += 1;
            if steps > self.nodes.len() {
                return true;
            }
            cursor = self
                .nodes
                .get(current)
                .and_then(|node| node.parent_id.as_deref());
        }
        false
    }
}

/// Case-insensitive title, then exact title, then id.
fn title_order(a: &TreeLocation, b: &TreeLocation) -> Ordering {
    a.title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.id.cmp(&b.id))
}

/// Walk each parent chain once; a node revisited on the current walk closes a cycle.
fn detect_cycles(nodes: &HashMap<String, TreeLocation>) -> Result<(), TreeError> {
    let mut acyclic: HashSet<&str> = HashSet::new();

    for start in nodes.keys() {
        let mut on_path: HashSet<&str> = HashSet::new();
        let mut cursor = Some(start.as_str());

        while let Some(id) = cursor {
            if acyclic.contains(id) {
                break;
            }
            if !on_path.insert(id) {
                return Err(TreeError::Cycle(id.to_string()));
            }
            cursor = nodes.get(id).and_then(|n| n.parent_id.as_deref());
        }

        acyclic.extend(on_path);
    }

    Ok(())
}
