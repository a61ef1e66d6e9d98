//! Selection set over scene items.
//!
//! Membership is tracked by `NodeId`, which survives snapshot restores.
//! Order is insertion order and is what the host sees when it asks for
//! selected ids.

use smallvec::SmallVec;
use vg_core::{NodeId, SceneGraph};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    items: SmallVec<[NodeId; 4]>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.items.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<NodeId> {
        self.items.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.items.iter().copied()
    }

    /// Add `id` if absent. Returns true if membership changed.
    pub fn insert(&mut self, id: NodeId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.items.push(id);
        true
    }

    /// Remove `id` if present. Returns true if membership changed.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| *item != id);
        self.items.len() != before
    }

    /// Returns true if the set was non-empty.
    pub fn clear(&mut self) -> bool {
        let changed = !self.items.is_empty();
        self.items.clear();
        changed
    }

    /// Replace the contents. Returns true if membership changed.
    pub fn replace(&mut self, ids: impl IntoIterator<Item = NodeId>) -> bool {
        let mut next: SmallVec<[NodeId; 4]> = SmallVec::new();
        for id in ids {
            if !next.contains(&id) {
                next.push(id);
            }
        }
        let changed = next.len() != self.items.len() || next.iter().any(|id| !self.contains(*id));
        self.items = next;
        changed
    }

    /// Drop ids that no longer exist in `graph`. Returns true if any were dropped.
    pub fn prune(&mut self, graph: &SceneGraph) -> bool {
        let before = self.items.len();
        self.items.retain(|id| graph.contains(*id));
        self.items.len() != before
    }

    /// Mirror membership onto the items' `selected` flags.
    pub fn sync_flags(&self, graph: &mut SceneGraph) {
        for idx in graph.walk() {
            let node = &mut graph.graph[idx];
            node.selected = self.items.contains(&node.id);
        }
    }

    /// Host-facing identifiers: the explicit name, or `item_<position>`.
    pub fn host_ids(&self, graph: &SceneGraph) -> Vec<String> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, id)| {
                graph
                    .get_by_id(*id)
                    .and_then(|node| node.name.clone())
                    .unwrap_or_else(|| format!("item_{i}"))
            })
            .collect()
    }
}
