//! Whole-document snapshots for undo/redo.
//!
//! A snapshot is the MessagePack encoding of the scene tree in document
//! order. Two scenes with the same items, styles and paint order encode to
//! the same bytes; the selection flag is not encoded.

use crate::model::{SceneGraph, SceneNode};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

#[derive(Serialize)]
struct NodeRef<'a> {
    node: &'a SceneNode,
    children: Vec<NodeRef<'a>>,
}

#[derive(Deserialize)]
struct OwnedNode {
    node: SceneNode,
    children: Vec<OwnedNode>,
}

/// Opaque serialized scene state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(Vec<u8>);

impl Snapshot {
    /// Serialize every item under the root.
    pub fn capture(graph: &SceneGraph) -> Result<Self, SnapshotError> {
        let tree: Vec<NodeRef<'_>> = graph
            .children(graph.root)
            .iter()
            .map(|idx| borrow_tree(graph, *idx))
            .collect();
        Ok(Self(rmp_serde::to_vec_named(&tree)?))
    }

    /// Rebuild a scene graph from this snapshot.
    pub fn restore(&self) -> Result<SceneGraph, SnapshotError> {
        let tree: Vec<OwnedNode> = rmp_serde::from_slice(&self.0)?;
        let mut graph = SceneGraph::new();
        let root = graph.root;
        for node in tree {
            rebuild(&mut graph, root, node);
        }
        Ok(graph)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn borrow_tree(graph: &SceneGraph, idx: NodeIndex) -> NodeRef<'_> {
    NodeRef {
        node: &graph.graph[idx],
        children: graph
            .children(idx)
            .iter()
            .map(|child| borrow_tree(graph, *child))
            .collect(),
    }
}

fn rebuild(graph: &mut SceneGraph, parent: NodeIndex, owned: OwnedNode) {
    let idx = graph.add_node(parent, owned.node);
    for child in owned.children {
        rebuild(graph, idx, child);
    }
}
