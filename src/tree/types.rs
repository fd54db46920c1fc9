use std::collections::HashMap;

use serde::Serialize;

use crate::error::{LayoutError, Result};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

/// Opaque cluster identifier. Equality is the only meaningful operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ClusterId(pub(crate) usize);

#[derive(Debug, Clone)]
pub struct TopicNode {
    pub nid: NodeId,
    /// Unique within a tree; used for labels only.
    pub name: String,
    pub cluster: ClusterId,
    /// Ordered; order decides angular placement.
    pub children: Vec<NodeId>,
    /// Per-node radius override (only read by the `per_node` radius policy).
    pub radius: Option<f64>,
}

/// Arena of topic nodes.
///
/// Children are stored as ids, so an arena can describe shared children or
/// cycles. Layout validates the structure before using it.
#[derive(Debug, Clone, Default)]
pub struct TopicTree {
    pub root: Option<NodeId>,
    pub nodes: Vec<TopicNode>,
    cluster_labels: Vec<String>,
    cluster_by_label: HashMap<String, ClusterId>,
}

impl TopicTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Intern a cluster label, returning the same id for equal labels.
    pub fn cluster(&mut self, label: &str) -> ClusterId {
        if let Some(&cid) = self.cluster_by_label.get(label) {
            return cid;
        }
        let cid = ClusterId(self.cluster_labels.len());
        self.cluster_labels.push(label.to_string());
        self.cluster_by_label.insert(label.to_string(), cid);
        cid
    }

    pub fn cluster_label(&self, cid: ClusterId) -> Option<&str> {
        self.cluster_labels.get(cid.0).map(String::as_str)
    }

    pub fn add_node(&mut self, name: impl Into<String>, cluster: ClusterId) -> NodeId {
        let nid = NodeId(self.nodes.len());
        self.nodes.push(TopicNode {
            nid,
            name: name.into(),
            cluster,
            children: Vec::new(),
            radius: None,
        });
        nid
    }

    /// Add a node that is its own cluster (cluster label = node name).
    pub fn add_topic(&mut self, name: &str) -> NodeId {
        let cluster = self.cluster(name);
        self.add_node(name, cluster)
    }

    /// Append `child` to `parent`'s children. The child id is not checked
    /// here; dangling ids are reported when the tree is validated.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let node = self.nodes.get_mut(parent.0).ok_or_else(|| LayoutError::MalformedTree {
            node: parent,
            reason: "parent is not part of the tree".to_string(),
        })?;
        node.children.push(child);
        Ok(())
    }

    pub fn set_radius(&mut self, nid: NodeId, radius: f64) -> Result<()> {
        let node = self.nodes.get_mut(nid.0).ok_or_else(|| LayoutError::MalformedTree {
            node: nid,
            reason: "node is not part of the tree".to_string(),
        })?;
        node.radius = Some(radius);
        Ok(())
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn node(&self, nid: NodeId) -> Option<&TopicNode> {
        self.nodes.get(nid.0)
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.name == name).map(|n| n.nid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_interning() {
        let mut tree = TopicTree::new();
        let a = tree.cluster("bio");
        let b = tree.cluster("bio");
        let c = tree.cluster("tech");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(tree.cluster_label(c), Some("tech"));
    }

    #[test]
    fn test_add_topic_is_own_cluster() {
        let mut tree = TopicTree::new();
        let a = tree.add_topic("A");
        let explicit = tree.cluster("A");
        assert_eq!(tree.node(a).unwrap().cluster, explicit);
    }

    #[test]
    fn test_add_child_preserves_order() {
        let mut tree = TopicTree::new();
        let root = tree.add_topic("root");
        let kids: Vec<NodeId> = ["x", "y", "z"].iter().map(|n| tree.add_topic(n)).collect();
        for &k in &kids {
            tree.add_child(root, k).unwrap();
        }
        assert_eq!(tree.node(root).unwrap().children, kids);
    }

    #[test]
    fn test_add_child_unknown_parent() {
        let mut tree = TopicTree::new();
        let err = tree.add_child(NodeId(3), NodeId(0)).unwrap_err();
        assert!(matches!(err, LayoutError::MalformedTree { node: NodeId(3), .. }));
    }
}
