//
// Compile step: TopicDocument (name-referenced JSON) -> TopicTree (arena)
//
// What this does:
// - Declares every node first, enforcing unique names
// - Interns cluster labels; a node without a cluster label is its own cluster
// - Resolves child and root references from names to NodeIds
// - Keeps declaration order and child order exactly as written
//
// Structural checks (shared children, cycles) are left to `validate`, so a
// document can describe a malformed tree and still compile.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{LayoutError, Result};
use crate::tree::{NodeId, TopicTree};

#[derive(Debug, Clone, Deserialize)]
pub struct TopicDocument {
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub nodes: Vec<TopicDecl>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicDecl {
    pub name: String,
    /// Cluster label; defaults to the node's own name.
    #[serde(default)]
    pub cluster: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default)]
    pub radius: Option<f64>,
}

pub fn parse_document(input: &str) -> Result<TopicDocument> {
    Ok(serde_json::from_str(input)?)
}

pub fn compile(doc: &TopicDocument) -> Result<TopicTree> {
    let mut tree = TopicTree::new();
    let mut by_name: HashMap<&str, NodeId> = HashMap::new();

    for decl in &doc.nodes {
        if by_name.contains_key(decl.name.as_str()) {
            return Err(LayoutError::DuplicateName(decl.name.clone()));
        }
        let label = decl.cluster.as_deref().unwrap_or(decl.name.as_str());
        let cluster = tree.cluster(label);
        let nid = tree.add_node(decl.name.clone(), cluster);
        if let Some(r) = decl.radius {
            tree.set_radius(nid, r)?;
        }
        by_name.insert(decl.name.as_str(), nid);
    }

    for decl in &doc.nodes {
        let parent = by_name[decl.name.as_str()];
        for child in &decl.children {
            let cid = *by_name
                .get(child.as_str())
                .ok_or_else(|| LayoutError::UnknownNode(child.clone()))?;
            tree.add_child(parent, cid)?;
        }
    }

    let root_name = doc.root.as_deref().ok_or(LayoutError::MissingRoot)?;
    let root = *by_name
        .get(root_name)
        .ok_or_else(|| LayoutError::UnknownNode(root_name.to_string()))?;
    tree.set_root(root);

    Ok(tree)
}

/// Parse and compile in one step.
pub fn compile_str(input: &str) -> Result<TopicTree> {
    compile(&parse_document(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_resolves_children_and_clusters() {
        let tree = compile_str(
            r#"{
                "root": "A",
                "nodes": [
                    { "name": "A", "children": ["B", "C"] },
                    { "name": "B", "cluster": "A" },
                    { "name": "C", "cluster": "X", "radius": 12.5 }
                ]
            }"#,
        )
        .unwrap();

        let a = tree.find("A").unwrap();
        let b = tree.find("B").unwrap();
        let c = tree.find("C").unwrap();
        assert_eq!(tree.root, Some(a));
        assert_eq!(tree.node(a).unwrap().children, vec![b, c]);
        assert_eq!(tree.node(a).unwrap().cluster, tree.node(b).unwrap().cluster);
        assert_ne!(tree.node(a).unwrap().cluster, tree.node(c).unwrap().cluster);
        assert_eq!(tree.node(c).unwrap().radius, Some(12.5));
    }

    #[test]
    fn test_compile_duplicate_name() {
        let err = compile_str(r#"{ "root": "A", "nodes": [ { "name": "A" }, { "name": "A" } ] }"#)
            .unwrap_err();
        assert!(matches!(err, LayoutError::DuplicateName(ref n) if n == "A"));
    }

    #[test]
    fn test_compile_unknown_child() {
        let err = compile_str(r#"{ "root": "A", "nodes": [ { "name": "A", "children": ["Z"] } ] }"#)
            .unwrap_err();
        assert!(matches!(err, LayoutError::UnknownNode(ref n) if n == "Z"));
    }

    #[test]
    fn test_compile_missing_root() {
        let err = compile_str(r#"{ "nodes": [ { "name": "A" } ] }"#).unwrap_err();
        assert!(matches!(err, LayoutError::MissingRoot));

        let err = compile_str(r#"{ "root": "Q", "nodes": [ { "name": "A" } ] }"#).unwrap_err();
        assert!(matches!(err, LayoutError::UnknownNode(ref n) if n == "Q"));
    }

    #[test]
    fn test_compile_bad_json() {
        let err = compile_str("{ not json").unwrap_err();
        assert!(matches!(err, LayoutError::Document(_)));
    }

    #[test]
    fn test_compile_accepts_shared_child() {
        // Structural problems are the validator's job.
        let tree = compile_str(
            r#"{ "root": "A", "nodes": [
                { "name": "A", "children": ["B", "C"] },
                { "name": "B", "children": ["C"] },
                { "name": "C" }
            ] }"#,
        )
        .unwrap();
        assert_eq!(tree.len(), 3);
    }
}
