//! Output types for front-end consumption.
//!
//! These structs are serialized to JSON and handed to whatever draws the
//! tree. Positions are final; the consumer does no geometry of its own.

use serde::Serialize;

use crate::error::{LayoutError, Result};
use crate::layout::{compute_layout, Bounds, LayoutConfig, TreeLayout};
use crate::tree::{compile_str, TopicTree};

/// A placed node ready to draw
#[derive(Debug, Clone, Serialize)]
pub struct NodeOutput {
    pub id: String,
    /// Cluster label
    pub cluster: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// A connector between a parent and a child
#[derive(Debug, Clone, Serialize)]
pub struct EdgeOutput {
    pub from: String,
    pub to: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub cross_cluster: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    /// Machine-readable error kind, e.g. "malformed_tree"
    pub kind: String,
    pub message: String,
}

impl From<&LayoutError> for ErrorInfo {
    fn from(e: &LayoutError) -> Self {
        ErrorInfo { kind: e.kind().to_string(), message: e.to_string() }
    }
}

/// The combined output sent to the front end
#[derive(Debug, Clone, Serialize)]
pub struct LayoutOutput {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<EdgeOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    pub line_width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl LayoutOutput {
    pub fn from_layout(tree: &TopicTree, layout: &TreeLayout, cfg: &LayoutConfig) -> Self {
        let name = |nid| tree.node(nid).map(|n| n.name.clone()).unwrap_or_default();

        let nodes = layout
            .iter()
            .map(|n| NodeOutput {
                id: name(n.node),
                cluster: tree.cluster_label(n.cluster).unwrap_or_default().to_string(),
                x: n.position.x,
                y: n.position.y,
                radius: n.radius,
                depth: n.depth,
                parent: n.parent.map(&name),
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|e| EdgeOutput {
                from: e.from_name.clone(),
                to: e.to_name.clone(),
                x1: e.start.x,
                y1: e.start.y,
                x2: e.end.x,
                y2: e.end.y,
                cross_cluster: e.cross_cluster,
            })
            .collect();

        LayoutOutput {
            nodes,
            edges,
            bounds: layout.bounds(),
            line_width: cfg.line_width,
            error: None,
        }
    }

    pub fn from_error(e: &LayoutError) -> Self {
        LayoutOutput {
            nodes: vec![],
            edges: vec![],
            bounds: None,
            line_width: 0.0,
            error: Some(e.into()),
        }
    }
}

/// Parse a JSON config; an empty string means the default config.
pub fn parse_config(config: &str) -> Result<LayoutConfig> {
    if config.trim().is_empty() {
        return Ok(LayoutConfig::default());
    }
    Ok(serde_json::from_str(config)?)
}

/// Compile a topic document and lay it out.
pub fn load(document: &str, config: &str) -> Result<(TopicTree, LayoutConfig, TreeLayout)> {
    let cfg = parse_config(config)?;
    let tree = compile_str(document)?;
    let layout = compute_layout(&tree, &cfg)?;
    Ok((tree, cfg, layout))
}

pub fn layout_document(document: &str, config: &str) -> Result<LayoutOutput> {
    let (tree, cfg, layout) = load(document, config)?;
    Ok(LayoutOutput::from_layout(&tree, &layout, &cfg))
}
