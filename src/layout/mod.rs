// Radial topic-tree layouter.
//
// Goals:
// - Deterministic: no randomness, single top-down pass, no relaxation
// - Pure: returns data (node placements + edge segments), draws nothing
// - Cluster-aware: children in a different cluster than their parent sit on
//   longer branches inside a narrow arc around the parent's direction
//
// Submodules:
// - angles: start angle + step for a group of children
// - edges: segment endpoints between a parent and a child glyph
// - radial: the recursive pass itself
//
// Output:
// - TreeLayout with one NodeLayout per node and one EdgeSegment per edge.

use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, PI};
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LayoutError, Result};
use crate::tree::{validate, ClusterId, NodeId, TopicTree};

pub mod angles;
mod edges;
mod radial;

pub use angles::{AngleAllocation, AnglePolicy, ChildGroup, PlacedFan};

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector of length `len` pointing along `angle`.
    pub fn polar(angle: f64, len: f64) -> Self {
        Self { x: len * angle.cos(), y: len * angle.sin() }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (*self - other).length()
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Direction from `from` to `self`, in radians.
    pub fn angle_from(&self, from: Point) -> f64 {
        (self.y - from.y).atan2(self.x - from.x)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point { x: self.x * rhs, y: self.y * rhs }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub(crate) fn around(center: Point, radius: f64) -> Self {
        Bounds {
            min_x: center.x - radius,
            min_y: center.y - radius,
            max_x: center.x + radius,
            max_y: center.y + radius,
        }
    }

    pub(crate) fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// How each node's glyph radius is chosen.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadiusPolicy {
    /// `node_radius` for every node.
    #[default]
    Fixed,
    /// The node's own radius when it has one, else `node_radius`.
    PerNode,
    /// `node_radius` halved once per generation below the root.
    Halving,
}

/// Where edge segments attach to the node glyphs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeAnchoring {
    /// From the parent's circle to the child's circle.
    #[default]
    Boundary,
    /// From center to center.
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Parent-to-child distance for children in the parent's cluster.
    pub branch_length: f64,
    /// Multiplier on `branch_length` for cross-cluster children. Must be > 1.
    pub cluster_branch_length_modifier: f64,
    pub node_radius: f64,
    /// Not used by the geometry; handed to renderers.
    pub line_width: f64,
    /// Fixed angular nudge (radians) applied to cross-cluster fans.
    pub non_straight_branch_factor: f64,
    /// Nudge odd-sized fans too (by `-non_straight_branch_factor`). When
    /// false only even-sized fans are nudged.
    pub jitter_odd_counts: bool,
    /// Where the root's first child goes (radians).
    pub root_start_angle: f64,
    /// Extra rotation (radians) of the same-cluster fan.
    pub same_cluster_start_offset: f64,
    /// Total arc (radians) shared by cross-cluster children.
    pub cross_cluster_span: f64,
    pub radius_policy: RadiusPolicy,
    pub edge_anchoring: EdgeAnchoring,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            branch_length: 150.0,
            cluster_branch_length_modifier: 2.0,
            node_radius: 30.0,
            line_width: 2.0,
            non_straight_branch_factor: 0.4,
            jitter_odd_counts: true,
            root_start_angle: PI / 6.0,
            same_cluster_start_offset: 2.0,
            cross_cluster_span: FRAC_PI_2,
            radius_policy: RadiusPolicy::Fixed,
            edge_anchoring: EdgeAnchoring::Boundary,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("branch_length", self.branch_length),
            ("cluster_branch_length_modifier", self.cluster_branch_length_modifier),
            ("node_radius", self.node_radius),
            ("line_width", self.line_width),
            ("non_straight_branch_factor", self.non_straight_branch_factor),
            ("root_start_angle", self.root_start_angle),
            ("same_cluster_start_offset", self.same_cluster_start_offset),
            ("cross_cluster_span", self.cross_cluster_span),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(&format!("{name} must be finite"), *value));
        }

        if self.branch_length <= 0.0 {
            return Err(invalid("branch_length must be positive", self.branch_length));
        }
        if self.cluster_branch_length_modifier <= 1.0 {
            return Err(invalid(
                "cluster_branch_length_modifier must be greater than 1",
                self.cluster_branch_length_modifier,
            ));
        }
        if self.node_radius <= 0.0 {
            return Err(invalid("node_radius must be positive", self.node_radius));
        }
        if self.line_width < 0.0 {
            return Err(invalid("line_width must not be negative", self.line_width));
        }
        if self.cross_cluster_span <= 0.0 {
            return Err(invalid("cross_cluster_span must be positive", self.cross_cluster_span));
        }
        Ok(())
    }
}

fn invalid(msg: &str, value: f64) -> LayoutError {
    LayoutError::InvalidConfiguration(format!("{msg}, got {value}"))
}

/// Placement of one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLayout {
    pub node: NodeId,
    pub position: Point,
    pub radius: f64,
    pub cluster: ClusterId,
    pub parent: Option<NodeId>,
    /// Direction parent -> node. None for the root.
    pub incoming_angle: Option<f64>,
    pub depth: usize,
}

/// Straight connector from a parent to one of its children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeSegment {
    pub from: NodeId,
    pub to: NodeId,
    pub from_name: String,
    pub to_name: String,
    pub start: Point,
    pub end: Point,
    pub cross_cluster: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeLayout {
    pub nodes: HashMap<NodeId, NodeLayout>,
    /// Pre-order visit order, root first.
    pub order: Vec<NodeId>,
    /// In emission order (same as `order` without the root).
    pub edges: Vec<EdgeSegment>,
}

impl TreeLayout {
    pub fn get(&self, nid: NodeId) -> Option<&NodeLayout> {
        self.nodes.get(&nid)
    }

    /// Node placements in visit order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeLayout> + '_ {
        self.order.iter().filter_map(|nid| self.nodes.get(nid))
    }

    /// Box enclosing every glyph. None for an empty layout.
    pub fn bounds(&self) -> Option<Bounds> {
        self.iter()
            .map(|n| Bounds::around(n.position, n.radius))
            .reduce(|acc, b| acc.union(&b))
    }
}

/// Lay out the tree rooted at `tree.root`, with the root at (0, 0).
///
/// The configuration and the tree structure are both checked before any
/// placement happens, so an error never comes with partial output.
pub fn compute_layout(tree: &TopicTree, cfg: &LayoutConfig) -> Result<TreeLayout> {
    cfg.validate()?;
    let (root, reachable) = validate(tree)?;

    if cfg.radius_policy == RadiusPolicy::PerNode {
        if let Some(node) = reachable
            .iter()
            .map(|nid| &tree.nodes[nid.0])
            .find(|n| n.radius.is_some_and(|r| !r.is_finite() || r <= 0.0))
        {
            return Err(LayoutError::InvalidConfiguration(format!(
                "radius of '{}' must be positive and finite",
                node.name
            )));
        }
    }

    debug!(nodes = reachable.len(), root = root.0, "computing radial layout");
    let layout = radial::layout_tree(tree, root, cfg, reachable.len());
    debug!(nodes = layout.nodes.len(), edges = layout.edges.len(), "radial layout done");

    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config_is_valid() {
        LayoutConfig::default().validate().unwrap();
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let bad = [
            LayoutConfig { branch_length: 0.0, ..Default::default() },
            LayoutConfig { branch_length: -3.0, ..Default::default() },
            LayoutConfig { node_radius: 0.0, ..Default::default() },
            LayoutConfig { cluster_branch_length_modifier: 1.0, ..Default::default() },
            LayoutConfig { line_width: -1.0, ..Default::default() },
            LayoutConfig { cross_cluster_span: 0.0, ..Default::default() },
            LayoutConfig { non_straight_branch_factor: f64::NAN, ..Default::default() },
            LayoutConfig { branch_length: f64::INFINITY, ..Default::default() },
        ];
        for cfg in bad {
            assert!(
                matches!(cfg.validate(), Err(LayoutError::InvalidConfiguration(_))),
                "accepted {cfg:?}"
            );
        }
    }

    #[test]
    fn test_config_deserialize_fills_defaults() {
        let json = r#"{ "branch_length": 1.0, "radius_policy": "per_node" }"#;
        let cfg: LayoutConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.branch_length, 1.0);
        assert!(cfg.jitter_odd_counts);
        assert_eq!(cfg.radius_policy, RadiusPolicy::PerNode);
        assert_eq!(cfg.cluster_branch_length_modifier, 2.0);
        assert_eq!(cfg.edge_anchoring, EdgeAnchoring::Boundary);
    }

    #[test]
    fn test_point_helpers() {
        let p = Point::polar(FRAC_PI_2, 2.0);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 2.0);
        assert_relative_eq!(p.angle_from(Point::ORIGIN), FRAC_PI_2);
        assert_relative_eq!(Point::new(3.0, 4.0).distance(Point::ORIGIN), 5.0);
    }

    #[test]
    fn test_bounds_cover_glyphs() {
        let mut tree = TopicTree::new();
        let a = tree.add_topic("A");
        let b = tree.add_topic("B");
        tree.add_child(a, b).unwrap();
        tree.set_root(a);

        let cfg = LayoutConfig { branch_length: 10.0, node_radius: 1.0, ..Default::default() };
        let layout = compute_layout(&tree, &cfg).unwrap();
        let bounds = layout.bounds().unwrap();
        for n in layout.iter() {
            assert!(n.position.x - n.radius >= bounds.min_x - 1e-9);
            assert!(n.position.x + n.radius <= bounds.max_x + 1e-9);
            assert!(n.position.y - n.radius >= bounds.min_y - 1e-9);
            assert!(n.position.y + n.radius <= bounds.max_y + 1e-9);
        }
        assert!(bounds.width() > 0.0 && bounds.height() > 0.0);
    }

    #[test]
    fn test_per_node_radius_must_be_positive() {
        let mut tree = TopicTree::new();
        let a = tree.add_topic("A");
        tree.set_radius(a, -2.0).unwrap();
        tree.set_root(a);

        let cfg = LayoutConfig { radius_policy: RadiusPolicy::PerNode, ..Default::default() };
        assert!(matches!(compute_layout(&tree, &cfg), Err(LayoutError::InvalidConfiguration(_))));

        // Ignored under the fixed policy.
        assert!(compute_layout(&tree, &LayoutConfig::default()).is_ok());
    }

    #[test]
    fn test_unreachable_node_radius_is_ignored() {
        let mut tree = TopicTree::new();
        let a = tree.add_topic("A");
        let b = tree.add_topic("B");
        let stray = tree.add_topic("stray");
        tree.add_child(a, b).unwrap();
        tree.set_radius(b, 5.0).unwrap();
        tree.set_radius(stray, -1.0).unwrap();
        tree.set_root(a);

        let cfg = LayoutConfig { radius_policy: RadiusPolicy::PerNode, ..Default::default() };
        let layout = compute_layout(&tree, &cfg).unwrap();
        assert_eq!(layout.nodes.len(), 2);
        assert_eq!(layout.get(b).unwrap().radius, 5.0);
        assert!(layout.get(stray).is_none());
    }

    #[test]
    fn test_bounds_union() {
        let a = Bounds::around(Point::ORIGIN, 1.0);
        let b = Bounds::around(Point::new(4.0, -2.0), 0.5);
        let u = a.union(&b);
        assert_eq!(u, Bounds { min_x: -1.0, min_y: -2.5, max_x: 4.5, max_y: 1.0 });
        assert_eq!(a.union(&a), a);
    }
}
