//! Drawing side of the layout.
//!
//! A `Renderer` receives finished geometry and does nothing but draw it.
//! `present` always clears the renderer first, so redrawing a layout (or a
//! new one) never leaves stale nodes or edges behind.

use svg::node::element::{Circle, Group, Line, Text};
use svg::Document;

use crate::error::Result;
use crate::layout::{Bounds, EdgeSegment, LayoutConfig, NodeLayout, TreeLayout};
use crate::output::load;
use crate::tree::TopicTree;

pub trait Renderer {
    /// Remove everything drawn so far.
    fn clear(&mut self);
    fn draw_node(&mut self, node: &NodeLayout, name: &str);
    fn draw_edge(&mut self, edge: &EdgeSegment, line_width: f64);
}

/// Clear `renderer`, then draw every edge and every node of `layout`.
pub fn present<R: Renderer + ?Sized>(
    renderer: &mut R,
    tree: &TopicTree,
    layout: &TreeLayout,
    cfg: &LayoutConfig,
) {
    renderer.clear();
    for edge in &layout.edges {
        renderer.draw_edge(edge, cfg.line_width);
    }
    for node in layout.iter() {
        let name = tree.node(node.node).map_or("", |n| n.name.as_str());
        renderer.draw_node(node, name);
    }
}

/// In-memory SVG scene.
#[derive(Debug, Default)]
pub struct SvgScene {
    edges: Vec<Line>,
    nodes: Vec<Group>,
    bounds: Option<Bounds>,
}

impl SvgScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn extend_bounds(&mut self, b: Bounds) {
        self.bounds = Some(self.bounds.map_or(b, |cur| cur.union(&b)));
    }

    /// Box covering everything drawn since the last `clear`.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn to_document(&self) -> Document {
        let (x, y, w, h) = match self.bounds {
            Some(b) => {
                let pad = 0.05 * b.width().max(b.height());
                (b.min_x - pad, b.min_y - pad, b.width() + 2.0 * pad, b.height() + 2.0 * pad)
            }
            None => (0.0, 0.0, 0.0, 0.0),
        };

        let mut document = Document::new().set("viewBox", (x, y, w, h));
        for line in &self.edges {
            document = document.add(line.clone());
        }
        for node in &self.nodes {
            document = document.add(node.clone());
        }
        document
    }
}

impl Renderer for SvgScene {
    fn clear(&mut self) {
        self.edges.clear();
        self.nodes.clear();
        self.bounds = None;
    }

    fn draw_node(&mut self, node: &NodeLayout, name: &str) {
        let p = node.position;
        let r = node.radius;
        self.extend_bounds(Bounds::around(p, r));

        let circle = Circle::new()
            .set("cx", p.x)
            .set("cy", p.y)
            .set("r", r)
            .set("fill", "white")
            .set("stroke", "black");

        let label = Text::new("")
            .set("x", p.x)
            .set("y", p.y)
            .set("font-size", r * 0.5)
            .set("text-anchor", "middle")
            .set("dominant-baseline", "middle")
            .add(svg::node::Text::new(name));

        self.nodes.push(Group::new().set("id", name).add(circle).add(label));
    }

    fn draw_edge(&mut self, edge: &EdgeSegment, line_width: f64) {
        let (s, e) = (edge.start, edge.end);
        self.extend_bounds(Bounds::around(s, 0.0).union(&Bounds::around(e, 0.0)));

        let line = Line::new()
            .set("x1", s.x)
            .set("y1", s.y)
            .set("x2", e.x)
            .set("y2", e.y)
            .set("stroke", if edge.cross_cluster { "gray" } else { "black" })
            .set("stroke-width", line_width)
            .set("data-from", edge.from_name.as_str())
            .set("data-to", edge.to_name.as_str());
        self.edges.push(line);
    }
}

/// Compile, lay out and draw a topic document as an SVG string.
pub fn render_document_svg(document: &str, config: &str) -> Result<String> {
    let (tree, cfg, layout) = load(document, config)?;
    let mut scene = SvgScene::new();
    present(&mut scene, &tree, &layout, &cfg);
    Ok(scene.to_document().to_string())
}
