// The recursive radial pass.
//
// Each call places one node at the center it was handed, emits the edge from
// its parent, then splits its children into cross-cluster and same-cluster
// groups, asks the angle policy where each group goes and recurses. Nothing
// placed earlier is ever moved. Input must already be validated.

use std::collections::HashMap;

use tracing::{trace, warn};

use super::angles::{AngleAllocation, AnglePolicy, ChildGroup, PlacedFan};
use super::edges::segment_between;
use super::{EdgeSegment, LayoutConfig, NodeLayout, Point, RadiusPolicy, TreeLayout};
use crate::tree::{ClusterId, NodeId, TopicNode, TopicTree};

/// What a child needs to know about its already-placed parent.
#[derive(Debug, Copy, Clone)]
struct ParentContext {
    nid: NodeId,
    position: Point,
    radius: f64,
    cluster: ClusterId,
    depth: usize,
}

struct RadialPass<'a> {
    tree: &'a TopicTree,
    cfg: &'a LayoutConfig,
    angles: AnglePolicy,
    out: TreeLayout,
}

pub(super) fn layout_tree(
    tree: &TopicTree,
    root: NodeId,
    cfg: &LayoutConfig,
    node_count: usize,
) -> TreeLayout {
    let mut pass = RadialPass {
        tree,
        cfg,
        angles: AnglePolicy::from_config(cfg),
        out: TreeLayout {
            nodes: HashMap::with_capacity(node_count),
            order: Vec::with_capacity(node_count),
            edges: Vec::with_capacity(node_count.saturating_sub(1)),
        },
    };
    pass.layout_node(root, Point::ORIGIN, None);
    pass.out
}

impl<'a> RadialPass<'a> {
    fn layout_node(&mut self, nid: NodeId, center: Point, parent: Option<ParentContext>) {
        let tree = self.tree;
        let node = &tree.nodes[nid.0];
        let depth = parent.map_or(0, |p| p.depth + 1);
        let radius = self.radius_for(node, depth);

        let incoming_angle = parent.map(|p| center.angle_from(p.position));
        if let Some(p) = parent {
            self.emit_edge(&p, node, center, radius);
        }

        trace!(node = %node.name, x = center.x, y = center.y, depth, "placed");
        self.out.order.push(nid);
        self.out.nodes.insert(
            nid,
            NodeLayout {
                node: nid,
                position: center,
                radius,
                cluster: node.cluster,
                parent: parent.map(|p| p.nid),
                incoming_angle,
                depth,
            },
        );

        if node.children.is_empty() {
            return;
        }

        let ctx = ParentContext { nid, position: center, radius, cluster: node.cluster, depth };
        let (cross, same): (Vec<NodeId>, Vec<NodeId>) = node
            .children
            .iter()
            .copied()
            .partition(|c| tree.nodes[c.0].cluster != node.cluster);

        match incoming_angle {
            None => {
                // Root: one even spread over every child, cross-cluster first.
                let combined: Vec<NodeId> = cross.into_iter().chain(same).collect();
                let alloc =
                    self.angles.allocate(combined.len(), 0.0, true, ChildGroup::CrossCluster);
                if let Some(alloc) = alloc {
                    self.place_children(&combined, alloc, &ctx);
                }
            }
            Some(anchor) => {
                let fan = self
                    .angles
                    .allocate(cross.len(), anchor, false, ChildGroup::CrossCluster)
                    .map(|alloc| PlacedFan { alloc, count: cross.len() });
                if let Some(fan) = fan {
                    self.place_children(&cross, fan.alloc, &ctx);
                }
                let group = ChildGroup::SameCluster { cross: fan };
                if let Some(alloc) = self.angles.allocate(same.len(), anchor, false, group) {
                    self.place_children(&same, alloc, &ctx);
                }
            }
        }
    }

    fn place_children(&mut self, children: &[NodeId], alloc: AngleAllocation, ctx: &ParentContext) {
        for (i, &child) in children.iter().enumerate() {
            let angle = alloc.angle(i);
            let branch = self.branch_length(child, ctx.cluster);
            let child_center = ctx.position + Point::polar(angle, branch);
            self.layout_node(child, child_center, Some(*ctx));
        }
    }

    fn branch_length(&self, child: NodeId, parent_cluster: ClusterId) -> f64 {
        if self.tree.nodes[child.0].cluster == parent_cluster {
            self.cfg.branch_length
        } else {
            self.cfg.branch_length * self.cfg.cluster_branch_length_modifier
        }
    }

    fn radius_for(&self, node: &TopicNode, depth: usize) -> f64 {
        match self.cfg.radius_policy {
            RadiusPolicy::Fixed => self.cfg.node_radius,
            RadiusPolicy::PerNode => node.radius.unwrap_or(self.cfg.node_radius),
            RadiusPolicy::Halving => {
                let generations = depth.min(i32::MAX as usize) as i32;
                self.cfg.node_radius * 0.5f64.powi(generations)
            }
        }
    }

    fn emit_edge(&mut self, parent: &ParentContext, node: &TopicNode, center: Point, radius: f64) {
        let geometry = segment_between(
            parent.position,
            parent.radius,
            center,
            radius,
            self.cfg.edge_anchoring,
        );
        let from_name = &self.tree.nodes[parent.nid.0].name;
        if geometry.collapsed {
            warn!(
                from = %from_name,
                to = %node.name,
                "glyphs overlap, edge collapsed to a point"
            );
        }
        self.out.edges.push(EdgeSegment {
            from: parent.nid,
            to: node.nid,
            from_name: from_name.clone(),
            to_name: node.name.clone(),
            start: geometry.start,
            end: geometry.end,
            cross_cluster: node.cluster != parent.cluster,
        });
    }
}
