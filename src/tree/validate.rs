// Structural validation of a TopicTree.
//
// Walks everything reachable from the root with an explicit stack (no
// recursion, so very deep inputs cannot overflow here) and rejects:
// - child ids outside the arena
// - a node on the current path reached again (cycle)
// - a node reached through two different parents (shared child)

use crate::error::{LayoutError, Result};
use crate::tree::{NodeId, TopicTree};

enum Visit {
    Enter(NodeId),
    Exit(NodeId),
}

/// Validate the tree and return its root and every reachable node, in
/// pre-order.
pub fn validate(tree: &TopicTree) -> Result<(NodeId, Vec<NodeId>)> {
    let root = tree.root.ok_or(LayoutError::EmptyTree)?;
    let n = tree.nodes.len();
    if root.0 >= n {
        return Err(LayoutError::MalformedTree {
            node: root,
            reason: "root is not part of the tree".to_string(),
        });
    }

    let mut on_path = vec![false; n];
    let mut seen = vec![false; n];
    let mut reachable = Vec::new();
    let mut stack = vec![Visit::Enter(root)];

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Exit(nid) => on_path[nid.0] = false,
            Visit::Enter(nid) => {
                if on_path[nid.0] {
                    return Err(LayoutError::MalformedTree {
                        node: nid,
                        reason: format!("cycle through '{}'", tree.nodes[nid.0].name),
                    });
                }
                if seen[nid.0] {
                    let name = &tree.nodes[nid.0].name;
                    return Err(LayoutError::MalformedTree {
                        node: nid,
                        reason: format!("'{name}' is reachable through more than one parent"),
                    });
                }
                seen[nid.0] = true;
                on_path[nid.0] = true;
                reachable.push(nid);
                stack.push(Visit::Exit(nid));

                // Reverse so children are entered in their declared order.
                for &child in tree.nodes[nid.0].children.iter().rev() {
                    if child.0 >= n {
                        return Err(LayoutError::MalformedTree {
                            node: nid,
                            reason: format!("child id {} is not part of the tree", child.0),
                        });
                    }
                    stack.push(Visit::Enter(child));
                }
            }
        }
    }

    Ok((root, reachable))
}
