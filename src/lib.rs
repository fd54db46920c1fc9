//! Radial layout for trees of clustered topics.
//!
//! ```ignore
//! let tree = canopy_core::tree::compile_str(document)?;
//! let layout = canopy_core::layout::compute_layout(&tree, &LayoutConfig::default())?;
//! ```

pub mod error;
pub mod layout;
pub mod output;
pub mod render;
pub mod tree;
mod wasm;

pub use error::{LayoutError, Result};
pub use layout::{compute_layout, EdgeSegment, LayoutConfig, NodeLayout, Point, TreeLayout};
pub use render::{present, Renderer, SvgScene};
pub use tree::{ClusterId, NodeId, TopicNode, TopicTree};
