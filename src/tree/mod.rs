mod types;
pub mod compile;
mod validate;

pub use types::{ClusterId, NodeId, TopicNode, TopicTree};
pub use compile::{compile, compile_str, parse_document, TopicDecl, TopicDocument};
pub use validate::validate;
