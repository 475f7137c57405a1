use crate::editing::NodeId;

/// Result of applying a command
#[derive(Debug, Clone)]
pub struct Patch {
    pub changed: Vec<NodeId>,
    pub version: u64,
}
