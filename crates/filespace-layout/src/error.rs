use crate::graph::NodeId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("simulation already has a root ({existing}); {attempted} needs a parent")]
    SecondRoot { existing: NodeId, attempted: NodeId },

    #[error("node {0} is already part of the simulation")]
    DuplicateNode(NodeId),

    #[error("parent {parent} of node {node} is not part of the simulation")]
    UnknownParent { node: NodeId, parent: NodeId },

    #[error("node {0} is not part of the simulation")]
    UnknownNode(NodeId),

    #[error("node {node} still has {children} attached child link(s); detach them first")]
    HasChildren { node: NodeId, children: usize },

    #[error("invalid layout config: {message}")]
    InvalidConfig { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
