use filespace_layout::NodeId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Layout(#[from] filespace_layout::Error),

    #[error("filespace already has a root ({existing}); only one root is allowed")]
    MultipleRoots { existing: NodeId },

    #[error("item {0} does not exist")]
    UnknownNode(NodeId),

    #[error("item {parent} is a file and cannot contain children")]
    ParentNotFolder { parent: NodeId },

    #[error("item {node} still has {children} child item(s); remove them first")]
    HasChildren { node: NodeId, children: usize },

    #[error("invalid tree: {message}")]
    InvalidTree { message: String },

    #[error("invalid config: {message}")]
    InvalidConfig { message: String },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
