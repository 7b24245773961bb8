use crate::geom::{WorldPoint, WorldVector};

/// Stable identity shared by a tree item and its simulation shadow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct SimNode {
    pub id: NodeId,
    pub depth: usize,
    pub position: WorldPoint,
    pub velocity: WorldVector,
    /// While set, the integrator is bypassed and the node sits exactly here.
    pub pinned: Option<WorldPoint>,
    /// Number of incident links (the parent link plus one per child).
    pub degree: usize,
    /// Children ever attached; never decreases, so spiral seeds are not reused.
    pub spawned: usize,
}

impl SimNode {
    pub fn is_pinned(&self) -> bool {
        self.pinned.is_some()
    }
}

/// Undirected link mirroring one parent -> child relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimEdge {
    pub parent: NodeId,
    pub child: NodeId,
}
