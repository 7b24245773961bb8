use crate::error::{Error, Result};
use filespace_layout::NodeId;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Folder,
    File,
}

/// Kind-specific payload of a tree item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Folder { children: Vec<NodeId> },
    File,
}

impl NodeKind {
    pub fn item_kind(&self) -> ItemKind {
        match self {
            NodeKind::Folder { .. } => ItemKind::Folder,
            NodeKind::File => ItemKind::File,
        }
    }
}

impl From<ItemKind> for NodeKind {
    fn from(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Folder => NodeKind::Folder {
                children: Vec::new(),
            },
            ItemKind::File => NodeKind::File,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilespaceNode {
    id: NodeId,
    name: String,
    depth: usize,
    parent: Option<NodeId>,
    kind: NodeKind,
}

impl FilespaceNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn item_kind(&self) -> ItemKind {
        self.kind.item_kind()
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }

    /// Ordered children; always empty for files.
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Folder { children } => children,
            NodeKind::File => &[],
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }
}

/// Arena of tree items keyed by stable [`NodeId`]s, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct FilespaceTree {
    nodes: IndexMap<NodeId, FilespaceNode, FxBuildHasher>,
    root: Option<NodeId>,
    next_id: u64,
}

impl FilespaceTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&FilespaceNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilespaceNode> {
        self.nodes.values()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(FilespaceNode::children).unwrap_or(&[])
    }

    /// Inserts a new item. `parent == None` creates the root.
    pub fn insert(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        kind: ItemKind,
    ) -> Result<NodeId> {
        let depth = match parent {
            None => {
                if let Some(existing) = self.root {
                    return Err(Error::MultipleRoots { existing });
                }
                0
            }
            Some(parent_id) => {
                let parent_node = self
                    .nodes
                    .get(&parent_id)
                    .ok_or(Error::UnknownNode(parent_id))?;
                if !parent_node.is_folder() {
                    return Err(Error::ParentNotFolder { parent: parent_id });
                }
                parent_node.depth + 1
            }
        };

        let id = NodeId::new(self.next_id);
        self.next_id += 1;

        if let Some(parent_id) = parent {
            if let Some(NodeKind::Folder { children }) =
                self.nodes.get_mut(&parent_id).map(|n| &mut n.kind)
            {
                children.push(id);
            }
        } else {
            self.root = Some(id);
        }

        self.nodes.insert(
            id,
            FilespaceNode {
                id,
                name: name.into(),
                depth,
                parent,
                kind: kind.into(),
            },
        );
        Ok(id)
    }

    /// Detaches a childless item from its parent and drops it from the arena.
    pub fn remove(&mut self, id: NodeId) -> Result<FilespaceNode> {
        let node = self.nodes.get(&id).ok_or(Error::UnknownNode(id))?;
        let children = node.children().len();
        if children > 0 {
            return Err(Error::HasChildren { node: id, children });
        }

        if let Some(parent_id) = node.parent {
            if let Some(NodeKind::Folder { children }) =
                self.nodes.get_mut(&parent_id).map(|n| &mut n.kind)
            {
                children.retain(|c| *c != id);
            }
        }
        if self.root == Some(id) {
            self.root = None;
        }
        self.nodes
            .shift_remove(&id)
            .ok_or(Error::UnknownNode(id))
    }
}

/// Nested, serializable description of a tree (used to bulk-load a filespace).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSpec {
    pub name: String,
    #[serde(default = "TreeSpec::default_kind")]
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeSpec>,
}

impl TreeSpec {
    fn default_kind() -> ItemKind {
        ItemKind::Folder
    }

    pub fn folder(name: impl Into<String>, children: Vec<TreeSpec>) -> Self {
        Self {
            name: name.into(),
            kind: ItemKind::Folder,
            children,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ItemKind::File,
            children: Vec::new(),
        }
    }

    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TreeSpec::count).sum::<usize>()
    }

    /// The demo tree shown on first launch.
    pub fn sample() -> Self {
        Self::folder(
            "My Files",
            vec![
                Self::folder("My Videos", Vec::new()),
                Self::folder("My Documents", Vec::new()),
                Self::folder("My Games", Vec::new()),
                Self::folder("Long, long, long, long, long folder name", Vec::new()),
                Self::file("todo.txt"),
                Self::file("taxes.xls"),
                Self::folder(
                    "My Pictures",
                    vec![
                        Self::folder("My Cats", Vec::new()),
                        Self::folder("My Dogs", Vec::new()),
                        Self::folder("My Sheep", Vec::new()),
                        Self::file("Long, long, long, long, long file name"),
                    ],
                ),
            ],
        )
    }
}
