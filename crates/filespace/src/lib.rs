#![forbid(unsafe_code)]

//! Interactive file/folder node-link diagrams.
//!
//! [`Filespace`] owns the item tree, its force-directed [`Simulation`] and the gesture
//! [`Controller`], and keeps the three in lockstep. A host calls [`Filespace::update`] once per
//! frame with the input popped from an [`InputQueue`] and its picker, camera and menu
//! implementations, then draws [`Filespace::views`] and [`Filespace::links`].

pub mod camera;
pub mod config;
pub mod error;
pub mod input;
pub mod interaction;
pub mod menu;
pub mod picker;
pub mod render;
pub mod tree;

pub use camera::{Camera, PlaneCamera};
pub use config::{CameraConfig, FilespaceConfig, GeometryConfig, InteractionConfig};
pub use error::{Error, Result};
pub use filespace_layout::geom;
pub use filespace_layout::{
    ForceConfig, NodeId, ScaleFactor, ScreenPoint, Simulation, StepStats, WorldPoint, WorldVector,
};
pub use input::{Click, DragId, InputFrame, InputQueue, WheelEvent};
pub use interaction::{
    Collaborators, Controller, HoverEvent, HoverTarget, InteractionState, TickOutcome,
};
pub use menu::{ActionHost, Menu, MenuAction, MenuEntry, MenuEntryKind, MenuSection};
pub use picker::{Hit, Picker, SurfaceKind, ViewPicker};
pub use render::{LinkView, NodeView};
pub use tree::{FilespaceNode, FilespaceTree, ItemKind, NodeKind, TreeSpec};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub outcome: TickOutcome,
    pub step: StepStats,
}

#[derive(Debug, Clone)]
pub struct Filespace {
    config: FilespaceConfig,
    tree: FilespaceTree,
    sim: Simulation,
    controller: Controller,
}

impl Default for Filespace {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Filespace {
    pub fn new(config: FilespaceConfig) -> Result<Self> {
        config.validate()?;
        let sim = Simulation::new(config.layout.clone())?;
        let controller = Controller::new(config.interaction.clone());
        Ok(Self {
            config,
            tree: FilespaceTree::new(),
            sim,
            controller,
        })
    }

    pub fn with_defaults() -> Self {
        let config = FilespaceConfig::default();
        Self {
            controller: Controller::new(config.interaction.clone()),
            sim: Simulation::default(),
            tree: FilespaceTree::new(),
            config,
        }
    }

    pub fn config(&self) -> &FilespaceConfig {
        &self.config
    }

    pub fn tree(&self) -> &FilespaceTree {
        &self.tree
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn root(&self) -> Option<NodeId> {
        self.tree.root()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&FilespaceNode> {
        self.tree.get(id)
    }

    /// Adds an item under `parent` (or the root when `parent` is `None`).
    pub fn add_item(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        kind: ItemKind,
    ) -> Result<NodeId> {
        let id = self.tree.insert(parent, name, kind)?;
        if let Err(err) = self.sim.add_node(id, parent) {
            if let Err(rollback) = self.tree.remove(id) {
                tracing::warn!(node = %id, %rollback, "failed to roll back tree insert");
            }
            return Err(err.into());
        }
        tracing::debug!(node = %id, parent = ?parent, ?kind, "item added");
        Ok(id)
    }

    pub fn add_folder(&mut self, parent: Option<NodeId>, name: impl Into<String>) -> Result<NodeId> {
        self.add_item(parent, name, ItemKind::Folder)
    }

    pub fn add_file(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId> {
        self.add_item(Some(parent), name, ItemKind::File)
    }

    /// Removes a childless item. Folders must be emptied first.
    pub fn remove_item(&mut self, id: NodeId) -> Result<FilespaceNode> {
        let node = self.tree.get(id).ok_or(Error::UnknownNode(id))?;
        let children = node.children().len();
        if children > 0 {
            return Err(Error::HasChildren { node: id, children });
        }
        self.sim.remove_node(id)?;
        let removed = self.tree.remove(id)?;
        tracing::debug!(node = %id, "item removed");
        Ok(removed)
    }

    /// Inserts a nested tree under `parent` and returns the id of its top item.
    ///
    /// The whole description is checked before anything is inserted.
    pub fn load(&mut self, parent: Option<NodeId>, spec: &TreeSpec) -> Result<NodeId> {
        match parent {
            None => {
                if let Some(existing) = self.tree.root() {
                    return Err(Error::MultipleRoots { existing });
                }
            }
            Some(parent) => {
                let node = self.tree.get(parent).ok_or(Error::UnknownNode(parent))?;
                if !node.is_folder() {
                    return Err(Error::ParentNotFolder { parent });
                }
            }
        }
        check_spec(spec)?;
        let top = self.load_unchecked(parent, spec)?;
        tracing::debug!(items = spec.count(), top = %top, "tree loaded");
        Ok(top)
    }

    fn load_unchecked(&mut self, parent: Option<NodeId>, spec: &TreeSpec) -> Result<NodeId> {
        let id = self.add_item(parent, spec.name.clone(), spec.kind)?;
        for child in &spec.children {
            self.load_unchecked(Some(id), child)?;
        }
        Ok(id)
    }

    /// Resolves one frame of input, then advances the layout by one step.
    pub fn update(&mut self, frame: &mut InputFrame, io: &mut Collaborators<'_>) -> TickReport {
        let outcome = self.controller.tick(frame, &self.tree, &mut self.sim, io);
        let step = self.sim.step();
        TickReport { outcome, step }
    }

    /// Advances the layout by one step without consuming input.
    pub fn step(&mut self) -> StepStats {
        self.sim.step()
    }

    /// Steps the layout without input until it settles; returns the steps taken.
    pub fn settle(&mut self, max_steps: usize) -> usize {
        self.sim.run_until_settled(max_steps)
    }

    pub fn state(&self) -> InteractionState {
        self.controller.state()
    }

    pub fn reset_interaction(&mut self) {
        self.controller.reset(&mut self.sim);
    }

    pub fn menu_for(&self, id: NodeId, host: &dyn ActionHost) -> Result<Vec<MenuSection>> {
        let node = self.tree.get(id).ok_or(Error::UnknownNode(id))?;
        Ok(menu::menu_for(node, host))
    }

    /// One view per item, in insertion order.
    pub fn views(&self) -> Vec<NodeView> {
        let hovered = self.controller.hover().map(|h| h.node);
        let scale = self.sim.scale();
        self.tree
            .iter()
            .filter_map(|item| {
                let sim = self.sim.node(item.id())?;
                Some(NodeView {
                    id: item.id(),
                    name: item.name().to_owned(),
                    position: sim.position,
                    pinned: sim.is_pinned(),
                    depth: item.depth(),
                    kind: item.item_kind(),
                    has_children: item.has_children(),
                    scale: scale.at(item.depth()),
                    hovered: hovered == Some(item.id()),
                })
            })
            .collect()
    }

    pub fn links(&self) -> Vec<LinkView> {
        let scale = self.sim.scale();
        self.sim
            .edges()
            .iter()
            .filter_map(|edge| {
                let parent = self.sim.node(edge.parent)?;
                let child = self.sim.node(edge.child)?;
                Some(LinkView {
                    parent: edge.parent,
                    child: edge.child,
                    from: parent.position,
                    to: child.position,
                    parent_scale: scale.at(parent.depth),
                    child_scale: scale.at(child.depth),
                })
            })
            .collect()
    }
}

fn check_spec(spec: &TreeSpec) -> Result<()> {
    if spec.kind == ItemKind::File && !spec.children.is_empty() {
        return Err(Error::InvalidTree {
            message: format!("file {:?} cannot contain children", spec.name),
        });
    }
    spec.children.iter().try_for_each(check_spec)
}
