use crate::config::ForceConfig;
use crate::error::{Error, Result};
use crate::force::{self, Jitter, Link};
use crate::geom::{WorldPoint, WorldVector, vector};
use crate::graph::{NodeId, SimEdge, SimNode};
use crate::scale::ScaleFactor;
use rustc_hash::FxHashMap;

/// Golden-angle increment of the seeding spiral.
const INITIAL_ANGLE: f64 = std::f64::consts::PI * 0.763_932_022_500_210_3; // π(3 − √5)

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepStats {
    /// Cooling coefficient used for this step.
    pub alpha: f64,
    /// `true` when the step was skipped because the layout had cooled below `alpha_min`.
    pub settled: bool,
    /// Summed node displacement caused by this step.
    pub displacement: f64,
}

/// An incrementally editable force-directed tree layout.
///
/// Every node is keyed by the [`NodeId`] of the tree item it shadows. The root (the one node added
/// without a parent) is pinned at the origin for its whole lifetime.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: ForceConfig,
    scale: ScaleFactor,
    nodes: Vec<SimNode>,
    id_to_idx: FxHashMap<NodeId, usize>,
    edges: Vec<SimEdge>,
    root: Option<NodeId>,
    alpha: f64,
    alpha_target: f64,
    jitter: Jitter,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::with_scale(ForceConfig::default(), ScaleFactor::default())
    }
}

impl Simulation {
    pub fn new(config: ForceConfig) -> Result<Self> {
        config.validate()?;
        let scale = ScaleFactor::new(config.base_factor)?;
        Ok(Self::with_scale(config, scale))
    }

    fn with_scale(config: ForceConfig, scale: ScaleFactor) -> Self {
        Self {
            scale,
            nodes: Vec::new(),
            id_to_idx: FxHashMap::default(),
            edges: Vec::new(),
            root: None,
            alpha: config.alpha_initial,
            alpha_target: 0.0,
            jitter: Jitter::new(config.random_seed),
            config,
        }
    }

    pub fn config(&self) -> &ForceConfig {
        &self.config
    }

    pub fn scale(&self) -> ScaleFactor {
        self.scale
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[SimEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.id_to_idx.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&SimNode> {
        self.id_to_idx.get(&id).map(|&idx| &self.nodes[idx])
    }

    pub fn position(&self, id: NodeId) -> Option<WorldPoint> {
        self.node(id).map(|n| n.position)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f64 {
        self.alpha_target
    }

    pub fn is_settled(&self) -> bool {
        self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min
    }

    /// Rest length of a link whose parent sits at `parent_depth`.
    pub fn rest_length(&self, parent_depth: usize) -> f64 {
        self.config.link_base_distance * self.scale.at(parent_depth)
    }

    /// Number of child links attached to `id`.
    pub fn child_count(&self, id: NodeId) -> usize {
        self.edges.iter().filter(|e| e.parent == id).count()
    }

    fn index_of(&self, id: NodeId) -> Result<usize> {
        self.id_to_idx
            .get(&id)
            .copied()
            .ok_or(Error::UnknownNode(id))
    }

    pub fn add_node(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<()> {
        if self.id_to_idx.contains_key(&id) {
            return Err(Error::DuplicateNode(id));
        }

        let (depth, position, pinned) = match parent {
            None => {
                if let Some(existing) = self.root {
                    return Err(Error::SecondRoot {
                        existing,
                        attempted: id,
                    });
                }
                (0, WorldPoint::origin(), Some(WorldPoint::origin()))
            }
            Some(parent_id) => {
                let Some(&parent_idx) = self.id_to_idx.get(&parent_id) else {
                    return Err(Error::UnknownParent {
                        node: id,
                        parent: parent_id,
                    });
                };
                let parent_node = &mut self.nodes[parent_idx];
                let depth = parent_node.depth + 1;
                let radius = self.config.initial_radius * self.scale.at(depth);
                let seed = parent_node.position + spiral_offset(parent_node.spawned, radius);
                parent_node.spawned += 1;
                (depth, seed, None)
            }
        };

        self.id_to_idx.insert(id, self.nodes.len());
        self.nodes.push(SimNode {
            id,
            depth,
            position,
            velocity: WorldVector::zero(),
            pinned,
            degree: 0,
            spawned: 0,
        });

        match parent {
            None => self.root = Some(id),
            Some(parent_id) => {
                self.edges.push(SimEdge {
                    parent: parent_id,
                    child: id,
                });
                self.bump_degree(parent_id, 1);
                self.bump_degree(id, 1);
            }
        }

        tracing::debug!(node = %id, depth, nodes = self.nodes.len(), "simulation node added");
        self.restart(self.config.topology_heat);
        Ok(())
    }

    /// Detaches `id` and its parent link. Children must be removed first.
    pub fn remove_node(&mut self, id: NodeId) -> Result<()> {
        let idx = self.index_of(id)?;
        let children = self.child_count(id);
        if children > 0 {
            return Err(Error::HasChildren { node: id, children });
        }

        if let Some(pos) = self.edges.iter().position(|e| e.child == id) {
            let edge = self.edges.remove(pos);
            self.bump_degree(edge.parent, -1);
        }

        self.nodes.remove(idx);
        self.id_to_idx.remove(&id);
        for (i, n) in self.nodes.iter().enumerate().skip(idx) {
            self.id_to_idx.insert(n.id, i);
        }
        if self.root == Some(id) {
            self.root = None;
        }

        tracing::debug!(node = %id, nodes = self.nodes.len(), "simulation node removed");
        self.restart(self.config.topology_heat);
        Ok(())
    }

    fn bump_degree(&mut self, id: NodeId, delta: isize) {
        if let Some(&idx) = self.id_to_idx.get(&id) {
            let n = &mut self.nodes[idx];
            n.degree = n.degree.saturating_add_signed(delta);
        }
    }

    /// Holds `id` at `position` until [`unpin`](Self::unpin).
    ///
    /// The root stays at the origin; requests to move it elsewhere are ignored.
    pub fn pin(&mut self, id: NodeId, position: WorldPoint) -> Result<()> {
        let idx = self.index_of(id)?;
        if self.root == Some(id) {
            if position != WorldPoint::origin() {
                tracing::warn!(node = %id, x = position.x, y = position.y, "ignoring request to move the root");
            }
            return Ok(());
        }
        let n = &mut self.nodes[idx];
        n.pinned = Some(position);
        n.position = position;
        n.velocity = WorldVector::zero();
        Ok(())
    }

    /// Pins `id` where it currently is and returns that position.
    pub fn pin_in_place(&mut self, id: NodeId) -> Result<WorldPoint> {
        let position = self.nodes[self.index_of(id)?].position;
        self.pin(id, position)?;
        tracing::debug!(node = %id, x = position.x, y = position.y, "node pinned in place");
        Ok(position)
    }

    pub fn unpin(&mut self, id: NodeId) -> Result<()> {
        let idx = self.index_of(id)?;
        if self.root == Some(id) {
            tracing::debug!(node = %id, "root stays pinned");
            return Ok(());
        }
        self.nodes[idx].pinned = None;
        tracing::debug!(node = %id, "node unpinned");
        Ok(())
    }

    /// Raises the cooling coefficient to at least `heat` so the layout visibly re-settles.
    pub fn restart(&mut self, heat: f64) {
        let heat = heat.clamp(0.0, 1.0);
        if heat > self.alpha {
            tracing::debug!(from = self.alpha, to = heat, "simulation reheated");
            self.alpha = heat;
        }
    }

    /// Keeps the cooling coefficient converging towards `heat` instead of zero.
    pub fn sustain(&mut self, heat: f64) {
        self.alpha_target = heat.clamp(0.0, 1.0);
    }

    /// Lets the cooling coefficient decay towards zero again.
    pub fn cool_down(&mut self) {
        tracing::debug!(alpha = self.alpha, "simulation cooling down");
        self.alpha_target = 0.0;
    }

    /// Advances the simulation by one frame.
    pub fn step(&mut self) -> StepStats {
        if self.nodes.is_empty() {
            return StepStats {
                alpha: self.alpha,
                settled: true,
                displacement: 0.0,
            };
        }

        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        let alpha = self.alpha;

        if alpha < self.config.alpha_min {
            let mut displacement = 0.0;
            for n in &mut self.nodes {
                if let Some(pin) = n.pinned {
                    displacement += n.position.distance_to(pin);
                    n.position = pin;
                    n.velocity = WorldVector::zero();
                }
            }
            return StepStats {
                alpha,
                settled: true,
                displacement,
            };
        }

        let links: Vec<Link> = self
            .edges
            .iter()
            .filter_map(|e| {
                let parent = *self.id_to_idx.get(&e.parent)?;
                let child = *self.id_to_idx.get(&e.child)?;
                Some(Link {
                    parent,
                    child,
                    rest_length: self.rest_length(self.nodes[parent].depth),
                })
            })
            .collect();
        let strengths: Vec<f64> = self
            .nodes
            .iter()
            .map(|n| self.config.repulsion_strength * self.scale.at(n.depth))
            .collect();

        force::apply_links(&mut self.nodes, &links, alpha, &mut self.jitter);
        force::apply_repulsion(
            &mut self.nodes,
            &strengths,
            self.config.distance_min,
            alpha,
            &mut self.jitter,
        );
        force::apply_centering(&mut self.nodes, self.config.centering_strength, alpha);
        let displacement = force::integrate(&mut self.nodes, self.config.velocity_decay);

        tracing::trace!(alpha, displacement, nodes = self.nodes.len(), "simulation step");
        StepStats {
            alpha,
            settled: false,
            displacement,
        }
    }

    /// Steps until the layout settles or `max_steps` is reached; returns the steps taken.
    pub fn run_until_settled(&mut self, max_steps: usize) -> usize {
        for taken in 0..max_steps {
            if self.step().settled {
                return taken;
            }
        }
        max_steps
    }
}

fn spiral_offset(k: usize, radius: f64) -> WorldVector {
    let k = k as f64;
    let r = radius * (0.5 + k).sqrt();
    let angle = k * INITIAL_ANGLE;
    vector(r * angle.cos(), r * angle.sin())
}
