#![forbid(unsafe_code)]

//! Incremental force-directed layout for file/folder trees.
//!
//! A [`Simulation`] mirrors a tree: one [`SimNode`] per item, one [`SimEdge`] per parent -> child
//! relation. Each [`Simulation::step`] applies link springs (rest length shrinking with depth),
//! all-pairs repulsion, and a weak centering pull, then integrates with d3-style cooling.

mod force;

pub mod config;
pub mod error;
pub mod geom;
pub mod graph;
pub mod scale;
pub mod simulation;

pub use config::ForceConfig;
pub use error::{Error, Result};
pub use geom::{ScreenPoint, ScreenSize, ScreenVector, WorldPoint, WorldVector};
pub use graph::{NodeId, SimEdge, SimNode};
pub use scale::ScaleFactor;
pub use simulation::{Simulation, StepStats};
