use crate::error::{Error, Result};
use crate::scale::ScaleFactor;
use serde::{Deserialize, Serialize};

/// Tuning knobs for the force model.
///
/// Defaults reproduce the classic filespace look: 50-unit links at the root, a weak pull towards
/// the origin, and d3-style cooling that settles after roughly 300 steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForceConfig {
    /// `ScaleFactor` base; must be in (0, 1).
    pub base_factor: f64,
    /// Link rest length between the root and its children.
    pub link_base_distance: f64,
    /// Repulsion magnitude of a root-depth node (shrinks with depth).
    pub repulsion_strength: f64,
    /// Per-axis pull towards the origin.
    pub centering_strength: f64,
    /// Fraction of velocity lost per step.
    pub velocity_decay: f64,
    pub alpha_initial: f64,
    pub alpha_decay: f64,
    pub alpha_min: f64,
    /// Heat applied after every add/remove.
    pub topology_heat: f64,
    /// Heat applied and held while a node is dragged.
    pub drag_heat: f64,
    /// Repulsion distances below this are softened.
    pub distance_min: f64,
    /// Spiral radius used to seed new nodes around their parent.
    pub initial_radius: f64,
    /// Seed for the jitter used on coincident nodes.
    pub random_seed: u64,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            base_factor: ScaleFactor::DEFAULT_BASE,
            link_base_distance: 50.0,
            repulsion_strength: 25.0,
            centering_strength: 0.01,
            velocity_decay: 0.4,
            alpha_initial: 1.0,
            alpha_decay: 1.0 - 0.001f64.powf(1.0 / 300.0),
            alpha_min: 0.001,
            topology_heat: 0.3,
            drag_heat: 0.3,
            distance_min: 1.0,
            initial_radius: 10.0,
            random_seed: 1,
        }
    }
}

impl ForceConfig {
    pub fn validate(&self) -> Result<()> {
        ScaleFactor::new(self.base_factor)?;

        let non_negative = [
            ("linkBaseDistance", self.link_base_distance),
            ("repulsionStrength", self.repulsion_strength),
            ("centeringStrength", self.centering_strength),
            ("alphaMin", self.alpha_min),
            ("topologyHeat", self.topology_heat),
            ("dragHeat", self.drag_heat),
            ("distanceMin", self.distance_min),
            ("initialRadius", self.initial_radius),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidConfig {
                    message: format!("{name} must be a non-negative number, got {value}"),
                });
            }
        }

        let unit = [
            ("velocityDecay", self.velocity_decay),
            ("alphaInitial", self.alpha_initial),
            ("alphaDecay", self.alpha_decay),
        ];
        for (name, value) in unit {
            if !(value.is_finite() && (0.0..=1.0).contains(&value)) {
                return Err(Error::InvalidConfig {
                    message: format!("{name} must be in [0, 1], got {value}"),
                });
            }
        }
        Ok(())
    }
}
