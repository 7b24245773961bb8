use crate::error::{Error, Result};

/// Geometric attenuation by tree depth: `base ^ depth`.
///
/// Deeper subtrees get shorter links, weaker repulsion and smaller visuals, which keeps nested
/// folders visually clustered around their parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactor {
    base: f64,
}

impl ScaleFactor {
    pub const DEFAULT_BASE: f64 = 0.6;

    pub fn new(base: f64) -> Result<Self> {
        if !(base.is_finite() && base > 0.0 && base < 1.0) {
            return Err(Error::InvalidConfig {
                message: format!("scale base factor must be in (0, 1), got {base}"),
            });
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn at(&self, depth: usize) -> f64 {
        let depth = i32::try_from(depth).unwrap_or(i32::MAX);
        self.base.powi(depth)
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self {
            base: Self::DEFAULT_BASE,
        }
    }
}
