use crate::error::{Error, Result};
use filespace_layout::{ForceConfig, ScreenSize};
use serde::{Deserialize, Serialize};

/// Top-level configuration; every section falls back to its defaults when omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilespaceConfig {
    pub layout: ForceConfig,
    pub interaction: InteractionConfig,
    pub geometry: GeometryConfig,
    pub camera: CameraConfig,
}

impl FilespaceConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.interaction.validate()?;
        self.geometry.validate()?;
        self.camera.validate()
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidConfig { message }
}

fn require_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be a positive number, got {value}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionConfig {
    /// Zoom factor per normalized wheel unit, before `zoom_exponent` is applied.
    pub zoom_base: f64,
    pub zoom_exponent: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            zoom_base: 0.9,
            zoom_exponent: 0.6625,
        }
    }
}

impl InteractionConfig {
    /// Camera zoom factor for an accumulated wheel spin. Negative spin zooms in (factor > 1).
    pub fn zoom_factor(&self, wheel_delta: f64) -> f64 {
        self.zoom_base.powf(wheel_delta * self.zoom_exponent)
    }

    fn validate(&self) -> Result<()> {
        if !(self.zoom_base.is_finite() && self.zoom_base > 0.0 && self.zoom_base < 1.0) {
            return Err(invalid(format!(
                "zoomBase must be in (0, 1), got {}",
                self.zoom_base
            )));
        }
        require_positive("zoomExponent", self.zoom_exponent)
    }
}

/// Node disc and dropdown button dimensions in world units at depth 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeometryConfig {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub dropdown_button: ButtonRect,
}

/// Downward-pointing triangle: the `top` edge spans `left..right` and the apex sits at `bottom`.
///
/// Coordinates are relative to the disc centre with y pointing up, as a modeller would draw it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonRect {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
    /// How far the button stands out of the disc towards the viewer.
    pub depth: f64,
}

impl Default for ButtonRect {
    fn default() -> Self {
        Self {
            top: -4.0,
            bottom: -8.0,
            left: -4.0,
            right: 4.0,
            depth: 2.0,
        }
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            inner_radius: 10.0,
            outer_radius: 11.5,
            dropdown_button: ButtonRect::default(),
        }
    }
}

impl GeometryConfig {
    /// Width of a link, which is also the width of the rim between the inner and outer disc.
    pub fn link_diameter(&self) -> f64 {
        self.outer_radius - self.inner_radius
    }

    fn validate(&self) -> Result<()> {
        require_positive("innerRadius", self.inner_radius)?;
        require_positive("outerRadius", self.outer_radius)?;
        if self.outer_radius <= self.inner_radius {
            return Err(invalid(format!(
                "outerRadius ({}) must exceed innerRadius ({})",
                self.outer_radius, self.inner_radius
            )));
        }
        let b = self.dropdown_button;
        if b.left >= b.right || b.bottom >= b.top {
            return Err(invalid(format!(
                "dropdownButton must have left < right and bottom < top, got {b:?}"
            )));
        }
        require_positive("dropdownButton.depth", b.depth)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraConfig {
    /// Vertical field of view.
    pub fov_degrees: f64,
    pub near: f64,
    pub far: f64,
    /// Distance from the camera to the z = 0 plane at startup.
    pub initial_distance: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 10_000.0,
            initial_distance: 300.0,
            viewport_width: 800.0,
            viewport_height: 600.0,
        }
    }
}

impl CameraConfig {
    pub fn viewport(&self) -> ScreenSize {
        ScreenSize::new(self.viewport_width, self.viewport_height)
    }

    fn validate(&self) -> Result<()> {
        if !(self.fov_degrees.is_finite() && self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(invalid(format!(
                "fovDegrees must be in (0, 180), got {}",
                self.fov_degrees
            )));
        }
        require_positive("near", self.near)?;
        require_positive("far", self.far)?;
        require_positive("viewportWidth", self.viewport_width)?;
        require_positive("viewportHeight", self.viewport_height)?;
        if self.near >= self.far {
            return Err(invalid(format!(
                "near ({}) must be less than far ({})",
                self.near, self.far
            )));
        }
        if !(self.near..=self.far).contains(&self.initial_distance) {
            return Err(invalid(format!(
                "initialDistance ({}) must lie within [near, far]",
                self.initial_distance
            )));
        }
        Ok(())
    }
}
