use crate::config::CameraConfig;
use filespace_layout::{ScreenPoint, ScreenSize, WorldPoint, WorldVector, geom};

/// The view the controller pans and zooms.
pub trait Camera {
    fn pan_by(&mut self, delta: WorldVector);
    /// Zooms by `factor` (> 1 zooms in) while keeping the world point under `anchor` fixed.
    fn zoom_by(&mut self, factor: f64, anchor: ScreenPoint);
    /// Projects a screen point onto the z = 0 world plane.
    fn point_to_world(&self, at: ScreenPoint) -> WorldPoint;
}

/// Perspective camera looking straight down at the z = 0 plane.
///
/// World x grows to the right of the screen and world y grows downwards, so a screen-space drag
/// and its world-space shadow point the same way.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneCamera {
    center: WorldPoint,
    distance: f64,
    viewport: ScreenSize,
    half_fov_tan: f64,
    near: f64,
    far: f64,
}

impl PlaneCamera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            center: WorldPoint::origin(),
            distance: config.initial_distance.clamp(config.near, config.far),
            viewport: config.viewport(),
            half_fov_tan: (config.fov_degrees.to_radians() / 2.0).tan(),
            near: config.near,
            far: config.far,
        }
    }

    pub fn center(&self) -> WorldPoint {
        self.center
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn viewport(&self) -> ScreenSize {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: ScreenSize) {
        self.viewport = viewport;
    }

    /// World extent covered by half the viewport, per axis.
    fn half_extent(&self) -> (f64, f64) {
        let half_h = self.distance * self.half_fov_tan;
        let aspect = if self.viewport.height > 0.0 {
            self.viewport.width / self.viewport.height
        } else {
            1.0
        };
        (half_h * aspect, half_h)
    }

    pub fn world_to_screen(&self, p: WorldPoint) -> ScreenPoint {
        let (hw, hh) = self.half_extent();
        let nx = (p.x - self.center.x) / hw;
        let ny = (p.y - self.center.y) / hh;
        geom::screen_point(
            (nx + 1.0) / 2.0 * self.viewport.width,
            (ny + 1.0) / 2.0 * self.viewport.height,
        )
    }
}

impl Default for PlaneCamera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

impl Camera for PlaneCamera {
    fn pan_by(&mut self, delta: WorldVector) {
        self.center += delta;
    }

    fn zoom_by(&mut self, factor: f64, anchor: ScreenPoint) {
        if !(factor.is_finite() && factor > 0.0) {
            tracing::debug!(factor, "ignoring degenerate zoom factor");
            return;
        }
        let before = self.point_to_world(anchor);
        self.distance = (self.distance / factor).clamp(self.near, self.far);
        let after = self.point_to_world(anchor);
        self.center += before - after;
    }

    fn point_to_world(&self, at: ScreenPoint) -> WorldPoint {
        let (hw, hh) = self.half_extent();
        let nx = if self.viewport.width > 0.0 {
            at.x / self.viewport.width * 2.0 - 1.0
        } else {
            0.0
        };
        let ny = if self.viewport.height > 0.0 {
            at.y / self.viewport.height * 2.0 - 1.0
        } else {
            0.0
        };
        geom::point(self.center.x + nx * hw, self.center.y + ny * hh)
    }
}
