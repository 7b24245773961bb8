use crate::camera::{Camera, PlaneCamera};
use crate::config::{ButtonRect, GeometryConfig};
use crate::render::NodeView;
use filespace_layout::{NodeId, ScreenPoint, WorldPoint, WorldVector};

/// The part of a node's visual that a screen point landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// Inner disc.
    NodeBody,
    /// Outer rim.
    DragHandle,
    /// Dropdown button below the disc.
    MenuButton,
}

impl SurfaceKind {
    /// Whether a drag starting on this surface moves the node (rather than the camera).
    pub fn is_draggable(self) -> bool {
        matches!(self, SurfaceKind::NodeBody | SurfaceKind::DragHandle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub surface: SurfaceKind,
    pub node: NodeId,
    /// Depth along the pick ray; smaller is closer to the viewer.
    pub distance: f64,
}

/// Resolves a screen point to the closest visual under it.
pub trait Picker {
    fn pick(&mut self, at: ScreenPoint) -> Option<Hit>;
}

impl<F> Picker for F
where
    F: FnMut(ScreenPoint) -> Option<Hit>,
{
    fn pick(&mut self, at: ScreenPoint) -> Option<Hit> {
        self(at)
    }
}

/// Closest of `hits`; the earliest candidate wins ties and NaN distances are skipped.
pub fn closest_hit(hits: impl IntoIterator<Item = Hit>) -> Option<Hit> {
    hits.into_iter()
        .filter(|h| !h.distance.is_nan())
        .fold(None, |best: Option<Hit>, h| match best {
            Some(b) if b.distance <= h.distance => Some(b),
            _ => Some(h),
        })
}

/// Hit-tests [`NodeView`]s drawn flat on the world plane and seen through a [`PlaneCamera`].
///
/// Rebuild it from [`Filespace::views`](crate::Filespace::views) whenever the layout or the camera
/// has moved.
#[derive(Debug, Clone)]
pub struct ViewPicker {
    views: Vec<NodeView>,
    geometry: GeometryConfig,
    camera: PlaneCamera,
}

impl ViewPicker {
    pub fn new(views: Vec<NodeView>, geometry: GeometryConfig, camera: PlaneCamera) -> Self {
        Self {
            views,
            geometry,
            camera,
        }
    }

    pub fn pick_world(&self, at: WorldPoint) -> Option<Hit> {
        closest_hit(self.views.iter().filter_map(|view| self.hit_view(view, at)))
    }

    fn hit_view(&self, view: &NodeView, at: WorldPoint) -> Option<Hit> {
        let offset = at - view.position;
        let button = self.geometry.dropdown_button;
        if in_button(&button, offset / view.scale) {
            return Some(Hit {
                surface: SurfaceKind::MenuButton,
                node: view.id,
                distance: self.camera.distance() - button.depth * view.scale,
            });
        }

        let r = offset.length();
        let surface = if r <= view.inner_radius(&self.geometry) {
            SurfaceKind::NodeBody
        } else if r <= view.outer_radius(&self.geometry) {
            SurfaceKind::DragHandle
        } else {
            return None;
        };
        Some(Hit {
            surface,
            node: view.id,
            distance: self.camera.distance(),
        })
    }
}

impl Picker for ViewPicker {
    fn pick(&mut self, at: ScreenPoint) -> Option<Hit> {
        self.pick_world(self.camera.point_to_world(at))
    }
}

/// `local` is in unscaled disc units with y pointing down the screen.
fn in_button(b: &ButtonRect, local: WorldVector) -> bool {
    let (top, apex) = (-b.top, -b.bottom);
    if !(top..=apex).contains(&local.y) {
        return false;
    }
    let t = (local.y - top) / (apex - top);
    let mid = (b.left + b.right) * 0.5;
    let half_width = (b.right - b.left) * 0.5 * (1.0 - t);
    (local.x - mid).abs() <= half_width
}
