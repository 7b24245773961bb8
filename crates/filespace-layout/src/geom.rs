/// The z = 0 plane the simulation lays nodes out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldSpace {}

/// Viewport pixels, origin at the top-left corner, y pointing down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenSpace {}

pub type WorldPoint = euclid::Point2D<f64, WorldSpace>;
pub type WorldVector = euclid::Vector2D<f64, WorldSpace>;
pub type ScreenPoint = euclid::Point2D<f64, ScreenSpace>;
pub type ScreenVector = euclid::Vector2D<f64, ScreenSpace>;
pub type ScreenSize = euclid::Size2D<f64, ScreenSpace>;

pub fn point(x: f64, y: f64) -> WorldPoint {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> WorldVector {
    euclid::vec2(x, y)
}

pub fn screen_point(x: f64, y: f64) -> ScreenPoint {
    euclid::point2(x, y)
}

/// Shortens the segment `start -> end` by `start_offset` at its start and `end_offset` at its end.
///
/// Used for links drawn between two node discs: each end stops at the disc rim instead of the
/// center. Returns `None` when the discs overlap (nothing left to draw).
pub fn trim_segment(
    start: WorldPoint,
    end: WorldPoint,
    start_offset: f64,
    end_offset: f64,
) -> Option<(WorldPoint, WorldPoint)> {
    let spacing = start.distance_to(end);
    let remaining = spacing - start_offset - end_offset;
    if !(spacing.is_finite() && remaining > 0.0) {
        return None;
    }
    let dir = (end - start) / spacing;
    Some((start + dir * start_offset, end - dir * end_offset))
}
