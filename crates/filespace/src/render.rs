//! Read-only snapshots for renderers.

use crate::config::GeometryConfig;
use crate::tree::ItemKind;
use filespace_layout::{NodeId, WorldPoint, geom};

#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    pub id: NodeId,
    pub name: String,
    pub position: WorldPoint,
    pub pinned: bool,
    pub depth: usize,
    pub kind: ItemKind,
    /// Folders with children are drawn with a filled rim.
    pub has_children: bool,
    /// `ScaleFactor(depth)`; multiplies every dimension in [`GeometryConfig`].
    pub scale: f64,
    pub hovered: bool,
}

impl NodeView {
    pub fn inner_radius(&self, geometry: &GeometryConfig) -> f64 {
        geometry.inner_radius * self.scale
    }

    pub fn outer_radius(&self, geometry: &GeometryConfig) -> f64 {
        geometry.outer_radius * self.scale
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkView {
    pub parent: NodeId,
    pub child: NodeId,
    pub from: WorldPoint,
    pub to: WorldPoint,
    pub parent_scale: f64,
    pub child_scale: f64,
}

impl LinkView {
    /// The part of the link between the two node rims, or `None` when the discs overlap.
    pub fn visible_segment(&self, geometry: &GeometryConfig) -> Option<(WorldPoint, WorldPoint)> {
        geom::trim_segment(
            self.from,
            self.to,
            geometry.outer_radius * self.parent_scale,
            geometry.outer_radius * self.child_scale,
        )
    }

    /// Links are as thick as the child's rim.
    pub fn thickness(&self, geometry: &GeometryConfig) -> f64 {
        geometry.link_diameter() * self.child_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_segment_stops_at_scaled_rims() {
        let g = GeometryConfig::default();
        let link = LinkView {
            parent: NodeId::new(0),
            child: NodeId::new(1),
            from: geom::point(0.0, 0.0),
            to: geom::point(50.0, 0.0),
            parent_scale: 1.0,
            child_scale: 0.6,
        };
        let (a, b) = link.visible_segment(&g).expect("visible");
        assert!((a.x - 11.5).abs() < 1e-12);
        assert!((b.x - (50.0 - 11.5 * 0.6)).abs() < 1e-12);
        assert!((link.thickness(&g) - 1.5 * 0.6).abs() < 1e-12);
    }
}
