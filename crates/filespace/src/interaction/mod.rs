//! Per-frame gesture resolution.
//!
//! [`Controller::tick`] consumes one [`InputFrame`] and resolves it, in a fixed order, into hover
//! changes, menu clicks, node drags, camera pans and zooms:
//!
//! 1. hover (Leave before Enter, at most one target);
//! 2. clicks (any click hides the menu; a click on a menu button opens that node's menu);
//! 3. finished drags end their session;
//! 4. an unclaimed drag is claimed as a node drag or a camera pan, based on where it started;
//! 5. the active drag session follows the pointer;
//! 6. wheel and pinch zoom the camera.
//!
//! A node that disappears mid-drag detaches the session instead of failing; the drag stays
//! claimed until it ends so it never turns into a camera pan halfway through.

mod session;

use crate::camera::Camera;
use crate::config::InteractionConfig;
use crate::input::{DragProgress, InputFrame};
use crate::menu::{ActionHost, Menu, menu_for};
use crate::picker::{Picker, SurfaceKind};
use crate::tree::FilespaceTree;
use filespace_layout::{NodeId, ScreenPoint, Simulation, WorldVector};
use session::Session;

/// The collaborators a tick talks to.
pub struct Collaborators<'a> {
    pub picker: &'a mut dyn Picker,
    pub camera: &'a mut dyn Camera,
    pub menu: &'a mut dyn Menu,
    pub host: &'a dyn ActionHost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HoverTarget {
    pub node: NodeId,
    pub surface: SurfaceKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverEvent {
    Leave(HoverTarget),
    Enter(HoverTarget),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionState {
    Idle,
    Hovering(HoverTarget),
    NodeDragging { node: NodeId, offset: WorldVector },
    CameraPanning,
    PinchZooming { anchor: ScreenPoint },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub hover_events: Vec<HoverEvent>,
    /// Nodes whose menu was shown this tick, in click order.
    pub menus_opened: Vec<NodeId>,
    /// Zoom factors applied to the camera, in order.
    pub zoom_factors: Vec<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct Controller {
    config: InteractionConfig,
    hover: Option<HoverTarget>,
    session: Option<Session>,
}

impl Controller {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            hover: None,
            session: None,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn hover(&self) -> Option<HoverTarget> {
        self.hover
    }

    /// Highest-priority active state: drag or pan, then pinch, then hover.
    pub fn state(&self) -> InteractionState {
        match self.session {
            Some(Session::NodeDrag { node, offset, .. }) => {
                InteractionState::NodeDragging { node, offset }
            }
            Some(Session::CameraPan { .. }) => InteractionState::CameraPanning,
            Some(Session::Pinch { anchor, .. }) => InteractionState::PinchZooming { anchor },
            Some(Session::Detached { .. }) | None => match self.hover {
                Some(target) => InteractionState::Hovering(target),
                None => InteractionState::Idle,
            },
        }
    }

    /// Drops the active gesture and hover target, releasing any dragged node.
    ///
    /// For hosts that lose the pointer mid-gesture (focus loss, device disconnect).
    pub fn reset(&mut self, sim: &mut Simulation) {
        if let Some(session) = self.session.take() {
            release(session, sim);
        }
        self.hover = None;
    }

    pub fn tick(
        &mut self,
        frame: &mut InputFrame,
        tree: &FilespaceTree,
        sim: &mut Simulation,
        io: &mut Collaborators<'_>,
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        self.update_hover(frame, tree, io, &mut outcome);
        self.handle_clicks(frame, tree, io, &mut outcome);

        for finished in &frame.finished_drags {
            let Some(session) = self.session else { break };
            if session.drag_id() == Some(finished.id) {
                self.session = None;
                finish(session, finished.end, tree, sim, io);
            }
        }

        self.detach_if_missing(tree, sim);
        match frame.drag {
            Some(drag) => {
                let claimed = self
                    .session
                    .is_some_and(|s| s.drag_id() == Some(drag.id));
                if !claimed {
                    if let Some(stale) = self.session.take() {
                        release(stale, sim);
                    }
                    self.session = Some(claim(drag, tree, sim, io));
                }
                if let Some(session) = self.session {
                    self.session = Some(advance(session, drag.current, tree, sim, io));
                }
            }
            None => {
                if let Some(session) = self.session {
                    if session.drag_id().is_some() {
                        tracing::debug!(?session, "drag vanished without finishing");
                        self.session = None;
                        release(session, sim);
                    }
                }
            }
        }

        self.zoom(frame, io, &mut outcome);
        outcome
    }

    fn update_hover(
        &mut self,
        frame: &InputFrame,
        tree: &FilespaceTree,
        io: &mut Collaborators<'_>,
        outcome: &mut TickOutcome,
    ) {
        if let Some(old) = self.hover {
            if !tree.contains(old.node) {
                outcome.hover_events.push(HoverEvent::Leave(old));
                self.hover = None;
            }
        }

        let Some(pointer) = frame.pointer else {
            if let Some(old) = self.hover.take() {
                outcome.hover_events.push(HoverEvent::Leave(old));
            }
            return;
        };
        let next = io
            .picker
            .pick(pointer)
            .filter(|hit| tree.contains(hit.node))
            .map(|hit| HoverTarget {
                node: hit.node,
                surface: hit.surface,
            });
        if next == self.hover {
            return;
        }
        if let Some(old) = self.hover.take() {
            outcome.hover_events.push(HoverEvent::Leave(old));
        }
        if let Some(new) = next {
            outcome.hover_events.push(HoverEvent::Enter(new));
        }
        self.hover = next;
    }

    fn handle_clicks(
        &mut self,
        frame: &mut InputFrame,
        tree: &FilespaceTree,
        io: &mut Collaborators<'_>,
        outcome: &mut TickOutcome,
    ) {
        if frame.clicks.is_empty() {
            return;
        }
        io.menu.hide();

        for click in frame.clicks.iter_mut().filter(|c| !c.handled) {
            let Some(hit) = io.picker.pick(click.position) else {
                continue;
            };
            if hit.surface != SurfaceKind::MenuButton {
                continue;
            }
            let Some(node) = tree.get(hit.node) else {
                tracing::debug!(node = %hit.node, "menu button picked for a missing item");
                continue;
            };
            let sections = menu_for(node, io.host);
            io.menu.show(node.id(), &sections, click.position);
            click.handled = true;
            outcome.menus_opened.push(node.id());
            tracing::debug!(node = %node.id(), "menu opened");
        }
    }

    fn detach_if_missing(&mut self, tree: &FilespaceTree, sim: &mut Simulation) {
        if let Some(Session::NodeDrag { drag, node, .. }) = self.session {
            if !(tree.contains(node) && sim.contains(node)) {
                tracing::debug!(node = %node, "dragged node removed mid-gesture");
                sim.cool_down();
                self.session = Some(Session::Detached { drag });
            }
        }
    }

    fn zoom(&mut self, frame: &InputFrame, io: &mut Collaborators<'_>, outcome: &mut TickOutcome) {
        if let Some(pointer) = frame.pointer {
            if frame.wheel_delta != 0.0 {
                let factor = self.config.zoom_factor(frame.wheel_delta);
                io.camera.zoom_by(factor, pointer);
                outcome.zoom_factors.push(factor);
            }
        }

        match frame.pinch {
            Some(pinch) => {
                if pinch.scale != 1.0 {
                    io.camera.zoom_by(pinch.scale, pinch.position);
                    outcome.zoom_factors.push(pinch.scale);
                }
                match self.session {
                    None => {
                        self.session = Some(Session::Pinch {
                            anchor: pinch.position,
                            scale: pinch.scale,
                        });
                    }
                    Some(Session::Pinch { anchor, scale }) => {
                        self.session = Some(Session::Pinch {
                            anchor,
                            scale: scale * pinch.scale,
                        });
                    }
                    Some(_) => {}
                }
            }
            None => {
                if let Some(Session::Pinch { scale, .. }) = self.session {
                    tracing::debug!(scale, "pinch ended");
                    self.session = None;
                }
            }
        }
    }
}

/// Claims an unclaimed drag as a node drag or a camera pan, by what lies under its start.
fn claim(
    drag: DragProgress,
    tree: &FilespaceTree,
    sim: &mut Simulation,
    io: &mut Collaborators<'_>,
) -> Session {
    let hit = io
        .picker
        .pick(drag.start)
        .filter(|hit| hit.surface.is_draggable() && tree.contains(hit.node));

    if let Some(hit) = hit {
        match sim.pin_in_place(hit.node) {
            Ok(position) => {
                let offset = io.camera.point_to_world(drag.start) - position;
                let heat = sim.config().drag_heat;
                sim.restart(heat);
                sim.sustain(heat);
                tracing::debug!(node = %hit.node, surface = ?hit.surface, "node drag started");
                return Session::NodeDrag {
                    drag: drag.id,
                    node: hit.node,
                    offset,
                };
            }
            Err(err) => {
                tracing::debug!(node = %hit.node, %err, "drag target missing from the layout");
            }
        }
    }

    tracing::debug!(x = drag.start.x, y = drag.start.y, "camera pan started");
    Session::CameraPan {
        drag: drag.id,
        last: drag.start,
    }
}

/// Runs a finished drag's final update and releases what it held.
fn finish(
    session: Session,
    at: ScreenPoint,
    tree: &FilespaceTree,
    sim: &mut Simulation,
    io: &mut Collaborators<'_>,
) {
    match advance(session, at, tree, sim, io) {
        Session::NodeDrag { node, .. } => {
            if let Err(err) = sim.unpin(node) {
                tracing::debug!(node = %node, %err, "dragged node vanished before release");
            }
            sim.cool_down();
            tracing::debug!(node = %node, "node drag ended");
        }
        Session::CameraPan { .. } => tracing::debug!("camera pan ended"),
        Session::Detached { .. } => sim.cool_down(),
        Session::Pinch { .. } => {}
    }
}

/// Moves the session to the pointer's current screen position.
fn advance(
    session: Session,
    at: ScreenPoint,
    tree: &FilespaceTree,
    sim: &mut Simulation,
    io: &mut Collaborators<'_>,
) -> Session {
    match session {
        Session::NodeDrag { drag, node, offset } => {
            if !tree.contains(node) {
                return Session::Detached { drag };
            }
            if sim.root() == Some(node) {
                return session;
            }
            let target = io.camera.point_to_world(at) - offset;
            match sim.pin(node, target) {
                Ok(()) => session,
                Err(err) => {
                    tracing::debug!(node = %node, %err, "dragged node missing from the layout");
                    Session::Detached { drag }
                }
            }
        }
        Session::CameraPan { drag, last } => {
            let delta = io.camera.point_to_world(at) - io.camera.point_to_world(last);
            io.camera.pan_by(-delta);
            Session::CameraPan { drag, last: at }
        }
        Session::Pinch { .. } | Session::Detached { .. } => session,
    }
}

fn release(session: Session, sim: &mut Simulation) {
    if let Session::NodeDrag { node, .. } = session {
        if let Err(err) = sim.unpin(node) {
            tracing::debug!(node = %node, %err, "released node already gone");
        }
        sim.cool_down();
    }
}
