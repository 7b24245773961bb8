//! Pop-on-read input buffering.
//!
//! Host event handlers push raw pointer, wheel, tap, pan and pinch events into an
//! [`InputQueue`]; once per frame the controller takes an [`InputFrame`] with
//! [`InputQueue::pop_frame`]. Everything queued is delivered at most once. The in-progress drag and
//! pointer position are state, not events, and survive the pop.

use filespace_layout::ScreenPoint;

/// Identifies one pan gesture from start to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DragId(u64);

impl DragId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Click {
    pub position: ScreenPoint,
    /// Set by the first consumer that acts on this click.
    pub handled: bool,
}

impl Click {
    pub fn at(position: ScreenPoint) -> Self {
        Self {
            position,
            handled: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragProgress {
    pub id: DragId,
    pub start: ScreenPoint,
    pub current: ScreenPoint,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinishedDrag {
    pub id: DragId,
    pub end: ScreenPoint,
}

/// Pinch scale relative to the previous frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchSample {
    pub scale: f64,
    pub position: ScreenPoint,
}

/// Everything the controller consumes in one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputFrame {
    pub pointer: Option<ScreenPoint>,
    pub clicks: Vec<Click>,
    pub drag: Option<DragProgress>,
    pub finished_drags: Vec<FinishedDrag>,
    /// Accumulated normalized wheel spin; negative zooms in.
    pub wheel_delta: f64,
    pub pinch: Option<PinchSample>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

/// A browser-style wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelEvent {
    pub delta_x: f64,
    pub delta_y: f64,
    pub delta_mode: DeltaMode,
    /// Legacy `wheelDeltaX`/`wheelDeltaY` (multiples of 120 per notch), when the source has them.
    pub wheel_delta_x: Option<f64>,
    pub wheel_delta_y: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedWheel {
    /// Wheel notches; one slow step of a mouse wheel is 1.
    pub spin_x: f64,
    pub spin_y: f64,
    pub pixel_x: f64,
    pub pixel_y: f64,
}

const LINE_HEIGHT: f64 = 40.0;
const PAGE_HEIGHT: f64 = 800.0;
const LEGACY_NOTCH: f64 = 120.0;

/// Converts a wheel event into spin (notches) and pixel distances.
pub fn normalize_wheel(event: &WheelEvent) -> NormalizedWheel {
    let mut spin_x = event.wheel_delta_x.map_or(0.0, |d| -d / LEGACY_NOTCH);
    let mut spin_y = event.wheel_delta_y.map_or(0.0, |d| -d / LEGACY_NOTCH);

    let unit = match event.delta_mode {
        DeltaMode::Pixel => 1.0,
        DeltaMode::Line => LINE_HEIGHT,
        DeltaMode::Page => PAGE_HEIGHT,
    };
    let pixel_x = event.delta_x * unit;
    let pixel_y = event.delta_y * unit;

    // Without a legacy delta, fall back to one notch in the scroll direction.
    if pixel_x != 0.0 && spin_x == 0.0 {
        spin_x = pixel_x.signum();
    }
    if pixel_y != 0.0 && spin_y == 0.0 {
        spin_y = pixel_y.signum();
    }

    NormalizedWheel {
        spin_x,
        spin_y,
        pixel_x,
        pixel_y,
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    pointer: Option<ScreenPoint>,
    clicks: Vec<Click>,
    drag: Option<DragProgress>,
    finished_drags: Vec<FinishedDrag>,
    wheel_delta: f64,
    pinch_baseline: Option<f64>,
    pinch_scale: Option<f64>,
    pinch_position: Option<ScreenPoint>,
    next_drag: u64,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer(&self) -> Option<ScreenPoint> {
        self.pointer
    }

    pub fn current_drag(&self) -> Option<&DragProgress> {
        self.drag.as_ref()
    }

    pub fn pointer_moved(&mut self, at: ScreenPoint) {
        self.pointer = Some(at);
    }

    pub fn pointer_left(&mut self) {
        self.pointer = None;
    }

    pub fn wheel(&mut self, event: &WheelEvent) {
        self.wheel_delta += normalize_wheel(event).spin_y;
    }

    pub fn tap(&mut self, at: ScreenPoint) {
        self.clicks.push(Click::at(at));
    }

    /// Begins a pan; a pan already in progress is kept and its id returned.
    pub fn pan_start(&mut self, at: ScreenPoint) -> DragId {
        if let Some(drag) = &self.drag {
            return drag.id;
        }
        let id = DragId::new(self.next_drag);
        self.next_drag += 1;
        self.drag = Some(DragProgress {
            id,
            start: at,
            current: at,
        });
        id
    }

    pub fn pan_move(&mut self, at: ScreenPoint) {
        if let Some(drag) = &mut self.drag {
            drag.current = at;
        }
    }

    pub fn pan_end(&mut self, at: ScreenPoint) {
        if let Some(drag) = self.drag.take() {
            self.finished_drags.push(FinishedDrag {
                id: drag.id,
                end: at,
            });
        }
    }

    pub fn pinch_start(&mut self, at: ScreenPoint) {
        self.pinch_baseline = Some(1.0);
        self.pinch_scale = None;
        self.pinch_position = Some(at);
    }

    /// `scale` is cumulative since [`pinch_start`](Self::pinch_start).
    pub fn pinch_move(&mut self, scale: f64) {
        if self.pinch_baseline.is_some() && scale.is_finite() && scale > 0.0 {
            self.pinch_scale = Some(scale);
        }
    }

    pub fn pinch_end(&mut self) {
        self.pinch_baseline = None;
        self.pinch_scale = None;
        self.pinch_position = None;
    }

    /// Drains queued events into a frame.
    pub fn pop_frame(&mut self) -> InputFrame {
        InputFrame {
            pointer: self.pointer,
            clicks: std::mem::take(&mut self.clicks),
            drag: self.drag,
            finished_drags: std::mem::take(&mut self.finished_drags),
            wheel_delta: std::mem::take(&mut self.wheel_delta),
            pinch: self.pop_pinch(),
        }
    }

    /// A pinch that has started but not moved yet reports a neutral `1.0`.
    fn pop_pinch(&mut self) -> Option<PinchSample> {
        let (baseline, position) = (self.pinch_baseline?, self.pinch_position?);
        let scale = self.pinch_scale.unwrap_or(baseline);
        self.pinch_baseline = Some(scale);
        Some(PinchSample {
            scale: scale / baseline,
            position,
        })
    }
}
