//! Pointer gesture state machine: drag-to-pan, two-finger pinch, wheel.
//!
//! ```text
//! Idle ──primary down on empty canvas──▶ Dragging
//! Dragging ──up / cancel / leave──▶ Idle
//! Dragging ──second touch down──▶ Pinching
//! Pinching ──fewer than two touches──▶ Idle
//! ```
//!
//! The machine never touches the viewport. Each event yields at most one
//! [`ViewportAction`] for the caller to apply.

use flowmap_types::geometry::Point;
use flowmap_types::input::{InputEvent, PointerButton, PointerId, PointerKind};

use crate::viewport::ViewportAction;

/// Observable gesture mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureMode {
    Idle,
    Dragging,
    Pinching,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TrackedPointer {
    id: PointerId,
    position: Point,
    /// Arrival order; slot order is not arrival order once slots are reused.
    seq: u64,
}

/// Fixed-capacity set of active touch pointers.
#[derive(Debug, Clone)]
pub struct PointerArena {
    slots: Vec<Option<TrackedPointer>>,
    next_seq: u64,
}

impl PointerArena {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            next_seq: 0,
        }
    }

    fn slot_of(&self, id: PointerId) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.is_some_and(|p| p.id == id))
    }

    /// Track a pointer (or move it if already tracked). Returns `false` when
    /// the arena is full.
    pub fn insert(&mut self, id: PointerId, position: Point) -> bool {
        if self.update(id, position) {
            return true;
        }
        let Some(free) = self.slots.iter().position(Option::is_none) else {
            return false;
        };
        self.slots[free] = Some(TrackedPointer {
            id,
            position,
            seq: self.next_seq,
        });
        self.next_seq += 1;
        true
    }

    /// Move a tracked pointer. Returns `false` if it is not tracked.
    pub fn update(&mut self, id: PointerId, position: Point) -> bool {
        match self.slot_of(id).and_then(|i| self.slots[i].as_mut()) {
            Some(p) => {
                p.position = position;
                true
            },
            None => false,
        }
    }

    pub fn remove(&mut self, id: PointerId) -> bool {
        match self.slot_of(id) {
            Some(i) => {
                self.slots[i] = None;
                true
            },
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    /// Positions in arrival order.
    pub fn positions(&self) -> Vec<Point> {
        let mut tracked: Vec<TrackedPointer> = self.slots.iter().flatten().copied().collect();
        tracked.sort_by_key(|p| p.seq);
        tracked.into_iter().map(|p| p.position).collect()
    }
}

/// Distance between the first two points.
pub fn pinch_distance(points: &[Point]) -> Option<f64> {
    match points {
        [a, b, ..] => Some(a.distance(*b)),
        _ => None,
    }
}

/// Average of all points.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let sum = points.iter().fold(Point::ORIGIN, |acc, p| acc + *p);
    Some(Point::new(sum.x / n, sum.y / n))
}

/// One pinch update: the zoom to apply (if a usable previous distance is
/// known) and the distance to remember for the next update.
pub fn pinch_step(
    points: &[Point],
    previous: Option<f64>,
) -> (Option<ViewportAction>, Option<f64>) {
    let distance = pinch_distance(points);
    let action = match (previous, distance, centroid(points)) {
        (Some(prev), Some(d), Some(origin)) if prev > 0.0 => Some(ViewportAction::ZoomAt {
            factor: d / prev,
            origin,
        }),
        _ => None,
    };
    (action, distance)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragAnchor {
    pointer: PointerId,
    start: Point,
    start_pan: Point,
}

/// Gesture tracking for the canvas.
#[derive(Debug, Clone)]
pub struct GestureState {
    touches: PointerArena,
    drag: Option<DragAnchor>,
    previous_distance: Option<f64>,
}

impl GestureState {
    pub fn new(max_touch_points: usize) -> Self {
        Self {
            touches: PointerArena::with_capacity(max_touch_points),
            drag: None,
            previous_distance: None,
        }
    }

    pub fn mode(&self) -> GestureMode {
        if self.touches.len() >= 2 {
            GestureMode::Pinching
        } else if self.drag.is_some() {
            GestureMode::Dragging
        } else {
            GestureMode::Idle
        }
    }

    /// Pointer currently driving a drag.
    pub fn drag_pointer(&self) -> Option<PointerId> {
        self.drag.map(|d| d.pointer)
    }

    pub fn touch_count(&self) -> usize {
        self.touches.len()
    }

    /// Drop every tracked pointer and return to `Idle`.
    pub fn reset(&mut self) {
        self.touches.clear();
        self.drag = None;
        self.previous_distance = None;
    }

    fn start_drag(&mut self, pointer: PointerId, start: Point, pan: Point) {
        log::debug!("Drag start: pointer {pointer}");
        self.drag = Some(DragAnchor {
            pointer,
            start,
            start_pan: pan,
        });
    }

    fn end_drag(&mut self, pointer: PointerId) {
        if self.drag.is_some_and(|d| d.pointer == pointer) {
            log::debug!("Drag end: pointer {pointer}");
            self.drag = None;
        }
    }

    /// Feed one event. `pan` is the viewport's current pan, used to anchor
    /// a new drag.
    pub fn handle(&mut self, event: &InputEvent, pan: Point) -> Option<ViewportAction> {
        match *event {
            InputEvent::PointerDown {
                id,
                kind,
                button,
                x,
                y,
                over_control,
            } => {
                if over_control {
                    return None;
                }
                let position = Point::new(x, y);
                if kind == PointerKind::Touch {
                    if !self.touches.insert(id, position) {
                        log::debug!(
                            "Touch {id} ignored: all {} touch slots in use",
                            self.touches.capacity()
                        );
                        return None;
                    }
                    match self.touches.len() {
                        1 => {
                            self.previous_distance = None;
                            self.start_drag(id, position, pan);
                        },
                        2 => {
                            self.previous_distance = pinch_distance(&self.touches.positions());
                            self.drag = None;
                            log::debug!("Pinch start");
                        },
                        _ => {},
                    }
                    return None;
                }
                if kind == PointerKind::Mouse && button != PointerButton::Primary {
                    return None;
                }
                self.start_drag(id, position, pan);
                None
            },
            InputEvent::PointerMove { id, kind, x, y } => {
                let position = Point::new(x, y);
                if kind == PointerKind::Touch {
                    let tracked = self.touches.update(id, position);
                    if tracked && self.touches.len() == 1 && self.drag.is_none() {
                        self.previous_distance = None;
                        self.start_drag(id, position, pan);
                    }
                    if self.touches.len() >= 2 {
                        let (action, distance) =
                            pinch_step(&self.touches.positions(), self.previous_distance);
                        self.previous_distance = distance;
                        return action;
                    }
                }
                let drag = self.drag.filter(|d| d.pointer == id)?;
                Some(ViewportAction::SetPan(drag.start_pan + (position - drag.start)))
            },
            InputEvent::PointerUp { id, kind } => {
                if kind == PointerKind::Touch {
                    self.touches.remove(id);
                    if self.touches.len() < 2 {
                        self.previous_distance = None;
                    }
                }
                self.end_drag(id);
                None
            },
            InputEvent::PointerCancel { .. } | InputEvent::PointerLeave { .. } => {
                if self.mode() != GestureMode::Idle || !self.touches.is_empty() {
                    log::debug!("Gesture cancelled");
                }
                self.reset();
                None
            },
            InputEvent::Wheel {
                dx,
                dy,
                mode,
                x,
                y,
                modifiers,
            } => {
                if modifiers.zoom() {
                    Some(ViewportAction::WheelZoom {
                        dy,
                        origin: Point::new(x, y),
                    })
                } else {
                    Some(ViewportAction::WheelPan { dx, dy, mode })
                }
            },
        }
    }
}
