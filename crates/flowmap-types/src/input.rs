//! Platform-agnostic input event types.
//!
//! Every host maps its native pointer and wheel input to these enums. The
//! core never sees raw toolkit event objects.

use serde::{Deserialize, Serialize};

/// Identifier the host assigns to a pointer for the lifetime of a contact.
pub type PointerId = u32;

/// A platform-agnostic input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A pointer made contact (mouse button down, finger down, pen down).
    PointerDown {
        id: PointerId,
        kind: PointerKind,
        button: PointerButton,
        x: f64,
        y: f64,
        /// The host hit-tested the position against an interactive control
        /// (option, material chip, toggle). Such presses never pan.
        over_control: bool,
    },
    /// A pointer moved to an absolute client position.
    PointerMove {
        id: PointerId,
        kind: PointerKind,
        x: f64,
        y: f64,
    },
    /// A pointer was lifted.
    PointerUp { id: PointerId, kind: PointerKind },
    /// The host cancelled the pointer stream.
    PointerCancel { id: PointerId, kind: PointerKind },
    /// The pointer left the canvas area.
    PointerLeave { id: PointerId, kind: PointerKind },
    /// Wheel or trackpad scroll at a client position.
    Wheel {
        dx: f64,
        dy: f64,
        mode: WheelMode,
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },
}

/// Device class of a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

/// Which button initiated a pointer press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Unit of a wheel delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WheelMode {
    #[default]
    Pixel,
    Line,
    Page,
}

/// Modifier keys held during a wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Ctrl and Cmd both turn scrolling into zooming.
    pub fn zoom(&self) -> bool {
        self.ctrl || self.meta
    }
}
