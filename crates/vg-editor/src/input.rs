//! Input abstraction layer.
//!
//! Normalizes pointer events from the host into a unified `InputEvent`
//! consumed by tools. Each event carries both the scene-space point (for
//! geometry) and the view-space point (for panning and zooming).

use kurbo::Point;

/// Keyboard modifiers held during a pointer or key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub const ALT: Modifiers = Modifiers {
        alt: true,
        ..Modifiers::NONE
    };

    pub fn new(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Self {
        Self {
            shift,
            ctrl,
            alt,
            meta,
        }
    }

    /// The platform command key: ⌘ on macOS, ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A normalized pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed.
    PointerDown {
        point: Point,
        screen: Point,
        modifiers: Modifiers,
    },

    /// Pointer dragged while pressed.
    PointerMove {
        point: Point,
        screen: Point,
        modifiers: Modifiers,
    },

    /// Pointer released.
    PointerUp {
        point: Point,
        screen: Point,
        modifiers: Modifiers,
    },
}

impl InputEvent {
    /// Scene-space position.
    pub fn point(&self) -> Point {
        match self {
            InputEvent::PointerDown { point, .. }
            | InputEvent::PointerMove { point, .. }
            | InputEvent::PointerUp { point, .. } => *point,
        }
    }

    /// View-space position.
    pub fn screen(&self) -> Point {
        match self {
            InputEvent::PointerDown { screen, .. }
            | InputEvent::PointerMove { screen, .. }
            | InputEvent::PointerUp { screen, .. } => *screen,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            InputEvent::PointerDown { modifiers, .. }
            | InputEvent::PointerMove { modifiers, .. }
            | InputEvent::PointerUp { modifiers, .. } => *modifiers,
        }
    }
}
