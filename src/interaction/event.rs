use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn zoom_held(&self) -> bool {
        self.control || self.meta
    }
}

/// Raw input from the host surface, in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PointerEvent {
    Moved {
        x: f64,
        y: f64,
    },
    Pressed {
        x: f64,
        y: f64,
        #[serde(default)]
        button: PointerButton,
        #[serde(default)]
        modifiers: Modifiers,
        /// 2 for the second press of a double-click, as reported by the host
        click_count: u32,
    },
    Released {
        x: f64,
        y: f64,
    },
    /// Pointer left the surface.
    Exited,
    /// The surface lost pointer capture mid-gesture.
    CaptureLost,
    Wheel {
        dx: f64,
        dy: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Trackpad pinch; positive spreads the fingers (zoom in).
    Magnify {
        magnification: f64,
    },
}

impl PointerEvent {
    pub fn press(x: f64, y: f64) -> Self {
        PointerEvent::Pressed {
            x,
            y,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
            click_count: 1,
        }
    }
}
