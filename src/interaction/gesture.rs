//! Click / double-click / drag disambiguation as an explicit state machine.
//!
//! `Idle -> Pressed -> {Dragging | click} -> Idle`. The recognizer knows
//! nothing about time windows or blocks; it only classifies pointer input.

use super::event::{Modifiers, PointerButton};

/// Where and how a press started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressOrigin {
    pub x: f64,
    pub y: f64,
    pub button: PointerButton,
    pub modifiers: Modifiers,
    pub click_count: u32,
}

/// A drag in progress: exists only between press and release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingDragSelection {
    pub origin: PressOrigin,
    pub current_x: f64,
    pub current_y: f64,
}

impl PendingDragSelection {
    /// Horizontal pixel range `[min, max]` covered so far.
    pub fn x_range(&self) -> (f64, f64) {
        (
            self.origin.x.min(self.current_x),
            self.origin.x.max(self.current_x),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Pressed(PressOrigin),
    Dragging(PendingDragSelection),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    None,
    Hover { x: f64, y: f64 },
    HoverExit,
    /// Drag started or moved; the live selection must be redrawn.
    DragUpdated(PendingDragSelection),
    Click(PressOrigin),
    DoubleClick(PressOrigin),
    DragCommitted(PendingDragSelection),
    /// A press or drag ended without committing anything.
    Cancelled { was_dragging: bool },
}

#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    state: GestureState,
    click_distance_px: f64,
}

impl GestureRecognizer {
    pub fn new(click_distance_px: f64) -> Self {
        Self {
            state: GestureState::Idle,
            click_distance_px,
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn press(
        &mut self,
        x: f64,
        y: f64,
        button: PointerButton,
        modifiers: Modifiers,
        click_count: u32,
    ) -> GestureOutcome {
        // A second button during an active gesture is ignored
        if !matches!(self.state, GestureState::Idle) {
            return GestureOutcome::None;
        }
        self.state = GestureState::Pressed(PressOrigin {
            x,
            y,
            button,
            modifiers,
            click_count,
        });
        GestureOutcome::None
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> GestureOutcome {
        match self.state {
            GestureState::Idle => GestureOutcome::Hover { x, y },
            GestureState::Pressed(origin) => {
                if self.displacement(&origin, x, y) < self.click_distance_px {
                    return GestureOutcome::None;
                }
                let selection = PendingDragSelection {
                    origin,
                    current_x: x,
                    current_y: y,
                };
                self.state = GestureState::Dragging(selection);
                GestureOutcome::DragUpdated(selection)
            }
            GestureState::Dragging(mut selection) => {
                selection.current_x = x;
                selection.current_y = y;
                self.state = GestureState::Dragging(selection);
                GestureOutcome::DragUpdated(selection)
            }
        }
    }

    /// Classified by the press-to-release displacement alone.
    pub fn release(&mut self, x: f64, y: f64) -> GestureOutcome {
        let origin = match std::mem::take(&mut self.state) {
            GestureState::Idle => return GestureOutcome::None,
            GestureState::Pressed(origin) => origin,
            GestureState::Dragging(selection) => selection.origin,
        };

        if self.displacement(&origin, x, y) < self.click_distance_px {
            if origin.click_count >= 2 {
                GestureOutcome::DoubleClick(origin)
            } else {
                GestureOutcome::Click(origin)
            }
        } else {
            GestureOutcome::DragCommitted(PendingDragSelection {
                origin,
                current_x: x,
                current_y: y,
            })
        }
    }

    /// Capture loss ends whatever was in flight without committing it.
    pub fn cancel(&mut self) -> GestureOutcome {
        match std::mem::take(&mut self.state) {
            GestureState::Idle => GestureOutcome::None,
            GestureState::Pressed(_) => GestureOutcome::Cancelled {
                was_dragging: false,
            },
            GestureState::Dragging(_) => GestureOutcome::Cancelled { was_dragging: true },
        }
    }

    /// Leaving the surface only matters for hover; a captured drag keeps going.
    pub fn exit(&mut self) -> GestureOutcome {
        match self.state {
            GestureState::Idle => GestureOutcome::HoverExit,
            _ => GestureOutcome::None,
        }
    }

    fn displacement(&self, origin: &PressOrigin, x: f64, y: f64) -> f64 {
        (x - origin.x).hypot(y - origin.y)
    }
}
