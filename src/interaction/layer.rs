use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::InteractionConfig;
use super::event::{PointerButton, PointerEvent};
use super::gesture::{GestureOutcome, GestureRecognizer, GestureState, PendingDragSelection};
use crate::models::{RenderBlock, TimeWindow};
use crate::tooltip::{hit_test, BlockSummary};
use crate::viewport::ViewportController;

const ENABLE_LOGS: bool = false;

/// What a committed drag will do, decided by drop position and modality.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DragIntent {
    /// Zoom the viewport to the selected range
    Zoom,
    /// Hand the selected range to the record-creation collaborator
    CreateRecord,
}

/// Live selection overlay in canvas pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRect {
    pub x: f64,
    pub width: f64,
    pub intent: DragIntent,
}

/// Everything the host has to react to after an input event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum TimelineAction {
    TooltipChanged(Option<BlockSummary>),
    BlockClicked(BlockSummary),
    /// Collapse/expand and similar block-specific actions belong to the host
    BlockDoubleClicked(BlockSummary),
    EmptyClicked { at: Option<DateTime<Utc>> },
    SelectionChanged(SelectionRect),
    SelectionCleared,
    ViewportChanged(TimeWindow),
    CreateRecord {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Turns raw pointer input into viewport calls or block-level actions.
#[derive(Debug, Clone)]
pub struct InteractionLayer {
    config: InteractionConfig,
    recognizer: GestureRecognizer,
    hovered: Option<Vec<String>>,
}

impl InteractionLayer {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            recognizer: GestureRecognizer::new(config.click_distance_px),
            config,
            hovered: None,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.recognizer.state(), GestureState::Dragging(_))
    }

    pub fn handle(
        &mut self,
        event: PointerEvent,
        viewport: &mut ViewportController,
        blocks: &[RenderBlock],
    ) -> Vec<TimelineAction> {
        let mut actions = Vec::new();
        match event {
            PointerEvent::Moved { x, y } => {
                let outcome = self.recognizer.move_to(x, y);
                self.apply(outcome, viewport, blocks, &mut actions);
            }
            PointerEvent::Pressed {
                x,
                y,
                button,
                modifiers,
                click_count,
            } => {
                let outcome = self.recognizer.press(x, y, button, modifiers, click_count);
                self.apply(outcome, viewport, blocks, &mut actions);
            }
            PointerEvent::Released { x, y } => {
                let was_dragging = self.is_dragging();
                let outcome = self.recognizer.release(x, y);
                if was_dragging {
                    actions.push(TimelineAction::SelectionCleared);
                }
                self.apply(outcome, viewport, blocks, &mut actions);
            }
            PointerEvent::Exited => {
                let outcome = self.recognizer.exit();
                self.apply(outcome, viewport, blocks, &mut actions);
            }
            PointerEvent::CaptureLost => {
                let outcome = self.recognizer.cancel();
                self.apply(outcome, viewport, blocks, &mut actions);
            }
            PointerEvent::Wheel { dx, dy, modifiers } => {
                let before = viewport.visible_window();
                if !dx.is_finite() || !dy.is_finite() {
                    crate::log_debug!("Ignoring wheel event with non-finite delta");
                } else if modifiers.zoom_held() {
                    let factor = self
                        .config
                        .clamp_zoom_factor(1.0 - dy * self.config.wheel_zoom_sensitivity);
                    let _ = viewport.zoom(factor);
                } else {
                    // Shift turns a vertical wheel into a horizontal one
                    let delta = if dx == 0.0 && modifiers.shift { dy } else { dx };
                    if delta != 0.0 {
                        let _ = viewport.pan_pixels(delta);
                    }
                }
                push_if_changed(before, viewport, &mut actions);
            }
            PointerEvent::Magnify { magnification } => {
                let before = viewport.visible_window();
                let factor = self.config.clamp_zoom_factor(1.0 - magnification);
                let _ = viewport.zoom(factor);
                push_if_changed(before, viewport, &mut actions);
            }
        }
        actions
    }

    fn apply(
        &mut self,
        outcome: GestureOutcome,
        viewport: &mut ViewportController,
        blocks: &[RenderBlock],
        actions: &mut Vec<TimelineAction>,
    ) {
        match outcome {
            GestureOutcome::None => {}
            GestureOutcome::Hover { x, y } => {
                let hit = hit_test(x, y, blocks);
                self.set_hovered(hit, actions);
            }
            GestureOutcome::HoverExit => self.set_hovered(None, actions),
            GestureOutcome::DragUpdated(selection) => {
                self.set_hovered(None, actions);
                let (x1, x2) = selection.x_range();
                actions.push(TimelineAction::SelectionChanged(SelectionRect {
                    x: x1,
                    width: x2 - x1,
                    intent: self.intent(&selection),
                }));
            }
            GestureOutcome::Click(origin) => {
                match hit_test(origin.x, origin.y, blocks) {
                    Some(block) => {
                        actions.push(TimelineAction::BlockClicked(BlockSummary::from_block(block)))
                    }
                    None => actions.push(TimelineAction::EmptyClicked {
                        at: viewport.time_for_x(origin.x),
                    }),
                }
            }
            GestureOutcome::DoubleClick(origin) => {
                if let Some(block) = hit_test(origin.x, origin.y, blocks) {
                    actions.push(TimelineAction::BlockDoubleClicked(BlockSummary::from_block(
                        block,
                    )));
                }
            }
            GestureOutcome::DragCommitted(selection) => {
                self.commit_drag(&selection, viewport, actions);
            }
            GestureOutcome::Cancelled { was_dragging } => {
                crate::log_debug!("Gesture cancelled (dragging: {})", was_dragging);
                if was_dragging {
                    actions.push(TimelineAction::SelectionCleared);
                }
            }
        }
    }

    fn intent(&self, selection: &PendingDragSelection) -> DragIntent {
        let secondary = selection.origin.button == PointerButton::Secondary
            || selection.origin.modifiers.alt;
        if secondary || selection.current_y >= self.config.interactive_band_height_px {
            DragIntent::CreateRecord
        } else {
            DragIntent::Zoom
        }
    }

    /// Map the selected pixel range back to time and act on it.
    fn commit_drag(
        &self,
        selection: &PendingDragSelection,
        viewport: &mut ViewportController,
        actions: &mut Vec<TimelineAction>,
    ) {
        let Some(mapping) = viewport.mapping() else {
            return;
        };
        let (x1, x2) = selection.x_range();
        let width = mapping.canvas_width_px();
        let (x1, x2) = (x1.clamp(0.0, width), x2.clamp(0.0, width));
        let (Some(start), Some(end)) = (mapping.time_at(x1), mapping.time_at(x2)) else {
            return;
        };
        if end <= start {
            return;
        }

        match self.intent(selection) {
            DragIntent::Zoom => {
                let before = viewport.visible_window();
                if let Ok(window) = TimeWindow::new(start, end) {
                    let _ = viewport.set_visible_window(window);
                }
                push_if_changed(before, viewport, actions);
            }
            DragIntent::CreateRecord => {
                crate::log_debug!(
                    "Drag resolved to new record {} .. {}",
                    start.to_rfc3339(),
                    end.to_rfc3339()
                );
                actions.push(TimelineAction::CreateRecord { start, end });
            }
        }
    }

    fn set_hovered(&mut self, block: Option<&RenderBlock>, actions: &mut Vec<TimelineAction>) {
        let key = block.map(|b| b.interval_ids.clone());
        if key == self.hovered {
            return;
        }
        self.hovered = key;
        actions.push(TimelineAction::TooltipChanged(
            block.map(BlockSummary::from_block),
        ));
    }
}

fn push_if_changed(
    before: TimeWindow,
    viewport: &ViewportController,
    actions: &mut Vec<TimelineAction>,
) {
    let after = viewport.visible_window();
    if after != before {
        actions.push(TimelineAction::ViewportChanged(after));
    }
}
