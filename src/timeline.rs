//! The host-facing timeline: intervals in, render blocks and actions out.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

use crate::config::TimelineConfig;
use crate::coalescing::TimelineProcessor;
use crate::interaction::{InteractionLayer, PointerEvent, TimelineAction};
use crate::metadata::AppMetadataProvider;
use crate::models::{ActivityInterval, RenderBlock, TimeWindow};
use crate::navigator::{self, NavigatorConfig, NavigatorDrag, NavigatorThumb};
use crate::viewport::ViewportController;

const ENABLE_LOGS: bool = false;

pub struct Timeline {
    intervals: Vec<ActivityInterval>,
    processor: TimelineProcessor,
    viewport: ViewportController,
    interaction: InteractionLayer,
    navigator_config: NavigatorConfig,
    navigator_drag: NavigatorDrag,
    blocks: Vec<RenderBlock>,
    /// Set by anything that invalidates `blocks`
    dirty: bool,
    last_now: Option<DateTime<Utc>>,
}

impl Timeline {
    pub fn new(
        total: TimeWindow,
        config: &TimelineConfig,
        metadata: Box<dyn AppMetadataProvider>,
    ) -> Self {
        Self {
            intervals: Vec::new(),
            processor: TimelineProcessor::new(
                config.coalescing.clone(),
                config.palette(),
                metadata,
            ),
            viewport: ViewportController::new(total, &config.viewport),
            interaction: InteractionLayer::new(config.interaction.clone()),
            navigator_config: config.navigator.clone(),
            navigator_drag: NavigatorDrag::default(),
            blocks: Vec::new(),
            dirty: true,
            last_now: None,
        }
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    /// Mutable access for host-driven viewport changes (reset, zoom buttons).
    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        self.dirty = true;
        &mut self.viewport
    }

    pub fn intervals(&self) -> &[ActivityInterval] {
        &self.intervals
    }

    pub fn set_intervals(&mut self, intervals: Vec<ActivityInterval>) {
        self.intervals = intervals;
        self.dirty = true;
    }

    pub fn push_interval(&mut self, interval: ActivityInterval) {
        self.intervals.push(interval);
        self.dirty = true;
    }

    /// Close the open interval with `id`, e.g. when focus moves to another app.
    pub fn close_interval(&mut self, id: &str, end_time: DateTime<Utc>) -> Result<()> {
        let interval = self
            .intervals
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| anyhow!("no interval with id {}", id))?;
        interval.close(end_time)?;
        self.dirty = true;
        Ok(())
    }

    pub fn set_canvas_width(&mut self, canvas_width_px: f64) -> Result<()> {
        self.viewport.set_canvas_width(canvas_width_px)?;
        self.dirty = true;
        Ok(())
    }

    pub fn set_total_window(&mut self, total: TimeWindow) -> Result<()> {
        self.viewport.set_total_window(total)?;
        self.dirty = true;
        Ok(())
    }

    /// Render blocks for the current viewport, recomputed only when stale.
    pub fn blocks(&mut self, now: DateTime<Utc>) -> &[RenderBlock] {
        self.refresh(now);
        &self.blocks
    }

    /// Feed one pointer event through the interaction layer.
    ///
    /// Hit testing runs against the blocks as they are drawn at `now`.
    pub fn handle_event(&mut self, event: PointerEvent, now: DateTime<Utc>) -> Vec<TimelineAction> {
        self.refresh(now);
        let actions = self
            .interaction
            .handle(event, &mut self.viewport, &self.blocks);
        if actions
            .iter()
            .any(|a| matches!(a, TimelineAction::ViewportChanged(_)))
        {
            self.dirty = true;
        }
        actions
    }

    pub fn navigator_thumb(&self, track_width_px: f64) -> NavigatorThumb {
        navigator::thumb(
            &self.viewport.visible_window(),
            &self.viewport.total_window(),
            track_width_px,
            &self.navigator_config,
        )
    }

    /// Start a thumb drag if `x` lands on the thumb.
    pub fn press_navigator(&mut self, x: f64, track_width_px: f64) -> bool {
        let thumb = self.navigator_thumb(track_width_px);
        self.navigator_drag.press(x, &thumb)
    }

    /// Continue a thumb drag. Returns the new visible window if it moved.
    pub fn drag_navigator_to(&mut self, x: f64, track_width_px: f64) -> Result<Option<TimeWindow>> {
        let Some(delta_px) = self.navigator_drag.drag_to(x) else {
            return Ok(None);
        };
        self.drag_navigator(delta_px, track_width_px)
    }

    pub fn release_navigator(&mut self) {
        self.navigator_drag.release();
    }

    /// Pan by a thumb movement of `delta_px` on a track `track_width_px` wide.
    pub fn drag_navigator(&mut self, delta_px: f64, track_width_px: f64) -> Result<Option<TimeWindow>> {
        let before = self.viewport.visible_window();
        let secs = navigator::thumb_drag_to_pan_secs(
            delta_px,
            &self.viewport.total_window(),
            track_width_px,
        );
        self.viewport.pan(secs)?;
        let after = self.viewport.visible_window();
        if after == before {
            return Ok(None);
        }
        self.dirty = true;
        Ok(Some(after))
    }

    fn refresh(&mut self, now: DateTime<Utc>) {
        let now_matters =
            self.last_now != Some(now) && self.intervals.iter().any(ActivityInterval::is_open);
        if !self.dirty && !now_matters {
            return;
        }

        self.blocks = self.processor.process(
            &self.intervals,
            &self.viewport.visible_window(),
            self.viewport.canvas_width_px(),
            now,
        );
        self.dirty = false;
        self.last_now = Some(now);
        crate::log_trace!("Refreshed timeline: {} blocks", self.blocks.len());
    }
}
