use chrono::{DateTime, Duration, Utc};

use crate::coalescing::color::ColorPalette;
use crate::coalescing::config::CoalescingConfig;
use crate::metadata::{AppMetadataProvider, IconCache, NoMetadata};
use crate::models::{ActivityInterval, BlockRect, PixelMapping, RenderBlock, TimeWindow};

const ENABLE_LOGS: bool = false;

/// Run of same-app intervals being accumulated during the scan.
struct PendingBlock<'a> {
    bundle_id: &'a str,
    app_name: &'a str,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    interval_ids: Vec<String>,
    focused: Duration,
}

impl<'a> PendingBlock<'a> {
    fn seed(interval: &'a ActivityInterval, now: DateTime<Utc>) -> Self {
        Self {
            bundle_id: &interval.bundle_id,
            app_name: &interval.app_name,
            start_time: interval.start_time,
            end_time: interval.resolved_end(now),
            interval_ids: vec![interval.id.clone()],
            focused: interval.duration(now),
        }
    }

    /// Extends the end, never the start. Time already covered by the block
    /// is not counted twice when intervals overlap.
    fn absorb(&mut self, interval: &ActivityInterval, now: DateTime<Utc>) {
        let end = interval.resolved_end(now);
        let counted_from = interval.start_time.max(self.end_time);
        if end > counted_from {
            self.focused = self.focused + (end - counted_from);
        }
        self.end_time = self.end_time.max(end);
        self.interval_ids.push(interval.id.clone());
    }
}

/// Turns activity intervals into level-of-detail-reduced render blocks.
///
/// The processor is stateless apart from its metadata cache: identical
/// inputs always produce an identical block list.
pub struct TimelineProcessor {
    config: CoalescingConfig,
    palette: ColorPalette,
    icons: IconCache,
}

impl TimelineProcessor {
    pub fn new(
        config: CoalescingConfig,
        palette: ColorPalette,
        metadata: Box<dyn AppMetadataProvider>,
    ) -> Self {
        Self {
            config,
            palette,
            icons: IconCache::new(metadata),
        }
    }

    pub fn config(&self) -> &CoalescingConfig {
        &self.config
    }

    pub fn icons(&self) -> &IconCache {
        &self.icons
    }

    /// Map `intervals` onto a canvas `canvas_width_px` wide showing `window`.
    ///
    /// Open intervals end at `now`. Blocks come back in non-decreasing x order;
    /// they only overlap where a sub-pixel block was widened to stay visible.
    pub fn process(
        &self,
        intervals: &[ActivityInterval],
        window: &TimeWindow,
        canvas_width_px: f64,
        now: DateTime<Utc>,
    ) -> Vec<RenderBlock> {
        let Some(mapping) = PixelMapping::new(window, canvas_width_px) else {
            return Vec::new();
        };

        // Step 1: filter to the window, stable sort by start
        let mut visible: Vec<&ActivityInterval> = intervals
            .iter()
            .filter(|i| window.overlaps(i.start_time, i.resolved_end(now)))
            .collect();
        visible.sort_by_key(|i| i.start_time);

        let mut blocks = Vec::new();
        let mut culled = 0usize;
        let mut iter = visible.into_iter();
        let Some(first) = iter.next() else {
            return blocks;
        };

        // Step 2: single linear coalescing scan
        let mut pending = PendingBlock::seed(first, now);
        for next in iter {
            let gap_px = mapping.x(next.start_time) - mapping.x(pending.end_time);
            if next.bundle_id == pending.bundle_id && gap_px <= self.config.merge_threshold_px {
                pending.absorb(next, now);
                continue;
            }

            let finished = std::mem::replace(&mut pending, PendingBlock::seed(next, now));
            match self.finalize(finished, &mapping) {
                Some(block) => blocks.push(block),
                None => culled += 1,
            }
        }
        match self.finalize(pending, &mapping) {
            Some(block) => blocks.push(block),
            None => culled += 1,
        }

        crate::log_debug!(
            "Coalesced {} intervals into {} blocks ({} culled) at {:.4} px/s",
            intervals.len(),
            blocks.len(),
            culled,
            mapping.pixels_per_second()
        );

        blocks
    }

    /// Cull sub-epsilon blocks, widen thin ones, attach color and icon.
    fn finalize(&self, pending: PendingBlock<'_>, mapping: &PixelMapping) -> Option<RenderBlock> {
        let width_px = mapping.canvas_width_px();
        let start_x = mapping.x(pending.start_time).clamp(0.0, width_px);
        let end_x = mapping.x(pending.end_time).clamp(0.0, width_px);
        let raw_width = end_x - start_x;
        if raw_width < self.config.cull_epsilon_px {
            crate::log_trace!(
                "Culling {} block at x={:.2} ({:.3}px)",
                pending.bundle_id,
                start_x,
                raw_width
            );
            return None;
        }

        let app = self.icons.get(pending.bundle_id);
        Some(RenderBlock {
            rect: BlockRect {
                x: start_x,
                y: self.config.block_top_px,
                width: raw_width.max(self.config.min_draw_width_px),
                height: self.config.block_height_px,
            },
            color: self.palette.color_for(pending.bundle_id),
            icon_data_url: app.icon_data_url,
            bundle_id: pending.bundle_id.to_string(),
            app_name: app
                .display_name
                .unwrap_or_else(|| pending.app_name.to_string()),
            interval_ids: pending.interval_ids,
            start_time: pending.start_time,
            end_time: pending.end_time,
            duration_ms: pending.focused.num_milliseconds(),
        })
    }
}

impl Default for TimelineProcessor {
    fn default() -> Self {
        Self::new(
            CoalescingConfig::default(),
            ColorPalette::default(),
            Box::new(NoMetadata),
        )
    }
}
