//! Property-based invariant tests for the timeline engine.
//!
//! Verifies:
//! 1. Viewport: any sequence of zoom/pan/set/reset keeps the visible window
//!    inside the total window and at or above the duration floor
//! 2. Viewport: pan never changes the visible duration
//! 3. Coalescing: blocks come out sorted by x
//! 4. Coalescing: every interval id lands in at most one block
//! 5. Coalescing: identical input gives identical output
//! 6. Coalescing: a block's raw width never exceeds its intervals' pixel
//!    widths plus the merged gaps
//! 7. Coalescing: two same-app intervals merge iff the pixel gap is within
//!    the merge threshold
//! 8. Navigator: the thumb always lies within the track
//! 9. Tooltip: a hit is a block whose rectangle contains the point

use chrono::{DateTime, Duration, TimeZone, Utc};
use focus_timeline_lib::coalescing::{CoalescingConfig, TimelineProcessor};
use focus_timeline_lib::models::{ActivityInterval, PixelMapping, TimeWindow};
use focus_timeline_lib::navigator::{thumb, NavigatorConfig};
use focus_timeline_lib::tooltip::hit_test;
use focus_timeline_lib::viewport::{ViewportConfig, ViewportController};
use proptest::prelude::*;

// ── Strategy helpers ──────────────────────────────────────────────────

fn origin() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
}

#[derive(Debug, Clone, Copy)]
enum ViewportOp {
    Zoom(f64),
    ZoomAt(f64, f64),
    Pan(f64),
    PanPixels(f64),
    SetVisible(i64, i64),
    Reset,
}

fn arb_op() -> impl Strategy<Value = ViewportOp> {
    prop_oneof![
        (0.01f64..50.0).prop_map(ViewportOp::Zoom),
        (0.01f64..50.0, 0.0f64..1.0).prop_map(|(f, p)| ViewportOp::ZoomAt(f, p)),
        (-200_000.0f64..200_000.0).prop_map(ViewportOp::Pan),
        (-5_000.0f64..5_000.0).prop_map(ViewportOp::PanPixels),
        (-3_600i64..100_000, 0i64..100_000).prop_map(|(a, len)| ViewportOp::SetVisible(a, len)),
        Just(ViewportOp::Reset),
    ]
}

fn arb_intervals() -> impl Strategy<Value = Vec<ActivityInterval>> {
    let bundles = prop_oneof![Just("com.a"), Just("com.b"), Just("com.c")];
    prop::collection::vec((bundles, 0i64..86_400, 0i64..3_600), 0..60).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(n, (bundle, start, len))| {
                let start = origin() + Duration::seconds(start);
                ActivityInterval::new(bundle, bundle, start, start + Duration::seconds(len))
                    .unwrap()
                    .with_id(format!("i{n}"))
            })
            .collect()
    })
}

fn day() -> TimeWindow {
    TimeWindow::new(origin(), origin() + Duration::hours(24)).unwrap()
}

// ── Viewport ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn viewport_stays_consistent(
        total_secs in 1i64..200_000,
        width in 1.0f64..4_000.0,
        ops in prop::collection::vec(arb_op(), 1..40),
    ) {
        let total = TimeWindow::new(origin(), origin() + Duration::seconds(total_secs)).unwrap();
        let mut viewport = ViewportController::new(total, &ViewportConfig::default());
        viewport.set_canvas_width(width).unwrap();

        for op in ops {
            let before = viewport.visible_window();
            let _ = match op {
                ViewportOp::Zoom(f) => viewport.zoom(f),
                ViewportOp::ZoomAt(f, p) => {
                    let offset_ms = (p * total_secs as f64 * 1000.0) as i64;
                    viewport.zoom_at(f, total.lower + Duration::milliseconds(offset_ms))
                }
                ViewportOp::Pan(secs) => {
                    let result = viewport.pan(secs);
                    prop_assert_eq!(viewport.visible_window().duration(), before.duration());
                    result
                }
                ViewportOp::PanPixels(px) => viewport.pan_pixels(px),
                ViewportOp::SetVisible(a, len) => {
                    let lower = origin() + Duration::seconds(a);
                    let window = TimeWindow::new(lower, lower + Duration::seconds(len)).unwrap();
                    viewport.set_visible_window(window)
                }
                ViewportOp::Reset => {
                    viewport.reset();
                    Ok(())
                }
            };
            prop_assert!(
                viewport.is_consistent(),
                "{:?} moved {} to {}",
                op,
                describe(&before),
                describe(&viewport.visible_window())
            );
        }
    }
}

fn describe(window: &TimeWindow) -> String {
    format!("{} .. {}", window.lower.to_rfc3339(), window.upper.to_rfc3339())
}

// ── Coalescing ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn blocks_are_sorted_and_disjoint_in_ids(
        intervals in arb_intervals(),
        width in 50.0f64..3_000.0,
    ) {
        let processor = TimelineProcessor::default();
        let now = origin() + Duration::hours(25);
        let blocks = processor.process(&intervals, &day(), width, now);

        for pair in blocks.windows(2) {
            prop_assert!(pair[0].rect.x <= pair[1].rect.x);
        }

        let mut seen = std::collections::HashSet::new();
        for block in &blocks {
            prop_assert!(block.rect.width >= 2.0 - 1e-9);
            prop_assert!(block.start_time <= block.end_time);
            for id in &block.interval_ids {
                prop_assert!(seen.insert(id.clone()), "id {} in two blocks", id);
            }
        }
    }

    #[test]
    fn raw_width_bounded_by_underlying_intervals(
        intervals in arb_intervals(),
        width in 50.0f64..3_000.0,
    ) {
        let processor = TimelineProcessor::default();
        let threshold = CoalescingConfig::default().merge_threshold_px;
        let now = origin() + Duration::hours(25);
        let blocks = processor.process(&intervals, &day(), width, now);
        let mapping = PixelMapping::new(&day(), width).unwrap();
        let clipped_x = |t| mapping.x(t).clamp(0.0, width);

        for block in &blocks {
            let raw = clipped_x(block.end_time) - clipped_x(block.start_time);
            prop_assert!((block.rect.x - clipped_x(block.start_time)).abs() < 1e-9);

            let members: Vec<&ActivityInterval> = block
                .interval_ids
                .iter()
                .filter_map(|id| intervals.iter().find(|i| &i.id == id))
                .collect();
            prop_assert_eq!(members.len(), block.interval_ids.len());
            let covered: f64 = members
                .iter()
                .map(|i| clipped_x(i.resolved_end(now)) - clipped_x(i.start_time))
                .sum();
            let max_gaps = threshold * (members.len() - 1) as f64;
            prop_assert!(
                raw <= covered + max_gaps + 1e-6,
                "raw {} exceeds covered {} + gaps {}",
                raw,
                covered,
                max_gaps
            );
        }
    }

    #[test]
    fn same_app_merges_iff_gap_within_threshold(
        first_secs in 600i64..7_200,
        second_secs in 600i64..7_200,
        gap_ms in 0i64..600_000,
        width in 100.0f64..5_000.0,
    ) {
        let a_start = origin() + Duration::hours(10);
        let a_end = a_start + Duration::seconds(first_secs);
        let b_start = a_end + Duration::milliseconds(gap_ms);
        let b_end = b_start + Duration::seconds(second_secs);
        let intervals = vec![
            ActivityInterval::new("com.a", "A", a_start, a_end).unwrap().with_id("a"),
            ActivityInterval::new("com.a", "A", b_start, b_end).unwrap().with_id("b"),
        ];

        let mapping = PixelMapping::new(&day(), width).unwrap();
        let gap_px = mapping.x(b_start) - mapping.x(a_end);
        let threshold = CoalescingConfig::default().merge_threshold_px;
        let blocks = TimelineProcessor::default().process(&intervals, &day(), width, b_end);

        let expected = if gap_px <= threshold { 1 } else { 2 };
        prop_assert_eq!(blocks.len(), expected, "gap {}px", gap_px);
    }

    #[test]
    fn processing_is_deterministic(intervals in arb_intervals(), width in 50.0f64..3_000.0) {
        let processor = TimelineProcessor::default();
        let now = origin() + Duration::hours(25);
        let first = processor.process(&intervals, &day(), width, now);
        let second = processor.process(&intervals, &day(), width, now);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn hits_are_contained(
        intervals in arb_intervals(),
        x in 0.0f64..1_000.0,
        y in 0.0f64..80.0,
    ) {
        let processor = TimelineProcessor::default();
        let blocks = processor.process(&intervals, &day(), 1_000.0, origin() + Duration::hours(25));
        if let Some(block) = hit_test(x, y, &blocks) {
            prop_assert!(block.rect.contains(x, y));
        } else {
            prop_assert!(blocks.iter().all(|b| !b.rect.contains(x, y)));
        }
    }
}

// ── Navigator ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn thumb_fits_track(
        start in 0i64..86_000,
        len in 1i64..86_400,
        track in 1.0f64..2_000.0,
    ) {
        let lower = origin() + Duration::seconds(start);
        let upper = (lower + Duration::seconds(len)).min(day().upper);
        let visible = TimeWindow::new(lower, upper).unwrap();
        let thumb = thumb(&visible, &day(), track, &NavigatorConfig::default());
        prop_assert!(thumb.x >= 0.0);
        prop_assert!(thumb.width <= track + 1e-9);
        prop_assert!(thumb.x + thumb.width <= track + 1e-6);
    }
}
