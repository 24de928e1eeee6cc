use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Duration, Utc};

use crate::models::{duration_to_secs, secs_to_duration, PixelMapping, TimeWindow};
use crate::viewport::config::ViewportConfig;

const ENABLE_LOGS: bool = true;

/// Owns the visible sub-range of the total recorded range.
///
/// Every transition keeps `total.lower <= visible.lower <= visible.upper <= total.upper`
/// and `min_visible <= visible.duration() <= total.duration()`. When the total
/// range itself is shorter than the floor, the visible window is the total
/// window. A rejected transition leaves the state untouched.
#[derive(Debug, Clone)]
pub struct ViewportController {
    total: TimeWindow,
    visible: TimeWindow,
    canvas_width_px: f64,
    min_visible: Duration,
}

impl ViewportController {
    /// Starts fully zoomed out.
    pub fn new(total: TimeWindow, config: &ViewportConfig) -> Self {
        Self {
            total,
            visible: total,
            canvas_width_px: 0.0,
            min_visible: config.min_visible_duration(),
        }
    }

    pub fn total_window(&self) -> TimeWindow {
        self.total
    }

    pub fn visible_window(&self) -> TimeWindow {
        self.visible
    }

    pub fn canvas_width_px(&self) -> f64 {
        self.canvas_width_px
    }

    pub fn min_visible_duration(&self) -> Duration {
        self.min_visible
    }

    /// `None` until the canvas has a width.
    pub fn mapping(&self) -> Option<PixelMapping> {
        PixelMapping::new(&self.visible, self.canvas_width_px)
    }

    pub fn pixels_per_second(&self) -> Option<f64> {
        self.mapping().map(|m| m.pixels_per_second())
    }

    pub fn x_for_time(&self, t: DateTime<Utc>) -> Option<f64> {
        self.mapping().map(|m| m.x(t))
    }

    pub fn time_for_x(&self, x: f64) -> Option<DateTime<Utc>> {
        self.mapping()?.time_at(x)
    }

    /// Zero is accepted (not laid out yet); negative or non-finite is not.
    pub fn set_canvas_width(&mut self, canvas_width_px: f64) -> Result<()> {
        if !canvas_width_px.is_finite() || canvas_width_px < 0.0 {
            return self.reject(anyhow!("invalid canvas width {canvas_width_px}"));
        }
        self.canvas_width_px = canvas_width_px;
        Ok(())
    }

    /// Zoom around the center of the visible window.
    pub fn zoom(&mut self, factor: f64) -> Result<()> {
        self.zoom_at(factor, self.visible.center())
    }

    /// `factor < 1` zooms in. The new window is centered on `pivot`, then
    /// slid back inside the total window without changing its duration.
    pub fn zoom_at(&mut self, factor: f64, pivot: DateTime<Utc>) -> Result<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return self.reject(anyhow!("invalid zoom factor {factor}"));
        }

        let total_secs = self.total.duration_secs();
        let target_secs = (self.visible.duration_secs() * factor).min(total_secs);
        let duration = match secs_to_duration(target_secs) {
            Some(d) => self.clamp_duration(d),
            None => return self.reject(anyhow!("zoom produced an unrepresentable duration")),
        };
        if duration <= Duration::zero() {
            return self.reject(anyhow!("zoom would collapse the visible window"));
        }

        match self.place(pivot, duration) {
            Ok(window) => {
                self.visible = window;
                Ok(())
            }
            Err(e) => self.reject(e),
        }
    }

    /// Shift both bounds by `delta_secs`, sliding back to the nearest total
    /// edge if needed. Never changes the duration.
    pub fn pan(&mut self, delta_secs: f64) -> Result<()> {
        if !delta_secs.is_finite() {
            return self.reject(anyhow!("invalid pan delta {delta_secs}"));
        }

        // Anything past the total span lands on an edge anyway
        let total_secs = self.total.duration_secs();
        let bounded = delta_secs.clamp(-total_secs, total_secs);
        let Some(delta) = secs_to_duration(bounded) else {
            return self.reject(anyhow!("pan delta out of range"));
        };

        let duration = self.visible.duration();
        let Some(lower) = self.visible.lower.checked_add_signed(delta) else {
            return self.reject(anyhow!("pan moved the window out of range"));
        };
        match self.slide_inside(lower, duration) {
            Ok(window) => {
                self.visible = window;
                Ok(())
            }
            Err(e) => self.reject(e),
        }
    }

    /// Pan by a horizontal pixel distance on the canvas.
    pub fn pan_pixels(&mut self, delta_px: f64) -> Result<()> {
        let Some(mapping) = self.mapping() else {
            return self.reject(anyhow!("cannot pan by pixels before the canvas has a width"));
        };
        self.pan(mapping.px_to_secs(delta_px))
    }

    /// Replace the visible window, enforcing the duration floor and containment.
    pub fn set_visible_window(&mut self, window: TimeWindow) -> Result<()> {
        if window.is_empty() {
            return self.reject(anyhow!("visible window must have a positive duration"));
        }

        let duration = self.clamp_duration(window.duration());
        let placed = if duration == window.duration() {
            self.slide_inside(window.lower, duration)
        } else {
            self.place(window.center(), duration)
        };
        match placed {
            Ok(placed) => {
                self.visible = placed;
                Ok(())
            }
            Err(e) => self.reject(e),
        }
    }

    /// Replace the total range, e.g. as recording extends it.
    ///
    /// A fully zoomed-out view stays fully zoomed out; otherwise the visible
    /// window is re-clamped into the new range.
    pub fn set_total_window(&mut self, total: TimeWindow) -> Result<()> {
        let was_fit = self.visible == self.total;
        let previous = (self.total, self.visible);
        self.total = total;
        if was_fit {
            self.visible = total;
            return Ok(());
        }

        let duration = self.clamp_duration(self.visible.duration());
        match self.place(self.visible.center(), duration) {
            Ok(window) => {
                self.visible = window;
                Ok(())
            }
            Err(e) => {
                (self.total, self.visible) = previous;
                self.reject(e)
            }
        }
    }

    /// Fit the whole recorded range.
    pub fn reset(&mut self) {
        self.visible = self.total;
    }

    pub fn is_consistent(&self) -> bool {
        let duration = self.visible.duration();
        let floor = self.min_visible.min(self.total.duration());
        self.total.contains_window(&self.visible)
            && duration >= floor
            && duration <= self.total.duration()
    }

    fn clamp_duration(&self, duration: Duration) -> Duration {
        let total = self.total.duration();
        duration.clamp(self.min_visible.min(total), total)
    }

    /// Window of `duration` centered on `pivot`, slid inside the total window.
    fn place(&self, pivot: DateTime<Utc>, duration: Duration) -> Result<TimeWindow> {
        let lower = pivot
            .checked_sub_signed(duration / 2)
            .ok_or_else(|| anyhow!("pivot {} out of range", pivot.to_rfc3339()))?;
        self.slide_inside(lower, duration)
    }

    fn slide_inside(&self, lower: DateTime<Utc>, duration: Duration) -> Result<TimeWindow> {
        if duration > self.total.duration() {
            bail!(
                "window of {:.1}s cannot fit in total range of {:.1}s",
                duration_to_secs(duration),
                self.total.duration_secs()
            );
        }

        let mut lower = lower.max(self.total.lower);
        match lower.checked_add_signed(duration) {
            Some(upper) if upper <= self.total.upper => {}
            _ => lower = self.total.upper - duration,
        }
        let window = TimeWindow::starting_at(lower, duration)?;
        debug_assert!(self.total.contains_window(&window));
        Ok(window)
    }

    fn reject(&self, error: anyhow::Error) -> Result<()> {
        crate::log_debug!("Rejected viewport transition: {}", error);
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, m, s).unwrap()
    }

    fn day_controller() -> ViewportController {
        let total =
            TimeWindow::new(t(0, 0, 0), Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap()).unwrap();
        let mut controller = ViewportController::new(total, &ViewportConfig::default());
        controller.set_canvas_width(1000.0).unwrap();
        controller
    }

    #[test]
    fn starts_fully_zoomed_out() {
        let controller = day_controller();
        assert_eq!(controller.visible_window(), controller.total_window());
        assert!(controller.is_consistent());
    }

    #[test]
    fn zoom_in_halves_around_center() {
        let mut controller = day_controller();
        controller.zoom(0.5).unwrap();
        assert_eq!(controller.visible_window(), TimeWindow::new(t(6, 0, 0), t(18, 0, 0)).unwrap());
    }

    #[test]
    fn zoom_out_is_capped_at_total() {
        let mut controller = day_controller();
        controller.zoom(0.5).unwrap();
        controller.zoom(10.0).unwrap();
        assert_eq!(controller.visible_window(), controller.total_window());
    }

    #[test]
    fn zoom_floor_holds() {
        let mut controller = day_controller();
        controller
            .set_visible_window(TimeWindow::new(t(12, 0, 0), t(12, 1, 0)).unwrap())
            .unwrap();
        let before = controller.visible_window();
        controller.zoom(0.5).unwrap();
        assert_eq!(controller.visible_window().duration(), Duration::seconds(60));
        assert_eq!(controller.visible_window(), before);
    }

    #[test]
    fn zoom_at_edge_pivot_shifts_not_recenters() {
        let mut controller = day_controller();
        controller.zoom_at(0.25, t(0, 30, 0)).unwrap();
        let visible = controller.visible_window();
        assert_eq!(visible.lower, t(0, 0, 0));
        assert_eq!(visible.duration(), Duration::hours(6));
    }

    #[test]
    fn pan_past_upper_slides_to_edge() {
        let mut controller = day_controller();
        controller
            .set_visible_window(TimeWindow::new(t(20, 0, 0), t(22, 0, 0)).unwrap())
            .unwrap();
        controller.pan(4.0 * 3600.0).unwrap();
        let visible = controller.visible_window();
        assert_eq!(visible.upper, controller.total_window().upper);
        assert_eq!(visible.duration(), Duration::hours(2));
    }

    #[test]
    fn pan_past_lower_slides_to_edge() {
        let mut controller = day_controller();
        controller
            .set_visible_window(TimeWindow::new(t(1, 0, 0), t(3, 0, 0)).unwrap())
            .unwrap();
        controller.pan(-1e12).unwrap();
        assert_eq!(controller.visible_window(), TimeWindow::new(t(0, 0, 0), t(2, 0, 0)).unwrap());
    }

    #[test]
    fn pan_pixels_uses_canvas_scale() {
        let mut controller = day_controller();
        controller
            .set_visible_window(TimeWindow::new(t(10, 0, 0), t(11, 0, 0)).unwrap())
            .unwrap();
        // 1000px per hour -> 100px is 6 minutes
        controller.pan_pixels(100.0).unwrap();
        assert_eq!(controller.visible_window().lower, t(10, 6, 0));
    }

    #[test]
    fn set_visible_window_applies_floor_around_center() {
        let mut controller = day_controller();
        controller
            .set_visible_window(TimeWindow::new(t(12, 0, 0), t(12, 0, 20)).unwrap())
            .unwrap();
        let visible = controller.visible_window();
        assert_eq!(visible.duration(), Duration::seconds(60));
        assert_eq!(visible.center(), t(12, 0, 10));
    }

    #[test]
    fn set_visible_window_clamps_into_total() {
        let mut controller = day_controller();
        let outside = TimeWindow::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 23, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 2, 1, 0, 0).unwrap(),
        )
        .unwrap();
        controller.set_visible_window(outside).unwrap();
        assert_eq!(controller.visible_window(), TimeWindow::new(t(22, 0, 0), controller.total_window().upper).unwrap());
    }

    #[test]
    fn malformed_requests_leave_state_unchanged() {
        let mut controller = day_controller();
        controller.zoom(0.5).unwrap();
        let before = controller.visible_window();

        assert!(controller.zoom(0.0).is_err());
        assert!(controller.zoom(-2.0).is_err());
        assert!(controller.zoom(f64::NAN).is_err());
        assert!(controller.zoom(f64::INFINITY).is_err());
        assert!(controller.pan(f64::NAN).is_err());
        assert!(controller
            .set_visible_window(TimeWindow::new(t(5, 0, 0), t(5, 0, 0)).unwrap())
            .is_err());
        assert!(controller.set_canvas_width(-1.0).is_err());

        assert_eq!(controller.visible_window(), before);
        assert_eq!(controller.canvas_width_px(), 1000.0);
    }

    #[test]
    fn pan_pixels_needs_a_canvas() {
        let total = TimeWindow::new(t(0, 0, 0), t(12, 0, 0)).unwrap();
        let mut controller = ViewportController::new(total, &ViewportConfig::default());
        assert!(controller.pan_pixels(10.0).is_err());
        assert!(controller.time_for_x(10.0).is_none());
    }

    #[test]
    fn tiny_total_range_is_shown_whole() {
        let total = TimeWindow::new(t(9, 0, 0), t(9, 0, 30)).unwrap();
        let mut controller = ViewportController::new(total, &ViewportConfig::default());
        controller.zoom(0.5).unwrap();
        assert_eq!(controller.visible_window(), total);
        assert!(controller.is_consistent());
    }

    #[test]
    fn growing_total_keeps_fit_all_or_reclamps() {
        let mut controller = day_controller();
        let longer = TimeWindow::new(t(0, 0, 0), Utc.with_ymd_and_hms(2024, 3, 3, 0, 0, 0).unwrap()).unwrap();
        controller.set_total_window(longer).unwrap();
        assert_eq!(controller.visible_window(), longer);

        controller
            .set_visible_window(TimeWindow::new(t(20, 0, 0), t(22, 0, 0)).unwrap())
            .unwrap();
        let shorter = TimeWindow::new(t(0, 0, 0), t(21, 0, 0)).unwrap();
        controller.set_total_window(shorter).unwrap();
        assert_eq!(controller.visible_window(), TimeWindow::new(t(19, 0, 0), t(21, 0, 0)).unwrap());
        assert!(controller.is_consistent());

        controller.reset();
        assert_eq!(controller.visible_window(), shorter);
    }

    #[test]
    fn inverse_mapping_round_trips_pixels() {
        let controller = day_controller();
        let noon = controller.time_for_x(500.0).unwrap();
        assert_eq!(noon, t(12, 0, 0));
        assert!((controller.x_for_time(noon).unwrap() - 500.0).abs() < 1e-9);
    }

    #[test]
    fn zero_floor_never_collapses_the_window() {
        let total =
            TimeWindow::new(t(0, 0, 0), Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap()).unwrap();
        let config = ViewportConfig {
            min_visible_duration_secs: 0,
        };
        let mut controller = ViewportController::new(total, &config);
        for _ in 0..20 {
            let _ = controller.zoom(0.01);
        }
        assert_eq!(controller.visible_window().duration(), Duration::seconds(1));
        assert!(controller.is_consistent());

        controller.zoom(10.0).unwrap();
        assert_eq!(controller.visible_window().duration(), Duration::seconds(10));
    }

    #[test]
    fn oversized_floor_fits_the_total_range() {
        let config = ViewportConfig {
            min_visible_duration_secs: u64::MAX,
        };
        let total = TimeWindow::new(t(0, 0, 0), t(12, 0, 0)).unwrap();
        let mut controller = ViewportController::new(total, &config);
        controller.zoom(0.5).unwrap();
        assert_eq!(controller.visible_window(), total);
        assert!(controller.is_consistent());
    }

    #[test]
    fn zoom_in_on_empty_total_is_rejected() {
        let instant = t(12, 0, 0);
        let total = TimeWindow::new(instant, instant).unwrap();
        let mut controller = ViewportController::new(total, &ViewportConfig::default());
        assert!(controller.zoom(0.5).is_err());
        assert_eq!(controller.visible_window(), total);
    }
}
