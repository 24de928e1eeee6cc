use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A closed time range `[lower, upper]`.
///
/// Used both for the total recorded range and for the visible sub-range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub lower: DateTime<Utc>,
    pub upper: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(lower: DateTime<Utc>, upper: DateTime<Utc>) -> Result<Self> {
        if upper < lower {
            bail!(
                "time window upper bound {} precedes lower bound {}",
                upper.to_rfc3339(),
                lower.to_rfc3339()
            );
        }
        Ok(Self { lower, upper })
    }

    /// Window of `duration` starting at `lower`.
    pub fn starting_at(lower: DateTime<Utc>, duration: Duration) -> Result<Self> {
        match lower.checked_add_signed(duration) {
            Some(upper) => Self::new(lower, upper),
            None => bail!("time window end is out of range"),
        }
    }

    pub fn duration(&self) -> Duration {
        self.upper - self.lower
    }

    pub fn duration_secs(&self) -> f64 {
        duration_to_secs(self.duration())
    }

    pub fn is_empty(&self) -> bool {
        self.upper <= self.lower
    }

    pub fn center(&self) -> DateTime<Utc> {
        self.lower + self.duration() / 2
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t >= self.lower && t <= self.upper
    }

    pub fn contains_window(&self, other: &TimeWindow) -> bool {
        other.lower >= self.lower && other.upper <= self.upper
    }

    /// Whether `[start, end]` touches this window at all.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        !(end < self.lower || start > self.upper)
    }
}

/// Seconds as `f64`, keeping sub-second precision.
pub fn duration_to_secs(duration: Duration) -> f64 {
    match duration.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => duration.num_milliseconds() as f64 / 1_000.0,
    }
}

/// Inverse of [`duration_to_secs`], at microsecond resolution.
///
/// Returns `None` for non-finite or out-of-range input.
pub fn secs_to_duration(secs: f64) -> Option<Duration> {
    if !secs.is_finite() {
        return None;
    }
    let micros = (secs * 1_000_000.0).round();
    if micros.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(Duration::microseconds(micros as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, m, s).unwrap()
    }

    #[test]
    fn rejects_inverted() {
        assert!(TimeWindow::new(at(12, 0, 0), at(11, 0, 0)).is_err());
        assert!(TimeWindow::new(at(12, 0, 0), at(12, 0, 0)).unwrap().is_empty());
    }

    #[test]
    fn center_and_overlap() {
        let window = TimeWindow::new(at(10, 0, 0), at(12, 0, 0)).unwrap();
        assert_eq!(window.center(), at(11, 0, 0));
        assert_eq!(window.duration_secs(), 7200.0);
        assert!(window.overlaps(at(9, 0, 0), at(10, 0, 0)));
        assert!(window.overlaps(at(12, 0, 0), at(13, 0, 0)));
        assert!(!window.overlaps(at(12, 0, 1), at(13, 0, 0)));
        assert!(!window.overlaps(at(8, 0, 0), at(9, 59, 59)));
    }

    #[test]
    fn secs_conversion_keeps_sub_second() {
        assert_eq!(secs_to_duration(30.4), Some(Duration::milliseconds(30_400)));
        assert_eq!(duration_to_secs(Duration::milliseconds(1_500)), 1.5);
        assert_eq!(secs_to_duration(f64::NAN), None);
        assert_eq!(secs_to_duration(f64::INFINITY), None);
    }
}
