//! One-shot render of a JSON request: intervals and replayed input in,
//! blocks and emitted actions out.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::TimelineConfig;
use crate::interaction::{PointerEvent, TimelineAction};
use crate::metadata::StaticMetadata;
use crate::models::{ActivityInterval, RenderBlock, TimeWindow};
use crate::navigator::NavigatorThumb;
use crate::timeline::Timeline;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub intervals: Vec<ActivityInterval>,
    pub canvas_width: f64,
    /// Defaults to the span of `intervals`
    #[serde(default)]
    pub total_window: Option<TimeWindow>,
    #[serde(default)]
    pub visible_window: Option<TimeWindow>,
    /// Defaults to the current time; only open intervals depend on it
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    #[serde(default)]
    pub events: Vec<PointerEvent>,
    #[serde(default)]
    pub navigator_width: Option<f64>,
    #[serde(default)]
    pub metadata: StaticMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResponse {
    pub visible_window: TimeWindow,
    pub blocks: Vec<RenderBlock>,
    pub actions: Vec<TimelineAction>,
    pub navigator_thumb: Option<NavigatorThumb>,
}

pub fn render(request: RenderRequest, config: &TimelineConfig) -> Result<RenderResponse> {
    let now = request.now.unwrap_or_else(Utc::now);
    let total = match request.total_window {
        Some(total) => total,
        None => span_of(&request.intervals, now)?,
    };

    let mut timeline = Timeline::new(total, config, Box::new(request.metadata));
    timeline.set_canvas_width(request.canvas_width)?;
    if let Some(visible) = request.visible_window {
        timeline.viewport_mut().set_visible_window(visible)?;
    }
    timeline.set_intervals(request.intervals);

    let mut actions = Vec::new();
    for event in request.events {
        actions.extend(timeline.handle_event(event, now));
    }

    let navigator_thumb = request.navigator_width.map(|w| timeline.navigator_thumb(w));
    let visible_window = timeline.viewport().visible_window();
    let blocks = timeline.blocks(now).to_vec();

    Ok(RenderResponse {
        visible_window,
        blocks,
        actions,
        navigator_thumb,
    })
}

fn span_of(intervals: &[ActivityInterval], now: DateTime<Utc>) -> Result<TimeWindow> {
    let lower = intervals.iter().map(|i| i.start_time).min();
    let upper = intervals.iter().map(|i| i.resolved_end(now)).max();
    match (lower, upper) {
        (Some(lower), Some(upper)) => TimeWindow::new(lower, upper),
        _ => bail!("request has no intervals and no totalWindow"),
    }
}
