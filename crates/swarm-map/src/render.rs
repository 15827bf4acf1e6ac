//! Render-pass summaries.
//!
//! The headless host has no canvas, so each render pass is reduced to a
//! [`RenderSummary`] and logged.

use std::collections::BTreeMap;

use swarm_hypocenters::draw::{DrawCommand, LegendEntry, legend};
use swarm_types::{ColorMode, EventId, Rgba};
use tracing::info;

/// What one render pass would paint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Number of markers.
    pub markers: usize,
    /// Marker count per legend label. The hovered marker is counted under
    /// `hover`, and colors outside the legend are keyed by hex value.
    pub markers_by_band: BTreeMap<String, usize>,
    /// Whether a hover popup is drawn.
    pub popup: bool,
    /// Whether a legend is drawn.
    pub legend: bool,
}

impl RenderSummary {
    /// Summarize the commands of one pass drawn in `mode` with `hover` as
    /// the hover target.
    pub fn from_commands(
        commands: &[DrawCommand],
        mode: ColorMode,
        hover: Option<&EventId>,
    ) -> Self {
        let key = legend(mode);
        let mut summary = Self::default();
        for command in commands {
            match command {
                DrawCommand::Marker { id, color, .. } => {
                    summary.markers = summary.markers.saturating_add(1);
                    // The hover color doubles as a band color, so go by id.
                    let band = if hover == Some(id) {
                        "hover".to_owned()
                    } else {
                        band_label(&key.entries, *color)
                    };
                    let count = summary.markers_by_band.entry(band).or_insert(0);
                    *count = count.saturating_add(1);
                }
                DrawCommand::Popup(_) => summary.popup = true,
                DrawCommand::Legend(_) => summary.legend = true,
            }
        }
        summary
    }

    /// Log the summary at info level.
    pub fn log(&self) {
        info!(
            markers = self.markers,
            bands = ?self.markers_by_band,
            popup = self.popup,
            legend = self.legend,
            "render pass"
        );
    }
}

fn band_label(entries: &[LegendEntry], color: Rgba) -> String {
    entries
        .iter()
        .find(|entry| entry.color == color)
        .map_or_else(|| color.to_hex(), |entry| entry.label.to_owned())
}

#[cfg(test)]
mod tests {
    use swarm_hypocenters::style::HOVER_COLOR;
    use swarm_hypocenters::viewport::ScreenPoint;

    use super::*;

    fn marker(id: &str, color: Rgba) -> DrawCommand {
        DrawCommand::Marker {
            id: EventId::from(id),
            top_left: ScreenPoint::new(0.0, 0.0),
            diameter: 5,
            color,
        }
    }

    #[test]
    fn counts_markers_by_depth_band() {
        let commands = vec![
            marker("a", Rgba::RED),
            marker("b", Rgba::ORANGE),
            marker("c", Rgba::ORANGE),
            marker("d", HOVER_COLOR),
            DrawCommand::Legend(legend(ColorMode::Depth)),
        ];
        let hovered = EventId::from("d");
        let summary = RenderSummary::from_commands(&commands, ColorMode::Depth, Some(&hovered));
        assert_eq!(summary.markers, 4);
        assert_eq!(summary.markers_by_band.get("< 0"), Some(&1));
        assert_eq!(summary.markers_by_band.get("0-5"), Some(&2));
        assert_eq!(summary.markers_by_band.get("hover"), Some(&1));
        assert!(summary.legend);
        assert!(!summary.popup);
    }

    #[test]
    fn empty_pass_is_empty() {
        let summary = RenderSummary::from_commands(&[], ColorMode::Age, None);
        assert_eq!(summary, RenderSummary::default());
    }

    #[test]
    fn mid_crust_marker_without_hover_keeps_its_band() {
        // 13-20 km shares its color with the hover highlight.
        let commands = vec![marker("deep", HOVER_COLOR)];
        let summary = RenderSummary::from_commands(&commands, ColorMode::Depth, None);
        assert_eq!(summary.markers_by_band.get("13-20"), Some(&1));
        assert!(!summary.markers_by_band.contains_key("hover"));

        let other = EventId::from("elsewhere");
        let summary = RenderSummary::from_commands(&commands, ColorMode::Depth, Some(&other));
        assert_eq!(summary.markers_by_band.get("13-20"), Some(&1));
    }
}
