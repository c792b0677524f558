use ratatui::{buffer::Buffer, layout::Rect, prelude::*, symbols, widgets::*};

use crate::{metrics::MetricSeries, ui::state::UiState};

/// Line chart for a single rolling history.
///
/// The y-axis is pinned to 0-100 no matter what the data holds; the x-axis
/// counts seconds ago with the newest sample at the right edge.
pub struct SeriesChart<'a> {
    pub title: &'a str,
    pub series: &'a MetricSeries,
    pub elapsed: &'a MetricSeries,
    pub color: Color,
    pub ui: &'a UiState,
}

/// Overlay chart with one trace per logical core.
pub struct PerCoreChart<'a> {
    pub title: &'a str,
    pub cores: &'a [MetricSeries],
    pub elapsed: &'a MetricSeries,
    pub ui: &'a UiState,
}

/// Map a history onto chart points: x is seconds before the newest sample
/// (so always <= 0), y is the raw value.
fn chart_points(series: &MetricSeries, elapsed: &MetricSeries) -> Vec<(f64, f64)> {
    let newest = elapsed.latest().unwrap_or(0.0) as f64;
    std::iter::zip(elapsed.iter(), series.iter())
        .map(|(t, v)| (t as f64 - newest, v as f64))
        .collect()
}

/// Visible x span in seconds. Never collapses below one second so a chart
/// with a single sample still has sane bounds.
fn x_span(elapsed: &MetricSeries) -> f64 {
    match (elapsed.oldest(), elapsed.latest()) {
        (Some(oldest), Some(newest)) => ((newest - oldest) as f64).max(1.0),
        _ => 1.0,
    }
}

fn x_labels(span: f64) -> [String; 3] {
    [
        format!("{:.0}s ago", span),
        format!("{:.0}s ago", span / 2.0),
        "now".to_string(),
    ]
}

fn bordered(title: &str, ui: &UiState) -> Block<'static> {
    let border = crate::ui::theme::Theme::darken(ui.theme.foreground, 0.6);
    Block::bordered()
        .title(Span::from(format!(" {} ", title)).fg(ui.theme.foreground))
        .border_style(Style::default().bg(ui.theme.surface).fg(border))
        .bg(ui.theme.surface)
        .border_type(BorderType::Rounded)
}

fn axes<'a>(chart: Chart<'a>, span: f64, ui: &UiState) -> Chart<'a> {
    let axis_style = Style::default().fg(ui.theme.foreground);
    chart
        .x_axis(
            Axis::default()
                .style(axis_style)
                .bounds([-span, 0.0])
                .labels(x_labels(span)),
        )
        .y_axis(
            Axis::default()
                .style(axis_style)
                .bounds([0.0, 100.0])
                .labels(["0", "50", "100"]),
        )
}

impl<'a> Widget for &SeriesChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let points = chart_points(self.series, self.elapsed);
        let dataset = Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(self.color))
            .data(&points);
        let span = x_span(self.elapsed);
        axes(Chart::new(vec![dataset]), span, self.ui)
            .block(bordered(self.title, self.ui))
            .style(Style::default().bg(self.ui.theme.surface))
            .render(area, buf);
    }
}

impl<'a> Widget for &PerCoreChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let core_count = self.cores.len();
        let traces: Vec<Vec<(f64, f64)>> = self
            .cores
            .iter()
            .map(|series| chart_points(series, self.elapsed))
            .collect();
        let datasets: Vec<Dataset> = traces
            .iter()
            .enumerate()
            .map(|(core, points)| {
                Dataset::default()
                    .name(format!("core {}", core))
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(self.ui.theme.core_trace(core, core_count)))
                    .data(points)
            })
            .collect();
        let span = x_span(self.elapsed);
        axes(Chart::new(datasets), span, self.ui)
            .block(bordered(self.title, self.ui))
            .style(Style::default().bg(self.ui.theme.surface))
            .hidden_legend_constraints((Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series_of(values: &[f32]) -> MetricSeries {
        let mut series = MetricSeries::new(60);
        for &v in values {
            series.push(v);
        }
        series
    }

    #[test]
    fn newest_point_sits_at_zero() {
        let series = series_of(&[10.0, 20.0, 30.0]);
        let elapsed = series_of(&[0.0, 1.0, 2.0]);
        let points = chart_points(&series, &elapsed);
        assert_eq!(points, vec![(-2.0, 10.0), (-1.0, 20.0), (0.0, 30.0)]);
    }

    #[test]
    fn empty_history_yields_no_points() {
        let series = series_of(&[]);
        assert!(chart_points(&series, &series).is_empty());
    }

    #[test]
    fn span_never_collapses() {
        assert_eq!(x_span(&series_of(&[])), 1.0);
        assert_eq!(x_span(&series_of(&[5.0])), 1.0);
        assert_eq!(x_span(&series_of(&[3.0, 3.2])), 1.0);
        let elapsed = series_of(&[0.0, 30.0, 59.0]);
        assert_eq!(x_span(&elapsed), 59.0);
    }
}
