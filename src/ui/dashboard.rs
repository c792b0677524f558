use std::time::Duration;

use crate::{
    metrics::Sampler,
    ui::{
        chart::{PerCoreChart, SeriesChart},
        debug::DebugWidget,
        state::UiState,
    },
};
use ratatui::{buffer::Buffer, layout::Rect, macros::*, prelude::*, widgets::*};
use ratatui::macros::line;
use tui_logger::*;

const THROB: [&str; 4] = ["◐", "◓", "◑", "◒"];

pub struct DashboardWidget<'a> {
    pub ui: &'a UiState,
    pub sampler: &'a Sampler,
    pub interval: Duration,
}

impl<'a> Widget for &mut DashboardWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let [window_rect, log_rect] = vertical![>=5, ==10].areas(area);

        let panel_style = Style::default()
            .bg(self.ui.theme.surface)
            .fg(self.ui.theme.foreground);

        let main_rect = if self.ui.debug {
            let [main_rect, panel_rect] = horizontal![>=5, >=30].areas(window_rect);
            DebugWidget {
                ui: self.ui,
                sampler: self.sampler,
            }
            .render(panel_rect, buf);
            main_rect
        } else {
            window_rect
        };

        TuiLoggerSmartWidget::default()
            .style_error(panel_style.fg(self.ui.theme.error))
            .style_debug(panel_style)
            .style_warn(panel_style.fg(self.ui.theme.warning))
            .style_trace(panel_style)
            .style_info(panel_style)
            .style(panel_style)
            .border_style(panel_style.fg(self.ui.theme.foreground))
            .output_separator(':')
            .output_timestamp(Some("%H:%M:%S".to_string()))
            .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
            .output_target(true)
            .output_file(true)
            .output_line(true)
            .state(&self.ui.logger_state)
            .render(log_rect, buf);

        let main_style = Style::default()
            .bg(self.ui.theme.background)
            .fg(self.ui.theme.foreground);
        Block::new().style(main_style).render(main_rect, buf);

        let [status_rect, boxes_rect, charts_rect] =
            vertical![==1, ==5, *=1].horizontal_margin(1).areas(main_rect);

        self.status_line().render(status_rect, buf);

        let [cpu_box, mem_box, cores_box] =
            horizontal![*=1, *=1, *=1].spacing(1).areas(boxes_rect);
        self.metric_box(
            "Total CPU",
            percent_label(self.sampler.cpu().latest()),
            self.ui.theme.cpu_trace,
        )
        .render(cpu_box, buf);
        self.metric_box(
            "Memory",
            percent_label(self.sampler.memory().latest()),
            self.ui.theme.mem_trace,
        )
        .render(mem_box, buf);
        self.metric_box(
            "Per Core Load",
            per_core_label(self.sampler),
            self.ui.theme.foreground,
        )
        .render(cores_box, buf);

        let [cpu_rect, cores_rect, mem_rect] = vertical![*=1, *=1, *=1].areas(charts_rect);
        SeriesChart {
            title: "CPU Usage History",
            series: self.sampler.cpu(),
            elapsed: self.sampler.elapsed(),
            color: self.ui.theme.cpu_trace,
            ui: self.ui,
        }
        .render(cpu_rect, buf);
        PerCoreChart {
            title: "Per-Core CPU Usage",
            cores: self.sampler.per_core(),
            elapsed: self.sampler.elapsed(),
            ui: self.ui,
        }
        .render(cores_rect, buf);
        SeriesChart {
            title: "Memory Usage History",
            series: self.sampler.memory(),
            elapsed: self.sampler.elapsed(),
            color: self.ui.theme.mem_trace,
            ui: self.ui,
        }
        .render(mem_rect, buf);
    }
}

impl<'a> DashboardWidget<'a> {
    fn status_line(&self) -> Line<'static> {
        let status = if self.sampler.is_paused() {
            Span::from("⏸ PAUSED").fg(self.ui.theme.warning)
        } else {
            Span::from(THROB[self.ui.step_of_4_in_1_second()]).fg(self.ui.theme.success)
        };
        let info = self.sampler.info();
        line![
            span!["coremon "].fg(self.ui.theme.primary).bold(),
            status,
            span![format!(
                "  {} · {} cores @ {} MHz · {} RAM · {} · every {:.1}s · {} ticks",
                info.brand,
                info.core_count,
                info.frequency_mhz,
                format_bytes(info.total_ram_bytes),
                info.os,
                self.interval.as_secs_f64(),
                self.sampler.ticks(),
            )]
            .fg(self.ui.theme.foreground),
        ]
    }

    fn metric_box(&self, title: &str, value: String, color: Color) -> MetricBox<'_> {
        MetricBox {
            title: title.to_string(),
            value,
            color,
            ui: self.ui,
        }
    }
}

struct MetricBox<'a> {
    title: String,
    value: String,
    color: Color,
    ui: &'a UiState,
}

impl<'a> Widget for MetricBox<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = Block::bordered()
            .title(Span::from(format!(" {} ", self.title)).fg(self.ui.theme.foreground))
            .border_style(
                Style::default()
                    .bg(self.ui.theme.surface)
                    .fg(self.color)
                    .add_modifier(Modifier::BOLD),
            )
            .bg(self.ui.theme.surface)
            .border_type(BorderType::Rounded);
        let inner = border.inner(area);
        border.render(area, buf);
        Paragraph::new(self.value)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .fg(self.color)
            .render(
                inner.centered(Constraint::Percentage(100), Constraint::Length(1)),
                buf,
            );
    }
}

fn percent_label(latest: Option<f32>) -> String {
    match latest {
        Some(v) => format!("{:.1}%", v),
        None => "--".to_string(),
    }
}

fn per_core_label(sampler: &Sampler) -> String {
    if sampler.per_core().iter().all(|s| s.is_empty()) {
        return "--".to_string();
    }
    sampler
        .per_core()
        .iter()
        .map(|series| match series.latest() {
            Some(v) => format!("{:.0}%", v),
            None => "--".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a byte count as a human-readable string (e.g. `"7.3 GiB"`).
fn format_bytes(bytes: u64) -> String {
    const GIB: u64 = 1 << 30;
    const MIB: u64 = 1 << 20;
    const KIB: u64 = 1 << 10;

    if bytes >= GIB {
        format!("{:.1} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_bytes_gib() {
        assert_eq!(format_bytes(8 * 1024 * 1024 * 1024), "8.0 GiB");
    }

    #[test]
    fn format_bytes_zero() {
        assert_eq!(format_bytes(0), "0 B");
    }

    #[test]
    fn percent_label_handles_empty_history() {
        assert_eq!(percent_label(None), "--");
        assert_eq!(percent_label(Some(42.0)), "42.0%");
    }
}
