use ratatui::{prelude::*, widgets::*};

use crate::{metrics::Sampler, ui::state::UiState};

pub struct DebugWidget<'a> {
    pub ui: &'a UiState,
    pub sampler: &'a Sampler,
}

impl Widget for DebugWidget<'_> {
    fn render(self, area: ratatui::layout::Rect, buf: &mut ratatui::buffer::Buffer) {
        let debug = (&self.ui, &self.sampler);
        let panel_style = Style::default()
            .bg(self.ui.theme.surface)
            .fg(self.ui.theme.foreground);
        let paragraph = Paragraph::new(format!("{debug:#?}"))
            .block(
                Block::bordered()
                    .title("Debug")
                    .title_alignment(Alignment::Left)
                    .border_style(Style::default().fg(self.ui.theme.accent))
                    .border_type(BorderType::Rounded),
            )
            .alignment(HorizontalAlignment::Left)
            .style(panel_style);
        paragraph.render(area, buf);
    }
}
