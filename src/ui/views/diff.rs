use ratatui::{
    Frame,
    layout::{Margin, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};

use crate::app::App;
use crate::diff::colorize;
use crate::theme::Palette;

/// Scrollable colorized diff. Records the viewport height on `app` so that
/// paging and the scroll percentage match what is on screen.
pub fn render_diff(f: &mut Frame, app: &mut App, area: Rect, palette: &Palette) {
    let viewport_h = area.height.saturating_sub(2);
    app.diff_viewport_height = viewport_h.max(1);

    let Some(diff) = app.diff.as_ref() else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(ratatui::symbols::border::PLAIN)
        .border_style(Style::default().fg(palette.border_inactive))
        .title(format!(" {} ", diff.file));

    let lines: Vec<Line> = if diff.text.is_empty() {
        vec![Line::styled("(no changes)", Style::default().fg(palette.muted))]
    } else {
        colorize(&diff.text, palette)
    };

    let lines_len = lines.len();
    let max_scroll = lines_len.saturating_sub(viewport_h as usize);
    let scroll_y = (app.diff_scroll as usize).min(max_scroll) as u16;
    app.diff_scroll = scroll_y;

    f.render_widget(
        Paragraph::new(lines).block(block).scroll((scroll_y, 0)),
        area,
    );

    if lines_len > viewport_h as usize {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▴"))
            .end_symbol(Some("▾"))
            .track_symbol(Some("│"))
            .thumb_symbol("█");
        let mut state = ScrollbarState::new(max_scroll.max(1)).position(scroll_y as usize);
        f.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut state,
        );
    }
}
