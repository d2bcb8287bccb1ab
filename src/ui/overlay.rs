use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::action::PendingAction;
use crate::theme::Palette;

const KEY_HELP: &[(&str, &str)] = &[
    ("↑/k ↓/j", "move"),
    ("wheel", "move / scroll"),
    ("PgUp/PgDn", "page"),
    ("g/G", "top / bottom"),
    ("Enter/l", "open"),
    ("Esc/h", "back"),
    ("/", "filter"),
    ("r", "refresh stashes"),
    ("Ctrl+K", "apply stash (file in diff view)"),
    ("?", "toggle help"),
    ("q", "quit"),
];

pub fn render_help(f: &mut Frame, area: Rect, palette: &Palette) {
    let key_width = KEY_HELP.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);

    let mut lines = vec![Line::raw("")];
    lines.extend(KEY_HELP.iter().map(|(key, desc)| {
        Line::from(vec![
            Span::styled(
                format!("  {:<width$}  ", key, width = key_width),
                Style::default()
                    .fg(palette.accent_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(*desc, Style::default().fg(palette.fg)),
        ])
    }));
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "  press any key to close",
        Style::default().fg(palette.muted),
    ));

    let popup = centered_rect(56, lines.len() as u16 + 2, area);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_set(ratatui::symbols::border::PLAIN)
                .border_style(Style::default().fg(palette.accent_primary))
                .title(" Keys "),
        ),
        popup,
    );
}

pub fn render_confirm(f: &mut Frame, area: Rect, pending: &PendingAction, palette: &Palette) {
    let lines = vec![
        Line::styled(
            "Confirm Apply",
            Style::default()
                .fg(palette.warn_fg)
                .add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::styled(
            pending.label.clone(),
            Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::styled(pending.description(), Style::default().fg(palette.muted)),
        Line::raw(""),
        Line::from(vec![
            Span::styled(
                "y",
                Style::default()
                    .fg(palette.accent_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to confirm / ", Style::default().fg(palette.muted)),
            Span::styled(
                "n",
                Style::default()
                    .fg(palette.accent_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" or Esc to cancel", Style::default().fg(palette.muted)),
        ]),
    ];

    let popup = centered_rect(64, 11, area);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_set(ratatui::symbols::border::PLAIN)
                    .border_style(Style::default().fg(palette.warn_fg))
                    .title(" Confirm "),
            ),
        popup,
    );
}

/// Fixed-size rect centered in `area`, shrunk to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(width),
            Constraint::Fill(1),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_fits_inside_small_areas() {
        let area = Rect::new(0, 0, 40, 6);
        let r = centered_rect(64, 11, area);
        assert_eq!(r.width, 40);
        assert_eq!(r.height, 6);

        let r = centered_rect(20, 4, Rect::new(0, 0, 80, 24));
        assert_eq!((r.x, r.y, r.width, r.height), (30, 10, 20, 4));
    }
}
