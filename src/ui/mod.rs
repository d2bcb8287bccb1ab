//! Rendering. Everything here is a projection of [`App`]; the only state
//! written back is the diff viewport height, which depends on the terminal.

mod overlay;
mod views;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{App, View};
use crate::theme::{self, Palette};

pub fn draw_ui(f: &mut Frame, app: &mut App) {
    let area = f.area();
    let palette = theme::palette();

    if app.show_help {
        overlay::render_help(f, area, palette);
        return;
    }

    if let Some(pending) = app.confirm.pending() {
        overlay::render_confirm(f, area, pending, palette);
        return;
    }

    if app.loading {
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " Loading…",
                Style::default()
                    .fg(palette.accent_primary)
                    .add_modifier(Modifier::BOLD),
            ))),
            area,
        );
        return;
    }

    // At the top level an error replaces the whole view.
    if app.view == View::StashList
        && let Some(err) = &app.error
    {
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!(" Error: {}", err),
                Style::default()
                    .fg(palette.diff_del_fg)
                    .add_modifier(Modifier::BOLD),
            ))),
            area,
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_breadcrumb(f, app, chunks[0], palette);
    match app.view {
        View::StashList => views::render_stash_list(f, app, chunks[1], palette),
        View::FileList => views::render_file_list(f, app, chunks[1], palette),
        View::Diff => views::render_diff(f, app, chunks[1], palette),
    }
    render_footer(f, app, chunks[2], palette);
}

fn render_breadcrumb(f: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let crumb = Style::default()
        .fg(palette.accent_primary)
        .add_modifier(Modifier::BOLD);
    let sep = Span::styled(" > ", Style::default().fg(palette.border_inactive));

    let mut spans = vec![Span::styled(" Stashes", crumb)];
    if app.view != View::StashList
        && let Some(stash) = &app.active_stash
    {
        let max = if app.view == View::Diff { 30 } else { 40 };
        spans.push(sep.clone());
        spans.push(Span::styled(truncate(&stash.label(), max), crumb));
    }
    if app.view == View::Diff
        && let Some(diff) = &app.diff
    {
        spans.push(sep);
        spans.push(Span::styled(truncate(&diff.file, 30), crumb));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let key_style = Style::default()
        .fg(palette.btn_fg)
        .bg(palette.muted)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(palette.muted);

    let apply_label = if app.view == View::Diff {
        "Apply file"
    } else {
        "Apply stash"
    };

    let mut right: Vec<Span> = Vec::new();
    if app.view == View::Diff {
        right.push(Span::styled(
            format!("{:3.0}%  ", app.diff_scroll_percent() * 100.0),
            desc_style,
        ));
    }
    right.extend([
        Span::styled(" ^K ", key_style),
        Span::styled(format!(" {}  ", apply_label), desc_style),
        Span::styled(" ? ", key_style),
        Span::styled(" Help ", desc_style),
    ]);
    let right_width: u16 = right.iter().map(|s| s.width() as u16).sum();

    let left = if let Some(label) = &app.success {
        Some(Span::styled(
            format!(" Applied: {}", label),
            Style::default()
                .fg(palette.diff_add_fg)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        app.error.as_ref().map(|err| {
            Span::styled(
                format!(" Error: {}", err),
                Style::default()
                    .fg(palette.diff_del_fg)
                    .add_modifier(Modifier::BOLD),
            )
        })
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(right_width)])
        .split(area);

    if let Some(left) = left {
        let max = chunks[0].width as usize;
        let text = truncate(&left.content, max);
        f.render_widget(Paragraph::new(Line::from(Span::styled(text, left.style))), chunks[0]);
    }
    f.render_widget(Paragraph::new(Line::from(right)), chunks[1]);
}

/// Cut `s` to at most `max` display columns, marking the cut with `…`.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0usize;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w + 1 > max {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push('…');
    out
}
