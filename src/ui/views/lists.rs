use ratatui::{
    Frame,
    layout::{Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState,
    },
};

use crate::app::App;
use crate::list::{AsRow, FilterList, Row};
use crate::stash::{FileEntry, FileStatus};
use crate::theme::Palette;

pub fn render_stash_list(f: &mut Frame, app: &mut App, area: Rect, palette: &Palette) {
    render_filter_list(f, &mut app.stashes, " Stashes ", "No stashes", area, palette);
}

pub fn render_file_list(f: &mut Frame, app: &mut App, area: Rect, palette: &Palette) {
    render_filter_list(f, &mut app.files, " Files ", "No files", area, palette);
}

fn render_filter_list<T: AsRow>(
    f: &mut Frame,
    list: &mut FilterList<T>,
    title: &str,
    empty: &str,
    area: Rect,
    palette: &Palette,
) {
    let block = list_block(title, list, palette);

    if list.is_empty() {
        f.render_widget(empty_hint(empty, palette).block(block), area);
        return;
    }

    let selected = list.list_state.selected().unwrap_or(0);
    let mut content_rows = 0usize;
    let mut selected_row = 0usize;
    let items: Vec<ListItem> = list
        .visible()
        .enumerate()
        .map(|(i, item)| {
            let row = item.as_row();
            if i == selected {
                selected_row = content_rows;
            }
            content_rows += row.height() as usize;
            ListItem::new(row_lines(row, palette))
        })
        .collect();

    f.render_stateful_widget(selectable(items, block, palette), area, &mut list.list_state);
    render_list_scrollbar(f, area, content_rows, selected_row);
}

fn row_lines(row: Row<'_>, palette: &Palette) -> Vec<Line<'static>> {
    match row {
        Row::Stash(stash) => vec![
            Line::from(Span::styled(
                row.title(),
                Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("  on {}", stash.branch),
                Style::default().fg(palette.muted),
            )),
        ],
        Row::File(entry) => vec![file_line(entry, palette)],
    }
}

fn file_line(entry: &FileEntry, palette: &Palette) -> Line<'static> {
    let status_color = match entry.status {
        FileStatus::Added => palette.diff_add_fg,
        FileStatus::Deleted => palette.diff_del_fg,
        FileStatus::Renamed => palette.accent_secondary,
        FileStatus::Modified | FileStatus::Unknown => palette.status_modified,
    };

    let mut spans = vec![
        Span::styled(
            format!("{} ", entry.status.glyph()),
            Style::default()
                .fg(status_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(entry.name.clone(), Style::default().fg(palette.fg)),
    ];
    if entry.lines_added > 0 || entry.lines_removed > 0 {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("+{}", entry.lines_added),
            Style::default().fg(palette.diff_add_fg),
        ));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("-{}", entry.lines_removed),
            Style::default().fg(palette.diff_del_fg),
        ));
    }
    Line::from(spans)
}

/// Bordered block whose title carries the count and the filter state.
fn list_block<'a, T: AsRow>(title: &str, list: &FilterList<T>, palette: &Palette) -> Block<'a> {
    let q = list.query().trim();
    let filter_label = if q.is_empty() && !list.is_editing() {
        "filter: /".to_string()
    } else {
        format!("filter: {}", q)
    };
    let filter_style = if list.is_editing() {
        Style::default()
            .fg(palette.accent_primary)
            .add_modifier(Modifier::BOLD)
    } else if !q.is_empty() {
        Style::default().fg(palette.accent_primary)
    } else {
        Style::default().fg(palette.muted)
    };
    let border_color = if list.is_editing() || !q.is_empty() {
        palette.accent_primary
    } else {
        palette.border_inactive
    };

    Block::default()
        .borders(Borders::ALL)
        .border_set(ratatui::symbols::border::PLAIN)
        .border_style(Style::default().fg(border_color))
        .title(Line::from(vec![
            Span::raw(format!("{}({})  ", title, list.visible_len())),
            Span::styled(filter_label, filter_style),
        ]))
}

fn selectable<'a>(items: Vec<ListItem<'a>>, block: Block<'a>, palette: &Palette) -> List<'a> {
    List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(palette.selection_bg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▎ ")
}

fn empty_hint(text: &str, palette: &Palette) -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(
        format!(" {}", text),
        Style::default().fg(palette.muted),
    )))
}

fn render_list_scrollbar(f: &mut Frame, area: Rect, content_rows: usize, position: usize) {
    let viewport = area.height.saturating_sub(2) as usize;
    if content_rows <= viewport {
        return;
    }
    let max_scroll = content_rows.saturating_sub(viewport).max(1);
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("▴"))
        .end_symbol(Some("▾"))
        .track_symbol(Some("│"))
        .thumb_symbol("█");
    let mut state = ScrollbarState::new(max_scroll).position(position.min(max_scroll));
    f.render_stateful_widget(
        scrollbar,
        area.inner(Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut state,
    );
}
