use ratatui::{
    style::{Modifier, Style},
    text::Line,
};

use crate::theme::Palette;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiffLineKind {
    /// `diff --git`, `index`, `---`, `+++` and mode lines.
    FileHeader,
    Hunk,
    Added,
    Removed,
    Context,
}

const HEADER_PREFIXES: &[&str] = &[
    "diff --git ",
    "index ",
    "--- ",
    "+++ ",
    "new file mode",
    "deleted file mode",
    "similarity index",
    "rename from",
    "rename to",
    "old mode",
    "new mode",
    "Binary files",
];

/// Kind of `line`. Header prefixes only count outside a hunk, where content
/// lines such as `--- x` (a removed `-- x`) cannot appear.
pub fn classify(line: &str, in_hunk: bool) -> DiffLineKind {
    if line.starts_with("@@") {
        DiffLineKind::Hunk
    } else if line.starts_with("diff --git ")
        || (!in_hunk && HEADER_PREFIXES.iter().any(|p| line.starts_with(p)))
    {
        DiffLineKind::FileHeader
    } else if line.starts_with('+') {
        DiffLineKind::Added
    } else if line.starts_with('-') {
        DiffLineKind::Removed
    } else {
        DiffLineKind::Context
    }
}

pub fn line_style(kind: DiffLineKind, palette: &Palette) -> Style {
    match kind {
        DiffLineKind::FileHeader | DiffLineKind::Hunk => Style::default()
            .fg(palette.diff_hunk_fg)
            .add_modifier(Modifier::BOLD),
        DiffLineKind::Added => Style::default().fg(palette.diff_add_fg),
        DiffLineKind::Removed => Style::default().fg(palette.diff_del_fg),
        DiffLineKind::Context => Style::default().fg(palette.fg),
    }
}

/// Colorize a unified diff, one styled line per input line.
pub fn colorize(text: &str, palette: &Palette) -> Vec<Line<'static>> {
    let mut in_hunk = false;
    text.lines()
        .map(|l| {
            let kind = classify(l, in_hunk);
            match kind {
                DiffLineKind::Hunk => in_hunk = true,
                DiffLineKind::FileHeader => in_hunk = false,
                _ => {}
            }
            let l = l.replace('\t', "    ");
            Line::styled(l, line_style(kind, palette))
        })
        .collect()
}
