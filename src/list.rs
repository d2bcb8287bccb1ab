//! Selectable, filterable lists for the stash and file levels.

use ratatui::widgets::ListState;

use crate::stash::{FileEntry, StashEntry};

/// One list row, whichever level it belongs to.
#[derive(Clone, Copy, Debug)]
pub enum Row<'a> {
    Stash(&'a StashEntry),
    File(&'a FileEntry),
}

impl Row<'_> {
    pub fn title(&self) -> String {
        match self {
            Row::Stash(s) => s.label(),
            Row::File(f) => f.name.clone(),
        }
    }

    /// Text the filter query is matched against.
    pub fn filter_text(&self) -> String {
        match self {
            Row::Stash(s) => format!("{} {}", s.message, s.branch),
            Row::File(f) => f.name.clone(),
        }
    }

    /// Terminal lines the row occupies.
    pub fn height(&self) -> u16 {
        match self {
            Row::Stash(_) => 2,
            Row::File(_) => 1,
        }
    }
}

pub trait AsRow {
    fn as_row(&self) -> Row<'_>;
}

impl AsRow for StashEntry {
    fn as_row(&self) -> Row<'_> {
        Row::Stash(self)
    }
}

impl AsRow for FileEntry {
    fn as_row(&self) -> Row<'_> {
        Row::File(self)
    }
}

#[derive(Clone, Debug)]
pub struct FilterList<T> {
    items: Vec<T>,
    filtered: Vec<usize>,
    pub list_state: ListState,
    query: String,
    editing: bool,
}

impl<T> Default for FilterList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            filtered: Vec::new(),
            list_state: ListState::default(),
            query: String::new(),
            editing: false,
        }
    }
}

impl<T: AsRow> FilterList<T> {
    pub fn new(items: Vec<T>) -> Self {
        let mut list = Self {
            items,
            ..Self::default()
        };
        list.update_filtered();
        list
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items that pass the current filter, in display order.
    pub fn visible(&self) -> impl Iterator<Item = &T> {
        self.filtered.iter().filter_map(|i| self.items.get(*i))
    }

    pub fn visible_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn selected(&self) -> Option<&T> {
        let sel = self.list_state.selected()?;
        let idx = *self.filtered.get(sel)?;
        self.items.get(idx)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// The query is being typed.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// A non-empty query narrows the list.
    pub fn is_filtered(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn start_filter(&mut self) {
        self.editing = true;
    }

    pub fn push_char(&mut self, ch: char) {
        self.query.push(ch);
        self.update_filtered();
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
        self.update_filtered();
    }

    /// Stop editing and keep the filter applied.
    pub fn accept_filter(&mut self) {
        self.editing = false;
    }

    pub fn clear_filter(&mut self) {
        self.editing = false;
        self.query.clear();
        self.update_filtered();
    }

    pub fn move_selection(&mut self, delta: i32) {
        let len = self.filtered.len();
        if len == 0 {
            self.list_state.select(None);
            return;
        }

        let cur = self.list_state.selected().unwrap_or(0) as i32;
        let next = (cur + delta).clamp(0, len.saturating_sub(1) as i32);
        self.list_state.select(Some(next as usize));
    }

    pub fn select_first(&mut self) {
        if self.filtered.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        self.list_state.select(self.filtered.len().checked_sub(1));
    }

    fn update_filtered(&mut self) {
        let prev = self
            .list_state
            .selected()
            .and_then(|sel| self.filtered.get(sel).copied());

        let query = self.query.trim().to_lowercase();
        let tokens: Vec<&str> = query.split_whitespace().collect();

        let mut matches: Vec<(i32, usize)> = Vec::new();
        for (i, item) in self.items.iter().enumerate() {
            if tokens.is_empty() {
                matches.push((0, i));
                continue;
            }

            let hay = item.as_row().filter_text().to_lowercase();
            let mut score = 0i32;
            let mut ok = true;
            for t in &tokens {
                match token_score(&hay, t) {
                    Some(s) => score += s,
                    None => {
                        ok = false;
                        break;
                    }
                }
            }
            if ok {
                matches.push((score, i));
            }
        }

        matches.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        self.filtered.clear();
        self.filtered.extend(matches.into_iter().map(|(_, i)| i));

        if self.filtered.is_empty() {
            self.list_state.select(None);
            return;
        }

        if let Some(prev) = prev.and_then(|idx| self.filtered.iter().position(|i| *i == idx)) {
            self.list_state.select(Some(prev));
        } else {
            self.list_state.select(Some(0));
        }
    }
}

fn fuzzy_score(haystack: &str, needle: &str) -> Option<i32> {
    let mut score: i32 = 0;
    let mut last_match: Option<usize> = None;
    let mut pos = 0usize;

    for ch in needle.chars() {
        let (i, _) = haystack[pos..].char_indices().find(|(_, hc)| *hc == ch)?;
        let idx = pos + i;

        score += 10;
        if let Some(prev) = last_match {
            if idx == prev + 1 {
                score += 15;
            } else {
                let gap = idx.saturating_sub(prev + 1) as i32;
                score -= gap.min(30);
            }
        } else {
            score += (30 - idx as i32).max(0);
        }

        last_match = Some(idx);
        pos = idx + ch.len_utf8();
    }

    Some(score)
}

fn token_score(haystack: &str, token: &str) -> Option<i32> {
    if token.is_empty() {
        return Some(0);
    }

    if haystack.contains(token) {
        return Some(200 + (token.chars().count() as i32) * 5);
    }

    let score = fuzzy_score(haystack, token)?;
    let len = token.chars().count() as i32;

    if len >= 4 && score < len * 10 {
        return None;
    }

    Some(score)
}
