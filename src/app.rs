//! The navigation state machine.
//!
//! [`App::update`] is the only place state changes. It consumes user intents
//! and task completions in arrival order and answers with at most one
//! [`Effect`] for the event loop to carry out.

use crate::action::{Confirmation, PendingAction};
use crate::error::StashError;
use crate::list::FilterList;
use crate::loader::{Task, TaskResult};
use crate::stash::{FileEntry, StashEntry};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    StashList,
    FileList,
    Diff,
}

/// A loaded diff and the file label it was requested for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffText {
    pub file: String,
    pub text: String,
}

/// What the user asked for, already decoupled from key codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    Select,
    Back,
    Refresh,
    ToggleHelp,
    RequestApply,
    Confirm,
    Cancel,
    StartFilter,
    FilterChar(char),
    FilterBackspace,
    AcceptFilter,
    /// `q`: leave the app.
    Quit,
    /// `Ctrl+C`: leave the app from any state.
    ForceQuit,
    /// A key with no binding in the current context.
    Unbound,
}

#[derive(Debug)]
pub enum Message {
    Intent(Intent),
    Completed(TaskResult),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    Dispatch(Task),
    Quit,
}

pub struct App {
    pub view: View,
    pub stashes: FilterList<StashEntry>,
    pub files: FilterList<FileEntry>,
    pub active_stash: Option<StashEntry>,
    pub diff: Option<DiffText>,
    pub diff_scroll: u16,
    /// Lines of diff visible at once; kept current by the renderer.
    pub diff_viewport_height: u16,
    pub loading: bool,
    pub error: Option<StashError>,
    pub success: Option<String>,
    pub show_help: bool,
    pub confirm: Confirmation,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            view: View::StashList,
            stashes: FilterList::default(),
            files: FilterList::default(),
            active_stash: None,
            diff: None,
            diff_scroll: 0,
            diff_viewport_height: 20,
            loading: false,
            error: None,
            success: None,
            show_help: false,
            confirm: Confirmation::Idle,
        }
    }

    /// The initial stash listing request.
    pub fn start(&mut self) -> Effect {
        self.loading = true;
        Effect::Dispatch(Task::ListStashes)
    }

    pub fn update(&mut self, msg: Message) -> Effect {
        match msg {
            Message::Intent(intent) => self.handle_intent(intent),
            Message::Completed(result) => {
                self.handle_result(result);
                Effect::None
            }
        }
    }

    /// The list filter of the active level is being typed into.
    pub fn is_filter_editing(&self) -> bool {
        match self.view {
            View::StashList => self.stashes.is_editing(),
            View::FileList => self.files.is_editing(),
            View::Diff => false,
        }
    }

    fn handle_intent(&mut self, intent: Intent) -> Effect {
        // A success notice lasts until the next keypress of any kind.
        self.success = None;

        if intent == Intent::ForceQuit {
            return Effect::Quit;
        }

        if self.loading {
            return match intent {
                Intent::Quit => Effect::Quit,
                Intent::ToggleHelp => {
                    self.show_help = !self.show_help;
                    Effect::None
                }
                _ => {
                    tracing::trace!(?intent, "dropped while loading");
                    Effect::None
                }
            };
        }

        if self.confirm.is_open() {
            return self.handle_confirm_intent(intent);
        }

        if self.show_help {
            match intent {
                Intent::Quit => return Effect::Quit,
                // Any other key only closes the overlay.
                _ => {
                    self.show_help = false;
                    return Effect::None;
                }
            }
        }

        match intent {
            Intent::Quit => Effect::Quit,
            Intent::ToggleHelp => {
                self.show_help = true;
                Effect::None
            }
            Intent::RequestApply => {
                self.request_apply();
                Effect::None
            }
            _ => match self.view {
                View::StashList => self.stash_list_intent(intent),
                View::FileList => self.file_list_intent(intent),
                View::Diff => self.diff_intent(intent),
            },
        }
    }

    fn handle_confirm_intent(&mut self, intent: Intent) -> Effect {
        match intent {
            Intent::Confirm => match self.confirm.take() {
                Some(action) => self.run_apply(action),
                None => Effect::None,
            },
            Intent::Cancel | Intent::Back => {
                self.confirm.take();
                Effect::None
            }
            Intent::Quit => Effect::Quit,
            _ => Effect::None,
        }
    }

    fn run_apply(&mut self, action: PendingAction) -> Effect {
        tracing::info!(label = %action.label, "apply confirmed");
        self.loading = true;
        self.error = None;
        Effect::Dispatch(Task::Apply(action))
    }

    fn request_apply(&mut self) {
        let pending = match self.view {
            View::StashList => self.stashes.selected().map(PendingAction::whole_stash),
            View::FileList => self.active_stash.as_ref().map(PendingAction::whole_stash),
            View::Diff => match (&self.active_stash, &self.diff) {
                (Some(stash), Some(diff)) => Some(PendingAction::single_file(stash, &diff.file)),
                _ => None,
            },
        };

        if let Some(action) = pending {
            tracing::debug!(label = %action.label, "awaiting confirmation");
            self.confirm.open(action);
        }
    }

    fn stash_list_intent(&mut self, intent: Intent) -> Effect {
        if let Some(effect) = list_filter_intent(&mut self.stashes, intent) {
            return effect;
        }

        match intent {
            Intent::Select => {
                let Some(entry) = self.stashes.selected().cloned() else {
                    return Effect::None;
                };
                let stash_ref = entry.stash_ref.clone();
                self.active_stash = Some(entry);
                self.loading = true;
                self.error = None;
                Effect::Dispatch(Task::ListFiles { stash_ref })
            }
            Intent::Refresh => {
                self.loading = true;
                self.error = None;
                Effect::Dispatch(Task::ListStashes)
            }
            Intent::Back => Effect::Quit,
            _ => Effect::None,
        }
    }

    fn file_list_intent(&mut self, intent: Intent) -> Effect {
        if let Some(effect) = list_filter_intent(&mut self.files, intent) {
            return effect;
        }

        match intent {
            Intent::Select => {
                let (Some(stash), Some(file)) = (&self.active_stash, self.files.selected()) else {
                    return Effect::None;
                };
                let task = Task::LoadDiff {
                    stash_ref: stash.stash_ref.clone(),
                    file: file.name.clone(),
                };
                self.loading = true;
                self.error = None;
                Effect::Dispatch(task)
            }
            Intent::Back => {
                self.view = View::StashList;
                self.files = FilterList::default();
                self.error = None;
                Effect::None
            }
            _ => Effect::None,
        }
    }

    fn diff_intent(&mut self, intent: Intent) -> Effect {
        let page = self.diff_viewport_height.max(1);
        match intent {
            Intent::MoveDown => self.scroll_diff_to(self.diff_scroll.saturating_add(1)),
            Intent::MoveUp => self.scroll_diff_to(self.diff_scroll.saturating_sub(1)),
            Intent::PageDown => self.scroll_diff_to(self.diff_scroll.saturating_add(page)),
            Intent::PageUp => self.scroll_diff_to(self.diff_scroll.saturating_sub(page)),
            Intent::Top => self.diff_scroll = 0,
            Intent::Bottom => self.scroll_diff_to(u16::MAX),
            Intent::Back => {
                self.view = View::FileList;
                self.diff = None;
                self.diff_scroll = 0;
                self.error = None;
            }
            _ => {}
        }
        Effect::None
    }

    fn diff_line_count(&self) -> u16 {
        self.diff
            .as_ref()
            .map(|d| d.text.lines().count().min(u16::MAX as usize) as u16)
            .unwrap_or(0)
    }

    fn max_diff_scroll(&self) -> u16 {
        self.diff_line_count()
            .saturating_sub(self.diff_viewport_height.max(1))
    }

    fn scroll_diff_to(&mut self, y: u16) {
        self.diff_scroll = y.min(self.max_diff_scroll());
    }

    /// How far through the diff the viewport is, 0.0 to 1.0.
    pub fn diff_scroll_percent(&self) -> f64 {
        let max = self.max_diff_scroll();
        if max == 0 {
            1.0
        } else {
            f64::from(self.diff_scroll) / f64::from(max)
        }
    }

    fn handle_result(&mut self, result: TaskResult) {
        self.loading = false;

        match result {
            TaskResult::Stashes(Ok(stashes)) => {
                tracing::debug!(count = stashes.len(), "stashes loaded");
                self.stashes = FilterList::new(stashes);
            }
            TaskResult::Files {
                stash_ref,
                result: Ok(files),
            } => {
                tracing::debug!(%stash_ref, count = files.len(), "files loaded");
                self.files = FilterList::new(files);
                self.view = View::FileList;
            }
            TaskResult::Diff {
                file,
                result: Ok(text),
            } => {
                tracing::debug!(%file, "diff loaded");
                self.diff = Some(DiffText { file, text });
                self.diff_scroll = 0;
                self.view = View::Diff;
            }
            TaskResult::Applied { label, result: Ok(()) } => {
                tracing::info!(%label, "applied");
                self.success = Some(label);
            }
            TaskResult::Stashes(Err(e))
            | TaskResult::Files { result: Err(e), .. }
            | TaskResult::Diff { result: Err(e), .. }
            | TaskResult::Applied { result: Err(e), .. } => {
                tracing::warn!(error = %e, view = ?self.view, "task failed");
                self.error = Some(e);
            }
        }
    }
}

/// Movement and filter editing shared by both list levels. Returns `None`
/// when the intent is not a list operation.
fn list_filter_intent<T: crate::list::AsRow>(
    list: &mut FilterList<T>,
    intent: Intent,
) -> Option<Effect> {
    if list.is_editing() {
        match intent {
            Intent::FilterChar(ch) => list.push_char(ch),
            Intent::FilterBackspace => list.pop_char(),
            Intent::AcceptFilter => list.accept_filter(),
            Intent::Cancel | Intent::Back => list.clear_filter(),
            Intent::MoveUp => list.move_selection(-1),
            Intent::MoveDown => list.move_selection(1),
            _ => {}
        }
        return Some(Effect::None);
    }

    match intent {
        Intent::MoveUp => list.move_selection(-1),
        Intent::MoveDown => list.move_selection(1),
        Intent::PageUp => list.move_selection(-10),
        Intent::PageDown => list.move_selection(10),
        Intent::Top => list.select_first(),
        Intent::Bottom => list.select_last(),
        Intent::StartFilter => list.start_filter(),
        Intent::Back if list.is_filtered() => list.clear_filter(),
        _ => return None,
    }
    Some(Effect::None)
}
