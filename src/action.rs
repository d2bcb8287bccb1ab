//! The pending destructive action and its confirmation gate.

use crate::stash::StashEntry;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyScope {
    WholeStash,
    SingleFile,
}

/// A restore the user asked for but has not yet confirmed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingAction {
    pub scope: ApplyScope,
    pub target_ref: String,
    /// Empty for [`ApplyScope::WholeStash`].
    pub target_file: String,
    pub label: String,
}

impl PendingAction {
    pub fn whole_stash(stash: &StashEntry) -> Self {
        Self {
            scope: ApplyScope::WholeStash,
            target_ref: stash.stash_ref.clone(),
            target_file: String::new(),
            label: format!("Apply {}", stash.label()),
        }
    }

    pub fn single_file(stash: &StashEntry, file: &str) -> Self {
        Self {
            scope: ApplyScope::SingleFile,
            target_ref: stash.stash_ref.clone(),
            target_file: file.to_string(),
            label: format!("Apply {} to {}", stash.stash_ref, file),
        }
    }

    pub fn description(&self) -> &'static str {
        match self.scope {
            ApplyScope::WholeStash => {
                "This will apply all changes from the stash to your working tree."
            }
            ApplyScope::SingleFile => {
                "This will restore this file from the stash into your working tree."
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Confirmation {
    #[default]
    Idle,
    Confirming(PendingAction),
}

impl Confirmation {
    pub fn is_open(&self) -> bool {
        matches!(self, Confirmation::Confirming(_))
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        match self {
            Confirmation::Idle => None,
            Confirmation::Confirming(p) => Some(p),
        }
    }

    pub fn open(&mut self, action: PendingAction) {
        *self = Confirmation::Confirming(action);
    }

    /// Closes the prompt and hands back what was pending, if anything.
    pub fn take(&mut self) -> Option<PendingAction> {
        match std::mem::take(self) {
            Confirmation::Idle => None,
            Confirmation::Confirming(p) => Some(p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> StashEntry {
        StashEntry {
            index: 2,
            stash_ref: "stash@{2}".to_string(),
            branch: "main".to_string(),
            message: "wip parser".to_string(),
        }
    }

    #[test]
    fn labels_name_the_target() {
        assert_eq!(
            PendingAction::whole_stash(&entry()).label,
            "Apply stash@{2}: wip parser"
        );
        let single = PendingAction::single_file(&entry(), "src/lib.rs");
        assert_eq!(single.label, "Apply stash@{2} to src/lib.rs");
        assert_eq!(single.target_file, "src/lib.rs");
    }

    #[test]
    fn take_closes_the_prompt() {
        let mut c = Confirmation::default();
        assert!(c.take().is_none());

        c.open(PendingAction::whole_stash(&entry()));
        assert!(c.is_open());
        let p = c.take().unwrap();
        assert_eq!(p.scope, ApplyScope::WholeStash);
        assert!(p.target_file.is_empty());
        assert_eq!(c, Confirmation::Idle);
    }
}
