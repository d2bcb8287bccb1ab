//! Background execution of git work.
//!
//! Every git call blocks on a child process, so each dispatched [`Task`] runs
//! under `tokio::task::spawn_blocking` and posts exactly one [`TaskResult`] on
//! the runner's result channel. The UI loop polls that channel alongside
//! terminal input and feeds each result to the state machine in arrival order.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::action::{ApplyScope, PendingAction};
use crate::error::{Result, StashError};
use crate::git_ops::StashSource;
use crate::stash::{FileEntry, StashEntry};

/// Work the state machine asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Task {
    ListStashes,
    ListFiles { stash_ref: String },
    LoadDiff { stash_ref: String, file: String },
    Apply(PendingAction),
}

/// Completion message for a [`Task`]. Failures travel as values.
#[derive(Debug)]
pub enum TaskResult {
    Stashes(Result<Vec<StashEntry>>),
    Files {
        stash_ref: String,
        result: Result<Vec<FileEntry>>,
    },
    Diff {
        file: String,
        result: Result<String>,
    },
    Applied {
        label: String,
        result: Result<()>,
    },
}

impl Task {
    fn run(self, source: &dyn StashSource) -> TaskResult {
        match self {
            Task::ListStashes => TaskResult::Stashes(source.list_stashes()),
            Task::ListFiles { stash_ref } => {
                let result = source.list_files(&stash_ref);
                TaskResult::Files { stash_ref, result }
            }
            Task::LoadDiff { stash_ref, file } => {
                let result = source.load_diff(&stash_ref, &file);
                TaskResult::Diff { file, result }
            }
            Task::Apply(action) => {
                let result = match action.scope {
                    ApplyScope::WholeStash => source.apply_stash(&action.target_ref),
                    ApplyScope::SingleFile => {
                        source.apply_file(&action.target_ref, &action.target_file)
                    }
                };
                TaskResult::Applied {
                    label: action.label,
                    result,
                }
            }
        }
    }

    /// The completion message for this task when it never produced one.
    fn failed(self, err: StashError) -> TaskResult {
        match self {
            Task::ListStashes => TaskResult::Stashes(Err(err)),
            Task::ListFiles { stash_ref } => TaskResult::Files {
                stash_ref,
                result: Err(err),
            },
            Task::LoadDiff { file, .. } => TaskResult::Diff {
                file,
                result: Err(err),
            },
            Task::Apply(action) => TaskResult::Applied {
                label: action.label,
                result: Err(err),
            },
        }
    }
}

/// Handle for dispatching tasks.
pub struct TaskRunner {
    source: Arc<dyn StashSource>,
    tx: mpsc::Sender<TaskResult>,
    shutdown: CancellationToken,
    in_flight: Option<JoinHandle<()>>,
}

impl TaskRunner {
    /// Create a runner and the receiver its results arrive on.
    ///
    /// The receiver should be polled in the main event loop.
    pub fn new(source: Arc<dyn StashSource>) -> (Self, mpsc::Receiver<TaskResult>) {
        let (tx, rx) = mpsc::channel::<TaskResult>(16);
        (
            Self {
                source,
                tx,
                shutdown: CancellationToken::new(),
                in_flight: None,
            },
            rx,
        )
    }

    /// Start `task` in the background. Never blocks.
    pub fn dispatch(&mut self, task: Task) {
        tracing::debug!(?task, "dispatching task");

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let shutdown = self.shutdown.clone();
        let fallback = task.clone();

        let handle = tokio::spawn(async move {
            let joined = tokio::task::spawn_blocking(move || task.run(source.as_ref())).await;
            let result = match joined {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(error = %e, "background task did not complete");
                    fallback.failed(StashError::Task(e.to_string()))
                }
            };

            if shutdown.is_cancelled() {
                return;
            }
            let _ = tx.send(result).await;
        });

        // The previous handle belongs to a task whose result was already
        // delivered; only one load is ever outstanding.
        self.in_flight = Some(handle);
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Stop delivering results. Running git processes are left to finish.
    pub fn shutdown(&mut self) {
        self.shutdown.cancel();
        self.in_flight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stash::FileStatus;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSource {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingSource {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl StashSource for RecordingSource {
        fn list_stashes(&self) -> Result<Vec<StashEntry>> {
            self.record("list_stashes".to_string());
            Ok(crate::stash::parse_stash_list("stash@{0}: On main: fix bug"))
        }

        fn list_files(&self, stash_ref: &str) -> Result<Vec<FileEntry>> {
            self.record(format!("list_files {}", stash_ref));
            Ok(vec![FileEntry {
                status: FileStatus::Added,
                name: "a.txt".to_string(),
                lines_added: 1,
                lines_removed: 0,
            }])
        }

        fn load_diff(&self, stash_ref: &str, file: &str) -> Result<String> {
            self.record(format!("load_diff {} {}", stash_ref, file));
            Err(StashError::Fetch("git diff: boom".to_string()))
        }

        fn apply_stash(&self, stash_ref: &str) -> Result<()> {
            self.record(format!("apply_stash {}", stash_ref));
            Ok(())
        }

        fn apply_file(&self, _stash_ref: &str, _file: &str) -> Result<()> {
            panic!("apply_file exploded");
        }
    }

    fn stash() -> StashEntry {
        crate::stash::parse_stash_list("stash@{0}: On main: fix bug").remove(0)
    }

    #[tokio::test]
    async fn list_files_posts_one_result() {
        let source = Arc::new(RecordingSource::default());
        let (mut runner, mut rx) = TaskRunner::new(source.clone());

        runner.dispatch(Task::ListFiles {
            stash_ref: "stash@{0}".to_string(),
        });

        match rx.recv().await.unwrap() {
            TaskResult::Files { stash_ref, result } => {
                assert_eq!(stash_ref, "stash@{0}");
                assert_eq!(result.unwrap().len(), 1);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(source.calls(), vec!["list_files stash@{0}"]);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn failures_arrive_as_messages() {
        let source = Arc::new(RecordingSource::default());
        let (mut runner, mut rx) = TaskRunner::new(source);

        runner.dispatch(Task::LoadDiff {
            stash_ref: "stash@{0}".to_string(),
            file: "a.txt".to_string(),
        });

        match rx.recv().await.unwrap() {
            TaskResult::Diff { file, result } => {
                assert_eq!(file, "a.txt");
                assert!(matches!(result, Err(StashError::Fetch(_))));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn apply_routes_by_scope() {
        let source = Arc::new(RecordingSource::default());
        let (mut runner, mut rx) = TaskRunner::new(source.clone());

        let action = PendingAction::whole_stash(&stash());
        runner.dispatch(Task::Apply(action.clone()));

        match rx.recv().await.unwrap() {
            TaskResult::Applied { label, result } => {
                assert_eq!(label, action.label);
                assert!(result.is_ok());
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(source.calls(), vec!["apply_stash stash@{0}"]);
    }

    #[tokio::test]
    async fn panicking_task_still_completes() {
        let source = Arc::new(RecordingSource::default());
        let (mut runner, mut rx) = TaskRunner::new(source);

        let action = PendingAction::single_file(&stash(), "a.txt");
        runner.dispatch(Task::Apply(action));

        match rx.recv().await.unwrap() {
            TaskResult::Applied { result, .. } => {
                assert!(matches!(result, Err(StashError::Task(_))));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn shutdown_drops_late_results() {
        let source = Arc::new(RecordingSource::default());
        let (mut runner, mut rx) = TaskRunner::new(source);

        runner.dispatch(Task::ListStashes);
        runner.shutdown();
        drop(runner);

        // The sender inside the task is dropped without sending.
        assert!(rx.recv().await.is_none());
    }
}
