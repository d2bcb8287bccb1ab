use std::{
    io,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use crate::error::{Result, StashError};
use crate::stash::{self, FileEntry, StashEntry};

/// Read and write operations against a repository's stash.
///
/// Implementations block; callers run them off the UI thread. File names may
/// be given in `old -> new` rename form and are resolved to the new path.
pub trait StashSource: Send + Sync {
    fn list_stashes(&self) -> Result<Vec<StashEntry>>;
    fn list_files(&self, stash_ref: &str) -> Result<Vec<FileEntry>>;
    fn load_diff(&self, stash_ref: &str, file: &str) -> Result<String>;
    fn apply_stash(&self, stash_ref: &str) -> Result<()>;
    fn apply_file(&self, stash_ref: &str, file: &str) -> Result<()>;
}

fn run_git(cwd: &Path, args: &[&str]) -> io::Result<Output> {
    Command::new("git")
        .arg("-C")
        .arg(cwd)
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .env("GCM_INTERACTIVE", "never")
        .env("GIT_PAGER", "cat")
        .env("PAGER", "cat")
        .env("GIT_EDITOR", ":")
        .env("EDITOR", ":")
        .env("GIT_MERGE_AUTOEDIT", "no")
        .output()
}

#[derive(Clone, Copy)]
enum OpKind {
    Read,
    Write,
}

fn failure(kind: OpKind, args: &[&str], stderr: &str, stash_ref: Option<&str>) -> StashError {
    let stderr = stderr.trim();
    if let Some(r) = stash_ref
        && is_unknown_ref(stderr)
    {
        return StashError::NoSuchRef(r.to_string());
    }

    let sub = args.first().copied().unwrap_or("");
    let msg = if stderr.is_empty() {
        format!("git {}: exited with an error", sub)
    } else {
        format!("git {}: {}", sub, stderr)
    };
    match kind {
        OpKind::Read => StashError::Fetch(msg),
        OpKind::Write => StashError::Apply(msg),
    }
}

fn is_unknown_ref(stderr: &str) -> bool {
    stderr.contains("is not a valid reference")
        || stderr.contains("unknown revision")
        || stderr.contains("bad revision")
        || stderr.contains("not a stash-like commit")
}

/// A git work tree, addressed through the `git` binary.
#[derive(Clone, Debug)]
pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    /// Resolves the work tree containing `path`.
    pub fn discover(path: &Path) -> Result<Self> {
        let out = run_git(path, &["rev-parse", "--show-toplevel"])
            .map_err(|_| StashError::NotARepository(path.to_path_buf()))?;
        if !out.status.success() {
            return Err(StashError::NotARepository(path.to_path_buf()));
        }

        let root = String::from_utf8_lossy(&out.stdout).trim().to_string();
        if root.is_empty() {
            return Err(StashError::NotARepository(path.to_path_buf()));
        }
        Ok(Self {
            root: PathBuf::from(root),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn git(&self, kind: OpKind, args: &[&str], stash_ref: Option<&str>) -> Result<String> {
        tracing::debug!(root = %self.root.display(), ?args, "running git");
        let out = run_git(&self.root, args).map_err(|e| {
            let msg = format!("failed to run git: {}", e);
            match kind {
                OpKind::Read => StashError::Fetch(msg),
                OpKind::Write => StashError::Apply(msg),
            }
        })?;
        if !out.status.success() {
            let err = failure(kind, args, &String::from_utf8_lossy(&out.stderr), stash_ref);
            tracing::warn!(error = %err, "git command failed");
            return Err(err);
        }
        Ok(String::from_utf8_lossy(&out.stdout).to_string())
    }
}

impl StashSource for GitRepo {
    fn list_stashes(&self) -> Result<Vec<StashEntry>> {
        let out = self.git(OpKind::Read, &["stash", "list", "--no-color"], None)?;
        Ok(stash::parse_stash_list(&out))
    }

    fn list_files(&self, stash_ref: &str) -> Result<Vec<FileEntry>> {
        let out = self.git(
            OpKind::Read,
            &["stash", "show", "--no-color", "-z", "--name-status", stash_ref],
            Some(stash_ref),
        )?;
        let mut files = stash::parse_file_list(&out);

        // Line counts are decoration; a failure here keeps the bare listing.
        match self.git(
            OpKind::Read,
            &["stash", "show", "--no-color", "-z", "--numstat", stash_ref],
            Some(stash_ref),
        ) {
            Ok(stat_out) => {
                let stats = stash::parse_numstat(&stat_out);
                stash::merge_numstat(&mut files, &stats);
            }
            Err(e) => tracing::debug!(error = %e, "numstat unavailable"),
        }

        Ok(files)
    }

    fn load_diff(&self, stash_ref: &str, file: &str) -> Result<String> {
        let path = stash::resolve_path(file);
        let base = format!("{}^", stash_ref);
        let out = self.git(
            OpKind::Read,
            &["diff", "--no-color", base.as_str(), stash_ref, "--", path],
            Some(stash_ref),
        )?;
        Ok(out.trim_end().to_string())
    }

    fn apply_stash(&self, stash_ref: &str) -> Result<()> {
        self.git(OpKind::Write, &["stash", "apply", stash_ref], Some(stash_ref))?;
        Ok(())
    }

    fn apply_file(&self, stash_ref: &str, file: &str) -> Result<()> {
        let path = stash::resolve_path(file);
        self.git(
            OpKind::Write,
            &["checkout", stash_ref, "--", path],
            Some(stash_ref),
        )?;
        Ok(())
    }
}
