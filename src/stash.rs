//! Stash and changed-file entities, and the parsers that build them from git's
//! listings.
//!
//! All parsers are total: records that do not have the expected shape are
//! dropped instead of failing the whole listing.

use std::collections::HashMap;

/// Separator used to show a rename as a single label.
pub const RENAME_ARROW: &str = " -> ";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StashEntry {
    pub index: usize,
    /// Opaque ref passed back to git, e.g. `stash@{0}`.
    pub stash_ref: String,
    pub branch: String,
    pub message: String,
}

impl StashEntry {
    /// `stash@{N}: message`, used by the breadcrumb and the apply prompt.
    pub fn label(&self) -> String {
        format!("{}: {}", self.stash_ref, self.message)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Unknown,
}

impl FileStatus {
    /// Maps a `--name-status` code. Renames carry a similarity score (`R100`).
    pub fn from_code(code: &str) -> Self {
        match code {
            "A" => FileStatus::Added,
            "M" => FileStatus::Modified,
            "D" => FileStatus::Deleted,
            c if c.starts_with('R') => FileStatus::Renamed,
            _ => FileStatus::Unknown,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            FileStatus::Added => '+',
            FileStatus::Modified => '~',
            FileStatus::Deleted => '-',
            FileStatus::Renamed => 'R',
            FileStatus::Unknown => '~',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileEntry {
    pub status: FileStatus,
    /// Path in the stash, or `old -> new` for renames.
    pub name: String,
    pub lines_added: u32,
    pub lines_removed: u32,
}

impl FileEntry {
    /// The path git should be asked about.
    pub fn path(&self) -> &str {
        resolve_path(&self.name)
    }
}

/// Reduces an `old -> new` rename label to the new path. Other names are
/// returned unchanged.
pub fn resolve_path(name: &str) -> &str {
    match name.find(RENAME_ARROW) {
        Some(idx) => &name[idx + RENAME_ARROW.len()..],
        None => name,
    }
}

/// Parses `git stash list` output.
///
/// Lines look like `stash@{0}: On main: fix bug` or
/// `stash@{1}: WIP on main: abc1234 subject`. The ref is derived from the line
/// position, not from the text.
pub fn parse_stash_list(raw: &str) -> Vec<StashEntry> {
    let mut entries = Vec::new();

    for (index, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.splitn(3, ": ").collect();
        let (branch, message) = if parts.len() == 3 {
            let branch = parts[1];
            let branch = branch.strip_prefix("WIP on ").unwrap_or(branch);
            let branch = branch.strip_prefix("On ").unwrap_or(branch);
            (branch.to_string(), parts[2].to_string())
        } else {
            (String::new(), line.to_string())
        };

        entries.push(StashEntry {
            index,
            stash_ref: format!("stash@{{{}}}", index),
            branch,
            message,
        });
    }

    entries
}

/// Parses `git stash show -z --name-status` output.
///
/// Records are NUL-separated: `status\0path\0`, with a second path for
/// renames and copies (`R100\0old\0new\0`). Paths arrive unquoted.
pub fn parse_file_list(raw: &str) -> Vec<FileEntry> {
    let mut files = Vec::new();
    let mut fields = raw.split('\0');

    while let Some(code) = fields.next() {
        let code = code.trim();
        if code.is_empty() {
            continue;
        }
        let Some(path) = fields.next().filter(|p| !p.is_empty()) else {
            break;
        };

        let status = FileStatus::from_code(code);
        let name = if code.starts_with('R') || code.starts_with('C') {
            let Some(new) = fields.next().filter(|p| !p.is_empty()) else {
                break;
            };
            if status == FileStatus::Renamed {
                format!("{}{}{}", path, RENAME_ARROW, new)
            } else {
                new.to_string()
            }
        } else {
            path.to_string()
        };

        files.push(FileEntry {
            status,
            name,
            lines_added: 0,
            lines_removed: 0,
        });
    }

    files
}

/// Parses `git stash show -z --numstat` output.
///
/// Each record is `added\tremoved\tpath\0`; a rename leaves the path empty and
/// follows with `old\0new\0`, so renames are keyed by the new path. Binary
/// files report `-` for both counts; those parse as zero.
pub fn parse_numstat(raw: &str) -> HashMap<String, (u32, u32)> {
    let mut stats = HashMap::new();
    let mut fields = raw.split('\0');

    while let Some(record) = fields.next() {
        let record = record.trim_start_matches('\n');
        let parts: Vec<&str> = record.splitn(3, '\t').collect();
        if parts.len() < 3 {
            continue;
        }
        let adds = parts[0].parse::<u32>().unwrap_or(0);
        let dels = parts[1].parse::<u32>().unwrap_or(0);

        let path = if parts[2].is_empty() {
            let _old = fields.next();
            match fields.next().filter(|p| !p.is_empty()) {
                Some(new) => new.to_string(),
                None => break,
            }
        } else {
            parts[2].to_string()
        };
        stats.insert(path, (adds, dels));
    }
    stats
}

/// Fills line counts on `files` from parsed numstat output, looking each entry
/// up by its resolved (new) path.
pub fn merge_numstat(files: &mut [FileEntry], stats: &HashMap<String, (u32, u32)>) {
    for f in files.iter_mut() {
        if let Some((adds, dels)) = stats.get(f.path()) {
            f.lines_added = *adds;
            f.lines_removed = *dels;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_stash_line() {
        let entries = parse_stash_list("stash@{0}: On main: fix bug");
        assert_eq!(
            entries,
            vec![StashEntry {
                index: 0,
                stash_ref: "stash@{0}".to_string(),
                branch: "main".to_string(),
                message: "fix bug".to_string(),
            }]
        );
    }

    #[test]
    fn strips_wip_prefix_and_keeps_commit_subject() {
        let entries = parse_stash_list("stash@{0}: WIP on feature/x: 1a2b3c4 Last commit");
        assert_eq!(entries[0].branch, "feature/x");
        assert_eq!(entries[0].message, "1a2b3c4 Last commit");
    }

    #[test]
    fn refs_follow_line_position() {
        let raw = "stash@{0}: On main: a\nstash@{1}: On dev: b\nstash@{2}: WIP on main: c";
        let entries = parse_stash_list(raw);
        assert_eq!(entries.len(), 3);
        for (i, e) in entries.iter().enumerate() {
            assert_eq!(e.index, i);
            assert_eq!(e.stash_ref, format!("stash@{{{}}}", i));
        }
    }

    #[test]
    fn ref_ignores_line_text() {
        let entries = parse_stash_list("garbage@{9}: On main: x");
        assert_eq!(entries[0].stash_ref, "stash@{0}");
    }

    #[test]
    fn short_lines_fall_back_to_whole_line_message() {
        let entries = parse_stash_list("stash@{0}: only one separator\n\nno separator");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].branch, "");
        assert_eq!(entries[0].message, "stash@{0}: only one separator");
        assert_eq!(entries[1].message, "no separator");
    }

    #[test]
    fn message_keeps_later_separators() {
        let entries = parse_stash_list("stash@{0}: On main: note: more");
        assert_eq!(entries[0].message, "note: more");
    }

    #[test]
    fn reparsing_is_stable() {
        let raw = "stash@{0}: On main: a\nstash@{1}: WIP on dev: b";
        assert_eq!(parse_stash_list(raw), parse_stash_list(raw));
        assert_eq!(
            parse_file_list("M\0a.rs\0R090\0b\0c\0"),
            parse_file_list("M\0a.rs\0R090\0b\0c\0")
        );
    }

    #[test]
    fn empty_listing_has_no_entries() {
        assert!(parse_stash_list("").is_empty());
        assert!(parse_file_list("\0").is_empty());
        assert!(parse_numstat("").is_empty());
    }

    #[test]
    fn rename_is_normalized() {
        let files = parse_file_list("R100\0old.txt\0new.txt\0");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].status, FileStatus::Renamed);
        assert_eq!(files[0].name, "old.txt -> new.txt");
        assert_eq!(files[0].path(), "new.txt");
    }

    #[test]
    fn status_codes_map_to_tags() {
        let files = parse_file_list("A\0a\0M\0b\0D\0c\0T\0d\0bogus");
        let statuses: Vec<FileStatus> = files.iter().map(|f| f.status).collect();
        assert_eq!(
            statuses,
            vec![
                FileStatus::Added,
                FileStatus::Modified,
                FileStatus::Deleted,
                FileStatus::Unknown,
            ]
        );
    }

    #[test]
    fn binary_numstat_is_zero() {
        let stats = parse_numstat("-\t-\tbinaryfile.bin\x003\t1\tsrc/lib.rs\0");
        assert_eq!(stats.get("binaryfile.bin"), Some(&(0, 0)));
        assert_eq!(stats.get("src/lib.rs"), Some(&(3, 1)));
    }

    #[test]
    fn numstat_merges_by_new_name() {
        let mut files = parse_file_list("R100\0old.txt\0new.txt\0M\0keep.rs\0");
        let stats = parse_numstat("4\t2\t\0old.txt\0new.txt\x001\t1\tkeep.rs\0");
        merge_numstat(&mut files, &stats);
        assert_eq!((files[0].lines_added, files[0].lines_removed), (4, 2));
        assert_eq!((files[1].lines_added, files[1].lines_removed), (1, 1));
    }

    #[test]
    fn paths_are_taken_verbatim() {
        let files = parse_file_list("M\0caf\u{e9}.txt\0A\0with\ttab \"q\".txt\0");
        assert_eq!(files[0].name, "caf\u{e9}.txt");
        assert_eq!(files[1].name, "with\ttab \"q\".txt");

        let stats = parse_numstat("2\t1\tcaf\u{e9}.txt\0");
        assert_eq!(stats.get("caf\u{e9}.txt"), Some(&(2, 1)));
    }

    #[test]
    fn copies_take_the_destination_path() {
        let files = parse_file_list("C075\0src.rs\0dst.rs\0M\0x\0");
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].status, FileStatus::Unknown);
        assert_eq!(files[0].name, "dst.rs");
        assert_eq!(files[1].name, "x");
    }

    #[test]
    fn truncated_record_is_dropped() {
        assert!(parse_file_list("M\0").is_empty());
        assert!(parse_file_list("R100\0old.txt\0").is_empty());
        assert!(parse_numstat("1\t1\t\0old.txt\0").is_empty());
    }

    #[test]
    fn resolve_path_leaves_plain_names() {
        assert_eq!(resolve_path("a/b.rs"), "a/b.rs");
        assert_eq!(resolve_path("a -> b"), "b");
    }
}
