use crate::types::Elog;
use log::warn;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Read/important markers keyed by elog path.
///
/// State lives in a plain text file, one `read <path>` or `star <path>` line
/// per marker. It is loaded when a scan starts and written back after every
/// mutating command; nothing else touches it.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Flags {
    pub read: HashSet<PathBuf>,
    pub important: HashSet<PathBuf>,
}

impl Flags {
    /// A missing or unreadable state file is the empty state, not an error.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let mut flags = Self::default();
        let Ok(content) = fs::read_to_string(path) else {
            return flags;
        };
        for line in content.lines() {
            let Some((kind, file)) = line.split_once(' ') else {
                continue;
            };
            match kind {
                "read" => {
                    flags.read.insert(PathBuf::from(file));
                }
                "star" => {
                    flags.important.insert(PathBuf::from(file));
                }
                _ => warn!("{}: unknown flag entry {line:?}", path.display()),
            }
        }
        flags
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        let mut lines: Vec<String> = self
            .read
            .iter()
            .map(|p| format!("read {}", p.display()))
            .collect();
        lines.extend(self.important.iter().map(|p| format!("star {}", p.display())));
        lines.sort();

        let mut out = lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        fs::write(path, out).map_err(|err| format!("{}: {err}", path.display()))
    }

    /// Copy the stored markers onto freshly scanned entries.
    pub fn apply(&self, entries: &mut [Elog]) {
        for elog in entries {
            elog.read = self.read.contains(&elog.path);
            elog.important = self.important.contains(&elog.path);
        }
    }

    /// Drop all markers for a path, used when its file is deleted.
    pub fn forget(&mut self, path: &Path) {
        self.read.remove(path);
        self.important.remove(path);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read.is_empty() && self.important.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let flags = Flags::load(&dir.path().join("absent"));

        assert!(flags.is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("flags");

        let mut flags = Flags::default();
        flags.read.insert(PathBuf::from("/var/log/a.log"));
        flags.read.insert(PathBuf::from("/var/log/b.log"));
        flags.important.insert(PathBuf::from("/var/log/a.log"));
        flags.save(&state).unwrap();

        assert_eq!(Flags::load(&state), flags);
    }

    #[test]
    fn test_unknown_lines_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("flags");
        fs::write(&state, "read /x.log\nbogus /y.log\n\n").unwrap();

        let flags = Flags::load(&state);

        assert_eq!(flags.read.len(), 1);
        assert!(flags.important.is_empty());
    }

    #[test]
    fn test_forget_clears_both_markers() {
        let mut flags = Flags::default();
        let path = PathBuf::from("/x.log");
        flags.read.insert(path.clone());
        flags.important.insert(path.clone());

        flags.forget(&path);

        assert!(flags.is_empty());
    }

    #[test]
    fn test_save_empty_writes_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("flags");

        Flags::default().save(&state).unwrap();

        assert_eq!(fs::read_to_string(&state).unwrap(), "");
    }
}
