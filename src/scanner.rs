use crate::parser;
use crate::types::{Elog, ScanReport, ScanWarning};
use chrono::{DateTime, Local, NaiveDateTime};
use log::debug;
use std::fs;
use std::path::Path;
use std::time::SystemTime;
use walkdir::WalkDir;

/// Walk every root and parse each elog found. Roots that are missing or
/// unreadable, and files that cannot be read, end up in `warnings`; the scan
/// itself never aborts.
#[must_use]
pub fn scan_roots(roots: &[String]) -> ScanReport {
    let mut report = ScanReport::default();
    for root in roots {
        scan_root(Path::new(root), &mut report);
    }
    report
}

fn scan_root(root: &Path, report: &mut ScanReport) {
    if !root.is_dir() {
        debug!("{}: not a readable directory, skipping", root.display());
        report.warnings.push(ScanWarning {
            path: root.to_path_buf(),
            reason: "not a readable directory".to_string(),
        });
        return;
    }

    // Elogs sit either directly under the root or one category directory
    // down; anything deeper is not ours.
    for entry in WalkDir::new(root).max_depth(2) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                report.warnings.push(ScanWarning {
                    path,
                    reason: err.to_string(),
                });
                continue;
            }
        };
        // Symlinked elogs are legal; a dangling one surfaces as a read
        // failure below.
        if !entry.file_type().is_file() && !entry.file_type().is_symlink() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        let Some(stem) = name.strip_suffix(".log") else {
            continue;
        };
        let fields: Vec<&str> = stem.split(':').collect();
        let (category, package, date) = match (entry.depth(), fields.as_slice()) {
            // root/category:package:date.log
            (1, [category, package, date]) => ((*category).to_string(), *package, *date),
            // root/category/package:date.log
            (2, [package, date]) => {
                let category = entry
                    .path()
                    .parent()
                    .and_then(Path::file_name)
                    .map_or_else(String::new, |n| n.to_string_lossy().to_string());
                (category, *package, *date)
            }
            _ => continue,
        };

        match read_elog(entry.path(), &category, package, date) {
            Ok(elog) => {
                debug!("{}: {} sections", entry.path().display(), elog.sections.len());
                report.entries.push(elog);
            }
            Err(reason) => {
                debug!("{}: {reason}", entry.path().display());
                report.warnings.push(ScanWarning {
                    path: entry.path().to_path_buf(),
                    reason,
                });
            }
        }
    }
}

fn read_elog(path: &Path, category: &str, package: &str, date: &str) -> Result<Elog, String> {
    let bytes = fs::read(path).map_err(|err| err.to_string())?;
    let content = String::from_utf8_lossy(&bytes);

    let sections = parser::parse_sections(&content);
    let class = parser::highest_class(&sections);
    let parse_ok = !sections.is_empty();
    let (package, version) = split_package(package);

    Ok(Elog {
        path: path.to_path_buf(),
        category: category.to_string(),
        package,
        version,
        timestamp: parse_timestamp(date, path),
        size: bytes.len() as u64,
        sections,
        class,
        parse_ok,
        read: false,
        important: false,
    })
}

/// Remove the backing file of one entry. A file that is already gone is a
/// reported failure, not a silent success.
pub fn delete_elog(path: &Path) -> Result<(), String> {
    fs::remove_file(path).map_err(|err| format!("{}: {err}", path.display()))
}

/// Split `name-version` at the first hyphen that introduces a digit, the
/// package manager's version convention. No such hyphen means no version.
#[must_use]
pub fn split_package(package: &str) -> (String, String) {
    let bytes = package.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'-' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
            return (package[..i].to_string(), package[i + 1..].to_string());
        }
    }
    (package.to_string(), String::new())
}

fn parse_timestamp(date: &str, path: &Path) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(date, "%Y%m%d-%H%M%S").unwrap_or_else(|_| mtime(path))
}

fn mtime(path: &Path) -> NaiveDateTime {
    // Epoch, not now(): an entry with an unreadable mtime must sort old,
    // not fresh.
    let modified = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH);
    let local: DateTime<Local> = modified.into();
    local.naive_local()
}
