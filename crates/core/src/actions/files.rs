//! Filesystem steps: tree copy and regex-matched deletion
//!
//! Neither walk follows symbolic links. A link is copied as a link and can be
//! matched and deleted like a file, but the tree it points to is never visited.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use globset::GlobSet;
use regex::Regex;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::types::{ChoreError, ChoreResult};

fn io_error(action: &str, path: &Path, e: std::io::Error) -> ChoreError {
    ChoreError::Action(format!("Failed to {} {}: {}", action, path.display(), e))
}

fn walk_error(root: &Path, e: walkdir::Error) -> ChoreError {
    let path = e.path().unwrap_or(root).to_path_buf();
    ChoreError::Action(format!("Failed to read {}: {}", path.display(), e))
}

/// Compile `pattern` so it has to match a whole path, as `find -regex` does
pub fn anchored_regex(pattern: &str) -> ChoreResult<Regex> {
    Regex::new(&format!("^(?:{})$", pattern))
        .map_err(|e| ChoreError::Config(format!("Invalid pattern '{}': {}", pattern, e)))
}

#[cfg(unix)]
fn copy_link(link: &Path, target: &Path) -> ChoreResult<()> {
    let points_to = fs::read_link(link).map_err(|e| io_error("read link", link, e))?;
    if fs::symlink_metadata(target).is_ok() {
        fs::remove_file(target).map_err(|e| io_error("replace", target, e))?;
    }
    std::os::unix::fs::symlink(&points_to, target).map_err(|e| io_error("create link", target, e))
}

#[cfg(not(unix))]
fn copy_link(link: &Path, _target: &Path) -> ChoreResult<()> {
    warn!(path = %link.display(), "skipping symbolic link");
    Ok(())
}

/// Copy the directory tree at `from` into `into`, skipping entries whose path
/// relative to `from` matches `exclude`. Returns the number of files copied.
pub fn copy_tree(from: &Path, into: &Path, exclude: &GlobSet) -> ChoreResult<usize> {
    if !from.is_dir() {
        return Err(ChoreError::Action(format!(
            "Copy source {} is not a directory",
            from.display()
        )));
    }

    fs::create_dir_all(into).map_err(|e| io_error("create", into, e))?;
    // The destination may live inside the source (copying "." into "build/")
    let into_canonical = into.canonicalize().map_err(|e| io_error("resolve", into, e))?;

    let walker = WalkDir::new(from)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
            if exclude.is_match(relative) {
                debug!(path = %relative.display(), "excluded from copy");
                return false;
            }
            !(entry.file_type().is_dir()
                && entry.path().canonicalize().ok().as_deref() == Some(into_canonical.as_path()))
        });

    let mut copied = 0;
    for entry in walker {
        let entry = entry.map_err(|e| walk_error(from, e))?;
        let Ok(relative) = entry.path().strip_prefix(from) else {
            continue;
        };
        let target = into.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| io_error("create", &target, e))?;
        } else if file_type.is_symlink() {
            copy_link(entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| io_error("copy", entry.path(), e))?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Delete every file or link under `roots` (relative to `base`) whose
/// `root/relative/path` matches `pattern`. Matches are printed before anything is
/// removed. Missing roots are skipped and overlapping roots delete each file once.
pub fn delete_matching(base: &Path, roots: &[String], pattern: &Regex) -> ChoreResult<Vec<String>> {
    let mut found: BTreeMap<PathBuf, String> = BTreeMap::new();

    for root in roots {
        let root_path = base.join(root);
        if !root_path.is_dir() {
            warn!(root = %root_path.display(), "skipping missing directory");
            continue;
        }

        for entry in WalkDir::new(&root_path).min_depth(1) {
            let entry = entry.map_err(|e| walk_error(&root_path, e))?;
            if entry.file_type().is_dir() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&root_path) else {
                continue;
            };
            let display = relative
                .components()
                .fold(root.trim_end_matches('/').to_string(), |mut acc, c| {
                    acc.push('/');
                    acc.push_str(&c.as_os_str().to_string_lossy());
                    acc
                });

            if pattern.is_match(&display) {
                found.entry(entry.into_path()).or_insert(display);
            }
        }
    }

    let mut matches: Vec<(String, PathBuf)> =
        found.into_iter().map(|(path, display)| (display, path)).collect();
    matches.sort();

    for (display, _) in &matches {
        println!("{}", display);
    }
    for (_, path) in &matches {
        fs::remove_file(path).map_err(|e| io_error("delete", path, e))?;
    }

    Ok(matches.into_iter().map(|(display, _)| display).collect())
}
