//! Builds the directory inventory report that gets embedded into the prompt.
//!
//! The report lists every directory (hidden ones are skipped entirely), every
//! file with its size, and inlines the first [`config::EXCERPT_LIMIT`]
//! characters of small text files inside a fenced block.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config;

/// Produce the inventory report for `root`. Never fails: a broken walk
/// collapses the whole report into an error string, per-file problems become
/// inline annotations.
pub fn scan(root: &Path) -> String {
    match scan_tree(root) {
        Ok(report) => report,
        Err(err) => format!("Error reading directory: {err:#}"),
    }
}

fn scan_tree(root: &Path) -> Result<String> {
    let mut sections: Vec<String> = Vec::new();
    let mut total_files = 0usize;
    let mut total_dirs = 0usize;

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            // Only directories are walked; files are listed per directory
            // below. Hidden directories are pruned along with their subtrees.
            entry.file_type().is_dir() && (entry.depth() == 0 || !is_hidden(entry.path()))
        });

    for entry in walker {
        // Only a failure at the root collapses the report; an unreadable
        // subdirectory stays listed in its parent but is not descended into.
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if err.depth() == 0 {
                    return Err(err).context("walk directory tree");
                }
                warn!("skipping unreadable directory: {err}");
                continue;
            }
        };
        let dir_path = entry.path();

        let children = match fs::read_dir(dir_path) {
            Ok(children) => children,
            Err(err) => {
                if dir_path == root {
                    return Err(err).with_context(|| format!("read {}", root.display()));
                }
                warn!("skipping unreadable directory {}: {err}", dir_path.display());
                continue;
            }
        };

        let rel = dir_path.strip_prefix(root).unwrap_or(dir_path);
        let label = if rel.as_os_str().is_empty() {
            "current directory".to_string()
        } else {
            rel.display().to_string()
        };

        let mut dirs: Vec<String> = Vec::new();
        let mut files: Vec<String> = Vec::new();
        for child in children {
            let child = match child {
                Ok(child) => child,
                Err(err) => {
                    warn!("skipping unreadable entry in {}: {err}", dir_path.display());
                    continue;
                }
            };
            let name = child.file_name().to_string_lossy().into_owned();
            match child.file_type() {
                Ok(file_type) if file_type.is_dir() => {
                    if !name.starts_with('.') {
                        dirs.push(name);
                    }
                }
                // Stat failures fall through to the per-file annotation path.
                Ok(_) | Err(_) => files.push(name),
            }
        }
        dirs.sort();
        files.sort();
        total_dirs += dirs.len();
        total_files += files.len();

        sections.push(format!("\n### {label}"));
        if !dirs.is_empty() {
            sections.push("\nDirectories:".to_string());
            for dir in &dirs {
                sections.push(format!("- {dir}/"));
            }
        }
        if !files.is_empty() {
            sections.push("\nFiles:".to_string());
            for file in &files {
                describe_file(dir_path, file, &mut sections);
            }
        }
    }

    debug!(total_files, total_dirs, "inventory walk complete");
    let mut report = format!("Found {total_files} files and {total_dirs} directories\n");
    report.push_str(&sections.join("\n"));
    Ok(report)
}

/// Append the listing line(s) for one file: size annotation, plus an inlined
/// excerpt when the file is small and text-like. Read failures turn into an
/// inline annotation and never abort the walk.
fn describe_file(dir: &Path, name: &str, sections: &mut Vec<String>) {
    if name.starts_with('.') {
        sections.push(format!("- {name} (dotfile)"));
        return;
    }

    let path = dir.join(name);
    let size = match fs::metadata(&path) {
        Ok(meta) => meta.len(),
        Err(err) => {
            sections.push(format!("- {name} (error reading file: {err})"));
            return;
        }
    };
    let size_str = format_size(size);

    if size <= config::MAX_FILE_SIZE && is_text_file(&path) {
        match fs::read_to_string(&path) {
            Ok(content) => {
                sections.push(format!("- {name} ({size_str})"));
                sections.push(format!("```\n{}\n```", excerpt(&content)));
            }
            Err(err) => {
                sections.push(format!("- {name} (error reading file: {err})"));
            }
        }
    } else {
        sections.push(format!("- {name} ({size_str})"));
    }
}

fn format_size(size: u64) -> String {
    if size > 1024 {
        format!("{:.1}KB", size as f64 / 1024.0)
    } else {
        format!("{size}B")
    }
}

/// First `EXCERPT_LIMIT` characters, `...` appended when the content is longer.
fn excerpt(content: &str) -> String {
    let mut head: String = content.chars().take(config::EXCERPT_LIMIT).collect();
    if content.chars().count() > config::EXCERPT_LIMIT {
        head.push_str("...");
    }
    head
}

/// Text classification: extension allow-list first, then the MIME guess.
fn is_text_file(path: &Path) -> bool {
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        if config::TEXT_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
            return true;
        }
    }
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.type_() == mime_guess::mime::TEXT)
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
