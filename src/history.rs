//! Recently served directories.
//!
//! A plain text file, one absolute path per line, most recent first:
//!
//! ```text
//! /home/me/Pictures/2024
//! /mnt/camera/DCIM
//! /home/me/Downloads
//! ```
//!
//! Serving a directory moves it to the top; it never appears twice. The file
//! is a convenience, so failing to read or write it is logged and otherwise
//! ignored.

use std::fs;
use std::path::Path;

/// Entries in the history file, most recent first. Empty if unreadable.
pub fn read_history(history_file: &Path) -> Vec<String> {
    match fs::read_to_string(history_file) {
        Ok(content) => content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect(),
        Err(err) => {
            if history_file.exists() {
                tracing::warn!(file = %history_file.display(), error = %err, "could not read history");
            }
            Vec::new()
        }
    }
}

/// Put `directory` at the top of the history file, dropping any older entry.
pub fn record_served_directory(directory: &str, history_file: &Path) {
    let mut entries = read_history(history_file);
    entries.retain(|entry| entry != directory);
    entries.insert(0, directory.to_string());

    let mut content = entries.join("\n");
    content.push('\n');

    if let Err(err) = fs::write(history_file, content) {
        tracing::warn!(file = %history_file.display(), error = %err, "could not write history");
    }
}
