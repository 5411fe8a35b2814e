//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Startup
//!
//! ```text
//! Serving /home/me/Pictures at http://127.0.0.1:8000/
//!     142 media files
//! ```
//!
//! ## History (`--history`)
//!
//! ```text
//! Recently served
//! 001 /home/me/Pictures
//! 002 /mnt/camera/DCIM
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure —
//! no I/O, no side effects.

use std::path::Path;

/// Format the startup banner.
pub fn format_serve_banner(root: &Path, url: &str, media_count: usize) -> Vec<String> {
    let noun = if media_count == 1 { "file" } else { "files" };
    vec![
        format!("Serving {} at {}", root.display(), url),
        format!("    {media_count} media {noun}"),
    ]
}

pub fn print_serve_banner(root: &Path, url: &str, media_count: usize) {
    for line in format_serve_banner(root, url, media_count) {
        println!("{}", line);
    }
}

/// Format the served-directory history, most recent first.
pub fn format_history(entries: &[String]) -> Vec<String> {
    if entries.is_empty() {
        return vec!["No directories served yet".to_string()];
    }
    let mut lines = vec!["Recently served".to_string()];
    lines.extend(
        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("{:03} {}", i + 1, entry)),
    );
    lines
}

pub fn print_history(entries: &[String]) {
    for line in format_history(entries) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_names_root_and_url() {
        let lines = format_serve_banner(Path::new("/photos"), "http://127.0.0.1:8000/", 3);
        assert_eq!(
            lines,
            vec![
                "Serving /photos at http://127.0.0.1:8000/",
                "    3 media files",
            ]
        );
    }

    #[test]
    fn banner_singular() {
        let lines = format_serve_banner(Path::new("/p"), "http://h:1/", 1);
        assert_eq!(lines[1], "    1 media file");
    }

    #[test]
    fn history_numbered_in_order() {
        let entries = vec!["/b".to_string(), "/a".to_string()];
        assert_eq!(
            format_history(&entries),
            vec!["Recently served", "001 /b", "002 /a"]
        );
    }

    #[test]
    fn history_empty() {
        assert_eq!(format_history(&[]), vec!["No directories served yet"]);
    }
}
