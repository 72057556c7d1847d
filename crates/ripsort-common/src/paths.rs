//! Path utilities for matching containers and naming destinations.
//!
//! These helpers are pure string/path manipulation; none of them touch the
//! filesystem.

use std::path::{Path, PathBuf};

/// Container extension produced by the disc ripper.
pub const DEFAULT_CONTAINER_EXTENSION: &str = "mkv";

/// Characters that are not allowed in a single path component on common
/// filesystems.
const ILLEGAL_NAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Check if a path has the given extension, ignoring ASCII case.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use ripsort_common::paths::has_extension;
///
/// assert!(has_extension(Path::new("/rips/title_t00.mkv"), "mkv"));
/// assert!(has_extension(Path::new("title_t01.MKV"), "mkv"));
/// assert!(!has_extension(Path::new("title_t00.mkv.part"), "mkv"));
/// ```
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Return the year only if it looks like a four digit year.
///
/// Empty strings, `"Unknown"` and partial dates all collapse to `None`.
pub fn normalize_year(year: Option<&str>) -> Option<&str> {
    let year = year?.trim();
    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        Some(year)
    } else {
        None
    }
}

/// Replace characters that cannot appear in a file name with `_`.
pub fn sanitize_component(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if ILLEGAL_NAME_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    // "." and ".." would escape the library directory
    match cleaned.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => cleaned,
    }
}

/// Build the destination folder name for a title.
///
/// # Examples
///
/// ```
/// use ripsort_common::paths::folder_name;
///
/// assert_eq!(folder_name("Heat", Some("1995")), "Heat (1995)");
/// assert_eq!(folder_name("Heat", None), "Heat");
/// assert_eq!(folder_name("Heat", Some("")), "Heat");
/// ```
pub fn folder_name(title: &str, year: Option<&str>) -> String {
    let title = sanitize_component(title);
    match normalize_year(year) {
        Some(year) => format!("{} ({})", title, year),
        None => title,
    }
}

/// Insert ` (n)` between the file stem and the extension.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use ripsort_common::paths::with_suffix;
///
/// assert_eq!(with_suffix(Path::new("/lib/X.mkv"), 1), PathBuf::from("/lib/X (1).mkv"));
/// assert_eq!(with_suffix(Path::new("/lib/X"), 2), PathBuf::from("/lib/X (2)"));
/// ```
pub fn with_suffix(path: &Path, n: u32) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name = match path.extension() {
        Some(ext) => format!("{} ({}).{}", stem, n, ext.to_string_lossy()),
        None => format!("{} ({})", stem, n),
    };

    path.with_file_name(name)
}
