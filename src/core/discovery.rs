// taillight - core/discovery.rs
//
// Watched-directory scan: enumerate candidate log files.
//
// Reads only file *metadata* (size, mtime), never file *contents* -- content
// loading is owned by the app layer (app::view).
//
// Failure model: the scan never raises. A missing or unreadable watched
// directory yields zero files plus a warning string; per-entry I/O errors
// are collected as warnings and skipped.

use crate::core::model::LogFileMeta;
use crate::util::constants;
use chrono::{DateTime, Utc};
use std::path::Path;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a directory scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Glob patterns (filename-only) that a file MUST match to be included.
    /// The defaults cover the candidate extensions: *.log, *.jsonl, *.txt.
    pub include_patterns: Vec<String>,

    /// Glob patterns matched against filenames; matching files are skipped.
    pub exclude_patterns: Vec<String>,

    /// Maximum directory recursion depth. 1 = the watched directory only.
    pub max_depth: usize,

    /// Maximum number of files to return. When more match, the most
    /// recently modified ones are kept and a warning is emitted.
    pub max_files: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            include_patterns: constants::DEFAULT_INCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            exclude_patterns: constants::DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            max_depth: constants::DEFAULT_MAX_DEPTH,
            max_files: constants::DEFAULT_MAX_FILES,
        }
    }
}

// =============================================================================
// Scan
// =============================================================================

/// Enumerate candidate log files under `dir`.
///
/// Returns the matching files sorted lexicographically by file name and
/// deduplicated by name (first occurrence wins -- duplicates can only arise
/// when `max_depth > 1` surfaces the same name from a subdirectory), plus a
/// list of non-fatal warnings.
///
/// Never returns an error: a directory that does not exist or cannot be read
/// produces an empty list and a warning.
pub fn list_log_files(dir: &Path, config: &ScanConfig) -> (Vec<LogFileMeta>, Vec<String>) {
    let mut files: Vec<LogFileMeta> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if !dir.is_dir() {
        let msg = format!(
            "Watched directory '{}' does not exist or is not a directory",
            dir.display()
        );
        tracing::debug!(warning = %msg, "Scan skipped");
        warnings.push(msg);
        return (files, warnings);
    }

    // Clamp config limits to absolute bounds.
    let max_files = config.max_files.min(constants::ABSOLUTE_MAX_FILES);
    let max_depth = config.max_depth.min(constants::ABSOLUTE_MAX_DEPTH).max(1);

    // Compile glob patterns once; log and skip any that fail compilation.
    let include_pats = compile_patterns(&config.include_patterns, "include");
    let exclude_pats = compile_patterns(&config.exclude_patterns, "exclude");

    let walker = walkdir::WalkDir::new(dir)
        .max_depth(max_depth)
        .follow_links(false);

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                // Inaccessible entry: non-fatal, record warning.
                let path_str = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                let msg = format!("Cannot access '{path_str}': {e}");
                tracing::debug!(warning = %msg, "Scan warning");
                warnings.push(msg);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n.to_string(),
            None => {
                warnings.push(format!("Skipping '{}': non-UTF-8 filename", path.display()));
                continue;
            }
        };

        if exclude_pats.iter().any(|p| p.matches(&file_name)) {
            tracing::trace!(file = %file_name, "Excluded by pattern");
            continue;
        }
        if !include_pats.is_empty() && !include_pats.iter().any(|p| p.matches(&file_name)) {
            tracing::trace!(file = %file_name, "Not matched by include patterns");
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                let msg = format!("Cannot read metadata for '{}': {e}", path.display());
                tracing::debug!(warning = %msg, "Scan warning");
                warnings.push(msg);
                continue;
            }
        };

        let modified: Option<DateTime<Utc>> =
            metadata.modified().ok().map(DateTime::<Utc>::from);

        files.push(LogFileMeta {
            name: file_name,
            path: path.to_path_buf(),
            size: metadata.len(),
            modified,
        });
    }

    let total_found = files.len();

    // If more files matched than the configured limit, keep only the
    // `max_files` most recently modified ones so the user always sees the
    // freshest content rather than an arbitrary subset.
    if total_found > max_files {
        files.sort_unstable_by(|a, b| match (b.modified, a.modified) {
            (Some(bm), Some(am)) => bm.cmp(&am),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        files.truncate(max_files);

        warnings.push(format!(
            "{total_found} log files were found but the limit is {max_files}. \
             Only the {max_files} most recently modified files are listed."
        ));
    }

    // Final ordering: lexicographic by file name, deduplicated by name.
    files.sort_by(|a, b| a.name.cmp(&b.name));
    files.dedup_by(|b, a| a.name == b.name);

    tracing::debug!(
        dir = %dir.display(),
        total_found,
        listed = files.len(),
        warnings = warnings.len(),
        "Scan complete"
    );

    (files, warnings)
}

/// Compile a list of glob pattern strings into `glob::Pattern` objects.
/// Patterns that fail to compile are logged as warnings and skipped.
fn compile_patterns(patterns: &[String], kind: &str) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(compiled) => Some(compiled),
            Err(e) => {
                tracing::warn!(pattern = p, kind, error = %e, "Invalid glob pattern, skipping");
                None
            }
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_temp_tree() -> TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();

        fs::write(root.join("app.log"), "info: hello\n").expect("write app.log");
        fs::write(root.join("events.jsonl"), "{\"level\":\"info\"}\n").expect("write jsonl");
        fs::write(root.join("notes.txt"), "plain notes\n").expect("write txt");

        // Non-candidate extensions.
        fs::write(root.join("data.csv"), "a,b\n").expect("write csv");
        fs::write(root.join("archive.log.gz"), "binary").expect("write gz");

        // Subdirectory content is outside depth 1.
        let sub = root.join("subdir");
        fs::create_dir(&sub).expect("mkdir subdir");
        fs::write(sub.join("nested.log"), "debug: detail\n").expect("write nested.log");

        dir
    }

    fn names(files: &[LogFileMeta]) -> Vec<String> {
        files.iter().map(|f| f.name.clone()).collect()
    }

    #[test]
    fn test_lists_candidate_extensions_sorted() {
        let dir = make_temp_tree();
        let (files, warnings) = list_log_files(dir.path(), &ScanConfig::default());
        assert_eq!(names(&files), vec!["app.log", "events.jsonl", "notes.txt"]);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn test_default_depth_excludes_subdirectories() {
        let dir = make_temp_tree();
        let (files, _) = list_log_files(dir.path(), &ScanConfig::default());
        assert!(!names(&files).contains(&"nested.log".to_string()));
    }

    #[test]
    fn test_deeper_scan_dedups_by_name() {
        let dir = make_temp_tree();
        // Same file name at the root and in the subdirectory.
        fs::write(dir.path().join("subdir").join("app.log"), "dup\n").unwrap();

        let config = ScanConfig {
            max_depth: 2,
            ..Default::default()
        };
        let (files, _) = list_log_files(dir.path(), &config);
        let app_count = files.iter().filter(|f| f.name == "app.log").count();
        assert_eq!(app_count, 1, "duplicate names must collapse to one entry");
        assert!(names(&files).contains(&"nested.log".to_string()));
    }

    /// The scan on a non-existent directory returns empty, never raises.
    #[test]
    fn test_missing_directory_returns_empty() {
        let (files, warnings) = list_log_files(
            Path::new("/nonexistent/taillight-test-path"),
            &ScanConfig::default(),
        );
        assert!(files.is_empty());
        assert_eq!(warnings.len(), 1, "a scan warning should be recorded");
    }

    #[test]
    fn test_file_root_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not_a_dir.log");
        fs::write(&file, "content").unwrap();
        let (files, warnings) = list_log_files(&file, &ScanConfig::default());
        assert!(files.is_empty());
        assert!(!warnings.is_empty());
    }

    #[test]
    fn test_metadata_collected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("meta.log"), "hello world").unwrap();
        let (files, _) = list_log_files(dir.path(), &ScanConfig::default());
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].size, 11);
        assert!(files[0].modified.is_some());
    }

    #[test]
    fn test_max_files_truncates_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..4 {
            fs::write(dir.path().join(format!("f{i}.log")), "x").unwrap();
        }
        let config = ScanConfig {
            max_files: 2,
            ..Default::default()
        };
        let (files, warnings) = list_log_files(dir.path(), &config);
        assert_eq!(files.len(), 2);
        assert!(
            warnings.iter().any(|w| w.contains('4') && w.contains('2')),
            "warning should mention total and limit, got: {warnings:?}"
        );
    }
}
