// taillight - app/view.rs
//
// View state: the single owner of what is currently displayed.
//
// Holds the selected file, its loaded lines, the active category filter and
// search term, and the change detector. Only ever touched by the polling
// tick and by user-initiated actions, which run sequentially relative to
// it -- there is no shared mutable state across threads.

use crate::app::watcher::{ChangeDetector, PollOutcome};
use crate::core::classify::CategoryMatcher;
use crate::core::model::{CategoryFilter, RenderedLine};
use crate::core::render::render_lines;
use crate::platform::fs::read_lines_lossy;
use std::path::{Path, PathBuf};

/// State of the viewer between actions and ticks.
#[derive(Debug)]
pub struct ViewState {
    /// Compiled category triggers used for classification.
    matcher: CategoryMatcher,

    /// Currently selected file, if any.
    selected: Option<PathBuf>,

    /// Loaded lines of the selected file (empty when none or missing).
    lines: Vec<String>,

    /// Active category filter.
    filter: CategoryFilter,

    /// Active search term (trimmed; empty = no search).
    search: String,

    /// Change detector for the selected file.
    detector: ChangeDetector,

    /// Status line shown alongside the rendered content.
    status_message: String,
}

impl ViewState {
    pub fn new(matcher: CategoryMatcher) -> Self {
        Self {
            matcher,
            selected: None,
            lines: Vec::new(),
            filter: CategoryFilter::All,
            search: String::new(),
            detector: ChangeDetector::new(),
            status_message: "Ready. Select a log file to begin.".to_string(),
        }
    }

    // -------------------------------------------------------------------------
    // Actions (the external surface: select, filter, search, refresh)
    // -------------------------------------------------------------------------

    /// Select a file: load its whole content and start watching it.
    ///
    /// A file that cannot be read is reported in the status message, not as
    /// an error; the watch still starts so the file is loaded as soon as it
    /// appears.
    pub fn select_file(&mut self, path: &Path) {
        self.selected = Some(path.to_path_buf());
        self.load(path);
        self.detector.open(path);
    }

    /// Deselect the current file and stop watching.
    pub fn close_file(&mut self) {
        self.selected = None;
        self.lines.clear();
        self.detector.close();
        self.status_message = "Ready. Select a log file to begin.".to_string();
    }

    /// Set the active category filter.
    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
    }

    /// Set the search term. Whitespace-only terms deactivate the search.
    pub fn set_search(&mut self, term: &str) {
        self.search = term.trim().to_string();
    }

    /// Force a reload of the selected file, re-seeding the detector baseline.
    pub fn refresh(&mut self) {
        let Some(path) = self.selected.clone() else {
            return;
        };
        self.load(&path);
        self.detector.open(&path);
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    /// One poll tick: re-stat the selected file and reload it if its
    /// modification time increased. Returns `true` when a reload happened.
    pub fn tick(&mut self) -> bool {
        match self.detector.poll() {
            PollOutcome::Modified => {
                if let Some(path) = self.selected.clone() {
                    self.load(&path);
                }
                true
            }
            PollOutcome::Missing => {
                self.lines.clear();
                if let Some(path) = &self.selected {
                    self.status_message =
                        format!("File '{}' no longer exists.", path.display());
                }
                false
            }
            PollOutcome::Unchanged | PollOutcome::Idle => false,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Render the loaded lines through the filter and search engine.
    pub fn rendered(&self) -> Vec<RenderedLine> {
        render_lines(&self.lines, &self.matcher, self.filter, &self.search)
    }

    pub fn selected_path(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    // -------------------------------------------------------------------------
    // Internal
    // -------------------------------------------------------------------------

    fn load(&mut self, path: &Path) {
        match read_lines_lossy(path) {
            Ok(lines) => {
                self.status_message = format!(
                    "Loaded {} lines from '{}'.",
                    lines.len(),
                    path.display()
                );
                self.lines = lines;
            }
            Err(e) => {
                tracing::debug!(file = %path.display(), error = %e, "Load failed");
                self.lines.clear();
                self.status_message = if e.kind() == std::io::ErrorKind::NotFound {
                    format!("File '{}' no longer exists.", path.display())
                } else {
                    format!("Cannot read '{}': {e}", path.display())
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Category;
    use std::fs;
    use std::time::{Duration, SystemTime};

    fn view() -> ViewState {
        ViewState::new(CategoryMatcher::with_defaults())
    }

    #[test]
    fn test_select_loads_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "error: one\ninfo: two\n").unwrap();

        let mut state = view();
        state.select_file(&path);
        assert_eq!(state.line_count(), 2);
        assert!(state.status_message().contains("2 lines"));
    }

    #[test]
    fn test_select_missing_file_degrades_to_status() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.log");

        let mut state = view();
        state.select_file(&path);
        assert_eq!(state.line_count(), 0);
        assert!(state.status_message().contains("no longer exists"));
        // The viewer stays interactive and renders an empty view.
        assert!(state.rendered().is_empty());
    }

    #[test]
    fn test_tick_reloads_on_mtime_bump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grow.log");
        fs::write(&path, "first\n").unwrap();

        let mut state = view();
        state.select_file(&path);
        assert_eq!(state.line_count(), 1);

        // Unchanged file: tick is a no-op.
        assert!(!state.tick());
        assert_eq!(state.line_count(), 1);

        // Append and advance the mtime past clock granularity.
        fs::write(&path, "first\nsecond\n").unwrap();
        let f = fs::File::options().append(true).open(&path).unwrap();
        f.set_modified(SystemTime::now() + Duration::from_secs(10)).unwrap();

        assert!(state.tick(), "tick after a change must reload");
        assert_eq!(state.line_count(), 2);
        assert!(!state.tick(), "one change, one reload");
    }

    #[test]
    fn test_tick_reports_vanished_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.log");
        fs::write(&path, "here\n").unwrap();

        let mut state = view();
        state.select_file(&path);
        fs::remove_file(&path).unwrap();

        assert!(!state.tick());
        assert_eq!(state.line_count(), 0);
        assert!(state.status_message().contains("no longer exists"));
    }

    #[test]
    fn test_filter_and_search_drive_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mix.log");
        fs::write(&path, "info: fine\nerror: broken pipe\nplain text\n").unwrap();

        let mut state = view();
        state.select_file(&path);
        state.set_filter(CategoryFilter::Only(Category::Error));
        state.set_search("  pipe  ");

        let rendered = state.rendered();
        assert_eq!(rendered.len(), 3, "filter must not exclude lines");
        assert!(!rendered[0].highlighted);
        assert!(rendered[1].highlighted);
        assert_eq!(rendered[1].search_spans.len(), 1);
        assert_eq!(state.search_term(), "pipe", "term is stored trimmed");
    }

    #[test]
    fn test_close_file_resets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "x\n").unwrap();

        let mut state = view();
        state.select_file(&path);
        state.close_file();
        assert!(state.selected_path().is_none());
        assert_eq!(state.line_count(), 0);
        assert!(!state.tick());
    }

    #[test]
    fn test_refresh_forces_reload_without_mtime_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "one\n").unwrap();

        let mut state = view();
        state.select_file(&path);

        // Rewrite in place; do not rely on the mtime moving.
        fs::write(&path, "one\ntwo\nthree\n").unwrap();
        state.refresh();
        assert_eq!(state.line_count(), 3);
    }
}
