// taillight - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no terminal,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// =============================================================================
// Category
// =============================================================================

/// Severity classification bucket assigned to a log line, ordered from most
/// to least severe.
///
/// Classification applies the categories in this fixed priority order and a
/// line matches at most one: the first category whose trigger patterns hit
/// wins, so a line containing both "error" and "info" is `Error`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Error,
    Warning,
    Security,
    Info,
    Debug,
    #[default]
    Unclassified,
}

impl Category {
    /// All variants in classification priority order (most severe first).
    pub fn all() -> &'static [Category] {
        &[
            Category::Error,
            Category::Warning,
            Category::Security,
            Category::Info,
            Category::Debug,
            Category::Unclassified,
        ]
    }

    /// The categories that carry trigger patterns (everything but
    /// `Unclassified`, which is the fall-through).
    pub fn classifiable() -> &'static [Category] {
        &[
            Category::Error,
            Category::Warning,
            Category::Security,
            Category::Info,
            Category::Debug,
        ]
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Error => "Error",
            Category::Warning => "Warning",
            Category::Security => "Security",
            Category::Info => "Info",
            Category::Debug => "Debug",
            Category::Unclassified => "Unclassified",
        }
    }

    /// Short label for compact display (e.g. line prefixes).
    pub fn short_label(&self) -> &'static str {
        match self {
            Category::Error => "ERR",
            Category::Warning => "WARN",
            Category::Security => "SEC",
            Category::Info => "INFO",
            Category::Debug => "DBG",
            Category::Unclassified => "----",
        }
    }

    /// Parse a user-supplied category name (CLI filter argument).
    pub fn parse(name: &str) -> Option<Category> {
        match name.to_lowercase().as_str() {
            "error" => Some(Category::Error),
            "warning" | "warn" => Some(Category::Warning),
            "security" => Some(Category::Security),
            "info" => Some(Category::Info),
            "debug" => Some(Category::Debug),
            "unclassified" => Some(Category::Unclassified),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Category filter
// =============================================================================

/// Active category filter.
///
/// Filtering affects presentation, not exclusion: with `Only(c)`, lines of
/// other categories remain visible but are rendered unhighlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every line is highlighted with its own category.
    #[default]
    All,
    /// Only lines of this category are highlighted.
    Only(Category),
}

impl CategoryFilter {
    /// Whether a line of `category` should be highlighted under this filter.
    pub fn highlights(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }
}

// =============================================================================
// Log file metadata (output of the directory scan)
// =============================================================================

/// Metadata about a candidate log file found in the watched directory.
///
/// The file is a read-only input: taillight never writes to it, only
/// re-stats it on refresh ticks.
#[derive(Debug, Clone)]
pub struct LogFileMeta {
    /// File name within the watched directory (used for display and dedup).
    pub name: String,

    /// Full path to the file.
    pub path: PathBuf,

    /// File size in bytes.
    pub size: u64,

    /// Last modification timestamp (`None` if the metadata was unreadable).
    pub modified: Option<DateTime<Utc>>,
}

// =============================================================================
// Rendered line (output of the search/filter engine)
// =============================================================================

/// One line prepared for display: its text, classification, and highlights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// The line text, unmodified.
    pub text: String,

    /// Classified severity category of this line.
    pub category: Category,

    /// Whether the active category filter highlights this line.
    /// Unhighlighted lines stay visible but are rendered plain.
    pub highlighted: bool,

    /// Byte ranges (`start..end`) of every case-insensitive occurrence of the
    /// active search term within `text`. Empty when no search is active.
    pub search_spans: Vec<(usize, usize)>,
}

// =============================================================================
// Follow progress (messages from the background poll thread)
// =============================================================================

/// Progress messages sent from the follow thread to its consumer.
#[derive(Debug, Clone)]
pub enum FollowProgress {
    /// The follow thread has started polling.
    Started { path: PathBuf },

    /// The file's modification time increased; full content was reloaded.
    Reloaded {
        lines: Vec<String>,
        modified: Option<DateTime<Utc>>,
    },

    /// The file could not be stat'd this tick (deleted or rotated away).
    /// Non-fatal: polling continues and a reappearing file reloads normally.
    Missing { path: PathBuf },

    /// The follow thread has exited (cancelled or consumer dropped).
    Stopped,
}
