// taillight - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "taillight";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "taillight";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Discovery limits
// =============================================================================

/// Maximum directory recursion depth during a scan.
/// 1 means "the watched directory only", which is the default: log files in
/// subdirectories are only pulled in when the user raises this in config.
pub const DEFAULT_MAX_DEPTH: usize = 1;

/// Hard upper bound on max depth (prevents runaway traversal).
pub const ABSOLUTE_MAX_DEPTH: usize = 50;

/// Maximum number of files returned by a single scan.
pub const DEFAULT_MAX_FILES: usize = 500;

/// Hard upper bound on max files (prevents configuration mistakes).
pub const ABSOLUTE_MAX_FILES: usize = 10_000;

/// Minimum sensible value for the max-files limit.
pub const MIN_MAX_FILES: usize = 1;

// =============================================================================
// File discovery patterns
// =============================================================================

/// Default include glob patterns: the candidate log file extensions.
pub const DEFAULT_INCLUDE_PATTERNS: &[&str] = &["*.log", "*.jsonl", "*.txt"];

/// Default exclude glob patterns.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["*.gz", "*.zip", "*.bak", "*.tmp"];

// =============================================================================
// Follow (polling) limits
// =============================================================================

/// Poll intervals the user may choose between, in seconds.
pub const FOLLOW_INTERVAL_CHOICES_SECS: &[u64] = &[1, 2, 5, 10, 30];

/// Default poll interval in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;

/// How often the cancel flag is checked within each poll sleep (ms).
/// The background thread wakes every this many ms to check for cancellation.
pub const FOLLOW_CANCEL_CHECK_INTERVAL_MS: u64 = 100;

// =============================================================================
// Classification
// =============================================================================

/// Default trigger patterns per category.
/// Each list is compiled into a single case-insensitive alternation.
pub const ERROR_TRIGGERS: &[&str] = &[
    "error",
    "exception",
    "fail(?:ed|ure)?",
    "fatal",
    "critical",
    "panic",
    "traceback",
];

pub const WARNING_TRIGGERS: &[&str] =
    &["warn(?:ing)?", "deprecated", "timeout", "retry(?:ing)?"];

pub const SECURITY_TRIGGERS: &[&str] = &[
    "security",
    "unauthori[sz]ed",
    "forbidden",
    "permission denied",
    "access denied",
    "login",
    "credential",
];

pub const INFO_TRIGGERS: &[&str] = &["info", "started", "starting", "stopped", "listening"];

pub const DEBUG_TRIGGERS: &[&str] = &["debug", "trace", "verbose"];

/// Maximum length of a single user-supplied trigger pattern (ReDoS guard).
pub const MAX_TRIGGER_PATTERN_LENGTH: usize = 512;

/// Maximum number of trigger patterns accepted per category from config.
pub const MAX_TRIGGERS_PER_CATEGORY: usize = 64;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
