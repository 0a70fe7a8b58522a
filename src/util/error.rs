// taillight - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every error keeps its causal chain
// for diagnostic logging.
//
// Deliberately small: most failure modes in this tool are non-fatal by
// design (missing file, unreadable directory, malformed bytes) and degrade
// to warnings or status messages instead of surfacing as errors. Typed
// variants exist only where a caller can act on them.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all taillight operations.
#[derive(Debug)]
pub enum TaillightError {
    /// Category trigger pattern compilation failed.
    Pattern(PatternError),

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl fmt::Display for TaillightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(e) => write!(f, "Pattern error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for TaillightError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Pattern(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Pattern errors
// ---------------------------------------------------------------------------

/// Errors building the category matcher from trigger patterns.
#[derive(Debug)]
pub enum PatternError {
    /// A trigger pattern failed regex compilation.
    InvalidTrigger {
        category: &'static str,
        pattern: String,
        source: regex::Error,
    },

    /// A trigger pattern exceeds the maximum allowed length.
    TriggerTooLong {
        category: &'static str,
        length: usize,
        max_length: usize,
    },

    /// Too many trigger patterns supplied for one category.
    TooManyTriggers {
        category: &'static str,
        count: usize,
        max: usize,
    },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTrigger {
                category,
                pattern,
                source,
            } => write!(
                f,
                "Category '{category}': invalid trigger pattern '{pattern}': {source}"
            ),
            Self::TriggerTooLong {
                category,
                length,
                max_length,
            } => write!(
                f,
                "Category '{category}': trigger pattern is {length} chars, \
                 exceeds maximum of {max_length}"
            ),
            Self::TooManyTriggers {
                category,
                count,
                max,
            } => write!(
                f,
                "Category '{category}': {count} trigger patterns supplied, maximum is {max}"
            ),
        }
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidTrigger { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<PatternError> for TaillightError {
    fn from(e: PatternError) -> Self {
        Self::Pattern(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading the config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for TaillightError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for taillight results.
pub type Result<T> = std::result::Result<T, TaillightError>;
