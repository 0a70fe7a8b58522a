// taillight - platform/config.rs
//
// Platform config-directory resolution and config.toml loading with startup
// validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance. Every value is validated against named
// constants at load time; invalid values produce actionable warnings and
// fall back to defaults -- misconfiguration never prevents startup.

use crate::core::model::Category;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for taillight configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/taillight/ or %APPDATA%\taillight\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be
    /// determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[discovery]` section.
    pub discovery: DiscoverySection,
    /// `[watch]` section.
    pub watch: WatchSection,
    /// `[categories]` section.
    pub categories: CategoriesSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[discovery]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    /// Include glob patterns (candidate log file names).
    pub include_patterns: Option<Vec<String>>,
    /// Exclude glob patterns.
    pub exclude_patterns: Option<Vec<String>>,
    /// Maximum directory recursion depth (1 = watched directory only).
    pub max_depth: Option<usize>,
    /// Maximum files listed per scan.
    pub max_files: Option<usize>,
}

/// `[watch]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct WatchSection {
    /// Poll interval in seconds; must be one of 1, 2, 5, 10, 30.
    pub poll_interval_secs: Option<u64>,
}

/// `[categories]` config section: per-category trigger pattern overrides.
///
/// A category left unset keeps its built-in triggers; setting it replaces
/// them wholesale.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct CategoriesSection {
    pub error: Option<Vec<String>>,
    pub warning: Option<Vec<String>>,
    pub security: Option<Vec<String>>,
    pub info: Option<Vec<String>>,
    pub debug: Option<Vec<String>>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Discovery --
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub max_depth: usize,
    pub max_files: usize,

    // -- Watch --
    pub poll_interval_secs: u64,

    // -- Categories --
    /// Trigger lists with config overrides applied over the built-ins.
    pub triggers: Vec<(Category, Vec<String>)>,

    // -- Logging --
    /// Logging level string (consumed before tracing is initialised).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
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
            poll_interval_secs: constants::DEFAULT_POLL_INTERVAL_SECS,
            triggers: crate::core::classify::default_triggers(),
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal
/// warnings. A missing file yields defaults with no warnings (first-run);
/// an unparseable file yields defaults plus a warning -- the application
/// still starts but the user is informed.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let raw = match read_raw(&config_path) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!(
                "{e}. Using defaults. See config.example.toml for the expected format."
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");
    (validate(raw, &mut warnings), warnings)
}

/// Read and parse config.toml, preserving the causal error chain.
fn read_raw(config_path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
        path: config_path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: config_path.to_path_buf(),
        source: e,
    })
}

/// Validate each raw field against named constants, accumulating warnings
/// and falling back to defaults for out-of-range values.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Discovery --
    if let Some(patterns) = raw.discovery.include_patterns {
        if patterns.is_empty() {
            warnings.push(
                "[discovery] include_patterns is empty; keeping the defaults.".to_string(),
            );
        } else {
            config.include_patterns = patterns;
        }
    }
    if let Some(patterns) = raw.discovery.exclude_patterns {
        config.exclude_patterns = patterns;
    }
    if let Some(depth) = raw.discovery.max_depth {
        if (1..=constants::ABSOLUTE_MAX_DEPTH).contains(&depth) {
            config.max_depth = depth;
        } else {
            let e = ConfigError::ValueOutOfRange {
                field: "[discovery] max_depth".to_string(),
                value: depth.to_string(),
                expected: format!("1-{}", constants::ABSOLUTE_MAX_DEPTH),
            };
            warnings.push(format!("{e}. Using default ({}).", constants::DEFAULT_MAX_DEPTH));
        }
    }
    if let Some(files) = raw.discovery.max_files {
        if (constants::MIN_MAX_FILES..=constants::ABSOLUTE_MAX_FILES).contains(&files) {
            config.max_files = files;
        } else {
            let e = ConfigError::ValueOutOfRange {
                field: "[discovery] max_files".to_string(),
                value: files.to_string(),
                expected: format!(
                    "{}-{}",
                    constants::MIN_MAX_FILES,
                    constants::ABSOLUTE_MAX_FILES
                ),
            };
            warnings.push(format!("{e}. Using default ({}).", constants::DEFAULT_MAX_FILES));
        }
    }

    // -- Watch: poll interval must be one of the supported choices --
    if let Some(secs) = raw.watch.poll_interval_secs {
        if constants::FOLLOW_INTERVAL_CHOICES_SECS.contains(&secs) {
            config.poll_interval_secs = secs;
        } else {
            let e = ConfigError::ValueOutOfRange {
                field: "[watch] poll_interval_secs".to_string(),
                value: secs.to_string(),
                expected: format!("one of {:?}", constants::FOLLOW_INTERVAL_CHOICES_SECS),
            };
            warnings.push(format!(
                "{e}. Using default ({}).",
                constants::DEFAULT_POLL_INTERVAL_SECS
            ));
        }
    }

    // -- Categories: overrides replace the built-in list per category --
    let overrides = [
        (Category::Error, raw.categories.error),
        (Category::Warning, raw.categories.warning),
        (Category::Security, raw.categories.security),
        (Category::Info, raw.categories.info),
        (Category::Debug, raw.categories.debug),
    ];
    for (category, patterns) in overrides {
        if let Some(patterns) = patterns {
            if patterns.is_empty() {
                warnings.push(format!(
                    "[categories] {} is empty; lines will never match this category.",
                    category.label().to_lowercase()
                ));
            }
            if let Some(slot) = config.triggers.iter_mut().find(|(c, _)| *c == category) {
                slot.1 = patterns;
            }
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn load_from_str(toml_text: &str) -> (AppConfig, Vec<String>) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(constants::CONFIG_FILE_NAME), toml_text).unwrap();
        load_config(dir.path())
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty());
        assert_eq!(config.poll_interval_secs, constants::DEFAULT_POLL_INTERVAL_SECS);
        assert_eq!(config.max_depth, constants::DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_valid_config_is_applied() {
        let (config, warnings) = load_from_str(
            r#"
            [discovery]
            max_depth = 3
            include_patterns = ["*.log"]

            [watch]
            poll_interval_secs = 10

            [logging]
            level = "debug"
            "#,
        );
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.include_patterns, vec!["*.log"]);
        assert_eq!(config.poll_interval_secs, 10);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_unsupported_interval_falls_back_with_warning() {
        let (config, warnings) = load_from_str("[watch]\npoll_interval_secs = 7\n");
        assert_eq!(config.poll_interval_secs, constants::DEFAULT_POLL_INTERVAL_SECS);
        assert!(warnings.iter().any(|w| w.contains("poll_interval_secs")));
    }

    #[test]
    fn test_category_override_replaces_builtin() {
        let (config, warnings) =
            load_from_str("[categories]\nerror = [\"kaboom\", \"meltdown\"]\n");
        assert!(warnings.is_empty());
        let (_, error_triggers) = config
            .triggers
            .iter()
            .find(|(c, _)| *c == Category::Error)
            .unwrap();
        assert_eq!(error_triggers, &vec!["kaboom".to_string(), "meltdown".to_string()]);
        // Other categories keep their built-ins.
        let (_, info_triggers) = config
            .triggers
            .iter()
            .find(|(c, _)| *c == Category::Info)
            .unwrap();
        assert!(!info_triggers.is_empty());
    }

    #[test]
    fn test_malformed_toml_degrades_to_defaults() {
        let (config, warnings) = load_from_str("this is not toml [");
        assert_eq!(config.max_files, constants::DEFAULT_MAX_FILES);
        assert_eq!(warnings.len(), 1);
    }
}
