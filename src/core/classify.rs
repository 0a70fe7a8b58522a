// taillight - core/classify.rs
//
// Line classification: maps each log line to exactly one severity category
// via case-insensitive regex triggers applied in fixed priority order.
// Core layer: pure logic, no I/O or terminal dependencies.

use crate::core::model::Category;
use crate::util::constants;
use crate::util::error::PatternError;
use regex::{Regex, RegexBuilder};

/// Compiled trigger patterns for all classifiable categories.
///
/// Built once (from the built-in defaults or from config-supplied trigger
/// lists) and then treated as immutable, so `classify` is a pure function:
/// same line in, same category out, no hidden state.
#[derive(Debug, Clone)]
pub struct CategoryMatcher {
    /// One compiled alternation per category, in classification priority
    /// order (`Category::classifiable()`).
    rules: Vec<(Category, Regex)>,
}

impl CategoryMatcher {
    /// Build a matcher from the built-in trigger patterns.
    ///
    /// The built-in patterns are static and exercised by the unit tests
    /// below, so a compile failure here is a programmer error, not a
    /// runtime condition.
    pub fn with_defaults() -> Self {
        Self::from_triggers(&default_triggers())
            .expect("built-in trigger patterns must compile")
    }

    /// Build a matcher from explicit trigger lists, e.g. from config.toml.
    ///
    /// Each pattern is validated (length cap, count cap, regex compilation)
    /// before the category's alternation is assembled. Categories absent
    /// from `triggers` contribute no rule and therefore never match.
    pub fn from_triggers(
        triggers: &[(Category, Vec<String>)],
    ) -> Result<Self, PatternError> {
        let mut rules = Vec::with_capacity(triggers.len());

        // Assemble in priority order regardless of the order given.
        for &category in Category::classifiable() {
            let Some((_, patterns)) = triggers.iter().find(|(c, _)| *c == category) else {
                continue;
            };
            if patterns.is_empty() {
                continue;
            }
            if patterns.len() > constants::MAX_TRIGGERS_PER_CATEGORY {
                return Err(PatternError::TooManyTriggers {
                    category: category.label(),
                    count: patterns.len(),
                    max: constants::MAX_TRIGGERS_PER_CATEGORY,
                });
            }
            for pattern in patterns {
                if pattern.len() > constants::MAX_TRIGGER_PATTERN_LENGTH {
                    return Err(PatternError::TriggerTooLong {
                        category: category.label(),
                        length: pattern.len(),
                        max_length: constants::MAX_TRIGGER_PATTERN_LENGTH,
                    });
                }
                // Compile each pattern individually so an invalid one is
                // reported by name rather than as a failure of the combined
                // alternation.
                if let Err(e) = Regex::new(pattern) {
                    return Err(PatternError::InvalidTrigger {
                        category: category.label(),
                        pattern: pattern.clone(),
                        source: e,
                    });
                }
            }

            let alternation = patterns
                .iter()
                .map(|p| format!("(?:{p})"))
                .collect::<Vec<_>>()
                .join("|");
            let compiled = RegexBuilder::new(&alternation)
                .case_insensitive(true)
                .build()
                .map_err(|e| PatternError::InvalidTrigger {
                    category: category.label(),
                    pattern: alternation.clone(),
                    source: e,
                })?;
            rules.push((category, compiled));
        }

        tracing::debug!(categories = rules.len(), "Category matcher compiled");
        Ok(Self { rules })
    }

    /// Classify a single line.
    ///
    /// Returns the first category (in priority order) whose trigger
    /// alternation matches anywhere in the line, or `Unclassified` when
    /// none do. Total: every input yields exactly one category.
    pub fn classify(&self, line: &str) -> Category {
        for (category, regex) in &self.rules {
            if regex.is_match(line) {
                return *category;
            }
        }
        Category::Unclassified
    }
}

impl Default for CategoryMatcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// The built-in trigger lists, keyed by category in priority order.
pub fn default_triggers() -> Vec<(Category, Vec<String>)> {
    fn owned(patterns: &[&str]) -> Vec<String> {
        patterns.iter().map(|s| (*s).to_string()).collect()
    }
    vec![
        (Category::Error, owned(constants::ERROR_TRIGGERS)),
        (Category::Warning, owned(constants::WARNING_TRIGGERS)),
        (Category::Security, owned(constants::SECURITY_TRIGGERS)),
        (Category::Info, owned(constants::INFO_TRIGGERS)),
        (Category::Debug, owned(constants::DEBUG_TRIGGERS)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_triggers_compile() {
        // with_defaults panics on a bad built-in pattern; constructing the
        // matcher is the assertion.
        let matcher = CategoryMatcher::with_defaults();
        assert_eq!(matcher.rules.len(), 5);
    }

    #[test]
    fn test_classify_basic_categories() {
        let m = CategoryMatcher::with_defaults();
        assert_eq!(m.classify("disk read error on /dev/sda"), Category::Error);
        assert_eq!(m.classify("warning: queue is 90% full"), Category::Warning);
        assert_eq!(
            m.classify("permission denied for user alice"),
            Category::Security
        );
        assert_eq!(m.classify("server started on port 8080"), Category::Info);
        assert_eq!(m.classify("debug: cache hit ratio 0.93"), Category::Debug);
        assert_eq!(m.classify("lorem ipsum dolor"), Category::Unclassified);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        let m = CategoryMatcher::with_defaults();
        assert_eq!(m.classify("FATAL: out of memory"), Category::Error);
        assert_eq!(m.classify("Warning from scheduler"), Category::Warning);
        assert_eq!(m.classify("DEBUG trace enabled"), Category::Debug);
    }

    /// Priority invariant: a line containing both an ERROR trigger and an
    /// INFO trigger classifies as ERROR.
    #[test]
    fn test_priority_error_beats_info() {
        let m = CategoryMatcher::with_defaults();
        assert_eq!(
            m.classify("info: backup job failed with error 5"),
            Category::Error
        );
    }

    #[test]
    fn test_priority_warning_beats_debug() {
        let m = CategoryMatcher::with_defaults();
        assert_eq!(
            m.classify("debug output suppressed due to timeout"),
            Category::Warning
        );
    }

    /// Deterministic and total: repeated calls on arbitrary inputs always
    /// yield the same single category.
    #[test]
    fn test_classify_deterministic_and_total() {
        let m = CategoryMatcher::with_defaults();
        let inputs = ["", "x", "error info", "\u{fffd}\u{fffd}", "  \t  ", "ошибка"];
        for line in inputs {
            let first = m.classify(line);
            for _ in 0..3 {
                assert_eq!(m.classify(line), first, "non-deterministic for {line:?}");
            }
            assert!(Category::all().contains(&first));
        }
    }

    #[test]
    fn test_custom_triggers_override_defaults() {
        let triggers = vec![
            (Category::Error, vec!["kaboom".to_string()]),
            (Category::Info, vec!["hello".to_string()]),
        ];
        let m = CategoryMatcher::from_triggers(&triggers).unwrap();
        assert_eq!(m.classify("service went kaboom"), Category::Error);
        assert_eq!(m.classify("hello world"), Category::Info);
        // Default triggers are not in play.
        assert_eq!(m.classify("error: nope"), Category::Unclassified);
    }

    #[test]
    fn test_invalid_trigger_pattern_is_rejected() {
        let triggers = vec![(Category::Error, vec!["[unclosed".to_string()])];
        let err = CategoryMatcher::from_triggers(&triggers).unwrap_err();
        assert!(matches!(err, PatternError::InvalidTrigger { .. }));
    }

    #[test]
    fn test_overlong_trigger_pattern_is_rejected() {
        let long = "a".repeat(constants::MAX_TRIGGER_PATTERN_LENGTH + 1);
        let triggers = vec![(Category::Debug, vec![long])];
        let err = CategoryMatcher::from_triggers(&triggers).unwrap_err();
        assert!(matches!(err, PatternError::TriggerTooLong { .. }));
    }
}
