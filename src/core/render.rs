// taillight - core/render.rs
//
// Search/filter engine: decides how each line is presented.
// Core layer: pure logic, no I/O or terminal dependencies.
//
// The category filter affects presentation, not exclusion: lines outside the
// filtered category stay visible, they just lose their highlight. Log lines
// only make sense in sequence, so the surrounding context must stay on
// screen when one category is singled out.

use crate::core::classify::CategoryMatcher;
use crate::core::model::{CategoryFilter, RenderedLine};
use regex::RegexBuilder;

/// Render a slice of lines against the active filter and search term.
///
/// Every input line produces exactly one `RenderedLine`, in order:
/// - `category` is the line's classification (always computed, so the
///   caller can show per-category counts even when filtering).
/// - `highlighted` is true when the filter is `All` or the line's category
///   matches an `Only` filter.
/// - `search_spans` holds the byte range of every case-insensitive
///   occurrence of the trimmed search term, independent of the filter.
///   An empty-after-trim term means no search is active.
pub fn render_lines(
    lines: &[String],
    matcher: &CategoryMatcher,
    filter: CategoryFilter,
    search: &str,
) -> Vec<RenderedLine> {
    let search_re = build_search_regex(search);

    lines
        .iter()
        .map(|line| {
            let category = matcher.classify(line);
            let search_spans = match &search_re {
                Some(re) => re.find_iter(line).map(|m| (m.start(), m.end())).collect(),
                None => Vec::new(),
            };
            RenderedLine {
                text: line.clone(),
                category,
                highlighted: filter.highlights(category),
                search_spans,
            }
        })
        .collect()
}

/// Compile the search term into a case-insensitive literal-match regex.
///
/// The term is escaped, so the search is a plain substring match; using the
/// regex engine (rather than lowercasing both sides) keeps the reported byte
/// offsets valid for non-ASCII text, where lowercasing can change lengths.
fn build_search_regex(search: &str) -> Option<regex::Regex> {
    let term = search.trim();
    if term.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
        .map_err(|e| {
            // Escaped literals always compile; log and degrade to no search
            // rather than propagating.
            tracing::warn!(term, error = %e, "Search term failed to compile");
            e
        })
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Category;

    fn lines(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_all_filter_shows_and_highlights_everything() {
        let m = CategoryMatcher::with_defaults();
        let input = lines(&["error: disk full", "just a note", "info: done"]);
        let out = render_lines(&input, &m, CategoryFilter::All, "");
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|l| l.highlighted));
        assert_eq!(out[0].category, Category::Error);
        assert_eq!(out[1].category, Category::Unclassified);
        assert_eq!(out[2].category, Category::Info);
    }

    /// Filter with ERROR on a 3-line input where only line 2 matches ERROR:
    /// only line 2 is highlighted, but all 3 lines remain visible.
    #[test]
    fn test_only_filter_highlights_without_excluding() {
        let m = CategoryMatcher::with_defaults();
        let input = lines(&[
            "info: job scheduled",
            "error: job crashed",
            "debug: retry queue empty",
        ]);
        let out = render_lines(&input, &m, CategoryFilter::Only(Category::Error), "");
        assert_eq!(out.len(), 3, "filtering must not remove lines");
        assert!(!out[0].highlighted);
        assert!(out[1].highlighted);
        assert!(!out[2].highlighted);
        assert_eq!(out[1].text, "error: job crashed");
    }

    /// Two occurrences of the search term produce two spans at the correct
    /// byte offsets.
    #[test]
    fn test_search_spans_offsets() {
        let m = CategoryMatcher::with_defaults();
        let input = lines(&["connection failed: retry failed"]);
        let out = render_lines(&input, &m, CategoryFilter::All, "failed");
        assert_eq!(out[0].search_spans, vec![(11, 17), (25, 31)]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let m = CategoryMatcher::with_defaults();
        let input = lines(&["Connection FAILED early"]);
        let out = render_lines(&input, &m, CategoryFilter::All, "failed");
        assert_eq!(out[0].search_spans, vec![(11, 17)]);
    }

    #[test]
    fn test_search_independent_of_filter() {
        let m = CategoryMatcher::with_defaults();
        let input = lines(&["info: user login ok", "error: login rejected"]);
        let out = render_lines(&input, &m, CategoryFilter::Only(Category::Error), "login");
        // Line 0 is unhighlighted under the filter, but its search hit is
        // still reported.
        assert!(!out[0].highlighted);
        assert_eq!(out[0].search_spans.len(), 1);
        assert_eq!(out[1].search_spans.len(), 1);
    }

    /// A search term that trims to the empty string means "no search".
    #[test]
    fn test_blank_search_term_is_inactive() {
        let m = CategoryMatcher::with_defaults();
        let input = lines(&["error error error"]);
        for term in ["", "   ", "\t"] {
            let out = render_lines(&input, &m, CategoryFilter::All, term);
            assert!(out[0].search_spans.is_empty(), "term {term:?}");
        }
    }

    #[test]
    fn test_search_term_is_treated_literally() {
        let m = CategoryMatcher::with_defaults();
        let input = lines(&["status a.b vs axb"]);
        let out = render_lines(&input, &m, CategoryFilter::All, "a.b");
        // The dot must not act as a regex wildcard.
        assert_eq!(out[0].search_spans, vec![(7, 10)]);
    }

    #[test]
    fn test_search_offsets_with_non_ascii_prefix() {
        let m = CategoryMatcher::with_defaults();
        // "héllo " is 7 bytes ("é" is 2 bytes in UTF-8).
        let input = lines(&["héllo failed"]);
        let out = render_lines(&input, &m, CategoryFilter::All, "failed");
        assert_eq!(out[0].search_spans, vec![(7, 13)]);
    }
}
