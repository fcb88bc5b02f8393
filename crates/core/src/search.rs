//! Keyword normalization and page selection shared by every catalog search path.
//!
//! Matching is a literal substring test under Unicode lowercase folding. The SQL
//! store keeps `fold_case` copies of the searchable columns and runs `instr` on
//! them, so both store implementations agree on which products a keyword selects.

use serde::Serialize;

pub const DEFAULT_PAGE: i64 = 0;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Lowercases text the same way for keywords and stored product fields.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// A trimmed, non-blank search keyword.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Keyword(String);

impl Keyword {
    /// Returns `None` for a missing, empty, or all-whitespace keyword.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn folded(&self) -> String {
        fold_case(&self.0)
    }

    pub fn is_contained_in(&self, haystack: &str) -> bool {
        fold_case(haystack).contains(&self.folded())
    }
}

/// Zero-based page selection over a stably ordered match set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    number: i64,
    size: i64,
}

impl PageRequest {
    /// Returns `None` when the page number is negative or the size is below one.
    pub fn new(number: i64, size: i64) -> Option<Self> {
        (number >= 0 && size >= 1).then_some(Self { number, size })
    }

    pub fn number(&self) -> i64 {
        self.number
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        self.number.saturating_mul(self.size)
    }

    /// Whether the request deviates from the default `page=0, size=10` pair.
    pub fn is_explicit(number: i64, size: i64) -> bool {
        number > DEFAULT_PAGE || size != DEFAULT_PAGE_SIZE
    }

    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let len = usize::try_from(self.size).unwrap_or(usize::MAX);
        items.iter().skip(start).take(len).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Keyword, PageRequest};

    #[test]
    fn blank_keywords_are_rejected() {
        assert_eq!(Keyword::parse(None), None);
        assert_eq!(Keyword::parse(Some("")), None);
        assert_eq!(Keyword::parse(Some(" \t\n ")), None);
    }

    #[test]
    fn keyword_is_trimmed() {
        let keyword = Keyword::parse(Some("  MacBook ")).expect("keyword");
        assert_eq!(keyword.as_str(), "MacBook");
    }

    #[test]
    fn containment_ignores_case() {
        let keyword = Keyword::parse(Some("macBOOK")).expect("keyword");

        assert!(keyword.is_contained_in("MacBook Pro 16-inch"));
        assert!(!keyword.is_contained_in("Dell XPS 15"));
    }

    #[test]
    fn containment_folds_accented_letters() {
        let ecran = Keyword::parse(Some("écran")).expect("keyword");
        let cafe = Keyword::parse(Some("CAFÉ")).expect("keyword");

        assert_eq!(cafe.folded(), "café");
        assert!(ecran.is_contained_in("Écran Über"));
        assert!(cafe.is_contained_in("Café display"));
        assert!(!cafe.is_contained_in("Cafe display"));
    }

    #[test]
    fn wildcard_characters_match_literally() {
        let keyword = Keyword::parse(Some("%")).expect("keyword");

        assert!(!keyword.is_contained_in("iPad Air"));
        assert!(keyword.is_contained_in("100% recycled"));
    }

    #[test]
    fn page_request_rejects_out_of_range_values() {
        assert!(PageRequest::new(-1, 10).is_none());
        assert!(PageRequest::new(0, 0).is_none());
        assert!(PageRequest::new(0, -5).is_none());
        assert!(PageRequest::new(3, 1).is_some());
    }

    #[test]
    fn offset_saturates_instead_of_overflowing() {
        let page = PageRequest::new(i64::MAX, 2).expect("page");
        assert_eq!(page.offset(), i64::MAX);
    }

    #[test]
    fn explicit_pagination_detection_follows_defaults() {
        assert!(!PageRequest::is_explicit(0, 10));
        assert!(PageRequest::is_explicit(1, 10));
        assert!(PageRequest::is_explicit(0, 5));
        assert!(!PageRequest::is_explicit(-1, 10));
    }

    #[test]
    fn slice_selects_consecutive_windows() {
        let items = vec![1, 2, 3, 4, 5];

        assert_eq!(PageRequest::new(0, 2).expect("page").slice(&items), vec![1, 2]);
        assert_eq!(PageRequest::new(1, 2).expect("page").slice(&items), vec![3, 4]);
        assert_eq!(PageRequest::new(2, 2).expect("page").slice(&items), vec![5]);
        assert!(PageRequest::new(9, 2).expect("page").slice(&items).is_empty());
    }
}
