//! Case-insensitive query matcher.
//!
//! # Invariants
//! - A blank query matches every candidate.
//! - Non-blank queries are matched as given, surrounding whitespace included.
//! - Substring mode never fails; pattern mode fails only on invalid syntax.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// How a query string is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Plain text containment, ignoring case.
    #[default]
    Substring,
    /// Case-insensitive regular expression.
    Pattern,
}

/// Query text that cannot be compiled in pattern mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidQueryError {
    pub query: String,
    pub message: String,
}

impl Display for InvalidQueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid search query `{}`: {}", self.query, self.message)
    }
}

impl Error for InvalidQueryError {}

#[derive(Debug, Clone)]
pub enum TextMatcher {
    All,
    Substring(String),
    Pattern(Regex),
}

impl TextMatcher {
    /// Builds a matcher; `None` and blank queries match everything.
    pub fn new(query: Option<&str>, mode: SearchMode) -> Result<Self, InvalidQueryError> {
        let Some(query) = query.filter(|query| !query.trim().is_empty()) else {
            return Ok(Self::All);
        };

        match mode {
            SearchMode::Substring => Ok(Self::Substring(query.to_lowercase())),
            SearchMode::Pattern => RegexBuilder::new(query)
                .case_insensitive(true)
                .size_limit(PATTERN_SIZE_LIMIT)
                .build()
                .map(Self::Pattern)
                .map_err(|err| InvalidQueryError {
                    query: query.to_string(),
                    message: err.to_string(),
                }),
        }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::All => true,
            Self::Substring(needle) => candidate.to_lowercase().contains(needle.as_str()),
            Self::Pattern(regex) => regex.is_match(candidate),
        }
    }

    /// Returns whether any of `candidates` matches.
    pub fn matches_any(&self, candidates: &[&str]) -> bool {
        matches!(self, Self::All) || candidates.iter().any(|value| self.matches(value))
    }
}

#[cfg(test)]
mod tests {
    use super::{SearchMode, TextMatcher};

    #[test]
    fn blank_query_matches_everything() {
        let matcher = TextMatcher::new(Some("   "), SearchMode::Pattern).unwrap();
        assert!(matcher.matches(""));
        assert!(matches!(
            TextMatcher::new(None, SearchMode::Substring).unwrap(),
            TextMatcher::All
        ));
    }

    #[test]
    fn substring_mode_ignores_case_and_treats_metacharacters_literally() {
        let matcher = TextMatcher::new(Some("HERO"), SearchMode::Substring).unwrap();
        assert!(matcher.matches("Landing hero"));

        let literal = TextMatcher::new(Some("a.c"), SearchMode::Substring).unwrap();
        assert!(literal.matches("xa.cx"));
        assert!(!literal.matches("abc"));
    }

    #[test]
    fn pattern_mode_uses_case_insensitive_regex() {
        let matcher = TextMatcher::new(Some("^auth"), SearchMode::Pattern).unwrap();
        assert!(matcher.matches("Auth API"));
        assert!(!matcher.matches("OAuth"));
    }

    #[test]
    fn pattern_mode_rejects_invalid_syntax() {
        let err = TextMatcher::new(Some("(unclosed"), SearchMode::Pattern).unwrap_err();
        assert_eq!(err.query, "(unclosed");
        assert!(!err.message.is_empty());
    }

    #[test]
    fn matches_any_checks_every_candidate() {
        let matcher = TextMatcher::new(Some("details"), SearchMode::Substring).unwrap();
        assert!(matcher.matches_any(&["Style guide", "Style guide details"]));
        assert!(!matcher.matches_any(&["Style guide", "Colors"]));
    }

    #[test]
    fn surrounding_whitespace_is_part_of_the_query() {
        let matcher = TextMatcher::new(Some("hero "), SearchMode::Substring).unwrap();
        assert!(!matcher.matches("superhero"));
        assert!(matcher.matches("Hero of the day"));

        let pattern = TextMatcher::new(Some(" api"), SearchMode::Pattern).unwrap();
        assert!(pattern.matches("Auth API"));
        assert!(!pattern.matches("API gateway"));
    }
}
