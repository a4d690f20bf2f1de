//! Query parsing module
//!
//! Handles the special syntax accepted in slash command text:
//! - Language hints: `:en`, `:pt-BR`
//! - Backend bangs: `!jira`, `!confluence`, `!drive`, `!slack`

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static LANG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s):([a-z]{2}(?:-[A-Z]{2})?)(?:\s|$)").unwrap());

static BANG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|\s)!(\w+)").unwrap());

/// Bang spellings and the backend each one selects
const BACKEND_BANGS: &[(&str, &str)] = &[
    ("jira", "jira"),
    ("confluence", "confluence"),
    ("conf", "confluence"),
    ("wiki", "confluence"),
    ("drive", "drive"),
    ("gdrive", "drive"),
    ("slack", "slack"),
];

/// Parsed search query with extracted special syntax
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuery {
    /// The cleaned search query (without special syntax)
    pub query: String,
    /// Language hint, if any
    pub lang: Option<String>,
    /// Backends requested with bangs, in order of appearance
    pub engines: Vec<String>,
}

impl ParsedQuery {
    /// Parse raw slash command text
    pub fn parse(raw: &str) -> Self {
        let lang = LANG_RE.captures(raw).map(|cap| cap[1].to_string());
        let query = LANG_RE.replace_all(raw, " ").to_string();

        let mut engines: Vec<String> = Vec::new();
        let query = BANG_RE.replace_all(&query, |cap: &regex::Captures| {
            match Self::backend_for_bang(&cap[1].to_lowercase()) {
                Some(engine) => {
                    if !engines.iter().any(|e| e == engine) {
                        engines.push(engine.to_string());
                    }
                    " ".to_string()
                }
                // Unknown bangs are part of the search text
                None => cap[0].to_string(),
            }
        });

        let query = query.split_whitespace().collect::<Vec<_>>().join(" ");

        Self {
            query,
            lang,
            engines,
        }
    }

    /// Backend selected by a bang word
    pub fn backend_for_bang(bang: &str) -> Option<&'static str> {
        BACKEND_BANGS
            .iter()
            .find(|(b, _)| *b == bang)
            .map(|(_, engine)| *engine)
    }

    /// Check if query is empty
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_query() {
        let parsed = ParsedQuery::parse("  deploy   pipeline ");
        assert_eq!(parsed.query, "deploy pipeline");
        assert_eq!(parsed.lang, None);
        assert!(parsed.engines.is_empty());
    }

    #[test]
    fn test_language_hint() {
        let parsed = ParsedQuery::parse(":de deploy pipeline");
        assert_eq!(parsed.query, "deploy pipeline");
        assert_eq!(parsed.lang.as_deref(), Some("de"));

        let parsed = ParsedQuery::parse("release notes :pt-BR");
        assert_eq!(parsed.query, "release notes");
        assert_eq!(parsed.lang.as_deref(), Some("pt-BR"));
    }

    #[test]
    fn test_colon_inside_word_is_not_a_hint() {
        let parsed = ParsedQuery::parse("error code:ab");
        assert_eq!(parsed.query, "error code:ab");
        assert_eq!(parsed.lang, None);
    }

    #[test]
    fn test_backend_bangs() {
        let parsed = ParsedQuery::parse("!jira !conf deploy !wiki");
        assert_eq!(parsed.query, "deploy");
        assert_eq!(parsed.engines, vec!["jira", "confluence"]);
    }

    #[test]
    fn test_unknown_bang_stays_in_text() {
        let parsed = ParsedQuery::parse("!urgent deploy !Drive");
        assert_eq!(parsed.query, "!urgent deploy");
        assert_eq!(parsed.engines, vec!["drive"]);
    }

    #[test]
    fn test_only_syntax_is_empty() {
        let parsed = ParsedQuery::parse(":en !jira");
        assert!(parsed.is_empty());
        assert_eq!(parsed.lang.as_deref(), Some("en"));
        assert_eq!(parsed.engines, vec!["jira"]);
    }
}
