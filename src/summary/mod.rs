//! Topic summary over aggregated results
//!
//! A small term-frequency extractor: the words that recur across result
//! titles and snippets, minus stop words and the query's own terms.

use crate::results::SearchResult;
use serde::Serialize;
use std::collections::HashMap;

const STOP_WORDS: &[&str] = &[
    "about", "after", "again", "all", "also", "and", "any", "are", "because", "been", "before",
    "being", "between", "but", "can", "could", "did", "does", "doing", "down", "during", "each",
    "for", "from", "further", "had", "has", "have", "having", "her", "here", "hers", "him", "his",
    "how", "into", "its", "just", "more", "most", "not", "now", "off", "once", "only", "other",
    "our", "ours", "out", "over", "own", "same", "she", "should", "some", "such", "than", "that",
    "the", "their", "theirs", "them", "then", "there", "these", "they", "this", "those",
    "through", "too", "under", "until", "very", "was", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "http",
    "https", "www", "com",
];

/// Topics found in a result set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Most frequent terms, most frequent first
    pub topics: Vec<String>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

/// Term-frequency topic extractor
#[derive(Debug, Clone)]
pub struct Summarizer {
    max_topics: usize,
    min_count: usize,
    min_len: usize,
}

impl Default for Summarizer {
    fn default() -> Self {
        Self {
            max_topics: 5,
            min_count: 2,
            min_len: 3,
        }
    }
}

impl Summarizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_topics(mut self, max_topics: usize) -> Self {
        self.max_topics = max_topics;
        self
    }

    pub fn with_min_count(mut self, min_count: usize) -> Self {
        self.min_count = min_count.max(1);
        self
    }

    /// Extract the recurring topics of `results`, ignoring the terms of `query`
    pub fn summarize<'a, I>(&self, query: &str, results: I) -> Summary
    where
        I: IntoIterator<Item = &'a SearchResult>,
    {
        let query_terms: Vec<String> = tokenize(query).collect();

        // term -> (count, first position)
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        let mut position = 0usize;

        for result in results {
            let snippet = result.snippet.as_deref().unwrap_or_default();
            for text in [result.title.as_str(), snippet] {
                for term in tokenize(text) {
                    position += 1;
                    if !self.is_candidate(&term, &query_terms) {
                        continue;
                    }
                    counts.entry(term).or_insert((0, position)).0 += 1;
                }
            }
        }

        let mut ranked: Vec<(String, usize, usize)> = counts
            .into_iter()
            .filter(|(_, (count, _))| *count >= self.min_count)
            .map(|(term, (count, first))| (term, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        Summary {
            topics: ranked
                .into_iter()
                .take(self.max_topics)
                .map(|(term, _, _)| term)
                .collect(),
        }
    }

    fn is_candidate(&self, term: &str, query_terms: &[String]) -> bool {
        term.chars().count() >= self.min_len
            && !term.chars().all(|c| c.is_numeric())
            && !STOP_WORDS.contains(&term)
            && !query_terms.iter().any(|q| q == term)
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}
