//! Keyword search with weighted relevance ranking
//!
//! Queries are split on whitespace and OR-ed together. Each term adds the
//! weight of every field it appears in (title, category, any tag, and the
//! free text of content, description and discovery notes).

use crate::config::{SearchConfig, SearchWeights};
use crate::core::data::PromptRecord;
use std::cmp::Ordering;

const FAVORITE_TERMS: [&str; 2] = ["favorites", "⭐"];

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub record: PromptRecord,
    pub score: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    pub hits: Vec<SearchHit>,
    /// More hits than the refine threshold; the caller may suggest narrowing
    pub needs_refinement: bool,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn into_records(self) -> Vec<PromptRecord> {
        self.hits.into_iter().map(|hit| hit.record).collect()
    }
}

/// A query after the special terms have been pulled out
#[derive(Debug, Clone, Default, PartialEq)]
struct ParsedQuery {
    terms: Vec<String>,
    favorites_only: bool,
    privacy: Option<bool>,
}

impl ParsedQuery {
    fn parse(query: &str, favorites_only: bool) -> Self {
        let mut parsed = ParsedQuery {
            favorites_only,
            ..Default::default()
        };

        for term in query.split_whitespace().map(str::to_lowercase) {
            if FAVORITE_TERMS.contains(&term.as_str()) {
                parsed.favorites_only = true;
            } else {
                parsed.terms.push(term);
            }
        }

        if let [only] = parsed.terms.as_slice() {
            parsed.privacy = match only.as_str() {
                "private" => Some(true),
                "public" => Some(false),
                _ => None,
            };
            if parsed.privacy.is_some() {
                parsed.terms.clear();
            }
        }

        parsed
    }

    /// Whether the query restricts candidates without scoring them
    fn is_filter_only(&self) -> bool {
        self.terms.is_empty() && (self.favorites_only || self.privacy.is_some())
    }

    fn admits(&self, record: &PromptRecord) -> bool {
        (!self.favorites_only || record.favorite)
            && self.privacy.is_none_or(|private| record.private == private)
    }
}

#[derive(Debug, Clone)]
pub struct SearchEngine {
    weights: SearchWeights,
    refine_threshold: usize,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(&SearchConfig::default())
    }
}

impl SearchEngine {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            weights: config.weights,
            refine_threshold: config.refine_threshold,
        }
    }

    /// Rank `records` against `query`. Never fails; no match is an empty outcome.
    pub fn search(
        &self,
        query: &str,
        records: &[PromptRecord],
        favorites_only: bool,
    ) -> SearchOutcome {
        if query.trim().is_empty() {
            return SearchOutcome::default();
        }

        let parsed = ParsedQuery::parse(query, favorites_only);
        let candidates = records.iter().filter(|record| parsed.admits(record));

        let mut hits: Vec<SearchHit> = if parsed.is_filter_only() {
            candidates
                .map(|record| SearchHit {
                    record: record.clone(),
                    score: 0,
                })
                .collect()
        } else {
            candidates
                .filter_map(|record| {
                    let score = self.score(record, &parsed.terms);
                    (score > 0).then(|| SearchHit {
                        record: record.clone(),
                        score,
                    })
                })
                .collect()
        };

        hits.sort_by(compare_hits);

        SearchOutcome {
            needs_refinement: hits.len() > self.refine_threshold,
            hits,
        }
    }

    /// Sum of field weights over all terms
    pub fn score(&self, record: &PromptRecord, terms: &[String]) -> u32 {
        let title = record.title.to_lowercase();
        let category = record.category.to_lowercase();
        let tags: Vec<String> = record.tags.iter().map(|t| t.to_lowercase()).collect();
        let discovery = discovery_text(record);

        terms
            .iter()
            .map(|term| {
                let term = term.as_str();
                let mut score = 0;
                if title.contains(term) {
                    score += self.weights.title;
                }
                if category.contains(term) {
                    score += self.weights.category;
                }
                if tags.iter().any(|tag| tag.contains(term)) {
                    score += self.weights.tag;
                }
                if discovery.contains(term) {
                    score += self.weights.discovery;
                }
                score
            })
            .sum()
    }
}

/// Lowercased free text searched with the lowest weight
fn discovery_text(record: &PromptRecord) -> String {
    let mut text = String::with_capacity(record.content().len() + record.description.len());
    text.push_str(record.content());
    text.push('\n');
    text.push_str(&record.description);
    for (_, value) in record.discovery.fields() {
        if let Some(value) = value {
            text.push('\n');
            text.push_str(value);
        }
    }
    text.to_lowercase()
}

/// Score desc, then newest first, then id for a stable total order
fn compare_hits(a: &SearchHit, b: &SearchHit) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.record.created().cmp(&a.record.created()))
        .then_with(|| a.record.id().cmp(b.record.id()))
}
