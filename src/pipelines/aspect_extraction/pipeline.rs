// Copyright 2021 Guillaume Becquin
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Aspect extraction pipeline
//! Maps a cleaned input string to a finite, deduplicated list of aspect phrases worth
//! scoring. Extraction is a pure computation over the spans reported by the external
//! [`Tagger`]: for a fixed tagging model and a fixed configuration the candidate set
//! is fully deterministic.
//!
//! Two extraction strategies are supported, selected through
//! [`ExtractionStrategy`]:
//! - `Basic` collects noun chunks (excluding pronoun-headed ones) together with
//!   standalone noun tokens longer than the configured minimum, deduplicated by exact
//!   string match.
//! - `Filtered` (default) additionally strips leading determiners, rejects
//!   blacklisted generic or sentiment-bearing words, includes named entities and
//!   collapses candidates that are substrings of a longer kept candidate.

use crate::common::error::AbsaError;
use crate::pipelines::aspect_extraction::wordlists::{ASPECT_BLACKLIST, LEADING_STOPWORDS};
use crate::pipelines::tagging::{Pos, Span, SpanKind, Tagger};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Aspect candidate collection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStrategy {
    /// Noun chunks and standalone noun tokens, exact-match deduplication only
    Basic,
    /// Stopword-stripped, blacklist-filtered candidates with substring collapsing
    Filtered,
}

impl Default for ExtractionStrategy {
    fn default() -> ExtractionStrategy {
        ExtractionStrategy::Filtered
    }
}

/// Configuration for [`AspectExtractor`].
#[derive(Debug, Clone)]
pub struct AspectExtractionConfig {
    /// Candidate collection policy (default: `Filtered`)
    pub strategy: ExtractionStrategy,
    /// Leading words stripped from noun chunks; `None` uses the built-in determiner set
    pub leading_stopwords: Option<HashSet<&'static str>>,
    /// Rejected candidate words; `None` uses the built-in blacklist
    pub blacklist: Option<HashSet<&'static str>>,
    /// Standalone noun tokens must be longer than this many characters (default: 2)
    pub min_token_chars: usize,
}

impl Default for AspectExtractionConfig {
    fn default() -> AspectExtractionConfig {
        AspectExtractionConfig {
            strategy: ExtractionStrategy::default(),
            leading_stopwords: None,
            blacklist: None,
            min_token_chars: 2,
        }
    }
}

/// Outcome of aspect extraction. An input without any surviving candidate is an
/// expected condition, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    /// At least one aspect candidate survived filtering
    Found(Vec<String>),
    /// No candidate survived filtering
    Empty,
}

impl ExtractionResult {
    pub fn aspects(&self) -> &[String] {
        match self {
            ExtractionResult::Found(aspects) => aspects,
            ExtractionResult::Empty => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ExtractionResult::Empty)
    }

    pub fn into_aspects(self) -> Vec<String> {
        match self {
            ExtractionResult::Found(aspects) => aspects,
            ExtractionResult::Empty => Vec::new(),
        }
    }
}

/// # AspectExtractor to identify candidate aspect phrases
pub struct AspectExtractor {
    tagger: Arc<dyn Tagger>,
    strategy: ExtractionStrategy,
    leading_stopwords: HashSet<&'static str>,
    blacklist: HashSet<&'static str>,
    min_token_chars: usize,
}

impl AspectExtractor {
    /// Build a new `AspectExtractor`
    ///
    /// # Arguments
    ///
    /// * `tagger` - shared handle to the external tagging capability
    /// * `config` - `AspectExtractionConfig` selecting the strategy and word sets
    pub fn new(tagger: Arc<dyn Tagger>, config: AspectExtractionConfig) -> AspectExtractor {
        let leading_stopwords = config
            .leading_stopwords
            .unwrap_or_else(|| LEADING_STOPWORDS.iter().copied().collect());
        let blacklist = config
            .blacklist
            .unwrap_or_else(|| ASPECT_BLACKLIST.iter().copied().collect());
        AspectExtractor {
            tagger,
            strategy: config.strategy,
            leading_stopwords,
            blacklist,
            min_token_chars: config.min_token_chars,
        }
    }

    /// Extract aspect candidates from a cleaned input text.
    ///
    /// Returns [`ExtractionResult::Empty`] when no candidate survives; tagging
    /// failures (including an unavailable tagging backend) are propagated as errors.
    pub fn extract(&self, text: &str) -> Result<ExtractionResult, AbsaError> {
        let spans = self.tagger.tag(text)?;
        let candidates = match self.strategy {
            ExtractionStrategy::Basic => self.collect_basic(&spans),
            ExtractionStrategy::Filtered => self.collect_filtered(&spans),
        };
        if candidates.is_empty() {
            Ok(ExtractionResult::Empty)
        } else {
            Ok(ExtractionResult::Found(candidates))
        }
    }

    /// Union of noun chunks (excluding pronoun-headed ones) and standalone noun
    /// tokens, in span order, deduplicated by exact string match.
    fn collect_basic(&self, spans: &[Span]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for span in spans {
            let keep = match span.kind {
                SpanKind::NounChunk => span.head_pos != Pos::Pronoun,
                SpanKind::Token => {
                    span.head_pos == Pos::Noun
                        && span.normalized.chars().count() > self.min_token_chars
                }
                SpanKind::Entity => false,
            };
            if keep && !span.normalized.is_empty() && seen.insert(span.normalized.clone()) {
                candidates.push(span.normalized.clone());
            }
        }
        candidates
    }

    /// Stopword-stripped, blacklist-filtered noun chunks and entities, with
    /// substring collapsing in favor of longer phrases.
    fn collect_filtered(&self, spans: &[Span]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for span in spans {
            let candidate = match span.kind {
                SpanKind::NounChunk => {
                    if span.head_pos == Pos::Pronoun {
                        continue;
                    }
                    self.strip_leading_stopword(&span.normalized)
                }
                SpanKind::Entity => span.normalized.as_str(),
                SpanKind::Token => continue,
            };
            let candidate = candidate.trim();
            if candidate.is_empty() || self.blacklist.contains(candidate) {
                continue;
            }
            if seen.insert(candidate.to_string()) {
                candidates.push(candidate.to_string());
            }
        }
        collapse_substrings(candidates)
    }

    /// Strips one leading stopword from a normalized phrase. A phrase consisting of
    /// a single stopword reduces to the empty string.
    fn strip_leading_stopword<'p>(&self, phrase: &'p str) -> &'p str {
        let mut parts = phrase.splitn(2, ' ');
        match parts.next() {
            Some(first) if self.leading_stopwords.contains(first) => {
                parts.next().map(str::trim_start).unwrap_or("")
            }
            _ => phrase,
        }
    }
}

/// Deduplicates overlapping candidates by length: candidates are sorted by
/// descending character length (ties broken lexicographically for determinism) and
/// a candidate is kept only if it is not a substring of an already-kept, longer
/// candidate.
fn collapse_substrings(mut candidates: Vec<String>) -> Vec<String> {
    candidates.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    let mut kept: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !kept.iter().any(|longer| longer.contains(candidate.as_str())) {
            kept.push(candidate);
        }
    }
    kept
}
