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

//! # Linguistic tagging interface
//! The aspect extraction pipeline consumes spans produced by an external linguistic
//! tagger (noun chunks, named entities and token-level part-of-speech tags). The
//! tagging model itself is not part of this crate: implementations wrap whatever
//! tagging backend is loaded at process start and expose it through the [`Tagger`]
//! trait. A tagger that is not loaded or reachable must report
//! [`AbsaError::ModelUnavailable`] rather than returning an empty tagging.

use crate::common::error::AbsaError;
use serde::{Deserialize, Serialize};

/// Part-of-speech role of a token or of a span's grammatical head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pos {
    Noun,
    ProperNoun,
    Pronoun,
    Adjective,
    Verb,
    Adverb,
    Determiner,
    Other,
}

/// Kind of span reported by the tagger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    /// A contiguous phrase headed by a noun
    NounChunk,
    /// A named entity
    Entity,
    /// A single token
    Token,
}

/// A contiguous phrase in the source text, as reported by the tagger. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Text content as it appears in the source
    pub text: String,
    /// Lowercase-normalized form of the text content
    pub normalized: String,
    /// Kind of span
    pub kind: SpanKind,
    /// Part-of-speech role of the span's grammatical head (the token itself for token spans)
    pub head_pos: Pos,
    /// Stopword flag of the span's grammatical head
    pub head_is_stopword: bool,
}

impl Span {
    fn new(
        text: impl Into<String>,
        kind: SpanKind,
        head_pos: Pos,
        head_is_stopword: bool,
    ) -> Span {
        let text = text.into();
        let normalized = text.trim().to_lowercase();
        Span {
            text,
            normalized,
            kind,
            head_pos,
            head_is_stopword,
        }
    }

    /// Creates a noun-chunk span headed by a token with the given part-of-speech role.
    pub fn noun_chunk(text: impl Into<String>, head_pos: Pos, head_is_stopword: bool) -> Span {
        Span::new(text, SpanKind::NounChunk, head_pos, head_is_stopword)
    }

    /// Creates a named-entity span.
    pub fn entity(text: impl Into<String>) -> Span {
        Span::new(text, SpanKind::Entity, Pos::ProperNoun, false)
    }

    /// Creates a single-token span with the token's own part-of-speech role.
    pub fn token(text: impl Into<String>, pos: Pos, is_stopword: bool) -> Span {
        Span::new(text, SpanKind::Token, pos, is_stopword)
    }
}

/// External linguistic tagging capability.
///
/// `tag` returns every span the backend identifies in the input: noun chunks,
/// named entities (where supported by the backend) and individual tokens. The
/// output for a fixed input and a fixed tagging model must be deterministic.
pub trait Tagger: Send + Sync {
    fn tag(&self, text: &str) -> Result<Vec<Span>, AbsaError>;
}
