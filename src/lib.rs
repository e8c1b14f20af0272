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

//! Ready-to-use aspect-based sentiment analysis pipelines.
//!
//! This crate analyzes review text at the aspect level: candidate aspect phrases
//! (noun chunks and named entities, e.g. "battery life") are extracted from the
//! text, and a pretrained sequence-pair classifier scores the sentiment attached to
//! each aspect. Results are tracked per analysis session, for single texts and for
//! bulk CSV uploads.
//!
//! The linguistic tagger and the transformer classifier are external capabilities:
//! they are loaded once at process start by the embedding application and injected
//! through the [`Tagger`](pipelines::tagging::Tagger) and
//! [`SequencePairClassifier`](pipelines::sentiment_scoring::SequencePairClassifier)
//! traits as part of a [`ModelBundle`](pipelines::aspect_sentiment::ModelBundle).
//! Both resources are shared read-only across invocations; extraction and scoring
//! are deterministic for fixed models and configuration.
//!
//! See the [`pipelines`] module documentation for the available capabilities, and
//! [`pipelines::aspect_sentiment`] for an end-to-end example.

pub mod common;
pub mod pipelines;

pub use common::device::Device;
pub use common::error::AbsaError;
