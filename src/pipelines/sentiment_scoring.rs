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

//! # Aspect sentiment scoring pipeline
//! For a text and a single aspect phrase, produces a 3-way sentiment classification
//! with a confidence score. The transformer classifier is an external capability
//! behind the [`SequencePairClassifier`] trait: it jointly encodes the
//! (text, aspect) sentence pair and returns raw logits at fixed label indices
//! (0: negative, 1: neutral, 2: positive). The scorer converts logits to a
//! probability distribution with a numerically stabilized softmax, selects the
//! argmax label and rounds its probability to 4 decimal places.
//!
//! Scoring mutates no state: classifier weights are loaded once at process start
//! and shared read-only across invocations.

use crate::common::error::AbsaError;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Maximum token length of the jointly encoded sentence pair. Implementations of
/// [`SequencePairClassifier`] truncate the encoded pair to this length.
pub const MAX_SEQUENCE_LENGTH: usize = 128;

/// Fixed label order of the classifier output logits.
const ID2LABEL: [SentimentLabel; 3] = [
    SentimentLabel::Negative,
    SentimentLabel::Neutral,
    SentimentLabel::Positive,
];

/// External sequence-pair classification capability.
///
/// `classify_pair` encodes the text and the aspect jointly (truncated to
/// [`MAX_SEQUENCE_LENGTH`] tokens) and returns the raw 3-way logit vector over
/// {negative, neutral, positive}. Inference runs without gradient updates; the
/// output for a fixed input and fixed weights must be deterministic. A classifier
/// that is not loaded must report [`AbsaError::ModelUnavailable`] instead of
/// returning placeholder logits.
pub trait SequencePairClassifier: Send + Sync {
    fn classify_pair(&self, text: &str, aspect: &str) -> Result<[f32; 3], AbsaError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Enum with the possible aspect sentiment labels.
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Positive => "positive",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Sentiment returned for a single aspect.
pub struct AspectSentiment {
    /// Aspect phrase the sentiment attaches to
    pub aspect: String,
    /// Predicted sentiment label
    pub sentiment: SentimentLabel,
    /// Probability of the predicted label, rounded to 4 decimal places
    pub confidence: f64,
}

/// # SentimentScorer to classify (text, aspect) pairs
pub struct SentimentScorer {
    classifier: Arc<dyn SequencePairClassifier>,
}

impl SentimentScorer {
    /// Build a new `SentimentScorer`
    ///
    /// # Arguments
    ///
    /// * `classifier` - shared handle to the external sequence-pair classifier
    pub fn new(classifier: Arc<dyn SequencePairClassifier>) -> SentimentScorer {
        SentimentScorer { classifier }
    }

    /// Score the sentiment of one aspect within a text.
    pub fn score(&self, text: &str, aspect: &str) -> Result<AspectSentiment, AbsaError> {
        let logits = self.classifier.classify_pair(text, aspect)?;
        let probabilities = softmax(&logits);
        let (prediction, confidence) = probabilities
            .iter()
            .copied()
            .enumerate()
            .max_by_key(|(_, probability)| OrderedFloat(*probability))
            .unwrap_or((1, 0.0));
        Ok(AspectSentiment {
            aspect: aspect.to_owned(),
            sentiment: ID2LABEL[prediction],
            confidence: round_confidence(f64::from(confidence)),
        })
    }

    /// Score every aspect of a text, one (text, aspect) pair at a time. Per-pair
    /// outputs are identical to repeated [`score`](SentimentScorer::score) calls.
    pub fn score_all(
        &self,
        text: &str,
        aspects: &[String],
    ) -> Result<Vec<AspectSentiment>, AbsaError> {
        let mut results = Vec::with_capacity(aspects.len());
        for aspect in aspects {
            results.push(self.score(text, aspect)?);
        }
        Ok(results)
    }
}

/// Normalized-exponential transform over the 3-way logit vector, stabilized by
/// max subtraction.
pub(crate) fn softmax(logits: &[f32; 3]) -> [f32; 3] {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exponentials = [
        (logits[0] - max).exp(),
        (logits[1] - max).exp(),
        (logits[2] - max).exp(),
    ];
    let sum: f32 = exponentials.iter().sum();
    [
        exponentials[0] / sum,
        exponentials[1] / sum,
        exponentials[2] / sum,
    ]
}

fn round_confidence(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
