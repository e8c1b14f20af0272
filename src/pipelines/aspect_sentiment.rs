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

//! # Aspect-based sentiment analysis pipeline
//! End-to-end analysis of a review text: the input is cleaned, candidate aspects are
//! extracted and each (text, aspect) pair is scored by the sentiment classifier. The
//! external model resources are injected explicitly through a [`ModelBundle`]
//! constructed once at process start, rather than looked up through global state.
//!
//! When extraction yields no candidate, the single synthetic aspect
//! [`GENERAL_ASPECT`] is scored instead, representing whole-text sentiment.
//!
//! ```
//! # use rust_absa::common::error::AbsaError;
//! # use rust_absa::pipelines::tagging::{Pos, Span, Tagger};
//! # use rust_absa::pipelines::sentiment_scoring::SequencePairClassifier;
//! use rust_absa::pipelines::aspect_sentiment::{
//!     AspectSentimentConfig, AspectSentimentModel, ModelBundle,
//! };
//! # use std::sync::Arc;
//! # struct MyTagger;
//! # impl Tagger for MyTagger {
//! #     fn tag(&self, _text: &str) -> Result<Vec<Span>, AbsaError> {
//! #         Ok(vec![Span::noun_chunk("the food", Pos::Noun, false)])
//! #     }
//! # }
//! # struct MyClassifier;
//! # impl SequencePairClassifier for MyClassifier {
//! #     fn classify_pair(&self, _text: &str, _aspect: &str) -> Result<[f32; 3], AbsaError> {
//! #         Ok([0.1, 0.2, 2.5])
//! #     }
//! # }
//! # fn main() -> anyhow::Result<()> {
//! let bundle = ModelBundle::cpu(Arc::new(MyTagger), Arc::new(MyClassifier));
//! let model = AspectSentimentModel::new(bundle, AspectSentimentConfig::default());
//!
//! let analysis = model.analyze("The food was great but the service was slow.")?;
//! for result in &analysis.analysis {
//!     println!("{}: {} ({})", result.aspect, result.sentiment, result.confidence);
//! }
//! # Ok(())
//! # }
//! ```

use crate::common::device::Device;
use crate::common::error::AbsaError;
use crate::pipelines::aspect_extraction::{
    AspectExtractionConfig, AspectExtractor, ExtractionResult,
};
use crate::pipelines::cleaning::clean_text;
use crate::pipelines::sentiment_scoring::{
    AspectSentiment, SentimentScorer, SequencePairClassifier,
};
use crate::pipelines::tagging::Tagger;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Synthetic aspect substituted when extraction finds no candidate; its score
/// represents whole-text sentiment.
pub const GENERAL_ASPECT: &str = "general";

/// Shared handles to the external model resources, constructed once at process
/// start and passed explicitly into the pipelines.
pub struct ModelBundle {
    /// Linguistic tagging capability
    pub tagger: Arc<dyn Tagger>,
    /// Sequence-pair sentiment classifier
    pub classifier: Arc<dyn SequencePairClassifier>,
    /// Device the classifier was placed on
    pub device: Device,
}

impl ModelBundle {
    pub fn new(
        tagger: Arc<dyn Tagger>,
        classifier: Arc<dyn SequencePairClassifier>,
        device: Device,
    ) -> ModelBundle {
        ModelBundle {
            tagger,
            classifier,
            device,
        }
    }

    /// Bundle with CPU-placed resources.
    pub fn cpu(
        tagger: Arc<dyn Tagger>,
        classifier: Arc<dyn SequencePairClassifier>,
    ) -> ModelBundle {
        ModelBundle::new(tagger, classifier, Device::Cpu)
    }
}

/// Configuration for [`AspectSentimentModel`].
#[derive(Debug, Clone, Default)]
pub struct AspectSentimentConfig {
    /// Aspect extraction settings
    pub extraction: AspectExtractionConfig,
}

/// Analysis of one review text: one sentiment entry per surviving aspect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// The submitted text, unmodified
    pub original_text: String,
    /// One entry per aspect, in extraction order
    pub analysis: Vec<AspectSentiment>,
}

/// # AspectSentimentModel to analyze aspect-level sentiment of review texts
pub struct AspectSentimentModel {
    extractor: AspectExtractor,
    scorer: SentimentScorer,
    device: Device,
}

impl AspectSentimentModel {
    /// Build a new `AspectSentimentModel`
    ///
    /// # Arguments
    ///
    /// * `bundle` - `ModelBundle` with the externally loaded tagger and classifier
    /// * `config` - `AspectSentimentConfig` with the extraction settings
    pub fn new(bundle: ModelBundle, config: AspectSentimentConfig) -> AspectSentimentModel {
        let extractor = AspectExtractor::new(bundle.tagger, config.extraction);
        let scorer = SentimentScorer::new(bundle.classifier);
        AspectSentimentModel {
            extractor,
            scorer,
            device: bundle.device,
        }
    }

    /// Analyze the aspect-level sentiment of a review text.
    ///
    /// The text is cleaned, aspects are extracted and each aspect is scored against
    /// the cleaned text. When no aspect survives extraction the synthetic
    /// [`GENERAL_ASPECT`] is scored instead, so an `Ok` analysis always contains at
    /// least one entry. Unavailable model resources are reported as
    /// [`AbsaError::ModelUnavailable`].
    pub fn analyze(&self, text: &str) -> Result<Analysis, AbsaError> {
        let cleaned = clean_text(text);
        let aspects = match self.extractor.extract(&cleaned)? {
            ExtractionResult::Found(aspects) => aspects,
            ExtractionResult::Empty => vec![GENERAL_ASPECT.to_string()],
        };
        let analysis = self.scorer.score_all(&cleaned, &aspects)?;
        Ok(Analysis {
            original_text: text.to_owned(),
            analysis,
        })
    }

    /// Extract the deduplicated aspect candidates of a text without scoring them.
    pub fn extract_aspects(&self, text: &str) -> Result<ExtractionResult, AbsaError> {
        self.extractor.extract(&clean_text(text))
    }

    /// Device the classifier resource was placed on.
    pub fn device(&self) -> Device {
        self.device
    }
}
