//! # Ready-to-use aspect-based sentiment analysis pipelines
//!
//! The following capabilities are available:
//!
//! #### 1. Text cleaning
//! Pure normalization of raw review text: HTML entities are decoded, URLs and user
//! mentions are masked with placeholder tokens, emoji become delimited text tags and
//! whitespace is collapsed. Applied by the analysis pipeline before extraction and
//! scoring, and idempotent on already-clean text.
//!
//! #### 2. Aspect extraction
//! Identifies the deduplicated set of aspect phrases worth scoring in a text, from
//! the noun chunks, entities and token tags reported by an external linguistic
//! tagger. Two policies are available behind an explicit strategy selector: a basic
//! noun-chunk/noun-token union, and a filtered policy with leading-determiner
//! stripping, a generic-word blacklist and substring collapsing in favor of longer,
//! more specific phrases. Extraction is deterministic for a fixed tagging model and
//! configuration.
//!
//! #### 3. Aspect sentiment scoring
//! Classifies a (text, aspect) sentence pair into {negative, neutral, positive}
//! through an external sequence-pair classifier, converting its logits into a
//! probability distribution by softmax and reporting the argmax label with its
//! probability rounded to 4 decimal places.
//!
//! #### 4. Aspect-based sentiment analysis
//! End-to-end pipeline composing cleaning, extraction and scoring, with the external
//! model resources injected once at startup through a `ModelBundle`. Texts without
//! any surviving aspect are scored against the synthetic `general` aspect.
//!
//! #### 5. Sessions
//! Tracks submissions (ad hoc texts and bulk files) with progress counters, terminal
//! statuses and the analyzed records they produced, in an in-memory store mirroring
//! the `Session 1-* Record 1-* result` persistence layout.
//!
//! #### 6. Bulk analysis
//! Analyzes an uploaded CSV file row by row with header detection, text-column
//! selection, per-row failure isolation and coarse progress updates, recording a
//! terminal session status on completion or failure.

pub mod aspect_extraction;
pub mod aspect_sentiment;
pub mod batch;
pub mod cleaning;
pub mod sentiment_scoring;
pub mod sessions;
pub mod tagging;
