use rust_absa::pipelines::aspect_extraction::{
    AspectExtractionConfig, ExtractionResult, ExtractionStrategy,
};
use rust_absa::pipelines::aspect_sentiment::{
    AspectSentimentConfig, AspectSentimentModel, ModelBundle, GENERAL_ASPECT,
};
use rust_absa::pipelines::batch::{BatchAnalysisConfig, BulkAnalysisModel, RowOutcome};
use rust_absa::pipelines::sentiment_scoring::{SentimentLabel, SequencePairClassifier};
use rust_absa::pipelines::sessions::{SessionManager, SessionStatus, SessionType};
use rust_absa::pipelines::tagging::{Pos, Span, Tagger};
use rust_absa::AbsaError;
use std::io::Cursor;
use std::io::Write;
use std::sync::Arc;

/// Deterministic tagger over a small lexicon: noun chunks are an optional leading
/// determiner followed by consecutive known nouns, pronouns become pronoun-headed
/// chunks, known brand names become entities, and every noun is also reported as a
/// standalone token.
struct RuleTagger;

const DETERMINERS: [&str; 11] = [
    "the", "a", "an", "my", "our", "your", "their", "this", "that", "these", "those",
];
const PRONOUNS: [&str; 7] = ["i", "it", "they", "he", "she", "we", "you"];
const NOUNS: [&str; 18] = [
    "food", "service", "customer", "staff", "pizza", "waiter", "price", "quality", "battery",
    "life", "room", "location", "menu", "coffee", "delivery", "tea", "thing", "way",
];
const ENTITIES: [&str; 1] = ["acme"];

impl Tagger for RuleTagger {
    fn tag(&self, text: &str) -> Result<Vec<Span>, AbsaError> {
        let words: Vec<String> = text
            .split_whitespace()
            .map(|word| {
                word.trim_matches(|c: char| !c.is_alphanumeric())
                    .to_string()
            })
            .filter(|word| !word.is_empty())
            .collect();
        let lowered: Vec<String> = words.iter().map(|word| word.to_lowercase()).collect();

        let mut spans = Vec::new();
        let mut index = 0;
        while index < words.len() {
            let word = lowered[index].as_str();
            if PRONOUNS.contains(&word) {
                spans.push(Span::noun_chunk(words[index].clone(), Pos::Pronoun, true));
                index += 1;
                continue;
            }
            if ENTITIES.contains(&word) {
                spans.push(Span::entity(words[index].clone()));
                index += 1;
                continue;
            }
            let start = index;
            let mut end = index;
            if DETERMINERS.contains(&lowered[end].as_str()) {
                end += 1;
            }
            let noun_start = end;
            while end < words.len() && NOUNS.contains(&lowered[end].as_str()) {
                end += 1;
            }
            if end > noun_start {
                spans.push(Span::noun_chunk(words[start..end].join(" "), Pos::Noun, false));
                for noun in &words[noun_start..end] {
                    spans.push(Span::token(noun.clone(), Pos::Noun, false));
                }
                index = end;
            } else {
                index = if end > start { end } else { index + 1 };
            }
        }
        Ok(spans)
    }
}

/// Deterministic classifier: the clause containing the aspect decides the logits
/// through fixed cue words.
struct KeywordClassifier;

const POSITIVE_CUES: [&str; 6] = ["great", "good", "excellent", "delicious", "amazing", "friendly"];
const NEGATIVE_CUES: [&str; 6] = ["slow", "bad", "terrible", "awful", "rude", "cold"];

impl SequencePairClassifier for KeywordClassifier {
    fn classify_pair(&self, text: &str, aspect: &str) -> Result<[f32; 3], AbsaError> {
        let text = text.to_lowercase();
        let aspect = aspect.to_lowercase();
        let segments: Vec<String> = text
            .replace(" but ", ".")
            .split(|c: char| matches!(c, '.' | ',' | '!' | ';' | '?'))
            .map(|segment| segment.to_string())
            .collect();
        let segment = segments
            .iter()
            .find(|segment| segment.contains(&aspect))
            .cloned()
            .unwrap_or(text);
        if POSITIVE_CUES.iter().any(|cue| segment.contains(cue)) {
            Ok([-1.2, 0.3, 2.4])
        } else if NEGATIVE_CUES.iter().any(|cue| segment.contains(cue)) {
            Ok([2.6, 0.2, -0.9])
        } else {
            Ok([0.1, 1.8, 0.2])
        }
    }
}

/// Classifier whose backing model was never loaded.
struct UnavailableClassifier;

impl SequencePairClassifier for UnavailableClassifier {
    fn classify_pair(&self, _text: &str, _aspect: &str) -> Result<[f32; 3], AbsaError> {
        Err(AbsaError::ModelUnavailable(
            "sentiment classifier not loaded".to_string(),
        ))
    }
}

/// Classifier failing on rows carrying a marker, for row-isolation scenarios.
struct FlakyClassifier;

impl SequencePairClassifier for FlakyClassifier {
    fn classify_pair(&self, text: &str, aspect: &str) -> Result<[f32; 3], AbsaError> {
        if text.contains("brokenrow") {
            return Err(AbsaError::ClassifierError(
                "synthetic failure injected by the test classifier for this row".to_string(),
            ));
        }
        KeywordClassifier.classify_pair(text, aspect)
    }
}

fn model_with(classifier: Arc<dyn SequencePairClassifier>) -> AspectSentimentModel {
    let bundle = ModelBundle::cpu(Arc::new(RuleTagger), classifier);
    AspectSentimentModel::new(bundle, AspectSentimentConfig::default())
}

fn keyword_model() -> AspectSentimentModel {
    model_with(Arc::new(KeywordClassifier))
}

#[test]
fn extraction_finds_food_and_service() -> anyhow::Result<()> {
    let model = keyword_model();
    let aspects = model
        .extract_aspects("The food was great but the service was slow.")?
        .into_aspects();

    assert!(aspects.iter().any(|aspect| aspect == "food"));
    assert!(aspects.iter().any(|aspect| aspect == "service"));
    assert!(!aspects.iter().any(|aspect| aspect == "great"));
    assert!(!aspects.iter().any(|aspect| aspect == "slow"));
    Ok(())
}

#[test]
fn extraction_is_deterministic_across_calls() -> anyhow::Result<()> {
    let model = keyword_model();
    let input = "The customer service at Acme was slow, the pizza was delicious.";
    let first = model.extract_aspects(input)?;
    let second = model.extract_aspects(input)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn substrings_are_collapsed_into_longer_aspects() -> anyhow::Result<()> {
    let model = keyword_model();
    let aspects = model
        .extract_aspects("The customer service was slow. The service was bad.")?
        .into_aspects();

    assert!(aspects.iter().any(|aspect| aspect == "customer service"));
    assert!(!aspects.iter().any(|aspect| aspect == "service"));
    Ok(())
}

#[test]
fn basic_strategy_keeps_unfiltered_union() -> anyhow::Result<()> {
    let bundle = ModelBundle::cpu(Arc::new(RuleTagger), Arc::new(KeywordClassifier));
    let config = AspectSentimentConfig {
        extraction: AspectExtractionConfig {
            strategy: ExtractionStrategy::Basic,
            ..Default::default()
        },
    };
    let model = AspectSentimentModel::new(bundle, config);
    let aspects = model
        .extract_aspects("The food was great but the service was slow.")?
        .into_aspects();

    // chunks keep their determiners and standalone noun tokens join the set
    assert!(aspects.iter().any(|aspect| aspect == "the food"));
    assert!(aspects.iter().any(|aspect| aspect == "food"));
    assert!(aspects.iter().any(|aspect| aspect == "the service"));
    assert!(aspects.iter().any(|aspect| aspect == "service"));
    Ok(())
}

#[test]
fn entities_survive_filtering() -> anyhow::Result<()> {
    let model = keyword_model();
    let aspects = model
        .extract_aspects("Acme delivered on time and the coffee was great.")?
        .into_aspects();
    assert!(aspects.iter().any(|aspect| aspect == "acme"));
    assert!(aspects.iter().any(|aspect| aspect == "coffee"));
    Ok(())
}

#[test]
fn analyze_scores_each_aspect() -> anyhow::Result<()> {
    let model = keyword_model();
    let input = "The food was great but the service was slow.";
    let analysis = model.analyze(input)?;

    assert_eq!(analysis.original_text, input);
    assert_eq!(analysis.analysis.len(), 2);

    let food = analysis
        .analysis
        .iter()
        .find(|result| result.aspect == "food")
        .expect("food aspect missing");
    assert_eq!(food.sentiment, SentimentLabel::Positive);

    let service = analysis
        .analysis
        .iter()
        .find(|result| result.aspect == "service")
        .expect("service aspect missing");
    assert_eq!(service.sentiment, SentimentLabel::Negative);

    for result in &analysis.analysis {
        assert!(result.confidence >= 0.0 && result.confidence <= 1.0);
        let scaled = result.confidence * 10_000.0;
        assert!((scaled - scaled.round()).abs() < 1e-9);
    }
    Ok(())
}

#[test]
fn empty_input_falls_back_to_general_aspect() -> anyhow::Result<()> {
    let model = keyword_model();

    assert_eq!(model.extract_aspects("")?, ExtractionResult::Empty);

    let analysis = model.analyze("")?;
    assert_eq!(analysis.analysis.len(), 1);
    assert_eq!(analysis.analysis[0].aspect, GENERAL_ASPECT);
    Ok(())
}

#[test]
fn blacklisted_only_input_falls_back_to_general_aspect() -> anyhow::Result<()> {
    let model = keyword_model();

    // "thing" is tagged as a noun but rejected by the blacklist
    assert_eq!(
        model.extract_aspects("It was a terrible thing")?,
        ExtractionResult::Empty
    );

    let analysis = model.analyze("It was a terrible thing")?;
    assert_eq!(analysis.analysis.len(), 1);
    assert_eq!(analysis.analysis[0].aspect, GENERAL_ASPECT);
    assert_eq!(analysis.analysis[0].sentiment, SentimentLabel::Negative);
    Ok(())
}

#[test]
fn unavailable_classifier_fails_analysis() {
    let model = model_with(Arc::new(UnavailableClassifier));
    let result = model.analyze("The food was great.");
    assert!(matches!(result, Err(AbsaError::ModelUnavailable(_))));
}

#[test]
fn batch_skips_header_and_processes_all_rows() -> anyhow::Result<()> {
    let model = keyword_model();
    let mut sessions = SessionManager::new();
    let session_id = sessions.create("amy", SessionType::File);

    let csv = "text\nThe food was great but the service was slow.\nThe pizza was delicious.\n";
    let runner = BulkAnalysisModel::new(BatchAnalysisConfig::default());
    let summary = runner.process_csv(&model, &mut sessions, session_id, Cursor::new(csv))?;

    assert_eq!(summary.total_rows, 2);
    assert_eq!(summary.analyzed_count(), 2);

    let session = sessions.get(&session_id).expect("session missing");
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.total_items, 2);
    assert_eq!(session.processed_items, 2);
    assert_eq!(session.progress_display(), "2/2");
    assert_eq!(sessions.records(&session_id).len(), 2);
    Ok(())
}

#[test]
fn batch_reads_named_text_column() -> anyhow::Result<()> {
    let model = keyword_model();
    let mut sessions = SessionManager::new();
    let session_id = sessions.create("amy", SessionType::File);

    let csv = "text_id,review\n1,The coffee was great\n2,The waiter was rude\n";
    let runner = BulkAnalysisModel::new(BatchAnalysisConfig::default());
    let summary = runner.process_csv(&model, &mut sessions, session_id, Cursor::new(csv))?;

    assert_eq!(summary.analyzed_count(), 2);
    let records = sessions.records(&session_id);
    assert_eq!(records[0].original_text, "The coffee was great");
    assert_eq!(records[1].original_text, "The waiter was rude");
    Ok(())
}

#[test]
fn batch_processes_file_from_disk() -> anyhow::Result<()> {
    let model = keyword_model();
    let mut sessions = SessionManager::new();
    let session_id = sessions.create("amy", SessionType::File);

    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "text")?;
    writeln!(file, "The battery life was great")?;
    writeln!(file, "The delivery was slow")?;
    file.flush()?;

    let runner = BulkAnalysisModel::new(BatchAnalysisConfig::default());
    let summary = runner.process_file(&model, &mut sessions, session_id, file.path())?;

    assert_eq!(summary.total_rows, 2);
    assert_eq!(summary.analyzed_count(), 2);
    assert_eq!(
        sessions.get(&session_id).expect("session missing").status,
        SessionStatus::Completed
    );
    Ok(())
}

#[test]
fn failing_row_is_skipped_and_batch_completes() -> anyhow::Result<()> {
    let model = model_with(Arc::new(FlakyClassifier));
    let mut sessions = SessionManager::new();
    let session_id = sessions.create("amy", SessionType::File);

    let csv = "text\nThe food was great.\nbrokenrow service failure\nThe coffee was good.\n";
    let runner = BulkAnalysisModel::new(BatchAnalysisConfig::default());
    let summary = runner.process_csv(&model, &mut sessions, session_id, Cursor::new(csv))?;

    assert_eq!(summary.total_rows, 3);
    assert_eq!(summary.analyzed_count(), 2);
    assert_eq!(summary.skipped_count(), 1);
    assert!(matches!(
        summary.outcomes[1],
        RowOutcome::Skipped { row: 1, .. }
    ));

    let session = sessions.get(&session_id).expect("session missing");
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.processed_items, 3);
    Ok(())
}

#[test]
fn abort_mode_fails_batch_on_first_bad_row() -> anyhow::Result<()> {
    let model = model_with(Arc::new(FlakyClassifier));
    let mut sessions = SessionManager::new();
    let session_id = sessions.create("amy", SessionType::File);

    let csv = "text\nThe food was great.\nbrokenrow service failure\nThe coffee was good.\n";
    let runner = BulkAnalysisModel::new(BatchAnalysisConfig {
        abort_on_row_failure: true,
        ..Default::default()
    });
    let result = runner.process_csv(&model, &mut sessions, session_id, Cursor::new(csv));
    assert!(matches!(result, Err(AbsaError::ClassifierError(_))));

    let session = sessions.get(&session_id).expect("session missing");
    assert_eq!(session.status, SessionStatus::Failed);
    let message = session.error.as_ref().expect("error message missing");
    assert!(!message.is_empty());
    assert!(message.chars().count() <= 64);
    Ok(())
}

#[test]
fn unavailable_model_always_aborts_batch() -> anyhow::Result<()> {
    let model = model_with(Arc::new(UnavailableClassifier));
    let mut sessions = SessionManager::new();
    let session_id = sessions.create("amy", SessionType::File);

    let csv = "text\nThe food was great.\n";
    let runner = BulkAnalysisModel::new(BatchAnalysisConfig::default());
    let result = runner.process_csv(&model, &mut sessions, session_id, Cursor::new(csv));
    assert!(matches!(result, Err(AbsaError::ModelUnavailable(_))));
    assert_eq!(
        sessions.get(&session_id).expect("session missing").status,
        SessionStatus::Failed
    );
    Ok(())
}

#[test]
fn empty_file_fails_batch_without_processing() -> anyhow::Result<()> {
    let model = keyword_model();
    let mut sessions = SessionManager::new();
    let session_id = sessions.create("amy", SessionType::File);

    let runner = BulkAnalysisModel::new(BatchAnalysisConfig::default());
    let result = runner.process_csv(&model, &mut sessions, session_id, Cursor::new(""));
    assert!(matches!(result, Err(AbsaError::MalformedBatchInput(_))));

    let session = sessions.get(&session_id).expect("session missing");
    assert_eq!(session.status, SessionStatus::Failed);
    assert!(session.error.as_ref().expect("error missing").contains("empty"));
    assert_eq!(session.processed_items, 0);
    Ok(())
}

#[test]
fn blank_rows_count_toward_progress() -> anyhow::Result<()> {
    let model = keyword_model();
    let mut sessions = SessionManager::new();
    let session_id = sessions.create("amy", SessionType::File);

    let csv = "text\nThe food was great.\n,,\nThe coffee was good.\n";
    let runner = BulkAnalysisModel::new(BatchAnalysisConfig::default());
    let summary = runner.process_csv(&model, &mut sessions, session_id, Cursor::new(csv))?;

    assert_eq!(summary.total_rows, 3);
    assert_eq!(summary.analyzed_count(), 2);
    assert_eq!(summary.skipped_count(), 1);

    let session = sessions.get(&session_id).expect("session missing");
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.processed_items, session.total_items);
    Ok(())
}

#[test]
fn ad_hoc_analysis_is_tracked_in_history() -> anyhow::Result<()> {
    let model = keyword_model();
    let mut sessions = SessionManager::new();
    let session_id = sessions.create("amy", SessionType::Text);

    let analysis = model.analyze("The food was great but the service was slow.")?;
    sessions.add_record(
        rust_absa::pipelines::sessions::AnalysisRecord::new(
            session_id,
            analysis.original_text.clone(),
            analysis.analysis.clone(),
        ),
    );
    if let Some(session) = sessions.get_mut(&session_id) {
        session.total_items = 1;
        session.processed_items = 1;
    }

    let history = sessions.history("amy");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].results.len(), 2);
    assert!(sessions.history("someone else").is_empty());
    Ok(())
}

#[test]
fn analysis_serializes_to_json() -> anyhow::Result<()> {
    let model = keyword_model();
    let analysis = model.analyze("The food was great.")?;
    let json = serde_json::to_value(&analysis)?;

    assert_eq!(json["original_text"], "The food was great.");
    assert_eq!(json["analysis"][0]["aspect"], "food");
    assert_eq!(json["analysis"][0]["sentiment"], "positive");
    Ok(())
}
