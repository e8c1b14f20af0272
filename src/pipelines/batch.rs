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

//! # Bulk analysis pipeline
//! Runs aspect-based sentiment analysis over every row of an uploaded CSV file and
//! stores one record per row in the session's store. The runner is synchronous:
//! callers dispatch it on a worker thread or task queue so bulk uploads do not block
//! interactive requests. A batch runs at most once; failures are terminal and
//! recorded on the session, never retried.
//!
//! Row handling:
//! - a header row is detected when the first row's first cell contains `text`
//!   (case-insensitive) and is skipped;
//! - the text column is the one named `text`, `review` or `content` in a detected
//!   header, the first column otherwise;
//! - blank rows and failing rows are skipped and reported in the summary
//!   ([`RowOutcome::Skipped`]); an unavailable model resource aborts the whole
//!   batch since no row could succeed;
//! - the session's `processed_items` counter is updated at a coarse interval to
//!   bound write amplification, and once more at the end.

use crate::common::error::AbsaError;
use crate::pipelines::aspect_sentiment::AspectSentimentModel;
use crate::pipelines::sessions::{AnalysisRecord, SessionManager};
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use uuid::Uuid;

/// Rows between two session progress updates.
pub const DEFAULT_PROGRESS_UPDATE_INTERVAL: usize = 10;
/// Characters kept of a terminal error message stored on a failed session.
pub const DEFAULT_ERROR_MESSAGE_MAX_LEN: usize = 64;

/// Column names recognized as the text column in a detected header row.
const TEXT_COLUMN_NAMES: [&str; 3] = ["text", "review", "content"];

/// Configuration for [`BulkAnalysisModel`].
#[derive(Debug, Clone)]
pub struct BatchAnalysisConfig {
    /// Rows between two progress counter writes (default: 10)
    pub progress_update_interval: usize,
    /// Maximum stored length of a terminal error message (default: 64)
    pub error_message_max_len: usize,
    /// Abort the whole batch on the first failing row instead of skipping it
    /// (default: false)
    pub abort_on_row_failure: bool,
}

impl Default for BatchAnalysisConfig {
    fn default() -> BatchAnalysisConfig {
        BatchAnalysisConfig {
            progress_update_interval: DEFAULT_PROGRESS_UPDATE_INTERVAL,
            error_message_max_len: DEFAULT_ERROR_MESSAGE_MAX_LEN,
            abort_on_row_failure: false,
        }
    }
}

/// Outcome of one data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// The row was analyzed and stored under the given record id
    Analyzed(Uuid),
    /// The row was not analyzed
    Skipped { row: usize, reason: String },
}

/// Summary of a completed batch run.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub session_id: Uuid,
    pub total_rows: usize,
    /// One outcome per data row, in row order
    pub outcomes: Vec<RowOutcome>,
}

impl BatchSummary {
    pub fn analyzed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, RowOutcome::Analyzed(_)))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.analyzed_count()
    }
}

/// # BulkAnalysisModel to analyze uploaded CSV files row by row
pub struct BulkAnalysisModel {
    config: BatchAnalysisConfig,
}

impl BulkAnalysisModel {
    /// Build a new `BulkAnalysisModel`
    ///
    /// # Arguments
    ///
    /// * `config` - `BatchAnalysisConfig` with progress and failure-handling settings
    pub fn new(config: BatchAnalysisConfig) -> BulkAnalysisModel {
        BulkAnalysisModel { config }
    }

    /// Process a CSV file from disk. See [`process_csv`](BulkAnalysisModel::process_csv).
    pub fn process_file(
        &self,
        model: &AspectSentimentModel,
        sessions: &mut SessionManager,
        session_id: Uuid,
        path: &Path,
    ) -> Result<BatchSummary, AbsaError> {
        match File::open(path) {
            Ok(file) => self.process_csv(model, sessions, session_id, file),
            Err(error) => {
                let error = AbsaError::from(error);
                self.fail_session(sessions, &session_id, &error);
                Err(error)
            }
        }
    }

    /// Process CSV data for an existing session.
    ///
    /// The session transitions to `Processing`, its `total_items` is set to the
    /// data-row count before processing starts, and on success it terminates as
    /// `Completed` with `processed_items == total_items`. An unreadable or empty
    /// input fails the batch immediately with
    /// [`AbsaError::MalformedBatchInput`]; any fatal error marks the session
    /// `Failed` with a truncated message and is returned to the caller.
    pub fn process_csv<R: Read>(
        &self,
        model: &AspectSentimentModel,
        sessions: &mut SessionManager,
        session_id: Uuid,
        reader: R,
    ) -> Result<BatchSummary, AbsaError> {
        let session = sessions.get_mut(&session_id).ok_or_else(|| {
            AbsaError::InvalidConfigurationError(format!("unknown session {}", session_id))
        })?;
        session.mark_processing();

        let rows = match read_rows(reader) {
            Ok(rows) => rows,
            Err(error) => {
                self.fail_session(sessions, &session_id, &error);
                return Err(error);
            }
        };
        if rows.is_empty() {
            let error = AbsaError::MalformedBatchInput("CSV file is empty".to_string());
            self.fail_session(sessions, &session_id, &error);
            return Err(error);
        }

        let has_header = is_header_row(&rows[0]);
        let text_column = if has_header {
            text_column_index(&rows[0])
        } else {
            0
        };
        let data_rows = if has_header { &rows[1..] } else { &rows[..] };
        let total_rows = data_rows.len();

        if let Some(session) = sessions.get_mut(&session_id) {
            session.total_items = total_rows;
            session.processed_items = 0;
        }
        log::info!(
            "starting bulk analysis for session {}: {} rows",
            session_id,
            total_rows
        );

        let mut outcomes = Vec::with_capacity(total_rows);
        for (index, row) in data_rows.iter().enumerate() {
            if row.iter().all(|field| field.trim().is_empty()) {
                outcomes.push(RowOutcome::Skipped {
                    row: index,
                    reason: "empty row".to_string(),
                });
            } else {
                let text = row.get(text_column).unwrap_or("").trim();
                if text.is_empty() {
                    outcomes.push(RowOutcome::Skipped {
                        row: index,
                        reason: "empty text cell".to_string(),
                    });
                } else {
                    match model.analyze(text) {
                        Ok(analysis) => {
                            let record = AnalysisRecord::new(
                                session_id,
                                analysis.original_text,
                                analysis.analysis,
                            );
                            let record_id = record.id;
                            sessions.add_record(record);
                            outcomes.push(RowOutcome::Analyzed(record_id));
                        }
                        Err(error) => {
                            let fatal = matches!(error, AbsaError::ModelUnavailable(_))
                                || self.config.abort_on_row_failure;
                            if fatal {
                                self.fail_session(sessions, &session_id, &error);
                                return Err(error);
                            }
                            log::warn!("skipping row {}: {}", index, error);
                            outcomes.push(RowOutcome::Skipped {
                                row: index,
                                reason: error.to_string(),
                            });
                        }
                    }
                }
            }

            if (index + 1) % self.config.progress_update_interval == 0 {
                if let Some(session) = sessions.get_mut(&session_id) {
                    session.processed_items = index + 1;
                }
                log::debug!("session {}: {}/{} rows", session_id, index + 1, total_rows);
            }
        }

        if let Some(session) = sessions.get_mut(&session_id) {
            session.processed_items = total_rows;
            session.mark_completed();
        }
        let summary = BatchSummary {
            session_id,
            total_rows,
            outcomes,
        };
        log::info!(
            "finished bulk analysis for session {}: {} analyzed, {} skipped",
            session_id,
            summary.analyzed_count(),
            summary.skipped_count()
        );
        Ok(summary)
    }

    fn fail_session(&self, sessions: &mut SessionManager, session_id: &Uuid, error: &AbsaError) {
        log::error!("bulk analysis for session {} failed: {}", session_id, error);
        if let Some(session) = sessions.get_mut(session_id) {
            session.mark_failed(&error.to_string(), self.config.error_message_max_len);
        }
    }
}

fn read_rows<R: Read>(reader: R) -> Result<Vec<StringRecord>, AbsaError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();
    for row in csv_reader.records() {
        rows.push(row?);
    }
    Ok(rows)
}

/// A first row whose first cell contains `text` (case-insensitive) is a header.
fn is_header_row(row: &StringRecord) -> bool {
    row.get(0)
        .map(|cell| cell.to_lowercase().contains("text"))
        .unwrap_or(false)
}

/// Index of the column named `text`, `review` or `content`, the first column when
/// no cell matches.
fn text_column_index(header: &StringRecord) -> usize {
    header
        .iter()
        .position(|cell| TEXT_COLUMN_NAMES.contains(&cell.trim().to_lowercase().as_str()))
        .unwrap_or(0)
}
