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

//! # Analysis sessions
//! Tracks units of submission (one ad hoc text or one bulk file) with progress
//! counters and a terminal status, together with the analyzed records they produced.
//! The [`SessionManager`] is an in-memory reference store keyed by session id;
//! durable persistence backends mirror the same `Session 1-* Record 1-* result`
//! layout and remain external collaborators.

use crate::pipelines::sentiment_scoring::AspectSentiment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Kind of submission tracked by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    /// A single ad hoc text
    Text,
    /// A bulk file upload
    File,
}

/// Lifecycle status of a session. `Completed` and `Failed` are terminal; a failed
/// session carries a truncated error message in [`AnalysisSession::error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// A unit of bulk or ad hoc submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSession {
    pub id: Uuid,
    pub owner: String,
    pub session_type: SessionType,
    pub status: SessionStatus,
    /// Terminal error message, truncated for storage. Set only when `status` is `Failed`.
    pub error: Option<String>,
    pub total_items: usize,
    pub processed_items: usize,
    pub created_at: DateTime<Utc>,
}

impl AnalysisSession {
    fn new(owner: &str, session_type: SessionType) -> AnalysisSession {
        AnalysisSession {
            id: Uuid::new_v4(),
            owner: owner.to_owned(),
            session_type,
            status: SessionStatus::Pending,
            error: None,
            total_items: 0,
            processed_items: 0,
            created_at: Utc::now(),
        }
    }

    /// `processed/total` progress counter for display.
    pub fn progress_display(&self) -> String {
        format!("{}/{}", self.processed_items, self.total_items)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, SessionStatus::Completed | SessionStatus::Failed)
    }

    pub(crate) fn mark_processing(&mut self) {
        self.status = SessionStatus::Processing;
    }

    pub(crate) fn mark_completed(&mut self) {
        self.status = SessionStatus::Completed;
        self.error = None;
    }

    /// Marks the session failed, keeping at most `max_len` characters of the message.
    pub(crate) fn mark_failed(&mut self, message: &str, max_len: usize) {
        self.status = SessionStatus::Failed;
        self.error = Some(message.chars().take(max_len).collect());
    }
}

/// One analyzed input text, with its per-aspect results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub session_id: Uuid,
    pub original_text: String,
    pub created_at: DateTime<Utc>,
    /// One entry per surviving aspect
    pub results: Vec<AspectSentiment>,
}

impl AnalysisRecord {
    pub fn new(
        session_id: Uuid,
        original_text: impl Into<String>,
        results: Vec<AspectSentiment>,
    ) -> AnalysisRecord {
        AnalysisRecord {
            id: Uuid::new_v4(),
            session_id,
            original_text: original_text.into(),
            created_at: Utc::now(),
            results,
        }
    }
}

/// # SessionManager to track analysis sessions and their records
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: HashMap<Uuid, AnalysisSession>,
    records: HashMap<Uuid, Vec<AnalysisRecord>>,
}

impl SessionManager {
    pub fn new() -> SessionManager {
        SessionManager {
            sessions: HashMap::new(),
            records: HashMap::new(),
        }
    }

    /// Creates a new pending session and returns its id.
    pub fn create(&mut self, owner: &str, session_type: SessionType) -> Uuid {
        let session = AnalysisSession::new(owner, session_type);
        let session_id = session.id;
        self.sessions.insert(session_id, session);
        session_id
    }

    pub fn get(&self, session_id: &Uuid) -> Option<&AnalysisSession> {
        self.sessions.get(session_id)
    }

    pub fn get_mut(&mut self, session_id: &Uuid) -> Option<&mut AnalysisSession> {
        self.sessions.get_mut(session_id)
    }

    /// All sessions, oldest first.
    pub fn get_all(&self) -> Vec<&AnalysisSession> {
        let mut sessions: Vec<&AnalysisSession> = self.sessions.values().collect();
        sessions.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        sessions
    }

    /// Attaches a record to its session.
    pub fn add_record(&mut self, record: AnalysisRecord) {
        self.records
            .entry(record.session_id)
            .or_insert_with(Vec::new)
            .push(record);
    }

    /// Records of a session, in insertion order.
    pub fn records(&self, session_id: &Uuid) -> &[AnalysisRecord] {
        self.records
            .get(session_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Records across all of an owner's sessions, newest first.
    pub fn history(&self, owner: &str) -> Vec<&AnalysisRecord> {
        let mut history: Vec<&AnalysisRecord> = self
            .sessions
            .values()
            .filter(|session| session.owner == owner)
            .flat_map(|session| self.records(&session.id))
            .collect();
        history.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        history
    }

    /// Removes a session together with its records.
    pub fn remove(&mut self, session_id: &Uuid) -> Option<AnalysisSession> {
        self.records.remove(session_id);
        self.sessions.remove(session_id)
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
