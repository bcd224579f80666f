use chrono::{DateTime, Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use pathway_quiz::quiz::{RepositoryError, SessionId, SessionRecord, SessionRepository};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Sessions untouched for this long are forgotten.
pub(crate) const SESSION_IDLE_MINUTES: i64 = 120;

#[derive(Clone)]
pub(crate) struct InMemorySessionRepository {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
    idle_ttl: Duration,
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::with_idle_ttl(Duration::minutes(SESSION_IDLE_MINUTES))
    }
}

impl InMemorySessionRepository {
    pub(crate) fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            records: Arc::default(),
            idle_ttl,
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }

    fn is_stale(&self, record: &SessionRecord, now: DateTime<Utc>) -> bool {
        now - record.updated_at > self.idle_ttl
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let now = Utc::now();
        let before = guard.len();
        guard.retain(|_, stored| !self.is_stale(stored, now));
        if guard.len() < before {
            debug!(evicted = before - guard.len(), "dropped idle quiz sessions");
        }
        if guard.contains_key(&record.session_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.session_id) {
            guard.insert(record.session_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard
            .get(id)
            .is_some_and(|record| self.is_stale(record, Utc::now()))
        {
            guard.remove(id);
        }
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

/// A scripted response for one question, as typed on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ScriptedAnswer {
    Choose(String),
    NotSure,
    Skip,
}

pub(crate) fn parse_scripted_answer(raw: &str) -> Result<ScriptedAnswer, String> {
    match raw.trim() {
        "" => Err("answer must not be empty".to_string()),
        "skip" | "-" => Ok(ScriptedAnswer::Skip),
        "not_sure" | "?" => Ok(ScriptedAnswer::NotSure),
        other => Ok(ScriptedAnswer::Choose(other.to_string())),
    }
}
