use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use super::analytics::{AnalyticsSink, EventBuffer};
use super::catalog::QuizCatalog;
use super::repository::{RepositoryError, SessionId, SessionRecord, SessionRepository};
use super::session::{CommandOutcome, QuizCommand, QuizSession, SessionError, SessionPhase};
use super::settings::QuizSettings;
use super::views::{self, QuizView, ResultsView};
use super::widget::resolve_quiz_id;

/// Service composing the quiz catalog, session repository and analytics sink.
pub struct QuizService<R> {
    catalog: Arc<QuizCatalog>,
    settings: QuizSettings,
    repository: Arc<R>,
    sink: Arc<dyn AnalyticsSink>,
    locks: SessionLocks,
}

/// One mutex per live session so commands on the same session apply in turn.
#[derive(Default)]
struct SessionLocks {
    slots: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    fn slot(&self, session_id: &SessionId) -> Arc<Mutex<()>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        // Slots only referenced by the map belong to no in-flight command.
        slots.retain(|_, slot| Arc::strong_count(slot) > 1);
        Arc::clone(slots.entry(session_id.clone()).or_default())
    }
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("quiz-{id:06}"))
}

/// Current state of a session as returned to presentation layers.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub quiz_id: String,
    pub phase: SessionPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<CommandOutcome>,
    pub view: QuizView,
}

impl<R> QuizService<R>
where
    R: SessionRepository + 'static,
{
    pub fn new(
        catalog: Arc<QuizCatalog>,
        settings: QuizSettings,
        repository: Arc<R>,
        sink: Arc<dyn AnalyticsSink>,
    ) -> Self {
        Self {
            catalog,
            settings,
            repository,
            sink,
            locks: SessionLocks::default(),
        }
    }

    pub fn catalog(&self) -> &QuizCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    /// Mount a fresh session, reporting `quiz_start`.
    pub fn start(&self, quiz_id: Option<&str>) -> Result<SessionSnapshot, QuizServiceError> {
        let quiz_id = resolve_quiz_id(quiz_id, &self.settings);
        let events = Arc::new(EventBuffer::default());
        let session = QuizSession::start(
            quiz_id.clone(),
            Arc::clone(&self.catalog),
            self.settings.clone(),
            events.clone(),
        );

        let now = Utc::now();
        let record = SessionRecord {
            session_id: next_session_id(),
            quiz_id,
            started_at: now,
            updated_at: now,
            state: session.state().clone(),
        };
        let stored = self.repository.insert(record)?;
        events.flush_into(self.sink.as_ref());
        info!(session_id = %stored.session_id, quiz_id = %stored.quiz_id, "quiz session started");

        Ok(snapshot(&stored.session_id, &session, None))
    }

    pub fn view(&self, session_id: &SessionId) -> Result<SessionSnapshot, QuizServiceError> {
        let record = self.load(session_id)?;
        let session = self.resume(&record, Arc::clone(&self.sink));
        Ok(snapshot(session_id, &session, None))
    }

    /// Apply a command and persist the resulting state.
    ///
    /// Commands on one session run one at a time, and the events they raise
    /// reach the sink only after the new state has been stored.
    pub fn dispatch(
        &self,
        session_id: &SessionId,
        command: QuizCommand,
    ) -> Result<SessionSnapshot, QuizServiceError> {
        let slot = self.locks.slot(session_id);
        let _turn = slot.lock().unwrap_or_else(PoisonError::into_inner);

        let mut record = self.load(session_id)?;
        let events = Arc::new(EventBuffer::default());
        let mut session = self.resume(&record, events.clone());

        let outcome = session.dispatch(command)?;
        debug!(session_id = %session_id, ?outcome, "quiz command applied");

        let view = snapshot(session_id, &session, Some(outcome));
        record.state = session.into_state();
        record.updated_at = Utc::now();
        self.repository.update(record)?;
        events.flush_into(self.sink.as_ref());

        Ok(view)
    }

    pub fn results(&self, session_id: &SessionId) -> Result<ResultsView, QuizServiceError> {
        let record = self.load(session_id)?;
        let session = self.resume(&record, Arc::clone(&self.sink));
        let results = session.results().ok_or(QuizServiceError::NotComplete)?;
        Ok(views::results_view(
            &self.catalog,
            &results,
            &self.settings,
            session.quiz_id(),
        ))
    }

    pub fn end(&self, session_id: &SessionId) -> Result<(), QuizServiceError> {
        let slot = self.locks.slot(session_id);
        let _turn = slot.lock().unwrap_or_else(PoisonError::into_inner);
        self.repository.remove(session_id)?;
        Ok(())
    }

    fn load(&self, session_id: &SessionId) -> Result<SessionRecord, QuizServiceError> {
        let record = self
            .repository
            .fetch(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    fn resume(&self, record: &SessionRecord, sink: Arc<dyn AnalyticsSink>) -> QuizSession {
        QuizSession::resume(
            record.quiz_id.clone(),
            Arc::clone(&self.catalog),
            self.settings.clone(),
            sink,
            record.state.clone(),
        )
    }
}

fn snapshot(
    session_id: &SessionId,
    session: &QuizSession,
    outcome: Option<CommandOutcome>,
) -> SessionSnapshot {
    SessionSnapshot {
        session_id: session_id.clone(),
        quiz_id: session.quiz_id().to_string(),
        phase: session.phase(),
        outcome,
        view: session.view(),
    }
}

/// Error raised by the quiz service.
#[derive(Debug, thiserror::Error)]
pub enum QuizServiceError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("quiz has not been completed yet")]
    NotComplete,
}
