use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;

use crate::quiz::analytics::{AnalyticsError, AnalyticsSink, QuizEvent};
use crate::quiz::catalog::QuizCatalog;
use crate::quiz::domain::{AnswerOption, Outcome, OutcomeId, Question};
use crate::quiz::repository::{RepositoryError, SessionId, SessionRecord, SessionRepository};
use crate::quiz::service::QuizService;
use crate::quiz::session::QuizSession;
use crate::quiz::settings::QuizSettings;

#[derive(Default, Clone)]
pub(super) struct RecordingSink {
    events: Arc<Mutex<Vec<QuizEvent>>>,
}

impl RecordingSink {
    pub(super) fn events(&self) -> Vec<QuizEvent> {
        self.events.lock().expect("sink mutex poisoned").clone()
    }

    pub(super) fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(QuizEvent::name).collect()
    }

    pub(super) fn clear(&self) {
        self.events.lock().expect("sink mutex poisoned").clear();
    }
}

impl AnalyticsSink for RecordingSink {
    fn emit(&self, event: &QuizEvent) -> Result<(), AnalyticsError> {
        self.events
            .lock()
            .expect("sink mutex poisoned")
            .push(event.clone());
        Ok(())
    }
}

pub(super) struct FailingSink;

impl AnalyticsSink for FailingSink {
    fn emit(&self, _event: &QuizEvent) -> Result<(), AnalyticsError> {
        Err(AnalyticsError::Transport("tag manager blocked".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionRepository for MemoryRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.session_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.session_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

/// Wraps [`MemoryRepository`] with a slow `fetch` and optionally failing updates.
#[derive(Default, Clone)]
pub(super) struct SluggishRepository {
    pub(super) inner: MemoryRepository,
    pub(super) fetch_delay: Duration,
    pub(super) reject_updates: bool,
}

impl SessionRepository for SluggishRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError> {
        if self.reject_updates {
            return Err(RepositoryError::Unavailable("write timeout".to_string()));
        }
        self.inner.update(record)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        thread::sleep(self.fetch_delay);
        self.inner.fetch(id)
    }

    fn remove(&self, id: &SessionId) -> Result<(), RepositoryError> {
        self.inner.remove(id)
    }
}

pub(super) struct UnavailableRepository;

impl SessionRepository for UnavailableRepository {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: SessionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn standard_catalog() -> Arc<QuizCatalog> {
    Arc::new(QuizCatalog::standard())
}

/// Minimal display records so hand-built catalogs declare every outcome.
pub(super) fn plain_outcomes() -> Vec<Outcome> {
    OutcomeId::ordered()
        .into_iter()
        .map(|id| Outcome {
            id,
            title: id.key(),
            summary: "Summary.",
            links: Vec::new(),
            accent: "var(--col1)",
        })
        .collect()
}

/// Six single-answer questions weighting direct employment to 7 and apprenticeships to 5.
pub(super) fn weighted_catalog() -> Arc<QuizCatalog> {
    use OutcomeId::{Apprenticeships, DirectEmployment};

    let questions = vec![
        Question {
            id: "w1",
            prompt: "First?",
            answers: vec![AnswerOption::new("w1a", "A", &[(DirectEmployment, 2)])],
        },
        Question {
            id: "w2",
            prompt: "Second?",
            answers: vec![AnswerOption::new(
                "w2a",
                "A",
                &[(DirectEmployment, 2), (Apprenticeships, 1)],
            )],
        },
        Question {
            id: "w3",
            prompt: "Third?",
            answers: vec![AnswerOption::new(
                "w3a",
                "A",
                &[(DirectEmployment, 1), (Apprenticeships, 2)],
            )],
        },
        Question {
            id: "w4",
            prompt: "Fourth?",
            answers: vec![AnswerOption::new("w4a", "A", &[(DirectEmployment, 2)])],
        },
        Question {
            id: "w5",
            prompt: "Fifth?",
            answers: vec![AnswerOption::new("w5a", "A", &[(Apprenticeships, 2)])],
        },
        Question {
            id: "w6",
            prompt: "Sixth?",
            answers: vec![AnswerOption::new("w6a", "A", &[])],
        },
    ];

    Arc::new(QuizCatalog::new(questions, plain_outcomes()).expect("weighted catalog valid"))
}

pub(super) fn session_with(
    catalog: Arc<QuizCatalog>,
    settings: QuizSettings,
) -> (QuizSession, RecordingSink) {
    let sink = RecordingSink::default();
    let session = QuizSession::start("careers-test", catalog, settings, Arc::new(sink.clone()));
    (session, sink)
}

pub(super) fn standard_session() -> (QuizSession, RecordingSink) {
    session_with(standard_catalog(), QuizSettings::default())
}

/// Select and advance through the given answer ids, one per question.
pub(super) fn answer_in_order(session: &mut QuizSession, answer_ids: &[&str]) {
    for answer_id in answer_ids {
        let question_id = session
            .current_question()
            .expect("question available")
            .id;
        session
            .select_answer(question_id, answer_id)
            .expect("answer accepted");
        session.advance();
    }
}

pub(super) fn build_service() -> (
    QuizService<MemoryRepository>,
    Arc<MemoryRepository>,
    RecordingSink,
) {
    let repository = Arc::new(MemoryRepository::default());
    let sink = RecordingSink::default();
    let service = QuizService::new(
        standard_catalog(),
        QuizSettings::default(),
        repository.clone(),
        Arc::new(sink.clone()),
    );
    (service, repository, sink)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
