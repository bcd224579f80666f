//! Career pathway quiz: question flow, outcome scoring and presentation models.
//!
//! A [`QuizSession`] walks the fixed question list and records one response per
//! question. Once the last question is passed the [`OutcomeScorer`] sums answer
//! weights per outcome and picks the top route plus a close runner-up. Views
//! and the HTTP router sit on top and never touch session state directly.

pub mod analytics;
pub mod catalog;
pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;
mod settings;
pub mod views;
pub mod widget;

#[cfg(test)]
mod tests;

pub use analytics::{
    dispatch, AnalyticsError, AnalyticsSink, EventBuffer, NoopAnalyticsSink, QuizEvent,
    ReadAllContext, TracingAnalyticsSink,
};
pub use catalog::{CatalogError, QuizCatalog};
pub use domain::{
    AnswerOption, AnswerRecord, AnswerSheet, Outcome, OutcomeId, OutcomeLink, Question,
    UnknownOutcome,
};
pub use repository::{RepositoryError, SessionId, SessionRecord, SessionRepository};
pub use router::quiz_router;
pub use scoring::{
    LowSignalPolicy, OutcomeScorer, QuizResults, RankedOutcome, ScoreTable, TranscriptEntry,
    CLOSENESS_THRESHOLD, LOW_SIGNAL_NOTICE,
};
pub use service::{QuizService, QuizServiceError, SessionSnapshot};
pub use session::{
    CommandOutcome, NavigationOutcome, QuizCommand, QuizSession, SessionError, SessionPhase,
    SessionState,
};
pub use settings::{QuizSettings, DEFAULT_QUIZ_ID, READ_ALL_LABEL, READ_ALL_URL};
pub use views::{QuizView, ResultsView, StepView};
pub use widget::{MountHost, MountPoint, QuizWidget, CONTAINER_ID, QUIZ_ID_ATTRIBUTE};
