use super::analytics::{dispatch, AnalyticsSink, QuizEvent, ReadAllContext};
use super::catalog::QuizCatalog;
use super::domain::{AnswerRecord, AnswerSheet, Question};
use super::scoring::{OutcomeScorer, QuizResults};
use super::settings::QuizSettings;
use super::views::{self, QuizView};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Mutable state of one quiz instance: the step position and the answer sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub step_index: usize,
    pub answers: AnswerSheet,
}

impl SessionState {
    pub fn new(question_count: usize) -> Self {
        Self {
            step_index: 0,
            answers: AnswerSheet::new(question_count),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionPhase {
    InProgress { step: usize },
    Completed,
}

/// Result of a navigation request. Guarded no-ops report `Unchanged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "navigation", rename_all = "snake_case")]
pub enum NavigationOutcome {
    Unchanged,
    Moved { step: usize },
    Completed,
}

/// User intents forwarded by a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuizCommand {
    SelectAnswer {
        question_id: String,
        answer_id: String,
    },
    Skip {
        question_id: String,
    },
    Advance,
    Retreat,
    Restart,
    ReadAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    Recorded,
    Navigated(NavigationOutcome),
    Restarted,
    LinkTracked,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("quiz is complete; only restart is accepted")]
    Completed,
    #[error("question '{received}' is not the current question '{expected}'")]
    NotCurrentQuestion { expected: String, received: String },
    #[error("answer '{answer_id}' does not belong to question '{question_id}'")]
    UnknownAnswer {
        question_id: String,
        answer_id: String,
    },
    #[error("skipping questions is disabled")]
    SkipDisabled,
}

/// Question flow controller for a single mounted quiz.
pub struct QuizSession {
    quiz_id: String,
    catalog: Arc<QuizCatalog>,
    settings: QuizSettings,
    scorer: OutcomeScorer,
    sink: Arc<dyn AnalyticsSink>,
    state: SessionState,
}

impl QuizSession {
    /// Begin a fresh session and report `quiz_start`.
    pub fn start(
        quiz_id: impl Into<String>,
        catalog: Arc<QuizCatalog>,
        settings: QuizSettings,
        sink: Arc<dyn AnalyticsSink>,
    ) -> Self {
        let state = SessionState::new(catalog.question_count());
        let session = Self::resume(quiz_id, catalog, settings, sink, state);
        session.emit(QuizEvent::Start {
            quiz_id: session.quiz_id.clone(),
        });
        session
    }

    /// Rebuild a session around previously stored state without emitting events.
    pub fn resume(
        quiz_id: impl Into<String>,
        catalog: Arc<QuizCatalog>,
        settings: QuizSettings,
        sink: Arc<dyn AnalyticsSink>,
        mut state: SessionState,
    ) -> Self {
        state.step_index = state.step_index.min(catalog.question_count());
        let scorer = OutcomeScorer::new(settings.low_signal);
        Self {
            quiz_id: quiz_id.into(),
            catalog,
            settings,
            scorer,
            sink,
            state,
        }
    }

    pub fn quiz_id(&self) -> &str {
        &self.quiz_id
    }

    pub fn catalog(&self) -> &QuizCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn into_state(self) -> SessionState {
        self.state
    }

    pub fn step_index(&self) -> usize {
        self.state.step_index
    }

    pub fn answers(&self) -> &AnswerSheet {
        &self.state.answers
    }

    pub fn phase(&self) -> SessionPhase {
        if self.is_complete() {
            SessionPhase::Completed
        } else {
            SessionPhase::InProgress {
                step: self.state.step_index,
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state.step_index >= self.catalog.question_count()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.catalog.question(self.state.step_index)
    }

    pub fn current_record(&self) -> Option<&AnswerRecord> {
        self.state.answers.get(self.state.step_index)
    }

    /// Record a response for the current question. Repeating the recorded
    /// response is a no-op and emits nothing.
    pub fn select_answer(
        &mut self,
        question_id: &str,
        answer_id: &str,
    ) -> Result<(), SessionError> {
        let index = self.expect_current(question_id)?;
        let catalog = Arc::clone(&self.catalog);
        let question = catalog.question(index).ok_or(SessionError::Completed)?;

        let (record, event) = if question.is_not_sure(answer_id) {
            let event = QuizEvent::NotSure {
                quiz_id: self.quiz_id.clone(),
                question_id: question.id.to_string(),
            };
            (AnswerRecord::Unsure, event)
        } else if question.answer(answer_id).is_some() {
            let event = QuizEvent::Answer {
                quiz_id: self.quiz_id.clone(),
                question_id: question.id.to_string(),
                answer_id: answer_id.to_string(),
            };
            (AnswerRecord::chosen(answer_id), event)
        } else {
            return Err(SessionError::UnknownAnswer {
                question_id: question.id.to_string(),
                answer_id: answer_id.to_string(),
            });
        };

        if self.state.answers.get(index) == Some(&record) {
            return Ok(());
        }

        self.state.answers.record(index, record);
        self.emit(event);
        Ok(())
    }

    /// Record a skip for the current question and move on.
    pub fn skip(&mut self, question_id: &str) -> Result<NavigationOutcome, SessionError> {
        if !self.settings.allow_skip {
            return Err(SessionError::SkipDisabled);
        }
        let index = self.expect_current(question_id)?;

        self.state.answers.record(index, AnswerRecord::Skipped);
        self.emit(QuizEvent::Skip {
            quiz_id: self.quiz_id.clone(),
            question_id: question_id.to_string(),
        });

        Ok(self.advance())
    }

    pub fn advance(&mut self) -> NavigationOutcome {
        if self.is_complete() || self.current_record().is_none() {
            return NavigationOutcome::Unchanged;
        }

        self.state.step_index += 1;
        if !self.is_complete() {
            return NavigationOutcome::Moved {
                step: self.state.step_index,
            };
        }

        let results = self.scorer.evaluate(&self.catalog, &self.state.answers);
        debug!(
            quiz_id = %self.quiz_id,
            top = ?results.top,
            low_signal = results.low_signal,
            "quiz completed"
        );
        self.emit(results.completion_event(&self.quiz_id));
        NavigationOutcome::Completed
    }

    pub fn retreat(&mut self) -> NavigationOutcome {
        if self.is_complete() || self.state.step_index == 0 {
            return NavigationOutcome::Unchanged;
        }

        self.state.step_index -= 1;
        NavigationOutcome::Moved {
            step: self.state.step_index,
        }
    }

    pub fn restart(&mut self) {
        self.state = SessionState::new(self.catalog.question_count());
        self.emit(QuizEvent::Restart {
            quiz_id: self.quiz_id.clone(),
        });
    }

    pub fn read_all_clicked(&self) -> ReadAllContext {
        let context = if self.is_complete() {
            ReadAllContext::InlineLinkResults
        } else {
            ReadAllContext::InlineLink
        };
        self.emit(QuizEvent::ReadAllClick {
            quiz_id: self.quiz_id.clone(),
            context,
        });
        context
    }

    /// Scored results, available once every question has been passed.
    pub fn results(&self) -> Option<QuizResults> {
        self.is_complete()
            .then(|| self.scorer.evaluate(&self.catalog, &self.state.answers))
    }

    pub fn view(&self) -> QuizView {
        if let Some(step) = views::step_view(self) {
            return QuizView::Question(step);
        }
        let results = self.scorer.evaluate(&self.catalog, &self.state.answers);
        QuizView::Results(views::results_view(
            &self.catalog,
            &results,
            &self.settings,
            &self.quiz_id,
        ))
    }

    pub fn dispatch(&mut self, command: QuizCommand) -> Result<CommandOutcome, SessionError> {
        match command {
            QuizCommand::SelectAnswer {
                question_id,
                answer_id,
            } => self
                .select_answer(&question_id, &answer_id)
                .map(|()| CommandOutcome::Recorded),
            QuizCommand::Skip { question_id } => {
                self.skip(&question_id).map(CommandOutcome::Navigated)
            }
            QuizCommand::Advance => Ok(CommandOutcome::Navigated(self.advance())),
            QuizCommand::Retreat => Ok(CommandOutcome::Navigated(self.retreat())),
            QuizCommand::Restart => {
                self.restart();
                Ok(CommandOutcome::Restarted)
            }
            QuizCommand::ReadAll => {
                self.read_all_clicked();
                Ok(CommandOutcome::LinkTracked)
            }
        }
    }

    fn expect_current(&self, question_id: &str) -> Result<usize, SessionError> {
        let question = self.current_question().ok_or(SessionError::Completed)?;
        if question.id != question_id {
            return Err(SessionError::NotCurrentQuestion {
                expected: question.id.to_string(),
                received: question_id.to_string(),
            });
        }
        Ok(self.state.step_index)
    }

    fn emit(&self, event: QuizEvent) {
        dispatch(self.sink.as_ref(), event);
    }
}

impl std::fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizSession")
            .field("quiz_id", &self.quiz_id)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
