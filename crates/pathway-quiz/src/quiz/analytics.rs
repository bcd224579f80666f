use super::domain::OutcomeId;
use crate::telemetry::ANALYTICS_TARGET;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

/// Where a "read about all your options" link was clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadAllContext {
    InlineLink,
    InlineLinkResults,
}

impl ReadAllContext {
    pub const fn label(self) -> &'static str {
        match self {
            Self::InlineLink => "inline_link",
            Self::InlineLinkResults => "inline_link_results",
        }
    }
}

/// Analytics events emitted by a quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum QuizEvent {
    Start {
        quiz_id: String,
    },
    Answer {
        quiz_id: String,
        question_id: String,
        answer_id: String,
    },
    NotSure {
        quiz_id: String,
        question_id: String,
    },
    Skip {
        quiz_id: String,
        question_id: String,
    },
    Complete {
        quiz_id: String,
        top_outcome: Option<OutcomeId>,
        second_outcome: Option<OutcomeId>,
        question_count: usize,
        answered_count: usize,
    },
    Restart {
        quiz_id: String,
    },
    ReadAllClick {
        quiz_id: String,
        context: ReadAllContext,
    },
}

impl QuizEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start { .. } => "quiz_start",
            Self::Answer { .. } => "quiz_answer",
            Self::NotSure { .. } => "quiz_not_sure",
            Self::Skip { .. } => "quiz_skip",
            Self::Complete { .. } => "quiz_complete",
            Self::Restart { .. } => "quiz_restart",
            Self::ReadAllClick { .. } => "quiz_read_all_click",
        }
    }

    pub fn quiz_id(&self) -> &str {
        match self {
            Self::Start { quiz_id }
            | Self::Answer { quiz_id, .. }
            | Self::NotSure { quiz_id, .. }
            | Self::Skip { quiz_id, .. }
            | Self::Complete { quiz_id, .. }
            | Self::Restart { quiz_id }
            | Self::ReadAllClick { quiz_id, .. } => quiz_id,
        }
    }

    /// Key/value payload handed to the sink; absent outcomes are `null`.
    pub fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("quiz_id".to_string(), json!(self.quiz_id()));

        match self {
            Self::Start { .. } | Self::Restart { .. } => {}
            Self::Answer {
                question_id,
                answer_id,
                ..
            } => {
                params.insert("question_id".to_string(), json!(question_id));
                params.insert("answer_id".to_string(), json!(answer_id));
            }
            Self::NotSure { question_id, .. } | Self::Skip { question_id, .. } => {
                params.insert("question_id".to_string(), json!(question_id));
            }
            Self::Complete {
                top_outcome,
                second_outcome,
                question_count,
                answered_count,
                ..
            } => {
                params.insert(
                    "top_outcome".to_string(),
                    json!(top_outcome.map(OutcomeId::key)),
                );
                params.insert(
                    "second_outcome".to_string(),
                    json!(second_outcome.map(OutcomeId::key)),
                );
                params.insert("question_count".to_string(), json!(question_count));
                params.insert("answered_count".to_string(), json!(answered_count));
            }
            Self::ReadAllClick { context, .. } => {
                params.insert("context".to_string(), json!(context.label()));
            }
        }

        params
    }
}

/// Fire-and-forget analytics transport (tag manager, log pipeline, test recorder).
pub trait AnalyticsSink: Send + Sync {
    fn emit(&self, event: &QuizEvent) -> Result<(), AnalyticsError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("analytics transport unavailable: {0}")]
    Transport(String),
}

/// Hand an event to the sink; failures never reach the caller.
pub fn dispatch(sink: &dyn AnalyticsSink, event: QuizEvent) {
    if let Err(err) = sink.emit(&event) {
        debug!(event = event.name(), error = %err, "analytics event dropped");
    }
}

/// Mirrors every analytics event into the structured log stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAnalyticsSink;

impl AnalyticsSink for TracingAnalyticsSink {
    fn emit(&self, event: &QuizEvent) -> Result<(), AnalyticsError> {
        let params = Value::Object(event.params());
        info!(target: ANALYTICS_TARGET, event = event.name(), %params, "analytics event");
        Ok(())
    }
}

/// Holds events back until the state change that produced them is stored.
#[derive(Debug, Default)]
pub struct EventBuffer {
    events: Mutex<Vec<QuizEvent>>,
}

impl EventBuffer {
    pub fn take(&self) -> Vec<QuizEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn flush_into(&self, sink: &dyn AnalyticsSink) {
        for event in self.take() {
            dispatch(sink, event);
        }
    }
}

impl AnalyticsSink for EventBuffer {
    fn emit(&self, event: &QuizEvent) -> Result<(), AnalyticsError> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAnalyticsSink;

impl AnalyticsSink for NoopAnalyticsSink {
    fn emit(&self, _event: &QuizEvent) -> Result<(), AnalyticsError> {
        Ok(())
    }
}
