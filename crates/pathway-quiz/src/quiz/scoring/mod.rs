mod policy;

pub use policy::{LowSignalPolicy, CLOSENESS_THRESHOLD, LOW_SIGNAL_NOTICE};

use super::analytics::QuizEvent;
use super::catalog::QuizCatalog;
use super::domain::{AnswerRecord, AnswerSheet, OutcomeId, NOT_SURE_LABEL, SKIPPED_LABEL};
use policy::within_closeness;
use serde::Serialize;
use tracing::debug;

/// Accumulated score per declared outcome, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreTable {
    entries: Vec<RankedOutcome>,
}

impl ScoreTable {
    fn zeroed(catalog: &QuizCatalog) -> Self {
        Self {
            entries: catalog
                .outcomes()
                .iter()
                .map(|outcome| RankedOutcome {
                    outcome: outcome.id,
                    score: 0,
                })
                .collect(),
        }
    }

    fn add(&mut self, outcome: OutcomeId, weight: u32) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.outcome == outcome) {
            entry.score += weight;
        }
    }

    pub fn score(&self, outcome: OutcomeId) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.outcome == outcome)
            .map(|entry| entry.score)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RankedOutcome] {
        &self.entries
    }

    /// Highest score first; equal scores keep declaration order.
    pub fn ranked(&self) -> Vec<RankedOutcome> {
        let mut ranked: Vec<(usize, RankedOutcome)> =
            self.entries.iter().copied().enumerate().collect();
        ranked.sort_by(|(a_pos, a), (b_pos, b)| b.score.cmp(&a.score).then(a_pos.cmp(b_pos)));
        ranked.into_iter().map(|(_, entry)| entry).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankedOutcome {
    pub outcome: OutcomeId,
    pub score: u32,
}

/// One line of the "why these results" disclosure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    pub question_id: &'static str,
    pub prompt: &'static str,
    pub response: String,
}

/// Scorer output for a finished (or partially answered) answer sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizResults {
    pub scores: ScoreTable,
    pub ranking: Vec<RankedOutcome>,
    pub top: Option<RankedOutcome>,
    /// Runner-up, present only when within the closeness threshold of `top`.
    pub second: Option<RankedOutcome>,
    pub low_signal: bool,
    pub question_count: usize,
    pub answered_count: usize,
    pub transcript: Vec<TranscriptEntry>,
}

impl QuizResults {
    pub fn notice(&self) -> Option<&'static str> {
        self.low_signal.then_some(LOW_SIGNAL_NOTICE)
    }

    pub fn completion_event(&self, quiz_id: &str) -> QuizEvent {
        QuizEvent::Complete {
            quiz_id: quiz_id.to_string(),
            top_outcome: self.top.map(|entry| entry.outcome),
            second_outcome: self.second.map(|entry| entry.outcome),
            question_count: self.question_count,
            answered_count: self.answered_count,
        }
    }
}

/// Stateless scorer that applies the low-signal policy to an answer sheet.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutcomeScorer {
    policy: LowSignalPolicy,
}

impl OutcomeScorer {
    pub fn new(policy: LowSignalPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> LowSignalPolicy {
        self.policy
    }

    pub fn score_table(&self, catalog: &QuizCatalog, answers: &AnswerSheet) -> ScoreTable {
        let mut table = ScoreTable::zeroed(catalog);

        for (index, record) in answers.iter() {
            let Some(answer_id) = record.chosen_id() else {
                continue;
            };
            let Some(question) = catalog.question(index) else {
                debug!(index, "answer recorded past the end of the question list");
                continue;
            };
            let Some(answer) = question.answer(answer_id) else {
                debug!(
                    question_id = question.id,
                    answer_id, "ignoring unknown answer during scoring"
                );
                continue;
            };

            for (outcome, weight) in &answer.weights {
                table.add(*outcome, *weight);
            }
        }

        table
    }

    pub fn evaluate(&self, catalog: &QuizCatalog, answers: &AnswerSheet) -> QuizResults {
        let scores = self.score_table(catalog, answers);
        let ranking = scores.ranked();

        let top = ranking.first().copied();
        let second = match (top.as_ref(), ranking.get(1)) {
            (Some(top), Some(second)) if within_closeness(top, second) => Some(*second),
            _ => None,
        };

        let answered_count = answers.answered_count();
        let low_signal = self.policy.is_low_signal(answered_count, top.as_ref());

        QuizResults {
            scores,
            top,
            second,
            low_signal,
            question_count: catalog.question_count(),
            answered_count,
            transcript: transcript(catalog, answers),
            ranking,
        }
    }
}

/// Responses in question declaration order, skipping unanswered questions.
pub fn transcript(catalog: &QuizCatalog, answers: &AnswerSheet) -> Vec<TranscriptEntry> {
    answers
        .iter()
        .filter_map(|(index, record)| {
            let question = catalog.question(index)?;
            let response = match record {
                AnswerRecord::Skipped => SKIPPED_LABEL.to_string(),
                AnswerRecord::Unsure => NOT_SURE_LABEL.to_string(),
                AnswerRecord::Chosen { answer_id } => question.answer(answer_id)?.label.to_string(),
            };
            Some(TranscriptEntry {
                question_id: question.id,
                prompt: question.prompt,
                response,
            })
        })
        .collect()
}
