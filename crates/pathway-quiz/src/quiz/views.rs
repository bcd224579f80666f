use super::catalog::QuizCatalog;
use super::domain::{AnswerRecord, OutcomeId, NOT_SURE_LABEL};
use super::scoring::{QuizResults, TranscriptEntry};
use super::session::QuizSession;
use super::settings::{QuizSettings, READ_ALL_LABEL};
use serde::Serialize;
use std::fmt::Write as _;

pub const RESULTS_HEADING: &str = "Your suggested routes";
pub const TRANSCRIPT_HEADING: &str = "Why these results?";
pub const RESTART_LABEL: &str = "Start again";
pub const BACK_LABEL: &str = "Back";
pub const SKIP_LABEL: &str = "Skip";
const NEXT_LABEL: &str = "Next";
const FINISH_LABEL: &str = "See results";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkView {
    pub text: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub answer_id: String,
    pub label: String,
    pub selected: bool,
    pub not_sure: bool,
}

/// Render model for the question currently on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub quiz_id: String,
    pub step: usize,
    pub question_count: usize,
    pub progress_label: String,
    pub question_id: String,
    pub prompt: String,
    pub options: Vec<OptionView>,
    pub back_enabled: bool,
    pub next_enabled: bool,
    pub next_label: &'static str,
    pub skip_enabled: bool,
    pub read_all: LinkView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeCard {
    pub outcome: OutcomeId,
    pub title: &'static str,
    pub paragraphs: Vec<&'static str>,
    pub links: Vec<LinkView>,
    pub accent: &'static str,
    pub score: u32,
}

/// Render model for the results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsView {
    pub quiz_id: String,
    pub heading: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
    pub cards: Vec<OutcomeCard>,
    pub transcript_heading: &'static str,
    pub transcript: Vec<TranscriptEntry>,
    pub restart_label: &'static str,
    pub read_all: LinkView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum QuizView {
    Question(StepView),
    Results(ResultsView),
}

impl QuizView {
    pub fn is_results(&self) -> bool {
        matches!(self, Self::Results(_))
    }
}

fn read_all_link(settings: &QuizSettings) -> LinkView {
    LinkView {
        text: READ_ALL_LABEL.to_string(),
        href: settings.read_all_url.clone(),
    }
}

/// `None` once the flow has moved past the last question.
pub fn step_view(session: &QuizSession) -> Option<StepView> {
    let question = session.current_question()?;
    let step = session.step_index();
    let question_count = session.catalog().question_count();
    let record = session.current_record();
    let selected_id = record.and_then(|record| record.chosen_id());
    let unsure = matches!(record, Some(AnswerRecord::Unsure));

    let mut options: Vec<OptionView> = question
        .answers
        .iter()
        .map(|answer| OptionView {
            answer_id: answer.id.to_string(),
            label: answer.label.to_string(),
            selected: selected_id == Some(answer.id),
            not_sure: false,
        })
        .collect();
    options.push(OptionView {
        answer_id: question.not_sure_id(),
        label: NOT_SURE_LABEL.to_string(),
        selected: unsure,
        not_sure: true,
    });

    Some(StepView {
        quiz_id: session.quiz_id().to_string(),
        step,
        question_count,
        progress_label: format!("Question {} of {}", step + 1, question_count),
        question_id: question.id.to_string(),
        prompt: question.prompt.to_string(),
        options,
        back_enabled: step > 0,
        next_enabled: record.is_some(),
        next_label: if step + 1 == question_count {
            FINISH_LABEL
        } else {
            NEXT_LABEL
        },
        skip_enabled: session.settings().allow_skip,
        read_all: read_all_link(session.settings()),
    })
}

pub fn results_view(
    catalog: &QuizCatalog,
    results: &QuizResults,
    settings: &QuizSettings,
    quiz_id: &str,
) -> ResultsView {
    let cards = results
        .top
        .iter()
        .chain(results.second.iter())
        .filter_map(|ranked| {
            let outcome = catalog.outcome(ranked.outcome)?;
            Some(OutcomeCard {
                outcome: outcome.id,
                title: outcome.title,
                paragraphs: outcome.paragraphs(),
                links: outcome
                    .links
                    .iter()
                    .map(|link| LinkView {
                        text: link.text.to_string(),
                        href: link.href.to_string(),
                    })
                    .collect(),
                accent: outcome.accent,
                score: ranked.score,
            })
        })
        .collect();

    ResultsView {
        quiz_id: quiz_id.to_string(),
        heading: RESULTS_HEADING,
        notice: results.notice(),
        cards,
        transcript_heading: TRANSCRIPT_HEADING,
        transcript: results.transcript.clone(),
        restart_label: RESTART_LABEL,
        read_all: read_all_link(settings),
    }
}

/// Plain-text rendering used by terminal front ends.
pub fn render_text(view: &QuizView) -> String {
    let mut out = String::new();
    match view {
        QuizView::Question(step) => {
            let _ = writeln!(out, "{}", step.progress_label);
            let _ = writeln!(out, "{}", step.prompt);
            for (position, option) in step.options.iter().enumerate() {
                let marker = if option.selected { "x" } else { " " };
                let _ = writeln!(out, "  [{}] {}. {}", marker, position + 1, option.label);
            }
            let mut actions = Vec::new();
            if step.back_enabled {
                actions.push(BACK_LABEL);
            }
            if step.skip_enabled {
                actions.push(SKIP_LABEL);
            }
            if step.next_enabled {
                actions.push(step.next_label);
            }
            if !actions.is_empty() {
                let _ = writeln!(out, "Actions: {}", actions.join(" | "));
            }
            let _ = writeln!(out, "{}: {}", step.read_all.text, step.read_all.href);
        }
        QuizView::Results(results) => {
            let _ = writeln!(out, "{}", results.heading);
            if let Some(notice) = results.notice {
                let _ = writeln!(out, "\n{}", notice);
            }
            for card in &results.cards {
                let _ = writeln!(out, "\n{}", card.title);
                for paragraph in &card.paragraphs {
                    let _ = writeln!(out, "{}", paragraph);
                }
                for link in &card.links {
                    let _ = writeln!(out, "- {}: {}", link.text, link.href);
                }
            }
            if !results.transcript.is_empty() {
                let _ = writeln!(out, "\n{}", results.transcript_heading);
                for entry in &results.transcript {
                    let _ = writeln!(out, "- {}: {}", entry.prompt, entry.response);
                }
            }
            let _ = writeln!(out, "\n{}: {}", results.read_all.text, results.read_all.href);
        }
    }
    out
}
