use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Label shown for the implicit zero-weight option appended to every question.
pub const NOT_SURE_LABEL: &str = "Not sure";
/// Transcript label for a skipped question.
pub const SKIPPED_LABEL: &str = "Skipped";

const NOT_SURE_SUFFIX: &str = "_not_sure";

/// Career pathway the quiz can recommend. Declaration order doubles as the
/// tie-break order when two outcomes score the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeId {
    DirectEmployment,
    Apprenticeships,
    PreEmployment,
    SupportedInternships,
    CollegeTraining,
    Volunteering,
    GraduateRoutes,
    SelfEmployed,
    EmploymentSupport,
}

impl OutcomeId {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::DirectEmployment,
            Self::Apprenticeships,
            Self::PreEmployment,
            Self::SupportedInternships,
            Self::CollegeTraining,
            Self::Volunteering,
            Self::GraduateRoutes,
            Self::SelfEmployed,
            Self::EmploymentSupport,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::DirectEmployment => "direct_employment",
            Self::Apprenticeships => "apprenticeships",
            Self::PreEmployment => "pre_employment",
            Self::SupportedInternships => "supported_internships",
            Self::CollegeTraining => "college_training",
            Self::Volunteering => "volunteering",
            Self::GraduateRoutes => "graduate_routes",
            Self::SelfEmployed => "self_employed",
            Self::EmploymentSupport => "employment_support",
        }
    }
}

impl fmt::Display for OutcomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown outcome '{0}'")]
pub struct UnknownOutcome(pub String);

impl FromStr for OutcomeId {
    type Err = UnknownOutcome;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        Self::ordered()
            .into_iter()
            .find(|outcome| outcome.key() == needle)
            .ok_or_else(|| UnknownOutcome(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeLink {
    pub text: &'static str,
    pub href: &'static str,
}

/// Display record for a single outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub id: OutcomeId,
    pub title: &'static str,
    /// Body copy; paragraphs are separated by a blank line.
    pub summary: &'static str,
    pub links: Vec<OutcomeLink>,
    /// Opaque presentation token (a CSS colour variable on the website).
    pub accent: &'static str,
}

impl Outcome {
    pub fn paragraphs(&self) -> Vec<&'static str> {
        self.summary
            .split("\n\n")
            .map(str::trim)
            .filter(|paragraph| !paragraph.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOption {
    pub id: &'static str,
    pub label: &'static str,
    pub weights: BTreeMap<OutcomeId, u32>,
}

impl AnswerOption {
    pub fn new(id: &'static str, label: &'static str, weights: &[(OutcomeId, u32)]) -> Self {
        Self {
            id,
            label,
            weights: weights.iter().copied().collect(),
        }
    }

    pub fn weight(&self, outcome: OutcomeId) -> u32 {
        self.weights.get(&outcome).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub prompt: &'static str,
    pub answers: Vec<AnswerOption>,
}

impl Question {
    /// Identifier of the implicit "Not sure" option for this question.
    pub fn not_sure_id(&self) -> String {
        format!("{}{}", self.id, NOT_SURE_SUFFIX)
    }

    pub fn is_not_sure(&self, answer_id: &str) -> bool {
        answer_id
            .strip_prefix(self.id)
            .map_or(false, |rest| rest == NOT_SURE_SUFFIX)
    }

    pub fn answer(&self, answer_id: &str) -> Option<&AnswerOption> {
        self.answers.iter().find(|answer| answer.id == answer_id)
    }
}

/// Stored response for a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerRecord {
    Chosen { answer_id: String },
    Skipped,
    Unsure,
}

impl AnswerRecord {
    pub fn chosen(answer_id: impl Into<String>) -> Self {
        Self::Chosen {
            answer_id: answer_id.into(),
        }
    }

    pub fn chosen_id(&self) -> Option<&str> {
        match self {
            Self::Chosen { answer_id } => Some(answer_id),
            Self::Skipped | Self::Unsure => None,
        }
    }
}

/// One optional record per question, kept in question declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSheet {
    slots: Vec<Option<AnswerRecord>>,
}

impl AnswerSheet {
    pub fn new(question_count: usize) -> Self {
        Self {
            slots: vec![None; question_count],
        }
    }

    pub fn question_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn get(&self, index: usize) -> Option<&AnswerRecord> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub(crate) fn record(&mut self, index: usize, record: AnswerRecord) {
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(record);
    }

    /// Number of questions answered with a real choice.
    pub fn answered_count(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|record| matches!(record, AnswerRecord::Chosen { .. }))
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &AnswerRecord)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|record| (index, record)))
    }
}
