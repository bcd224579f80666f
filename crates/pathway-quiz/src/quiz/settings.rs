use super::scoring::LowSignalPolicy;

/// Identifier used when the host page does not name the quiz instance.
pub const DEFAULT_QUIZ_ID: &str = "skillsconnect-quiz";
/// Target of the "Read about all your options" link.
pub const READ_ALL_URL: &str =
    "https://www.skillsconnect.org.uk/find-your-direction/pathways-to-work#list";
pub const READ_ALL_LABEL: &str = "Read about all your options";

/// Per-deployment knobs for quiz behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    pub default_quiz_id: String,
    pub read_all_url: String,
    pub low_signal: LowSignalPolicy,
    pub allow_skip: bool,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            default_quiz_id: DEFAULT_QUIZ_ID.to_string(),
            read_all_url: READ_ALL_URL.to_string(),
            low_signal: LowSignalPolicy::default(),
            allow_skip: true,
        }
    }
}
