use super::analytics::AnalyticsSink;
use super::catalog::QuizCatalog;
use super::session::{CommandOutcome, QuizCommand, QuizSession, SessionError};
use super::settings::QuizSettings;
use super::views::QuizView;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Stable id of the element the quiz attaches to.
pub const CONTAINER_ID: &str = "quiz-root";
/// Attribute on the container naming the quiz instance.
pub const QUIZ_ID_ATTRIBUTE: &str = "data-quiz-id";

/// Container element offered by the host page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountPoint {
    attributes: BTreeMap<String, String>,
}

impl MountPoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Host surface that can look up containers by id.
pub trait MountHost {
    fn container(&self, id: &str) -> Option<MountPoint>;
}

impl MountHost for BTreeMap<String, MountPoint> {
    fn container(&self, id: &str) -> Option<MountPoint> {
        self.get(id).cloned()
    }
}

/// A mounted quiz instance with its own isolated session.
#[derive(Debug)]
pub struct QuizWidget {
    session: QuizSession,
}

impl QuizWidget {
    /// Returns `None` when the host has no quiz container.
    pub fn mount(
        host: &dyn MountHost,
        catalog: Arc<QuizCatalog>,
        settings: QuizSettings,
        sink: Arc<dyn AnalyticsSink>,
    ) -> Option<Self> {
        let Some(container) = host.container(CONTAINER_ID) else {
            debug!(container = CONTAINER_ID, "no quiz container present, skipping mount");
            return None;
        };

        let quiz_id = resolve_quiz_id(container.attribute(QUIZ_ID_ATTRIBUTE), &settings);
        let session = QuizSession::start(quiz_id, catalog, settings, sink);
        Some(Self { session })
    }

    pub fn quiz_id(&self) -> &str {
        self.session.quiz_id()
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn view(&self) -> QuizView {
        self.session.view()
    }

    pub fn dispatch(&mut self, command: QuizCommand) -> Result<CommandOutcome, SessionError> {
        self.session.dispatch(command)
    }
}

/// Blank or missing identifiers fall back to the configured default.
pub fn resolve_quiz_id(requested: Option<&str>, settings: &QuizSettings) -> String {
    requested
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| settings.default_quiz_id.clone())
}
