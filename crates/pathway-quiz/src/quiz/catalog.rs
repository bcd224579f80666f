use super::domain::{AnswerOption, Outcome, OutcomeId, OutcomeLink, Question};
use std::collections::BTreeSet;

/// Static quiz content: the ordered question sequence and every outcome record.
#[derive(Debug, Clone)]
pub struct QuizCatalog {
    questions: Vec<Question>,
    outcomes: Vec<Outcome>,
}

/// Content mistakes caught when a catalog is loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog declares no questions")]
    NoQuestions,
    #[error("question id '{0}' is declared more than once")]
    DuplicateQuestion(String),
    #[error("question '{0}' has no answers")]
    EmptyQuestion(String),
    #[error("answer id '{answer_id}' is declared more than once in question '{question_id}'")]
    DuplicateAnswer {
        question_id: String,
        answer_id: String,
    },
    #[error("answer id '{answer_id}' in '{question_id}' clashes with the not-sure option")]
    ReservedAnswerId {
        question_id: String,
        answer_id: String,
    },
    #[error("outcome '{0}' is declared more than once")]
    DuplicateOutcome(OutcomeId),
    #[error("outcome '{0}' has no display record")]
    MissingOutcome(OutcomeId),
}

impl QuizCatalog {
    pub fn new(questions: Vec<Question>, outcomes: Vec<Outcome>) -> Result<Self, CatalogError> {
        let catalog = Self {
            questions,
            outcomes,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The career pathway quiz published on the website.
    pub fn standard() -> Self {
        Self {
            questions: standard_questions(),
            outcomes: standard_outcomes(),
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.questions.is_empty() {
            return Err(CatalogError::NoQuestions);
        }

        let mut question_ids = BTreeSet::new();
        for question in &self.questions {
            if !question_ids.insert(question.id) {
                return Err(CatalogError::DuplicateQuestion(question.id.to_string()));
            }
            if question.answers.is_empty() {
                return Err(CatalogError::EmptyQuestion(question.id.to_string()));
            }

            let mut answer_ids = BTreeSet::new();
            for answer in &question.answers {
                if question.is_not_sure(answer.id) {
                    return Err(CatalogError::ReservedAnswerId {
                        question_id: question.id.to_string(),
                        answer_id: answer.id.to_string(),
                    });
                }
                if !answer_ids.insert(answer.id) {
                    return Err(CatalogError::DuplicateAnswer {
                        question_id: question.id.to_string(),
                        answer_id: answer.id.to_string(),
                    });
                }
            }
        }

        let mut declared = BTreeSet::new();
        for outcome in &self.outcomes {
            if !declared.insert(outcome.id) {
                return Err(CatalogError::DuplicateOutcome(outcome.id));
            }
        }
        if let Some(missing) = OutcomeId::ordered()
            .into_iter()
            .find(|outcome| !declared.contains(outcome))
        {
            return Err(CatalogError::MissingOutcome(missing));
        }

        Ok(())
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn position(&self, question_id: &str) -> Option<usize> {
        self.questions
            .iter()
            .position(|question| question.id == question_id)
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn outcome(&self, id: OutcomeId) -> Option<&Outcome> {
        self.outcomes.iter().find(|outcome| outcome.id == id)
    }
}

impl Default for QuizCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_outcomes() -> Vec<Outcome> {
    vec![
        Outcome {
            id: OutcomeId::DirectEmployment,
            title: "Direct employment",
            summary: "Some people are ready to go straight into work. They can apply for \
                entry-level jobs that don’t always need lots of qualifications, like \
                retail, hospitality, customer service, or warehouse work. These jobs \
                help them build experience and transferable skills.",
            links: vec![OutcomeLink {
                text: "Entry-level opportunities",
                href: "https://www.skillsconnect.org.uk/entry-level-opportunities/",
            }],
            accent: "var(--col12)",
        },
        Outcome {
            id: OutcomeId::Apprenticeships,
            title: "Apprenticeships",
            summary: "An apprenticeship means learning on the job while also studying towards \
                a qualification.\n\nThey’re paid, so you can earn while you learn. \
                Apprenticeships are available in almost every sector from construction, \
                health and care, digital, business, creative industries, and more.",
            links: vec![OutcomeLink {
                text: "Apprenticeship levels",
                href: "https://www.skillsconnect.org.uk/apprenticeships/#levels",
            }],
            accent: "var(--col5)",
        },
        Outcome {
            id: OutcomeId::PreEmployment,
            title: "Pre-employment programmes",
            summary: "These are short programmes designed to help young people build \
                confidence, improve skills like CV writing or interview techniques, and \
                get some work experience. They’re often a stepping stone into \
                apprenticeships or jobs.",
            links: Vec::new(),
            accent: "var(--col3)",
        },
        Outcome {
            id: OutcomeId::SupportedInternships,
            title: "Supported internships",
            summary: "For young people with additional needs, supported internships combine \
                work placements with extra help from a job coach or mentor. They’re \
                designed to make the transition into paid work smoother and more \
                achievable.",
            links: vec![OutcomeLink {
                text: "Guide to supported internships",
                href: "https://www.skillsconnect.org.uk/find-your-direction/internships/guide-to-supported-internships/",
            }],
            accent: "var(--col10)",
        },
        Outcome {
            id: OutcomeId::CollegeTraining,
            title: "College or further training leading to work",
            summary: "Some may choose to carry on with a course at college—like a vocational \
                qualification (e.g. plumbing, childcare, health & social care, \
                hairdressing) with a clear route into jobs in that sector.",
            links: Vec::new(),
            accent: "var(--col2)",
        },
        Outcome {
            id: OutcomeId::Volunteering,
            title: "Work experience & volunteering",
            summary: "Although unpaid, volunteering and short work experience placements are a \
                great way to build confidence, skills, and connections. It often makes a \
                young person’s CV stand out to future employers.",
            links: Vec::new(),
            accent: "var(--col6)",
        },
        Outcome {
            id: OutcomeId::GraduateRoutes,
            title: "Graduate schemes or higher-level routes",
            summary: "For those who go on to university or higher education, graduate schemes \
                and internships are a route into professional roles with structured \
                training and progression.",
            links: vec![OutcomeLink {
                text: "Internships",
                href: "https://www.skillsconnect.org.uk/find-your-direction/internships/",
            }],
            accent: "var(--col7)",
        },
        Outcome {
            id: OutcomeId::SelfEmployed,
            title: "Self-employment or starting a business",
            summary: "Some young people may want to set up their own business or work \
                freelance (common in areas like digital, design, or creative \
                industries). There are schemes that offer advice, mentoring, and \
                sometimes funding to help.",
            links: Vec::new(),
            accent: "var(--col8)",
        },
        Outcome {
            id: OutcomeId::EmploymentSupport,
            title: "Help from employment support services",
            summary: "There are also specialist services (like Jobcentre Plus Youth Hubs, \
                local council projects, or voluntary organisations) that provide \
                tailored advice, coaching, and links to employers for young people \
                struggling to find the right path.\n\nSkills Connect can also help you \
                find work, improve your CV and prepare for interviews.",
            links: vec![OutcomeLink {
                text: "Speak to Skills Connect",
                href: "https://www.skillsconnect.org.uk/contact-us/speak-to-us/",
            }],
            accent: "var(--col13)",
        },
    ]
}

fn standard_questions() -> Vec<Question> {
    use OutcomeId::*;

    vec![
        Question {
            id: "q1",
            prompt: "What matters most right now?",
            answers: vec![
                AnswerOption::new(
                    "q1a1",
                    "Getting paid soon",
                    &[(DirectEmployment, 2), (Apprenticeships, 2)],
                ),
                AnswerOption::new(
                    "q1a2",
                    "Building confidence first",
                    &[(PreEmployment, 2), (Volunteering, 1)],
                ),
                AnswerOption::new(
                    "q1a3",
                    "Getting a qualification first",
                    &[(CollegeTraining, 2), (GraduateRoutes, 1)],
                ),
                AnswerOption::new(
                    "q1a4",
                    "Extra help at work or on placement",
                    &[(SupportedInternships, 3)],
                ),
                AnswerOption::new("q1a5", "Starting my own thing", &[(SelfEmployed, 3)]),
            ],
        },
        Question {
            id: "q2",
            prompt: "How do you feel about studying in the next 6 to 12 months?",
            answers: vec![
                AnswerOption::new(
                    "q2a1",
                    "I’d rather work than study",
                    &[(DirectEmployment, 2), (Apprenticeships, 1)],
                ),
                AnswerOption::new(
                    "q2a2",
                    "I’ll study if it leads to a job",
                    &[(CollegeTraining, 2), (Apprenticeships, 1)],
                ),
                AnswerOption::new(
                    "q2a3",
                    "I need to build up first",
                    &[(PreEmployment, 2), (Volunteering, 1)],
                ),
            ],
        },
        Question {
            id: "q3",
            prompt: "What kind of help would be most useful?",
            answers: vec![
                AnswerOption::new(
                    "q3a1",
                    "Advice, coaching and links to employers",
                    &[(EmploymentSupport, 3)],
                ),
                AnswerOption::new(
                    "q3a2",
                    "A paid role with training built in",
                    &[(Apprenticeships, 2), (DirectEmployment, 1)],
                ),
                AnswerOption::new(
                    "q3a3",
                    "A short programme to build skills",
                    &[(PreEmployment, 2)],
                ),
                AnswerOption::new(
                    "q3a4",
                    "Clear steps after a course",
                    &[(CollegeTraining, 2), (GraduateRoutes, 1)],
                ),
                AnswerOption::new(
                    "q3a5",
                    "Business mentoring or startup advice",
                    &[(SelfEmployed, 2)],
                ),
            ],
        },
        Question {
            id: "q4",
            prompt: "How soon do you need income?",
            answers: vec![
                AnswerOption::new(
                    "q4a1",
                    "Right away",
                    &[(DirectEmployment, 2), (Apprenticeships, 2)],
                ),
                AnswerOption::new(
                    "q4a2",
                    "Soon, after some prep",
                    &[(PreEmployment, 2), (Volunteering, 1)],
                ),
                AnswerOption::new(
                    "q4a3",
                    "I can study first",
                    &[(CollegeTraining, 2), (GraduateRoutes, 1)],
                ),
            ],
        },
        Question {
            id: "q5",
            prompt: "Do you have an EHCP or think you may need workplace support?",
            answers: vec![
                AnswerOption::new(
                    "q5a1",
                    "Yes",
                    &[(SupportedInternships, 3), (EmploymentSupport, 1)],
                ),
                AnswerOption::new("q5a2", "Not sure", &[(EmploymentSupport, 2)]),
                AnswerOption::new("q5a3", "No", &[]),
            ],
        },
        Question {
            id: "q6",
            prompt: "Which sounds closest to you?",
            answers: vec![
                AnswerOption::new("q6a1", "Apply for jobs now", &[(DirectEmployment, 2)]),
                AnswerOption::new("q6a2", "Earn and learn", &[(Apprenticeships, 2)]),
                AnswerOption::new(
                    "q6a3",
                    "Study a course that leads to work",
                    &[(CollegeTraining, 2)],
                ),
                AnswerOption::new(
                    "q6a4",
                    "Build confidence and experience",
                    &[(PreEmployment, 1), (Volunteering, 1)],
                ),
                AnswerOption::new("q6a5", "Be self-employed or freelance", &[(SelfEmployed, 2)]),
            ],
        },
    ]
}
