use crate::infra::{parse_scripted_answer, ScriptedAnswer};
use clap::Args;
use pathway_quiz::config::AppConfig;
use pathway_quiz::error::AppError;
use pathway_quiz::quiz::views::{render_text, ResultsView};
use pathway_quiz::quiz::widget::resolve_quiz_id;
use pathway_quiz::quiz::{
    AnalyticsSink, QuizCatalog, QuizResults, QuizServiceError, QuizSession, QuizSettings,
    QuizView, SessionError, TracingAnalyticsSink,
};
use pathway_quiz::telemetry;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct PlayArgs {
    /// Quiz instance identifier reported with analytics events
    #[arg(long)]
    pub(crate) quiz_id: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Comma separated responses in question order: an answer id, `skip` or `not_sure`
    #[arg(long, value_delimiter = ',', value_parser = parse_scripted_answer)]
    pub(crate) answers: Vec<ScriptedAnswer>,
    /// Quiz instance identifier reported with analytics events
    #[arg(long)]
    pub(crate) quiz_id: Option<String>,
    /// Print the scored results as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
struct ScoreReport {
    results: QuizResults,
    view: ResultsView,
}

pub(crate) fn run_play(args: PlayArgs) -> Result<(), AppError> {
    let mut session = start_session(args.quiz_id.as_deref())?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    play_loop(&mut session, stdin.lock(), stdout.lock())?;
    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let mut session = start_session(args.quiz_id.as_deref())?;
    apply_answers(&mut session, &args.answers).map_err(QuizServiceError::from)?;
    let results = session.results().ok_or(QuizServiceError::NotComplete)?;

    let mut stdout = io::stdout().lock();
    if args.json {
        let QuizView::Results(view) = session.view() else {
            return Err(QuizServiceError::NotComplete.into());
        };
        serde_json::to_writer_pretty(&mut stdout, &ScoreReport { results, view })
            .map_err(io::Error::from)?;
        writeln!(stdout)?;
    } else {
        write!(stdout, "{}", render_text(&session.view()))?;
    }
    Ok(())
}

fn start_session(quiz_id: Option<&str>) -> Result<QuizSession, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let catalog = QuizCatalog::standard();
    catalog.validate()?;

    Ok(new_session(
        quiz_id,
        Arc::new(catalog),
        config.quiz,
        Arc::new(TracingAnalyticsSink),
    ))
}

fn new_session(
    quiz_id: Option<&str>,
    catalog: Arc<QuizCatalog>,
    settings: QuizSettings,
    sink: Arc<dyn AnalyticsSink>,
) -> QuizSession {
    let quiz_id = resolve_quiz_id(quiz_id, &settings);
    QuizSession::start(quiz_id, catalog, settings, sink)
}

/// Feed scripted responses through the session, one per question.
pub(crate) fn apply_answers(
    session: &mut QuizSession,
    answers: &[ScriptedAnswer],
) -> Result<(), SessionError> {
    for answer in answers {
        let question = session.current_question().ok_or(SessionError::Completed)?;
        let question_id = question.id;
        match answer {
            ScriptedAnswer::Skip => {
                session.skip(question_id)?;
            }
            ScriptedAnswer::NotSure => {
                let not_sure = question.not_sure_id();
                session.select_answer(question_id, &not_sure)?;
                session.advance();
            }
            ScriptedAnswer::Choose(answer_id) => {
                session.select_answer(question_id, answer_id)?;
                session.advance();
            }
        }
    }
    Ok(())
}

/// Line-driven terminal loop. Ends on `q` or end of input.
pub(crate) fn play_loop<I, O>(session: &mut QuizSession, input: I, mut output: O) -> io::Result<()>
where
    I: BufRead,
    O: Write,
{
    let mut lines = input.lines();
    loop {
        let view = session.view();
        writeln!(output, "\n{}", render_text(&view))?;
        match &view {
            QuizView::Question(step) => writeln!(
                output,
                "Choose 1-{}, b = back, s = skip, l = read all options, q = quit",
                step.options.len()
            )?,
            QuizView::Results(_) => {
                writeln!(output, "r = start again, l = read all options, q = quit")?
            }
        }
        output.flush()?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;
        let choice = line.trim();

        let result = match (&view, choice) {
            (_, "q") => return Ok(()),
            (_, "l") => {
                session.read_all_clicked();
                Ok(())
            }
            (QuizView::Results(_), "r") => {
                session.restart();
                Ok(())
            }
            (QuizView::Question(_), "b") => {
                session.retreat();
                Ok(())
            }
            (QuizView::Question(step), "s") => session.skip(&step.question_id).map(|_| ()),
            (QuizView::Question(step), number) => match number
                .parse::<usize>()
                .ok()
                .and_then(|position| position.checked_sub(1))
                .and_then(|index| step.options.get(index))
            {
                Some(option) => session
                    .select_answer(&step.question_id, &option.answer_id)
                    .map(|()| {
                        session.advance();
                    }),
                None => {
                    writeln!(output, "Unrecognised choice '{choice}'")?;
                    Ok(())
                }
            },
            (QuizView::Results(_), _) => {
                writeln!(output, "Unrecognised choice '{choice}'")?;
                Ok(())
            }
        };

        if let Err(err) = result {
            writeln!(output, "{err}")?;
        }
    }
}
