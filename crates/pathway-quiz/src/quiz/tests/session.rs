use std::sync::Arc;

use super::common::{answer_in_order, session_with, standard_catalog, standard_session, FailingSink};
use crate::quiz::analytics::{QuizEvent, ReadAllContext};
use crate::quiz::domain::{AnswerRecord, OutcomeId};
use crate::quiz::session::{
    CommandOutcome, NavigationOutcome, QuizCommand, QuizSession, SessionError, SessionPhase,
    SessionState,
};
use crate::quiz::settings::QuizSettings;
use crate::quiz::views::QuizView;

const FULL_RUN: [&str; 6] = ["q1a1", "q2a1", "q3a2", "q4a1", "q5a3", "q6a1"];

#[test]
fn start_emits_quiz_start_and_shows_first_question() {
    let (session, sink) = standard_session();

    assert_eq!(sink.names(), vec!["quiz_start"]);
    assert_eq!(session.phase(), SessionPhase::InProgress { step: 0 });
    assert_eq!(session.current_question().map(|q| q.id), Some("q1"));
    assert!(session.answers().is_empty());
}

#[test]
fn advance_requires_an_answer_for_the_current_question() {
    let (mut session, sink) = standard_session();

    assert_eq!(session.advance(), NavigationOutcome::Unchanged);
    assert_eq!(session.step_index(), 0);

    session.select_answer("q1", "q1a2").expect("answer accepted");
    assert_eq!(session.advance(), NavigationOutcome::Moved { step: 1 });
    assert_eq!(sink.names(), vec!["quiz_start", "quiz_answer"]);
}

#[test]
fn retreat_at_first_question_is_a_no_op() {
    let (mut session, _sink) = standard_session();
    assert_eq!(session.retreat(), NavigationOutcome::Unchanged);
    assert_eq!(session.step_index(), 0);
}

#[test]
fn retreat_keeps_recorded_answers() {
    let (mut session, _sink) = standard_session();
    answer_in_order(&mut session, &["q1a1", "q2a2"]);

    assert_eq!(session.retreat(), NavigationOutcome::Moved { step: 1 });
    assert_eq!(session.current_record(), Some(&AnswerRecord::chosen("q2a2")));
    assert_eq!(session.answers().answered_count(), 2);
}

#[test]
fn selecting_again_overwrites_the_previous_choice() {
    let (mut session, _sink) = standard_session();
    session.select_answer("q1", "q1a1").expect("first choice");
    session.select_answer("q1", "q1a5").expect("second choice");

    assert_eq!(session.current_record(), Some(&AnswerRecord::chosen("q1a5")));
    assert_eq!(session.answers().answered_count(), 1);
}

#[test]
fn repeating_the_recorded_answer_emits_nothing() {
    let (mut session, sink) = standard_session();
    session.select_answer("q1", "q1a1").expect("first choice");
    session.select_answer("q1", "q1a1").expect("same choice");

    let not_sure = "q1_not_sure";
    session.select_answer("q1", not_sure).expect("switch to not sure");
    session.select_answer("q1", not_sure).expect("not sure again");

    assert_eq!(
        sink.names(),
        vec!["quiz_start", "quiz_answer", "quiz_not_sure"]
    );
    assert_eq!(session.current_record(), Some(&AnswerRecord::Unsure));
}

#[test]
fn reselecting_after_going_back_is_not_reported_again() {
    let (mut session, sink) = standard_session();
    answer_in_order(&mut session, &["q1a2"]);
    session.retreat();

    session.select_answer("q1", "q1a2").expect("same choice");

    let answers = sink
        .names()
        .into_iter()
        .filter(|name| *name == "quiz_answer")
        .count();
    assert_eq!(answers, 1);
}

#[test]
fn not_sure_is_recorded_but_not_counted_as_answered() {
    let (mut session, sink) = standard_session();
    let not_sure = session.current_question().expect("question").not_sure_id();

    session.select_answer("q1", &not_sure).expect("not sure accepted");

    assert_eq!(session.current_record(), Some(&AnswerRecord::Unsure));
    assert_eq!(session.answers().answered_count(), 0);
    assert_eq!(session.advance(), NavigationOutcome::Moved { step: 1 });
    assert_eq!(sink.names(), vec!["quiz_start", "quiz_not_sure"]);
}

#[test]
fn rejects_answers_for_other_questions_without_side_effects() {
    let (mut session, sink) = standard_session();
    let before = session.state().clone();

    let err = session
        .select_answer("q2", "q2a1")
        .expect_err("q2 is not current");
    assert_eq!(
        err,
        SessionError::NotCurrentQuestion {
            expected: "q1".to_string(),
            received: "q2".to_string(),
        }
    );

    let err = session
        .select_answer("q1", "q2a1")
        .expect_err("answer belongs to q2");
    assert!(matches!(err, SessionError::UnknownAnswer { .. }));

    assert_eq!(session.state(), &before);
    assert_eq!(sink.names(), vec!["quiz_start"]);
}

#[test]
fn skip_records_and_advances() {
    let (mut session, sink) = standard_session();

    let outcome = session.skip("q1").expect("skip allowed");

    assert_eq!(outcome, NavigationOutcome::Moved { step: 1 });
    assert_eq!(session.answers().get(0), Some(&AnswerRecord::Skipped));
    assert_eq!(sink.names(), vec!["quiz_start", "quiz_skip"]);
}

#[test]
fn skip_is_rejected_when_disabled() {
    let settings = QuizSettings {
        allow_skip: false,
        ..QuizSettings::default()
    };
    let (mut session, sink) = session_with(standard_catalog(), settings);

    assert_eq!(session.skip("q1"), Err(SessionError::SkipDisabled));
    assert_eq!(session.step_index(), 0);
    assert_eq!(sink.names(), vec!["quiz_start"]);
}

#[test]
fn completing_emits_quiz_complete_once() {
    let (mut session, sink) = standard_session();
    answer_in_order(&mut session, &FULL_RUN);

    assert!(session.is_complete());
    assert_eq!(session.phase(), SessionPhase::Completed);
    assert_eq!(session.advance(), NavigationOutcome::Unchanged);

    let completions: Vec<QuizEvent> = sink
        .events()
        .into_iter()
        .filter(|event| event.name() == "quiz_complete")
        .collect();
    assert_eq!(
        completions,
        vec![QuizEvent::Complete {
            quiz_id: "careers-test".to_string(),
            top_outcome: Some(OutcomeId::DirectEmployment),
            second_outcome: Some(OutcomeId::Apprenticeships),
            question_count: 6,
            answered_count: 6,
        }]
    );
}

#[test]
fn completed_session_only_accepts_restart() {
    let (mut session, sink) = standard_session();
    answer_in_order(&mut session, &FULL_RUN);
    sink.clear();

    assert_eq!(
        session.select_answer("q6", "q6a2"),
        Err(SessionError::Completed)
    );
    assert_eq!(session.skip("q6"), Err(SessionError::Completed));
    assert_eq!(session.retreat(), NavigationOutcome::Unchanged);
    assert!(session.is_complete());
    assert!(sink.events().is_empty());
}

#[test]
fn restart_after_completion_returns_to_a_fresh_state() {
    let (mut session, sink) = standard_session();
    answer_in_order(&mut session, &FULL_RUN);

    session.restart();

    assert_eq!(session.state(), &SessionState::new(6));
    assert_eq!(session.phase(), SessionPhase::InProgress { step: 0 });
    assert!(session.results().is_none());
    assert_eq!(sink.names().last(), Some(&"quiz_restart"));
}

#[test]
fn restart_is_idempotent() {
    let (mut session, sink) = standard_session();
    answer_in_order(&mut session, &["q1a1", "q2a3"]);

    session.restart();
    let once = session.state().clone();
    session.restart();

    assert_eq!(session.state(), &once);
    let restarts = sink
        .names()
        .into_iter()
        .filter(|name| *name == "quiz_restart")
        .count();
    assert_eq!(restarts, 2);
}

#[test]
fn read_all_context_depends_on_phase() {
    let (mut session, sink) = standard_session();

    assert_eq!(session.read_all_clicked(), ReadAllContext::InlineLink);
    answer_in_order(&mut session, &FULL_RUN);
    assert_eq!(session.read_all_clicked(), ReadAllContext::InlineLinkResults);

    let contexts: Vec<ReadAllContext> = sink
        .events()
        .into_iter()
        .filter_map(|event| match event {
            QuizEvent::ReadAllClick { context, .. } => Some(context),
            _ => None,
        })
        .collect();
    assert_eq!(
        contexts,
        vec![ReadAllContext::InlineLink, ReadAllContext::InlineLinkResults]
    );
}

#[test]
fn dispatch_maps_commands_to_outcomes() {
    let (mut session, _sink) = standard_session();

    let recorded = session
        .dispatch(QuizCommand::SelectAnswer {
            question_id: "q1".to_string(),
            answer_id: "q1a3".to_string(),
        })
        .expect("select");
    assert_eq!(recorded, CommandOutcome::Recorded);

    let moved = session.dispatch(QuizCommand::Advance).expect("advance");
    assert_eq!(
        moved,
        CommandOutcome::Navigated(NavigationOutcome::Moved { step: 1 })
    );

    assert_eq!(
        session.dispatch(QuizCommand::ReadAll),
        Ok(CommandOutcome::LinkTracked)
    );
    assert_eq!(
        session.dispatch(QuizCommand::Restart),
        Ok(CommandOutcome::Restarted)
    );
}

#[test]
fn sink_failures_do_not_interrupt_the_flow() {
    let mut session = QuizSession::start(
        "careers-test",
        standard_catalog(),
        QuizSettings::default(),
        Arc::new(FailingSink),
    );
    answer_in_order(&mut session, &FULL_RUN);
    assert!(session.results().is_some());
}

#[test]
fn resume_clamps_out_of_range_steps_and_stays_silent() {
    let (_session, sink) = standard_session();
    sink.clear();

    let mut state = SessionState::new(6);
    state.step_index = 42;
    let session = QuizSession::resume(
        "careers-test",
        standard_catalog(),
        QuizSettings::default(),
        Arc::new(sink.clone()),
        state,
    );

    assert_eq!(session.step_index(), 6);
    assert!(session.is_complete());
    assert!(sink.events().is_empty());
}

#[test]
fn view_switches_to_results_after_last_question() {
    let (mut session, _sink) = standard_session();

    let QuizView::Question(step) = session.view() else {
        panic!("expected question view");
    };
    assert_eq!(step.progress_label, "Question 1 of 6");
    assert!(!step.back_enabled);
    assert!(!step.next_enabled);
    assert!(step.skip_enabled);
    let last = step.options.last().expect("options");
    assert!(last.not_sure);
    assert_eq!(last.answer_id, "q1_not_sure");

    answer_in_order(&mut session, &FULL_RUN[..5]);
    let QuizView::Question(step) = session.view() else {
        panic!("expected question view");
    };
    assert_eq!(step.next_label, "See results");

    answer_in_order(&mut session, &FULL_RUN[5..]);
    assert!(session.view().is_results());
}
