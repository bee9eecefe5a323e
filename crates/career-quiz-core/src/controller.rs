//! Interaction controller: turns user actions into requests and folds the
//! replies back into the view.
//!
//! Every action is split in two halves. [`Controller::start`] applies the
//! synchronous part and hands back the request to send; [`Controller::complete`]
//! takes the reply. Only one request can be outstanding at a time; actions
//! attempted in between are rejected with [`QuizError::RequestInFlight`].

use tracing::{debug, error, info, warn};

use crate::client::{AssessmentService, PendingRequest, Reply};
use crate::error::{ClientError, QuizError};
use crate::protocol::{AssessmentResponse, RevealRequest, StepOutcome};
use crate::session::{Checkpoint, Session};
use crate::view::{Region, View};

pub const EMPTY_CAREER_NOTICE: &str = "Please enter a career.";
pub const ANSWER_FETCH_ERROR: &str = "Error fetching answer.";
pub const REVIEW_PLACEHOLDER: &str = "Please review the resources below, then retry.";
pub const RESOURCES_HEADING: &str = "Learning Resources";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    AwaitingProgress,
    QuestionShown,
    AnswerRevealed,
    RemediationShown,
    ResultsShown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Begin(String),
    Reveal,
    Grade(bool),
    Retry,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Begin(_) => "begin",
            Action::Reveal => "reveal",
            Action::Grade(_) => "grade",
            Action::Retry => "retry",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    resume: Phase,
    checkpoint: Checkpoint,
}

pub struct Controller {
    session: Session,
    phase: Phase,
    question: Option<String>,
    in_flight: Option<InFlight>,
}

impl Controller {
    pub fn new(total_questions: u32) -> Self {
        Self {
            session: Session::new(total_questions),
            phase: Phase::Start,
            question: None,
            in_flight: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The question currently on screen, if any.
    pub fn question(&self) -> Option<&str> {
        self.question.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn start(&mut self, action: Action, view: &mut dyn View) -> Result<PendingRequest, QuizError> {
        if self.in_flight.is_some() {
            warn!(action = action.name(), "rejected action while a request is in flight");
            return Err(QuizError::RequestInFlight);
        }
        if self.phase == Phase::ResultsShown {
            return Err(QuizError::Finished);
        }

        match action {
            Action::Begin(career) => self.begin(&career, view),
            Action::Reveal => self.reveal(view),
            Action::Grade(correct) => self.grade(correct, view),
            Action::Retry => self.retry(view),
        }
    }

    /// Start, send, and complete in one go.
    pub async fn run<S>(
        &mut self,
        action: Action,
        service: &S,
        view: &mut dyn View,
    ) -> Result<(), QuizError>
    where
        S: AssessmentService + ?Sized,
    {
        let pending = self.start(action, view)?;
        let reply = pending.send(service).await;
        self.complete(reply, view);
        Ok(())
    }

    fn begin(&mut self, career: &str, view: &mut dyn View) -> Result<PendingRequest, QuizError> {
        self.require(&[Phase::Start], "begin")?;

        let checkpoint = self.session.checkpoint();
        if let Err(e) = self.session.begin(career) {
            if e == QuizError::EmptyCareer {
                view.set_text(Region::Notice, EMPTY_CAREER_NOTICE);
            }
            return Err(e);
        }
        info!(career = self.session.career(), "starting assessment");

        view.set_text(Region::Notice, "");
        view.hide(Region::StartView);
        view.show(Region::QuestionView);

        Ok(self.issue_progress(checkpoint, view))
    }

    fn reveal(&mut self, view: &mut dyn View) -> Result<PendingRequest, QuizError> {
        self.require(&[Phase::QuestionShown, Phase::AnswerRevealed], "reveal")?;
        let question = self.question.clone().ok_or(QuizError::NoQuestion)?;

        self.in_flight = Some(InFlight {
            resume: self.phase,
            checkpoint: self.session.checkpoint(),
        });
        view.show(Region::Loading);

        Ok(PendingRequest::Reveal(RevealRequest { question }))
    }

    fn grade(&mut self, correct: bool, view: &mut dyn View) -> Result<PendingRequest, QuizError> {
        self.require(&[Phase::QuestionShown, Phase::AnswerRevealed], "grade")?;
        let question = self.question.clone().ok_or(QuizError::NoQuestion)?;

        let checkpoint = self.session.checkpoint();
        self.session.record_answer(question, correct);
        debug!(correct, answered = self.session.answers().len(), "graded answer");

        Ok(self.issue_progress(checkpoint, view))
    }

    fn retry(&mut self, view: &mut dyn View) -> Result<PendingRequest, QuizError> {
        self.require(&[Phase::RemediationShown], "retry")?;

        let checkpoint = self.session.checkpoint();
        self.session.mark_retry();

        Ok(self.issue_progress(checkpoint, view))
    }

    fn require(&self, allowed: &[Phase], action: &'static str) -> Result<(), QuizError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(QuizError::Unavailable {
                action,
                phase: self.phase,
            })
        }
    }

    fn issue_progress(&mut self, checkpoint: Checkpoint, view: &mut dyn View) -> PendingRequest {
        self.in_flight = Some(InFlight {
            resume: self.phase,
            checkpoint,
        });
        self.phase = Phase::AwaitingProgress;
        view.show(Region::Loading);

        let request = self.session.progress_request();
        debug!(?request, "progress request");
        PendingRequest::Progress(request)
    }

    /// Fold a reply into the session and the view.
    pub fn complete(&mut self, reply: Reply, view: &mut dyn View) {
        view.hide(Region::Loading);

        let Some(in_flight) = self.in_flight.take() else {
            warn!("dropping reply with no request in flight");
            return;
        };

        match reply {
            Reply::Progress(Ok(response)) => self.apply_progress(response, in_flight, view),
            Reply::Progress(Err(e)) => self.abort_progress(&e, in_flight, view),
            Reply::Reveal(result) => self.apply_reveal(result, in_flight, view),
        }
    }

    fn apply_progress(&mut self, response: AssessmentResponse, in_flight: InFlight, view: &mut dyn View) {
        let stage = response.stage.clone();
        let outcome = response.classify();
        info!(branch = outcome.label(), "assessment response");

        match outcome {
            StepOutcome::Terminal { message, resources } => {
                self.session.note_stage(stage);
                view.hide(Region::QuestionView);
                view.hide(Region::StartView);
                view.set_text(Region::Message, &message);
                view.set_list(Region::Results, &resources);
                view.show(Region::ResultsView);
                self.question = None;
                self.phase = Phase::ResultsShown;
            }
            StepOutcome::Remediation { message, resources } => {
                self.session.note_stage(stage);
                view.set_text(Region::Message, &message);
                view.set_text(Region::Question, REVIEW_PLACEHOLDER);
                view.hide(Region::RevealControl);
                view.hide(Region::AnswerPanel);
                view.hide(Region::CorrectControl);
                view.hide(Region::IncorrectControl);
                view.show(Region::RetryControl);
                view.set_text(Region::ResourcesPanel, RESOURCES_HEADING);
                view.set_list(Region::ResourcesPanel, &resources);
                view.show(Region::ResourcesPanel);
                self.question = None;
                self.phase = Phase::RemediationShown;
            }
            StepOutcome::NextQuestion { message, question } => {
                self.session.note_stage(stage);
                view.set_text(Region::Message, &message);
                view.set_text(Region::Question, &question);
                view.hide(Region::AnswerPanel);
                view.set_text(Region::AnswerPanel, "");
                view.hide(Region::RetryControl);
                view.show(Region::RevealControl);
                view.show(Region::CorrectControl);
                view.show(Region::IncorrectControl);
                view.set_list(Region::ResourcesPanel, &[]);
                view.hide(Region::ResourcesPanel);
                self.question = Some(question);
                self.phase = Phase::QuestionShown;
            }
            StepOutcome::Unrecognized if in_flight.resume == Phase::Start => {
                warn!("first assessment response matched no branch; back to start");
                self.rewind(in_flight, view);
            }
            StepOutcome::Unrecognized => {
                warn!("assessment response matched no branch; keeping current view");
                self.phase = in_flight.resume;
            }
        }

        if let Some(stage) = self.session.stage() {
            view.set_text(Region::Stage, stage);
        }
    }

    fn abort_progress(&mut self, e: &ClientError, in_flight: InFlight, view: &mut dyn View) {
        error!(error = %e, "progress request failed");
        self.rewind(in_flight, view);
    }

    /// Undo the action that issued `in_flight`.
    fn rewind(&mut self, in_flight: InFlight, view: &mut dyn View) {
        self.session.restore(in_flight.checkpoint);
        self.phase = in_flight.resume;

        // Begin already switched views; put the start view back so the
        // action can be triggered again.
        if self.phase == Phase::Start {
            view.hide(Region::QuestionView);
            view.show(Region::StartView);
        }
    }

    fn apply_reveal(&mut self, result: Result<String, ClientError>, in_flight: InFlight, view: &mut dyn View) {
        let answer = match result {
            Ok(answer) => answer,
            Err(e) => {
                error!(error = %e, "reveal-answer request failed");
                ANSWER_FETCH_ERROR.to_string()
            }
        };

        view.set_text(Region::AnswerPanel, &answer);
        view.show(Region::AnswerPanel);
        self.phase = match in_flight.resume {
            Phase::QuestionShown | Phase::AnswerRevealed => Phase::AnswerRevealed,
            other => other,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewState;

    #[test]
    fn empty_career_sets_notice_without_request() {
        let mut controller = Controller::new(3);
        let mut view = ViewState::new();

        let result = controller.start(Action::Begin("   ".into()), &mut view);

        assert_eq!(result, Err(QuizError::EmptyCareer));
        assert_eq!(view.text(Region::Notice), EMPTY_CAREER_NOTICE);
        assert!(view.is_visible(Region::StartView));
        assert!(!view.is_visible(Region::Loading));
        assert_eq!(controller.phase(), Phase::Start);
        assert!(!controller.is_busy());
    }

    #[test]
    fn begin_switches_view_and_shows_loading() {
        let mut controller = Controller::new(3);
        let mut view = ViewState::new();

        let pending = controller.start(Action::Begin("Nurse".into()), &mut view).unwrap();

        let PendingRequest::Progress(request) = pending else {
            panic!("begin must issue a progress request");
        };
        assert_eq!(request.career, "Nurse");
        assert!(request.previous_answers.is_empty());
        assert!(!request.is_retry);
        assert_eq!(controller.phase(), Phase::AwaitingProgress);
        assert!(view.is_visible(Region::QuestionView));
        assert!(!view.is_visible(Region::StartView));
        assert!(view.is_visible(Region::Loading));
    }

    #[test]
    fn second_action_while_busy_is_rejected() {
        let mut controller = Controller::new(3);
        let mut view = ViewState::new();
        controller.start(Action::Begin("Nurse".into()), &mut view).unwrap();

        assert_eq!(
            controller.start(Action::Begin("Nurse".into()), &mut view),
            Err(QuizError::RequestInFlight)
        );
        assert_eq!(
            controller.start(Action::Grade(true), &mut view),
            Err(QuizError::RequestInFlight)
        );
        assert!(controller.session().answers().is_empty());
    }

    #[test]
    fn grade_before_question_is_unavailable() {
        let mut controller = Controller::new(3);
        let mut view = ViewState::new();

        let result = controller.start(Action::Grade(true), &mut view);
        assert_eq!(
            result,
            Err(QuizError::Unavailable {
                action: "grade",
                phase: Phase::Start,
            })
        );
    }

    #[test]
    fn stray_reply_only_hides_loading() {
        let mut controller = Controller::new(3);
        let mut view = ViewState::new();
        view.show(Region::Loading);

        controller.complete(Reply::Reveal(Ok("42".into())), &mut view);

        assert!(!view.is_visible(Region::Loading));
        assert!(!view.is_visible(Region::AnswerPanel));
        assert_eq!(controller.phase(), Phase::Start);
    }
}
