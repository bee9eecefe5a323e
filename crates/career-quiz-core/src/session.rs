//! Session record for one run of the quiz.
//!
//! Passive data: the controller is the only writer and decides when each
//! mutation is allowed.

use crate::error::QuizError;
use crate::protocol::{AnsweredQuestion, ProgressRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    career: String,
    answers: Vec<AnsweredQuestion>,
    total_questions: u32,
    is_retry: bool,
    stage: Option<String>,
}

/// Snapshot taken before an action so a failed exchange can be undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    started: bool,
    answers: usize,
    is_retry: bool,
}

impl Session {
    pub fn new(total_questions: u32) -> Self {
        Self {
            career: String::new(),
            answers: Vec::new(),
            total_questions,
            is_retry: false,
            stage: None,
        }
    }

    pub fn career(&self) -> &str {
        &self.career
    }

    pub fn answers(&self) -> &[AnsweredQuestion] {
        &self.answers
    }

    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    pub fn is_retry(&self) -> bool {
        self.is_retry
    }

    pub fn stage(&self) -> Option<&str> {
        self.stage.as_deref()
    }

    pub fn is_started(&self) -> bool {
        !self.career.is_empty()
    }

    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.correct).count()
    }

    /// Set the career. Only the first call succeeds.
    pub fn begin(&mut self, career: &str) -> Result<(), QuizError> {
        if self.is_started() {
            return Err(QuizError::AlreadyStarted);
        }
        let career = career.trim();
        if career.is_empty() {
            return Err(QuizError::EmptyCareer);
        }
        self.career = career.to_string();
        Ok(())
    }

    pub fn record_answer(&mut self, question: impl Into<String>, correct: bool) {
        self.answers.push(AnsweredQuestion {
            question: question.into(),
            correct,
        });
        self.is_retry = false;
    }

    pub fn mark_retry(&mut self) {
        self.is_retry = true;
    }

    /// Remember the stage the service reported. A missing stage keeps the
    /// previous one.
    pub fn note_stage(&mut self, stage: Option<String>) {
        if let Some(stage) = stage.filter(|s| !s.trim().is_empty()) {
            self.stage = Some(stage);
        }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            started: self.is_started(),
            answers: self.answers.len(),
            is_retry: self.is_retry,
        }
    }

    /// Roll back to `checkpoint`. Records added since are dropped; records
    /// that existed at the checkpoint are never touched.
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        if !checkpoint.started {
            self.career.clear();
        }
        self.answers.truncate(checkpoint.answers);
        self.is_retry = checkpoint.is_retry;
    }

    pub fn progress_request(&self) -> ProgressRequest {
        ProgressRequest {
            career: self.career.clone(),
            previous_answers: self.answers.clone(),
            total_questions: self.total_questions,
            is_retry: self.is_retry,
            current_stage: self.stage.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_empty() {
        let session = Session::new(3);
        assert_eq!(session.career(), "");
        assert!(session.answers().is_empty());
        assert_eq!(session.total_questions(), 3);
        assert!(!session.is_retry());
        assert!(!session.is_started());
    }

    #[test]
    fn career_is_set_once() {
        let mut session = Session::new(3);
        assert_eq!(session.begin("  "), Err(QuizError::EmptyCareer));
        session.begin(" Data Analyst ").unwrap();
        assert_eq!(session.career(), "Data Analyst");
        assert_eq!(session.begin("Chef"), Err(QuizError::AlreadyStarted));
        assert_eq!(session.career(), "Data Analyst");
    }

    #[test]
    fn answering_clears_retry() {
        let mut session = Session::new(3);
        session.begin("Chef").unwrap();
        session.mark_retry();
        assert!(session.is_retry());
        session.record_answer("How hot is a grill?", false);
        assert!(!session.is_retry());
        assert_eq!(session.answers().len(), 1);
        assert_eq!(session.correct_count(), 0);
    }

    #[test]
    fn restore_drops_only_new_records() {
        let mut session = Session::new(3);
        session.begin("Chef").unwrap();
        session.record_answer("Q1", true);
        session.mark_retry();

        let checkpoint = session.checkpoint();
        session.record_answer("Q2", false);
        session.restore(checkpoint);

        assert_eq!(session.answers().len(), 1);
        assert_eq!(session.answers()[0].question, "Q1");
        assert!(session.is_retry());
        assert_eq!(session.career(), "Chef");
    }

    #[test]
    fn restore_before_begin_unsets_career() {
        let mut session = Session::new(3);
        let checkpoint = session.checkpoint();
        session.begin("Chef").unwrap();
        session.restore(checkpoint);
        assert!(!session.is_started());
        session.begin("Welder").unwrap();
        assert_eq!(session.career(), "Welder");
    }

    #[test]
    fn stage_is_echoed_and_kept() {
        let mut session = Session::new(2);
        session.begin("Chef").unwrap();
        assert_eq!(session.progress_request().current_stage, None);

        session.note_stage(Some("level_1".into()));
        session.note_stage(None);
        session.note_stage(Some(String::new()));

        let request = session.progress_request();
        assert_eq!(request.current_stage.as_deref(), Some("level_1"));
        assert_eq!(request.total_questions, 2);
        assert_eq!(request.career, "Chef");
    }
}
