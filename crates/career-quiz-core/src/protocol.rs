//! Wire types for the assessment service and response classification.
//!
//! The service does not tag its responses. Which branch a response belongs
//! to is inferred from the fields it fills in, so every response goes
//! through [`AssessmentResponse::classify`] exactly once and the rest of the
//! client works on the closed [`StepOutcome`] set.

use serde::{Deserialize, Serialize};

/// One graded question in the session history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub question: String,
    pub correct: bool,
}

/// Body of `POST /career-assessment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRequest {
    pub career: String,
    pub previous_answers: Vec<AnsweredQuestion>,
    pub total_questions: u32,
    pub is_retry: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_stage: Option<String>,
}

/// Body of `POST /reveal-answer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealRequest {
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RevealResponse {
    pub answer: String,
}

/// A learning resource or, on the final step, a job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Resource {
    /// The link if the service sent a usable one.
    pub fn href(&self) -> Option<&str> {
        self.link.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }
}

/// Raw response of `POST /career-assessment`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AssessmentResponse {
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub next_question: Option<String>,
    #[serde(default)]
    pub resources: Option<Vec<Resource>>,
    #[serde(default)]
    pub final_step: bool,
    #[serde(default)]
    pub answer: Option<String>,
}

/// The branch a progress response selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Assessment complete; `resources` are the results to list.
    Terminal {
        message: String,
        resources: Vec<Resource>,
    },
    /// The user has to review `resources` before retrying.
    Remediation {
        message: String,
        resources: Vec<Resource>,
    },
    /// Normal progression to `question`.
    NextQuestion { message: String, question: String },
    /// Nothing usable in the response.
    Unrecognized,
}

impl StepOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            StepOutcome::Terminal { .. } => "terminal",
            StepOutcome::Remediation { .. } => "remediation",
            StepOutcome::NextQuestion { .. } => "next-question",
            StepOutcome::Unrecognized => "unrecognized",
        }
    }
}

impl AssessmentResponse {
    /// Pick the single branch this response stands for.
    ///
    /// The final-step marker wins over everything, then a non-empty resource
    /// list, then a non-blank question. An empty resource list counts as
    /// absent.
    pub fn classify(self) -> StepOutcome {
        let message = self.message.unwrap_or_default();
        let resources = self.resources.unwrap_or_default();

        if self.final_step {
            return StepOutcome::Terminal { message, resources };
        }
        if !resources.is_empty() {
            return StepOutcome::Remediation { message, resources };
        }
        match self.next_question {
            Some(question) if !question.trim().is_empty() => {
                StepOutcome::NextQuestion { message, question }
            }
            _ => StepOutcome::Unrecognized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resource(title: &str) -> Resource {
        Resource {
            kind: "course".to_string(),
            title: title.to_string(),
            link: Some(format!("https://example.com/{title}")),
        }
    }

    #[test]
    fn final_step_is_terminal_even_with_question() {
        let response = AssessmentResponse {
            final_step: true,
            next_question: Some("ignored?".into()),
            resources: Some(vec![resource("a"), resource("b")]),
            message: Some("Done".into()),
            ..Default::default()
        };

        match response.classify() {
            StepOutcome::Terminal { message, resources } => {
                assert_eq!(message, "Done");
                assert_eq!(resources.len(), 2);
            }
            other => panic!("expected terminal, got {other:?}"),
        }
    }

    #[test]
    fn resources_take_precedence_over_question() {
        let response = AssessmentResponse {
            next_question: Some("What is a stack?".into()),
            resources: Some(vec![resource("intro")]),
            ..Default::default()
        };

        assert!(matches!(response.classify(), StepOutcome::Remediation { .. }));
    }

    #[test]
    fn empty_resources_fall_through_to_question() {
        let response = AssessmentResponse {
            next_question: Some("What is a heap?".into()),
            resources: Some(Vec::new()),
            message: Some("Next one".into()),
            ..Default::default()
        };

        assert_eq!(
            response.classify(),
            StepOutcome::NextQuestion {
                message: "Next one".into(),
                question: "What is a heap?".into(),
            }
        );
    }

    #[test]
    fn blank_or_missing_question_is_unrecognized() {
        assert_eq!(AssessmentResponse::default().classify(), StepOutcome::Unrecognized);

        let blank = AssessmentResponse {
            next_question: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(blank.classify(), StepOutcome::Unrecognized);
    }

    #[test]
    fn decodes_service_payload() {
        let body = json!({
            "stage": "level_1",
            "message": "Good start",
            "next_question": null,
            "resources": [
                {"type": "video", "title": "Basics", "link": "https://example.com/v"},
                {"type": "job", "title": "Junior role"}
            ],
            "final_step": false
        });

        let response: AssessmentResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.stage.as_deref(), Some("level_1"));
        let resources = response.resources.clone().unwrap();
        assert_eq!(resources[0].kind, "video");
        assert_eq!(resources[1].link, None);
        assert!(matches!(response.classify(), StepOutcome::Remediation { .. }));
    }

    #[test]
    fn empty_object_decodes() {
        let response: AssessmentResponse = serde_json::from_str("{}").unwrap();
        assert!(!response.final_step);
        assert_eq!(response.classify(), StepOutcome::Unrecognized);
    }

    #[test]
    fn progress_request_omits_unknown_stage() {
        let request = ProgressRequest {
            career: "nurse".into(),
            previous_answers: vec![AnsweredQuestion {
                question: "Q1".into(),
                correct: true,
            }],
            total_questions: 3,
            is_retry: false,
            current_stage: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "career": "nurse",
                "previous_answers": [{"question": "Q1", "correct": true}],
                "total_questions": 3,
                "is_retry": false
            })
        );
    }

    #[test]
    fn href_ignores_blank_links() {
        let mut r = resource("x");
        assert!(r.href().is_some());
        r.link = Some("  ".into());
        assert_eq!(r.href(), None);
    }
}
