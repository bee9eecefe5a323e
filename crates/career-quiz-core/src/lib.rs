pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod protocol;
pub mod session;
pub mod view;

// Re-export main types for convenience
pub use client::{AssessmentService, HttpAssessmentClient, PendingRequest, Reply};
pub use config::{Config, Settings};
pub use controller::{Action, Controller, Phase};
pub use error::{ClientError, ConfigError, QuizError};
pub use protocol::{AnsweredQuestion, AssessmentResponse, ProgressRequest, Resource, StepOutcome};
pub use session::Session;
pub use view::{Region, View, ViewState};
