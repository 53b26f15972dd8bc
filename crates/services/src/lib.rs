#![forbid(unsafe_code)]

pub mod account_service;
pub mod app_services;
pub mod config;
pub mod error;
pub mod fallback;
pub mod history_service;
pub mod question_source;
pub mod result_submitter;
pub mod sessions;

pub use ielts_core::Clock;

pub use account_service::AccountService;
pub use app_services::AppServices;
pub use config::AppConfig;
pub use error::{AccountError, AppServicesError, ConfigError, HistoryError, SessionError};
pub use history_service::{DEFAULT_HISTORY_LIMIT, ResultHistoryService};
pub use question_source::{LoadedQuestions, QuestionOrigin, QuestionSource};
pub use result_submitter::{ResultSubmitter, SubmitOutcome};
pub use sessions::{
    AssessmentSession, SessionLoopService, SessionPhase, SessionProgress,
    Submission, SubmitTrigger, TickOutcome,
};
