mod answers;
mod ids;
mod module;
mod question;
mod result;

pub use answers::{AnswerError, AnswerRecord, AnswerStore};
pub use ids::{ParseIdError, QuestionId, TestId, UserId};
pub use module::{ModuleDescriptor, ModuleKind, NavigationTopology, ParseModuleError, ScoringRule};
pub use question::{AnswerOption, GroupContent, Question, QuestionGroup, QuestionSet, QuestionSetError};
pub use result::SessionResult;
