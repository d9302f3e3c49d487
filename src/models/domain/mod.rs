pub mod question;
pub mod question_set;
pub mod quota;

pub use question::{Question, QuestionDraft, QuestionKind};
pub use question_set::{QuestionSet, QuestionSetSummary};
pub use quota::Quota;
