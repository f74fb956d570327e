mod exam;
mod ids;
mod progress;
mod question;
mod settings;

pub use exam::{AnswerDetail, ExamRecord, ExamRecordError, NewExamRecord};
pub use ids::{AnswerId, ExamId, ParseIdError, QuestionId, RecordId, UserId};
pub use progress::{NewProgress, ProgressRecord, ProgressState, ProgressUpdate, state_of};
pub use question::{AnswerOption, Category, CategoryParseError, Question};
pub use settings::{ExamSettings, SettingsError, StatsSettings};
