#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod exam;
pub mod practice;
pub mod stats;

pub use theory_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, ExamError, PracticeError, StatsError};
pub use exam::{ExamProgress, ExamService, ExamSession};
pub use practice::PracticeService;
pub use stats::{Statistics, StatisticsService};
