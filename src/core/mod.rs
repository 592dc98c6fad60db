pub mod catalog;
pub mod export;
pub mod generator;
pub mod notify;
pub mod placeholder;
pub mod submission;

pub use crate::domain::model::{Language, Question, Rating, Ratings, SurveyResponse};
pub use crate::domain::ports::{BackupStore, Storage};
pub use crate::utils::error::Result;
