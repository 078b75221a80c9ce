pub mod study;
pub mod word;

pub use study::{EarnedAchievement, StudyRecord};
pub use word::{Word, WordGroup};
