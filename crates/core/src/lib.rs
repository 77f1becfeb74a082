#![forbid(unsafe_code)]

pub mod model;
pub mod progress;

pub use model::{Chapter, ChapterError, ChapterId, Session, SessionError, UserProfile, UserRole};
pub use progress::{ActionTicket, CompletionSet, Desired, ProgressState};
