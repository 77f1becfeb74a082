mod chapter;
mod ids;
mod session;

pub use chapter::{Chapter, ChapterError};
pub use ids::ChapterId;
pub use session::{Session, SessionError, UserProfile, UserRole};
