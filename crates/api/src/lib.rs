#![forbid(unsafe_code)]

pub mod error;
pub mod http;
pub mod remote;
pub mod session;

pub use error::ApiError;
pub use http::{CourseApiConfig, HttpCourseApi};
pub use remote::{
    AuthGateway, ChapterDirectory, ChapterRecord, CourseApi, InMemoryCourseApi, ProgressRecord,
    ProgressStore,
};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore, SessionStoreError};
