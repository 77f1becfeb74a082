#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth_service;
pub mod chapter_service;
pub mod error;
pub mod progress_service;

pub use app_services::AppServices;
pub use auth_service::AuthService;
pub use chapter_service::ChapterService;
pub use error::{ChapterServiceError, ProgressServiceError};
pub use progress_service::ProgressService;
