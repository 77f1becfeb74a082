//! Shared error types for the services crate.

use thiserror::Error;

use api::ApiError;
use curso_core::model::ChapterError;

/// Errors emitted by `ChapterService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChapterServiceError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Chapter(#[from] ChapterError),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Api(#[from] ApiError),
}
