//! Response schemas decoded at the HTTP boundary.
//!
//! Progress and chapter-list bodies decode leniently: partial rows are
//! kept as partial records (strictness lives in `ChapterRecord::
//! into_chapter`) and a body of the wrong overall shape degrades to the
//! empty result where the caller has a meaningful default.

use serde::Deserialize;
use tracing::warn;

use curso_core::model::{ChapterId, UserProfile, UserRole};

use crate::error::ApiError;
use crate::remote::{ChapterRecord, ProgressRecord};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProgressEnvelope {
    progress: Vec<ProgressRow>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ProgressRow {
    chapter_id: Option<u64>,
    is_completed: bool,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: WireUser,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    email: String,
    name: String,
    #[serde(default)]
    role: String,
}

pub(super) fn decode_chapters(body: &str) -> Result<Vec<ChapterRecord>, ApiError> {
    serde_json::from_str(body).map_err(|err| ApiError::Shape(err.to_string()))
}

pub(super) fn decode_chapter(body: &str) -> Result<ChapterRecord, ApiError> {
    serde_json::from_str(body).map_err(|err| ApiError::Shape(err.to_string()))
}

/// Decode the progress envelope, keeping only rows that name a chapter.
///
/// Never fails: an unexpected body shape reads as no progress.
pub(super) fn decode_progress(body: &str) -> Vec<ProgressRecord> {
    let envelope: ProgressEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!(error = %err, "progress body had unexpected shape; treating as empty");
            ProgressEnvelope::default()
        }
    };
    envelope
        .progress
        .into_iter()
        .filter_map(|row| {
            row.chapter_id.map(|id| ProgressRecord {
                chapter_id: ChapterId::new(id),
                is_completed: row.is_completed,
            })
        })
        .collect()
}

pub(super) fn decode_user(body: &str) -> Result<UserProfile, ApiError> {
    let envelope: UserEnvelope =
        serde_json::from_str(body).map_err(|err| ApiError::Shape(err.to_string()))?;
    Ok(UserProfile::new(
        envelope.user.email,
        envelope.user.name,
        UserRole::from(envelope.user.role),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_progress_envelope_and_keeps_flags() {
        let body = r#"{
            "progress": [
                { "chapterId": 1, "isCompleted": true },
                { "chapterId": 2, "isCompleted": false },
                { "chapterId": 5, "isCompleted": true }
            ]
        }"#;
        let records = decode_progress(body);
        assert_eq!(records.len(), 3);
        assert!(records[0].is_completed);
        assert_eq!(records[2].chapter_id, ChapterId::new(5));
        assert!(!records[1].is_completed);
    }

    #[test]
    fn progress_rows_without_chapter_id_are_dropped() {
        let body = r#"{
            "progress": [
                { "isCompleted": true },
                { "chapterId": 4, "isCompleted": true }
            ]
        }"#;
        let records = decode_progress(body);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].chapter_id, ChapterId::new(4));
    }

    #[test]
    fn malformed_progress_body_reads_as_empty() {
        assert!(decode_progress("[]").is_empty());
        assert!(decode_progress("{}").is_empty());
        assert!(decode_progress("not json").is_empty());
        assert!(decode_progress(r#"{ "progress": "yes" }"#).is_empty());
    }

    #[test]
    fn decodes_chapter_rows_with_partial_fields() {
        let body = r#"[
            { "id": 1, "slug": "introduccion", "title": "Introducción", "order": 1,
              "description": "Recorrido por la interfaz.", "duration": 420 },
            { "id": 2, "title": "Sin slug" }
        ]"#;
        let records = decode_chapters(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].duration, Some(420));
        assert!(records[1].slug.is_none());
    }

    #[test]
    fn non_array_chapter_body_is_a_shape_error() {
        let err = decode_chapters(r#"{ "oops": true }"#).unwrap_err();
        assert!(matches!(err, ApiError::Shape(_)));
    }

    #[test]
    fn decodes_user_envelope_with_role() {
        let body = r#"{ "user": { "email": "ana@example.com", "name": "Ana", "role": "admin" } }"#;
        let profile = decode_user(body).unwrap();
        assert_eq!(profile.name, "Ana");
        assert_eq!(profile.role, UserRole::Admin);
    }

    #[test]
    fn user_envelope_without_user_is_a_shape_error() {
        let err = decode_user(r#"{ "email": "x@example.com" }"#).unwrap_err();
        assert!(matches!(err, ApiError::Shape(_)));
    }
}
