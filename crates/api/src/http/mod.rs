//! HTTP implementation of the course service contracts.

mod wire;

use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use tracing::{debug, warn};

use curso_core::model::{ChapterId, UserProfile};

use crate::error::ApiError;
use crate::remote::{AuthGateway, ChapterDirectory, ChapterRecord, ProgressRecord, ProgressStore};
use crate::session::SessionStore;

const DEFAULT_BASE_URL: &str = "https://blenderapi.rsanjur.com";

#[derive(Clone, Debug)]
pub struct CourseApiConfig {
    pub base_url: String,
}

impl CourseApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("CURSO_API_BASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        Self { base_url }
    }
}

impl Default for CourseApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Course service client over HTTP.
///
/// Every call reads the bearer token once from the session store and
/// attaches it when present; absent a token the request goes out
/// unauthenticated and the server decides whether that is permitted.
#[derive(Clone)]
pub struct HttpCourseApi {
    client: Client,
    config: CourseApiConfig,
    session: Arc<dyn SessionStore>,
}

impl HttpCourseApi {
    #[must_use]
    pub fn new(config: CourseApiConfig, session: Arc<dyn SessionStore>) -> Self {
        Self {
            client: Client::new(),
            config,
            session,
        }
    }

    #[must_use]
    pub fn from_env(session: Arc<dyn SessionStore>) -> Self {
        Self::new(CourseApiConfig::from_env(), session)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn send(&self, method: Method, path: &str) -> Result<Response, ApiError> {
        debug!(%method, path, "issuing course api request");
        let mut request = self.client.request(method, self.endpoint(path));
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        Ok(response)
    }

    async fn body(response: Response) -> Result<String, ApiError> {
        Ok(response.text().await?)
    }
}

#[async_trait]
impl ChapterDirectory for HttpCourseApi {
    async fn list_chapters(&self) -> Result<Vec<ChapterRecord>, ApiError> {
        let response = self.send(Method::GET, "/chapters").await?;
        let body = Self::body(response).await?;
        match wire::decode_chapters(&body) {
            Ok(records) => Ok(records),
            Err(err) => {
                warn!(error = %err, "chapter list body was not an array; treating as empty");
                Ok(Vec::new())
            }
        }
    }

    async fn get_chapter(&self, id: ChapterId) -> Result<ChapterRecord, ApiError> {
        let response = self.send(Method::GET, &format!("/chapters/{id}")).await?;
        let body = Self::body(response).await?;
        wire::decode_chapter(&body)
    }
}

#[async_trait]
impl ProgressStore for HttpCourseApi {
    async fn fetch_progress(&self) -> Result<Vec<ProgressRecord>, ApiError> {
        let response = self.send(Method::GET, "/chapters/progress/me").await?;
        let body = Self::body(response).await?;
        Ok(wire::decode_progress(&body))
    }

    async fn mark_watched(&self, id: ChapterId) -> Result<(), ApiError> {
        self.send(Method::POST, &format!("/chapters/{id}/progress"))
            .await?;
        Ok(())
    }

    async fn remove_progress(&self, id: ChapterId) -> Result<(), ApiError> {
        self.send(Method::DELETE, &format!("/chapters/{id}/progress"))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AuthGateway for HttpCourseApi {
    async fn current_user(&self) -> Result<UserProfile, ApiError> {
        let response = self.send(Method::GET, "/auth/me").await?;
        let body = Self::body(response).await?;
        wire::decode_user(&body)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.send(Method::POST, "/auth/logout").await?;
        Ok(())
    }
}
