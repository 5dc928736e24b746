use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use storyreel_core::Story;
use storyreel_logging::{reel_debug, reel_info};

use crate::BackendError;

/// Hosted backend the dashboard talks to unless configured otherwise.
pub const DEFAULT_BASE_URL: &str = "https://youtube-automation-2zba.onrender.com";

const GENERATE_PATH: &str = "/api/generate-video";
const AUTOMATION_PATH: &str = "/api/start-automation";

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Whole-request timeout. Story generation runs synchronously on the
    /// backend and the host cold-starts, so this is generous.
    pub request_timeout: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }
}

/// Remote generation service.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// `POST /api/generate-video`: generates a story and starts the video pipeline.
    async fn request_generation(&self) -> Result<Story, BackendError>;

    /// `POST /api/start-automation`: asks the backend to schedule daily runs.
    async fn request_automation_start(&self) -> Result<(), BackendError>;

    /// `GET /`: liveness probe. The body is informational only.
    async fn check_status(&self) -> Result<serde_json::Value, BackendError>;
}

#[derive(Debug, Deserialize)]
struct GenerateReply {
    #[serde(default)]
    success: bool,
    story: Option<Story>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AutomationReply {
    #[serde(default)]
    success: bool,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(settings: &BackendSettings) -> Result<Self, BackendError> {
        let base_url = settings.base_url.trim().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|err| BackendError::InvalidBaseUrl {
            url: settings.base_url.clone(),
            message: err.to_string(),
        })?;

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| BackendError::transport(err.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(self.endpoint(path))
            .header(CONTENT_TYPE, "application/json")
    }

    async fn exchange<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BackendError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        reel_debug!("backend replied {} with {} bytes", status, body.len());
        decode(status, &body)
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn request_generation(&self) -> Result<Story, BackendError> {
        let reply: GenerateReply = self.exchange(self.post(GENERATE_PATH)).await?;
        if !reply.success {
            return Err(BackendError::Rejected {
                message: reply.error,
            });
        }
        let story = reply
            .story
            .ok_or_else(|| BackendError::transport("successful response carried no story"))?;
        reel_info!(
            "story generated: {:?} ({})",
            story.title_english,
            story.category
        );
        Ok(story)
    }

    async fn request_automation_start(&self) -> Result<(), BackendError> {
        let reply: AutomationReply = self.exchange(self.post(AUTOMATION_PATH)).await?;
        if reply.success {
            Ok(())
        } else {
            Err(BackendError::Rejected {
                message: reply.error,
            })
        }
    }

    async fn check_status(&self) -> Result<serde_json::Value, BackendError> {
        self.exchange(self.client.get(self.endpoint("/"))).await
    }
}

fn decode<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, BackendError> {
    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorReply>(body)
            .ok()
            .and_then(|reply| reply.error);
        return Err(match message {
            Some(message) => BackendError::Rejected {
                message: Some(message),
            },
            None => BackendError::transport(format!("http status {status}")),
        });
    }
    serde_json::from_slice(body)
        .map_err(|err| BackendError::transport(format!("invalid JSON response: {err}")))
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::transport(format!("timed out: {err}"));
    }
    BackendError::transport(err.to_string())
}
