//! HTTP generation service implementation

use crate::api::GenerationService;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::generate::{PayloadValue, SUBMIT_FAILED_MESSAGE, build_payload};
use crate::types::{GenerationRequest, GenerationStatus, LastVideo, OperationHandle, StatusReport};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Generation service using reqwest
pub struct HttpGenerationService {
    client: Client,
    config: Config,
}

#[derive(Deserialize)]
struct SubmitResponse {
    operation_name: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl HttpGenerationService {
    /// Create a new HTTP service
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("reelgen/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    fn status_url(&self, operation: &OperationHandle) -> String {
        self.config.endpoint(&format!(
            "/status/{}",
            urlencoding::encode(operation.as_str())
        ))
    }
}

/// Build the multipart body for a request
fn multipart_form(request: &GenerationRequest) -> Result<Form> {
    let mut form = Form::new();
    for field in build_payload(request) {
        form = match field.value {
            PayloadValue::Text(text) => form.text(field.name, text),
            PayloadValue::File(file) => {
                let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
                if let Some(mime) = &file.mime {
                    part = part.mime_str(mime).map_err(|e| {
                        Error::InvalidRequest(format!(
                            "invalid MIME type '{mime}' for {}: {e}",
                            file.file_name
                        ))
                    })?;
                }
                form.part(field.name, part)
            }
        };
    }
    Ok(form)
}

/// Extract a user-facing message from an error response body
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        // Validation errors arrive as a list of {loc, msg, type}
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

#[async_trait]
impl GenerationService for HttpGenerationService {
    async fn submit(&self, request: &GenerationRequest) -> Result<OperationHandle> {
        let url = self.config.endpoint("/generate");
        let form = multipart_form(request)?;

        debug!("POST {url}");
        let response = match self.client.post(&url).multipart(form).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Generation request failed: {e}");
                return Err(Error::Submission(SUBMIT_FAILED_MESSAGE.to_string()));
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            warn!("Generation request rejected with {status}: {body}");
            return Err(Error::Submission(
                error_detail(&body).unwrap_or_else(|| SUBMIT_FAILED_MESSAGE.to_string()),
            ));
        }

        let parsed: SubmitResponse = serde_json::from_str(&body).map_err(|e| {
            warn!("Unexpected generation response: {e}");
            Error::Submission(SUBMIT_FAILED_MESSAGE.to_string())
        })?;

        debug!("Started operation {}", parsed.operation_name);
        Ok(OperationHandle::new(parsed.operation_name))
    }

    async fn status(&self, operation: &OperationHandle) -> Result<StatusReport> {
        let url = self.status_url(operation);

        let response: StatusResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("Operation {operation} status: {}", response.status);
        Ok(StatusReport {
            status: GenerationStatus::from_wire(&response.status),
            video_url: response.video_url,
            detail: response.detail,
        })
    }

    async fn last_video(&self) -> Result<LastVideo> {
        let url = self.config.endpoint("/last-video");

        let last: LastVideo = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(last)
    }

    async fn download(&self, video_url: &str) -> Result<Vec<u8>> {
        debug!("GET {video_url}");
        let bytes = self
            .client
            .get(video_url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(bytes.to_vec())
    }

    fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_string() {
        assert_eq!(
            error_detail(r#"{"detail":"quota exceeded"}"#).as_deref(),
            Some("quota exceeded")
        );
    }

    #[test]
    fn test_error_detail_validation_list() {
        let body = r#"{"detail":[{"loc":["body","prompt"],"msg":"Field required","type":"missing"}]}"#;
        assert_eq!(error_detail(body).as_deref(), Some("Field required"));
    }

    #[test]
    fn test_error_detail_missing() {
        assert!(error_detail("Internal Server Error").is_none());
        assert!(error_detail(r#"{"error":"x"}"#).is_none());
        assert!(error_detail(r#"{"detail":""}"#).is_none());
    }

    #[test]
    fn test_status_url_encodes_operation() {
        let service =
            HttpGenerationService::new(Config::for_url("http://localhost:8000").unwrap()).unwrap();
        let url = service.status_url(&OperationHandle::new("models/veo/operations/abc"));
        assert_eq!(
            url,
            "http://localhost:8000/status/models%2Fveo%2Foperations%2Fabc"
        );
    }
}
