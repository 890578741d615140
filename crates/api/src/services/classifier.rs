//! Image classification call-through service.
//!
//! Forwards an uploaded image to a configured generative-model HTTP endpoint
//! and expects one of exactly two labels back. The upstream contract is
//! deliberately narrow; anything else is treated as an upstream fault.

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::config::ClassifierConfig;
use crate::error::ApiError;

/// Label the upstream model must answer for recyclable material.
pub const LABEL_RECYCLABLE: &str = "Reciclable";

/// Label the upstream model must answer for non-recyclable material.
pub const LABEL_NOT_RECYCLABLE: &str = "No Reciclable";

/// Classification verdict for an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Recyclable,
    NotRecyclable,
}

impl Classification {
    /// The wire label for this verdict.
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Recyclable => LABEL_RECYCLABLE,
            Classification::NotRecyclable => LABEL_NOT_RECYCLABLE,
        }
    }

    /// Parse an upstream reply. Only the two exact labels are accepted.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            LABEL_RECYCLABLE => Some(Classification::Recyclable),
            LABEL_NOT_RECYCLABLE => Some(Classification::NotRecyclable),
            _ => None,
        }
    }
}

/// Errors from the classification service.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Image classification is disabled")]
    Disabled,

    #[error("Upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upstream returned status {0}")]
    UpstreamStatus(u16),

    #[error("Upstream returned an unexpected reply: {0}")]
    UnexpectedReply(String),
}

impl From<ClassifierError> for ApiError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::Disabled => {
                ApiError::ServiceUnavailable("Image classification is disabled".into())
            }
            ClassifierError::Request(e) => {
                ApiError::BadGateway(format!("Classifier upstream request failed: {}", e))
            }
            ClassifierError::UpstreamStatus(code) => {
                ApiError::BadGateway(format!("Classifier upstream returned status {}", code))
            }
            ClassifierError::UnexpectedReply(reply) => {
                ApiError::BadGateway(format!("Classifier returned an unexpected reply: {}", reply))
            }
        }
    }
}

/// Seam for the classification backend, so handlers do not depend on the
/// concrete HTTP client.
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    /// Classify an image given its raw bytes and MIME type.
    async fn classify(
        &self,
        image: &[u8],
        content_type: &str,
    ) -> Result<Classification, ClassifierError>;
}

/// Chat-completions response shape; only the first choice's content is read.
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

/// HTTP classifier talking to a chat-completions style endpoint.
pub struct HttpClassifier {
    client: reqwest::Client,
    config: ClassifierConfig,
}

impl HttpClassifier {
    /// Build a classifier from configuration. Returns None when disabled.
    pub fn from_config(config: &ClassifierConfig) -> Option<Self> {
        if !config.enabled || config.url.is_empty() {
            return None;
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .ok()?;

        Some(Self {
            client,
            config: config.clone(),
        })
    }

    fn build_request_body(&self, image: &[u8], content_type: &str) -> serde_json::Value {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        let data_url = format!("data:{};base64,{}", content_type, encoded);

        json!({
            "model": self.config.model,
            "messages": [{
                "role": "user",
                "content": [
                    {
                        "type": "text",
                        "text": format!(
                            "Classify the waste in this image. Answer with exactly \
                             '{}' or '{}' and nothing else.",
                            LABEL_RECYCLABLE, LABEL_NOT_RECYCLABLE
                        )
                    },
                    {
                        "type": "image_url",
                        "image_url": { "url": data_url }
                    }
                ]
            }],
            "max_tokens": 10
        })
    }
}

#[async_trait]
impl ImageClassifier for HttpClassifier {
    async fn classify(
        &self,
        image: &[u8],
        content_type: &str,
    ) -> Result<Classification, ClassifierError> {
        let body = self.build_request_body(image, content_type);

        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::UpstreamStatus(status.as_u16()));
        }

        let completion: CompletionResponse = response.json().await?;
        let reply = completion
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();

        Classification::from_label(&reply).ok_or(ClassifierError::UnexpectedReply(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_exact_matches() {
        assert_eq!(
            Classification::from_label("Reciclable"),
            Some(Classification::Recyclable)
        );
        assert_eq!(
            Classification::from_label("No Reciclable"),
            Some(Classification::NotRecyclable)
        );
    }

    #[test]
    fn test_from_label_trims_whitespace() {
        assert_eq!(
            Classification::from_label("  Reciclable\n"),
            Some(Classification::Recyclable)
        );
    }

    #[test]
    fn test_from_label_rejects_other_replies() {
        assert_eq!(Classification::from_label("reciclable"), None);
        assert_eq!(Classification::from_label("Recyclable"), None);
        assert_eq!(Classification::from_label("I think it is Reciclable"), None);
        assert_eq!(Classification::from_label(""), None);
    }

    #[test]
    fn test_label_roundtrip() {
        assert_eq!(
            Classification::from_label(Classification::Recyclable.label()),
            Some(Classification::Recyclable)
        );
        assert_eq!(
            Classification::from_label(Classification::NotRecyclable.label()),
            Some(Classification::NotRecyclable)
        );
    }

    #[test]
    fn test_from_config_disabled() {
        let config = ClassifierConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(HttpClassifier::from_config(&config).is_none());
    }

    #[test]
    fn test_from_config_enabled_without_url() {
        let config = ClassifierConfig {
            enabled: true,
            url: String::new(),
            ..Default::default()
        };
        assert!(HttpClassifier::from_config(&config).is_none());
    }

    #[test]
    fn test_from_config_enabled() {
        let config = ClassifierConfig {
            enabled: true,
            url: "http://localhost:9999/v1/chat/completions".to_string(),
            api_key: "key".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_ms: 1000,
        };
        assert!(HttpClassifier::from_config(&config).is_some());
    }

    #[test]
    fn test_build_request_body_embeds_data_url() {
        let config = ClassifierConfig {
            enabled: true,
            url: "http://localhost:9999/v1/chat/completions".to_string(),
            api_key: "key".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_ms: 1000,
        };
        let classifier = HttpClassifier::from_config(&config).unwrap();
        let body = classifier.build_request_body(&[1, 2, 3], "image/png");

        let url = body["messages"][0]["content"][1]["image_url"]["url"]
            .as_str()
            .unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(body["model"], "gpt-4o-mini");
    }

    #[test]
    fn test_classifier_error_maps_to_api_error() {
        let api: ApiError = ClassifierError::Disabled.into();
        assert!(matches!(api, ApiError::ServiceUnavailable(_)));

        let api: ApiError = ClassifierError::UnexpectedReply("maybe".into()).into();
        assert!(matches!(api, ApiError::BadGateway(_)));

        let api: ApiError = ClassifierError::UpstreamStatus(500).into();
        assert!(matches!(api, ApiError::BadGateway(_)));
    }
}
