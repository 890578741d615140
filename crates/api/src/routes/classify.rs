//! Image classification endpoint handler.
//!
//! Accepts a single image upload and passes it through to the configured
//! upstream vision model, returning the recyclability verdict.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::auth::Identity;
use crate::services::classifier::{Classification, ClassifierError};

/// Accepted image content types.
const ACCEPTED_CONTENT_TYPES: &[&str] = &["image/png", "image/jpeg"];

/// Name of the multipart field carrying the image.
const FILE_FIELD: &str = "file";

/// Classification response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyResponse {
    /// Upstream verdict label, verbatim.
    pub label: String,
    pub recyclable: bool,
}

/// Classify an uploaded image as recyclable or not.
///
/// POST /api/v1/classify (multipart, single `file` part, PNG or JPEG)
pub async fn classify(
    State(state): State<AppState>,
    identity: Identity,
    mut multipart: Multipart,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let classifier = state
        .classifier
        .as_ref()
        .ok_or(ClassifierError::Disabled)?;

    let mut image: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field
            .content_type()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Validation("Missing image content type".to_string()))?;

        if !ACCEPTED_CONTENT_TYPES.contains(&content_type.as_str()) {
            return Err(ApiError::Validation(
                "Only PNG and JPEG images are accepted".to_string(),
            ));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("Failed to read image: {}", e)))?;

        image = Some((bytes.to_vec(), content_type));
        break;
    }

    let (bytes, content_type) =
        image.ok_or_else(|| ApiError::Validation("Missing 'file' field".to_string()))?;

    if bytes.is_empty() {
        return Err(ApiError::Validation("Empty image upload".to_string()));
    }

    let classification = classifier.classify(&bytes, &content_type).await?;

    info!(
        user_id = %identity.user_id,
        size_bytes = bytes.len(),
        result = classification.label(),
        "Image classified"
    );

    Ok(Json(ClassifyResponse {
        label: classification.label().to_string(),
        recyclable: matches!(classification, Classification::Recyclable),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_content_types() {
        assert!(ACCEPTED_CONTENT_TYPES.contains(&"image/png"));
        assert!(ACCEPTED_CONTENT_TYPES.contains(&"image/jpeg"));
        assert!(!ACCEPTED_CONTENT_TYPES.contains(&"image/gif"));
        assert!(!ACCEPTED_CONTENT_TYPES.contains(&"application/pdf"));
    }

    #[test]
    fn test_classify_response_serialization() {
        let response = ClassifyResponse {
            label: "Reciclable".to_string(),
            recyclable: true,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"label\":\"Reciclable\""));
        assert!(json.contains("\"recyclable\":true"));
    }

    #[test]
    fn test_not_recyclable_maps_to_false() {
        let classification = Classification::NotRecyclable;
        assert!(!matches!(classification, Classification::Recyclable));
        assert_eq!(classification.label(), "No Reciclable");
    }
}
