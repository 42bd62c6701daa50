use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::report::ImageCheckResponse;

/// The full set of detector models requested for every image check.
/// Owned here so the request and the summarizer stay in sync; the vendor
/// bills per model, which is why duplicates never reach this call.
pub const IMAGE_MODELS: [&str; 18] = [
    "nudity",
    "weapon",
    "recreational_drug",
    "medical",
    "offensive",
    "faces",
    "scam",
    "text-content",
    "face-attributes",
    "gore",
    "qr-content",
    "tobacco",
    "genai",
    "violence",
    "self-harm",
    "gambling",
    "text",
    "type",
];

/// Thin request/response client for the moderation vendor. No retry logic
/// of its own; the single reqwest client keeps connections alive across the
/// many calls issued per user.
pub struct ModerationApiClient {
    http: reqwest::Client,
    api_user: String,
    api_secret: String,
    image_url: String,
    text_url: String,
    text_enabled: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct TextCheckResponse {
    #[serde(default)]
    pub violations: Vec<TextViolation>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TextViolation {
    pub category: Option<String>,
    pub matched_text: Option<String>,
    pub intensity: Option<f64>,
}

impl ModerationApiClient {
    pub fn from_env() -> ModerationApiClient {
        ModerationApiClient {
            http: reqwest::Client::new(),
            api_user: env::var("MODERATION_API_USER").expect("MODERATION_API_USER must be set"),
            api_secret: env::var("MODERATION_API_SECRET")
                .expect("MODERATION_API_SECRET must be set"),
            image_url: env::var("MODERATION_IMAGE_URL")
                .unwrap_or_else(|_| "https://api.sightengine.com/1.0/check.json".to_string()),
            text_url: env::var("MODERATION_TEXT_URL")
                .unwrap_or_else(|_| "https://api.sightengine.com/1.0/text/check.json".to_string()),
            text_enabled: env::var("TEXT_MODERATION_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    /// Bio moderation is feature-flagged; photo moderation is not.
    pub fn text_moderation_enabled(&self) -> bool {
        self.text_enabled
    }

    /// Submit one image to the multi-model classifier. Any non-200 response
    /// is a hard error for the user being reviewed.
    pub async fn check_image(&self, path: &Path) -> Result<ImageCheckResponse, String> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| format!("Failed to read image {}: {}", path.display(), e))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "photo".to_string());

        let form = reqwest::multipart::Form::new()
            .part(
                "media",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            )
            .text("models", IMAGE_MODELS.join(","))
            .text("api_user", self.api_user.clone())
            .text("api_secret", self.api_secret.clone());

        let response = self
            .http
            .post(&self.image_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("Moderation API request error: {}", e))?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(format!(
                "Moderation API returned status {}",
                response.status()
            ));
        }

        response
            .json::<ImageCheckResponse>()
            .await
            .map_err(|e| format!("Moderation API response decode error: {}", e))
    }

    /// Submit free text (a profile bio) to the text-moderation endpoint.
    pub async fn check_text(&self, content: &str) -> Result<TextCheckResponse, String> {
        let response = self
            .http
            .post(&self.text_url)
            .query(&[
                ("api_user", self.api_user.as_str()),
                ("api_secret", self.api_secret.as_str()),
            ])
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await
            .map_err(|e| format!("Text moderation request error: {}", e))?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(format!(
                "Text moderation returned status {}",
                response.status()
            ));
        }

        response
            .json::<TextCheckResponse>()
            .await
            .map_err(|e| format!("Text moderation response decode error: {}", e))
    }
}
