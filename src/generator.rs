//! Generation collaborator
//!
//! [`ImageGenerator`] is the seam between the request lifecycle and whatever
//! produces the composite. [`GeminiClient`] is the production implementation,
//! calling Gemini's `generateContent` endpoint with an inline photo and a
//! prompt describing the garment.

use crate::config::Config;
use crate::customization::CustomizationOptions;
use crate::util::truncate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Default Gemini endpoint root.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Default image-capable model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Maximum length for error content surfaced to the user
const MAX_ERROR_CONTENT_LEN: usize = 200;

/// Everything the collaborator needs for one try-on.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Bare base64 payload (no `data:` prefix).
    pub image_base64: String,
    pub mime_type: &'static str,
    pub options: CustomizationOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeneratorError {
    #[error("No Gemini API key found. Set GEMINI_API_KEY or run `tailor-fit --setup`.")]
    MissingApiKey,
    #[error("{0}")]
    Transport(String),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("The request was blocked by the model ({0}). Try a different photo.")]
    Blocked(String),
    #[error("The model did not return an image.{}", said_suffix(.0))]
    NoImage(Option<String>),
    #[error("Unexpected response from the image service: {0}")]
    Malformed(String),
    #[error("Invalid API endpoint: {0}")]
    Endpoint(String),
}

fn said_suffix(text: &Option<String>) -> String {
    match text {
        Some(text) => format!(" It said: {}", text),
        None => String::new(),
    }
}

/// Produces a composite try-on image from a photo and an option tuple.
pub trait ImageGenerator: Send + Sync {
    /// Returns the generated image as a bare base64 payload.
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> impl Future<Output = Result<String, GeneratorError>> + Send;
}

/// Prompt sent alongside the photo.
pub fn build_prompt(options: &CustomizationOptions) -> String {
    format!(
        "Edit this photo so the person is wearing a traditional saya-kurta. \
         Fit: {fit}. Color: {color}. Fabric: {fabric}. \
         Collar design: \"{collar}\" (reference: {collar_url}). \
         Keep the person's face, hair, body shape, pose and the background unchanged. \
         The garment should drape naturally with realistic fabric texture, stitching, \
         lighting and shadows. Return only the edited photo.",
        fit = options.fit,
        color = options.color,
        fabric = options.fabric,
        collar = options.collar.name,
        collar_url = options.collar.image_url,
    )
}

// ─────────────────────────────────────────────────────────────────────────
// Wire format
// ─────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
    Text { text: String },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: [&'static str; 2],
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    inline_data: Option<ResponseInlineData>,
}

#[derive(Deserialize)]
struct ResponseInlineData {
    data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    status: Option<String>,
}

fn request_body(request: &GenerationRequest) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                RequestPart::Inline {
                    inline_data: InlineData {
                        mime_type: request.mime_type,
                        data: &request.image_base64,
                    },
                },
                RequestPart::Text {
                    text: build_prompt(&request.options),
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_modalities: ["IMAGE", "TEXT"],
        },
    }
}

/// Sanitize API response content for error messages to prevent credential leakage.
fn sanitize_api_response(content: &str) -> String {
    const SECRET_PATTERNS: &[&str] = &["api_key", "apikey", "key=", "secret", "bearer", "aiza"];

    let truncated = truncate(content.trim(), MAX_ERROR_CONTENT_LEN);
    let lower = truncated.to_lowercase();
    for pattern in SECRET_PATTERNS {
        if lower.contains(pattern) {
            return "(response details redacted - may contain sensitive data)".to_string();
        }
    }
    truncated
}

/// Map an HTTP status and body to the generated payload or an error.
fn parse_response(status: u16, body: &str) -> Result<String, GeneratorError> {
    if !(200..300).contains(&status) {
        let api_message = serde_json::from_str::<ApiErrorEnvelope>(body)
            .ok()
            .map(|env| env.error)
            .filter(|err| !err.message.trim().is_empty());
        let message = match (status, api_message) {
            (401 | 403, _) => {
                "The image service rejected the API key. Run `tailor-fit --setup` to update it."
                    .to_string()
            }
            (429, _) => "The image service is rate limiting requests. Try again in a minute."
                .to_string(),
            (_, Some(err)) => {
                let detail = sanitize_api_response(&err.message);
                match err.status {
                    Some(code) => format!("{} ({})", detail, code),
                    None => detail,
                }
            }
            (500..=599, None) => format!(
                "Image service error ({}). The service may be temporarily unavailable.",
                status
            ),
            (_, None) => format!("API error {}: {}", status, sanitize_api_response(body)),
        };
        return Err(GeneratorError::Api { status, message });
    }

    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| GeneratorError::Malformed(truncate(&e.to_string(), 120)))?;

    if let Some(reason) = parsed
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(GeneratorError::Blocked(reason));
    }

    let mut said = Vec::new();
    let mut finish_reason = None;
    for candidate in parsed.candidates {
        if finish_reason.is_none() {
            finish_reason = candidate.finish_reason;
        }
        let Some(content) = candidate.content else {
            continue;
        };
        for part in content.parts {
            if let Some(inline) = part.inline_data {
                if !inline.data.trim().is_empty() {
                    return Ok(inline.data);
                }
            }
            if let Some(text) = part.text {
                if !text.trim().is_empty() {
                    said.push(text.trim().to_string());
                }
            }
        }
    }

    match finish_reason.as_deref() {
        Some(reason @ ("SAFETY" | "PROHIBITED_CONTENT" | "IMAGE_SAFETY")) if said.is_empty() => {
            Err(GeneratorError::Blocked(reason.to_string()))
        }
        _ if said.is_empty() => Err(GeneratorError::NoImage(None)),
        _ => Err(GeneratorError::NoImage(Some(truncate(
            &said.join(" "),
            MAX_ERROR_CONTENT_LEN,
        )))),
    }
}

fn map_transport_error(err: reqwest::Error) -> GeneratorError {
    let message = if err.is_timeout() {
        "The image service timed out. Please try again.".to_string()
    } else if err.is_connect() {
        "Could not connect to the image service. Check your network and try again.".to_string()
    } else {
        format!("Request failed: {}", err)
    };
    GeneratorError::Transport(message)
}

/// HTTP client for Gemini's `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: Url,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        api_base: &str,
        model: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, GeneratorError> {
        let endpoint = endpoint_url(api_base, model)?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| {
            GeneratorError::Transport(format!("Failed to create HTTP client: {}", e))
        })?;
        Ok(Self {
            http,
            api_key,
            endpoint,
        })
    }

    /// Build a client from the loaded config and the resolved API key.
    pub fn from_config(config: &Config) -> Result<Self, GeneratorError> {
        let api_key = config.api_key().ok_or(GeneratorError::MissingApiKey)?;
        Self::new(
            api_key,
            config.api_base(),
            config.model(),
            config.request_timeout(),
        )
    }

}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

fn endpoint_url(api_base: &str, model: &str) -> Result<Url, GeneratorError> {
    let base = Url::parse(api_base).map_err(|e| GeneratorError::Endpoint(e.to_string()))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(GeneratorError::Endpoint(format!(
            "unsupported scheme '{}'",
            base.scheme()
        )));
    }
    let path = format!(
        "{}/v1beta/models/{}:generateContent",
        base.path().trim_end_matches('/'),
        model.trim()
    );
    let mut endpoint = base;
    endpoint.set_path(&path);
    Ok(endpoint)
}

impl ImageGenerator for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GeneratorError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            mime = request.mime_type,
            payload_len = request.image_base64.len(),
            "sending generateContent request"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(&request))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_transport_error)?;
        tracing::debug!(status, body_len = body.len(), "generateContent responded");
        parse_response(status, &body)
    }
}

/// Stand-in used when no client could be built (e.g. no API key yet).
///
/// Every request fails with the construction error, so the fitting room
/// still opens and the reason surfaces in the result panel.
#[derive(Debug, Clone)]
pub struct Unavailable {
    reason: GeneratorError,
}

impl Unavailable {
    pub fn new(reason: GeneratorError) -> Self {
        Self { reason }
    }
}

impl ImageGenerator for Unavailable {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, GeneratorError> {
        Err(self.reason.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Dimension;
    use crate::customization::Choice;

    fn sample_request() -> GenerationRequest {
        let mut options = CustomizationOptions::default();
        options.update(Choice::named(Dimension::Collar, "Pastel Lines").unwrap());
        GenerationRequest {
            image_base64: "QUJD".to_string(),
            mime_type: "image/jpeg",
            options,
        }
    }

    #[test]
    fn test_prompt_mentions_every_option() {
        let request = sample_request();
        let prompt = build_prompt(&request.options);
        assert!(prompt.contains("Slim Fit"));
        assert!(prompt.contains("Sky Blue"));
        assert!(prompt.contains("Crisp Cotton Poplin"));
        assert!(prompt.contains("Pastel Lines"));
        assert!(prompt.contains(request.options.collar.image_url));
    }

    #[test]
    fn test_request_body_shape() {
        let request = sample_request();
        let json = serde_json::to_value(request_body(&request)).unwrap();
        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "QUJD");
        assert!(parts[1]["text"].as_str().unwrap().contains("saya-kurta"));
        assert_eq!(
            json["generationConfig"]["responseModalities"],
            serde_json::json!(["IMAGE", "TEXT"])
        );
    }

    #[test]
    fn test_parse_response_returns_first_image_part() {
        let body = r#"{"candidates":[{"content":{"parts":[
            {"text":"Here you go"},
            {"inlineData":{"mimeType":"image/png","data":"iVBORw0KGgo..."}}
        ]},"finishReason":"STOP"}]}"#;
        assert_eq!(parse_response(200, body).unwrap(), "iVBORw0KGgo...");
    }

    #[test]
    fn test_parse_response_without_image_reports_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"I cannot edit this photo."}]}}]}"#;
        let err = parse_response(200, body).unwrap_err();
        assert_eq!(
            err,
            GeneratorError::NoImage(Some("I cannot edit this photo.".to_string()))
        );
        assert!(err.to_string().contains("did not return an image"));
    }

    #[test]
    fn test_parse_response_blocked() {
        let body = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        assert_eq!(
            parse_response(200, body).unwrap_err(),
            GeneratorError::Blocked("SAFETY".to_string())
        );
        let body = r#"{"candidates":[{"finishReason":"IMAGE_SAFETY"}]}"#;
        assert_eq!(
            parse_response(200, body).unwrap_err(),
            GeneratorError::Blocked("IMAGE_SAFETY".to_string())
        );
    }

    #[test]
    fn test_parse_response_api_errors() {
        let body = r#"{"error":{"code":400,"message":"Unsupported MIME type","status":"INVALID_ARGUMENT"}}"#;
        let err = parse_response(400, body).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported MIME type (INVALID_ARGUMENT)");

        let err = parse_response(403, "{}").unwrap_err();
        assert!(err.to_string().contains("--setup"));

        let err = parse_response(503, "upstream busy").unwrap_err();
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_parse_response_malformed() {
        assert!(matches!(
            parse_response(200, "<html>"),
            Err(GeneratorError::Malformed(_))
        ));
    }

    #[test]
    fn test_sanitize_redacts_keys() {
        let redacted = sanitize_api_response("bad request for key=AIzaSyExample");
        assert!(redacted.contains("redacted"));
        assert_eq!(sanitize_api_response("plain failure"), "plain failure");
    }

    #[test]
    fn test_endpoint_url() {
        let url = endpoint_url(DEFAULT_API_BASE, DEFAULT_MODEL).unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
        let proxied = endpoint_url("http://localhost:8080/gemini/", "m").unwrap();
        assert_eq!(proxied.path(), "/gemini/v1beta/models/m:generateContent");
        assert!(endpoint_url("ftp://example.com", "m").is_err());
        assert!(endpoint_url("not a url", "m").is_err());
    }

    #[test]
    fn test_debug_output_hides_api_key() {
        let client = GeminiClient::new(
            "AIzaSySecretValue".to_string(),
            DEFAULT_API_BASE,
            DEFAULT_MODEL,
            None,
        )
        .unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("AIzaSySecretValue"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("generateContent"));
    }

    #[tokio::test]
    async fn test_unavailable_generator_reports_reason() {
        let generator = Unavailable::new(GeneratorError::MissingApiKey);
        let err = generator.generate(sample_request()).await.unwrap_err();
        assert_eq!(err, GeneratorError::MissingApiKey);
        assert!(err.to_string().contains("--setup"));
    }
}
