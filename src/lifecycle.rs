//! Request lifecycle controller
//!
//! Owns the single-flight try-on request:
//!
//! ```text
//! Idle ──submit()──▶ Loading ──complete()──▶ Success | Failure
//!   ▲                                              │
//!   └──────────────────reset()─────────────────────┘
//! ```
//!
//! `submit()` is synchronous: it validates, flips to `Loading` and hands back
//! a [`RequestTicket`]. The caller runs [`execute`] off the UI thread and
//! feeds the outcome back through `complete()`. Every ticket carries the
//! generation it was issued under; completions for any other generation are
//! discarded, so a late response can never overwrite a newer session.

use crate::catalog::{CatalogError, Dimension};
use crate::customization::{Choice, CustomizationOptions};
use crate::encoding::{self, EncodingError, RESULT_MIME_TYPE};
use crate::generator::{GenerationRequest, GeneratorError, ImageGenerator};
use crate::upload::{PreviewRegistry, UploadManager, UploadedFile, UploadedImage};
use std::path::PathBuf;

pub const NO_IMAGE_MESSAGE: &str = "Please upload an image first.";
pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred during image generation.";

/// A generated composite, kept as the payload the collaborator returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    payload: String,
}

impl GeneratedImage {
    pub fn from_payload(payload: impl Into<String>) -> Self {
        let payload = payload.into();
        Self {
            payload: encoding::strip_data_uri_prefix(payload.trim()).to_string(),
        }
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Displayable form: `data:image/png;base64,<payload>`.
    pub fn data_uri(&self) -> String {
        encoding::data_uri(RESULT_MIME_TYPE, &self.payload)
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        encoding::decode_payload(&self.payload)
    }
}

/// Exactly one of these holds at any time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success(GeneratedImage),
    Failure(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    /// `Success` or `Failure`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestState::Success(_) | RequestState::Failure(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::Loading => "loading",
            RequestState::Success(_) => "success",
            RequestState::Failure(_) => "failure",
        }
    }
}

/// Why `submit()` refused to start a request. Neither reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("Please upload an image first.")]
    NoImage,
    #[error("A try-on is already being generated.")]
    InFlight,
}

/// Why a started request ended in `Failure`.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Collaborator(#[from] GeneratorError),
    #[error("{0}")]
    Crashed(String),
}

impl GenerationError {
    /// Message for the error panel, never empty.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            message
        }
    }
}

pub type GenerationOutcome = Result<GeneratedImage, GenerationError>;

/// Snapshot of everything a started request needs.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    pub generation: u64,
    pub image_path: PathBuf,
    pub image_name: String,
    pub mime_type: &'static str,
    pub options: CustomizationOptions,
}

/// What `complete()` did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

/// The state machine plus the upload and customization it reads from.
#[derive(Debug, Default)]
pub struct Controller {
    state: RequestState,
    options: CustomizationOptions,
    uploads: UploadManager,
    validation: Option<String>,
    generation: u64,
}

impl Controller {
    pub fn new(registry: PreviewRegistry) -> Self {
        Self {
            uploads: UploadManager::new(registry),
            ..Self::default()
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn options(&self) -> &CustomizationOptions {
        &self.options
    }

    pub fn uploads(&self) -> &UploadManager {
        &self.uploads
    }

    pub fn upload(&self) -> Option<&UploadedImage> {
        self.uploads.current()
    }

    /// Inline validation message shown next to the submit control.
    pub fn validation_message(&self) -> Option<&str> {
        self.validation.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn can_submit(&self) -> bool {
        self.uploads.has_image() && !self.state.is_loading()
    }

    pub fn set_image(&mut self, file: UploadedFile) {
        self.uploads.set_image(file);
        self.validation = None;
    }

    /// Replace one option. Other dimensions keep their values.
    pub fn choose(&mut self, choice: Choice) {
        tracing::debug!(
            dimension = choice.dimension().label(),
            index = choice.index(),
            "option chosen"
        );
        self.options.update(choice);
    }

    /// Choose an option by catalog name (case-insensitive).
    pub fn choose_by_name(&mut self, dimension: Dimension, name: &str) -> Result<(), CatalogError> {
        self.choose(Choice::named(dimension, name)?);
        Ok(())
    }

    pub fn select_next(&mut self, dimension: Dimension) {
        self.choose(self.options.next_choice(dimension));
    }

    pub fn select_previous(&mut self, dimension: Dimension) {
        self.choose(self.options.previous_choice(dimension));
    }

    /// Start a request if an image is present and none is in flight.
    pub fn submit(&mut self) -> Result<RequestTicket, SubmitError> {
        if self.state.is_loading() {
            tracing::warn!(generation = self.generation, "submit ignored: request in flight");
            return Err(SubmitError::InFlight);
        }
        let Some(file) = self.uploads.file() else {
            self.validation = Some(NO_IMAGE_MESSAGE.to_string());
            return Err(SubmitError::NoImage);
        };

        self.generation += 1;
        let ticket = RequestTicket {
            generation: self.generation,
            image_path: file.path.clone(),
            image_name: file.name.clone(),
            mime_type: file.mime_type,
            options: self.options,
        };
        self.validation = None;
        self.state = RequestState::Loading;
        tracing::info!(
            generation = ticket.generation,
            file = %ticket.image_name,
            fit = ticket.options.fit,
            color = ticket.options.color,
            fabric = ticket.options.fabric,
            collar = ticket.options.collar.name,
            "try-on requested"
        );
        Ok(ticket)
    }

    /// Apply the outcome of the request issued under `generation`.
    pub fn complete(&mut self, generation: u64, outcome: GenerationOutcome) -> Completion {
        if generation != self.generation || !self.state.is_loading() {
            tracing::warn!(
                generation,
                current = self.generation,
                state = self.state.label(),
                "discarding stale generation result"
            );
            return Completion::Stale;
        }

        self.state = match outcome {
            Ok(image) => {
                tracing::info!(generation, payload_len = image.payload().len(), "try-on ready");
                RequestState::Success(image)
            }
            Err(err) => {
                let message = err.user_message();
                tracing::warn!(generation, error = %message, "try-on failed");
                RequestState::Failure(message)
            }
        };
        Completion::Applied
    }

    /// Back to a fresh session: no upload, no result, default options.
    pub fn reset(&mut self) {
        self.uploads.clear();
        self.options.reset();
        self.validation = None;
        self.state = RequestState::Idle;
        // Orphans any request still in flight.
        self.generation += 1;
        tracing::info!(generation = self.generation, "session reset");
    }
}

/// Encode the ticket's photo and make the single collaborator call.
#[tracing::instrument(skip_all, fields(generation = ticket.generation))]
pub async fn execute<G: ImageGenerator>(
    ticket: &RequestTicket,
    generator: &G,
) -> GenerationOutcome {
    let image_base64 = encoding::encode_file(&ticket.image_path).await?;
    let request = GenerationRequest {
        image_base64,
        mime_type: ticket.mime_type,
        options: ticket.options,
    };
    let payload = generator.generate(request).await?;
    if payload.trim().is_empty() {
        return Err(GenerationError::Collaborator(GeneratorError::NoImage(None)));
    }
    Ok(GeneratedImage::from_payload(payload))
}
