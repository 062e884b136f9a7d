//! One-shot generation without the terminal UI
//!
//! Drives the same controller as the fitting room: select the photo, apply
//! the named options, submit, execute, complete, then write the result.

use crate::catalog::Dimension;
use crate::customization::CustomizationOptions;
use crate::export;
use crate::generator::ImageGenerator;
use crate::lifecycle::{self, Controller, RequestState};
use crate::upload;
use anyhow::{bail, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// What `--generate` was asked for. Unset options keep their defaults.
#[derive(Debug, Clone, Default)]
pub struct HeadlessRequest {
    pub photo: PathBuf,
    pub fit: Option<String>,
    pub color: Option<String>,
    pub fabric: Option<String>,
    pub collar: Option<String>,
    /// Exact output file; otherwise a generated name in the output directory
    pub out: Option<PathBuf>,
}

impl HeadlessRequest {
    fn choices(&self) -> [(Dimension, Option<&str>); 4] {
        [
            (Dimension::Fit, self.fit.as_deref()),
            (Dimension::Color, self.color.as_deref()),
            (Dimension::Fabric, self.fabric.as_deref()),
            (Dimension::Collar, self.collar.as_deref()),
        ]
    }
}

fn apply_choices(controller: &mut Controller, request: &HeadlessRequest) -> Result<()> {
    for (dimension, name) in request.choices() {
        if let Some(name) = name {
            controller.choose_by_name(dimension, name)?;
        }
    }
    Ok(())
}

/// Generate one try-on and return where it was written.
pub async fn run<G: ImageGenerator>(
    request: &HeadlessRequest,
    generator: &G,
    output_dir: &Path,
) -> Result<PathBuf> {
    let mut controller = Controller::default();
    apply_choices(&mut controller, request)?;
    controller.set_image(upload::file_from_path(&request.photo)?);

    let ticket = controller.submit()?;
    let outcome = lifecycle::execute(&ticket, generator).await;
    controller.complete(ticket.generation, outcome);

    match controller.state() {
        RequestState::Success(image) => match &request.out {
            Some(path) => {
                export::write_image(image, path).await?;
                Ok(path.clone())
            }
            None => Ok(export::save_to_dir(image, &ticket.options, output_dir).await?),
        },
        RequestState::Failure(message) => bail!("{}", message),
        other => bail!("generation ended in unexpected state '{}'", other.label()),
    }
}

/// Human-readable catalog for `--list`.
pub fn catalog_listing() -> String {
    let defaults = CustomizationOptions::default();
    let mut out = String::new();
    for dimension in Dimension::ALL {
        let _ = writeln!(out, "{}:", dimension.label());
        for entry in dimension.entries() {
            let marker = if entry == defaults.value(dimension) {
                " (default)"
            } else {
                ""
            };
            let _ = writeln!(out, "  {}{}", entry, marker);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorError;
    use crate::lifecycle::tests::{photo, FakeGenerator};
    use std::sync::atomic::Ordering;

    fn request_for(dir: &tempfile::TempDir) -> HeadlessRequest {
        HeadlessRequest {
            photo: photo(dir, "photo.jpg").path,
            fit: Some("slim fit".to_string()),
            color: Some("Mint Green".to_string()),
            fabric: Some("Chambray".to_string()),
            collar: Some("Pastel Lines".to_string()),
            out: None,
        }
    }

    #[tokio::test]
    async fn test_run_writes_result() {
        let dir = tempfile::tempdir().unwrap();
        let generator = FakeGenerator::returning("QUJD");
        let mut request = request_for(&dir);
        request.out = Some(dir.path().join("look.png"));

        let path = run(&request, &generator, dir.path()).await.unwrap();
        assert_eq!(path, dir.path().join("look.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"ABC");

        let sent = generator.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.options.fit, "Slim Fit");
        assert_eq!(sent.options.collar.name, "Pastel Lines");
    }

    #[tokio::test]
    async fn test_run_names_file_from_options() {
        let dir = tempfile::tempdir().unwrap();
        let generator = FakeGenerator::returning("QUJD");
        let path = run(&request_for(&dir), &generator, dir.path()).await.unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("tailor-fit-slim-fit-mint-green-"));
    }

    #[tokio::test]
    async fn test_run_surfaces_failure_message() {
        let dir = tempfile::tempdir().unwrap();
        let generator = FakeGenerator::failing(GeneratorError::MissingApiKey);
        let err = run(&request_for(&dir), &generator, dir.path())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[tokio::test]
    async fn test_unknown_option_fails_before_request() {
        let dir = tempfile::tempdir().unwrap();
        let generator = FakeGenerator::returning("QUJD");
        let mut request = request_for(&dir);
        request.collar = Some("Paisley".to_string());

        let err = run(&request, &generator, dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("Pastel Lines"));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_catalog_listing_marks_defaults() {
        let listing = catalog_listing();
        assert!(listing.contains("Collar Design:"));
        assert!(listing.contains("Slim Fit (default)"));
        assert!(listing.contains("Chambray"));
    }
}
