//! Writing a generated try-on to disk
//!
//! Only the currently displayed result is ever written; nothing is kept
//! between sessions.

use crate::customization::CustomizationOptions;
use crate::lifecycle::GeneratedImage;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Suffixes tried after the plain name before a save gives up.
const MAX_NAME_SUFFIX: u32 = 99;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("The generated image is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("Could not write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `tailor-fit-<fit>-<color>-<stamp>.png`, lowercase with dashes.
pub fn result_file_name(options: &CustomizationOptions, stamp: u64) -> String {
    format!(
        "tailor-fit-{}-{}-{}.png",
        slug(options.fit),
        slug(options.color),
        stamp
    )
}

/// `name` with `-<n>` before the extension; `n == 0` keeps it unchanged.
fn numbered(name: &str, n: u32) -> String {
    if n == 0 {
        return name.to_string();
    }
    match name.strip_suffix(".png") {
        Some(stem) => format!("{}-{}.png", stem, n),
        None => format!("{}-{}", name, n),
    }
}

fn slug(value: &str) -> String {
    value
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn unix_stamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

async fn create_dir(dir: &Path) -> Result<(), ExportError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| ExportError::Write {
            path: dir.to_path_buf(),
            source,
        })
}

/// Decode `image` and write it to `path`, creating parent directories.
///
/// An existing file at `path` is replaced.
pub async fn write_image(image: &GeneratedImage, path: &Path) -> Result<(), ExportError> {
    let bytes = image.decode()?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir(dir).await?;
    }
    tokio::fs::write(path, &bytes)
        .await
        .map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "try-on saved");
    Ok(())
}

/// Write `image` into `dir` under a generated file name.
///
/// Never replaces an existing file: a taken name gets a `-<n>` suffix.
pub async fn save_to_dir(
    image: &GeneratedImage,
    options: &CustomizationOptions,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    save_with_stamp(image, options, dir, unix_stamp()).await
}

async fn save_with_stamp(
    image: &GeneratedImage,
    options: &CustomizationOptions,
    dir: &Path,
    stamp: u64,
) -> Result<PathBuf, ExportError> {
    let bytes = image.decode()?;
    create_dir(dir).await?;

    let name = result_file_name(options, stamp);
    for n in 0..=MAX_NAME_SUFFIX {
        let path = dir.join(numbered(&name, n));
        let opened = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await;
        let mut file = match opened {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
            Err(source) => return Err(ExportError::Write { path, source }),
        };
        let written = match file.write_all(&bytes).await {
            Ok(()) => file.flush().await,
            Err(err) => Err(err),
        };
        if let Err(source) = written {
            return Err(ExportError::Write { path, source });
        }
        tracing::info!(path = %path.display(), bytes = bytes.len(), "try-on saved");
        return Ok(path);
    }

    Err(ExportError::Write {
        path: dir.join(name),
        source: std::io::Error::new(ErrorKind::AlreadyExists, "every candidate file name is taken"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Dimension;
    use crate::customization::Choice;

    #[test]
    fn test_result_file_name_is_slugged() {
        let mut options = CustomizationOptions::default();
        options.update(Choice::named(Dimension::Fit, "Slim Fit").unwrap());
        options.update(Choice::named(Dimension::Color, "Mint Green").unwrap());
        assert_eq!(
            result_file_name(&options, 42),
            "tailor-fit-slim-fit-mint-green-42.png"
        );
    }

    #[tokio::test]
    async fn test_save_to_dir_writes_decoded_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let image = GeneratedImage::from_payload("data:image/png;base64,QUJD");
        let out = dir.path().join("out");
        let path = save_to_dir(&image, &CustomizationOptions::default(), &out)
            .await
            .unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"ABC");
        assert_eq!(path.extension().unwrap(), "png");
    }

    #[tokio::test]
    async fn test_same_second_saves_keep_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let options = CustomizationOptions::default();
        let first = GeneratedImage::from_payload("QUJD");
        let second = GeneratedImage::from_payload("WFla");

        let first_path = save_with_stamp(&first, &options, dir.path(), 7).await.unwrap();
        let second_path = save_with_stamp(&second, &options, dir.path(), 7).await.unwrap();

        assert_ne!(first_path, second_path);
        assert_eq!(
            second_path.file_name().unwrap(),
            "tailor-fit-slim-fit-sky-blue-7-1.png"
        );
        assert_eq!(std::fs::read(&first_path).unwrap(), b"ABC");
        assert_eq!(std::fs::read(&second_path).unwrap(), b"XYZ");
    }

    #[tokio::test]
    async fn test_invalid_payload_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        let image = GeneratedImage::from_payload("not base64!!");
        let err = write_image(&image, &path).await.unwrap_err();
        assert!(matches!(err, ExportError::Decode(_)));
        assert!(!path.exists());
    }
}
