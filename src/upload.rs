//! Upload manager and previewable handles
//!
//! A [`PreviewHandle`] is the terminal analogue of a browser object URL: an
//! opaque `blob:` identifier registered in a [`PreviewRegistry`] for as long
//! as the upload it points at is active. Handles release themselves on drop,
//! so replacing or clearing an upload can never leak or double-release one.

use crate::catalog;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const HANDLE_SCHEME: &str = "blob:tailor-fit/";

/// A file accepted by the file input surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub path: PathBuf,
    pub name: String,
    pub mime_type: &'static str,
    pub size_bytes: u64,
}

/// Errors from the file input surface.
#[derive(Debug, thiserror::Error)]
pub enum FileInputError {
    #[error("No file path was entered.")]
    Empty,
    #[error("'{0}' does not exist.")]
    NotFound(PathBuf),
    #[error("'{0}' is not a file.")]
    NotAFile(PathBuf),
    #[error("'{0}' is not a PNG, JPG, or WEBP image.")]
    UnsupportedType(PathBuf),
    #[error("Could not inspect '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolve a user-entered path into an accepted image file.
///
/// Mirrors a file picker restricted to `image/png, image/jpeg, image/webp`:
/// the type is inferred from the extension and nothing else is validated.
pub fn select_file(raw: &str) -> Result<UploadedFile, FileInputError> {
    let trimmed = raw.trim().trim_matches(|c| c == '"' || c == '\'');
    if trimmed.is_empty() {
        return Err(FileInputError::Empty);
    }
    let path = expand_home(trimmed);

    let metadata = match fs::metadata(&path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(FileInputError::NotFound(path));
        }
        Err(source) => return Err(FileInputError::Io { path, source }),
    };
    if !metadata.is_file() {
        return Err(FileInputError::NotAFile(path));
    }

    let mime_type = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(catalog::mime_for_extension)
        .ok_or_else(|| FileInputError::UnsupportedType(path.clone()))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(UploadedFile {
        path,
        name,
        mime_type,
        size_bytes: metadata.len(),
    })
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

#[derive(Debug, Default)]
struct RegistryState {
    live: HashSet<Uuid>,
    created: u64,
    released: u64,
}

/// Tracks which preview handles are currently live.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    inner: Arc<Mutex<RegistryState>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RegistryState> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Create a handle for `file`. The handle is released when dropped.
    pub fn acquire(&self, file: &UploadedFile) -> PreviewHandle {
        let id = Uuid::new_v4();
        {
            let mut state = self.lock();
            state.live.insert(id);
            state.created += 1;
        }
        tracing::debug!(handle = %id, file = %file.name, "preview handle created");
        PreviewHandle {
            id,
            registry: self.clone(),
        }
    }

    fn release(&self, id: Uuid) {
        let mut state = self.lock();
        if state.live.remove(&id) {
            state.released += 1;
            tracing::debug!(handle = %id, "preview handle released");
        } else {
            tracing::warn!(handle = %id, "release of unknown preview handle ignored");
        }
    }

    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    pub fn created_count(&self) -> u64 {
        self.lock().created
    }

    pub fn released_count(&self) -> u64 {
        self.lock().released
    }
}

/// Scoped previewable handle for one uploaded file.
#[derive(Debug)]
pub struct PreviewHandle {
    id: Uuid,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The handle as a `blob:` style URL.
    pub fn url(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", HANDLE_SCHEME, self.id())
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

/// The active upload and its preview.
#[derive(Debug)]
pub struct UploadedImage {
    pub file: UploadedFile,
    pub preview: PreviewHandle,
}

/// Holds at most one uploaded image at a time.
#[derive(Debug, Default)]
pub struct UploadManager {
    registry: PreviewRegistry,
    current: Option<UploadedImage>,
}

impl UploadManager {
    pub fn new(registry: PreviewRegistry) -> Self {
        Self {
            registry,
            current: None,
        }
    }

    /// Make `file` the active upload, releasing the previous preview first.
    pub fn set_image(&mut self, file: UploadedFile) -> &UploadedImage {
        // Release before acquiring so at most one handle is ever live.
        drop(self.current.take());
        let preview = self.registry.acquire(&file);
        tracing::info!(
            file = %file.name,
            mime = file.mime_type,
            bytes = file.size_bytes,
            "photo selected"
        );
        self.current.insert(UploadedImage { file, preview })
    }

    /// Release the active preview (if any) and forget the file.
    pub fn clear(&mut self) {
        if let Some(image) = self.current.take() {
            let name = image.file.name.clone();
            drop(image);
            tracing::debug!(
                file = %name,
                live = self.registry.live_count(),
                created = self.registry.created_count(),
                released = self.registry.released_count(),
                "upload cleared"
            );
        }
    }

    pub fn current(&self) -> Option<&UploadedImage> {
        self.current.as_ref()
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        self.current.as_ref().map(|image| &image.file)
    }

    pub fn has_image(&self) -> bool {
        self.current.is_some()
    }
}

/// Human-readable byte size for the uploader panel.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

/// Shorthand used by tests and the headless path.
pub fn file_from_path(path: &Path) -> Result<UploadedFile, FileInputError> {
    select_file(&path.to_string_lossy())
}
