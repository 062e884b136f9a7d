//! Image payload encoding
//!
//! The generator speaks base64 in both directions: the uploaded photo goes
//! out as a bare standard-alphabet payload and the composite comes back the
//! same way, to be displayed as a `data:` URI.

use base64::Engine as _;
use std::path::{Path, PathBuf};

/// MIME type the fitting room assumes for generated composites.
pub const RESULT_MIME_TYPE: &str = "image/png";

#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("Could not read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("'{}' is empty.", .0.display())]
    Empty(PathBuf),
}

/// Read a file and return its contents as a bare base64 payload.
pub async fn encode_file(path: &Path) -> Result<String, EncodingError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| EncodingError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    if bytes.is_empty() {
        return Err(EncodingError::Empty(path.to_path_buf()));
    }
    Ok(encode_bytes(&bytes))
}

pub fn encode_bytes(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub fn decode_payload(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    base64::engine::general_purpose::STANDARD.decode(strip_data_uri_prefix(payload).trim())
}

/// Drop a leading `data:<mime>;base64,` header if present.
pub fn strip_data_uri_prefix(payload: &str) -> &str {
    if payload.starts_with("data:") {
        if let Some((_, rest)) = payload.split_once(',') {
            return rest;
        }
    }
    payload
}

/// Assemble a displayable `data:` URI for a base64 payload.
pub fn data_uri(mime_type: &str, payload: &str) -> String {
    format!("data:{};base64,{}", mime_type, strip_data_uri_prefix(payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_data_uri_prefix() {
        assert_eq!(strip_data_uri_prefix("data:image/jpeg;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_uri_prefix("AAAA"), "AAAA");
        assert_eq!(strip_data_uri_prefix("data:broken"), "data:broken");
    }

    #[test]
    fn test_data_uri_never_doubles_prefix() {
        assert_eq!(
            data_uri(RESULT_MIME_TYPE, "iVBORw0KGgo..."),
            "data:image/png;base64,iVBORw0KGgo..."
        );
        assert_eq!(
            data_uri(RESULT_MIME_TYPE, "data:image/png;base64,QUJD"),
            "data:image/png;base64,QUJD"
        );
    }

    #[test]
    fn test_decode_payload_accepts_uri_form() {
        assert_eq!(decode_payload("data:image/png;base64,QUJD").unwrap(), b"ABC");
        assert!(decode_payload("not base64!").is_err());
    }

    #[tokio::test]
    async fn test_encode_file_reads_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, b"ABC").unwrap();
        assert_eq!(encode_file(&path).await.unwrap(), "QUJD");
    }

    #[tokio::test]
    async fn test_encode_file_reports_missing_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.png");
        let err = encode_file(&missing).await.unwrap_err();
        assert!(matches!(err, EncodingError::Read { .. }));
        assert!(err.to_string().contains("gone.png"));

        let empty = dir.path().join("empty.png");
        std::fs::write(&empty, b"").unwrap();
        assert!(matches!(
            encode_file(&empty).await,
            Err(EncodingError::Empty(_))
        ));
    }
}
