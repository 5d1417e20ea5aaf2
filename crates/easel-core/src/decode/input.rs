//! The input boundary: image sources handed over by a file picker or a URL.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

/// Default upper bound on accepted input, 10 MB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 10 * 1024 * 1024;

/// Reasons an input is refused before decoding starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// The declared MIME type is not an image type.
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    /// The input exceeds the configured size ceiling.
    #[error("File is too large ({size} bytes, limit {limit} bytes)")]
    TooLarge { size: usize, limit: usize },

    /// The input carried no bytes.
    #[error("File is empty or unreadable")]
    Empty,

    /// A `data:` URL could not be parsed.
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),
}

/// Encoded image bytes plus whatever the picker told us about them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageSource {
    pub bytes: Vec<u8>,
    /// Declared MIME type, e.g. `image/png`. `None` skips the type check.
    pub mime_type: Option<String>,
    /// Original file name, used only for logging.
    pub name: Option<String>,
}

impl ImageSource {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: None,
            name: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parse a `data:<mime>;base64,<payload>` URL.
    ///
    /// Only base64 payloads are accepted; percent-encoded data URLs are not
    /// used for binary images.
    pub fn from_data_url(url: &str) -> Result<Self, InputError> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| InputError::InvalidDataUrl("missing data: scheme".to_string()))?;

        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| InputError::InvalidDataUrl("missing payload separator".to_string()))?;

        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| InputError::InvalidDataUrl("payload is not base64".to_string()))?;

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| InputError::InvalidDataUrl(e.to_string()))?;

        let mut source = Self::from_bytes(bytes);
        if !mime.is_empty() {
            source.mime_type = Some(mime.to_string());
        }
        Ok(source)
    }

    /// Short label for log lines.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

/// Check a source against the type and size rules.
///
/// # Errors
///
/// - `UnsupportedType` when a declared MIME type does not start with `image/`
/// - `Empty` when there are no bytes
/// - `TooLarge` when the byte count exceeds `max_size`
pub fn validate(source: &ImageSource, max_size: usize) -> Result<(), InputError> {
    if let Some(mime) = &source.mime_type {
        if !mime.to_ascii_lowercase().starts_with("image/") {
            return Err(InputError::UnsupportedType(mime.clone()));
        }
    }

    if source.bytes.is_empty() {
        return Err(InputError::Empty);
    }

    if source.bytes.len() > max_size {
        return Err(InputError::TooLarge {
            size: source.bytes.len(),
            limit: max_size,
        });
    }

    Ok(())
}
