//! Decoding of `data:` URIs carrying base64 images.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use thiserror::Error;

/// MIME type sent to the model when the URI does not name an image type.
pub const FALLBACK_IMAGE_MIME: &str = "image/png";

/// Browsers sometimes drop padding from canvas exports.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Error, Debug)]
pub enum DataUriError {
    #[error("missing ',' separator between header and payload")]
    MissingSeparator,

    #[error("header must look like 'data:<mime>;base64', got '{0}'")]
    InvalidHeader(String),

    #[error("payload is empty")]
    EmptyPayload,

    #[error("payload is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// A decoded data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DataUri {
    pub fn parse(uri: &str) -> Result<Self, DataUriError> {
        let (header, payload) = uri
            .trim()
            .split_once(',')
            .ok_or(DataUriError::MissingSeparator)?;

        let media = header
            .strip_prefix("data:")
            .and_then(|rest| rest.strip_suffix(";base64"))
            .ok_or_else(|| DataUriError::InvalidHeader(header.to_string()))?;

        // Parameters such as `;charset=...` may precede `;base64`.
        let mime_type = media.split(';').next().unwrap_or_default().trim();

        let compact: String = payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        if compact.is_empty() {
            return Err(DataUriError::EmptyPayload);
        }

        let bytes = LENIENT_BASE64.decode(compact.as_bytes())?;

        Ok(Self {
            mime_type: mime_type.to_ascii_lowercase(),
            bytes,
        })
    }

    /// MIME type to declare for the inline image sent to the model.
    pub fn image_mime(&self) -> &str {
        if self.mime_type.starts_with("image/") {
            &self.mime_type
        } else {
            FALLBACK_IMAGE_MIME
        }
    }

    /// File extension for the scratch copy.
    pub fn extension(&self) -> &'static str {
        match self.image_mime() {
            "image/png" => "png",
            "image/jpeg" | "image/jpg" => "jpg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/bmp" => "bmp",
            _ => "bin",
        }
    }
}
