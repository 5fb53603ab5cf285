//! Self-describing image payloads of the form `data:<mime-type>;base64,<payload>`.

use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PNG_MIME_TYPE: &str = "image/png";

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Errors describing a malformed data URI
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataUriError {
    #[error("payload is empty")]
    Empty,

    #[error("payload does not start with 'data:'")]
    MissingScheme,

    #[error("payload is not base64 encoded (expected ';base64,')")]
    MissingBase64Marker,

    #[error("invalid MIME type '{0}'")]
    InvalidMimeType(String),

    #[error("expected an image MIME type, got '{0}'")]
    NotAnImage(String),

    #[error("base64 payload is empty")]
    EmptyPayload,

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
}

/// An encoded still image carrying its own MIME type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EncodedImage {
    mime_type: String,
    data: String,
}

impl EncodedImage {
    /// Wrap raw PNG bytes
    pub fn from_png_bytes(bytes: &[u8]) -> Self {
        Self {
            mime_type: PNG_MIME_TYPE.to_owned(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Parse and validate a `data:<mime-type>;base64,<payload>` string.
    ///
    /// The payload must decode as base64; the MIME type must look like
    /// `type/subtype`. Parameters such as `;charset=...` before the base64
    /// marker are not accepted.
    pub fn parse(uri: &str) -> Result<Self, DataUriError> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(DataUriError::Empty);
        }
        let rest = uri.strip_prefix(SCHEME).ok_or(DataUriError::MissingScheme)?;
        let (mime_type, data) = rest
            .split_once(BASE64_MARKER)
            .ok_or(DataUriError::MissingBase64Marker)?;

        validate_mime_type(mime_type)?;

        if data.is_empty() {
            return Err(DataUriError::EmptyPayload);
        }
        STANDARD
            .decode(data)
            .map_err(|e| DataUriError::InvalidBase64(e.to_string()))?;

        Ok(Self {
            mime_type: mime_type.to_ascii_lowercase(),
            data: data.to_owned(),
        })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The base64 text, without the `data:` prefix
    pub fn base64_data(&self) -> &str {
        &self.data
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Decode the payload back to raw bytes
    pub fn decode_bytes(&self) -> Result<Vec<u8>, DataUriError> {
        STANDARD
            .decode(&self.data)
            .map_err(|e| DataUriError::InvalidBase64(e.to_string()))
    }

    pub fn to_data_uri(&self) -> String {
        self.to_string()
    }
}

fn validate_mime_type(mime_type: &str) -> Result<(), DataUriError> {
    let invalid = || DataUriError::InvalidMimeType(mime_type.to_owned());
    let (kind, subtype) = mime_type.split_once('/').ok_or_else(invalid)?;
    let is_token = |s: &str| {
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-' | '_'))
    };
    if is_token(kind) && is_token(subtype) {
        Ok(())
    } else {
        Err(invalid())
    }
}

impl fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}{}{BASE64_MARKER}{}", self.mime_type, self.data)
    }
}

impl FromStr for EncodedImage {
    type Err = DataUriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EncodedImage {
    type Error = DataUriError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EncodedImage> for String {
    fn from(image: EncodedImage) -> Self {
        image.to_data_uri()
    }
}
