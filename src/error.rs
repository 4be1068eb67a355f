use thiserror::Error;

pub type Result<T> = std::result::Result<T, SignatureError>;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("Signum encountered a backend error")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("could not encode PNG: {0}")]
    Encode(String),

    #[error("not a base64 image data URL: {0}")]
    InvalidDataUrl(String),

    #[error("unrecognized CSS color: {0}")]
    InvalidColor(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Signum encountered an error")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<serde_json::Error> for SignatureError {
    fn from(err: serde_json::Error) -> Self {
        SignatureError::Config(err.to_string())
    }
}

impl From<base64::DecodeError> for SignatureError {
    fn from(err: base64::DecodeError) -> Self {
        SignatureError::InvalidDataUrl(err.to_string())
    }
}

#[cfg(feature = "raster")]
impl From<png::EncodingError> for SignatureError {
    fn from(err: png::EncodingError) -> Self {
        SignatureError::Encode(err.to_string())
    }
}

#[cfg(feature = "cairo")]
impl From<cairo::Error> for SignatureError {
    fn from(err: cairo::Error) -> Self {
        SignatureError::Backend(Box::new(err))
    }
}

#[cfg(feature = "cairo")]
impl From<cairo::IoError> for SignatureError {
    fn from(err: cairo::IoError) -> Self {
        SignatureError::Encode(err.to_string())
    }
}
