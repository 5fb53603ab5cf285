use thiserror::Error;

/// Errors that can occur while exporting the canvas buffer
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The buffer has no pixels to encode
    #[error("Cannot export a {width}x{height} canvas")]
    ZeroSized { width: u32, height: u32 },

    /// The composited image could not be encoded
    #[error("Failed to encode canvas image: {0}")]
    Encode(#[from] image::ImageError),
}

/// Result type for surface operations
pub type SurfaceResult<T> = Result<T, SurfaceError>;
