use thiserror::Error;

/// Failures the upload widget can run into. Every variant is handled by the
/// controller itself (alert plus reset where applicable) before it is
/// returned to the caller.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("no file selected")]
    NoFileSelected,

    #[error("a submission is already in flight")]
    InFlight,

    #[error("failed to read selected file: {0}")]
    Read(#[from] std::io::Error),

    #[error("server rejected the upload: {0}")]
    Server(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected response (status {status}): {reason}")]
    MalformedResponse { status: u16, reason: String },
}

/// Failures while turning an uploaded image into a puzzle pack.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("cannot decode image: {0}")]
    Decode(image::ImageError),

    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("{pieces} pieces requested for a {width}x{height} image")]
    PieceCount { pieces: u32, width: u32, height: u32 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}
