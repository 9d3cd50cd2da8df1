use thiserror::Error;

use crate::note::NoteId;

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("no note with id {0}")]
    NotFound(NoteId),
    #[error("no note is active")]
    NoActiveNote,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage write rejected: {0}")]
    WriteRejected(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum DrawingError {
    #[error("encoded image is not a base64 payload or data URL")]
    MalformedEncoding,
    #[error(transparent)]
    Base64(#[from] base64::DecodeError),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error("font data could not be parsed")]
    InvalidFont,
    #[error("cannot allocate a {width}x{height} drawing surface")]
    SurfaceSize { width: u32, height: u32 },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("no drawing is open")]
    NotDrawing,
    #[error(transparent)]
    Note(#[from] NoteError),
    #[error(transparent)]
    Drawing(#[from] DrawingError),
}
