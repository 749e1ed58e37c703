use thiserror::Error;

use crate::extract::ExtractError;

/// Errors surfaced by the slide conversion pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The rendering collaborator failed to produce a snapshot for a slide.
    #[error("rendering slide {slide_id} failed: {message}")]
    Render { slide_id: String, message: String },

    /// The rendering collaborator produced a snapshot the data model cannot
    /// deserialize.
    #[error("invalid node snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Structural extraction failure that could not be degraded in place.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// An image reference the caller's fetch layer could not resolve.
    /// Surfaced per slide; the rest of the deck continues.
    #[error("image {source_ref} could not be fetched")]
    UnreachableImage { source_ref: String },

    /// The document-assembly collaborator rejected a slide.
    #[error("writing slide {slide_id} failed: {message}")]
    Sink { slide_id: String, message: String },
}

/// A specialized Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
