//! Error types for the editor

use pageblocks_model::{BlockType, ParseError, ValidationError};
use thiserror::Error;

use crate::mutations::MutationError;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Document is not file-backed")]
    NotFileBacked,
}

/// Failure of an editor surface operation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("Block not found: {0}")]
    NotFound(String),

    #[error("Surface was deleted")]
    Deleted,

    #[error("{block_type} blocks have no `{field}` attribute")]
    Unsupported {
        block_type: BlockType,
        field: &'static str,
    },

    #[error("Commit failed: {0}")]
    Commit(#[from] MutationError),
}

/// Failure reported by an upload collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Refusing to upload an empty file")]
    EmptyFile,

    #[error("Upload rejected: {0}")]
    Rejected(String),

    #[error("Expected an image, got {mime_type}")]
    NotAnImage { mime_type: String },
}
