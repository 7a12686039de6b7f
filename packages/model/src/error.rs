use thiserror::Error;

use crate::ast::BlockType;
use crate::path::BlockPath;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Structural violation found while validating a document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Unsupported content version {version:?}")]
    UnsupportedVersion { version: String },

    #[error("Block at {path} has an empty id")]
    EmptyId { path: BlockPath },

    #[error("Duplicate block id {id:?} at {path} (first used at {first})")]
    DuplicateId {
        id: String,
        path: BlockPath,
        first: BlockPath,
    },

    #[error("Invalid `{field}` at {path}: {reason}")]
    InvalidField {
        path: BlockPath,
        field: String,
        reason: String,
    },

    #[error("Columns nested deeper than {max_depth} levels at {path}")]
    DepthExceeded { path: BlockPath, max_depth: usize },
}

impl ValidationError {
    pub fn invalid_field(path: &BlockPath, field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            path: path.clone(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Location of the offending block, if the error is tied to one
    pub fn path(&self) -> Option<&BlockPath> {
        match self {
            Self::UnsupportedVersion { .. } => None,
            Self::EmptyId { path }
            | Self::DuplicateId { path, .. }
            | Self::InvalidField { path, .. }
            | Self::DepthExceeded { path, .. } => Some(path),
        }
    }
}

/// Failure reading a document from its interchange format
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown field `{field}` at {path}")]
    UnknownField { path: BlockPath, field: String },

    #[error("JSON nested deeper than {limit} levels at byte {offset}")]
    TooDeep { limit: usize, offset: usize },
}

/// An attribute delta that cannot be merged into a block
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MergeError {
    #[error("Field `{field}` is not valid for {block_type} blocks")]
    TypeMismatch { block_type: BlockType, field: String },

    #[error("Field `{field}` cannot be changed after creation")]
    ImmutableField { field: String },

    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// An operation addressed a block id absent from the tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Block not found: {id}")]
pub struct NotFound {
    pub id: String,
}

impl NotFound {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Structural edit that would break the tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error(transparent)]
    NotFound(#[from] NotFound),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Block {0} is not a columns block")]
    NotAContainer(String),

    #[error("Columns block {block_id} has no column {column}")]
    ColumnOutOfRange { block_id: String, column: usize },

    #[error("Duplicate block id: {0}")]
    DuplicateId(String),

    #[error("Would move block {0} inside itself")]
    CycleDetected(String),

    #[error("Columns would be nested deeper than {0} levels")]
    DepthExceeded(usize),
}
