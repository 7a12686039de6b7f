//! # Pageblocks Editor
//!
//! Editing engine for page documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: JSON → PageContent, validate, merge  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle + mutations      │
//! │  - Load/save documents                      │
//! │  - Apply mutations with validation          │
//! │  - Undo/redo with inverse mutations         │
//! │  - Block editor surface (align/resize/del)  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Content is the source of truth**: surfaces hold only uncommitted
//!    local state and re-read the block on every view
//! 2. **One write per gesture**: dragging a width is local until commit
//! 3. **Explicit handles**: the document is passed to each operation, never
//!    stored in a global
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pageblocks_editor::{BlockSurface, Document, SurfaceConfig};
//!
//! let mut doc = Document::load("about.json".into(), &ValidationConfig::default())?;
//!
//! // Mounting fills in a missing alignment once
//! let mut surface = BlockSurface::mount("img-1", &mut doc, SurfaceConfig::default())?;
//!
//! surface.set_width_live(35.0)?;
//! surface.set_width_live(60.0)?;
//! surface.commit_width(&mut doc)?; // width = "60%"
//!
//! doc.save()?;
//! ```

mod document;
mod errors;
mod mutations;
mod surface;
mod undo_stack;
mod upload;

pub use document::{Document, DocumentStorage};
pub use errors::{EditorError, SurfaceError, UploadError};
pub use mutations::{Mutation, MutationError, MutationResult};
pub use surface::{BlockSurface, BlockTarget, SurfaceConfig, SurfaceState, SurfaceView};
pub use undo_stack::{MutationBatch, UndoStack, UndoTarget, DEFAULT_UNDO_LIMIT};
pub use upload::{insert_uploaded_image, mime_type_for, MockUploader, Uploader};

// Re-export common types for convenience
pub use pageblocks_model::{AttributeDelta, BlockLocation, ContentBlock, PageContent};
