//! # Document Handle
//!
//! A Document represents a single page file and its editing state.
//! Documents can be:
//! - **Memory-backed**: Temporary, for testing or in-memory operations
//! - **File-backed**: Single-user editing with disk persistence
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Parse → Renumber → Validate → Edit → Save
//!   ↓      ↓                             ↓      ↓
//! File  PageContent                 Mutations  File
//! ```

use std::path::PathBuf;

use pageblocks_common::fill_default_alignment;
use pageblocks_model::{
    find_block, from_json, to_json_pretty, validate_with, AttributeDelta, ContentBlock,
    PageContent, TextAlign, ValidationConfig,
};

use crate::mutations::{Mutation, MutationError, MutationResult};
use crate::surface::BlockTarget;
use crate::EditorError;

/// Editable page document
#[derive(Debug)]
pub struct Document {
    /// Path to source file (if any)
    pub path: PathBuf,

    /// Increments on each successful mutation
    pub revision: u64,

    /// Backing storage strategy
    storage: DocumentStorage,
}

/// Storage backend for document
#[derive(Debug)]
pub enum DocumentStorage {
    /// In-memory only (for testing, temp docs)
    Memory { content: PageContent },

    /// File-backed (single-user editing)
    File { content: PageContent, dirty: bool },
}

impl Document {
    /// Wrap already-built content (memory-backed, not validated)
    pub fn from_content(path: PathBuf, content: PageContent) -> Self {
        Self {
            path,
            revision: 0,
            storage: DocumentStorage::Memory { content },
        }
    }

    /// Parse, renumber and validate source text (memory-backed)
    pub fn from_json(path: PathBuf, source: &str, config: &ValidationConfig) -> Result<Self, EditorError> {
        let content = Self::read_content(source, config)?;
        Ok(Self::from_content(path, content))
    }

    /// Load document from file (file-backed)
    pub fn load(path: PathBuf, config: &ValidationConfig) -> Result<Self, EditorError> {
        let source = std::fs::read_to_string(&path)?;
        let content = Self::read_content(&source, config)?;
        tracing::info!(path = %path.display(), blocks = content.blocks.len(), "loaded document");

        Ok(Self {
            path,
            revision: 0,
            storage: DocumentStorage::File {
                content,
                dirty: false,
            },
        })
    }

    fn read_content(source: &str, config: &ValidationConfig) -> Result<PageContent, EditorError> {
        let mut content = from_json(source, config.mode)?;
        content.renumber();
        validate_with(&content, config)?;
        Ok(content)
    }

    pub fn content(&self) -> &PageContent {
        match &self.storage {
            DocumentStorage::Memory { content } | DocumentStorage::File { content, .. } => content,
        }
    }

    /// Content plus the dirty flag of file-backed storage
    fn storage_mut(&mut self) -> (&mut PageContent, Option<&mut bool>) {
        match &mut self.storage {
            DocumentStorage::Memory { content } => (content, None),
            DocumentStorage::File { content, dirty } => (content, Some(dirty)),
        }
    }

    /// Apply a mutation
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        Ok(self.apply_mutation(&mutation)?)
    }

    fn apply_mutation(&mut self, mutation: &Mutation) -> Result<MutationResult, MutationError> {
        let (content, dirty) = self.storage_mut();
        mutation.apply(content)?;
        if let Some(dirty) = dirty {
            *dirty = true;
        }
        self.revision += 1;

        tracing::debug!(
            block_id = mutation.block_id(),
            revision = self.revision,
            "applied mutation"
        );
        Ok(MutationResult {
            revision: self.revision,
        })
    }

    /// One-shot default-alignment pass over the whole document; counts as a
    /// single revision when anything changed
    pub fn fill_default_alignment(&mut self, align: TextAlign) -> usize {
        let (content, dirty) = self.storage_mut();
        let changed = fill_default_alignment(content, align);
        if changed > 0 {
            if let Some(dirty) = dirty {
                *dirty = true;
            }
            self.revision += 1;
        }
        changed
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        match &self.storage {
            DocumentStorage::File { dirty, .. } => *dirty,
            _ => false,
        }
    }

    pub fn is_file_backed(&self) -> bool {
        matches!(self.storage, DocumentStorage::File { .. })
    }

    /// Save document to disk (if file-backed)
    pub fn save(&mut self) -> Result<(), EditorError> {
        match &mut self.storage {
            DocumentStorage::File { content, dirty } => {
                let json = to_json_pretty(content)?;
                std::fs::write(&self.path, json)?;
                *dirty = false;
                tracing::info!(path = %self.path.display(), revision = self.revision, "saved document");
                Ok(())
            }
            _ => Err(EditorError::NotFileBacked),
        }
    }

    /// Pretty JSON of the current content
    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(to_json_pretty(self.content())?)
    }
}

impl BlockTarget for Document {
    fn block(&self, id: &str) -> Option<&ContentBlock> {
        find_block(self.content(), id)
    }

    fn merge(&mut self, id: &str, delta: &AttributeDelta) -> Result<(), MutationError> {
        self.apply_mutation(&Mutation::merge(id, delta.clone()))?;
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<(), MutationError> {
        self.apply_mutation(&Mutation::remove(id))?;
        Ok(())
    }
}
