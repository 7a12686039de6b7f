//! # Block Mutations
//!
//! High-level semantic operations on page documents.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: Each mutation represents one editor action
//! 2. **Validated**: A mutation that fails leaves the document untouched
//! 3. **Invertible**: Every mutation can produce the mutation that undoes it
//!
//! ## Mutation Semantics
//!
//! ### MergeAttributes
//! - Partial update of one block's variant fields
//! - `id`, `order` and `type` never change
//! - Replacing `columns` re-checks id uniqueness and nesting depth
//!
//! ### RemoveBlock
//! - Removes the block and everything nested in it
//! - Siblings are renumbered, nothing else changes
//!
//! ### InsertBlock / MoveBlock
//! - Index is clamped to the target sequence length
//! - Fails on duplicate ids, missing parents or cycles

use std::collections::HashSet;

use pageblocks_common::{IdCollector, Visitor};
use pageblocks_model::{
    block_path, collect_ids, find_block, find_block_mut, insert_block, locate, merge_attributes,
    move_block, nesting_depth, remove_block, AttributeDelta, BlockLocation, ContentBlock,
    MergeError, NotFound, PageContent, TreeError, MAX_NESTING_DEPTH,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Overlay field values onto one block
    MergeAttributes {
        block_id: String,
        delta: AttributeDelta,
    },

    /// Remove a block and its subtree
    RemoveBlock { block_id: String },

    /// Insert a new block at a location
    InsertBlock {
        location: BlockLocation,
        block: ContentBlock,
    },

    /// Move an existing block to a new location
    MoveBlock { block_id: String, to: BlockLocation },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error(transparent)]
    NotFound(#[from] NotFound),

    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),

    #[error("{0}")]
    Tree(TreeError),
}

impl From<TreeError> for MutationError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::NotFound(not_found) => MutationError::NotFound(not_found),
            other => MutationError::Tree(other),
        }
    }
}

impl Mutation {
    pub fn merge(block_id: impl Into<String>, delta: AttributeDelta) -> Self {
        Mutation::MergeAttributes {
            block_id: block_id.into(),
            delta,
        }
    }

    pub fn remove(block_id: impl Into<String>) -> Self {
        Mutation::RemoveBlock {
            block_id: block_id.into(),
        }
    }

    /// Id of the block this mutation addresses
    pub fn block_id(&self) -> &str {
        match self {
            Mutation::MergeAttributes { block_id, .. }
            | Mutation::RemoveBlock { block_id }
            | Mutation::MoveBlock { block_id, .. } => block_id,
            Mutation::InsertBlock { block, .. } => &block.id,
        }
    }

    /// Apply mutation with validation
    pub fn apply(&self, doc: &mut PageContent) -> Result<(), MutationError> {
        self.validate(doc)?;

        match self {
            Mutation::MergeAttributes { block_id, delta } => {
                let merged = Self::merged_block(doc, block_id, delta)?;
                let block = find_block_mut(doc, block_id).ok_or_else(|| NotFound::new(block_id.as_str()))?;
                block.kind = merged.kind;
                Ok(())
            }

            Mutation::RemoveBlock { block_id } => {
                remove_block(doc, block_id)?;
                Ok(())
            }

            Mutation::InsertBlock { location, block } => {
                insert_block(doc, location, block.clone())?;
                Ok(())
            }

            Mutation::MoveBlock { block_id, to } => {
                move_block(doc, block_id, to)?;
                Ok(())
            }
        }
    }

    /// Validate without applying
    pub fn validate(&self, doc: &PageContent) -> Result<(), MutationError> {
        match self {
            Mutation::MergeAttributes { block_id, delta } => {
                Self::merged_block(doc, block_id, delta)?;
                Ok(())
            }

            Mutation::RemoveBlock { block_id } => {
                find_block(doc, block_id).ok_or_else(|| NotFound::new(block_id.as_str()))?;
                Ok(())
            }

            Mutation::InsertBlock { location, block } => {
                Self::check_location(doc, location)?;

                let existing: HashSet<String> = collect_ids(doc).into_iter().collect();
                Self::check_fresh_ids(block, &existing)
            }

            Mutation::MoveBlock { block_id, to } => {
                let block = find_block(doc, block_id).ok_or_else(|| NotFound::new(block_id.as_str()))?;
                Self::check_location(doc, to)?;

                if let Some(parent) = &to.parent {
                    if subtree_ids(block).iter().any(|id| *id == parent.block_id) {
                        return Err(TreeError::CycleDetected(block_id.clone()).into());
                    }
                }
                Ok(())
            }
        }
    }

    /// Mutation that reverts this one when applied to the document this one
    /// was applied to. Must be computed before applying.
    pub fn to_inverse(&self, doc: &PageContent) -> Result<Mutation, MutationError> {
        match self {
            Mutation::MergeAttributes { block_id, delta } => {
                let block = find_block(doc, block_id).ok_or_else(|| NotFound::new(block_id.as_str()))?;
                Ok(Mutation::MergeAttributes {
                    block_id: block_id.clone(),
                    delta: AttributeDelta::capture(block, delta.field_names()),
                })
            }

            Mutation::RemoveBlock { block_id } => {
                let block = find_block(doc, block_id).ok_or_else(|| NotFound::new(block_id.as_str()))?;
                let location = locate(doc, block_id).ok_or_else(|| NotFound::new(block_id.as_str()))?;
                Ok(Mutation::InsertBlock {
                    location,
                    block: block.clone(),
                })
            }

            Mutation::InsertBlock { block, .. } => Ok(Mutation::RemoveBlock {
                block_id: block.id.clone(),
            }),

            Mutation::MoveBlock { block_id, .. } => {
                let from = locate(doc, block_id).ok_or_else(|| NotFound::new(block_id.as_str()))?;
                Ok(Mutation::MoveBlock {
                    block_id: block_id.clone(),
                    to: from,
                })
            }
        }
    }

    fn merged_block(
        doc: &PageContent,
        block_id: &str,
        delta: &AttributeDelta,
    ) -> Result<ContentBlock, MutationError> {
        let block = find_block(doc, block_id).ok_or_else(|| NotFound::new(block_id))?;
        let merged = merge_attributes(block, delta)?;

        if delta.contains("columns") {
            // Ids leaving with the old columns may come back in the new ones
            let replaced: HashSet<String> = subtree_ids(block).into_iter().collect();
            let existing: HashSet<String> = collect_ids(doc)
                .into_iter()
                .filter(|id| !replaced.contains(id) || id == block_id)
                .collect();

            if let Some(columns) = merged.columns_ref() {
                for column in columns {
                    for child in &column.blocks {
                        Self::check_fresh_ids(child, &existing)?;
                    }
                }
            }

            let depth = block_path(doc, block_id)
                .map(|path| path.nesting_depth())
                .unwrap_or(0);
            if depth + nesting_depth(&merged) > MAX_NESTING_DEPTH {
                return Err(TreeError::DepthExceeded(MAX_NESTING_DEPTH).into());
            }
        }

        Ok(merged)
    }

    fn check_location(doc: &PageContent, location: &BlockLocation) -> Result<(), MutationError> {
        let Some(parent) = &location.parent else {
            return Ok(());
        };
        let block = find_block(doc, &parent.block_id)
            .ok_or_else(|| TreeError::ParentNotFound(parent.block_id.clone()))?;
        let columns = block
            .columns_ref()
            .ok_or_else(|| TreeError::NotAContainer(parent.block_id.clone()))?;
        if parent.column >= columns.len() {
            return Err(TreeError::ColumnOutOfRange {
                block_id: parent.block_id.clone(),
                column: parent.column,
            }
            .into());
        }
        Ok(())
    }

    fn check_fresh_ids(block: &ContentBlock, existing: &HashSet<String>) -> Result<(), MutationError> {
        let mut seen = HashSet::new();
        for id in subtree_ids(block) {
            if existing.contains(&id) || !seen.insert(id.clone()) {
                return Err(TreeError::DuplicateId(id).into());
            }
        }
        Ok(())
    }
}

/// Ids of `block` and everything nested in it, in document order
fn subtree_ids(block: &ContentBlock) -> Vec<String> {
    let mut collector = IdCollector::default();
    collector.visit_block(block, 0);
    collector.ids
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationResult {
    /// New document revision
    pub revision: u64,
}
