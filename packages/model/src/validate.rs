//! # Document Validation
//!
//! Walks every block, including those nested in columns, and fails on the
//! first structural violation with the path of the offending block.
//!
//! Checked, in document order:
//! 1. The content version is one this reader supports
//! 2. Every id is non-empty and unique across the whole tree
//! 3. Variant values are in range (heading level, dimensions, urls)
//! 4. Columns never nest deeper than the configured maximum

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ast::{BlockKind, ContentBlock, Dimension, PageContent, MAX_NESTING_DEPTH};
use crate::error::{ValidationError, ValidationResult};
use crate::path::BlockPath;
use crate::serializer::ParseMode;

/// Limits applied while reading and validating documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationConfig {
    /// Maximum Columns nesting; values above [`MAX_NESTING_DEPTH`] are clamped
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default)]
    pub mode: ParseMode,
}

fn default_max_depth() -> usize {
    MAX_NESTING_DEPTH
}

impl ValidationConfig {
    pub fn effective_max_depth(&self) -> usize {
        self.max_depth.min(MAX_NESTING_DEPTH)
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            mode: ParseMode::default(),
        }
    }
}

/// Validate with the default limits
pub fn validate(doc: &PageContent) -> ValidationResult<()> {
    validate_with(doc, &ValidationConfig::default())
}

pub fn validate_with(doc: &PageContent, config: &ValidationConfig) -> ValidationResult<()> {
    if !doc.version.is_supported() {
        return Err(ValidationError::UnsupportedVersion {
            version: doc.version.as_str().to_string(),
        });
    }

    let mut validator = Validator {
        max_depth: config.effective_max_depth(),
        seen: HashMap::new(),
    };
    validator.check_sequence(&doc.blocks, &BlockPath::root(), 0)
}

struct Validator<'a> {
    max_depth: usize,
    seen: HashMap<&'a str, BlockPath>,
}

impl<'a> Validator<'a> {
    fn check_sequence(
        &mut self,
        blocks: &'a [ContentBlock],
        parent: &BlockPath,
        depth: usize,
    ) -> ValidationResult<()> {
        for (index, block) in blocks.iter().enumerate() {
            self.check_block(block, parent.block(index), depth)?;
        }
        Ok(())
    }

    fn check_block(&mut self, block: &'a ContentBlock, path: BlockPath, depth: usize) -> ValidationResult<()> {
        if block.id.trim().is_empty() {
            return Err(ValidationError::EmptyId { path });
        }
        if let Some(first) = self.seen.get(block.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: block.id.clone(),
                path,
                first: first.clone(),
            });
        }
        self.seen.insert(block.id.as_str(), path.clone());

        check_fields(&block.kind, &path)?;

        let BlockKind::Columns(columns) = &block.kind else {
            return Ok(());
        };
        if depth >= self.max_depth {
            return Err(ValidationError::DepthExceeded {
                path,
                max_depth: self.max_depth,
            });
        }
        for (index, column) in columns.columns.iter().enumerate() {
            self.check_sequence(&column.blocks, &path.column(index), depth + 1)?;
        }
        Ok(())
    }
}

/// Range checks on a block's own fields and on every block nested in its
/// columns. Ids and depth are left to [`validate_with`].
pub(crate) fn check_kind(kind: &BlockKind, path: &BlockPath) -> ValidationResult<()> {
    check_fields(kind, path)?;
    if let BlockKind::Columns(columns) = kind {
        for (index, column) in columns.columns.iter().enumerate() {
            let column_path = path.column(index);
            for (child_index, child) in column.blocks.iter().enumerate() {
                check_kind(&child.kind, &column_path.block(child_index))?;
            }
        }
    }
    Ok(())
}

fn check_fields(kind: &BlockKind, path: &BlockPath) -> ValidationResult<()> {
    match kind {
        BlockKind::Heading(heading) => {
            if !(1..=6).contains(&heading.level) {
                return Err(ValidationError::invalid_field(
                    path,
                    "level",
                    format!("expected 1..=6, got {}", heading.level),
                ));
            }
        }
        BlockKind::Image(image) => {
            check_url(path, &image.url)?;
            check_dimension(path, "width", image.width)?;
            check_dimension(path, "height", image.height)?;
        }
        BlockKind::Embed(embed) => {
            check_url(path, &embed.url)?;
            check_dimension(path, "width", embed.width)?;
            check_dimension(path, "height", embed.height)?;
        }
        BlockKind::Button(button) => check_url(path, &button.url)?,
        BlockKind::Spacer(spacer) => {
            if !spacer.height.is_finite() || spacer.height < 0.0 {
                return Err(ValidationError::invalid_field(
                    path,
                    "height",
                    format!("expected a non-negative number, got {}", spacer.height),
                ));
            }
        }
        BlockKind::Columns(columns) => {
            for (index, column) in columns.columns.iter().enumerate() {
                if !column.width.is_finite() || column.width < 0.0 {
                    return Err(ValidationError::invalid_field(
                        &path.column(index),
                        "width",
                        format!("expected a non-negative number, got {}", column.width),
                    ));
                }
            }
        }
        BlockKind::Paragraph(_)
        | BlockKind::List(_)
        | BlockKind::Quote(_)
        | BlockKind::Code(_)
        | BlockKind::Html(_)
        | BlockKind::Table(_) => {}
    }
    Ok(())
}

fn check_url(path: &BlockPath, url: &str) -> ValidationResult<()> {
    if url.trim().is_empty() {
        return Err(ValidationError::invalid_field(path, "url", "must not be empty"));
    }
    Ok(())
}

fn check_dimension(path: &BlockPath, field: &str, dimension: Option<Dimension>) -> ValidationResult<()> {
    match dimension {
        Some(d) if !d.is_valid() => Err(ValidationError::invalid_field(
            path,
            field,
            format!("expected a non-negative size, got {}", d),
        )),
        _ => Ok(()),
    }
}
