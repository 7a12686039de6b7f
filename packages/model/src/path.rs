//! Locating blocks inside a (possibly nested) document.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step from the document root towards a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Index into a block sequence (root or a column's blocks)
    Block(usize),
    /// Index into a Columns block's column list
    Column(usize),
}

/// Sequence of indices leading from the root to a block or column.
///
/// Rendered as `blocks[2].columns[1].blocks[0]`; the empty path is the
/// document itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BlockPath {
    segments: Vec<PathSegment>,
}

impl BlockPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn block(&self, index: usize) -> Self {
        self.with(PathSegment::Block(index))
    }

    pub fn column(&self, index: usize) -> Self {
        self.with(PathSegment::Column(index))
    }

    fn with(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of Columns blocks this path passes through
    pub fn nesting_depth(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, PathSegment::Column(_)))
            .count()
    }
}

impl fmt::Display for BlockPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("document");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                PathSegment::Block(index) => write!(f, "blocks[{}]", index)?,
                PathSegment::Column(index) => write!(f, "columns[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// A column inside a Columns block, addressed by the block's id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRef {
    pub block_id: String,
    pub column: usize,
}

/// A slot in a block sequence: the root sequence when `parent` is `None`,
/// otherwise the blocks of one column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ColumnRef>,
    pub index: usize,
}

impl BlockLocation {
    pub fn root(index: usize) -> Self {
        Self {
            parent: None,
            index,
        }
    }

    pub fn in_column(block_id: impl Into<String>, column: usize, index: usize) -> Self {
        Self {
            parent: Some(ColumnRef {
                block_id: block_id.into(),
                column,
            }),
            index,
        }
    }
}
