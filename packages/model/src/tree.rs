//! # Tree Operations
//!
//! Lookup and structural edits over the block tree, including blocks nested
//! inside columns.
//!
//! Every structural edit renumbers `order` in the sequence it touched and
//! leaves every other block (ids, types, fields, positions elsewhere)
//! untouched. No traversal descends past [`MAX_NESTING_DEPTH`].

use std::collections::HashSet;

use crate::ast::{renumber_sequence, ContentBlock, PageContent, MAX_NESTING_DEPTH};
use crate::error::{NotFound, TreeError};
use crate::path::{BlockLocation, BlockPath, ColumnRef, PathSegment};

/// First block with `id` in document order
pub fn find_block<'a>(doc: &'a PageContent, id: &str) -> Option<&'a ContentBlock> {
    find_in(&doc.blocks, id, 0)
}

fn find_in<'a>(blocks: &'a [ContentBlock], id: &str, depth: usize) -> Option<&'a ContentBlock> {
    for block in blocks {
        if block.id == id {
            return Some(block);
        }
        if depth >= MAX_NESTING_DEPTH {
            continue;
        }
        if let Some(columns) = block.columns_ref() {
            for column in columns {
                if let Some(found) = find_in(&column.blocks, id, depth + 1) {
                    return Some(found);
                }
            }
        }
    }
    None
}

pub fn find_block_mut<'a>(doc: &'a mut PageContent, id: &str) -> Option<&'a mut ContentBlock> {
    find_in_mut(&mut doc.blocks, id, 0)
}

fn find_in_mut<'a>(
    blocks: &'a mut [ContentBlock],
    id: &str,
    depth: usize,
) -> Option<&'a mut ContentBlock> {
    for block in blocks.iter_mut() {
        if block.id == id {
            return Some(block);
        }
        if depth >= MAX_NESTING_DEPTH {
            continue;
        }
        if let Some(columns) = block.columns_mut() {
            for column in columns.iter_mut() {
                if let Some(found) = find_in_mut(&mut column.blocks, id, depth + 1) {
                    return Some(found);
                }
            }
        }
    }
    None
}

/// Path from the root to the block with `id`
pub fn block_path(doc: &PageContent, id: &str) -> Option<BlockPath> {
    path_in(&doc.blocks, id, &BlockPath::root(), 0)
}

fn path_in(blocks: &[ContentBlock], id: &str, parent: &BlockPath, depth: usize) -> Option<BlockPath> {
    for (index, block) in blocks.iter().enumerate() {
        let path = parent.block(index);
        if block.id == id {
            return Some(path);
        }
        if depth >= MAX_NESTING_DEPTH {
            continue;
        }
        if let Some(columns) = block.columns_ref() {
            for (column_index, column) in columns.iter().enumerate() {
                let found = path_in(&column.blocks, id, &path.column(column_index), depth + 1);
                if found.is_some() {
                    return found;
                }
            }
        }
    }
    None
}

/// Containing sequence and index of the block with `id`
pub fn locate(doc: &PageContent, id: &str) -> Option<BlockLocation> {
    locate_in(&doc.blocks, id, None, 0)
}

fn locate_in(
    blocks: &[ContentBlock],
    id: &str,
    parent: Option<&ColumnRef>,
    depth: usize,
) -> Option<BlockLocation> {
    for (index, block) in blocks.iter().enumerate() {
        if block.id == id {
            return Some(BlockLocation {
                parent: parent.cloned(),
                index,
            });
        }
        if depth >= MAX_NESTING_DEPTH {
            continue;
        }
        if let Some(columns) = block.columns_ref() {
            for (column, contents) in columns.iter().enumerate() {
                let column_ref = ColumnRef {
                    block_id: block.id.clone(),
                    column,
                };
                let found = locate_in(&contents.blocks, id, Some(&column_ref), depth + 1);
                if found.is_some() {
                    return found;
                }
            }
        }
    }
    None
}

/// Every id in the document, in document order
pub fn collect_ids(doc: &PageContent) -> Vec<String> {
    let mut ids = Vec::new();
    for block in &doc.blocks {
        collect_block_ids(block, 0, &mut ids);
    }
    ids
}

fn collect_block_ids(block: &ContentBlock, depth: usize, ids: &mut Vec<String>) {
    ids.push(block.id.clone());
    if depth >= MAX_NESTING_DEPTH {
        return;
    }
    if let Some(columns) = block.columns_ref() {
        for column in columns {
            for child in &column.blocks {
                collect_block_ids(child, depth + 1, ids);
            }
        }
    }
}

/// Levels of Columns nesting inside `block` (0 for a leaf block)
pub fn nesting_depth(block: &ContentBlock) -> usize {
    subtree_depth(block, 0)
}

fn subtree_depth(block: &ContentBlock, depth: usize) -> usize {
    let Some(columns) = block.columns_ref() else {
        return 0;
    };
    if depth > MAX_NESTING_DEPTH {
        return 1;
    }
    1 + columns
        .iter()
        .flat_map(|column| column.blocks.iter())
        .map(|child| subtree_depth(child, depth + 1))
        .max()
        .unwrap_or(0)
}

fn sequence_mut<'a>(
    doc: &'a mut PageContent,
    parent: Option<&ColumnRef>,
) -> Result<&'a mut Vec<ContentBlock>, TreeError> {
    let Some(parent) = parent else {
        return Ok(&mut doc.blocks);
    };
    let block = find_block_mut(doc, &parent.block_id)
        .ok_or_else(|| TreeError::ParentNotFound(parent.block_id.clone()))?;
    let columns = block
        .columns_mut()
        .ok_or_else(|| TreeError::NotAContainer(parent.block_id.clone()))?;
    columns
        .get_mut(parent.column)
        .map(|column| &mut column.blocks)
        .ok_or_else(|| TreeError::ColumnOutOfRange {
            block_id: parent.block_id.clone(),
            column: parent.column,
        })
}

/// Remove the block with `id` from wherever it lives.
///
/// Returns the removed block (with its whole subtree) and the slot it
/// occupied, so the removal can be reverted with [`insert_block`].
pub fn remove_block(doc: &mut PageContent, id: &str) -> Result<(ContentBlock, BlockLocation), NotFound> {
    let location = locate(doc, id).ok_or_else(|| NotFound::new(id))?;
    let path = block_path(doc, id).ok_or_else(|| NotFound::new(id))?;
    let (sequence, index) = sequence_at_mut(doc, &path).ok_or_else(|| NotFound::new(id))?;
    let removed = sequence.remove(index);
    renumber_sequence(sequence);

    tracing::debug!(block_id = %id, index, "removed block");
    Ok((removed, location))
}

/// Sequence holding the block at `path`, resolved by position so repeated
/// container ids cannot redirect it
fn sequence_at_mut<'a>(doc: &'a mut PageContent, path: &BlockPath) -> Option<(&'a mut Vec<ContentBlock>, usize)> {
    let (last, parents) = path.segments().split_last()?;
    let PathSegment::Block(index) = *last else {
        return None;
    };

    let mut sequence = &mut doc.blocks;
    let mut container = None;
    for segment in parents {
        match *segment {
            PathSegment::Block(i) => container = Some(i),
            PathSegment::Column(column) => {
                let current = sequence;
                sequence = &mut current.get_mut(container.take()?)?.columns_mut()?.get_mut(column)?.blocks;
            }
        }
    }

    if index < sequence.len() {
        Some((sequence, index))
    } else {
        None
    }
}

/// Insert `block` at `location`, clamping the index to the sequence length.
///
/// Fails without touching the document if any id in the block's subtree
/// already exists or the insertion would nest columns too deeply.
pub fn insert_block(
    doc: &mut PageContent,
    location: &BlockLocation,
    block: ContentBlock,
) -> Result<(), TreeError> {
    let existing: HashSet<String> = collect_ids(doc).into_iter().collect();
    let mut incoming = Vec::new();
    collect_block_ids(&block, 0, &mut incoming);
    let mut fresh = HashSet::new();
    for id in incoming {
        if existing.contains(&id) || !fresh.insert(id.clone()) {
            return Err(TreeError::DuplicateId(id));
        }
    }

    let parent_depth = match &location.parent {
        None => 0,
        Some(parent) => {
            let path = block_path(doc, &parent.block_id)
                .ok_or_else(|| TreeError::ParentNotFound(parent.block_id.clone()))?;
            path.nesting_depth() + 1
        }
    };
    if parent_depth + nesting_depth(&block) > MAX_NESTING_DEPTH {
        return Err(TreeError::DepthExceeded(MAX_NESTING_DEPTH));
    }

    let sequence = sequence_mut(doc, location.parent.as_ref())?;
    let index = location.index.min(sequence.len());
    tracing::debug!(block_id = %block.id, index, "inserting block");
    sequence.insert(index, block);
    renumber_sequence(sequence);
    Ok(())
}

/// Move the block with `id` to `to`. The index in `to` is interpreted after
/// the block has been taken out of its current sequence.
///
/// On failure the block is put back where it was.
pub fn move_block(doc: &mut PageContent, id: &str, to: &BlockLocation) -> Result<BlockLocation, TreeError> {
    let block = find_block(doc, id).ok_or_else(|| NotFound::new(id))?;
    if let Some(parent) = &to.parent {
        if parent.block_id == id || find_in_subtree(block, &parent.block_id) {
            return Err(TreeError::CycleDetected(id.to_string()));
        }
    }

    let (block, from) = remove_block(doc, id)?;
    match insert_block(doc, to, block.clone()) {
        Ok(()) => Ok(from),
        Err(err) => {
            insert_block(doc, &from, block)?;
            Err(err)
        }
    }
}

fn find_in_subtree(block: &ContentBlock, id: &str) -> bool {
    block
        .columns_ref()
        .map(|columns| {
            columns
                .iter()
                .any(|column| find_in(&column.blocks, id, 1).is_some())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Column;

    fn sample() -> PageContent {
        PageContent::new(vec![
            ContentBlock::heading("title", 1, "Title"),
            ContentBlock::columns(
                "cols",
                vec![
                    Column::new(50.0, vec![ContentBlock::paragraph("left", "L")]),
                    Column::new(
                        50.0,
                        vec![
                            ContentBlock::paragraph("right-a", "Ra"),
                            ContentBlock::paragraph("right-b", "Rb"),
                        ],
                    ),
                ],
            ),
            ContentBlock::paragraph("outro", "Bye"),
        ])
    }

    #[test]
    fn test_find_nested_block() {
        let doc = sample();

        assert_eq!(find_block(&doc, "right-b").unwrap().id, "right-b");
        assert!(find_block(&doc, "missing").is_none());
        assert_eq!(
            block_path(&doc, "right-b").unwrap().to_string(),
            "blocks[1].columns[1].blocks[1]"
        );
    }

    #[test]
    fn test_locate_nested_block() {
        let doc = sample();
        assert_eq!(locate(&doc, "right-b"), Some(BlockLocation::in_column("cols", 1, 1)));
        assert_eq!(locate(&doc, "outro"), Some(BlockLocation::root(2)));
    }

    #[test]
    fn test_remove_with_repeated_container_id() {
        let mut doc = PageContent::new(vec![
            ContentBlock::columns("c", vec![Column::new(100.0, vec![])]),
            ContentBlock::columns(
                "c",
                vec![Column::new(100.0, vec![ContentBlock::paragraph("x", "X")])],
            ),
        ]);

        let (removed, _) = remove_block(&mut doc, "x").unwrap();
        assert_eq!(removed.id, "x");
        assert!(find_block(&doc, "x").is_none());
        assert!(doc.blocks[0].columns_ref().unwrap()[0].blocks.is_empty());
        assert!(doc.blocks[1].columns_ref().unwrap()[0].blocks.is_empty());
    }

    #[test]
    fn test_collect_ids_in_document_order() {
        let ids = collect_ids(&sample());
        assert_eq!(ids, vec!["title", "cols", "left", "right-a", "right-b", "outro"]);
    }

    #[test]
    fn test_remove_renumbers_only_its_sequence() {
        let mut doc = sample();
        let (removed, location) = remove_block(&mut doc, "right-a").unwrap();

        assert_eq!(removed.id, "right-a");
        assert_eq!(location, BlockLocation::in_column("cols", 1, 0));

        let right = &doc.blocks[1].columns_ref().unwrap()[1].blocks;
        assert_eq!(right.len(), 1);
        assert_eq!(right[0].id, "right-b");
        assert_eq!(right[0].order, 0);
        assert_eq!(doc.blocks[2].order, 2);
    }

    #[test]
    fn test_remove_missing_block() {
        let mut doc = sample();
        assert_eq!(remove_block(&mut doc, "ghost"), Err(NotFound::new("ghost")));
        assert_eq!(doc, sample());
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut doc = sample();
        let result = insert_block(&mut doc, &BlockLocation::root(0), ContentBlock::paragraph("left", "again"));

        assert_eq!(result, Err(TreeError::DuplicateId("left".to_string())));
        assert_eq!(doc, sample());
    }

    #[test]
    fn test_insert_clamps_index() {
        let mut doc = sample();
        insert_block(&mut doc, &BlockLocation::in_column("cols", 0, 99), ContentBlock::paragraph("new", "N")).unwrap();

        let left = &doc.blocks[1].columns_ref().unwrap()[0].blocks;
        assert_eq!(left[1].id, "new");
        assert_eq!(left[1].order, 1);
    }

    #[test]
    fn test_insert_into_non_container() {
        let mut doc = sample();
        let result = insert_block(&mut doc, &BlockLocation::in_column("title", 0, 0), ContentBlock::paragraph("new", "N"));
        assert_eq!(result, Err(TreeError::NotAContainer("title".to_string())));
    }

    #[test]
    fn test_move_into_own_column_is_cycle() {
        let mut doc = sample();
        let result = move_block(&mut doc, "cols", &BlockLocation::in_column("cols", 0, 0));
        assert_eq!(result, Err(TreeError::CycleDetected("cols".to_string())));
        assert_eq!(doc, sample());
    }

    #[test]
    fn test_move_out_of_column() {
        let mut doc = sample();
        let from = move_block(&mut doc, "left", &BlockLocation::root(0)).unwrap();

        assert_eq!(from, BlockLocation::in_column("cols", 0, 0));
        assert_eq!(doc.blocks[0].id, "left");
        assert_eq!(doc.blocks[0].order, 0);
        assert_eq!(doc.blocks[1].order, 1);
        assert!(doc.blocks[2].columns_ref().unwrap()[0].blocks.is_empty());
    }

    #[test]
    fn test_move_to_bad_column_restores_block() {
        let mut doc = sample();
        let result = move_block(&mut doc, "outro", &BlockLocation::in_column("cols", 5, 0));

        assert!(matches!(result, Err(TreeError::ColumnOutOfRange { .. })));
        assert_eq!(doc, sample());
    }
}
