use pageblocks_model::{Column, ContentBlock, PageContent, MAX_NESTING_DEPTH};

/// Visitor pattern for traversing a page immutably
///
/// This trait provides default implementations that walk the entire tree.
/// Override specific visit_* methods to perform custom actions on nodes.
///
/// `depth` is the number of Columns blocks enclosing a block (0 at the
/// root). A column reports the depth of the Columns block that owns it.
/// Walks never descend into columns below [`MAX_NESTING_DEPTH`].
pub trait Visitor: Sized {
    fn visit_document(&mut self, doc: &PageContent) {
        walk_document(self, doc);
    }

    fn visit_block(&mut self, block: &ContentBlock, depth: usize) {
        walk_block(self, block, depth);
    }

    fn visit_column(&mut self, column: &Column, depth: usize) {
        walk_column(self, column, depth);
    }
}

/// Mutable visitor pattern for transforming a page
///
/// Similar to Visitor, but provides mutable access to nodes.
pub trait VisitorMut: Sized {
    fn visit_document_mut(&mut self, doc: &mut PageContent) {
        walk_document_mut(self, doc);
    }

    fn visit_block_mut(&mut self, block: &mut ContentBlock, depth: usize) {
        walk_block_mut(self, block, depth);
    }

    fn visit_column_mut(&mut self, column: &mut Column, depth: usize) {
        walk_column_mut(self, column, depth);
    }
}

// Default walk implementations for immutable visitor

pub fn walk_document<V: Visitor>(visitor: &mut V, doc: &PageContent) {
    for block in &doc.blocks {
        visitor.visit_block(block, 0);
    }
}

pub fn walk_block<V: Visitor>(visitor: &mut V, block: &ContentBlock, depth: usize) {
    if depth >= MAX_NESTING_DEPTH {
        return;
    }
    if let Some(columns) = block.columns_ref() {
        for column in columns {
            visitor.visit_column(column, depth);
        }
    }
}

pub fn walk_column<V: Visitor>(visitor: &mut V, column: &Column, depth: usize) {
    for block in &column.blocks {
        visitor.visit_block(block, depth + 1);
    }
}

// Default walk implementations for mutable visitor

pub fn walk_document_mut<V: VisitorMut>(visitor: &mut V, doc: &mut PageContent) {
    for block in &mut doc.blocks {
        visitor.visit_block_mut(block, 0);
    }
}

pub fn walk_block_mut<V: VisitorMut>(visitor: &mut V, block: &mut ContentBlock, depth: usize) {
    if depth >= MAX_NESTING_DEPTH {
        return;
    }
    if let Some(columns) = block.columns_mut() {
        for column in columns {
            visitor.visit_column_mut(column, depth);
        }
    }
}

pub fn walk_column_mut<V: VisitorMut>(visitor: &mut V, column: &mut Column, depth: usize) {
    for block in &mut column.blocks {
        visitor.visit_block_mut(block, depth + 1);
    }
}
