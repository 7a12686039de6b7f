use std::collections::BTreeMap;

use pageblocks_model::{BlockType, ContentBlock, PageContent};

use crate::visitor::{walk_block, Visitor};

/// Collects every block id in document order
#[derive(Debug, Default)]
pub struct IdCollector {
    pub ids: Vec<String>,
}

impl IdCollector {
    pub fn collect(doc: &PageContent) -> Vec<String> {
        let mut collector = Self::default();
        collector.visit_document(doc);
        collector.ids
    }
}

impl Visitor for IdCollector {
    fn visit_block(&mut self, block: &ContentBlock, depth: usize) {
        self.ids.push(block.id.clone());
        walk_block(self, block, depth);
    }
}

/// Block counts per type plus the deepest Columns nesting seen
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BlockStats {
    pub by_type: BTreeMap<BlockType, usize>,
    pub total: usize,
    /// Largest block depth encountered (0 when every block is at the root)
    pub max_depth: usize,
}

impl BlockStats {
    pub fn collect(doc: &PageContent) -> Self {
        let mut stats = Self::default();
        stats.visit_document(doc);
        stats
    }

    pub fn count(&self, block_type: BlockType) -> usize {
        self.by_type.get(&block_type).copied().unwrap_or(0)
    }
}

impl Visitor for BlockStats {
    fn visit_block(&mut self, block: &ContentBlock, depth: usize) {
        *self.by_type.entry(block.block_type()).or_insert(0) += 1;
        self.total += 1;
        self.max_depth = self.max_depth.max(depth);
        walk_block(self, block, depth);
    }
}
