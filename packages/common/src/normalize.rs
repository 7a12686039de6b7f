use pageblocks_model::{BlockKind, ContentBlock, ImageAlign, PageContent, TextAlign};

use crate::visitor::{walk_block_mut, VisitorMut};

/// Set `align` on every block that supports it but has none.
///
/// An explicit, idempotent load-time pass: running it twice changes nothing
/// the second time. Returns the number of blocks changed.
pub fn fill_default_alignment(doc: &mut PageContent, align: TextAlign) -> usize {
    let mut filler = AlignmentFiller { align, changed: 0 };
    filler.visit_document_mut(doc);
    if filler.changed > 0 {
        tracing::debug!(changed = filler.changed, align = align.as_str(), "filled default alignment");
    }
    filler.changed
}

struct AlignmentFiller {
    align: TextAlign,
    changed: usize,
}

impl AlignmentFiller {
    fn fill<T>(&mut self, slot: &mut Option<T>, value: T) {
        if slot.is_none() {
            *slot = Some(value);
            self.changed += 1;
        }
    }
}

impl VisitorMut for AlignmentFiller {
    fn visit_block_mut(&mut self, block: &mut ContentBlock, depth: usize) {
        let align = self.align;
        match &mut block.kind {
            BlockKind::Paragraph(paragraph) => self.fill(&mut paragraph.align, align),
            BlockKind::Heading(heading) => self.fill(&mut heading.align, align),
            BlockKind::Button(button) => self.fill(&mut button.align, align),
            BlockKind::Image(image) => self.fill(&mut image.align, ImageAlign::from(align)),
            _ => {}
        }
        walk_block_mut(self, block, depth);
    }
}
