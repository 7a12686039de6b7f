use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pageblocks_common::{walk_block, walk_column, BlockStats, Visitor};
use pageblocks_editor::Document;
use pageblocks_model::{BlockKind, Column, ContentBlock, PageContent};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Page file to print
    pub file: String,
}

pub fn tree(args: TreeArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let doc = Document::load(PathBuf::from(cwd).join(&args.file), &config.validation())?;

    println!("{} {}", args.file.bright_white().bold(), doc.content().version.to_string().dimmed());
    for line in outline(doc.content()) {
        println!("{}", line);
    }

    let stats = BlockStats::collect(doc.content());
    println!();
    println!("{} blocks, max depth {}", stats.total, stats.max_depth);
    for (block_type, count) in &stats.by_type {
        println!("  {:<10} {}", block_type.to_string(), count);
    }

    Ok(())
}

/// One indented line per block and per column
fn outline(doc: &PageContent) -> Vec<String> {
    let mut printer = OutlinePrinter::default();
    printer.visit_document(doc);
    printer.lines
}

#[derive(Default)]
struct OutlinePrinter {
    lines: Vec<String>,
}

impl Visitor for OutlinePrinter {
    fn visit_block(&mut self, block: &ContentBlock, depth: usize) {
        let indent = "  ".repeat(depth * 2);
        let mut line = format!("{}{} {}", indent, block.block_type(), block.id);
        if let Some(label) = label(block) {
            line.push_str(&format!(" {:?}", label));
        }
        self.lines.push(line);
        walk_block(self, block, depth);
    }

    fn visit_column(&mut self, column: &Column, depth: usize) {
        let indent = "  ".repeat(depth * 2 + 1);
        self.lines.push(format!("{}column {}%", indent, column.width));
        walk_column(self, column, depth);
    }
}

fn label(block: &ContentBlock) -> Option<String> {
    let text = match &block.kind {
        BlockKind::Paragraph(b) => &b.content,
        BlockKind::Heading(b) => &b.content,
        BlockKind::Quote(b) => &b.content,
        BlockKind::Button(b) => &b.text,
        BlockKind::Image(b) => &b.url,
        BlockKind::Embed(b) => &b.url,
        _ => return None,
    };
    Some(truncate(text, 40))
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut short: String = text.chars().take(max).collect();
        short.push('…');
        short
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_indents_columns() {
        let doc = PageContent::new(vec![
            ContentBlock::heading("title", 1, "Welcome"),
            ContentBlock::columns(
                "cols",
                vec![
                    Column::new(50.0, vec![ContentBlock::paragraph("left", "Left side")]),
                    Column::new(50.0, vec![ContentBlock::image("right", "r.png")]),
                ],
            ),
        ]);

        assert_eq!(
            outline(&doc),
            vec![
                "heading title \"Welcome\"",
                "columns cols",
                "  column 50%",
                "    paragraph left \"Left side\"",
                "  column 50%",
                "    image right \"r.png\"",
            ]
        );
    }

    #[test]
    fn test_truncate_long_labels() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 4), "abcd…");
    }
}
