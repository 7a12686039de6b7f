//! Comprehensive tests for complex mutation sequences
//!
//! This tests:
//! - Move + merge + delete chains
//! - Undo/redo sequences
//! - Batched mutations
//! - Document integrity after operations

use pageblocks_editor::{Mutation, UndoStack};
use pageblocks_model::{
    collect_ids, find_block, validate, AttributeDelta, BlockKind, BlockLocation, Column,
    ContentBlock, PageContent,
};

fn sample() -> PageContent {
    PageContent::new(vec![
        ContentBlock::heading("title", 1, "v0"),
        ContentBlock::columns(
            "cols",
            vec![
                Column::new(50.0, vec![ContentBlock::paragraph("child-1", "Child 1")]),
                Column::new(50.0, vec![ContentBlock::paragraph("child-2", "Child 2")]),
            ],
        ),
        ContentBlock::image("hero", "/media/hero.png"),
    ])
}

fn title(doc: &PageContent) -> String {
    match &find_block(doc, "title").unwrap().kind {
        BlockKind::Heading(heading) => heading.content.clone(),
        other => panic!("Expected heading, got {:?}", other),
    }
}

#[test]
fn test_move_then_delete_sequence() {
    let mut doc = sample();
    let original = doc.clone();
    let mut stack = UndoStack::new();

    // Move child-2 next to child-1
    let move_mut = Mutation::MoveBlock {
        block_id: "child-2".to_string(),
        to: BlockLocation::in_column("cols", 0, 1),
    };
    stack.apply(&move_mut, &mut doc).unwrap();

    // Verify move worked
    let columns = find_block(&doc, "cols").unwrap().columns_ref().unwrap();
    assert_eq!(columns[0].blocks.len(), 2);
    assert!(columns[1].blocks.is_empty());

    // Delete the columns block (takes both children)
    stack.apply(&Mutation::remove("cols"), &mut doc).unwrap();
    assert!(find_block(&doc, "child-1").is_none());
    assert!(find_block(&doc, "child-2").is_none());

    // Undo delete (should restore both)
    stack.undo(&mut doc).unwrap();
    assert!(find_block(&doc, "child-1").is_some());
    assert!(find_block(&doc, "child-2").is_some());

    // Undo move (should move child-2 back)
    stack.undo(&mut doc).unwrap();
    assert_eq!(doc, original);
}

#[test]
fn test_multiple_merges_with_undo_redo() {
    let mut doc = sample();
    let mut stack = UndoStack::new();

    // Apply sequence of updates
    for i in 1..=5 {
        let mutation = Mutation::merge(
            "title",
            AttributeDelta::new().set("content", format!("v{}", i)),
        );
        stack.apply(&mutation, &mut doc).unwrap();
    }

    assert_eq!(stack.undo_depth(), 5);
    assert_eq!(title(&doc), "v5");

    // Undo all
    for _ in 0..5 {
        assert!(stack.undo(&mut doc).unwrap());
    }
    assert_eq!(title(&doc), "v0");
    assert_eq!(stack.undo_depth(), 0);
    assert_eq!(stack.redo_depth(), 5);

    // Redo all
    for _ in 0..5 {
        assert!(stack.redo(&mut doc).unwrap());
    }
    assert_eq!(title(&doc), "v5");
    assert_eq!(stack.undo_depth(), 5);
    assert_eq!(stack.redo_depth(), 0);

    // Undo 3, apply new (clears redo)
    for _ in 0..3 {
        stack.undo(&mut doc).unwrap();
    }
    assert_eq!(stack.redo_depth(), 3);
    assert_eq!(title(&doc), "v2");

    let mutation = Mutation::merge("title", AttributeDelta::new().set("content", "new branch"));
    stack.apply(&mutation, &mut doc).unwrap();
    assert_eq!(stack.redo_depth(), 0); // Redo cleared
}

#[test]
fn test_batched_image_updates() {
    let mut doc = sample();
    let original = doc.clone();
    let mut stack = UndoStack::new();

    // Batch multiple attribute changes
    stack.begin_batch("Style hero");

    let changes = vec![
        ("width", "80%"),
        ("align", "wide"),
        ("alt", "Hero"),
        ("caption", "Our office"),
    ];
    for (field, value) in changes {
        let mutation = Mutation::merge("hero", AttributeDelta::new().set(field, value));
        stack.apply(&mutation, &mut doc).unwrap();
    }

    stack.end_batch();

    // Should be single undo entry
    assert_eq!(stack.undo_depth(), 1);
    assert_eq!(stack.undo_label(), Some("Style hero"));

    // Undo reverts all 4 changes, including fields that were absent before
    stack.undo(&mut doc).unwrap();
    assert_eq!(doc, original);
}

#[test]
fn test_insert_and_remove_sequence() {
    let mut doc = sample();
    let mut stack = UndoStack::new();

    let insert = Mutation::InsertBlock {
        location: BlockLocation::in_column("cols", 1, 0),
        block: ContentBlock::paragraph("inserted", "Inserted"),
    };
    stack.apply(&insert, &mut doc).unwrap();
    assert!(find_block(&doc, "inserted").is_some());

    stack.apply(&Mutation::remove("child-2"), &mut doc).unwrap();
    assert_eq!(
        collect_ids(&doc),
        vec!["title", "cols", "child-1", "inserted", "hero"]
    );

    stack.undo(&mut doc).unwrap();
    stack.undo(&mut doc).unwrap();
    assert_eq!(doc, sample());

    stack.redo(&mut doc).unwrap();
    stack.redo(&mut doc).unwrap();
    assert!(find_block(&doc, "child-2").is_none());
    assert_eq!(validate(&doc), Ok(()));
}

#[test]
fn test_failed_redo_keeps_history() {
    let mut doc = sample();
    let mut stack = UndoStack::new();

    stack.apply(&Mutation::remove("hero"), &mut doc).unwrap();
    stack.undo(&mut doc).unwrap();

    // Remove the block behind the stack's back so redo can no longer apply
    Mutation::remove("hero").apply(&mut doc).unwrap();

    assert!(stack.redo(&mut doc).is_err());
    assert_eq!(stack.redo_depth(), 1);
}
