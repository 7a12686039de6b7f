//! Integration tests for editor crate

use anyhow::Result;
use pageblocks_editor::{
    insert_uploaded_image, BlockSurface, BlockTarget, Document, EditorError, MockUploader,
    Mutation, SurfaceConfig, SurfaceError, SurfaceState,
};
use pageblocks_model::{
    collect_ids, from_json, AttributeDelta, BlockKind, BlockLocation, ContentBlock, Dimension,
    IdGenerator, ImageAlign, ImageBlock, MergeError, ParseMode, TextAlign, ValidationConfig,
};
use std::path::PathBuf;

const PAGE: &str = r#"{
    "version": "1.0",
    "blocks": [
        { "id": "intro", "order": 0, "type": "paragraph", "content": "Hello", "align": "left" },
        { "id": "photo", "order": 1, "type": "image", "url": "a.png", "alt": "A cat" },
        { "id": "outro", "order": 2, "type": "paragraph", "content": "Bye", "align": "left" }
    ]
}"#;

fn image(doc: &Document, id: &str) -> ImageBlock {
    match &doc.block(id).unwrap().kind {
        BlockKind::Image(image) => image.clone(),
        other => panic!("Expected image, got {:?}", other),
    }
}

fn memory_doc() -> Document {
    Document::from_json(PathBuf::from("page.json"), PAGE, &ValidationConfig::default()).unwrap()
}

#[test]
fn test_document_lifecycle() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("page.json");
    std::fs::write(&path, PAGE)?;

    // Load
    let mut doc = Document::load(path.clone(), &ValidationConfig::default())?;
    assert_eq!(doc.revision, 0);
    assert!(!doc.is_dirty());

    // Edit
    doc.apply(Mutation::merge("photo", AttributeDelta::new().set("title", "Cat")))?;
    assert!(doc.is_dirty());

    // Save and reload
    doc.save()?;
    assert!(!doc.is_dirty());

    let reloaded = Document::load(path, &ValidationConfig::default())?;
    assert_eq!(reloaded.content(), doc.content());
    assert_eq!(image(&reloaded, "photo").title.as_deref(), Some("Cat"));
    Ok(())
}

#[test]
fn test_load_reports_strict_mode_unknown_field() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("page.json");
    std::fs::write(
        &path,
        r#"{ "version": "1.0", "blocks": [
            { "id": "p", "order": 0, "type": "paragraph", "content": "x", "font": "serif" }
        ] }"#,
    )?;

    let strict = Document::load(path.clone(), &ValidationConfig::default());
    assert!(matches!(strict, Err(EditorError::Parse(_))));

    let lenient = ValidationConfig {
        mode: ParseMode::Lenient,
        ..ValidationConfig::default()
    };
    assert!(Document::load(path, &lenient).is_ok());
    Ok(())
}

#[test]
fn test_mount_normalizes_alignment_with_one_mutation() {
    let mut doc = memory_doc();
    assert_eq!(image(&doc, "photo").align, None);

    let surface = BlockSurface::mount("photo", &mut doc, SurfaceConfig::default()).unwrap();

    assert_eq!(image(&doc, "photo").align, Some(ImageAlign::Center));
    assert_eq!(doc.revision, 1);
    assert_eq!(surface.state(), SurfaceState::Idle);

    // Rendering again never re-fires the normalization
    for _ in 0..3 {
        surface.view(&doc).unwrap();
    }
    assert_eq!(doc.revision, 1);
}

#[test]
fn test_drag_then_commit_writes_once() {
    let mut doc = memory_doc();
    let mut surface = BlockSurface::mount("photo", &mut doc, SurfaceConfig::default()).unwrap();
    let after_mount = doc.revision;

    surface.pointer_enter().unwrap();
    surface.set_width_live(35.0).unwrap();
    surface.set_width_live(60.0).unwrap();
    assert_eq!(doc.revision, after_mount);

    surface.commit_width(&mut doc).unwrap();

    assert_eq!(image(&doc, "photo").width, Some(Dimension::Percent(60.0)));
    assert_eq!(doc.revision, after_mount + 1);

    let json: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
    assert_eq!(json["blocks"][1]["width"], "60%");
}

#[test]
fn test_width_is_clamped_and_snapped() {
    let mut doc = memory_doc();
    let mut surface = BlockSurface::mount("photo", &mut doc, SurfaceConfig::default()).unwrap();

    assert_eq!(surface.set_width_live(3.0).unwrap(), 10);
    assert_eq!(surface.set_width_live(140.0).unwrap(), 100);
    assert_eq!(surface.set_width_live(62.4).unwrap(), 60);
}

#[test]
fn test_failed_commit_keeps_persisted_width() {
    // A target whose merges always fail, to exercise the surface's error path
    struct Rejecting(Document);

    impl BlockTarget for Rejecting {
        fn block(&self, id: &str) -> Option<&ContentBlock> {
            self.0.block(id)
        }

        fn merge(&mut self, _id: &str, _delta: &AttributeDelta) -> Result<(), pageblocks_editor::MutationError> {
            Err(MergeError::InvalidValue {
                field: "width".to_string(),
                reason: "storage offline".to_string(),
            }
            .into())
        }

        fn remove(&mut self, id: &str) -> Result<(), pageblocks_editor::MutationError> {
            self.0.remove(id)
        }
    }

    let mut doc = memory_doc();
    let mut surface = BlockSurface::mount("photo", &mut doc, SurfaceConfig::default()).unwrap();
    let mut target = Rejecting(doc);

    surface.set_width_live(45.0).unwrap();
    let result = surface.commit_width(&mut target);

    assert!(matches!(result, Err(SurfaceError::Commit(_))));
    assert_eq!(surface.state(), SurfaceState::Resizing);
    assert_eq!(surface.pending_width(), Some(45));
    assert_eq!(image(&target.0, "photo").width, None);
}

#[test]
fn test_alignment_then_delete() {
    let mut doc = memory_doc();
    let mut surface = BlockSurface::mount("photo", &mut doc, SurfaceConfig::default()).unwrap();

    surface.set_alignment(&mut doc, TextAlign::Right).unwrap();
    assert_eq!(image(&doc, "photo").align, Some(ImageAlign::Right));

    let outro = doc.block("outro").unwrap().clone();
    surface.delete(&mut doc).unwrap();

    assert_eq!(collect_ids(doc.content()), vec!["intro", "outro"]);
    let moved = doc.block("outro").unwrap();
    assert_eq!(moved.kind, outro.kind);
    assert_eq!(moved.order, 1);
    assert!(matches!(surface.view(&doc), Err(SurfaceError::Deleted)));
}

#[test]
fn test_two_surfaces_edit_independently() {
    let mut doc = memory_doc();
    doc.apply(Mutation::InsertBlock {
        location: BlockLocation::root(3),
        block: ContentBlock::image("second", "b.png"),
    })
    .unwrap();

    let mut first = BlockSurface::mount("photo", &mut doc, SurfaceConfig::default()).unwrap();
    let mut second = BlockSurface::mount("second", &mut doc, SurfaceConfig::default()).unwrap();

    first.set_width_live(30.0).unwrap();
    second.set_width_live(90.0).unwrap();
    second.commit_width(&mut doc).unwrap();
    first.commit_width(&mut doc).unwrap();

    assert_eq!(image(&doc, "photo").width, Some(Dimension::Percent(30.0)));
    assert_eq!(image(&doc, "second").width, Some(Dimension::Percent(90.0)));
}

#[test]
fn test_upload_then_edit() {
    let mut doc = memory_doc();
    let mut uploader = MockUploader::new("https://cdn.example.com");
    let mut ids = IdGenerator::new("/about").with_reserved(collect_ids(doc.content()));

    let id = insert_uploaded_image(
        &mut doc,
        &mut uploader,
        "team.jpg",
        b"jpegbytes",
        "pages",
        BlockLocation::root(1),
        &mut ids,
    )
    .unwrap();

    let mut surface = BlockSurface::mount(id.as_str(), &mut doc, SurfaceConfig::default()).unwrap();
    surface.set_width_live(50.0).unwrap();
    surface.commit_width(&mut doc).unwrap();

    let uploaded = image(&doc, &id);
    assert_eq!(uploaded.url, "https://cdn.example.com/pages/team.jpg");
    assert_eq!(uploaded.width, Some(Dimension::Percent(50.0)));

    // Everything survives a serialization round trip
    let reparsed = from_json(&doc.to_json().unwrap(), ParseMode::Strict).unwrap();
    assert_eq!(&reparsed, doc.content());
}
