use pageblocks_common::{fill_default_alignment, walk_block, BlockStats, IdCollector, Visitor};
use pageblocks_model::{
    collect_ids, from_json, BlockKind, BlockType, ContentBlock, ParseMode, TextAlign,
};

const PAGE: &str = r#"{
    "version": "1.0",
    "blocks": [
        { "id": "title", "order": 0, "type": "heading", "content": "About", "level": 1 },
        { "id": "grid", "order": 1, "type": "columns", "columns": [
            { "width": 33, "blocks": [
                { "id": "photo", "order": 0, "type": "image", "url": "/media/a.png" }
            ] },
            { "width": 67, "blocks": [
                { "id": "inner", "order": 0, "type": "columns", "columns": [
                    { "width": 100, "blocks": [
                        { "id": "bio", "order": 0, "type": "paragraph", "content": "Hi", "align": "left" }
                    ] }
                ] }
            ] }
        ] },
        { "id": "contact", "order": 2, "type": "button", "text": "Mail", "url": "mailto:a@b.c" }
    ]
}"#;

struct ImageUrls(Vec<String>);

impl Visitor for ImageUrls {
    fn visit_block(&mut self, block: &ContentBlock, depth: usize) {
        if let BlockKind::Image(image) = &block.kind {
            self.0.push(image.url.clone());
        }
        walk_block(self, block, depth);
    }
}

#[test]
fn test_id_collector_matches_tree_collect() {
    let doc = from_json(PAGE, ParseMode::Strict).unwrap();
    assert_eq!(IdCollector::collect(&doc), collect_ids(&doc));
}

#[test]
fn test_stats_over_nested_page() {
    let doc = from_json(PAGE, ParseMode::Strict).unwrap();
    let stats = BlockStats::collect(&doc);

    assert_eq!(stats.total, 6);
    assert_eq!(stats.count(BlockType::Columns), 2);
    assert_eq!(stats.max_depth, 2);
}

#[test]
fn test_custom_visitor_finds_nested_images() {
    let doc = from_json(PAGE, ParseMode::Strict).unwrap();
    let mut urls = ImageUrls(Vec::new());
    urls.visit_document(&doc);

    assert_eq!(urls.0, vec!["/media/a.png"]);
}

#[test]
fn test_fill_alignment_preserves_round_trip_of_other_fields() {
    let mut doc = from_json(PAGE, ParseMode::Strict).unwrap();

    // heading, image and button lack align; the nested paragraph already has one
    assert_eq!(fill_default_alignment(&mut doc, TextAlign::Center), 3);

    let value = serde_json::to_value(&doc).unwrap();
    assert_eq!(value["blocks"][0]["align"], "center");
    assert_eq!(value["blocks"][1]["columns"][0]["blocks"][0]["align"], "center");
    assert_eq!(
        value["blocks"][1]["columns"][1]["blocks"][0]["columns"][0]["blocks"][0]["align"],
        "left"
    );
    assert_eq!(value["blocks"][2]["url"], "mailto:a@b.c");
}
