use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pageblocks_model::{
    find_block, from_json, merge_attributes, remove_block, to_json, validate, AttributeDelta,
    Column, ContentBlock, PageContent, ParseMode,
};

fn build_page(sections: usize) -> PageContent {
    let mut blocks = Vec::new();
    for i in 0..sections {
        blocks.push(ContentBlock::heading(format!("h-{}", i), 2, format!("Section {}", i)));
        blocks.push(ContentBlock::columns(
            format!("cols-{}", i),
            vec![
                Column::new(
                    50.0,
                    vec![
                        ContentBlock::paragraph(format!("p-{}-a", i), "Lorem ipsum dolor sit amet"),
                        ContentBlock::image(format!("img-{}", i), format!("/media/{}.png", i)),
                    ],
                ),
                Column::new(50.0, vec![ContentBlock::paragraph(format!("p-{}-b", i), "Consectetur")]),
            ],
        ));
    }
    PageContent::new(blocks)
}

fn parse_large_page(c: &mut Criterion) {
    let source = to_json(&build_page(200)).unwrap();

    c.bench_function("parse_large_page", |b| {
        b.iter(|| from_json(black_box(&source), ParseMode::Strict))
    });
}

fn validate_large_page(c: &mut Criterion) {
    let doc = build_page(200);

    c.bench_function("validate_large_page", |b| b.iter(|| validate(black_box(&doc))));
}

fn find_last_nested_block(c: &mut Criterion) {
    let doc = build_page(200);

    c.bench_function("find_last_nested_block", |b| {
        b.iter(|| find_block(black_box(&doc), black_box("p-199-b")))
    });
}

fn merge_image_width(c: &mut Criterion) {
    let block = ContentBlock::image("img", "/media/hero.png");
    let delta = AttributeDelta::new().set("width", "60%").set("align", "center");

    c.bench_function("merge_image_width", |b| {
        b.iter(|| merge_attributes(black_box(&block), black_box(&delta)))
    });
}

fn remove_nested_block(c: &mut Criterion) {
    let doc = build_page(200);

    c.bench_function("remove_nested_block", |b| {
        b.iter(|| {
            let mut doc = doc.clone();
            remove_block(&mut doc, black_box("img-100"))
        })
    });
}

criterion_group!(
    benches,
    parse_large_page,
    validate_large_page,
    find_last_nested_block,
    merge_image_width,
    remove_nested_block
);
criterion_main!(benches);
