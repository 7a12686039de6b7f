use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::version::ContentVersion;

/// Deepest Columns nesting any traversal will descend into.
///
/// Root blocks sit at depth 0; the blocks of a column inside a Columns block
/// at depth `d` sit at depth `d + 1`.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Fields shared by every block variant
pub const BASE_FIELDS: &[&str] = &["id", "order", "type"];

/// Root document node: the full content of one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    pub version: ContentVersion,
    pub blocks: Vec<ContentBlock>,
}

impl PageContent {
    /// Create a current-version document with positions numbered from the
    /// sequence order
    pub fn new(blocks: Vec<ContentBlock>) -> Self {
        Self::with_version(ContentVersion::current(), blocks)
    }

    pub fn with_version(version: ContentVersion, blocks: Vec<ContentBlock>) -> Self {
        let mut doc = Self { version, blocks };
        doc.renumber();
        doc
    }

    /// Recompute every `order` from its sequence index.
    ///
    /// The index is authoritative; `order` is only a serialized hint.
    pub fn renumber(&mut self) {
        renumber_tree(&mut self.blocks, 0);
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Default for PageContent {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

pub(crate) fn renumber_sequence(blocks: &mut [ContentBlock]) {
    for (index, block) in blocks.iter_mut().enumerate() {
        block.order = index as u32;
    }
}

fn renumber_tree(blocks: &mut [ContentBlock], depth: usize) {
    renumber_sequence(blocks);
    if depth >= MAX_NESTING_DEPTH {
        return;
    }
    for block in blocks.iter_mut() {
        if let Some(columns) = block.columns_mut() {
            for column in columns {
                renumber_tree(&mut column.blocks, depth + 1);
            }
        }
    }
}

/// One typed unit of page content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub id: String,
    #[serde(default)]
    pub order: u32,
    #[serde(flatten)]
    pub kind: BlockKind,
}

impl ContentBlock {
    pub fn new(id: impl Into<String>, kind: impl Into<BlockKind>) -> Self {
        Self {
            id: id.into(),
            order: 0,
            kind: kind.into(),
        }
    }

    pub fn paragraph(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(
            id,
            ParagraphBlock {
                content: content.into(),
                align: None,
            },
        )
    }

    pub fn heading(id: impl Into<String>, level: u8, content: impl Into<String>) -> Self {
        Self::new(
            id,
            HeadingBlock {
                content: content.into(),
                level,
                align: None,
            },
        )
    }

    pub fn image(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(id, ImageBlock::new(url))
    }

    pub fn columns(id: impl Into<String>, columns: Vec<Column>) -> Self {
        Self::new(id, ColumnsBlock { columns })
    }

    pub fn block_type(&self) -> BlockType {
        self.kind.block_type()
    }

    pub fn columns_ref(&self) -> Option<&[Column]> {
        match &self.kind {
            BlockKind::Columns(block) => Some(&block.columns),
            _ => None,
        }
    }

    pub fn columns_mut(&mut self) -> Option<&mut Vec<Column>> {
        match &mut self.kind {
            BlockKind::Columns(block) => Some(&mut block.columns),
            _ => None,
        }
    }
}

/// Variant payloads, discriminated by `type` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockKind {
    Paragraph(ParagraphBlock),
    Heading(HeadingBlock),
    Image(ImageBlock),
    List(ListBlock),
    Quote(QuoteBlock),
    Code(CodeBlock),
    Embed(EmbedBlock),
    Columns(ColumnsBlock),
    Button(ButtonBlock),
    Spacer(SpacerBlock),
    Html(HtmlBlock),
    Table(TableBlock),
}

impl BlockKind {
    pub fn block_type(&self) -> BlockType {
        match self {
            BlockKind::Paragraph(_) => BlockType::Paragraph,
            BlockKind::Heading(_) => BlockType::Heading,
            BlockKind::Image(_) => BlockType::Image,
            BlockKind::List(_) => BlockType::List,
            BlockKind::Quote(_) => BlockType::Quote,
            BlockKind::Code(_) => BlockType::Code,
            BlockKind::Embed(_) => BlockType::Embed,
            BlockKind::Columns(_) => BlockType::Columns,
            BlockKind::Button(_) => BlockType::Button,
            BlockKind::Spacer(_) => BlockType::Spacer,
            BlockKind::Html(_) => BlockType::Html,
            BlockKind::Table(_) => BlockType::Table,
        }
    }
}

macro_rules! impl_into_kind {
    ($($payload:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$payload> for BlockKind {
                fn from(block: $payload) -> Self {
                    BlockKind::$variant(block)
                }
            }
        )*
    };
}

impl_into_kind! {
    ParagraphBlock => Paragraph,
    HeadingBlock => Heading,
    ImageBlock => Image,
    ListBlock => List,
    QuoteBlock => Quote,
    CodeBlock => Code,
    EmbedBlock => Embed,
    ColumnsBlock => Columns,
    ButtonBlock => Button,
    SpacerBlock => Spacer,
    HtmlBlock => Html,
    TableBlock => Table,
}

/// Field-less mirror of the `type` discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockType {
    Paragraph,
    Heading,
    Image,
    List,
    Quote,
    Code,
    Embed,
    Columns,
    Button,
    Spacer,
    Html,
    Table,
}

impl BlockType {
    pub const ALL: [BlockType; 12] = [
        BlockType::Paragraph,
        BlockType::Heading,
        BlockType::Image,
        BlockType::List,
        BlockType::Quote,
        BlockType::Code,
        BlockType::Embed,
        BlockType::Columns,
        BlockType::Button,
        BlockType::Spacer,
        BlockType::Html,
        BlockType::Table,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::Heading => "heading",
            BlockType::Image => "image",
            BlockType::List => "list",
            BlockType::Quote => "quote",
            BlockType::Code => "code",
            BlockType::Embed => "embed",
            BlockType::Columns => "columns",
            BlockType::Button => "button",
            BlockType::Spacer => "spacer",
            BlockType::Html => "html",
            BlockType::Table => "table",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Variant-specific fields as they appear on the wire
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            BlockType::Paragraph => &["content", "align"],
            BlockType::Heading => &["content", "level", "align"],
            BlockType::Image => &["url", "alt", "title", "caption", "width", "height", "align"],
            BlockType::List => &["items", "listType"],
            BlockType::Quote => &["content", "citation"],
            BlockType::Code => &["content", "language"],
            BlockType::Embed => &["url", "caption", "width", "height"],
            BlockType::Columns => &["columns"],
            BlockType::Button => &["text", "url", "style", "align"],
            BlockType::Spacer => &["height"],
            BlockType::Html => &["content"],
            BlockType::Table => &["rows", "hasHeader"],
        }
    }

    /// Variant fields fixed at creation. An image's source is replaced by
    /// uploading a new image, not by editing the block.
    pub fn immutable_fields(self) -> &'static [&'static str] {
        match self {
            BlockType::Image => &["url"],
            _ => &[],
        }
    }

    pub fn has_field(self, field: &str) -> bool {
        self.fields().contains(&field)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Horizontal alignment for text-like blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

impl FromStr for TextAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(TextAlign::Left),
            "center" => Ok(TextAlign::Center),
            "right" => Ok(TextAlign::Right),
            other => Err(format!("unknown alignment: {}", other)),
        }
    }
}

/// Image alignment; `wide` and `full` break out of the text column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageAlign {
    Left,
    Center,
    Right,
    Wide,
    Full,
}

impl From<TextAlign> for ImageAlign {
    fn from(align: TextAlign) -> Self {
        match align {
            TextAlign::Left => ImageAlign::Left,
            TextAlign::Center => ImageAlign::Center,
            TextAlign::Right => ImageAlign::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Ordered,
    Unordered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Outline,
}

/// A width or height: a JSON number is pixels, a `"75%"` string a percentage
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    Pixels(f64),
    Percent(f64),
}

impl Dimension {
    pub fn value(self) -> f64 {
        match self {
            Dimension::Pixels(v) | Dimension::Percent(v) => v,
        }
    }

    pub fn is_valid(self) -> bool {
        let v = self.value();
        v.is_finite() && v >= 0.0
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Pixels(v) => write!(f, "{}px", v),
            Dimension::Percent(v) => write!(f, "{}%", v),
        }
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (number, percent) = match s.strip_suffix('%') {
            Some(number) => (number, true),
            None => (s.strip_suffix("px").unwrap_or(s), false),
        };
        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| format!("malformed dimension: {:?}", s))?;
        if !value.is_finite() {
            return Err(format!("malformed dimension: {:?}", s));
        }
        Ok(if percent {
            Dimension::Percent(value)
        } else {
            Dimension::Pixels(value)
        })
    }
}

impl Serialize for Dimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Dimension::Pixels(v) => serializer.serialize_f64(*v),
            Dimension::Percent(_) => serializer.collect_str(self),
        }
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DimensionVisitor;

        impl<'de> Visitor<'de> for DimensionVisitor {
            type Value = Dimension;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number of pixels or a percentage string such as \"75%\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Dimension, E> {
                Ok(Dimension::Pixels(v as f64))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Dimension, E> {
                Ok(Dimension::Pixels(v as f64))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Dimension, E> {
                Ok(Dimension::Pixels(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Dimension, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(DimensionVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphBlock {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingBlock {
    pub content: String,
    /// 1..=6, checked by validation
    pub level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBlock {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<ImageAlign>,
}

impl ImageBlock {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt: None,
            title: None,
            caption: None,
            width: None,
            height: None,
            align: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBlock {
    pub items: Vec<String>,
    pub list_type: ListType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBlock {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBlock {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedBlock {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnsBlock {
    pub columns: Vec<Column>,
}

/// One column of a Columns block. Widths are a layout concern and are not
/// required to sum to anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub width: f64,
    pub blocks: Vec<ContentBlock>,
}

impl Column {
    pub fn new(width: f64, blocks: Vec<ContentBlock>) -> Self {
        Self { width, blocks }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonBlock {
    pub text: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ButtonStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacerBlock {
    pub height: f64,
}

/// Raw markup. Whether it is trusted or escaped is the renderer's policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlBlock {
    pub content: String,
}

/// Ragged rows are allowed; equalizing them is a rendering concern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableBlock {
    pub rows: Vec<Vec<String>>,
    pub has_header: bool,
}
