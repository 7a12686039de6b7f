//! # JSON Persistence
//!
//! Reads and writes [`PageContent`] as JSON. Block order, ids, the version
//! tag and every typed field survive a round trip unchanged.
//!
//! Unknown fields are handled according to [`ParseMode`]:
//! - **Strict** (default): the first unknown field on the document, a block
//!   or a column fails the read with its location
//! - **Lenient**: unknown fields are dropped and logged at `warn`
//!
//! Every Columns level costs four levels of JSON nesting, so the reader's
//! nesting limit is derived from [`MAX_NESTING_DEPTH`] rather than left at
//! serde_json's default. The limit leaves room above the maximum so that an
//! over-nested page still parses and is rejected by validation with its path.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ast::{BlockType, PageContent, BASE_FIELDS, MAX_NESTING_DEPTH};
use crate::error::ParseError;
use crate::path::BlockPath;

const DOCUMENT_FIELDS: &[&str] = &["version", "blocks"];
const COLUMN_FIELDS: &[&str] = &["width", "blocks"];

/// JSON levels per Columns level: column array, column, blocks array, block
const LEVELS_PER_COLUMNS: usize = 4;

/// Deepest JSON accepted before decoding. Twice the block limit plus the
/// document, root sequence and table rows.
pub const MAX_JSON_DEPTH: usize = 2 * MAX_NESTING_DEPTH * LEVELS_PER_COLUMNS + 8;

/// How unknown fields are treated while reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    #[default]
    Strict,
    Lenient,
}

/// Parse a document, applying `mode` to unknown fields
pub fn from_json(source: &str, mode: ParseMode) -> Result<PageContent, ParseError> {
    check_json_depth(source)?;

    let mut deserializer = serde_json::Deserializer::from_str(source);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(&mut deserializer)?;
    deserializer.end()?;

    from_value(value, mode)
}

/// Bracket depth scan over the raw source, skipping string contents
fn check_json_depth(source: &str) -> Result<(), ParseError> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in source.bytes().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                if depth > MAX_JSON_DEPTH {
                    return Err(ParseError::TooDeep {
                        limit: MAX_JSON_DEPTH,
                        offset,
                    });
                }
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

pub fn from_value(value: Value, mode: ParseMode) -> Result<PageContent, ParseError> {
    let mut checker = FieldChecker {
        mode,
        ignored: 0,
    };
    checker.check_document(&value)?;
    if checker.ignored > 0 {
        tracing::warn!(count = checker.ignored, "ignored unknown fields while parsing");
    }

    Ok(serde_json::from_value(value)?)
}

pub fn to_json(doc: &PageContent) -> Result<String, ParseError> {
    Ok(serde_json::to_string(doc)?)
}

pub fn to_json_pretty(doc: &PageContent) -> Result<String, ParseError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Walks the raw JSON before typed decoding so unknown keys can be located.
///
/// Shape errors (wrong types, missing fields, unknown block types) are left
/// to serde, which reports them during decoding.
struct FieldChecker {
    mode: ParseMode,
    ignored: usize,
}

impl FieldChecker {
    fn check_document(&mut self, value: &Value) -> Result<(), ParseError> {
        let Some(object) = value.as_object() else {
            return Ok(());
        };
        let root = BlockPath::root();
        self.check_keys(object, &root, |key| DOCUMENT_FIELDS.contains(&key))?;
        self.check_sequence(object.get("blocks"), &root, 0)
    }

    fn check_sequence(
        &mut self,
        blocks: Option<&Value>,
        parent: &BlockPath,
        depth: usize,
    ) -> Result<(), ParseError> {
        let Some(blocks) = blocks.and_then(Value::as_array) else {
            return Ok(());
        };
        for (index, block) in blocks.iter().enumerate() {
            self.check_block(block, &parent.block(index), depth)?;
        }
        Ok(())
    }

    fn check_block(&mut self, value: &Value, path: &BlockPath, depth: usize) -> Result<(), ParseError> {
        let Some(object) = value.as_object() else {
            return Ok(());
        };
        let Some(block_type) = object
            .get("type")
            .and_then(Value::as_str)
            .and_then(BlockType::from_name)
        else {
            return Ok(());
        };

        self.check_keys(object, path, |key| {
            BASE_FIELDS.contains(&key) || block_type.has_field(key)
        })?;

        if block_type != BlockType::Columns || depth >= MAX_NESTING_DEPTH {
            return Ok(());
        }
        let Some(columns) = object.get("columns").and_then(Value::as_array) else {
            return Ok(());
        };
        for (index, column) in columns.iter().enumerate() {
            let column_path = path.column(index);
            if let Some(column) = column.as_object() {
                self.check_keys(column, &column_path, |key| COLUMN_FIELDS.contains(&key))?;
                self.check_sequence(column.get("blocks"), &column_path, depth + 1)?;
            }
        }
        Ok(())
    }

    fn check_keys(
        &mut self,
        object: &Map<String, Value>,
        path: &BlockPath,
        allowed: impl Fn(&str) -> bool,
    ) -> Result<(), ParseError> {
        for key in object.keys() {
            if allowed(key) {
                continue;
            }
            match self.mode {
                ParseMode::Strict => {
                    return Err(ParseError::UnknownField {
                        path: path.clone(),
                        field: key.clone(),
                    });
                }
                ParseMode::Lenient => {
                    tracing::warn!(%path, field = %key, "ignoring unknown field");
                    self.ignored += 1;
                }
            }
        }
        Ok(())
    }
}
