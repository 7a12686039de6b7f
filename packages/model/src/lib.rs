//! # Pageblocks Model
//!
//! Canonical, serializable representation of one page's content: an ordered
//! tree of typed blocks where Columns blocks embed further block sequences.
//!
//! ```text
//! PageContent { version, blocks }
//!     └─ ContentBlock { id, order, kind }
//!            └─ BlockKind::Columns → Column { width, blocks } → ContentBlock …
//! ```
//!
//! The model performs no I/O. Operations:
//! - [`validate`] / [`validate_with`]: structural checks with a block path
//! - [`find_block`], [`block_path`], [`locate`]: lookup anywhere in the tree
//! - [`merge_attributes`]: partial, variant-checked field updates
//! - [`remove_block`], [`insert_block`], [`move_block`]: structural edits
//! - [`from_json`] / [`to_json`]: the persistence boundary
//!
//! Sequence index is the source of truth for position; `order` is
//! recomputed on every structural edit.

pub mod ast;
pub mod delta;
pub mod error;
pub mod id_generator;
pub mod path;
pub mod serializer;
pub mod tree;
pub mod upload;
pub mod validate;
pub mod version;

pub use ast::*;
pub use delta::{merge_attributes, AttributeDelta};
pub use error::{MergeError, NotFound, ParseError, TreeError, ValidationError, ValidationResult};
pub use id_generator::{page_seed, IdGenerator};
pub use path::{BlockLocation, BlockPath, ColumnRef, PathSegment};
pub use serializer::{from_json, from_value, to_json, to_json_pretty, ParseMode, MAX_JSON_DEPTH};
pub use tree::{
    block_path, collect_ids, find_block, find_block_mut, insert_block, locate, move_block,
    nesting_depth, remove_block,
};
pub use upload::UploadedFile;
pub use validate::{validate, validate_with, ValidationConfig};
pub use version::{ContentVersion, CURRENT_VERSION, SUPPORTED_VERSIONS};
