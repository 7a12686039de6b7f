pub mod edit;
pub mod find;
pub mod fmt;
pub mod init;
pub mod tree;
pub mod validate;

pub use edit::{merge, remove, MergeArgs, RemoveArgs};
pub use find::{find, FindArgs};
pub use fmt::{fmt, FmtArgs};
pub use init::{init, InitArgs};
pub use tree::{tree, TreeArgs};
pub use validate::{validate, ValidateArgs};
