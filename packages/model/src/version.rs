use serde::{Deserialize, Serialize};
use std::fmt;

/// Version written by this crate
pub const CURRENT_VERSION: &str = "1.0";

/// Every content version this reader understands
pub const SUPPORTED_VERSIONS: &[&str] = &["1.0"];

/// Content-structure version tag carried by every page document.
///
/// Any string deserializes; whether it is usable is decided by
/// [`ContentVersion::is_supported`] during validation, never by coercion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentVersion(String);

impl ContentVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn current() -> Self {
        Self(CURRENT_VERSION.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_supported(&self) -> bool {
        SUPPORTED_VERSIONS.contains(&self.0.as_str())
    }
}

impl Default for ContentVersion {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for ContentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
