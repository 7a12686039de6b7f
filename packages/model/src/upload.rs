//! Result of the external upload operation.
//!
//! Upload transport lives outside the model; an image block only ever keeps
//! the returned URL.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ast::ImageBlock;

/// What an uploader returns for one stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// Public URL of the stored file
    pub url: String,
    pub filename: String,
    pub mime_type: String,
    /// Size in bytes
    pub size: u64,
}

impl UploadedFile {
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

impl ImageBlock {
    /// Image block pointing at an uploaded file; the file stem becomes the
    /// initial alt text
    pub fn from_upload(file: &UploadedFile) -> Self {
        let mut image = ImageBlock::new(file.url.clone());
        image.alt = Path::new(&file.filename)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty());
        image
    }
}
