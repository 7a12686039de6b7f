//! Upload collaborator boundary
//!
//! The transport behind an upload is not the editor's concern. An [`Uploader`]
//! stores bytes somewhere and reports where; the editor turns the result into
//! an Image block that only keeps the URL.

use pageblocks_model::{BlockLocation, ContentBlock, IdGenerator, ImageBlock, UploadedFile};

use crate::errors::{EditorError, UploadError};
use crate::{Document, Mutation};

/// Stores a file and returns its public location
pub trait Uploader {
    fn upload(&mut self, filename: &str, bytes: &[u8], folder: &str) -> Result<UploadedFile, UploadError>;
}

/// In-memory uploader for testing
#[derive(Debug)]
pub struct MockUploader {
    pub base_url: String,
    /// Every accepted upload as `(folder, file)`
    pub uploads: Vec<(String, UploadedFile)>,
    /// Reject every upload with this message
    pub reject_with: Option<String>,
}

impl MockUploader {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            uploads: Vec::new(),
            reject_with: None,
        }
    }
}

impl Default for MockUploader {
    fn default() -> Self {
        Self::new("https://cdn.test")
    }
}

impl Uploader for MockUploader {
    fn upload(&mut self, filename: &str, bytes: &[u8], folder: &str) -> Result<UploadedFile, UploadError> {
        if let Some(message) = &self.reject_with {
            return Err(UploadError::Rejected(message.clone()));
        }
        if bytes.is_empty() {
            return Err(UploadError::EmptyFile);
        }

        let file = UploadedFile {
            url: format!("{}/{}/{}", self.base_url.trim_end_matches('/'), folder, filename),
            filename: filename.to_string(),
            mime_type: mime_type_for(filename).to_string(),
            size: bytes.len() as u64,
        };
        self.uploads.push((folder.to_string(), file.clone()));
        Ok(file)
    }
}

/// Best-effort MIME type from a file extension
pub fn mime_type_for(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Upload an image and insert an Image block for it at `location`.
///
/// Returns the new block's id. Nothing is inserted when the upload fails or
/// the stored file is not an image.
pub fn insert_uploaded_image<U: Uploader>(
    doc: &mut Document,
    uploader: &mut U,
    filename: &str,
    bytes: &[u8],
    folder: &str,
    location: BlockLocation,
    ids: &mut IdGenerator,
) -> Result<String, EditorError> {
    let file = uploader.upload(filename, bytes, folder)?;
    if !file.is_image() {
        return Err(UploadError::NotAnImage {
            mime_type: file.mime_type,
        }
        .into());
    }

    let block = ContentBlock::new(ids.new_id(), ImageBlock::from_upload(&file));
    let block_id = block.id.clone();
    doc.apply(Mutation::InsertBlock { location, block })?;

    tracing::info!(block_id = %block_id, url = %file.url, size = file.size, "inserted uploaded image");
    Ok(block_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pageblocks_model::{collect_ids, BlockKind, PageContent};
    use std::path::PathBuf;

    #[test]
    fn test_mime_type_for() {
        assert_eq!(mime_type_for("photo.JPG"), "image/jpeg");
        assert_eq!(mime_type_for("notes"), "application/octet-stream");
    }

    #[test]
    fn test_insert_uploaded_image() {
        let mut doc = Document::from_content(
            PathBuf::from("page.json"),
            PageContent::new(vec![ContentBlock::paragraph("p", "Hi")]),
        );
        let mut uploader = MockUploader::default();
        let mut ids = IdGenerator::new("/about").with_reserved(collect_ids(doc.content()));

        let id = insert_uploaded_image(
            &mut doc,
            &mut uploader,
            "hero.png",
            &[1, 2, 3],
            "pages",
            BlockLocation::root(0),
            &mut ids,
        )
        .unwrap();

        assert_eq!(doc.content().blocks[0].id, id);
        assert_eq!(doc.content().blocks[1].order, 1);
        match &doc.content().blocks[0].kind {
            BlockKind::Image(image) => {
                assert_eq!(image.url, "https://cdn.test/pages/hero.png");
                assert_eq!(image.alt.as_deref(), Some("hero"));
            }
            other => panic!("Expected image, got {:?}", other),
        }
        assert_eq!(uploader.uploads.len(), 1);
    }

    #[test]
    fn test_non_image_upload_inserts_nothing() {
        let mut doc = Document::from_content(PathBuf::from("page.json"), PageContent::default());
        let mut uploader = MockUploader::default();
        let mut ids = IdGenerator::new("/about");

        let result = insert_uploaded_image(
            &mut doc,
            &mut uploader,
            "terms.pdf",
            &[1],
            "docs",
            BlockLocation::root(0),
            &mut ids,
        );

        assert!(matches!(
            result,
            Err(EditorError::Upload(UploadError::NotAnImage { .. }))
        ));
        assert!(doc.content().is_empty());
        assert_eq!(doc.revision, 0);
    }

    #[test]
    fn test_rejected_upload() {
        let mut doc = Document::from_content(PathBuf::from("page.json"), PageContent::default());
        let mut uploader = MockUploader::default();
        uploader.reject_with = Some("quota exceeded".to_string());

        let result = insert_uploaded_image(
            &mut doc,
            &mut uploader,
            "hero.png",
            &[1],
            "pages",
            BlockLocation::root(0),
            &mut IdGenerator::new("/about"),
        );
        assert!(matches!(result, Err(EditorError::Upload(UploadError::Rejected(_)))));
    }
}
