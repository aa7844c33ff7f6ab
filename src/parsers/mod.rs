//! Document parsing entry points.
//!
//! Documents are XML; `parse_document` reads from disk with a size guard,
//! `parse_document_str` parses in-memory content. Serialization lives in
//! the same module because the writer must mirror the reader's text model
//! exactly (see [`xml`]).

mod xml;

pub use xml::{parse_document_str, serialize_document, serialize_element};

use std::path::Path;

use crate::error::{DocDiffError, ErrorContext, ParseErrorKind, Result};
use crate::model::Element;

/// Maximum document file size (50 MB). Document state this large indicates
/// a misdirected input, not a bigger comparison.
pub const MAX_DOCUMENT_SIZE: u64 = 50 * 1024 * 1024;

/// Read and parse a document from disk.
///
/// Returns an error if the file exceeds [`MAX_DOCUMENT_SIZE`].
pub fn parse_document(path: &Path) -> Result<Element> {
    let metadata = std::fs::metadata(path).map_err(|e| DocDiffError::io(path, e))?;
    if metadata.len() > MAX_DOCUMENT_SIZE {
        return Err(DocDiffError::parse(
            format!("at {}", path.display()),
            ParseErrorKind::DocumentTooLarge {
                size: metadata.len(),
                limit: MAX_DOCUMENT_SIZE,
            },
        ));
    }
    let content = std::fs::read_to_string(path).map_err(|e| DocDiffError::io(path, e))?;
    parse_document_str(&content).with_context(|| format!("parsing {}", path.display()))
}
