//! PDF output: sheet assembly with lopdf and image embedding.

mod encode;
mod writer;

pub use encode::{encode_jpeg, flatten_onto_white};
pub use writer::{PageContent, SheetWriter};

use lopdf::Document;

use crate::error::Result;

/// Serialize a finished document into memory.
pub fn to_bytes(mut document: Document) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    document.save_to(&mut buf)?;
    Ok(buf)
}
