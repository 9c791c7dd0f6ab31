use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Description and keyword tags returned by the external annotation
/// service for one converted image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub description: String,
    pub tags: Vec<String>,
}

/// Boundary to the external image annotation service.
///
/// Implementations receive the encoded output bytes together with their
/// media type and return a short description plus an ordered tag list. The
/// engine treats any error as non-fatal: the item stays successful and its
/// annotation is simply absent. Nothing in this crate implements the
/// service itself.
pub trait Annotator {
    fn annotate(&self, image_bytes: &[u8], media_type: &str) -> Result<Annotation>;
}
