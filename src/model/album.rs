//! Photo album records extracted from album pages.

/// Name used when an album page carries no breadcrumb header.
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Label used for images without an `alt` attribute.
pub const UNKNOWN_IMAGE: &str = "unknown_image";

/// One album page: its display name and every image it references,
/// in markup order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub name: String,
    pub images: Vec<ImageRef>,
}

/// A single image on an album page.
///
/// `label` becomes the output filename. Labels are not unique within an
/// album; colliding images overwrite each other on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub url: String,
    pub label: String,
}
