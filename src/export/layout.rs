//! Destination tree layout.
//!
//! ```text
//! <download_dir>/
//!   <album name>/<image label>.<ext>
//!   <contact name>/<YYYY-MM-DD HH_MM_SS>.<ext>
//! ```

use std::path::{Path, PathBuf};

use crate::error::{RescueError, Result};
use crate::media::extension_or_default;
use crate::model::album::{Album, ImageRef};
use crate::model::attachment::Attachment;
use crate::model::contact::Contact;

use super::sanitize::{file_name, sanitize};

/// Directory for one album.
pub fn album_dir(download_dir: &Path, album: &Album) -> PathBuf {
    download_dir.join(sanitize(&album.name))
}

/// Directory for one conversation.
pub fn contact_dir(download_dir: &Path, contact: &Contact) -> PathBuf {
    download_dir.join(sanitize(&contact.effective_name()))
}

/// Filename for an album image: its label plus the URL's extension.
pub fn image_file_name(image: &ImageRef) -> String {
    file_name(&image.label, &extension_or_default(&image.url))
}

/// Filename for a chat attachment: its canonical timestamp plus the URL's extension.
pub fn attachment_file_name(attachment: &Attachment) -> String {
    file_name(
        &attachment.timestamp.canonical(),
        &extension_or_default(&attachment.url),
    )
}

/// Create a directory (and parents) if it does not exist yet.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| RescueError::io(path, e))
}
