//! Record extraction from decoded album and conversation pages.
//!
//! The parsed document never leaves these functions; callers get plain
//! owned records back.

use std::collections::BTreeSet;

use scraper::{ElementRef, Html};
use tracing::{debug, trace};

use crate::media::is_image_url;
use crate::model::album::{Album, ImageRef, UNKNOWN_ALBUM, UNKNOWN_IMAGE};
use crate::model::attachment::Attachment;
use crate::model::contact::{Contact, UNKNOWN_CONTACT};

use super::consts;
use super::date::parse_header_date;

/// Extract an album's name and its images from an album page.
pub fn extract_album(text: &str) -> Album {
    let document = Html::parse_document(text);
    let name = breadcrumb_name(&document).unwrap_or_else(|| UNKNOWN_ALBUM.to_string());

    let images: Vec<ImageRef> = document
        .select(&consts::IMAGE_SELECTOR)
        .filter_map(|img| {
            let url = img.value().attr("src")?;
            if !is_image_url(url) {
                trace!(url, "Skipping non-image <img>");
                return None;
            }
            let label = img
                .value()
                .attr("alt")
                .map(str::trim)
                .filter(|alt| !alt.is_empty())
                .unwrap_or(UNKNOWN_IMAGE);
            Some(ImageRef {
                url: url.to_string(),
                label: label.to_string(),
            })
        })
        .collect();

    debug!(album = %name, images = images.len(), "Extracted album");
    Album { name, images }
}

/// Extract the conversation partner from the first message page.
pub fn extract_contact(text: &str, folder_id: &str) -> Contact {
    let document = Html::parse_document(text);
    let name = breadcrumb_name(&document).unwrap_or_else(|| UNKNOWN_CONTACT.to_string());
    Contact::new(name, folder_id)
}

/// Extract every dated image attachment from a message page.
///
/// Messages without a parsable date header or without an image link are
/// plain-text messages and contribute nothing.
pub fn extract_attachments(text: &str) -> BTreeSet<Attachment> {
    let document = Html::parse_document(text);
    let mut attachments = BTreeSet::new();

    for message in document.select(&consts::MESSAGE_SELECTOR) {
        if let Some(attachment) = message_attachment(message) {
            attachments.insert(attachment);
        }
    }

    attachments
}

fn message_attachment(message: ElementRef<'_>) -> Option<Attachment> {
    let header = message.select(&consts::MESSAGE_HEADER_SELECTOR).next()?;
    let header_text = element_text(header);

    let Some(timestamp) = parse_header_date(&header_text) else {
        trace!(header = %header_text, "Message header has no recognizable date");
        return None;
    };

    let url = message
        .select(&consts::ATTACHMENT_LINK_SELECTOR)
        .filter_map(|link| link.value().attr("href"))
        .find(|href| is_image_url(href))?;

    Some(Attachment::new(url, timestamp))
}

/// Trimmed text of the last breadcrumb, if the page has a non-empty one.
fn breadcrumb_name(document: &Html) -> Option<String> {
    let container = document.select(&consts::CRUMBS_SELECTOR).next()?;
    container
        .select(&consts::CRUMB_SELECTOR)
        .last()
        .map(element_text)
        .filter(|name| !name.is_empty())
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
