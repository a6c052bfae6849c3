//! `vkrescue`: recover photo attachments from a VK data export.
//!
//! The export is a tree of HTML pages: one page per photo album and one
//! folder of paginated `messagesN.html` files per conversation. This crate
//! decodes those pages, extracts the images they reference, and downloads
//! each one into a sanitized directory tree, retrying transient failures
//! and skipping files that are already present.

pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod media;
pub mod model;
pub mod parser;
pub mod pipeline;
