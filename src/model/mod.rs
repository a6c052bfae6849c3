//! Core data model: albums, contacts, dated attachments, and fetch outcomes.

pub mod album;
pub mod attachment;
pub mod contact;
pub mod outcome;
