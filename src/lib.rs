//! Interactive viewer for a document parsing service.
//!
//! Source text goes out to the service on every edit; the response comes
//! back as a tree of named, positioned nodes. The viewer renders the text
//! and the tree side by side and keeps one selection synchronized between
//! them: pick a node and its span lights up in the text, character by
//! character.

pub mod app;
pub mod config;
pub mod editor;
pub mod highlight;
pub mod position;
pub mod protocol;
pub mod services;
pub mod ui;
pub mod unicode;
pub mod view;
