//! Panel models
//!
//! Addressable representations of the two result panels. Both are plain
//! data rebuilt from scratch on every parse response; the widgets in
//! `crate::ui` only read them.

pub mod source;
pub mod tree;
