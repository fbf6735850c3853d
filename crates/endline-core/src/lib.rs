//! Core text primitives shared by the endline crates.
//!
//! Everything here is independent of the Java syntax tree: byte offsets and ranges,
//! line lookups, and validated text edits.

pub mod edit;
pub mod text;

pub use edit::{apply_text_edits, normalize_text_edits, translate_offset, EditError, TextEdit};
pub use text::{slice, LineCol, LineIndex, TextRange, TextSize};
