//! Text edit primitives and utilities.

use crate::{TextRange, TextSize};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextEdit {
    pub range: TextRange,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(range: TextRange, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    pub fn insert(offset: TextSize, text: impl Into<String>) -> Self {
        Self::new(TextRange::empty(offset), text)
    }

    pub fn delete(range: TextRange) -> Self {
        Self::new(range, String::new())
    }

    /// Signed change in text length caused by this edit.
    fn delta(&self) -> i64 {
        self.replacement.len() as i64 - i64::from(u32::from(self.range.len()))
    }
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("edit range {range:?} is out of bounds for text length {text_len:?}")]
    RangeOutOfBounds { range: TextRange, text_len: TextSize },
    #[error("offset {offset:?} is not a UTF-8 character boundary")]
    InvalidUtf8Boundary { offset: TextSize },
    #[error("overlapping edits: {first:?} overlaps {second:?}")]
    OverlappingEdits { first: TextRange, second: TextRange },
}

/// Apply a list of edits to a text snapshot.
///
/// The function is deterministic: edits are first sorted by `(start, end)` and
/// applied from the end of the text backwards. Either every edit applies or none does.
pub fn apply_text_edits(text: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    let mut edits = edits.to_vec();
    normalize_text_edits(text, &mut edits)?;

    let mut out = text.to_string();
    for edit in edits.into_iter().rev() {
        let start = u32::from(edit.range.start()) as usize;
        let end = u32::from(edit.range.end()) as usize;
        debug_assert!(out.is_char_boundary(start) && out.is_char_boundary(end));
        out.replace_range(start..end, &edit.replacement);
    }
    Ok(out)
}

/// Sort edits and check for overlaps / out-of-bounds.
pub fn normalize_text_edits(text: &str, edits: &mut Vec<TextEdit>) -> Result<(), EditError> {
    edits.sort_by_key(|e| (e.range.start(), e.range.end()));

    let text_len = TextSize::of(text);

    for edit in edits.iter() {
        if edit.range.end() > text_len {
            return Err(EditError::RangeOutOfBounds {
                range: edit.range,
                text_len,
            });
        }

        for offset in [edit.range.start(), edit.range.end()] {
            if !text.is_char_boundary(u32::from(offset) as usize) {
                return Err(EditError::InvalidUtf8Boundary { offset });
            }
        }
    }

    for pair in edits.windows(2) {
        let first = &pair[0];
        let second = &pair[1];
        let same_point_inserts = first.range.is_empty()
            && second.range.is_empty()
            && first.range.start() == second.range.start();
        if first.range.end() > second.range.start() || same_point_inserts {
            return Err(EditError::OverlappingEdits {
                first: first.range,
                second: second.range,
            });
        }
    }

    // Coalesce back-to-back edits.
    let mut merged: Vec<TextEdit> = Vec::with_capacity(edits.len());
    for edit in edits.drain(..) {
        if let Some(last) = merged.last_mut() {
            if last.range.end() == edit.range.start() {
                last.range = TextRange::new(last.range.start(), edit.range.end());
                last.replacement.push_str(&edit.replacement);
                continue;
            }
        }
        merged.push(edit);
    }
    *edits = merged;

    Ok(())
}

/// Map an offset in the text before `edits` to the matching offset after them.
///
/// `edits` must already be normalized. An offset inside a replaced range moves to the
/// end of the replacement; an offset equal to an insertion point stays in front of it
/// unless `stick_right` is set.
pub fn translate_offset(offset: TextSize, edits: &[TextEdit], stick_right: bool) -> TextSize {
    let mut shift: i64 = 0;
    for edit in edits {
        let start = edit.range.start();
        let end = edit.range.end();
        if end < offset || (end == offset && (!edit.range.is_empty() || stick_right)) {
            shift += edit.delta();
        } else if start < offset {
            let moved = i64::from(u32::from(start)) + shift + edit.replacement.len() as i64;
            return TextSize::from(moved.max(0) as u32);
        } else {
            break;
        }
    }
    TextSize::from((i64::from(u32::from(offset)) + shift).max(0) as u32)
}
