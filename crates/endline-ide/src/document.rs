//! The document and editor seams the line ender works through.

use std::sync::Arc;

use async_trait::async_trait;
use endline_core::{
    apply_text_edits, normalize_text_edits, translate_offset, EditError, LineIndex, TextEdit,
    TextSize,
};
use endline_syntax::{parse_java, JavaParseResult, ParseOptions};
use parking_lot::Mutex;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation was cancelled")]
pub struct Cancelled;

/// A source document with an up-to-date syntax tree.
///
/// The tree is handed out as a [`JavaParseResult`] (a green tree plus its errors) so it can
/// cross threads; call [`JavaParseResult::syntax`] to walk it.
#[async_trait]
pub trait Document: Send + Sync {
    async fn syntax_tree(&self, cancel: &CancellationToken) -> Result<JavaParseResult, Cancelled>;

    async fn text(&self, cancel: &CancellationToken) -> Result<Arc<str>, Cancelled>;

    /// Language options of the project owning this document.
    fn language_options(&self) -> ParseOptions;

    /// Apply `edits` (all expressed against the current text) as one change.
    fn apply_text_edits(&self, edits: &[TextEdit]) -> Result<(), EditError>;
}

/// Caret movement, typing and undo grouping.
pub trait EditorOperations: Send + Sync {
    fn caret(&self) -> TextSize;

    /// Insert `text` at `offset`. A caret sitting at `offset` ends up after the text.
    fn insert_text(&self, offset: TextSize, text: &str) -> Result<(), EditError>;

    fn move_to_end_of_line(&self);

    /// Break the line at the caret, carrying the current line's indentation over.
    fn insert_new_line(&self);

    /// Group every following edit into a single undo step.
    fn begin_undo_transaction(&self, description: &str);

    fn complete_undo_transaction(&self);

    /// Revert every edit made since the transaction began.
    fn cancel_undo_transaction(&self);
}

#[derive(Debug, Clone)]
struct Snapshot {
    text: String,
    caret: TextSize,
}

#[derive(Debug)]
struct Transaction {
    description: String,
    before: Snapshot,
}

#[derive(Debug)]
struct State {
    text: String,
    parse: JavaParseResult,
    caret: TextSize,
    version: u64,
    undo: Vec<Snapshot>,
    transaction: Option<Transaction>,
}

impl State {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.text.clone(),
            caret: self.caret,
        }
    }

    /// Records an undo step unless a transaction is collecting edits.
    fn record_undo(&mut self) {
        if self.transaction.is_none() {
            let snapshot = self.snapshot();
            self.undo.push(snapshot);
        }
    }

    fn replace_text(&mut self, text: String) {
        self.parse = parse_java(&text);
        self.text = text;
        self.version += 1;
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.caret = snapshot.caret;
        self.replace_text(snapshot.text);
    }

    fn edit(&mut self, mut edits: Vec<TextEdit>, caret_sticks_right: bool) -> Result<(), EditError> {
        normalize_text_edits(&self.text, &mut edits)?;
        if edits.is_empty() {
            return Ok(());
        }
        let text = apply_text_edits(&self.text, &edits)?;
        self.record_undo();
        self.caret = translate_offset(self.caret, &edits, caret_sticks_right);
        self.replace_text(text);
        Ok(())
    }
}

/// A text buffer that re-parses itself after every edit.
#[derive(Debug)]
pub struct InMemoryDocument {
    options: ParseOptions,
    state: Mutex<State>,
}

impl InMemoryDocument {
    pub fn new(text: impl Into<String>, caret: TextSize) -> Self {
        Self::with_options(text, caret, ParseOptions::default())
    }

    pub fn with_options(text: impl Into<String>, caret: TextSize, options: ParseOptions) -> Self {
        let text = text.into();
        let caret = caret.min(TextSize::of(text.as_str()));
        Self {
            options,
            state: Mutex::new(State {
                parse: parse_java(&text),
                text,
                caret,
                version: 0,
                undo: Vec::new(),
                transaction: None,
            }),
        }
    }

    pub fn current_text(&self) -> String {
        self.state.lock().text.clone()
    }

    /// Bumped on every change to the text.
    pub fn version(&self) -> u64 {
        self.state.lock().version
    }

    pub fn set_caret(&self, caret: TextSize) {
        let mut state = self.state.lock();
        state.caret = caret.min(TextSize::of(state.text.as_str()));
    }

    pub fn undo_depth(&self) -> usize {
        self.state.lock().undo.len()
    }

    /// Revert the most recent undo step. Returns `false` when there is nothing to undo.
    pub fn undo(&self) -> bool {
        let mut state = self.state.lock();
        if state.transaction.is_some() {
            return false;
        }
        match state.undo.pop() {
            Some(snapshot) => {
                state.restore(snapshot);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl Document for InMemoryDocument {
    async fn syntax_tree(&self, cancel: &CancellationToken) -> Result<JavaParseResult, Cancelled> {
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }
        Ok(self.state.lock().parse.clone())
    }

    async fn text(&self, cancel: &CancellationToken) -> Result<Arc<str>, Cancelled> {
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }
        Ok(Arc::from(self.state.lock().text.as_str()))
    }

    fn language_options(&self) -> ParseOptions {
        self.options
    }

    fn apply_text_edits(&self, edits: &[TextEdit]) -> Result<(), EditError> {
        self.state.lock().edit(edits.to_vec(), false)
    }
}

impl EditorOperations for InMemoryDocument {
    fn caret(&self) -> TextSize {
        self.state.lock().caret
    }

    fn insert_text(&self, offset: TextSize, text: &str) -> Result<(), EditError> {
        self.state
            .lock()
            .edit(vec![TextEdit::insert(offset, text)], true)
    }

    fn move_to_end_of_line(&self) {
        let mut state = self.state.lock();
        let index = LineIndex::new(&state.text);
        let line = index.line_of(state.caret);
        if let Some(end) = index.line_end(line) {
            state.caret = end;
        }
    }

    fn insert_new_line(&self) {
        let mut state = self.state.lock();
        let index = LineIndex::new(&state.text);
        let caret = state.caret;
        let line_start = index
            .line_start(index.line_of(caret))
            .unwrap_or(caret);
        let before_caret = state
            .text
            .get(usize::from(line_start)..usize::from(caret))
            .unwrap_or_default();
        let indent: String = before_caret
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect();

        let edit = TextEdit::insert(caret, format!("\n{indent}"));
        if let Err(err) = state.edit(vec![edit], true) {
            tracing::warn!(target = "endline.ide", error = %err, "failed to insert new line");
        }
    }

    fn begin_undo_transaction(&self, description: &str) {
        let mut state = self.state.lock();
        if state.transaction.is_some() {
            tracing::warn!(
                target = "endline.ide",
                description,
                "undo transaction already open; joining it"
            );
            return;
        }
        let before = state.snapshot();
        state.transaction = Some(Transaction {
            description: description.to_owned(),
            before,
        });
    }

    fn complete_undo_transaction(&self) {
        let mut state = self.state.lock();
        let Some(transaction) = state.transaction.take() else {
            return;
        };
        if transaction.before.text != state.text {
            tracing::trace!(
                target = "endline.ide",
                description = %transaction.description,
                "undo transaction completed"
            );
            state.undo.push(transaction.before);
        }
    }

    fn cancel_undo_transaction(&self) {
        let mut state = self.state.lock();
        let Some(transaction) = state.transaction.take() else {
            return;
        };
        if transaction.before.text != state.text {
            state.restore(transaction.before);
        } else {
            state.caret = transaction.before.caret;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use endline_core::TextRange;
    use pretty_assertions::assert_eq;

    fn doc(text: &str, caret: u32) -> InMemoryDocument {
        InMemoryDocument::new(text, TextSize::from(caret))
    }

    #[test]
    fn insert_text_moves_a_caret_sitting_at_the_insertion_point() {
        let doc = doc("ab", 1);
        doc.insert_text(TextSize::from(1), "xy").unwrap();
        assert_eq!(doc.current_text(), "axyb");
        assert_eq!(doc.caret(), TextSize::from(3));
        assert_eq!(doc.version(), 1);
    }

    #[test]
    fn new_line_copies_indentation() {
        let doc = doc("    foo();\n}", 10);
        doc.insert_new_line();
        assert_eq!(doc.current_text(), "    foo();\n    \n}");
        assert_eq!(doc.caret(), TextSize::from(15));
    }

    #[test]
    fn move_to_end_of_line_stops_before_the_break() {
        let doc = doc("abc\r\ndef", 1);
        doc.move_to_end_of_line();
        assert_eq!(doc.caret(), TextSize::from(3));
    }

    #[test]
    fn transaction_is_a_single_undo_step() {
        let doc = doc("x", 1);
        doc.begin_undo_transaction("test");
        doc.insert_text(TextSize::from(1), ";").unwrap();
        doc.insert_new_line();
        doc.complete_undo_transaction();
        assert_eq!(doc.current_text(), "x;\n");
        assert_eq!(doc.undo_depth(), 1);

        assert!(doc.undo());
        assert_eq!(doc.current_text(), "x");
        assert_eq!(doc.caret(), TextSize::from(1));
        assert!(!doc.undo());
    }

    #[test]
    fn cancelled_transaction_restores_text_and_caret() {
        let doc = doc("x", 1);
        doc.begin_undo_transaction("test");
        doc.insert_text(TextSize::from(1), ";").unwrap();
        doc.cancel_undo_transaction();
        assert_eq!(doc.current_text(), "x");
        assert_eq!(doc.caret(), TextSize::from(1));
        assert_eq!(doc.undo_depth(), 0);
    }

    #[test]
    fn rejected_edits_leave_the_document_alone() {
        let doc = doc("abc", 0);
        let err = Document::apply_text_edits(
            &doc,
            &[TextEdit::delete(TextRange::new(
                TextSize::from(2),
                TextSize::from(9),
            ))],
        )
        .unwrap_err();
        assert!(matches!(err, EditError::RangeOutOfBounds { .. }));
        assert_eq!(doc.current_text(), "abc");
        assert_eq!(doc.version(), 0);
    }

    #[tokio::test]
    async fn snapshot_fetches_honor_cancellation() {
        let doc = doc("class A {}", 0);
        let cancel = CancellationToken::new();
        assert!(doc.syntax_tree(&cancel).await.is_ok());
        cancel.cancel();
        assert_eq!(doc.text(&cancel).await.unwrap_err(), Cancelled);
        assert!(doc.syntax_tree(&cancel).await.is_err());
    }
}
