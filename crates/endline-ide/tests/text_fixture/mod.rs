//! Shared helpers for endline-ide integration test fixtures.
//!
//! Fixtures mark the caret with `<|>`.

use std::sync::Arc;

use endline_ide::{CommandContext, CommandRegistry, Dispatch, InMemoryDocument, KeyCommand};
use endline_ide::{Document, EditorOperations};
use endline_syntax::{ParseOptions, TextSize};
use tokio_util::sync::CancellationToken;

pub const CARET: &str = "<|>";

/// Strip the caret marker, returning the text and the caret offset.
pub fn extract_caret(fixture: &str) -> (String, TextSize) {
    let offset = fixture
        .find(CARET)
        .unwrap_or_else(|| panic!("fixture has no {CARET} marker: {fixture:?}"));
    let mut text = String::with_capacity(fixture.len() - CARET.len());
    text.push_str(&fixture[..offset]);
    text.push_str(&fixture[offset + CARET.len()..]);
    (text, TextSize::from(offset as u32))
}

/// The document text with the caret marker put back in.
pub fn render(doc: &InMemoryDocument) -> String {
    let mut text = doc.current_text();
    text.insert_str(u32::from(doc.caret()) as usize, CARET);
    text
}

/// Wrap statement lines (already indented by eight spaces) in a class and method.
pub fn in_method(body: &str) -> String {
    format!("class A {{\n    void m() {{\n{body}\n    }}\n}}\n")
}

pub fn document(fixture: &str) -> Arc<InMemoryDocument> {
    document_with_options(fixture, ParseOptions::default())
}

pub fn document_with_options(fixture: &str, options: ParseOptions) -> Arc<InMemoryDocument> {
    let (text, caret) = extract_caret(fixture);
    Arc::new(InMemoryDocument::with_options(text, caret, options))
}

pub fn context(doc: &Arc<InMemoryDocument>, command: KeyCommand) -> CommandContext {
    let document: Arc<dyn Document> = doc.clone();
    let editor: Arc<dyn EditorOperations> = doc.clone();
    CommandContext::new(document, editor, command)
}

/// Press Enter through the default registry.
pub async fn commit_line(doc: &Arc<InMemoryDocument>) -> Dispatch {
    CommandRegistry::with_defaults(Default::default())
        .dispatch(&context(doc, KeyCommand::CommitLine), &CancellationToken::new())
        .await
}
