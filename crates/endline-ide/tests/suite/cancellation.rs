use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use endline_core::{EditError, TextEdit};
use endline_ide::{
    Abstain, AutomaticLineEnder, Cancelled, CommandRegistry, Dispatch, Document,
    EditorOperations, InMemoryDocument, KeyCommand,
};
use endline_syntax::{JavaParseResult, ParseOptions};
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

use crate::text_fixture::{context, document, in_method, render};

#[tokio::test]
async fn cancelled_request_decides_nothing() {
    let doc = document(&in_method("        x = 1<|>"));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = AutomaticLineEnder::default()
        .decide(doc.as_ref(), doc.caret(), &cancel)
        .await;
    assert_eq!(result, Err(Abstain::Cancelled));
}

#[tokio::test]
async fn cancelled_request_still_gets_a_plain_new_line() {
    let doc = document(&in_method("        x = 1<|>"));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let dispatch = CommandRegistry::with_defaults(Default::default())
        .dispatch(&context(&doc, KeyCommand::CommitLine), &cancel)
        .await;

    assert_eq!(dispatch, Dispatch::DefaultAction);
    assert_eq!(render(&doc), in_method("        x = 1\n        <|>"));
}

/// Cancels the request the second time the tree is fetched, which happens once the
/// terminator is already in the buffer.
struct CancelOnSecondFetch {
    inner: Arc<InMemoryDocument>,
    cancel: CancellationToken,
    fetches: AtomicUsize,
}

#[async_trait]
impl Document for CancelOnSecondFetch {
    async fn syntax_tree(&self, cancel: &CancellationToken) -> Result<JavaParseResult, Cancelled> {
        if self.fetches.fetch_add(1, Ordering::SeqCst) == 1 {
            self.cancel.cancel();
        }
        self.inner.syntax_tree(cancel).await
    }

    async fn text(&self, cancel: &CancellationToken) -> Result<Arc<str>, Cancelled> {
        self.inner.text(cancel).await
    }

    fn language_options(&self) -> ParseOptions {
        self.inner.language_options()
    }

    fn apply_text_edits(&self, edits: &[TextEdit]) -> Result<(), EditError> {
        self.inner.apply_text_edits(edits)
    }
}

#[tokio::test]
async fn cancellation_during_formatting_rolls_the_commit_back() {
    let inner = document(&in_method("        x=1<|>"));
    let cancel = CancellationToken::new();
    let wrapper = Arc::new(CancelOnSecondFetch {
        inner: inner.clone(),
        cancel: cancel.clone(),
        fetches: AtomicUsize::new(0),
    });

    let document: Arc<dyn Document> = wrapper.clone();
    let editor: Arc<dyn EditorOperations> = inner.clone();
    let ctx = endline_ide::CommandContext::new(document, editor, KeyCommand::CommitLine);
    let dispatch = CommandRegistry::with_defaults(Default::default())
        .dispatch(&ctx, &cancel)
        .await;

    assert_eq!(wrapper.fetches.load(Ordering::SeqCst), 2);
    assert_eq!(dispatch, Dispatch::DefaultAction);
    assert_eq!(render(&inner), in_method("        x=1\n        <|>"));
    assert_eq!(inner.undo_depth(), 1);
}
