use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use endline_ide::{CommandContext, CommandRegistry, Dispatch, KeyCommand, KeyCommandHandler};
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

use crate::text_fixture::{context, document, in_method, render};

/// Records calls and answers with a fixed result.
struct Recording {
    name: &'static str,
    accepts: bool,
    handles: bool,
    calls: AtomicUsize,
}

impl Recording {
    fn new(name: &'static str, accepts: bool, handles: bool) -> Arc<Self> {
        Arc::new(Self {
            name,
            accepts,
            handles,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyCommandHandler for Recording {
    fn name(&self) -> &'static str {
        self.name
    }

    fn can_handle(&self, command: &KeyCommand) -> bool {
        self.accepts && matches!(command, KeyCommand::CommitLine)
    }

    async fn execute(&self, _ctx: &CommandContext, _cancel: &CancellationToken) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.handles
    }
}

#[test]
fn default_registry_holds_the_line_ender() {
    let registry = CommandRegistry::with_defaults(Default::default());
    assert_eq!(registry.handler_names(), vec!["automatic-line-ender"]);
}

#[tokio::test]
async fn typed_characters_fall_through_to_the_default_action() {
    let doc = document("class A {<|>}\n");
    let registry = CommandRegistry::with_defaults(Default::default());

    let dispatch = registry
        .dispatch(
            &context(&doc, KeyCommand::TypeChar('x')),
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(dispatch, Dispatch::DefaultAction);
    assert_eq!(render(&doc), "class A {x<|>}\n");
}

#[tokio::test]
async fn earlier_registration_wins() {
    let custom = Recording::new("custom", true, true);
    let mut registry = CommandRegistry::new();
    registry.register(custom.clone());
    registry.register(Arc::new(endline_ide::AutomaticLineEnder::default()));

    let fixture = in_method("        x = 1<|>");
    let doc = document(&fixture);
    let dispatch = registry
        .dispatch(&context(&doc, KeyCommand::CommitLine), &CancellationToken::new())
        .await;

    assert_eq!(dispatch, Dispatch::Handled { by: "custom" });
    assert_eq!(custom.calls(), 1);
    assert_eq!(render(&doc), fixture);
}

#[tokio::test]
async fn declining_handler_passes_the_key_on() {
    let declining = Recording::new("declining", true, false);
    let mut registry = CommandRegistry::new();
    registry
        .register(declining.clone())
        .register(Arc::new(endline_ide::AutomaticLineEnder::default()));

    let doc = document(&in_method("        x = 1<|>"));
    let dispatch = registry
        .dispatch(&context(&doc, KeyCommand::CommitLine), &CancellationToken::new())
        .await;

    assert_eq!(
        dispatch,
        Dispatch::Handled {
            by: "automatic-line-ender"
        }
    );
    assert_eq!(declining.calls(), 1);
    assert_eq!(render(&doc), in_method("        x = 1;\n        <|>"));
}

#[tokio::test]
async fn handlers_that_cannot_handle_the_key_are_not_run() {
    let unwilling = Recording::new("unwilling", false, true);
    let mut registry = CommandRegistry::new();
    registry.register(unwilling.clone());

    let doc = document("class A {}<|>\n");
    let dispatch = registry
        .dispatch(&context(&doc, KeyCommand::CommitLine), &CancellationToken::new())
        .await;

    assert_eq!(dispatch, Dispatch::DefaultAction);
    assert_eq!(unwilling.calls(), 0);
    assert_eq!(render(&doc), "class A {}\n<|>\n");
}
