//! Routing key presses to handlers.
//!
//! Handlers are registered explicitly, in priority order. The first handler that accepts a
//! command and reports it handled wins; when none does, the registry performs the editor's
//! default action for the key.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use endline_format::FormatConfig;
use tokio_util::sync::CancellationToken;

use crate::document::{Document, EditorOperations};
use crate::line_ender::AutomaticLineEnder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Enter.
    CommitLine,
    TypeChar(char),
}

/// Everything a handler gets to see for one key press.
#[derive(Clone)]
pub struct CommandContext {
    pub document: Arc<dyn Document>,
    pub editor: Arc<dyn EditorOperations>,
    pub command: KeyCommand,
}

impl CommandContext {
    pub fn new(
        document: Arc<dyn Document>,
        editor: Arc<dyn EditorOperations>,
        command: KeyCommand,
    ) -> Self {
        Self {
            document,
            editor,
            command,
        }
    }
}

impl fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext")
            .field("command", &self.command)
            .field("caret", &self.editor.caret())
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait KeyCommandHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn can_handle(&self, command: &KeyCommand) -> bool;

    /// Returns `true` when the key press was fully handled and the default action must not
    /// run.
    async fn execute(&self, ctx: &CommandContext, cancel: &CancellationToken) -> bool;
}

/// Outcome of [`CommandRegistry::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Handled { by: &'static str },
    DefaultAction,
}

#[derive(Default)]
pub struct CommandRegistry {
    handlers: Vec<Arc<dyn KeyCommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in handlers.
    pub fn with_defaults(format: FormatConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(AutomaticLineEnder::new(format)));
        registry
    }

    /// Appends `handler`; earlier registrations take precedence.
    pub fn register(&mut self, handler: Arc<dyn KeyCommandHandler>) -> &mut Self {
        self.handlers.push(handler);
        self
    }

    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    pub async fn dispatch(&self, ctx: &CommandContext, cancel: &CancellationToken) -> Dispatch {
        for handler in &self.handlers {
            if !handler.can_handle(&ctx.command) {
                continue;
            }
            if handler.execute(ctx, cancel).await {
                tracing::trace!(
                    target = "endline.ide",
                    handler = handler.name(),
                    command = ?ctx.command,
                    "command handled"
                );
                return Dispatch::Handled { by: handler.name() };
            }
        }

        default_action(ctx);
        Dispatch::DefaultAction
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("handlers", &self.handler_names())
            .finish()
    }
}

fn default_action(ctx: &CommandContext) {
    let editor = ctx.editor.as_ref();
    match ctx.command {
        KeyCommand::CommitLine => editor.insert_new_line(),
        KeyCommand::TypeChar(ch) => {
            let mut buf = [0u8; 4];
            if let Err(err) = editor.insert_text(editor.caret(), ch.encode_utf8(&mut buf)) {
                tracing::warn!(target = "endline.ide", error = %err, "failed to type character");
            }
        }
    }
}
