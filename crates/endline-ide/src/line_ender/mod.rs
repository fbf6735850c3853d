//! Inserting a missing `;` when the user commits a line.
//!
//! A decision runs in stages, each of which may abstain:
//! 1. [`find_owning_unit`]: the statement, field or import around the caret.
//! 2. [`resolve_terminal_token`]: the unit's last token, which must be on the caret's line
//!    and not already a `;`.
//! 3. [`validate_location`]: guards for caret positions where a `;` would be unwanted.
//! 4. [`check_termination`]: the unit's text plus `;`, parsed on its own, must be clean.
//!
//! Only then is the `;` inserted. The new line is opened in the same undo step, and the
//! completed construct is re-formatted by [`apply_formatting`].

mod formatting;
mod last_token;
mod location;
mod owning_unit;
mod speculative;

use async_trait::async_trait;
use endline_core::{slice, EditError, LineIndex, TextRange};
use endline_format::FormatConfig;
use endline_syntax::navigation::last_token;
use endline_syntax::{JavaParseResult, ParseOptions, SyntaxKind, TextSize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::command::{CommandContext, KeyCommand, KeyCommandHandler};
use crate::document::{Cancelled, Document, EditorOperations};

pub use formatting::apply_formatting;
pub use last_token::resolve_terminal_token;
pub use location::validate_location;
pub use owning_unit::{find_owning_unit, OwningUnit};
pub use speculative::{check_termination, Rejected};

pub const TERMINATOR: &str = ";";

const UNDO_DESCRIPTION: &str = "Automatic line ender";

/// Why no terminator was inserted. None of these reach the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Abstain {
    #[error(transparent)]
    NotApplicable(#[from] NotApplicable),
    #[error("vetoed: {0}")]
    Vetoed(#[from] Veto),
    #[error("speculative parse rejected the terminator: {0}")]
    SpeculativeRejected(#[from] Rejected),
    #[error("editor rejected the insertion: {0}")]
    EditFailed(#[from] EditError),
    #[error("cancelled")]
    Cancelled,
}

impl From<Cancelled> for Abstain {
    fn from(_: Cancelled) -> Self {
        Abstain::Cancelled
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NotApplicable {
    #[error("no statement, field or import at the caret")]
    NoOwningUnit,
    #[error("construct ends with a closing brace")]
    ClosingBrace,
    #[error("construct does not end on the caret line")]
    NotOnCaretLine,
    #[error("statement is already terminated")]
    AlreadyTerminated,
    #[error("no place on the caret line to put the terminator")]
    InsertionPoint,
    #[error("nothing well-formed to format after the insertion")]
    FormattingSkipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Veto {
    #[error("member chain continues at the end of the line")]
    ExpressionStatementAtLineEnd,
    #[error("non-whitespace text follows the construct")]
    TrailingContent,
    #[error("import has no name")]
    EmptyImport,
    #[error("caret is inside an unterminated literal")]
    UnterminatedLiteral,
    #[error("embedded statement is missing or empty")]
    EmptyEmbeddedStatement,
}

/// A terminator the line ender decided to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub insertion: TextSize,
    pub terminator: &'static str,
    /// Kind of the construct being terminated.
    pub unit: SyntaxKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Idle,
    ResolvingEnd,
    Validating,
    SpeculativeCheck,
    Committing,
    Formatting,
}

/// Traces state transitions; dropping it returns to `Idle`.
#[derive(Debug, Default)]
struct Progress {
    state: State,
}

impl Progress {
    fn advance(&mut self, next: State) {
        tracing::trace!(target = "endline.ide", from = ?self.state, to = ?next, "line ender state");
        self.state = next;
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        if self.state != State::Idle {
            self.advance(State::Idle);
        }
    }
}

/// Cancels the undo transaction unless completed.
struct UndoScope<'a> {
    editor: &'a dyn EditorOperations,
    open: bool,
}

impl<'a> UndoScope<'a> {
    fn begin(editor: &'a dyn EditorOperations) -> Self {
        editor.begin_undo_transaction(UNDO_DESCRIPTION);
        Self { editor, open: true }
    }

    fn complete(mut self) {
        self.open = false;
        self.editor.complete_undo_transaction();
    }
}

impl Drop for UndoScope<'_> {
    fn drop(&mut self) {
        if self.open {
            tracing::debug!(target = "endline.ide", "rolling back line ender edits");
            self.editor.cancel_undo_transaction();
        }
    }
}

fn checkpoint(cancel: &CancellationToken) -> Result<(), Abstain> {
    if cancel.is_cancelled() {
        Err(Abstain::Cancelled)
    } else {
        Ok(())
    }
}

/// Handles [`KeyCommand::CommitLine`] by terminating the current statement when it is
/// safe to.
#[derive(Debug, Clone, Default)]
pub struct AutomaticLineEnder {
    format: FormatConfig,
}

impl AutomaticLineEnder {
    pub fn new(format: FormatConfig) -> Self {
        Self { format }
    }

    /// Decides whether to insert a terminator for a caret at `caret`. Touches nothing.
    pub async fn decide(
        &self,
        document: &dyn Document,
        caret: TextSize,
        cancel: &CancellationToken,
    ) -> Result<Decision, Abstain> {
        let mut progress = Progress::default();
        self.decide_with(&mut progress, document, caret, cancel).await
    }

    /// Decides, then inserts the terminator, opens a new line and re-formats, all in one
    /// undo step. Nothing is left behind when this returns an error.
    pub async fn run(
        &self,
        document: &dyn Document,
        editor: &dyn EditorOperations,
        cancel: &CancellationToken,
    ) -> Result<Decision, Abstain> {
        let mut progress = Progress::default();
        let decision = self
            .decide_with(&mut progress, document, editor.caret(), cancel)
            .await?;
        self.commit(&mut progress, document, editor, &decision, cancel)
            .await?;
        Ok(decision)
    }

    async fn decide_with(
        &self,
        progress: &mut Progress,
        document: &dyn Document,
        caret: TextSize,
        cancel: &CancellationToken,
    ) -> Result<Decision, Abstain> {
        progress.advance(State::ResolvingEnd);
        let parse = document.syntax_tree(cancel).await?;
        let text = document.text(cancel).await?;
        checkpoint(cancel)?;
        decide_in_snapshot(
            progress,
            &parse,
            &text,
            caret,
            document.language_options(),
            cancel,
        )
    }

    async fn commit(
        &self,
        progress: &mut Progress,
        document: &dyn Document,
        editor: &dyn EditorOperations,
        decision: &Decision,
        cancel: &CancellationToken,
    ) -> Result<(), Abstain> {
        checkpoint(cancel)?;
        progress.advance(State::Committing);

        let scope = UndoScope::begin(editor);
        editor.insert_text(decision.insertion, decision.terminator)?;
        editor.move_to_end_of_line();
        editor.insert_new_line();
        checkpoint(cancel)?;

        progress.advance(State::Formatting);
        let position = decision.insertion + TextSize::of(decision.terminator);
        match apply_formatting(document, position, &self.format, cancel).await {
            Ok(applied) => {
                tracing::trace!(target = "endline.ide", applied, "formatted completed statement");
            }
            Err(Abstain::Cancelled) => return Err(Abstain::Cancelled),
            Err(reason) => {
                tracing::debug!(target = "endline.ide", reason = %reason, "formatting skipped");
            }
        }

        scope.complete();
        Ok(())
    }
}

fn decide_in_snapshot(
    progress: &mut Progress,
    parse: &JavaParseResult,
    text: &str,
    caret: TextSize,
    options: ParseOptions,
    cancel: &CancellationToken,
) -> Result<Decision, Abstain> {
    let root = parse.syntax();
    let index = LineIndex::new(text);

    let unit = find_owning_unit(&root, caret).ok_or(NotApplicable::NoOwningUnit)?;
    let last = resolve_terminal_token(&index, caret, &unit)?;
    checkpoint(cancel)?;

    progress.advance(State::Validating);
    validate_location(text, &index, caret, &unit, &last)?;
    checkpoint(cancel)?;

    progress.advance(State::SpeculativeCheck);
    check_termination(&unit, TERMINATOR, options)?;

    let insertion =
        insertion_point(text, &index, caret, &unit).ok_or(NotApplicable::InsertionPoint)?;
    Ok(Decision {
        insertion,
        terminator: TERMINATOR,
        unit: unit.kind(),
    })
}

/// Where the terminator goes: right after the unit's last real token, or at the end of the
/// line when only whitespace follows that token. When the token is on an earlier line, only
/// a blank caret line can take the terminator.
fn insertion_point(
    text: &str,
    index: &LineIndex,
    caret: TextSize,
    unit: &OwningUnit,
) -> Option<TextSize> {
    let line = index.line_of(caret);
    let line_range = index.line_range(line)?;
    let is_blank = |range: TextRange| slice(text, range).map(|s| s.trim().is_empty());

    let end = match last_token(unit.syntax(), false) {
        Some(token) if index.line_of(token.text_range().end()) == line => token.text_range().end(),
        _ => return is_blank(line_range)?.then_some(line_range.end()),
    };

    if is_blank(TextRange::new(end, line_range.end()))? {
        Some(line_range.end())
    } else {
        Some(end)
    }
}

#[async_trait]
impl KeyCommandHandler for AutomaticLineEnder {
    fn name(&self) -> &'static str {
        "automatic-line-ender"
    }

    fn can_handle(&self, command: &KeyCommand) -> bool {
        matches!(command, KeyCommand::CommitLine)
    }

    async fn execute(&self, ctx: &CommandContext, cancel: &CancellationToken) -> bool {
        match self.run(ctx.document.as_ref(), ctx.editor.as_ref(), cancel).await {
            Ok(decision) => {
                tracing::debug!(
                    target = "endline.ide",
                    insertion = u32::from(decision.insertion),
                    unit = ?decision.unit,
                    "inserted terminator"
                );
                true
            }
            Err(reason) => {
                tracing::debug!(target = "endline.ide", reason = %reason, "line ender abstained");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tracing_subscriber::layer::SubscriberExt;

    use super::*;
    use crate::config::{BufferSink, LogBuffer};
    use crate::document::InMemoryDocument;

    fn at_end_of(text: &str, needle: &str) -> TextSize {
        let offset = text.find(needle).unwrap() + needle.len();
        TextSize::from(offset as u32)
    }

    #[test]
    fn insertion_point_skips_trailing_comments_and_whitespace() {
        let text = "class A { void m() {\n  foo() // go\n  bar()   \n} }";
        let root = endline_syntax::parse_java(text).syntax();
        let index = LineIndex::new(text);

        let caret = at_end_of(text, "// go");
        let unit = find_owning_unit(&root, caret).unwrap();
        assert_eq!(
            insertion_point(text, &index, caret, &unit),
            Some(at_end_of(text, "foo()"))
        );

        let caret = at_end_of(text, "bar()   ");
        let unit = find_owning_unit(&root, caret).unwrap();
        assert_eq!(insertion_point(text, &index, caret, &unit), Some(caret));
    }

    #[tokio::test]
    async fn abstain_reasons_are_logged() {
        let buffer = Arc::new(LogBuffer::new(64));
        let subscriber = tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new("debug"))
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(BufferSink(buffer.clone()))
                    .with_ansi(false),
            );
        let _guard = tracing::subscriber::set_default(subscriber);

        let text = "class A { void m() {\n  x = 1;\n} }";
        let doc = Arc::new(InMemoryDocument::new(text, at_end_of(text, "1;")));
        let ctx = CommandContext::new(doc.clone(), doc.clone(), KeyCommand::CommitLine);
        let handled = AutomaticLineEnder::default()
            .execute(&ctx, &CancellationToken::new())
            .await;
        assert!(!handled);

        let logs = buffer.last_lines(64).join("\n");
        assert!(logs.contains("line ender abstained"), "{logs}");
        assert!(logs.contains("statement is already terminated"), "{logs}");
    }
}
