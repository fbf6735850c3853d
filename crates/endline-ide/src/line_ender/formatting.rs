use endline_core::{TextEdit, TextRange, TextSize};
use endline_format::{edits_for_range_formatting, find_appropriate_range, FormatConfig};
use endline_syntax::navigation::token_ending_at;
use endline_syntax::{JavaParseResult, SyntaxTokenExt};
use tokio_util::sync::CancellationToken;

use super::{Abstain, NotApplicable};
use crate::document::Document;

/// Re-formats the construct ending right before `position` (the end of the inserted
/// terminator) and applies the edits in one change. Returns the number of edits applied.
pub async fn apply_formatting(
    document: &dyn Document,
    position: TextSize,
    config: &FormatConfig,
    cancel: &CancellationToken,
) -> Result<usize, Abstain> {
    let parse = document.syntax_tree(cancel).await?;
    let text = document.text(cancel).await?;
    let edits = formatting_edits(&parse, &text, position, config)?;

    if cancel.is_cancelled() {
        return Err(Abstain::Cancelled);
    }
    if edits.is_empty() {
        return Ok(0);
    }

    document.apply_text_edits(&edits).map_err(|err| {
        tracing::warn!(target = "endline.ide", error = %err, "formatting edits were rejected");
        NotApplicable::FormattingSkipped
    })?;
    Ok(edits.len())
}

fn formatting_edits(
    parse: &JavaParseResult,
    text: &str,
    position: TextSize,
    config: &FormatConfig,
) -> Result<Vec<TextEdit>, NotApplicable> {
    let root = parse.syntax();
    let end = token_ending_at(&root, position)
        .filter(|token| !token.is_missing())
        .ok_or(NotApplicable::FormattingSkipped)?;
    let (start, end) = find_appropriate_range(&end).ok_or(NotApplicable::FormattingSkipped)?;
    if start.is_missing() {
        return Err(NotApplicable::FormattingSkipped);
    }

    let range = TextRange::new(start.text_range().start(), end.text_range().end());
    edits_for_range_formatting(&root, text, range, config).map_err(|err| {
        tracing::warn!(target = "endline.ide", error = %err, "range formatting failed");
        NotApplicable::FormattingSkipped
    })
}
