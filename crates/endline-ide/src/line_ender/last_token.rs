use endline_core::LineIndex;
use endline_syntax::navigation::last_token;
use endline_syntax::{SyntaxKind, SyntaxToken, SyntaxTokenExt, TextSize};

use super::{NotApplicable, OwningUnit};

/// The unit's last token, missing ones included, if a terminator may follow it.
///
/// The token has to sit on the caret's line. A missing token placed at the very end of that
/// line (line break included) also counts: that is where the parser puts a `;` it expected
/// after the line's last token.
pub fn resolve_terminal_token(
    index: &LineIndex,
    position: TextSize,
    unit: &OwningUnit,
) -> Result<SyntaxToken, NotApplicable> {
    let last = last_token(unit.syntax(), true).ok_or(NotApplicable::NoOwningUnit)?;

    if last.kind() == SyntaxKind::RBrace {
        return Err(NotApplicable::ClosingBrace);
    }

    let line = index.line_of(position);
    if !located_at_end_of_line(index, line, &last)
        && index.line_of(last.text_range().end()) != line
    {
        return Err(NotApplicable::NotOnCaretLine);
    }

    if !last.is_missing() && last.kind() == SyntaxKind::Semicolon {
        return Err(NotApplicable::AlreadyTerminated);
    }

    Ok(last)
}

pub(crate) fn located_at_end_of_line(index: &LineIndex, line: u32, token: &SyntaxToken) -> bool {
    token.is_missing() && index.line_end_including_break(line) == Some(token.text_range().end())
}
