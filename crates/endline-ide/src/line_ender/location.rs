use endline_core::{slice, LineIndex, TextRange};
use endline_syntax::navigation::{first_token, previous_token};
use endline_syntax::{AstNode, SyntaxKind, SyntaxNode, SyntaxToken, TextSize};

use super::last_token::located_at_end_of_line;
use super::{OwningUnit, Veto};

/// Checks that inserting a terminator after `last` is reasonable for where the caret is.
pub fn validate_location(
    text: &str,
    index: &LineIndex,
    position: TextSize,
    unit: &OwningUnit,
    last: &SyntaxToken,
) -> Result<(), Veto> {
    let line = index.line_of(position);
    let line_end = index.line_end(line).unwrap_or_else(|| index.text_len());

    if position == line_end && is_multi_line_member_chain(index, unit) {
        return Err(Veto::ExpressionStatementAtLineEnd);
    }

    if !located_at_end_of_line(index, line, last) {
        let start = last.text_range().end().min(line_end);
        let trailing = slice(text, TextRange::new(start, line_end)).unwrap_or_default();
        if !trailing.trim().is_empty() {
            return Err(Veto::TrailingContent);
        }
    }

    if let OwningUnit::Import(import) = unit {
        if import.name().map_or(true, |name| name.is_missing()) {
            return Err(Veto::EmptyImport);
        }
    }

    if let Some(previous) = previous_token(last) {
        let open = match previous.kind() {
            SyntaxKind::StringLiteral => !is_closed_literal(previous.text(), '"'),
            SyntaxKind::CharLiteral => !is_closed_literal(previous.text(), '\''),
            _ => false,
        };
        if open {
            return Err(Veto::UnterminatedLiteral);
        }
    }

    if let OwningUnit::Statement(statement) = unit {
        if statement.is_embedded_statement_owner()
            && statement
                .embedded_statement()
                .map_or(true, |embedded| embedded.is_empty())
        {
            return Err(Veto::EmptyEmbeddedStatement);
        }
    }

    Ok(())
}

/// `"abc"` is closed, `"abc` and `"abc\"` are not.
fn is_closed_literal(text: &str, quote: char) -> bool {
    if text.len() < 2 || !text.ends_with(quote) {
        return false;
    }
    let body = &text[..text.len() - quote.len_utf8()];
    let escapes = body.chars().rev().take_while(|c| *c == '\\').count();
    escapes % 2 == 0
}

/// An expression statement made of a qualified call or field access that already continues
/// over more than one line, as in a builder chain where the next line may start with `.`.
fn is_multi_line_member_chain(index: &LineIndex, unit: &OwningUnit) -> bool {
    let OwningUnit::Statement(statement) = unit else {
        return false;
    };
    let Some(expression) = statement
        .as_expression_statement()
        .and_then(|stmt| stmt.expression())
    else {
        return false;
    };
    if !is_member_chain(&expression) {
        return false;
    }

    let (Some(first), Some(last)) = (
        first_token(&expression, false),
        endline_syntax::navigation::last_token(&expression, false),
    ) else {
        return false;
    };
    index.line_of(first.text_range().start()) != index.line_of(last.text_range().end())
}

fn is_member_chain(expression: &SyntaxNode) -> bool {
    match expression.kind() {
        SyntaxKind::FieldAccessExpression => true,
        SyntaxKind::MethodCallExpression => expression.first_child().map_or(false, |callee| {
            match callee.kind() {
                SyntaxKind::FieldAccessExpression => true,
                SyntaxKind::NameExpression => callee
                    .children_with_tokens()
                    .any(|el| el.kind() == SyntaxKind::Dot),
                _ => false,
            }
        }),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_closing_quotes() {
        assert!(is_closed_literal("\"abc\"", '"'));
        assert!(is_closed_literal("\"\"", '"'));
        assert!(is_closed_literal("\"a\\\\\"", '"'));
        assert!(!is_closed_literal("\"abc", '"'));
        assert!(!is_closed_literal("\"", '"'));
        assert!(!is_closed_literal("\"abc\\\"", '"'));
        assert!(is_closed_literal("'x'", '\''));
        assert!(!is_closed_literal("'x", '\''));
        assert!(!is_closed_literal("'\\'", '\''));
    }
}
