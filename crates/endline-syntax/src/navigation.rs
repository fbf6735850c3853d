//! Token lookups over a rowan tree.
//!
//! "Significant" tokens are the non-trivia tokens with a non-empty range. Missing tokens
//! (zero-width placeholders inserted by the parser) are only returned by the helpers that
//! say so.

use text_size::{TextRange, TextSize};

use crate::parser::{SyntaxNode, SyntaxToken};

pub trait SyntaxTokenExt {
    /// A zero-width token the parser inserted where the source lacks one.
    fn is_missing(&self) -> bool;

    fn is_significant(&self) -> bool;
}

impl SyntaxTokenExt for SyntaxToken {
    fn is_missing(&self) -> bool {
        self.text_range().is_empty()
    }

    fn is_significant(&self) -> bool {
        !self.kind().is_trivia() && !self.is_missing()
    }
}

fn tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> {
    node.descendants_with_tokens().filter_map(|el| el.into_token())
}

/// The token at `offset`, looking left first.
///
/// Returns the token whose range strictly contains `offset`, otherwise the last token
/// ending at or before `offset`, otherwise the first token after it.
pub fn find_token_from_end(root: &SyntaxNode, offset: TextSize) -> Option<SyntaxToken> {
    if offset > root.text_range().end() {
        return None;
    }

    let mut before = None;
    for token in tokens(root).filter(SyntaxTokenExt::is_significant) {
        let range = token.text_range();
        if range.start() < offset && offset < range.end() {
            return Some(token);
        }
        if range.end() <= offset {
            before = Some(token);
        } else {
            return before.or(Some(token));
        }
    }
    before
}

/// Last non-trivia token, missing ones included, ending exactly at `offset`.
pub fn token_ending_at(root: &SyntaxNode, offset: TextSize) -> Option<SyntaxToken> {
    tokens(root)
        .filter(|tok| !tok.kind().is_trivia() && tok.text_range().end() == offset)
        .last()
}

pub fn first_token(node: &SyntaxNode, include_zero_width: bool) -> Option<SyntaxToken> {
    tokens(node).find(|tok| {
        !tok.kind().is_trivia() && (include_zero_width || !tok.is_missing())
    })
}

pub fn last_token(node: &SyntaxNode, include_zero_width: bool) -> Option<SyntaxToken> {
    tokens(node)
        .filter(|tok| !tok.kind().is_trivia() && (include_zero_width || !tok.is_missing()))
        .last()
}

/// The closest significant token before `token`.
pub fn previous_token(token: &SyntaxToken) -> Option<SyntaxToken> {
    let mut cur = token.prev_token();
    while let Some(tok) = cur {
        if tok.is_significant() {
            return Some(tok);
        }
        cur = tok.prev_token();
    }
    None
}

/// The node's span without leading and trailing trivia.
pub fn significant_range(node: &SyntaxNode) -> Option<TextRange> {
    let first = first_token(node, false)?;
    let last = last_token(node, false)?;
    Some(TextRange::new(
        first.text_range().start(),
        last.text_range().end(),
    ))
}
