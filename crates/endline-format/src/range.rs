use endline_syntax::navigation::first_token;
use endline_syntax::{AstNode, Statement, SyntaxKind, SyntaxNode, SyntaxToken};

fn is_format_unit(kind: SyntaxKind) -> bool {
    (kind.is_statement() && kind != SyntaxKind::Block)
        || kind.is_member_declaration()
        || matches!(
            kind,
            SyntaxKind::ImportDeclaration | SyntaxKind::PackageDeclaration
        )
}

/// The tokens bounding the construct that ends with `end_token`.
///
/// The construct is the nearest enclosing statement, member, import or package
/// declaration. A trailing embedded statement that starts on the same line as its owner
/// (`if (x) foo();`) is widened to the owner. Blocks are skipped, so the enclosing block
/// itself is never returned.
pub fn find_appropriate_range(end_token: &SyntaxToken) -> Option<(SyntaxToken, SyntaxToken)> {
    let mut node = end_token
        .parent_ancestors()
        .find(|n| is_format_unit(n.kind()))?;

    while let Some(owner) = same_line_owner(&node) {
        node = owner;
    }

    let start = first_token(&node, false)?;
    Some((start, end_token.clone()))
}

/// The statement owning `node` as its trailing embedded statement, if it starts on the same
/// line.
fn same_line_owner(node: &SyntaxNode) -> Option<SyntaxNode> {
    let mut parent = node.parent()?;
    if parent.kind() == SyntaxKind::ElseClause {
        parent = parent.parent()?;
    }
    let owner = Statement::cast(parent)?;
    let embedded = owner.embedded_statement()?;
    if embedded.syntax() != node {
        return None;
    }

    let owner_start = first_token(owner.syntax(), false)?.text_range().start();
    let node_start = first_token(node, false)?.text_range().start();
    let owner_text = owner.syntax().text().to_string();
    let base = owner.syntax().text_range().start();
    let between = owner_text.get(
        usize::from(owner_start - base)..usize::from(node_start - base),
    )?;
    if between.contains(|c: char| c == '\n' || c == '\r') {
        return None;
    }
    Some(owner.syntax().clone())
}
