use endline_syntax::navigation::find_token_from_end;
use endline_syntax::{
    AstNode, FieldDeclaration, ImportDeclaration, Statement, SyntaxKind, SyntaxNode, TextSize,
};

/// The construct a terminator would close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwningUnit {
    Statement(Statement),
    Field(FieldDeclaration),
    Import(ImportDeclaration),
}

impl OwningUnit {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        if let Some(field) = FieldDeclaration::cast(node.clone()) {
            return Some(Self::Field(field));
        }
        if let Some(import) = ImportDeclaration::cast(node.clone()) {
            return Some(Self::Import(import));
        }
        Statement::cast(node).map(Self::Statement)
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Statement(it) => it.syntax(),
            Self::Field(it) => it.syntax(),
            Self::Import(it) => it.syntax(),
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.syntax().kind()
    }
}

/// The innermost statement, field or import around the token ending at or before
/// `position`.
pub fn find_owning_unit(root: &SyntaxNode, position: TextSize) -> Option<OwningUnit> {
    let token = find_token_from_end(root, position)?;
    token.parent_ancestors().find_map(OwningUnit::cast)
}
