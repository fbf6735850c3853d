use crate::parser::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(syntax: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

pub mod support {
    use crate::ast::AstNode;
    use crate::parser::{SyntaxNode, SyntaxToken};
    use crate::syntax_kind::SyntaxKind;

    pub fn child<N: AstNode>(node: &SyntaxNode) -> Option<N> {
        node.children().find_map(N::cast)
    }

    pub fn children<'a, N: AstNode + 'a>(node: &'a SyntaxNode) -> impl Iterator<Item = N> + 'a {
        node.children().filter_map(N::cast)
    }

    pub fn token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
        node.children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|tok| tok.kind() == kind)
    }
}

macro_rules! ast_node {
    ($name:ident, $($kind:ident)|+) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                matches!(kind, $(SyntaxKind::$kind)|+)
            }

            fn cast(syntax: SyntaxNode) -> Option<Self> {
                Self::can_cast(syntax.kind()).then_some(Self { syntax })
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    };
}

ast_node!(CompilationUnit, CompilationUnit);
ast_node!(PackageDeclaration, PackageDeclaration);
ast_node!(ImportDeclaration, ImportDeclaration);
ast_node!(Name, Name);
ast_node!(FieldDeclaration, FieldDeclaration);
ast_node!(ExpressionStatement, ExpressionStatement);
ast_node!(ElseClause, ElseClause);

impl CompilationUnit {
    pub fn package(&self) -> Option<PackageDeclaration> {
        support::child(self.syntax())
    }

    pub fn imports(&self) -> impl Iterator<Item = ImportDeclaration> + '_ {
        support::children(self.syntax())
    }

    /// Fields of every class declared in this unit, nested classes included.
    pub fn fields(&self) -> impl Iterator<Item = FieldDeclaration> + '_ {
        self.syntax().descendants().filter_map(FieldDeclaration::cast)
    }
}

impl ImportDeclaration {
    pub fn name(&self) -> Option<Name> {
        support::child(self.syntax())
    }

    pub fn is_static(&self) -> bool {
        support::token(self.syntax(), SyntaxKind::StaticKw).is_some()
    }
}

impl Name {
    pub fn text(&self) -> String {
        let mut out = String::new();
        for tok in self
            .syntax()
            .children_with_tokens()
            .filter_map(|el| el.into_token())
            .filter(|tok| !tok.kind().is_trivia())
        {
            out.push_str(tok.text());
        }
        out
    }

    /// A name made only of missing tokens.
    pub fn is_missing(&self) -> bool {
        crate::navigation::first_token(self.syntax(), false).is_none()
    }
}

impl FieldDeclaration {
    pub fn semicolon(&self) -> Option<SyntaxToken> {
        support::token(self.syntax(), SyntaxKind::Semicolon)
    }
}

/// Any statement node, blocks included.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Statement {
    syntax: SyntaxNode,
}

impl AstNode for Statement {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind.is_statement()
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        Self::can_cast(syntax.kind()).then_some(Self { syntax })
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl Statement {
    pub fn kind(&self) -> SyntaxKind {
        self.syntax.kind()
    }

    /// `if`, `else`, loops and labeled statements: statements that end in another statement.
    pub fn is_embedded_statement_owner(&self) -> bool {
        is_embedded_statement_owner(self.kind())
    }

    /// The statement this one ends with: the `else` branch when there is one, otherwise the
    /// body. `None` for non-owners and for owners whose body is absent.
    pub fn embedded_statement(&self) -> Option<Statement> {
        if !self.is_embedded_statement_owner() {
            return None;
        }
        if self.kind() == SyntaxKind::IfStatement {
            if let Some(else_clause) = support::child::<ElseClause>(&self.syntax) {
                return else_clause.statement();
            }
        }
        support::child(&self.syntax)
    }

    pub fn as_expression_statement(&self) -> Option<ExpressionStatement> {
        ExpressionStatement::cast(self.syntax.clone())
    }

    /// True when the statement holds no real token, e.g. the placeholder the parser builds
    /// for a missing `if` body.
    pub fn is_empty(&self) -> bool {
        !self
            .syntax
            .descendants_with_tokens()
            .filter_map(|el| el.into_token())
            .any(|tok| !tok.kind().is_trivia() && !tok.text_range().is_empty())
    }
}

impl ExpressionStatement {
    pub fn expression(&self) -> Option<SyntaxNode> {
        self.syntax().first_child()
    }
}

impl ElseClause {
    pub fn statement(&self) -> Option<Statement> {
        support::child(self.syntax())
    }
}

pub fn is_embedded_statement_owner(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::IfStatement
            | SyntaxKind::WhileStatement
            | SyntaxKind::ForStatement
            | SyntaxKind::DoWhileStatement
            | SyntaxKind::LabeledStatement
    )
}
