use std::collections::VecDeque;

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder};
#[cfg(test)]
use rowan::NodeOrToken;
use text_size::TextSize;

use crate::lexer::{lex_with_errors, Token};
use crate::syntax_kind::{JavaLanguage, SyntaxKind};
use crate::{ParseError, TextRange};

pub type SyntaxNode = rowan::SyntaxNode<JavaLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<JavaLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<JavaLanguage>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaParseResult {
    pub green: GreenNode,
    pub errors: Vec<ParseError>,
}

impl JavaParseResult {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }
}

/// Parse a full compilation unit.
pub fn parse_java(input: &str) -> JavaParseResult {
    Parser::new(input).parse_compilation_unit()
}

/// Parse exactly one statement. The root node is a `StatementFragment`.
pub fn parse_java_statement(input: &str) -> JavaParseResult {
    Parser::new(input).parse_statement_fragment()
}

/// Summary of the outermost node produced by `parse_expression`.
#[derive(Debug, Clone, Copy)]
struct Expr {
    kind: SyntaxKind,
    op: Option<SyntaxKind>,
}

impl Expr {
    const ERROR: Expr = Expr {
        kind: SyntaxKind::Error,
        op: None,
    };

    fn new(kind: SyntaxKind) -> Self {
        Self { kind, op: None }
    }

    /// Java "statement expressions": the only expressions allowed as a statement.
    fn is_statement_expression(self) -> bool {
        match self.kind {
            SyntaxKind::AssignmentExpression
            | SyntaxKind::MethodCallExpression
            | SyntaxKind::NewExpression
            | SyntaxKind::PostfixExpression => true,
            SyntaxKind::UnaryExpression => matches!(
                self.op,
                Some(SyntaxKind::PlusPlus | SyntaxKind::MinusMinus)
            ),
            _ => false,
        }
    }
}

struct Parser<'a> {
    input: &'a str,
    tokens: VecDeque<Token>,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
    /// The trivia following the last real token has been consumed through a line break.
    line_broken: bool,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        let (tokens, lex_errors) = lex_with_errors(input);
        let errors = lex_errors
            .into_iter()
            .map(|err| ParseError {
                message: err.message,
                range: err.range,
            })
            .collect();
        Self {
            input,
            tokens: VecDeque::from(tokens),
            builder: GreenNodeBuilder::new(),
            errors,
            line_broken: false,
        }
    }

    fn parse_compilation_unit(mut self) -> JavaParseResult {
        self.builder.start_node(SyntaxKind::CompilationUnit.into());

        loop {
            match self.current() {
                SyntaxKind::Eof => break,
                SyntaxKind::PackageKw => self.parse_package_decl(),
                SyntaxKind::ImportKw => self.parse_import_decl(),
                _ if self.at_type_decl_start() => self.parse_type_declaration(),
                _ => self.recover_top_level(),
            }
        }

        self.eat_trivia();
        self.builder.finish_node();
        self.finish()
    }

    fn parse_statement_fragment(mut self) -> JavaParseResult {
        self.builder.start_node(SyntaxKind::StatementFragment.into());

        if self.at(SyntaxKind::Eof) {
            self.error_here("expected statement");
        } else {
            self.parse_statement();
        }

        self.eat_trivia();
        if !self.at(SyntaxKind::Eof) {
            self.builder.start_node(SyntaxKind::Error.into());
            self.error_here("unexpected tokens after statement");
            while !self.tokens.is_empty() {
                self.bump_any();
            }
            self.builder.finish_node();
        }

        self.builder.finish_node();
        self.finish()
    }

    fn finish(self) -> JavaParseResult {
        let mut errors = self.errors;
        errors.sort_by_key(|err| (err.range.start(), err.range.end()));
        JavaParseResult {
            green: self.builder.finish(),
            errors,
        }
    }

    fn parse_package_decl(&mut self) {
        self.eat_trivia();
        self.builder
            .start_node(SyntaxKind::PackageDeclaration.into());
        self.expect(SyntaxKind::PackageKw, "expected `package`");
        self.parse_name();
        self.expect(SyntaxKind::Semicolon, "expected `;` after package declaration");
        self.builder.finish_node();
    }

    fn parse_import_decl(&mut self) {
        self.eat_trivia();
        self.builder
            .start_node(SyntaxKind::ImportDeclaration.into());
        self.expect(SyntaxKind::ImportKw, "expected `import`");
        if self.at(SyntaxKind::StaticKw) {
            self.bump();
        }
        self.parse_name();
        self.expect(SyntaxKind::Semicolon, "expected `;` after import declaration");
        self.builder.finish_node();
    }

    fn parse_type_declaration(&mut self) {
        self.eat_trivia();
        let checkpoint = self.builder.checkpoint();
        self.parse_modifiers();
        self.parse_type_declaration_inner(checkpoint);
    }

    fn parse_type_declaration_inner(&mut self, checkpoint: Checkpoint) {
        match self.current() {
            SyntaxKind::ClassKw => self.parse_class_decl(
                checkpoint,
                SyntaxKind::ClassDeclaration,
                SyntaxKind::ClassBody,
            ),
            SyntaxKind::InterfaceKw => self.parse_class_decl(
                checkpoint,
                SyntaxKind::InterfaceDeclaration,
                SyntaxKind::InterfaceBody,
            ),
            SyntaxKind::EnumKw => self.parse_enum_decl(checkpoint),
            SyntaxKind::Semicolon => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::EmptyDeclaration.into());
                self.bump();
                self.builder.finish_node();
            }
            _ => {
                self.builder.start_node_at(checkpoint, SyntaxKind::Error.into());
                self.error_here("expected type declaration");
                if !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
                    self.bump();
                }
                self.recover_to_class_member_boundary();
                self.builder.finish_node();
            }
        }
    }

    fn parse_class_decl(&mut self, checkpoint: Checkpoint, decl_kind: SyntaxKind, body_kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, decl_kind.into());
        self.bump(); // class / interface
        self.expect_ident_like("expected type name");
        if self.at(SyntaxKind::Less) {
            self.parse_type_parameters();
        }
        if self.at(SyntaxKind::ExtendsKw) {
            self.builder.start_node(SyntaxKind::ExtendsClause.into());
            self.bump();
            self.parse_type_list();
            self.builder.finish_node();
        }
        if self.at(SyntaxKind::ImplementsKw) {
            self.builder.start_node(SyntaxKind::ImplementsClause.into());
            self.bump();
            self.parse_type_list();
            self.builder.finish_node();
        }
        self.parse_class_body(body_kind);
        self.builder.finish_node();
    }

    fn parse_enum_decl(&mut self, checkpoint: Checkpoint) {
        self.builder
            .start_node_at(checkpoint, SyntaxKind::EnumDeclaration.into());
        self.bump(); // enum
        self.expect_ident_like("expected enum name");
        if self.at(SyntaxKind::ImplementsKw) {
            self.builder.start_node(SyntaxKind::ImplementsClause.into());
            self.bump();
            self.parse_type_list();
            self.builder.finish_node();
        }

        self.builder.start_node(SyntaxKind::EnumBody.into());
        self.expect(SyntaxKind::LBrace, "expected `{`");
        while self.at_ident_like() || self.at(SyntaxKind::At) {
            self.eat_trivia();
            self.builder.start_node(SyntaxKind::EnumConstant.into());
            self.parse_modifiers();
            self.expect_ident_like("expected enum constant");
            if self.at(SyntaxKind::LParen) {
                self.parse_argument_list();
            }
            if self.at(SyntaxKind::LBrace) {
                self.parse_class_body(SyntaxKind::ClassBody);
            }
            self.builder.finish_node();
            if !self.at(SyntaxKind::Comma) {
                break;
            }
            self.bump();
        }
        if self.at(SyntaxKind::Semicolon) {
            self.bump();
            while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
                self.parse_class_member();
            }
        }
        self.expect(SyntaxKind::RBrace, "expected `}`");
        self.builder.finish_node(); // EnumBody
        self.builder.finish_node();
    }

    fn parse_type_list(&mut self) {
        self.parse_type();
        while self.at(SyntaxKind::Comma) {
            self.bump();
            self.parse_type();
        }
    }

    /// `<T extends Bound, U>`; bounds are kept as raw tokens.
    fn parse_type_parameters(&mut self) {
        self.builder.start_node(SyntaxKind::TypeParameters.into());
        let mut depth = 0i32;
        loop {
            match self.current() {
                SyntaxKind::Less => depth += 1,
                SyntaxKind::Greater => depth -= 1,
                SyntaxKind::RightShift => depth -= 2,
                SyntaxKind::UnsignedRightShift => depth -= 3,
                SyntaxKind::Eof | SyntaxKind::LBrace | SyntaxKind::Semicolon => {
                    self.error_here("expected `>`");
                    break;
                }
                _ => {}
            }
            self.bump();
            if depth <= 0 {
                break;
            }
        }
        self.builder.finish_node();
    }

    fn parse_class_body(&mut self, body_kind: SyntaxKind) {
        self.builder.start_node(body_kind.into());
        self.expect(SyntaxKind::LBrace, "expected `{`");
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            self.parse_class_member();
        }
        self.expect(SyntaxKind::RBrace, "expected `}`");
        self.builder.finish_node();
    }

    fn parse_class_member(&mut self) {
        self.eat_trivia();
        let checkpoint = self.builder.checkpoint();
        self.parse_modifiers();

        // Initializer blocks.
        if self.at(SyntaxKind::LBrace) {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::InitializerBlock.into());
            self.parse_block();
            self.builder.finish_node();
            return;
        }

        if self.at(SyntaxKind::Semicolon) {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::EmptyDeclaration.into());
            self.bump();
            self.builder.finish_node();
            return;
        }

        if matches!(
            self.current(),
            SyntaxKind::ClassKw | SyntaxKind::InterfaceKw | SyntaxKind::EnumKw
        ) {
            self.parse_type_declaration_inner(checkpoint);
            return;
        }

        if self.at(SyntaxKind::Less) {
            self.parse_type_parameters();
        }

        // Constructor: Ident '('
        if self.at_ident_like() && self.nth(1) == Some(SyntaxKind::LParen) {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::ConstructorDeclaration.into());
            self.bump(); // name
            self.parse_parameter_list();
            self.parse_throws_opt();
            self.parse_block();
            self.builder.finish_node();
            return;
        }

        if self.at(SyntaxKind::VoidKw) {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::MethodDeclaration.into());
            self.bump();
            self.parse_method_rest();
            self.builder.finish_node();
            return;
        }

        if self.at_type_start() {
            self.parse_type();
            if !self.at_ident_like() {
                self.builder.start_node_at(checkpoint, SyntaxKind::Error.into());
                self.error_here("expected member name");
                self.recover_to_class_member_boundary();
                self.builder.finish_node();
                return;
            }

            // After type + identifier: method if '(' follows, else field.
            if self.nth(1) == Some(SyntaxKind::LParen) {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::MethodDeclaration.into());
                self.parse_method_rest();
                self.builder.finish_node();
            } else {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::FieldDeclaration.into());
                self.parse_variable_declarator_list();
                self.expect(SyntaxKind::Semicolon, "expected `;` after field declaration");
                self.builder.finish_node();
            }
            return;
        }

        self.builder.start_node_at(checkpoint, SyntaxKind::Error.into());
        self.error_here("unexpected token in class body");
        self.recover_to_class_member_boundary();
        self.builder.finish_node();
    }

    /// Method name, parameters, throws clause and body (or `;`).
    fn parse_method_rest(&mut self) {
        self.expect_ident_like("expected method name");
        self.parse_parameter_list();
        while self.at(SyntaxKind::LBracket) && self.nth(1) == Some(SyntaxKind::RBracket) {
            self.bump();
            self.bump();
        }
        self.parse_throws_opt();
        if self.at(SyntaxKind::DefaultKw) {
            self.bump();
            self.parse_expression(0);
        }
        if self.at(SyntaxKind::LBrace) {
            self.parse_block();
        } else {
            self.expect(SyntaxKind::Semicolon, "expected `;` or method body");
        }
    }

    fn parse_throws_opt(&mut self) {
        if !self.at(SyntaxKind::ThrowsKw) {
            return;
        }
        self.builder.start_node(SyntaxKind::ThrowsClause.into());
        self.bump();
        self.parse_type_list();
        self.builder.finish_node();
    }

    fn parse_modifiers(&mut self) {
        self.builder.start_node(SyntaxKind::Modifiers.into());
        loop {
            if self.at(SyntaxKind::At) {
                if self.nth(1) == Some(SyntaxKind::InterfaceKw) {
                    break;
                }
                self.parse_annotation();
                continue;
            }
            match self.current() {
                SyntaxKind::PublicKw
                | SyntaxKind::PrivateKw
                | SyntaxKind::ProtectedKw
                | SyntaxKind::StaticKw
                | SyntaxKind::AbstractKw
                | SyntaxKind::FinalKw
                | SyntaxKind::NativeKw
                | SyntaxKind::SynchronizedKw
                | SyntaxKind::TransientKw
                | SyntaxKind::VolatileKw
                | SyntaxKind::StrictfpKw
                | SyntaxKind::DefaultKw => {
                    self.bump();
                }
                _ => break,
            }
        }
        self.builder.finish_node();
    }

    fn parse_annotation(&mut self) {
        self.builder.start_node(SyntaxKind::Annotation.into());
        self.expect(SyntaxKind::At, "expected `@`");
        self.parse_name();
        if self.at(SyntaxKind::LParen) {
            self.parse_argument_list();
        }
        self.builder.finish_node();
    }

    fn parse_name(&mut self) {
        self.builder.start_node(SyntaxKind::Name.into());
        self.expect_ident_like("expected name");
        while self.at(SyntaxKind::Dot) {
            self.bump(); // .
            if self.at(SyntaxKind::Star) {
                self.bump();
                break;
            }
            self.expect_ident_like("expected name segment");
        }
        self.builder.finish_node();
    }

    fn parse_parameter_list(&mut self) {
        self.builder.start_node(SyntaxKind::ParameterList.into());
        self.expect(SyntaxKind::LParen, "expected `(`");
        while !self.at(SyntaxKind::RParen) && !self.at(SyntaxKind::Eof) {
            self.eat_trivia();
            self.builder.start_node(SyntaxKind::Parameter.into());
            self.parse_modifiers();
            if self.at_type_start() {
                self.parse_type();
            } else {
                self.error_here("expected parameter type");
            }
            if self.at(SyntaxKind::Ellipsis) {
                self.bump();
            }
            self.expect_ident_like("expected parameter name");
            self.builder.finish_node();

            if self.at(SyntaxKind::Comma) {
                self.bump();
                continue;
            }
            break;
        }
        self.expect(SyntaxKind::RParen, "expected `)`");
        self.builder.finish_node();
    }

    fn parse_argument_list(&mut self) {
        self.builder.start_node(SyntaxKind::ArgumentList.into());
        self.expect(SyntaxKind::LParen, "expected `(`");
        while !self.at(SyntaxKind::RParen) && !self.at(SyntaxKind::Eof) {
            self.parse_expression(0);
            if self.at(SyntaxKind::Comma) {
                self.bump();
                continue;
            }
            break;
        }
        self.expect(SyntaxKind::RParen, "expected `)`");
        self.builder.finish_node();
    }

    fn parse_block(&mut self) {
        self.builder.start_node(SyntaxKind::Block.into());
        self.expect(SyntaxKind::LBrace, "expected `{`");
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            self.parse_statement();
        }
        self.expect(SyntaxKind::RBrace, "expected `}`");
        self.builder.finish_node();
    }

    /// A statement nested in `if`/`else`/loops/labels.
    ///
    /// When no statement can start here, an expression statement made only of missing
    /// tokens stands in for it.
    fn parse_embedded_statement(&mut self) {
        if can_start_statement(self.current()) {
            self.parse_statement();
            return;
        }
        self.builder
            .start_node(SyntaxKind::ExpressionStatement.into());
        self.builder.start_node(SyntaxKind::NameExpression.into());
        self.missing(SyntaxKind::Identifier, "expected statement");
        self.builder.finish_node();
        self.missing_silent(SyntaxKind::Semicolon);
        self.builder.finish_node();
    }

    fn parse_statement(&mut self) {
        if !can_start_statement(self.current()) {
            self.eat_trivia();
            self.builder.start_node(SyntaxKind::Error.into());
            self.error_here("expected statement");
            self.bump_any();
            self.builder.finish_node();
            return;
        }

        self.eat_trivia();
        let checkpoint = self.builder.checkpoint();
        if self.at_ident_like() && self.nth(1) == Some(SyntaxKind::Colon) {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::LabeledStatement.into());
            self.bump(); // label
            self.bump(); // :
            self.parse_embedded_statement();
            self.builder.finish_node();
            return;
        }
        match self.current() {
            SyntaxKind::LBrace => self.parse_block(),
            SyntaxKind::IfKw => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::IfStatement.into());
                self.bump();
                self.parse_parenthesized_condition("if");
                self.parse_embedded_statement();
                if self.at(SyntaxKind::ElseKw) {
                    self.eat_trivia();
                    self.builder.start_node(SyntaxKind::ElseClause.into());
                    self.bump();
                    self.parse_embedded_statement();
                    self.builder.finish_node();
                }
                self.builder.finish_node();
            }
            SyntaxKind::SwitchKw => self.parse_switch_statement(checkpoint),
            SyntaxKind::ForKw => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::ForStatement.into());
                self.bump();
                self.builder.start_node(SyntaxKind::ForHeader.into());
                self.expect(SyntaxKind::LParen, "expected `(` after for");
                self.parse_for_header_contents();
                self.expect(SyntaxKind::RParen, "expected `)` after for header");
                self.builder.finish_node(); // ForHeader
                self.parse_embedded_statement();
                self.builder.finish_node();
            }
            SyntaxKind::WhileKw => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::WhileStatement.into());
                self.bump();
                self.parse_parenthesized_condition("while");
                self.parse_embedded_statement();
                self.builder.finish_node();
            }
            SyntaxKind::DoKw => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::DoWhileStatement.into());
                self.bump();
                self.parse_embedded_statement();
                self.expect(SyntaxKind::WhileKw, "expected `while` after `do` body");
                self.parse_parenthesized_condition("while");
                self.expect(SyntaxKind::Semicolon, "expected `;` after do-while");
                self.builder.finish_node();
            }
            SyntaxKind::SynchronizedKw => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::SynchronizedStatement.into());
                self.bump();
                self.parse_parenthesized_condition("synchronized");
                self.parse_block();
                self.builder.finish_node();
            }
            SyntaxKind::TryKw => self.parse_try_statement(checkpoint),
            SyntaxKind::AssertKw => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::AssertStatement.into());
                self.bump();
                self.parse_expression(0);
                if self.at(SyntaxKind::Colon) {
                    self.bump();
                    self.parse_expression(0);
                }
                self.expect(SyntaxKind::Semicolon, "expected `;` after assert");
                self.builder.finish_node();
            }
            SyntaxKind::ReturnKw => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::ReturnStatement.into());
                self.bump();
                if can_start_expression(self.current()) {
                    self.parse_expression(0);
                }
                self.expect(SyntaxKind::Semicolon, "expected `;` after return");
                self.builder.finish_node();
            }
            SyntaxKind::BreakKw | SyntaxKind::ContinueKw => {
                let kind = if self.at(SyntaxKind::BreakKw) {
                    SyntaxKind::BreakStatement
                } else {
                    SyntaxKind::ContinueStatement
                };
                self.builder.start_node_at(checkpoint, kind.into());
                self.bump();
                if self.at_ident_like() {
                    self.bump();
                }
                self.expect(SyntaxKind::Semicolon, "expected `;` after jump statement");
                self.builder.finish_node();
            }
            SyntaxKind::ThrowKw => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::ThrowStatement.into());
                self.bump();
                self.parse_expression(0);
                self.expect(SyntaxKind::Semicolon, "expected `;` after throw");
                self.builder.finish_node();
            }
            SyntaxKind::Semicolon => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::EmptyStatement.into());
                self.bump();
                self.builder.finish_node();
            }
            _ if self.at_local_type_decl_start() => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::LocalTypeDeclarationStatement.into());
                let inner = self.builder.checkpoint();
                self.parse_modifiers();
                self.parse_type_declaration_inner(inner);
                self.builder.finish_node();
            }
            _ if self.at_local_var_decl_start() => {
                self.builder.start_node_at(
                    checkpoint,
                    SyntaxKind::LocalVariableDeclarationStatement.into(),
                );
                self.parse_modifiers();
                self.parse_type();
                self.parse_variable_declarator_list();
                self.expect(
                    SyntaxKind::Semicolon,
                    "expected `;` after local variable declaration",
                );
                self.builder.finish_node();
            }
            _ => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::ExpressionStatement.into());
                let expr = self.parse_expression(0);
                if expr.kind != SyntaxKind::Error && !expr.is_statement_expression() {
                    let end = self.last_token_end();
                    self.errors.push(ParseError {
                        message: "not a statement".to_string(),
                        range: TextRange::new(self.node_start_hint(end), end),
                    });
                }
                self.expect(SyntaxKind::Semicolon, "expected `;` after expression");
                self.builder.finish_node();
            }
        }
    }

    fn parse_parenthesized_condition(&mut self, keyword: &str) {
        self.expect(SyntaxKind::LParen, &format!("expected `(` after {keyword}"));
        self.parse_expression(0);
        self.expect(SyntaxKind::RParen, "expected `)`");
    }

    fn parse_switch_statement(&mut self, checkpoint: Checkpoint) {
        self.builder
            .start_node_at(checkpoint, SyntaxKind::SwitchStatement.into());
        self.bump();
        self.parse_parenthesized_condition("switch");

        self.builder.start_node(SyntaxKind::SwitchBlock.into());
        self.expect(SyntaxKind::LBrace, "expected `{` after switch");
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            if self.at(SyntaxKind::CaseKw) || self.at(SyntaxKind::DefaultKw) {
                let is_arrow = self.parse_switch_label();
                if is_arrow {
                    if self.at(SyntaxKind::LBrace) {
                        self.parse_block();
                    } else {
                        self.parse_statement();
                    }
                }
            } else {
                self.parse_statement();
            }
        }
        self.expect(SyntaxKind::RBrace, "expected `}` after switch block");
        self.builder.finish_node(); // SwitchBlock
        self.builder.finish_node(); // SwitchStatement
    }

    fn parse_switch_label(&mut self) -> bool {
        self.eat_trivia();
        self.builder.start_node(SyntaxKind::SwitchLabel.into());
        let is_case = self.at(SyntaxKind::CaseKw);
        self.bump(); // case/default
        if is_case {
            self.parse_expression(0);
            while self.at(SyntaxKind::Comma) {
                self.bump();
                self.parse_expression(0);
            }
        }

        let is_arrow = if self.at(SyntaxKind::Arrow) {
            self.bump();
            true
        } else {
            self.expect(SyntaxKind::Colon, "expected `:` or `->` after switch label");
            false
        };

        self.builder.finish_node();
        is_arrow
    }

    fn parse_try_statement(&mut self, checkpoint: Checkpoint) {
        self.builder
            .start_node_at(checkpoint, SyntaxKind::TryStatement.into());
        self.bump(); // try
        if self.at(SyntaxKind::LParen) {
            self.parse_resource_specification();
        }
        self.parse_block();
        while self.at(SyntaxKind::CatchKw) {
            self.eat_trivia();
            self.builder.start_node(SyntaxKind::CatchClause.into());
            self.bump();
            self.expect(SyntaxKind::LParen, "expected `(` after catch");
            self.parse_modifiers();
            if self.at_type_start() {
                self.parse_type();
                while self.at(SyntaxKind::Pipe) {
                    self.bump();
                    self.parse_type();
                }
            }
            self.expect_ident_like("expected catch parameter name");
            self.expect(SyntaxKind::RParen, "expected `)` after catch parameter");
            self.parse_block();
            self.builder.finish_node();
        }
        if self.at(SyntaxKind::FinallyKw) {
            self.eat_trivia();
            self.builder.start_node(SyntaxKind::FinallyClause.into());
            self.bump();
            self.parse_block();
            self.builder.finish_node();
        }
        self.builder.finish_node();
    }

    fn parse_resource_specification(&mut self) {
        self.builder
            .start_node(SyntaxKind::ResourceSpecification.into());
        self.expect(SyntaxKind::LParen, "expected `(` after try");
        while !self.at(SyntaxKind::RParen) && !self.at(SyntaxKind::Eof) {
            self.eat_trivia();
            self.builder.start_node(SyntaxKind::Resource.into());
            if self.at_local_var_decl_start() {
                self.parse_modifiers();
                self.parse_type();
                self.parse_variable_declarator();
            } else {
                self.parse_expression(0);
            }
            self.builder.finish_node();

            if self.at(SyntaxKind::Semicolon) {
                self.bump();
                continue;
            }
            break;
        }
        self.expect(SyntaxKind::RParen, "expected `)` after resource specification");
        self.builder.finish_node();
    }

    fn parse_for_header_contents(&mut self) {
        if self.at_local_var_decl_start() {
            self.parse_modifiers();
            self.parse_type();
            self.parse_variable_declarator_list();

            if self.at(SyntaxKind::Colon) {
                // Enhanced for: `for (T x : expr)`.
                self.bump();
                self.parse_expression(0);
                return;
            }
        } else if !self.at(SyntaxKind::Semicolon) {
            self.parse_expression_list();
        }

        self.expect(SyntaxKind::Semicolon, "expected `;` in for header");
        if !self.at(SyntaxKind::Semicolon) {
            self.parse_expression(0);
        }
        self.expect(SyntaxKind::Semicolon, "expected `;` in for header");
        if !self.at(SyntaxKind::RParen) {
            self.parse_expression_list();
        }
    }

    fn parse_expression_list(&mut self) {
        self.parse_expression(0);
        while self.at(SyntaxKind::Comma) {
            self.bump();
            self.parse_expression(0);
        }
    }

    fn parse_variable_declarator_list(&mut self) {
        self.eat_trivia();
        self.builder
            .start_node(SyntaxKind::VariableDeclaratorList.into());
        self.parse_variable_declarator();
        while self.at(SyntaxKind::Comma) {
            self.bump();
            self.parse_variable_declarator();
        }
        self.builder.finish_node();
    }

    fn parse_variable_declarator(&mut self) {
        self.eat_trivia();
        self.builder
            .start_node(SyntaxKind::VariableDeclarator.into());
        self.expect_ident_like("expected variable name");
        while self.at(SyntaxKind::LBracket) && self.nth(1) == Some(SyntaxKind::RBracket) {
            self.bump();
            self.bump();
        }
        if self.at(SyntaxKind::Eq) {
            self.bump();
            self.parse_variable_initializer();
        }
        self.builder.finish_node();
    }

    fn parse_variable_initializer(&mut self) {
        if self.at(SyntaxKind::LBrace) {
            self.parse_array_initializer();
        } else {
            self.parse_expression(0);
        }
    }

    fn parse_array_initializer(&mut self) {
        self.eat_trivia();
        self.builder.start_node(SyntaxKind::ArrayInitializer.into());
        self.expect(SyntaxKind::LBrace, "expected `{`");
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            self.parse_variable_initializer();
            if self.at(SyntaxKind::Comma) {
                self.bump();
                continue;
            }
            break;
        }
        self.expect(SyntaxKind::RBrace, "expected `}`");
        self.builder.finish_node();
    }

    fn parse_type(&mut self) {
        self.eat_trivia();
        self.builder.start_node(SyntaxKind::Type.into());
        self.parse_type_without_dims();
        while self.at(SyntaxKind::LBracket) && self.nth(1) == Some(SyntaxKind::RBracket) {
            self.bump();
            self.bump();
        }
        self.builder.finish_node();
    }

    fn parse_type_without_dims(&mut self) {
        while self.at(SyntaxKind::At) {
            self.parse_annotation();
        }
        if self.at_primitive_type() {
            self.builder.start_node(SyntaxKind::PrimitiveType.into());
            self.bump();
            self.builder.finish_node();
        } else {
            self.builder.start_node(SyntaxKind::NamedType.into());
            self.expect_ident_like("expected type name");
            if self.at(SyntaxKind::Less) {
                self.parse_type_arguments();
            }
            while self.at(SyntaxKind::Dot) && self.nth(1).map_or(false, |k| k.is_identifier_like()) {
                self.bump();
                self.bump();
                if self.at(SyntaxKind::Less) {
                    self.parse_type_arguments();
                }
            }
            self.builder.finish_node();
        }
    }

    fn parse_type_arguments(&mut self) {
        self.builder.start_node(SyntaxKind::TypeArguments.into());
        self.expect(SyntaxKind::Less, "expected `<`");
        while !matches!(
            self.current(),
            SyntaxKind::Greater | SyntaxKind::RightShift | SyntaxKind::UnsignedRightShift | SyntaxKind::Eof
        ) {
            self.eat_trivia();
            self.builder.start_node(SyntaxKind::TypeArgument.into());
            if self.at(SyntaxKind::Question) {
                self.builder.start_node(SyntaxKind::WildcardType.into());
                self.bump();
                if self.at(SyntaxKind::ExtendsKw) || self.at(SyntaxKind::SuperKw) {
                    self.bump();
                    self.parse_type();
                }
                self.builder.finish_node();
            } else {
                self.parse_type();
            }
            self.builder.finish_node();
            if self.at(SyntaxKind::Comma) {
                self.bump();
                continue;
            }
            break;
        }
        self.expect_gt();
        self.builder.finish_node();
    }

    fn expect_gt(&mut self) {
        match self.current() {
            SyntaxKind::Greater => self.bump(),
            SyntaxKind::RightShift | SyntaxKind::UnsignedRightShift => {
                self.eat_trivia();
                self.split_shift_as_greater();
                self.bump();
            }
            _ => self.missing(SyntaxKind::Greater, "expected `>`"),
        }
    }

    /// Split `>>`/`>>>` into single `>` tokens when closing nested type arguments.
    fn split_shift_as_greater(&mut self) {
        let Some(tok) = self.tokens.pop_front() else {
            return;
        };
        let width = match tok.kind {
            SyntaxKind::RightShift => 2u32,
            SyntaxKind::UnsignedRightShift => 3,
            _ => {
                self.tokens.push_front(tok);
                return;
            }
        };
        let start = tok.range.start();
        for i in (0..width).rev() {
            let at = start + TextSize::from(i);
            self.tokens.push_front(Token {
                kind: SyntaxKind::Greater,
                range: TextRange::at(at, TextSize::from(1)),
            });
        }
    }

    fn parse_expression(&mut self, min_bp: u8) -> Expr {
        if !can_start_expression(self.current()) {
            if matches!(
                self.current(),
                SyntaxKind::RParen
                    | SyntaxKind::RBracket
                    | SyntaxKind::RBrace
                    | SyntaxKind::Semicolon
                    | SyntaxKind::Comma
                    | SyntaxKind::Colon
                    | SyntaxKind::Eof
            ) {
                self.builder.start_node(SyntaxKind::NameExpression.into());
                self.missing(SyntaxKind::Identifier, "expected expression");
                self.builder.finish_node();
            } else {
                self.eat_trivia();
                self.builder.start_node(SyntaxKind::Error.into());
                self.error_here("expected expression");
                self.bump_any();
                self.builder.finish_node();
            }
            return Expr::ERROR;
        }

        self.eat_trivia();
        let checkpoint = self.builder.checkpoint();
        let mut expr = self.parse_primary(checkpoint);

        loop {
            let op = self.current();

            // Postfix: call, member access, array access, method reference, `++`/`--`.
            match op {
                SyntaxKind::LParen => {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::MethodCallExpression.into());
                    self.parse_argument_list();
                    self.builder.finish_node();
                    expr = Expr::new(SyntaxKind::MethodCallExpression);
                    continue;
                }
                SyntaxKind::Dot => {
                    let kind = match self.nth(1) {
                        Some(k) if k.is_identifier_like() => SyntaxKind::FieldAccessExpression,
                        Some(SyntaxKind::ThisKw) => SyntaxKind::FieldAccessExpression,
                        Some(SyntaxKind::ClassKw) => SyntaxKind::ClassLiteralExpression,
                        Some(SyntaxKind::NewKw) => {
                            // Qualified instance creation: `outer.new Inner()`.
                            self.builder
                                .start_node_at(checkpoint, SyntaxKind::NewExpression.into());
                            self.bump(); // .
                            self.parse_new_rest();
                            self.builder.finish_node();
                            expr = Expr::new(SyntaxKind::NewExpression);
                            continue;
                        }
                        _ => {
                            self.builder
                                .start_node_at(checkpoint, SyntaxKind::FieldAccessExpression.into());
                            self.bump(); // .
                            self.missing(SyntaxKind::Identifier, "expected member name");
                            self.builder.finish_node();
                            expr = Expr::ERROR;
                            continue;
                        }
                    };
                    self.builder.start_node_at(checkpoint, kind.into());
                    self.bump();
                    self.bump();
                    self.builder.finish_node();
                    expr = Expr::new(kind);
                    continue;
                }
                SyntaxKind::LBracket => {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::ArrayAccessExpression.into());
                    self.bump();
                    self.parse_expression(0);
                    self.expect(SyntaxKind::RBracket, "expected `]`");
                    self.builder.finish_node();
                    expr = Expr::new(SyntaxKind::ArrayAccessExpression);
                    continue;
                }
                SyntaxKind::DoubleColon => {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::MethodReferenceExpression.into());
                    self.bump();
                    if self.at(SyntaxKind::NewKw) {
                        self.bump();
                    } else {
                        self.expect_ident_like("expected method name after `::`");
                    }
                    self.builder.finish_node();
                    expr = Expr::new(SyntaxKind::MethodReferenceExpression);
                    continue;
                }
                SyntaxKind::PlusPlus | SyntaxKind::MinusMinus => {
                    if min_bp > 120 {
                        break;
                    }
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::PostfixExpression.into());
                    self.bump();
                    self.builder.finish_node();
                    expr = Expr {
                        kind: SyntaxKind::PostfixExpression,
                        op: Some(op),
                    };
                    continue;
                }
                _ => {}
            }

            if op == SyntaxKind::InstanceofKw {
                if 50 < min_bp {
                    break;
                }
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::InstanceofExpression.into());
                self.bump();
                if self.at(SyntaxKind::FinalKw) {
                    self.bump();
                }
                self.parse_type();
                if self.at_ident_like() {
                    self.bump();
                }
                self.builder.finish_node();
                expr = Expr::new(SyntaxKind::InstanceofExpression);
                continue;
            }

            if let Some((l_bp, r_bp, expr_kind)) = infix_binding_power(op) {
                if l_bp < min_bp {
                    break;
                }
                self.builder.start_node_at(checkpoint, expr_kind.into());
                self.bump();
                self.parse_expression(r_bp);
                self.builder.finish_node();
                expr = Expr {
                    kind: expr_kind,
                    op: Some(op),
                };
                continue;
            }

            if op == SyntaxKind::Question {
                let (l_bp, r_bp) = (2, 1);
                if l_bp < min_bp {
                    break;
                }
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::ConditionalExpression.into());
                self.bump(); // ?
                self.parse_expression(0);
                self.expect(SyntaxKind::Colon, "expected `:` in conditional expression");
                self.parse_expression(r_bp);
                self.builder.finish_node();
                expr = Expr::new(SyntaxKind::ConditionalExpression);
                continue;
            }

            break;
        }

        expr
    }

    fn parse_primary(&mut self, checkpoint: Checkpoint) -> Expr {
        let current = self.current();
        match current {
            k if k.is_literal() => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::LiteralExpression.into());
                self.bump();
                self.builder.finish_node();
                Expr::new(SyntaxKind::LiteralExpression)
            }
            SyntaxKind::ThisKw | SyntaxKind::SuperKw => {
                let kind = if current == SyntaxKind::ThisKw {
                    SyntaxKind::ThisExpression
                } else {
                    SyntaxKind::SuperExpression
                };
                self.builder.start_node_at(checkpoint, kind.into());
                self.bump();
                self.builder.finish_node();
                Expr::new(kind)
            }
            SyntaxKind::NewKw => {
                let kind = if self.new_creates_array() {
                    SyntaxKind::ArrayCreationExpression
                } else {
                    SyntaxKind::NewExpression
                };
                self.builder.start_node_at(checkpoint, kind.into());
                self.parse_new_rest();
                self.builder.finish_node();
                Expr::new(kind)
            }
            SyntaxKind::Plus
            | SyntaxKind::Minus
            | SyntaxKind::Bang
            | SyntaxKind::Tilde
            | SyntaxKind::PlusPlus
            | SyntaxKind::MinusMinus => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::UnaryExpression.into());
                self.bump();
                self.parse_expression(100);
                self.builder.finish_node();
                Expr {
                    kind: SyntaxKind::UnaryExpression,
                    op: Some(current),
                }
            }
            k if k.is_identifier_like() => {
                if self.nth(1) == Some(SyntaxKind::Arrow) {
                    self.parse_lambda_expression(checkpoint);
                    return Expr::new(SyntaxKind::LambdaExpression);
                }
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::NameExpression.into());
                self.bump();
                while self.at(SyntaxKind::Dot) && self.nth(1).map_or(false, |k| k.is_identifier_like()) {
                    self.bump();
                    self.bump();
                }
                self.builder.finish_node();
                Expr::new(SyntaxKind::NameExpression)
            }
            k if is_primitive_type(k) || k == SyntaxKind::VoidKw => {
                // `int.class`, `int[].class`, `void.class`, `int[]::new`.
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::ClassLiteralExpression.into());
                if k == SyntaxKind::VoidKw {
                    self.bump();
                } else {
                    self.parse_type();
                }
                if self.at(SyntaxKind::Dot) {
                    self.bump();
                    self.expect(SyntaxKind::ClassKw, "expected `class`");
                }
                self.builder.finish_node();
                Expr::new(SyntaxKind::ClassLiteralExpression)
            }
            SyntaxKind::LParen => {
                if self.is_lambda_paren() {
                    self.parse_lambda_expression(checkpoint);
                    Expr::new(SyntaxKind::LambdaExpression)
                } else if self.is_cast_expression() {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::CastExpression.into());
                    self.bump();
                    self.parse_type();
                    while self.at(SyntaxKind::Amp) {
                        self.bump();
                        self.parse_type();
                    }
                    self.expect(SyntaxKind::RParen, "expected `)` in cast");
                    self.parse_expression(100);
                    self.builder.finish_node();
                    Expr::new(SyntaxKind::CastExpression)
                } else {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::ParenthesizedExpression.into());
                    self.bump();
                    self.parse_expression(0);
                    self.expect(SyntaxKind::RParen, "expected `)`");
                    self.builder.finish_node();
                    Expr::new(SyntaxKind::ParenthesizedExpression)
                }
            }
            _ => {
                self.builder.start_node_at(checkpoint, SyntaxKind::Error.into());
                self.error_here("expected expression");
                self.bump_any();
                self.builder.finish_node();
                Expr::ERROR
            }
        }
    }

    /// `new` already current. Parses the created type and arguments / dimensions.
    fn parse_new_rest(&mut self) {
        self.expect(SyntaxKind::NewKw, "expected `new`");
        self.eat_trivia();
        self.builder.start_node(SyntaxKind::Type.into());
        self.parse_type_without_dims();
        self.builder.finish_node();

        if self.at(SyntaxKind::LBracket) {
            self.builder.start_node(SyntaxKind::ArrayDimensions.into());
            while self.at(SyntaxKind::LBracket) {
                self.bump();
                if !self.at(SyntaxKind::RBracket) {
                    self.parse_expression(0);
                }
                self.expect(SyntaxKind::RBracket, "expected `]`");
            }
            self.builder.finish_node();
            if self.at(SyntaxKind::LBrace) {
                self.parse_array_initializer();
            }
            return;
        }

        if self.at(SyntaxKind::LParen) {
            self.parse_argument_list();
        } else {
            self.missing(SyntaxKind::LParen, "expected `(` or `[` after type in `new`");
            self.missing_silent(SyntaxKind::RParen);
            return;
        }
        if self.at(SyntaxKind::LBrace) {
            self.parse_class_body(SyntaxKind::ClassBody);
        }
    }

    fn new_creates_array(&self) -> bool {
        let mut i = skip_trivia(&self.tokens, 0) + 1;
        let mut depth = 0i32;
        while let Some(tok) = self.tokens.get(i) {
            match tok.kind {
                k if k.is_trivia() => {}
                SyntaxKind::Less => depth += 1,
                SyntaxKind::Greater => depth -= 1,
                SyntaxKind::RightShift => depth -= 2,
                SyntaxKind::UnsignedRightShift => depth -= 3,
                SyntaxKind::LBracket if depth <= 0 => return true,
                SyntaxKind::LParen | SyntaxKind::LBrace | SyntaxKind::Semicolon => return false,
                k if k.is_identifier_like()
                    || is_primitive_type(k)
                    || matches!(k, SyntaxKind::Dot | SyntaxKind::Comma | SyntaxKind::Question | SyntaxKind::At) => {}
                _ if depth > 0 => {}
                _ => return false,
            }
            i += 1;
        }
        false
    }

    fn parse_lambda_expression(&mut self, checkpoint: Checkpoint) {
        self.builder
            .start_node_at(checkpoint, SyntaxKind::LambdaExpression.into());
        self.builder.start_node(SyntaxKind::LambdaParameters.into());
        if self.at(SyntaxKind::LParen) {
            self.bump();
            while !self.at(SyntaxKind::RParen) && !self.at(SyntaxKind::Eof) {
                self.bump();
            }
            self.expect(SyntaxKind::RParen, "expected `)` in lambda parameters");
        } else {
            self.expect_ident_like("expected lambda parameter");
        }
        self.builder.finish_node();
        self.expect(SyntaxKind::Arrow, "expected `->` in lambda");
        if self.at(SyntaxKind::LBrace) {
            self.parse_block();
        } else {
            self.parse_expression(0);
        }
        self.builder.finish_node();
    }

    fn is_lambda_paren(&self) -> bool {
        let mut i = skip_trivia(&self.tokens, 0);
        if self.tokens.get(i).map(|t| t.kind) != Some(SyntaxKind::LParen) {
            return false;
        }
        i = skip_balanced_parens(&self.tokens, i);
        let j = skip_trivia(&self.tokens, i);
        self.tokens.get(j).map(|t| t.kind) == Some(SyntaxKind::Arrow)
    }

    fn is_cast_expression(&self) -> bool {
        // `(Type) expr` where the parenthesized part looks like a type.
        let mut i = skip_trivia(&self.tokens, 0) + 1;
        let mut saw_primitive = false;
        let mut saw_any = false;
        while let Some(tok) = self.tokens.get(i) {
            match tok.kind {
                k if k.is_trivia() => {}
                SyntaxKind::RParen => {
                    if !saw_any {
                        return false;
                    }
                    let j = skip_trivia(&self.tokens, i + 1);
                    let Some(next) = self.tokens.get(j).map(|t| t.kind) else {
                        return false;
                    };
                    if saw_primitive {
                        return can_start_expression(next);
                    }
                    // `(a) + b` is a parenthesized expression, `(T) -x` is ambiguous and
                    // treated the same way.
                    return can_start_expression(next)
                        && !matches!(next, SyntaxKind::Plus | SyntaxKind::Minus | SyntaxKind::PlusPlus | SyntaxKind::MinusMinus);
                }
                k if is_primitive_type(k) => {
                    saw_primitive = true;
                    saw_any = true;
                }
                k if k.is_identifier_like() => saw_any = true,
                SyntaxKind::Dot
                | SyntaxKind::Less
                | SyntaxKind::Greater
                | SyntaxKind::RightShift
                | SyntaxKind::UnsignedRightShift
                | SyntaxKind::LBracket
                | SyntaxKind::RBracket
                | SyntaxKind::Question
                | SyntaxKind::Comma
                | SyntaxKind::ExtendsKw
                | SyntaxKind::SuperKw
                | SyntaxKind::Amp => {}
                _ => return false,
            }
            i += 1;
        }
        false
    }

    fn at_local_type_decl_start(&self) -> bool {
        match self.nth(0) {
            Some(SyntaxKind::ClassKw | SyntaxKind::InterfaceKw | SyntaxKind::EnumKw) => true,
            Some(SyntaxKind::FinalKw | SyntaxKind::AbstractKw | SyntaxKind::StaticKw) => matches!(
                self.nth(1),
                Some(SyntaxKind::ClassKw | SyntaxKind::InterfaceKw | SyntaxKind::EnumKw)
            ),
            _ => false,
        }
    }

    fn at_local_var_decl_start(&self) -> bool {
        let mut i = skip_trivia(&self.tokens, 0);

        // Local variable modifiers: `final` + annotations.
        loop {
            match self.tokens.get(i).map(|t| t.kind) {
                Some(SyntaxKind::FinalKw) => {
                    i = skip_trivia(&self.tokens, i + 1);
                }
                Some(SyntaxKind::At) => {
                    i = skip_trivia(&self.tokens, i + 1);
                    i = skip_qualified_name(&self.tokens, i);
                    if self.tokens.get(i).map(|t| t.kind) == Some(SyntaxKind::LParen) {
                        i = skip_balanced_parens(&self.tokens, i);
                    }
                    i = skip_trivia(&self.tokens, i);
                }
                _ => break,
            }
        }

        let Some(first) = self.tokens.get(i).map(|t| t.kind) else {
            return false;
        };

        if first == SyntaxKind::VarKw {
            let j = skip_trivia(&self.tokens, i + 1);
            return self
                .tokens
                .get(j)
                .map_or(false, |t| t.kind.is_identifier_like());
        }

        if is_primitive_type(first) {
            i = skip_trivia(&self.tokens, i + 1);
        } else if first.is_identifier_like() {
            i = skip_qualified_name(&self.tokens, i);
            if self.tokens.get(i).map(|t| t.kind) == Some(SyntaxKind::Less) {
                i = skip_type_arguments(&self.tokens, i);
                i = skip_trivia(&self.tokens, i);
                // `Outer<A>.Inner<B>`
                while self.tokens.get(i).map(|t| t.kind) == Some(SyntaxKind::Dot) {
                    i = skip_trivia(&self.tokens, i + 1);
                    i = skip_qualified_name(&self.tokens, i);
                    if self.tokens.get(i).map(|t| t.kind) == Some(SyntaxKind::Less) {
                        i = skip_type_arguments(&self.tokens, i);
                        i = skip_trivia(&self.tokens, i);
                    }
                }
            }
        } else {
            return false;
        }

        // Array dims: `[]`*
        while self.tokens.get(i).map(|t| t.kind) == Some(SyntaxKind::LBracket) {
            let after_l = skip_trivia(&self.tokens, i + 1);
            if self.tokens.get(after_l).map(|t| t.kind) != Some(SyntaxKind::RBracket) {
                return false;
            }
            i = skip_trivia(&self.tokens, after_l + 1);
        }

        self.tokens
            .get(i)
            .map_or(false, |t| t.kind.is_identifier_like())
    }

    fn recover_top_level(&mut self) {
        self.eat_trivia();
        self.builder.start_node(SyntaxKind::Error.into());
        self.error_here("unexpected token at top level");
        self.bump_any();
        self.recover_to(&[
            SyntaxKind::PackageKw,
            SyntaxKind::ImportKw,
            SyntaxKind::ClassKw,
            SyntaxKind::InterfaceKw,
            SyntaxKind::EnumKw,
            SyntaxKind::PublicKw,
            SyntaxKind::At,
        ]);
        self.builder.finish_node();
    }

    fn recover_to_class_member_boundary(&mut self) {
        self.recover_to(&[
            SyntaxKind::Semicolon,
            SyntaxKind::RBrace,
            SyntaxKind::ClassKw,
            SyntaxKind::InterfaceKw,
            SyntaxKind::EnumKw,
            SyntaxKind::PublicKw,
            SyntaxKind::PrivateKw,
            SyntaxKind::ProtectedKw,
            SyntaxKind::StaticKw,
            SyntaxKind::FinalKw,
            SyntaxKind::AbstractKw,
            SyntaxKind::At,
        ]);
        // If we stopped at `;`, consume it to avoid loops.
        if self.at(SyntaxKind::Semicolon) {
            self.bump();
        }
    }

    fn recover_to(&mut self, recovery: &[SyntaxKind]) {
        while !self.at(SyntaxKind::Eof) {
            if recovery.contains(&self.current()) {
                break;
            }
            self.bump();
        }
    }

    fn at_type_decl_start(&self) -> bool {
        matches!(
            self.current(),
            SyntaxKind::ClassKw
                | SyntaxKind::InterfaceKw
                | SyntaxKind::EnumKw
                | SyntaxKind::PublicKw
                | SyntaxKind::PrivateKw
                | SyntaxKind::ProtectedKw
                | SyntaxKind::StaticKw
                | SyntaxKind::FinalKw
                | SyntaxKind::AbstractKw
                | SyntaxKind::StrictfpKw
                | SyntaxKind::At
                | SyntaxKind::Semicolon
        )
    }

    fn at_type_start(&self) -> bool {
        self.at_primitive_type() || self.at_ident_like() || self.at(SyntaxKind::At)
    }

    fn at_primitive_type(&self) -> bool {
        is_primitive_type(self.current())
    }

    /// Next non-trivia kind. Never consumes anything.
    fn current(&self) -> SyntaxKind {
        self.nth(0).unwrap_or(SyntaxKind::Eof)
    }

    fn nth(&self, n: usize) -> Option<SyntaxKind> {
        self.tokens
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
            .map(|t| t.kind)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    fn at_ident_like(&self) -> bool {
        self.current().is_identifier_like()
    }

    /// Consume all leading trivia into the current node.
    fn eat_trivia(&mut self) {
        while self.tokens.front().map_or(false, |t| t.kind.is_trivia()) {
            let breaks = self.front_has_line_break();
            self.bump_any();
            if breaks {
                self.line_broken = true;
            }
        }
    }

    /// Consume the previous token's trailing trivia: everything on the same line, up to
    /// and including the first line break.
    fn eat_trailing_trivia(&mut self) {
        if self.line_broken {
            return;
        }
        while self.tokens.front().map_or(false, |t| t.kind.is_trivia()) {
            let breaks = self.front_has_line_break();
            self.bump_any();
            if breaks {
                self.line_broken = true;
                break;
            }
        }
    }

    fn front_has_line_break(&self) -> bool {
        self.tokens
            .front()
            .map_or(false, |t| t.text(self.input).contains(is_line_break))
    }

    fn bump(&mut self) {
        self.eat_trivia();
        self.bump_any();
        self.line_broken = false;
    }

    fn bump_any(&mut self) {
        if let Some(tok) = self.tokens.pop_front() {
            let text = tok.text(self.input);
            self.builder.token(tok.kind.into(), text);
        }
    }

    fn expect(&mut self, kind: SyntaxKind, message: &str) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            self.missing(kind, message);
            false
        }
    }

    fn expect_ident_like(&mut self, message: &str) {
        if self.at_ident_like() {
            self.bump();
        } else {
            self.missing(SyntaxKind::Identifier, message);
        }
    }

    /// Insert a zero-width token of `kind` and report it.
    fn missing(&mut self, kind: SyntaxKind, message: &str) {
        self.eat_trailing_trivia();
        let at = self.position();
        self.errors.push(ParseError {
            message: message.to_string(),
            range: TextRange::empty(at),
        });
        self.builder.token(kind.into(), "");
    }

    /// Like [`Parser::missing`] for tokens whose absence is already reported.
    fn missing_silent(&mut self, kind: SyntaxKind) {
        self.eat_trailing_trivia();
        self.builder.token(kind.into(), "");
    }

    fn error_here(&mut self, message: &str) {
        let range = self.current_range();
        self.errors.push(ParseError {
            message: message.to_string(),
            range,
        });
    }

    fn current_range(&self) -> TextRange {
        self.tokens
            .iter()
            .find(|t| !t.kind.is_trivia())
            .map(|t| t.range)
            .unwrap_or_else(|| TextRange::empty(TextSize::of(self.input)))
    }

    /// Offset of the next unconsumed token (trivia included).
    fn position(&self) -> TextSize {
        self.tokens
            .front()
            .map(|t| t.range.start())
            .unwrap_or_else(|| TextSize::of(self.input))
    }

    /// End of the last consumed token, skipping trailing trivia.
    fn last_token_end(&self) -> TextSize {
        let text = &self.input[..u32::from(self.position()) as usize];
        TextSize::of(text.trim_end())
    }

    /// Start of the line containing `end`, after indentation. Only used to give
    /// "not a statement" diagnostics a readable range.
    fn node_start_hint(&self, end: TextSize) -> TextSize {
        let text = &self.input[..u32::from(end) as usize];
        let line_start = text.rfind(is_line_break).map_or(0, |i| i + 1);
        let indent = text[line_start..].len() - text[line_start..].trim_start().len();
        TextSize::from((line_start + indent) as u32)
    }
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

fn skip_trivia(tokens: &VecDeque<Token>, mut idx: usize) -> usize {
    while tokens.get(idx).map_or(false, |t| t.kind.is_trivia()) {
        idx += 1;
    }
    idx
}

/// Skip `a.b.c` starting at `idx`; returns the index of the next non-trivia token.
fn skip_qualified_name(tokens: &VecDeque<Token>, idx: usize) -> usize {
    let mut i = skip_trivia(tokens, idx);
    if !tokens.get(i).map_or(false, |t| t.kind.is_identifier_like()) {
        return i;
    }
    i += 1;
    loop {
        let dot = skip_trivia(tokens, i);
        if tokens.get(dot).map(|t| t.kind) != Some(SyntaxKind::Dot) {
            return dot;
        }
        let seg = skip_trivia(tokens, dot + 1);
        if !tokens.get(seg).map_or(false, |t| t.kind.is_identifier_like()) {
            return dot;
        }
        i = seg + 1;
    }
}

fn skip_balanced_parens(tokens: &VecDeque<Token>, mut idx: usize) -> usize {
    // Assumes `tokens[idx]` is `(`.
    let mut depth = 0usize;
    while let Some(tok) = tokens.get(idx) {
        match tok.kind {
            SyntaxKind::LParen => depth += 1,
            SyntaxKind::RParen => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return idx + 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    idx
}

fn skip_type_arguments(tokens: &VecDeque<Token>, mut idx: usize) -> usize {
    // Assumes `tokens[idx]` is `<`.
    let mut depth: i32 = 0;
    while let Some(tok) = tokens.get(idx) {
        match tok.kind {
            SyntaxKind::Less => depth += 1,
            SyntaxKind::Greater => depth -= 1,
            SyntaxKind::RightShift => depth -= 2,
            SyntaxKind::UnsignedRightShift => depth -= 3,
            k if k.is_trivia()
                || k.is_identifier_like()
                || is_primitive_type(k)
                || matches!(
                    k,
                    SyntaxKind::Dot
                        | SyntaxKind::Comma
                        | SyntaxKind::Question
                        | SyntaxKind::ExtendsKw
                        | SyntaxKind::SuperKw
                        | SyntaxKind::LBracket
                        | SyntaxKind::RBracket
                        | SyntaxKind::Amp
                        | SyntaxKind::At
                ) => {}
            _ => return idx,
        }
        idx += 1;
        if depth <= 0 {
            break;
        }
    }
    idx
}

fn is_primitive_type(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::BooleanKw
            | SyntaxKind::ByteKw
            | SyntaxKind::ShortKw
            | SyntaxKind::IntKw
            | SyntaxKind::LongKw
            | SyntaxKind::CharKw
            | SyntaxKind::FloatKw
            | SyntaxKind::DoubleKw
    )
}

fn can_start_expression(kind: SyntaxKind) -> bool {
    kind.is_identifier_like()
        || kind.is_literal()
        || is_primitive_type(kind)
        || matches!(
            kind,
            SyntaxKind::ThisKw
                | SyntaxKind::SuperKw
                | SyntaxKind::NewKw
                | SyntaxKind::VoidKw
                | SyntaxKind::LParen
                | SyntaxKind::Plus
                | SyntaxKind::Minus
                | SyntaxKind::Bang
                | SyntaxKind::Tilde
                | SyntaxKind::PlusPlus
                | SyntaxKind::MinusMinus
        )
}

fn can_start_statement(kind: SyntaxKind) -> bool {
    can_start_expression(kind)
        || matches!(
            kind,
            SyntaxKind::LBrace
                | SyntaxKind::Semicolon
                | SyntaxKind::IfKw
                | SyntaxKind::SwitchKw
                | SyntaxKind::ForKw
                | SyntaxKind::WhileKw
                | SyntaxKind::DoKw
                | SyntaxKind::SynchronizedKw
                | SyntaxKind::TryKw
                | SyntaxKind::AssertKw
                | SyntaxKind::ReturnKw
                | SyntaxKind::BreakKw
                | SyntaxKind::ContinueKw
                | SyntaxKind::ThrowKw
                | SyntaxKind::FinalKw
                | SyntaxKind::AbstractKw
                | SyntaxKind::StaticKw
                | SyntaxKind::At
                | SyntaxKind::ClassKw
                | SyntaxKind::InterfaceKw
                | SyntaxKind::EnumKw
        )
}

fn infix_binding_power(op: SyntaxKind) -> Option<(u8, u8, SyntaxKind)> {
    // Returns (left_bp, right_bp, node_kind). Larger = tighter binding.
    let (l, r, kind) = match op {
        SyntaxKind::Star | SyntaxKind::Slash | SyntaxKind::Percent => (70, 71, SyntaxKind::BinaryExpression),
        SyntaxKind::Plus | SyntaxKind::Minus => (60, 61, SyntaxKind::BinaryExpression),
        SyntaxKind::LeftShift | SyntaxKind::RightShift | SyntaxKind::UnsignedRightShift => {
            (55, 56, SyntaxKind::BinaryExpression)
        }
        SyntaxKind::Less | SyntaxKind::LessEq | SyntaxKind::Greater | SyntaxKind::GreaterEq => {
            (50, 51, SyntaxKind::BinaryExpression)
        }
        SyntaxKind::EqEq | SyntaxKind::BangEq => (45, 46, SyntaxKind::BinaryExpression),
        SyntaxKind::Amp => (40, 41, SyntaxKind::BinaryExpression),
        SyntaxKind::Caret => (39, 40, SyntaxKind::BinaryExpression),
        SyntaxKind::Pipe => (38, 39, SyntaxKind::BinaryExpression),
        SyntaxKind::AmpAmp => (30, 31, SyntaxKind::BinaryExpression),
        SyntaxKind::PipePipe => (20, 21, SyntaxKind::BinaryExpression),

        // Assignment (right-associative).
        SyntaxKind::Eq
        | SyntaxKind::PlusEq
        | SyntaxKind::MinusEq
        | SyntaxKind::StarEq
        | SyntaxKind::SlashEq
        | SyntaxKind::PercentEq
        | SyntaxKind::AmpEq
        | SyntaxKind::PipeEq
        | SyntaxKind::CaretEq
        | SyntaxKind::LeftShiftEq
        | SyntaxKind::RightShiftEq
        | SyntaxKind::UnsignedRightShiftEq => (1, 0, SyntaxKind::AssignmentExpression),

        _ => return None,
    };
    Some((l, r, kind))
}

// --- debug helpers used by tests ---

#[cfg(test)]
pub fn debug_dump(node: &SyntaxNode) -> String {
    fn go(node: &SyntaxNode, indent: usize, out: &mut String) {
        use std::fmt::Write;
        let _ = writeln!(out, "{:indent$}{:?}", "", node.kind(), indent = indent);
        for child in node.children_with_tokens() {
            match child {
                NodeOrToken::Node(n) => go(&n, indent + 2, out),
                NodeOrToken::Token(t) => {
                    let _ = writeln!(
                        out,
                        "{:indent$}{:?} {:?}",
                        "",
                        t.kind(),
                        t.text(),
                        indent = indent + 2
                    );
                }
            }
        }
    }

    let mut out = String::new();
    go(node, 0, &mut out);
    out
}
