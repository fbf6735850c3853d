//! Canonical single-line spacing between two adjacent significant tokens.

use endline_syntax::{lex, SyntaxKind, SyntaxToken};

use crate::FormatConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    /// Identifiers, keywords and literals.
    Word,
    /// An operator with operands on both sides (`=`, `+`, `?`, `->`, ...).
    Binary,
    /// Prefix `-x`, `!x`, `++x`.
    Prefix,
    /// Postfix `x++`.
    Postfix,
    /// `<`/`>` of type arguments or type parameters.
    Angle,
    Punct,
}

fn classify(token: &SyntaxToken) -> Class {
    let kind = token.kind();
    if kind.is_keyword() || kind.is_identifier_like() || kind.is_literal() {
        return Class::Word;
    }

    let parent = token.parent().map(|p| p.kind());
    match kind {
        SyntaxKind::Less | SyntaxKind::Greater
            if matches!(
                parent,
                Some(SyntaxKind::TypeArguments | SyntaxKind::TypeParameters)
            ) =>
        {
            Class::Angle
        }
        SyntaxKind::Plus
        | SyntaxKind::Minus
        | SyntaxKind::Bang
        | SyntaxKind::Tilde
        | SyntaxKind::PlusPlus
        | SyntaxKind::MinusMinus
            if parent == Some(SyntaxKind::UnaryExpression) =>
        {
            Class::Prefix
        }
        SyntaxKind::PlusPlus | SyntaxKind::MinusMinus => Class::Postfix,
        SyntaxKind::Question | SyntaxKind::Colon
            if parent == Some(SyntaxKind::ConditionalExpression) =>
        {
            Class::Binary
        }
        SyntaxKind::Colon
            if matches!(
                parent,
                Some(SyntaxKind::AssertStatement | SyntaxKind::ForHeader)
            ) =>
        {
            Class::Binary
        }
        SyntaxKind::Arrow => Class::Binary,
        SyntaxKind::Amp if parent == Some(SyntaxKind::CastExpression) => Class::Binary,
        SyntaxKind::Pipe if parent == Some(SyntaxKind::CatchClause) => Class::Binary,
        _ if matches!(
            parent,
            Some(SyntaxKind::BinaryExpression | SyntaxKind::AssignmentExpression)
        ) =>
        {
            Class::Binary
        }
        SyntaxKind::Eq if parent == Some(SyntaxKind::VariableDeclarator) => Class::Binary,
        _ => Class::Punct,
    }
}

fn is_control_keyword(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::IfKw
            | SyntaxKind::ForKw
            | SyntaxKind::WhileKw
            | SyntaxKind::SwitchKw
            | SyntaxKind::CatchKw
            | SyntaxKind::SynchronizedKw
            | SyntaxKind::TryKw
    )
}

/// Whether a single space belongs between `prev` and `curr` when both sit on one line.
pub(crate) fn needs_space(prev: &SyntaxToken, curr: &SyntaxToken, config: &FormatConfig) -> bool {
    // Split `>>` closing nested type arguments.
    if classify(prev) == Class::Angle && classify(curr) == Class::Angle {
        return false;
    }
    needs_space_inner(prev, curr, config) || would_glue(prev.text(), curr.text())
}

fn needs_space_inner(prev: &SyntaxToken, curr: &SyntaxToken, config: &FormatConfig) -> bool {
    let (pk, ck) = (prev.kind(), curr.kind());
    let (pc, cc) = (classify(prev), classify(curr));

    if pc == Class::Binary || cc == Class::Binary {
        return config.space_around_operators;
    }

    match ck {
        SyntaxKind::RParen
        | SyntaxKind::RBracket
        | SyntaxKind::Comma
        | SyntaxKind::Semicolon
        | SyntaxKind::Dot
        | SyntaxKind::DoubleColon
        | SyntaxKind::LBracket
        | SyntaxKind::Ellipsis => return false,
        SyntaxKind::Colon => {
            // `label:` and `case 1:`
            return false;
        }
        _ => {}
    }

    match pk {
        SyntaxKind::LParen
        | SyntaxKind::LBracket
        | SyntaxKind::Dot
        | SyntaxKind::DoubleColon
        | SyntaxKind::At => return false,
        SyntaxKind::Comma => return config.space_after_comma,
        SyntaxKind::Semicolon | SyntaxKind::Colon | SyntaxKind::Ellipsis => return true,
        // `? extends T`
        SyntaxKind::Question => return cc == Class::Word,
        _ => {}
    }

    if pc == Class::Prefix || cc == Class::Postfix {
        return false;
    }

    if cc == Class::Angle {
        // `public <T> void` keeps the space, `List<T>` does not.
        return ck == SyntaxKind::Less && pk.is_keyword();
    }
    if pc == Class::Angle {
        if pk == SyntaxKind::Less {
            return false;
        }
        // `List<String> xs` but `new ArrayList<>()` and `Map<K, List<V>>`.
        return matches!(cc, Class::Word) || ck == SyntaxKind::LBrace || ck == SyntaxKind::At;
    }

    match ck {
        SyntaxKind::LParen => {
            return if is_control_keyword(pk) {
                config.space_after_control_keyword
            } else {
                // `return (x)` but `this(x)`
                pk.is_keyword() && !matches!(pk, SyntaxKind::ThisKw | SyntaxKind::SuperKw)
            };
        }
        SyntaxKind::LBrace => return true,
        SyntaxKind::RBrace => {
            let in_initializer = curr
                .parent()
                .map_or(false, |p| p.kind() == SyntaxKind::ArrayInitializer);
            return pk != SyntaxKind::LBrace && !in_initializer;
        }
        SyntaxKind::At => return true,
        _ => {}
    }

    if pk == SyntaxKind::LBrace {
        return !prev
            .parent()
            .map_or(false, |p| p.kind() == SyntaxKind::ArrayInitializer);
    }

    match (pc, cc) {
        (Class::Word, Class::Word) => true,
        // `(int) x`, `) throws`, `] x`, `} else`
        (Class::Punct, Class::Word | Class::Prefix)
            if matches!(
                pk,
                SyntaxKind::RParen | SyntaxKind::RBracket | SyntaxKind::RBrace
            ) =>
        {
            true
        }
        (Class::Word, Class::Prefix) => true,
        _ => false,
    }
}

/// Two tokens that would lex differently without a separating space: `a - -b`, `/ /`.
fn would_glue(prev: &str, curr: &str) -> bool {
    let joined = format!("{prev}{curr}");
    lex(&joined)
        .first()
        .map_or(false, |tok| u32::from(tok.range.len()) as usize != prev.len())
}
