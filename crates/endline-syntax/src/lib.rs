//! Java syntax trees for editor features.
//!
//! Entry points:
//! - [`parse_java`] / [`parse_java_with_options`]: a full compilation unit.
//! - [`parse_java_statement_fragment`]: exactly one statement, used to check whether a
//!   piece of text is a complete statement on its own.
//!
//! The parser never fails. Where the source lacks a token the grammar requires, the tree
//! holds a zero-width token of the expected kind and a [`ParseError`] is recorded.

pub mod ast;
mod feature_gate;
mod language_level;
mod lexer;
pub mod navigation;
mod parser;
mod syntax_kind;

pub use ast::*;
pub use endline_core::{TextRange, TextSize};
pub use language_level::{FeatureAvailability, JavaFeature, JavaLanguageLevel};
pub use lexer::{lex, lex_with_errors, LexError, Lexer, Token};
pub use navigation::SyntaxTokenExt;
pub use parser::{
    parse_java, parse_java_statement, JavaParseResult, SyntaxElement, SyntaxNode, SyntaxToken,
};
pub use syntax_kind::{JavaLanguage, SyntaxKind};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at {range:?}")]
pub struct ParseError {
    pub message: String,
    pub range: TextRange,
}

/// A diagnostic produced after parsing (feature gates) or converted from a [`ParseError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: &'static str,
    pub message: String,
    pub range: TextRange,
}

impl From<&ParseError> for Diagnostic {
    fn from(err: &ParseError) -> Self {
        Diagnostic {
            code: "JAVA_SYNTAX_ERROR",
            message: err.message.clone(),
            range: err.range,
        }
    }
}

/// Options that influence parsing diagnostics.
///
/// The parser always accepts a modern (superset) grammar. The language level only affects
/// post-parse feature-gate diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    #[serde(default)]
    pub language_level: JavaLanguageLevel,
}

#[derive(Debug, Clone)]
pub struct JavaParse {
    pub result: JavaParseResult,
    pub diagnostics: Vec<Diagnostic>,
}

impl JavaParse {
    pub fn syntax(&self) -> SyntaxNode {
        self.result.syntax()
    }

    pub fn has_diagnostics(&self) -> bool {
        !self.result.errors.is_empty() || !self.diagnostics.is_empty()
    }

    /// Parse errors and feature-gate diagnostics, ordered by position.
    pub fn all_diagnostics(&self) -> Vec<Diagnostic> {
        let mut out: Vec<Diagnostic> = self.result.errors.iter().map(Diagnostic::from).collect();
        out.extend(self.diagnostics.iter().cloned());
        out.sort_by_key(|d| (d.range.start(), d.range.end()));
        out
    }
}

pub fn parse_java_with_options(text: &str, opts: ParseOptions) -> JavaParse {
    let result = parser::parse_java(text);
    let diagnostics = feature_gate::feature_gate_diagnostics(&result.syntax(), opts.language_level);
    tracing::trace!(
        target = "endline.syntax",
        errors = result.errors.len(),
        gated = diagnostics.len(),
        "parsed compilation unit"
    );
    JavaParse {
        result,
        diagnostics,
    }
}

/// Parse `text` as a single statement. Leftover tokens are reported as an error.
pub fn parse_java_statement_fragment(text: &str, opts: ParseOptions) -> JavaParse {
    let result = parser::parse_java_statement(text);
    let diagnostics = feature_gate::feature_gate_diagnostics(&result.syntax(), opts.language_level);
    JavaParse {
        result,
        diagnostics,
    }
}

#[cfg(test)]
mod tests;
