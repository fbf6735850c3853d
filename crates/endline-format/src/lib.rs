//! Whitespace formatting for Java syntax trees.
//!
//! The formatter only ever touches the whitespace between tokens. It renders a node on a
//! single line with canonical spacing ([`normalize_whitespace`]) and computes minimal
//! edits that bring a range of a document to that spacing ([`edits_for_range_formatting`]),
//! leaving line structure and comments alone.

mod range;
mod spacing;

use endline_core::{slice, TextEdit, TextRange};
use endline_syntax::navigation::SyntaxTokenExt;
use endline_syntax::{SyntaxNode, SyntaxToken};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use range::find_appropriate_range;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatConfig {
    /// `a = b + c` rather than `a=b+c`.
    #[serde(default = "default_true")]
    pub space_around_operators: bool,
    /// `f(a, b)` rather than `f(a,b)`.
    #[serde(default = "default_true")]
    pub space_after_comma: bool,
    /// `if (x)` rather than `if(x)`.
    #[serde(default = "default_true")]
    pub space_after_control_keyword: bool,
    /// Strip spaces and tabs before line breaks inside the formatted range.
    #[serde(default = "default_true")]
    pub trim_trailing_whitespace: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            space_around_operators: true,
            space_after_comma: true,
            space_after_control_keyword: true,
            trim_trailing_whitespace: true,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("range {range:?} is outside of the document (length {len})")]
    InvalidRange { range: TextRange, len: usize },
    #[error("syntax tree does not match the source text")]
    SourceMismatch,
}

fn significant_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> {
    node.descendants_with_tokens()
        .filter_map(|el| el.into_token())
        .filter(|tok| tok.is_significant())
}

/// Render `node` on one line with canonical spacing. Comments and missing tokens are dropped.
#[must_use]
pub fn normalize_whitespace(node: &SyntaxNode, config: &FormatConfig) -> String {
    let mut out = String::new();
    let mut prev: Option<SyntaxToken> = None;
    for token in significant_tokens(node) {
        if let Some(prev) = &prev {
            if spacing::needs_space(prev, &token, config) {
                out.push(' ');
            }
        }
        out.push_str(token.text());
        prev = Some(token);
    }
    out
}

/// Whitespace edits for the tokens lying entirely inside `range`.
///
/// Each gap between two consecutive tokens is handled on its own:
/// - a gap on a single line gets the canonical spacing,
/// - a gap spanning lines keeps its line breaks and indentation and only loses trailing
///   whitespace,
/// - a gap holding a comment is left untouched.
///
/// Every returned edit lies within `range`; edits are sorted and do not overlap.
pub fn edits_for_range_formatting(
    root: &SyntaxNode,
    source: &str,
    range: TextRange,
    config: &FormatConfig,
) -> Result<Vec<TextEdit>, FormatError> {
    if usize::from(root.text_range().end()) != source.len() {
        return Err(FormatError::SourceMismatch);
    }
    if slice(source, range).is_none() {
        return Err(FormatError::InvalidRange {
            range,
            len: source.len(),
        });
    }

    let tokens: Vec<SyntaxToken> = significant_tokens(root)
        .filter(|tok| range.contains_range(tok.text_range()))
        .collect();

    let mut edits = Vec::new();
    for pair in tokens.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        let gap = TextRange::new(prev.text_range().end(), curr.text_range().start());
        let Some(current) = slice(source, gap) else {
            continue;
        };
        if let Some(replacement) = format_gap(prev, curr, current, config) {
            if replacement != current {
                edits.push(TextEdit::new(gap, replacement));
            }
        }
    }

    tracing::trace!(
        target = "endline.format",
        ?range,
        tokens = tokens.len(),
        edits = edits.len(),
        "computed range formatting edits"
    );
    Ok(edits)
}

/// The formatted text of the gap between `prev` and `curr`, or `None` to keep it.
fn format_gap(
    prev: &SyntaxToken,
    curr: &SyntaxToken,
    current: &str,
    config: &FormatConfig,
) -> Option<String> {
    if current.chars().any(|c| !c.is_whitespace()) {
        return None;
    }

    if !current.contains(|c: char| c == '\n' || c == '\r') {
        let wanted = if spacing::needs_space(prev, curr, config) {
            " "
        } else {
            ""
        };
        return Some(wanted.to_string());
    }

    if !config.trim_trailing_whitespace {
        return None;
    }

    // Keep every line break and the final line's indentation; drop what precedes a break.
    let mut out = String::with_capacity(current.len());
    let mut pending = String::new();
    for c in current.chars() {
        if c == '\n' || c == '\r' {
            pending.clear();
            out.push(c);
        } else {
            pending.push(c);
        }
    }
    out.push_str(&pending);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use endline_syntax::parse_java_statement;
    use pretty_assertions::assert_eq;

    fn normalize(text: &str) -> String {
        normalize_whitespace(&parse_java_statement(text).syntax(), &FormatConfig::default())
    }

    #[test]
    fn normalizes_common_statements() {
        assert_eq!(normalize("int   x=1;"), "int x = 1;");
        assert_eq!(normalize("foo( 1 ,2 );"), "foo(1, 2);");
        assert_eq!(normalize("if(x)a ( );"), "if (x) a();");
        assert_eq!(normalize("return -1;"), "return -1;");
        assert_eq!(normalize("i ++;"), "i++;");
        assert_eq!(normalize("x = a - -b;"), "x = a - -b;");
        assert_eq!(
            normalize("List < String >xs=new ArrayList< >( );"),
            "List<String> xs = new ArrayList<>();"
        );
        assert_eq!(normalize("Runnable r=()->{ };"), "Runnable r = () -> {};");
        assert_eq!(normalize("Function f=Integer :: parseInt;"), "Function f = Integer::parseInt;");
        assert_eq!(normalize("for(int i=0;i<n;i++){ }"), "for (int i = 0; i < n; i++) {}");
    }

    #[test]
    fn normalize_drops_comments_and_missing_tokens() {
        assert_eq!(normalize("foo( /* a */ 1 ) // c"), "foo(1)");
    }

    #[test]
    fn nested_type_arguments_stay_glued() {
        assert_eq!(
            normalize("Map<String,List<String>> m;"),
            "Map<String, List<String>> m;"
        );
    }

    #[test]
    fn operators_can_be_packed() {
        let config = FormatConfig {
            space_around_operators: false,
            ..FormatConfig::default()
        };
        let root = parse_java_statement("x = a - -b;").syntax();
        assert_eq!(normalize_whitespace(&root, &config), "x=a- -b;");
    }
}
