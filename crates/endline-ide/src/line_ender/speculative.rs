use endline_format::{normalize_whitespace, FormatConfig};
use endline_syntax::navigation::significant_range;
use endline_syntax::{
    parse_java_statement_fragment, parse_java_with_options, AstNode, CompilationUnit,
    Diagnostic, ParseOptions, TextRange, TextSize,
};
use thiserror::Error;

use super::OwningUnit;

const TYPE_SHELL_PREFIX: &str = "class C { ";
const TYPE_SHELL_SUFFIX: &str = " }";

/// The completed fragment did not parse cleanly on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("completed fragment has {} diagnostic(s)", .diagnostics.len())]
pub struct Rejected {
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses the unit's text with `terminator` appended, in isolation, and accepts only if the
/// result has no diagnostics under `options`.
pub fn check_termination(
    unit: &OwningUnit,
    terminator: &str,
    options: ParseOptions,
) -> Result<(), Rejected> {
    let fragment = format!(
        "{}{terminator}",
        normalize_whitespace(unit.syntax(), &FormatConfig::default())
    );

    let diagnostics = match unit {
        OwningUnit::Import(_) => parse_java_with_options(&fragment, options).all_diagnostics(),
        OwningUnit::Field(_) => field_diagnostics(&fragment, options),
        OwningUnit::Statement(_) => {
            parse_java_statement_fragment(&fragment, options).all_diagnostics()
        }
    };

    tracing::trace!(
        target = "endline.ide",
        fragment = %fragment,
        diagnostics = diagnostics.len(),
        "speculative parse"
    );

    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(Rejected { diagnostics })
    }
}

/// Fields only parse inside a type body, so the fragment is wrapped in a throwaway class.
///
/// Diagnostics are kept only when they touch the fragment itself, and the class body must
/// hold exactly one field spanning the whole fragment.
fn field_diagnostics(fragment: &str, options: ParseOptions) -> Vec<Diagnostic> {
    let wrapped = format!("{TYPE_SHELL_PREFIX}{fragment}{TYPE_SHELL_SUFFIX}");
    let parse = parse_java_with_options(&wrapped, options);

    let fragment_range = TextRange::at(TextSize::of(TYPE_SHELL_PREFIX), TextSize::of(fragment));
    let mut diagnostics: Vec<Diagnostic> = parse
        .all_diagnostics()
        .into_iter()
        .filter(|d| {
            d.range.start() <= fragment_range.end() && fragment_range.start() <= d.range.end()
        })
        .map(|mut d| {
            d.range = d.range.checked_sub(fragment_range.start()).unwrap_or(d.range);
            d
        })
        .collect();

    let root = parse.syntax();
    let fields: Vec<_> = CompilationUnit::cast(root)
        .map(|unit| unit.fields().collect())
        .unwrap_or_default();
    let recovered = matches!(
        fields.as_slice(),
        [field] if significant_range(field.syntax()) == Some(fragment_range)
    );
    if !recovered && diagnostics.is_empty() {
        diagnostics.push(Diagnostic {
            code: "JAVA_SYNTAX_ERROR",
            message: "fragment is not a single field declaration".to_owned(),
            range: TextRange::up_to(TextSize::of(fragment)),
        });
    }
    diagnostics
}
