use crate::language_level::{FeatureAvailability, JavaFeature, JavaLanguageLevel};
use crate::{Diagnostic, SyntaxKind, SyntaxNode, SyntaxToken};

pub(crate) fn feature_gate_diagnostics(root: &SyntaxNode, level: JavaLanguageLevel) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    gate_lambda_expressions(root, level, &mut diagnostics);
    gate_method_references(root, level, &mut diagnostics);
    gate_switch_expressions(root, level, &mut diagnostics);
    gate_var_local_inference(root, level, &mut diagnostics);

    diagnostics.sort_by_key(|d| d.range.start());
    diagnostics
}

fn gate_lambda_expressions(root: &SyntaxNode, level: JavaLanguageLevel, out: &mut Vec<Diagnostic>) {
    if level.is_enabled(JavaFeature::LambdaExpressions) {
        return;
    }

    for node in root.descendants().filter(|n| n.kind() == SyntaxKind::LambdaExpression) {
        let Some(arrow) = node
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind() == SyntaxKind::Arrow)
        else {
            continue;
        };
        out.push(feature_error(level, JavaFeature::LambdaExpressions, &arrow));
    }
}

fn gate_method_references(root: &SyntaxNode, level: JavaLanguageLevel, out: &mut Vec<Diagnostic>) {
    if level.is_enabled(JavaFeature::MethodReferences) {
        return;
    }

    for tok in root
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind() == SyntaxKind::DoubleColon)
    {
        if tok
            .parent()
            .map_or(false, |p| p.kind() == SyntaxKind::MethodReferenceExpression)
        {
            out.push(feature_error(level, JavaFeature::MethodReferences, &tok));
        }
    }
}

fn gate_switch_expressions(root: &SyntaxNode, level: JavaLanguageLevel, out: &mut Vec<Diagnostic>) {
    if level.is_enabled(JavaFeature::SwitchExpressions) {
        return;
    }

    // Only `->` in a switch label; lambdas are gated separately.
    for tok in root
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind() == SyntaxKind::Arrow)
    {
        if tok.parent().map_or(false, |p| p.kind() == SyntaxKind::SwitchLabel) {
            out.push(feature_error(level, JavaFeature::SwitchExpressions, &tok));
        }
    }
}

fn gate_var_local_inference(root: &SyntaxNode, level: JavaLanguageLevel, out: &mut Vec<Diagnostic>) {
    if level.is_enabled(JavaFeature::VarLocalInference) {
        return;
    }

    // `var x = ...;`, `try (var x = ...)` and `for (var x : xs)`.
    for node in root.descendants().filter(|n| {
        matches!(
            n.kind(),
            SyntaxKind::LocalVariableDeclarationStatement | SyntaxKind::Resource | SyntaxKind::ForHeader
        )
    }) {
        let Some(var_kw) = var_type_keyword(&node) else {
            continue;
        };
        out.push(feature_error(level, JavaFeature::VarLocalInference, &var_kw));
    }
}

fn var_type_keyword(container: &SyntaxNode) -> Option<SyntaxToken> {
    // Only the declaration type (a direct `Type` child), not nested types in casts etc.
    let ty = container.children().find(|n| n.kind() == SyntaxKind::Type)?;

    let first = ty
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| !t.kind().is_trivia())?;

    if first.kind() != SyntaxKind::VarKw {
        return None;
    }
    Some(first)
}

fn feature_error(level: JavaLanguageLevel, feature: JavaFeature, token: &SyntaxToken) -> Diagnostic {
    Diagnostic {
        code: feature.diagnostic_code(),
        message: feature_message(level, feature),
        range: token.text_range(),
    }
}

fn feature_message(level: JavaLanguageLevel, feature: JavaFeature) -> String {
    match level.availability(feature) {
        FeatureAvailability::Stable => {
            // Only called for disabled features.
            format!("{} is enabled in this language level", feature.display_name())
        }
        FeatureAvailability::Preview => format!(
            "{} is a preview feature in Java {} and requires --enable-preview",
            feature.display_name(),
            level.major
        ),
        FeatureAvailability::Unavailable => format!(
            "{} requires Java {}+",
            feature.display_name(),
            feature.stable_since()
        ),
    }
}
