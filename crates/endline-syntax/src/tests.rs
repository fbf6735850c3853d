use pretty_assertions::assert_eq;

use crate::navigation::{last_token, SyntaxTokenExt};
use crate::parser::debug_dump;
use crate::{
    lex, lex_with_errors, parse_java, parse_java_statement_fragment, parse_java_with_options,
    AstNode, CompilationUnit, JavaLanguageLevel, ParseOptions, Statement, SyntaxKind, SyntaxNode,
    TextSize,
};

fn dump_tokens(input: &str) -> Vec<(SyntaxKind, String)> {
    lex(input)
        .into_iter()
        .map(|t| (t.kind, t.text(input).to_string()))
        .collect()
}

fn find_node(root: &SyntaxNode, kind: SyntaxKind) -> SyntaxNode {
    root.descendants()
        .find(|n| n.kind() == kind)
        .unwrap_or_else(|| panic!("no {kind:?} in\n{}", debug_dump(root)))
}

fn error_messages(text: &str) -> Vec<String> {
    parse_java(text)
        .errors
        .into_iter()
        .map(|e| e.message)
        .collect()
}

fn options(level: JavaLanguageLevel) -> ParseOptions {
    ParseOptions {
        language_level: level,
    }
}

#[test]
fn syntax_kind_raw_roundtrip_is_total_for_valid_range() {
    use rowan::Language;

    for raw in 0..(SyntaxKind::__Last as u16) {
        let kind = <crate::JavaLanguage as Language>::kind_from_raw(rowan::SyntaxKind(raw));
        assert_eq!(
            <crate::JavaLanguage as Language>::kind_to_raw(kind).0,
            raw,
            "failed roundtrip for raw={raw}"
        );
    }
}

#[test]
fn whitespace_tokens_end_at_the_first_line_break() {
    assert_eq!(
        dump_tokens("a  \n  b"),
        vec![
            (SyntaxKind::Identifier, "a".to_string()),
            (SyntaxKind::Whitespace, "  \n".to_string()),
            (SyntaxKind::Whitespace, "  ".to_string()),
            (SyntaxKind::Identifier, "b".to_string()),
        ]
    );
}

#[test]
fn unterminated_string_stops_at_end_of_line() {
    let input = "\"abc\nx";
    let (tokens, errors) = lex_with_errors(input);
    assert_eq!(tokens[0].kind, SyntaxKind::StringLiteral);
    assert_eq!(tokens[0].text(input), "\"abc");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "unterminated string literal");
}

#[test]
fn contextual_keywords_lex_as_their_own_kinds() {
    let kinds: Vec<_> = lex("var yield x")
        .into_iter()
        .filter(|t| !t.kind.is_trivia())
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![SyntaxKind::VarKw, SyntaxKind::YieldKw, SyntaxKind::Identifier]
    );
}

#[test]
fn parse_is_lossless_even_with_errors() {
    let text = "package a.b;\nimport java.util.*;\nclass A {\n  int x = 1\n  void m() { if (x) }\n}\n";
    let parse = parse_java(text);
    assert!(!parse.errors.is_empty());
    assert_eq!(parse.syntax().to_string(), text);
}

#[test]
fn well_formed_class_has_no_errors() {
    let text = r#"
package demo;

import java.util.List;
import static java.util.Objects.requireNonNull;

public class Demo<T> extends Base implements Runnable {
    private final Map<String, List<String>> cache = new HashMap<>();
    private int[] values = {1, 2, 3};

    Demo(T value) { super(); }

    @Override
    public void run() {
        for (int i = 0; i < values.length; i++) {
            total += values[i];
        }
        for (String s : names) System.out.println(s);
        while (running) tick();
        do { step(); } while (!done);
        label: for (;;) { break label; }
        try (var in = open()) {
            in.read();
        } catch (IOException | RuntimeException e) {
            throw new IllegalStateException(e);
        } finally {
            close();
        }
        switch (mode) {
            case 1:
                run();
                break;
            default:
                return;
        }
        Runnable r = () -> System.out.println("hi");
        Function<String, Integer> f = Integer::parseInt;
        Object o = flag ? (Object) "a" : null;
        if (o instanceof String) { count--; } else if (other) ++count; else count = 0;
        synchronized (lock) { notifyAll(); }
        assert count >= 0 : "negative";
        new Thread(r) {
            @Override public void run() {}
        }.start();
    }
}
"#;
    let parse = parse_java(text);
    assert_eq!(parse.errors, Vec::new(), "{}", debug_dump(&parse.syntax()));
}

#[test]
fn missing_semicolon_sits_at_start_of_next_line() {
    let text = "class A {\n  void m() {\n    foo()\n  }\n}\n";
    let root = parse_java(text).syntax();
    let stmt = find_node(&root, SyntaxKind::ExpressionStatement);
    let semi = last_token(&stmt, true).unwrap();
    assert_eq!(semi.kind(), SyntaxKind::Semicolon);
    assert!(semi.is_missing());
    assert_eq!(
        semi.text_range().start(),
        TextSize::of("class A {\n  void m() {\n    foo()\n")
    );
    assert!(error_messages(text).contains(&"expected `;` after expression".to_string()));
}

#[test]
fn missing_semicolon_after_trailing_comment() {
    let text = "class A { void m() {\n  foo() // call\n} }";
    let root = parse_java(text).syntax();
    let stmt = find_node(&root, SyntaxKind::ExpressionStatement);
    let semi = last_token(&stmt, true).unwrap();
    assert!(semi.is_missing());
    assert_eq!(
        semi.text_range().start(),
        TextSize::of("class A { void m() {\n  foo() // call\n")
    );
}

#[test]
fn bare_name_is_not_a_statement() {
    let messages = error_messages("class A { void m() { x; } }");
    assert_eq!(messages, vec!["not a statement".to_string()]);
}

#[test]
fn if_without_body_gets_an_empty_placeholder_statement() {
    let text = "class A { void m() { if (x)\n} }";
    let root = parse_java(text).syntax();
    let stmt = Statement::cast(find_node(&root, SyntaxKind::IfStatement)).unwrap();
    assert!(stmt.is_embedded_statement_owner());
    let body = stmt.embedded_statement().unwrap();
    assert_eq!(body.kind(), SyntaxKind::ExpressionStatement);
    assert!(body.is_empty());
}

#[test]
fn embedded_statement_prefers_else_branch() {
    let text = "class A { void m() { if (x) a(); else b(); } }";
    let root = parse_java(text).syntax();
    let stmt = Statement::cast(find_node(&root, SyntaxKind::IfStatement)).unwrap();
    let body = stmt.embedded_statement().unwrap();
    assert_eq!(body.syntax().text().to_string().trim(), "b();");
    assert!(!body.is_empty());
}

#[test]
fn import_without_name_has_missing_name() {
    let root = parse_java("import ;").syntax();
    let unit = CompilationUnit::cast(root).unwrap();
    let import = unit.imports().next().unwrap();
    assert!(import.name().unwrap().is_missing());
}

#[test]
fn import_name_text() {
    let root = parse_java("import static java.util.Collections.*;").syntax();
    let unit = CompilationUnit::cast(root).unwrap();
    let import = unit.imports().next().unwrap();
    assert!(import.is_static());
    assert_eq!(import.name().unwrap().text(), "java.util.Collections.*");
}

#[test]
fn statement_fragment_accepts_exactly_one_statement() {
    let opts = ParseOptions::default();
    assert!(!parse_java_statement_fragment("foo();", opts).has_diagnostics());
    assert!(!parse_java_statement_fragment("int x = 1;", opts).has_diagnostics());
    assert!(!parse_java_statement_fragment("return a + b;", opts).has_diagnostics());
    assert!(parse_java_statement_fragment("foo()", opts).has_diagnostics());
    assert!(parse_java_statement_fragment("x;", opts).has_diagnostics());
    assert!(parse_java_statement_fragment("foo(); bar();", opts).has_diagnostics());
    assert!(parse_java_statement_fragment("", opts).has_diagnostics());

    let root = parse_java_statement_fragment("foo();", opts).syntax();
    assert_eq!(root.kind(), SyntaxKind::StatementFragment);
}

#[test]
fn lambdas_are_gated_before_java_8() {
    let text = "Runnable r = () -> {};";
    let old = parse_java_statement_fragment(text, options(JavaLanguageLevel::JAVA_7));
    let codes: Vec<_> = old.all_diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec!["JAVA_FEATURE_LAMBDA_EXPRESSIONS"]);
    assert_eq!(
        old.diagnostics[0].message,
        "lambda expressions requires Java 8+"
    );

    let new = parse_java_statement_fragment(text, options(JavaLanguageLevel::JAVA_8));
    assert!(!new.has_diagnostics());
}

#[test]
fn method_references_and_var_are_gated() {
    let refs = parse_java_statement_fragment(
        "Function f = String::valueOf;",
        options(JavaLanguageLevel::JAVA_7),
    );
    assert_eq!(refs.diagnostics.len(), 1);
    assert_eq!(refs.diagnostics[0].code, "JAVA_FEATURE_METHOD_REFERENCES");

    let var = parse_java_statement_fragment("var x = 1;", options(JavaLanguageLevel::JAVA_8));
    assert_eq!(var.diagnostics.len(), 1);
    assert_eq!(var.diagnostics[0].code, "JAVA_FEATURE_VAR_LOCAL_INFERENCE");

    let modern = parse_java_statement_fragment("var x = 1;", ParseOptions::default());
    assert!(!modern.has_diagnostics());
}

#[test]
fn switch_arrows_are_gated_but_lambdas_are_not() {
    let text = "class A { void m() { switch (x) { case 1 -> run(); default -> {} } } }";
    let parse = parse_java_with_options(text, options(JavaLanguageLevel::JAVA_11));
    assert_eq!(parse.result.errors, Vec::new());
    let codes: Vec<_> = parse.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(
        codes,
        vec![
            "JAVA_FEATURE_SWITCH_EXPRESSIONS",
            "JAVA_FEATURE_SWITCH_EXPRESSIONS"
        ]
    );
}

#[test]
fn nested_generics_close_with_shift_tokens() {
    let text = "class A { Map<String, List<List<String>>> m; }";
    let parse = parse_java(text);
    assert_eq!(parse.errors, Vec::new());
    assert_eq!(parse.syntax().to_string(), text);
}

#[test]
fn field_declaration_missing_semicolon() {
    let text = "class A {\n  int x = 1\n}";
    let root = parse_java(text).syntax();
    let field = find_node(&root, SyntaxKind::FieldDeclaration);
    let semi = last_token(&field, true).unwrap();
    assert_eq!(semi.kind(), SyntaxKind::Semicolon);
    assert!(semi.is_missing());
}
