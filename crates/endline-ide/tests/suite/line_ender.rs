use endline_ide::{
    Abstain, AutomaticLineEnder, Dispatch, EditorOperations, NotApplicable, Veto,
};
use endline_syntax::{parse_java, JavaLanguageLevel, ParseOptions, SyntaxKind};
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

use crate::text_fixture::{commit_line, document, document_with_options, in_method, render};

const HANDLED: Dispatch = Dispatch::Handled {
    by: "automatic-line-ender",
};

/// Press Enter on `fixture` and compare the result, caret included, with `expected`.
async fn check_commit(fixture: &str, expected: &str, dispatch: Dispatch) {
    let doc = document(fixture);
    assert_eq!(commit_line(&doc).await, dispatch);
    assert_eq!(render(&doc), expected);
}

async fn decide(fixture: &str) -> Result<endline_ide::Decision, Abstain> {
    decide_with(fixture, ParseOptions::default()).await
}

async fn decide_with(fixture: &str, options: ParseOptions) -> Result<endline_ide::Decision, Abstain> {
    let doc = document_with_options(fixture, options);
    AutomaticLineEnder::default()
        .decide(doc.as_ref(), doc.caret(), &CancellationToken::new())
        .await
}

#[tokio::test]
async fn terminates_a_simple_assignment() {
    check_commit(
        &in_method("        x = 1<|>"),
        &in_method("        x = 1;\n        <|>"),
        HANDLED,
    )
    .await;
}

#[tokio::test]
async fn already_terminated_statement_only_gets_a_new_line() {
    let fixture = in_method("        x = 1;<|>");
    assert_eq!(
        decide(&fixture).await,
        Err(Abstain::NotApplicable(NotApplicable::AlreadyTerminated))
    );
    check_commit(
        &fixture,
        &in_method("        x = 1;\n        <|>"),
        Dispatch::DefaultAction,
    )
    .await;
}

#[tokio::test]
async fn open_string_literal_is_left_alone() {
    let fixture = in_method("        var s = \"abc<|>");
    assert_eq!(
        decide(&fixture).await,
        Err(Abstain::Vetoed(Veto::UnterminatedLiteral))
    );
    check_commit(
        &fixture,
        &in_method("        var s = \"abc\n        <|>"),
        Dispatch::DefaultAction,
    )
    .await;
}

#[tokio::test]
async fn open_char_literal_is_left_alone() {
    assert_eq!(
        decide(&in_method("        char c = 'x<|>")).await,
        Err(Abstain::Vetoed(Veto::UnterminatedLiteral))
    );
}

#[tokio::test]
async fn constructs_ending_in_a_brace_are_never_terminated() {
    let fixture = in_method("        if (ready) {\n            go();\n        }<|>");
    assert_eq!(
        decide(&fixture).await,
        Err(Abstain::NotApplicable(NotApplicable::ClosingBrace))
    );

    let fixture = in_method("        Runnable r = () -> {\n        }<|>");
    assert_eq!(
        decide(&fixture).await,
        Err(Abstain::NotApplicable(NotApplicable::ClosingBrace))
    );
}

#[tokio::test]
async fn empty_embedded_statement_is_vetoed() {
    for header in ["if (ready)", "while (running)", "for (int i = 0; i < n; i++)"] {
        let fixture = in_method(&format!("        {header}<|>"));
        assert_eq!(
            decide(&fixture).await,
            Err(Abstain::Vetoed(Veto::EmptyEmbeddedStatement)),
            "{header}"
        );
    }
}

#[tokio::test]
async fn embedded_statement_owner_with_a_body_is_terminated() {
    check_commit(
        &in_method("        while (busy<|>) spin()"),
        &in_method("        while (busy) spin();\n        <|>"),
        HANDLED,
    )
    .await;
}

#[tokio::test]
async fn field_declaration_is_terminated() {
    let fixture = "class A {\n    private int count = 0<|>\n}\n";
    let decision = decide(fixture).await.unwrap();
    assert_eq!(decision.unit, SyntaxKind::FieldDeclaration);
    check_commit(
        fixture,
        "class A {\n    private int count = 0;\n    <|>\n}\n",
        HANDLED,
    )
    .await;
}

#[tokio::test]
async fn import_is_terminated() {
    check_commit(
        "import java.util.List<|>\n\nclass A {}\n",
        "import java.util.List;\n<|>\n\nclass A {}\n",
        HANDLED,
    )
    .await;
}

#[tokio::test]
async fn import_without_a_name_is_vetoed() {
    assert_eq!(
        decide("import <|>\nclass A {}\n").await,
        Err(Abstain::Vetoed(Veto::EmptyImport))
    );
}

#[tokio::test]
async fn terminator_goes_before_a_trailing_comment() {
    check_commit(
        &in_method("        foo() // call<|>"),
        &in_method("        foo(); // call\n        <|>"),
        HANDLED,
    )
    .await;
}

#[tokio::test]
async fn trailing_code_after_the_statement_is_vetoed() {
    assert_eq!(
        decide(&in_method("        foo(<|>) bar")).await,
        Err(Abstain::Vetoed(Veto::TrailingContent))
    );
}

#[tokio::test]
async fn caret_inside_the_statement_terminates_at_line_end() {
    check_commit(
        &in_method("        foo(a<|>, b)"),
        &in_method("        foo(a, b);\n        <|>"),
        HANDLED,
    )
    .await;
}

#[tokio::test]
async fn multi_line_member_chain_at_line_end_is_vetoed() {
    let fixture = in_method("        builder\n            .append(x)\n            .build()<|>");
    assert_eq!(
        decide(&fixture).await,
        Err(Abstain::Vetoed(Veto::ExpressionStatementAtLineEnd))
    );
}

#[tokio::test]
async fn single_line_qualified_call_is_terminated() {
    check_commit(
        &in_method("        list.add(x)<|>"),
        &in_method("        list.add(x);\n        <|>"),
        HANDLED,
    )
    .await;
}

#[tokio::test]
async fn incomplete_statement_is_rejected_by_the_speculative_parse() {
    let result = decide(&in_method("        foo(a,<|>")).await;
    assert!(
        matches!(result, Err(Abstain::SpeculativeRejected(_))),
        "{result:?}"
    );
}

#[tokio::test]
async fn language_level_is_honored_by_the_speculative_parse() {
    let fixture = in_method("        Runnable r = () -> run()<|>");
    let java7 = ParseOptions {
        language_level: JavaLanguageLevel::JAVA_7,
    };
    match decide_with(&fixture, java7).await {
        Err(Abstain::SpeculativeRejected(rejected)) => {
            let codes: Vec<_> = rejected.diagnostics.iter().map(|d| d.code).collect();
            assert_eq!(codes, vec!["JAVA_FEATURE_LAMBDA_EXPRESSIONS"]);
        }
        other => panic!("expected a rejection, got {other:?}"),
    }

    assert!(decide(&fixture).await.is_ok());
}

#[tokio::test]
async fn completed_statement_is_formatted() {
    check_commit(
        &in_method("        x=a+b<|>"),
        &in_method("        x = a + b;\n        <|>"),
        HANDLED,
    )
    .await;
}

#[tokio::test]
async fn formatting_widens_to_a_same_line_owner() {
    check_commit(
        &in_method("        if(ready) go( 1 )<|>"),
        &in_method("        if (ready) go(1);\n        <|>"),
        HANDLED,
    )
    .await;
}

#[tokio::test]
async fn formatting_leaves_other_statements_alone() {
    check_commit(
        &in_method("        a=1;\n        b=2<|>\n        c=3;"),
        &in_method("        a=1;\n        b = 2;\n        <|>\n        c=3;"),
        HANDLED,
    )
    .await;
}

#[tokio::test]
async fn do_while_and_return_are_terminated() {
    check_commit(
        &in_method("        do { step(); } while (busy)<|>"),
        &in_method("        do { step(); } while (busy);\n        <|>"),
        HANDLED,
    )
    .await;
    check_commit(
        &in_method("        return value<|>"),
        &in_method("        return value;\n        <|>"),
        HANDLED,
    )
    .await;
}

#[tokio::test]
async fn commit_is_a_single_undo_step() {
    let fixture = in_method("        x=1<|>");
    let doc = document(&fixture);
    assert_eq!(commit_line(&doc).await, HANDLED);
    assert_eq!(doc.undo_depth(), 1);

    assert!(doc.undo());
    assert_eq!(render(&doc), fixture);
}

#[tokio::test]
async fn inserted_terminators_leave_the_document_error_free() {
    let fixtures = [
        in_method("        x = 1<|>"),
        in_method("        list.add(x)<|>"),
        in_method("        foo() // call<|>"),
        in_method("        int[] xs = {1, 2}<|>"),
        in_method("        String s = cond ? \"a\" : \"b\"<|>"),
        in_method("        Object o = new Object() {\n        }<|>"),
        in_method("        throw new IllegalStateException()<|>"),
        in_method("        i++<|>"),
        "class A {\n    static final String NAME = \"n\"<|>\n}\n".to_string(),
        "package demo<|>\n\nclass A {}\n".to_string(),
    ];

    for fixture in fixtures {
        let doc = document(&fixture);
        let before = parse_java(&doc.current_text()).errors.len();
        assert!(before > 0, "{fixture}");

        let dispatch = commit_line(&doc).await;
        let text = doc.current_text();
        let errors = parse_java(&text).errors;
        if dispatch == HANDLED {
            assert!(errors.is_empty(), "{text}\n{errors:?}");
        } else {
            assert_eq!(errors.len(), before, "{text}");
            assert!(!text.contains(';') || fixture.contains(';'), "{text}");
        }
    }
}
