//! End-to-end scanner + parser scenarios exercising the public API
//! (`tokenize`, `analyze`) against concrete programs, mirroring the
//! boundary cases and universal properties the core is expected to
//! satisfy.

use echo_front::{analyze, analyze_with_config, tokenize, Category, ParserConfig, TokenKind};

fn source_kinds(src: &str) -> Vec<TokenKind> {
    tokenize(src).into_iter().map(|t| t.kind).collect()
}

// -- E1: minimal valid program ----------------------------------------

#[test]
fn e1_minimal_valid_program_succeeds() {
    let src = "start\necho \"Hello\"\nend\n";
    let tokens = tokenize(src);
    let result = analyze(&tokens);
    assert!(result.success);
    let ast = result.ast.expect("ast must be present on success");
    assert_eq!(ast.statements.len(), 1);
    match &ast.statements[0] {
        echo_front::ast::Stmt::Output(out) => match &out.value {
            echo_front::ast::Expr::StringLit(lit) => {
                assert_eq!(lit.content.len(), 1);
                match &lit.content[0] {
                    echo_front::ast::StringPart::Content(s) => assert_eq!(s, "Hello"),
                    _ => panic!("expected a content part"),
                }
            }
            other => panic!("expected a string literal, got {other:?}"),
        },
        other => panic!("expected an output statement, got {other:?}"),
    }
}

// -- E2: interpolation splits, two unresolved references -------------

#[test]
fn e2_interpolation_splits_and_reports_undeclared_references() {
    let line = "echo \"x=@x y=@y\"";
    let kinds: Vec<_> = tokenize(line)
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| *k != TokenKind::CommentSingle)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::KwEcho,
            TokenKind::StrLiteral,
            TokenKind::SisMarker,
            TokenKind::StrLiteral,
            TokenKind::SisMarker,
        ]
    );

    let src = format!("start\n{line}\nend\n");
    let tokens = tokenize(&src);
    let result = analyze(&tokens);
    assert!(!result.success);
    assert!(result.ast.is_none());
    let reference_errors: Vec<_> = result
        .errors
        .iter()
        .filter(|e| e.category == Category::Reference)
        .collect();
    assert_eq!(reference_errors.len(), 2);
}

// -- E3: missing end --------------------------------------------------

#[test]
fn e3_missing_end_is_a_structural_error() {
    let src = "start\nif 1 > 0\necho \"a\"\nend\n";
    let tokens = tokenize(src);
    let result = analyze(&tokens);
    assert!(!result.success);
    assert!(result.ast.is_none());
    assert!(result
        .errors
        .iter()
        .any(|e| e.category == Category::Structural && e.message.contains("not closed")));
}

// -- E4: integer division vs line comment -----------------------------

#[test]
fn e4_int_div_operator_vs_line_comment() {
    assert_eq!(
        source_kinds("n = 10 // 3"),
        vec![
            TokenKind::Id,
            TokenKind::OpAssign,
            TokenKind::NumLiteral,
            TokenKind::OpIntDiv,
            TokenKind::NumLiteral,
        ]
    );
    assert_eq!(source_kinds("// comment"), vec![TokenKind::CommentSingle]);
}

#[test]
fn e4_int_div_expression_infers_number() {
    let src = "start\nnumber n = 10 // 3\nend\n";
    let tokens = tokenize(src);
    let result = analyze(&tokens);
    assert!(result.success, "errors: {:?}", result.errors);
}

// -- E5: illegal semicolon ---------------------------------------------

#[test]
fn e5_illegal_semicolon_is_a_syntax_error() {
    let src = "start\nnumber x = 1;\nend\n";
    let tokens = tokenize(src);
    let result = analyze(&tokens);
    assert!(!result.success);
    assert!(result.ast.is_none());
    assert!(result.errors.iter().any(|e| e.category == Category::Syntax));
}

// -- E6: block terminator mismatch -------------------------------------

#[test]
fn e6_block_kind_mismatch_is_a_grammar_error() {
    let src = "start\nfor i = 1 to 3\necho \"@i\"\nend if\nend\n";
    let tokens = tokenize(src);
    let result = analyze(&tokens);
    assert!(!result.success);
    assert!(result.ast.is_none());
    assert!(result
        .errors
        .iter()
        .any(|e| e.category == Category::Grammar && e.message.contains("for")));
}

// -- boundary: identifier length ----------------------------------------

#[test]
fn identifier_of_length_64_is_accepted() {
    let name = "a".repeat(64);
    let src = format!("start\nnumber {name} = 1\nend\n");
    let tokens = tokenize(&src);
    let result = analyze(&tokens);
    assert!(result.success, "errors: {:?}", result.errors);
}

#[test]
fn identifier_of_length_65_is_a_semantic_error() {
    let name = "a".repeat(65);
    let src = format!("start\nnumber {name} = 1\nend\n");
    let tokens = tokenize(&src);
    let result = analyze(&tokens);
    assert!(!result.success);
    assert!(result.errors.iter().any(|e| e.category == Category::Semantic));
}

// -- boundary: do-while vs nested while in the same program --------------

#[test]
fn do_while_and_plain_while_coexist_in_one_program() {
    let src = "start\n\
        number i = 0\n\
        do\n\
        i = i + 1\n\
        while i < 3 end do\n\
        number j = 0\n\
        while j < 3\n\
        j = j + 1\n\
        end while\n\
        end\n";
    let tokens = tokenize(src);
    let result = analyze(&tokens);
    assert!(result.success, "errors: {:?}", result.errors);
    let ast = result.ast.unwrap();
    assert_eq!(ast.statements.len(), 4);
    assert!(matches!(ast.statements[1], echo_front::ast::Stmt::DoWhile(_)));
    assert!(matches!(ast.statements[3], echo_front::ast::Stmt::While(_)));
}

// -- universal properties -------------------------------------------------

#[test]
fn determinism_across_repeated_calls() {
    let src = "start\nnumber x = 1\necho x\nend\n";
    let tokens_a = tokenize(src);
    let tokens_b = tokenize(src);
    assert_eq!(tokens_a, tokens_b);
    let (errors_a, _) = {
        let r = analyze(&tokens_a);
        (r.errors, r.warnings)
    };
    let (errors_b, _) = {
        let r = analyze(&tokens_b);
        (r.errors, r.warnings)
    };
    assert_eq!(errors_a, errors_b);
}

#[test]
fn position_monotonicity_holds_across_a_full_program() {
    let src = "start\nnumber x = 1\nif x > 0\necho x\nend if\nend\n";
    let tokens = tokenize(src);
    let mut last = (0usize, 0usize);
    for t in &tokens {
        assert!((t.line, t.column) >= last);
        last = (t.line, t.column);
    }
}

#[test]
fn root_is_always_a_program_node_when_analysis_succeeds() {
    let src = "start\necho \"ok\"\nend\n";
    let tokens = tokenize(src);
    let result = analyze(&tokens);
    assert!(result.ast_valid);
    assert!(result.ast.is_some());
}

#[test]
fn error_gating_matches_success_and_ast_presence() {
    for src in [
        "start\necho \"ok\"\nend\n",
        "start\nnumber x = 1;\nend\n",
        "start\nif 1 > 0\necho \"a\"\nend\n",
    ] {
        let tokens = tokenize(src);
        let result = analyze(&tokens);
        assert_eq!(result.success, result.errors.is_empty());
        assert_eq!(result.success, result.ast.is_some());
    }
}

#[test]
fn repeated_identical_messages_at_distinct_positions_are_not_deduped() {
    let src = "start\necho x\necho x\nend\n";
    let tokens = tokenize(src);
    let result = analyze(&tokens);
    // two distinct `echo x` statements, at different positions, so both
    // reference errors survive even though the message text repeats; only
    // an identical (line, column, message) triple would be collapsed.
    assert_eq!(
        result
            .errors
            .iter()
            .filter(|e| e.category == Category::Reference)
            .count(),
        2
    );
}

#[test]
fn termination_on_a_deeply_nested_expression_without_stack_overflow() {
    let mut expr = String::from("1");
    for _ in 0..2000 {
        expr = format!("({expr})");
    }
    let src = format!("start\nnumber x = {expr}\nend\n");
    let tokens = tokenize(&src);
    // must return rather than blow the stack; depth guard caps recursion.
    let result = analyze_with_config(&tokens, ParserConfig::default());
    assert!(!result.success);
}

#[test]
fn termination_on_deeply_nested_if_blocks_without_stack_overflow() {
    let depth = ParserConfig::default().max_depth + 50;
    let mut src = String::from("start\n");
    for _ in 0..depth {
        src.push_str("if 1 > 0\n");
    }
    src.push_str("echo \"x\"\n");
    for _ in 0..depth {
        src.push_str("end if\n");
    }
    src.push_str("end\n");
    let tokens = tokenize(&src);
    // must return gracefully rather than blow the stack; the statement-list
    // depth guard caps block nesting the same way the expression guard caps
    // parenthesis nesting.
    let result = analyze_with_config(&tokens, ParserConfig::default());
    assert!(!result.success);
    assert!(result
        .errors
        .iter()
        .any(|e| e.category == Category::Grammar));
}

#[test]
fn termination_on_deeply_nested_for_blocks_without_stack_overflow() {
    let depth = ParserConfig::default().max_depth + 50;
    let mut src = String::from("start\n");
    for _ in 0..depth {
        src.push_str("for i = 1 to 3\n");
    }
    src.push_str("echo \"x\"\n");
    for _ in 0..depth {
        src.push_str("end for\n");
    }
    src.push_str("end\n");
    let tokens = tokenize(&src);
    let result = analyze_with_config(&tokens, ParserConfig::default());
    assert!(!result.success);
}

#[test]
fn empty_source_analyzes_as_missing_start_and_end() {
    let tokens = tokenize("");
    assert!(tokens.is_empty());
    let result = analyze(&tokens);
    assert!(!result.success);
    assert!(result.ast.is_none());
}

#[test]
fn whitespace_and_comments_only_source_is_still_missing_start() {
    let tokens = tokenize("   \n// just a comment\n/* and a block */\n");
    let result = analyze(&tokens);
    assert!(!result.success);
}
