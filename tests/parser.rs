use pretty_assertions::assert_eq;

use rox::ast::{Expr, Stmt};
use rox::ast_printer::AstPrinter;
use rox::parser::Parser;
use rox::scanner::scan;

fn parse(source: &str) -> Result<Vec<Stmt>, Vec<String>> {
    let (tokens, lex_errors) = scan(source);
    assert!(lex_errors.is_empty(), "unexpected lexical errors: {:?}", lex_errors);

    Parser::new(tokens)
        .parse()
        .map_err(|errors| errors.iter().map(|e| e.to_string()).collect())
}

fn printed(source: &str) -> Vec<String> {
    parse(source)
        .expect("source parses")
        .iter()
        .map(AstPrinter::print_stmt)
        .collect()
}

fn parse_errors(source: &str) -> Vec<String> {
    parse(source).expect_err("source should not parse")
}

#[test]
fn operator_precedence() {
    assert_eq!(printed("1 + 2 * 3;"), vec!["(; (+ 1.0 (* 2.0 3.0)))"]);
    assert_eq!(printed("(1 + 2) * 3;"), vec!["(; (* (group (+ 1.0 2.0)) 3.0))"]);
    assert_eq!(printed("-!x;"), vec!["(; (- (! x)))"]);
    assert_eq!(
        printed("a == b < c - d / e;"),
        vec!["(; (== a (< b (- c (/ d e)))))"]
    );
}

#[test]
fn logical_operators_bind_looser_than_equality() {
    assert_eq!(printed("x or y and z;"), vec!["(; (or x (and y z)))"]);
    assert_eq!(printed("a == b or c;"), vec!["(; (or (== a b) c))"]);
}

#[test]
fn assignment_is_right_associative() {
    assert_eq!(printed("a = b = 1;"), vec!["(; (= a (= b 1.0)))"]);
}

#[test]
fn property_assignment_becomes_set() {
    assert_eq!(
        printed("point.x = 3;"),
        vec!["(; (= (. point x) 3.0))"]
    );
}

#[test]
fn calls_and_property_access_chain_left_to_right() {
    assert_eq!(printed("a.b(c).d;"), vec!["(; (. (call (. a b) c) d))"]);
    assert_eq!(printed("f()(1, 2);"), vec!["(; (call (call f) 1.0 2.0))"]);
}

#[test]
fn for_loop_is_desugared_into_while() {
    assert_eq!(
        printed("for (var i = 0; i < 3; i = i + 1) print i;"),
        vec!["(block (var i 0.0) (while (< i 3.0) (block (print i) (; (= i (+ i 1.0))))))"]
    );
    assert_eq!(printed("for (;;) {}"), vec!["(while true (block))"]);
}

#[test]
fn class_methods_omit_fun_keyword() {
    assert_eq!(
        printed("class Point { norm() { return this.x; } move(dx, dy) {} }"),
        vec!["(class Point (method norm() (return (. this x))) (method move(dx dy)))"]
    );
}

#[test]
fn declarations() {
    assert_eq!(
        printed("var a; var b = \"hi\"; fun add(x, y) { return x + y; }"),
        vec![
            "(var a)",
            "(var b hi)",
            "(fun add(x y) (return (+ x y)))",
        ]
    );
}

#[test]
fn if_else_binds_to_nearest_if() {
    assert_eq!(
        printed("if (a) if (b) print 1; else print 2;"),
        vec!["(if a (if b (print 1.0) (print 2.0)))"]
    );
}

#[test]
fn resolvable_expressions_get_distinct_ids() {
    let statements = parse("a; a;").expect("parses");

    let ids: Vec<_> = statements
        .iter()
        .map(|stmt| match stmt {
            Stmt::Expression(Expr::Variable { id, .. }) => *id,
            other => panic!("unexpected statement {:?}", other),
        })
        .collect();

    assert_ne!(ids[0], ids[1]);
}

#[test]
fn two_errors_around_a_valid_statement() {
    assert_eq!(
        parse_errors("print 1 +;\nprint 2;\nvar = 3;"),
        vec![
            "[line 1] Error at ';': Expect expression.",
            "[line 3] Error at '=': Expect variable name.",
        ]
    );
}

#[test]
fn error_at_end_of_input() {
    assert_eq!(
        parse_errors("print 1"),
        vec!["[line 1] Error at end: Expect ';' after value."]
    );
}

#[test]
fn invalid_assignment_target() {
    assert_eq!(
        parse_errors("1 = 2;\na + b = c;"),
        vec![
            "[line 1] Error at '=': Invalid assignment target.",
            "[line 2] Error at '=': Invalid assignment target.",
        ]
    );
}

#[test]
fn too_many_arguments_is_reported_but_parsing_continues() {
    let args = vec!["1"; 256].join(", ");
    let source = format!("f({});\nprint;", args);

    let errors = parse_errors(&source);

    assert_eq!(errors.len(), 2);
    assert!(errors[0].ends_with("Can't have more than 255 arguments."));
    assert_eq!(errors[1], "[line 2] Error at ';': Expect expression.");
}

#[test]
fn too_many_parameters() {
    let params: Vec<String> = (0..256).map(|i| format!("p{}", i)).collect();
    let source = format!("fun f({}) {{}}", params.join(", "));

    let errors = parse_errors(&source);

    assert_eq!(
        errors,
        vec!["[line 1] Error at 'p255': Can't have more than 255 parameters."]
    );
}

#[test]
fn unclosed_block() {
    assert_eq!(
        parse_errors("{ print 1;"),
        vec!["[line 1] Error at end: Expect '}' after block."]
    );
}

#[test]
fn single_expression_entry_point() {
    let (tokens, _) = scan("(1 + 2) * 4");
    let expr = Parser::new(tokens).parse_expression().expect("expression");
    assert_eq!(AstPrinter::print(&expr), "(* (group (+ 1.0 2.0)) 4.0)");

    let (tokens, _) = scan("1 2");
    let errors = Parser::new(tokens).parse_expression().unwrap_err();
    assert_eq!(
        errors[0].to_string(),
        "[line 1] Error at '2': Expect end of expression."
    );
}
