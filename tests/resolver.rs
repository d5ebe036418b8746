use pretty_assertions::assert_eq;

use rox::ast::ExprId;
use rox::interpreter::Interpreter;
use rox::parser::Parser;
use rox::resolver::Resolver;
use rox::scanner::scan;

/// Resolve `source` and return the interpreter holding the distance table.
fn resolve(source: &str) -> Result<Interpreter, Vec<String>> {
    let (tokens, lex_errors) = scan(source);
    assert!(lex_errors.is_empty());

    let statements = Parser::new(tokens).parse().expect("source parses");

    let mut interpreter = Interpreter::new();
    Resolver::new(&mut interpreter)
        .resolve(&statements)
        .map_err(|errors| errors.iter().map(|e| e.to_string()).collect::<Vec<_>>())?;

    Ok(interpreter)
}

fn resolve_errors(source: &str) -> Vec<String> {
    match resolve(source) {
        Ok(_) => panic!("expected resolution errors for {:?}", source),
        Err(errors) => errors,
    }
}

#[test]
fn globals_are_not_recorded() {
    let interpreter = resolve("var a = 1; print a;").expect("resolves");
    assert_eq!(interpreter.resolved_depth(ExprId(0)), None);
}

#[test]
fn block_local_distance_counts_scopes() {
    // `a` is read one block inside the block that declares it.
    let interpreter = resolve("{ var a = 1; { print a; } }").expect("resolves");
    assert_eq!(interpreter.resolved_depth(ExprId(0)), Some(1));
}

#[test]
fn same_name_different_nodes_different_distances() {
    let interpreter = resolve("{ var a = 1; print a; { var a = 2; { print a; } } }")
        .expect("resolves");

    assert_eq!(interpreter.resolved_depth(ExprId(0)), Some(0));
    assert_eq!(interpreter.resolved_depth(ExprId(1)), Some(1));
}

#[test]
fn closure_reads_enclosing_parameter() {
    let interpreter =
        resolve("fun outer(x) { fun inner() { return x; } return inner; }").expect("resolves");

    // ids: `x` inside inner (0), `inner` in the return (1)
    assert_eq!(interpreter.resolved_depth(ExprId(0)), Some(1));
    assert_eq!(interpreter.resolved_depth(ExprId(1)), Some(0));
}

#[test]
fn this_resolves_to_the_class_scope() {
    let interpreter = resolve("class A { m() { return this; } }").expect("resolves");
    assert_eq!(interpreter.resolved_depth(ExprId(0)), Some(1));
}

#[test]
fn assignment_target_is_resolved() {
    let interpreter = resolve("fun f() { var n = 0; n = n + 1; }").expect("resolves");

    // ids: discarded target (0), `n` read (1), assignment (2)
    assert_eq!(interpreter.resolved_depth(ExprId(0)), None);
    assert_eq!(interpreter.resolved_depth(ExprId(1)), Some(0));
    assert_eq!(interpreter.resolved_depth(ExprId(2)), Some(0));
}

#[test]
fn global_self_reference_is_left_to_runtime() {
    assert!(resolve("var a = a;").is_ok());
}

#[test]
fn local_self_reference_in_initializer() {
    assert_eq!(
        resolve_errors("{ var a = a; }"),
        vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
    );
}

#[test]
fn duplicate_local_declaration() {
    assert_eq!(
        resolve_errors("fun f(a) { var a = 1; }\n{ var b; var b; }"),
        vec![
            "[line 1] Error at 'a': Already a variable with this name in this scope.",
            "[line 2] Error at 'b': Already a variable with this name in this scope.",
        ]
    );
}

#[test]
fn misplaced_return_and_this_are_all_reported() {
    assert_eq!(
        resolve_errors("return 1;\nprint this;\nfun f() { return this; }"),
        vec![
            "[line 1] Error at 'return': Can't return from top-level code.",
            "[line 2] Error at 'this': Can't use 'this' outside of a class.",
            "[line 3] Error at 'this': Can't use 'this' outside of a class.",
        ]
    );
}

#[test]
fn return_inside_method_is_allowed() {
    assert!(resolve("class A { m() { return 1; } }").is_ok());
}
