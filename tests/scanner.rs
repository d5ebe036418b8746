use rox::scanner::*;
use rox::token::*;

fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
    let scanner = Scanner::new(source);
    let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

    assert_eq!(tokens.len(), expected.len());

    for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
        assert_eq!(actual.token_type, *expected_type);
        assert_eq!(actual.lexeme, *expected_lexeme);
    }
}

#[test]
fn symbols() {
    assert_token_sequence(
        "({*.,+*})",
        &[
            (TokenType::LEFT_PAREN, "("),
            (TokenType::LEFT_BRACE, "{"),
            (TokenType::STAR, "*"),
            (TokenType::DOT, "."),
            (TokenType::COMMA, ","),
            (TokenType::PLUS, "+"),
            (TokenType::STAR, "*"),
            (TokenType::RIGHT_BRACE, "}"),
            (TokenType::RIGHT_PAREN, ")"),
            (TokenType::EOF, ""),
        ],
    );
}

#[test]
fn two_character_operators() {
    assert_token_sequence(
        "! != = == < <= > >= /",
        &[
            (TokenType::BANG, "!"),
            (TokenType::BANG_EQUAL, "!="),
            (TokenType::EQUAL, "="),
            (TokenType::EQUAL_EQUAL, "=="),
            (TokenType::LESS, "<"),
            (TokenType::LESS_EQUAL, "<="),
            (TokenType::GREATER, ">"),
            (TokenType::GREATER_EQUAL, ">="),
            (TokenType::SLASH, "/"),
            (TokenType::EOF, ""),
        ],
    );
}

#[test]
fn keywords_and_identifiers() {
    assert_token_sequence(
        "class fun var orchid or _x this",
        &[
            (TokenType::CLASS, "class"),
            (TokenType::FUN, "fun"),
            (TokenType::VAR, "var"),
            (TokenType::IDENTIFIER, "orchid"),
            (TokenType::OR, "or"),
            (TokenType::IDENTIFIER, "_x"),
            (TokenType::THIS, "this"),
            (TokenType::EOF, ""),
        ],
    );
}

#[test]
fn numbers_have_no_sign_or_trailing_dot() {
    let (tokens, errors) = scan("-12.5 7. .5");
    assert!(errors.is_empty());

    let kinds: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    assert_eq!(
        kinds,
        vec![
            "MINUS - null",
            "NUMBER 12.5 12.5",
            "NUMBER 7 7.0",
            "DOT . null",
            "DOT . null",
            "NUMBER 5 5.0",
            "EOF  null",
        ]
    );
}

#[test]
fn string_literal_spans_lines() {
    let (tokens, errors) = scan("\"one\ntwo\" x");
    assert!(errors.is_empty());

    assert_eq!(tokens[0].token_type, TokenType::STRING(String::new()));
    match &tokens[0].token_type {
        TokenType::STRING(s) => assert_eq!(s, "one\ntwo"),
        other => panic!("expected string, got {:?}", other),
    }
    assert_eq!(tokens[1].lexeme, "x");
    assert_eq!(tokens[1].line, 2);
}

#[test]
fn comments_and_newlines_are_skipped() {
    let (tokens, errors) = scan("// nothing here\nprint 1; // trailing\n\n");
    assert!(errors.is_empty());

    assert_eq!(tokens[0].token_type, TokenType::PRINT);
    assert_eq!(tokens[0].line, 2);

    let eof = tokens.last().expect("always an EOF token");
    assert_eq!(eof.token_type, TokenType::EOF);
    assert_eq!(eof.line, 4);
}

#[test]
fn unexpected_chars_do_not_stop_scanning() {
    let source = ",.$(#";
    let results: Vec<_> = Scanner::new(source).collect();

    // COMMA, DOT, error, LEFT_PAREN, error, EOF
    assert_eq!(results.len(), 6, "Expected 6 items in result");

    assert!(matches!(&results[0], Ok(t) if t.token_type == TokenType::COMMA));
    assert!(matches!(&results[1], Ok(t) if t.token_type == TokenType::DOT));
    assert!(matches!(&results[3], Ok(t) if t.token_type == TokenType::LEFT_PAREN));
    assert!(matches!(&results[5], Ok(t) if t.token_type == TokenType::EOF));

    let errors: Vec<String> = results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .map(|e| e.to_string())
        .collect();

    assert_eq!(
        errors,
        vec![
            "[line 1] Error: Unexpected character: $",
            "[line 1] Error: Unexpected character: #",
        ]
    );
}

#[test]
fn non_ascii_character_reported_once() {
    let (tokens, errors) = scan("a é b");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "[line 1] Error: Unexpected character: é");
    assert_eq!(tokens.len(), 3);
}

#[test]
fn unterminated_string() {
    let (tokens, errors) = scan("print \"oops\n");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "[line 2] Error: Unterminated string.");
    assert_eq!(tokens.last().map(|t| t.line), Some(2));
}

#[test]
fn scanner_is_fused_after_eof() {
    let mut scanner = Scanner::new("x");
    assert!(scanner.next().is_some());
    assert!(scanner.next().is_some());
    assert!(scanner.next().is_none());
    assert!(scanner.next().is_none());
}
