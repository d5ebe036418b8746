use std::io::Write;

use assert_cmd::Command;
use tempfile::NamedTempFile;

fn source_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write source");
    file
}

fn rox() -> Command {
    Command::cargo_bin("rox").expect("binary is built")
}

#[test]
fn run_prints_program_output() {
    let file = source_file("var greeting = \"hello\";\nprint greeting + \" world\";\nprint 3 / 2;\n");

    rox()
        .arg("run")
        .arg(file.path())
        .assert()
        .success()
        .stdout("hello world\n1.5\n");
}

#[test]
fn run_reports_compile_errors_with_65() {
    let file = source_file("print 1 +;\nvar = 2;\n");

    rox()
        .arg("run")
        .arg(file.path())
        .assert()
        .code(65)
        .stdout("")
        .stderr(
            "[line 1] Error at ';': Expect expression.\n\
             [line 2] Error at '=': Expect variable name.\n",
        );
}

#[test]
fn run_reports_runtime_error_with_70() {
    let file = source_file("print \"before\";\nprint nope;\n");

    rox()
        .arg("run")
        .arg(file.path())
        .assert()
        .code(70)
        .stdout("before\n")
        .stderr("[line 2] Runtime error: Undefined variable 'nope'.\n");
}

#[test]
fn malformed_command_line_exits_with_64() {
    rox().arg("run").assert().code(64);
    rox().arg("frobnicate").assert().code(64);
}

#[test]
fn missing_file_is_an_error() {
    rox()
        .arg("run")
        .arg("does/not/exist.lox")
        .assert()
        .failure();
}

#[test]
fn tokenize_prints_one_token_per_line() {
    let file = source_file("var x = 12;");

    rox()
        .arg("tokenize")
        .arg(file.path())
        .assert()
        .success()
        .stdout("VAR var null\nIDENTIFIER x null\nEQUAL = null\nNUMBER 12 12.0\nSEMICOLON ; null\nEOF  null\n");
}

#[test]
fn tokenize_reports_lexical_errors_and_keeps_going() {
    let file = source_file("(\n$)");

    rox()
        .arg("tokenize")
        .arg(file.path())
        .assert()
        .code(65)
        .stdout("LEFT_PAREN ( null\nRIGHT_PAREN ) null\nEOF  null\n")
        .stderr("[line 2] Error: Unexpected character: $\n");
}

#[test]
fn tokenize_as_json() {
    let file = source_file("print \"hi\";");

    let output = rox()
        .args(["tokenize", "--json"])
        .arg(file.path())
        .output()
        .expect("runs");

    assert!(output.status.success());

    let tokens: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let tokens = tokens.as_array().expect("an array of tokens");

    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[1]["lexeme"], "\"hi\"");
    assert_eq!(tokens[3]["line"], 1);
}

#[test]
fn parse_prints_syntax_tree() {
    let file = source_file("print 1 + 2;\nvar a = (3);");

    rox()
        .arg("parse")
        .arg(file.path())
        .assert()
        .success()
        .stdout("(print (+ 1.0 2.0))\n(var a (group 3.0))\n");
}

#[test]
fn evaluate_prints_expression_value() {
    let file = source_file("(1 + 2) * 4");

    rox()
        .arg("evaluate")
        .arg(file.path())
        .assert()
        .success()
        .stdout("12\n");

    let file = source_file("-\"a\"");

    rox()
        .arg("evaluate")
        .arg(file.path())
        .assert()
        .code(70)
        .stderr("[line 1] Runtime error: Operand must be a number.\n");
}

#[test]
fn repl_continues_after_errors() {
    let output = rox()
        .arg("repl")
        .write_stdin("var a = 1;\nprint a +;\nprint nope;\nprint a + 1;\n")
        .output()
        .expect("runs");

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(stdout.contains('2'), "stdout: {}", stdout);
    assert!(stderr.contains("[line 1] Error at ';': Expect expression."));
    assert!(stderr.contains("[line 1] Runtime error: Undefined variable 'nope'."));
}
