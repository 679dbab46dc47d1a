use interpreter::Interpreter;

fn run(source: &str) -> String {
    let mut interp = Interpreter::new();
    let mut output = Vec::new();
    for line in source.lines() {
        interp.push(line, &mut output).expect("execution failed");
    }
    if interp.more() {
        interp.push("", &mut output).expect("execution failed");
    }
    String::from_utf8(output).unwrap()
}

fn run_trimmed(source: &str) -> String {
    run(source).trim().to_string()
}

/// Feed lines until one fails, returning the error summary.
fn run_err(source: &str) -> String {
    let mut interp = Interpreter::new();
    let mut output = Vec::new();
    for line in source.lines() {
        if let Err(error) = interp.push(line, &mut output) {
            return error.summary().trim().to_string();
        }
    }
    panic!("expected an error, got output: {:?}", output);
}

#[test]
fn arithmetic() {
    assert_eq!(run_trimmed("2 + 3"), "5");
    assert_eq!(run_trimmed("10 - 4"), "6");
    assert_eq!(run_trimmed("3 * 7"), "21");
    assert_eq!(run_trimmed("15 / 3"), "5");
    assert_eq!(run_trimmed("10 % 3"), "1");
    assert_eq!(run_trimmed("7 / 2"), "3.5");
}

#[test]
fn operator_precedence() {
    assert_eq!(run_trimmed("2 + 3 * 4"), "14");
    assert_eq!(run_trimmed("(2 + 3) * 4"), "20");
    assert_eq!(run_trimmed("2 * 3 + 4 * 5"), "26");
}

#[test]
fn unary_operators() {
    assert_eq!(run_trimmed("-5 + 10"), "5");
    assert_eq!(run_trimmed("!false"), "true");
    assert_eq!(run_trimmed("!0"), "true");
    assert_eq!(run_trimmed("!\"\""), "true");
}

#[test]
fn boolean_logic() {
    assert_eq!(run_trimmed("true && false"), "false");
    assert_eq!(run_trimmed("true || false"), "true");
    assert_eq!(run_trimmed("5 == 5"), "true");
    assert_eq!(run_trimmed("5 != 3"), "true");
    assert_eq!(run_trimmed("3 > 5"), "false");
    assert_eq!(run_trimmed("3 <= 3"), "true");
    assert_eq!(run_trimmed("\"abc\" < \"abd\""), "true");
}

#[test]
fn short_circuit_skips_the_right_side() {
    // The undefined variable would fail if evaluated.
    assert_eq!(run_trimmed("false && nope"), "false");
    assert_eq!(run_trimmed("true || nope"), "true");
}

#[test]
fn variables_persist_across_lines() {
    assert_eq!(run_trimmed("x = 42\nx"), "42");
    assert_eq!(run_trimmed("x = 5\ny = 10\nx + y"), "15");
}

#[test]
fn assignment_echoes_nothing() {
    assert_eq!(run("x = 1"), "");
}

#[test]
fn string_concatenation() {
    assert_eq!(run_trimmed("\"foo\" + \"bar\""), "foobar");
}

#[test]
fn lists_and_indexing() {
    assert_eq!(run_trimmed("[1, 2, 3]"), "[1, 2, 3]");
    assert_eq!(run_trimmed("xs = [10, 20, 30]\nxs[1]"), "20");
    assert_eq!(run_trimmed("xs = [10, 20, 30]\nxs[-1]"), "30");
    assert_eq!(run_trimmed("[[1, 2], [3]][0][1]"), "2");
}

#[test]
fn multi_line_statement_buffers_until_closed() {
    let mut interp = Interpreter::new();
    let mut output = Vec::new();
    assert!(interp.push("total = min(", &mut output).unwrap());
    assert!(interp.more());
    assert!(interp.push("    4, 9)", &mut output).is_ok_and(|more| !more));
    assert!(!interp.more());
    assert!(!interp.push("total", &mut output).unwrap());
    assert_eq!(String::from_utf8(output).unwrap(), "4\n");
}

#[test]
fn if_else() {
    assert_eq!(run_trimmed("x = 3\nif x > 2 {\n    print(\"big\")\n}"), "big");
    assert_eq!(
        run_trimmed("x = 1\nif x > 2 {\n    print(\"big\")\n} else {\n    print(\"small\")\n}"),
        "small"
    );
}

#[test]
fn else_if_chains() {
    let source = "x = 5\nif x < 3 {\n    print(\"low\")\n} else if x < 10 {\n    print(\"mid\")\n} else {\n    print(\"high\")\n}";
    assert_eq!(run_trimmed(source), "mid");
}

#[test]
fn while_loop() {
    let source = "n = 0\ntotal = 0\nwhile n < 5 {\n    total = total + n\n    n = n + 1\n}\ntotal";
    assert_eq!(run_trimmed(source), "10");
}

#[test]
fn block_bodies_do_not_echo() {
    // Bare expressions only echo at the top level.
    assert_eq!(run_trimmed("if true {\n    42\n}\n7"), "7");
}

#[test]
fn builtins() {
    assert_eq!(run_trimmed("print(\"a\", 1, [2])"), "a 1 [2]");
    assert_eq!(run_trimmed("len(\"hello\")"), "5");
    assert_eq!(run_trimmed("len([1, 2])"), "2");
    assert_eq!(run_trimmed("str(3.5) + \"!\""), "3.5!");
    assert_eq!(run_trimmed("abs(-7)"), "7");
    assert_eq!(run_trimmed("min(3, 1, 2)"), "1");
    assert_eq!(run_trimmed("max(3, 1, 2)"), "3");
    assert_eq!(run_trimmed("range(4)"), "[0, 1, 2, 3]");
    assert_eq!(run_trimmed("append([1, 2], 3)"), "[1, 2, 3]");
}

#[test]
fn append_leaves_the_original_alone() {
    assert_eq!(run_trimmed("xs = [1]\nys = append(xs, 2)\nxs"), "[1]");
}

#[test]
fn comments_are_ignored() {
    assert_eq!(run_trimmed("# a comment\nx = 1 # trailing\nx"), "1");
}

#[test]
fn string_escapes() {
    assert_eq!(run("print(\"a\\tb\")"), "a\tb\n");
    assert_eq!(run("print(\"line\\nbreak\")"), "line\nbreak\n");
    assert_eq!(run("print(\"say \\\"hi\\\"\")"), "say \"hi\"\n");
}

#[test]
fn undefined_variable() {
    assert_eq!(run_err("nope"), "error: undefined variable: nope");
}

#[test]
fn division_by_zero() {
    assert_eq!(run_err("1 / 0"), "error: division by zero");
    assert_eq!(run_err("1 % 0"), "error: division by zero");
}

#[test]
fn unknown_function() {
    assert_eq!(run_err("frobnicate(1)"), "error: unknown function: frobnicate");
}

#[test]
fn wrong_argument_count() {
    assert_eq!(run_err("len()"), "error: len takes 1 argument(s), got 0");
    assert_eq!(
        run_err("abs(1, 2)"),
        "error: abs takes 1 argument(s), got 2"
    );
}

#[test]
fn type_errors() {
    assert_eq!(
        run_err("1 + true"),
        "error: type error: expected number or string, got Boolean"
    );
    assert_eq!(
        run_err("-\"x\""),
        "error: type error: expected number, got String"
    );
    assert_eq!(
        run_err("len(5)"),
        "error: type error: expected string or list, got Number"
    );
}

#[test]
fn index_out_of_bounds() {
    assert_eq!(
        run_err("[1, 2][5]"),
        "error: index 5 out of bounds for length 2"
    );
    assert_eq!(
        run_err("[1, 2][-3]"),
        "error: index -3 out of bounds for length 2"
    );
}

#[test]
fn syntax_errors() {
    assert_eq!(
        run_err("\"unterminated"),
        "error: syntax error: unterminated string literal"
    );
    assert_eq!(run_err("1 @ 2"), "error: syntax error: unexpected character '@'");
    assert_eq!(run_err("1 +"), "error: syntax error: unexpected end of input");
}

#[test]
fn error_lines_are_chunk_relative() {
    let mut interp = Interpreter::new();
    let mut output = Vec::new();
    interp.push("x = 1", &mut output).unwrap();
    interp.push("y = 2", &mut output).unwrap();
    let error = interp.push("boom", &mut output).expect_err("should fail");
    assert_eq!(error.line, Some(3));
}

#[test]
fn buffer_resets_after_a_syntax_error() {
    let mut interp = Interpreter::new();
    let mut output = Vec::new();
    assert!(interp.push("1 @ 2", &mut output).is_err());
    assert!(!interp.more());
    assert!(!interp.push("5", &mut output).unwrap());
    assert_eq!(String::from_utf8(output).unwrap(), "5\n");
}
