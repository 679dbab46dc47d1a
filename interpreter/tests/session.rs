use interpreter::{LiterateSession, MathDriver, ReplayStats, ScriptedReader, SessionError};
use litdoc::parser::TranscriptParser;

/// Replay `document` without pacing or ANSI, returning output and stats.
fn replay(document: &str) -> (String, ReplayStats) {
    replay_with(document, false, false, Vec::<String>::new())
}

fn replay_with(
    document: &str,
    pause: bool,
    interactive: bool,
    input: Vec<String>,
) -> (String, ReplayStats) {
    let mut session = LiterateSession::new(
        Box::new(TranscriptParser::new()),
        Box::new(ScriptedReader::new(input)),
    )
    .with_ansi(false);
    let mut output = Vec::new();
    let stats = session
        .interact(document, "demo.lit", pause, interactive, &mut output)
        .expect("replay failed");
    (String::from_utf8(output).unwrap(), stats)
}

fn banner() -> String {
    format!(
        "Literate session: demo.lit\nlitr {} on {}\n\n",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    )
}

const COMPLETE: &str = "\ndemo.lit complete! Continuing to interactive console...\n\n";

#[test]
fn clean_replay_reproduces_the_document() {
    let document = "Intro text.\n\n>>> x = 2 + 3\n>>> x\n5\n\nDone.\n";
    let (out, stats) = replay(document);
    let expected = format!(
        "{}Intro text.\n\n>>> x = 2 + 3\n>>> x\n5\n\nDone.\n{}",
        banner(),
        COMPLETE
    );
    assert_eq!(out, expected);
    assert_eq!(stats.code_chunks, 1);
    assert!(stats.is_clean());
}

#[test]
fn environment_persists_across_chunks() {
    let document = ">>> x = 10\n\nLater.\n\n>>> x * 2\n20\n";
    let (_, stats) = replay(document);
    assert!(stats.is_clean());
    assert_eq!(stats.code_chunks, 2);
}

#[test]
fn output_mismatch_is_boxed_and_counted() {
    let document = ">>> 2 + 2\n5\n";
    let (out, stats) = replay(document);
    assert_eq!(stats.output_mismatches, 1);
    assert!(!stats.is_clean());
    assert!(out.contains("Warning, output different from expected:"));
    assert!(out.contains("--- expected"));
    assert!(out.contains("+++ actual"));
    assert!(out.contains("-5"));
    assert!(out.contains("+4"));
}

#[test]
fn matched_error_shows_no_warning() {
    let document = ">>> 1 / 0\nerror: division by zero\n";
    let (out, stats) = replay(document);
    assert!(stats.is_clean());
    assert!(!out.contains("Warning"));
}

#[test]
fn matched_error_still_shows_earlier_output() {
    let document = ">>> print(\"before\")\n>>> 1 / 0\nbefore\nerror: division by zero\n";
    let (out, stats) = replay(document);
    assert!(stats.is_clean());
    assert!(out.contains("before\n"));
}

#[test]
fn unexpected_error_is_boxed_with_a_trace() {
    let document = ">>> x = 1\n>>> boom\n1\n";
    let (out, stats) = replay(document);
    assert_eq!(stats.unexpected_errors, 1);
    assert!(out.contains("Warning, unexpected exception:"));
    assert!(out.contains("error: undefined variable: boom"));
    assert!(out.contains("at <literate demo.lit[0]>, line 2"));
    assert!(out.contains("    boom"));
}

#[test]
fn wrong_error_is_boxed_as_a_mismatch() {
    let document = ">>> 1 / 0\nerror: something else\n";
    let (out, stats) = replay(document);
    assert_eq!(stats.error_mismatches, 1);
    assert!(out.contains("Warning, exception different from expected:"));
}

#[test]
fn recorded_error_that_never_happens_is_a_mismatch() {
    let document = ">>> 1 / 2\nerror: division by zero\n";
    let (out, stats) = replay(document);
    assert_eq!(stats.error_mismatches, 1);
    assert!(out.contains("Warning, expected an exception:"));
    assert!(out.contains("never occurred"));
}

#[test]
fn ellipsis_matches_any_run_of_output() {
    let document = ">>> print(\"hello brave new world\")\nhello ... world\n";
    let (_, stats) = replay(document);
    assert!(stats.is_clean());
}

#[test]
fn whitespace_differences_still_match() {
    let document = ">>> print(\"a\", \"b\")\na  b\n";
    let (_, stats) = replay(document);
    assert!(stats.is_clean());
}

#[test]
fn chunk_without_expectations_never_mismatches() {
    let document = ">>> 40 + 2\n";
    let (out, stats) = replay(document);
    assert!(stats.is_clean());
    assert!(out.contains("42\n"));
}

#[test]
fn parse_errors_abort_before_any_execution() {
    let mut session = LiterateSession::new(
        Box::new(TranscriptParser::new()),
        Box::new(ScriptedReader::default()),
    )
    .with_ansi(false);
    let mut output = Vec::new();
    let result = session.interact(">>>broken\n", "demo.lit", false, false, &mut output);
    match result {
        Err(SessionError::Parse(errors)) => assert_eq!(errors.len(), 1),
        other => panic!("expected parse errors, got {:?}", other.map(|_| ())),
    }
    assert!(output.is_empty());
}

#[test]
fn paced_mode_announces_and_cues() {
    let document = "Intro.\n\n>>> x = 1\n\nDone.\n";
    let (out, stats) = replay_with(document, true, false, vec![String::new()]);
    assert!(stats.is_clean());
    assert!(out.contains("Press enter to continue after a code block"));
    // The cue prompt after the code chunk.
    assert!(out.contains(">>> x = 1\n>>> \n"));
    assert!(out.contains("Done.\n"));
}

#[test]
fn end_of_input_during_a_pause_ends_the_session_early() {
    let document = "Intro.\n\n>>> x = 1\n\nNever shown.\n";
    let (out, _) = replay_with(document, true, false, Vec::new());
    assert!(!out.contains("Never shown."));
    assert!(!out.contains("complete!"));
}

#[test]
fn interactive_pause_opens_a_console_on_the_live_environment() {
    let document = ">>> x = 40\n\nAfter.\n";
    let input = vec![
        "x + 2".to_string(),
        String::new(),
        String::new(),
    ];
    let (out, stats) = replay_with(document, true, true, input);
    assert!(stats.is_clean());
    assert!(out.contains("42\n"));
    assert!(out.contains("After.\n"));
}

#[test]
fn console_errors_are_reported_and_not_fatal() {
    let document = ">>> x = 1\n\nAfter.\n";
    let input = vec![
        "boom".to_string(),
        String::new(),
        String::new(),
    ];
    let (out, _) = replay_with(document, true, true, input);
    assert!(out.contains("error: undefined variable: boom"));
    assert!(out.contains("at <input>, line 1"));
    assert!(out.contains("After.\n"));
}

#[test]
fn trailing_console_runs_after_completion() {
    let document = ">>> x = 2\n";
    let input = vec!["x * 3".to_string()];
    let (out, _) = replay_with(document, false, false, input);
    let complete_pos = out.find("complete!").expect("completion banner");
    let echo_pos = out.find("6\n").expect("console output");
    assert!(echo_pos > complete_pos);
}

#[test]
fn trailing_console_ignores_blank_lines() {
    // Blank lines only exit the mid-document consoles; the end-of-document
    // console runs until end of input.
    let document = ">>> x = 2\n";
    let input = vec![String::new(), String::new(), "5 + 5".to_string()];
    let (out, _) = replay_with(document, false, false, input);
    assert!(out.contains("10\n"));
}

#[test]
fn blank_separator_between_samples_is_a_pause_boundary() {
    let document = ">>> a = 1\n\n>>> b = 2\n";

    // No input: the pause at the separator ends the session before the
    // second sample.
    let (out, stats) = replay_with(document, true, false, Vec::new());
    assert_eq!(stats.code_chunks, 1);
    assert!(!out.contains(">>> b = 2"));

    // One enter carries the session across the separator.
    let (out, stats) = replay_with(document, true, false, vec![String::new()]);
    assert_eq!(stats.code_chunks, 2);
    assert!(out.contains(">>> b = 2"));
}

#[test]
fn driver_seeds_the_environment_and_banner() {
    let document = ">>> tau > 6\ntrue\n";
    let mut session = LiterateSession::new(
        Box::new(TranscriptParser::new()),
        Box::new(ScriptedReader::default()),
    )
    .with_ansi(false)
    .with_driver(Box::new(MathDriver));
    let mut output = Vec::new();
    let stats = session
        .interact(document, "demo.lit", false, false, &mut output)
        .expect("replay failed");
    let out = String::from_utf8(output).unwrap();
    assert!(stats.is_clean());
    assert!(out.starts_with("Literate session with math driver: demo.lit\n"));
    assert!(out.contains("math constants preloaded: pi, e, tau"));
}

#[test]
fn indented_samples_echo_with_their_indent() {
    let document = "Prose:\n\n    >>> x = 7\n    >>> x\n    7\n";
    let (out, stats) = replay(document);
    assert!(stats.is_clean());
    assert!(out.contains("    >>> x = 7\n    >>> x\n7\n"));
}

#[test]
fn multi_line_sample_uses_continuation_prompts() {
    let document = ">>> if 2 > 1 {\n...     print(\"yes\")\n... }\nyes\n";
    let (out, stats) = replay(document);
    assert!(stats.is_clean());
    assert!(out.contains(">>> if 2 > 1 {\n...     print(\"yes\")\n... }\nyes\n"));
}
