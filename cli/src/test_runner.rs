//! Batch runner for `.lit.md` documents.
//!
//! A test file is a literate document with TOML frontmatter naming the
//! parser to use and what counts as success. The document is replayed
//! without pauses against a fresh environment; by default it passes
//! when every chunk's captured output matches its recorded expectation.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use interpreter::{LiterateSession, ScriptedReader};

use crate::registry;

#[derive(Debug, Deserialize)]
pub struct TestConfig {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    /// Document parser name. Defaults to "transcript".
    #[serde(default = "default_parser")]
    pub parser: String,

    /// Environment driver to preload, if any.
    #[serde(default)]
    pub driver: Option<String>,

    /// If false, mismatches are tolerated; the test only checks that
    /// the document replays to the end.
    #[serde(default = "default_true")]
    pub require_clean: bool,

    /// If true, the test expects document parsing to fail.
    #[serde(default)]
    pub expect_parse_error: bool,
}

fn default_parser() -> String {
    "transcript".to_string()
}

fn default_true() -> bool {
    true
}

/// Parse a `.lit.md` file into its TOML config and document source.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}'); // strip BOM

    if !content.starts_with("---") {
        return Err("missing opening --- frontmatter delimiter".into());
    }

    let after_open = &content[3..];
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let rest_start = close_pos + 4; // skip \n---
    let source = after_open[rest_start..]
        .strip_prefix("\r\n")
        .or_else(|| after_open[rest_start..].strip_prefix('\n'))
        .unwrap_or(&after_open[rest_start..]);

    let config: TestConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, source))
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

fn fail(path: &Path, description: Option<String>, reason: String) -> TestResult {
    TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Fail(reason),
    }
}

fn run_single_test(path: &Path) -> TestResult {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return fail(path, None, format!("cannot read file: {}", e)),
    };

    let (config, source) = match parse_test_file(&content) {
        Ok(pair) => pair,
        Err(e) => return fail(path, None, format!("frontmatter error: {}", e)),
    };

    let description = config.description.clone();

    let Some(parser) = registry::make_parser(&config.parser) else {
        return fail(
            path,
            description,
            format!("unknown parser '{}'", config.parser),
        );
    };

    let driver = match &config.driver {
        Some(name) => match registry::make_driver(name) {
            Some(d) => Some(d),
            None => {
                return fail(path, description, format!("unknown driver '{}'", name));
            }
        },
        None => None,
    };

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("test")
        .to_string();

    // Replay without pacing, expectations checked against a quiet sink.
    let mut session =
        LiterateSession::new(parser, Box::new(ScriptedReader::default())).with_ansi(false);
    if let Some(driver) = driver {
        session = session.with_driver(driver);
    }

    let mut sink = std::io::sink();
    let result = session.interact(source, &name, false, false, &mut sink);

    if config.expect_parse_error {
        return TestResult {
            path: path.to_path_buf(),
            description,
            outcome: match result {
                Err(interpreter::SessionError::Parse(_)) => TestOutcome::Pass,
                Err(other) => TestOutcome::Fail(format!("unexpected error: {}", other)),
                Ok(_) => TestOutcome::Fail("expected parse error, but parsing succeeded".into()),
            },
        };
    }

    let stats = match result {
        Ok(stats) => stats,
        Err(interpreter::SessionError::Parse(errors)) => {
            let msgs: Vec<String> = errors.iter().map(|e| e.message.clone()).collect();
            return fail(
                path,
                description,
                format!("unexpected parse error: {}", msgs.join("; ")),
            );
        }
        Err(other) => return fail(path, description, format!("replay failed: {}", other)),
    };

    if config.require_clean && !stats.is_clean() {
        return fail(
            path,
            description,
            format!(
                "replay not clean: {} output mismatch(es), {} error mismatch(es), {} unexpected error(s)",
                stats.output_mismatches, stats.error_mismatches, stats.unexpected_errors
            ),
        );
    }

    TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Pass,
    }
}

/// Discover `.lit.md` files under `root`, sorted by path.
fn discover(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    collect_tests(root, &mut found);
    found.sort();
    found
}

fn collect_tests(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tests(&path, out);
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.ends_with(".lit.md") {
                out.push(path);
            }
        }
    }
}

fn pass_label(no_ansi: bool) -> &'static str {
    if no_ansi { "PASS" } else { "\x1b[32mPASS\x1b[0m" }
}

fn fail_label(no_ansi: bool) -> &'static str {
    if no_ansi { "FAIL" } else { "\x1b[31mFAIL\x1b[0m" }
}

fn report(result: &TestResult, no_ansi: bool, failures: &mut Vec<(PathBuf, String)>) {
    let label = result.description.clone().unwrap_or_else(|| {
        result
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("?")
            .to_string()
    });
    match &result.outcome {
        TestOutcome::Pass => {
            eprintln!("  {}  {}", pass_label(no_ansi), label);
        }
        TestOutcome::Fail(reason) => {
            eprintln!("  {}  {}", fail_label(no_ansi), label);
            failures.push((result.path.clone(), reason.clone()));
        }
    }
}

/// Run all `.lit.md` files under `path` (or a single file).
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_ansi: bool) -> i32 {
    let files = if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        discover(path)
    };

    if files.is_empty() {
        eprintln!("no .lit.md files found in {}", path.display());
        return 1;
    }

    let mut passed = 0usize;
    let mut failures: Vec<(PathBuf, String)> = Vec::new();

    for file in &files {
        let result = run_single_test(file);
        let was_pass = matches!(result.outcome, TestOutcome::Pass);
        report(&result, no_ansi, &mut failures);
        if was_pass {
            passed += 1;
        }
    }

    eprintln!();
    if !failures.is_empty() {
        eprintln!("failures:");
        eprintln!();
        for (file, reason) in &failures {
            eprintln!("  --- {} ---", file.display());
            for line in reason.lines() {
                eprintln!("  {}", line);
            }
        }
        eprintln!();
    }

    let failed = failures.len();
    let verdict = if failed == 0 {
        if no_ansi { "ok" } else { "\x1b[32mok\x1b[0m" }
    } else if no_ansi {
        "FAILED"
    } else {
        "\x1b[31mFAILED\x1b[0m"
    };
    eprintln!(
        "test result: {}. {} passed, {} failed (of {})",
        verdict,
        passed,
        failed,
        files.len()
    );

    if failed == 0 { 0 } else { 1 }
}
