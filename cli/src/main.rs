mod readline;
mod registry;
mod test_runner;

use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use interpreter::{LineReader, LiterateSession, ScriptedReader, SessionError, StdinLineReader};

const SUBCOMMANDS: &[&str] = &["run", "test", "help"];

#[derive(Parser)]
#[command(name = "litr", version, about = "Literate document interpreter")]
struct Cli {
    /// Disable ANSI escape codes in all output
    #[arg(long, global = true)]
    no_ansi: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a literate document
    Run(RunArgs),

    /// Run .lit.md test files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Literate document to replay
    file: String,

    /// Document parser to use
    #[arg(short, long, default_value = "transcript")]
    parser: String,

    /// Text formatter for prose blocks (inferred from the file name if omitted)
    #[arg(short, long)]
    format: Option<String>,

    /// Environment driver to preload
    #[arg(short, long)]
    driver: Option<String>,

    /// Don't pause between blocks (implies --no-interactive)
    #[arg(long)]
    no_pause: bool,

    /// Pause for a plain enter instead of opening a console at each stop
    #[arg(long)]
    no_interactive: bool,

    /// Read pause/console input without line editing or history
    #[arg(long)]
    no_readline: bool,

    /// Parse only, don't replay (exit 0 if valid)
    #[arg(long)]
    check: bool,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .lit.md file or directory containing them
    path: String,
}

fn main() {
    // Backwards compatibility: if the first positional arg is not a known
    // subcommand, inject "run" so `litr file.lit` works like `litr run file.lit`.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(first_pos) = args.iter().skip(1).find(|a| !a.starts_with('-')) {
        let first_pos = first_pos.clone();
        if !SUBCOMMANDS.contains(&first_pos.as_str()) {
            if let Some(pos) = args.iter().position(|a| *a == first_pos) {
                args.insert(pos, "run".to_string());
            }
        }
    }

    let cli = Cli::parse_from(&args);

    match cli.command {
        Command::Run(run_args) => do_run(run_args, cli.no_ansi),
        Command::Test(test_args) => {
            let exit_code = test_runner::run_tests(Path::new(&test_args.path), cli.no_ansi);
            process::exit(exit_code);
        }
    }
}

fn do_run(args: RunArgs, no_ansi: bool) {
    let source = match std::fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.file, e);
            process::exit(1);
        }
    };

    let Some(parser) = registry::make_parser(&args.parser) else {
        eprintln!(
            "error: unknown parser '{}' (available: {})",
            args.parser,
            registry::PARSER_NAMES.join(", ")
        );
        process::exit(1);
    };

    // Styled prose needs escape codes; an explicit formatter with
    // --no-ansi is a contradiction rather than something to guess at.
    if args.format.is_some() && no_ansi {
        eprintln!("error: cannot use a formatter without ANSI escape code support");
        process::exit(1);
    }
    let formatter_name = match &args.format {
        Some(name) => Some(name.as_str()),
        None if no_ansi => None,
        None => registry::formatter_for_path(&args.file),
    };
    let formatter = match formatter_name {
        Some(name) => match registry::make_formatter(name) {
            Some(f) => f,
            None => {
                eprintln!(
                    "warning: unknown formatter '{}' (available: {}), text will not be styled",
                    name,
                    registry::FORMATTER_NAMES.join(", ")
                );
                match registry::make_formatter("none") {
                    Some(f) => f,
                    None => unreachable!("'none' is always registered"),
                }
            }
        },
        None => match registry::make_formatter("none") {
            Some(f) => f,
            None => unreachable!("'none' is always registered"),
        },
    };

    let driver = match &args.driver {
        Some(name) => match registry::make_driver(name) {
            Some(d) => Some(d),
            None => {
                eprintln!(
                    "error: unknown driver '{}' (available: {})",
                    name,
                    registry::DRIVER_NAMES.join(", ")
                );
                process::exit(1);
            }
        },
        None => None,
    };

    if args.check {
        let mut files = SimpleFiles::new();
        files.add(args.file.clone(), source.clone());
        match parser.parse(&source, &args.file) {
            Ok(chunks) => {
                let code = chunks.iter().filter(|c| c.is_code()).count();
                eprintln!(
                    "ok: {} parsed successfully ({} code chunk(s))",
                    args.file, code
                );
                return;
            }
            Err(errors) => {
                emit_parse_errors(&files, &errors, no_ansi);
                process::exit(1);
            }
        }
    }

    let pause = !args.no_pause;
    let interactive = pause && !args.no_interactive;

    let reader: Box<dyn LineReader> = if !pause {
        // No prompts will ever be shown.
        Box::new(ScriptedReader::default())
    } else if args.no_readline {
        Box::new(StdinLineReader)
    } else {
        match readline::RustylineReader::new() {
            Ok(reader) => Box::new(reader),
            Err(error) => {
                eprintln!("warning: line editing unavailable ({}), using stdin", error);
                Box::new(StdinLineReader)
            }
        }
    };

    let mut session = LiterateSession::new(parser, reader)
        .with_formatter(formatter)
        .with_ansi(!no_ansi);
    if let Some(driver) = driver {
        session = session.with_driver(driver);
    }

    let name = Path::new(&args.file)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(&args.file)
        .to_string();

    let mut stdout = std::io::stdout();
    match session.interact(&source, &name, pause, interactive, &mut stdout) {
        Ok(stats) => {
            if !stats.is_clean() {
                process::exit(1);
            }
        }
        Err(SessionError::Parse(errors)) => {
            let mut files = SimpleFiles::new();
            files.add(args.file.clone(), source);
            emit_parse_errors(&files, &errors, no_ansi);
            process::exit(1);
        }
        Err(SessionError::Io(error)) => {
            eprintln!("error: {}", error);
            process::exit(1);
        }
    }
}

fn emit_parse_errors(
    files: &SimpleFiles<String, String>,
    errors: &[litdoc::parser::ParseError],
    no_ansi: bool,
) {
    let color_choice = if no_ansi {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    for error in errors {
        let diagnostic = error.to_diagnostic();
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, &diagnostic);
    }
}
