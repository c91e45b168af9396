// cdecl: C/C++ declarations to and from pseudo-English

use std::env;
use std::error::Error;
use std::io::{self, BufRead, IsTerminal};
use std::path::{Path, PathBuf};

use cdecl::check::Diagnostic;
use cdecl::errors::CdeclError;
use cdecl::lang::Lang;
use cdecl::options::Options;
use cdecl::session::Session;
use clap::Parser;
use crossterm::style::{Color, Stylize};
use rustyline::config::Config;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const PROMPT: &str = "cdecl> ";

#[derive(Debug, Parser)]
#[command(name = "cdecl", version, about = "Composes and deciphers C and C++ declarations")]
struct Args {
    /// Language to parse and check declarations in
    #[arg(short = 'x', long, default_value = "c23")]
    lang: String,

    /// Print qualifiers after the type: `int const`
    #[arg(short = 'E', long)]
    east_const: bool,

    /// Do not end printed declarations with ';'
    #[arg(long)]
    no_semicolon: bool,

    /// Show typedefs as `typedef` declarations even in C++11 and later
    #[arg(long)]
    no_using: bool,

    /// Dump each parsed tree as JSON
    #[arg(long)]
    debug: bool,

    /// Configuration file of commands to run first [default: $CDECLRC or ~/.cdeclrc]
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Do not read a configuration file
    #[arg(long, conflicts_with = "config")]
    no_config: bool,

    /// Log parser and checker activity to stderr
    #[arg(short, long)]
    verbose: bool,

    /// A command to run instead of reading commands from stdin
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let filter = if args.verbose { "cdecl=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let lang = Lang::find_name(&args.lang)
        .ok_or_else(|| CdeclError::unknown_lang(&args.lang))?;
    let options = Options {
        lang,
        east_const: args.east_const,
        semicolon: !args.no_semicolon,
        using: !args.no_using,
        debug: args.debug,
    };
    let mut session = Session::with_options(options)?;
    if !args.no_config {
        if let Err(err) = read_config(&mut session, args.config.as_deref()) {
            eprintln!("{}: {err}", paint("error", Color::Red));
            std::process::exit(1);
        }
    }

    if !args.command.is_empty() {
        let step = run_line(&mut session, &args.command.join(" "), false);
        std::process::exit(if step == Step::Failed { 1 } else { 0 });
    }

    if io::stdin().is_terminal() {
        repl(&mut session)
    } else {
        // Read commands line by line; the exit status reflects any failure
        let mut failed = false;
        for line in io::stdin().lock().lines() {
            match run_line(&mut session, &line?, false) {
                Step::Done => {}
                Step::Failed => failed = true,
                Step::Quit => break,
            }
        }
        if failed {
            std::process::exit(1);
        }
        Ok(())
    }
}

/// Runs the configuration file. An explicitly given file must exist; the
/// default one is skipped if missing.
fn read_config(session: &mut Session, explicit: Option<&Path>) -> Result<(), CdeclError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match env::var_os("CDECLRC").filter(|p| !p.is_empty()) {
            Some(path) => PathBuf::from(path),
            None => match env::var_os("HOME").filter(|h| !h.is_empty()) {
                Some(home) => Path::new(&home).join(".cdeclrc"),
                None => return Ok(()),
            },
        },
    };
    if explicit.is_none() && !path.exists() {
        debug!(path = %path.display(), "no configuration file");
        return Ok(());
    }
    for warning in session.read_config(&path)? {
        report_warning(&warning);
    }
    Ok(())
}

fn repl(session: &mut Session) -> Result<(), Box<dyn Error>> {
    let config = Config::builder()
        .history_ignore_space(true)
        .history_ignore_dups(true)?
        .build();
    let mut editor = Editor::<(), DefaultHistory>::with_config(config)?;

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line)?;
                if run_line(session, line, true) == Step::Quit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Done,
    Failed,
    Quit,
}

/// Runs one line, printing its output or error.
fn run_line(session: &mut Session, line: &str, interactive: bool) -> Step {
    match session.execute(line) {
        Ok(output) => {
            for warning in &output.warnings {
                report_warning(warning);
            }
            if !output.text.is_empty() {
                println!("{}", output.text);
            }
            if output.quit {
                Step::Quit
            } else {
                Step::Done
            }
        }
        Err(err) => {
            if interactive {
                if let Some(loc) = err.location() {
                    let column = PROMPT.len() + loc.column.saturating_sub(1);
                    eprintln!("{}{}", " ".repeat(column), paint("^", Color::Green));
                }
            }
            eprintln!("{}: {err}", paint("error", Color::Red));
            Step::Failed
        }
    }
}

fn report_warning(warning: &Diagnostic) {
    eprintln!("{}: {}", paint("warning", Color::Yellow), warning.located_text());
}

/// Colors `label` only when stderr is a terminal.
fn paint(label: &str, color: Color) -> String {
    if io::stderr().is_terminal() {
        label.with(color).bold().to_string()
    } else {
        label.to_string()
    }
}
