use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use rox::ast_printer::AstPrinter;
use rox::error::LoxError;
use rox::interpreter::Interpreter;
use rox::parser::Parser;
use rox::scanner::scan;
use rox::Lox;

/// Exit code for a malformed command line.
const EXIT_USAGE: i32 = 64;
/// Exit code when any lexical, syntax or resolution error was reported.
const EXIT_COMPILE: i32 = 65;
/// Exit code when execution stopped on a run‑time error.
const EXIT_RUNTIME: i32 = 70;

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Option<Commands>,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the tokens as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file as a program and prints its syntax tree
    Parse { filename: PathBuf },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs input from a file as a Lox program
    Run { filename: PathBuf },

    /// Starts an interactive session (the default without a subcommand)
    Repl,
}

/// Reads the contents of a UTF‑8 source file.
fn read_file(filename: &PathBuf) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = String::new();

    let bytes = reader
        .read_to_string(&mut buf)
        .context(format!("Failed to read file {:?} as UTF-8", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    Ok(buf)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record.module_path().unwrap_or("<unnamed>");
            let module = module.strip_prefix("rox::").unwrap_or(module);
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn report(errors: &[LoxError]) {
    for e in errors {
        debug!("Diagnostic: {:?}", e);
        eprintln!("{}", e);
    }
}

fn tokenize(filename: &PathBuf, json: bool) -> Result<i32> {
    let source = read_file(filename)?;
    let (tokens, errors) = scan(&source);

    report(&errors);

    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        for token in &tokens {
            println!("{}", token);
        }
    }

    Ok(if errors.is_empty() { 0 } else { EXIT_COMPILE })
}

fn parse(filename: &PathBuf) -> Result<i32> {
    let source = read_file(filename)?;
    let (tokens, lex_errors) = scan(&source);
    report(&lex_errors);

    match Parser::new(tokens).parse() {
        Ok(statements) if lex_errors.is_empty() => {
            for stmt in &statements {
                println!("{}", AstPrinter::print_stmt(stmt));
            }
            Ok(0)
        }
        Ok(_) => Ok(EXIT_COMPILE),
        Err(errors) => {
            report(&errors);
            Ok(EXIT_COMPILE)
        }
    }
}

fn evaluate(filename: &PathBuf) -> Result<i32> {
    let source = read_file(filename)?;
    let (tokens, lex_errors) = scan(&source);
    report(&lex_errors);

    let expr = match Parser::new(tokens).parse_expression() {
        Ok(expr) if lex_errors.is_empty() => expr,
        Ok(_) => return Ok(EXIT_COMPILE),
        Err(errors) => {
            report(&errors);
            return Ok(EXIT_COMPILE);
        }
    };

    let mut interpreter = Interpreter::new();
    match interpreter.evaluate(&expr) {
        Ok(value) => {
            debug!("Evaluated to: {}", value);
            println!("{}", value);
            Ok(0)
        }
        Err(e) => {
            report(std::slice::from_ref(&e));
            Ok(EXIT_RUNTIME)
        }
    }
}

fn run(filename: &PathBuf) -> Result<i32> {
    let source = read_file(filename)?;
    let mut lox = Lox::new();

    match lox.run(&source) {
        Ok(()) => {
            info!("Program executed successfully");
            Ok(0)
        }
        Err(e) => {
            report(e.diagnostics());
            Ok(e.exit_code())
        }
    }
}

fn repl() -> Result<i32> {
    info!("Starting interactive session");

    let mut editor = DefaultEditor::new().context("Failed to initialise line editor")?;
    let mut lox = Lox::new();

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                editor.add_history_entry(line.as_str())?;

                // Each line is judged on its own; a failure does not carry over.
                if let Err(e) = lox.run(&line) {
                    report(e.diagnostics());
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(0)
}

fn main() -> Result<()> {
    let args: Cli = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_USAGE } else { 0 };
            e.print()?;
            std::process::exit(code);
        }
    };

    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let code = match &args.commands {
        Some(Commands::Tokenize { filename, json }) => tokenize(filename, *json)?,
        Some(Commands::Parse { filename }) => parse(filename)?,
        Some(Commands::Evaluate { filename }) => evaluate(filename)?,
        Some(Commands::Run { filename }) => run(filename)?,
        Some(Commands::Repl) | None => repl()?,
    };

    if code != 0 {
        debug!("Exiting with code {}", code);
        std::process::exit(code);
    }

    Ok(())
}
