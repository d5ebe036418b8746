//! A tree‑walking interpreter for Lox: scanner → parser → resolver → interpreter.
//!
//! [`Lox`] ties the stages together.  Each call to [`Lox::run`] processes one
//! unit of source (a whole file, or one line of an interactive session)
//! against persistent global state and reports its outcome as a value.

pub mod ast;
pub mod ast_printer;
pub mod class;
pub mod environment;
pub mod error;
pub mod function;
pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod scanner;
mod stack;
pub mod token;
pub mod value;

use std::io::Write;

use log::info;

use crate::ast::ExprId;
use crate::error::RunError;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;

/// A session: one interpreter whose globals survive across runs.
pub struct Lox {
    interpreter: Interpreter,
    next_id: ExprId,
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}

impl Lox {
    pub fn new() -> Self {
        Self::from_interpreter(Interpreter::new())
    }

    /// A session whose `print` output goes to `output`.
    pub fn with_output(output: Box<dyn Write>) -> Self {
        Self::from_interpreter(Interpreter::with_output(output))
    }

    pub fn from_interpreter(interpreter: Interpreter) -> Self {
        Self {
            interpreter,
            next_id: ExprId(0),
        }
    }

    pub fn interpreter_mut(&mut self) -> &mut Interpreter {
        &mut self.interpreter
    }

    /// Scan, parse, resolve and execute `source`.
    ///
    /// Lexical and syntax errors are gathered from the whole source before
    /// giving up; resolution only runs on a clean parse; nothing executes
    /// unless both succeed.
    pub fn run(&mut self, source: &str) -> Result<(), RunError> {
        info!("Running {} bytes of source", source.len());

        let (tokens, mut errors) = scanner::scan(source);

        let mut parser = Parser::starting_at(tokens, self.next_id);
        let parsed = parser.parse();
        self.next_id = parser.next_id();

        let statements = match parsed {
            Ok(statements) if errors.is_empty() => statements,
            Ok(_) => return Err(RunError::Compile(errors)),
            Err(parse_errors) => {
                errors.extend(parse_errors);
                return Err(RunError::Compile(errors));
            }
        };

        Resolver::new(&mut self.interpreter)
            .resolve(&statements)
            .map_err(RunError::Compile)?;

        self.interpreter
            .interpret(&statements)
            .map_err(RunError::Runtime)
    }
}
