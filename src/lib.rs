//! loxwalk is a tree-walking interpreter for Lox, a small dynamically typed
//! language with lexical scoping, first-class functions, and closures.
//!
//! ## Scanning
//! The first step is scanning: turning source text into a flat list of
//! tokens. Implemented in [`scanner`] over a `peekmore`-buffered character
//! iterator. Scan errors (an unterminated string, an unexpected character)
//! are reported as soon as they're found and scanning continues, so a
//! single run can surface more than one mistake.
//!
//! ## Parsing
//! The token list is turned into an AST by the recursive-descent parser in
//! [`parser`]. [`Expr`](expr::Expr) nodes produce a value; [`Stmt`](stmt::Stmt)
//! nodes perform an action. A `ParseError` triggers synchronization to the
//! next statement boundary rather than aborting the whole parse.
//!
//! ## Resolving
//! [`resolver`] walks the AST once, before execution, and records how many
//! lexical scopes separate each variable reference from its binding. This
//! is what makes closures behave correctly even when a later block shadows
//! an outer variable of the same name.
//!
//! ## Interpreting
//! [`interpreter`] walks the AST and evaluates it, consulting the
//! resolver's side table to find locals and falling back to the global
//! environment otherwise. Runtime errors abort the remainder of the
//! program; `print` output goes through an injectable writer so the test
//! suite can capture it without touching stdout.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::{fs, process};

pub mod ast;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// The crate's top-level driver. Owns one [`Interpreter`] for the lifetime
/// of the process so that declarations typed at the REPL accumulate in the
/// same global environment across lines.
#[allow(non_camel_case_types)]
pub struct loxwalk {
    interpreter: Interpreter,
}

impl loxwalk {
    pub fn new() -> Self {
        loxwalk { interpreter: Interpreter::new() }
    }

    /// Builds a driver whose `print` output is captured into `output`
    /// instead of going to stdout. Used by the test suite.
    pub fn with_output(output: Rc<RefCell<dyn Write>>) -> Self {
        loxwalk { interpreter: Interpreter::with_output(output) }
    }

    /// Reads and runs a whole file, then exits the process with 65 if a
    /// compile-time error occurred, 70 if a runtime error occurred, or 0
    /// on success.
    pub fn run_file(&mut self, path: &str) {
        let contents = fs::read_to_string(path).expect("script file to be readable");

        self.run(&contents);

        if error::did_error() {
            process::exit(65);
        }
        if error::did_runtime_error() {
            process::exit(70);
        }
    }

    /// Drives an interactive prompt with line editing and persisted
    /// history. A bad line resets the error flags and does not end the
    /// session.
    pub fn run_prompt(&mut self) {
        let history_path = home::home_dir().map(|home| home.join(".loxwalk_history"));

        let mut editor = rustyline::DefaultEditor::new().expect("line editor to initialize");
        if let Some(path) = &history_path {
            let _ = editor.load_history(path);
        }

        loop {
            match editor.readline(">> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    self.run(&line);
                    error::reset_error();
                }
                Err(_) => break,
            }
        }

        if let Some(path) = &history_path {
            let _ = editor.save_history(path);
        }
    }

    fn run(&mut self, source: &str) {
        let tokens = Scanner::new(source).scan_tokens();

        if error::did_error() {
            return;
        }

        let statements = Parser::new(tokens).parse();

        if error::did_error() {
            return;
        }

        Resolver::new(&mut self.interpreter).resolve(&statements);

        if error::did_error() {
            return;
        }

        self.interpreter.interpret(&statements);
    }
}

impl Default for loxwalk {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs `source` through the full pipeline and returns what it printed,
/// without touching stdout or process exit codes. The harness the test
/// suite uses to exercise end-to-end behavior.
pub fn run_capturing(source: &str) -> (String, bool, bool) {
    error::reset_error();
    let output = Rc::new(RefCell::new(Vec::new()));
    let mut lox = loxwalk::with_output(Rc::clone(&output) as Rc<RefCell<dyn Write>>);
    lox.run(source);
    let printed = String::from_utf8(output.borrow().clone()).expect("print output to be valid UTF-8");
    (printed, error::did_error(), error::did_runtime_error())
}
