use std::sync::atomic::{AtomicBool, Ordering};

use crate::object::Object;
use crate::token::{Token, Type};

static HAD_ERROR: AtomicBool = AtomicBool::new(false);
static HAD_RUNTIME_ERROR: AtomicBool = AtomicBool::new(false);

/// Checks if a static (scan/parse/resolve) error occurred.
pub fn did_error() -> bool {
    HAD_ERROR.load(Ordering::SeqCst)
}

/// Checks if a runtime error occurred.
pub fn did_runtime_error() -> bool {
    HAD_RUNTIME_ERROR.load(Ordering::SeqCst)
}

/// Resets both error flags. Used between REPL inputs so one bad line doesn't
/// poison the exit code of the rest of the session.
pub fn reset_error() {
    HAD_ERROR.store(false, Ordering::SeqCst);
    HAD_RUNTIME_ERROR.store(false, Ordering::SeqCst);
}

fn set_had_error() {
    HAD_ERROR.store(true, Ordering::SeqCst);
}

fn set_had_runtime_error() {
    HAD_RUNTIME_ERROR.store(true, Ordering::SeqCst);
}

/// Every error type must implement this trait.
pub trait Error {
    /// Prints the error message to stderr and sets the appropriate flag.
    fn throw(&self);
}

/// An error that occurs during scanning.
#[derive(Debug)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl Error for ScanError {
    fn throw(&self) {
        eprintln!("[line {}] Error: {}", self.line, self.message);
        set_had_error();
    }
}

/// An error that occurs during parsing.
#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl Error for ParseError {
    fn throw(&self) {
        if self.token.kind == Type::EOF {
            eprintln!("[line {}] Error at end: {}", self.token.line, self.message);
        } else {
            eprintln!(
                "[line {}] Error at '{}': {}",
                self.token.line, self.token.lexeme, self.message
            );
        }
        set_had_error();
    }
}

/// An error that occurs during the static resolution pass. Reported the same
/// way as a `ParseError` since both gate execution before it ever starts.
#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl Error for ResolveError {
    fn throw(&self) {
        eprintln!(
            "[line {}] Error at '{}': {}",
            self.token.line, self.token.lexeme, self.message
        );
        set_had_error();
    }
}

/// An error raised by the evaluator at runtime.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl Error for RuntimeError {
    fn throw(&self) {
        eprintln!("{}\n[line {}]", self.message, self.token.line);
        set_had_runtime_error();
    }
}

/// The interpreter's internal control-flow signal for unwinding a `return`
/// statement out of a function body, kept distinct from `RuntimeError` so it
/// is never mistakenly reported to the user as one.
#[derive(Debug, Clone)]
pub enum Unwind {
    Return(Object),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Unwind::Error(error)
    }
}
