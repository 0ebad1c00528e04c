use std::cell::RefCell;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::{RuntimeError, Unwind};
use crate::interpreter::Interpreter;
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::FunctionData;
use crate::token::{Token, Type};

/// A user-defined closure: the parsed declaration plus the environment that
/// was active when the `fun` statement ran. Cheap to clone — both fields are
/// reference-counted, so a `Function` value stored in several environments
/// still shares one declaration and one captured scope.
#[derive(Debug, Clone)]
pub struct Function {
    declaration: Rc<FunctionData>,
    closure: Rc<RefCell<Environment>>,
}

impl Function {
    pub fn new(declaration: FunctionData, closure: Rc<RefCell<Environment>>) -> Self {
        Function { declaration: Rc::new(declaration), closure }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.declaration, &other.declaration) && Rc::ptr_eq(&self.closure, &other.closure)
    }
}

impl Callable for Function {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));

        for (param, arg) in self.declaration.params.iter().zip(arguments.into_iter()) {
            environment.define(&param.lexeme, arg);
        }

        match interpreter.execute_block(&self.declaration.body, Rc::new(RefCell::new(environment))) {
            Ok(()) => Ok(Object::from(Literal::Nil)),
            Err(Unwind::Return(value)) => Ok(value),
            Err(Unwind::Error(error)) => Err(error),
        }
    }

    fn arity(&self) -> usize {
        self.declaration.params.len()
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name())
    }
}

/// A built-in callable implemented in Rust rather than Lox. The only one
/// this interpreter ships is `clock`.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: Token,
    pub arity: usize,
    pub function: fn(&mut Interpreter, Vec<Object>) -> Result<Object, RuntimeError>,
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name.lexeme == other.name.lexeme && std::ptr::eq(self.function as *const (), other.function as *const ())
    }
}

impl Callable for NativeFunction {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        (self.function)(interpreter, arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl NativeFunction {
    /// The built-ins bound into the global environment at interpreter
    /// construction. Kept to a single entry — `clock` — per the language's
    /// scope; a richer standard library is explicitly out of bounds.
    pub fn globals() -> Vec<NativeFunction> {
        vec![NativeFunction {
            name: Token::new(Type::Identifier, "clock".to_string(), None, 0),
            arity: 0,
            function: |_, _| {
                let now = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .expect("system clock to be after the Unix epoch")
                    .as_secs_f64();
                Ok(Object::from(now))
            },
        }]
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name.lexeme)
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name.lexeme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_zero_arity_and_returns_a_number() {
        let clock = &NativeFunction::globals()[0];
        assert_eq!(clock.arity(), 0);
        let mut interpreter = Interpreter::new();
        let result = clock.call(&mut interpreter, vec![]).unwrap();
        assert!(matches!(result, Object::Literal(Literal::Number(_))));
    }
}
