use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::{Error, RuntimeError, Unwind};
use crate::expr::{Expr, ExprVisitor, NodeId};
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::Object;
use crate::stmt::{Stmt, StmtVisitor};
use crate::token::Type;

type EvalResult = Result<Object, Unwind>;
type ExecResult = Result<(), Unwind>;

/// Walks the AST produced by the parser (and annotated by the resolver) and
/// evaluates it. Owns the global environment for the lifetime of the
/// process, so a REPL session accumulates declarations across lines.
pub struct Interpreter {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<NodeId, usize>,
    output: Rc<RefCell<dyn Write>>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_output(Rc::new(RefCell::new(io::stdout())))
    }

    /// Builds an interpreter that writes `print` output to `output` instead
    /// of stdout — how the test suite captures program output in-process.
    pub fn with_output(output: Rc<RefCell<dyn Write>>) -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));
        for native in NativeFunction::globals() {
            globals.borrow_mut().define(&native.name.lexeme.clone(), Object::from(native));
        }

        Interpreter { environment: Rc::clone(&globals), globals, locals: HashMap::new(), output }
    }

    /// Records that the variable/assignment node `id` resolves `depth`
    /// environments up from wherever it's evaluated. Called by the resolver.
    pub fn resolve(&mut self, id: NodeId, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// Runs a full program. Stops at the first runtime error (matching the
    /// reference implementation: a `RuntimeError` aborts the rest of the
    /// statements, it does not skip just the offending one).
    pub fn interpret(&mut self, statements: &[Stmt]) {
        for statement in statements {
            if let Err(unwind) = self.execute(statement) {
                match unwind {
                    Unwind::Error(error) => error.throw(),
                    Unwind::Return(_) => unreachable!("return statement outside of a function call"),
                }
                return;
            }
        }
    }

    fn execute(&mut self, stmt: &Stmt) -> ExecResult {
        stmt.accept(self)
    }

    pub fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> ExecResult {
        let previous = std::mem::replace(&mut self.environment, environment);

        let result = (|| {
            for statement in statements {
                self.execute(statement)?;
            }
            Ok(())
        })();

        self.environment = previous;
        result
    }

    fn evaluate(&mut self, expr: &Expr) -> EvalResult {
        expr.accept(self)
    }

    fn look_up_variable(&self, id: NodeId, name: &crate::token::Token) -> Result<Object, RuntimeError> {
        match self.locals.get(&id) {
            Some(&depth) => self.environment.borrow().get_at(depth, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn as_literal(&self, value: &Object) -> Option<Literal> {
        match value {
            Object::Literal(literal) => Some(literal.clone()),
            _ => None,
        }
    }

    /// Operand check shared by the ordering comparisons: both operands are
    /// checked together so a single bad operand is reported as
    /// "Operands must be numbers.", matching the binary-operator wording.
    fn as_numbers(&self, left: &Object, right: &Object, operator: &crate::token::Token) -> Result<(f64, f64), RuntimeError> {
        match (self.as_literal(left).and_then(|l| l.as_number()), self.as_literal(right).and_then(|r| r.as_number())) {
            (Some(l), Some(r)) => Ok((l, r)),
            _ => Err(RuntimeError { token: operator.clone(), message: "Operands must be numbers.".to_string() }),
        }
    }

    /// `- * /` go through `Literal`'s arithmetic impls; both operands are
    /// checked together so the error wording matches the comparisons above.
    fn binary_numeric<F>(&self, left: &Object, right: &Object, operator: &crate::token::Token, f: F) -> EvalResult
    where
        F: FnOnce(Literal, Literal) -> Option<Literal>,
    {
        let result = match (self.as_literal(left), self.as_literal(right)) {
            (Some(l), Some(r)) => f(l, r),
            _ => None,
        };

        result.map(Object::from).ok_or_else(|| {
            Unwind::from(RuntimeError { token: operator.clone(), message: "Operands must be numbers.".to_string() })
        })
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExprVisitor<EvalResult> for Interpreter {
    fn visit_literal_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Literal(literal) = expr else { unreachable!() };
        Ok(Object::from(literal.clone()))
    }

    fn visit_grouping_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Grouping(grouping) = expr else { unreachable!() };
        self.evaluate(&grouping.expr)
    }

    fn visit_unary_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Unary(unary) = expr else { unreachable!() };
        let right = self.evaluate(&unary.expr)?;

        match unary.operator.kind {
            Type::Minus => self
                .as_literal(&right)
                .and_then(|l| -l)
                .map(Object::from)
                .ok_or_else(|| {
                    Unwind::from(RuntimeError {
                        token: unary.operator.clone(),
                        message: "Operand must be a number.".to_string(),
                    })
                }),
            Type::Bang => Ok(Object::from(!right.is_truthy())),
            _ => unreachable!("unary operator is always '!' or '-'"),
        }
    }

    fn visit_binary_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Binary(binary) = expr else { unreachable!() };
        let left = self.evaluate(&binary.left)?;
        let right = self.evaluate(&binary.right)?;
        let op = &binary.operator;

        match op.kind {
            Type::Plus => {
                let result = match (self.as_literal(&left), self.as_literal(&right)) {
                    (Some(l), Some(r)) => l + r,
                    _ => None,
                };
                result.map(Object::from).ok_or_else(|| {
                    Unwind::from(RuntimeError {
                        token: op.clone(),
                        message: "Operands must be two numbers or two strings.".to_string(),
                    })
                })
            }
            Type::Minus => self.binary_numeric(&left, &right, op, |l, r| l - r),
            Type::Star => self.binary_numeric(&left, &right, op, |l, r| l * r),
            Type::Slash => self.binary_numeric(&left, &right, op, |l, r| l / r),
            Type::Greater => {
                let (l, r) = self.as_numbers(&left, &right, op).map_err(Unwind::from)?;
                Ok(Object::from(l > r))
            }
            Type::GreaterEqual => {
                let (l, r) = self.as_numbers(&left, &right, op).map_err(Unwind::from)?;
                Ok(Object::from(l >= r))
            }
            Type::Less => {
                let (l, r) = self.as_numbers(&left, &right, op).map_err(Unwind::from)?;
                Ok(Object::from(l < r))
            }
            Type::LessEqual => {
                let (l, r) = self.as_numbers(&left, &right, op).map_err(Unwind::from)?;
                Ok(Object::from(l <= r))
            }
            Type::EqualEqual => Ok(Object::from(left == right)),
            Type::BangEqual => Ok(Object::from(left != right)),
            _ => unreachable!("not a binary operator"),
        }
    }

    fn visit_variable_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Variable(variable) = expr else { unreachable!() };
        self.look_up_variable(variable.id, &variable.name).map_err(Unwind::from)
    }

    fn visit_assign_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Assign(assign) = expr else { unreachable!() };
        let value = self.evaluate(&assign.value)?;

        match self.locals.get(&assign.id) {
            Some(&depth) => {
                self.environment.borrow_mut().assign_at(depth, &assign.name, value.clone());
            }
            None => {
                self.globals.borrow_mut().assign(&assign.name, value.clone()).map_err(Unwind::from)?;
            }
        }

        Ok(value)
    }

    fn visit_logical_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Logical(logical) = expr else { unreachable!() };
        let left = self.evaluate(&logical.left)?;

        if logical.operator.kind == Type::Or {
            if left.is_truthy() {
                return Ok(left);
            }
        } else if !left.is_truthy() {
            return Ok(left);
        }

        self.evaluate(&logical.right)
    }

    fn visit_call_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Call(call) = expr else { unreachable!() };
        let callee = self.evaluate(&call.callee)?;

        let mut arguments = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let Some(callable) = callee.as_callable() else {
            return Err(Unwind::from(RuntimeError {
                token: call.paren.clone(),
                message: "Can only call functions and classes.".to_string(),
            }));
        };

        if arguments.len() != callable.arity() {
            return Err(Unwind::from(RuntimeError {
                token: call.paren.clone(),
                message: format!("Expected {} arguments but got {}.", callable.arity(), arguments.len()),
            }));
        }

        callable.call(self, arguments).map_err(Unwind::from)
    }
}

impl StmtVisitor<ExecResult> for Interpreter {
    fn visit_expression_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Expression(data) = stmt else { unreachable!() };
        self.evaluate(&data.expr)?;
        Ok(())
    }

    fn visit_print_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Print(data) = stmt else { unreachable!() };
        let value = self.evaluate(&data.expr)?;
        writeln!(self.output.borrow_mut(), "{value}").expect("print output to be writable");
        Ok(())
    }

    fn visit_var_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Var(data) = stmt else { unreachable!() };
        let value = match &data.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Object::from(Literal::Nil),
        };

        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(())
    }

    fn visit_block_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Block(data) = stmt else { unreachable!() };
        let scope = Environment::new(Some(Rc::clone(&self.environment)));
        self.execute_block(&data.statements, Rc::new(RefCell::new(scope)))
    }

    fn visit_if_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::If(data) = stmt else { unreachable!() };

        if self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(())
        }
    }

    fn visit_while_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::While(data) = stmt else { unreachable!() };

        while self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.body)?;
        }
        Ok(())
    }

    fn visit_function_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Function(data) = stmt else { unreachable!() };
        let function = Function::new(data.clone(), Rc::clone(&self.environment));
        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(function));
        Ok(())
    }

    fn visit_return_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Return(data) = stmt else { unreachable!() };
        let value = match &data.value {
            Some(expr) => self.evaluate(expr)?,
            None => Object::from(Literal::Nil),
        };
        Err(Unwind::Return(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::resolver::Resolver;
    use crate::scanner::Scanner;

    fn run(source: &str) -> String {
        crate::error::reset_error();
        let output = Rc::new(RefCell::new(Vec::new()));
        let tokens = Scanner::new(source).scan_tokens();
        let statements = Parser::new(tokens).parse();
        let mut interpreter = Interpreter::with_output(Rc::clone(&output) as Rc<RefCell<dyn Write>>);
        Resolver::new(&mut interpreter).resolve(&statements);
        interpreter.interpret(&statements);
        String::from_utf8(output.borrow().clone()).unwrap()
    }

    #[test]
    fn arithmetic_and_print() {
        assert_eq!(run("print 1 + 2 * 3;"), "7\n");
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(run(r#"print "a" + "b";"#), "ab\n");
    }

    #[test]
    fn division_by_zero_is_infinity_not_an_error() {
        assert_eq!(run("print 1 / 0;"), "inf\n");
    }

    #[test]
    fn closures_capture_their_defining_environment() {
        let source = r#"
            fun makeCounter() {
                var i = 0;
                fun count() {
                    i = i + 1;
                    return i;
                }
                return count;
            }
            var counter = makeCounter();
            print counter();
            print counter();
        "#;
        assert_eq!(run(source), "1\n2\n");
    }

    #[test]
    fn while_and_block_scoping() {
        let source = r#"
            var i = 0;
            var total = 0;
            while (i < 3) {
                var doubled = i * 2;
                total = total + doubled;
                i = i + 1;
            }
            print total;
        "#;
        assert_eq!(run(source), "6\n");
    }

    #[test]
    fn for_loop_desugars_correctly() {
        assert_eq!(run("for (var i = 0; i < 3; i = i + 1) print i;"), "0\n1\n2\n");
    }

    #[test]
    fn logical_operators_return_operand_value() {
        assert_eq!(run(r#"print "hi" or 2;"#), "hi\n");
        assert_eq!(run(r#"print nil and "unreached";"#), "nil\n");
        assert_eq!(run("print false or 3;"), "3\n");
    }

    #[test]
    fn runtime_error_halts_remaining_statements() {
        let output = run(r#"print "before"; print 1 + "x"; print "after";"#);
        assert_eq!(output, "before\n");
        assert!(crate::error::did_runtime_error());
        crate::error::reset_error();
    }

    #[test]
    fn undefined_variable_is_a_runtime_error() {
        run("print x;");
        assert!(crate::error::did_runtime_error());
        crate::error::reset_error();
    }

    #[test]
    fn equality_does_not_coerce_types() {
        assert_eq!(run(r#"print 0 == "0";"#), "false\n");
        assert_eq!(run("print nil == false;"), "false\n");
    }

    #[test]
    fn calling_with_wrong_arity_is_a_runtime_error() {
        run("fun f(a) { return a; } f(1, 2);");
        assert!(crate::error::did_runtime_error());
        crate::error::reset_error();
    }
}
