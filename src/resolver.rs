use std::collections::HashMap;
use std::mem;

use crate::error::{Error, ResolveError};
use crate::expr::{Expr, ExprVisitor};
use crate::interpreter::Interpreter;
use crate::stmt::{Stmt, StmtVisitor};
use crate::token::Token;

#[derive(PartialEq)]
enum FunctionType {
    None,
    Function,
}

/// Walks the AST once after parsing to figure out, for every variable
/// reference, how many scopes up its binding lives. Writes the answer into
/// the interpreter's side table keyed by the expression's `NodeId` rather
/// than resolving names again at runtime.
pub struct Resolver<'a> {
    interpreter: &'a mut Interpreter,
    scopes: Vec<HashMap<String, bool>>,
    current_function: FunctionType,
}

impl<'a> Resolver<'a> {
    pub fn new(interpreter: &'a mut Interpreter) -> Self {
        Resolver { interpreter, scopes: vec![], current_function: FunctionType::None }
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        expr.accept(self);
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        stmt.accept(self);
    }

    pub fn resolve(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_stmt(statement);
        }
    }

    fn resolve_function(&mut self, params: &[Token], body: &[Stmt], kind: FunctionType) {
        let enclosing_function = mem::replace(&mut self.current_function, kind);

        self.begin_scope();
        for param in params {
            self.declare(param);
            self.define(param);
        }
        self.resolve(body);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            if scope.contains_key(&name.lexeme) {
                ResolveError {
                    token: name.clone(),
                    message: format!("A variable is already defined with name '{}' in this scope.", name.lexeme),
                }.throw();
            }
            scope.insert(name.lexeme.clone(), false);
        }
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    fn resolve_local(&mut self, id: u64, name: &Token) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.interpreter.resolve(id, depth);
                return;
            }
        }
    }
}

impl<'a> ExprVisitor<()> for Resolver<'a> {
    fn visit_variable_expr(&mut self, expr: &Expr) {
        let Expr::Variable(variable) = expr else { unreachable!() };

        if let Some(scope) = self.scopes.last() {
            if scope.get(&variable.name.lexeme) == Some(&false) {
                ResolveError {
                    token: variable.name.clone(),
                    message: "Cannot read local variable in its own initializer.".to_string(),
                }.throw();
            }
        }

        self.resolve_local(variable.id, &variable.name);
    }

    fn visit_assign_expr(&mut self, expr: &Expr) {
        let Expr::Assign(assign) = expr else { unreachable!() };

        self.resolve_expr(&assign.value);
        self.resolve_local(assign.id, &assign.name);
    }

    fn visit_literal_expr(&mut self, _expr: &Expr) {}

    fn visit_logical_expr(&mut self, expr: &Expr) {
        let Expr::Logical(logical) = expr else { unreachable!() };

        self.resolve_expr(&logical.left);
        self.resolve_expr(&logical.right);
    }

    fn visit_unary_expr(&mut self, expr: &Expr) {
        let Expr::Unary(unary) = expr else { unreachable!() };

        self.resolve_expr(&unary.expr);
    }

    fn visit_binary_expr(&mut self, expr: &Expr) {
        let Expr::Binary(binary) = expr else { unreachable!() };

        self.resolve_expr(&binary.left);
        self.resolve_expr(&binary.right);
    }

    fn visit_grouping_expr(&mut self, expr: &Expr) {
        let Expr::Grouping(grouping) = expr else { unreachable!() };

        self.resolve_expr(&grouping.expr);
    }

    fn visit_call_expr(&mut self, expr: &Expr) {
        let Expr::Call(call) = expr else { unreachable!() };

        self.resolve_expr(&call.callee);
        for argument in &call.arguments {
            self.resolve_expr(argument);
        }
    }
}

impl<'a> StmtVisitor<()> for Resolver<'a> {
    fn visit_block_stmt(&mut self, stmt: &Stmt) {
        let Stmt::Block(block) = stmt else { unreachable!() };

        self.begin_scope();
        self.resolve(&block.statements);
        self.end_scope();
    }

    fn visit_var_stmt(&mut self, stmt: &Stmt) {
        let Stmt::Var(var) = stmt else { unreachable!() };

        self.declare(&var.name);
        if let Some(initializer) = &var.initializer {
            self.resolve_expr(initializer);
        }
        self.define(&var.name);
    }

    fn visit_function_stmt(&mut self, stmt: &Stmt) {
        let Stmt::Function(function) = stmt else { unreachable!() };

        self.declare(&function.name);
        self.define(&function.name);

        self.resolve_function(&function.params, &function.body, FunctionType::Function);
    }

    fn visit_expression_stmt(&mut self, stmt: &Stmt) {
        let Stmt::Expression(data) = stmt else { unreachable!() };

        self.resolve_expr(&data.expr);
    }

    fn visit_if_stmt(&mut self, stmt: &Stmt) {
        let Stmt::If(if_stmt) = stmt else { unreachable!() };

        self.resolve_expr(&if_stmt.condition);
        self.resolve_stmt(&if_stmt.then_branch);
        if let Some(else_branch) = &if_stmt.else_branch {
            self.resolve_stmt(else_branch);
        }
    }

    fn visit_print_stmt(&mut self, stmt: &Stmt) {
        let Stmt::Print(print) = stmt else { unreachable!() };

        self.resolve_expr(&print.expr);
    }

    fn visit_return_stmt(&mut self, stmt: &Stmt) {
        let Stmt::Return(return_stmt) = stmt else { unreachable!() };

        if self.current_function == FunctionType::None {
            ResolveError {
                token: return_stmt.keyword.clone(),
                message: "Cannot return from top-level code.".to_string(),
            }.throw();
        }

        if let Some(value) = &return_stmt.value {
            self.resolve_expr(value);
        }
    }

    fn visit_while_stmt(&mut self, stmt: &Stmt) {
        let Stmt::While(while_stmt) = stmt else { unreachable!() };

        self.resolve_expr(&while_stmt.condition);
        self.resolve_stmt(&while_stmt.body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::scanner::Scanner;

    fn resolve_source(source: &str) -> Interpreter {
        crate::error::reset_error();
        let tokens = Scanner::new(source).scan_tokens();
        let statements = Parser::new(tokens).parse();
        let mut interpreter = Interpreter::new();
        Resolver::new(&mut interpreter).resolve(&statements);
        interpreter
    }

    #[test]
    fn shadowed_local_redeclaration_is_a_resolve_error() {
        resolve_source("{ var a = 1; var a = 2; }");
        assert!(crate::error::did_error());
        crate::error::reset_error();
    }

    #[test]
    fn top_level_return_is_a_resolve_error() {
        resolve_source("return 1;");
        assert!(crate::error::did_error());
        crate::error::reset_error();
    }

    #[test]
    fn reading_own_initializer_is_a_resolve_error() {
        resolve_source("{ var a = a; }");
        assert!(crate::error::did_error());
        crate::error::reset_error();
    }
}
