use crate::expr::{Expr, ExprVisitor};
use crate::stmt::{Stmt, StmtVisitor};

/// Renders an AST back to a parenthesized, Lisp-like string. Not part of the
/// interpreter's execution path — a debugging aid for inspecting what the
/// parser produced.
macro_rules! parenthesize {
    ( $self:ident, $name:expr, $( $x:expr ),+ ) => {
        {
            let mut string = String::new();
            string += "(";
            string += $name;
            $(
                string += " ";
                string += &$x.accept($self);
            )*
            string += ")";
            string
        }
    };
}

pub struct AstPrinter;

impl AstPrinter {
    pub fn print(&mut self, expr: &Expr) -> String {
        expr.accept(self)
    }
}

impl ExprVisitor<String> for AstPrinter {
    fn visit_literal_expr(&mut self, expr: &Expr) -> String {
        let Expr::Literal(literal) = expr else { unreachable!() };
        literal.to_string()
    }

    fn visit_logical_expr(&mut self, expr: &Expr) -> String {
        let Expr::Logical(data) = expr else { unreachable!() };
        parenthesize!(self, &data.operator.lexeme, &data.left, &data.right)
    }

    fn visit_unary_expr(&mut self, expr: &Expr) -> String {
        let Expr::Unary(data) = expr else { unreachable!() };
        parenthesize!(self, &data.operator.lexeme, &data.expr)
    }

    fn visit_binary_expr(&mut self, expr: &Expr) -> String {
        let Expr::Binary(data) = expr else { unreachable!() };
        parenthesize!(self, &data.operator.lexeme, &data.left, &data.right)
    }

    fn visit_grouping_expr(&mut self, expr: &Expr) -> String {
        let Expr::Grouping(data) = expr else { unreachable!() };
        parenthesize!(self, "group", data.expr)
    }

    fn visit_variable_expr(&mut self, expr: &Expr) -> String {
        let Expr::Variable(data) = expr else { unreachable!() };
        data.name.lexeme.clone()
    }

    fn visit_assign_expr(&mut self, expr: &Expr) -> String {
        let Expr::Assign(data) = expr else { unreachable!() };
        parenthesize!(self, format!("= {}", &data.name.lexeme).as_str(), data.value)
    }

    fn visit_call_expr(&mut self, expr: &Expr) -> String {
        let Expr::Call(data) = expr else { unreachable!() };
        let mut string = data.callee.accept(self);
        string += "(";
        string += &data.arguments.iter().map(|arg| arg.accept(self)).collect::<Vec<_>>().join(" ");
        string += ")";
        string
    }
}

impl StmtVisitor<String> for AstPrinter {
    fn visit_expression_stmt(&mut self, stmt: &Stmt) -> String {
        let Stmt::Expression(data) = stmt else { unreachable!() };
        parenthesize!(self, "expr", data.expr)
    }

    fn visit_function_stmt(&mut self, stmt: &Stmt) -> String {
        let Stmt::Function(data) = stmt else { unreachable!() };
        let params = data.params.iter().map(|p| p.lexeme.clone()).collect::<Vec<_>>().join(" ");
        let body = data.body.iter().map(|s| s.accept(self)).collect::<Vec<_>>().join(" ");
        format!("(fun {}({}) {{ {} }})", data.name.lexeme, params, body)
    }

    fn visit_if_stmt(&mut self, stmt: &Stmt) -> String {
        let Stmt::If(data) = stmt else { unreachable!() };
        let mut string = format!("(if {} {}", data.condition.accept(self), data.then_branch.accept(self));
        if let Some(else_branch) = &data.else_branch {
            string += &format!(" else {}", else_branch.accept(self));
        }
        string += ")";
        string
    }

    fn visit_print_stmt(&mut self, stmt: &Stmt) -> String {
        let Stmt::Print(data) = stmt else { unreachable!() };
        parenthesize!(self, "print", data.expr)
    }

    fn visit_var_stmt(&mut self, stmt: &Stmt) -> String {
        let Stmt::Var(data) = stmt else { unreachable!() };
        match &data.initializer {
            Some(initializer) => format!("(var {} = {})", data.name.lexeme, initializer.accept(self)),
            None => format!("(var {})", data.name.lexeme),
        }
    }

    fn visit_while_stmt(&mut self, stmt: &Stmt) -> String {
        let Stmt::While(data) = stmt else { unreachable!() };
        parenthesize!(self, "while", data.condition, data.body)
    }

    fn visit_block_stmt(&mut self, stmt: &Stmt) -> String {
        let Stmt::Block(data) = stmt else { unreachable!() };
        let inner = data.statements.iter().map(|s| s.accept(self)).collect::<Vec<_>>().join(" ");
        format!("{{ {inner} }}")
    }

    fn visit_return_stmt(&mut self, stmt: &Stmt) -> String {
        let Stmt::Return(data) = stmt else { unreachable!() };
        match &data.value {
            Some(value) => format!("(return {})", value.accept(self)),
            None => "(return)".to_string(),
        }
    }
}
