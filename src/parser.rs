use crate::error::{Error, ParseError};
use crate::expr::*;
use crate::literal::Literal;
use crate::stmt::*;
use crate::token::{Token, Type};

type ParseResult<T> = Result<T, ParseError>;

/// Returns whether the next token is any of the given types, consuming it if so.
macro_rules! matches_token {
    ( $self:ident, $( $type:expr ),+ ) => {
        {
            if $( $self.check($type) )||* {
                $self.advance();
                true
            } else {
                false
            }
        }
    }
}

/// Recursive-descent parser, one token of lookahead.
///
/// - Program     -> Declaration* EOF ;
/// - Declaration -> FunDecl | VarDecl | Statement ;
/// - FunDecl     -> "fun" Function ;
/// - VarDecl     -> "var" IDENTIFIER ( "=" Expression )? ";" ;
/// - Function    -> IDENTIFIER "(" Parameters? ")" Block ;
/// - Parameters  -> IDENTIFIER ( "," IDENTIFIER )* ;
/// - Statement   -> ExprStmt | ForStmt | IfStmt | PrintStmt | ReturnStmt | WhileStmt | Block ;
/// - ExprStmt    -> Expression ";" ;
/// - ForStmt     -> "for" "(" ( VarDecl | ExprStmt | ";" ) Expression? ";" Expression? ")" Statement ;
/// - IfStmt      -> "if" "(" Expression ")" Statement ( "else" Statement )? ;
/// - PrintStmt   -> "print" Expression ";" ;
/// - ReturnStmt  -> "return" Expression? ";" ;
/// - WhileStmt   -> "while" "(" Expression ")" Statement ;
/// - Block       -> "{" Declaration* "}" ;
/// - Expression  -> Assignment ;
/// - Assignment  -> IDENTIFIER "=" Assignment | LogicOr ;
/// - LogicOr     -> LogicAnd ( "or" LogicAnd )* ;
/// - LogicAnd    -> Equality ( "and" Equality )* ;
/// - Equality    -> Comparison ( ( "!=" | "==" ) Comparison )* ;
/// - Comparison  -> Term ( ( ">" | ">=" | "<" | "<=" ) Term )* ;
/// - Term        -> Factor ( ( "+" | "-" ) Factor )* ;
/// - Factor      -> Unary ( ( "*" | "/" ) Unary )* ;
/// - Unary       -> ( "!" | "-" ) Unary | Call ;
/// - Call        -> Primary ( "(" Arguments? ")" )* ;
/// - Arguments   -> Expression ( "," Expression )* ;
/// - Primary     -> NUMBER | STRING | "false" | "true" | "nil" | "(" Expression ")" | IDENTIFIER ;
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, current: 0 }
    }

    pub fn parse(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        statements
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == Type::EOF
    }

    fn check(&self, kind: Type) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn consume(&mut self, kind: Type, message: &str) -> ParseResult<&Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }

        Err(ParseError { token: self.peek().clone(), message: message.to_string() })
    }

    fn declaration(&mut self) -> Option<Stmt> {
        let statement = if matches_token!(self, Type::Fun) {
            self.function("function")
        } else if matches_token!(self, Type::Var) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match statement {
            Ok(stmt) => Some(stmt),
            Err(error) => {
                error.throw();
                self.synchronize();
                None
            }
        }
    }

    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, "Expect variable name.")?.clone();

        let initializer = if matches_token!(self, Type::Equal) { Some(self.expression()?) } else { None };

        self.consume(Type::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::Var(VarData { name, initializer }))
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        if matches_token!(self, Type::For) {
            return self.for_statement();
        }
        if matches_token!(self, Type::If) {
            return self.if_statement();
        }
        if matches_token!(self, Type::Print) {
            return self.print_statement();
        }
        if matches_token!(self, Type::Return) {
            return self.return_statement();
        }
        if matches_token!(self, Type::While) {
            return self.while_statement();
        }
        if matches_token!(self, Type::LeftBrace) {
            return Ok(Stmt::Block(BlockData { statements: self.block()? }));
        }

        self.expression_statement()
    }

    fn for_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if matches_token!(self, Type::Semicolon) {
            None
        } else if matches_token!(self, Type::Var) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if !self.check(Type::Semicolon) { Some(self.expression()?) } else { None };
        self.consume(Type::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if !self.check(Type::RightParen) { Some(self.expression()?) } else { None };
        self.consume(Type::RightParen, "Expect ')' after for clauses.")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(BlockData {
                statements: vec![body, Stmt::Expression(ExpressionData { expr: increment })],
            });
        }

        body = Stmt::While(WhileData {
            condition: condition.unwrap_or(Expr::Literal(Literal::Bool(true))),
            body: Box::new(body),
        });

        if let Some(initializer) = initializer {
            body = Stmt::Block(BlockData { statements: vec![initializer, body] });
        }

        Ok(body)
    }

    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(Type::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if matches_token!(self, Type::Else) { Some(Box::new(self.statement()?)) } else { None };

        Ok(Stmt::If(IfData { condition, then_branch, else_branch }))
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(Type::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print(PrintData { expr }))
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();
        let value = if !self.check(Type::Semicolon) { Some(self.expression()?) } else { None };

        self.consume(Type::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return(ReturnData { keyword, value }))
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(Type::RightParen, "Expect ')' after condition.")?;
        let body = Box::new(self.statement()?);

        Ok(Stmt::While(WhileData { condition, body }))
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(Type::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(ExpressionData { expr }))
    }

    fn function(&mut self, kind: &str) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, &format!("Expect {kind} name."))?.clone();
        self.consume(Type::LeftParen, &format!("Expect '(' after {kind} name."))?;

        let mut params = vec![];
        if !self.check(Type::RightParen) {
            loop {
                if params.len() >= 255 {
                    return Err(ParseError {
                        token: self.peek().clone(),
                        message: "Cannot have more than 255 parameters.".to_string(),
                    });
                }

                params.push(self.consume(Type::Identifier, "Expect parameter name.")?.clone());

                if !matches_token!(self, Type::Comma) {
                    break;
                }
            }
        }
        self.consume(Type::RightParen, "Expect ')' after parameters.")?;

        self.consume(Type::LeftBrace, &format!("Expect '{{' before {kind} body."))?;
        let body = self.block()?;

        Ok(Stmt::Function(FunctionData { name, params, body }))
    }

    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(Type::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume(Type::RightBrace, "Expect '}' after block.")?;
        Ok(statements)
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.or()?;

        if matches_token!(self, Type::Equal) {
            let equals = self.previous().clone();
            let value = self.assignment()?;

            if let Expr::Variable(data) = expr {
                return Ok(Expr::Assign(AssignData::new(data.name, Box::new(value))));
            }

            ParseError { token: equals, message: "Invalid assignment target.".to_string() }.throw();
        }

        Ok(expr)
    }

    fn or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and()?;

        while matches_token!(self, Type::Or) {
            let operator = self.previous().clone();
            let right = self.and()?;
            expr = Expr::Logical(LogicalData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;

        while matches_token!(self, Type::And) {
            let operator = self.previous().clone();
            let right = self.equality()?;
            expr = Expr::Logical(LogicalData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;

        while matches_token!(self, Type::BangEqual, Type::EqualEqual) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;

        while matches_token!(self, Type::Greater, Type::GreaterEqual, Type::Less, Type::LessEqual) {
            let operator = self.previous().clone();
            let right = self.term()?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;

        while matches_token!(self, Type::Minus, Type::Plus) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;

        while matches_token!(self, Type::Slash, Type::Star) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if matches_token!(self, Type::Bang, Type::Minus) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            return Ok(Expr::Unary(UnaryData { operator, expr: Box::new(right) }));
        }

        self.call()
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = vec![];

        if !self.check(Type::RightParen) {
            loop {
                if arguments.len() >= 255 {
                    ParseError {
                        token: self.peek().clone(),
                        message: "Cannot have more than 255 arguments.".to_string(),
                    }
                    .throw();
                }
                arguments.push(self.expression()?);
                if !matches_token!(self, Type::Comma) {
                    break;
                }
            }
        }

        let paren = self.consume(Type::RightParen, "Expect ')' after arguments.")?.clone();
        Ok(Expr::Call(CallData { callee: Box::new(callee), paren, arguments }))
    }

    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if matches_token!(self, Type::LeftParen) {
                expr = self.finish_call(expr)?;
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        if matches_token!(self, Type::False) {
            return Ok(Expr::Literal(Literal::Bool(false)));
        }
        if matches_token!(self, Type::True) {
            return Ok(Expr::Literal(Literal::Bool(true)));
        }
        if matches_token!(self, Type::Nil) {
            return Ok(Expr::Literal(Literal::Nil));
        }
        if matches_token!(self, Type::Number, Type::String) {
            let literal = self.previous().literal.clone().expect("number or string token to carry a literal");
            return Ok(Expr::Literal(literal));
        }
        if matches_token!(self, Type::Identifier) {
            return Ok(Expr::Variable(VariableData::new(self.previous().clone())));
        }
        if matches_token!(self, Type::LeftParen) {
            let expr = self.expression()?;
            self.consume(Type::RightParen, "Expect ')' after expression.")?;
            return Ok(Expr::Grouping(GroupingData { expr: Box::new(expr) }));
        }

        Err(ParseError { token: self.peek().clone(), message: "Expect expression.".to_string() })
    }

    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == Type::Semicolon {
                return;
            }

            match self.peek().kind {
                Type::Class | Type::Fun | Type::Var | Type::For | Type::If | Type::While
                | Type::Print | Type::Return => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}
