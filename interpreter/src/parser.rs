//! Recursive-descent parser for litr source.
//!
//! Statements are newline-terminated. Compound statements (`if`, `while`)
//! take a brace-delimited block, which is also what lets the line
//! accumulator detect an incomplete statement by counting open braces.

use crate::ast::{BinaryOp, Expr, Stmt, UnaryOp};
use crate::error::SyntaxError;
use crate::lexer::{Token, tokenize};

pub fn parse(source: &str) -> Result<Vec<Stmt>, SyntaxError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    parser.program()
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn program(&mut self) -> Result<Vec<Stmt>, SyntaxError> {
        let mut stmts = Vec::new();
        loop {
            self.skip_newlines();
            if self.peek().is_none() {
                return Ok(stmts);
            }
            stmts.push(self.statement()?);
        }
    }

    fn statement(&mut self) -> Result<Stmt, SyntaxError> {
        let line = self.line();
        match self.peek() {
            Some(Token::If) => self.if_statement(),
            Some(Token::While) => self.while_statement(),
            Some(Token::Ident(_)) if self.peek_at(1) == Some(&Token::Eq) => {
                let name = match self.advance() {
                    Some((Token::Ident(name), _)) => name,
                    _ => return Err(SyntaxError::new("expected identifier", line)),
                };
                self.advance();
                let expr = self.expression(0)?;
                self.end_of_statement()?;
                Ok(Stmt::Assign { name, expr, line })
            }
            Some(_) => {
                let expr = self.expression(0)?;
                self.end_of_statement()?;
                Ok(Stmt::Expr { expr, line })
            }
            None => Err(SyntaxError::new("unexpected end of input", line)),
        }
    }

    fn if_statement(&mut self) -> Result<Stmt, SyntaxError> {
        let line = self.line();
        self.advance();
        let cond = self.expression(0)?;
        let then_body = self.block()?;
        let else_body = if self.check(&Token::Else) {
            self.advance();
            if self.check(&Token::If) {
                vec![self.if_statement()?]
            } else {
                self.block()?
            }
        } else {
            Vec::new()
        };
        Ok(Stmt::If {
            cond,
            then_body,
            else_body,
            line,
        })
    }

    fn while_statement(&mut self) -> Result<Stmt, SyntaxError> {
        let line = self.line();
        self.advance();
        let cond = self.expression(0)?;
        let body = self.block()?;
        Ok(Stmt::While { cond, body, line })
    }

    fn block(&mut self) -> Result<Vec<Stmt>, SyntaxError> {
        self.expect(&Token::LBrace, "expected '{'")?;
        let mut stmts = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(&Token::RBrace) {
                self.advance();
                return Ok(stmts);
            }
            if self.peek().is_none() {
                return Err(SyntaxError::new("expected '}'", self.line()));
            }
            stmts.push(self.statement()?);
        }
    }

    fn end_of_statement(&mut self) -> Result<(), SyntaxError> {
        match self.peek() {
            None | Some(Token::Newline) => {
                self.advance();
                Ok(())
            }
            // A closing brace also ends the last statement of a block.
            Some(Token::RBrace) => Ok(()),
            Some(token) => Err(SyntaxError::new(
                format!("unexpected {}", describe(token)),
                self.line(),
            )),
        }
    }

    fn expression(&mut self, min_bp: u8) -> Result<Expr, SyntaxError> {
        let mut left = self.unary()?;
        loop {
            let Some(op) = self.peek().and_then(binary_op) else {
                return Ok(left);
            };
            let bp = binding_power(op);
            if bp < min_bp {
                return Ok(left);
            }
            self.advance();
            let right = self.expression(bp + 1)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn unary(&mut self) -> Result<Expr, SyntaxError> {
        let op = match self.peek() {
            Some(Token::Minus) => Some(UnaryOp::Neg),
            Some(Token::Bang) => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.unary()?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.primary()?;
        while self.check(&Token::LBracket) {
            self.advance();
            self.skip_newlines();
            let index = self.expression(0)?;
            self.skip_newlines();
            self.expect(&Token::RBracket, "expected ']'")?;
            expr = Expr::Index {
                target: Box::new(expr),
                index: Box::new(index),
            };
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, SyntaxError> {
        let line = self.line();
        match self.advance() {
            Some((Token::Number(n), _)) => Ok(Expr::Number(n)),
            Some((Token::Str(s), _)) => Ok(Expr::Str(s)),
            Some((Token::True, _)) => Ok(Expr::Bool(true)),
            Some((Token::False, _)) => Ok(Expr::Bool(false)),
            Some((Token::Ident(name), _)) => {
                if self.check(&Token::LParen) {
                    self.advance();
                    let args = self.arguments(&Token::RParen)?;
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Var(name))
                }
            }
            Some((Token::LParen, _)) => {
                self.skip_newlines();
                let expr = self.expression(0)?;
                self.skip_newlines();
                self.expect(&Token::RParen, "expected ')'")?;
                Ok(expr)
            }
            Some((Token::LBracket, _)) => {
                let items = self.arguments(&Token::RBracket)?;
                Ok(Expr::List(items))
            }
            Some((token, line)) => Err(SyntaxError::new(
                format!("unexpected {}", describe(&token)),
                line,
            )),
            None => Err(SyntaxError::new("unexpected end of input", line)),
        }
    }

    /// Comma-separated expressions up to `close`. Newlines inside the
    /// delimiters are insignificant, so multi-line calls and lists work.
    fn arguments(&mut self, close: &Token) -> Result<Vec<Expr>, SyntaxError> {
        let mut args = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(close) {
                self.advance();
                return Ok(args);
            }
            args.push(self.expression(0)?);
            self.skip_newlines();
            if self.check(&Token::Comma) {
                self.advance();
            } else if !self.check(close) {
                let expected = if *close == Token::RParen { ")" } else { "]" };
                return Err(SyntaxError::new(
                    format!("expected ',' or '{}'", expected),
                    self.line(),
                ));
            }
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|(t, _)| t)
    }

    fn check(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    fn advance(&mut self) -> Option<(Token, usize)> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, token: &Token, message: &str) -> Result<(), SyntaxError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(SyntaxError::new(message, self.line()))
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(&Token::Newline) {
            self.advance();
        }
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|(_, line)| *line)
            .unwrap_or(1)
    }
}

fn binary_op(token: &Token) -> Option<BinaryOp> {
    match token {
        Token::PipePipe => Some(BinaryOp::Or),
        Token::AmpAmp => Some(BinaryOp::And),
        Token::EqEq => Some(BinaryOp::Eq),
        Token::BangEq => Some(BinaryOp::Ne),
        Token::Gt => Some(BinaryOp::Gt),
        Token::Lt => Some(BinaryOp::Lt),
        Token::GtEq => Some(BinaryOp::Ge),
        Token::LtEq => Some(BinaryOp::Le),
        Token::Plus => Some(BinaryOp::Add),
        Token::Minus => Some(BinaryOp::Sub),
        Token::Star => Some(BinaryOp::Mul),
        Token::Slash => Some(BinaryOp::Div),
        Token::Percent => Some(BinaryOp::Rem),
        _ => None,
    }
}

fn binding_power(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Or => 1,
        BinaryOp::And => 2,
        BinaryOp::Eq | BinaryOp::Ne => 3,
        BinaryOp::Gt | BinaryOp::Lt | BinaryOp::Ge | BinaryOp::Le => 4,
        BinaryOp::Add | BinaryOp::Sub => 5,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 6,
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Number(n) => format!("number {}", n),
        Token::Str(_) => "string literal".to_string(),
        Token::Ident(name) => format!("identifier '{}'", name),
        Token::Newline => "end of line".to_string(),
        Token::True => "'true'".to_string(),
        Token::False => "'false'".to_string(),
        Token::If => "'if'".to_string(),
        Token::Else => "'else'".to_string(),
        Token::While => "'while'".to_string(),
        Token::Plus => "'+'".to_string(),
        Token::Minus => "'-'".to_string(),
        Token::Star => "'*'".to_string(),
        Token::Slash => "'/'".to_string(),
        Token::Percent => "'%'".to_string(),
        Token::Eq => "'='".to_string(),
        Token::EqEq => "'=='".to_string(),
        Token::BangEq => "'!='".to_string(),
        Token::Gt => "'>'".to_string(),
        Token::Lt => "'<'".to_string(),
        Token::GtEq => "'>='".to_string(),
        Token::LtEq => "'<='".to_string(),
        Token::AmpAmp => "'&&'".to_string(),
        Token::PipePipe => "'||'".to_string(),
        Token::Bang => "'!'".to_string(),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::LBracket => "'['".to_string(),
        Token::RBracket => "']'".to_string(),
        Token::LBrace => "'{'".to_string(),
        Token::RBrace => "'}'".to_string(),
        Token::Comma => "','".to_string(),
    }
}
