//! Parser: token stream → AST.
//!
//! Statements are parsed by a dispatch on the leading token; expressions use
//! precedence climbing (Pratt parsing) with a one-token lookahead buffer over
//! the lexer. Errors are collected instead of aborting the parse, so a single
//! input can report several independent problems.

use std::fmt;

use crate::ast::*;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

#[derive(Debug, PartialEq)]
pub struct ParseError(pub String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error: {}", self.0)
    }
}

impl std::error::Error for ParseError {}

/// Binding powers, lowest first. `PartialOrd` drives the climbing loop.
#[derive(Clone, Copy, PartialEq, PartialOrd)]
enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

impl Precedence {
    fn of(kind: TokenKind) -> Precedence {
        match kind {
            TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
            TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Slash | TokenKind::Asterisk => Precedence::Product,
            TokenKind::LParen => Precedence::Call,
            TokenKind::LBracket => Precedence::Index,
            _ => Precedence::Lowest,
        }
    }
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    cur: Token,
    peek: Token,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Self {
        let cur = lexer.next_token();
        let peek = lexer.next_token();
        Self {
            lexer,
            cur,
            peek,
            errors: Vec::new(),
        }
    }

    fn advance(&mut self) {
        self.cur = std::mem::replace(&mut self.peek, self.lexer.next_token());
    }

    fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur.kind == kind
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            self.advance();
            true
        } else {
            self.err(format!(
                "expected next token to be {:?}, got {:?} instead",
                kind, self.peek.kind
            ));
            false
        }
    }

    fn err(&mut self, msg: String) {
        self.errors.push(ParseError(msg));
    }

    /// Parses the whole input. A failed statement records its diagnostic and
    /// parsing resumes at the next token, so the error list can grow past one.
    pub fn parse(mut self) -> Result<Program, Vec<ParseError>> {
        let mut statements = Vec::new();
        while !self.cur_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.advance();
        }
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        Ok(Program { statements })
    }

    fn parse_statement(&mut self) -> Option<Stmt> {
        match self.cur.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Stmt> {
        let token = self.cur.clone();
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = Ident {
            token: self.cur.clone(),
            name: self.cur.literal.clone(),
        };
        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.advance();
        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek_is(TokenKind::Semicolon) {
            self.advance();
        }
        Some(Stmt {
            node: StmtKind::Let { name, value },
            token,
        })
    }

    fn parse_return_statement(&mut self) -> Option<Stmt> {
        let token = self.cur.clone();
        self.advance();
        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek_is(TokenKind::Semicolon) {
            self.advance();
        }
        Some(Stmt {
            node: StmtKind::Return { value },
            token,
        })
    }

    fn parse_expression_statement(&mut self) -> Option<Stmt> {
        let token = self.cur.clone();
        let expr = self.parse_expression(Precedence::Lowest)?;
        if self.peek_is(TokenKind::Semicolon) {
            self.advance();
        }
        Some(Stmt {
            node: StmtKind::Expr(expr),
            token,
        })
    }

    fn parse_expression(&mut self, min: Precedence) -> Option<Expr> {
        let mut left = self.parse_prefix()?;
        while !self.peek_is(TokenKind::Semicolon) && min < Precedence::of(self.peek.kind) {
            left = match self.peek.kind {
                TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Slash
                | TokenKind::Asterisk
                | TokenKind::Eq
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::Gt => {
                    self.advance();
                    self.parse_infix_expression(left)?
                }
                TokenKind::LParen => {
                    self.advance();
                    self.parse_call_expression(left)?
                }
                TokenKind::LBracket => {
                    self.advance();
                    self.parse_index_expression(left)?
                }
                _ => break,
            };
        }
        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expr> {
        let token = self.cur.clone();
        let node = match self.cur.kind {
            TokenKind::Ident => ExprKind::Ident(self.cur.literal.clone()),
            TokenKind::Int => match self.cur.literal.parse::<i64>() {
                Ok(v) => ExprKind::Int(v),
                Err(_) => {
                    self.err(format!("could not parse {} as integer", self.cur.literal));
                    return None;
                }
            },
            TokenKind::Str => ExprKind::Str(self.cur.literal.clone()),
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::Bang => return self.parse_prefix_expression(PrefixOp::Not),
            TokenKind::Minus => return self.parse_prefix_expression(PrefixOp::Neg),
            TokenKind::LParen => return self.parse_grouped_expression(),
            TokenKind::If => return self.parse_if_expression(),
            TokenKind::Function => return self.parse_function_literal(),
            TokenKind::LBracket => return self.parse_array_literal(),
            TokenKind::LBrace => return self.parse_hash_literal(),
            kind => {
                self.err(format!("no prefix parse function for {:?} found", kind));
                return None;
            }
        };
        Some(Expr { node, token })
    }

    fn parse_prefix_expression(&mut self, op: PrefixOp) -> Option<Expr> {
        let token = self.cur.clone();
        self.advance();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expr {
            node: ExprKind::Prefix {
                op,
                right: Box::new(right),
            },
            token,
        })
    }

    fn parse_infix_expression(&mut self, left: Expr) -> Option<Expr> {
        let token = self.cur.clone();
        let op = match token.kind {
            TokenKind::Plus => InfixOp::Add,
            TokenKind::Minus => InfixOp::Sub,
            TokenKind::Asterisk => InfixOp::Mul,
            TokenKind::Slash => InfixOp::Div,
            TokenKind::Lt => InfixOp::Lt,
            TokenKind::Gt => InfixOp::Gt,
            TokenKind::Eq => InfixOp::Eq,
            TokenKind::NotEq => InfixOp::NotEq,
            kind => {
                self.err(format!("no infix parse function for {:?} found", kind));
                return None;
            }
        };
        let precedence = Precedence::of(token.kind);
        self.advance();
        let right = self.parse_expression(precedence)?;
        Some(Expr {
            node: ExprKind::Infix {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            token,
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expr> {
        self.advance();
        let expr = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(expr)
    }

    fn parse_if_expression(&mut self) -> Option<Expr> {
        let token = self.cur.clone();
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let consequence = self.parse_block()?;
        let alternative = if self.peek_is(TokenKind::Else) {
            self.advance();
            if !self.expect_peek(TokenKind::LBrace) {
                return None;
            }
            Some(self.parse_block()?)
        } else {
            None
        };
        Some(Expr {
            node: ExprKind::If {
                condition: Box::new(condition),
                consequence,
                alternative,
            },
            token,
        })
    }

    /// Called with the current token on `{`; consumes through the matching `}`.
    fn parse_block(&mut self) -> Option<Block> {
        let token = self.cur.clone();
        let mut statements = Vec::new();
        self.advance();
        while !self.cur_is(TokenKind::RBrace) {
            if self.cur_is(TokenKind::Eof) {
                self.err(format!(
                    "expected next token to be {:?}, got {:?} instead",
                    TokenKind::RBrace,
                    TokenKind::Eof
                ));
                return None;
            }
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.advance();
        }
        Some(Block { token, statements })
    }

    fn parse_function_literal(&mut self) -> Option<Expr> {
        let token = self.cur.clone();
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block()?;
        Some(Expr {
            node: ExprKind::Function { parameters, body },
            token,
        })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Ident>> {
        let mut parameters = Vec::new();
        if self.peek_is(TokenKind::RParen) {
            self.advance();
            return Some(parameters);
        }
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        parameters.push(Ident {
            token: self.cur.clone(),
            name: self.cur.literal.clone(),
        });
        while self.peek_is(TokenKind::Comma) {
            self.advance();
            if !self.expect_peek(TokenKind::Ident) {
                return None;
            }
            parameters.push(Ident {
                token: self.cur.clone(),
                name: self.cur.literal.clone(),
            });
        }
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(parameters)
    }

    fn parse_call_expression(&mut self, callee: Expr) -> Option<Expr> {
        let token = self.cur.clone();
        let arguments = self.parse_expression_list(TokenKind::RParen)?;
        Some(Expr {
            node: ExprKind::Call {
                callee: Box::new(callee),
                arguments,
            },
            token,
        })
    }

    fn parse_array_literal(&mut self) -> Option<Expr> {
        let token = self.cur.clone();
        let elements = self.parse_expression_list(TokenKind::RBracket)?;
        Some(Expr {
            node: ExprKind::Array(elements),
            token,
        })
    }

    /// Comma-separated expressions up to (and consuming) the closing `end`
    /// token. Shared by call argument lists and array literals.
    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expr>> {
        let mut list = Vec::new();
        if self.peek_is(end) {
            self.advance();
            return Some(list);
        }
        self.advance();
        list.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek_is(TokenKind::Comma) {
            self.advance();
            self.advance();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }
        if !self.expect_peek(end) {
            return None;
        }
        Some(list)
    }

    fn parse_hash_literal(&mut self) -> Option<Expr> {
        let token = self.cur.clone();
        let mut pairs = Vec::new();
        while !self.peek_is(TokenKind::RBrace) {
            self.advance();
            let key = self.parse_expression(Precedence::Lowest)?;
            if !self.expect_peek(TokenKind::Colon) {
                return None;
            }
            self.advance();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));
            if !self.peek_is(TokenKind::RBrace) && !self.expect_peek(TokenKind::Comma) {
                return None;
            }
        }
        if !self.expect_peek(TokenKind::RBrace) {
            return None;
        }
        Some(Expr {
            node: ExprKind::Hash(pairs),
            token,
        })
    }

    fn parse_index_expression(&mut self, left: Expr) -> Option<Expr> {
        let token = self.cur.clone();
        self.advance();
        let index = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }
        Some(Expr {
            node: ExprKind::Index {
                left: Box::new(left),
                index: Box::new(index),
            },
            token,
        })
    }
}
