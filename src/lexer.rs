//! Lexer: turns source text into a pull stream of tokens.

use logos::Logos;

use crate::token::{Token, TokenKind};

/// Pull-based tokenizer. The parser drives it one token at a time; after the
/// input is exhausted every further call returns the `Eof` sentinel.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(src),
        }
    }

    pub fn next_token(&mut self) -> Token {
        match self.inner.next() {
            None => Token::eof(),
            Some(Ok(TokenKind::Str)) => {
                let slice = self.inner.slice();
                Token::new(TokenKind::Str, &slice[1..slice.len() - 1])
            }
            Some(Ok(kind)) => Token::new(kind, self.inner.slice()),
            Some(Err(())) => Token::new(TokenKind::Illegal, self.inner.slice()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token();
            let done = tok.kind.is_eof();
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn lex_let_statement() {
        use TokenKind::*;
        assert_eq!(
            kinds("let five = 5;"),
            vec![Let, Ident, Assign, Int, Semicolon, Eof]
        );
    }

    #[test]
    fn lex_operators_and_delimiters() {
        use TokenKind::*;
        assert_eq!(
            kinds("!-/*5; 5 < 10 > 5; 10 == 10; 10 != 9;"),
            vec![
                Bang, Minus, Slash, Asterisk, Int, Semicolon, Int, Lt, Int, Gt, Int, Semicolon,
                Int, Eq, Int, Semicolon, Int, NotEq, Int, Semicolon, Eof
            ]
        );
    }

    #[test]
    fn lex_keywords_and_literals() {
        let mut lexer = Lexer::new(r#"fn(x) { if (true) { return "hi" } else { [1, 2] } }"#);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token();
            if tok.kind.is_eof() {
                break;
            }
            tokens.push(tok);
        }
        assert_eq!(tokens[0].kind, TokenKind::Function);
        let s = tokens.iter().find(|t| t.kind == TokenKind::Str).unwrap();
        assert_eq!(s.literal, "hi");
    }

    #[test]
    fn comments_and_whitespace_are_skipped() {
        use TokenKind::*;
        assert_eq!(kinds("1 // trailing\n  + 2"), vec![Int, Plus, Int, Eof]);
    }

    #[test]
    fn unknown_input_is_illegal() {
        let mut lexer = Lexer::new("@");
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::Illegal);
        assert_eq!(tok.literal, "@");
    }

    #[test]
    fn eof_is_sticky() {
        let mut lexer = Lexer::new("");
        assert!(lexer.next_token().kind.is_eof());
        assert!(lexer.next_token().kind.is_eof());
    }
}
