//! Lemur is a small dynamically-typed expression language: lexer, Pratt
//! parser, and AST-walking interpreter with first-class functions and
//! closures.

pub mod ast;
pub mod builtins;
pub mod environment;
pub mod interpreter;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod token;

pub use ast::Program;
pub use builtins::BuiltinRegistry;
pub use interpreter::Interpreter;
pub use lexer::Lexer;
pub use object::{Object, RuntimeError};
pub use parser::{ParseError, Parser};
