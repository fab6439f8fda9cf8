//! Runtime values (Object), hash keys, and the runtime error type.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::{Block, Ident};
use crate::environment::Environment;

pub type EvalResult = Result<Object, RuntimeError>;

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError(pub String);

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for RuntimeError {}

/// Host function invocable from the language. Validates its own arity and
/// argument types.
pub type BuiltinFn = fn(&[Object]) -> EvalResult;

#[derive(Clone)]
pub enum Object {
    Int(i64),
    Bool(bool),
    Str(Rc<str>),
    Null,
    Array(Rc<[Object]>),
    Hash(Rc<HashMap<HashKey, HashPair>>),
    Function(Rc<Closure>),
    Builtin(BuiltinFn),
    /// Control-flow carrier for `return`; unwrapped at program and call
    /// boundaries, never observable from language code.
    Return(Box<Object>),
}

/// A function value paired with the environment active at its definition
/// site. The `Rc` keeps that environment alive after the defining call
/// returns.
pub struct Closure {
    pub parameters: Vec<Ident>,
    pub body: Block,
    pub env: Rc<RefCell<Environment>>,
}

/// An entry in a hash: the original key object plus the value, so inspection
/// can render the key as written.
#[derive(Clone)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

/// Derived, comparable key for hash containers: a type tag plus a 64-bit
/// content hash. Only integers, booleans, and strings are hashable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub tag: &'static str,
    pub value: u64,
}

// FNV-1a, 64-bit. Stable across runs, unlike the std hasher.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

impl Object {
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Int(_) => "INTEGER",
            Object::Bool(_) => "BOOLEAN",
            Object::Str(_) => "STRING",
            Object::Null => "NULL",
            Object::Array(_) => "ARRAY",
            Object::Hash(_) => "HASH",
            Object::Function(_) => "FUNCTION",
            Object::Builtin(_) => "BUILTIN",
            Object::Return(_) => "RETURN_VALUE",
        }
    }

    /// `None` when the value cannot be used as a hash key.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Object::Int(i) => Some(HashKey {
                tag: self.type_name(),
                value: *i as u64,
            }),
            Object::Bool(b) => Some(HashKey {
                tag: self.type_name(),
                value: u64::from(*b),
            }),
            Object::Str(s) => Some(HashKey {
                tag: self.type_name(),
                value: fnv1a(s.as_bytes()),
            }),
            _ => None,
        }
    }
}

/// Language-level equality: integers, booleans, and null compare by value
/// (the latter two are canonical singletons, so value equality and identity
/// coincide); every reference type compares by instance identity. Two
/// structurally identical arrays built independently are not equal.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Int(a), Object::Int(b)) => a == b,
            (Object::Bool(a), Object::Bool(b)) => a == b,
            (Object::Null, Object::Null) => true,
            (Object::Str(a), Object::Str(b)) => Rc::ptr_eq(a, b),
            (Object::Array(a), Object::Array(b)) => Rc::ptr_eq(a, b),
            (Object::Hash(a), Object::Hash(b)) => Rc::ptr_eq(a, b),
            (Object::Function(a), Object::Function(b)) => Rc::ptr_eq(a, b),
            (Object::Builtin(a), Object::Builtin(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Int(i) => write!(f, "Int({})", i),
            Object::Bool(b) => write!(f, "Bool({})", b),
            Object::Str(s) => write!(f, "Str({:?})", s),
            Object::Null => write!(f, "Null"),
            Object::Array(elems) => write!(f, "Array({:?})", elems),
            Object::Hash(_) => write!(f, "Hash({})", self),
            Object::Function(c) => {
                let params: Vec<&str> = c.parameters.iter().map(|p| p.name.as_str()).collect();
                write!(f, "Function({})", params.join(", "))
            }
            Object::Builtin(_) => write!(f, "Builtin"),
            Object::Return(v) => write!(f, "Return({:?})", v),
        }
    }
}

/// Human-readable inspect form, as printed by the REPL.
impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Int(i) => write!(f, "{}", i),
            Object::Bool(b) => write!(f, "{}", b),
            Object::Str(s) => write!(f, "{}", s),
            Object::Null => write!(f, "null"),
            Object::Array(elems) => {
                let inner: Vec<String> = elems.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", inner.join(", "))
            }
            Object::Hash(pairs) => {
                let inner: Vec<String> = pairs
                    .values()
                    .map(|p| format!("{}: {}", p.key, p.value))
                    .collect();
                write!(f, "{{{}}}", inner.join(", "))
            }
            Object::Function(c) => {
                let params: Vec<String> = c.parameters.iter().map(|p| p.to_string()).collect();
                write!(f, "fn({}) {{ {} }}", params.join(", "), c.body)
            }
            Object::Builtin(_) => write!(f, "builtin function"),
            Object::Return(v) => write!(f, "{}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_hash_keys_are_content_based() {
        let a = Object::Str(Rc::from("Hello World"));
        let b = Object::Str(Rc::from("Hello World"));
        let c = Object::Str(Rc::from("something else"));
        assert_eq!(a.hash_key(), b.hash_key());
        assert_ne!(a.hash_key(), c.hash_key());
    }

    #[test]
    fn int_and_bool_keys_do_not_collide() {
        assert_ne!(Object::Int(1).hash_key(), Object::Bool(true).hash_key());
    }

    #[test]
    fn only_scalars_are_hashable() {
        assert!(Object::Null.hash_key().is_none());
        assert!(Object::Array(Rc::from(vec![])).hash_key().is_none());
    }

    #[test]
    fn reference_types_compare_by_identity() {
        let a = Object::Str(Rc::from("x"));
        let b = Object::Str(Rc::from("x"));
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
