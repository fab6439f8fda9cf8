//! Built-ins: the fixed registry of host functions callable from the
//! language.

use std::collections::HashMap;
use std::rc::Rc;

use crate::object::{BuiltinFn, EvalResult, Object, RuntimeError};

/// Constructed once at session start and held by the interpreter. Tests can
/// start from `empty()` and register substitutes.
#[derive(Clone)]
pub struct BuiltinRegistry {
    fns: HashMap<String, BuiltinFn>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        let mut fns = HashMap::new();
        fns.insert("len".into(), builtin_len as BuiltinFn);
        fns.insert("first".into(), builtin_first as BuiltinFn);
        fns.insert("last".into(), builtin_last as BuiltinFn);
        fns.insert("rest".into(), builtin_rest as BuiltinFn);
        fns.insert("push".into(), builtin_push as BuiltinFn);
        fns.insert("puts".into(), builtin_puts as BuiltinFn);
        Self { fns }
    }

    pub fn empty() -> Self {
        Self {
            fns: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, f: BuiltinFn) {
        self.fns.insert(name.into(), f);
    }

    pub fn get(&self, name: &str) -> Option<BuiltinFn> {
        self.fns.get(name).copied()
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Arity is checked before argument types, for every builtin.
fn expect_arity(args: &[Object], want: usize) -> Result<(), RuntimeError> {
    if args.len() != want {
        return Err(RuntimeError(format!(
            "wrong number of arguments. got={}, want={}",
            args.len(),
            want
        )));
    }
    Ok(())
}

fn builtin_len(args: &[Object]) -> EvalResult {
    expect_arity(args, 1)?;
    match &args[0] {
        Object::Str(s) => Ok(Object::Int(s.len() as i64)),
        Object::Array(elems) => Ok(Object::Int(elems.len() as i64)),
        other => Err(RuntimeError(format!(
            "argument to `len` not supported, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_first(args: &[Object]) -> EvalResult {
    expect_arity(args, 1)?;
    match &args[0] {
        Object::Array(elems) => Ok(elems.first().cloned().unwrap_or(Object::Null)),
        other => Err(RuntimeError(format!(
            "argument to `first` must be ARRAY, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_last(args: &[Object]) -> EvalResult {
    expect_arity(args, 1)?;
    match &args[0] {
        Object::Array(elems) => Ok(elems.last().cloned().unwrap_or(Object::Null)),
        other => Err(RuntimeError(format!(
            "argument to `last` must be ARRAY, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_rest(args: &[Object]) -> EvalResult {
    expect_arity(args, 1)?;
    match &args[0] {
        Object::Array(elems) => {
            let rest: Vec<Object> = elems.get(1..).unwrap_or(&[]).to_vec();
            Ok(Object::Array(Rc::from(rest)))
        }
        other => Err(RuntimeError(format!(
            "argument to `rest` must be ARRAY, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_push(args: &[Object]) -> EvalResult {
    expect_arity(args, 2)?;
    match &args[0] {
        Object::Array(elems) => {
            // Value semantics: the input array is never mutated.
            let mut pushed: Vec<Object> = elems.to_vec();
            pushed.push(args[1].clone());
            Ok(Object::Array(Rc::from(pushed)))
        }
        other => Err(RuntimeError(format!(
            "argument to `push` must be ARRAY, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_puts(args: &[Object]) -> EvalResult {
    for arg in args {
        println!("{}", arg);
    }
    Ok(Object::Null)
}
