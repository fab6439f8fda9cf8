//! AST-walking interpreter.
//!
//! Evaluation is a synchronous recursive walk. Runtime failures travel on the
//! `Err` side of `EvalResult` and short-circuit every enclosing construct via
//! `?`; `return` travels as the `Object::Return` wrapper and is unwrapped at
//! the program top and at function-call boundaries.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::*;
use crate::builtins::BuiltinRegistry;
use crate::environment::Environment;
use crate::object::{Closure, EvalResult, HashPair, Object, RuntimeError};

pub struct Interpreter {
    env: Rc<RefCell<Environment>>,
    builtins: BuiltinRegistry,
}

impl Interpreter {
    pub fn new(builtins: BuiltinRegistry) -> Self {
        Self {
            env: Rc::new(RefCell::new(Environment::new())),
            builtins,
        }
    }

    /// Evaluates one program unit against the session environment, which
    /// persists across calls. `None` means the unit produced nothing to
    /// display (e.g. a trailing `let`).
    pub fn run(&mut self, program: &Program) -> Result<Option<Object>, RuntimeError> {
        let mut last = None;
        for stmt in &program.statements {
            match self.eval_stmt(stmt)? {
                Some(Object::Return(value)) => return Ok(Some(*value)),
                outcome => last = outcome,
            }
        }
        Ok(last)
    }

    fn eval_stmt(&mut self, stmt: &Stmt) -> Result<Option<Object>, RuntimeError> {
        match &stmt.node {
            StmtKind::Let { name, value } => {
                let value = self.eval(value)?;
                self.env.borrow_mut().set(name.name.clone(), value);
                Ok(None)
            }
            StmtKind::Return { value } => {
                let value = self.eval(value)?;
                Ok(Some(Object::Return(Box::new(value))))
            }
            StmtKind::Expr(e) => Ok(Some(self.eval(e)?)),
        }
    }

    /// Blocks share the enclosing scope; only function calls open one. A
    /// `Return` produced anywhere in the block stops it and passes upward
    /// still wrapped, so nested `if` arms cannot swallow it.
    fn eval_block(&mut self, block: &Block) -> EvalResult {
        let mut last = Object::Null;
        for stmt in &block.statements {
            match self.eval_stmt(stmt)? {
                Some(value @ Object::Return(_)) => return Ok(value),
                Some(value) => last = value,
                None => last = Object::Null,
            }
        }
        Ok(last)
    }

    fn eval(&mut self, expr: &Expr) -> EvalResult {
        match &expr.node {
            ExprKind::Int(v) => Ok(Object::Int(*v)),
            ExprKind::Bool(v) => Ok(Object::Bool(*v)),
            ExprKind::Str(s) => Ok(Object::Str(Rc::from(s.as_str()))),
            ExprKind::Ident(name) => self.lookup(name),
            ExprKind::Prefix { op, right } => {
                let right = self.eval(right)?;
                eval_prefix(*op, right)
            }
            ExprKind::Infix { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                eval_infix(*op, left, right)
            }
            ExprKind::If {
                condition,
                consequence,
                alternative,
            } => {
                let condition = self.eval(condition)?;
                if is_truthy(&condition) {
                    self.eval_block(consequence)
                } else if let Some(alt) = alternative {
                    self.eval_block(alt)
                } else {
                    Ok(Object::Null)
                }
            }
            ExprKind::Function { parameters, body } => {
                Ok(Object::Function(Rc::new(Closure {
                    parameters: parameters.clone(),
                    body: body.clone(),
                    env: self.env.clone(),
                })))
            }
            ExprKind::Call { callee, arguments } => {
                let callee = self.eval(callee)?;
                let mut args = Vec::with_capacity(arguments.len());
                // Left to right; the first failing argument aborts the call.
                for arg in arguments {
                    args.push(self.eval(arg)?);
                }
                self.apply(callee, args)
            }
            ExprKind::Array(elements) => {
                let mut elems = Vec::with_capacity(elements.len());
                for e in elements {
                    elems.push(self.eval(e)?);
                }
                Ok(Object::Array(Rc::from(elems)))
            }
            ExprKind::Hash(pairs) => self.eval_hash_literal(pairs),
            ExprKind::Index { left, index } => {
                let left = self.eval(left)?;
                let index = self.eval(index)?;
                eval_index(left, index)
            }
        }
    }

    fn lookup(&self, name: &str) -> EvalResult {
        if let Some(value) = self.env.borrow().get(name) {
            return Ok(value);
        }
        if let Some(f) = self.builtins.get(name) {
            return Ok(Object::Builtin(f));
        }
        Err(RuntimeError(format!("identifier not found: {}", name)))
    }

    fn apply(&mut self, callee: Object, args: Vec<Object>) -> EvalResult {
        match callee {
            Object::Builtin(f) => f(&args),
            Object::Function(closure) => {
                if closure.parameters.len() != args.len() {
                    return Err(RuntimeError(format!(
                        "wrong number of arguments: want={}, got={}",
                        closure.parameters.len(),
                        args.len()
                    )));
                }
                // The call frame chains to the *captured* environment, not
                // the caller's; that is what makes closures work.
                let mut call_env = Environment::enclosed(closure.env.clone());
                for (param, arg) in closure.parameters.iter().zip(args) {
                    call_env.set(param.name.clone(), arg);
                }
                let prev = std::mem::replace(&mut self.env, Rc::new(RefCell::new(call_env)));
                let result = self.eval_block(&closure.body);
                self.env = prev;
                match result? {
                    Object::Return(value) => Ok(*value),
                    value => Ok(value),
                }
            }
            other => Err(RuntimeError(format!(
                "not a function: {}",
                other.type_name()
            ))),
        }
    }

    fn eval_hash_literal(&mut self, pairs: &[(Expr, Expr)]) -> EvalResult {
        let mut map = HashMap::new();
        for (key_expr, value_expr) in pairs {
            let key = self.eval(key_expr)?;
            let hash_key = key
                .hash_key()
                .ok_or_else(|| RuntimeError(format!("unusable as hash key: {}", key.type_name())))?;
            let value = self.eval(value_expr)?;
            map.insert(hash_key, HashPair { key, value });
        }
        Ok(Object::Hash(Rc::new(map)))
    }
}

fn is_truthy(obj: &Object) -> bool {
    !matches!(obj, Object::Null | Object::Bool(false))
}

fn eval_prefix(op: PrefixOp, right: Object) -> EvalResult {
    match op {
        PrefixOp::Not => Ok(Object::Bool(!is_truthy(&right))),
        PrefixOp::Neg => match right {
            Object::Int(v) => Ok(Object::Int(v.wrapping_neg())),
            other => Err(RuntimeError(format!(
                "unknown operator: -{}",
                other.type_name()
            ))),
        },
    }
}

fn eval_infix(op: InfixOp, left: Object, right: Object) -> EvalResult {
    match (&left, &right) {
        (Object::Int(a), Object::Int(b)) => eval_int_infix(op, *a, *b),
        _ => match op {
            // Non-integer equality is instance identity; mixed types compare
            // unequal rather than erroring.
            InfixOp::Eq => Ok(Object::Bool(left == right)),
            InfixOp::NotEq => Ok(Object::Bool(left != right)),
            _ if left.type_name() != right.type_name() => Err(RuntimeError(format!(
                "type mismatch: {} {} {}",
                left.type_name(),
                op,
                right.type_name()
            ))),
            _ => Err(RuntimeError(format!(
                "unknown operator: {} {} {}",
                left.type_name(),
                op,
                right.type_name()
            ))),
        },
    }
}

fn eval_int_infix(op: InfixOp, a: i64, b: i64) -> EvalResult {
    match op {
        InfixOp::Add => Ok(Object::Int(a.wrapping_add(b))),
        InfixOp::Sub => Ok(Object::Int(a.wrapping_sub(b))),
        InfixOp::Mul => Ok(Object::Int(a.wrapping_mul(b))),
        InfixOp::Div => {
            if b == 0 {
                return Err(RuntimeError("division by zero".into()));
            }
            Ok(Object::Int(a.wrapping_div(b)))
        }
        InfixOp::Lt => Ok(Object::Bool(a < b)),
        InfixOp::Gt => Ok(Object::Bool(a > b)),
        InfixOp::Eq => Ok(Object::Bool(a == b)),
        InfixOp::NotEq => Ok(Object::Bool(a != b)),
    }
}

fn eval_index(left: Object, index: Object) -> EvalResult {
    match (&left, &index) {
        (Object::Array(elems), Object::Int(i)) => {
            if *i < 0 {
                return Ok(Object::Null);
            }
            Ok(elems.get(*i as usize).cloned().unwrap_or(Object::Null))
        }
        (Object::Hash(pairs), _) => {
            let key = index.hash_key().ok_or_else(|| {
                RuntimeError(format!("unusable as hash key: {}", index.type_name()))
            })?;
            Ok(pairs
                .get(&key)
                .map(|pair| pair.value.clone())
                .unwrap_or(Object::Null))
        }
        _ => Err(RuntimeError(format!(
            "index operator not supported: {}",
            left.type_name()
        ))),
    }
}
