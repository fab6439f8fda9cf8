use lemur::object::EvalResult;
use lemur::{BuiltinRegistry, Interpreter, Lexer, Object, Parser, RuntimeError};

fn run(src: &str) -> Result<Option<Object>, RuntimeError> {
    let program = Parser::new(Lexer::new(src)).parse().expect("parse failed");
    Interpreter::new(BuiltinRegistry::new()).run(&program)
}

fn eval(src: &str) -> Object {
    run(src).expect("runtime error").expect("produced no value")
}

fn eval_err(src: &str) -> String {
    run(src).expect_err("expected a runtime error").0
}

#[test]
fn integer_arithmetic() {
    assert_eq!(eval("5 + 5 * 2"), Object::Int(15));
    assert_eq!(eval("10 / 2 - 3"), Object::Int(2));
    assert_eq!(eval("-50 + 100 + -50"), Object::Int(0));
    assert_eq!(eval("(5 + 10 * 2 + 15 / 3) * 2 + -10"), Object::Int(50));
    assert_eq!(eval("7 / 2"), Object::Int(3));
    assert_eq!(eval("-7 / 2"), Object::Int(-3));
}

#[test]
fn comparisons_and_bang() {
    assert_eq!(eval("1 < 2"), Object::Bool(true));
    assert_eq!(eval("1 > 2"), Object::Bool(false));
    assert_eq!(eval("1 == 1"), Object::Bool(true));
    assert_eq!(eval("1 != 2"), Object::Bool(true));
    assert_eq!(eval("true == true"), Object::Bool(true));
    assert_eq!(eval("(1 < 2) == true"), Object::Bool(true));
    assert_eq!(eval("!true"), Object::Bool(false));
    assert_eq!(eval("!!true"), Object::Bool(true));
    assert_eq!(eval("!5"), Object::Bool(false));
    assert_eq!(eval("!0"), Object::Bool(false));
}

#[test]
fn conditionals_and_truthiness() {
    assert_eq!(eval("if (false) { 10 }"), Object::Null);
    assert_eq!(eval("if (1 < 2) { 10 } else { 20 }"), Object::Int(10));
    assert_eq!(eval("if (1 > 2) { 10 } else { 20 }"), Object::Int(20));
    assert_eq!(eval("if (1) { 10 }"), Object::Int(10));
    // zero is truthy; only null and false are falsy
    assert_eq!(eval("if (0) { 10 } else { 20 }"), Object::Int(10));
}

#[test]
fn return_statements() {
    assert_eq!(eval("9; return 2 * 5; 9;"), Object::Int(10));
    assert_eq!(
        eval("if (10 > 1) { if (10 > 1) { return 10; } return 1; }"),
        Object::Int(10)
    );
}

#[test]
fn let_bindings_and_lookup() {
    assert_eq!(eval("let a = 5; a;"), Object::Int(5));
    assert_eq!(eval("let a = 5; let b = a; let c = a + b + 5; c;"), Object::Int(15));
    assert_eq!(eval_err("foobar"), "identifier not found: foobar");
}

#[test]
fn a_bare_let_produces_no_value() {
    assert_eq!(run("let a = 1;").unwrap(), None);
}

#[test]
fn bindings_persist_across_inputs_in_one_session() {
    let mut interp = Interpreter::new(BuiltinRegistry::new());
    let first = Parser::new(Lexer::new("let x = 5;")).parse().unwrap();
    assert_eq!(interp.run(&first).unwrap(), None);
    let second = Parser::new(Lexer::new("x * 2")).parse().unwrap();
    assert_eq!(interp.run(&second).unwrap(), Some(Object::Int(10)));
}

#[test]
fn error_messages() {
    assert_eq!(eval_err("5 + true"), "type mismatch: INTEGER + BOOLEAN");
    assert_eq!(eval_err("5 + true; 5;"), "type mismatch: INTEGER + BOOLEAN");
    assert_eq!(eval_err("-true"), "unknown operator: -BOOLEAN");
    assert_eq!(eval_err("true + false"), "unknown operator: BOOLEAN + BOOLEAN");
    assert_eq!(eval_err(r#""a" + "b""#), "unknown operator: STRING + STRING");
    assert_eq!(
        eval_err("if (10 > 1) { true + false; }"),
        "unknown operator: BOOLEAN + BOOLEAN"
    );
    assert_eq!(eval_err("5 / 0"), "division by zero");
}

#[test]
fn errors_propagate_out_of_calls() {
    assert_eq!(
        eval_err("let f = fn(x) { x + 1 }; f(true) + 10"),
        "type mismatch: BOOLEAN + INTEGER"
    );
    // the failing argument aborts the call before it happens
    assert_eq!(eval_err("len(foo)"), "identifier not found: foo");
}

#[test]
fn functions_and_calls() {
    assert_eq!(eval("let identity = fn(x) { x; }; identity(5);"), Object::Int(5));
    assert_eq!(eval("let double = fn(x) { x * 2; }; double(5);"), Object::Int(10));
    assert_eq!(eval("fn(x) { x; }(5)"), Object::Int(5));
    assert_eq!(
        eval("let max = fn(a, b) { if (a > b) { return a; } b }; max(3, 7)"),
        Object::Int(7)
    );
    assert_eq!(
        eval("let fact = fn(n) { if (n < 2) { return 1; } n * fact(n - 1) }; fact(5)"),
        Object::Int(120)
    );
}

#[test]
fn call_arity_is_exact() {
    assert_eq!(
        eval_err("let f = fn(x, y) { x }; f(1)"),
        "wrong number of arguments: want=2, got=1"
    );
    assert_eq!(
        eval_err("let f = fn() { 1 }; f(1)"),
        "wrong number of arguments: want=0, got=1"
    );
}

#[test]
fn calling_a_non_function_fails() {
    assert_eq!(eval_err("5(1)"), "not a function: INTEGER");
}

#[test]
fn closures_capture_their_defining_environment() {
    assert_eq!(
        eval("let newAdder = fn(x) { fn(y) { x + y } }; let addTwo = newAdder(2); addTwo(3);"),
        Object::Int(5)
    );
    // the captured environment outlives the call frame that created it
    assert_eq!(
        eval("let make = fn() { let n = 41; fn() { n + 1 } }; let f = make(); f()"),
        Object::Int(42)
    );
}

#[test]
fn parameters_shadow_outer_bindings() {
    assert_eq!(
        eval("let x = 1; let f = fn(x) { x }; f(2) + x"),
        Object::Int(3)
    );
}

#[test]
fn equality_is_identity_for_reference_types() {
    assert_eq!(eval("5 == 5"), Object::Bool(true));
    assert_eq!(eval("[1, 2] == [1, 2]"), Object::Bool(false));
    assert_eq!(eval("let a = [1, 2]; a == a"), Object::Bool(true));
    assert_eq!(eval(r#""a" == "a""#), Object::Bool(false));
    assert_eq!(eval(r#"let s = "a"; s == s"#), Object::Bool(true));
    // mixed types compare unequal instead of erroring
    assert_eq!(eval("1 == true"), Object::Bool(false));
    assert_eq!(eval("1 != true"), Object::Bool(true));
}

#[test]
fn array_literals_and_indexing() {
    assert_eq!(eval("[1, 2 * 2, 3 + 3]").to_string(), "[1, 4, 6]");
    assert_eq!(eval("[1, 2, 3][0]"), Object::Int(1));
    assert_eq!(eval("let i = 1; [1, 2, 3][i + 1]"), Object::Int(3));
    assert_eq!(eval("[1, 2, 3][3]"), Object::Null);
    assert_eq!(eval("[1, 2, 3][-1]"), Object::Null);
    assert_eq!(eval_err("5[0]"), "index operator not supported: INTEGER");
}

#[test]
fn array_builtins_have_value_semantics() {
    assert_eq!(
        eval("let arr = [1, 2, 3]; push(arr, 4);").to_string(),
        "[1, 2, 3, 4]"
    );
    // the original is untouched
    assert_eq!(
        eval("let arr = [1, 2, 3]; let grown = push(arr, 4); arr;").to_string(),
        "[1, 2, 3]"
    );
    assert_eq!(eval("let arr = [1, 2, 3]; rest(rest(rest(arr)))").to_string(), "[]");
    assert_eq!(eval("rest([])").to_string(), "[]");
    assert_eq!(eval("rest([1, 2, 3])").to_string(), "[2, 3]");
    assert_eq!(eval("first([1, 2, 3])"), Object::Int(1));
    assert_eq!(eval("last([1, 2, 3])"), Object::Int(3));
    assert_eq!(eval("first([])"), Object::Null);
    assert_eq!(eval("last([])"), Object::Null);
}

#[test]
fn len_builtin() {
    assert_eq!(eval(r#"len("hello")"#), Object::Int(5));
    assert_eq!(eval(r#"len("")"#), Object::Int(0));
    assert_eq!(eval("len([1, 2, 3])"), Object::Int(3));
}

#[test]
fn builtin_misuse() {
    assert_eq!(eval_err("len(1, 2)"), "wrong number of arguments. got=2, want=1");
    assert_eq!(eval_err("len(1)"), "argument to `len` not supported, got INTEGER");
    assert_eq!(eval_err("first(1)"), "argument to `first` must be ARRAY, got INTEGER");
    assert_eq!(eval_err("rest(true)"), "argument to `rest` must be ARRAY, got BOOLEAN");
    assert_eq!(eval_err(r#"push("x", 1)"#), "argument to `push` must be ARRAY, got STRING");
}

#[test]
fn hash_literals_and_lookup() {
    assert_eq!(
        eval(r#"let h = {"one": 1, true: 2, 3: 3}; h["one"]"#),
        Object::Int(1)
    );
    assert_eq!(eval(r#"let h = {"one": 1, true: 2, 3: 3}; h[true]"#), Object::Int(2));
    assert_eq!(eval(r#"let h = {"one": 1, true: 2, 3: 3}; h[3]"#), Object::Int(3));
    assert_eq!(eval(r#"{"a": 1}["b"]"#), Object::Null);
    assert_eq!(eval(r#"let key = "a"; {"a": 5}[key]"#), Object::Int(5));
    // string keys hash by content, not identity
    assert_eq!(eval(r#"{"a" : 1}["a"]"#), Object::Int(1));
}

#[test]
fn unhashable_keys_are_rejected() {
    assert_eq!(
        eval_err(r#"{"a": 1}[fn(x) { x }]"#),
        "unusable as hash key: FUNCTION"
    );
    assert_eq!(eval_err("{[1]: 2}"), "unusable as hash key: ARRAY");
}

#[test]
fn registry_can_be_substituted() {
    fn answer(_args: &[Object]) -> EvalResult {
        Ok(Object::Int(42))
    }
    let mut builtins = BuiltinRegistry::empty();
    builtins.register("answer", answer);
    let mut interp = Interpreter::new(builtins);

    let program = Parser::new(Lexer::new("answer()")).parse().unwrap();
    assert_eq!(interp.run(&program).unwrap(), Some(Object::Int(42)));

    // the stock names are absent from a substituted registry
    let program = Parser::new(Lexer::new("len([])")).parse().unwrap();
    assert!(interp.run(&program).is_err());
}

#[test]
fn builtins_resolve_through_identifier_lookup() {
    // a let binding shadows a builtin name
    assert_eq!(eval("let len = 5; len"), Object::Int(5));
    assert_eq!(eval("len").to_string(), "builtin function");
}
