//! Lemur interpreter: script file or REPL.
//!
//! Usage:
//!   cargo run -- <script.lm>
//!   cargo run --              # REPL

use std::env;
use std::fs;

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use lemur::{BuiltinRegistry, Interpreter, Lexer, Parser};

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    if let Some(path) = args.first() {
        let src = fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("could not read {}: {}", path, e);
            std::process::exit(1);
        });
        let mut interp = Interpreter::new(BuiltinRegistry::new());
        run_with_interp(&mut interp, &src, false);
        return;
    }

    println!("lemur repl (;q to quit)");
    let mut interp = Interpreter::new(BuiltinRegistry::new());
    let mut rl = match Editor::<(), DefaultHistory>::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("repl error: {}", e);
            std::process::exit(1);
        }
    };
    let history_path = repl_history_path();
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() { ">> " } else { "... " };
        let line = match rl.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                if buffer.is_empty() {
                    break;
                }
                buffer.clear();
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("repl error: {}", e);
                break;
            }
        };
        let line = line.trim_end();

        if buffer.is_empty() && line.is_empty() {
            continue;
        }
        if buffer.is_empty() && line.starts_with(";q") {
            break;
        }
        let _ = rl.add_history_entry(line);
        if !buffer.is_empty() {
            buffer.push('\n');
        }
        buffer.push_str(line);
        if needs_more_input(&buffer) {
            continue;
        }
        run_with_interp(&mut interp, &buffer, true);
        buffer.clear();
    }

    if let Some(ref path) = history_path {
        let _ = rl.save_history(path);
    }
}

/// Parses and evaluates one input unit. Parse diagnostics suppress
/// evaluation entirely; `let` bindings survive in the interpreter's session
/// environment either way.
fn run_with_interp(interp: &mut Interpreter, src: &str, echo_result: bool) {
    let parser = Parser::new(Lexer::new(src));
    let program = match parser.parse() {
        Ok(program) => program,
        Err(errors) => {
            eprintln!("parser errors:");
            for e in errors {
                eprintln!("  {}", e);
            }
            return;
        }
    };
    match interp.run(&program) {
        Ok(Some(value)) if echo_result => println!("{}", value),
        Ok(_) => {}
        Err(e) => eprintln!("runtime error: {}", e),
    }
}

fn repl_history_path() -> Option<String> {
    let home = env::var("HOME").ok()?;
    Some(format!("{}/.lemur_history", home))
}

/// Keeps the REPL reading while delimiters are unbalanced, so function
/// literals can span lines.
fn needs_more_input(src: &str) -> bool {
    let mut paren = 0i32;
    let mut brace = 0i32;
    let mut bracket = 0i32;
    let mut in_str = false;

    for ch in src.chars() {
        if in_str {
            if ch == '"' {
                in_str = false;
            }
            continue;
        }
        match ch {
            '"' => in_str = true,
            '(' => paren += 1,
            ')' => paren -= 1,
            '{' => brace += 1,
            '}' => brace -= 1,
            '[' => bracket += 1,
            ']' => bracket -= 1,
            _ => {}
        }
    }

    paren > 0 || brace > 0 || bracket > 0
}
