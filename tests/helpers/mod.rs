#![allow(dead_code)]

use std::sync::Arc;

use cogspace::atom::Atom;
use cogspace::config::{InterpreterConfig, MemoryConfig};
use cogspace::interp::Interpreter;
use cogspace::memory::store::Memory;
use cogspace::reader;

/// Fresh atomspace with default settings.
pub fn test_space() -> Arc<Memory> {
    Arc::new(Memory::new(MemoryConfig::default()))
}

/// Interpreter over a fresh space with the builtins registered.
pub fn test_interp() -> Interpreter {
    Interpreter::new(test_space(), InterpreterConfig::default())
}

/// Interpreter with `program` already loaded.
pub fn interp_with(program: &str) -> Interpreter {
    let interp = test_interp();
    interp.run_program(program).unwrap();
    interp
}

/// Parse one atom from surface syntax.
pub fn atom(text: &str) -> Atom {
    reader::parse_atom(text).unwrap()
}

/// Rendered results, sorted, for order-independent comparison.
pub fn sorted_strings(atoms: &[Atom]) -> Vec<String> {
    let mut out: Vec<String> = atoms.iter().map(ToString::to_string).collect();
    out.sort();
    out
}

/// Peano addition rules.
pub const PEANO: &str = r#"
; addition on unary naturals
(= (add Z $n) $n)
(= (add (S $m) $n) (S (add $m $n)))
"#;
