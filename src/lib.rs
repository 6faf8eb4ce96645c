//! An atomspace with a rewrite interpreter and a utility-learning agent.
//!
//! Knowledge is stored as immutable, structurally identified atoms. Each
//! stored atom carries probabilistic truth and a two-timescale attention
//! value that drives recall order and forgetting. Rules are ordinary atoms of
//! the form `(= pattern template)`, so programs, queries and the agent all
//! read and write the same store.
//!
//! | Atom | Example | Identity |
//! |------|---------|----------|
//! | **Symbol** | `Red` | its name |
//! | **Variable** | `$x` | `$`-prefixed name |
//! | **Expression** | `(Knows A $x)` | children's identities in parentheses |
//! | **Grounded** | `42`, `"text"`, `+` | type tag plus value, or function name |
//!
//! # Architecture
//!
//! - **Store**: concurrent interning table with per-atom metadata locks and
//!   a head index for candidate selection
//! - **Matching**: iterative unification with occurs-check
//! - **Evaluation**: depth- and width-bounded non-deterministic rewriting
//! - **Reclamation**: periodic priority decay and lowest-first forgetting
//!
//! # Modules
//!
//! - [`atom`] — Atom model and grounded values
//! - [`memory`] — Atomspace: store, query, forgetting, maintenance and statistics
//! - [`unify`] — Unification, substitution and renaming apart
//! - [`interp`] — Rewrite interpreter and grounded-function registry
//! - [`agent`] — Perceive/decide/act/learn loop and environments
//! - [`reader`] — Surface-syntax parser
//! - [`config`] — Configuration loading from TOML files and environment variables

pub mod agent;
pub mod atom;
pub mod config;
pub mod interp;
pub mod memory;
pub mod reader;
pub mod unify;
