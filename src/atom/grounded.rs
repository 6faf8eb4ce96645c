//! Grounded atoms: native values and native functions wrapped as atoms.

use std::fmt;
use std::sync::Arc;

use super::Atom;
use crate::memory::store::Memory;

/// Signature of a native function callable from the interpreter.
///
/// Arguments arrive fully evaluated. The atomspace is passed explicitly so
/// functions such as `match` can query it. An `Err` means "no result": the
/// interpreter logs it and moves on to its next strategy.
pub type NativeFn = dyn Fn(&[Atom], &Memory) -> anyhow::Result<Atom> + Send + Sync;

/// A named native function. Identity is the registered name.
#[derive(Clone)]
pub struct GroundedFn {
    name: Arc<str>,
    func: Arc<NativeFn>,
}

impl GroundedFn {
    pub fn new<F>(name: impl AsRef<str>, func: F) -> Self
    where
        F: Fn(&[Atom], &Memory) -> anyhow::Result<Atom> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.as_ref()),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Atom], space: &Memory) -> anyhow::Result<Atom> {
        (self.func)(args, space)
    }
}

impl fmt::Debug for GroundedFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroundedFn").field("name", &self.name).finish()
    }
}

/// Closed set of payloads a grounded atom may carry.
#[derive(Debug, Clone)]
pub enum GroundedValue {
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Atom>),
    Function(GroundedFn),
}

impl GroundedValue {
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::List(_) => "list",
            Self::Function(_) => "fn",
        }
    }
}

#[derive(Debug)]
pub struct Grounded {
    value: GroundedValue,
    id: String,
}

impl Grounded {
    pub fn new(value: GroundedValue) -> Self {
        // `&tag repr`: the embedded space keeps grounded identities apart
        // from every symbol the reader can produce.
        let repr = match &value {
            GroundedValue::Int(i) => i.to_string(),
            GroundedValue::Float(x) => format!("{x:?}"),
            GroundedValue::Str(s) => format!("{s:?}"),
            GroundedValue::List(items) => {
                let ids: Vec<&str> = items.iter().map(Atom::id).collect();
                format!("[{}]", ids.join(" "))
            }
            GroundedValue::Function(func) => func.name().to_string(),
        };
        let id = format!("&{} {}", value.type_tag(), repr);
        Self { value, id }
    }

    pub fn value(&self) -> &GroundedValue {
        &self.value
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Grounded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            GroundedValue::Int(i) => write!(f, "{i}"),
            GroundedValue::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            GroundedValue::Float(x) => write!(f, "{x}"),
            GroundedValue::Str(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        other => write!(f, "{other}")?,
                    }
                }
                f.write_str("\"")
            }
            GroundedValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            GroundedValue::Function(func) => f.write_str(func.name()),
        }
    }
}
