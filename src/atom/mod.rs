//! Atom model: the immutable structural values the atomspace is made of.
//!
//! An [`Atom`] is one of four variants: a named [`Symbol`](Atom::Symbol), a
//! [`Variable`](Atom::Variable) written with the `$` sigil, an
//! [`Expression`] (an ordered list of child atoms) or a [`Grounded`] wrapper
//! around a native value or function. Every atom carries a structural
//! identity string ([`Atom::id`]); two atoms with the same identity are equal
//! and are interned to a single instance by [`Memory`](crate::memory::store::Memory).
//!
//! Atoms are cheap to clone: every variant is reference counted, so parents
//! share their children instead of copying them.

pub mod grounded;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub use grounded::{Grounded, GroundedFn, GroundedValue, NativeFn};

/// Reserved prefix distinguishing variables from symbols.
pub const VARIABLE_SIGIL: char = '$';

/// Coarse classification used by statistics and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomKind {
    Symbol,
    Variable,
    Expression,
    Grounded,
}

impl AtomKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::Variable => "variable",
            Self::Expression => "expression",
            Self::Grounded => "grounded",
        }
    }
}

impl fmt::Display for AtomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub enum Atom {
    /// Named constant; identity is the name.
    Symbol(Arc<str>),
    /// Placeholder; stores the sigil-prefixed name, which is also its identity.
    Variable(Arc<str>),
    Expression(Arc<Expression>),
    Grounded(Arc<Grounded>),
}

/// Ordered, immutable sequence of child atoms.
pub struct Expression {
    children: Vec<Atom>,
    id: String,
    has_variables: bool,
}

impl Expression {
    fn new(children: Vec<Atom>) -> Self {
        let mut id = String::with_capacity(children.len() * 8 + 2);
        id.push('(');
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                id.push(' ');
            }
            id.push_str(child.id());
        }
        id.push(')');
        let has_variables = children.iter().any(Atom::has_variables);
        Self {
            children,
            id,
            has_variables,
        }
    }

    pub fn children(&self) -> &[Atom] {
        &self.children
    }

    pub fn head(&self) -> Option<&Atom> {
        self.children.first()
    }

    /// Every child after the head.
    pub fn tail(&self) -> &[Atom] {
        self.children.get(1..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn has_variables(&self) -> bool {
        self.has_variables
    }
}

impl Atom {
    pub fn sym(name: impl AsRef<str>) -> Self {
        Atom::Symbol(Arc::from(name.as_ref()))
    }

    /// Build a variable. The sigil is added when `name` does not carry it.
    pub fn var(name: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        if name.starts_with(VARIABLE_SIGIL) {
            Atom::Variable(Arc::from(name))
        } else {
            Atom::Variable(Arc::from(format!("{VARIABLE_SIGIL}{name}")))
        }
    }

    pub fn expr(children: Vec<Atom>) -> Self {
        Atom::Expression(Arc::new(Expression::new(children)))
    }

    pub fn int(value: i64) -> Self {
        Self::grounded(GroundedValue::Int(value))
    }

    pub fn float(value: f64) -> Self {
        Self::grounded(GroundedValue::Float(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::grounded(GroundedValue::Str(value.into()))
    }

    pub fn list(items: Vec<Atom>) -> Self {
        Self::grounded(GroundedValue::List(items))
    }

    pub fn function(func: GroundedFn) -> Self {
        Self::grounded(GroundedValue::Function(func))
    }

    pub fn grounded(value: GroundedValue) -> Self {
        Atom::Grounded(Arc::new(Grounded::new(value)))
    }

    /// Structural identity string.
    pub fn id(&self) -> &str {
        match self {
            Atom::Symbol(name) => name,
            Atom::Variable(name) => name,
            Atom::Expression(expr) => &expr.id,
            Atom::Grounded(g) => g.id(),
        }
    }

    pub fn kind(&self) -> AtomKind {
        match self {
            Atom::Symbol(_) => AtomKind::Symbol,
            Atom::Variable(_) => AtomKind::Variable,
            Atom::Expression(_) => AtomKind::Expression,
            Atom::Grounded(_) => AtomKind::Grounded,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Atom::Variable(_))
    }

    /// True for variables and for expressions containing one at any depth.
    pub fn has_variables(&self) -> bool {
        match self {
            Atom::Variable(_) => true,
            Atom::Expression(expr) => expr.has_variables,
            Atom::Symbol(_) | Atom::Grounded(_) => false,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Atom::Symbol(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_expression(&self) -> Option<&Expression> {
        match self {
            Atom::Expression(expr) => Some(expr),
            _ => None,
        }
    }

    pub fn as_grounded(&self) -> Option<&Grounded> {
        match self {
            Atom::Grounded(g) => Some(g),
            _ => None,
        }
    }

    /// Numeric view of grounded integers and floats.
    pub fn as_number(&self) -> Option<f64> {
        match self.as_grounded()?.value() {
            GroundedValue::Int(i) => Some(*i as f64),
            GroundedValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&GroundedFn> {
        match self.as_grounded()?.value() {
            GroundedValue::Function(func) => Some(func),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Atom]> {
        match self.as_grounded()?.value() {
            GroundedValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// First child of an expression.
    pub fn head(&self) -> Option<&Atom> {
        self.as_expression().and_then(Expression::head)
    }

    /// Reference identity: both handles point at the same allocation.
    pub fn ptr_eq(a: &Atom, b: &Atom) -> bool {
        match (a, b) {
            (Atom::Symbol(x), Atom::Symbol(y)) | (Atom::Variable(x), Atom::Variable(y)) => {
                Arc::ptr_eq(x, y)
            }
            (Atom::Expression(x), Atom::Expression(y)) => Arc::ptr_eq(x, y),
            (Atom::Grounded(x), Atom::Grounded(y)) => Arc::ptr_eq(x, y),
            _ => false,
        }
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        Atom::ptr_eq(self, other) || (self.kind() == other.kind() && self.id() == other.id())
    }
}

impl Eq for Atom {}

impl Hash for Atom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Symbol(name) | Atom::Variable(name) => f.write_str(name),
            Atom::Expression(expr) => {
                f.write_str("(")?;
                for (i, child) in expr.children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
            Atom::Grounded(g) => write!(f, "{g}"),
        }
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_identity_is_structural() {
        let a = Atom::expr(vec![Atom::sym("Knows"), Atom::sym("A"), Atom::var("x")]);
        let b = Atom::expr(vec![Atom::sym("Knows"), Atom::sym("A"), Atom::var("$x")]);
        assert_eq!(a.id(), "(Knows A $x)");
        assert_eq!(a, b);
        assert!(!Atom::ptr_eq(&a, &b));
        assert!(a.has_variables());
    }

    #[test]
    fn symbol_and_grounded_never_collide() {
        let number = Atom::int(42);
        let symbol = Atom::sym("42");
        assert_ne!(number, symbol);
        assert_ne!(number.id(), symbol.id());
        assert_eq!(number.to_string(), "42");
    }

    #[test]
    fn empty_expression() {
        let empty = Atom::expr(vec![]);
        assert_eq!(empty.id(), "()");
        assert!(empty.head().is_none());
        assert!(empty.as_expression().unwrap().tail().is_empty());
    }

    #[test]
    fn display_renders_surface_syntax() {
        let atom = Atom::expr(vec![
            Atom::sym("say"),
            Atom::string("hi \"there\"\n"),
            Atom::float(2.0),
            Atom::var("who"),
        ]);
        assert_eq!(atom.to_string(), r#"(say "hi \"there\"\n" 2.0 $who)"#);
    }
}
