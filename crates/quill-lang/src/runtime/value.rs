use std::fmt;
use std::rc::Rc;

use crate::error::{Error, ErrorCode};
use crate::runtime::environment::Env;
use crate::runtime::intrinsics::Intrinsic;
use crate::syntax::ast::{Node, Span};

/// A runtime value. `'a` is the lifetime of the AST that function bodies
/// point into.
#[derive(Debug, Clone)]
pub enum Value<'a> {
    Int(i64),
    Str(String),
    Function(Rc<Function<'a>>),
    Intrinsic(Intrinsic),
    Unit,
}

/// A user-defined function closed over the environment it was defined in.
pub struct Function<'a> {
    pub name: String,
    pub params: Vec<String>,
    /// Definition-site scope. Free names in `body` resolve here, not at the
    /// call site.
    pub env: Env<'a>,
    /// Borrowed from the AST, never copied.
    pub body: &'a Node,
}

impl fmt::Debug for Function<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `env` is skipped: it can hold this very function.
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl<'a> Value<'a> {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_)       => "integer",
            Value::Str(_)       => "string",
            Value::Function(_)  => "function",
            Value::Intrinsic(_) => "intrinsic",
            Value::Unit         => "unit",
        }
    }

    /// The integer payload, or a non-numeric operand fault located at `span`.
    pub fn as_int(&self, span: &Span) -> Result<i64, Error> {
        match self {
            Value::Int(i) => Ok(*i),
            other => Err(Error::at(
                ErrorCode::E002,
                span,
                format!("non-numeric operand: expected integer, got {}", other.type_name()),
            )),
        }
    }

    pub fn from_bool(b: bool) -> Self {
        Value::Int(i64::from(b))
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b))             => a == b,
            (Value::Str(a), Value::Str(b))             => a == b,
            (Value::Function(a), Value::Function(b))   => Rc::ptr_eq(a, b),
            (Value::Intrinsic(a), Value::Intrinsic(b)) => a == b,
            (Value::Unit, Value::Unit)                 => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i)       => write!(f, "{i}"),
            Value::Str(s)       => f.write_str(s),
            Value::Function(fun) => write!(f, "<function {}>", fun.name),
            Value::Intrinsic(i) => write!(f, "<intrinsic {}>", i.name()),
            Value::Unit         => f.write_str("<unit>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        assert_eq!(Value::Int(-12).to_string(), "-12");
        assert_eq!(Value::Str("hi".into()).to_string(), "hi");
        assert_eq!(Value::Intrinsic(Intrinsic::Println).to_string(), "<intrinsic println>");
        assert_eq!(Value::Unit.to_string(), "<unit>");
    }

    #[test]
    fn non_integer_operand_fault() {
        let e = Value::Str("x".into()).as_int(&Span::new(4, 2)).unwrap_err();
        assert_eq!(e.code, ErrorCode::E002);
        assert_eq!((e.line, e.column), (4, 2));
        assert!(e.message.contains("string"));
    }

    #[test]
    fn bools_are_integers() {
        assert_eq!(Value::from_bool(true), Value::Int(1));
        assert_eq!(Value::from_bool(false), Value::Int(0));
    }
}
