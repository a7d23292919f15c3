//! Native functions bound into the global scope before execution starts.
//! User code may shadow them like any other name.

use crate::error::{Error, ErrorCode};
use crate::runtime::interpreter::Interpreter;
use crate::runtime::value::Value;
use crate::syntax::ast::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intrinsic {
    /// `print(v)`: display form, no newline.
    Print,
    /// `println(v)`: display form plus newline.
    Println,
    /// `readint()`: next integer token from input.
    ReadInt,
}

impl Intrinsic {
    pub const ALL: [Intrinsic; 3] = [Intrinsic::Print, Intrinsic::Println, Intrinsic::ReadInt];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Print   => "print",
            Self::Println => "println",
            Self::ReadInt => "readint",
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Self::Print | Self::Println => 1,
            Self::ReadInt => 0,
        }
    }

    pub fn lookup(name: &str) -> Option<Intrinsic> {
        Self::ALL.into_iter().find(|i| i.name() == name)
    }

    pub fn call<'a>(
        &self,
        args: &[Value<'a>],
        span: &Span,
        interp: &mut Interpreter<'a>,
    ) -> Result<Value<'a>, Error> {
        check_argc(self.name(), args, self.arity(), span)?;
        tracing::debug!(intrinsic = self.name(), line = span.line, "intrinsic call");
        match self {
            Self::Print => {
                write_out(interp, &args[0].to_string(), span)?;
                Ok(Value::Unit)
            }
            Self::Println => {
                write_out(interp, &format!("{}\n", args[0]), span)?;
                Ok(Value::Unit)
            }
            Self::ReadInt => read_int(interp, span).map(Value::Int),
        }
    }
}

fn write_out(interp: &mut Interpreter<'_>, text: &str, span: &Span) -> Result<(), Error> {
    interp.console().write(text)
        .map_err(|e| Error::at(ErrorCode::E005, span, format!("output failed: {e}")))
}

fn read_int(interp: &mut Interpreter<'_>, span: &Span) -> Result<i64, Error> {
    let token = interp.console().read_token()
        .map_err(|e| Error::at(ErrorCode::E005, span, format!("input failed: {e}")))?
        .ok_or_else(|| Error::at(ErrorCode::E005, span, "readint: end of input"))?;
    token.parse::<i64>()
        .map_err(|_| Error::at(ErrorCode::E005, span, format!("readint: `{token}` is not an integer")))
}

pub(crate) fn check_argc(name: &str, args: &[Value], n: usize, span: &Span) -> Result<(), Error> {
    if args.len() != n {
        return Err(Error::at(
            ErrorCode::E003,
            span,
            format!("`{name}` expects {n} argument{}, got {}", if n == 1 { "" } else { "s" }, args.len()),
        ));
    }
    Ok(())
}
