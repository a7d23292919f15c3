//! Tree-walking interpreter. Runs a parsed unit against a chain of
//! environments and produces the value of the last top-level statement.
//!
//! `analyze` is a read-only pre-pass and should run before `execute`; the
//! evaluator still reports undefined names itself when it is skipped.

use std::io::{BufRead, Write};
use std::rc::Rc;

use crate::analysis::{self, SymbolTable};
use crate::error::{Error, ErrorCode};
use crate::runtime::console::Console;
use crate::runtime::environment::{Env, Environment, Lookup};
use crate::runtime::intrinsics::Intrinsic;
use crate::runtime::value::{Function, Value};
use crate::syntax::ast::{Node, NodeKind, Span};

pub struct Interpreter<'a> {
    root: &'a Node,
    global: Env<'a>,
    console: Console<'a>,
}

impl<'a> Interpreter<'a> {
    /// Global scope seeded with the intrinsics; I/O on stdin/stdout.
    pub fn new(root: &'a Node) -> Self {
        let global = Environment::global();
        {
            let mut scope = global.borrow_mut();
            for i in Intrinsic::ALL {
                scope.bind(i.name(), Value::Intrinsic(i));
            }
        }
        Self { root, global, console: Console::stdio() }
    }

    pub fn with_input(mut self, input: impl BufRead + 'a) -> Self {
        self.console.set_input(input);
        self
    }

    pub fn with_output(mut self, output: impl Write + 'a) -> Self {
        self.console.set_output(output);
        self
    }

    pub fn global(&self) -> &Env<'a> {
        &self.global
    }

    pub(crate) fn console(&mut self) -> &mut Console<'a> {
        &mut self.console
    }

    // ─── Entry points ─────────────────────────────────────────────────────────

    /// Static name resolution over the whole unit. Mutates nothing.
    pub fn analyze(&self) -> Result<SymbolTable, Error> {
        analysis::analyze(self.root)
    }

    /// Evaluate every top-level statement in the global scope. The result is
    /// the last statement's value.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn execute(&mut self) -> Result<Value<'a>, Error> {
        let root = self.root;
        let global = Rc::clone(&self.global);
        let value = self.eval(root, &global)?;
        tracing::debug!(result = %value, "execution finished");
        Ok(value)
    }

    // ─── Evaluator ────────────────────────────────────────────────────────────

    pub fn eval(&mut self, node: &'a Node, env: &Env<'a>) -> Result<Value<'a>, Error> {
        match node.kind {
            NodeKind::IntLiteral => node.text.parse::<i64>().map(Value::Int).map_err(|_| {
                Error::at(ErrorCode::E007, &node.span, format!("integer literal `{}` out of range", node.text))
            }),
            NodeKind::StrLiteral => Ok(Value::Str(node.text.clone())),
            NodeKind::VarRef => read_var(env, &node.text, &node.span),

            NodeKind::Add | NodeKind::Sub | NodeKind::Multiply | NodeKind::Divide => {
                self.eval_arithmetic(node, env)
            }
            NodeKind::Greater | NodeKind::Less | NodeKind::GreaterEqual
            | NodeKind::LessEqual | NodeKind::Equal | NodeKind::NotEqual => {
                self.eval_comparison(node, env)
            }
            NodeKind::LogicalAnd | NodeKind::LogicalOr => self.eval_logical(node, env),

            NodeKind::Statement => self.eval(node.kid(0)?, env),
            NodeKind::Unit | NodeKind::StatementList => self.eval_list(node, env),

            NodeKind::Definition => {
                let name = &node.kid(0)?.text;
                env.borrow_mut().define(name);
                tracing::trace!(name = %name, "define");
                Ok(Value::Unit)
            }
            NodeKind::Assignment => {
                let name = &node.kid(0)?.text;
                let value = self.eval(node.kid(1)?, env)?;
                tracing::trace!(name = %name, value = %value, "assign");
                Environment::assign(env, name, value.clone());
                Ok(value)
            }

            NodeKind::If => {
                let cond = node.kid(0)?;
                if self.eval_condition(cond, env, "if")? {
                    self.eval_scoped(node.kid(1)?, env)
                } else if let Some(else_node) = node.child(2) {
                    self.eval(else_node, env)
                } else {
                    Ok(Value::Unit)
                }
            }
            NodeKind::Else => self.eval_scoped(node.kid(0)?, env),
            NodeKind::While => {
                let cond = node.kid(0)?;
                let body = node.kid(1)?;
                while self.eval_condition(cond, env, "while")? {
                    self.eval_scoped(body, env)?;
                }
                Ok(Value::Unit)
            }

            NodeKind::Function => {
                let params = node.kid(0)?.children.iter().map(|p| p.text.clone()).collect();
                let function = Function {
                    name: node.text.clone(),
                    params,
                    env: Rc::clone(env),
                    body: node.kid(1)?,
                };
                tracing::trace!(name = %node.text, "define function");
                env.borrow_mut().bind(&node.text, Value::Function(Rc::new(function)));
                Ok(Value::Unit)
            }
            NodeKind::FnCall => self.eval_call(node, env),

            NodeKind::ArgumentList | NodeKind::ParameterList => Err(Error::at(
                ErrorCode::R001,
                &node.span,
                format!("{} cannot be evaluated on its own", node.kind.display_name()),
            )),
        }
    }

    fn eval_list(&mut self, list: &'a Node, env: &Env<'a>) -> Result<Value<'a>, Error> {
        let mut last = Value::Unit;
        for stmt in &list.children {
            last = self.eval(stmt, env)?;
        }
        Ok(last)
    }

    /// Run a block in a fresh child scope that is dropped afterwards.
    fn eval_scoped(&mut self, block: &'a Node, env: &Env<'a>) -> Result<Value<'a>, Error> {
        let scope = Environment::child(env);
        tracing::trace!(depth = Environment::depth(&scope), "enter block scope");
        let result = self.eval(block, &scope);
        if Environment::release(&scope) {
            tracing::trace!("released block scope");
        }
        result
    }

    fn eval_condition(&mut self, cond: &'a Node, env: &Env<'a>, what: &str) -> Result<bool, Error> {
        match self.eval(cond, env)? {
            Value::Int(i) => Ok(i != 0),
            other => Err(Error::at(
                ErrorCode::E002,
                &cond.span,
                format!("{what} condition must be an integer, got {}", other.type_name()),
            )),
        }
    }

    // ─── Operators ────────────────────────────────────────────────────────────

    fn operands(&mut self, node: &'a Node, env: &Env<'a>) -> Result<(i64, i64), Error> {
        let (lhs, rhs) = (node.kid(0)?, node.kid(1)?);
        let l = self.eval(lhs, env)?.as_int(&lhs.span)?;
        let r = self.eval(rhs, env)?.as_int(&rhs.span)?;
        Ok((l, r))
    }

    fn eval_arithmetic(&mut self, node: &'a Node, env: &Env<'a>) -> Result<Value<'a>, Error> {
        let (l, r) = self.operands(node, env)?;
        let result = match node.kind {
            NodeKind::Add      => l.checked_add(r),
            NodeKind::Sub      => l.checked_sub(r),
            NodeKind::Multiply => l.checked_mul(r),
            NodeKind::Divide => {
                if r == 0 {
                    return Err(Error::at(ErrorCode::E001, &node.span, "attempt to divide by 0"));
                }
                l.checked_div(r)
            }
            _ => None,
        };
        result.map(Value::Int).ok_or_else(|| Error::at(
            ErrorCode::E007,
            &node.span,
            format!("integer overflow in `{l} {} {r}`", node.kind.operator().unwrap_or("?")),
        ))
    }

    fn eval_comparison(&mut self, node: &'a Node, env: &Env<'a>) -> Result<Value<'a>, Error> {
        let (l, r) = self.operands(node, env)?;
        let holds = match node.kind {
            NodeKind::Greater      => l > r,
            NodeKind::Less         => l < r,
            NodeKind::GreaterEqual => l >= r,
            NodeKind::LessEqual    => l <= r,
            NodeKind::Equal        => l == r,
            NodeKind::NotEqual     => l != r,
            _ => false,
        };
        Ok(Value::from_bool(holds))
    }

    /// `&&` and `||` skip the right operand when the left one decides.
    fn eval_logical(&mut self, node: &'a Node, env: &Env<'a>) -> Result<Value<'a>, Error> {
        let (lhs, rhs) = (node.kid(0)?, node.kid(1)?);
        let l = self.eval(lhs, env)?.as_int(&lhs.span)? != 0;
        let decided = match node.kind {
            NodeKind::LogicalAnd => !l,
            _ => l,
        };
        if decided {
            return Ok(Value::from_bool(l));
        }
        let r = self.eval(rhs, env)?.as_int(&rhs.span)? != 0;
        Ok(Value::from_bool(r))
    }

    // ─── Calls ────────────────────────────────────────────────────────────────

    fn eval_call(&mut self, node: &'a Node, env: &Env<'a>) -> Result<Value<'a>, Error> {
        let callee = read_var(env, &node.text, &node.span)?;
        let args = node.kid(0)?.children.iter()
            .map(|a| self.eval(a, env))
            .collect::<Result<Vec<_>, _>>()?;

        match callee {
            Value::Function(f) => self.call_function(&f, args, &node.span),
            Value::Intrinsic(i) => i.call(&args, &node.span, self),
            other => Err(Error::at(
                ErrorCode::E004,
                &node.span,
                format!("`{}` is not callable (it holds a {})", node.text, other.type_name()),
            )),
        }
    }

    fn call_function(
        &mut self,
        f: &Function<'a>,
        args: Vec<Value<'a>>,
        span: &Span,
    ) -> Result<Value<'a>, Error> {
        if f.params.len() != args.len() {
            return Err(Error::at(ErrorCode::E003, span, format!(
                "`{}` expects {} argument{}, got {}",
                f.name, f.params.len(), if f.params.len() == 1 { "" } else { "s" }, args.len()
            )));
        }
        tracing::debug!(function = %f.name, args = args.len(), line = span.line, "call");

        // Free names resolve through the defining scope, not the caller's.
        let frame = Environment::child(&f.env);
        {
            let mut scope = frame.borrow_mut();
            for (param, arg) in f.params.iter().zip(args) {
                scope.bind(param, arg);
            }
        }
        let result = self.eval(f.body, &frame);
        if Environment::release(&frame) {
            tracing::trace!(function = %f.name, "released call frame");
        }
        result
    }
}

impl Drop for Interpreter<'_> {
    // Functions stored in the global scope hold that scope. Emptying it lets
    // both be freed.
    fn drop(&mut self) {
        self.global.borrow_mut().clear();
    }
}

fn read_var<'a>(env: &Env<'a>, name: &str, span: &Span) -> Result<Value<'a>, Error> {
    match Environment::lookup(env, name) {
        Lookup::Assigned(v) => Ok(v),
        Lookup::Unassigned => Err(Error::at(
            ErrorCode::E006,
            span,
            format!("variable '{name}' read before assignment"),
        )),
        Lookup::Undefined => Err(Error::at(
            ErrorCode::S001,
            span,
            format!("undefined reference to name '{name}'"),
        )),
    }
}
