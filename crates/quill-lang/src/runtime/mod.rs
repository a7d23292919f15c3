pub mod console;
pub mod environment;
pub mod interpreter;
pub mod intrinsics;
pub mod value;

pub use environment::{Env, Environment, Lookup};
pub use interpreter::Interpreter;
pub use intrinsics::Intrinsic;
pub use value::{Function, Value};
