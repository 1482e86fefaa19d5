//! Typed expression trees for embedded DSLs, together with the collaborators that tree
//! transformations rely on: binding constructs, alpha-equivalence, evaluation and pretty
//! printing.  The `dsl` module provides a small reference universe of node kinds.

pub mod alpha_eq;
pub mod ast;
pub mod binding;
pub mod dsl;
pub mod eval;
pub mod pretty_print;
pub mod symbol;
pub mod types;

pub use ast::{Ast, NodeKind};
pub use binding::{InjDict, MkInjDict, PrjDict, VarGen, VarId};
pub use eval::{EvalError, Value};
pub use symbol::Symbol;
pub use types::{Signature, Type, TypeError};
