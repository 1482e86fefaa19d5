use crate::ast::Ast;
use crate::eval::{eval_bind_env, Env, EvalError, Value};
use crate::types::Signature;
use std::fmt;

/// The static and dynamic meaning of a node kind.
pub trait Semantic {
    fn signature(&self) -> Signature;

    /// Name used when rendering trees.
    fn name(&self) -> String;

    /// The strict meaning of the symbol, given the values of its arguments.
    fn denote(&self, args: &[Value]) -> Result<Value, EvalError>;
}

/// How a full node headed by this symbol evaluates in an environment.
///
/// Most kinds evaluate their arguments strictly and then call [`Semantic::denote`].  Binding
/// constructs override this, since they need the environment itself (variables) or must delay
/// evaluation of an argument (lambda bodies, let-bound values).  Conditions override it to
/// evaluate only the branch that is taken.
pub trait EvalBind<S>: Semantic {
    fn eval_bind_sym(&self, args: &[Ast<S>], env: &Env) -> Result<Value, EvalError>
    where
        S: Symbol,
    {
        let values = args
            .iter()
            .map(|arg| eval_bind_env(arg, env))
            .collect::<Result<Vec<_>, _>>()?;
        self.denote(&values)
    }
}

/// A universe of node kinds that trees can be built from.
pub trait Symbol: Semantic + EvalBind<Self> + Clone + PartialEq + fmt::Debug + Sized + 'static {}

impl<T> Symbol for T where T: Semantic + EvalBind<T> + Clone + PartialEq + fmt::Debug + 'static {}
