use crate::ast::Ast;
use crate::eval::{eval_bind_env, Env, EvalError, Value};
use crate::symbol::{EvalBind, Semantic, Symbol};
use crate::types::{Signature, Type};

/// `if c then t else e` where both branches have type `ty`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Condition {
    pub ty: Type,
}

impl Semantic for Condition {
    fn signature(&self) -> Signature {
        Signature::new([Type::Bool, self.ty.clone(), self.ty.clone()], self.ty.clone())
    }

    fn name(&self) -> String {
        "if".to_owned()
    }

    fn denote(&self, args: &[Value]) -> Result<Value, EvalError> {
        if args[0].as_bool()? {
            Ok(args[1].clone())
        } else {
            Ok(args[2].clone())
        }
    }
}

impl<S> EvalBind<S> for Condition {
    fn eval_bind_sym(&self, args: &[Ast<S>], env: &Env) -> Result<Value, EvalError>
    where
        S: Symbol,
    {
        let taken = if eval_bind_env(&args[0], env)?.as_bool()? {
            &args[1]
        } else {
            &args[2]
        };
        eval_bind_env(taken, env)
    }
}
