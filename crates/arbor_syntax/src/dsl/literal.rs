use crate::eval::{EvalError, Value};
use crate::symbol::{EvalBind, Semantic};
use crate::types::{Signature, Type};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Literal {
    Bool(bool),
    Int(i64),
}

impl Literal {
    pub fn from_value(value: &Value) -> Option<Literal> {
        match value {
            Value::Bool(b) => Some(Literal::Bool(*b)),
            Value::Int(n) => Some(Literal::Int(*n)),
            Value::Fun(_) => None,
        }
    }
}

impl Semantic for Literal {
    fn signature(&self) -> Signature {
        match self {
            Literal::Bool(_) => Signature::leaf(Type::Bool),
            Literal::Int(_) => Signature::leaf(Type::Int),
        }
    }

    fn name(&self) -> String {
        match self {
            Literal::Bool(b) => b.to_string(),
            Literal::Int(n) => n.to_string(),
        }
    }

    fn denote(&self, _args: &[Value]) -> Result<Value, EvalError> {
        Ok(match self {
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(n) => Value::Int(*n),
        })
    }
}

impl<S> EvalBind<S> for Literal {}

