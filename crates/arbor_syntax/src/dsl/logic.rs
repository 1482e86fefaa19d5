use crate::eval::{EvalError, Value};
use crate::symbol::{EvalBind, Semantic};
use crate::types::{Signature, Type};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compare {
    Eq,
    Lt,
}

impl Semantic for Compare {
    fn signature(&self) -> Signature {
        Signature::new([Type::Int, Type::Int], Type::Bool)
    }

    fn name(&self) -> String {
        match self {
            Compare::Eq => "==",
            Compare::Lt => "<",
        }
        .to_owned()
    }

    fn denote(&self, args: &[Value]) -> Result<Value, EvalError> {
        let lhs = args[0].as_int()?;
        let rhs = args[1].as_int()?;
        Ok(Value::Bool(match self {
            Compare::Eq => lhs == rhs,
            Compare::Lt => lhs < rhs,
        }))
    }
}

impl<S> EvalBind<S> for Compare {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Logic {
    Not,
    And,
}

impl Semantic for Logic {
    fn signature(&self) -> Signature {
        match self {
            Logic::Not => Signature::new([Type::Bool], Type::Bool),
            Logic::And => Signature::new([Type::Bool, Type::Bool], Type::Bool),
        }
    }

    fn name(&self) -> String {
        match self {
            Logic::Not => "not",
            Logic::And => "and",
        }
        .to_owned()
    }

    fn denote(&self, args: &[Value]) -> Result<Value, EvalError> {
        Ok(Value::Bool(match self {
            Logic::Not => !args[0].as_bool()?,
            Logic::And => args[0].as_bool()? && args[1].as_bool()?,
        }))
    }
}

impl<S> EvalBind<S> for Logic {}
