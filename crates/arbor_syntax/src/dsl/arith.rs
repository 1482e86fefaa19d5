use crate::eval::{EvalError, Value};
use crate::symbol::{EvalBind, Semantic};
use crate::types::{Signature, Type};

/// Integer arithmetic.  Addition, subtraction and multiplication wrap on overflow; division by
/// zero is an evaluation error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arith {
    Add,
    Sub,
    Mul,
    Div,
}

impl Semantic for Arith {
    fn signature(&self) -> Signature {
        Signature::new([Type::Int, Type::Int], Type::Int)
    }

    fn name(&self) -> String {
        match self {
            Arith::Add => "+",
            Arith::Sub => "-",
            Arith::Mul => "*",
            Arith::Div => "/",
        }
        .to_owned()
    }

    fn denote(&self, args: &[Value]) -> Result<Value, EvalError> {
        let lhs = args[0].as_int()?;
        let rhs = args[1].as_int()?;
        let result = match self {
            Arith::Add => lhs.wrapping_add(rhs),
            Arith::Sub => lhs.wrapping_sub(rhs),
            Arith::Mul => lhs.wrapping_mul(rhs),
            Arith::Div => {
                if rhs == 0 {
                    return Err(EvalError::DivideByZero);
                }
                lhs.wrapping_div(rhs)
            }
        };
        Ok(Value::Int(result))
    }
}

impl<S> EvalBind<S> for Arith {}
