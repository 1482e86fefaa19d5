use crate::ast::Ast;
use crate::binding::VarId;
use crate::symbol::Symbol;
use im_rc::OrdMap;
use std::cell::{Cell, OnceCell};
use std::fmt;
use std::rc::Rc;

const STACK_RED_ZONE_BYTES: usize = 256 * 1024;
const STACK_GROW_BYTES: usize = 1024 * 1024;

pub type Env = OrdMap<VarId, Slot>;

#[derive(Clone)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Fun(Rc<dyn Fn(Slot) -> Result<Value, EvalError>>),
}

/// A value computed on first use and cached afterwards, including a cached failure.
pub struct Thunk {
    value: OnceCell<Result<Value, EvalError>>,
    init: Cell<Option<Box<dyn FnOnce() -> Result<Value, EvalError>>>>,
}

impl Thunk {
    pub fn new(init: impl FnOnce() -> Result<Value, EvalError> + 'static) -> Self {
        Thunk {
            value: OnceCell::new(),
            init: Cell::new(Some(Box::new(init))),
        }
    }

    pub fn force(&self) -> Result<Value, EvalError> {
        if let Some(result) = self.value.get() {
            return result.clone();
        }
        // `init` is gone only while it is running.
        let init = self.init.take().ok_or(EvalError::CyclicBinding)?;
        let result = init();
        self.value.get_or_init(|| result).clone()
    }
}

/// What a variable is bound to: an evaluated argument, or a let-bound value that is evaluated
/// only if the body reads it.
#[derive(Clone)]
pub enum Slot {
    Ready(Value),
    Delayed(Rc<Thunk>),
}

impl Slot {
    pub fn delayed(init: impl FnOnce() -> Result<Value, EvalError> + 'static) -> Self {
        Slot::Delayed(Rc::new(Thunk::new(init)))
    }

    pub fn force(&self) -> Result<Value, EvalError> {
        match self {
            Slot::Ready(value) => Ok(value.clone()),
            Slot::Delayed(thunk) => thunk.force(),
        }
    }
}

impl From<Value> for Slot {
    fn from(value: Value) -> Self {
        Slot::Ready(value)
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Ready(value) => value.fmt(f),
            Slot::Delayed(thunk) => match thunk.value.get() {
                Some(Ok(value)) => value.fmt(f),
                Some(Err(err)) => write!(f, "<failed: {}>", err),
                None => write!(f, "<delayed>"),
            },
        }
    }
}

impl Value {
    pub fn as_bool(&self) -> Result<bool, EvalError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(EvalError::ValueMismatch {
                expected: "Bool",
                found: other.describe(),
            }),
        }
    }

    pub fn as_int(&self) -> Result<i64, EvalError> {
        match self {
            Value::Int(n) => Ok(*n),
            other => Err(EvalError::ValueMismatch {
                expected: "Int",
                found: other.describe(),
            }),
        }
    }

    pub fn apply(&self, arg: Value) -> Result<Value, EvalError> {
        self.apply_slot(Slot::Ready(arg))
    }

    pub fn apply_slot(&self, arg: Slot) -> Result<Value, EvalError> {
        match self {
            Value::Fun(func) => func(arg),
            other => Err(EvalError::NotAFunction(other.describe())),
        }
    }

    fn describe(&self) -> String {
        format!("{:?}", self)
    }
}

// Functions have no structural equality; two function values are equal only if they are the same
// closure.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(b1), Value::Bool(b2)) => b1 == b2,
            (Value::Int(n1), Value::Int(n2)) => n1 == n2,
            (Value::Fun(f1), Value::Fun(f2)) => Rc::ptr_eq(f1, f2),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Fun(_) => write!(f, "<function>"),
        }
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum EvalError {
    #[error("variable {0:?} is not bound in the evaluation environment")]
    UnboundVariable(VarId),
    #[error("division by zero")]
    DivideByZero,
    #[error("cannot evaluate `{0}`, which is missing arguments")]
    Unsaturated(String),
    #[error("cannot evaluate `{0}` without an environment")]
    NeedsEnvironment(String),
    #[error("cannot apply non-function value {0}")]
    NotAFunction(String),
    #[error("a let-bound value was read while it was being computed")]
    CyclicBinding,
    #[error("expected a value of type {expected}, found {found}")]
    ValueMismatch {
        expected: &'static str,
        found: String,
    },
}

/// Evaluates `tree` in the empty environment.  This succeeds only for closed trees.
pub fn eval_bind<S: Symbol>(tree: &Ast<S>) -> Result<Value, EvalError> {
    eval_bind_env(tree, &Env::new())
}

pub fn eval_bind_env<S: Symbol>(tree: &Ast<S>, env: &Env) -> Result<Value, EvalError> {
    stacker::maybe_grow(STACK_RED_ZONE_BYTES, STACK_GROW_BYTES, move || {
        if !tree.is_full() {
            return Err(EvalError::Unsaturated(tree.head().name()));
        }
        tree.head().eval_bind_sym(&tree.args(), env)
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dsl::build::*;
    use crate::types::Type;

    #[test]
    fn evaluates_closed_arithmetic() {
        let tree = add(int(2), mul(int(3), int(4)));
        assert_eq!(eval_bind(&tree), Ok(Value::Int(14)));
        assert_eq!(eval_bind(&div(int(7), int(2))), Ok(Value::Int(3)));
        assert_eq!(eval_bind(&div(int(7), int(0))), Err(EvalError::DivideByZero));
    }

    #[test]
    fn open_trees_need_an_environment() {
        let x = VarId(4);
        let tree = add(var(x, Type::Int), int(1));
        assert_eq!(eval_bind(&tree), Err(EvalError::UnboundVariable(x)));
        let env = Env::unit(x, Value::Int(41).into());
        assert_eq!(eval_bind_env(&tree, &env), Ok(Value::Int(42)));
    }

    #[test]
    fn lets_and_lambdas() {
        let x = VarId(0);
        let y = VarId(1);
        // let x = 2 + 3 in x * x
        let tree = let_(x, add(int(2), int(3)), mul(var(x, Type::Int), var(x, Type::Int)));
        assert_eq!(eval_bind(&tree), Ok(Value::Int(25)));

        // (\y -> y < 10) 3
        let tree = apply(lambda(y, Type::Int, lt(var(y, Type::Int), int(10))), int(3));
        assert_eq!(eval_bind(&tree), Ok(Value::Bool(true)));

        let func = eval_bind(&lambda(y, Type::Int, sub(var(y, Type::Int), int(1)))).unwrap();
        assert_eq!(func.apply(Value::Int(5)), Ok(Value::Int(4)));
    }

    #[test]
    fn closures_capture_their_environment() {
        let x = VarId(0);
        let y = VarId(1);
        // let x = 10 in (\y -> x - y)
        let tree = let_(
            x,
            int(10),
            lambda(y, Type::Int, sub(var(x, Type::Int), var(y, Type::Int))),
        );
        let func = eval_bind(&tree).unwrap();
        assert_eq!(func.apply(Value::Int(3)), Ok(Value::Int(7)));
    }

    #[test]
    fn let_bound_values_are_computed_only_when_read() {
        let x = VarId(0);
        // let x = 1 / 0 in 5
        let unused = let_(x, div(int(1), int(0)), int(5));
        assert_eq!(eval_bind(&unused), Ok(Value::Int(5)));

        // let x = 1 / 0 in x + 5
        let used = let_(x, div(int(1), int(0)), add(var(x, Type::Int), int(5)));
        assert_eq!(eval_bind(&used), Err(EvalError::DivideByZero));
    }

    #[test]
    fn arguments_are_evaluated_before_the_call() {
        let y = VarId(1);
        // (\y -> 5) (1 / 0)
        let tree = apply(lambda(y, Type::Int, int(5)), div(int(1), int(0)));
        assert_eq!(eval_bind(&tree), Err(EvalError::DivideByZero));
    }

    #[test]
    fn conditions_evaluate_only_the_taken_branch() {
        let taken = cond(boolean(true), int(5), div(int(1), int(0)));
        assert_eq!(eval_bind(&taken), Ok(Value::Int(5)));

        let other = cond(boolean(false), div(int(1), int(0)), int(6));
        assert_eq!(eval_bind(&other), Ok(Value::Int(6)));

        let failing = cond(boolean(true), div(int(1), int(0)), int(6));
        assert_eq!(eval_bind(&failing), Err(EvalError::DivideByZero));
    }

    #[test]
    fn thunks_run_once() {
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        let slot = Slot::delayed(move || {
            counter.set(counter.get() + 1);
            Err(EvalError::DivideByZero)
        });
        assert_eq!(slot.force(), Err(EvalError::DivideByZero));
        assert_eq!(slot.clone().force(), Err(EvalError::DivideByZero));
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn partial_applications_do_not_evaluate() {
        let partial = Ast::app(Ast::sym(crate::dsl::Dsl::Arith(crate::dsl::Arith::Add)), int(1));
        let partial = partial.unwrap();
        assert_eq!(
            eval_bind(&partial),
            Err(EvalError::Unsaturated("+".to_owned()))
        );
    }
}
