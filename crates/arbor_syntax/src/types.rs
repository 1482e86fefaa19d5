use std::fmt;
use std::rc::Rc;

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Type {
    Bool,
    Int,
    Fun(Rc<Type>, Rc<Type>),
}

impl Type {
    pub fn fun(arg: Type, ret: Type) -> Type {
        Type::Fun(Rc::new(arg), Rc::new(ret))
    }

    pub fn is_fun(&self) -> bool {
        matches!(self, Type::Fun(_, _))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => write!(f, "Bool"),
            Type::Int => write!(f, "Int"),
            Type::Fun(arg, ret) if arg.is_fun() => write!(f, "({}) -> {}", arg, ret),
            Type::Fun(arg, ret) => write!(f, "{} -> {}", arg, ret),
        }
    }
}

// Matches `Display` so that `{:#?}` on trees of types stays on one line.
impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// The meta-level signature of a symbol: the types of the argument trees it must be applied to,
/// and the object-level type of the resulting full tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub args: Vec<Type>,
    pub result: Type,
}

impl Signature {
    pub fn leaf(result: Type) -> Self {
        Signature {
            args: Vec::new(),
            result,
        }
    }

    pub fn new(args: impl IntoIterator<Item = Type>, result: Type) -> Self {
        Signature {
            args: args.into_iter().collect(),
            result,
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum TypeError {
    #[error("`{head}` takes {arity} argument(s) but was applied to more")]
    TooManyArgs { head: String, arity: usize },
    #[error("argument {index} of `{head}` is a partial application still missing {missing} argument(s)")]
    PartialArgument {
        head: String,
        index: usize,
        missing: usize,
    },
    #[error("argument {index} of `{head}` has type {found}, expected {expected}")]
    ArgMismatch {
        head: String,
        index: usize,
        expected: Type,
        found: Type,
    },
}
