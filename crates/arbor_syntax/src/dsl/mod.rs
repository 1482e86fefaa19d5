//! A small reference universe: integer and boolean literals, arithmetic, comparisons, boolean
//! connectives, conditionals and the binding constructs.

pub mod build;
pub mod random_tree;

mod arith;
mod condition;
mod literal;
mod logic;

pub use arith::Arith;
pub use condition::Condition;
pub use literal::Literal;
pub use logic::{Compare, Logic};

use crate::ast::Ast;
use crate::binding::{Apply, Binding, InjDict, Let, PrjDict, VarId};
use crate::eval::{Env, EvalError, Value};
use crate::symbol::{EvalBind, Semantic};
use crate::types::{Signature, Type};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dsl {
    Lit(Literal),
    Arith(Arith),
    Compare(Compare),
    Logic(Logic),
    Cond(Condition),
    Binding(Binding),
    Let(Let),
    Apply(Apply),
}

macro_rules! dispatch {
    ($sym:expr, $kind:ident => $body:expr) => {
        match $sym {
            Dsl::Lit($kind) => $body,
            Dsl::Arith($kind) => $body,
            Dsl::Compare($kind) => $body,
            Dsl::Logic($kind) => $body,
            Dsl::Cond($kind) => $body,
            Dsl::Binding($kind) => $body,
            Dsl::Let($kind) => $body,
            Dsl::Apply($kind) => $body,
        }
    };
}

impl Semantic for Dsl {
    fn signature(&self) -> Signature {
        dispatch!(self, kind => kind.signature())
    }

    fn name(&self) -> String {
        dispatch!(self, kind => kind.name())
    }

    fn denote(&self, args: &[Value]) -> Result<Value, EvalError> {
        dispatch!(self, kind => kind.denote(args))
    }
}

impl EvalBind<Dsl> for Dsl {
    fn eval_bind_sym(&self, args: &[Ast<Dsl>], env: &Env) -> Result<Value, EvalError> {
        dispatch!(self, kind => EvalBind::<Dsl>::eval_bind_sym(kind, args, env))
    }
}

macro_rules! impl_from_kind {
    ($($kind:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$kind> for Dsl {
                fn from(kind: $kind) -> Self {
                    Dsl::$variant(kind)
                }
            }
        )*
    };
}

impl_from_kind! {
    Literal => Lit,
    Arith => Arith,
    Compare => Compare,
    Logic => Logic,
    Condition => Cond,
    Binding => Binding,
    Let => Let,
    Apply => Apply,
}

fn prj_variable(sym: &Dsl) -> Option<VarId> {
    match sym {
        Dsl::Binding(Binding::Variable { var, .. }) => Some(*var),
        _ => None,
    }
}

fn prj_lambda(sym: &Dsl) -> Option<VarId> {
    match sym {
        Dsl::Binding(Binding::Lambda { var, .. }) => Some(*var),
        _ => None,
    }
}

pub fn prj_dict() -> PrjDict<Dsl> {
    PrjDict {
        prj_variable,
        prj_lambda,
    }
}

fn inj_variable(var: VarId, ty: &Type) -> Dsl {
    Dsl::Binding(Binding::Variable {
        var,
        ty: ty.clone(),
    })
}

fn inj_lambda(var: VarId, arg: &Type, ret: &Type) -> Dsl {
    Dsl::Binding(Binding::Lambda {
        var,
        arg: arg.clone(),
        ret: ret.clone(),
    })
}

fn inj_let(bound: &Type, body: &Type) -> Dsl {
    Dsl::Let(Let {
        bound: bound.clone(),
        body: body.clone(),
    })
}

/// Sharing is offered for full first-order sub-trees only.  Function-typed values are left in
/// place so that lambdas stay next to the construct that consumes them.
pub fn mk_inj_dict(bound: &Ast<Dsl>, body: &Ast<Dsl>) -> Option<InjDict<Dsl>> {
    if !bound.is_full() || !body.is_full() || bound.result_type().is_fun() {
        return None;
    }
    Some(InjDict {
        bound_type: bound.result_type().clone(),
        body_type: body.result_type().clone(),
        inj_variable,
        inj_lambda,
        inj_let,
    })
}

/// Replaces a tree by the literal for its value.  Function values have no literal, so those trees
/// are returned unchanged.
pub fn fold_literal(tree: &Ast<Dsl>, value: Value) -> Ast<Dsl> {
    match Literal::from_value(&value) {
        Some(lit) => Ast::sym(Dsl::Lit(lit)),
        None => tree.clone(),
    }
}

pub fn is_literal(tree: &Ast<Dsl>) -> bool {
    tree.is_terminal() && matches!(tree.head(), Dsl::Lit(_))
}
