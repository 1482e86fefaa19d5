//! Shorthand constructors for well-typed trees of the reference universe.  These panic on type
//! errors, so they are meant for tests, generators and hand-written programs.

use super::{Arith, Compare, Condition, Dsl, Literal, Logic};
use crate::ast::Ast;
use crate::binding::{Apply, Binding, Let, VarId};
use crate::types::Type;

fn node(sym: impl Into<Dsl>, args: impl IntoIterator<Item = Ast<Dsl>>) -> Ast<Dsl> {
    let sym = sym.into();
    Ast::apply(sym, args).unwrap_or_else(|err| panic!("ill-typed tree: {}", err))
}

pub fn int(n: i64) -> Ast<Dsl> {
    Ast::sym(Dsl::Lit(Literal::Int(n)))
}

pub fn boolean(b: bool) -> Ast<Dsl> {
    Ast::sym(Dsl::Lit(Literal::Bool(b)))
}

pub fn var(var: VarId, ty: Type) -> Ast<Dsl> {
    Ast::sym(Dsl::Binding(Binding::Variable { var, ty }))
}

pub fn add(lhs: Ast<Dsl>, rhs: Ast<Dsl>) -> Ast<Dsl> {
    node(Arith::Add, [lhs, rhs])
}

pub fn sub(lhs: Ast<Dsl>, rhs: Ast<Dsl>) -> Ast<Dsl> {
    node(Arith::Sub, [lhs, rhs])
}

pub fn mul(lhs: Ast<Dsl>, rhs: Ast<Dsl>) -> Ast<Dsl> {
    node(Arith::Mul, [lhs, rhs])
}

pub fn div(lhs: Ast<Dsl>, rhs: Ast<Dsl>) -> Ast<Dsl> {
    node(Arith::Div, [lhs, rhs])
}

pub fn eq(lhs: Ast<Dsl>, rhs: Ast<Dsl>) -> Ast<Dsl> {
    node(Compare::Eq, [lhs, rhs])
}

pub fn lt(lhs: Ast<Dsl>, rhs: Ast<Dsl>) -> Ast<Dsl> {
    node(Compare::Lt, [lhs, rhs])
}

pub fn not(arg: Ast<Dsl>) -> Ast<Dsl> {
    node(Logic::Not, [arg])
}

pub fn and(lhs: Ast<Dsl>, rhs: Ast<Dsl>) -> Ast<Dsl> {
    node(Logic::And, [lhs, rhs])
}

pub fn cond(test: Ast<Dsl>, then: Ast<Dsl>, otherwise: Ast<Dsl>) -> Ast<Dsl> {
    let ty = then.result_type().clone();
    node(Condition { ty }, [test, then, otherwise])
}

/// `\var -> body`, with `var : arg`.
pub fn lambda(var: VarId, arg: Type, body: Ast<Dsl>) -> Ast<Dsl> {
    let ret = body.result_type().clone();
    node(Binding::Lambda { var, arg, ret }, [body])
}

/// `let var = bound in body`.
pub fn let_(var: VarId, bound: Ast<Dsl>, body: Ast<Dsl>) -> Ast<Dsl> {
    let bound_ty = bound.result_type().clone();
    let body_ty = body.result_type().clone();
    let lam = lambda(var, bound_ty.clone(), body);
    node(
        Let {
            bound: bound_ty,
            body: body_ty,
        },
        [bound, lam],
    )
}

pub fn apply(func: Ast<Dsl>, arg: Ast<Dsl>) -> Ast<Dsl> {
    let (arg_ty, ret_ty) = match func.result_type() {
        Type::Fun(arg_ty, ret_ty) => ((**arg_ty).clone(), (**ret_ty).clone()),
        other => panic!("cannot apply a tree of type {}", other),
    };
    node(
        Apply {
            arg: arg_ty,
            ret: ret_ty,
        },
        [func, arg],
    )
}
