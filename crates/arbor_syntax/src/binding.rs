//! Binding constructs (variables, lambdas, lets and object-level application) and the
//! dictionaries through which generic transformations recognize and build them.

use crate::ast::{Ast, NodeKind};
use crate::eval::{eval_bind_env, Env, EvalError, Slot, Value};
use crate::symbol::{EvalBind, Semantic, Symbol};
use crate::types::{Signature, Type};
use id_collections::{id_type, Count};
use im_rc::OrdSet;
use std::rc::Rc;

#[id_type]
pub struct VarId(pub usize);

pub type VarSet = OrdSet<VarId>;

/// Hands out strictly increasing variable ids.
#[derive(Clone, Debug)]
pub struct VarGen {
    next: Count<VarId>,
}

impl VarGen {
    pub fn starting_at(first: usize) -> Self {
        VarGen {
            next: Count::from_value(first),
        }
    }

    pub fn fresh(&mut self) -> VarId {
        self.next.inc()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Binding {
    Variable { var: VarId, ty: Type },
    /// Binds `var : arg` in its single argument, the body, of type `ret`.
    Lambda { var: VarId, arg: Type, ret: Type },
}

impl Semantic for Binding {
    fn signature(&self) -> Signature {
        match self {
            Binding::Variable { ty, .. } => Signature::leaf(ty.clone()),
            Binding::Lambda { arg, ret, .. } => {
                Signature::new([ret.clone()], Type::fun(arg.clone(), ret.clone()))
            }
        }
    }

    fn name(&self) -> String {
        match self {
            Binding::Variable { var, .. } => format!("v{}", var.0),
            Binding::Lambda { var, .. } => format!("\\v{} ->", var.0),
        }
    }

    fn denote(&self, _args: &[Value]) -> Result<Value, EvalError> {
        Err(EvalError::NeedsEnvironment(self.name()))
    }
}

impl<S> EvalBind<S> for Binding {
    fn eval_bind_sym(&self, args: &[Ast<S>], env: &Env) -> Result<Value, EvalError>
    where
        S: Symbol,
    {
        match self {
            Binding::Variable { var, .. } => {
                env.get(var).ok_or(EvalError::UnboundVariable(*var))?.force()
            }
            Binding::Lambda { var, .. } => {
                let var = *var;
                let body = args[0].clone();
                let env = env.clone();
                Ok(Value::Fun(Rc::new(move |arg: Slot| {
                    eval_bind_env(&body, &env.update(var, arg))
                })))
            }
        }
    }
}

/// `Let { bound, body }` has arguments of types `bound` and `bound -> body`; the second argument
/// is expected to be a `Lambda`, so that `let v = b in e` is `Let :$ b :$ (Lambda v :$ e)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Let {
    pub bound: Type,
    pub body: Type,
}

impl Semantic for Let {
    fn signature(&self) -> Signature {
        Signature::new(
            [self.bound.clone(), Type::fun(self.bound.clone(), self.body.clone())],
            self.body.clone(),
        )
    }

    fn name(&self) -> String {
        "let".to_owned()
    }

    fn denote(&self, args: &[Value]) -> Result<Value, EvalError> {
        args[1].apply(args[0].clone())
    }
}

/// The bound value is computed the first time the body reads it, so an unused binding never
/// fails.
impl<S> EvalBind<S> for Let {
    fn eval_bind_sym(&self, args: &[Ast<S>], env: &Env) -> Result<Value, EvalError>
    where
        S: Symbol,
    {
        let bound = args[0].clone();
        let bound_env = env.clone();
        let slot = Slot::delayed(move || eval_bind_env(&bound, &bound_env));
        eval_bind_env(&args[1], env)?.apply_slot(slot)
    }
}

/// Object-level function application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Apply {
    pub arg: Type,
    pub ret: Type,
}

impl Semantic for Apply {
    fn signature(&self) -> Signature {
        Signature::new(
            [Type::fun(self.arg.clone(), self.ret.clone()), self.arg.clone()],
            self.ret.clone(),
        )
    }

    fn name(&self) -> String {
        "$".to_owned()
    }

    fn denote(&self, args: &[Value]) -> Result<Value, EvalError> {
        args[0].apply(args[1].clone())
    }
}

impl<S> EvalBind<S> for Apply {}

/// Recognizes variable references and lambda binders in a symbol universe.
pub struct PrjDict<S> {
    pub prj_variable: fn(&S) -> Option<VarId>,
    pub prj_lambda: fn(&S) -> Option<VarId>,
}

impl<S> Clone for PrjDict<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for PrjDict<S> {}

impl<S> PrjDict<S> {
    pub fn variable(&self, sym: &S) -> Option<VarId> {
        (self.prj_variable)(sym)
    }

    pub fn lambda(&self, sym: &S) -> Option<VarId> {
        (self.prj_lambda)(sym)
    }
}

/// Builds binding constructs for sharing a sub-tree of type `bound_type` inside a tree of type
/// `body_type`.
pub struct InjDict<S> {
    pub bound_type: Type,
    pub body_type: Type,
    pub inj_variable: fn(VarId, &Type) -> S,
    pub inj_lambda: fn(VarId, &Type, &Type) -> S,
    pub inj_let: fn(&Type, &Type) -> S,
}

impl<S: Symbol> InjDict<S> {
    pub fn inject_variable(&self, var: VarId) -> Ast<S> {
        Ast::sym((self.inj_variable)(var, &self.bound_type))
    }

    /// Builds `let var = bound in body`.
    pub fn inject_let(&self, var: VarId, bound: Ast<S>, body: Ast<S>) -> Ast<S> {
        let lambda = Ast::rebuild(
            (self.inj_lambda)(var, &self.bound_type, &self.body_type),
            [body],
        );
        Ast::rebuild((self.inj_let)(&self.bound_type, &self.body_type), [bound, lambda])
    }
}

/// Given the sub-tree to share and the whole tree it is shared in, produces the dictionary for
/// that pair of types, or `None` if the universe cannot share a value of that type.
pub type MkInjDict<S> = fn(&Ast<S>, &Ast<S>) -> Option<InjDict<S>>;

/// Variables referenced by `tree` and not bound inside it.
pub fn free_vars<S>(prj: &PrjDict<S>, tree: &Ast<S>) -> VarSet {
    match tree.kind() {
        NodeKind::Sym(sym) => match prj.variable(sym) {
            Some(var) => OrdSet::unit(var),
            None => OrdSet::new(),
        },
        NodeKind::App(func, arg) => {
            if let NodeKind::Sym(sym) = func.kind() {
                if let Some(var) = prj.lambda(sym) {
                    return free_vars(prj, arg).without(&var);
                }
            }
            free_vars(prj, func).union(free_vars(prj, arg))
        }
    }
}

/// Whether `tree` references any variable in `vars`, free or not.
pub fn mentions<S>(prj: &PrjDict<S>, tree: &Ast<S>, vars: &VarSet) -> bool {
    if vars.is_empty() {
        return false;
    }
    match tree.kind() {
        NodeKind::Sym(sym) => prj.variable(sym).map_or(false, |var| vars.contains(&var)),
        NodeKind::App(func, arg) => mentions(prj, func, vars) || mentions(prj, arg, vars),
    }
}

/// The largest variable id referenced or bound anywhere in `tree`.
pub fn max_var<S>(prj: &PrjDict<S>, tree: &Ast<S>) -> Option<VarId> {
    match tree.kind() {
        NodeKind::Sym(sym) => prj.variable(sym).or_else(|| prj.lambda(sym)),
        NodeKind::App(func, arg) => max_var(prj, func).max(max_var(prj, arg)),
    }
}
