//! Optimization rules for the kinds of the reference universe.

use crate::optimize::{Optimize, Optimizer};
use arbor_syntax::binding::{Apply, Binding, Let, VarSet};
use arbor_syntax::dsl::{Arith, Compare, Condition, Dsl, Literal, Logic};
use arbor_syntax::eval::eval_bind;
use arbor_syntax::{Ast, Symbol, Value};

impl<S> Optimize<S> for Literal {}
impl<S> Optimize<S> for Arith {}
impl<S> Optimize<S> for Compare {}
impl<S> Optimize<S> for Logic {}
impl<S> Optimize<S> for Let {}
impl<S> Optimize<S> for Apply {}

impl<S> Optimize<S> for Binding {
    fn optimize_sym(
        &self,
        opt: &mut Optimizer<'_, S>,
        tree: &Ast<S>,
        args: &[Ast<S>],
    ) -> (Ast<S>, VarSet)
    where
        S: Symbol + Optimize<S>,
    {
        match self {
            Binding::Variable { var, .. } => (tree.clone(), VarSet::unit(*var)),
            // Lambdas are never folded themselves; their application is.
            Binding::Lambda { var, .. } => {
                let (body, vars) = opt.optimize(&args[0]);
                (Ast::rebuild(tree.head().clone(), [body]), vars.without(var))
            }
        }
    }
}

impl<S> Optimize<S> for Condition {
    fn optimize_sym(
        &self,
        opt: &mut Optimizer<'_, S>,
        tree: &Ast<S>,
        args: &[Ast<S>],
    ) -> (Ast<S>, VarSet)
    where
        S: Symbol + Optimize<S>,
    {
        let (test, test_vars) = opt.optimize(&args[0]);
        if test_vars.is_empty() {
            if let Ok(Value::Bool(taken)) = eval_bind(&test) {
                opt.record_rewrite();
                return opt.optimize(if taken { &args[1] } else { &args[2] });
            }
        }

        if opt.alpha_eq(&args[1], &args[2]) {
            opt.record_rewrite();
            return opt.optimize(&args[1]);
        }

        // Branch merge again, on the optimized branches, before the default rule.
        let (mut branches, branch_vars) = opt.optimize_args(&args[1..]);
        if opt.alpha_eq(&branches[0], &branches[1]) {
            opt.record_rewrite();
            return (branches.swap_remove(0), branch_vars);
        }

        let mut all = Vec::with_capacity(3);
        all.push(test);
        all.extend(branches);
        opt.finish(tree, all, test_vars.union(branch_vars))
    }
}

impl Optimize<Dsl> for Dsl {
    fn optimize_sym(
        &self,
        opt: &mut Optimizer<'_, Dsl>,
        tree: &Ast<Dsl>,
        args: &[Ast<Dsl>],
    ) -> (Ast<Dsl>, VarSet) {
        match self {
            Dsl::Lit(kind) => kind.optimize_sym(opt, tree, args),
            Dsl::Arith(kind) => kind.optimize_sym(opt, tree, args),
            Dsl::Compare(kind) => kind.optimize_sym(opt, tree, args),
            Dsl::Logic(kind) => kind.optimize_sym(opt, tree, args),
            Dsl::Cond(kind) => kind.optimize_sym(opt, tree, args),
            Dsl::Binding(kind) => kind.optimize_sym(opt, tree, args),
            Dsl::Let(kind) => kind.optimize_sym(opt, tree, args),
            Dsl::Apply(kind) => kind.optimize_sym(opt, tree, args),
        }
    }
}
