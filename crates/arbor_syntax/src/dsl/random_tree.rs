//! Seeded generation of well-typed random programs.
//!
//! Arithmetic wraps and lambdas only appear where they are immediately consumed by a `let` or an
//! application.  A divisor may be any generated integer, so evaluation can fail with a division by
//! zero, sometimes in a branch that is not taken or a binding that is never read.  Nothing inside
//! a condition test can fail.  Previously generated integer sub-trees are reused from time to
//! time, so that the output contains common sub-expressions.

use super::build::*;
use super::Dsl;
use crate::ast::Ast;
use crate::binding::{VarGen, VarId};
use crate::eval::{Env, Slot, Value};
use crate::types::Type;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

const REUSE_PROBABILITY: f64 = 0.3;

/// Variables in scope, and previously generated sub-trees tagged with the scope depth at which
/// they were built and whether they may fail.
struct Scope {
    vars: Vec<VarId>,
    pool: Vec<(usize, bool, Ast<Dsl>)>,
}

impl Scope {
    fn push(&mut self, var: VarId) {
        self.vars.push(var);
    }

    fn pop(&mut self) {
        self.vars.pop();
        let depth = self.vars.len();
        self.pool.retain(|(built_at, _, _)| *built_at <= depth);
    }

    fn remember(&mut self, may_fail: bool, tree: &Ast<Dsl>) {
        self.pool.push((self.vars.len(), may_fail, tree.clone()));
    }

    fn reusable(&self, may_fail: bool) -> Vec<&Ast<Dsl>> {
        self.pool
            .iter()
            .filter(|(_, risky, _)| may_fail || !risky)
            .map(|(_, _, tree)| tree)
            .collect()
    }
}

pub struct TreeGen {
    rng: Pcg64Mcg,
    vars: VarGen,
    free: Vec<VarId>,
}

impl TreeGen {
    /// A generator whose programs may reference the free variables `v0 .. v{num_free - 1}`, all of
    /// type `Int`.
    pub fn new(seed: u64, num_free: usize) -> Self {
        TreeGen {
            rng: Pcg64Mcg::seed_from_u64(seed),
            vars: VarGen::starting_at(num_free),
            free: (0..num_free).map(VarId).collect(),
        }
    }

    /// Binds each free variable `v{i}` to `i + 1`.
    pub fn env(&self) -> Env {
        self.free
            .iter()
            .map(|&var| (var, Slot::Ready(Value::Int(var.0 as i64 + 1))))
            .collect()
    }

    pub fn int_tree(&mut self, depth: usize) -> Ast<Dsl> {
        let mut scope = self.top_scope();
        self.gen_int(&mut scope, depth, true)
    }

    pub fn bool_tree(&mut self, depth: usize) -> Ast<Dsl> {
        let mut scope = self.top_scope();
        self.gen_bool(&mut scope, depth, true)
    }

    fn top_scope(&self) -> Scope {
        Scope {
            vars: self.free.clone(),
            pool: Vec::new(),
        }
    }

    fn int_leaf(&mut self, scope: &Scope) -> Ast<Dsl> {
        if !scope.vars.is_empty() && self.rng.random_bool(0.5) {
            let index = self.rng.random_range(0..scope.vars.len());
            var(scope.vars[index], Type::Int)
        } else {
            int(self.rng.random_range(-3..10))
        }
    }

    fn gen_int(&mut self, scope: &mut Scope, depth: usize, may_fail: bool) -> Ast<Dsl> {
        if depth == 0 {
            return self.int_leaf(scope);
        }
        let reusable = scope.reusable(may_fail);
        if !reusable.is_empty() && self.rng.random_bool(REUSE_PROBABILITY) {
            let index = self.rng.random_range(0..reusable.len());
            return reusable[index].clone();
        }

        let d = depth - 1;
        let tree = match self.rng.random_range(0..10) {
            0 | 1 => add(self.gen_int(scope, d, may_fail), self.gen_int(scope, d, may_fail)),
            2 => sub(self.gen_int(scope, d, may_fail), self.gen_int(scope, d, may_fail)),
            3 | 4 => mul(self.gen_int(scope, d, may_fail), self.gen_int(scope, d, may_fail)),
            5 => {
                let lhs = self.gen_int(scope, d, may_fail);
                let divisor = if may_fail && self.rng.random_bool(0.5) {
                    self.gen_int(scope, d, may_fail)
                } else {
                    int(self.rng.random_range(1..5))
                };
                div(lhs, divisor)
            }
            6 => cond(
                self.gen_bool(scope, d, false),
                self.gen_int(scope, d, may_fail),
                self.gen_int(scope, d, may_fail),
            ),
            7 => {
                let bound = self.gen_int(scope, d, may_fail);
                let var = self.vars.fresh();
                scope.push(var);
                let body = self.gen_int(scope, d, may_fail);
                scope.pop();
                let_(var, bound, body)
            }
            8 => {
                let var = self.vars.fresh();
                scope.push(var);
                let body = self.gen_int(scope, d, may_fail);
                scope.pop();
                let arg = self.gen_int(scope, d, may_fail);
                apply(lambda(var, Type::Int, body), arg)
            }
            _ => self.int_leaf(scope),
        };
        scope.remember(may_fail, &tree);
        tree
    }

    fn gen_bool(&mut self, scope: &mut Scope, depth: usize, may_fail: bool) -> Ast<Dsl> {
        if depth == 0 {
            return boolean(self.rng.random_bool(0.5));
        }
        let d = depth - 1;
        match self.rng.random_range(0..6) {
            0 => eq(self.gen_int(scope, d, may_fail), self.gen_int(scope, d, may_fail)),
            1 | 2 => lt(self.gen_int(scope, d, may_fail), self.gen_int(scope, d, may_fail)),
            3 => not(self.gen_bool(scope, d, may_fail)),
            4 => and(self.gen_bool(scope, d, may_fail), self.gen_bool(scope, d, may_fail)),
            _ => cond(
                self.gen_bool(scope, d, false),
                self.gen_bool(scope, d, may_fail),
                self.gen_bool(scope, d, may_fail),
            ),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::binding::free_vars;
    use crate::dsl::prj_dict;
    use crate::eval::{eval_bind_env, EvalError};

    #[test]
    fn generation_is_deterministic() {
        let mut gen1 = TreeGen::new(42, 2);
        let mut gen2 = TreeGen::new(42, 2);
        for _ in 0..20 {
            assert_eq!(gen1.int_tree(5), gen2.int_tree(5));
        }
    }

    #[test]
    fn generated_trees_evaluate_or_divide_by_zero() {
        let mut trees = TreeGen::new(7, 3);
        let env = trees.env();
        let prj = prj_dict();
        let mut failures = 0;
        for _ in 0..200 {
            let tree = trees.int_tree(6);
            assert_eq!(tree.result_type(), &Type::Int);
            assert!(free_vars(&prj, &tree).iter().all(|var| var.0 < 3));
            match eval_bind_env(&tree, &env) {
                Ok(Value::Int(_)) => {}
                Err(EvalError::DivideByZero) => failures += 1,
                other => panic!("unexpected result {:?}", other),
            }

            let tree = trees.bool_tree(4);
            assert!(matches!(
                eval_bind_env(&tree, &env),
                Ok(Value::Bool(_)) | Err(EvalError::DivideByZero)
            ));
        }
        assert!(failures > 0);
    }

    #[test]
    fn closed_generators_build_closed_trees() {
        let mut trees = TreeGen::new(3, 0);
        let prj = prj_dict();
        assert!(trees.env().is_empty());
        for _ in 0..50 {
            assert!(free_vars(&prj, &trees.int_tree(5)).is_empty());
        }
    }
}
