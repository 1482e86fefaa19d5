//! Bottom-up constant folding.
//!
//! Every rule returns the rewritten node together with the variables it still depends on.  A node
//! whose dependencies are empty is evaluated, and if evaluation succeeds the constant folder
//! replaces it.  Evaluation failures (division by zero, for instance) leave the node as it is.

use arbor_common::util::progress_logger::{Hidden, ProgressLogger, ProgressSession};
use arbor_syntax::alpha_eq::alpha_eq;
use arbor_syntax::binding::{PrjDict, VarSet};
use arbor_syntax::eval::eval_bind;
use arbor_syntax::{Ast, Symbol, Value};

const STACK_RED_ZONE_BYTES: usize = 256 * 1024;
const STACK_GROW_BYTES: usize = 1024 * 1024;

/// Turns a closed tree and its value into an equivalent, usually smaller, tree.
pub type ConstFolder<S> = fn(&Ast<S>, Value) -> Ast<S>;

/// The optimization rule of a node kind.  Kinds without special treatment keep the default, which
/// optimizes the arguments and folds the node if none of them depends on a variable.
pub trait Optimize<S> {
    /// `tree` is a full node headed by `self`, and `args` are its arguments.
    fn optimize_sym(
        &self,
        opt: &mut Optimizer<'_, S>,
        tree: &Ast<S>,
        args: &[Ast<S>],
    ) -> (Ast<S>, VarSet)
    where
        S: Symbol + Optimize<S>,
    {
        opt.optimize_default(tree, args)
    }
}

pub struct Optimizer<'a, S> {
    prj: &'a PrjDict<S>,
    folder: ConstFolder<S>,
    rewrites: usize,
}

impl<'a, S: Symbol + Optimize<S>> Optimizer<'a, S> {
    pub fn new(prj: &'a PrjDict<S>, folder: ConstFolder<S>) -> Self {
        Optimizer {
            prj,
            folder,
            rewrites: 0,
        }
    }

    /// Folds, pruned branches and merged branches performed so far.
    pub fn rewrites(&self) -> usize {
        self.rewrites
    }

    pub fn record_rewrite(&mut self) {
        self.rewrites += 1;
    }

    pub fn optimize(&mut self, tree: &Ast<S>) -> (Ast<S>, VarSet) {
        stacker::maybe_grow(STACK_RED_ZONE_BYTES, STACK_GROW_BYTES, || {
            let args = tree.args();
            if tree.is_full() {
                tree.head().optimize_sym(self, tree, &args)
            } else {
                self.optimize_default(tree, &args)
            }
        })
    }

    /// Optimizes each of `args`, returning the results and the union of their dependencies.
    pub fn optimize_args(&mut self, args: &[Ast<S>]) -> (Vec<Ast<S>>, VarSet) {
        let mut vars = VarSet::new();
        let mut optimized = Vec::with_capacity(args.len());
        for arg in args {
            let (arg, arg_vars) = self.optimize(arg);
            optimized.push(arg);
            vars = vars.union(arg_vars);
        }
        (optimized, vars)
    }

    /// Rebuilds `tree` over already optimized arguments and folds it if `vars` is empty.
    pub fn finish(&mut self, tree: &Ast<S>, args: Vec<Ast<S>>, vars: VarSet) -> (Ast<S>, VarSet) {
        let rebuilt = Ast::rebuild(tree.head().clone(), args);
        if vars.is_empty() {
            if let Ok(value) = eval_bind(&rebuilt) {
                let folded = (self.folder)(&rebuilt, value);
                if !rebuilt.is_terminal() && !folded.ptr_eq(&rebuilt) {
                    self.record_rewrite();
                }
                return (folded, vars);
            }
        }
        (rebuilt, vars)
    }

    pub fn optimize_default(&mut self, tree: &Ast<S>, args: &[Ast<S>]) -> (Ast<S>, VarSet) {
        let (args, vars) = self.optimize_args(args);
        self.finish(tree, args, vars)
    }

    /// Whether two trees are equal up to renaming of bound variables.
    pub fn alpha_eq(&self, tree1: &Ast<S>, tree2: &Ast<S>) -> bool {
        alpha_eq(self.prj, tree1, tree2)
    }
}

pub fn optimize<S: Symbol + Optimize<S>>(
    prj: &PrjDict<S>,
    folder: ConstFolder<S>,
    tree: &Ast<S>,
) -> Ast<S> {
    run_optimize(prj, folder, tree, Hidden).0
}

/// Returns the optimized tree and the number of rewrites performed.
pub(crate) fn run_optimize<S: Symbol + Optimize<S>>(
    prj: &PrjDict<S>,
    folder: ConstFolder<S>,
    tree: &Ast<S>,
    progress: impl ProgressLogger,
) -> (Ast<S>, usize) {
    let mut session = progress.start_session(None);
    let mut optimizer = Optimizer::new(prj, folder);
    let (result, _) = optimizer.optimize(tree);
    session.update(optimizer.rewrites());
    session.finish();
    (result, optimizer.rewrites())
}

#[cfg(test)]
mod test {
    use super::*;
    use arbor_common::util::progress_logger::Tally;
    use arbor_syntax::binding::VarId;
    use arbor_syntax::dsl::build::*;
    use arbor_syntax::dsl::random_tree::TreeGen;
    use arbor_syntax::dsl::{fold_literal, is_literal, prj_dict, Dsl};
    use arbor_syntax::eval::{eval_bind_env, EvalError};
    use arbor_syntax::Type;

    fn run(tree: &Ast<Dsl>) -> Ast<Dsl> {
        optimize(&prj_dict(), fold_literal, tree)
    }

    fn with_vars(tree: &Ast<Dsl>) -> (Ast<Dsl>, VarSet) {
        let prj = prj_dict();
        let mut optimizer = Optimizer::new(&prj, fold_literal);
        optimizer.optimize(tree)
    }

    fn int_var(n: usize) -> Ast<Dsl> {
        var(VarId(n), Type::Int)
    }

    #[test]
    fn folds_closed_sub_trees() {
        let tree = add(mul(int(2), int(3)), int_var(0));
        assert_eq!(run(&tree), add(int(6), int_var(0)));
        assert_eq!(run(&lt(add(int(1), int(1)), int(3))), boolean(true));

        let (result, vars) = with_vars(&tree);
        assert_eq!(result, add(int(6), int_var(0)));
        assert_eq!(vars, VarSet::unit(VarId(0)));
    }

    #[test]
    fn folds_the_duplicated_sum() {
        let x = VarId(0);
        // let x = 2 + 3 in (x * x) + (2 + 3)
        let tree = let_(
            x,
            add(int(2), int(3)),
            add(mul(int_var(0), int_var(0)), add(int(2), int(3))),
        );
        assert_eq!(run(&tree), int(30));

        // let x = 2 + 3 in (x * v1) + (2 + 3)
        let open = let_(
            x,
            add(int(2), int(3)),
            add(mul(int_var(0), int_var(1)), add(int(2), int(3))),
        );
        assert_eq!(
            run(&open),
            let_(x, int(5), add(mul(int_var(0), int_var(1)), int(5)))
        );
    }

    #[test]
    fn evaluation_errors_block_folding() {
        let tree = add(div(int(1), int(0)), int(2));
        assert_eq!(run(&tree), tree);
        assert_eq!(run(&div(int(9), sub(int(4), int(1)))), int(3));
    }

    #[test]
    fn failing_branches_that_are_not_taken_are_pruned() {
        // if true then 5 else 1 / 0
        let tree = cond(boolean(true), int(5), div(int(1), int(0)));
        assert_eq!(eval_bind(&tree), Ok(Value::Int(5)));
        assert_eq!(run(&tree), int(5));

        // if v0 < 0 then 1 / 0 else 1 / 0
        let tree = cond(lt(int_var(0), int(0)), div(int(1), int(0)), div(int(1), int(0)));
        assert_eq!(run(&tree), div(int(1), int(0)));
    }

    #[test]
    fn unread_failing_bindings_fold_away() {
        let x = VarId(0);
        // let x = 1 / 0 in 5
        let tree = let_(x, div(int(1), int(0)), int(5));
        assert_eq!(run(&tree), int(5));

        // (\x -> 5) (1 / 0) evaluates its argument, so it fails and stays.
        let tree = apply(lambda(x, Type::Int, int(5)), div(int(1), int(0)));
        assert_eq!(eval_bind(&tree), Err(EvalError::DivideByZero));
        assert_eq!(run(&tree), tree);
    }

    #[test]
    fn lambdas_discharge_their_binder() {
        let x = VarId(0);
        let tree = lambda(x, Type::Int, add(int_var(0), add(int(1), int(2))));
        let (result, vars) = with_vars(&tree);
        assert_eq!(result, lambda(x, Type::Int, add(int_var(0), int(3))));
        assert!(vars.is_empty());

        // Closed lambdas are kept, but applying one folds.
        assert_eq!(run(&apply(tree, int(4))), int(7));
    }

    #[test]
    fn prunes_statically_decided_branches() {
        let then = add(int_var(0), mul(int(2), int(2)));
        let otherwise = sub(int_var(1), int(1));
        let tree = cond(lt(int(1), int(2)), then.clone(), otherwise.clone());
        assert_eq!(run(&tree), run(&then));

        let tree = cond(and(boolean(true), boolean(false)), then, otherwise.clone());
        let (result, vars) = with_vars(&tree);
        assert_eq!(result, run(&otherwise));
        // The untaken branch contributes nothing.
        assert_eq!(vars, VarSet::unit(VarId(1)));
    }

    #[test]
    fn merges_equivalent_branches() {
        let (x, y) = (VarId(5), VarId(6));
        let branch1 = apply(lambda(x, Type::Int, add(int_var(5), int_var(0))), int_var(1));
        let branch2 = apply(lambda(y, Type::Int, add(int_var(6), int_var(0))), int_var(1));
        let tree = cond(lt(int_var(0), int(0)), branch1.clone(), branch2);
        assert_eq!(run(&tree), run(&branch1));
    }

    #[test]
    fn open_conditions_fall_back_to_the_default_rule() {
        let tree = cond(
            lt(int_var(0), int(3)),
            add(int(1), int(1)),
            mul(int_var(0), int(1)),
        );
        assert_eq!(
            run(&tree),
            cond(lt(int_var(0), int(3)), int(2), mul(int_var(0), int(1)))
        );

        // Branches that only become equivalent once optimized are merged as well.
        let tree = cond(lt(int_var(0), int(3)), add(int(2), int(3)), int(5));
        assert_eq!(run(&tree), int(5));
    }

    #[test]
    fn progress_counts_every_rewrite() {
        // if 1 < 2 then (2 * 3) + v0 else 0
        let tree = cond(lt(int(1), int(2)), add(mul(int(2), int(3)), int_var(0)), int(0));
        let tally = Tally::default();
        let (result, rewrites) = run_optimize(&prj_dict(), fold_literal, &tree, tally.clone());
        assert_eq!(result, add(int(6), int_var(0)));
        // Folding the test and the product, and pruning the branch.
        assert_eq!(rewrites, 3);
        assert_eq!(tally.total(), rewrites);
    }

    #[test]
    fn random_trees_keep_their_meaning() {
        let prj = prj_dict();
        let mut trees = TreeGen::new(0xf01d, 2);
        let env = trees.env();
        for _ in 0..300 {
            let tree = trees.int_tree(6);
            let result = optimize(&prj, fold_literal, &tree);
            // Failures must be kept as well as values.
            assert_eq!(eval_bind_env(&result, &env), eval_bind_env(&tree, &env));
            assert!(result.size() <= tree.size());
            assert_eq!(optimize(&prj, fold_literal, &result), result);
        }
    }

    #[test]
    fn closed_random_trees_fold_unless_they_fail() {
        let prj = prj_dict();
        let mut trees = TreeGen::new(11, 0);
        for _ in 0..100 {
            let tree = trees.bool_tree(5);
            let (result, rewrites) = run_optimize(&prj, fold_literal, &tree, Hidden);
            match eval_bind(&tree) {
                Ok(_) => {
                    assert!(is_literal(&result));
                    assert_eq!(rewrites == 0, is_literal(&tree));
                }
                Err(err) => assert_eq!(eval_bind(&result), Err(err)),
            }
        }
    }
}
