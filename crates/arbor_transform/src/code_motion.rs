//! Common sub-expression elimination combined with hoisting of lambda-invariant expressions.
//!
//! At each node we look for a sub-tree worth binding: one that occurs more than once in the
//! current tree, or that sits under a lambda without depending on its binder.  If the universe
//! can build a `let` for it, every alpha-equivalent occurrence is replaced by a fresh variable and
//! the let is wrapped around the result.  Otherwise we descend into the arguments and repeat
//! there.

use arbor_common::util::progress_logger::{Hidden, ProgressLogger, ProgressSession};
use arbor_syntax::alpha_eq::{alpha_eq, count};
use arbor_syntax::binding::{max_var, mentions, MkInjDict, PrjDict, VarGen, VarId, VarSet};
use arbor_syntax::{Ast, NodeKind, Symbol};

const STACK_RED_ZONE_BYTES: usize = 256 * 1024;
const STACK_GROW_BYTES: usize = 1024 * 1024;

/// Search state while choosing a candidate inside one tree.
struct Env<'a, S> {
    in_lambda: bool,
    /// Binders crossed on the way down from `whole`.
    deps: VarSet,
    whole: &'a Ast<S>,
}

struct CodeMotion<'a, S, P> {
    prj: &'a PrjDict<S>,
    mk_inj: MkInjDict<S>,
    vars: VarGen,
    progress: &'a mut P,
    lets: usize,
}

impl<S: Symbol, P: ProgressSession> CodeMotion<'_, S, P> {
    fn run(&mut self, tree: &Ast<S>) -> Ast<S> {
        stacker::maybe_grow(STACK_RED_ZONE_BYTES, STACK_GROW_BYTES, || {
            if let Some(candidate) = self.choose(tree) {
                if let Some(inj) = (self.mk_inj)(&candidate, tree) {
                    let bound = self.run(&candidate);
                    let var = self.vars.fresh();
                    let body = substitute(self.prj, &candidate, &inj.inject_variable(var), tree);
                    let body = self.run(&body);
                    self.lets += 1;
                    self.progress.update(1);
                    return inj.inject_let(var, bound, body);
                }
            }
            self.descend(tree)
        })
    }

    /// Runs code motion on every argument along the spine of `tree`, keeping its head.
    fn descend(&mut self, tree: &Ast<S>) -> Ast<S> {
        match tree.kind() {
            NodeKind::Sym(_) => tree.clone(),
            NodeKind::App(func, arg) => {
                let func = self.descend(func);
                let arg = self.run(arg);
                Ast::rebuild_app(func, arg)
            }
        }
    }

    fn choose(&self, tree: &Ast<S>) -> Option<Ast<S>> {
        let env = Env {
            in_lambda: false,
            deps: VarSet::new(),
            whole: tree,
        };
        self.choose_env(&env, tree)
    }

    fn choose_env(&self, env: &Env<S>, tree: &Ast<S>) -> Option<Ast<S>> {
        if self.liftable(env, tree) {
            Some(tree.clone())
        } else {
            self.choose_env_sub(env, tree)
        }
    }

    fn choose_env_sub(&self, env: &Env<S>, tree: &Ast<S>) -> Option<Ast<S>> {
        match tree.kind() {
            NodeKind::Sym(_) => None,
            NodeKind::App(func, arg) => {
                if let NodeKind::Sym(sym) = func.kind() {
                    if let Some(var) = self.prj.lambda(sym) {
                        let inner = Env {
                            in_lambda: true,
                            deps: env.deps.update(var),
                            whole: env.whole,
                        };
                        return self.choose_env(&inner, arg);
                    }
                }
                self.choose_env_sub(env, func)
                    .or_else(|| self.choose_env(env, arg))
            }
        }
    }

    fn liftable(&self, env: &Env<S>, tree: &Ast<S>) -> bool {
        tree.is_full()
            && !tree.is_terminal()
            && !mentions(self.prj, tree, &env.deps)
            && (env.in_lambda || count(self.prj, tree, env.whole) > 1)
    }
}

/// Replaces every full sub-tree of `tree` that is alpha-equivalent to `needle`.
fn substitute<S: Symbol>(
    prj: &PrjDict<S>,
    needle: &Ast<S>,
    replacement: &Ast<S>,
    tree: &Ast<S>,
) -> Ast<S> {
    if alpha_eq(prj, needle, tree) {
        return replacement.clone();
    }
    substitute_spine(prj, needle, replacement, tree)
}

fn substitute_spine<S: Symbol>(
    prj: &PrjDict<S>,
    needle: &Ast<S>,
    replacement: &Ast<S>,
    tree: &Ast<S>,
) -> Ast<S> {
    match tree.kind() {
        NodeKind::Sym(_) => tree.clone(),
        NodeKind::App(func, arg) => Ast::rebuild_app(
            substitute_spine(prj, needle, replacement, func),
            substitute(prj, needle, replacement, arg),
        ),
    }
}

/// The first variable id that cannot collide with any variable mentioned or bound in `tree`.
pub fn fresh_start<S>(prj: &PrjDict<S>, tree: &Ast<S>) -> VarId {
    max_var(prj, tree).map_or(VarId(0), |var| VarId(var.0 + 1))
}

pub fn code_motion<S: Symbol>(prj: &PrjDict<S>, mk_inj: MkInjDict<S>, tree: &Ast<S>) -> Ast<S> {
    code_motion_with_start(prj, mk_inj, fresh_start(prj, tree), tree, Hidden)
}

/// Code motion with fresh variables numbered from `start`.  The caller is responsible for `start`
/// being above every variable in `tree`.
pub fn code_motion_with_start<S: Symbol>(
    prj: &PrjDict<S>,
    mk_inj: MkInjDict<S>,
    start: VarId,
    tree: &Ast<S>,
    progress: impl ProgressLogger,
) -> Ast<S> {
    run_code_motion(prj, mk_inj, start, tree, progress).0
}

/// Returns the transformed tree and the number of lets introduced.
pub(crate) fn run_code_motion<S: Symbol>(
    prj: &PrjDict<S>,
    mk_inj: MkInjDict<S>,
    start: VarId,
    tree: &Ast<S>,
    progress: impl ProgressLogger,
) -> (Ast<S>, usize) {
    let mut session = progress.start_session(None);
    let mut motion = CodeMotion {
        prj,
        mk_inj,
        vars: VarGen::starting_at(start.0),
        progress: &mut session,
        lets: 0,
    };
    let result = motion.run(tree);
    let lets = motion.lets;
    session.finish();
    (result, lets)
}
