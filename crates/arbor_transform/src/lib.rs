//! The two tree passes, [`optimize`] and [`code_motion`], and a pipeline that runs them in order.

pub mod code_motion;
pub mod optimize;
mod rules;

pub use code_motion::{code_motion, code_motion_with_start};
pub use optimize::{optimize, ConstFolder, Optimize, Optimizer};

use arbor_common::config::PassOptions;
use arbor_common::progress_ui::{self, ProgressMode};
use arbor_syntax::binding::{MkInjDict, PrjDict};
use arbor_syntax::{Ast, Symbol};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    Optimize,
    CodeMotion,
}

impl Pass {
    pub fn name(self) -> &'static str {
        match self {
            Pass::Optimize => "optimize",
            Pass::CodeMotion => "code motion",
        }
    }
}

#[derive(Clone, Debug)]
pub struct PassReport {
    pub pass: Pass,
    pub size_before: usize,
    pub size_after: usize,
    /// Folds and pruned branches for the optimizer, lets introduced for code motion.
    pub rewrites: usize,
    pub elapsed: Duration,
}

pub fn transform<S: Symbol + Optimize<S>>(
    tree: &Ast<S>,
    options: &PassOptions,
    folder: ConstFolder<S>,
    prj: &PrjDict<S>,
    mk_inj: MkInjDict<S>,
    progress: ProgressMode,
) -> Ast<S> {
    transform_with_report(tree, options, folder, prj, mk_inj, progress).0
}

pub fn transform_with_report<S: Symbol + Optimize<S>>(
    tree: &Ast<S>,
    options: &PassOptions,
    folder: ConstFolder<S>,
    prj: &PrjDict<S>,
    mk_inj: MkInjDict<S>,
    progress: ProgressMode,
) -> (Ast<S>, Vec<PassReport>) {
    let mut tree = tree.clone();
    let mut reports = Vec::new();

    if options.optimize {
        let start = Instant::now();
        let (optimized, rewrites) = optimize::run_optimize(
            prj,
            folder,
            &tree,
            progress_ui::bar(progress, Pass::Optimize.name()),
        );
        reports.push(PassReport {
            pass: Pass::Optimize,
            size_before: tree.size(),
            size_after: optimized.size(),
            rewrites,
            elapsed: start.elapsed(),
        });
        tree = optimized;
    }

    if options.code_motion {
        let start = Instant::now();
        let (moved, lets) = code_motion::run_code_motion(
            prj,
            mk_inj,
            code_motion::fresh_start(prj, &tree),
            &tree,
            progress_ui::bar(progress, Pass::CodeMotion.name()),
        );
        reports.push(PassReport {
            pass: Pass::CodeMotion,
            size_before: tree.size(),
            size_after: moved.size(),
            rewrites: lets,
            elapsed: start.elapsed(),
        });
        tree = moved;
    }

    (tree, reports)
}

#[cfg(test)]
mod test {
    use super::*;
    use arbor_syntax::binding::VarId;
    use arbor_syntax::dsl::build::*;
    use arbor_syntax::dsl::{fold_literal, mk_inj_dict, prj_dict, Dsl};
    use arbor_syntax::Type;

    fn run(tree: &Ast<Dsl>, options: &PassOptions) -> (Ast<Dsl>, Vec<PassReport>) {
        transform_with_report(
            tree,
            options,
            fold_literal,
            &prj_dict(),
            mk_inj_dict,
            ProgressMode::Hidden,
        )
    }

    fn sample() -> Ast<Dsl> {
        let y = var(VarId(0), Type::Int);
        // (y * (2 + 3)) + (y * (2 + 3))
        add(
            mul(y.clone(), add(int(2), int(3))),
            mul(y, add(int(2), int(3))),
        )
    }

    #[test]
    fn optimizes_before_sharing() {
        let (result, reports) = run(&sample(), &PassOptions::default());
        let y = var(VarId(0), Type::Int);
        let shared = var(VarId(1), Type::Int);
        assert_eq!(
            result,
            let_(VarId(1), mul(y, int(5)), add(shared.clone(), shared))
        );

        let passes: Vec<Pass> = reports.iter().map(|report| report.pass).collect();
        assert_eq!(passes, vec![Pass::Optimize, Pass::CodeMotion]);
        assert_eq!(reports[0].rewrites, 2);
        assert_eq!(reports[0].size_after, 7);
        assert_eq!(reports[1].size_before, 7);
        assert_eq!(reports[1].rewrites, 1);
    }

    #[test]
    fn passes_can_be_disabled() {
        let tree = sample();
        let (optimized, reports) = run(&tree, &PassOptions::only_optimize());
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].pass, Pass::Optimize);
        assert_eq!(optimized.size(), 7);

        let (moved, reports) = run(&tree, &PassOptions::only_code_motion());
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].rewrites, 1);
        let y = var(VarId(0), Type::Int);
        let shared = var(VarId(1), Type::Int);
        assert_eq!(
            moved,
            let_(VarId(1), mul(y, add(int(2), int(3))), add(shared.clone(), shared))
        );
        assert_eq!(moved.size(), 10);

        let none = PassOptions {
            optimize: false,
            code_motion: false,
        };
        let (unchanged, reports) = run(&tree, &none);
        assert!(unchanged.ptr_eq(&tree));
        assert!(reports.is_empty());
    }

    #[test]
    fn transform_matches_report() {
        let tree = sample();
        let (reported, _) = run(&tree, &PassOptions::default());
        let plain = transform(
            &tree,
            &PassOptions::default(),
            fold_literal,
            &prj_dict(),
            mk_inj_dict,
            ProgressMode::Hidden,
        );
        assert_eq!(plain, reported);
    }
}
