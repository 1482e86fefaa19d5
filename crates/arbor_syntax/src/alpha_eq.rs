use crate::ast::{Ast, NodeKind};
use crate::binding::{PrjDict, VarId};
use crate::symbol::Symbol;

/// Pairs of binders entered simultaneously on both sides, innermost last.
type BinderPairs = Vec<(VarId, VarId)>;

/// Equality up to consistent renaming of bound variables.
pub fn alpha_eq<S: Symbol>(prj: &PrjDict<S>, tree1: &Ast<S>, tree2: &Ast<S>) -> bool {
    alpha_eq_env(prj, &mut Vec::new(), tree1, tree2)
}

fn alpha_eq_env<S: Symbol>(
    prj: &PrjDict<S>,
    env: &mut BinderPairs,
    tree1: &Ast<S>,
    tree2: &Ast<S>,
) -> bool {
    if tree1.size() != tree2.size() {
        return false;
    }
    if env.is_empty() && tree1.ptr_eq(tree2) {
        return true;
    }

    match (tree1.kind(), tree2.kind()) {
        (NodeKind::Sym(sym1), NodeKind::Sym(sym2)) => {
            alpha_eq_sym(prj, env, tree1, sym1, tree2, sym2)
        }

        (NodeKind::App(func1, body1), NodeKind::App(func2, body2)) => {
            if let (NodeKind::Sym(lam1), NodeKind::Sym(lam2)) = (func1.kind(), func2.kind()) {
                if let (Some(var1), Some(var2)) = (prj.lambda(lam1), prj.lambda(lam2)) {
                    if func1.signature() != func2.signature() {
                        return false;
                    }
                    env.push((var1, var2));
                    let result = alpha_eq_env(prj, env, body1, body2);
                    env.pop();
                    return result;
                }
            }
            alpha_eq_env(prj, env, func1, func2) && alpha_eq_env(prj, env, body1, body2)
        }

        _ => false,
    }
}

fn alpha_eq_sym<S: Symbol>(
    prj: &PrjDict<S>,
    env: &BinderPairs,
    tree1: &Ast<S>,
    sym1: &S,
    tree2: &Ast<S>,
    sym2: &S,
) -> bool {
    match (prj.variable(sym1), prj.variable(sym2)) {
        (Some(var1), Some(var2)) => {
            if tree1.result_type() != tree2.result_type() {
                return false;
            }
            let innermost = env
                .iter()
                .rev()
                .find(|(bound1, bound2)| *bound1 == var1 || *bound2 == var2);
            match innermost {
                Some(&pair) => pair == (var1, var2),
                None => var1 == var2,
            }
        }
        (None, None) => match (prj.lambda(sym1), prj.lambda(sym2)) {
            // An unapplied lambda binds nothing yet.
            (Some(_), Some(_)) => tree1.signature() == tree2.signature(),
            _ => sym1 == sym2,
        },
        _ => false,
    }
}

/// Number of full sub-trees of `tree` that are alpha-equivalent to `needle`.  Occurrences nested
/// inside a match are not counted separately.
pub fn count<S: Symbol>(prj: &PrjDict<S>, needle: &Ast<S>, tree: &Ast<S>) -> usize {
    if alpha_eq(prj, needle, tree) {
        return 1;
    }
    count_spine(prj, needle, tree)
}

fn count_spine<S: Symbol>(prj: &PrjDict<S>, needle: &Ast<S>, tree: &Ast<S>) -> usize {
    match tree.kind() {
        NodeKind::Sym(_) => 0,
        NodeKind::App(func, arg) => count_spine(prj, needle, func) + count(prj, needle, arg),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dsl::build::*;
    use crate::dsl::prj_dict;
    use crate::types::Type;

    #[test]
    fn renaming_bound_variables() {
        let prj = prj_dict();
        let (x, y) = (VarId(0), VarId(1));
        let lam_x = lambda(x, Type::Int, add(var(x, Type::Int), int(1)));
        let lam_y = lambda(y, Type::Int, add(var(y, Type::Int), int(1)));
        assert!(alpha_eq(&prj, &lam_x, &lam_y));
        assert!(alpha_eq(&prj, &lam_x, &lam_x));
        assert_ne!(lam_x, lam_y);

        let lam_bool = lambda(y, Type::Bool, int(1));
        assert!(!alpha_eq(&prj, &lambda(x, Type::Int, int(1)), &lam_bool));
    }

    #[test]
    fn free_variables_compare_by_identity() {
        let prj = prj_dict();
        let (x, y, z) = (VarId(0), VarId(1), VarId(2));
        // \x -> x + z   vs   \y -> y + z
        let tree1 = lambda(x, Type::Int, add(var(x, Type::Int), var(z, Type::Int)));
        let tree2 = lambda(y, Type::Int, add(var(y, Type::Int), var(z, Type::Int)));
        assert!(alpha_eq(&prj, &tree1, &tree2));

        // \x -> x + z   vs   \z -> z + z
        let tree3 = lambda(z, Type::Int, add(var(z, Type::Int), var(z, Type::Int)));
        assert!(!alpha_eq(&prj, &tree1, &tree3));

        assert!(!alpha_eq(&prj, &var(x, Type::Int), &var(y, Type::Int)));
    }

    #[test]
    fn nested_binders_pair_innermost_first() {
        let prj = prj_dict();
        let (a, b, c, d) = (VarId(0), VarId(1), VarId(2), VarId(3));
        // \a -> \b -> a - b   vs   \c -> \d -> c - d
        let tree1 = lambda(
            a,
            Type::Int,
            lambda(b, Type::Int, sub(var(a, Type::Int), var(b, Type::Int))),
        );
        let tree2 = lambda(
            c,
            Type::Int,
            lambda(d, Type::Int, sub(var(c, Type::Int), var(d, Type::Int))),
        );
        assert!(alpha_eq(&prj, &tree1, &tree2));

        // \c -> \d -> d - c
        let tree3 = lambda(
            c,
            Type::Int,
            lambda(d, Type::Int, sub(var(d, Type::Int), var(c, Type::Int))),
        );
        assert!(!alpha_eq(&prj, &tree1, &tree3));
    }

    #[test]
    fn count_full_occurrences() {
        let prj = prj_dict();
        let shared = add(int(2), int(3));
        let tree = mul(shared.clone(), sub(add(int(2), int(3)), int(1)));
        assert_eq!(count(&prj, &shared, &tree), 2);
        assert_eq!(count(&prj, &tree, &tree), 1);
        assert_eq!(count(&prj, &int(9), &tree), 0);
        // Matches are not searched further.
        let nested = add(add(int(1), int(1)), int(1));
        assert_eq!(count(&prj, &int(1), &nested), 3);
        assert_eq!(count(&prj, &nested, &nested), 1);
    }
}
