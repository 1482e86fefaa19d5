use crate::pretty_print;
use crate::symbol::Symbol;
use crate::types::{Signature, Type, TypeError};
use std::fmt;
use std::rc::Rc;

#[derive(Clone)]
pub enum NodeKind<S> {
    Sym(S),
    App(Ast<S>, Ast<S>),
}

struct Node<S> {
    kind: NodeKind<S>,
    // Signature of the head symbol, shared by every node along the spine.
    sig: Rc<Signature>,
    applied: usize,
    size: usize,
}

/// An immutable, reference-counted expression tree.
///
/// A tree is either a symbol or the application of a partially applied tree to a full argument
/// tree.  Every node remembers the signature of its head symbol and how many arguments have been
/// applied along its spine, which makes the well-typedness check in [`Ast::app`] constant-time.
/// Clones are cheap and share structure, so a transformed tree may be a DAG over its input.
pub struct Ast<S>(Rc<Node<S>>);

impl<S> Clone for Ast<S> {
    fn clone(&self) -> Self {
        Ast(self.0.clone())
    }
}

impl<S> Ast<S> {
    pub fn kind(&self) -> &NodeKind<S> {
        &self.0.kind
    }

    pub fn signature(&self) -> &Signature {
        &self.0.sig
    }

    pub fn applied(&self) -> usize {
        self.0.applied
    }

    fn missing(&self) -> usize {
        self.0.sig.arity() - self.0.applied
    }

    /// A full tree has all the arguments its head symbol expects.
    pub fn is_full(&self) -> bool {
        self.missing() == 0
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.0.kind, NodeKind::Sym(_))
    }

    /// The object-level type of this tree once it is fully applied.
    pub fn result_type(&self) -> &Type {
        &self.0.sig.result
    }

    pub fn next_arg_type(&self) -> Option<&Type> {
        self.0.sig.args.get(self.0.applied)
    }

    /// Number of symbol occurrences in the tree.
    pub fn size(&self) -> usize {
        self.0.size
    }

    pub fn ptr_eq(&self, other: &Ast<S>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn head(&self) -> &S {
        let mut node = self;
        loop {
            match node.kind() {
                NodeKind::Sym(sym) => return sym,
                NodeKind::App(func, _) => node = func,
            }
        }
    }

    /// The arguments applied along the spine, in application order.
    pub fn args(&self) -> Vec<Ast<S>> {
        let mut args = Vec::with_capacity(self.applied());
        let mut node = self;
        while let NodeKind::App(func, arg) = node.kind() {
            args.push(arg.clone());
            node = func;
        }
        args.reverse();
        args
    }
}

impl<S: Symbol> Ast<S> {
    pub fn sym(sym: S) -> Self {
        let sig = Rc::new(sym.signature());
        Ast(Rc::new(Node {
            kind: NodeKind::Sym(sym),
            sig,
            applied: 0,
            size: 1,
        }))
    }

    pub fn app(func: Ast<S>, arg: Ast<S>) -> Result<Self, TypeError> {
        let index = func.applied();
        let expected = match func.next_arg_type() {
            Some(expected) => expected,
            None => {
                return Err(TypeError::TooManyArgs {
                    head: func.head().name(),
                    arity: func.signature().arity(),
                })
            }
        };

        if !arg.is_full() {
            return Err(TypeError::PartialArgument {
                head: func.head().name(),
                index,
                missing: arg.missing(),
            });
        }

        if arg.result_type() != expected {
            return Err(TypeError::ArgMismatch {
                head: func.head().name(),
                index,
                expected: expected.clone(),
                found: arg.result_type().clone(),
            });
        }

        Ok(Self::rebuild_app(func, arg))
    }

    pub fn apply(sym: S, args: impl IntoIterator<Item = Ast<S>>) -> Result<Self, TypeError> {
        args.into_iter().try_fold(Ast::sym(sym), Ast::app)
    }

    /// Builds an application without reporting type errors.  Transformations use this to rebuild
    /// nodes whose children were replaced by trees of the same type.
    pub fn rebuild_app(func: Ast<S>, arg: Ast<S>) -> Self {
        debug_assert!(
            arg.is_full() && func.next_arg_type() == Some(arg.result_type()),
            "ill-typed rebuild of `{}`",
            func.head().name()
        );
        let sig = func.0.sig.clone();
        let applied = func.applied() + 1;
        let size = func.size() + arg.size();
        Ast(Rc::new(Node {
            kind: NodeKind::App(func, arg),
            sig,
            applied,
            size,
        }))
    }

    pub fn rebuild(head: S, args: impl IntoIterator<Item = Ast<S>>) -> Self {
        args.into_iter().fold(Ast::sym(head), Ast::rebuild_app)
    }
}

impl<S: PartialEq> PartialEq for Ast<S> {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.size() != other.size() {
            return false;
        }
        match (self.kind(), other.kind()) {
            (NodeKind::Sym(sym1), NodeKind::Sym(sym2)) => sym1 == sym2,
            (NodeKind::App(func1, arg1), NodeKind::App(func2, arg2)) => {
                func1 == func2 && arg1 == arg2
            }
            _ => false,
        }
    }
}

impl<S: Symbol> fmt::Debug for Ast<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&pretty_print::render(self))
    }
}
