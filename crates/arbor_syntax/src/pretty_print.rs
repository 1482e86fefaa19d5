use crate::ast::Ast;
use crate::symbol::Symbol;
use std::io;

/// Writes `tree` as an s-expression: `(name arg ...)` for applied symbols, bare names for leaves.
pub fn write_ast<S: Symbol>(dest: &mut impl io::Write, tree: &Ast<S>) -> io::Result<()> {
    let args = tree.args();
    if args.is_empty() {
        return write!(dest, "{}", tree.head().name());
    }

    write!(dest, "({}", tree.head().name())?;
    for arg in &args {
        write!(dest, " ")?;
        write_ast(dest, arg)?;
    }
    write!(dest, ")")
}

pub fn render<S: Symbol>(tree: &Ast<S>) -> String {
    let mut out = Vec::new();
    // Writing to a `Vec` cannot fail.
    let _ = write_ast(&mut out, tree);
    String::from_utf8_lossy(&out).into_owned()
}
