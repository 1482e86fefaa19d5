use crate::cli::Config;
use arbor_common::lines;
use arbor_common::report_error::{report_error, Report, Reportable};
use arbor_syntax::dsl::random_tree::TreeGen;
use arbor_syntax::dsl::{fold_literal, mk_inj_dict, prj_dict, Dsl};
use arbor_syntax::eval::{eval_bind_env, Env, EvalError, Value};
use arbor_syntax::pretty_print::render;
use arbor_syntax::Ast;
use arbor_transform::transform_with_report;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("could not write report to {}: {source}", .path.display())]
    WriteReport { path: PathBuf, source: io::Error },
    #[error("could not serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("tree {index} changed its meaning")]
    SemanticMismatch {
        index: usize,
        original: String,
        transformed: String,
        expected: String,
        found: String,
    },
}

impl Reportable for Error {
    fn report(&self, dest: &mut impl io::Write) -> io::Result<()> {
        match self {
            Error::SemanticMismatch {
                index,
                original,
                transformed,
                expected,
                found,
            } => report_error(
                dest,
                Report {
                    title: "Semantic Mismatch",
                    message: Some(&format!(
                        lines![
                            "Tree {index} evaluates to {expected} before transformation but to \
                             {found} after it.",
                            "",
                            "Original:",
                            "  {original}",
                            "",
                            "Transformed:",
                            "  {transformed}",
                        ],
                        index = index,
                        expected = expected,
                        found = found,
                        original = original,
                        transformed = transformed,
                    )),
                },
            ),
            Error::WriteReport { .. } | Error::Serialize(_) => report_error(
                dest,
                Report {
                    title: "Report Failed",
                    message: Some(&self.to_string()),
                },
            ),
        }
    }

    fn exit_status(&self) -> i32 {
        1
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PassEntry {
    pub pass: &'static str,
    pub size_before: usize,
    pub size_after: usize,
    /// Folds and pruned branches, or lets introduced.
    pub rewrites: usize,
    pub nanoseconds: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct TreeEntry {
    pub index: usize,
    pub size: usize,
    pub passes: Vec<PassEntry>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BenchReport {
    pub seed: u64,
    pub depth: usize,
    pub free_vars: usize,
    pub trees: Vec<TreeEntry>,
}

fn describe(result: &Result<Value, EvalError>) -> String {
    match result {
        Ok(value) => format!("{:?}", value),
        Err(err) => format!("an error ({})", err),
    }
}

/// Both trees must evaluate to the same value or fail with the same error.
fn check_tree(
    index: usize,
    env: &Env,
    original: &Ast<Dsl>,
    transformed: &Ast<Dsl>,
) -> Result<(), Error> {
    let expected = eval_bind_env(original, env);
    let found = eval_bind_env(transformed, env);
    if found != expected {
        return Err(Error::SemanticMismatch {
            index,
            original: render(original),
            transformed: render(transformed),
            expected: describe(&expected),
            found: describe(&found),
        });
    }
    Ok(())
}

pub fn bench_trees(config: &Config) -> Result<BenchReport, Error> {
    let prj = prj_dict();
    let mut trees = TreeGen::new(config.seed, config.free_vars);
    let env = trees.env();

    let mut entries = Vec::with_capacity(config.trees);
    for index in 0..config.trees {
        let tree = trees.int_tree(config.depth);
        let (transformed, reports) = transform_with_report(
            &tree,
            &config.pass_options,
            fold_literal,
            &prj,
            mk_inj_dict,
            config.progress,
        );
        check_tree(index, &env, &tree, &transformed)?;

        entries.push(TreeEntry {
            index,
            size: tree.size(),
            passes: reports
                .into_iter()
                .map(|report| PassEntry {
                    pass: report.pass.name(),
                    size_before: report.size_before,
                    size_after: report.size_after,
                    rewrites: report.rewrites,
                    nanoseconds: report.elapsed.as_nanos() as u64,
                })
                .collect(),
        });
    }

    Ok(BenchReport {
        seed: config.seed,
        depth: config.depth,
        free_vars: config.free_vars,
        trees: entries,
    })
}

fn write_report_to(dest: impl Write, report: &BenchReport) -> Result<(), Error> {
    let mut dest = dest;
    serde_json::to_writer_pretty(&mut dest, report)?;
    writeln!(dest).map_err(serde_json::Error::io)?;
    Ok(())
}

pub fn write_report(path: Option<&Path>, report: &BenchReport) -> Result<(), Error> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|source| Error::WriteReport {
                path: path.to_owned(),
                source,
            })?;
            write_report_to(BufWriter::new(file), report)
        }
        None => write_report_to(io::stdout().lock(), report),
    }
}

pub fn run(config: &Config) -> Result<(), Error> {
    let report = bench_trees(config)?;
    write_report(config.report_path.as_deref(), &report)
}
