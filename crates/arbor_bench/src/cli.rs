use arbor_common::config::PassOptions;
use arbor_common::progress_ui::ProgressMode;
use clap::builder::styling;
use clap::{value_parser, Arg, ArgAction, Command};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub seed: u64,
    pub trees: usize,
    pub depth: usize,
    pub free_vars: usize,
    pub pass_options: PassOptions,
    pub progress: ProgressMode,
    /// Where to write the JSON report.  The report goes to stdout if this is absent.
    pub report_path: Option<PathBuf>,
}

impl Config {
    pub fn from_args() -> Self {
        let styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
            .usage(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
            .literal(styling::AnsiColor::Cyan.on_default() | styling::Effects::BOLD)
            .placeholder(styling::AnsiColor::Cyan.on_default());

        let matches = Command::new(std::env!("CARGO_PKG_NAME"))
            .version(std::env!("CARGO_PKG_VERSION"))
            .about(std::env!("CARGO_PKG_DESCRIPTION"))
            .styles(styles)
            .next_line_help(true)
            .arg(
                Arg::new("seed")
                    .long("seed")
                    .value_parser(value_parser!(u64))
                    .default_value("0")
                    .help("Seed for the random tree generator."),
            )
            .arg(
                Arg::new("trees")
                    .long("trees")
                    .value_parser(value_parser!(usize))
                    .default_value("100")
                    .help("Number of trees to generate and transform."),
            )
            .arg(
                Arg::new("depth")
                    .long("depth")
                    .value_parser(value_parser!(usize))
                    .default_value("8")
                    .help("Maximum depth of each generated tree."),
            )
            .arg(
                Arg::new("free-vars")
                    .long("free-vars")
                    .value_parser(value_parser!(usize))
                    .default_value("2")
                    .help(
                        "Number of free integer variables the generated trees may reference. \
                        Variable 'vN' is bound to N + 1 when checking results.",
                    ),
            )
            .arg(
                Arg::new("no-optimize")
                    .long("no-optimize")
                    .action(ArgAction::SetTrue)
                    .help("Skip the constant folding pass."),
            )
            .arg(
                Arg::new("no-code-motion")
                    .long("no-code-motion")
                    .action(ArgAction::SetTrue)
                    .help("Skip the code motion pass."),
            )
            .arg(
                Arg::new("progress")
                    .long("progress")
                    .action(ArgAction::SetTrue)
                    .help("Set whether or not to show progress"),
            )
            .arg(
                Arg::new("report")
                    .long("report")
                    .value_parser(value_parser!(OsString))
                    .help("Write the JSON report to this path instead of stdout."),
            )
            .get_matches();

        let pass_options = PassOptions {
            optimize: !matches.get_flag("no-optimize"),
            code_motion: !matches.get_flag("no-code-motion"),
        };

        let progress = if matches.get_flag("progress") {
            ProgressMode::Visible
        } else {
            ProgressMode::Hidden
        };

        Config {
            seed: *matches.get_one::<u64>("seed").unwrap(),
            trees: *matches.get_one::<usize>("trees").unwrap(),
            depth: *matches.get_one::<usize>("depth").unwrap(),
            free_vars: *matches.get_one::<usize>("free-vars").unwrap(),
            pass_options,
            progress,
            report_path: matches
                .get_one::<OsString>("report")
                .map(|path| path.to_owned().into()),
        }
    }
}
