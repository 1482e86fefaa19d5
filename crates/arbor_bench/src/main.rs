mod bench;
mod cli;

use arbor_common::report_error::Reportable;
use std::io;

fn main() {
    better_panic::install();

    let config = cli::Config::from_args();
    if let Err(err) = bench::run(&config) {
        let _ = err.report(&mut io::stderr().lock());
        std::process::exit(err.exit_status());
    }
}
