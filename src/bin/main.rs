//! Entry point for the binary.

use conch::common::*;

/// Entry point.
fn main() {
    // Work and report error if any.
    if let Err(errs) = ::conch::work() {
        let errs = match *errs.kind() {
            ErrorKind::SolverFailure => format!(
                "could not run z3 using command `{}`\n\
                 make sure the z3 binary has that name and is in your path,\n\
                 or specify a different z3 command with option `{}`",
                conf.emph(&conf.solver.z3_cmd),
                conf.emph("--z3")
            )
            .into(),
            _ => errs,
        };
        print_err(&errs);
        ::std::process::exit(2)
    } else {
        ::std::process::exit(0)
    }
}
