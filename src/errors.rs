//! Error types.
//!
//! Everything is fatal to the current round: the driver reports the chain and
//! exits without writing any output, so that the verifier keeps its view of
//! the previous round.
//!
//! [`ErrorKind::Inconsistent`][inc] doubles as a *result*: it is how Horndini
//! reports that no consistent conjunction exists at all, which the outer loop
//! treats as a verification verdict rather than a crash.
//!
//! [inc]: enum.ErrorKind.html#variant.Inconsistent
//! (Inconsistent variant of the ErrorKind enum)

use crate::common::*;

error_chain! {
    types {
        Error, ErrorKind, ResultExt, Res;
    }

    links {
        Smt(
            ::rsmt2::errors::Error, ::rsmt2::errors::ErrorKind
        ) #[doc = "Error at SMT level."];
    }

    foreign_links {
        Io(::std::io::Error) #[doc = "IO error."];
        Json(::serde_json::Error) #[doc = "Error while serializing the hypothesis tree."];
    }

    errors {
        #[doc = "Ill-formed input, at the file boundary or between components."]
        InvalidInput(msg: String) {
            description("invalid input")
            display("invalid input: {}", msg)
        }
        #[doc = "The examples admit no consistent hypothesis for this learner."]
        Inconsistent(msg: String) {
            description("inconsistent")
            display("{}", msg)
        }
        #[doc = "The SMT solver could not be run, failed, or answered unknown."]
        SolverFailure {
            description("solver failure")
            display("the SMT solver failed")
        }
    }
}

impl Error {
    /// True if the kind of the error is [`ErrorKind::Inconsistent`][inc].
    ///
    /// [inc]: enum.ErrorKind.html#variant.Inconsistent
    /// (Inconsistent variant of the ErrorKind enum)
    pub fn is_inconsistent(&self) -> bool {
        match *self.kind() {
            ErrorKind::Inconsistent(_) => true,
            _ => false,
        }
    }
}

/// Prints an error chain.
pub fn print_err(errs: &Error) {
    println!("({} \"", conf.bad("error"));
    for err in errs.iter() {
        for line in format!("{}", err).lines() {
            println!("  {}", line)
        }
    }
    println!("\")")
}
