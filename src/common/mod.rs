//! Base types and functions.

pub use std::io::Result as IoRes;
pub use std::io::{Read, Write};

pub use crate::errors::*;

#[macro_use]
pub mod macros;
pub mod config;
mod wrappers;

pub use self::config::*;
pub use self::wrappers::*;

lazy_static! {
    /// Configuration from clap.
    pub static ref conf: Config = Config::clap();
}

/// Boolean valuation of the whole predicate alphabet on an example.
pub type Bits = Vec<bool>;

/// A conjunction: the set of predicates it requires.
pub type Conj = PrdSet;

/// A hypothesis: one conjunction per location.
pub type Hyp = LocMap<Conj>;
