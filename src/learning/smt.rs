//! Solver back-end for the cardinality-minimal reducer.
//!
//! Candidate predicates become Boolean *selectors*; violators become
//! at-least-one clauses over the selectors that would fix them; satisfied
//! conclusions become guards against backsliding. [`minimize`] then searches
//! for a model under a growing cardinality bound, so the first model found
//! selects a smallest addition set.
//!
//! [`minimize`]: fn.minimize.html (minimize function)

use rsmt2::parse::{IdentParser, ModelParser};
use rsmt2::print::{Expr2Smt, Sym2Smt};
use rsmt2::{SmtRes, Solver};

use crate::common::*;

/// Boolean selector standing for "add predicate `prd` to `R[loc]`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Selector {
    /// Location of the addition.
    pub loc: LocIdx,
    /// Predicate to add.
    pub prd: PrdIdx,
}
impl Selector {
    /// Constructor.
    pub fn new(loc: LocIdx, prd: PrdIdx) -> Self {
        Selector { loc, prd }
    }

    /// Solver-level name of the selector.
    pub fn name(&self) -> String {
        format!("sel_{}_{}", self.loc, self.prd)
    }

    /// Parses a solver-level name back into a selector.
    pub fn of_name(name: &str) -> SmtRes<Self> {
        let parse = |token: &str| -> SmtRes<usize> {
            token
                .parse::<usize>()
                .map_err(|_| format!("unexpected identifier `{}` in model", name).into())
        };
        let mut split = name.split('_');
        match (split.next(), split.next(), split.next(), split.next()) {
            (Some("sel"), Some(loc), Some(prd), None) => Ok(Selector {
                loc: parse(loc)?.into(),
                prd: parse(prd)?.into(),
            }),
            _ => Err(format!("unexpected identifier `{}` in model", name).into()),
        }
    }
}
impl Sym2Smt<()> for Selector {
    fn sym_to_smt2<Writer: Write>(&self, w: &mut Writer, _: ()) -> SmtRes<()> {
        write!(w, "{}", self.name())?;
        Ok(())
    }
}

/// Writes a disjunction of selectors, `false` when there is none.
fn write_any<Writer: Write>(w: &mut Writer, sels: &[Selector]) -> SmtRes<()> {
    if sels.is_empty() {
        write!(w, "false")?
    } else {
        write!(w, "(or")?;
        for sel in sels {
            write!(w, " {}", sel.name())?
        }
        write!(w, ")")?
    }
    Ok(())
}

/// One constraint over the selectors.
#[derive(Debug, Clone)]
pub enum Clause {
    /// At least one of these selectors must be chosen.
    Require(Vec<Selector>),
    /// Either some premise falsifier is chosen, or no conclusion breaker is:
    /// protects a Horn constraint whose conclusion currently holds.
    Guard {
        /// Selectors falsifying some premise.
        falsifiers: Vec<Selector>,
        /// Selectors that would falsify the conclusion.
        breakers: Vec<Selector>,
    },
}
impl Expr2Smt<()> for Clause {
    fn expr_to_smt2<Writer: Write>(&self, w: &mut Writer, _: ()) -> SmtRes<()> {
        match self {
            Clause::Require(sels) => write_any(w, sels),
            Clause::Guard {
                falsifiers,
                breakers,
            } => {
                write!(w, "(or ")?;
                write_any(w, falsifiers)?;
                write!(w, " ")?;
                if breakers.is_empty() {
                    write!(w, "true")?
                } else {
                    write!(w, "(and")?;
                    for sel in breakers {
                        write!(w, " (not {})", sel.name())?
                    }
                    write!(w, ")")?
                }
                write!(w, ")")?;
                Ok(())
            }
        }
    }
}

/// Pseudo-Boolean cardinality bound over all the selectors.
struct Card<'a> {
    /// All the selectors.
    selectors: &'a [Selector],
    /// Bound.
    bound: usize,
}
impl<'a> Expr2Smt<()> for Card<'a> {
    fn expr_to_smt2<Writer: Write>(&self, w: &mut Writer, _: ()) -> SmtRes<()> {
        write!(w, "(<= (+ 0")?;
        for sel in self.selectors {
            write!(w, " (ite {} 1 0)", sel.name())?
        }
        write!(w, ") {})", self.bound)?;
        Ok(())
    }
}

/// Parser for the solver's Boolean models.
#[derive(Clone, Copy)]
pub struct Parser;
impl<'a> IdentParser<Selector, (), &'a str> for Parser {
    fn parse_ident(self, input: &'a str) -> SmtRes<Selector> {
        Selector::of_name(input)
    }
    fn parse_type(self, input: &'a str) -> SmtRes<()> {
        if input == "Bool" {
            Ok(())
        } else {
            Err(format!("unexpected sort `{}` in model", input).into())
        }
    }
}
impl<'a> ModelParser<Selector, (), bool, &'a str> for Parser {
    fn parse_value(
        self,
        input: &'a str,
        _: &Selector,
        _: &[(Selector, ())],
        _: &(),
    ) -> SmtRes<bool> {
        match input.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            value => Err(format!("unexpected value `{}` in model", value).into()),
        }
    }
}

/// Finds a smallest selector set satisfying the clauses.
///
/// Asserts the clauses once, then checks satisfiability under cardinality
/// bound `k = 1, 2, …` (`push`/`pop` around the bound). The first model wins;
/// exhausting `k` without one is [`ErrorKind::Inconsistent`][inc], anything
/// the solver cannot answer is [`ErrorKind::SolverFailure`][slv].
///
/// [inc]: ../../errors/enum.ErrorKind.html#variant.Inconsistent
/// (Inconsistent variant of the ErrorKind enum)
/// [slv]: ../../errors/enum.ErrorKind.html#variant.SolverFailure
/// (SolverFailure variant of the ErrorKind enum)
pub fn minimize(selectors: &[Selector], clauses: &[Clause]) -> Res<Vec<Selector>> {
    let mut solver =
        Solver::new(conf.solver.conf(), Parser).chain_err(|| ErrorKind::SolverFailure)?;

    for sel in selectors {
        solver
            .declare_const(sel, "Bool")
            .chain_err(|| ErrorKind::SolverFailure)?
    }
    for clause in clauses {
        solver.assert(clause).chain_err(|| ErrorKind::SolverFailure)?
    }

    for bound in 1..=selectors.len() {
        solver.push(1).chain_err(|| ErrorKind::SolverFailure)?;
        solver
            .assert(&Card { selectors, bound })
            .chain_err(|| ErrorKind::SolverFailure)?;
        let sat = solver
            .check_sat()
            .chain_err(|| ErrorKind::SolverFailure)?;
        if sat {
            log_debug!("cardinality bound {} is enough", bound);
            let model = solver
                .get_model()
                .chain_err(|| ErrorKind::SolverFailure)?;
            let mut chosen = vec![];
            for (sel, args, _, value) in model {
                if args.is_empty() && value {
                    chosen.push(sel)
                }
            }
            return Ok(chosen);
        }
        solver.pop(1).chain_err(|| ErrorKind::SolverFailure)?
    }

    bail!(ErrorKind::Inconsistent(
        "cardinality bound exhausted, no consistent extension exists".into()
    ))
}

#[cfg(test)]
mod test {
    use super::*;

    fn smt_string<E: Expr2Smt<()>>(expr: &E) -> String {
        let mut buff = vec![];
        expr.expr_to_smt2(&mut buff, ()).expect("writing to a vec");
        String::from_utf8(buff).expect("smt output is utf8")
    }

    #[test]
    fn selector_names_round_trip() {
        let sel = Selector::new(3.into(), 17.into());
        assert_eq!(sel.name(), "sel_3_17");
        assert_eq!(Selector::of_name("sel_3_17").expect("legal name"), sel);
        assert!(Selector::of_name("sel_3").is_err());
        assert!(Selector::of_name("cnt_3_17").is_err());
    }

    #[test]
    fn clauses_print_as_smt2() {
        let (a, b) = (Selector::new(0.into(), 1.into()), Selector::new(0.into(), 2.into()));
        assert_eq!(smt_string(&Clause::Require(vec![a, b])), "(or sel_0_1 sel_0_2)");
        assert_eq!(smt_string(&Clause::Require(vec![])), "false");
        assert_eq!(
            smt_string(&Clause::Guard {
                falsifiers: vec![a],
                breakers: vec![b],
            }),
            "(or (or sel_0_1) (and (not sel_0_2)))"
        );
        assert_eq!(
            smt_string(&Clause::Guard {
                falsifiers: vec![],
                breakers: vec![],
            }),
            "(or false true)"
        );
        assert_eq!(
            smt_string(&Card {
                selectors: &[a, b],
                bound: 1,
            }),
            "(<= (+ 0 (ite sel_0_1 1 0) (ite sel_0_2 1 0)) 1)"
        );
    }
}
