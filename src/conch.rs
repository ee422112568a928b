//! Conch is a learner for conjunctive invariants over Horn-labeled Boolean
//! samples, meant to run as the learning half of a CEGIS loop: an external
//! verifier checks candidate invariants and produces positive, negative and
//! implication examples; conch consumes the accumulated examples and emits a
//! new candidate consistent with all of them.
//!
//! One process run is one round. The round's artifacts (examples, Horn
//! constraints, alphabet partition, persisted state) live in files sharing a
//! stem given on the command line, see the [`parse`] module.
//!
//! The learners proper live in [`learning`]: the maximal-conjunction fixed
//! point, four reduction strategies growing a smaller conjunction, and two
//! online linear-threshold refiners with a Boolean decision-tree lowering.
//!
//! [`parse`]: parse/index.html (parse module)
//! [`learning`]: learning/index.html (learning module)

#![doc(test(attr(deny(warnings))))]
#![allow(non_upper_case_globals)]

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate clap;

pub mod errors;
#[macro_use]
pub mod common;
pub mod data;
pub mod learning;
pub mod parse;

#[cfg(test)]
mod tests;

use crate::common::*;
use crate::data::Data;
use crate::learning::threshold::{self, Ltf, Perceptron, Winnow};
use crate::learning::tree::Node;
use crate::learning::{conj, horndini, sorcar};

/// Outputs of a successful round.
///
/// Nothing is written before the selected algorithm has fully succeeded, so
/// that a failing round leaves the verifier's view of the previous round
/// untouched.
#[derive(Default)]
struct RoundOutput {
    /// New reduced conjunctions, destined for the `.R` file.
    r: Option<Hyp>,
    /// New learner weights, destined for the `.W` file.
    weights: Option<Vec<Vec<f64>>>,
    /// Verifier-facing hypothesis, destined for the `.json` file.
    json: Option<Node>,
}
impl RoundOutput {
    /// Writes whatever the round produced next to the input artifacts.
    fn flush(self, stem: &str) -> Res<()> {
        if let Some(r) = self.r.as_ref() {
            parse::write_r(&parse::artifact(stem, "R"), r)?
        }
        if let Some(rows) = self.weights.as_ref() {
            parse::write_w(&parse::artifact(stem, "W"), rows)?
        }
        if let Some(json) = self.json.as_ref() {
            let path = parse::artifact(stem, "json");
            let mut file = parse::create(&path)?;
            json.write(&mut file)?
        }
        Ok(())
    }
}

/// Parses command-line arguments and runs one round.
pub fn work() -> Res<()> {
    if let Some(stem) = conf.stem() {
        run_round(stem)
    } else {
        bail!(ErrorKind::InvalidInput("no file stem provided".into()))
    }
}

/// Runs one learning round over the artifacts at `stem`.
pub fn run_round(stem: &str) -> Res<()> {
    let (data, round) = parse::read_input(stem)?;
    log_info!(
        "round {}: {} ({}), {} points, {} constraints, {} locations",
        round,
        conf.emph(conf.learn.alg.as_str()),
        conf.learn,
        data.points.len(),
        data.constraints.len(),
        data.loc_count()
    );

    let x = horndini::conjunctions(&data)?;
    debug_assert!(conj::is_consistent(&x, &data));

    let mut out = RoundOutput::default();

    match conf.learn.alg {
        Alg::Horndini => {
            out.json = Some(Node::of_hyp(&data, &x));
            out.r = Some(x)
        }

        Alg::SorcarAll | Alg::SorcarFirst | Alg::SorcarGreedy | Alg::SorcarMinimal => {
            let horndini_round = (conf.learn.horndini_first && round == 1)
                || (conf.learn.alternate && round % 2 == 1);
            if horndini_round {
                log_info!("emitting the maximal conjunction, reducer skipped this round");
                out.json = Some(Node::of_hyp(&data, &x));
                out.r = Some(x)
            } else {
                let mut r = resume_r(stem, &data, round)?;
                match conf.learn.alg {
                    Alg::SorcarAll => sorcar::reduce_all(&data, &x, &mut r)?,
                    Alg::SorcarFirst => sorcar::reduce_first(&data, &x, &mut r)?,
                    Alg::SorcarGreedy => sorcar::reduce_greedy(&data, &x, &mut r)?,
                    Alg::SorcarMinimal => sorcar::reduce_minimal(&data, &x, &mut r)?,
                    _ => unreachable!("guarded by the outer match"),
                }
                out.json = Some(Node::of_hyp(&data, &r));
                out.r = Some(r)
            }
        }

        Alg::Winnow => {
            let mut learners: LocMap<Winnow> = data
                .intervals
                .iter()
                .map(|&(lo, hi)| Winnow::new(hi.get() - lo.get() + 1))
                .collect();
            run_threshold(stem, &data, round, &x, &mut learners, &mut out)?;
            out.json = Some(if conf.learn.false_first && round == 1 {
                Node::constant_false(&data)
            } else {
                match conf.ltf.mode {
                    LtfMode::Ltf => Node::of_ltf(&data, &learners),
                    LtfMode::Bool => Node::of_ltf_bool(&data, &learners),
                    LtfMode::Adaptive => {
                        let lowered = Node::of_ltf_bool(&data, &learners);
                        if lowered.leaves() <= conf.ltf.threshold {
                            lowered
                        } else {
                            Node::of_ltf(&data, &learners)
                        }
                    }
                }
            })
        }

        Alg::Perceptron => {
            let mut learners: LocMap<Perceptron> = data
                .intervals
                .iter()
                .map(|&(lo, hi)| Perceptron::new(hi.get() - lo.get() + 1))
                .collect();
            run_threshold(stem, &data, round, &x, &mut learners, &mut out)?;
            out.json = Some(Node::of_ltf(&data, &learners))
        }
    }

    out.flush(stem)
}

/// Shared flow of the threshold learners.
///
/// Selects the imputation set (`X`, or a fresh Sorcar `R` under `-s`),
/// restores persisted weights when asked to, masks the weights to the ambient
/// alphabet, trains, and stages the new weights (and `R`, under `-s`) for
/// writing.
fn run_threshold<L: Ltf>(
    stem: &str,
    data: &Data,
    round: usize,
    x: &Hyp,
    learners: &mut LocMap<L>,
    out: &mut RoundOutput,
) -> Res<()> {
    let imputed = if conf.learn.sorcar_labels {
        let mut r = resume_r(stem, data, round)?;
        sorcar::reduce_all(data, x, &mut r)?;
        Some(r)
    } else {
        None
    };

    if conf.learn.read_weights && round != 1 {
        let rows = parse::read_w(&parse::artifact(stem, "W"))?;
        if rows.len() != learners.len() {
            bail!(ErrorKind::InvalidInput(format!(
                "`.W` file has {} lines but there are {} locations",
                rows.len(),
                learners.len()
            )))
        }
        for (loc, row) in rows.into_iter().enumerate() {
            learners[LocIdx::from(loc)].load_weights(row)?
        }
    }

    for (loc, &(lo, _)) in data.intervals.index_iter() {
        learners[loc].mask_to_alphabet(lo, &x[loc])
    }

    threshold::execute(
        learners,
        data,
        imputed.as_ref().unwrap_or(x),
        conf.learn.max_epochs,
    )?;

    out.weights = Some(learners.iter().map(|l| l.weights().to_vec()).collect());
    if let Some(r) = imputed {
        out.r = Some(r)
    }
    Ok(())
}

/// Prior round's `R`, or the empty hypothesis on round one / explicit reset.
fn resume_r(stem: &str, data: &Data, round: usize) -> Res<Hyp> {
    if conf.learn.reset_r || round == 1 {
        Ok(conj::empty(data.loc_count()))
    } else {
        let r = parse::read_r(&parse::artifact(stem, "R"))?;
        if r.len() != data.loc_count() {
            bail!(ErrorKind::InvalidInput(format!(
                "`.R` file has {} lines but there are {} locations",
                r.len(),
                data.loc_count()
            )))
        }
        Ok(r)
    }
}
