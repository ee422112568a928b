//! The Sorcar reducers: a smaller consistent conjunction `R ⊆ X`.
//!
//! Every variant takes Horndini's `X` as the ambient alphabet and a starting
//! `R` (empty, or the previous round's result) and *grows* `R` until it is
//! consistent. Growing is always sound because `X` itself is consistent:
//!
//! - a negative point satisfying `R[k]` refutes some predicate of
//!   `X[k] \ R[k]`, which falsifies it once added;
//! - an *active* Horn constraint (premises satisfied, conclusion `false` or
//!   unsatisfied) can always be made vacuous by falsifying one of its
//!   premises the same way.
//!
//! The Horn pass is a fixed point: additions can break a conclusion that was
//! satisfied before, so the scan repeats until a full pass adds nothing. A
//! constraint whose premises already fail under `R` is vacuous forever, since
//! `R` only grows, and is dropped from the scan.
//!
//! The variants only differ in *which* falsifiers they add: everything
//! (`all`), one (`first`), the best scorer (`greedy`), or a cardinality
//! minimal choice delegated to the solver (`minimal`).

use std::collections::BTreeMap;

use crate::common::*;
use crate::data::{Data, DataPoint};
use crate::learning::conj;
use crate::learning::smt::{self, Clause, Selector};

/// Moves the zero-bit candidates of `dp` from the pool to the conjunction.
///
/// Stops after one addition if `first_only`. True if anything was added.
fn add_falsifiers(dp: &DataPoint, conj: &mut Conj, pool: &mut Conj, first_only: bool) -> bool {
    let chosen: Vec<PrdIdx> = pool
        .iter()
        .filter(|prd| !dp.bits[prd.get()])
        .cloned()
        .collect();
    let mut added = false;
    for prd in chosen {
        conj.insert(prd);
        pool.remove(&prd);
        added = true;
        if first_only {
            break;
        }
    }
    added
}

/// True if the constraint needs fixing under `r`: premises satisfied, and the
/// conclusion is `false` or unsatisfied.
fn is_active(hc: &crate::data::Constraint, data: &Data, r: &Hyp) -> bool {
    hc.lhs_satisfied(&data.points, r)
        && hc.rhs.map_or(true, |pnt| {
            let dp = &data.points[pnt];
            !dp.satisfies(&r[dp.loc])
        })
}

/// Sorcar-all: adds every relevant predicate.
pub fn reduce_all(data: &Data, x: &Hyp, r: &mut Hyp) -> Res<()> {
    reduce_eager(data, x, r, false)
}

/// Sorcar-first: adds the first relevant predicate, in index order.
pub fn reduce_first(data: &Data, x: &Hyp, r: &mut Hyp) -> Res<()> {
    reduce_eager(data, x, r, true)
}

/// Shared body of the `all` and `first` variants.
fn reduce_eager(data: &Data, x: &Hyp, r: &mut Hyp, first_only: bool) -> Res<()> {
    let mut pool = conj::prepare(x, r)?;

    // Negative pass.
    for dp in &data.points {
        if dp.label.is_neg() && dp.satisfies(&r[dp.loc]) {
            // `X` is consistent, so the point refutes something in the pool.
            debug_assert!(!dp.satisfies(&x[dp.loc]));
            let added = add_falsifiers(dp, &mut r[dp.loc], &mut pool[dp.loc], first_only);
            debug_assert!(added);
        }
    }

    // Horn fixed point.
    let mut live: Vec<CstrIdx> = data.constraints.index_iter().map(|(idx, _)| idx).collect();
    loop {
        let mut progress = false;
        let mut cnt = 0;
        while cnt < live.len() {
            let hc = &data.constraints[live[cnt]];
            if !hc.lhs_satisfied(&data.points, r) {
                // Vacuous now and forever.
                live.swap_remove(cnt);
            } else if hc.rhs.map_or(false, |pnt| {
                let dp = &data.points[pnt];
                dp.satisfies(&r[dp.loc])
            }) {
                // Satisfied, but a later addition may break the conclusion.
                cnt += 1;
            } else {
                let mut added = false;
                for pnt in &hc.lhs {
                    let dp = &data.points[*pnt];
                    if add_falsifiers(dp, &mut r[dp.loc], &mut pool[dp.loc], first_only) {
                        added = true;
                        if first_only {
                            break;
                        }
                    }
                }
                debug_assert!(added);
                live.swap_remove(cnt);
                progress = true;
            }
        }
        if !progress {
            break;
        }
    }

    debug_assert!(conj::is_consistent(r, data));
    Ok(())
}

/// Sorcar-greedy: repeatedly adds the predicate fixing the most violators.
///
/// A violator is a misclassified negative point or an active Horn constraint;
/// a predicate fixes it when adding the predicate falsifies the point,
/// respectively some premise of the constraint. Ties go to the smallest
/// `(location, predicate)` pair, which makes the outcome deterministic.
pub fn reduce_greedy(data: &Data, x: &Hyp, r: &mut Hyp) -> Res<()> {
    let mut pool = conj::prepare(x, r)?;

    // Per-location violator bookkeeping: candidate predicate to the negative
    // points and constraints it would fix.
    let mut scores: LocMap<BTreeMap<PrdIdx, (PntSet, CstrSet)>> =
        (0..r.len()).map(|_| BTreeMap::new()).collect();

    for (pnt, dp) in data.points.index_iter() {
        if dp.label.is_neg() && dp.satisfies(&r[dp.loc]) {
            for prd in pool[dp.loc].iter() {
                if !dp.bits[prd.get()] {
                    scores[dp.loc]
                        .entry(*prd)
                        .or_insert_with(Default::default)
                        .0
                        .insert(pnt);
                }
            }
        }
    }

    loop {
        let mut done = true;

        // Mark the candidates of the currently active constraints.
        for (idx, hc) in data.constraints.index_iter() {
            if is_active(hc, data, r) {
                done = false;
                for pnt in &hc.lhs {
                    let dp = &data.points[*pnt];
                    for prd in pool[dp.loc].iter() {
                        if !dp.bits[prd.get()] {
                            scores[dp.loc]
                                .entry(*prd)
                                .or_insert_with(Default::default)
                                .1
                                .insert(idx);
                        }
                    }
                }
            }
        }

        // Commit the best candidates one by one, discounting the violators
        // each commitment fixes from every other candidate.
        let mut fresh: Vec<(LocIdx, PrdIdx)> = vec![];
        loop {
            let mut best: Option<(LocIdx, PrdIdx, usize)> = None;
            for (loc, cands) in scores.index_iter() {
                for (prd, (negs, horns)) in cands {
                    let value = negs.len() + horns.len();
                    if value > best.map_or(0, |(_, _, max)| max) {
                        best = Some((loc, *prd, value))
                    }
                }
            }
            let (best_loc, best_prd) = match best {
                Some((loc, prd, _)) => (loc, prd),
                None => break,
            };

            let (negs, horns) = scores[best_loc]
                .remove(&best_prd)
                .expect("the candidate was just scored");
            for pnt in negs {
                let dp = &data.points[pnt];
                for other in pool[dp.loc].iter() {
                    if !dp.bits[other.get()] {
                        if let Some(entry) = scores[dp.loc].get_mut(other) {
                            entry.0.remove(&pnt);
                        }
                    }
                }
            }
            for cstr in horns {
                for pnt in &data.constraints[cstr].lhs {
                    let dp = &data.points[*pnt];
                    for other in pool[dp.loc].iter() {
                        if !dp.bits[other.get()] {
                            if let Some(entry) = scores[dp.loc].get_mut(other) {
                                entry.1.remove(&cstr);
                            }
                        }
                    }
                }
            }

            fresh.push((best_loc, best_prd));
            done = false;
        }

        debug_assert!(scores
            .iter()
            .all(|cands| cands.values().all(|(negs, horns)| negs.is_empty() && horns.is_empty())));

        if !done && fresh.is_empty() {
            // An active constraint with no candidate left means the ambient
            // `X` was not consistent to begin with.
            bail!(ErrorKind::Inconsistent(
                "no relevant predicate left for an active Horn constraint".into()
            ))
        }

        for (loc, prd) in fresh {
            r[loc].insert(prd);
            pool[loc].remove(&prd);
        }

        if done {
            break;
        }
    }

    debug_assert!(conj::is_consistent(r, data));
    Ok(())
}

/// Sorcar-minimal: adds a cardinality-minimal set of predicates, through the
/// solver.
///
/// One Boolean selector per pool predicate; each violator contributes an
/// at-least-one clause over the selectors that would fix it, and each
/// constraint whose conclusion currently holds contributes a guard preventing
/// the additions from breaking it. The solver is then asked for a model of
/// size at most `k` for increasing `k`.
pub fn reduce_minimal(data: &Data, x: &Hyp, r: &mut Hyp) -> Res<()> {
    let mut pool = conj::prepare(x, r)?;

    // Selectors the point would fix: its zero-bit pool predicates.
    let falsifiers = |dp: &DataPoint, pool: &Hyp| -> Vec<Selector> {
        pool[dp.loc]
            .iter()
            .filter(|prd| !dp.bits[prd.get()])
            .map(|prd| Selector::new(dp.loc, *prd))
            .collect()
    };

    let mut clauses: Vec<Clause> = vec![];

    for dp in &data.points {
        if dp.label.is_neg() && dp.satisfies(&r[dp.loc]) {
            clauses.push(Clause::Require(falsifiers(dp, &pool)))
        }
    }

    for hc in &data.constraints {
        if !hc.lhs_satisfied(&data.points, r) {
            continue;
        }
        let mut premise_falsifiers = vec![];
        for pnt in &hc.lhs {
            premise_falsifiers.extend(falsifiers(&data.points[*pnt], &pool))
        }
        let conclusion_holds = hc.rhs.map_or(false, |pnt| {
            let dp = &data.points[pnt];
            dp.satisfies(&r[dp.loc])
        });
        if conclusion_holds {
            // Selecting a conclusion breaker forces a premise falsifier.
            let pnt = hc.rhs.expect("the conclusion holds, so it is a point");
            clauses.push(Clause::Guard {
                falsifiers: premise_falsifiers,
                breakers: falsifiers(&data.points[pnt], &pool),
            })
        } else {
            clauses.push(Clause::Require(premise_falsifiers))
        }
    }

    if clauses.is_empty() {
        debug_assert!(conj::is_consistent(r, data));
        return Ok(());
    }

    let selectors: Vec<Selector> = pool
        .index_iter()
        .flat_map(|(loc, conj)| conj.iter().map(move |prd| Selector::new(loc, *prd)))
        .collect();

    for Selector { loc, prd } in smt::minimize(&selectors, &clauses)? {
        r[loc].insert(prd);
    }

    debug_assert!(conj::is_consistent(r, data));
    Ok(())
}
