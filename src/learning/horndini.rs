//! Horndini: the largest consistent per-location conjunction.
//!
//! Starts from the full alphabet of every location and runs a knock-out /
//! firing fixed point:
//!
//! - *knock-out*: every predicate valued `false` by some positive point is
//!   deleted from that point's location;
//! - *firing*: premises that satisfy the current conjunctions are discharged
//!   from their constraints; a constraint left with no premise fires, turning
//!   its conclusion into a new positive, or proving inconsistency when the
//!   conclusion is `false`.
//!
//! Both steps are monotone (conjunctions only shrink, premises only get
//! discharged), so the loop terminates on the *greatest* fixed point: any
//! consistent hypothesis is location-wise included in the result.

use crate::common::*;
use crate::data::{Constraint, Data};

/// Computes the maximal consistent conjunctions from the full alphabet.
///
/// Fails with [`ErrorKind::Inconsistent`][inc] when no consistent conjunction
/// exists at all.
///
/// [inc]: ../../errors/enum.ErrorKind.html#variant.Inconsistent
/// (Inconsistent variant of the ErrorKind enum)
pub fn conjunctions(data: &Data) -> Res<Hyp> {
    if data.intervals.is_empty() {
        bail!(ErrorKind::InvalidInput("interval list is empty".into()))
    }
    let mut hyp = Hyp::with_capacity(data.intervals.len());
    for &(lo, hi) in &data.intervals {
        hyp.push((lo.get()..=hi.get()).map(PrdIdx::from).collect());
    }
    saturate(data, &mut hyp)?;
    Ok(hyp)
}

/// Saturates some conjunctions: knock-out on the pending positives, then a
/// firing pass, until a full firing pass yields no new positive.
pub fn saturate(data: &Data, hyp: &mut Hyp) -> Res<()> {
    // Pending positive points.
    let mut queue: Vec<PntIdx> = data
        .points
        .index_iter()
        .filter(|(_, dp)| dp.label.is_pos())
        .map(|(pnt, _)| pnt)
        .collect();

    // Working copies of the constraints; premises are discharged in place,
    // fired constraints are dropped.
    let mut horns: Vec<Constraint> = data.constraints.iter().cloned().collect();

    loop {
        // Knock-out pass.
        for pnt in queue.drain(..) {
            let dp = &data.points[pnt];
            hyp[dp.loc].retain(|prd| dp.bits[prd.get()])
        }

        // Firing pass. Conjunctions do not move during this pass, so
        // discharging premises first and collecting empty left-hand sides
        // second is equivalent to doing both in one walk.
        for hc in horns.iter_mut() {
            hc.lhs.retain(|pnt| {
                let dp = &data.points[*pnt];
                !dp.satisfies(&hyp[dp.loc])
            })
        }
        let mut cnt = 0;
        while cnt < horns.len() {
            if horns[cnt].lhs.is_empty() {
                match horns.swap_remove(cnt).rhs {
                    None => bail!(ErrorKind::Inconsistent(
                        "no consistent conjunction exists".into()
                    )),
                    Some(pnt) => queue.push(pnt),
                }
            } else {
                cnt += 1
            }
        }

        if queue.is_empty() {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::learning::conj;
    use crate::tests::{conj_of, dataset};

    #[test]
    fn positives_knock_out() {
        let data = dataset(
            4,
            &[(0, 3)],
            &[(0, "1101", '+'), (0, "1001", '+')],
            &[],
        );
        let x = conjunctions(&data).expect("consistent");
        assert_eq!(x[LocIdx::from(0)], conj_of(&[0, 3]));
        assert!(conj::is_consistent(&x, &data));
    }

    #[test]
    fn negatives_alone_knock_out_nothing() {
        let data = dataset(4, &[(0, 3)], &[(0, "1111", '+'), (0, "1101", '-')], &[]);
        let x = conjunctions(&data).expect("consistent");
        assert_eq!(x[LocIdx::from(0)], conj_of(&[0, 1, 2, 3]));
        assert!(conj::is_consistent(&x, &data));
    }

    #[test]
    fn horn_chain_fires() {
        let data = dataset(
            4,
            &[(0, 3)],
            &[(0, "1010", '+'), (0, "1100", '?'), (0, "0010", '?')],
            &[(&[0], Some(1))],
        );
        // `a` knocks the alphabet down to `{0, 2}`, then satisfies it, so the
        // constraint fires `b` positive and `{0}` remains.
        let x = conjunctions(&data).expect("consistent");
        assert_eq!(x[LocIdx::from(0)], conj_of(&[0]));
        assert!(conj::is_consistent(&x, &data));
    }

    #[test]
    fn falsum_is_inconsistent() {
        let data = dataset(4, &[(0, 3)], &[(0, "1100", '+')], &[(&[0], None)]);
        let err = conjunctions(&data).unwrap_err();
        assert!(err.is_inconsistent());
    }

    #[test]
    fn empty_premises_fire_immediately() {
        // A constraint with no premise forces its conclusion positive even
        // when no labeled positive exists.
        let data = dataset(2, &[(0, 1)], &[(0, "10", '?')], &[(&[], Some(0))]);
        let x = conjunctions(&data).expect("consistent");
        assert_eq!(x[LocIdx::from(0)], conj_of(&[0]));
    }

    #[test]
    fn greatest_fixed_point_dominates() {
        // Any consistent hypothesis is included in Horndini's output.
        let data = dataset(
            4,
            &[(0, 3)],
            &[(0, "1111", '+'), (0, "1101", '-')],
            &[],
        );
        let x = conjunctions(&data).expect("consistent");
        let smaller: Hyp = vec![conj_of(&[2])].into_iter().collect();
        assert!(conj::is_consistent(&smaller, &data));
        assert!(smaller[LocIdx::from(0)].is_subset(&x[LocIdx::from(0)]));
    }
}
