//! Predicate-set algebra over per-location conjunctions, and the consistency
//! checker every learner uses as its post-condition.

use crate::common::*;
use crate::data::{Data, Label};

/// The hypothesis mapping every location to the empty conjunction.
pub fn empty(loc_count: usize) -> Hyp {
    (0..loc_count).map(|_| Conj::new()).collect()
}

/// Restricts `r` to `x` in place and returns the candidate pool `x \ r`, per
/// location.
///
/// Fails if `x` is empty or if the sizes disagree. Afterwards `r[k] ⊆ x[k]`,
/// and the result partitions `x[k]` with `r[k]`.
pub fn prepare(x: &Hyp, r: &mut Hyp) -> Res<Hyp> {
    if x.is_empty() {
        bail!(ErrorKind::InvalidInput("X must not be empty".into()))
    }
    if x.len() != r.len() {
        bail!(ErrorKind::InvalidInput(format!(
            "X and R must be of the same size, got {} and {}",
            x.len(),
            r.len()
        )))
    }
    let mut pool = Hyp::with_capacity(x.len());
    for (loc, conj) in x.index_iter() {
        r[loc].retain(|prd| conj.contains(prd));
        pool.push(conj.difference(&r[loc]).cloned().collect());
    }
    Ok(pool)
}

/// True if the hypothesis classifies every labeled example correctly and
/// respects every Horn constraint.
///
/// This is the definition the learners promise to establish; it never
/// mutates anything and is used as a debug assertion and as the test oracle.
pub fn is_consistent(hyp: &Hyp, data: &Data) -> bool {
    for dp in &data.points {
        match dp.label {
            Label::Pos if !dp.satisfies(&hyp[dp.loc]) => return false,
            Label::Neg if dp.satisfies(&hyp[dp.loc]) => return false,
            _ => (),
        }
    }
    for hc in &data.constraints {
        if hc.lhs_satisfied(&data.points, hyp) {
            match hc.rhs {
                None => return false,
                Some(pnt) => {
                    let dp = &data.points[pnt];
                    if !dp.satisfies(&hyp[dp.loc]) {
                        return false;
                    }
                }
            }
        }
    }
    true
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tests::{conj_of, dataset};

    #[test]
    fn prepare_partitions() {
        let x: Hyp = vec![conj_of(&[0, 1, 3]), conj_of(&[4, 5])]
            .into_iter()
            .collect();
        // `7` is outside `x` and must go away.
        let mut r: Hyp = vec![conj_of(&[1, 7]), conj_of(&[])].into_iter().collect();
        let pool = prepare(&x, &mut r).expect("sizes match");

        for (loc, conj) in x.index_iter() {
            assert!(r[loc].is_subset(conj));
            assert!(r[loc].is_disjoint(&pool[loc]));
            let union: Conj = r[loc].union(&pool[loc]).cloned().collect();
            assert_eq!(&union, conj);
        }
        assert_eq!(r[LocIdx::from(0)], conj_of(&[1]));
        assert_eq!(pool[LocIdx::from(0)], conj_of(&[0, 3]));
        assert_eq!(pool[LocIdx::from(1)], conj_of(&[4, 5]));
    }

    #[test]
    fn prepare_rejects_size_mismatch() {
        let x: Hyp = vec![conj_of(&[0])].into_iter().collect();
        let mut r = Hyp::new();
        assert!(prepare(&x, &mut r).is_err());
        assert!(prepare(&Hyp::new(), &mut Hyp::new()).is_err());
    }

    #[test]
    fn consistency_checks_labels_and_horns() {
        let data = dataset(
            2,
            &[(0, 1)],
            &[(0, "11", '+'), (0, "10", '-'), (0, "01", '?')],
            &[(&[0], Some(2))],
        );
        // `{1}` classifies the positive in, the negative out, and the Horn
        // constraint fires onto a satisfying conclusion.
        let good: Hyp = vec![conj_of(&[1])].into_iter().collect();
        assert!(is_consistent(&good, &data));
        // `{0}` lets the negative in.
        let bad: Hyp = vec![conj_of(&[0])].into_iter().collect();
        assert!(!is_consistent(&bad, &data));
        // The empty conjunction lets the negative in too.
        let empty: Hyp = vec![conj_of(&[])].into_iter().collect();
        assert!(!is_consistent(&empty, &data));
    }

    #[test]
    fn consistency_rejects_falsum() {
        let data = dataset(2, &[(0, 1)], &[(0, "11", '+')], &[(&[0], None)]);
        let hyp: Hyp = vec![conj_of(&[0])].into_iter().collect();
        assert!(!is_consistent(&hyp, &data));
    }
}
