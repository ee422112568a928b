//! Test data builders and cross-algorithm scenario tests.

use crate::common::*;
use crate::data::{Attributes, Constraint, Data, DataPoint, Label};
use crate::learning::{conj, horndini, sorcar};

/// Builds an example store over `prd_count` predicates named `p0`, `p1`, …
///
/// Points are `(location, bits, label)` with bits as a `0`/`1` string and
/// label one of `'+'`, `'-'`, `'?'`; constraints are premise indices and an
/// optional conclusion index (`None` is `false`).
pub fn dataset(
    prd_count: usize,
    intervals: &[(usize, usize)],
    points: &[(usize, &str, char)],
    horns: &[(&[usize], Option<usize>)],
) -> Data {
    let attrs = Attributes {
        cat: "$func".into(),
        bools: (0..prd_count).map(|prd| format!("p{}", prd)).collect(),
    };
    let points = points
        .iter()
        .map(|&(loc, bits, label)| {
            DataPoint::new(
                loc.into(),
                bits.chars().map(|c| c == '1').collect(),
                match label {
                    '+' => Label::Pos,
                    '-' => Label::Neg,
                    _ => Label::Unc,
                },
            )
        })
        .collect();
    let constraints = horns
        .iter()
        .map(|&(lhs, rhs)| {
            Constraint::new(lhs.iter().map(|&pnt| pnt.into()).collect(), rhs.map(Into::into))
        })
        .collect();
    let intervals = intervals.iter().map(|&(lo, hi)| (lo.into(), hi.into())).collect();
    Data::new(attrs, points, constraints, intervals).expect("test example store is well-formed")
}

/// Conjunction from raw indices.
pub fn conj_of(prds: &[usize]) -> Conj {
    prds.iter().map(|&prd| prd.into()).collect()
}

#[test]
fn every_reducer_post_condition_holds() {
    // A store exercising labels, implications and `false` conclusions over
    // two locations at once.
    let data = dataset(
        6,
        &[(0, 2), (3, 5)],
        &[
            (0, "110100", '+'),
            (0, "101011", '-'),
            (1, "010110", '+'),
            (1, "001101", '?'),
            (0, "100010", '?'),
            (1, "000111", '?'),
        ],
        &[(&[4], Some(5)), (&[4, 3], None)],
    );
    let x = horndini::conjunctions(&data).expect("consistent");
    assert!(conj::is_consistent(&x, &data));

    for (name, reduce) in vec![
        ("all", sorcar::reduce_all as fn(&Data, &Hyp, &mut Hyp) -> Res<()>),
        ("first", sorcar::reduce_first),
        ("greedy", sorcar::reduce_greedy),
    ] {
        let mut r = conj::empty(data.loc_count());
        reduce(&data, &x, &mut r).expect(name);
        assert!(conj::is_consistent(&r, &data), "variant {}", name);
        for (loc, conj) in r.index_iter() {
            assert!(conj.is_subset(&x[loc]), "variant {}", name)
        }
    }
}

#[test]
fn reducers_stay_inside_their_intervals() {
    let data = dataset(
        4,
        &[(0, 1), (2, 3)],
        &[(0, "1111", '+'), (0, "1011", '-'), (1, "1101", '-')],
        &[],
    );
    let x = horndini::conjunctions(&data).expect("consistent");
    let mut r = conj::empty(2);
    sorcar::reduce_all(&data, &x, &mut r).expect("all");
    for (loc, &(lo, hi)) in data.intervals.index_iter() {
        for prd in &r[loc] {
            assert!(lo <= *prd && *prd <= hi)
        }
    }
}

#[test]
fn alien_resumed_r_is_clipped_to_x() {
    // A persisted `R` can mention predicates a later `X` lost; `prepare`
    // must clip them before the reducer grows the rest.
    let data = dataset(4, &[(0, 3)], &[(0, "1010", '+'), (0, "1000", '-')], &[]);
    let x = horndini::conjunctions(&data).expect("consistent");
    assert_eq!(x[LocIdx::from(0)], conj_of(&[0, 2]));

    let mut r: Hyp = vec![conj_of(&[1, 3])].into_iter().collect();
    sorcar::reduce_all(&data, &x, &mut r).expect("all");
    assert!(conj::is_consistent(&r, &data));
    assert!(r[LocIdx::from(0)].is_subset(&x[LocIdx::from(0)]));
}
