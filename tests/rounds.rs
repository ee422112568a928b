//! End-to-end round tests, driving the file boundary through a scratch
//! directory.
//!
//! The test binary runs with no command-line arguments, so the global
//! configuration takes its defaults: Sorcar-all, no reset, no alternation.

use conch::common::*;
use conch::learning::conj;
use conch::parse;

/// Fresh file stem in the system scratch directory.
fn scratch_stem(name: &str) -> String {
    let mut path = ::std::env::temp_dir();
    path.push(format!("conch_round_{}_{}", ::std::process::id(), name));
    path.to_string_lossy().to_string()
}

/// Writes one artifact of a round.
fn artifact(stem: &str, ext: &str, content: &str) {
    ::std::fs::write(parse::artifact(stem, ext), content)
        .unwrap_or_else(|e| panic!("while writing the `{}` artifact: {}", ext, e))
}

/// Removes every artifact of a round.
fn cleanup(stem: &str) {
    for ext in &["attributes", "data", "horn", "intervals", "status", "R", "W", "json"] {
        let _ = ::std::fs::remove_file(parse::artifact(stem, ext));
    }
}

const ATTRIBUTES: &str = "cat $func\nbool p0\nbool p1\nbool p2\nbool p3\n";

#[test]
fn sorcar_round_writes_r_and_json() {
    let stem = scratch_stem("sorcar");
    artifact(&stem, "attributes", ATTRIBUTES);
    artifact(&stem, "data", "0 1 1 1 1 +\n0 1 1 0 1 -\n");
    artifact(&stem, "horn", "");
    artifact(&stem, "intervals", "0 3\n");
    artifact(&stem, "status", "1\n");

    conch::run_round(&stem).expect("consistent round");

    // The negative example forces exactly `{2}`.
    let r = parse::read_r(&parse::artifact(&stem, "R")).expect("R was written");
    let expected: Conj = vec![PrdIdx::from(2)].into_iter().collect();
    assert_eq!(r.len(), 1);
    assert_eq!(r[LocIdx::from(0)], expected);

    let json = ::std::fs::read_to_string(parse::artifact(&stem, "json")).expect("json was written");
    assert!(json.contains(r#""attribute":"$func""#));
    assert!(json.contains(r#""attribute":"p2""#));
    assert!(!json.contains(r#""attribute":"p1""#));

    cleanup(&stem)
}

#[test]
fn inconsistent_round_writes_nothing() {
    let stem = scratch_stem("falsum");
    artifact(&stem, "attributes", ATTRIBUTES);
    artifact(&stem, "data", "0 1 1 0 0 +\n");
    artifact(&stem, "horn", "0 => F\n");
    artifact(&stem, "intervals", "0 3\n");
    artifact(&stem, "status", "1\n");

    let err = conch::run_round(&stem).unwrap_err();
    assert!(err.is_inconsistent());
    assert!(!parse::artifact(&stem, "R").exists());
    assert!(!parse::artifact(&stem, "json").exists());

    cleanup(&stem)
}

#[test]
fn resumed_round_grows_the_previous_r() {
    let stem = scratch_stem("resume");
    artifact(&stem, "attributes", ATTRIBUTES);
    artifact(&stem, "data", "0 1 1 1 1 +\n0 1 1 0 1 -\n0 1 0 1 1 -\n");
    artifact(&stem, "horn", "");
    artifact(&stem, "intervals", "0 3\n");
    artifact(&stem, "status", "2\n");
    // Prior round's result.
    artifact(&stem, "R", "2\n");

    conch::run_round(&stem).expect("consistent round");

    let r = parse::read_r(&parse::artifact(&stem, "R")).expect("R was written");
    let conj = &r[LocIdx::from(0)];
    assert!(conj.contains(&PrdIdx::from(2)));
    // The second negative `[1,0,1,1]` is falsified too.
    assert!(conj.contains(&PrdIdx::from(1)));

    cleanup(&stem)
}

#[test]
fn malformed_input_is_invalid() {
    let stem = scratch_stem("malformed");
    artifact(&stem, "attributes", ATTRIBUTES);
    artifact(&stem, "data", "0 1 1 broken 1 +\n");
    artifact(&stem, "horn", "");
    artifact(&stem, "intervals", "0 3\n");
    artifact(&stem, "status", "1\n");

    assert!(conch::run_round(&stem).is_err());
    assert!(!parse::artifact(&stem, "json").exists());

    cleanup(&stem)
}

#[test]
fn round_trip_preserves_the_hypothesis() {
    let stem = scratch_stem("trip");
    let hyp: Hyp = vec![
        vec![PrdIdx::from(0), PrdIdx::from(3)].into_iter().collect(),
        Conj::new(),
    ]
    .into_iter()
    .collect();
    parse::write_r(&parse::artifact(&stem, "R"), &hyp).expect("writing R");
    let back = parse::read_r(&parse::artifact(&stem, "R")).expect("reading R");
    assert_eq!(hyp, back);
    assert!(conj::empty(2).iter().all(|conj| conj.is_empty()));
    cleanup(&stem)
}
