//! Example storage: the per-round arena of data points and Horn constraints.
//!
//! The store owns everything the verifier sent for this round. Learners
//! borrow it immutably for the duration of a reduction; the only state they
//! own and mutate is their conjunctions (or weights).

use crate::common::*;

pub mod constraint;
pub mod point;

pub use self::constraint::Constraint;
pub use self::point::{DataPoint, Label};

/// Attribute metadata from the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attributes {
    /// Name of the location category attribute.
    pub cat: String,
    /// Names of the Boolean predicate attributes, in alphabet order.
    pub bools: PrdMap<String>,
}
impl Attributes {
    /// Name of a predicate.
    pub fn name(&self, prd: PrdIdx) -> &str {
        &self.bools[prd]
    }
}

/// The example store for one round.
#[derive(Debug, Clone)]
pub struct Data {
    /// Attribute metadata.
    pub attrs: Attributes,
    /// Point arena.
    pub points: PntMap<DataPoint>,
    /// Horn constraints, referring to points by index.
    pub constraints: CstrMap<Constraint>,
    /// Alphabet interval `(lo, hi)` owned by each location (inclusive).
    pub intervals: LocMap<(PrdIdx, PrdIdx)>,
}
impl Data {
    /// Constructor; checks the store's invariants.
    pub fn new(
        attrs: Attributes,
        points: PntMap<DataPoint>,
        constraints: CstrMap<Constraint>,
        intervals: LocMap<(PrdIdx, PrdIdx)>,
    ) -> Res<Self> {
        let data = Data {
            attrs,
            points,
            constraints,
            intervals,
        };
        data.check()?;
        Ok(data)
    }

    /// Number of locations.
    pub fn loc_count(&self) -> usize {
        self.intervals.len()
    }
    /// Size of the predicate alphabet.
    pub fn prd_count(&self) -> usize {
        self.attrs.bools.len()
    }

    /// Checks the store's invariants: non-empty alphabet and partition,
    /// intervals within the alphabet, points with valid locations and
    /// full-width valuations, constraints referring to existing points.
    pub fn check(&self) -> Res<()> {
        if self.attrs.bools.is_empty() {
            bail!(ErrorKind::InvalidInput("no attributes defined".into()))
        }
        if self.intervals.is_empty() {
            bail!(ErrorKind::InvalidInput("interval list is empty".into()))
        }
        for (loc, &(lo, hi)) in self.intervals.index_iter() {
            if lo > hi || hi.get() >= self.prd_count() {
                bail!(ErrorKind::InvalidInput(format!(
                    "interval ({}, {}) of location {} does not fit the {} predicates",
                    lo,
                    hi,
                    loc,
                    self.prd_count()
                )))
            }
        }
        for (pnt, dp) in self.points.index_iter() {
            if dp.loc.get() >= self.loc_count() {
                bail!(ErrorKind::InvalidInput(format!(
                    "point {} mentions location {} but there are {} locations",
                    pnt,
                    dp.loc,
                    self.loc_count()
                )))
            }
            if dp.bits.len() != self.prd_count() {
                bail!(ErrorKind::InvalidInput(format!(
                    "point {} carries {} bits but there are {} predicates",
                    pnt,
                    dp.bits.len(),
                    self.prd_count()
                )))
            }
        }
        for (idx, hc) in self.constraints.index_iter() {
            for pnt in hc.lhs.iter().chain(hc.rhs.iter()) {
                if pnt.get() >= self.points.len() {
                    bail!(ErrorKind::InvalidInput(format!(
                        "constraint {} refers to unknown point {}",
                        idx, pnt
                    )))
                }
            }
        }
        Ok(())
    }
}
