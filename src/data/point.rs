//! Data points: Boolean valuations of the alphabet at a program location.

use crate::common::*;

/// Classification state of a data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// Positive example.
    Pos,
    /// Negative example.
    Neg,
    /// Unclassified; such points only matter through Horn constraints, until
    /// a learner imputes a label.
    Unc,
}
impl Label {
    /// True if positive.
    pub fn is_pos(self) -> bool {
        self == Label::Pos
    }
    /// True if negative.
    pub fn is_neg(self) -> bool {
        self == Label::Neg
    }
    /// True if unclassified.
    pub fn is_unc(self) -> bool {
        self == Label::Unc
    }
}
impl_fmt! {
    Label(self, fmt) {
        match self {
            Label::Pos => write!(fmt, "+"),
            Label::Neg => write!(fmt, "-"),
            Label::Unc => write!(fmt, "?"),
        }
    }
}

/// A data point: one example produced by the verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPoint {
    /// Location (category) the point belongs to.
    pub loc: LocIdx,
    /// Valuation of the whole predicate alphabet.
    pub bits: Bits,
    /// Classification state.
    pub label: Label,
}
impl DataPoint {
    /// Constructor.
    pub fn new(loc: LocIdx, bits: Bits, label: Label) -> Self {
        DataPoint { loc, bits, label }
    }

    /// True if the point satisfies a conjunction.
    pub fn satisfies(&self, conj: &Conj) -> bool {
        conj.iter().all(|prd| self.bits[prd.get()])
    }
}
impl_fmt! {
    DataPoint(self, fmt) {
        write!(fmt, "{}", self.loc)?;
        for bit in &self.bits {
            write!(fmt, " {}", if *bit { 1 } else { 0 })?
        }
        write!(fmt, " {}", self.label)
    }
}
