//! Horn constraints between data points.

use crate::common::*;
use crate::data::point::DataPoint;

/// A Horn constraint: if all premises are classified positive, so must the
/// conclusion be.
///
/// Premises and conclusion are indices into the point arena owned by
/// [`Data`]; points can appear in any number of constraints and carry labels
/// of their own. A `None` conclusion encodes `false`: the premises must not
/// be jointly satisfied.
///
/// [`Data`]: ../struct.Data.html (Data struct)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// Premise points.
    pub lhs: Vec<PntIdx>,
    /// Conclusion point; `None` encodes `false`.
    pub rhs: Option<PntIdx>,
}
impl Constraint {
    /// Constructor.
    pub fn new(lhs: Vec<PntIdx>, rhs: Option<PntIdx>) -> Self {
        Constraint { lhs, rhs }
    }

    /// True if every premise satisfies its location's conjunction.
    pub fn lhs_satisfied(&self, points: &PntMap<DataPoint>, hyp: &Hyp) -> bool {
        self.lhs.iter().all(|pnt| {
            let dp = &points[*pnt];
            dp.satisfies(&hyp[dp.loc])
        })
    }
}
impl_fmt! {
    Constraint(self, fmt) {
        let mut pref = "";
        for pnt in &self.lhs {
            write!(fmt, "{}#{}", pref, pnt)?;
            pref = " "
        }
        match self.rhs {
            Some(pnt) => write!(fmt, " => #{}", pnt),
            None => write!(fmt, " => false"),
        }
    }
}
