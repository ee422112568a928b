//! Online linear-threshold learners refining beyond the conjunctive
//! hypothesis.
//!
//! One learner per location, over that location's slice of the alphabet.
//! Before training, every example is *inverted* (`x ← 1 − x`, `y ← ¬y`):
//! this turns learning a conjunction (at most θ zeros) into learning a
//! monotone disjunction (at least θ ones), which is Winnow's natural regime.
//! Unclassified points get their label imputed from a caller-selected
//! conjunctive hypothesis first.
//!
//! Training loops over epochs until every supplied example is predicted
//! correctly. The supplied examples must be linearly separable after
//! inversion; the epoch cap turns the non-separable case into an error
//! instead of a hang.

use crate::common::*;
use crate::data::{Data, DataPoint, Label};

/// Interface shared by the online threshold learners.
pub trait Ltf {
    /// Full weight vector, as persisted in the `.W` file.
    fn weights(&self) -> &[f64];
    /// Weights of the location's predicates, in slice order (excludes the
    /// Perceptron bias).
    fn feature_weights(&self) -> &[f64];
    /// Threshold.
    fn theta(&self) -> f64;
    /// Root cut of the emitted threshold function.
    fn root_cut(&self) -> f64;
    /// Prediction on a feature vector.
    fn predict(&self, bits: &[bool]) -> bool;
    /// Mistake-driven update.
    fn update(&mut self, bits: &[bool], label: bool, prediction: bool);
    /// Replaces the weights with persisted ones.
    fn load_weights(&mut self, weights: Vec<f64>) -> Res<()>;
    /// Zeroes the weights of predicates outside the ambient alphabet.
    ///
    /// Default: no masking.
    fn mask_to_alphabet(&mut self, _lo: PrdIdx, _alphabet: &Conj) {}

    /// One pass over the samples.
    fn train_once(&mut self, samples: &[(Bits, bool)]) {
        for (bits, label) in samples {
            let prediction = self.predict(bits);
            self.update(bits, *label, prediction)
        }
    }

    /// True if every sample is predicted correctly.
    fn is_accurate(&self, samples: &[(Bits, bool)]) -> bool {
        samples
            .iter()
            .all(|(bits, label)| self.predict(bits) == *label)
    }

    /// Epochs until every sample is predicted correctly.
    fn train(&mut self, samples: &[(Bits, bool)], max_epochs: usize) -> Res<()> {
        for _ in 0..max_epochs {
            if self.is_accurate(samples) {
                return Ok(());
            }
            self.train_once(samples)
        }
        if self.is_accurate(samples) {
            return Ok(());
        }
        bail!(ErrorKind::Inconsistent(format!(
            "threshold learner did not converge within {} epochs",
            max_epochs
        )))
    }
}

/// Winnow: multiplicative updates over non-negative weights.
#[derive(Debug, Clone)]
pub struct Winnow {
    /// Per-predicate weights, local to the location's slice.
    pub weights: Vec<f64>,
    /// Decision threshold.
    pub theta: f64,
    /// Multiplicative update rate.
    pub rate: f64,
}
impl Winnow {
    /// Fresh learner over `len` predicates.
    pub fn new(len: usize) -> Self {
        Winnow {
            weights: vec![2. * len as f64 / 5.; len],
            theta: 0.441,
            rate: 2.4,
        }
    }
}
impl Ltf for Winnow {
    fn weights(&self) -> &[f64] {
        &self.weights
    }
    fn feature_weights(&self) -> &[f64] {
        &self.weights
    }
    fn theta(&self) -> f64 {
        self.theta
    }
    fn root_cut(&self) -> f64 {
        self.theta
    }

    fn predict(&self, bits: &[bool]) -> bool {
        let mut sum = 0.;
        for (weight, bit) in self.weights.iter().zip(bits.iter()) {
            if *bit {
                sum += weight
            }
        }
        sum >= self.theta
    }

    fn update(&mut self, bits: &[bool], label: bool, prediction: bool) {
        for (weight, bit) in self.weights.iter_mut().zip(bits.iter()) {
            if *bit {
                if !label && prediction {
                    *weight /= self.rate
                } else if label && !prediction {
                    *weight *= self.rate
                }
            }
        }
    }

    fn load_weights(&mut self, weights: Vec<f64>) -> Res<()> {
        if weights.len() != self.weights.len() {
            bail!(ErrorKind::InvalidInput(format!(
                "expected {} weights, got {}",
                self.weights.len(),
                weights.len()
            )))
        }
        self.weights = weights;
        Ok(())
    }

    fn mask_to_alphabet(&mut self, lo: PrdIdx, alphabet: &Conj) {
        for (off, weight) in self.weights.iter_mut().enumerate() {
            if !alphabet.contains(&PrdIdx::from(lo.get() + off)) {
                *weight = 0.
            }
        }
    }
}

/// Perceptron: additive updates with a bias weight.
#[derive(Debug, Clone)]
pub struct Perceptron {
    /// Bias at index 0, then per-predicate weights in slice order.
    pub weights: Vec<f64>,
    /// Decision threshold.
    pub theta: f64,
    /// Learning rate.
    pub rate: f64,
}
impl Perceptron {
    /// Fresh learner over `len` predicates.
    pub fn new(len: usize) -> Self {
        Perceptron {
            weights: vec![1.; len + 1],
            theta: 0.,
            rate: 0.01,
        }
    }
}
impl Ltf for Perceptron {
    fn weights(&self) -> &[f64] {
        &self.weights
    }
    fn feature_weights(&self) -> &[f64] {
        &self.weights[1..]
    }
    fn theta(&self) -> f64 {
        self.theta
    }
    fn root_cut(&self) -> f64 {
        -self.weights[0]
    }

    fn predict(&self, bits: &[bool]) -> bool {
        let mut sum = self.weights[0];
        for (weight, bit) in self.weights[1..].iter().zip(bits.iter()) {
            if *bit {
                sum += weight
            }
        }
        sum >= self.theta
    }

    fn update(&mut self, bits: &[bool], label: bool, prediction: bool) {
        let diff = (label as i8 - prediction as i8) as f64;
        if diff == 0. {
            return;
        }
        for (weight, bit) in self.weights[1..].iter_mut().zip(bits.iter()) {
            if *bit {
                *weight += self.rate * diff
            }
        }
        self.weights[0] += self.rate * diff
    }

    fn load_weights(&mut self, weights: Vec<f64>) -> Res<()> {
        if weights.len() != self.weights.len() {
            bail!(ErrorKind::InvalidInput(format!(
                "expected {} weights (bias included), got {}",
                self.weights.len(),
                weights.len()
            )))
        }
        self.weights = weights;
        Ok(())
    }
}

/// Projects the points on their locations as inverted, label-imputed
/// training samples.
pub fn project(data: &Data, imputed: &Hyp) -> LocMap<Vec<(Bits, bool)>> {
    let mut samples: LocMap<Vec<(Bits, bool)>> =
        (0..data.loc_count()).map(|_| vec![]).collect();
    for dp in &data.points {
        let label = match dp.label {
            Label::Pos => true,
            Label::Neg => false,
            Label::Unc => dp.satisfies(&imputed[dp.loc]),
        };
        let (lo, hi) = data.intervals[dp.loc];
        let bits = (lo.get()..=hi.get()).map(|prd| !dp.bits[prd]).collect();
        samples[dp.loc].push((bits, !label))
    }
    samples
}

/// Trains one learner per location.
pub fn execute<L: Ltf>(
    learners: &mut LocMap<L>,
    data: &Data,
    imputed: &Hyp,
    max_epochs: usize,
) -> Res<()> {
    let samples = project(data, imputed);
    for (loc, samples) in samples.index_iter() {
        learners[loc].train(samples, max_epochs)?
    }
    Ok(())
}

/// Original-space classification of a point by a learner trained on inverted
/// samples.
pub fn classifies<L: Ltf>(learner: &L, data: &Data, dp: &DataPoint) -> bool {
    let (lo, hi) = data.intervals[dp.loc];
    let bits: Bits = (lo.get()..=hi.get()).map(|prd| !dp.bits[prd]).collect();
    !learner.predict(&bits)
}
