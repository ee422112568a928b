//! The learning algorithms.
//!
//! Bottom-up: [`conj`] is the predicate-set algebra and the consistency
//! checker; [`horndini`] computes the maximal consistent conjunctions `X`;
//! [`sorcar`] grows a smaller consistent `R ⊆ X` (four strategies, the
//! cardinality-minimal one through [`smt`]); [`threshold`] refines beyond
//! conjunctions with online linear-threshold learners; [`tree`] renders
//! hypotheses as the verifier's decision-tree JSON, including the
//! threshold-to-Boolean lowering.
//!
//! [`conj`]: conj/index.html (conj module)
//! [`horndini`]: horndini/index.html (horndini module)
//! [`sorcar`]: sorcar/index.html (sorcar module)
//! [`smt`]: smt/index.html (smt module)
//! [`threshold`]: threshold/index.html (threshold module)
//! [`tree`]: tree/index.html (tree module)

pub mod conj;
pub mod horndini;
pub mod smt;
pub mod sorcar;
pub mod threshold;
pub mod tree;
