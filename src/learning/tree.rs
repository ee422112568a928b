//! The verifier-facing decision-tree hypothesis.
//!
//! All output shapes use the same node format,
//! `{"attribute", "cut", "classification", "children"}`:
//!
//! - conjunctive hypotheses become a root split on the category attribute
//!   with one requirement chain per location;
//! - trained threshold functions are either dumped as a two-level weight
//!   tree, or *lowered* into an equivalent Boolean tree by [`Node::of_ltf_bool`],
//!   branching on the heaviest live attribute first.
//!
//! [`Node::of_ltf_bool`]: struct.Node.html#method.of_ltf_bool
//! (of_ltf_bool function for Node)

use std::collections::BTreeSet;

use serde::Serialize;

use crate::common::*;
use crate::data::Data;
use crate::learning::threshold::Ltf;

/// One node of the decision tree.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    /// Attribute tested by the node; empty on leaves.
    pub attribute: String,
    /// Cut value: thousandths for threshold weights, 0 for Boolean tests.
    pub cut: i64,
    /// Classification carried by leaves.
    pub classification: bool,
    /// Children; `None` on leaves.
    pub children: Option<Vec<Node>>,
}
impl Node {
    /// Leaf with a classification.
    pub fn leaf(classification: bool) -> Self {
        Node {
            attribute: "".into(),
            cut: 0,
            classification,
            children: None,
        }
    }

    /// Internal node.
    fn internal(attribute: String, cut: i64, children: Vec<Node>) -> Self {
        Node {
            attribute,
            cut,
            classification: true,
            children: Some(children),
        }
    }

    /// Chain tree of a conjunctive hypothesis.
    ///
    /// The root splits on the category; each child requires every predicate
    /// of its location's conjunction in turn, defaulting to `false` as soon
    /// as one fails.
    pub fn of_hyp(data: &Data, hyp: &Hyp) -> Node {
        let mut children = Vec::with_capacity(hyp.len());
        for conj in hyp {
            let mut node = Node::leaf(true);
            for prd in conj.iter().rev() {
                node = Node::internal(
                    data.attrs.name(*prd).into(),
                    0,
                    vec![Node::leaf(false), node],
                )
            }
            children.push(node)
        }
        Node::internal(data.attrs.cat.clone(), 0, children)
    }

    /// The constant-false hypothesis.
    pub fn constant_false(data: &Data) -> Node {
        Node::internal(data.attrs.cat.clone(), 0, vec![Node::leaf(false)])
    }

    /// Two-level weight dump of the threshold learners.
    ///
    /// The inner root's cut is the (scaled) decision threshold, its children
    /// carry one (scaled) weight per attribute.
    pub fn of_ltf<L: Ltf>(data: &Data, learners: &LocMap<L>) -> Node {
        let mut leaves = vec![];
        for (loc, learner) in learners.index_iter() {
            let (lo, _) = data.intervals[loc];
            for (off, weight) in learner.feature_weights().iter().enumerate() {
                leaves.push(Node {
                    attribute: data.attrs.name(PrdIdx::from(lo.get() + off)).into(),
                    cut: scaled(*weight),
                    classification: true,
                    children: None,
                })
            }
        }
        let root_cut = learners[LocIdx::from(0)].root_cut();
        let inner = Node::internal(data.attrs.cat.clone(), scaled(root_cut), leaves);
        Node::internal(data.attrs.cat.clone(), 0, vec![inner])
    }

    /// Boolean lowering of the trained threshold functions, one subtree per
    /// location.
    ///
    /// The learners were trained on inverted samples, so the residual
    /// threshold starts at `Σw − θ`: the produced tree accepts an
    /// original-space point iff its inverted features stay under the
    /// learner's threshold.
    pub fn of_ltf_bool<L: Ltf>(data: &Data, learners: &LocMap<L>) -> Node {
        let mut children = Vec::with_capacity(learners.len());
        for (loc, learner) in learners.index_iter() {
            let (lo, _) = data.intervals[loc];
            let weights = learner.feature_weights();
            let total: f64 = weights.iter().sum();
            let mut live: BTreeSet<usize> = (0..weights.len()).collect();
            children.push(lower(data, lo, weights, &mut live, total - learner.theta()))
        }
        Node::internal(data.attrs.cat.clone(), 0, children)
    }

    /// Number of leaves, for the adaptive output mode.
    pub fn leaves(&self) -> usize {
        match &self.children {
            None => 1,
            Some(children) => children.iter().map(Node::leaves).sum(),
        }
    }

    /// Serializes the tree in the verifier's JSON format.
    pub fn write<W: Write>(&self, w: &mut W) -> Res<()> {
        ::serde_json::to_writer(w, self)?;
        Ok(())
    }
}

/// Weight scaling used by the JSON output.
fn scaled(weight: f64) -> i64 {
    (weight * 1000.) as i64
}

/// Recursive threshold lowering over the live attribute set.
///
/// Accepts exactly the inputs with `Σ_{j ∈ live} w_j x_j ≥ threshold`,
/// branching on the heaviest live attribute (lowest index on ties). Branches
/// prune to a leaf as soon as the residual threshold is reached (`true`) or
/// out of reach (`false`).
fn lower(
    data: &Data,
    lo: PrdIdx,
    weights: &[f64],
    live: &mut BTreeSet<usize>,
    threshold: f64,
) -> Node {
    if threshold <= 0. {
        return Node::leaf(true);
    }
    let mut sum = 0.;
    let mut best: Option<usize> = None;
    for &off in live.iter() {
        sum += weights[off];
        if best.map_or(true, |b| weights[off] > weights[b]) {
            best = Some(off)
        }
    }
    if sum > threshold {
        let best = best.expect("the sum is positive, so some attribute is live");
        live.remove(&best);
        let if_false = lower(data, lo, weights, live, threshold);
        let if_true = lower(data, lo, weights, live, threshold - weights[best]);
        live.insert(best);
        Node::internal(
            data.attrs.name(PrdIdx::from(lo.get() + best)).into(),
            0,
            vec![if_false, if_true],
        )
    } else {
        Node::leaf(false)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::learning::threshold::Winnow;
    use crate::tests::{conj_of, dataset};

    /// Evaluates a lowered location subtree on a local feature vector.
    ///
    /// Attribute names are the `p<idx>` names produced by the test data
    /// builder.
    fn accepts(node: &Node, bits: &[bool]) -> bool {
        match &node.children {
            None => node.classification,
            Some(children) => {
                let off: usize = node.attribute[1..].parse().expect("test attribute name");
                let child = if bits[off] { &children[1] } else { &children[0] };
                accepts(child, bits)
            }
        }
    }

    #[test]
    fn hyp_tree_chains_the_conjunction() {
        let data = dataset(4, &[(0, 3)], &[], &[]);
        let hyp: Hyp = vec![conj_of(&[0, 2])].into_iter().collect();
        let tree = Node::of_hyp(&data, &hyp);

        assert_eq!(tree.attribute, "$func");
        let children = tree.children.as_ref().expect("category split");
        assert_eq!(children.len(), 1);
        // p0 then p2 then accept, rejecting on every false branch.
        let chain = &children[0];
        assert_eq!(chain.attribute, "p0");
        let kids = chain.children.as_ref().expect("internal node");
        assert!(!kids[0].classification);
        assert_eq!(kids[1].attribute, "p2");
        assert_eq!(tree.leaves(), 3);
        for bits in &[[true, false, true, false], [true, true, true, true]] {
            assert!(accepts(chain, bits))
        }
        for bits in &[[false, false, true, false], [true, false, false, true]] {
            assert!(!accepts(chain, bits))
        }
    }

    #[test]
    fn empty_conjunction_is_the_true_leaf() {
        let data = dataset(2, &[(0, 1)], &[], &[]);
        let hyp: Hyp = vec![conj_of(&[])].into_iter().collect();
        let tree = Node::of_hyp(&data, &hyp);
        let children = tree.children.as_ref().expect("category split");
        assert!(children[0].children.is_none());
        assert!(children[0].classification);
    }

    #[test]
    fn lowering_agrees_with_the_sum() {
        let data = dataset(3, &[(0, 2)], &[], &[]);
        let weights = [3., 1., 2.];
        for &threshold in &[0.5, 1.5, 2.5, 3.5, 4.5, 5.5, 6.5] {
            let mut live: BTreeSet<usize> = (0..3).collect();
            let tree = lower(&data, PrdIdx::from(0), &weights, &mut live, threshold);
            for input in 0..8usize {
                let bits = [input & 1 != 0, input & 2 != 0, input & 4 != 0];
                let sum: f64 = weights
                    .iter()
                    .zip(bits.iter())
                    .filter(|(_, bit)| **bit)
                    .map(|(weight, _)| *weight)
                    .sum();
                assert_eq!(
                    accepts(&tree, &bits),
                    sum >= threshold,
                    "threshold {} input {:?}",
                    threshold,
                    bits
                );
            }
        }
    }

    #[test]
    fn lowering_prunes_to_leaves() {
        let data = dataset(2, &[(0, 1)], &[], &[]);
        let weights = [1., 1.];
        // Unreachable threshold: a single `false` leaf.
        let mut live: BTreeSet<usize> = (0..2).collect();
        let tree = lower(&data, PrdIdx::from(0), &weights, &mut live, 5.);
        assert!(tree.children.is_none());
        assert!(!tree.classification);
        // Trivial threshold: a single `true` leaf.
        let mut live: BTreeSet<usize> = (0..2).collect();
        let tree = lower(&data, PrdIdx::from(0), &weights, &mut live, 0.);
        assert!(tree.children.is_none());
        assert!(tree.classification);
    }

    #[test]
    fn ltf_dump_scales_by_a_thousand() {
        let data = dataset(2, &[(0, 1)], &[], &[]);
        let learners: LocMap<Winnow> = vec![Winnow::new(2)].into_iter().collect();
        let tree = Node::of_ltf(&data, &learners);
        let inner = &tree.children.as_ref().expect("dummy root")[0];
        assert_eq!(inner.cut, 441);
        let leaves = inner.children.as_ref().expect("weight leaves");
        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[0].cut, 800);
        assert_eq!(leaves[0].attribute, "p0");
    }

    #[test]
    fn serialization_is_the_wire_format() {
        let mut buff = vec![];
        Node::leaf(true).write(&mut buff).expect("vec write");
        assert_eq!(
            String::from_utf8(buff).expect("json is utf8"),
            r#"{"attribute":"","cut":0,"classification":true,"children":null}"#
        );
    }
}
