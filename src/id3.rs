//! ID3 tree construction and inference.
//!
//! The feature matrix is feature-major: `features[f][row]`. Labels are
//! aligned with rows. Construction walks breadth-first node positions with
//! a shared counter; each position restricts the full sample by its
//! parent's feature along the edge it hangs from, selects the unused
//! feature with the largest information gain, and encodes the degenerate
//! outcomes as `"Always Yes"` / `"Always No"` terminals.

use std::collections::VecDeque;

use crate::error::{DetectError, Result};
use crate::features::FeatureVector;
use crate::tree::{Branch, DecisionTree, ALWAYS_NO, ALWAYS_YES};

/// Binary entropy of `count` positives in `total`, in bits. Degenerate
/// counts (empty, none, all) carry no information.
pub fn entropy(count: usize, total: usize) -> f64 {
    if total == 0 || count == 0 || count == total {
        return 0.0;
    }
    let p = count as f64 / total as f64;
    let q = 1.0 - p;
    -(p * p.log2() + q * q.log2())
}

/// Information gain of one feature split.
///
/// `actual_yes` of `actual_total` rows carry a positive label;
/// `yes_count`/`no_count` rows of `total` answer the feature yes/no, with
/// `yes_pos`/`no_pos` positive labels in each half.
pub fn gain(
    actual_yes: usize,
    actual_total: usize,
    yes_count: usize,
    no_count: usize,
    total: usize,
    yes_pos: usize,
    no_pos: usize,
) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let yes_weight = yes_count as f64 / total as f64;
    let no_weight = no_count as f64 / total as f64;
    entropy(actual_yes, actual_total)
        - yes_weight * entropy(yes_pos, yes_count)
        - no_weight * entropy(no_pos, no_count)
}

/// Outcome of picking the best feature for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Index of the unused feature with the largest gain.
    Feature(usize),
    /// Some feature split the sample perfectly; it is reported so the
    /// builder can still mark it used.
    AlwaysYes(usize),
    /// Every candidate gain was zero.
    AlwaysNo,
}

/// Picks the unused feature with the largest gain over the given sample
/// rows. Ties go to the lowest index; an exact gain of `1.0` short-circuits
/// into [`Selection::AlwaysYes`].
pub fn select_feature(
    labels: &[bool],
    features: &[Vec<bool>],
    rows: &[usize],
    used: &[bool],
) -> Selection {
    let actual_yes = rows.iter().filter(|&&row| labels[row]).count();
    let total = rows.len();
    let mut best: Option<(usize, f64)> = None;
    for (f, column) in features.iter().enumerate() {
        if used[f] {
            continue;
        }
        let mut yes_count = 0;
        let mut yes_pos = 0;
        let mut no_pos = 0;
        for &row in rows {
            if column[row] {
                yes_count += 1;
                if labels[row] {
                    yes_pos += 1;
                }
            } else if labels[row] {
                no_pos += 1;
            }
        }
        let no_count = total - yes_count;
        let g = gain(actual_yes, total, yes_count, no_count, total, yes_pos, no_pos);
        if g == 1.0 {
            return Selection::AlwaysYes(f);
        }
        let better = match best {
            None => g > 0.0,
            Some((_, best_gain)) => g > best_gain,
        };
        if better {
            best = Some((f, g));
        }
    }
    match best {
        Some((f, _)) => Selection::Feature(f),
        None => Selection::AlwaysNo,
    }
}

/// Builds a decision tree over the full training sample.
///
/// `descriptions` labels the features by index and must parallel
/// `features`. At most one node per feature is created; construction stops
/// once every feature is used or the node positions run out.
pub fn build_tree(labels: &[bool], features: &[Vec<bool>], descriptions: &[&str]) -> DecisionTree {
    let n = features.len();
    let columns = features.first().map(Vec::len).unwrap_or(0);
    let all_rows: Vec<usize> = (0..columns).collect();
    let mut used = vec![false; n];
    let mut used_count = 0;
    // the feature each node tests; terminals test nothing
    let mut node_feature: Vec<Option<usize>> = Vec::new();

    let mut tree = match select_feature(labels, features, &all_rows, &used) {
        Selection::Feature(f) => {
            let f = next_unused(f, &used);
            used[f] = true;
            used_count += 1;
            node_feature.push(Some(f));
            DecisionTree::with_root(descriptions[f])
        }
        Selection::AlwaysYes(f) => {
            used[f] = true;
            used_count += 1;
            node_feature.push(None);
            DecisionTree::with_root(ALWAYS_YES)
        }
        Selection::AlwaysNo => {
            node_feature.push(None);
            DecisionTree::with_root(ALWAYS_NO)
        }
    };

    let mut queue: VecDeque<(usize, Branch)> = VecDeque::new();
    queue.push_back((0, Branch::Yes));
    queue.push_back((0, Branch::No));

    let mut position = 1;
    while used_count < n && position < n {
        let (parent, branch) = match queue.pop_front() {
            Some(edge) => edge,
            None => break,
        };
        let edge_value = branch == Branch::Yes;
        let rows: Vec<usize> = match node_feature[parent] {
            Some(pf) => (0..columns)
                .filter(|&row| features[pf][row] == edge_value)
                .collect(),
            // terminal parents admit no rows; the child collapses to an
            // Always No that pruning removes
            None => Vec::new(),
        };
        let id = match select_feature(labels, features, &rows, &used) {
            Selection::Feature(f) => {
                let f = next_unused(f, &used);
                used[f] = true;
                used_count += 1;
                let id = tree.attach(parent, branch, descriptions[f]);
                node_feature.push(Some(f));
                id
            }
            Selection::AlwaysYes(f) => {
                if !used[f] {
                    used[f] = true;
                    used_count += 1;
                }
                let id = tree.attach(parent, branch, ALWAYS_YES);
                node_feature.push(None);
                id
            }
            Selection::AlwaysNo => {
                let id = tree.attach(parent, branch, ALWAYS_NO);
                node_feature.push(None);
                id
            }
        };
        queue.push_back((id, Branch::Yes));
        queue.push_back((id, Branch::No));
        position += 1;
    }

    tree.prune_terminals();
    tree
}

/// Selection only proposes unused features; the linear advance keeps that
/// invariant if a duplicate ever slips through.
fn next_unused(start: usize, used: &[bool]) -> usize {
    (start..used.len()).find(|&f| !used[f]).unwrap_or(start)
}

/// Runs one feature vector through the tree.
///
/// Descends while both branches exist, then reads the stopping node: a
/// terminal literal answers directly, anything else answers with the
/// vector's value for that node's feature.
pub fn classify(tree: &DecisionTree, vector: &FeatureVector) -> Result<bool> {
    let mut node = tree.root();
    while let (Some(yes), Some(no)) = (node.yes_id(), node.no_id()) {
        let next = if lookup(vector, &node.description)? {
            yes
        } else {
            no
        };
        node = match tree.node(next) {
            Some(next) => next,
            None => break,
        };
    }
    match node.description.as_str() {
        ALWAYS_YES => Ok(true),
        ALWAYS_NO => Ok(false),
        description => lookup(vector, description),
    }
}

/// Fraction of vectors whose classification matches the stored label.
pub fn accuracy(tree: &DecisionTree, vectors: &[FeatureVector], labels: &[bool]) -> Result<f64> {
    if vectors.is_empty() {
        return Ok(0.0);
    }
    let mut correct = 0usize;
    for (vector, label) in vectors.iter().zip(labels) {
        if classify(tree, vector)? == *label {
            correct += 1;
        }
    }
    Ok(correct as f64 / vectors.len() as f64)
}

fn lookup(vector: &FeatureVector, description: &str) -> Result<bool> {
    vector
        .by_description(description)
        .ok_or_else(|| DetectError::UnknownFeature(description.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{Feature, FeatureVector, FEATURE_COUNT};

    fn close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    fn fixture() -> (Vec<bool>, Vec<Vec<bool>>) {
        let labels = vec![
            true, true, false, false, true, false, true, false, false, true,
        ];
        let features = vec![
            vec![false, true, false, false, false, true, true, false, false, true],
            vec![false, false, true, true, false, false, false, false, false, false],
            vec![true, true, false, true, false, true, true, false, true, true],
        ];
        (labels, features)
    }

    fn vector_with(pairs: &[(Feature, bool)]) -> FeatureVector {
        let mut values = [false; FEATURE_COUNT];
        for (feature, value) in pairs {
            values[feature.index()] = *value;
        }
        FeatureVector::new(values)
    }

    #[test]
    fn entropy_known_values() {
        assert_eq!(entropy(5, 10), 1.0);
        assert_eq!(entropy(1, 1), 0.0);
        assert_eq!(entropy(0, 2), 0.0);
        assert_eq!(entropy(0, 0), 0.0);
        close(entropy(3, 4), 0.8113);
        close(entropy(2, 6), 0.9183);
        close(entropy(5, 8), 0.9544);
        close(entropy(4, 7), 0.9852);
        close(entropy(1, 3), 0.9183);
    }

    #[test]
    fn entropy_is_symmetric() {
        for n in 1..=12usize {
            for k in 0..=n {
                assert_eq!(entropy(k, n), entropy(n - k, n));
            }
        }
    }

    #[test]
    fn gain_known_values() {
        close(gain(5, 10, 4, 6, 10, 3, 2), 0.1245);
        close(gain(5, 10, 2, 8, 10, 0, 5), 0.2365);
        close(gain(5, 10, 7, 3, 10, 4, 1), 0.0349);
        assert_eq!(gain(0, 0, 0, 0, 0, 0, 0), 0.0);
    }

    #[test]
    fn selection_prefers_the_cleanest_split() {
        let (labels, features) = fixture();
        let rows: Vec<usize> = (0..labels.len()).collect();
        let used = vec![false; features.len()];
        assert_eq!(
            select_feature(&labels, &features, &rows, &used),
            Selection::Feature(1)
        );
    }

    #[test]
    fn selection_skips_used_features() {
        let (labels, features) = fixture();
        let rows: Vec<usize> = (0..labels.len()).collect();
        let used = vec![false, true, false];
        assert_eq!(
            select_feature(&labels, &features, &rows, &used),
            Selection::Feature(0)
        );
    }

    #[test]
    fn zero_gains_collapse_to_always_no() {
        let (_, features) = fixture();
        let labels = vec![true; 10];
        let rows: Vec<usize> = (0..10).collect();
        let used = vec![false; features.len()];
        assert_eq!(
            select_feature(&labels, &features, &rows, &used),
            Selection::AlwaysNo
        );
        // empty sample behaves the same way
        assert_eq!(
            select_feature(&labels, &features, &[], &used),
            Selection::AlwaysNo
        );
    }

    #[test]
    fn perfect_split_reports_always_yes_with_its_feature() {
        let labels = vec![true, true, false, false];
        let features = vec![
            vec![true, false, true, false],
            vec![true, true, false, false],
        ];
        let rows: Vec<usize> = (0..4).collect();
        let used = vec![false; 2];
        assert_eq!(
            select_feature(&labels, &features, &rows, &used),
            Selection::AlwaysYes(1)
        );
    }

    #[test]
    fn build_places_nodes_breadth_first() {
        let (labels, features) = fixture();
        let descriptions = ["Question 1", "Question 2", "Question 3"];
        let tree = build_tree(&labels, &features, &descriptions);

        // root splits on feature 1; its yes side has only negative labels,
        // its no side still gains from feature 0; feature 3 never fits
        assert_eq!(tree.root().description, "Question 2");
        let yes = tree.node(tree.root().yes_id().unwrap()).unwrap();
        let no = tree.node(tree.root().no_id().unwrap()).unwrap();
        assert_eq!(yes.description, ALWAYS_NO);
        assert_eq!(no.description, "Question 1");
        assert_eq!(tree.len(), 3);
        assert_eq!(
            tree.to_string(),
            "1 (0) Question 2\n  1.1 (1) Always No\n  1.2 (2) Question 1\n"
        );
    }

    #[test]
    fn children_land_at_heap_positions() {
        let labels = vec![true, true, true, true, false, false, false, false];
        let features = vec![
            vec![true, true, true, false, false, false, false, true],
            vec![true, true, false, false, true, false, false, false],
            vec![true, false, true, false, true, false, true, false],
            vec![false, false, true, true, false, true, true, false],
            vec![true, true, true, true, true, false, false, false],
        ];
        let descriptions = [
            "Question 1",
            "Question 2",
            "Question 3",
            "Question 4",
            "Question 5",
        ];
        let tree = build_tree(&labels, &features, &descriptions);

        assert_eq!(tree.len(), 5);
        assert_eq!(tree.root().description, "Question 5");
        assert!(!tree.node(1).unwrap().is_terminal());

        // a yes child lands at 2p + 1 and a no child at 2p + 2, so the node
        // at position i hangs from (i - 1) / 2 or (i - 2) / 2
        for id in 0..tree.len() {
            let node = tree.node(id).unwrap();
            if let Some(yes) = node.yes_id() {
                assert_eq!(yes, 2 * id + 1);
            }
            if let Some(no) = node.no_id() {
                assert_eq!(no, 2 * id + 2);
            }
        }
        assert_eq!(tree.node(3).unwrap().description, "Question 2");
        assert_eq!(tree.node(4).unwrap().description, "Question 3");
    }

    #[test]
    fn uniform_labels_build_a_terminal_root() {
        let (_, features) = fixture();
        let labels = vec![false; 10];
        let descriptions = ["Question 1", "Question 2", "Question 3"];
        let tree = build_tree(&labels, &features, &descriptions);
        assert!(tree.root().is_terminal());
        assert_eq!(tree.root().description, ALWAYS_NO);
        // children built under the terminal root are pruned away
        assert_eq!(tree.to_string(), "1 (0) Always No\n");
    }

    #[test]
    fn perfect_feature_builds_an_always_yes_root() {
        let labels = vec![true, true, false, false];
        let features = vec![vec![true, true, false, false]];
        let tree = build_tree(&labels, &features, &["Only Question"]);
        assert_eq!(tree.root().description, ALWAYS_YES);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn terminal_roots_classify_directly() {
        let vector = vector_with(&[]);
        let yes_tree = DecisionTree::with_root(ALWAYS_YES);
        let no_tree = DecisionTree::with_root(ALWAYS_NO);
        assert!(classify(&yes_tree, &vector).unwrap());
        assert!(!classify(&no_tree, &vector).unwrap());
    }

    #[test]
    fn classification_follows_the_vector() {
        let mut tree = DecisionTree::with_root(Feature::TitleExists.description());
        tree.attach(0, Branch::Yes, ALWAYS_YES);
        tree.attach(0, Branch::No, ALWAYS_NO);

        let article = vector_with(&[(Feature::TitleExists, true)]);
        let other = vector_with(&[(Feature::TitleExists, false)]);
        assert!(classify(&tree, &article).unwrap());
        assert!(!classify(&tree, &other).unwrap());
    }

    #[test]
    fn dangling_internal_node_answers_with_its_own_feature() {
        let tree = DecisionTree::with_root(Feature::LinkHasDate.description());
        let dated = vector_with(&[(Feature::LinkHasDate, true)]);
        let undated = vector_with(&[(Feature::LinkHasDate, false)]);
        assert!(classify(&tree, &dated).unwrap());
        assert!(!classify(&tree, &undated).unwrap());
    }

    #[test]
    fn unknown_descriptions_are_contract_violations() {
        let tree = DecisionTree::with_root("Not A Feature?");
        let err = classify(&tree, &vector_with(&[])).unwrap_err();
        assert!(err.to_string().contains("Not A Feature?"));
    }

    #[test]
    fn accuracy_counts_matches() {
        let mut tree = DecisionTree::with_root(Feature::ContentExists.description());
        tree.attach(0, Branch::Yes, ALWAYS_YES);
        tree.attach(0, Branch::No, ALWAYS_NO);

        let vectors = vec![
            vector_with(&[(Feature::ContentExists, true)]),
            vector_with(&[(Feature::ContentExists, true)]),
            vector_with(&[(Feature::ContentExists, false)]),
            vector_with(&[(Feature::ContentExists, false)]),
        ];
        let labels = vec![true, false, false, true];
        let observed = accuracy(&tree, &vectors, &labels).unwrap();
        assert_eq!(observed, 0.5);
        assert_eq!(accuracy(&tree, &[], &[]).unwrap(), 0.0);
    }
}
