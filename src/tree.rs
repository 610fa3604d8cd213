//! Decision tree storage.
//!
//! Nodes live in an arena indexed by id; branches hold ids rather than
//! boxed children, so construction in breadth-first order and pruning are
//! plain vector operations. Terminal verdicts are encoded as the literal
//! descriptions [`ALWAYS_YES`] and [`ALWAYS_NO`].

use serde::Serialize;
use std::fmt;

/// Description literal for a node that always classifies as an article.
pub const ALWAYS_YES: &str = "Always Yes";
/// Description literal for a node that never classifies as an article.
pub const ALWAYS_NO: &str = "Always No";

/// Which edge of a node a child hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Yes,
    No,
}

#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    pub id: usize,
    pub description: String,
    yes: Option<usize>,
    no: Option<usize>,
}

impl TreeNode {
    pub fn yes_id(&self) -> Option<usize> {
        self.yes
    }

    pub fn no_id(&self) -> Option<usize> {
        self.no
    }

    pub fn branch(&self, branch: Branch) -> Option<usize> {
        match branch {
            Branch::Yes => self.yes,
            Branch::No => self.no,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.description == ALWAYS_YES || self.description == ALWAYS_NO
    }
}

/// An id-addressed binary decision tree. Node 0 is the root; ids are
/// assigned in attachment order.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    pub fn with_root(description: impl Into<String>) -> DecisionTree {
        DecisionTree {
            nodes: vec![TreeNode {
                id: 0,
                description: description.into(),
                yes: None,
                no: None,
            }],
        }
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: usize) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a node under `parent` on the given branch and returns its id.
    pub fn attach(&mut self, parent: usize, branch: Branch, description: impl Into<String>) -> usize {
        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            id,
            description: description.into(),
            yes: None,
            no: None,
        });
        match branch {
            Branch::Yes => self.nodes[parent].yes = Some(id),
            Branch::No => self.nodes[parent].no = Some(id),
        }
        id
    }

    /// Cuts both branches off every terminal node. Children attached below
    /// a terminal stay in the arena but become unreachable from the root.
    pub fn prune_terminals(&mut self) {
        for node in &mut self.nodes {
            if node.description == ALWAYS_YES || node.description == ALWAYS_NO {
                node.yes = None;
                node.no = None;
            }
        }
    }

    fn write_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        id: usize,
        crumb: &str,
        depth: usize,
    ) -> fmt::Result {
        let node = match self.node(id) {
            Some(node) => node,
            None => return Ok(()),
        };
        writeln!(
            f,
            "{:indent$}{crumb} ({id}) {}",
            "",
            node.description,
            indent = depth * 2
        )?;
        if let Some(yes) = node.yes {
            self.write_node(f, yes, &format!("{crumb}.1"), depth + 1)?;
        }
        if let Some(no) = node.no {
            self.write_node(f, no, &format!("{crumb}.2"), depth + 1)?;
        }
        Ok(())
    }
}

/// One line per reachable node: breadcrumb (yes = `.1`, no = `.2`), id,
/// description, indented by depth.
impl fmt::Display for DecisionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, 0, "1", 0)
    }
}
