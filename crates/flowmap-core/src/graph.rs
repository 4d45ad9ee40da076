//! Content graph: the static decision-tree dataset.
//!
//! Nodes are either questions (with ordered answer options pointing at the
//! next node) or results (with the candidate materials). The graph is
//! consumed read-only; a missing or unresolved `next` is a valid terminal
//! state that navigation reports as a load failure.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use flowmap_types::error::{FlowError, Result};
use flowmap_types::text::LocalizedText;

/// Key of a node in the content graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A node definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Question(Question),
    Result(Outcome),
}

/// A question with ordered answer options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default)]
    pub title: Option<LocalizedText>,
    #[serde(default)]
    pub text: Option<LocalizedText>,
    #[serde(default)]
    pub description: Option<LocalizedText>,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
}

/// A terminal node listing candidate materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(default)]
    pub title: Option<LocalizedText>,
    #[serde(default)]
    pub description: Option<LocalizedText>,
    #[serde(default)]
    pub materials: Vec<Material>,
}

/// One answer to a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub label: LocalizedText,
    #[serde(default)]
    pub note: Option<LocalizedText>,
    #[serde(default)]
    pub next: Option<NodeId>,
}

/// A candidate material with its burn-test traits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: LocalizedText,
    #[serde(default)]
    pub flame: Option<LocalizedText>,
    #[serde(default)]
    pub odour: Option<LocalizedText>,
    #[serde(default)]
    pub speed: Option<LocalizedText>,
    #[serde(default)]
    pub other: Option<LocalizedText>,
}

impl Node {
    pub fn title(&self) -> Option<&LocalizedText> {
        match self {
            Node::Question(q) => q.title.as_ref(),
            Node::Result(r) => r.title.as_ref(),
        }
    }

    pub fn as_question(&self) -> Option<&Question> {
        match self {
            Node::Question(q) => Some(q),
            Node::Result(_) => None,
        }
    }

    pub fn as_result(&self) -> Option<&Outcome> {
        match self {
            Node::Result(r) => Some(r),
            Node::Question(_) => None,
        }
    }

    pub fn is_result(&self) -> bool {
        matches!(self, Node::Result(_))
    }

    /// Number of answer options (zero for results).
    pub fn option_count(&self) -> usize {
        self.as_question().map_or(0, |q| q.options.len())
    }
}

/// Read-only lookup into the decision tree.
pub trait ContentGraph {
    /// Look up a node; `None` means no such node.
    fn get(&self, id: &NodeId) -> Option<&Node>;

    fn contains(&self, id: &NodeId) -> bool {
        self.get(id).is_some()
    }
}

/// An option whose `next` is missing or does not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub node: NodeId,
    pub option_index: usize,
    pub target: Option<NodeId>,
}

/// In-memory content graph deserialized from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
    nodes: HashMap<NodeId, Node>,
}

impl ContentGraph for FlowGraph {
    fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a node.
    pub fn insert(&mut self, id: impl Into<NodeId>, node: Node) {
        self.nodes.insert(id.into(), node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parse a dataset and check it can be entered at `start`.
    ///
    /// Dangling option targets are logged but do not fail the load.
    pub fn from_json(source: &str, start: &NodeId) -> Result<Self> {
        let graph: FlowGraph = serde_json::from_str(source)?;
        if !graph.contains(start) {
            return Err(FlowError::Graph(format!("start node '{start}' not found")));
        }
        for dangling in graph.dangling_references() {
            match &dangling.target {
                Some(target) => log::warn!(
                    "Option {} of '{}' points at unknown node '{target}'",
                    dangling.option_index,
                    dangling.node
                ),
                None => log::warn!(
                    "Option {} of '{}' has no next node",
                    dangling.option_index,
                    dangling.node
                ),
            }
        }
        log::info!("Loaded decision tree with {} nodes", graph.len());
        Ok(graph)
    }

    /// Read a dataset from a JSON file.
    pub fn load(path: &Path, start: &NodeId) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source, start)
    }

    /// All options whose target is missing or unresolved, sorted by node id
    /// then option index.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut out: Vec<DanglingReference> = self
            .nodes
            .iter()
            .filter_map(|(id, node)| node.as_question().map(|q| (id, q)))
            .flat_map(|(id, q)| {
                q.options.iter().enumerate().filter_map(move |(i, opt)| {
                    let resolves = opt.next.as_ref().is_some_and(|n| self.contains(n));
                    (!resolves).then(|| DanglingReference {
                        node: id.clone(),
                        option_index: i,
                        target: opt.next.clone(),
                    })
                })
            })
            .collect();
        out.sort_by(|a, b| (&a.node, a.option_index).cmp(&(&b.node, b.option_index)));
        out
    }
}
