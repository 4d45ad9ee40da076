//! Navigation engine: the path of answered steps through the decision tree,
//! the expanded material on a result step, and the pending viewport focus.

use flowmap_types::error::FlowError;

use crate::graph::{ContentGraph, Node, NodeId};

/// One visited node and the option chosen there, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub node_id: NodeId,
    /// `None` marks the unanswered frontier. Only the last step may be `None`.
    pub option_index: Option<usize>,
}

impl Step {
    pub fn frontier(node_id: NodeId) -> Self {
        Self {
            node_id,
            option_index: None,
        }
    }
}

/// The material whose detail card is expanded on a result step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedMaterial {
    pub node_id: NodeId,
    pub material_index: usize,
}

/// Why a `choose_option` call was rejected. The path is never mutated when
/// one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavError {
    #[error("step {index} is out of range (path length {len})")]
    StepOutOfRange { index: usize, len: usize },

    #[error("step {index} ('{node}') is not a question")]
    NotAQuestion { index: usize, node: NodeId },

    #[error("option {option} is out of range for '{node}' ({count} options)")]
    OptionOutOfRange {
        node: NodeId,
        option: usize,
        count: usize,
    },
}

impl From<NavError> for FlowError {
    fn from(e: NavError) -> Self {
        FlowError::Navigation(e.to_string())
    }
}

/// Outcome of an accepted `choose_option` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// A new frontier step was appended at `index`.
    Advanced { index: usize },
    /// The option's target is missing or does not resolve. The path ends at
    /// the answered step; the user can pick a different option. A focus
    /// queued for a step that survived the truncation stays queued.
    LoadFailed { target: Option<NodeId> },
}

/// Owner of the navigation path.
#[derive(Debug, Clone)]
pub struct Navigator {
    start: NodeId,
    steps: Vec<Step>,
    selected: Option<SelectedMaterial>,
    pending_focus: Option<usize>,
}

impl Navigator {
    /// A fresh path at `start`. The start node is the first focus target.
    pub fn new(start: NodeId) -> Self {
        Self {
            steps: vec![Step::frontier(start.clone())],
            start,
            selected: None,
            pending_focus: Some(0),
        }
    }

    pub fn start(&self) -> &NodeId {
        &self.start
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The frontier step. The path is never empty.
    pub fn current(&self) -> &Step {
        &self.steps[self.steps.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn selected_material(&self) -> Option<&SelectedMaterial> {
        self.selected.as_ref()
    }

    pub fn can_go_back(&self) -> bool {
        self.steps.len() > 1
    }

    /// Step index the viewport should center next, consumed by the caller.
    pub fn take_pending_focus(&mut self) -> Option<usize> {
        self.pending_focus.take()
    }

    pub fn pending_focus(&self) -> Option<usize> {
        self.pending_focus
    }

    /// Answer the question at `step_index`, discarding every later step.
    pub fn choose_option(
        &mut self,
        graph: &impl ContentGraph,
        step_index: usize,
        option_index: usize,
    ) -> Result<Choice, NavError> {
        let len = self.steps.len();
        let step = self.steps.get(step_index).ok_or(NavError::StepOutOfRange {
            index: step_index,
            len,
        })?;
        let question = graph
            .get(&step.node_id)
            .and_then(Node::as_question)
            .ok_or_else(|| NavError::NotAQuestion {
                index: step_index,
                node: step.node_id.clone(),
            })?;
        let option = question
            .options
            .get(option_index)
            .ok_or_else(|| NavError::OptionOutOfRange {
                node: step.node_id.clone(),
                option: option_index,
                count: question.options.len(),
            })?;
        let target = option.next.clone();

        self.steps.truncate(step_index + 1);
        self.steps[step_index].option_index = Some(option_index);
        self.selected = None;
        self.pending_focus = self.pending_focus.filter(|&i| i <= step_index);

        match target {
            Some(next) if graph.contains(&next) => {
                log::debug!("Step {step_index}: option {option_index} -> '{next}'");
                self.steps.push(Step::frontier(next));
                let index = self.steps.len() - 1;
                self.pending_focus = Some(index);
                Ok(Choice::Advanced { index })
            },
            target => {
                log::warn!(
                    "Step {step_index}: option {option_index} leads to unknown node {:?}",
                    target.as_ref().map(NodeId::as_str)
                );
                Ok(Choice::LoadFailed { target })
            },
        }
    }

    /// Drop the frontier step and reopen the question before it.
    /// Returns `false` (and changes nothing) at the start node.
    pub fn go_back(&mut self, graph: &impl ContentGraph) -> bool {
        if self.steps.len() <= 1 {
            return false;
        }
        self.steps.pop();
        self.selected = None;
        let index = self.steps.len() - 1;
        let last = &mut self.steps[index];
        if graph.get(&last.node_id).is_some_and(|n| n.as_question().is_some()) {
            last.option_index = None;
        }
        self.pending_focus = Some(index);
        log::debug!("Back to step {index} ('{}')", last.node_id);
        true
    }

    /// Return to a single unanswered start step.
    pub fn reset(&mut self) {
        self.steps.clear();
        self.steps.push(Step::frontier(self.start.clone()));
        self.selected = None;
        self.pending_focus = None;
    }

    /// Toggle the expanded material: selecting the active one collapses it.
    /// Validity is not checked here; see [`validate_selection`].
    pub fn select_material(&mut self, node_id: NodeId, material_index: usize) {
        let candidate = SelectedMaterial {
            node_id,
            material_index,
        };
        if self.selected.as_ref() == Some(&candidate) {
            self.selected = None;
        } else {
            self.selected = Some(candidate);
        }
    }

    /// Drop the selected material if it no longer refers to a material of a
    /// result step on the path. Run before every render.
    pub fn revalidate(&mut self, graph: &impl ContentGraph) {
        if let Some(selection) = self.selected.take() {
            self.selected = validate_selection(selection, &self.steps, graph);
        }
    }
}

/// Keep `selection` only if a step on `steps` shows that node, the node is a
/// result, and it has a material at that index.
pub fn validate_selection(
    selection: SelectedMaterial,
    steps: &[Step],
    graph: &impl ContentGraph,
) -> Option<SelectedMaterial> {
    let step = steps.iter().find(|s| s.node_id == selection.node_id)?;
    let outcome = graph.get(&step.node_id)?.as_result()?;
    (selection.material_index < outcome.materials.len()).then_some(selection)
}

/// Whether every step before the frontier is an answered question whose
/// chosen option leads to the following step.
pub fn path_is_consistent(steps: &[Step], graph: &impl ContentGraph) -> bool {
    if steps.is_empty() {
        return false;
    }
    steps.windows(2).all(|pair| {
        let (step, next) = (&pair[0], &pair[1]);
        let Some(index) = step.option_index else {
            return false;
        };
        graph
            .get(&step.node_id)
            .and_then(Node::as_question)
            .and_then(|q| q.options.get(index))
            .and_then(|opt| opt.next.as_ref())
            .is_some_and(|target| *target == next.node_id && graph.contains(target))
    })
}
