//! Progress track and route log derived from the navigation path.

use flowmap_types::text::{Lang, resolve_opt};

use crate::graph::{ContentGraph, Node};
use crate::nav::Step;
use crate::strings::{Strings, TextKey};

/// Display status of a step on the map and the progress track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Answered and left behind.
    Complete,
    /// The frontier question.
    Current,
    /// The frontier is a result.
    Result,
}

impl StepStatus {
    pub fn of(index: usize, len: usize, node: &Node) -> Self {
        if index + 1 < len {
            StepStatus::Complete
        } else if node.is_result() {
            StepStatus::Result
        } else {
            StepStatus::Current
        }
    }
}

/// Node title, or `"<step label> <n>"` when untitled.
pub fn step_title(node: &Node, index: usize, strings: &Strings, lang: Lang) -> String {
    let title = resolve_opt(node.title(), lang);
    if title.is_empty() {
        strings.step_label(index + 1, lang)
    } else {
        title.to_string()
    }
}

/// One dot on the progress track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressMarker {
    pub step_index: usize,
    pub number: usize,
    pub status: StepStatus,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub markers: Vec<ProgressMarker>,
    /// `"<legend>: <path length>"`.
    pub legend: String,
}

/// Progress track for `steps`. Steps whose node does not resolve get no marker.
pub fn progress(
    steps: &[Step],
    graph: &impl ContentGraph,
    strings: &Strings,
    lang: Lang,
) -> Progress {
    let markers = steps
        .iter()
        .enumerate()
        .filter_map(|(index, step)| {
            let node = graph.get(&step.node_id)?;
            Some(ProgressMarker {
                step_index: index,
                number: index + 1,
                status: StepStatus::of(index, steps.len(), node),
                title: step_title(node, index, strings, lang),
            })
        })
        .collect();
    Progress {
        markers,
        legend: format!("{}: {}", strings.text(TextKey::ProgressLegend, lang), steps.len()),
    }
}

/// A question and the answer given to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub step_index: usize,
    pub question: String,
    pub answer: String,
    /// The most recently answered question.
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteLog {
    pub title: String,
    pub entries: Vec<RouteEntry>,
    /// Shown instead of entries when nothing has been answered.
    pub placeholder: Option<String>,
}

fn is_answered_question(step: &Step, graph: &impl ContentGraph) -> bool {
    step.option_index.is_some()
        && graph
            .get(&step.node_id)
            .is_some_and(|n| n.as_question().is_some())
}

/// Index of the route line to highlight: the last step when it is an
/// answered question, otherwise the latest answered question.
pub fn active_route_index(steps: &[Step], graph: &impl ContentGraph) -> Option<usize> {
    steps.iter().rposition(|s| is_answered_question(s, graph))
}

/// The "path taken" log.
pub fn route_log(
    steps: &[Step],
    graph: &impl ContentGraph,
    strings: &Strings,
    lang: Lang,
) -> RouteLog {
    let active = active_route_index(steps, graph);
    let answer_label = strings.text(TextKey::AnswerLabel, lang);
    let mut entries = Vec::new();
    for (index, step) in steps.iter().enumerate() {
        let Some(question) = graph.get(&step.node_id).and_then(Node::as_question) else {
            continue;
        };
        let Some(option) = step.option_index.and_then(|i| question.options.get(i)) else {
            continue;
        };

        let title = resolve_opt(question.title.as_ref(), lang);
        let text = resolve_opt(question.text.as_ref(), lang);
        let mut parts = Vec::with_capacity(2);
        if !title.is_empty() {
            parts.push(format!("[{}] {title}:", index + 1));
        }
        if !text.is_empty() {
            parts.push(text.to_string());
        }
        if parts.is_empty() {
            parts.push(format!("[{}] {}", index + 1, strings.text(TextKey::StepLabel, lang)));
        }

        entries.push(RouteEntry {
            step_index: index,
            question: parts.join(" "),
            answer: format!("{answer_label} {}", option.label.resolve(lang)),
            active: active == Some(index),
        });
    }
    let placeholder = entries
        .is_empty()
        .then(|| strings.text(TextKey::SidePanelEmpty, lang).to_string());
    RouteLog {
        title: strings.text(TextKey::SidePanelTitle, lang).to_string(),
        entries,
        placeholder,
    }
}
