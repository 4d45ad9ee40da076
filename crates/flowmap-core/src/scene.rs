//! Presentation-neutral snapshot of the map.
//!
//! [`build_scene`] turns the navigation path into everything a renderer
//! draws: node cards at their canvas positions, option and material states,
//! connection curves, the progress track, the route log and the page chrome
//! around the map. It reads state only; selection revalidation and focus
//! happen in the session.

use flowmap_types::config::LayoutConfig;
use flowmap_types::geometry::Point;
use flowmap_types::text::{Lang, resolve_opt};

use crate::graph::{ContentGraph, Material, Node, NodeId, Outcome, Question};
use crate::layout::{self, Connection};
use crate::nav::{SelectedMaterial, Step};
use crate::route::{self, Progress, RouteLog, StepStatus};
use crate::strings::{Strings, TextKey};

/// How an answer option is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionState {
    /// Step not answered yet.
    Open,
    /// The chosen option.
    Selected,
    /// Another option was chosen.
    Faded,
}

impl OptionState {
    pub fn of(chosen: Option<usize>, index: usize) -> Self {
        match chosen {
            None => OptionState::Open,
            Some(c) if c == index => OptionState::Selected,
            Some(_) => OptionState::Faded,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionView {
    pub index: usize,
    pub label: String,
    pub note: Option<String>,
    pub state: OptionState,
    /// Tooltip: pick a direction on the frontier, rebuild the branch elsewhere.
    pub hint: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialChip {
    pub index: usize,
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialProperty {
    pub label: String,
    pub value: String,
}

/// Expanded detail card of the selected material.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialCard {
    pub name: String,
    pub properties: Vec<MaterialProperty>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeBody {
    Question {
        text: String,
        description: Option<String>,
        options: Vec<OptionView>,
    },
    Result {
        badge: String,
        description: Option<String>,
        materials: Vec<MaterialChip>,
        detail: Option<MaterialCard>,
        /// Shown when no card is expanded.
        prompt: Option<String>,
    },
}

/// One node card.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    pub step_index: usize,
    pub number: usize,
    pub node_id: NodeId,
    /// Top-left corner in canvas coordinates.
    pub position: Point,
    pub status: StepStatus,
    pub title: String,
    pub body: NodeBody,
}

/// The button that shows or hides the route panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelToggle {
    pub label: String,
    pub expanded: bool,
    /// Accessible description of what pressing the toggle does now.
    pub action: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageSelector {
    pub label: String,
    pub languages: Vec<Lang>,
    pub active: Lang,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub lang: Lang,
    pub page_title: String,
    pub heading: String,
    pub lead: String,
    pub nodes: Vec<NodeView>,
    pub connections: Vec<Connection>,
    pub progress: Progress,
    pub route: RouteLog,
    pub can_go_back: bool,
    pub back_label: String,
    pub reset_label: String,
    pub language_selector: LanguageSelector,
    pub panel: PanelToggle,
}

impl Scene {
    /// Card for a step, if its node resolved.
    pub fn node(&self, step_index: usize) -> Option<&NodeView> {
        self.nodes.iter().find(|n| n.step_index == step_index)
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn question_body(
    question: &Question,
    chosen: Option<usize>,
    is_frontier: bool,
    strings: &Strings,
    lang: Lang,
) -> NodeBody {
    let hint = if is_frontier {
        strings.text(TextKey::OptionCurrent, lang)
    } else {
        strings.text(TextKey::BranchHint, lang)
    };
    let options = question
        .options
        .iter()
        .enumerate()
        .map(|(index, option)| OptionView {
            index,
            label: option.label.resolve(lang).to_string(),
            note: non_empty(resolve_opt(option.note.as_ref(), lang)),
            state: OptionState::of(chosen, index),
            hint: hint.to_string(),
        })
        .collect();
    NodeBody::Question {
        text: resolve_opt(question.text.as_ref(), lang).to_string(),
        description: non_empty(resolve_opt(question.description.as_ref(), lang)),
        options,
    }
}

fn material_card(material: &Material, strings: &Strings, lang: Lang) -> MaterialCard {
    let fields = [
        (TextKey::FlameLabel, material.flame.as_ref()),
        (TextKey::OdourLabel, material.odour.as_ref()),
        (TextKey::SpeedLabel, material.speed.as_ref()),
        (TextKey::OtherLabel, material.other.as_ref()),
    ];
    MaterialCard {
        name: material.name.resolve(lang).to_string(),
        properties: fields
            .into_iter()
            .map(|(key, value)| MaterialProperty {
                label: strings.text(key, lang).to_string(),
                value: resolve_opt(value, lang).to_string(),
            })
            .collect(),
    }
}

fn result_body(
    outcome: &Outcome,
    node_id: &NodeId,
    selected: Option<&SelectedMaterial>,
    strings: &Strings,
    lang: Lang,
) -> NodeBody {
    let active = selected
        .filter(|s| s.node_id == *node_id)
        .map(|s| s.material_index);
    let materials = outcome
        .materials
        .iter()
        .enumerate()
        .map(|(index, m)| MaterialChip {
            index,
            name: m.name.resolve(lang).to_string(),
            active: active == Some(index),
        })
        .collect();
    let detail = active
        .and_then(|i| outcome.materials.get(i))
        .map(|m| material_card(m, strings, lang));
    let prompt = detail
        .is_none()
        .then(|| strings.text(TextKey::ResultSelectPrompt, lang).to_string());
    NodeBody::Result {
        badge: strings.text(TextKey::ResultBadge, lang).to_string(),
        description: non_empty(resolve_opt(outcome.description.as_ref(), lang)),
        materials,
        detail,
        prompt,
    }
}

fn panel_toggle(expanded: bool, strings: &Strings, lang: Lang) -> PanelToggle {
    let action = if expanded {
        TextKey::PanelToggleHide
    } else {
        TextKey::PanelToggleShow
    };
    PanelToggle {
        label: strings.text(TextKey::PanelToggleLabel, lang).to_string(),
        expanded,
        action: strings.text(action, lang).to_string(),
    }
}

/// Build the scene for a path. Steps whose node does not resolve are skipped
/// but still occupy their layout slot.
pub fn build_scene(
    steps: &[Step],
    selected: Option<&SelectedMaterial>,
    graph: &impl ContentGraph,
    config: &LayoutConfig,
    strings: &Strings,
    lang: Lang,
    panel_expanded: bool,
) -> Scene {
    let positions = layout::compute_positions(steps, graph, config);
    let len = steps.len();

    let nodes = steps
        .iter()
        .zip(&positions)
        .enumerate()
        .filter_map(|(index, (step, &position))| {
            let node = graph.get(&step.node_id)?;
            let body = match node {
                Node::Question(q) => {
                    question_body(q, step.option_index, index + 1 == len, strings, lang)
                },
                Node::Result(r) => result_body(r, &step.node_id, selected, strings, lang),
            };
            Some(NodeView {
                step_index: index,
                number: index + 1,
                node_id: step.node_id.clone(),
                position: layout::canvas_position(position, config),
                status: StepStatus::of(index, len, node),
                title: route::step_title(node, index, strings, lang),
                body,
            })
        })
        .collect();

    Scene {
        lang,
        page_title: strings.text(TextKey::PageTitle, lang).to_string(),
        heading: strings.text(TextKey::Heading, lang).to_string(),
        lead: strings.text(TextKey::Lead, lang).to_string(),
        nodes,
        connections: layout::connections(&positions, config),
        progress: route::progress(steps, graph, strings, lang),
        route: route::route_log(steps, graph, strings, lang),
        can_go_back: len > 1,
        back_label: strings.text(TextKey::Back, lang).to_string(),
        reset_label: strings.text(TextKey::Reset, lang).to_string(),
        language_selector: LanguageSelector {
            label: strings.text(TextKey::LanguageSwitcher, lang).to_string(),
            languages: Lang::ALL.to_vec(),
            active: lang,
        },
        panel: panel_toggle(panel_expanded, strings, lang),
    }
}
