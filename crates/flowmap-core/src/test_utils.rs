//! Shared test fixtures for flowmap-core tests.
//!
//! Provides a small in-memory decision tree covering questions with one,
//! two and several options, results with and without materials, and
//! options whose target is missing or dangling.

use flowmap_types::text::LocalizedText;

use crate::graph::{AnswerOption, FlowGraph, Material, Node, NodeId, Outcome, Question};

fn text(ru: &str, en: &str) -> LocalizedText {
    LocalizedText::localized([("ru", ru), ("en", en)])
}

pub fn option(label: &str, next: Option<&str>) -> AnswerOption {
    AnswerOption {
        label: LocalizedText::from(label),
        note: None,
        next: next.map(NodeId::from),
    }
}

pub fn question(title: &str, options: Vec<AnswerOption>) -> Node {
    Node::Question(Question {
        title: Some(LocalizedText::from(title)),
        text: Some(text("Вопрос?", "Question?")),
        description: None,
        options,
    })
}

pub fn material(name: &str) -> Material {
    Material {
        name: LocalizedText::from(name),
        flame: Some(text("синее", "blue")),
        odour: Some(text("парафин", "paraffin")),
        speed: Some(text("медленно", "slow")),
        other: None,
    }
}

pub fn result(title: &str, materials: Vec<Material>) -> Node {
    Node::Result(Outcome {
        title: Some(LocalizedText::from(title)),
        description: None,
        materials,
    })
}

/// ```text
/// start ─┬─ 0 → q2 ─┬─ 0 → res_pe   (2 materials)
///        │          ├─ 1 → res_pp   (1 material)
///        │          └─ 2 → q4 ─┬─ 0 → res_pe
///        │                     └─ 1 → res_pvc
///        ├─ 1 → q3 ── 0 → res_pvc   (1 material)
///        ├─ 2 → ghost               (unresolved)
///        └─ 3 → (none)
/// ```
pub fn sample_graph() -> FlowGraph {
    let mut g = FlowGraph::new();
    g.insert(
        "start",
        question(
            "Start",
            vec![
                option("floats", Some("q2")),
                option("sinks", Some("q3")),
                option("broken", Some("ghost")),
                option("unknown", None),
            ],
        ),
    );
    g.insert(
        "q2",
        question(
            "Flame",
            vec![
                option("blue", Some("res_pe")),
                option("yellow", Some("res_pp")),
                option("smoky", Some("q4")),
            ],
        ),
    );
    g.insert("q3", question("Chlorine", vec![option("green", Some("res_pvc"))]));
    g.insert(
        "q4",
        question(
            "Drips",
            vec![option("yes", Some("res_pe")), option("no", Some("res_pvc"))],
        ),
    );
    g.insert("res_pe", result("Polyethylene", vec![material("LDPE"), material("HDPE")]));
    g.insert("res_pp", result("Polypropylene", vec![material("PP")]));
    g.insert("res_pvc", result("PVC", vec![material("PVC")]));
    g
}
