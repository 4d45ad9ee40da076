//! Plain-text rendering of a scene.

use flowmap_core::View;
use flowmap_core::route::StepStatus;
use flowmap_core::scene::{LanguageSelector, NodeBody, OptionState, Scene};

fn status_mark(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Complete => "x",
        StepStatus::Current => ">",
        StepStatus::Result => "*",
    }
}

fn option_mark(state: OptionState) -> &'static str {
    match state {
        OptionState::Open => "( )",
        OptionState::Selected => "(o)",
        OptionState::Faded => " - ",
    }
}

/// `"<label>: ru [en]"` with the active language bracketed.
fn language_line(selector: &LanguageSelector) -> String {
    let codes: Vec<String> = selector
        .languages
        .iter()
        .map(|&lang| {
            if lang == selector.active {
                format!("[{lang}]")
            } else {
                lang.to_string()
            }
        })
        .collect();
    format!("{}: {}", selector.label, codes.join(" "))
}

/// One line describing the current pan and zoom.
pub fn view_line(view: View) -> String {
    format!(
        "view: pan ({:.1}, {:.1}) zoom {:.0}%",
        view.pan.x,
        view.pan.y,
        view.scale * 100.0
    )
}

/// The whole map as text lines.
pub fn scene_lines(scene: &Scene, view: View) -> Vec<String> {
    let mut out = Vec::new();
    out.push(format!("== {} [{}] ==", scene.page_title, scene.lang));

    let track: Vec<String> = scene
        .progress
        .markers
        .iter()
        .map(|m| format!("{}{}", status_mark(m.status), m.number))
        .collect();
    out.push(format!("{}  {}", scene.progress.legend, track.join(" ")));

    for node in &scene.nodes {
        out.push(String::new());
        out.push(format!(
            "[{}] {} {}  @({:.0}, {:.0})",
            node.number,
            status_mark(node.status),
            node.title,
            node.position.x,
            node.position.y
        ));
        match &node.body {
            NodeBody::Question {
                text,
                description,
                options,
            } => {
                if !text.is_empty() {
                    out.push(format!("    {text}"));
                }
                if let Some(d) = description {
                    out.push(format!("    {d}"));
                }
                for o in options {
                    let mark = option_mark(o.state);
                    let mut line = format!("    {mark} {}. {}", o.index + 1, o.label);
                    if let Some(note) = &o.note {
                        line.push_str(&format!(" ({note})"));
                    }
                    out.push(line);
                }
            },
            NodeBody::Result {
                badge,
                description,
                materials,
                detail,
                prompt,
            } => {
                out.push(format!("    <{badge}>"));
                if let Some(d) = description {
                    out.push(format!("    {d}"));
                }
                for m in materials {
                    let mark = if m.active { "[#]" } else { "[ ]" };
                    out.push(format!("    {mark} {}. {}", m.index + 1, m.name));
                }
                if let Some(card) = detail {
                    out.push(format!("      {}", card.name));
                    for p in &card.properties {
                        out.push(format!("        {} {}", p.label, p.value));
                    }
                }
                if let Some(p) = prompt {
                    out.push(format!("    {p}"));
                }
            },
        }
    }

    if scene.panel.expanded {
        out.push(String::new());
        out.push(format!("# {}", scene.route.title));
        if let Some(p) = &scene.route.placeholder {
            out.push(format!("$ {p}"));
        }
        for entry in &scene.route.entries {
            let mark = if entry.active { "*" } else { " " };
            out.push(format!("{mark}$ {}", entry.question));
            out.push(format!("{mark}  -> {}", entry.answer));
        }
    }

    out.push(String::new());
    let back = if scene.can_go_back {
        scene.back_label.clone()
    } else {
        format!("({})", scene.back_label)
    };
    out.push(format!(
        "{back} | {} | [{}] {}",
        scene.reset_label, scene.panel.label, scene.panel.action
    ));
    out.push(language_line(&scene.language_selector));
    out.push(view_line(view));
    out
}
