//! Line commands and their execution against a [`FlowMap`].
//!
//! Gesture commands are replayed as pointer and wheel events so they go
//! through the same gesture machine a pointer-driven host would use.

use anyhow::{Context, Result, anyhow, bail};

use flowmap_core::FlowMap;
use flowmap_core::geometry::Point;
use flowmap_core::input::{InputEvent, Modifiers, PointerButton, PointerId, PointerKind, WheelMode};
use flowmap_core::nav::Choice;
use flowmap_core::text::Lang;

/// A parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Choose { step: usize, option: usize },
    Back,
    Reset,
    Material { step: usize, index: usize },
    Lang(Lang),
    Drag { from: Point, to: Point },
    Wheel { dx: f64, dy: f64, mode: WheelMode, zoom: bool },
    Pinch { start: f64, end: f64, center: Point },
    Center,
    Panel,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  choose <step> <option>        answer the question at a step (1-based)
  back                          step back
  reset                         start over
  material <step> <index>       toggle a material card (1-based)
  lang <ru|en>                  switch language
  drag <x1> <y1> <x2> <y2>      drag the map with the mouse
  wheel <dx> <dy> [line|page] [zoom]
                                scroll; with `zoom` acts as ctrl+wheel
  pinch <d1> <d2> <cx> <cy>     two-finger pinch from distance d1 to d2
  center                        reset pan and zoom
  panel                         show or hide the route panel
  show                          print the map
  help                          this text
  quit                          exit";

fn number<T: std::str::FromStr>(args: &[&str], i: usize, what: &str) -> Result<T> {
    let raw = args.get(i).ok_or_else(|| anyhow!("missing {what}"))?;
    raw.parse()
        .map_err(|_| anyhow!("invalid {what}: '{raw}'"))
}

/// Step and option numbers are typed 1-based.
fn index(args: &[&str], i: usize, what: &str) -> Result<usize> {
    let n: usize = number(args, i, what)?;
    n.checked_sub(1)
        .ok_or_else(|| anyhow!("{what} numbers start at 1"))
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let args: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, rest)) = args.split_first() else {
        return Ok(None);
    };
    let cmd = match name {
        "choose" | "c" => Command::Choose {
            step: index(rest, 0, "step")?,
            option: index(rest, 1, "option")?,
        },
        "back" | "b" => Command::Back,
        "reset" => Command::Reset,
        "material" | "m" => Command::Material {
            step: index(rest, 0, "step")?,
            index: index(rest, 1, "material")?,
        },
        "lang" => {
            let code = rest.first().ok_or_else(|| anyhow!("missing language code"))?;
            let lang =
                Lang::from_code(code).ok_or_else(|| anyhow!("unsupported language '{code}'"))?;
            Command::Lang(lang)
        },
        "drag" => Command::Drag {
            from: Point::new(number(rest, 0, "x1")?, number(rest, 1, "y1")?),
            to: Point::new(number(rest, 2, "x2")?, number(rest, 3, "y2")?),
        },
        "wheel" => {
            let mut mode = WheelMode::Pixel;
            let mut zoom = false;
            for flag in rest.iter().skip(2) {
                match *flag {
                    "line" => mode = WheelMode::Line,
                    "page" => mode = WheelMode::Page,
                    "pixel" => mode = WheelMode::Pixel,
                    "zoom" => zoom = true,
                    other => bail!("unknown wheel flag '{other}'"),
                }
            }
            Command::Wheel {
                dx: number(rest, 0, "dx")?,
                dy: number(rest, 1, "dy")?,
                mode,
                zoom,
            }
        },
        "pinch" => Command::Pinch {
            start: number(rest, 0, "start distance")?,
            end: number(rest, 1, "end distance")?,
            center: Point::new(number(rest, 2, "cx")?, number(rest, 3, "cy")?),
        },
        "center" => Command::Center,
        "panel" | "p" => Command::Panel,
        "show" | "s" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => bail!("unknown command '{other}' (try `help`)"),
    };
    Ok(Some(cmd))
}

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The path or language changed; print the map.
    Redraw,
    /// Only the view changed; print the transform.
    ViewChanged,
    /// Print a message.
    Message(String),
    Quit,
}

const MOUSE: PointerId = 1;
const FINGER_A: PointerId = 10;
const FINGER_B: PointerId = 11;

fn touch(id: PointerId, p: Point) -> InputEvent {
    InputEvent::PointerMove {
        id,
        kind: PointerKind::Touch,
        x: p.x,
        y: p.y,
    }
}

/// Pointer events for a two-finger pinch from `start` to `end` apart,
/// centered on `center`. The fingers move one after the other.
pub fn pinch_events(start: f64, end: f64, center: Point) -> Vec<InputEvent> {
    let down = |id, x: f64| InputEvent::PointerDown {
        id,
        kind: PointerKind::Touch,
        button: PointerButton::Primary,
        x,
        y: center.y,
        over_control: false,
    };
    vec![
        down(FINGER_A, center.x - start / 2.0),
        down(FINGER_B, center.x + start / 2.0),
        touch(FINGER_A, Point::new(center.x - end / 2.0, center.y)),
        touch(FINGER_B, Point::new(center.x + end / 2.0, center.y)),
        InputEvent::PointerUp {
            id: FINGER_B,
            kind: PointerKind::Touch,
        },
        InputEvent::PointerUp {
            id: FINGER_A,
            kind: PointerKind::Touch,
        },
    ]
}

/// Mouse events for a drag from `from` to `to`.
pub fn drag_events(from: Point, to: Point) -> Vec<InputEvent> {
    vec![
        InputEvent::PointerDown {
            id: MOUSE,
            kind: PointerKind::Mouse,
            button: PointerButton::Primary,
            x: from.x,
            y: from.y,
            over_control: false,
        },
        InputEvent::PointerMove {
            id: MOUSE,
            kind: PointerKind::Mouse,
            x: to.x,
            y: to.y,
        },
        InputEvent::PointerUp {
            id: MOUSE,
            kind: PointerKind::Mouse,
        },
    ]
}

/// Run a command against the session.
pub fn execute(cmd: Command, map: &mut FlowMap) -> Result<Outcome> {
    let outcome = match cmd {
        Command::Choose { step, option } => {
            if let Choice::LoadFailed { target } = map.choose_option(step, option)? {
                log::debug!("Choice at step {} ended at {target:?}", step + 1);
            }
            Outcome::Redraw
        },
        Command::Back => {
            if map.go_back() {
                Outcome::Redraw
            } else {
                Outcome::Message("already at the first step".into())
            }
        },
        Command::Reset => {
            map.reset();
            Outcome::Redraw
        },
        Command::Material { step, index } => {
            let node_id = map
                .navigator()
                .steps()
                .get(step)
                .map(|s| s.node_id.clone())
                .with_context(|| format!("no step {}", step + 1))?;
            map.select_material(node_id, index);
            Outcome::Redraw
        },
        Command::Lang(lang) => {
            map.set_language(lang);
            Outcome::Redraw
        },
        Command::Drag { from, to } => {
            for event in drag_events(from, to) {
                map.handle_input(&event);
            }
            Outcome::ViewChanged
        },
        Command::Wheel { dx, dy, mode, zoom } => {
            let at = map.viewport_rect().center();
            map.handle_input(&InputEvent::Wheel {
                dx,
                dy,
                mode,
                x: at.x,
                y: at.y,
                modifiers: Modifiers {
                    ctrl: zoom,
                    ..Modifiers::default()
                },
            });
            Outcome::ViewChanged
        },
        Command::Pinch { start, end, center } => {
            for event in pinch_events(start, end, center) {
                map.handle_input(&event);
            }
            Outcome::ViewChanged
        },
        Command::Center => {
            map.center_map();
            Outcome::ViewChanged
        },
        Command::Panel => {
            map.toggle_panel();
            Outcome::Redraw
        },
        Command::Show => Outcome::Redraw,
        Command::Help => Outcome::Message(HELP.to_string()),
        Command::Quit => Outcome::Quit,
    };
    Ok(outcome)
}
