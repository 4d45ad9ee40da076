//! The interactive map session.
//!
//! [`FlowMap`] owns the content graph, navigation path, viewport and gesture
//! state, and exposes the operations a host wires to its controls. Hosts
//! call [`FlowMap::render`] after every operation; rendering revalidates the
//! material selection, builds the [`Scene`] and then centers the step that
//! the last path mutation marked for focus.

use flowmap_types::config::FlowConfig;
use flowmap_types::error::{FlowError, Result};
use flowmap_types::geometry::{Point, Rect};
use flowmap_types::input::InputEvent;
use flowmap_types::text::Lang;

use crate::gesture::GestureState;
use crate::graph::{ContentGraph, FlowGraph, NodeId};
use crate::layout;
use crate::nav::{Choice, NavError, Navigator};
use crate::scene::{self, Scene};
use crate::strings::{Strings, TextKey};
use crate::viewport::{ScaledCanvas, View, Viewport, ViewportAction};

/// Canvas of `size` centered in `viewport` at pan `(0, 0)` and scale `1`.
fn centered_canvas(viewport: Rect, size: f64) -> ScaledCanvas {
    let c = viewport.center();
    ScaledCanvas::new(Rect::new(c.x - size / 2.0, c.y - size / 2.0, size, size))
}

pub struct FlowMap {
    graph: FlowGraph,
    navigator: Navigator,
    viewport: Viewport,
    gestures: GestureState,
    config: FlowConfig,
    strings: Strings,
    lang: Lang,
    canvas: ScaledCanvas,
    viewport_rect: Rect,
    panel_expanded: bool,
    notice: Option<String>,
}

impl FlowMap {
    /// Start a session at the configured start node inside a map viewport
    /// occupying `viewport_rect` in client coordinates.
    pub fn new(
        graph: FlowGraph,
        config: FlowConfig,
        strings: Strings,
        lang: Lang,
        viewport_rect: Rect,
    ) -> Result<Self> {
        config.validate()?;
        let start = NodeId::new(config.start_node.clone());
        if !graph.contains(&start) {
            return Err(FlowError::Graph(format!("start node '{start}' not found")));
        }
        log::info!("Session started at '{start}' ({lang})");
        Ok(Self {
            navigator: Navigator::new(start),
            viewport: Viewport::new(config.viewport.clone()),
            gestures: GestureState::new(config.viewport.max_touch_points),
            canvas: centered_canvas(viewport_rect, config.layout.canvas_size),
            graph,
            config,
            strings,
            lang,
            viewport_rect,
            panel_expanded: true,
            notice: None,
        })
    }

    pub fn graph(&self) -> &FlowGraph {
        &self.graph
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn gestures(&self) -> &GestureState {
        &self.gestures
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn strings(&self) -> &Strings {
        &self.strings
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    pub fn viewport_rect(&self) -> Rect {
        self.viewport_rect
    }

    /// Answer the question at `step_index`. A dangling target leaves a
    /// blocking notice for [`FlowMap::take_notice`].
    pub fn choose_option(
        &mut self,
        step_index: usize,
        option_index: usize,
    ) -> std::result::Result<Choice, NavError> {
        let choice = self
            .navigator
            .choose_option(&self.graph, step_index, option_index)?;
        if let Choice::LoadFailed { .. } = choice {
            let text = self.strings.text(TextKey::ErrorLoading, self.lang);
            self.notice = Some(text.to_string());
        }
        Ok(choice)
    }

    pub fn go_back(&mut self) -> bool {
        self.navigator.go_back(&self.graph)
    }

    /// Back to the start step and the initial view.
    pub fn reset(&mut self) {
        self.navigator.reset();
        self.gestures.reset();
        self.viewport.restore_initial();
        log::info!("Session reset");
    }

    /// Toggle the detail card of a material on a result step.
    pub fn select_material(&mut self, node_id: NodeId, material_index: usize) {
        self.navigator.select_material(node_id, material_index);
    }

    pub fn set_language(&mut self, lang: Lang) {
        if self.lang != lang {
            log::info!("Language switched to {lang}");
        }
        self.lang = lang;
    }

    pub fn panel_expanded(&self) -> bool {
        self.panel_expanded
    }

    /// Show or hide the route panel. Returns the new state.
    pub fn toggle_panel(&mut self) -> bool {
        self.panel_expanded = !self.panel_expanded;
        log::debug!("Route panel expanded: {}", self.panel_expanded);
        self.panel_expanded
    }

    /// Pending blocking notice, taken once.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Feed a pointer or wheel event; returns the viewport action applied.
    pub fn handle_input(&mut self, event: &InputEvent) -> Option<ViewportAction> {
        let action = self.gestures.handle(event, self.viewport.pan())?;
        self.viewport.apply(action, &self.canvas);
        Some(action)
    }

    /// Zoom by `factor` anchored at a client point.
    pub fn zoom_at(&mut self, factor: f64, origin: Point) -> bool {
        self.viewport.zoom_at_point(factor, origin, &self.canvas)
    }

    pub fn center_map(&mut self) {
        self.viewport.center_map();
    }

    /// The map viewport moved or changed size.
    pub fn resize(&mut self, viewport_rect: Rect) {
        self.viewport_rect = viewport_rect;
        self.canvas = centered_canvas(viewport_rect, self.config.layout.canvas_size);
        log::debug!(
            "Viewport resized to {}x{}",
            viewport_rect.w,
            viewport_rect.h
        );
    }

    /// Client rectangle of a step's card under the current view.
    pub fn step_client_rect(&self, step_index: usize) -> Option<Rect> {
        let steps = self.navigator.steps();
        let step = steps.get(step_index)?;
        if !self.graph.contains(&step.node_id) {
            return None;
        }
        let positions = layout::compute_positions(steps, &self.graph, &self.config.layout);
        let card = layout::node_rect(positions[step_index], &self.config.layout);
        let view = self.viewport.view();
        let top_left = self.canvas.to_client(view, Point::new(card.x, card.y));
        Some(Rect::new(
            top_left.x,
            top_left.y,
            card.w * view.scale,
            card.h * view.scale,
        ))
    }

    fn focus_step(&mut self, step_index: usize) {
        let Some(card) = self.step_client_rect(step_index) else {
            return;
        };
        self.viewport
            .focus(card.center(), self.viewport_rect.center(), step_index);
    }

    /// Build the scene for the current state, then apply pending focus.
    pub fn render(&mut self) -> Scene {
        self.navigator.revalidate(&self.graph);
        let scene = scene::build_scene(
            self.navigator.steps(),
            self.navigator.selected_material(),
            &self.graph,
            &self.config.layout,
            &self.strings,
            self.lang,
            self.panel_expanded,
        );
        if let Some(index) = self.navigator.take_pending_focus() {
            self.focus_step(index);
        }
        scene
    }

    /// Current pan and scale.
    pub fn view(&self) -> View {
        self.viewport.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_graph;
    use flowmap_types::input::{PointerButton, PointerKind};

    fn session() -> FlowMap {
        FlowMap::new(
            sample_graph(),
            FlowConfig::default(),
            Strings::builtin(),
            Lang::En,
            Rect::new(0.0, 0.0, 1200.0, 800.0),
        )
        .unwrap()
    }

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
    }

    fn touch_down(id: u32, x: f64, y: f64) -> InputEvent {
        InputEvent::PointerDown {
            id,
            kind: PointerKind::Touch,
            button: PointerButton::Primary,
            x,
            y,
            over_control: false,
        }
    }

    #[test]
    fn missing_start_node_rejected() {
        let config = FlowConfig {
            start_node: "nowhere".into(),
            ..FlowConfig::default()
        };
        let err = FlowMap::new(
            sample_graph(),
            config,
            Strings::builtin(),
            Lang::Ru,
            Rect::new(0.0, 0.0, 100.0, 100.0),
        )
        .err()
        .unwrap();
        assert!(matches!(err, FlowError::Graph(_)));
    }

    #[test]
    fn first_render_centers_start_and_captures_initial_view() {
        let mut s = session();
        s.render();
        assert!(approx(s.view().pan, Point::new(-150.0, -90.0)));
        assert!(s.viewport().initial_captured());
        assert_eq!(s.viewport().initial_view(), s.view());

        s.render();
        assert!(approx(s.view().pan, Point::new(-150.0, -90.0)));
    }

    #[test]
    fn choosing_focuses_new_frontier() {
        let mut s = session();
        s.render();
        assert_eq!(s.choose_option(0, 0).unwrap(), Choice::Advanced { index: 1 });
        let scene = s.render();
        assert_eq!(scene.nodes.len(), 2);
        let card = s.step_client_rect(1).unwrap();
        assert!(approx(card.center(), s.viewport_rect().center()));
    }

    #[test]
    fn load_failure_sets_notice_once() {
        let mut s = session();
        let choice = s.choose_option(0, 2).unwrap();
        assert_eq!(
            choice,
            Choice::LoadFailed {
                target: Some(NodeId::from("ghost"))
            }
        );
        assert_eq!(s.navigator().len(), 1);
        assert_eq!(s.take_notice().as_deref(), Some("Failed to load the next step."));
        assert_eq!(s.take_notice(), None);
    }

    #[test]
    fn load_failure_before_first_render_still_centers_start() {
        let mut s = session();
        assert!(matches!(
            s.choose_option(0, 2).unwrap(),
            Choice::LoadFailed { .. }
        ));
        s.render();
        assert!(approx(s.view().pan, Point::new(-150.0, -90.0)));
        assert!(s.viewport().initial_captured());

        s.zoom_at(2.0, Point::new(100.0, 100.0));
        s.reset();
        assert!(approx(s.view().pan, Point::new(-150.0, -90.0)));
    }

    #[test]
    fn invalid_choice_leaves_no_notice() {
        let mut s = session();
        assert!(s.choose_option(3, 0).is_err());
        assert_eq!(s.take_notice(), None);
    }

    #[test]
    fn reset_restores_initial_view() {
        let mut s = session();
        s.render();
        let initial = s.view();
        s.choose_option(0, 0).unwrap();
        s.render();
        s.zoom_at(2.0, Point::new(100.0, 100.0));
        s.reset();
        assert_eq!(s.view(), initial);
        assert_eq!(s.navigator().len(), 1);
        s.render();
        assert_eq!(s.view(), initial);
    }

    #[test]
    fn render_drops_stale_selection() {
        let mut s = session();
        s.choose_option(0, 0).unwrap();
        s.choose_option(1, 0).unwrap();
        s.select_material(NodeId::from("res_pe"), 5);
        s.render();
        assert_eq!(s.navigator().selected_material(), None);

        s.select_material(NodeId::from("res_pe"), 0);
        s.render();
        assert!(s.navigator().selected_material().is_some());
    }

    #[test]
    fn language_switch_changes_scene_text() {
        let mut s = session();
        assert_eq!(s.render().back_label, "Back");
        s.set_language(Lang::Ru);
        assert_eq!(s.render().back_label, "Назад");
    }

    #[test]
    fn panel_toggle_reaches_scene() {
        let mut s = session();
        assert!(s.render().panel.expanded);
        assert!(!s.toggle_panel());
        let scene = s.render();
        assert!(!scene.panel.expanded);
        assert_eq!(scene.panel.action, "Open the route panel");
        assert!(s.toggle_panel());
    }

    #[test]
    fn narrow_scale_range_starts_and_focuses_inside_it() {
        let mut config = FlowConfig::default();
        config.viewport.scale_min = 2.0;
        config.viewport.scale_max = 3.0;
        let mut s = FlowMap::new(
            sample_graph(),
            config,
            Strings::builtin(),
            Lang::En,
            Rect::new(0.0, 0.0, 1200.0, 800.0),
        )
        .unwrap();
        s.render();
        assert_eq!(s.view().scale, 2.0);
        let card = s.step_client_rect(0).unwrap();
        assert!(approx(card.center(), s.viewport_rect().center()));
        assert!(!s.zoom_at(1.0, Point::new(10.0, 10.0)));
        s.center_map();
        assert_eq!(s.view().scale, 2.0);
    }

    #[test]
    fn pinch_through_input_zooms() {
        let mut s = session();
        s.handle_input(&touch_down(1, 0.0, 50.0));
        s.handle_input(&touch_down(2, 100.0, 50.0));
        let action = s.handle_input(&InputEvent::PointerMove {
            id: 2,
            kind: PointerKind::Touch,
            x: 150.0,
            y: 50.0,
        });
        assert!(matches!(action, Some(ViewportAction::ZoomAt { .. })));
        assert!((s.view().scale - 1.5).abs() < 1e-12);
    }

    #[test]
    fn drag_through_input_pans() {
        let mut s = session();
        s.handle_input(&InputEvent::PointerDown {
            id: 9,
            kind: PointerKind::Mouse,
            button: PointerButton::Primary,
            x: 10.0,
            y: 10.0,
            over_control: false,
        });
        s.handle_input(&InputEvent::PointerMove {
            id: 9,
            kind: PointerKind::Mouse,
            x: 60.0,
            y: -20.0,
        });
        assert_eq!(s.view().pan, Point::new(50.0, -30.0));
    }

    #[test]
    fn resize_recenters_canvas() {
        let mut s = session();
        s.resize(Rect::new(0.0, 0.0, 600.0, 400.0));
        s.render();
        let card = s.step_client_rect(0).unwrap();
        assert!(approx(card.center(), Point::new(300.0, 200.0)));
    }
}
