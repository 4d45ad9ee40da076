//! Pan/zoom state of the infinite canvas.
//!
//! The viewport owns a pan offset and a clamped scale factor. Zooming is
//! anchored at a client point by measuring the rendered canvas before the
//! scale change and correcting the pan afterwards, so the canvas point under
//! the cursor (or pinch centroid) stays put.

use flowmap_types::config::ViewportConfig;
use flowmap_types::geometry::{Point, Rect};
use flowmap_types::input::WheelMode;

/// A pan/scale snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub pan: Point,
    pub scale: f64,
}

impl Default for View {
    fn default() -> Self {
        Self {
            pan: Point::ORIGIN,
            scale: 1.0,
        }
    }
}

/// Where the canvas ends up on screen for a given view.
pub trait CanvasGeometry {
    /// Client rectangle of the rendered canvas under `view`.
    fn rendered_rect(&self, view: View) -> Rect;
}

/// A canvas scaled about its own center, then translated by the pan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledCanvas {
    /// Client rectangle of the canvas at pan `(0, 0)` and scale `1`.
    pub base: Rect,
}

impl ScaledCanvas {
    pub fn new(base: Rect) -> Self {
        Self { base }
    }

    /// Client position of a canvas-space point under `view`.
    pub fn to_client(&self, view: View, canvas_point: Point) -> Point {
        let r = self.rendered_rect(view);
        Point::new(
            r.x + canvas_point.x / self.base.w * r.w,
            r.y + canvas_point.y / self.base.h * r.h,
        )
    }
}

impl CanvasGeometry for ScaledCanvas {
    fn rendered_rect(&self, view: View) -> Rect {
        let c = self.base.center();
        let w = self.base.w * view.scale;
        let h = self.base.h * view.scale;
        Rect::new(
            c.x - w / 2.0 + view.pan.x,
            c.y - h / 2.0 + view.pan.y,
            w,
            h,
        )
    }
}

/// A transform request produced by gesture handling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportAction {
    /// Drag: set the pan outright.
    SetPan(Point),
    /// Pinch: zoom by `factor` anchored at `origin`.
    ZoomAt { factor: f64, origin: Point },
    /// Modifier-held wheel: zoom by the wheel delta anchored at `origin`.
    WheelZoom { dy: f64, origin: Point },
    /// Plain wheel: pan by the delta in wheel units.
    WheelPan { dx: f64, dy: f64, mode: WheelMode },
}

/// Pan offset and scale of the canvas.
#[derive(Debug, Clone)]
pub struct Viewport {
    pan: Point,
    scale: f64,
    config: ViewportConfig,
    initial_view: View,
    initial_captured: bool,
}

/// Pan `(0, 0)` at scale `1`, or the nearest bound when `1` is out of range.
fn home_view(config: &ViewportConfig) -> View {
    View {
        pan: Point::ORIGIN,
        scale: config.scale_min.max(1.0).min(config.scale_max),
    }
}

impl Viewport {
    pub fn new(config: ViewportConfig) -> Self {
        let view = home_view(&config);
        Self {
            pan: view.pan,
            scale: view.scale,
            config,
            initial_view: view,
            initial_captured: false,
        }
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn view(&self) -> View {
        View {
            pan: self.pan,
            scale: self.scale,
        }
    }

    /// The view captured when the start node was first focused.
    pub fn initial_view(&self) -> View {
        self.initial_view
    }

    pub fn initial_captured(&self) -> bool {
        self.initial_captured
    }

    pub fn scale_bounds(&self) -> (f64, f64) {
        (self.config.scale_min, self.config.scale_max)
    }

    /// Clamp a scale into the configured range.
    pub fn clamp_scale(&self, value: f64) -> f64 {
        value.clamp(self.config.scale_min, self.config.scale_max)
    }

    /// Set the pan outright (drag).
    pub fn set_pan(&mut self, pan: Point) {
        self.pan = pan;
    }

    pub fn pan_by(&mut self, delta: Point) {
        self.pan = self.pan + delta;
    }

    /// Zoom by `factor` keeping the canvas point under `origin` fixed.
    /// Returns `false` if the clamped scale did not change.
    pub fn zoom_at_point(
        &mut self,
        factor: f64,
        origin: Point,
        canvas: &impl CanvasGeometry,
    ) -> bool {
        if !factor.is_finite() || factor <= 0.0 || !origin.is_finite() {
            return false;
        }
        let previous = self.scale;
        let target = self.clamp_scale(previous * factor);
        if target == previous {
            return false;
        }

        let before = canvas.rendered_rect(self.view());
        let relative = before.fraction_of(origin);

        self.scale = target;

        let after = canvas.rendered_rect(self.view());
        let desired_left = origin.x - relative.x * after.w;
        let desired_top = origin.y - relative.y * after.h;
        self.pan.x += desired_left - after.x;
        self.pan.y += desired_top - after.y;
        true
    }

    /// Modifier-held wheel: zoom at the cursor.
    pub fn zoom_by_wheel(&mut self, dy: f64, origin: Point, canvas: &impl CanvasGeometry) -> bool {
        let factor = (-dy * self.config.wheel_zoom_rate).exp();
        self.zoom_at_point(factor, origin, canvas)
    }

    /// Plain wheel: scroll the canvas by the delta converted to pixels.
    pub fn pan_by_wheel_delta(&mut self, dx: f64, dy: f64, mode: WheelMode) {
        let multiplier = match mode {
            WheelMode::Pixel => 1.0,
            WheelMode::Line => self.config.line_multiplier,
            WheelMode::Page => self.config.page_multiplier,
        };
        self.pan.x -= dx * multiplier;
        self.pan.y -= dy * multiplier;
    }

    /// Shift the pan so `target` lands on `viewport_center`. Focusing step 0
    /// for the first time records the initial view.
    pub fn focus(&mut self, target: Point, viewport_center: Point, step_index: usize) {
        self.pan_by(viewport_center - target);
        if !self.initial_captured && step_index == 0 {
            self.initial_view = self.view();
            self.initial_captured = true;
            log::debug!(
                "Captured initial view: pan=({:.1}, {:.1}) scale={:.3}",
                self.pan.x,
                self.pan.y,
                self.scale
            );
        }
    }

    pub fn restore(&mut self, view: View) {
        self.pan = view.pan;
        self.scale = view.scale;
    }

    pub fn restore_initial(&mut self) {
        self.restore(self.initial_view);
    }

    /// Back to pan `(0, 0)` at scale `1` clamped into the configured range.
    pub fn center_map(&mut self) {
        self.restore(home_view(&self.config));
    }

    /// Apply a gesture-produced action.
    pub fn apply(&mut self, action: ViewportAction, canvas: &impl CanvasGeometry) {
        match action {
            ViewportAction::SetPan(pan) => self.set_pan(pan),
            ViewportAction::ZoomAt { factor, origin } => {
                self.zoom_at_point(factor, origin, canvas);
            },
            ViewportAction::WheelZoom { dy, origin } => {
                self.zoom_by_wheel(dy, origin, canvas);
            },
            ViewportAction::WheelPan { dx, dy, mode } => self.pan_by_wheel_delta(dx, dy, mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(ViewportConfig::default())
    }

    fn canvas() -> ScaledCanvas {
        ScaledCanvas::new(Rect::new(-1800.0, -1800.0, 4200.0, 4200.0))
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    /// Canvas-space point rendered under `client` for the current view.
    fn canvas_point_under(v: &Viewport, c: &ScaledCanvas, client: Point) -> Point {
        let r = c.rendered_rect(v.view());
        Point::new(
            (client.x - r.x) / r.w * c.base.w,
            (client.y - r.y) / r.h * c.base.h,
        )
    }

    #[test]
    fn starts_at_identity() {
        let v = viewport();
        assert_eq!(v.view(), View::default());
        assert!(!v.initial_captured());
    }

    #[test]
    fn rendered_rect_scales_about_center() {
        let c = ScaledCanvas::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let r = c.rendered_rect(View {
            pan: Point::new(10.0, -5.0),
            scale: 2.0,
        });
        assert_eq!(r, Rect::new(-40.0, -55.0, 200.0, 200.0));
    }

    #[test]
    fn zoom_keeps_point_under_cursor() {
        let mut v = viewport();
        let c = canvas();
        let origin = Point::new(300.0, 200.0);
        let before = canvas_point_under(&v, &c, origin);
        assert!(v.zoom_at_point(1.7, origin, &c));
        let after = canvas_point_under(&v, &c, origin);
        assert!(approx(before.x, after.x), "{before:?} vs {after:?}");
        assert!(approx(before.y, after.y));
        assert!(approx(v.scale(), 1.7));
    }

    #[test]
    fn zoom_clamps_to_bounds() {
        let mut v = viewport();
        let c = canvas();
        v.zoom_at_point(100.0, Point::ORIGIN, &c);
        assert_eq!(v.scale(), 2.75);
        v.zoom_at_point(0.0001, Point::ORIGIN, &c);
        assert_eq!(v.scale(), 0.45);
    }

    #[test]
    fn zoom_at_bound_does_not_translate() {
        let mut v = viewport();
        let c = canvas();
        v.zoom_at_point(100.0, Point::new(50.0, 50.0), &c);
        let pan = v.pan();
        assert!(!v.zoom_at_point(1.5, Point::new(900.0, 10.0), &c));
        assert_eq!(v.pan(), pan);
    }

    #[test]
    fn non_finite_factor_ignored() {
        let mut v = viewport();
        let c = canvas();
        assert!(!v.zoom_at_point(f64::NAN, Point::ORIGIN, &c));
        assert!(!v.zoom_at_point(f64::INFINITY, Point::ORIGIN, &c));
        assert!(!v.zoom_at_point(-2.0, Point::ORIGIN, &c));
        assert_eq!(v.view(), View::default());
    }

    #[test]
    fn wheel_zoom_direction() {
        let mut v = viewport();
        let c = canvas();
        v.zoom_by_wheel(-100.0, Point::ORIGIN, &c);
        assert!(approx(v.scale(), (0.15f64).exp()));
        v.zoom_by_wheel(200.0, Point::ORIGIN, &c);
        assert!(approx(v.scale(), (-0.15f64).exp()));
    }

    #[test]
    fn wheel_pan_multipliers() {
        let mut v = viewport();
        v.pan_by_wheel_delta(2.0, 3.0, WheelMode::Pixel);
        assert_eq!(v.pan(), Point::new(-2.0, -3.0));
        v.pan_by_wheel_delta(0.0, 1.0, WheelMode::Line);
        assert_eq!(v.pan(), Point::new(-2.0, -19.0));
        v.pan_by_wheel_delta(-1.0, 0.0, WheelMode::Page);
        assert_eq!(v.pan(), Point::new(118.0, -19.0));
        assert_eq!(v.scale(), 1.0);
    }

    #[test]
    fn focus_centers_target_and_captures_once() {
        let mut v = viewport();
        v.focus(Point::new(600.0, 400.0), Point::new(500.0, 300.0), 0);
        assert_eq!(v.pan(), Point::new(-100.0, -100.0));
        assert!(v.initial_captured());
        assert_eq!(v.initial_view().pan, Point::new(-100.0, -100.0));

        v.focus(Point::new(0.0, 0.0), Point::new(10.0, 10.0), 0);
        assert_eq!(v.pan(), Point::new(-90.0, -90.0));
        assert_eq!(v.initial_view().pan, Point::new(-100.0, -100.0));
    }

    #[test]
    fn focus_on_later_step_does_not_capture() {
        let mut v = viewport();
        v.focus(Point::new(10.0, 0.0), Point::ORIGIN, 2);
        assert!(!v.initial_captured());
        assert_eq!(v.initial_view(), View::default());
    }

    #[test]
    fn restore_initial_view() {
        let mut v = viewport();
        let c = canvas();
        v.focus(Point::new(50.0, 50.0), Point::ORIGIN, 0);
        let initial = v.view();
        v.zoom_at_point(2.0, Point::new(10.0, 10.0), &c);
        v.set_pan(Point::new(999.0, 999.0));
        v.restore_initial();
        assert_eq!(v.view(), initial);
    }

    #[test]
    fn center_map_resets_to_identity() {
        let mut v = viewport();
        v.restore(View {
            pan: Point::new(5.0, 5.0),
            scale: 2.0,
        });
        v.center_map();
        assert_eq!(v.view(), View::default());
    }

    #[test]
    fn range_excluding_one_starts_at_nearest_bound() {
        let config = ViewportConfig {
            scale_min: 2.0,
            scale_max: 3.0,
            ..ViewportConfig::default()
        };
        let mut v = Viewport::new(config);
        let c = canvas();
        assert_eq!(v.scale(), 2.0);
        assert_eq!(v.initial_view().scale, 2.0);

        assert!(!v.zoom_at_point(1.0, Point::new(300.0, 200.0), &c));
        assert_eq!(v.view(), v.initial_view());

        assert!(v.zoom_at_point(1.25, Point::new(300.0, 200.0), &c));
        v.center_map();
        assert_eq!(v.pan(), Point::ORIGIN);
        assert_eq!(v.scale(), 2.0);

        let low = Viewport::new(ViewportConfig {
            scale_min: 0.2,
            scale_max: 0.5,
            ..ViewportConfig::default()
        });
        assert_eq!(low.scale(), 0.5);
    }

    #[test]
    fn apply_dispatches_actions() {
        let mut v = viewport();
        let c = canvas();
        v.apply(ViewportAction::SetPan(Point::new(4.0, 5.0)), &c);
        assert_eq!(v.pan(), Point::new(4.0, 5.0));
        v.apply(
            ViewportAction::WheelPan {
                dx: 1.0,
                dy: 0.0,
                mode: WheelMode::Pixel,
            },
            &c,
        );
        assert_eq!(v.pan(), Point::new(3.0, 5.0));
        v.apply(
            ViewportAction::ZoomAt {
                factor: 1.5,
                origin: Point::ORIGIN,
            },
            &c,
        );
        assert!(approx(v.scale(), 1.5));
    }

    #[test]
    fn to_client_matches_rendered_rect() {
        let c = ScaledCanvas::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let view = View {
            pan: Point::new(10.0, 0.0),
            scale: 0.5,
        };
        assert_eq!(c.to_client(view, Point::new(50.0, 50.0)), Point::new(60.0, 50.0));
        assert_eq!(c.to_client(view, Point::ORIGIN), Point::new(35.0, 25.0));
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn scale_always_within_bounds(
                factors in proptest::collection::vec(0.01f64..20.0, 1..30),
                ox in -2000.0f64..2000.0,
                oy in -2000.0f64..2000.0,
            ) {
                let mut v = viewport();
                let c = canvas();
                for f in factors {
                    v.zoom_at_point(f, Point::new(ox, oy), &c);
                    prop_assert!(v.scale() >= 0.45 && v.scale() <= 2.75);
                }
            }

            #[test]
            fn zoom_anchor_holds(
                factor in 0.2f64..5.0,
                scale in 0.45f64..2.75,
                px in -500.0f64..500.0,
                py in -500.0f64..500.0,
                ox in -1000.0f64..1000.0,
                oy in -1000.0f64..1000.0,
            ) {
                let mut v = viewport();
                let c = canvas();
                v.restore(View { pan: Point::new(px, py), scale });
                let origin = Point::new(ox, oy);
                let before = canvas_point_under(&v, &c, origin);
                v.zoom_at_point(factor, origin, &c);
                let after = canvas_point_under(&v, &c, origin);
                prop_assert!((before.x - after.x).abs() < 1e-6);
                prop_assert!((before.y - after.y).abs() < 1e-6);
            }
        }
    }
}
