//! Interactive render session.
//!
//! Owns the parsed layout and keymap, the selected layer, the active theme,
//! the press state and the dynamic-theme animation loop. The loop is driven
//! by a [`FrameScheduler`]: at most one frame request is outstanding, and
//! switching themes cancels it before a new one is requested.

use std::time::Duration;

use tracing::{debug, info};

use super::canvas::Canvas;
use super::engine::{render, Animation, RenderOptions};
use crate::keycodes::{map_event, KeyEvent};
use crate::models::key_rect::find_by_label;
use crate::models::{KeyGeometry, KeymapDocument, Layer, PressState, RenderedKeyRect, Theme};
use crate::parser::{parse_keymap, parse_layout};

/// Length of one background/ripple animation cycle.
pub const ANIMATION_CYCLE: Duration = Duration::from_secs(3);

/// Opaque id of a requested display frame.
pub type FrameHandle = u64;

/// Platform per-frame callback source.
pub trait FrameScheduler {
    /// Requests one callback on the next display frame.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancels a pending request. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// State of the dynamic-theme animation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    /// No frame is requested
    Idle,
    /// A frame request is outstanding
    Running(FrameHandle),
}

/// Scheduler that queues requests until the caller drains them.
#[derive(Debug, Default)]
pub struct QueuedScheduler {
    next: FrameHandle,
    pending: Vec<FrameHandle>,
    cancelled: usize,
}

impl QueuedScheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every pending request, oldest first.
    pub fn take_pending(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }

    /// Number of outstanding requests.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of requests cancelled so far.
    #[must_use]
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }
}

impl FrameScheduler for QueuedScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        self.pending.push(self.next);
        self.next
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|pending| *pending != handle);
        if self.pending.len() != before {
            self.cancelled += 1;
        }
    }
}

/// Converts elapsed loop time into a phase in `0.0..1.0`.
#[must_use]
pub fn phase_at(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() / ANIMATION_CYCLE.as_secs_f64()).rem_euclid(1.0)
}

/// A canvas plus everything needed to redraw it.
pub struct RenderSession<C: Canvas, S: FrameScheduler> {
    canvas: C,
    scheduler: S,
    options: RenderOptions,
    theme: &'static Theme,
    layout_text: String,
    keymap_text: String,
    geometries: Vec<KeyGeometry>,
    keymap: KeymapDocument,
    selected_layer: Option<String>,
    press: PressState,
    rects: Vec<RenderedKeyRect>,
    last_activated: Option<(f64, f64)>,
    phase: f64,
    animation: AnimationState,
}

impl<C: Canvas, S: FrameScheduler> RenderSession<C, S> {
    /// Creates a session with no layout loaded. Call [`Self::set_theme`]
    /// to start the animation loop for a dynamic initial theme.
    pub fn new(canvas: C, scheduler: S, options: RenderOptions) -> Self {
        Self {
            canvas,
            scheduler,
            options,
            theme: Theme::dark(),
            layout_text: String::new(),
            keymap_text: String::new(),
            geometries: Vec::new(),
            keymap: KeymapDocument::new(),
            selected_layer: None,
            press: PressState::new(),
            rects: Vec::new(),
            last_activated: None,
            phase: 0.0,
            animation: AnimationState::Idle,
        }
    }

    /// Replaces both source texts, re-parses them and redraws.
    pub fn load(&mut self, layout_text: impl Into<String>, keymap_text: impl Into<String>) {
        self.layout_text = layout_text.into();
        self.keymap_text = keymap_text.into();
        self.reload();
    }

    /// Re-parses the current texts, clears the press state and redraws.
    ///
    /// The layer selection survives when the layer still exists; otherwise
    /// the first layer is selected.
    pub fn reload(&mut self) {
        self.geometries = parse_layout(&self.layout_text);
        self.keymap = parse_keymap(&self.keymap_text);
        self.press.reset();
        self.last_activated = None;

        let keep = self
            .selected_layer
            .as_deref()
            .is_some_and(|name| self.keymap.contains(name));
        if !keep {
            self.selected_layer = self.keymap.first().map(|layer| layer.name.clone());
        }

        info!(
            "Loaded {} keys and {} layers",
            self.geometries.len(),
            self.keymap.len()
        );
        self.redraw();
    }

    /// Selects a layer by name and redraws. Returns false for unknown names.
    pub fn select_layer(&mut self, name: &str) -> bool {
        if !self.keymap.contains(name) {
            debug!("Ignoring selection of unknown layer '{}'", name);
            return false;
        }
        self.selected_layer = Some(name.to_string());
        self.redraw();
        true
    }

    /// The layer being drawn: the selection, or the first layer.
    #[must_use]
    pub fn active_layer(&self) -> Option<&Layer> {
        self.selected_layer
            .as_deref()
            .and_then(|name| self.keymap.get(name))
            .or_else(|| self.keymap.first())
    }

    /// Switches theme. Any running loop is cancelled first; a dynamic theme
    /// then starts a new one.
    pub fn set_theme(&mut self, theme: &'static Theme) {
        self.stop_animation();
        self.theme = theme;
        debug!("Theme set to '{}'", theme.name);

        if theme.dynamic {
            self.phase = 0.0;
            let handle = self.scheduler.request_frame();
            self.animation = AnimationState::Running(handle);
            debug!("Animation loop started (frame {})", handle);
        }
        self.redraw();
    }

    /// Display-frame callback. Draws and requests the next frame only when
    /// `handle` is the outstanding request; stale callbacks are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle, elapsed: Duration) -> bool {
        if self.animation != AnimationState::Running(handle) {
            debug!("Suppressed stale frame {}", handle);
            return false;
        }

        self.phase = phase_at(elapsed);
        self.redraw();
        self.animation = AnimationState::Running(self.scheduler.request_frame());
        true
    }

    /// Cancels the animation loop, if any.
    pub fn stop_animation(&mut self) {
        if let AnimationState::Running(handle) = self.animation {
            self.scheduler.cancel_frame(handle);
            debug!("Animation loop cancelled (frame {})", handle);
        }
        self.animation = AnimationState::Idle;
    }

    /// Tears the session down, stopping the animation loop.
    pub fn shutdown(&mut self) {
        self.stop_animation();
    }

    /// Handles a key press.
    ///
    /// Static themes redraw at once. Dynamic themes move the ripple origin
    /// to the pressed key and leave drawing to the loop.
    pub fn key_down(&mut self, event: &KeyEvent) {
        let Some(label) = map_event(event) else {
            return;
        };
        self.press.set(&label, true);

        if self.theme.dynamic {
            if let Some(rect) = find_by_label(&self.rects, &label) {
                self.last_activated = Some(rect.center());
            }
        } else {
            self.redraw();
        }
    }

    /// Handles a key release.
    pub fn key_up(&mut self, event: &KeyEvent) {
        let Some(label) = map_event(event) else {
            return;
        };
        self.press.set(&label, false);
        self.redraw();
    }

    /// Releases every held key (window lost focus) and redraws.
    pub fn focus_lost(&mut self) {
        self.press.release_all();
        self.redraw();
    }

    /// Draws the current state.
    pub fn redraw(&mut self) {
        let animation = self.theme.dynamic.then_some(Animation {
            phase: self.phase,
            ripple_origin: self.last_activated,
        });
        let labels = self
            .selected_layer
            .as_deref()
            .and_then(|name| self.keymap.get(name))
            .or_else(|| self.keymap.first())
            .map_or(&[][..], |layer| layer.keys.as_slice());

        self.rects = render(
            &mut self.canvas,
            &self.geometries,
            labels,
            self.theme,
            &mut self.press,
            &self.options,
            animation.as_ref(),
        );
    }

    /// Current theme.
    #[must_use]
    pub fn theme(&self) -> &'static Theme {
        self.theme
    }

    /// Current loop state.
    #[must_use]
    pub fn animation_state(&self) -> AnimationState {
        self.animation
    }

    /// Parsed key geometries.
    #[must_use]
    pub fn geometries(&self) -> &[KeyGeometry] {
        &self.geometries
    }

    /// Parsed keymap.
    #[must_use]
    pub fn keymap(&self) -> &KeymapDocument {
        &self.keymap
    }

    /// Press state.
    #[must_use]
    pub fn press(&self) -> &PressState {
        &self.press
    }

    /// Key rectangles from the last draw.
    #[must_use]
    pub fn rects(&self) -> &[RenderedKeyRect] {
        &self.rects
    }

    /// Ripple origin, if a key was pressed under a dynamic theme.
    #[must_use]
    pub fn last_activated(&self) -> Option<(f64, f64)> {
        self.last_activated
    }

    /// The canvas.
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// The frame scheduler.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Stops the loop and returns the canvas.
    pub fn into_canvas(mut self) -> C {
        self.shutdown();
        self.canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::canvas::RecordingCanvas;

    const LAYOUT: &str = r#"{"layouts": {"L": {"layout": [{"x": 0, "y": 0}, {"x": 1, "y": 0}]}}}"#;
    const KEYMAP: &str = "base_layer {\nlabel = \"Base\";\nbindings = <&kp A &kp B>;\n};\nnav_layer {\nbindings = <&kp LEFT &trans>;\n};";

    fn session() -> RenderSession<RecordingCanvas, QueuedScheduler> {
        let mut session = RenderSession::new(
            RecordingCanvas::new(200.0, 100.0),
            QueuedScheduler::new(),
            RenderOptions::default(),
        );
        session.set_theme(Theme::light());
        session.load(LAYOUT, KEYMAP);
        session
    }

    fn psychedelic() -> &'static Theme {
        Theme::by_name("psychedelic").unwrap()
    }

    #[test]
    fn test_load_selects_first_layer() {
        let session = session();
        assert_eq!(session.active_layer().map(|l| l.name.as_str()), Some("base"));
        let labels: Vec<&str> = session.rects().iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B"]);
    }

    #[test]
    fn test_select_layer() {
        let mut session = session();
        assert!(session.select_layer("nav"));
        let labels: Vec<&str> = session.rects().iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["LEFT", "---"]);
        assert!(!session.select_layer("missing"));
        assert_eq!(session.active_layer().map(|l| l.name.as_str()), Some("nav"));
    }

    #[test]
    fn test_key_down_updates_before_redraw() {
        let mut session = session();
        let frames = session.canvas().frame_count();

        session.key_down(&KeyEvent::new("a"));
        assert!(session.press().is_pressed("A"));
        assert_eq!(session.canvas().frame_count(), frames + 1);

        session.key_up(&KeyEvent::new("a"));
        assert!(!session.press().is_pressed("A"));
    }

    #[test]
    fn test_focus_lost_releases_all() {
        let mut session = session();
        session.key_down(&KeyEvent::new("a"));
        session.key_down(&KeyEvent::new("b"));
        session.focus_lost();
        assert!(session.press().pressed_labels().is_empty());
        assert_eq!(session.press().len(), 2);
    }

    #[test]
    fn test_reload_resets_press_state() {
        let mut session = session();
        session.key_down(&KeyEvent::new("z"));
        assert!(session.press().is_pressed("Z"));
        session.reload();
        assert_eq!(session.press().get("Z"), None);
        assert_eq!(session.press().len(), 2);
    }

    #[test]
    fn test_static_theme_never_requests_frames() {
        let mut session = session();
        assert_eq!(session.animation_state(), AnimationState::Idle);
        assert_eq!(session.scheduler_mut().pending_len(), 0);
    }

    #[test]
    fn test_dynamic_theme_runs_single_loop() {
        let mut session = session();
        session.set_theme(psychedelic());
        session.set_theme(psychedelic());

        assert_eq!(session.scheduler_mut().pending_len(), 1);
        assert_eq!(session.scheduler_mut().cancelled(), 1);

        let pending = session.scheduler_mut().take_pending();
        assert!(session.on_frame(pending[0], Duration::from_millis(500)));
        assert_eq!(session.scheduler_mut().pending_len(), 1);
    }

    #[test]
    fn test_switching_away_cancels_loop() {
        let mut session = session();
        session.set_theme(psychedelic());
        let stale = match session.animation_state() {
            AnimationState::Running(handle) => handle,
            AnimationState::Idle => panic!("loop should be running"),
        };

        session.set_theme(Theme::dark());
        assert_eq!(session.animation_state(), AnimationState::Idle);
        assert_eq!(session.scheduler_mut().pending_len(), 0);

        let frames = session.canvas().frame_count();
        assert!(!session.on_frame(stale, Duration::from_secs(1)));
        assert_eq!(session.canvas().frame_count(), frames);
    }

    #[test]
    fn test_dynamic_press_sets_ripple_origin() {
        let mut session = session();
        session.set_theme(psychedelic());
        let frames = session.canvas().frame_count();

        session.key_down(&KeyEvent::new("b"));
        let expected = session.rects()[1].center();
        assert_eq!(session.last_activated(), Some(expected));
        assert_eq!(session.canvas().frame_count(), frames);
    }

    #[test]
    fn test_into_canvas_stops_loop() {
        let mut session = session();
        session.set_theme(psychedelic());
        let canvas = session.into_canvas();
        assert!(canvas.frame_count() > 0);
    }

    #[test]
    fn test_phase_wraps() {
        assert!((phase_at(Duration::from_millis(1500)) - 0.5).abs() < 1e-9);
        assert!(phase_at(Duration::from_secs(3)).abs() < 1e-9);
    }
}
