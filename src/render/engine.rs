//! Frame composition: fit the layout to the canvas and draw every key.
//!
//! A render pass is synchronous. It computes the whole [`Frame`] first and
//! presents it once, so the canvas is either cleared or fully drawn.

use serde::{Deserialize, Serialize};

use super::canvas::{Background, Canvas, DrawCommand, Frame, Rgba, Shadow};
use super::geometry::{layout_bounds, rotate_point, BoundsPolicy, Fit};
use crate::keycodes::{is_transparent, normalize, PLACEHOLDER_LABEL};
use crate::models::{KeyDecoration, KeyGeometry, PressState, RenderedKeyRect, RgbColor, Theme};

/// Ripple rings drawn around the last activated key.
pub const RIPPLE_RINGS: usize = 3;

const RIPPLE_BASE_RADIUS: f64 = 30.0;
const RIPPLE_STROKE_WIDTH: f64 = 4.0;
const RIPPLE_MAX_ALPHA: f64 = 0.5;
const DISC_RATIO: f64 = 0.35;
const FONT_RATIO: f64 = 0.8;

/// Tunables for a render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Share of the limiting canvas dimension the layout fills
    pub fit_ratio: f64,
    /// Which extents feed the bounding box
    pub bounds: BoundsPolicy,
    /// Floor for the label font size before the 0.8 factor
    pub min_font_size: f64,
    /// Key corner radius in pixels
    pub corner_radius: f64,
    /// Key outline width in pixels
    pub stroke_width: f64,
    /// Draw a soft drop shadow under keys
    pub key_shadow: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            fit_ratio: 0.9,
            bounds: BoundsPolicy::Unrotated,
            min_font_size: 12.0,
            corner_radius: 4.0,
            stroke_width: 1.5,
            key_shadow: true,
        }
    }
}

/// Per-frame input for dynamic themes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Animation {
    /// Position in the animation cycle, `0.0..1.0`
    pub phase: f64,
    /// Centre of the last activated key in pixels
    pub ripple_origin: Option<(f64, f64)>,
}

/// Label font size for a key of `w x h` pixels.
#[must_use]
pub fn font_size(w: f64, h: f64, min_font_size: f64) -> f64 {
    min_font_size.max((w / 3.0).min(h / 2.0)) * FONT_RATIO
}

/// Fill for a key: transparent keys first, then held keys.
#[must_use]
pub fn key_fill(theme: &Theme, label: &str, press: &PressState) -> RgbColor {
    if is_transparent(label) {
        theme.special
    } else if press.is_pressed(label) {
        theme.pressed
    } else {
        theme.normal
    }
}

fn background_commands(theme: &Theme, animation: Option<&Animation>) -> Vec<DrawCommand> {
    if !theme.dynamic {
        return vec![DrawCommand::Background(Background::Solid(theme.background))];
    }

    let Animation {
        phase,
        ripple_origin,
    } = animation.copied().unwrap_or_default();
    let hue = phase.rem_euclid(1.0) * 360.0;
    let stops = (0..3)
        .map(|i| {
            let step = f64::from(i);
            (step / 2.0, RgbColor::from_hsv(hue + step * 120.0, 1.0, 0.4))
        })
        .collect();

    let mut commands = vec![DrawCommand::Background(Background::Gradient(stops))];
    if let Some((cx, cy)) = ripple_origin {
        for ring in 0..RIPPLE_RINGS {
            let progress = (phase + ring as f64 / RIPPLE_RINGS as f64).rem_euclid(1.0);
            let color = RgbColor::from_hsv(progress * 360.0, 1.0, 1.0);
            commands.push(DrawCommand::Circle {
                cx,
                cy,
                radius: RIPPLE_BASE_RADIUS * (1.0 + 2.0 * progress),
                fill: None,
                stroke: Some(Rgba::with_alpha(color, RIPPLE_MAX_ALPHA * (1.0 - progress))),
                stroke_width: RIPPLE_STROKE_WIDTH,
            });
        }
    }
    commands
}

/// Screen placement of one key: anchor rotated about the pivot, then scaled.
fn place_key(key: &KeyGeometry, fit: &Fit) -> (f64, f64, f64, f64) {
    let anchor = if key.is_rotated() {
        rotate_point((key.x, key.y), (key.rx, key.ry), key.r)
    } else {
        (key.x, key.y)
    };
    let (x, y) = fit.apply(anchor);
    (x, y, key.w * fit.scale, key.h * fit.scale)
}

/// Builds a frame for the given layout and layer labels.
///
/// Labels pair with geometries by index; missing labels draw as `"?"` and
/// extra labels are ignored. Every drawn label gets a press-state entry.
pub fn compose(
    size: (f64, f64),
    geometries: &[KeyGeometry],
    labels: &[String],
    theme: &Theme,
    press: &mut PressState,
    options: &RenderOptions,
    animation: Option<&Animation>,
) -> (Frame, Vec<RenderedKeyRect>) {
    let (width, height) = size;
    let mut frame = Frame::new(width, height);

    if geometries.is_empty() || labels.is_empty() {
        return (frame, Vec::new());
    }
    let Some(bounds) = layout_bounds(geometries, options.bounds) else {
        return (frame, Vec::new());
    };
    let fit = Fit::compute(&bounds, width, height, options.fit_ratio);

    frame.commands = background_commands(theme, animation);
    let mut rects = Vec::with_capacity(geometries.len());

    for (i, key) in geometries.iter().enumerate() {
        let (x, y, w, h) = place_key(key, &fit);
        let (cx, cy) = (x + w / 2.0, y + h / 2.0);
        let label = normalize(labels.get(i).map_or(PLACEHOLDER_LABEL, String::as_str));

        frame.commands.push(DrawCommand::RoundedRect {
            cx,
            cy,
            w,
            h,
            radius: options.corner_radius,
            rotation: key.r,
            fill: Rgba::opaque(key_fill(theme, &label, press)),
            stroke: Rgba::opaque(theme.stroke),
            stroke_width: options.stroke_width,
            shadow: options.key_shadow.then(Shadow::key),
        });

        let text_color = match theme.decoration {
            KeyDecoration::Plain => theme.text,
            KeyDecoration::Disc => {
                frame.commands.push(DrawCommand::Circle {
                    cx,
                    cy,
                    radius: w.min(h) * DISC_RATIO,
                    fill: Some(Rgba::opaque(RgbColor::WHITE)),
                    stroke: Some(Rgba::opaque(RgbColor::BLACK)),
                    stroke_width: 1.0,
                });
                RgbColor::BLACK
            }
        };

        frame.commands.push(DrawCommand::Text {
            x: cx,
            y: cy,
            text: label.clone(),
            size: font_size(w, h, options.min_font_size),
            rotation: key.r,
            color: Rgba::opaque(text_color),
        });

        press.ensure(&label);
        rects.push(RenderedKeyRect {
            label,
            x,
            y,
            w,
            h,
            r: key.r,
        });
    }

    (frame, rects)
}

/// Draws one frame onto `canvas` and returns where each key landed.
pub fn render<C: Canvas + ?Sized>(
    canvas: &mut C,
    geometries: &[KeyGeometry],
    labels: &[String],
    theme: &Theme,
    press: &mut PressState,
    options: &RenderOptions,
    animation: Option<&Animation>,
) -> Vec<RenderedKeyRect> {
    let (frame, rects) = compose(
        canvas.size(),
        geometries,
        labels,
        theme,
        press,
        options,
        animation,
    );
    canvas.present(frame);
    rects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::canvas::RecordingCanvas;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn row(count: usize) -> Vec<KeyGeometry> {
        (0..count).map(|i| KeyGeometry::new(i as f64, 0.0)).collect()
    }

    #[test]
    fn test_empty_inputs_clear_canvas() {
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        let mut press = PressState::new();
        let options = RenderOptions::default();

        let rects = render(&mut canvas, &[], &labels(&["A"]), Theme::dark(), &mut press, &options, None);
        assert!(rects.is_empty());
        assert!(canvas.last_frame().unwrap().is_clear());

        let rects = render(&mut canvas, &row(2), &[], Theme::dark(), &mut press, &options, None);
        assert!(rects.is_empty());
        assert!(canvas.last_frame().unwrap().is_clear());
        assert!(press.is_empty());
    }

    #[test]
    fn test_scale_and_centering() {
        // 4x1 layout on a 1000x500 canvas: width-limited, scale = 0.9 * 1000 / 4
        let mut canvas = RecordingCanvas::new(1000.0, 500.0);
        let mut press = PressState::new();
        let rects = render(
            &mut canvas,
            &row(4),
            &labels(&["A", "B", "C", "D"]),
            Theme::light(),
            &mut press,
            &RenderOptions::default(),
            None,
        );

        assert_eq!(rects.len(), 4);
        assert!(approx(rects[0].w, 225.0));
        assert!(approx(rects[0].x, 50.0));
        assert!(approx(rects[0].y, (500.0 - 225.0) / 2.0));
        assert!(approx(rects[3].x + rects[3].w, 950.0));
    }

    #[test]
    fn test_labels_align_by_index() {
        let mut canvas = RecordingCanvas::new(300.0, 100.0);
        let mut press = PressState::new();
        let rects = render(
            &mut canvas,
            &row(3),
            &labels(&["N1", "TRANS"]),
            Theme::dark(),
            &mut press,
            &RenderOptions::default(),
            None,
        );
        let drawn: Vec<&str> = rects.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(drawn, vec!["1", "---", "?"]);

        let rects = render(
            &mut canvas,
            &row(1),
            &labels(&["A", "B", "C"]),
            Theme::dark(),
            &mut press,
            &RenderOptions::default(),
            None,
        );
        assert_eq!(rects.len(), 1);
    }

    #[test]
    fn test_press_state_grows_without_overwrite() {
        let mut canvas = RecordingCanvas::new(300.0, 100.0);
        let mut press = PressState::new();
        press.set("A", true);

        render(
            &mut canvas,
            &row(2),
            &labels(&["A", "B"]),
            Theme::dark(),
            &mut press,
            &RenderOptions::default(),
            None,
        );

        assert_eq!(press.get("A"), Some(true));
        assert_eq!(press.get("B"), Some(false));
    }

    #[test]
    fn test_fill_precedence() {
        let theme = Theme::dark();
        let mut press = PressState::new();
        press.set("A", true);
        press.set("---", true);

        assert_eq!(key_fill(theme, "A", &press), theme.pressed);
        assert_eq!(key_fill(theme, "---", &press), theme.special);
        assert_eq!(key_fill(theme, "B", &press), theme.normal);
    }

    #[test]
    fn test_rotated_anchor_and_shape() {
        let keys = [
            KeyGeometry::new(0.0, 0.0),
            KeyGeometry::new(1.0, 0.0).with_rotation(90.0, 0.0, 0.0),
        ];
        let mut canvas = RecordingCanvas::new(200.0, 200.0);
        let mut press = PressState::new();
        let rects = render(
            &mut canvas,
            &keys,
            &labels(&["A", "B"]),
            Theme::dark(),
            &mut press,
            &RenderOptions::default(),
            None,
        );

        // (1, 0) rotated 90 degrees about the origin lands on (0, 1)
        let fit_scale = rects[0].w;
        assert!(approx(rects[1].x, rects[0].x));
        assert!(approx(rects[1].y, rects[0].y + fit_scale));
        assert_eq!(rects[1].r, 90.0);

        let rotations: Vec<f64> = canvas
            .last_frame()
            .unwrap()
            .commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::RoundedRect { rotation, .. } => Some(*rotation),
                _ => None,
            })
            .collect();
        assert_eq!(rotations, vec![0.0, 90.0]);
    }

    #[test]
    fn test_font_size_floor() {
        assert!(approx(font_size(10.0, 10.0, 12.0), 9.6));
        assert!(approx(font_size(90.0, 100.0, 12.0), 24.0));
    }

    #[test]
    fn test_disc_decoration_forces_black_text() {
        let theme = Theme::by_name("myakumyaku").unwrap();
        let mut press = PressState::new();
        let (frame, _) = compose(
            (100.0, 100.0),
            &row(1),
            &labels(&["A"]),
            theme,
            &mut press,
            &RenderOptions::default(),
            None,
        );

        let discs = frame
            .commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Circle { fill: Some(_), .. }))
            .count();
        assert_eq!(discs, 1);
        assert!(frame.commands.iter().any(|cmd| matches!(
            cmd,
            DrawCommand::Text { color, .. } if color.color == RgbColor::BLACK
        )));
    }

    #[test]
    fn test_dynamic_background_and_ripples() {
        let theme = Theme::by_name("psychedelic").unwrap();
        let mut press = PressState::new();
        let animation = Animation {
            phase: 0.25,
            ripple_origin: Some((50.0, 50.0)),
        };
        let (frame, _) = compose(
            (100.0, 100.0),
            &row(1),
            &labels(&["A"]),
            theme,
            &mut press,
            &RenderOptions::default(),
            Some(&animation),
        );

        assert!(matches!(
            frame.commands[0],
            DrawCommand::Background(Background::Gradient(_))
        ));
        let rings = frame
            .commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Circle { fill: None, .. }))
            .count();
        assert_eq!(rings, RIPPLE_RINGS);
    }

    #[test]
    fn test_static_theme_has_solid_background() {
        let theme = Theme::light();
        let mut press = PressState::new();
        let (frame, _) = compose(
            (100.0, 100.0),
            &row(1),
            &labels(&["A"]),
            theme,
            &mut press,
            &RenderOptions {
                key_shadow: false,
                ..RenderOptions::default()
            },
            None,
        );
        assert_eq!(
            frame.commands[0],
            DrawCommand::Background(Background::Solid(theme.background))
        );
        assert!(frame.commands.iter().all(|cmd| !matches!(
            cmd,
            DrawCommand::RoundedRect { shadow: Some(_), .. }
        )));
    }
}
