//! SVG backend for the canvas seam.

use std::fmt::Write;

use super::canvas::{Background, Canvas, DrawCommand, Frame, Rgba, Shadow};

const FONT_FAMILY: &str = "Inter, sans-serif";

/// Canvas that serializes the last presented frame as an SVG document.
#[derive(Debug, Clone, Default)]
pub struct SvgCanvas {
    width: f64,
    height: f64,
    document: String,
}

impl SvgCanvas {
    /// Creates an SVG canvas of the given pixel size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        let mut canvas = Self {
            width,
            height,
            document: String::new(),
        };
        canvas.document = render_svg(&Frame::new(width, height));
        canvas
    }

    /// The SVG text of the last presented frame.
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    /// Consumes the canvas and returns the SVG text.
    #[must_use]
    pub fn into_document(self) -> String {
        self.document
    }
}

impl Canvas for SvgCanvas {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn present(&mut self, frame: Frame) {
        self.document = render_svg(&frame);
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn paint(rgba: Rgba) -> String {
    if rgba.alpha >= 1.0 {
        rgba.color.to_hex()
    } else {
        format!(
            "rgba({},{},{},{:.3})",
            rgba.color.r, rgba.color.g, rgba.color.b, rgba.alpha
        )
    }
}

fn shadow_filter_id(shadow: &Shadow) -> String {
    format!(
        "shadow-{}-{}-{}",
        shadow.blur, shadow.offset_x, shadow.offset_y
    )
    .replace('.', "_")
}

/// Renders `frame` into a standalone SVG document.
#[must_use]
pub fn render_svg(frame: &Frame) -> String {
    let mut out = String::new();
    let (width, height) = (frame.width, frame.height);

    // Writing to a String cannot fail.
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );

    let mut defs = String::new();
    let mut gradient_count = 0usize;
    let mut shadows: Vec<Shadow> = Vec::new();
    let mut body = String::new();

    for command in &frame.commands {
        match command {
            DrawCommand::Background(Background::Solid(color)) => {
                let _ = writeln!(
                    body,
                    r#"  <rect x="0" y="0" width="{width}" height="{height}" fill="{}"/>"#,
                    color.to_hex()
                );
            }
            DrawCommand::Background(Background::Gradient(stops)) => {
                gradient_count += 1;
                let id = format!("bg-{gradient_count}");
                let _ = writeln!(
                    defs,
                    r#"    <linearGradient id="{id}" x1="0" y1="0" x2="1" y2="1">"#
                );
                for (offset, color) in stops {
                    let _ = writeln!(
                        defs,
                        r#"      <stop offset="{:.3}" stop-color="{}"/>"#,
                        offset,
                        color.to_hex()
                    );
                }
                let _ = writeln!(defs, "    </linearGradient>");
                let _ = writeln!(
                    body,
                    r#"  <rect x="0" y="0" width="{width}" height="{height}" fill="url(#{id})"/>"#
                );
            }
            DrawCommand::RoundedRect {
                cx,
                cy,
                w,
                h,
                radius,
                rotation,
                fill,
                stroke,
                stroke_width,
                shadow,
            } => {
                let filter = shadow.map_or_else(String::new, |s| {
                    if !shadows.contains(&s) {
                        shadows.push(s);
                    }
                    format!(r#" filter="url(#{})""#, shadow_filter_id(&s))
                });
                let _ = writeln!(
                    body,
                    r#"  <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="{radius}" transform="rotate({rotation} {cx:.2} {cy:.2})" fill="{}" stroke="{}" stroke-width="{stroke_width}"{filter}/>"#,
                    cx - w / 2.0,
                    cy - h / 2.0,
                    w,
                    h,
                    paint(*fill),
                    paint(*stroke),
                );
            }
            DrawCommand::Circle {
                cx,
                cy,
                radius,
                fill,
                stroke,
                stroke_width,
            } => {
                let fill = fill.map_or_else(|| "none".to_string(), paint);
                let stroke = stroke.map_or_else(|| "none".to_string(), paint);
                let _ = writeln!(
                    body,
                    r#"  <circle cx="{cx:.2}" cy="{cy:.2}" r="{radius:.2}" fill="{fill}" stroke="{stroke}" stroke-width="{stroke_width}"/>"#
                );
            }
            DrawCommand::Text {
                x,
                y,
                text,
                size,
                rotation,
                color,
            } => {
                let _ = writeln!(
                    body,
                    r#"  <text x="{x:.2}" y="{y:.2}" font-family="{FONT_FAMILY}" font-size="{size:.2}" text-anchor="middle" dominant-baseline="central" transform="rotate({rotation} {x:.2} {y:.2})" fill="{}">{}</text>"#,
                    paint(*color),
                    escape_xml(text)
                );
            }
        }
    }

    for shadow in &shadows {
        let _ = writeln!(
            defs,
            r#"    <filter id="{}" x="-20%" y="-20%" width="140%" height="140%"><feDropShadow dx="{}" dy="{}" stdDeviation="{}" flood-color="{}" flood-opacity="{}"/></filter>"#,
            shadow_filter_id(shadow),
            shadow.offset_x,
            shadow.offset_y,
            shadow.blur / 2.0,
            shadow.color.color.to_hex(),
            shadow.color.alpha
        );
    }

    if !defs.is_empty() {
        out.push_str("  <defs>\n");
        out.push_str(&defs);
        out.push_str("  </defs>\n");
    }
    out.push_str(&body);
    out.push_str("</svg>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RgbColor;

    #[test]
    fn test_cleared_canvas_is_empty_svg() {
        let canvas = SvgCanvas::new(200.0, 100.0);
        assert!(canvas.document().starts_with("<svg"));
        assert!(canvas.document().contains(r#"width="200""#));
        assert!(!canvas.document().contains("<rect"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut frame = Frame::new(10.0, 10.0);
        frame.commands.push(DrawCommand::Text {
            x: 5.0,
            y: 5.0,
            text: "<&>".to_string(),
            size: 12.0,
            rotation: 0.0,
            color: Rgba::opaque(RgbColor::BLACK),
        });
        let svg = render_svg(&frame);
        assert!(svg.contains("&lt;&amp;&gt;</text>"));
    }

    #[test]
    fn test_shadow_filter_defined_once() {
        let mut canvas = SvgCanvas::new(100.0, 100.0);
        let mut frame = Frame::new(100.0, 100.0);
        for cx in [10.0, 50.0] {
            frame.commands.push(DrawCommand::RoundedRect {
                cx,
                cy: 10.0,
                w: 10.0,
                h: 10.0,
                radius: 4.0,
                rotation: 0.0,
                fill: Rgba::opaque(RgbColor::WHITE),
                stroke: Rgba::opaque(RgbColor::BLACK),
                stroke_width: 1.5,
                shadow: Some(Shadow::key()),
            });
        }
        canvas.present(frame);

        let svg = canvas.into_document();
        assert_eq!(svg.matches("<filter").count(), 1);
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains("flood-opacity=\"0.1\""));
    }

    #[test]
    fn test_translucent_paint() {
        assert_eq!(paint(Rgba::opaque(RgbColor::WHITE)), "#ffffff");
        assert_eq!(paint(Rgba::with_alpha(RgbColor::BLACK, 0.5)), "rgba(0,0,0,0.500)");
    }
}
