use std::path::Path;

use anyhow::Context as _;

use crate::{
    core::Affine,
    error::{ShowroomError, ShowroomResult},
    scene::{Fill, Node, NodeKind, Scene, TextAnchor},
};

/// One rasterized frame, straight or premultiplied RGBA8.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

/// CPU rasterizer: serializes a [`Scene`] to an SVG document and renders it
/// with `resvg`. Text is shaped against the system font database, loaded once
/// per renderer.
pub struct CpuRenderer {
    opts: usvg::Options<'static>,
}

impl CpuRenderer {
    pub fn new() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        let opts = usvg::Options {
            fontdb: std::sync::Arc::new(db),
            ..Default::default()
        };
        Self { opts }
    }

    #[tracing::instrument(skip(self, scene))]
    pub fn render(&self, scene: &Scene) -> ShowroomResult<FrameRgba> {
        let svg = scene_to_svg(scene);
        let tree = usvg::Tree::from_str(&svg, &self.opts)
            .map_err(|e| ShowroomError::render(format!("parse scene svg: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(scene.canvas.width, scene.canvas.height)
            .ok_or_else(|| ShowroomError::render("failed to allocate frame pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );

        Ok(FrameRgba {
            width: scene.canvas.width,
            height: scene.canvas.height,
            data: pixmap.data().to_vec(),
            premultiplied: true,
        })
    }
}

impl Default for CpuRenderer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn write_png(frame: &FrameRgba, path: &Path) -> ShowroomResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let data = if frame.premultiplied {
        unpremultiply_rgba8(&frame.data)
    } else {
        frame.data.clone()
    };

    image::save_buffer_with_format(
        path,
        &data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn unpremultiply_rgba8(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in px.iter_mut().take(3) {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}

/// Serialize a scene into a standalone SVG document. Gradient fills become
/// `<defs>` entries with ids assigned in traversal order, so the output for a
/// given scene is deterministic.
pub fn scene_to_svg(scene: &Scene) -> String {
    let w = scene.canvas.width;
    let h = scene.canvas.height;

    let mut defs = String::new();
    let mut body = String::new();
    let mut gradient_seq = 0usize;

    for node in &scene.nodes {
        write_node(node, &mut body, &mut defs, &mut gradient_seq);
    }

    let mut out = String::with_capacity(body.len() + defs.len() + 512);
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
         viewBox=\"0 0 {w} {h}\">"
    ));
    if !defs.is_empty() {
        out.push_str("<defs>");
        out.push_str(&defs);
        out.push_str("</defs>");
    }
    out.push_str(&format!(
        "<rect width=\"{w}\" height=\"{h}\" fill=\"{}\"/>",
        scene.background.hex()
    ));
    out.push_str(&body);
    out.push_str("</svg>");
    out
}

fn write_node(node: &Node, body: &mut String, defs: &mut String, gradient_seq: &mut usize) {
    let wrapped = node.transform != Affine::IDENTITY || node.opacity < 1.0;
    if wrapped {
        body.push_str("<g");
        if node.transform != Affine::IDENTITY {
            let [a, b, c, d, e, f] = node.transform.as_coeffs();
            body.push_str(&format!(" transform=\"matrix({a} {b} {c} {d} {e} {f})\""));
        }
        if node.opacity < 1.0 {
            body.push_str(&format!(" opacity=\"{}\"", node.opacity));
        }
        body.push('>');
    }

    match &node.kind {
        NodeKind::Group(children) => {
            for child in children {
                write_node(child, body, defs, gradient_seq);
            }
        }
        NodeKind::Path { path, fill, stroke } => {
            body.push_str(&format!("<path d=\"{}\"", path.to_svg()));
            match fill {
                Some(f) => {
                    let paint = fill_paint(f, defs, gradient_seq);
                    body.push_str(&format!(" fill=\"{paint}\""));
                }
                None => body.push_str(" fill=\"none\""),
            }
            if let Some(s) = stroke {
                body.push_str(&format!(
                    " stroke=\"{}\" stroke-width=\"{}\"",
                    s.color.hex(),
                    s.width
                ));
                if s.opacity < 1.0 {
                    body.push_str(&format!(" stroke-opacity=\"{}\"", s.opacity));
                }
                if s.round_cap {
                    body.push_str(" stroke-linecap=\"round\"");
                }
            }
            body.push_str("/>");
        }
        NodeKind::Ellipse {
            center,
            rx,
            ry,
            fill,
        } => {
            let paint = fill_paint(fill, defs, gradient_seq);
            body.push_str(&format!(
                "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{rx}\" ry=\"{ry}\" fill=\"{paint}\"/>",
                center.x, center.y
            ));
        }
        NodeKind::Text(span) => {
            let anchor = match span.anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            body.push_str(&format!(
                "<text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"{}\" \
                 font-weight=\"{}\" letter-spacing=\"{}\" fill=\"{}\" text-anchor=\"{anchor}\">{}</text>",
                span.origin.x,
                span.origin.y,
                span.size,
                span.weight,
                span.letter_spacing,
                span.fill.hex(),
                escape_xml(&span.content)
            ));
        }
    }

    if wrapped {
        body.push_str("</g>");
    }
}

fn fill_paint(fill: &Fill, defs: &mut String, gradient_seq: &mut usize) -> String {
    match fill {
        Fill::Solid(color) => color.hex(),
        Fill::LinearGradient { stops } => {
            let id = format!("g{}", *gradient_seq);
            *gradient_seq += 1;
            defs.push_str(&format!(
                "<linearGradient id=\"{id}\" x1=\"0\" y1=\"0\" x2=\"1\" y2=\"0\">"
            ));
            write_stops(stops, defs);
            defs.push_str("</linearGradient>");
            format!("url(#{id})")
        }
        Fill::RadialGradient { stops } => {
            let id = format!("g{}", *gradient_seq);
            *gradient_seq += 1;
            defs.push_str(&format!("<radialGradient id=\"{id}\">"));
            write_stops(stops, defs);
            defs.push_str("</radialGradient>");
            format!("url(#{id})")
        }
    }
}

fn write_stops(stops: &[crate::scene::GradientStop], defs: &mut String) {
    for stop in stops {
        defs.push_str(&format!(
            "<stop offset=\"{}\" stop-color=\"{}\" stop-opacity=\"{}\"/>",
            stop.offset,
            stop.color.hex(),
            stop.opacity
        ));
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Canvas, Color, Point};
    use crate::scene::{Fill, GradientStop, Node, Scene};

    fn scene(nodes: Vec<Node>) -> Scene {
        Scene {
            canvas: Canvas {
                width: 64,
                height: 64,
            },
            background: Color::rgb(0x38, 0x38, 0x38),
            nodes,
        }
    }

    #[test]
    fn svg_has_background_and_viewbox() {
        let svg = scene_to_svg(&scene(vec![]));
        assert!(svg.contains("viewBox=\"0 0 64 64\""));
        assert!(svg.contains("fill=\"#383838\""));
    }

    #[test]
    fn gradient_ids_are_assigned_in_order() {
        let grad = |offset_color: Color| Fill::LinearGradient {
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: offset_color,
                    opacity: 1.0,
                },
                GradientStop {
                    offset: 1.0,
                    color: Color::rgb(0, 0, 0),
                    opacity: 1.0,
                },
            ],
        };
        let svg = scene_to_svg(&scene(vec![
            Node::circle(Point::new(10.0, 10.0), 5.0, grad(Color::rgb(255, 0, 0))),
            Node::circle(Point::new(20.0, 20.0), 5.0, grad(Color::rgb(0, 255, 0))),
        ]));
        assert!(svg.contains("id=\"g0\""));
        assert!(svg.contains("id=\"g1\""));
        assert!(svg.contains("url(#g0)"));
        assert!(svg.contains("url(#g1)"));
    }

    #[test]
    fn text_content_is_escaped() {
        let svg = scene_to_svg(&scene(vec![Node::text(crate::scene::TextSpan {
            content: "A & B <C>".to_string(),
            origin: Point::new(1.0, 2.0),
            size: 10.0,
            fill: Color::rgb(255, 255, 255),
            anchor: crate::scene::TextAnchor::Start,
            weight: 400,
            letter_spacing: 0.0,
        })]));
        assert!(svg.contains("A &amp; B &lt;C&gt;"));
    }

    #[test]
    fn renders_a_solid_scene_to_opaque_pixels() {
        let renderer = CpuRenderer::new();
        let frame = renderer.render(&scene(vec![])).unwrap();
        assert_eq!(frame.width, 64);
        assert_eq!(frame.data.len(), 64 * 64 * 4);
        // Background is opaque everywhere.
        assert!(frame.data.chunks_exact(4).all(|px| px[3] == 255));
        assert_eq!(&frame.data[0..3], &[0x38, 0x38, 0x38]);
    }

    #[test]
    fn unpremultiply_roundtrips_opaque_pixels() {
        let data = vec![10, 20, 30, 255, 0, 0, 0, 0];
        assert_eq!(unpremultiply_rgba8(&data), data);
    }
}
