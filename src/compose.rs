use kurbo::Shape as _;

use crate::{
    catalog::{CarRecord, Category},
    core::{Affine, Canvas, Color, Point, Rect},
    error::ShowroomResult,
    motion::{CarPose, PanelPose},
    scene::{self, Fill, Node, Scene, Stroke, TextAnchor, TextSpan},
};

pub const BACKDROP: Color = Color::rgb(0x38, 0x38, 0x38);
const BRAND_RED: Color = Color::rgb(0xe6, 0x2e, 0x3d);
const HEADLINE_GRAY: Color = Color::rgb(0x44, 0x44, 0x44);
const LABEL_GRAY: Color = Color::rgb(0x6b, 0x72, 0x80);
const BODY_TEXT: Color = Color::rgb(0xd1, 0xd5, 0xdb);
const DOT_BORDER: Color = Color::rgb(0x4b, 0x55, 0x63);
const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

/// Everything the composer needs for one frame. Car and panel poses arrive
/// already sampled; the composer never looks inside a timeline.
#[derive(Clone, Debug)]
pub struct FrameInput<'a> {
    pub canvas: Canvas,
    pub category: Category,
    pub record: &'a CarRecord,
    /// Outgoing car while a transition is in flight.
    pub ghost: Option<(&'a CarRecord, CarPose)>,
    pub car: CarPose,
    pub panel: PanelPose,
    pub details_open: bool,
    pub animating: bool,
    pub index: usize,
    pub catalog_len: usize,
}

/// Stage rectangle the cars slide across, derived from the canvas.
pub fn stage_rect(canvas: Canvas) -> Rect {
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    let stage_w = w * 0.55;
    let stage_h = stage_w / scene::car_aspect();
    let cx = w / 2.0;
    let cy = h * 0.52;
    Rect::new(
        cx - stage_w / 2.0,
        cy - stage_h / 2.0,
        cx + stage_w / 2.0,
        cy + stage_h / 2.0,
    )
}

/// Compose the full layer stack for one frame: backdrop typography, ghost and
/// active car, details overlay and panel, pagination dots and chrome.
pub fn compose_frame(input: &FrameInput<'_>) -> ShowroomResult<Scene> {
    let canvas = input.canvas;
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    let stage = stage_rect(canvas);

    let mut nodes = Vec::new();

    nodes.push(headline(input, w, h));
    nodes.push(chrome(input, w, h));
    nodes.push(star_sidebar(input, w, h));

    if let Some((ghost_record, ghost_pose)) = &input.ghost {
        nodes.push(scene::build_car(ghost_record, ghost_pose, stage)?);
    }
    nodes.push(scene::build_car(input.record, &input.car, stage)?);

    if input.panel.opacity > 0.0 {
        nodes.push(overlay(input, w, h));
        nodes.push(details_panel(input, w, h));
    }

    nodes.push(action_buttons(input, w, h));
    nodes.push(pagination(input, w, h));
    nodes.push(nav_arrows(input, w, h, stage));

    Ok(Scene {
        canvas,
        background: BACKDROP,
        nodes,
    })
}

/// Backdrop make/model typography behind the car. Dimmed while animating or
/// while the details panel is open, shrunk and lifted while details are open.
fn headline(input: &FrameInput<'_>, w: f64, h: f64) -> Node {
    let dim = input.animating || input.details_open;
    let make_opacity = if input.details_open { 0.0 } else { 1.0 };
    let model_opacity = if dim { 0.3 } else { 1.0 };

    let make = Node::text(TextSpan {
        content: input.record.make.clone(),
        origin: Point::new(w / 2.0, h * 0.17),
        size: h * 0.033,
        fill: LABEL_GRAY,
        anchor: TextAnchor::Middle,
        weight: 700,
        letter_spacing: h * 0.008,
    })
    .with_opacity(make_opacity);

    let model_origin = Point::new(w / 2.0, h * 0.43);
    let mut model = Node::text(TextSpan {
        content: input.record.model_code.clone(),
        origin: model_origin,
        size: h * 0.27,
        fill: HEADLINE_GRAY,
        anchor: TextAnchor::Middle,
        weight: 700,
        letter_spacing: -h * 0.004,
    })
    .with_opacity(model_opacity);

    if input.details_open {
        model = model.with_transform(
            Affine::translate((model_origin.x, model_origin.y - 20.0))
                * Affine::scale(0.9)
                * Affine::translate((-model_origin.x, -model_origin.y)),
        );
    }

    Node::group(vec![make, model])
}

/// Brand box and the two-value category selector.
fn chrome(input: &FrameInput<'_>, w: f64, _h: f64) -> Node {
    let brand_box = Node::path(
        Rect::new(0.0, 0.0, w * 0.17, 46.0).to_path(0.1),
        Fill::Solid(BRAND_RED),
    );
    let brand = Node::text(TextSpan {
        content: "DISTRIMATACHOS".to_string(),
        origin: Point::new(w * 0.085, 29.0),
        size: 13.0,
        fill: WHITE,
        anchor: TextAnchor::Middle,
        weight: 700,
        letter_spacing: 2.0,
    });

    let tab = |label: &str, x: f64, active: bool| {
        Node::text(TextSpan {
            content: label.to_string(),
            origin: Point::new(x, 30.0),
            size: 12.0,
            fill: if active { WHITE } else { LABEL_GRAY },
            anchor: TextAnchor::End,
            weight: 600,
            letter_spacing: 3.0,
        })
    };

    let collection_active = input.category == Category::Collection;
    Node::group(vec![
        brand_box,
        brand,
        tab("COLECCION", w - 140.0, collection_active),
        tab("MASTER", w - 40.0, !collection_active),
    ])
}

/// Five-pointed star path with the classic 0.4 inner radius, apex up.
fn star_path(center: Point, r: f64) -> kurbo::BezPath {
    let inner = r * 0.4;
    let mut path = kurbo::BezPath::new();
    for i in 0..10 {
        let radius = if i % 2 == 0 { r } else { inner };
        let angle = -std::f64::consts::FRAC_PI_2 + i as f64 * std::f64::consts::PI / 5.0;
        let p = (center.x + radius * angle.cos(), center.y + radius * angle.sin());
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path.close_path();
    path
}

/// Rating column on the left edge: five stars tinted with the displayed car's
/// body color, vertically centered.
fn star_sidebar(input: &FrameInput<'_>, w: f64, h: f64) -> Node {
    let cx = w * 0.045;
    let gap = h * 0.055;
    let r = h * 0.014;
    let top = h / 2.0 - 2.0 * gap;

    let stars = (0..5)
        .map(|i| {
            Node::path(
                star_path(Point::new(cx, top + i as f64 * gap), r),
                Fill::Solid(input.record.body),
            )
        })
        .collect();

    Node::group(stars).with_opacity(0.8)
}

/// "Show details" and buy buttons above the pagination dots; hidden together
/// with the nav chevrons while the details panel is up.
fn action_buttons(input: &FrameInput<'_>, w: f64, h: f64) -> Node {
    let opacity = if input.details_open || input.panel.opacity > 0.0 {
        0.0
    } else {
        1.0
    };
    let cx = w / 2.0;
    let y = h * 0.80;
    let btn_w = w * 0.105;
    let btn_h = h * 0.055;
    let gap = w * 0.012;

    let details_rect = Rect::new(cx - gap - btn_w, y - btn_h / 2.0, cx - gap, y + btn_h / 2.0);
    let buy_rect = Rect::new(cx + gap, y - btn_h / 2.0, cx + gap + btn_w, y + btn_h / 2.0);
    let label = |content: &str, rect: Rect, fill: Color| {
        Node::text(TextSpan {
            content: content.to_string(),
            origin: Point::new(rect.center().x, rect.center().y + btn_h * 0.12),
            size: h * 0.016,
            fill,
            anchor: TextAnchor::Middle,
            weight: 600,
            letter_spacing: 2.0,
        })
    };

    Node::group(vec![
        Node::stroked_path(
            details_rect.to_path(0.1),
            Stroke {
                color: LABEL_GRAY,
                width: 1.0,
                opacity: 1.0,
                round_cap: false,
            },
        ),
        label("SHOW DETAILS", details_rect, BODY_TEXT),
        Node::path(buy_rect.to_path(0.1), Fill::Solid(BRAND_RED)),
        label("COMPRAR", buy_rect, WHITE),
    ])
    .with_opacity(opacity)
}

/// Full-screen click-through overlay behind the details panel.
fn overlay(input: &FrameInput<'_>, w: f64, h: f64) -> Node {
    Node::path(
        Rect::new(0.0, 0.0, w, h).to_path(0.1),
        Fill::Solid(Color::rgb(0, 0, 0)),
    )
    .with_opacity(0.2 * input.panel.opacity)
}

fn details_panel(input: &FrameInput<'_>, w: f64, h: f64) -> Node {
    let record = input.record;
    let cx = w / 2.0;
    let top = h * 0.60;

    let mut children = vec![
        Node::text(TextSpan {
            content: record.make.clone(),
            origin: Point::new(cx - 8.0, top),
            size: h * 0.05,
            fill: WHITE,
            anchor: TextAnchor::End,
            weight: 700,
            letter_spacing: 1.0,
        }),
        Node::text(TextSpan {
            content: record.model_code.clone(),
            origin: Point::new(cx + 8.0, top),
            size: h * 0.05,
            fill: record.body,
            anchor: TextAnchor::Start,
            weight: 700,
            letter_spacing: 1.0,
        }),
        Node::text(TextSpan {
            content: format!("{}   |   {}", record.engine, record.speed),
            origin: Point::new(cx, top + h * 0.055),
            size: h * 0.022,
            fill: LABEL_GRAY,
            anchor: TextAnchor::Middle,
            weight: 500,
            letter_spacing: 3.0,
        }),
    ];

    let mut line_y = top + h * 0.10;
    for line in wrap_text(&record.description, 64) {
        children.push(Node::text(TextSpan {
            content: line,
            origin: Point::new(cx, line_y),
            size: h * 0.025,
            fill: BODY_TEXT,
            anchor: TextAnchor::Middle,
            weight: 300,
            letter_spacing: 0.0,
        }));
        line_y += h * 0.035;
    }

    children.push(Node::text(TextSpan {
        content: record.price.clone(),
        origin: Point::new(cx, line_y + h * 0.035),
        size: h * 0.04,
        fill: WHITE,
        anchor: TextAnchor::Middle,
        weight: 700,
        letter_spacing: 0.0,
    }));

    Node::group(children)
        .with_transform(Affine::translate((0.0, input.panel.y_px)))
        .with_opacity(input.panel.opacity)
}

fn pagination(input: &FrameInput<'_>, w: f64, h: f64) -> Node {
    let spacing = 22.0;
    let total = input.catalog_len as f64;
    let start_x = w / 2.0 - (total - 1.0) * spacing / 2.0;
    let y = h * 0.92;

    let dots = (0..input.catalog_len)
        .map(|i| {
            let center = Point::new(start_x + i as f64 * spacing, y);
            if i == input.index {
                Node::circle(center, 4.0, Fill::Solid(WHITE))
            } else {
                Node::stroked_path(
                    kurbo::Circle::new(center, 3.0).to_path(0.1),
                    Stroke {
                        color: DOT_BORDER,
                        width: 1.0,
                        opacity: 1.0,
                        round_cap: false,
                    },
                )
            }
        })
        .collect();

    Node::group(dots)
}

/// Previous/next chevrons; hidden while the details panel is open.
fn nav_arrows(input: &FrameInput<'_>, w: f64, _h: f64, stage: Rect) -> Node {
    let opacity = if input.details_open || input.panel.opacity > 0.0 {
        0.0
    } else {
        1.0
    };
    let y = stage.center().y;
    let size = 14.0;

    let chevron = |x: f64, pointing_left: bool| {
        let dx = if pointing_left { size } else { -size };
        let mut path = kurbo::BezPath::new();
        path.move_to((x + dx, y - size));
        path.line_to((x, y));
        path.line_to((x + dx, y + size));
        Node::stroked_path(
            path,
            Stroke {
                color: BODY_TEXT,
                width: 3.0,
                opacity: 0.8,
                round_cap: true,
            },
        )
    };

    Node::group(vec![chevron(w * 0.06, true), chevron(w * 0.94, false)]).with_opacity(opacity)
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
