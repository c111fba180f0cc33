use kurbo::Shape as _;

use crate::{
    core::{Affine, BezPath, Canvas, Color, Point, Rect},
    error::ShowroomResult,
    motion::CarPose,
};

/// A renderable vector tree for one frame. Nodes are drawn in order.
#[derive(Clone, Debug)]
pub struct Scene {
    pub canvas: Canvas,
    pub background: Color,
    pub nodes: Vec<Node>,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub transform: Affine,
    pub opacity: f64,
    pub kind: NodeKind,
}

impl Node {
    pub fn group(children: Vec<Node>) -> Self {
        Self {
            transform: Affine::IDENTITY,
            opacity: 1.0,
            kind: NodeKind::Group(children),
        }
    }

    pub fn path(path: BezPath, fill: Fill) -> Self {
        Self {
            transform: Affine::IDENTITY,
            opacity: 1.0,
            kind: NodeKind::Path {
                path,
                fill: Some(fill),
                stroke: None,
            },
        }
    }

    pub fn stroked_path(path: BezPath, stroke: Stroke) -> Self {
        Self {
            transform: Affine::IDENTITY,
            opacity: 1.0,
            kind: NodeKind::Path {
                path,
                fill: None,
                stroke: Some(stroke),
            },
        }
    }

    pub fn ellipse(center: Point, rx: f64, ry: f64, fill: Fill) -> Self {
        Self {
            transform: Affine::IDENTITY,
            opacity: 1.0,
            kind: NodeKind::Ellipse {
                center,
                rx,
                ry,
                fill,
            },
        }
    }

    pub fn circle(center: Point, r: f64, fill: Fill) -> Self {
        Self::ellipse(center, r, r, fill)
    }

    pub fn text(span: TextSpan) -> Self {
        Self {
            transform: Affine::IDENTITY,
            opacity: 1.0,
            kind: NodeKind::Text(span),
        }
    }

    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    Path {
        path: BezPath,
        fill: Option<Fill>,
        stroke: Option<Stroke>,
    },
    Ellipse {
        center: Point,
        rx: f64,
        ry: f64,
        fill: Fill,
    },
    Text(TextSpan),
    Group(Vec<Node>),
}

#[derive(Clone, Debug)]
pub struct TextSpan {
    pub content: String,
    pub origin: Point,
    pub size: f64,
    pub fill: Color,
    pub anchor: TextAnchor,
    pub weight: u16,
    pub letter_spacing: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Clone, Debug)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    pub opacity: f64,
    pub round_cap: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Color,
    pub opacity: f64,
}

#[derive(Clone, Debug)]
pub enum Fill {
    Solid(Color),
    /// Horizontal two-ended gradient across the filled shape's bounding box.
    LinearGradient { stops: Vec<GradientStop> },
    /// Centered radial gradient across the filled shape's bounding box.
    RadialGradient { stops: Vec<GradientStop> },
}

// Car illustration geometry, in a local 600x220 coordinate space.
const CAR_LOCAL_W: f64 = 600.0;
const CAR_LOCAL_H: f64 = 220.0;
const CAR_CENTER: Point = Point::new(300.0, 110.0);

const CHASSIS_D: &str = "M50,130 C50,130 60,100 120,90 L240,85 L300,50 L460,55 L520,95 \
                         L560,100 C560,100 590,105 590,130 L590,160 L570,160 C570,160 \
                         565,130 515,130 C465,130 460,160 460,160 L180,160 C180,160 \
                         175,130 125,130 C75,130 70,160 70,160 L50,160 Z";
const WINDOWS_D: &str = "M250,88 L305,55 L450,60 L510,95 Z";
const HEADLIGHT_D: &str = "M560,105 L580,110 L560,120 Z";
const TAIL_LIGHT_D: &str = "M50,115 L60,115 L60,125 L50,120 Z";
const REAR_SPOKES_D: &str = "M125,135 L125,185 M100,160 L150,160 M108,142 L142,178 \
                             M142,142 L108,178";
const FRONT_SPOKES_D: &str = "M515,135 L515,185 M490,160 L540,160 M498,142 L532,178 \
                              M532,142 L498,178";

const REAR_HUB: Point = Point::new(125.0, 160.0);
const FRONT_HUB: Point = Point::new(515.0, 160.0);
const WHEEL_R: f64 = 32.0;
const RIM_R: f64 = 28.0;
const HUB_R: f64 = 8.0;

/// The aspect ratio the car stage keeps regardless of canvas size.
pub fn car_aspect() -> f64 {
    CAR_LOCAL_W / CAR_LOCAL_H
}

/// Build one car as a scene node: floor shadow, gradient-filled chassis with
/// window/light details, and two wheel groups rotated independently about
/// their hubs. A pure function of record, pose and stage; the returned
/// container transform is derived from the pose alone.
pub fn build_car(
    record: &crate::catalog::CarRecord,
    pose: &CarPose,
    stage: Rect,
) -> ShowroomResult<Node> {
    let fit = stage.width() / CAR_LOCAL_W;
    let cx = stage.center().x + pose.x_frac * stage.width();
    let cy = stage.center().y + pose.y_px;

    let container = Affine::translate((cx, cy))
        * Affine::scale(fit * pose.scale)
        * Affine::translate((-CAR_CENTER.x, -CAR_CENTER.y));

    let body_gradient = Fill::LinearGradient {
        stops: vec![
            GradientStop {
                offset: 0.0,
                color: record.accent,
                opacity: 1.0,
            },
            GradientStop {
                offset: 0.5,
                color: record.body,
                opacity: 1.0,
            },
            GradientStop {
                offset: 1.0,
                color: record.accent,
                opacity: 1.0,
            },
        ],
    };

    let floor_shadow = Node::ellipse(
        Point::new(300.0, 190.0),
        280.0,
        20.0,
        Fill::RadialGradient {
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: Color::rgb(0, 0, 0),
                    opacity: 0.8,
                },
                GradientStop {
                    offset: 1.0,
                    color: Color::rgb(0, 0, 0),
                    opacity: 0.0,
                },
            ],
        },
    );

    let mut chassis = Node::path(parse_path(CHASSIS_D)?, body_gradient);
    if let NodeKind::Path { stroke, .. } = &mut chassis.kind {
        *stroke = Some(Stroke {
            color: Color::rgb(255, 255, 255),
            width: 1.0,
            opacity: 0.2,
            round_cap: false,
        });
    }

    let chassis_group = Node::group(vec![
        chassis,
        Node::path(parse_path(WINDOWS_D)?, Fill::Solid(Color::rgb(0, 0, 0))).with_opacity(0.6),
        Node::path(
            parse_path(HEADLIGHT_D)?,
            Fill::Solid(Color::rgb(0xfb, 0xbf, 0x24)),
        ),
        Node::path(
            parse_path(TAIL_LIGHT_D)?,
            Fill::Solid(Color::rgb(0xef, 0x44, 0x44)),
        ),
    ]);

    let rear_wheel = wheel(REAR_HUB, REAR_SPOKES_D, pose.wheel_turns)?;
    let front_wheel = wheel(FRONT_HUB, FRONT_SPOKES_D, pose.wheel_turns)?;

    Ok(
        Node::group(vec![floor_shadow, chassis_group, rear_wheel, front_wheel])
            .with_transform(container)
            .with_opacity(pose.opacity),
    )
}

fn wheel(hub: Point, spokes_d: &str, turns: f64) -> ShowroomResult<Node> {
    let angle = turns * std::f64::consts::TAU;
    let spin = Affine::translate((hub.x, hub.y))
        * Affine::rotate(angle)
        * Affine::translate((-hub.x, -hub.y));

    let tire = Node::circle(hub, WHEEL_R, Fill::Solid(Color::rgb(0x05, 0x05, 0x05)));
    let rim = Node::stroked_path(
        kurbo::Circle::new(hub, RIM_R).to_path(0.1),
        Stroke {
            color: Color::rgb(0x33, 0x33, 0x33),
            width: 2.0,
            opacity: 1.0,
            round_cap: false,
        },
    );
    let spokes = Node::stroked_path(
        parse_path(spokes_d)?,
        Stroke {
            color: Color::rgb(0x99, 0x99, 0x99),
            width: 3.0,
            opacity: 1.0,
            round_cap: true,
        },
    );
    let hub_cap = Node::circle(hub, HUB_R, Fill::Solid(Color::rgb(0xe6, 0x2e, 0x3d)));

    Ok(Node::group(vec![tire, rim, spokes, hub_cap]).with_transform(spin))
}

fn parse_path(d: &str) -> ShowroomResult<BezPath> {
    BezPath::from_svg(d)
        .map_err(|e| crate::error::ShowroomError::render(format!("bad path data: {e}")))
}
