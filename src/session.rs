use std::path::Path;

use anyhow::Context as _;

use crate::{
    carousel::{Carousel, Transition},
    catalog::{Catalog, Category},
    compose::{self, FrameInput},
    core::{Canvas, FrameIndex, Fps},
    error::{ShowroomError, ShowroomResult},
    motion::{CarPose, DetailsTimeline, PanelPose, SlideTimeline, LIFT_SCALE, LIFT_Y_PX},
    scene::Scene,
};

/// The four interaction affordances plus the category selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum InputEvent {
    Next,
    Prev,
    OpenDetails,
    CloseDetails,
    SelectCategory(Category),
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct TimedEvent {
    pub at_frame: FrameIndex,
    pub event: InputEvent,
}

/// A scripted showroom run: input events pinned to frames of a fixed-length
/// timeline. Loadable from JSON.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Script {
    pub fps: Fps,
    pub canvas: Canvas,
    pub duration: FrameIndex, // total frames
    pub events: Vec<TimedEvent>,
}

impl Script {
    pub fn validate(&self) -> ShowroomResult<()> {
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(ShowroomError::validation("fps must have num>0 and den>0"));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ShowroomError::validation("canvas width/height must be > 0"));
        }
        if self.duration.0 == 0 {
            return Err(ShowroomError::validation("duration must be > 0 frames"));
        }
        if !self
            .events
            .windows(2)
            .all(|w| w[0].at_frame.0 <= w[1].at_frame.0)
        {
            return Err(ShowroomError::validation(
                "script events must be sorted by at_frame",
            ));
        }
        for ev in &self.events {
            if ev.at_frame.0 >= self.duration.0 {
                return Err(ShowroomError::validation(format!(
                    "event at frame {} is outside the script duration {}",
                    ev.at_frame.0, self.duration.0
                )));
            }
        }
        Ok(())
    }

    pub fn from_json_path(path: &Path) -> ShowroomResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read script '{}'", path.display()))?;
        let script: Self = serde_json::from_slice(&bytes).with_context(|| "parse script JSON")?;
        script.validate()?;
        Ok(script)
    }

    /// A built-in tour: navigate both ways, open and close the details panel,
    /// switch catalogs. Includes one click issued mid-slide, which the guard
    /// drops, like it would a real user's impatient second click.
    pub fn demo() -> Self {
        let ev = |at: u64, event: InputEvent| TimedEvent {
            at_frame: FrameIndex(at),
            event,
        };
        Self {
            fps: Fps { num: 30, den: 1 },
            canvas: Canvas {
                width: 1280,
                height: 720,
            },
            duration: FrameIndex(420),
            events: vec![
                ev(30, InputEvent::Next),
                ev(36, InputEvent::Next), // dropped: previous slide still in flight
                ev(75, InputEvent::Next),
                ev(130, InputEvent::OpenDetails),
                ev(220, InputEvent::CloseDetails),
                ev(260, InputEvent::Prev),
                ev(320, InputEvent::SelectCategory(Category::Master)),
                ev(350, InputEvent::Next),
            ],
        }
    }
}

/// Top-level shell: the active category and the carousel mounted for it.
/// Switching categories discards the carousel and mounts a fresh one; index
/// and guard state never survive a switch.
#[derive(Clone, Debug)]
pub struct Showroom {
    category: Category,
    carousel: Carousel,
}

impl Showroom {
    pub fn new(category: Category) -> ShowroomResult<Self> {
        Ok(Self {
            category,
            carousel: Carousel::new(Catalog::builtin(category))?,
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn carousel_mut(&mut self) -> &mut Carousel {
        &mut self.carousel
    }

    pub fn switch_category(&mut self, category: Category) -> ShowroomResult<()> {
        self.category = category;
        self.carousel = Carousel::new(Catalog::builtin(category))?;
        tracing::debug!(%category, "category switched, carousel remounted");
        Ok(())
    }
}

struct ActiveSlide {
    timeline: SlideTimeline,
    start: FrameIndex,
    transition: Transition,
}

struct ActiveDetails {
    timeline: DetailsTimeline,
    start: FrameIndex,
}

/// One frame's sampled poses, before records are resolved: the displayed
/// car, the panel, and the outgoing ghost (by index) while a slide runs.
struct FramePoses {
    car: CarPose,
    panel: PanelPose,
    ghost: Option<(usize, CarPose)>,
}

/// Single-threaded, frame-clocked player. All state changes happen inside
/// [`Session::advance_to`], either from a scripted input or from a timeline
/// completing; the controller's guards serialize everything else. A started
/// slide always runs to completion and its completion fires exactly once.
pub struct Session {
    script: Script,
    showroom: Showroom,
    clock: FrameIndex,
    cursor: usize,
    slide: Option<ActiveSlide>,
    details: Option<ActiveDetails>,
}

impl Session {
    pub fn new(script: Script) -> ShowroomResult<Self> {
        script.validate()?;
        let mut session = Self {
            script,
            showroom: Showroom::new(Category::Collection)?,
            clock: FrameIndex(0),
            cursor: 0,
            slide: None,
            details: None,
        };
        session.step(FrameIndex(0))?;
        Ok(session)
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn showroom(&self) -> &Showroom {
        &self.showroom
    }

    pub fn clock(&self) -> FrameIndex {
        self.clock
    }

    /// Process every frame up to and including `frame`. The clock only moves
    /// forward; rendering a frame twice means replaying the whole script.
    #[tracing::instrument(skip(self))]
    pub fn advance_to(&mut self, frame: FrameIndex) -> ShowroomResult<()> {
        if frame.0 < self.clock.0 {
            return Err(ShowroomError::state(format!(
                "session clock cannot move backwards (at {}, asked for {})",
                self.clock.0, frame.0
            )));
        }
        for f in (self.clock.0 + 1)..=frame.0 {
            self.step(FrameIndex(f))?;
        }
        self.clock = frame;
        Ok(())
    }

    fn step(&mut self, frame: FrameIndex) -> ShowroomResult<()> {
        // Timeline completions first, so an input scheduled on the completion
        // frame sees the carousel idle again.
        if let Some(slide) = &self.slide {
            let local = FrameIndex(frame.0 - slide.start.0);
            if slide.timeline.finished(local) {
                self.showroom.carousel_mut().complete_transition()?;
                self.slide = None;
            }
        }
        if let Some(details) = &self.details {
            let local = FrameIndex(frame.0 - details.start.0);
            if details.timeline.finished(local) {
                self.details = None;
            }
        }

        while self.cursor < self.script.events.len()
            && self.script.events[self.cursor].at_frame.0 == frame.0
        {
            let event = self.script.events[self.cursor].event;
            self.cursor += 1;
            self.apply(event, frame)?;
        }
        Ok(())
    }

    fn apply(&mut self, event: InputEvent, frame: FrameIndex) -> ShowroomResult<()> {
        let fps = self.script.fps;
        match event {
            InputEvent::Next | InputEvent::Prev => {
                let carousel = self.showroom.carousel_mut();
                let planned = match event {
                    InputEvent::Next => carousel.next(),
                    _ => carousel.prev(),
                };
                match planned {
                    Some(transition) => {
                        self.slide = Some(ActiveSlide {
                            timeline: SlideTimeline::new(transition.direction, fps),
                            start: frame,
                            transition,
                        });
                    }
                    // Guard held: a real click would bounce off too.
                    None => tracing::debug!(?event, frame = frame.0, "navigation ignored"),
                }
            }
            InputEvent::OpenDetails => {
                if self.showroom.carousel_mut().open_details() {
                    let (car, panel) = self.current_details_poses(frame);
                    self.details = Some(ActiveDetails {
                        timeline: DetailsTimeline::open_from(car, panel, fps),
                        start: frame,
                    });
                } else {
                    tracing::debug!(frame = frame.0, "open_details ignored");
                }
            }
            InputEvent::CloseDetails => {
                // Overlay click and explicit close both land here; poses are
                // captured before the phase flips back to idle.
                let (car, panel) = self.current_details_poses(frame);
                if self.showroom.carousel_mut().close_details() {
                    self.details = Some(ActiveDetails {
                        timeline: DetailsTimeline::close_from(car, panel, fps),
                        start: frame,
                    });
                } else {
                    tracing::debug!(frame = frame.0, "close_details ignored");
                }
            }
            InputEvent::SelectCategory(category) => {
                // Remount: any in-flight animation dies with the old carousel.
                self.showroom.switch_category(category)?;
                self.slide = None;
                self.details = None;
            }
        }
        Ok(())
    }

    /// Car and panel poses as currently displayed, for starting a details
    /// timeline from an interrupted one.
    fn current_details_poses(&self, frame: FrameIndex) -> (CarPose, PanelPose) {
        if let Some(details) = &self.details {
            let local = FrameIndex(frame.0 - details.start.0);
            let poses = details.timeline.sample(local);
            (poses.car, poses.panel)
        } else if self.showroom.carousel().details_open() {
            (
                CarPose {
                    y_px: LIFT_Y_PX,
                    scale: LIFT_SCALE,
                    ..CarPose::rest()
                },
                PanelPose::open(),
            )
        } else {
            (CarPose::rest(), PanelPose::closed())
        }
    }

    /// Sampled car/panel poses for the current clock. The details lift is a
    /// wrapper channel: it keeps running even when a slide starts before it
    /// lands, and the slide composites inside it (y adds onto the wrapper
    /// offset, scale multiplies), so an accepted navigation never snaps a
    /// mid-flight lift back to rest.
    fn frame_poses(&self) -> FramePoses {
        let frame = self.clock;

        let mut car = CarPose::rest();
        let mut panel = PanelPose::closed();
        let mut ghost = None;

        if let Some(details) = &self.details {
            let local = FrameIndex(frame.0 - details.start.0);
            let poses = details.timeline.sample(local);
            car = poses.car;
            panel = poses.panel;
        } else if self.showroom.carousel().details_open() {
            car = CarPose {
                y_px: LIFT_Y_PX,
                scale: LIFT_SCALE,
                ..CarPose::rest()
            };
            panel = PanelPose::open();
        }

        if let Some(slide) = &self.slide {
            let local = FrameIndex(frame.0 - slide.start.0);
            let poses = slide.timeline.sample(local);
            let wrapper_y = car.y_px;
            let wrapper_scale = car.scale;

            car = poses.incoming;
            car.y_px = wrapper_y;
            car.scale *= wrapper_scale;

            let mut outgoing = poses.outgoing;
            outgoing.y_px = wrapper_y;
            outgoing.scale *= wrapper_scale;
            ghost = Some((slide.transition.from_index, outgoing));
        }

        FramePoses { car, panel, ghost }
    }

    /// Pure per-frame output: the composed scene at the current clock.
    pub fn frame_scene(&self) -> ShowroomResult<Scene> {
        let carousel = self.showroom.carousel();
        let catalog = carousel.catalog();

        let FramePoses { car, panel, ghost } = self.frame_poses();
        let ghost = match ghost {
            Some((from_index, pose)) => Some((catalog.get(from_index)?, pose)),
            None => None,
        };

        compose::compose_frame(&FrameInput {
            canvas: self.script.canvas,
            category: self.showroom.category(),
            record: carousel.current(),
            ghost,
            car,
            panel,
            details_open: carousel.details_open(),
            animating: carousel.is_animating(),
            index: carousel.current_index(),
            catalog_len: catalog.len(),
        })
    }
}
