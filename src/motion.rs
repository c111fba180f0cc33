use crate::{
    anim::Tween,
    carousel::Direction,
    core::{FrameIndex, FrameRange, Fps},
    ease::Ease,
};

/// Horizontal slide of a full transition, in seconds.
pub const SLIDE_SECS: f64 = 0.7;
/// Off-screen parking position, as a fraction of the stage width.
pub const OFFSCREEN_X_FRAC: f64 = 1.4;
/// Scale applied to a car while it is in transit.
pub const TRANSIT_SCALE: f64 = 0.9;
/// Full signed wheel revolutions per transition.
pub const WHEEL_TURNS: f64 = 1.0;

/// Resting vertical offset of the car wrapper, in stage pixels.
pub const REST_Y_PX: f64 = -30.0;
/// Lifted offset while the details panel is open.
pub const LIFT_Y_PX: f64 = -120.0;
pub const LIFT_SCALE: f64 = 0.85;
pub const LIFT_OPEN_SECS: f64 = 0.5;
pub const LIFT_CLOSE_SECS: f64 = 0.5;

pub const PANEL_FADE_IN_SECS: f64 = 0.4;
pub const PANEL_FADE_IN_DELAY_SECS: f64 = 0.2;
pub const PANEL_FADE_OUT_SECS: f64 = 0.3;
/// The panel slides up from this offset while fading in.
pub const PANEL_RISE_PX: f64 = 50.0;

/// The animatable targets of one rendered car for one frame. This is the
/// whole surface the controller side is allowed to drive; the scene builder
/// maps a pose onto its container and wheel groups and exposes nothing else.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CarPose {
    /// Horizontal offset from stage center, as a fraction of stage width.
    pub x_frac: f64,
    /// Vertical offset of the car wrapper, in stage pixels.
    pub y_px: f64,
    pub scale: f64,
    pub opacity: f64,
    /// Signed wheel rotation in full revolutions.
    pub wheel_turns: f64,
}

impl CarPose {
    pub fn rest() -> Self {
        Self {
            x_frac: 0.0,
            y_px: REST_Y_PX,
            scale: 1.0,
            opacity: 1.0,
            wheel_turns: 0.0,
        }
    }
}

/// Details panel targets for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelPose {
    pub opacity: f64,
    pub y_px: f64,
}

impl PanelPose {
    pub fn closed() -> Self {
        Self {
            opacity: 0.0,
            y_px: PANEL_RISE_PX,
        }
    }

    pub fn open() -> Self {
        Self {
            opacity: 1.0,
            y_px: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlidePoses {
    pub outgoing: CarPose,
    pub incoming: CarPose,
}

/// The index-transition timeline: four concurrent tracks (outgoing container,
/// outgoing wheels, incoming container, incoming wheels) sharing frame 0 as
/// their start anchor.
///
/// After the final frame, [`SlideTimeline::sample`] reports the incoming car
/// at exactly [`CarPose::rest`]: transient transform overrides do not survive
/// a finished transition, so repeated transitions cannot accumulate drift.
#[derive(Clone, Debug)]
pub struct SlideTimeline {
    duration: u64,
    out_x: Tween<f64>,
    out_opacity: Tween<f64>,
    out_scale: Tween<f64>,
    out_wheels: Tween<f64>,
    in_x: Tween<f64>,
    in_scale: Tween<f64>,
    in_wheels: Tween<f64>,
}

impl SlideTimeline {
    pub fn new(direction: Direction, fps: Fps) -> Self {
        let duration = fps.secs_to_frames_round(SLIDE_SECS);
        let range = FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(duration),
        };
        let sign = direction.signum();
        let ease = Ease::InOutQuad;

        Self {
            duration,
            out_x: Tween::new(range, 0.0, sign * OFFSCREEN_X_FRAC, ease),
            out_opacity: Tween::new(range, 1.0, 0.0, ease),
            out_scale: Tween::new(range, 1.0, TRANSIT_SCALE, ease),
            out_wheels: Tween::new(range, 0.0, sign * WHEEL_TURNS, ease),
            in_x: Tween::new(range, -sign * OFFSCREEN_X_FRAC, 0.0, ease),
            in_scale: Tween::new(range, TRANSIT_SCALE, 1.0, ease),
            in_wheels: Tween::new(range, 0.0, sign * WHEEL_TURNS, ease),
        }
    }

    pub fn duration_frames(&self) -> u64 {
        self.duration
    }

    pub fn finished(&self, frame: FrameIndex) -> bool {
        frame.0 >= self.duration
    }

    pub fn sample(&self, frame: FrameIndex) -> SlidePoses {
        if self.finished(frame) {
            // clearProps: once the slide is over the incoming car is governed
            // by normal layout again, not by leftover tween values.
            return SlidePoses {
                outgoing: CarPose {
                    x_frac: self.out_x.to,
                    y_px: REST_Y_PX,
                    scale: self.out_scale.to,
                    opacity: 0.0,
                    wheel_turns: self.out_wheels.to,
                },
                incoming: CarPose::rest(),
            };
        }

        SlidePoses {
            outgoing: CarPose {
                x_frac: self.out_x.sample(frame),
                y_px: REST_Y_PX,
                scale: self.out_scale.sample(frame),
                opacity: self.out_opacity.sample(frame),
                wheel_turns: self.out_wheels.sample(frame),
            },
            incoming: CarPose {
                x_frac: self.in_x.sample(frame),
                y_px: REST_Y_PX,
                scale: self.in_scale.sample(frame),
                opacity: 1.0,
                wheel_turns: self.in_wheels.sample(frame),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetailsPoses {
    pub car: CarPose,
    pub panel: PanelPose,
}

/// The details open/close timeline: car wrapper lift plus panel fade/slide.
/// Opening and closing use distinct durations and eases, and the opening fade
/// starts after the lift is already moving.
#[derive(Clone, Debug)]
pub struct DetailsTimeline {
    duration: u64,
    car_y: Tween<f64>,
    car_scale: Tween<f64>,
    panel_opacity: Tween<f64>,
    panel_y: Tween<f64>,
}

impl DetailsTimeline {
    pub fn open(fps: Fps) -> Self {
        Self::open_from(
            CarPose::rest(),
            PanelPose::closed(),
            fps,
        )
    }

    /// Open starting from arbitrary current poses (close interrupted mid-way).
    pub fn open_from(car: CarPose, panel: PanelPose, fps: Fps) -> Self {
        let lift = fps.secs_to_frames_round(LIFT_OPEN_SECS);
        let delay = fps.secs_to_frames_round(PANEL_FADE_IN_DELAY_SECS);
        let fade = fps.secs_to_frames_round(PANEL_FADE_IN_SECS);

        let lift_range = FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(lift),
        };
        let panel_range = FrameRange {
            start: FrameIndex(delay),
            end: FrameIndex(delay + fade),
        };

        Self {
            duration: lift.max(delay + fade),
            car_y: Tween::new(lift_range, car.y_px, LIFT_Y_PX, Ease::OutCubic),
            car_scale: Tween::new(lift_range, car.scale, LIFT_SCALE, Ease::OutCubic),
            panel_opacity: Tween::new(panel_range, panel.opacity, 1.0, Ease::OutQuad),
            panel_y: Tween::new(panel_range, panel.y_px, 0.0, Ease::OutQuad),
        }
    }

    pub fn close(fps: Fps) -> Self {
        Self::close_from(
            CarPose {
                y_px: LIFT_Y_PX,
                scale: LIFT_SCALE,
                ..CarPose::rest()
            },
            PanelPose::open(),
            fps,
        )
    }

    /// Close starting from arbitrary current poses (open interrupted mid-way).
    pub fn close_from(car: CarPose, panel: PanelPose, fps: Fps) -> Self {
        let drop = fps.secs_to_frames_round(LIFT_CLOSE_SECS);
        let fade = fps.secs_to_frames_round(PANEL_FADE_OUT_SECS);

        let drop_range = FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(drop),
        };
        let fade_range = FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(fade),
        };

        Self {
            duration: drop.max(fade),
            car_y: Tween::new(drop_range, car.y_px, REST_Y_PX, Ease::InOutCubic),
            car_scale: Tween::new(drop_range, car.scale, 1.0, Ease::InOutCubic),
            panel_opacity: Tween::new(fade_range, panel.opacity, 0.0, Ease::InQuad),
            panel_y: Tween::new(fade_range, panel.y_px, PANEL_RISE_PX, Ease::InQuad),
        }
    }

    pub fn duration_frames(&self) -> u64 {
        self.duration
    }

    pub fn finished(&self, frame: FrameIndex) -> bool {
        frame.0 >= self.duration
    }

    pub fn sample(&self, frame: FrameIndex) -> DetailsPoses {
        DetailsPoses {
            car: CarPose {
                x_frac: 0.0,
                y_px: self.car_y.sample(frame),
                scale: self.car_scale.sample(frame),
                opacity: 1.0,
                wheel_turns: 0.0,
            },
            panel: PanelPose {
                opacity: self.panel_opacity.sample(frame),
                y_px: self.panel_y.sample(frame),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fps() -> Fps {
        Fps::new(30, 1).unwrap()
    }

    #[test]
    fn slide_tracks_share_the_start_anchor() {
        let tl = SlideTimeline::new(Direction::Next, fps());
        let start = tl.sample(FrameIndex(0));
        assert_eq!(start.outgoing.x_frac, 0.0);
        assert_eq!(start.outgoing.opacity, 1.0);
        assert_eq!(start.outgoing.scale, 1.0);
        assert_eq!(start.outgoing.wheel_turns, 0.0);
        assert_eq!(start.incoming.x_frac, OFFSCREEN_X_FRAC);
        assert_eq!(start.incoming.scale, TRANSIT_SCALE);
        assert_eq!(start.incoming.opacity, 1.0);
    }

    #[test]
    fn slide_direction_signs_mirror() {
        let next = SlideTimeline::new(Direction::Next, fps());
        let prev = SlideTimeline::new(Direction::Prev, fps());
        let end = FrameIndex(next.duration_frames());

        let n = next.sample(FrameIndex(end.0 - 1));
        let p = prev.sample(FrameIndex(end.0 - 1));
        assert!(n.outgoing.x_frac < 0.0);
        assert!(p.outgoing.x_frac > 0.0);
        assert!(n.outgoing.wheel_turns < 0.0);
        assert!(p.outgoing.wheel_turns > 0.0);
        assert!(n.incoming.x_frac > 0.0);
        assert!(p.incoming.x_frac < 0.0);
    }

    #[test]
    fn slide_completion_restores_rest_pose_exactly() {
        let tl = SlideTimeline::new(Direction::Next, fps());
        let done = tl.sample(FrameIndex(tl.duration_frames()));
        assert_eq!(done.incoming, CarPose::rest());
        assert_eq!(done.outgoing.opacity, 0.0);

        // No drift across repeated transitions: a second timeline starts from
        // the same rest pose the first one ended on.
        let again = SlideTimeline::new(Direction::Next, fps());
        assert_eq!(again.sample(FrameIndex(0)).outgoing.x_frac, 0.0);
    }

    #[test]
    fn slide_wheels_complete_one_signed_turn() {
        let tl = SlideTimeline::new(Direction::Prev, fps());
        let last = tl.sample(FrameIndex(tl.duration_frames() - 1));
        assert!(last.incoming.wheel_turns > 0.9);
        let done = tl.sample(FrameIndex(tl.duration_frames()));
        assert_eq!(done.outgoing.wheel_turns, WHEEL_TURNS);
    }

    #[test]
    fn slide_duration_matches_constant() {
        let tl = SlideTimeline::new(Direction::Next, fps());
        assert_eq!(tl.duration_frames(), 21); // 0.7s at 30fps
    }

    #[test]
    fn details_open_delays_panel_relative_to_lift() {
        let tl = DetailsTimeline::open(fps());
        let early = tl.sample(FrameIndex(3));
        // Lift is already moving while the panel has not started fading.
        assert!(early.car.y_px < REST_Y_PX);
        assert_eq!(early.panel.opacity, 0.0);

        let done = tl.sample(FrameIndex(tl.duration_frames()));
        assert_eq!(done.car.y_px, LIFT_Y_PX);
        assert_eq!(done.car.scale, LIFT_SCALE);
        assert_eq!(done.panel, PanelPose::open());
    }

    #[test]
    fn details_close_returns_to_rest() {
        let tl = DetailsTimeline::close(fps());
        let done = tl.sample(FrameIndex(tl.duration_frames()));
        assert_eq!(done.car.y_px, REST_Y_PX);
        assert_eq!(done.car.scale, 1.0);
        assert_eq!(done.panel, PanelPose::closed());
    }

    #[test]
    fn details_close_is_shorter_on_the_panel_than_the_lift() {
        let tl = DetailsTimeline::close(fps());
        let fade = fps().secs_to_frames_round(PANEL_FADE_OUT_SECS);
        let mid = tl.sample(FrameIndex(fade));
        assert_eq!(mid.panel.opacity, 0.0);
        // The car is still dropping after the panel has fully faded.
        assert!(mid.car.y_px < REST_Y_PX - 1.0);
    }

    #[test]
    fn close_from_resumes_an_interrupted_open() {
        let open = DetailsTimeline::open(fps());
        let mid = open.sample(FrameIndex(4));
        let close = DetailsTimeline::close_from(mid.car, mid.panel, fps());
        let start = close.sample(FrameIndex(0));
        assert_eq!(start.car.y_px, mid.car.y_px);
        let done = close.sample(FrameIndex(close.duration_frames()));
        assert_eq!(done.car.y_px, REST_Y_PX);
    }
}
