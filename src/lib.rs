//! Showroom renders a marketing car carousel as an offline animation: a fixed
//! catalog of car records drives a controller state machine, slide/details
//! tween timelines, and a vector scene rasterized on the CPU.
//!
//! The public surface is script-oriented:
//!
//! - Build or load a [`Script`] of timed input events
//! - Create a [`Session`] and advance its frame clock
//! - Rasterize each [`Scene`] with a [`CpuRenderer`] into PNG or MP4 output
#![forbid(unsafe_code)]

pub mod anim;
pub mod carousel;
pub mod catalog;
pub mod compose;
pub mod core;
pub mod ease;
pub mod encode;
pub mod error;
pub mod motion;
pub mod render;
pub mod scene;
pub mod session;

pub use anim::{Lerp, Tween};
pub use carousel::{Carousel, Direction, Phase, Transition};
pub use catalog::{CarRecord, Catalog, Category};
pub use crate::core::{Affine, BezPath, Canvas, Color, Fps, FrameIndex, FrameRange, Point, Rect};
pub use ease::Ease;
pub use encode::{EncodeConfig, FfmpegEncoder};
pub use error::{ShowroomError, ShowroomResult};
pub use motion::{CarPose, DetailsTimeline, PanelPose, SlideTimeline};
pub use render::{CpuRenderer, FrameRgba};
pub use scene::Scene;
pub use session::{InputEvent, Script, Session, Showroom, TimedEvent};
