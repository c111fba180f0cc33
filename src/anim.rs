use crate::{
    core::{FrameIndex, FrameRange},
    ease::Ease,
    error::{ShowroomError, ShowroomResult},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

/// A single timed interpolation of a value between two endpoints.
///
/// Sampling holds `from` before the range, eases within it, and holds `to` at
/// and after `range.end`. A tween with an empty range is a constant (`to`
/// everywhere), which is what [`Tween::hold`] builds.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Tween<T> {
    pub range: FrameRange,
    pub from: T,
    pub to: T,
    pub ease: Ease,
}

impl<T> Tween<T>
where
    T: Lerp + Clone,
{
    pub fn new(range: FrameRange, from: T, to: T, ease: Ease) -> Self {
        Self {
            range,
            from,
            to,
            ease,
        }
    }

    /// Constant value for every frame.
    pub fn hold(value: T) -> Self {
        Self {
            range: FrameRange {
                start: FrameIndex(0),
                end: FrameIndex(0),
            },
            from: value.clone(),
            to: value,
            ease: Ease::Linear,
        }
    }

    pub fn validate(&self) -> ShowroomResult<()> {
        if self.range.start.0 > self.range.end.0 {
            return Err(ShowroomError::animation("Tween range start must be <= end"));
        }
        Ok(())
    }

    pub fn sample(&self, frame: FrameIndex) -> T {
        if self.range.is_empty() || frame.0 >= self.range.end.0 {
            return self.to.clone();
        }
        if frame.0 <= self.range.start.0 {
            return self.from.clone();
        }
        let t = (frame.0 - self.range.start.0) as f64 / self.range.len_frames() as f64;
        T::lerp(&self.from, &self.to, self.ease.apply(t))
    }

    pub fn finished(&self, frame: FrameIndex) -> bool {
        frame.0 >= self.range.end.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tween() -> Tween<f64> {
        Tween::new(
            FrameRange::new(FrameIndex(10), FrameIndex(20)).unwrap(),
            0.0,
            10.0,
            Ease::Linear,
        )
    }

    #[test]
    fn holds_endpoints_outside_range() {
        let tw = tween();
        assert_eq!(tw.sample(FrameIndex(0)), 0.0);
        assert_eq!(tw.sample(FrameIndex(10)), 0.0);
        assert_eq!(tw.sample(FrameIndex(20)), 10.0);
        assert_eq!(tw.sample(FrameIndex(999)), 10.0);
    }

    #[test]
    fn interpolates_within_range() {
        let tw = tween();
        assert_eq!(tw.sample(FrameIndex(15)), 5.0);
    }

    #[test]
    fn finished_is_inclusive_of_end() {
        let tw = tween();
        assert!(!tw.finished(FrameIndex(19)));
        assert!(tw.finished(FrameIndex(20)));
    }

    #[test]
    fn hold_is_constant_everywhere() {
        let tw = Tween::hold(4.0);
        assert_eq!(tw.sample(FrameIndex(0)), 4.0);
        assert_eq!(tw.sample(FrameIndex(1000)), 4.0);
        assert!(tw.finished(FrameIndex(0)));
    }
}
