use crate::{
    catalog::{CarRecord, Catalog},
    error::{ShowroomError, ShowroomResult},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    Next,
    Prev,
}

impl Direction {
    /// Sign of horizontal exit travel and wheel rotation. `Next` moves the
    /// outgoing car toward negative x and spins wheels negative; `Prev` is the
    /// mirror image.
    pub fn signum(self) -> f64 {
        match self {
            Self::Next => -1.0,
            Self::Prev => 1.0,
        }
    }

    pub fn step(self) -> isize {
        match self {
            Self::Next => 1,
            Self::Prev => -1,
        }
    }
}

/// Transition memory: which record is leaving, which is arriving, and which
/// way everything travels. Exists only while a transition is in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub direction: Direction,
    pub from_index: usize,
    pub to_index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Transitioning(Transition),
    DetailsOpen,
}

/// Carousel controller: owns the current index and the two guard conditions
/// (transition in flight, details panel open) that serialize navigation.
///
/// The index commits optimistically: `next`/`prev` move `current_index`
/// immediately and the visual transition plays out afterwards. Logical state
/// stays trivial at the cost of the ghost car being addressed through the
/// transition memory while the animation runs.
#[derive(Clone, Debug)]
pub struct Carousel {
    catalog: Catalog,
    current_index: usize,
    phase: Phase,
}

impl Carousel {
    pub fn new(catalog: Catalog) -> ShowroomResult<Self> {
        catalog.validate()?;
        Ok(Self {
            catalog,
            current_index: 0,
            phase: Phase::Idle,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Always in bounds: the index is only ever produced by `wrap`.
    pub fn current(&self) -> &CarRecord {
        &self.catalog.cars[self.current_index]
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Transitioning(_))
    }

    pub fn details_open(&self) -> bool {
        matches!(self.phase, Phase::DetailsOpen)
    }

    pub fn transition(&self) -> Option<Transition> {
        match self.phase {
            Phase::Transitioning(t) => Some(t),
            _ => None,
        }
    }

    /// Advance to the adjacent record. Returns the transition plan for the
    /// caller to animate, or `None` (and no state change) while a transition
    /// is in flight or the details panel is open.
    pub fn next(&mut self) -> Option<Transition> {
        self.navigate(Direction::Next)
    }

    pub fn prev(&mut self) -> Option<Transition> {
        self.navigate(Direction::Prev)
    }

    fn navigate(&mut self, direction: Direction) -> Option<Transition> {
        if !matches!(self.phase, Phase::Idle) {
            return None;
        }

        let from_index = self.current_index;
        let to_index = self
            .catalog
            .wrap(from_index as isize + direction.step());
        let transition = Transition {
            direction,
            from_index,
            to_index,
        };

        // Optimistic commit: the logical index changes now, the slide catches up.
        self.current_index = to_index;
        self.phase = Phase::Transitioning(transition);
        tracing::debug!(?direction, from_index, to_index, "carousel transition start");
        Some(transition)
    }

    /// Completion callback target: legal exactly once per transition, fired by
    /// whoever drives the slide timeline after its last frame.
    pub fn complete_transition(&mut self) -> ShowroomResult<()> {
        match self.phase {
            Phase::Transitioning(t) => {
                tracing::debug!(to_index = t.to_index, "carousel transition complete");
                self.phase = Phase::Idle;
                Ok(())
            }
            _ => Err(ShowroomError::state(
                "complete_transition called outside of a transition",
            )),
        }
    }

    /// Returns false (no state change) while a transition is in flight.
    pub fn open_details(&mut self) -> bool {
        if !matches!(self.phase, Phase::Idle) {
            return false;
        }
        self.phase = Phase::DetailsOpen;
        tracing::debug!(index = self.current_index, "details open");
        true
    }

    /// Explicit close button and the full-screen overlay click both land here.
    /// Idempotent: closing while already closed is a no-op.
    pub fn close_details(&mut self) -> bool {
        if !matches!(self.phase, Phase::DetailsOpen) {
            return false;
        }
        self.phase = Phase::Idle;
        tracing::debug!(index = self.current_index, "details close");
        true
    }
}
