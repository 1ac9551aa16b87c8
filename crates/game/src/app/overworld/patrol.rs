use engine::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PatrolLeg {
    pub(crate) direction: Direction,
    pub(crate) frames: u32,
    pub(crate) moving: bool,
}

impl PatrolLeg {
    pub(crate) const fn walk(direction: Direction, frames: u32) -> Self {
        Self {
            direction,
            frames,
            moving: true,
        }
    }

    pub(crate) const fn face(direction: Direction, frames: u32) -> Self {
        Self {
            direction,
            frames,
            moving: false,
        }
    }
}

/// Scripted movement that loops over its legs forever.
#[derive(Debug, Clone)]
pub(crate) struct Patrol {
    legs: Vec<PatrolLeg>,
    leg_index: usize,
    frames_in_leg: u32,
}

impl Patrol {
    pub(crate) fn new(legs: Vec<PatrolLeg>) -> Self {
        Self {
            legs: legs.into_iter().filter(|leg| leg.frames > 0).collect(),
            leg_index: 0,
            frames_in_leg: 0,
        }
    }

    /// Leg to follow this frame, or `None` for an empty patrol.
    pub(crate) fn advance(&mut self) -> Option<PatrolLeg> {
        let leg = *self.legs.get(self.leg_index)?;
        self.frames_in_leg += 1;
        if self.frames_in_leg >= leg.frames {
            self.frames_in_leg = 0;
            self.leg_index = (self.leg_index + 1) % self.legs.len();
        }
        Some(leg)
    }
}
